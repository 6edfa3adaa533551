pub mod control;
pub mod core;
pub mod prelude;
pub mod routing;
pub mod runtime;
