pub mod control_traits;
pub mod registry;

pub use control_traits::*;
pub use registry::*;
