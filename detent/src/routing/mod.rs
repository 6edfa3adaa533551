pub mod events;
pub mod port;
pub mod ports;
pub mod router;

pub use events::*;
pub use port::*;
pub use ports::*;
pub use router::*;
