pub use crate::control::*;
pub use crate::core::logging::init_logger;
pub use crate::core::logging::{debug, error, info, trace, warn};
pub use crate::routing::*;
pub use crate::runtime::serialization::{ports_from_xml, ports_to_xml};
pub use crate::runtime::storage;
