pub use crate::core::logging::{debug, error, info, trace, warn};
pub use crate::core::util::HashMap;
pub use crate::core::util::differs_by_more_than;
pub use crate::core::util::min_magnitude;
pub use crate::ternary;
