pub mod serialization;
pub mod storage;
