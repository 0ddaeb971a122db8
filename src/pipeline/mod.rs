pub mod dates;
pub mod extraction;
pub mod import;
pub mod processor;
pub mod storage;
