//! Infrastructure adapters used by the features
//!
//! Currently only report photo storage on the local file system.

pub mod storage;
