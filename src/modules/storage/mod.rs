//! Storage module for report photos
//!
//! Provides the [`PhotoStorage`] seam and its local-disk implementation.

mod photo_storage;

pub use photo_storage::{LocalPhotoStorage, PhotoStorage, PhotoStorageError};
