//! Registered users.
//!
//! Owns the `users` table: registration, credential checks and the
//! [`UserDirectory`](services::UserDirectory) lookup that reports use to
//! snapshot a submitter's display name.

pub mod models;
pub mod services;

pub use services::{UserDirectory, UserError, UserService};
