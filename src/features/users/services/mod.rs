mod password_hasher;
mod user_service;

pub use user_service::{UserDirectory, UserError, UserService};
