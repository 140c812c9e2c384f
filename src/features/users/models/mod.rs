mod user;

pub use user::{Credentials, NewUser, User, UserId, UserRecord};
