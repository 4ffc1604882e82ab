pub mod credentials;
pub mod handlers;
pub mod models;
pub mod session;

use thiserror::Error;

pub use credentials::AdminCredentials;
pub use session::{Session, SessionService};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("password hashing failed: {0}")]
    Hashing(String),
    #[error("invalid password hash: {0}")]
    InvalidHash(String),
}
