use thiserror::Error;

use crate::registration::RegistrationError;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{0}")]
    InvalidLogin(String),

    #[error("Email already in use: {0}")]
    EmailInUse(String),

    #[error("Invalid registration: {0}")]
    InvalidRegistration(#[from] RegistrationError),

    #[error("Invalid auth configuration: {0}")]
    Configuration(String),

    #[error("Password hashing failed: {0}")]
    Hashing(#[from] bcrypt::BcryptError),
}
