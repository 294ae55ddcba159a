//! Authentication error types.

use elite_store_core::RegistrationErrors;
use thiserror::Error;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No account matches the email and password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The email belongs to an existing account.
    #[error("user already exists")]
    UserAlreadyExists,

    /// The registration form has invalid fields.
    #[error("registration validation failed: {0}")]
    Validation(#[from] RegistrationErrors),
}

impl AuthError {
    /// Message shown to the visitor.
    #[must_use]
    pub const fn public_message(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "Invalid email or password",
            Self::UserAlreadyExists => "User with this email already exists",
            Self::Validation(_) => "Please correct the highlighted fields",
        }
    }
}
