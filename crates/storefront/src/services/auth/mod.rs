//! Authentication service.
//!
//! Signs visitors in against the fixed demo credential table. There is no
//! persistence: registered profiles live only in the visitor's session, so
//! they cannot sign in again once signed out.

mod error;

pub use error::AuthError;

use std::time::Duration;

use chrono::Utc;
use elite_store_core::{CredentialTable, Email, RegistrationForm, User};
use secrecy::{ExposeSecret, SecretString};

/// Authentication service.
///
/// Every sign-in and registration attempt waits for `latency` first, which
/// suspends only the request being served.
#[derive(Debug)]
pub struct AuthService {
    credentials: CredentialTable,
    latency: Duration,
}

impl AuthService {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(credentials: CredentialTable, latency: Duration) -> Self {
        Self {
            credentials,
            latency,
        }
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<User, AuthError> {
        self.simulate_latency().await;

        self.credentials
            .authenticate(email, password.expose_secret())
            .ok_or(AuthError::InvalidCredentials)
    }

    /// Register a new customer.
    ///
    /// The returned profile is fabricated on the spot and is not added to the
    /// credential table.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserAlreadyExists` if the email belongs to a demo
    /// account, whatever the other fields hold.
    /// Returns `AuthError::Validation` if any form field is invalid.
    pub async fn register(&self, form: &RegistrationForm) -> Result<User, AuthError> {
        if Email::parse(&form.email).is_ok_and(|email| self.credentials.contains(&email)) {
            self.simulate_latency().await;
            return Err(AuthError::UserAlreadyExists);
        }

        let registration = form.validate()?;

        self.simulate_latency().await;

        Ok(User::registered(
            &registration.name,
            registration.email,
            Utc::now(),
        ))
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}
