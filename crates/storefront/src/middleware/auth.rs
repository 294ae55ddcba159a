//! Authentication extractors and session helpers.
//!
//! The signed-in profile lives in the session under [`session_keys::USER`].
//! It is trusted on read: a restored profile is never checked against the
//! credential table.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use elite_store_core::{AuthEvent, AuthStore, User};
use tower_sessions::Session;

use crate::error::{add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::models::session_keys;
use crate::services::session::read_or_discard;

/// Extractor that requires a signed-in visitor.
///
/// If nobody is signed in, redirects to the login page with a `return_to`
/// pointing back at the requested page.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAuth(user): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireAuth(pub User);

/// Error returned when authentication is required but nobody is signed in.
#[derive(Debug)]
pub enum AuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin(String),
    /// Unauthorized response (for API requests).
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin(return_to) => Redirect::to(&format!(
                "/auth/login?return_to={}",
                urlencoding::encode(&return_to)
            ))
            .into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AuthRejection::Unauthorized)?;

        let user = read_or_discard::<User>(session, session_keys::USER)
            .await
            .ok()
            .flatten()
            .ok_or_else(|| {
                if parts.uri.path().starts_with("/api/") {
                    AuthRejection::Unauthorized
                } else {
                    AuthRejection::RedirectToLogin(
                        parts
                            .uri
                            .path_and_query()
                            .map_or_else(|| "/".to_string(), ToString::to_string),
                    )
                }
            })?;

        Ok(Self(user))
    }
}

/// Extractor that optionally gets the signed-in visitor.
///
/// Unlike `RequireAuth`, this does not reject anonymous visitors.
pub struct OptionalAuth(pub Option<User>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => read_or_discard::<User>(session, session_keys::USER)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(user))
    }
}

/// Load the visitor's [`AuthStore`], restoring any profile in the session.
///
/// The store reports transitions to the log and keeps the Sentry user scope
/// in step with who is signed in.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn load_auth(session: &Session) -> Result<AuthStore, tower_sessions::session::Error> {
    let mut store = AuthStore::new();
    store.subscribe(record_event);
    if let Some(user) = read_or_discard::<User>(session, session_keys::USER).await? {
        store.restore(user);
    }
    Ok(store)
}

/// Helper to set the signed-in profile in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &User,
) -> Result<(), tower_sessions::session::Error> {
    // New identity, new session id
    session.cycle_id().await?;
    session.insert(session_keys::USER, user).await
}

/// Helper to clear the signed-in profile from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<serde_json::Value>(session_keys::USER)
        .await?;
    Ok(())
}

fn record_event(event: &AuthEvent) {
    match event {
        AuthEvent::SignedIn(user) => {
            tracing::info!(user_id = %user.id, admin = user.is_admin, "User signed in");
            set_sentry_user(&user.id, Some(user.email.as_str()));
            add_breadcrumb("auth", "Signed in", None);
        }
        AuthEvent::Restored(user) => {
            tracing::debug!(user_id = %user.id, "User restored from session");
            set_sentry_user(&user.id, Some(user.email.as_str()));
        }
        AuthEvent::SignedOut(user) => {
            tracing::info!(user_id = %user.id, "User signed out");
            clear_sentry_user();
            add_breadcrumb("auth", "Signed out", None);
        }
    }
}
