//! Typed session access.

use serde::de::DeserializeOwned;
use tower_sessions::Session;

use crate::models::{Flash, session_keys};

/// Read a session entry, discarding it if it no longer deserializes.
///
/// A malformed entry is logged, removed and reported as absent, so a stale
/// or tampered session degrades to an anonymous visitor with an empty cart.
///
/// # Errors
///
/// Returns an error if the session store itself fails.
pub async fn read_or_discard<T: DeserializeOwned>(
    session: &Session,
    key: &str,
) -> Result<Option<T>, tower_sessions::session::Error> {
    match session.get::<T>(key).await {
        Ok(value) => Ok(value),
        Err(tower_sessions::session::Error::SerdeJson(e)) => {
            tracing::warn!(key, error = %e, "Discarding malformed session entry");
            session.remove::<serde_json::Value>(key).await?;
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Queue a flash message for the next rendered page.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn push_flash(
    session: &Session,
    flash: Flash,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::FLASH, flash).await
}

/// Take the pending flash message, if any.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn take_flash(
    session: &Session,
) -> Result<Option<Flash>, tower_sessions::session::Error> {
    let flash = read_or_discard::<Flash>(session, session_keys::FLASH).await?;
    if flash.is_some() {
        session.remove::<serde_json::Value>(session_keys::FLASH).await?;
    }
    Ok(flash)
}
