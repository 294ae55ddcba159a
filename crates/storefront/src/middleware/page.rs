//! Per-page layout context.

use axum::{extract::FromRequestParts, http::request::Parts};
use elite_store_core::{Cart, User};
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::{Flash, session_keys};
use crate::services::session::{read_or_discard, take_flash};

/// What the shared layout needs on every page: who is signed in, the cart
/// badge count and the pending flash message.
///
/// Extracting this consumes the flash message.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    pub user: Option<User>,
    pub cart_count: u64,
    pub flash: Option<Flash>,
}

impl<S> FromRequestParts<S> for PageContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(session) = parts.extensions.get::<Session>() else {
            return Ok(Self::default());
        };

        let user = read_or_discard::<User>(session, session_keys::USER).await?;
        let cart_count = read_or_discard::<Cart>(session, session_keys::CART)
            .await?
            .map_or(0, |cart| cart.item_count());
        let flash = take_flash(session).await?;

        Ok(Self {
            user,
            cart_count,
            flash,
        })
    }
}
