//! Session cart persistence.
//!
//! Each request loads the visitor's cart into a [`CartStore`], mutates it
//! and writes it back. Store events are logged and recorded as Sentry
//! breadcrumbs.

use elite_store_core::{Cart, CartEvent, CartStore};
use tower_sessions::Session;

use crate::error::add_breadcrumb;
use crate::models::session_keys;
use crate::services::session::read_or_discard;

/// Load the visitor's cart. A missing or malformed cart loads as empty.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn load_cart(session: &Session) -> Result<CartStore, tower_sessions::session::Error> {
    let cart = read_or_discard::<Cart>(session, session_keys::CART)
        .await?
        .unwrap_or_default();

    let mut store = CartStore::new(cart);
    store.subscribe(record_event);
    Ok(store)
}

/// Write the cart back to the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save_cart(
    session: &Session,
    store: CartStore,
) -> Result<(), tower_sessions::session::Error> {
    let cart = store.into_cart();
    if cart.is_empty() {
        session.remove::<serde_json::Value>(session_keys::CART).await?;
        return Ok(());
    }
    session.insert(session_keys::CART, cart).await
}

fn record_event(event: &CartEvent) {
    match event {
        CartEvent::ItemAdded {
            key,
            added,
            line_quantity,
        } => {
            tracing::info!(
                product_id = %key.product_id,
                color = ?key.color,
                size = ?key.size,
                added,
                line_quantity,
                "Cart item added"
            );
            add_breadcrumb(
                "cart",
                "Item added",
                Some(&[
                    ("product_id", &key.product_id.to_string()),
                    ("quantity", &line_quantity.to_string()),
                ]),
            );
        }
        CartEvent::QuantityChanged { key, from, to } => {
            tracing::info!(product_id = %key.product_id, from, to, "Cart quantity changed");
            add_breadcrumb(
                "cart",
                "Quantity changed",
                Some(&[
                    ("product_id", &key.product_id.to_string()),
                    ("quantity", &to.to_string()),
                ]),
            );
        }
        CartEvent::ItemRemoved { key } => {
            tracing::info!(
                product_id = %key.product_id,
                color = ?key.color,
                size = ?key.size,
                "Cart item removed"
            );
            add_breadcrumb(
                "cart",
                "Item removed",
                Some(&[("product_id", &key.product_id.to_string())]),
            );
        }
        CartEvent::Cleared { lines } => {
            tracing::info!(lines, "Cart cleared");
            add_breadcrumb("cart", "Cart cleared", None);
        }
    }
}
