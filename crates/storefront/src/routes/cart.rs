//! Cart route handlers.
//!
//! The cart lives in the visitor's session. Every mutation loads it into a
//! `CartStore`, applies the change and writes it back before redirecting
//! (POST/redirect/GET).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use elite_store_core::{Cart, CartItem, LineKey, OrderSummary, ProductId, QuantityUpdate};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::PageContext;
use crate::models::Flash;
use crate::routes::{empty_string_as_none, safe_return_to};
use crate::services::cart::{load_cart, save_cart};
use crate::services::session::push_flash;
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub product_id: ProductId,
    pub name: String,
    pub href: String,
    pub image: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
}

impl From<&CartItem> for CartLineView {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product.id,
            name: item.product.name.clone(),
            href: format!("/products/{}", item.product.id),
            image: item.product.primary_image().map(String::from),
            color: item.selected_color.clone(),
            size: item.selected_size.clone(),
            quantity: item.quantity,
            unit_price: item.product.price.to_string(),
            line_total: item.line_total().to_string(),
        }
    }
}

/// Order summary display data for templates.
#[derive(Clone)]
pub struct SummaryView {
    pub item_count: u64,
    pub subtotal: String,
    pub tax: String,
    pub shipping: String,
    pub ships_free: bool,
    pub total: String,
    /// Amount left to spend before shipping is free.
    pub free_shipping_remaining: Option<String>,
}

impl From<&OrderSummary> for SummaryView {
    fn from(summary: &OrderSummary) -> Self {
        Self {
            item_count: summary.item_count,
            subtotal: summary.subtotal.to_string(),
            tax: summary.tax.to_string(),
            shipping: summary.shipping.to_string(),
            ships_free: summary.ships_free(),
            total: summary.total.to_string(),
            free_shipping_remaining: summary.free_shipping_remaining.map(|p| p.to_string()),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub summary: SummaryView,
}

impl CartView {
    /// Build the view of `cart` priced under `state`'s policy.
    #[must_use]
    pub fn new(cart: &Cart, state: &AppState) -> Self {
        Self {
            lines: cart.items().iter().map(CartLineView::from).collect(),
            summary: SummaryView::from(&cart.summary(&state.config().pricing)),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// =============================================================================
// Forms
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub color: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub size: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub quantity: Option<u32>,
    /// Page to return to after adding; defaults to the cart.
    #[serde(default)]
    pub return_to: Option<String>,
}

/// Update cart form data.
///
/// A quantity of zero or less removes the line.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub color: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub size: Option<String>,
    pub quantity: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: ProductId,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub page: PageContext,
    pub cart: CartView,
}

/// Cart count badge fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
}

// =============================================================================
// Route Handlers
// =============================================================================

/// Display the cart page.
#[instrument(skip(state, session, page))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    page: PageContext,
) -> Result<impl IntoResponse> {
    let store = load_cart(&session).await?;
    let cart = CartView::new(store.cart(), &state);

    Ok(CartShowTemplate { page, cart })
}

/// Add an item to the cart.
#[instrument(skip(state, session, form), fields(product_id = %form.product_id))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let product = state
        .catalog()
        .get(form.product_id)
        .ok_or_else(|| AppError::NotFound(format!("product {}", form.product_id)))?;

    if !product.in_stock {
        return Err(AppError::BadRequest(format!(
            "{} is out of stock",
            product.name
        )));
    }

    let mut store = load_cart(&session).await?;
    store.add(
        product,
        form.color.as_deref(),
        form.size.as_deref(),
        form.quantity.unwrap_or(1),
    )?;
    save_cart(&session, store).await?;

    push_flash(
        &session,
        Flash::success(
            "Added to cart",
            format!("{} has been added to your cart", product.name),
        ),
    )
    .await?;

    let target = safe_return_to(form.return_to.as_deref(), "/cart");
    Ok(Redirect::to(target).into_response())
}

/// Set the quantity of one cart line.
#[instrument(skip(session, form), fields(product_id = %form.product_id, quantity = form.quantity))]
pub async fn update(session: Session, Form(form): Form<UpdateCartForm>) -> Result<Response> {
    let key = LineKey::new(form.product_id, form.color.as_deref(), form.size.as_deref());

    let mut store = load_cart(&session).await?;
    if store.update_quantity(&key, form.quantity) == QuantityUpdate::NotFound {
        return Err(AppError::NotFound(format!(
            "cart line for product {}",
            form.product_id
        )));
    }
    save_cart(&session, store).await?;

    Ok(Redirect::to("/cart").into_response())
}

/// Remove every line of a product from the cart.
#[instrument(skip(session, form), fields(product_id = %form.product_id))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Result<Response> {
    let mut store = load_cart(&session).await?;
    let removed = store.remove_product(form.product_id);
    if removed > 0 {
        save_cart(&session, store).await?;
    }

    Ok(Redirect::to("/cart").into_response())
}

/// Get the cart count badge.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<impl IntoResponse> {
    let store = load_cart(&session).await?;

    Ok(CartCountTemplate {
        count: store.cart().item_count(),
    })
}
