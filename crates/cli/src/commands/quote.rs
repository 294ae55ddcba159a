//! Cart quotes.

use std::path::Path;

use elite_store_core::{Cart, Catalog, PricingPolicy, ProductId};
use tracing::info;

use crate::commands::catalog;
use crate::error::CliError;

/// Parse an `ID:QTY` item. A bare `ID` means a quantity of one.
///
/// # Errors
///
/// Returns `CliError::InvalidItem` if either part is not a number or the
/// quantity is zero.
pub fn parse_item(item: &str) -> Result<(ProductId, u32), CliError> {
    let invalid = || CliError::InvalidItem(item.to_string());

    let (id, quantity) = item.split_once(':').unwrap_or((item, "1"));
    let id = id.parse::<ProductId>().map_err(|_| invalid())?;
    let quantity = quantity
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|q| *q > 0)
        .ok_or_else(invalid)?;

    Ok((id, quantity))
}

/// Build a cart from `ID:QTY` items.
///
/// Repeated ids merge into one line, as they would in the storefront.
///
/// # Errors
///
/// Returns an error for malformed items, unknown or out-of-stock products.
pub fn build_cart(catalog: &Catalog, items: &[String]) -> Result<Cart, CliError> {
    let mut cart = Cart::new();

    for item in items {
        let (id, quantity) = parse_item(item)?;
        let product = catalog.get(id).ok_or(CliError::UnknownProduct(id))?;
        if !product.in_stock {
            return Err(CliError::OutOfStock(id));
        }
        cart.add(product, None, None, quantity)?;
    }

    Ok(cart)
}

/// Print the order summary for `items`.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded or an item is invalid.
pub fn quote(path: Option<&Path>, items: &[String]) -> Result<(), CliError> {
    let catalog = catalog::load(path)?;
    let cart = build_cart(&catalog, items)?;
    let summary = cart.summary(&PricingPolicy::default());

    for line in cart.items() {
        info!(
            "{:>3} x {:<40} {:>10}",
            line.quantity,
            line.product.name,
            line.line_total().to_string()
        );
    }

    info!("Items:    {}", summary.item_count);
    info!("Subtotal: {}", summary.subtotal);
    info!("Tax:      {}", summary.tax);
    if summary.ships_free() {
        info!("Shipping: FREE");
    } else {
        info!("Shipping: {}", summary.shipping);
    }
    if let Some(remaining) = summary.free_shipping_remaining {
        info!("Add {remaining} more for free shipping");
    }
    info!("Total:    {}", summary.total);

    Ok(())
}
