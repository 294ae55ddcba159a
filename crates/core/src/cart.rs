//! Shopping cart.
//!
//! A [`Cart`] is an ordered list of line items, at most one per [`LineKey`]
//! (product id, selected color, selected size). Quantities are always
//! positive: driving a line to zero removes it. Totals are derived on read
//! through a [`PricingPolicy`].
//!
//! [`CartStore`] wraps a cart and notifies subscribers after each successful
//! mutation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::store::{Listeners, SubscriptionId};
use crate::types::{Price, ProductId};

/// Errors from cart mutations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// Tried to add zero units.
    #[error("quantity must be at least 1")]
    ZeroQuantity,
    /// The selected color or size is not offered by the product.
    #[error("product {product_id} is not available in {variant:?}")]
    UnknownVariant {
        product_id: ProductId,
        variant: String,
    },
    /// The line quantity would not fit in a `u32`.
    #[error("quantity for product {product_id} is too large")]
    QuantityOverflow { product_id: ProductId },
    /// A stored cart holds a line with zero quantity or a repeated key.
    #[error("stored cart is inconsistent at product {product_id}")]
    Inconsistent { product_id: ProductId },
}

/// Identifies one cart line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineKey {
    pub product_id: ProductId,
    pub color: Option<String>,
    pub size: Option<String>,
}

impl LineKey {
    /// Build a key, treating blank selections as "none".
    #[must_use]
    pub fn new(product_id: ProductId, color: Option<&str>, size: Option<&str>) -> Self {
        Self {
            product_id,
            color: normalize_variant(color),
            size: normalize_variant(size),
        }
    }
}

fn normalize_variant(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// One line of the cart: a product snapshot, how many, and which variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_size: Option<String>,
}

impl CartItem {
    /// The key identifying this line.
    #[must_use]
    pub fn key(&self) -> LineKey {
        LineKey {
            product_id: self.product.id,
            color: self.selected_color.clone(),
            size: self.selected_size.clone(),
        }
    }

    fn matches(&self, key: &LineKey) -> bool {
        self.product.id == key.product_id
            && self.selected_color == key.color
            && self.selected_size == key.size
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price * self.quantity
    }
}

/// What [`Cart::update_quantity`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityUpdate {
    /// The line now holds the new quantity; carries the previous one.
    Updated { previous: u32 },
    /// The new quantity was zero or negative, so the line was dropped.
    Removed { previous: u32 },
    /// No line has that key.
    NotFound,
}

/// The visitor's cart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartItem>", into = "Vec<CartItem>")]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add `quantity` units of a product variant.
    ///
    /// Merges into the existing line for the same key, otherwise appends a
    /// new line. Returns the line's quantity after the add.
    ///
    /// Stock is not checked here; callers decide whether out-of-stock
    /// products may be added.
    ///
    /// # Errors
    ///
    /// Fails when `quantity` is zero, when the color or size is not one the
    /// product offers, or when the line quantity would overflow.
    pub fn add(
        &mut self,
        product: &Product,
        color: Option<&str>,
        size: Option<&str>,
        quantity: u32,
    ) -> Result<u32, CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }

        let key = LineKey::new(product.id, color, size);
        if let Some(color) = &key.color
            && !product.offers_color(color)
        {
            return Err(CartError::UnknownVariant {
                product_id: product.id,
                variant: color.clone(),
            });
        }
        if let Some(size) = &key.size
            && !product.offers_size(size)
        {
            return Err(CartError::UnknownVariant {
                product_id: product.id,
                variant: size.clone(),
            });
        }

        if let Some(line) = self.items.iter_mut().find(|item| item.matches(&key)) {
            line.quantity = line
                .quantity
                .checked_add(quantity)
                .ok_or(CartError::QuantityOverflow {
                    product_id: product.id,
                })?;
            return Ok(line.quantity);
        }

        self.items.push(CartItem {
            product: product.clone(),
            quantity,
            selected_color: key.color,
            selected_size: key.size,
        });
        Ok(quantity)
    }

    /// Set the quantity of one line. Zero or less removes it.
    ///
    /// Quantities above `u32::MAX` are clamped.
    pub fn update_quantity(&mut self, key: &LineKey, quantity: i64) -> QuantityUpdate {
        let Some(index) = self.items.iter().position(|item| item.matches(key)) else {
            return QuantityUpdate::NotFound;
        };

        let previous = self.items[index].quantity;
        if quantity <= 0 {
            self.items.remove(index);
            return QuantityUpdate::Removed { previous };
        }

        self.items[index].quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        QuantityUpdate::Updated { previous }
    }

    /// Remove every line for a product, whatever its variant. Returns how
    /// many lines were removed.
    pub fn remove_product(&mut self, product_id: ProductId) -> usize {
        let before = self.items.len();
        self.items.retain(|item| item.product.id != product_id);
        before - self.items.len()
    }

    /// Remove every line. Returns how many lines were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.items.len();
        self.items.clear();
        removed
    }

    /// Lines in the order they were first added.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// The line with this key, if present.
    #[must_use]
    pub fn get(&self, key: &LineKey) -> Option<&CartItem> {
        self.items.iter().find(|item| item.matches(key))
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units across every line.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of every line total.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Totals under `policy`.
    #[must_use]
    pub fn summary(&self, policy: &PricingPolicy) -> OrderSummary {
        policy.summarize(self.item_count(), self.subtotal())
    }
}

impl TryFrom<Vec<CartItem>> for Cart {
    type Error = CartError;

    fn try_from(items: Vec<CartItem>) -> Result<Self, Self::Error> {
        for (i, item) in items.iter().enumerate() {
            let key = item.key();
            if item.quantity == 0 || items[..i].iter().any(|earlier| earlier.matches(&key)) {
                return Err(CartError::Inconsistent {
                    product_id: item.product.id,
                });
            }
        }
        Ok(Self { items })
    }
}

impl From<Cart> for Vec<CartItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

// =============================================================================
// Pricing
// =============================================================================

/// Tax and shipping rules applied to a subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingPolicy {
    /// Fraction of the subtotal charged as tax (0.08 = 8%).
    pub tax_rate: Decimal,
    /// Flat shipping fee for orders at or under the threshold.
    pub shipping_fee: Price,
    /// Shipping is free when the subtotal is strictly above this amount.
    pub free_shipping_threshold: Price,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::new(8, 2),
            shipping_fee: Price::from_cents(999),
            free_shipping_threshold: Price::from_cents(9900),
        }
    }
}

impl PricingPolicy {
    /// Tax on `subtotal`, rounded to cents.
    #[must_use]
    pub fn tax_for(&self, subtotal: Price) -> Price {
        subtotal.apply_rate(self.tax_rate)
    }

    /// Shipping charged on `subtotal`. An empty order ships for free.
    #[must_use]
    pub fn shipping_for(&self, subtotal: Price) -> Price {
        if subtotal.is_zero() || subtotal > self.free_shipping_threshold {
            Price::ZERO
        } else {
            self.shipping_fee
        }
    }

    /// Derive every total for an order.
    #[must_use]
    pub fn summarize(&self, item_count: u64, subtotal: Price) -> OrderSummary {
        let subtotal = subtotal.round_to_cents();
        let tax = self.tax_for(subtotal);
        let shipping = self.shipping_for(subtotal);
        let free_shipping_remaining = (!shipping.is_zero())
            .then(|| self.free_shipping_threshold.checked_sub(subtotal))
            .flatten()
            .filter(|remaining| !remaining.is_negative());

        OrderSummary {
            item_count,
            subtotal,
            tax,
            shipping,
            total: subtotal + tax + shipping,
            free_shipping_remaining,
        }
    }
}

/// Derived totals for a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub item_count: u64,
    pub subtotal: Price,
    pub tax: Price,
    pub shipping: Price,
    pub total: Price,
    /// How much more to spend for free shipping, when shipping is charged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_shipping_remaining: Option<Price>,
}

impl OrderSummary {
    /// Whether shipping is waived.
    #[must_use]
    pub fn ships_free(&self) -> bool {
        self.shipping.is_zero()
    }
}

// =============================================================================
// Cart store
// =============================================================================

/// A successful cart mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    ItemAdded {
        key: LineKey,
        added: u32,
        line_quantity: u32,
    },
    QuantityChanged {
        key: LineKey,
        from: u32,
        to: u32,
    },
    ItemRemoved {
        key: LineKey,
    },
    Cleared {
        lines: usize,
    },
}

/// A [`Cart`] plus the subscribers to tell about changes.
#[derive(Debug, Default)]
pub struct CartStore {
    cart: Cart,
    listeners: Listeners<CartEvent>,
}

impl CartStore {
    /// Wrap an existing cart.
    #[must_use]
    pub fn new(cart: Cart) -> Self {
        Self {
            cart,
            listeners: Listeners::new(),
        }
    }

    /// Register a callback for every mutation.
    pub fn subscribe(
        &mut self,
        callback: impl Fn(&CartEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.listeners.subscribe(callback)
    }

    /// Remove a callback.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// See [`Cart::add`].
    ///
    /// # Errors
    ///
    /// Propagates the cart's validation errors; nothing is notified then.
    pub fn add(
        &mut self,
        product: &Product,
        color: Option<&str>,
        size: Option<&str>,
        quantity: u32,
    ) -> Result<u32, CartError> {
        let line_quantity = self.cart.add(product, color, size, quantity)?;
        self.listeners.notify(&CartEvent::ItemAdded {
            key: LineKey::new(product.id, color, size),
            added: quantity,
            line_quantity,
        });
        Ok(line_quantity)
    }

    /// See [`Cart::update_quantity`].
    pub fn update_quantity(&mut self, key: &LineKey, quantity: i64) -> QuantityUpdate {
        let outcome = self.cart.update_quantity(key, quantity);
        match outcome {
            QuantityUpdate::Updated { previous } => {
                let to = self.cart.get(key).map_or(previous, |item| item.quantity);
                self.listeners.notify(&CartEvent::QuantityChanged {
                    key: key.clone(),
                    from: previous,
                    to,
                });
            }
            QuantityUpdate::Removed { .. } => {
                self.listeners
                    .notify(&CartEvent::ItemRemoved { key: key.clone() });
            }
            QuantityUpdate::NotFound => {}
        }
        outcome
    }

    /// See [`Cart::remove_product`]. Notifies once per removed line.
    pub fn remove_product(&mut self, product_id: ProductId) -> usize {
        let removed: Vec<LineKey> = self
            .cart
            .items()
            .iter()
            .filter(|item| item.product.id == product_id)
            .map(CartItem::key)
            .collect();
        self.cart.remove_product(product_id);
        for key in &removed {
            self.listeners
                .notify(&CartEvent::ItemRemoved { key: key.clone() });
        }
        removed.len()
    }

    /// See [`Cart::clear`].
    pub fn clear(&mut self) -> usize {
        let lines = self.cart.clear();
        if lines > 0 {
            self.listeners.notify(&CartEvent::Cleared { lines });
        }
        lines
    }

    /// The wrapped cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Unwrap the cart, dropping subscribers.
    #[must_use]
    pub fn into_cart(self) -> Cart {
        self.cart
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn product(id: i64, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            description: String::new(),
            price: Price::from_cents(cents),
            original_price: None,
            discount: None,
            images: Vec::new(),
            category: "Electronics".to_string(),
            rating: 4.5,
            review_count: 10,
            colors: vec!["Black".to_string(), "Silver".to_string()],
            sizes: vec!["M".to_string(), "L".to_string()],
            in_stock: true,
            featured: false,
        }
    }

    #[test]
    fn test_repeated_adds_merge_into_one_line() {
        let mut cart = Cart::new();
        let headphones = product(1, 19_999);

        cart.add(&headphones, Some("Black"), None, 1).unwrap();
        cart.add(&headphones, Some("Black"), None, 2).unwrap();
        let quantity = cart.add(&headphones, Some(" Black "), Some(""), 1).unwrap();

        assert_eq!(quantity, 4);
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.item_count(), 4);
    }

    #[test]
    fn test_variants_are_separate_lines() {
        let mut cart = Cart::new();
        let shirt = product(2, 2_500);

        cart.add(&shirt, Some("Black"), Some("M"), 1).unwrap();
        cart.add(&shirt, Some("Black"), Some("L"), 1).unwrap();
        cart.add(&shirt, None, None, 1).unwrap();

        assert_eq!(cart.line_count(), 3);
        assert_eq!(cart.remove_product(shirt.id), 3);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_rejects_zero_and_unknown_variants() {
        let mut cart = Cart::new();
        let shirt = product(2, 2_500);

        assert_eq!(cart.add(&shirt, None, None, 0), Err(CartError::ZeroQuantity));
        assert!(matches!(
            cart.add(&shirt, Some("Plaid"), None, 1),
            Err(CartError::UnknownVariant { .. })
        ));
        assert!(matches!(
            cart.add(&shirt, None, Some("XXL"), 1),
            Err(CartError::UnknownVariant { .. })
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_overflow_is_rejected() {
        let mut cart = Cart::new();
        let shirt = product(2, 100);
        cart.add(&shirt, None, None, u32::MAX).unwrap();
        assert!(matches!(
            cart.add(&shirt, None, None, 1),
            Err(CartError::QuantityOverflow { .. })
        ));
        assert_eq!(cart.item_count(), u64::from(u32::MAX));
    }

    #[test]
    fn test_update_to_zero_or_less_removes_line() {
        let mut cart = Cart::new();
        let shirt = product(2, 2_500);
        cart.add(&shirt, Some("Black"), Some("M"), 3).unwrap();
        cart.add(&shirt, Some("Silver"), Some("M"), 1).unwrap();
        let key = LineKey::new(shirt.id, Some("Black"), Some("M"));

        assert_eq!(
            cart.update_quantity(&key, 5),
            QuantityUpdate::Updated { previous: 3 }
        );
        assert_eq!(cart.get(&key).unwrap().quantity, 5);

        assert_eq!(
            cart.update_quantity(&key, -2),
            QuantityUpdate::Removed { previous: 5 }
        );
        assert!(cart.get(&key).is_none());
        assert_eq!(cart.update_quantity(&key, 1), QuantityUpdate::NotFound);

        assert_eq!(cart.line_count(), 1);
        assert!(cart.items().iter().all(|item| item.quantity > 0));
    }

    #[test]
    fn test_fifty_dollars_times_two_ships_free() {
        let mut cart = Cart::new();
        cart.add(&product(3, 5_000), None, None, 2).unwrap();

        let summary = cart.summary(&PricingPolicy::default());
        assert_eq!(summary.subtotal, Price::from_cents(10_000));
        assert_eq!(summary.tax, Price::from_cents(800));
        assert_eq!(summary.shipping, Price::ZERO);
        assert_eq!(summary.total, Price::from_cents(10_800));
        assert!(summary.ships_free());
        assert_eq!(summary.free_shipping_remaining, None);
    }

    #[test]
    fn test_small_order_pays_shipping() {
        let mut cart = Cart::new();
        cart.add(&product(4, 4_499), None, None, 1).unwrap();

        let summary = cart.summary(&PricingPolicy::default());
        assert_eq!(summary.tax, Price::from_cents(360));
        assert_eq!(summary.shipping, Price::from_cents(999));
        assert_eq!(summary.total, Price::from_cents(4_499 + 360 + 999));
        assert_eq!(
            summary.free_shipping_remaining,
            Some(Price::from_cents(9_900 - 4_499))
        );
    }

    #[test]
    fn test_threshold_itself_still_pays_shipping() {
        let policy = PricingPolicy::default();
        assert_eq!(
            policy.shipping_for(Price::from_cents(9_900)),
            Price::from_cents(999)
        );
        assert_eq!(policy.shipping_for(Price::from_cents(9_901)), Price::ZERO);
    }

    #[test]
    fn test_empty_cart_summary_is_zero() {
        let summary = Cart::new().summary(&PricingPolicy::default());
        assert_eq!(summary.item_count, 0);
        assert_eq!(summary.total, Price::ZERO);
        assert!(summary.free_shipping_remaining.is_none());
    }

    #[test]
    fn test_deserialize_rejects_duplicate_lines() {
        let mut cart = Cart::new();
        cart.add(&product(1, 100), Some("Black"), None, 1).unwrap();
        let mut items: Vec<CartItem> = cart.clone().into();
        items.push(items[0].clone());
        let json = serde_json::to_string(&items).unwrap();

        assert!(serde_json::from_str::<Cart>(&json).is_err());

        let json = serde_json::to_string(&cart).unwrap();
        assert_eq!(serde_json::from_str::<Cart>(&json).unwrap(), cart);
    }

    #[test]
    fn test_store_notifies_successful_mutations() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let mut store = CartStore::default();
        let sink = Arc::clone(&events);
        store.subscribe(move |event| sink.lock().unwrap().push(event.clone()));

        let shirt = product(2, 2_500);
        let key = LineKey::new(shirt.id, Some("Black"), None);
        store.add(&shirt, Some("Black"), None, 2).unwrap();
        assert!(store.add(&shirt, None, None, 0).is_err());
        store.update_quantity(&key, 3);
        store.update_quantity(&LineKey::new(shirt.id, None, None), 3);
        store.remove_product(shirt.id);
        assert_eq!(store.clear(), 0);

        let events = events.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                CartEvent::ItemAdded {
                    key: key.clone(),
                    added: 2,
                    line_quantity: 2,
                },
                CartEvent::QuantityChanged {
                    key: key.clone(),
                    from: 2,
                    to: 3,
                },
                CartEvent::ItemRemoved { key },
            ]
        );
    }
}
