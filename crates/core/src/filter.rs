//! The product filter/sort pipeline.
//!
//! A [`ProductFilter`] is a plain value describing what the visitor asked
//! for. [`ProductFilter::apply`] is a pure function from that value and a
//! product slice to an ordered list of matches; it has no side effects and is
//! recomputed on every request.
//!
//! Each predicate is exposed on its own so callers (and tests) can compose
//! them in any order; they commute because each looks at a single product.

use std::collections::BTreeSet;

use rust_decimal::Decimal;

use crate::catalog::Product;
use crate::types::Price;

/// Upper bound of the default price range, in dollars.
pub const DEFAULT_MAX_PRICE: i64 = 500;

/// How to order filtered products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    /// Featured products first, otherwise catalog order.
    #[default]
    Featured,
    /// Highest id first.
    Newest,
    /// Cheapest first.
    PriceLowHigh,
    /// Most expensive first.
    PriceHighLow,
    /// Best rated first.
    Rating,
}

impl SortKey {
    /// Every sort key, in the order offered to visitors.
    pub const ALL: [Self; 5] = [
        Self::Featured,
        Self::Newest,
        Self::PriceLowHigh,
        Self::PriceHighLow,
        Self::Rating,
    ];

    /// The wire name used in query strings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::Newest => "newest",
            Self::PriceLowHigh => "price-low",
            Self::PriceHighLow => "price-high",
            Self::Rating => "rating",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Featured => "Featured",
            Self::Newest => "Newest",
            Self::PriceLowHigh => "Price: Low to High",
            Self::PriceHighLow => "Price: High to Low",
            Self::Rating => "Highest Rated",
        }
    }

    /// Parse a wire name. Unknown names yield `None`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == s.trim())
    }

    /// Parse a wire name, falling back to [`SortKey::Featured`].
    #[must_use]
    pub fn parse_or_default(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }
}

/// Inclusive price bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    pub min: Price,
    pub max: Price,
}

impl PriceRange {
    /// Build a range, swapping the bounds if given in the wrong order.
    #[must_use]
    pub fn new(min: Price, max: Price) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// The default range `[0, max]`.
    #[must_use]
    pub fn up_to(max: Price) -> Self {
        Self::new(Price::ZERO, max)
    }

    /// Whether `price` lies inside the range (bounds included).
    #[must_use]
    pub fn contains(&self, price: Price) -> bool {
        self.min <= price && price <= self.max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self::up_to(Price::new(Decimal::from(DEFAULT_MAX_PRICE)))
    }
}

/// What a visitor asked the listing to show.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductFilter {
    /// Free-text search; blank matches everything.
    pub search: String,
    /// Selected categories; empty matches everything.
    pub categories: BTreeSet<String>,
    pub price_range: PriceRange,
    /// Restrict to featured products.
    pub featured_only: bool,
    pub sort: SortKey,
}

impl ProductFilter {
    /// Whether the product passes the search predicate.
    ///
    /// Case-insensitive substring match on name, description or category.
    #[must_use]
    pub fn matches_search(&self, product: &Product) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        [&product.name, &product.description, &product.category]
            .into_iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    /// Whether the product passes the category predicate.
    #[must_use]
    pub fn matches_category(&self, product: &Product) -> bool {
        self.categories.is_empty() || self.categories.contains(&product.category)
    }

    /// Whether the product passes the price predicate.
    #[must_use]
    pub fn matches_price(&self, product: &Product) -> bool {
        self.price_range.contains(product.price)
    }

    /// Whether the product passes the featured predicate.
    #[must_use]
    pub const fn matches_featured(&self, product: &Product) -> bool {
        !self.featured_only || product.featured
    }

    /// Whether the product passes every predicate.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        self.matches_search(product)
            && self.matches_category(product)
            && self.matches_price(product)
            && self.matches_featured(product)
    }

    /// Filter and sort `products`.
    ///
    /// Sorting is stable: products that compare equal under the chosen key
    /// keep their input order.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        let mut matched: Vec<&Product> = products.iter().filter(|p| self.matches(p)).collect();
        sort_products(&mut matched, self.sort);
        matched
    }
}

/// Stable in-place sort by `key`.
pub fn sort_products(products: &mut [&Product], key: SortKey) {
    match key {
        SortKey::Featured => products.sort_by_key(|p| !p.featured),
        SortKey::Newest => products.sort_by(|a, b| b.id.cmp(&a.id)),
        SortKey::PriceLowHigh => products.sort_by(|a, b| a.price.cmp(&b.price)),
        SortKey::PriceHighLow => products.sort_by(|a, b| b.price.cmp(&a.price)),
        SortKey::Rating => products.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
    }
}
