//! Product catalog: immutable reference data loaded once at startup.
//!
//! The bundled catalog is compiled into the crate from `data/catalog.json`.
//! Alternative catalogs go through the same validation before use, so every
//! `Catalog` value upholds the invariants listed on [`CatalogIssue`].

use std::collections::HashSet;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

const BUNDLED_CATALOG: &str = include_str!("../data/catalog.json");

/// Highest rating a product can carry.
pub const MAX_RATING: f32 = 5.0;

/// A product offered by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    /// Price before the current markdown, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    /// Advertised discount in percent, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<u8>,
    #[serde(default)]
    pub images: Vec<String>,
    pub category: String,
    /// Average review score, 0 to 5.
    pub rating: f32,
    pub review_count: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sizes: Vec<String>,
    pub in_stock: bool,
    #[serde(default)]
    pub featured: bool,
}

impl Product {
    /// Percentage saved against the original price, rounded to the nearest
    /// whole percent.
    ///
    /// Only reported when the product carries both an original price and a
    /// discount, and the markdown is positive.
    #[must_use]
    pub fn discount_percentage(&self) -> Option<u32> {
        let original = self.original_price?.amount();
        self.discount?;
        if original <= Decimal::ZERO {
            return None;
        }

        let saved = (original - self.price.amount()) / original * Decimal::ONE_HUNDRED;
        saved
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u32()
            .filter(|pct| *pct > 0)
    }

    /// The first image, used for cards and cart lines.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Whether `color` is one of the product's color options.
    #[must_use]
    pub fn offers_color(&self, color: &str) -> bool {
        self.colors.iter().any(|c| c == color)
    }

    /// Whether `size` is one of the product's size options.
    #[must_use]
    pub fn offers_size(&self, size: &str) -> bool {
        self.sizes.iter().any(|s| s == size)
    }
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A category together with the number of products filed under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount<'a> {
    pub category: &'a Category,
    pub count: usize,
}

/// A problem found while validating catalog data.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CatalogIssue {
    #[error("product id {0} appears more than once")]
    DuplicateId(ProductId),
    #[error("category {0:?} appears more than once")]
    DuplicateCategory(String),
    #[error("product {0} has an empty name")]
    EmptyName(ProductId),
    #[error("product {0} has a negative price")]
    NegativePrice(ProductId),
    #[error("product {id} has original price {original} below its price {price}")]
    OriginalBelowPrice {
        id: ProductId,
        original: Price,
        price: Price,
    },
    #[error("product {id} has discount {discount}% (must be 1-100)")]
    DiscountOutOfRange { id: ProductId, discount: u8 },
    #[error("product {id} has rating {rating} (must be 0-5)")]
    RatingOutOfRange { id: ProductId, rating: f32 },
    #[error("product {id} is filed under unknown category {category:?}")]
    UnknownCategory { id: ProductId, category: String },
}

/// Errors that can occur when loading a catalog.
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    /// The catalog file is not valid JSON for the catalog schema.
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    /// The catalog parsed but breaks one or more invariants.
    #[error("catalog has {} problem(s)", .0.len())]
    Invalid(Vec<CatalogIssue>),
}

/// Raw catalog contents as stored on disk, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogData {
    #[serde(default)]
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
}

impl CatalogData {
    /// Check every invariant and collect all problems found.
    ///
    /// When the category list is empty, any category label is accepted.
    #[must_use]
    pub fn validate(&self) -> Vec<CatalogIssue> {
        let mut issues = Vec::new();

        let mut category_names = HashSet::new();
        for category in &self.categories {
            if !category_names.insert(category.name.as_str()) {
                issues.push(CatalogIssue::DuplicateCategory(category.name.clone()));
            }
        }

        let mut ids = HashSet::new();
        for product in &self.products {
            let id = product.id;
            if !ids.insert(id) {
                issues.push(CatalogIssue::DuplicateId(id));
            }
            if product.name.trim().is_empty() {
                issues.push(CatalogIssue::EmptyName(id));
            }
            if product.price.is_negative() {
                issues.push(CatalogIssue::NegativePrice(id));
            }
            if let Some(original) = product.original_price
                && original < product.price
            {
                issues.push(CatalogIssue::OriginalBelowPrice {
                    id,
                    original,
                    price: product.price,
                });
            }
            if let Some(discount) = product.discount
                && !(1..=100).contains(&discount)
            {
                issues.push(CatalogIssue::DiscountOutOfRange { id, discount });
            }
            if !(0.0..=MAX_RATING).contains(&product.rating) {
                issues.push(CatalogIssue::RatingOutOfRange {
                    id,
                    rating: product.rating,
                });
            }
            if !category_names.is_empty() && !category_names.contains(product.category.as_str()) {
                issues.push(CatalogIssue::UnknownCategory {
                    id,
                    category: product.category.clone(),
                });
            }
        }

        issues
    }
}

/// A validated, read-only product catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    categories: Vec<Category>,
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog from raw data.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Invalid` with every problem found if the data
    /// breaks an invariant.
    pub fn new(data: CatalogData) -> Result<Self, CatalogError> {
        let issues = data.validate();
        if !issues.is_empty() {
            return Err(CatalogError::Invalid(issues));
        }

        Ok(Self {
            categories: data.categories,
            products: data.products,
        })
    }

    /// Parse and validate a JSON catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the data is invalid.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let data: CatalogData = serde_json::from_str(json)?;
        Self::new(data)
    }

    /// The catalog compiled into this crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled file is malformed; the crate's tests
    /// guard against that.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_CATALOG)
    }

    /// All products, in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// All categories, in catalog order.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Products flagged as featured, in catalog order.
    pub fn featured(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.featured)
    }

    /// Every category with the number of products in it.
    #[must_use]
    pub fn category_counts(&self) -> Vec<CategoryCount<'_>> {
        self.categories
            .iter()
            .map(|category| CategoryCount {
                category,
                count: self
                    .products
                    .iter()
                    .filter(|p| p.category == category.name)
                    .count(),
            })
            .collect()
    }

    /// Up to `limit` other products from the same category.
    #[must_use]
    pub fn related(&self, product: &Product, limit: usize) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.category == product.category && p.id != product.id)
            .take(limit)
            .collect()
    }
}
