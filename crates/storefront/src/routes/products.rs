//! Product route handlers.
//!
//! The listing is driven entirely by query parameters so every filtered view
//! has a shareable URL:
//!
//! - `search` - free text matched against name, description and category
//! - `category` - repeated (`category=A&category=B`) or comma-separated
//! - `sort` - `featured`, `newest`, `price-low`, `price-high`, `rating`
//! - `min_price`, `max_price` - inclusive dollar bounds
//! - `featured` - `true`, `1` or `on`
//!
//! Values that don't parse fall back to "no filter" rather than an error.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, RawQuery, State},
    response::IntoResponse,
};
use elite_store_core::{Catalog, Price, PriceRange, Product, ProductFilter, ProductId, SortKey};
use rust_decimal::Decimal;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::PageContext;
use crate::state::AppState;

/// How many related products the detail page shows.
const RELATED_LIMIT: usize = 4;

// =============================================================================
// View Types
// =============================================================================

/// Product card display data for templates.
#[derive(Clone)]
pub struct ProductCard {
    pub id: ProductId,
    pub name: String,
    pub href: String,
    pub category: String,
    pub price: String,
    pub original_price: Option<String>,
    pub discount_percentage: Option<u32>,
    pub image: Option<String>,
    pub rating: f32,
    pub review_count: u32,
    pub in_stock: bool,
    pub featured: bool,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            href: format!("/products/{}", product.id),
            category: product.category.clone(),
            price: product.price.to_string(),
            original_price: product.original_price.map(|p| p.to_string()),
            discount_percentage: product.discount_percentage(),
            image: product.primary_image().map(String::from),
            rating: product.rating,
            review_count: product.review_count,
            in_stock: product.in_stock,
            featured: product.featured,
        }
    }
}

/// Category checkbox in the filter sidebar.
#[derive(Clone)]
pub struct CategoryFacet {
    pub name: String,
    pub count: usize,
    pub selected: bool,
}

/// Entry of the sort dropdown.
#[derive(Clone)]
pub struct SortOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// A removable chip describing one active filter.
#[derive(Clone)]
pub struct ActiveFilter {
    pub label: String,
    /// Listing link with this filter removed.
    pub remove_href: String,
}

// =============================================================================
// Query Parsing
// =============================================================================

/// Build a [`ProductFilter`] from a raw listing query string.
///
/// Unknown categories are dropped. Malformed prices and sort keys fall back
/// to their defaults. The default price range is `[0, price_max]`.
#[must_use]
pub fn filter_from_query(raw: Option<&str>, catalog: &Catalog, price_max: Price) -> ProductFilter {
    let mut filter = ProductFilter {
        price_range: PriceRange::up_to(price_max),
        ..ProductFilter::default()
    };
    let mut min_price = None;
    let mut max_price = None;

    let pairs = url::form_urlencoded::parse(raw.unwrap_or_default().as_bytes());
    for (key, value) in pairs {
        let value = value.trim();
        match key.as_ref() {
            "search" => value.clone_into(&mut filter.search),
            "category" => {
                for name in value.split(',').map(str::trim) {
                    if catalog.categories().iter().any(|c| c.name == name) {
                        filter.categories.insert(name.to_owned());
                    }
                }
            }
            "sort" => filter.sort = SortKey::parse_or_default(value),
            "min_price" => min_price = parse_price(value),
            "max_price" => max_price = parse_price(value),
            "featured" => filter.featured_only = matches!(value, "true" | "1" | "on"),
            _ => {}
        }
    }

    filter.price_range = PriceRange::new(
        min_price.unwrap_or(filter.price_range.min),
        max_price.unwrap_or(filter.price_range.max),
    );
    filter
}

/// Parse a non-negative dollar amount.
fn parse_price(value: &str) -> Option<Price> {
    value
        .parse::<Decimal>()
        .ok()
        .filter(|amount| !amount.is_sign_negative())
        .map(Price::new)
}

/// Encode a filter back into a listing query string (without the `?`).
///
/// Only non-default values are written, so the unfiltered listing encodes
/// as an empty string.
#[must_use]
pub fn query_from_filter(filter: &ProductFilter, price_max: Price) -> String {
    let mut params: Vec<(&str, String)> = Vec::new();

    let search = filter.search.trim();
    if !search.is_empty() {
        params.push(("search", search.to_owned()));
    }
    for category in &filter.categories {
        params.push(("category", category.clone()));
    }
    if filter.sort != SortKey::default() {
        params.push(("sort", filter.sort.as_str().to_owned()));
    }
    if !filter.price_range.min.is_zero() {
        params.push(("min_price", format_bound(filter.price_range.min)));
    }
    if filter.price_range.max != price_max {
        params.push(("max_price", format_bound(filter.price_range.max)));
    }
    if filter.featured_only {
        params.push(("featured", "true".to_owned()));
    }

    params
        .iter()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn format_bound(price: Price) -> String {
    price.amount().normalize().to_string()
}

fn listing_href(filter: &ProductFilter, price_max: Price) -> String {
    let query = query_from_filter(filter, price_max);
    if query.is_empty() {
        "/products".to_owned()
    } else {
        format!("/products?{query}")
    }
}

/// One chip per active filter, each linking to the listing without it.
fn active_filters(filter: &ProductFilter, price_max: Price) -> Vec<ActiveFilter> {
    let mut chips = Vec::new();

    if !filter.search.trim().is_empty() {
        let mut without = filter.clone();
        without.search.clear();
        chips.push(ActiveFilter {
            label: format!("Search: {}", filter.search.trim()),
            remove_href: listing_href(&without, price_max),
        });
    }

    for category in &filter.categories {
        let mut without = filter.clone();
        without.categories.remove(category);
        chips.push(ActiveFilter {
            label: category.clone(),
            remove_href: listing_href(&without, price_max),
        });
    }

    if filter.price_range != PriceRange::up_to(price_max) {
        let mut without = filter.clone();
        without.price_range = PriceRange::up_to(price_max);
        chips.push(ActiveFilter {
            label: format!("{} - {}", filter.price_range.min, filter.price_range.max),
            remove_href: listing_href(&without, price_max),
        });
    }

    if filter.featured_only {
        let mut without = filter.clone();
        without.featured_only = false;
        chips.push(ActiveFilter {
            label: "Featured".to_owned(),
            remove_href: listing_href(&without, price_max),
        });
    }

    chips
}

// =============================================================================
// Handlers
// =============================================================================

/// Products listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub page: PageContext,
    pub products: Vec<ProductCard>,
    pub total: usize,
    pub search: String,
    pub categories: Vec<CategoryFacet>,
    pub sort_options: Vec<SortOption>,
    pub min_price: String,
    pub max_price: String,
    pub featured_only: bool,
    pub active_filters: Vec<ActiveFilter>,
    /// This listing's own URL, so "add to cart" comes back here.
    pub return_to: String,
}

/// Display product listing with filters.
#[instrument(skip(state, page))]
pub async fn index(
    State(state): State<AppState>,
    page: PageContext,
    RawQuery(query): RawQuery,
) -> impl IntoResponse {
    let catalog = state.catalog();
    let price_max = state.config().price_filter_max;
    let filter = filter_from_query(query.as_deref(), catalog, price_max);
    let matched = filter.apply(catalog.products());

    tracing::debug!(
        matched = matched.len(),
        total = catalog.len(),
        sort = filter.sort.as_str(),
        "Product listing"
    );

    let categories = catalog
        .category_counts()
        .into_iter()
        .map(|entry| CategoryFacet {
            name: entry.category.name.clone(),
            count: entry.count,
            selected: filter.categories.contains(&entry.category.name),
        })
        .collect();

    let sort_options = SortKey::ALL
        .into_iter()
        .map(|key| SortOption {
            value: key.as_str(),
            label: key.label(),
            selected: key == filter.sort,
        })
        .collect();

    ProductsIndexTemplate {
        page,
        products: matched.into_iter().map(ProductCard::from).collect(),
        total: catalog.len(),
        search: filter.search.clone(),
        categories,
        sort_options,
        min_price: format_bound(filter.price_range.min),
        max_price: format_bound(filter.price_range.max),
        featured_only: filter.featured_only,
        active_filters: active_filters(&filter, price_max),
        return_to: listing_href(&filter, price_max),
    }
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub page: PageContext,
    pub product: ProductCard,
    pub description: String,
    pub images: Vec<String>,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
    pub savings: Option<String>,
    pub related: Vec<ProductCard>,
}

/// Display a single product.
#[instrument(skip(state, page))]
pub async fn show(
    State(state): State<AppState>,
    page: PageContext,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let catalog = state.catalog();
    let product = id
        .parse::<ProductId>()
        .ok()
        .and_then(|id| catalog.get(id))
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let savings = product
        .original_price
        .and_then(|original| original.checked_sub(product.price))
        .filter(|saved| !saved.is_zero())
        .map(|saved| saved.to_string());

    let related = catalog
        .related(product, RELATED_LIMIT)
        .into_iter()
        .map(ProductCard::from)
        .collect();

    Ok(ProductShowTemplate {
        page,
        product: ProductCard::from(product),
        description: product.description.clone(),
        images: product.images.clone(),
        colors: product.colors.clone(),
        sizes: product.sizes.clone(),
        savings,
        related,
    })
}
