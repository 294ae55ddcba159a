//! Catalog validation and listing.

use std::path::Path;

use elite_store_core::{
    Catalog, CatalogData, Price, PriceRange, ProductFilter, SortKey, filter::DEFAULT_MAX_PRICE,
};
use rust_decimal::Decimal;
use tracing::{error, info};

use crate::error::CliError;

/// Filters for `catalog list`.
#[derive(Debug, Default)]
pub struct ListOptions {
    pub search: Option<String>,
    pub categories: Vec<String>,
    pub sort: String,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub featured: bool,
}

/// Read raw catalog data from a JSON or YAML file, or take the bundled
/// catalog when `path` is `None`.
///
/// Files ending in `.yaml` or `.yml` are parsed as YAML, anything else as
/// JSON.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_data(path: Option<&Path>) -> Result<CatalogData, CliError> {
    let Some(path) = path else {
        let bundled = Catalog::bundled()?;
        return Ok(CatalogData {
            categories: bundled.categories().to_vec(),
            products: bundled.products().to_vec(),
        });
    };

    let content = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    if is_yaml {
        Ok(serde_yaml::from_str(&content)?)
    } else {
        Ok(serde_json::from_str(&content)?)
    }
}

/// Load and validate a catalog.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded or is invalid.
pub fn load(path: Option<&Path>) -> Result<Catalog, CliError> {
    Ok(Catalog::new(load_data(path)?)?)
}

/// Validate a catalog, logging every problem found.
///
/// # Errors
///
/// Returns `CliError::InvalidCatalog` if any invariant is broken.
pub fn validate(path: Option<&Path>) -> Result<(), CliError> {
    let source = path.map_or_else(|| "bundled catalog".to_string(), |p| p.display().to_string());
    info!(source = %source, "Validating catalog");

    let data = load_data(path)?;
    let issues = data.validate();

    if !issues.is_empty() {
        error!("Catalog validation failed:");
        for issue in &issues {
            error!("  - {issue}");
        }
        return Err(CliError::InvalidCatalog(issues.len()));
    }

    info!(
        products = data.products.len(),
        categories = data.categories.len(),
        "Catalog is valid"
    );
    Ok(())
}

/// Turn CLI options into a [`ProductFilter`].
///
/// # Errors
///
/// Returns `CliError::UnknownSort` for an unrecognized sort key.
pub fn build_filter(options: &ListOptions) -> Result<ProductFilter, CliError> {
    let sort = SortKey::parse(&options.sort).ok_or_else(|| {
        let expected: Vec<&str> = SortKey::ALL.iter().map(|key| key.as_str()).collect();
        CliError::UnknownSort(options.sort.clone(), expected.join(", "))
    })?;

    let min = options.min_price.map_or(Price::ZERO, Price::new);
    let max = options
        .max_price
        .map_or_else(|| Price::new(Decimal::from(DEFAULT_MAX_PRICE)), Price::new);

    Ok(ProductFilter {
        search: options.search.clone().unwrap_or_default(),
        categories: options.categories.iter().cloned().collect(),
        price_range: PriceRange::new(min, max),
        featured_only: options.featured,
        sort,
    })
}

/// List products matching `options`.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded or the options are
/// invalid.
pub fn list(path: Option<&Path>, options: &ListOptions) -> Result<(), CliError> {
    let catalog = load(path)?;
    let filter = build_filter(options)?;

    for category in &filter.categories {
        if !catalog.categories().iter().any(|c| &c.name == category) {
            tracing::warn!(category = %category, "Unknown category");
        }
    }

    let products = filter.apply(catalog.products());

    for product in &products {
        let stock = if product.in_stock { "" } else { "  (out of stock)" };
        let featured = if product.featured { "*" } else { " " };
        info!(
            "{featured}{:>4}  {:>9}  {:.1}  {:<12} {}{stock}",
            product.id,
            product.price.to_string(),
            product.rating,
            product.category,
            product.name,
        );
    }

    info!(
        "Showing {} of {} products (sorted by {})",
        products.len(),
        catalog.len(),
        filter.sort.label()
    );
    Ok(())
}
