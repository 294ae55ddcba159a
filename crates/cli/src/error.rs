//! CLI error type.

use std::path::PathBuf;

use elite_store_core::{CartError, CatalogError, ProductId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid JSON catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML catalog: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("catalog has {0} problem(s)")]
    InvalidCatalog(usize),

    #[error("unknown sort key {0:?} (expected one of: {1})")]
    UnknownSort(String, String),

    #[error("invalid item {0:?} (expected ID:QTY)")]
    InvalidItem(String),

    #[error("unknown product {0}")]
    UnknownProduct(ProductId),

    #[error("product {0} is out of stock")]
    OutOfStock(ProductId),

    #[error(transparent)]
    Cart(#[from] CartError),
}
