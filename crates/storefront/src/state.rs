//! Application state shared across handlers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use elite_store_core::{Catalog, CatalogError, CredentialTable};

use crate::config::StorefrontConfig;
use crate::services::AuthService;

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to read catalog {path}: {source}")]
    ReadCatalog {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and immutable after startup;
/// everything that changes per visitor lives in the session.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    auth: AuthService,
}

impl AppState {
    /// Create a new application state, loading the configured catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog file cannot be read or fails
    /// validation.
    pub fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        let catalog = match &config.catalog_path {
            Some(path) => load_catalog(path)?,
            None => Catalog::bundled()?,
        };
        Ok(Self::with_catalog(config, catalog))
    }

    /// Create a new application state around an already loaded catalog.
    #[must_use]
    pub fn with_catalog(config: StorefrontConfig, catalog: Catalog) -> Self {
        let auth = AuthService::new(CredentialTable::demo(), config.auth_latency);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                auth,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the authentication service.
    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }
}

fn load_catalog(path: &Path) -> Result<Catalog, StateError> {
    let json = std::fs::read_to_string(path).map_err(|source| StateError::ReadCatalog {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog = Catalog::from_json(&json)?;
    tracing::info!(path = %path.display(), products = catalog.len(), "Loaded catalog");
    Ok(catalog)
}
