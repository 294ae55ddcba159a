//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::filters;
use crate::middleware::PageContext;
use crate::routes::products::ProductCard;
use crate::state::AppState;

/// How many featured products the home page shows.
const FEATURED_LIMIT: usize = 4;

/// Category tile display data.
#[derive(Clone)]
pub struct CategoryTile {
    pub name: String,
    pub image: Option<String>,
    pub count: usize,
    /// Listing link filtered to this category.
    pub href: String,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub page: PageContext,
    pub categories: Vec<CategoryTile>,
    pub featured: Vec<ProductCard>,
    pub free_shipping_threshold: String,
}

/// Display the home page.
#[instrument(skip(state, page))]
pub async fn home(State(state): State<AppState>, page: PageContext) -> impl IntoResponse {
    let catalog = state.catalog();

    let categories = catalog
        .category_counts()
        .into_iter()
        .map(|entry| CategoryTile {
            name: entry.category.name.clone(),
            image: entry.category.image.clone(),
            count: entry.count,
            href: format!(
                "/products?category={}",
                urlencoding::encode(&entry.category.name)
            ),
        })
        .collect();

    let featured = catalog
        .featured()
        .take(FEATURED_LIMIT)
        .map(ProductCard::from)
        .collect();

    HomeTemplate {
        page,
        categories,
        featured,
        free_shipping_threshold: state.config().pricing.free_shipping_threshold.to_string(),
    }
}
