//! Account route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use elite_store_core::User;
use tracing::instrument;

use crate::filters;
use crate::middleware::{PageContext, RequireAuth};

/// Saved address display data for templates.
#[derive(Clone)]
pub struct AddressView {
    pub label: &'static str,
    pub line: String,
    pub is_default: bool,
}

/// Account page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/index.html")]
pub struct AccountTemplate {
    pub page: PageContext,
    pub user: User,
    pub initials: String,
    pub addresses: Vec<AddressView>,
}

/// Display the account overview.
#[instrument(skip(page, user), fields(user_id = %user.id))]
pub async fn index(RequireAuth(user): RequireAuth, page: PageContext) -> impl IntoResponse {
    let addresses = user
        .addresses
        .iter()
        .map(|address| AddressView {
            label: address.kind.label(),
            line: address.one_line(),
            is_default: address.is_default,
        })
        .collect();

    AccountTemplate {
        page,
        initials: user.initials(),
        addresses,
        user,
    }
}
