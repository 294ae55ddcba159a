//! Authentication route handlers.
//!
//! Sign-in and registration go through `AuthService`, which applies the
//! simulated latency. Outcomes are reported as flash messages; failed
//! attempts re-render the form with the submitted values.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use elite_store_core::{RegistrationErrors, RegistrationField, RegistrationForm};
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::{OptionalAuth, PageContext, clear_current_user, load_auth, set_current_user};
use crate::models::Flash;
use crate::routes::safe_return_to;
use crate::services::AuthError;
use crate::services::session::push_flash;
use crate::state::AppState;

// =============================================================================
// Forms
// =============================================================================

/// Query parameters of the login page.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub return_to: Option<String>,
}

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub return_to: Option<String>,
}

/// Registration form data.
#[derive(Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
    /// Checkbox: present (any value) when ticked.
    #[serde(default)]
    pub agree_to_terms: Option<String>,
}

impl RegisterForm {
    fn into_registration(self) -> RegistrationForm {
        RegistrationForm {
            name: self.name,
            email: self.email,
            password: SecretString::from(self.password),
            confirm_password: SecretString::from(self.confirm_password),
            agree_to_terms: self.agree_to_terms.is_some(),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub page: PageContext,
    pub email: String,
    pub return_to: Option<String>,
}

/// Per-field registration messages for the template.
#[derive(Clone, Default)]
pub struct RegisterFieldErrors {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
    pub agree_to_terms: Option<String>,
}

impl From<&RegistrationErrors> for RegisterFieldErrors {
    fn from(errors: &RegistrationErrors) -> Self {
        let get = |field| errors.get(field).map(String::from);
        Self {
            name: get(RegistrationField::Name),
            email: get(RegistrationField::Email),
            password: get(RegistrationField::Password),
            confirm_password: get(RegistrationField::ConfirmPassword),
            agree_to_terms: get(RegistrationField::AgreeToTerms),
        }
    }
}

/// Registration page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub page: PageContext,
    pub name: String,
    pub email: String,
    pub agree_to_terms: bool,
    pub errors: RegisterFieldErrors,
}

// =============================================================================
// Route Handlers
// =============================================================================

/// Display the login page.
#[instrument(skip(page, auth))]
pub async fn login_page(
    page: PageContext,
    OptionalAuth(auth): OptionalAuth,
    Query(query): Query<LoginQuery>,
) -> Response {
    if auth.is_some() {
        return Redirect::to("/account").into_response();
    }

    LoginTemplate {
        page,
        email: String::new(),
        return_to: query.return_to,
    }
    .into_response()
}

/// Handle login form submission.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    mut page: PageContext,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let password = SecretString::from(form.password);
    let mut auth = load_auth(&session).await?;

    match state.auth().login(&form.email, &password).await {
        Ok(user) => {
            set_current_user(&session, &user).await?;
            push_flash(
                &session,
                Flash::success(
                    "Welcome back!",
                    format!("Successfully logged in as {}", user.name),
                ),
            )
            .await?;
            auth.sign_in(user);

            let target = safe_return_to(form.return_to.as_deref(), "/");
            Ok(Redirect::to(target).into_response())
        }
        Err(err @ AuthError::InvalidCredentials) => {
            tracing::info!("Login rejected");
            page.flash = Some(Flash::error("Login failed", err.public_message()));
            let template = LoginTemplate {
                page,
                email: form.email,
                return_to: form.return_to,
            };
            Ok((StatusCode::UNAUTHORIZED, template).into_response())
        }
        Err(err) => Err(err.into()),
    }
}

/// Display the registration page.
#[instrument(skip(page, auth))]
pub async fn register_page(page: PageContext, OptionalAuth(auth): OptionalAuth) -> Response {
    if auth.is_some() {
        return Redirect::to("/account").into_response();
    }

    RegisterTemplate {
        page,
        name: String::new(),
        email: String::new(),
        agree_to_terms: false,
        errors: RegisterFieldErrors::default(),
    }
    .into_response()
}

/// Handle registration form submission.
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    mut page: PageContext,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    let name = form.name.clone();
    let email = form.email.clone();
    let agree_to_terms = form.agree_to_terms.is_some();
    let registration = form.into_registration();

    let mut auth = load_auth(&session).await?;

    let (status, errors) = match state.auth().register(&registration).await {
        Ok(user) => {
            set_current_user(&session, &user).await?;
            push_flash(
                &session,
                Flash::success(
                    "Welcome!",
                    format!("Account created successfully for {}", user.name),
                ),
            )
            .await?;
            auth.sign_in(user);

            return Ok(Redirect::to("/").into_response());
        }
        Err(AuthError::Validation(errors)) => {
            tracing::info!(invalid_fields = errors.len(), "Registration form rejected");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                RegisterFieldErrors::from(&errors),
            )
        }
        Err(err @ AuthError::UserAlreadyExists) => {
            tracing::info!("Registration rejected: email taken");
            page.flash = Some(Flash::error("Registration failed", err.public_message()));
            (StatusCode::CONFLICT, RegisterFieldErrors::default())
        }
        Err(err) => return Err(err.into()),
    };

    let template = RegisterTemplate {
        page,
        name,
        email,
        agree_to_terms,
        errors,
    };
    Ok((status, template).into_response())
}

/// Handle logout.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Response> {
    let mut auth = load_auth(&session).await?;
    auth.sign_out();
    clear_current_user(&session).await?;

    push_flash(
        &session,
        Flash::success("Logged out", "You have been successfully logged out"),
    )
    .await?;

    Ok(Redirect::to("/").into_response())
}
