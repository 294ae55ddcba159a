//! Mock authentication.
//!
//! There is no identity provider behind the storefront: sign-in is a linear
//! lookup in a fixed [`CredentialTable`], and registration fabricates a
//! profile without persisting it. [`AuthStore`] holds the visitor's
//! [`AuthState`] and tells subscribers about every transition.
//!
//! ```text
//! Anonymous --sign_in/restore--> Authenticated --sign_out--> Anonymous
//! ```

use std::collections::BTreeMap;

use secrecy::{ExposeSecret, SecretString};

use crate::account::{PLACEHOLDER_AVATAR, User};
use crate::store::{Listeners, SubscriptionId};
use crate::types::{Email, UserId};

/// Shortest accepted display name, after trimming.
pub const MIN_NAME_LENGTH: usize = 2;

/// Shortest accepted password.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// A profile and the password that unlocks it.
struct MockAccount {
    user: User,
    password: SecretString,
}

/// The fixed table of accounts that can sign in.
#[derive(Default)]
pub struct CredentialTable {
    accounts: Vec<MockAccount>,
}

impl CredentialTable {
    /// The two demo accounts:
    ///
    /// - `john@example.com` / `password123` (John Doe)
    /// - `admin@example.com` / `admin123` (Admin User, admin)
    #[must_use]
    pub fn demo() -> Self {
        Self::default()
            .with_account(1, "John Doe", "john@example.com", "password123", false)
            .with_account(2, "Admin User", "admin@example.com", "admin123", true)
    }

    fn with_account(
        mut self,
        id: i64,
        name: &str,
        email: &str,
        password: &str,
        is_admin: bool,
    ) -> Self {
        if let Ok(email) = Email::parse(email) {
            self.accounts.push(MockAccount {
                user: User {
                    id: UserId::new(id),
                    name: name.to_owned(),
                    email,
                    avatar: Some(PLACEHOLDER_AVATAR.to_owned()),
                    addresses: Vec::new(),
                    is_admin,
                },
                password: SecretString::from(password),
            });
        }
        self
    }

    /// Find the profile matching both `email` and `password`.
    ///
    /// The returned profile never carries the password. Email comparison is
    /// exact after trimming.
    #[must_use]
    pub fn authenticate(&self, email: &str, password: &str) -> Option<User> {
        let email = email.trim();
        self.accounts
            .iter()
            .find(|account| {
                account.user.email.as_str() == email && account.password.expose_secret() == password
            })
            .map(|account| account.user.clone())
    }

    /// Whether an account with this email exists.
    #[must_use]
    pub fn contains(&self, email: &Email) -> bool {
        self.accounts.iter().any(|account| &account.user.email == email)
    }

    /// Number of accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl core::fmt::Debug for CredentialTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CredentialTable")
            .field("accounts", &self.accounts.len())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Registration
// =============================================================================

/// Fields of the registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RegistrationField {
    Name,
    Email,
    Password,
    ConfirmPassword,
    AgreeToTerms,
}

impl RegistrationField {
    /// Form field name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Password => "password",
            Self::ConfirmPassword => "confirm_password",
            Self::AgreeToTerms => "agree_to_terms",
        }
    }
}

/// Per-field validation messages; at most one per field.
#[derive(thiserror::Error, Debug, Clone, Default, PartialEq, Eq)]
#[error("registration form has {} invalid field(s)", .0.len())]
pub struct RegistrationErrors(BTreeMap<RegistrationField, String>);

impl RegistrationErrors {
    fn insert(&mut self, field: RegistrationField, message: &str) {
        self.0.entry(field).or_insert_with(|| message.to_owned());
    }

    /// Message for `field`, if it failed.
    #[must_use]
    pub fn get(&self, field: RegistrationField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// All failures in field order.
    pub fn iter(&self) -> impl Iterator<Item = (RegistrationField, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    /// Number of failing fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether every field passed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Raw registration input, as submitted.
#[derive(Clone)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
    pub agree_to_terms: bool,
}

/// Registration input that passed validation.
#[derive(Debug)]
pub struct Registration {
    pub name: String,
    pub email: Email,
    pub password: SecretString,
}

impl RegistrationForm {
    /// Check every field, reporting all failures together.
    ///
    /// # Errors
    ///
    /// Returns the per-field messages when any field is invalid.
    pub fn validate(&self) -> Result<Registration, RegistrationErrors> {
        let mut errors = RegistrationErrors::default();

        let name = self.name.trim();
        if name.is_empty() {
            errors.insert(RegistrationField::Name, "Name is required");
        } else if name.chars().count() < MIN_NAME_LENGTH {
            errors.insert(RegistrationField::Name, "Name must be at least 2 characters");
        }

        let email = if self.email.trim().is_empty() {
            errors.insert(RegistrationField::Email, "Email is required");
            None
        } else {
            Email::parse(&self.email)
                .inspect_err(|_| {
                    errors.insert(RegistrationField::Email, "Please enter a valid email");
                })
                .ok()
        };

        let password = self.password.expose_secret();
        if password.is_empty() {
            errors.insert(RegistrationField::Password, "Password is required");
        } else if password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.insert(
                RegistrationField::Password,
                "Password must be at least 6 characters",
            );
        } else if !is_mixed_password(password) {
            errors.insert(
                RegistrationField::Password,
                "Password must contain at least one uppercase letter, one lowercase letter, and one number",
            );
        }

        let confirm = self.confirm_password.expose_secret();
        if confirm.is_empty() {
            errors.insert(
                RegistrationField::ConfirmPassword,
                "Please confirm your password",
            );
        } else if confirm != password {
            errors.insert(RegistrationField::ConfirmPassword, "Passwords do not match");
        }

        if !self.agree_to_terms {
            errors.insert(
                RegistrationField::AgreeToTerms,
                "You must agree to the terms and conditions",
            );
        }

        match email {
            Some(email) if errors.is_empty() => Ok(Registration {
                name: name.to_owned(),
                email,
                password: self.password.clone(),
            }),
            _ => Err(errors),
        }
    }
}

impl core::fmt::Debug for RegistrationForm {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("agree_to_terms", &self.agree_to_terms)
            .finish_non_exhaustive()
    }
}

fn is_mixed_password(password: &str) -> bool {
    password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

// =============================================================================
// Auth store
// =============================================================================

/// Whether the visitor is signed in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthState {
    #[default]
    Anonymous,
    Authenticated(User),
}

/// A transition of [`AuthState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    /// Credentials were accepted or a registration succeeded.
    SignedIn(User),
    /// A profile was restored from the session without re-validation.
    Restored(User),
    /// The visitor signed out.
    SignedOut(User),
}

/// Holds the current visitor's [`AuthState`] and notifies subscribers.
#[derive(Debug, Default)]
pub struct AuthStore {
    state: AuthState,
    listeners: Listeners<AuthEvent>,
}

impl AuthStore {
    /// An anonymous store with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for every state transition.
    pub fn subscribe(
        &mut self,
        callback: impl Fn(&AuthEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.listeners.subscribe(callback)
    }

    /// Remove a callback.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Adopt a profile restored from the session.
    ///
    /// Trust-on-read: the profile is not checked against the credential
    /// table.
    pub fn restore(&mut self, user: User) {
        self.state = AuthState::Authenticated(user.clone());
        self.listeners.notify(&AuthEvent::Restored(user));
    }

    /// Become authenticated as `user`.
    pub fn sign_in(&mut self, user: User) {
        self.state = AuthState::Authenticated(user.clone());
        self.listeners.notify(&AuthEvent::SignedIn(user));
    }

    /// Become anonymous, returning the profile that was signed in.
    ///
    /// Signing out while anonymous is a no-op and notifies nobody.
    pub fn sign_out(&mut self) -> Option<User> {
        match std::mem::take(&mut self.state) {
            AuthState::Anonymous => None,
            AuthState::Authenticated(user) => {
                self.listeners.notify(&AuthEvent::SignedOut(user.clone()));
                Some(user)
            }
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &AuthState {
        &self.state
    }

    /// The signed-in profile, if any.
    #[must_use]
    pub const fn current_user(&self) -> Option<&User> {
        match &self.state {
            AuthState::Anonymous => None,
            AuthState::Authenticated(user) => Some(user),
        }
    }

    /// Whether someone is signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self.state, AuthState::Authenticated(_))
    }

    /// Whether the signed-in profile is an admin.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.current_user().is_some_and(|user| user.is_admin)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn form(
        name: &str,
        email: &str,
        password: &str,
        confirm: &str,
        agree: bool,
    ) -> RegistrationForm {
        RegistrationForm {
            name: name.to_string(),
            email: email.to_string(),
            password: SecretString::from(password),
            confirm_password: SecretString::from(confirm),
            agree_to_terms: agree,
        }
    }

    #[test]
    fn test_demo_accounts_sign_in() {
        let table = CredentialTable::demo();

        let john = table.authenticate("john@example.com", "password123").unwrap();
        assert_eq!(john.name, "John Doe");
        assert!(!john.is_admin);

        let admin = table.authenticate(" admin@example.com ", "admin123").unwrap();
        assert_eq!(admin.name, "Admin User");
        assert!(admin.is_admin);

        for user in [&john, &admin] {
            assert_eq!(user.avatar.as_deref(), Some(PLACEHOLDER_AVATAR));
        }
    }

    #[test]
    fn test_wrong_password_fails() {
        let table = CredentialTable::demo();
        assert!(table.authenticate("john@example.com", "password124").is_none());
        assert!(table.authenticate("john@example.com", "admin123").is_none());
        assert!(table.authenticate("nobody@example.com", "password123").is_none());
    }

    #[test]
    fn test_contains() {
        let table = CredentialTable::demo();
        assert_eq!(table.len(), 2);
        assert!(table.contains(&Email::parse("admin@example.com").unwrap()));
        assert!(!table.contains(&Email::parse("jane@example.com").unwrap()));
    }

    #[test]
    fn test_valid_registration() {
        let registration = form(" Jane Roe ", "jane@example.com", "Secret1", "Secret1", true)
            .validate()
            .unwrap();
        assert_eq!(registration.name, "Jane Roe");
        assert_eq!(registration.email.as_str(), "jane@example.com");
    }

    #[test]
    fn test_registration_reports_every_field() {
        let errors = form(" ", "not-an-email", "short", "other", false)
            .validate()
            .unwrap_err();

        assert_eq!(errors.len(), 5);
        assert_eq!(errors.get(RegistrationField::Name), Some("Name is required"));
        assert_eq!(
            errors.get(RegistrationField::Email),
            Some("Please enter a valid email")
        );
        assert_eq!(
            errors.get(RegistrationField::Password),
            Some("Password must be at least 6 characters")
        );
        assert_eq!(
            errors.get(RegistrationField::ConfirmPassword),
            Some("Passwords do not match")
        );
        assert!(errors.get(RegistrationField::AgreeToTerms).is_some());
    }

    #[test]
    fn test_registration_password_rules() {
        let errors = form("Jane", "jane@example.com", "alllowercase1", "alllowercase1", true)
            .validate()
            .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(
            errors
                .get(RegistrationField::Password)
                .unwrap()
                .contains("uppercase")
        );

        let errors = form("J", "", "", "", true).validate().unwrap_err();
        assert_eq!(
            errors.get(RegistrationField::Name),
            Some("Name must be at least 2 characters")
        );
        assert_eq!(errors.get(RegistrationField::Email), Some("Email is required"));
        assert_eq!(
            errors.get(RegistrationField::Password),
            Some("Password is required")
        );
        assert_eq!(
            errors.get(RegistrationField::ConfirmPassword),
            Some("Please confirm your password")
        );
    }

    #[test]
    fn test_store_transitions_notify_subscribers() {
        let table = CredentialTable::demo();
        let events = Arc::new(Mutex::new(Vec::new()));
        let mut store = AuthStore::new();
        let sink = Arc::clone(&events);
        store.subscribe(move |event| {
            sink.lock().unwrap().push(event.clone());
        });

        assert_eq!(store.sign_out(), None);
        assert!(events.lock().unwrap().is_empty());

        let john = table.authenticate("john@example.com", "password123").unwrap();
        store.sign_in(john.clone());
        assert!(store.is_authenticated());
        assert!(!store.is_admin());
        assert_eq!(store.current_user(), Some(&john));

        assert_eq!(store.sign_out(), Some(john.clone()));
        assert_eq!(store.state(), &AuthState::Anonymous);

        let events = events.lock().unwrap();
        assert_eq!(
            *events,
            vec![AuthEvent::SignedIn(john.clone()), AuthEvent::SignedOut(john)]
        );
    }

    #[test]
    fn test_restore_trusts_profile() {
        let mut store = AuthStore::new();
        let admin = CredentialTable::demo()
            .authenticate("admin@example.com", "admin123")
            .unwrap();
        store.restore(admin);
        assert!(store.is_admin());
    }
}
