//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Mock sign-in and registration with simulated latency
//! - `cart` - Loading and saving the session cart
//! - `session` - Typed session reads and one-shot flash messages

pub mod auth;
pub mod cart;
pub mod session;

pub use auth::{AuthError, AuthService};
