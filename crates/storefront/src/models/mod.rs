//! Domain models for storefront.
//!
//! Everything here is stored in, or derived from, the visitor's session.

pub mod session;

pub use session::{Flash, FlashKind, keys as session_keys};
