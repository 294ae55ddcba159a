//! EliteStore Core - catalog, cart and mock auth logic.
//!
//! This crate holds everything the storefront computes that does not touch
//! I/O:
//! - `storefront` - server-rendered shop built on these types
//! - `cli` - catalog validation and cart quotes from the command line
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no HTTP, no sessions,
//! no timers. Stores ([`CartStore`], [`AuthStore`]) are plain values that the
//! interaction layer loads, mutates and saves; subscribers are notified
//! synchronously after every successful mutation.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices and emails
//! - [`catalog`] - Products, categories and the bundled catalog
//! - [`filter`] - The product filter/sort pipeline
//! - [`cart`] - Cart line items, pricing policy and the cart store
//! - [`account`] - User profiles and addresses
//! - [`auth`] - Mock credential table, registration rules and the auth store
//! - [`store`] - Listener registry shared by the stores

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod account;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod filter;
pub mod store;
pub mod types;

pub use account::{Address, AddressKind, User};
pub use auth::{
    AuthEvent, AuthState, AuthStore, CredentialTable, Registration, RegistrationErrors,
    RegistrationField, RegistrationForm,
};
pub use cart::{
    Cart, CartError, CartEvent, CartItem, CartStore, LineKey, OrderSummary, PricingPolicy,
    QuantityUpdate,
};
pub use catalog::{
    Catalog, CatalogData, CatalogError, CatalogIssue, Category, CategoryCount, Product,
};
pub use filter::{PriceRange, ProductFilter, SortKey};
pub use types::*;
