//! JSON API handlers.
//!
//! Read-only views over the same state the HTML pages render.

pub mod cart;
pub mod placeholder;
pub mod products;
