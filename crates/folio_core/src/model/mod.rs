//! Domain model for blog content.
//!
//! # Responsibility
//! - Define the canonical post and category records used by the content
//!   service and its storage adapters.
//! - Own the `YYYY-MM-DD` post date boundary format.
//!
//! # Invariants
//! - Every post and category is identified by a store-assigned integer id.
//! - A post references at most one category; the reference may dangle.

pub mod category;
pub mod post;
