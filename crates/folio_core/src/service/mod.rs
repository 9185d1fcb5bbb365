//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate storage adapter calls into presentation-facing operations.
//! - Keep callers decoupled from SQLite details.

pub mod blog_page;
pub mod clock;
pub mod content_service;
pub mod query;
