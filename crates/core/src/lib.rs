//! Grocery Core - Shared types library.
//!
//! This crate provides the domain types used across the grocery list workspace:
//! - `web` - The server-rendered grocery list site
//! - `cli` - Command-line tools for migrations and user management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP. The optional `postgres` feature adds sqlx encode/decode
//! implementations so the types can be bound and fetched directly.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, usernames, prices, and item categories

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
