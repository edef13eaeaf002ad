//! Business logic services for the grocery site.
//!
//! # Services
//!
//! - `auth` - Account registration and password login

pub mod auth;
