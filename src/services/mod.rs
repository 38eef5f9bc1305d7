//! Service layer for request validation and creation policy.
//!
//! This module holds the business rules that run before storage is touched.
//! The database-facing operations themselves live in [`crate::db::services`];
//! what belongs here is everything a handler checks about a payload first.

pub mod validation;

pub use validation::{require_field, CreatePolicy, ValidationError};
