//! Data Transfer Objects for the HTTP API.
//!
//! These DTOs are used for request/response serialization in the REST API.
//! Entity responses reuse the domain models directly since they already
//! derive Serialize/Deserialize.
//!
//! Request bodies keep every field optional so that a missing or empty
//! field reaches the validation rules instead of being rejected during
//! deserialization; the rules own the client-facing messages.

use serde::{Deserialize, Serialize};

// Re-export existing models that are already serializable
pub use crate::models::{Task, User};

/// Request body for creating a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    /// Name for the user
    #[serde(default)]
    pub name: Option<String>,
    /// Email for the user (optional unless the email policy is enabled)
    #[serde(default)]
    pub email: Option<String>,
}

/// Request body for replacing a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    /// Replacement name for the user
    #[serde(default)]
    pub name: Option<String>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Backing store status
    pub database: String,
}
