//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for domain logic. Failures surface as `ServiceError`,
//! which the error module translates into status codes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{CreateUserRequest, HealthResponse, UpdateUserRequest};
use super::state::AppState;
use crate::api::UserId;
use crate::db::repository::USER_NOT_FOUND;
use crate::db::services as db_services;
use crate::db::services::ServiceError;
use crate::models::User;
use crate::services::ValidationError;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, ServiceError>;

/// Parse a user ID from its path segment.
///
/// A non-numeric segment addresses no stored user, so it reports the same
/// way as an unknown ID.
fn parse_user_id(raw: &str) -> Result<UserId, ServiceError> {
    raw.parse::<i64>()
        .map(UserId::new)
        .map_err(|_| ServiceError::NotFound(USER_NOT_FOUND.to_string()))
}

// =============================================================================
// Root & Health
// =============================================================================

/// GET /
///
/// Welcome message confirming the API is reachable.
pub async fn welcome() -> &'static str {
    "Welcome to the REST API!"
}

/// GET /health
///
/// Health check endpoint to verify the service is running and the backing
/// store is accessible.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
    }))
}

// =============================================================================
// User CRUD
// =============================================================================

/// GET /api/users
///
/// List all users in the store.
pub async fn list_users(State(state): State<AppState>) -> HandlerResult<Vec<User>> {
    let users = db_services::list_users(state.repository.as_ref()).await?;
    Ok(Json(users))
}

/// POST /api/users
///
/// Create a new user from the request payload.
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ServiceError> {
    let user = db_services::create_user(
        state.repository.as_ref(),
        request.name.as_deref(),
        request.email.as_deref(),
        state.create_policy,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/users/{user_id}
///
/// Get a single user by ID.
pub async fn get_user(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> HandlerResult<User> {
    let user_id = parse_user_id(&raw_id)?;
    let user = db_services::get_user(state.repository.as_ref(), user_id).await?;
    Ok(Json(user))
}

/// PUT /api/users/{user_id}
///
/// Replace a user's fields with the request payload.
pub async fn update_user(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Json(request): Json<UpdateUserRequest>,
) -> HandlerResult<User> {
    let user_id = parse_user_id(&raw_id)?;
    let user = db_services::update_user(
        state.repository.as_ref(),
        user_id,
        request.name.as_deref(),
    )
    .await?;
    Ok(Json(user))
}

/// DELETE /api/users/{user_id}
///
/// Delete a user by ID. Responds with an empty 204 on success.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ServiceError> {
    let user_id = parse_user_id(&raw_id)?;
    db_services::delete_user(state.repository.as_ref(), user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Error Demonstration
// =============================================================================

/// GET /error
///
/// Always fails with an unclassified error, demonstrating that the generic
/// 500 body reaches the client while the detail stays in the logs.
pub async fn trigger_error() -> Result<(), ServiceError> {
    Err(ServiceError::Internal("This is a test error!".to_string()))
}

/// GET /validation-error
///
/// Always fails with a named validation error, demonstrating that the
/// raiser's message reaches the client with a 400 status.
pub async fn trigger_validation_error() -> Result<(), ServiceError> {
    Err(ValidationError::new("Invalid email format.").into())
}
