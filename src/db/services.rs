//! High-level database service layer.
//!
//! This module provides repository-agnostic operations that work with any
//! implementation of the repository traits. Business rules such as payload
//! validation and existence-before-validation ordering live here so they stay
//! consistent regardless of the storage backend.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  HTTP Layer (handlers, error mapping)   │
//! └───────────────────┬─────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────┐
//! │  Service Layer (services.rs)            │
//! │  - Payload validation                   │
//! │  - Operation ordering                   │
//! │  - Error classification                 │
//! └───────────────────┬─────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────┐
//! │  Repository Traits (repository/)        │
//! │  - UserRepository / TaskRepository      │
//! └───────────────────┬─────────────────────┘
//!                     │
//!        ┌────────────┴────────────┐
//!        │                         │
//! ┌──────▼─────────┐   ┌──────────▼────────┐
//! │ Postgres       │   │ Memory            │
//! │ (Diesel/r2d2)  │   │ (in-memory maps)  │
//! └────────────────┘   └───────────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use taskman::db::{services, repositories::MemoryRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = MemoryRepository::new();
//!
//!     let users = services::list_users(&repo).await?;
//!     println!("Found {} users", users.len());
//!
//!     Ok(())
//! }
//! ```

use log::info;
use thiserror::Error;

use super::repository::{FullRepository, RepositoryError};
use crate::api::{TaskId, UserId};
use crate::models::{NewTask, NewUser, Task, User, UserUpdate};
use crate::services::validation::{
    EMAIL_REQUIRED, NAME_REQUIRED, NAME_REQUIRED_FOR_UPDATE, STATUS_REQUIRED_FOR_UPDATE,
    TITLE_REQUIRED,
};
use crate::services::{require_field, CreatePolicy, ValidationError};

/// Result alias for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Classified failure of a service operation.
///
/// Every operation failure is tagged at the point it is raised; callers
/// branch on the variant, never on message text. The HTTP layer owns the
/// single translation of these variants into status codes.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The requested entity does not exist
    #[error("{0}")]
    NotFound(String),

    /// The payload failed a validation rule; the message is client-facing
    #[error("{0}")]
    Validation(String),

    /// The backing store is unreachable or unhealthy
    #[error("Dependency failure: {0}")]
    Dependency(String),

    /// Any other failure; the detail stays server-side
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(msg) => Self::NotFound(msg),
            RepositoryError::Connection(detail) => Self::Dependency(detail),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.message)
    }
}

// ==================== Health & Connection ====================

/// Check if the backing store is healthy.
///
/// This is a simple pass-through to the repository's health check.
///
/// # Arguments
/// * `repo` - Repository implementation
///
/// # Returns
/// * `Ok(true)` if the backing store is healthy
/// * `Err` if the check fails
pub async fn health_check<R: FullRepository + ?Sized>(repo: &R) -> ServiceResult<bool> {
    Ok(repo.health_check().await?)
}

// ==================== User Operations ====================

/// List all users.
///
/// # Arguments
/// * `repo` - Repository implementation
///
/// # Returns
/// * `Ok(Vec<User>)` - All users in ascending ID order
/// * `Err` if the query fails
pub async fn list_users<R: FullRepository + ?Sized>(repo: &R) -> ServiceResult<Vec<User>> {
    info!("Service layer: listing all users");
    Ok(repo.list_users().await?)
}

/// Get a single user by ID.
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `user_id` - The ID of the user
///
/// # Returns
/// * `Ok(User)` - The user
/// * `Err(ServiceError::NotFound)` if no user has that ID
pub async fn get_user<R: FullRepository + ?Sized>(
    repo: &R,
    user_id: UserId,
) -> ServiceResult<User> {
    info!("Service layer: loading user by id {}", user_id);
    Ok(repo.find_user(user_id).await?)
}

/// Create a new user.
///
/// Validation runs before any repository access; a rejected payload never
/// reaches the store. The name is always required. Depending on `policy`,
/// the email may be required as well, but a supplied email is stored under
/// either policy.
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `name` - User name as extracted from the payload
/// * `email` - Optional email as extracted from the payload
/// * `policy` - Which fields the payload must carry
///
/// # Returns
/// * `Ok(User)` - The created user with its assigned ID
/// * `Err(ServiceError::Validation)` if a required field is missing or empty
pub async fn create_user<R: FullRepository + ?Sized>(
    repo: &R,
    name: Option<&str>,
    email: Option<&str>,
    policy: CreatePolicy,
) -> ServiceResult<User> {
    let name = require_field(name, NAME_REQUIRED)?;
    if policy == CreatePolicy::RequireEmail {
        require_field(email, EMAIL_REQUIRED)?;
    }

    info!("Service layer: creating user '{}'", name);

    let new_user = NewUser {
        name: name.to_string(),
        email: email.filter(|e| !e.is_empty()).map(String::from),
    };
    Ok(repo.insert_user(new_user).await?)
}

/// Replace a user's fields.
///
/// The existence check runs first: an absent ID reports `NotFound` even when
/// the payload is also invalid. The update is a full replacement, so a stored
/// email does not survive it.
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `user_id` - The ID of the user to update
/// * `name` - Replacement name as extracted from the payload
///
/// # Returns
/// * `Ok(User)` - The updated user
/// * `Err(ServiceError::NotFound)` if no user has that ID
/// * `Err(ServiceError::Validation)` if the name is missing or empty
pub async fn update_user<R: FullRepository + ?Sized>(
    repo: &R,
    user_id: UserId,
    name: Option<&str>,
) -> ServiceResult<User> {
    repo.find_user(user_id).await?;
    let name = require_field(name, NAME_REQUIRED_FOR_UPDATE)?;

    info!("Service layer: updating user {}", user_id);

    let update = UserUpdate {
        name: name.to_string(),
    };
    Ok(repo.update_user(user_id, update).await?)
}

/// Delete a user by ID.
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `user_id` - The ID of the user to delete
///
/// # Returns
/// * `Ok(())` on success
/// * `Err(ServiceError::NotFound)` if no user has that ID
pub async fn delete_user<R: FullRepository + ?Sized>(
    repo: &R,
    user_id: UserId,
) -> ServiceResult<()> {
    info!("Service layer: deleting user {}", user_id);
    Ok(repo.delete_user(user_id).await?)
}

// ==================== Task Operations ====================

/// List all tasks.
///
/// # Arguments
/// * `repo` - Repository implementation
///
/// # Returns
/// * `Ok(Vec<Task>)` - All tasks in ascending ID order
/// * `Err` if the query fails
pub async fn list_tasks<R: FullRepository + ?Sized>(repo: &R) -> ServiceResult<Vec<Task>> {
    info!("Service layer: listing all tasks");
    Ok(repo.list_tasks().await?)
}

/// Create a new task for a user.
///
/// Only the title is validated. The owner is not checked for existence, so a
/// task can reference an unknown user; callers that need referential
/// integrity enforce it themselves (the Postgres backend does, through its
/// foreign key).
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `user_id` - ID of the owning user
/// * `title` - Task title as extracted from the payload
/// * `description` - Optional task description
///
/// # Returns
/// * `Ok(Task)` - The created task with its assigned ID and default status
/// * `Err(ServiceError::Validation)` if the title is missing or empty
pub async fn create_task<R: FullRepository + ?Sized>(
    repo: &R,
    user_id: UserId,
    title: Option<&str>,
    description: Option<&str>,
) -> ServiceResult<Task> {
    let title = require_field(title, TITLE_REQUIRED)?;

    info!("Service layer: creating task '{}' for user {}", title, user_id);

    let new_task = NewTask {
        user_id: user_id.value(),
        title: title.to_string(),
        description: description.filter(|d| !d.is_empty()).map(String::from),
    };
    Ok(repo.insert_task(new_task).await?)
}

/// Get all tasks owned by a user.
///
/// An unknown owner is not an error; the result is simply empty.
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `user_id` - ID of the owning user
///
/// # Returns
/// * `Ok(Vec<Task>)` - The user's tasks in ascending ID order
/// * `Err` if the query fails
pub async fn get_user_tasks<R: FullRepository + ?Sized>(
    repo: &R,
    user_id: UserId,
) -> ServiceResult<Vec<Task>> {
    info!("Service layer: listing tasks for user {}", user_id);
    Ok(repo.tasks_for_user(user_id).await?)
}

/// Change a task's status.
///
/// The existence check runs first: an absent ID reports `NotFound` even when
/// the payload is also invalid.
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `task_id` - The ID of the task to update
/// * `status` - Replacement status as extracted from the payload
///
/// # Returns
/// * `Ok(Task)` - The updated task
/// * `Err(ServiceError::NotFound)` if no task has that ID
/// * `Err(ServiceError::Validation)` if the status is missing or empty
pub async fn update_task_status<R: FullRepository + ?Sized>(
    repo: &R,
    task_id: TaskId,
    status: Option<&str>,
) -> ServiceResult<Task> {
    repo.find_task(task_id).await?;
    let status = require_field(status, STATUS_REQUIRED_FOR_UPDATE)?;

    info!("Service layer: updating status of task {}", task_id);

    Ok(repo.update_task_status(task_id, status).await?)
}

/// Delete a task by ID.
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `task_id` - The ID of the task to delete
///
/// # Returns
/// * `Ok(())` on success
/// * `Err(ServiceError::NotFound)` if no task has that ID
pub async fn delete_task<R: FullRepository + ?Sized>(
    repo: &R,
    task_id: TaskId,
) -> ServiceResult<()> {
    info!("Service layer: deleting task {}", task_id);
    Ok(repo.delete_task(task_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::MemoryRepository;

    #[tokio::test]
    async fn test_create_user_requires_name() {
        let repo = MemoryRepository::new();
        let result = create_user(&repo, None, None, CreatePolicy::NameOnly).await;

        match result {
            Err(ServiceError::Validation(msg)) => assert_eq!(msg, "Name is required"),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(repo.user_count(), 0);
    }

    #[tokio::test]
    async fn test_create_user_name_checked_before_email() {
        let repo = MemoryRepository::new();
        let result = create_user(&repo, None, None, CreatePolicy::RequireEmail).await;

        match result {
            Err(ServiceError::Validation(msg)) => assert_eq!(msg, "Name is required"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_user_email_policy() {
        let repo = MemoryRepository::new();
        let result = create_user(&repo, Some("Alice"), None, CreatePolicy::RequireEmail).await;

        match result {
            Err(ServiceError::Validation(msg)) => assert_eq!(msg, "Email is required"),
            other => panic!("expected validation error, got {:?}", other),
        }

        let user = create_user(
            &repo,
            Some("Alice"),
            Some("alice@example.com"),
            CreatePolicy::RequireEmail,
        )
        .await
        .unwrap();
        assert_eq!(user.email.as_deref(), Some("alice@example.com"));
    }

    #[tokio::test]
    async fn test_create_user_stores_email_without_policy() {
        let repo = MemoryRepository::new();
        let user = create_user(
            &repo,
            Some("Bob"),
            Some("bob@example.com"),
            CreatePolicy::NameOnly,
        )
        .await
        .unwrap();

        assert_eq!(user.email.as_deref(), Some("bob@example.com"));
    }

    #[tokio::test]
    async fn test_update_user_missing_id_wins_over_invalid_payload() {
        let repo = MemoryRepository::new();
        let result = update_user(&repo, UserId::new(99), None).await;

        match result {
            Err(ServiceError::NotFound(msg)) => assert_eq!(msg, "User not found"),
            other => panic!("expected not-found error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_user_validates_after_existence() {
        let repo = MemoryRepository::new();
        let user = create_user(&repo, Some("Alice"), None, CreatePolicy::NameOnly)
            .await
            .unwrap();

        let result = update_user(&repo, UserId::new(user.id), None).await;
        match result {
            Err(ServiceError::Validation(msg)) => assert_eq!(msg, "Name is required for update"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_user_replaces_and_clears_email() {
        let repo = MemoryRepository::new();
        let user = create_user(
            &repo,
            Some("Alice"),
            Some("alice@example.com"),
            CreatePolicy::NameOnly,
        )
        .await
        .unwrap();

        let updated = update_user(&repo, UserId::new(user.id), Some("Alicia"))
            .await
            .unwrap();
        assert_eq!(updated.name, "Alicia");
        assert_eq!(updated.email, None);
    }

    #[tokio::test]
    async fn test_create_task_requires_title() {
        let repo = MemoryRepository::new();
        let result = create_task(&repo, UserId::new(1), None, None).await;

        match result {
            Err(ServiceError::Validation(msg)) => assert_eq!(msg, "Title is required"),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(repo.task_count(), 0);
    }

    #[tokio::test]
    async fn test_create_task_does_not_check_owner() {
        let repo = MemoryRepository::new();
        let task = create_task(&repo, UserId::new(42), Some("Write report"), None)
            .await
            .unwrap();

        assert_eq!(task.user_id, 42);
        assert_eq!(task.status, "pending");
    }

    #[tokio::test]
    async fn test_get_user_tasks_unknown_owner_is_empty() {
        let repo = MemoryRepository::new();
        let tasks = get_user_tasks(&repo, UserId::new(7)).await.unwrap();
        assert!(tasks.is_empty());
    }

    #[tokio::test]
    async fn test_update_task_status_missing_id_wins() {
        let repo = MemoryRepository::new();
        let result = update_task_status(&repo, TaskId::new(3), None).await;

        match result {
            Err(ServiceError::NotFound(msg)) => assert_eq!(msg, "Task not found"),
            other => panic!("expected not-found error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_task_status_validates_after_existence() {
        let repo = MemoryRepository::new();
        let task = create_task(&repo, UserId::new(1), Some("Write report"), None)
            .await
            .unwrap();

        let result = update_task_status(&repo, TaskId::new(task.id), None).await;
        match result {
            Err(ServiceError::Validation(msg)) => {
                assert_eq!(msg, "Status is required for update")
            }
            other => panic!("expected validation error, got {:?}", other),
        }

        let updated = update_task_status(&repo, TaskId::new(task.id), Some("done"))
            .await
            .unwrap();
        assert_eq!(updated.status, "done");
    }

    #[tokio::test]
    async fn test_dependency_error_classification() {
        let repo = MemoryRepository::new();
        repo.set_healthy(false);

        let result = list_users(&repo).await;
        assert!(matches!(result, Err(ServiceError::Dependency(_))));
    }
}
