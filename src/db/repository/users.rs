//! User repository trait for CRUD operations.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{NewUser, User, UserUpdate};

/// Message carried by `NotFound` errors for the user collection.
///
/// Part of the contract: every backend reports a missing user with exactly
/// this text, and clients see it verbatim.
pub const USER_NOT_FOUND: &str = "User not found";

/// Repository trait for user storage.
///
/// Implementations own the user collection and are the only path that
/// mutates it. IDs are assigned from a monotonically increasing counter
/// starting at 1; an ID freed by deletion is never reissued.
///
/// Each call is individually atomic, but there is no transactional
/// isolation across calls: concurrent operations on the same ID may
/// interleave. Known limitation.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait UserRepository: Send + Sync {
    // ==================== Health & Connection ====================

    /// Check if the backing store is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if the store is healthy
    /// - `Ok(false)` if the store is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if an error occurred during the check
    async fn health_check(&self) -> RepositoryResult<bool>;

    // ==================== User Operations ====================

    /// List all users, ordered by ascending ID (insertion order).
    ///
    /// # Returns
    /// * `Ok(Vec<User>)` - Every stored user, possibly empty
    /// * `Err(RepositoryError)` - If the operation fails
    async fn list_users(&self) -> RepositoryResult<Vec<User>>;

    /// Retrieve a single user by ID.
    ///
    /// # Arguments
    /// * `user_id` - The ID of the user to retrieve
    ///
    /// # Returns
    /// * `Ok(User)` - The matching user
    /// * `Err(RepositoryError::NotFound)` - If no user has this ID
    async fn find_user(&self, user_id: crate::api::UserId) -> RepositoryResult<User>;

    /// Store a new user and assign it an ID.
    ///
    /// # Arguments
    /// * `new_user` - Validated payload for the user to store
    ///
    /// # Returns
    /// * `Ok(User)` - The stored user including its assigned ID
    /// * `Err(RepositoryError)` - If the operation fails
    async fn insert_user(&self, new_user: NewUser) -> RepositoryResult<User>;

    /// Replace the mutable fields of an existing user.
    ///
    /// This is a full replacement: the name is overwritten and any stored
    /// email is cleared.
    ///
    /// # Arguments
    /// * `user_id` - The ID of the user to update
    /// * `update` - Validated replacement fields
    ///
    /// # Returns
    /// * `Ok(User)` - The updated user
    /// * `Err(RepositoryError::NotFound)` - If no user has this ID
    async fn update_user(
        &self,
        user_id: crate::api::UserId,
        update: UserUpdate,
    ) -> RepositoryResult<User>;

    /// Remove a user.
    ///
    /// Deletion is immediate and irreversible; the freed ID is never
    /// reassigned.
    ///
    /// # Arguments
    /// * `user_id` - The ID of the user to remove
    ///
    /// # Returns
    /// * `Ok(())` - If the user was removed
    /// * `Err(RepositoryError::NotFound)` - If no user has this ID
    async fn delete_user(&self, user_id: crate::api::UserId) -> RepositoryResult<()>;
}
