//! Task repository trait for CRUD and status operations.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{NewTask, Task};

/// Message carried by `NotFound` errors for the task collection.
pub const TASK_NOT_FOUND: &str = "Task not found";

/// Repository trait for task storage.
///
/// Tasks reference their owner by `user_id`; referential integrity is not
/// enforced at this layer. ID assignment follows the same monotonic
/// no-reuse policy as users.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// List all tasks, ordered by ascending ID (insertion order).
    ///
    /// # Returns
    /// * `Ok(Vec<Task>)` - Every stored task, possibly empty
    /// * `Err(RepositoryError)` - If the operation fails
    async fn list_tasks(&self) -> RepositoryResult<Vec<Task>>;

    /// Retrieve a single task by ID.
    ///
    /// # Arguments
    /// * `task_id` - The ID of the task to retrieve
    ///
    /// # Returns
    /// * `Ok(Task)` - The matching task
    /// * `Err(RepositoryError::NotFound)` - If no task has this ID
    async fn find_task(&self, task_id: crate::api::TaskId) -> RepositoryResult<Task>;

    /// List the tasks owned by a user, ordered by ascending ID.
    ///
    /// An unknown `user_id` yields an empty list, not an error.
    ///
    /// # Arguments
    /// * `user_id` - Owner whose tasks to list
    async fn tasks_for_user(&self, user_id: crate::api::UserId) -> RepositoryResult<Vec<Task>>;

    /// Store a new task and assign it an ID.
    ///
    /// The stored task starts with [`crate::models::DEFAULT_TASK_STATUS`].
    ///
    /// # Arguments
    /// * `new_task` - Validated payload for the task to store
    ///
    /// # Returns
    /// * `Ok(Task)` - The stored task including its assigned ID and status
    /// * `Err(RepositoryError)` - If the operation fails
    async fn insert_task(&self, new_task: NewTask) -> RepositoryResult<Task>;

    /// Replace the status of an existing task.
    ///
    /// # Arguments
    /// * `task_id` - The ID of the task to update
    /// * `status` - New status value, stored as given
    ///
    /// # Returns
    /// * `Ok(Task)` - The updated task
    /// * `Err(RepositoryError::NotFound)` - If no task has this ID
    async fn update_task_status(
        &self,
        task_id: crate::api::TaskId,
        status: &str,
    ) -> RepositoryResult<Task>;

    /// Remove a task.
    ///
    /// # Arguments
    /// * `task_id` - The ID of the task to remove
    ///
    /// # Returns
    /// * `Ok(())` - If the task was removed
    /// * `Err(RepositoryError::NotFound)` - If no task has this ID
    async fn delete_task(&self, task_id: crate::api::TaskId) -> RepositoryResult<()>;
}
