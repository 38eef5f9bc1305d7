//! In-memory repository implementation.
//!
//! This module provides an in-memory implementation of both repository
//! traits, suitable for unit testing and local development. All data lives
//! in HashMaps behind a single lock, giving fast and deterministic behavior
//! with no external services.
//!
//! Each operation takes the lock once; there is no transactional isolation
//! across operations, so concurrent calls touching the same ID may
//! interleave. This mirrors the contract documented on the traits.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::api::{TaskId, UserId};
use crate::db::repository::{
    RepositoryError, RepositoryResult, TaskRepository, UserRepository, TASK_NOT_FOUND,
    USER_NOT_FOUND,
};
use crate::models::{NewTask, NewUser, Task, User, UserUpdate, DEFAULT_TASK_STATUS};

/// In-memory repository.
///
/// Cloning is cheap and clones share the same underlying store.
///
/// # Example
/// ```
/// use taskman::db::repositories::MemoryRepository;
/// use taskman::db::repository::UserRepository;
/// use taskman::models::NewUser;
///
/// #[tokio::main]
/// async fn main() {
///     let repo = MemoryRepository::new();
///     let user = repo
///         .insert_user(NewUser { name: "Alice".into(), email: None })
///         .await
///         .unwrap();
///     assert_eq!(user.id, 1);
/// }
/// ```
#[derive(Clone)]
pub struct MemoryRepository {
    data: Arc<RwLock<MemoryData>>,
}

struct MemoryData {
    users: HashMap<UserId, User>,
    tasks: HashMap<TaskId, Task>,

    // ID counters: monotonic, never rewound by deletions
    next_user_id: UserId,
    next_task_id: TaskId,

    // Connection health
    is_healthy: bool,
}

impl Default for MemoryData {
    fn default() -> Self {
        Self {
            users: HashMap::new(),
            tasks: HashMap::new(),
            next_user_id: UserId(1),
            next_task_id: TaskId(1),
            is_healthy: true,
        }
    }
}

impl MemoryRepository {
    /// Create a new empty repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(MemoryData::default())),
        }
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        let mut data = self.data.write().unwrap();
        data.is_healthy = healthy;
    }

    /// Clear all data, keeping the current health status and ID counters.
    pub fn clear(&self) {
        let mut data = self.data.write().unwrap();
        data.users.clear();
        data.tasks.clear();
    }

    /// Get the number of users stored.
    pub fn user_count(&self) -> usize {
        self.data.read().unwrap().users.len()
    }

    /// Get the number of tasks stored.
    pub fn task_count(&self) -> usize {
        self.data.read().unwrap().tasks.len()
    }

    /// Check if a user exists.
    pub fn has_user(&self, user_id: UserId) -> bool {
        self.data.read().unwrap().users.contains_key(&user_id)
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self) -> RepositoryResult<()> {
        let data = self.data.read().unwrap();
        if !data.is_healthy {
            return Err(RepositoryError::Connection(
                "Database is not healthy".to_string(),
            ));
        }
        Ok(())
    }

    /// Helper to get a user or return NotFound error.
    fn find_user_impl(&self, user_id: UserId) -> RepositoryResult<User> {
        let data = self.data.read().unwrap();
        data.users
            .get(&user_id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(USER_NOT_FOUND.to_string()))
    }

    /// Helper to get a task or return NotFound error.
    fn find_task_impl(&self, task_id: TaskId) -> RepositoryResult<Task> {
        let data = self.data.read().unwrap();
        data.tasks
            .get(&task_id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(TASK_NOT_FOUND.to_string()))
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for MemoryRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        let data = self.data.read().unwrap();
        Ok(data.is_healthy)
    }

    async fn list_users(&self) -> RepositoryResult<Vec<User>> {
        self.check_health()?;
        let data = self.data.read().unwrap();

        let mut users: Vec<User> = data.users.values().cloned().collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    async fn find_user(&self, user_id: UserId) -> RepositoryResult<User> {
        self.check_health()?;
        self.find_user_impl(user_id)
    }

    async fn insert_user(&self, new_user: NewUser) -> RepositoryResult<User> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();

        let id = data.next_user_id;
        data.next_user_id = UserId(id.0 + 1);

        let user = User {
            id: id.0,
            name: new_user.name,
            email: new_user.email,
        };
        data.users.insert(id, user.clone());
        Ok(user)
    }

    async fn update_user(&self, user_id: UserId, update: UserUpdate) -> RepositoryResult<User> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();

        let user = data
            .users
            .get_mut(&user_id)
            .ok_or_else(|| RepositoryError::NotFound(USER_NOT_FOUND.to_string()))?;

        // Full replacement: a stored email does not survive the update
        user.name = update.name;
        user.email = None;
        Ok(user.clone())
    }

    async fn delete_user(&self, user_id: UserId) -> RepositoryResult<()> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();

        data.users
            .remove(&user_id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::NotFound(USER_NOT_FOUND.to_string()))
    }
}

#[async_trait]
impl TaskRepository for MemoryRepository {
    async fn list_tasks(&self) -> RepositoryResult<Vec<Task>> {
        self.check_health()?;
        let data = self.data.read().unwrap();

        let mut tasks: Vec<Task> = data.tasks.values().cloned().collect();
        tasks.sort_by_key(|t| t.id);
        Ok(tasks)
    }

    async fn find_task(&self, task_id: TaskId) -> RepositoryResult<Task> {
        self.check_health()?;
        self.find_task_impl(task_id)
    }

    async fn tasks_for_user(&self, user_id: UserId) -> RepositoryResult<Vec<Task>> {
        self.check_health()?;
        let data = self.data.read().unwrap();

        let mut tasks: Vec<Task> = data
            .tasks
            .values()
            .filter(|t| t.user_id == user_id.0)
            .cloned()
            .collect();
        tasks.sort_by_key(|t| t.id);
        Ok(tasks)
    }

    async fn insert_task(&self, new_task: NewTask) -> RepositoryResult<Task> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();

        let id = data.next_task_id;
        data.next_task_id = TaskId(id.0 + 1);

        let task = Task {
            id: id.0,
            user_id: new_task.user_id,
            title: new_task.title,
            description: new_task.description,
            status: DEFAULT_TASK_STATUS.to_string(),
        };
        data.tasks.insert(id, task.clone());
        Ok(task)
    }

    async fn update_task_status(&self, task_id: TaskId, status: &str) -> RepositoryResult<Task> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();

        let task = data
            .tasks
            .get_mut(&task_id)
            .ok_or_else(|| RepositoryError::NotFound(TASK_NOT_FOUND.to_string()))?;

        task.status = status.to_string();
        Ok(task.clone())
    }

    async fn delete_task(&self, task_id: TaskId) -> RepositoryResult<()> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();

        data.tasks
            .remove(&task_id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::NotFound(TASK_NOT_FOUND.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(name: &str) -> NewUser {
        NewUser {
            name: name.to_string(),
            email: None,
        }
    }

    fn new_task(user_id: i64, title: &str) -> NewTask {
        NewTask {
            user_id,
            title: title.to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_health_check() {
        let repo = MemoryRepository::new();
        assert!(repo.health_check().await.unwrap());

        repo.set_healthy(false);
        assert!(!repo.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_insert_and_find_user() {
        let repo = MemoryRepository::new();

        let created = repo.insert_user(new_user("Alice")).await.unwrap();
        assert_eq!(created.id, 1);

        let found = repo.find_user(UserId::new(created.id)).await.unwrap();
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn test_list_users_sorted_by_id() {
        let repo = MemoryRepository::new();

        repo.insert_user(new_user("Alice")).await.unwrap();
        repo.insert_user(new_user("Bob")).await.unwrap();
        repo.insert_user(new_user("Carol")).await.unwrap();

        let users = repo.list_users().await.unwrap();
        let ids: Vec<i64> = users.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_find_user_not_found() {
        let repo = MemoryRepository::new();

        let result = repo.find_user(UserId::new(999)).await;
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_not_found_message_is_exact() {
        let repo = MemoryRepository::new();

        let err = repo.find_user(UserId::new(999)).await.unwrap_err();
        assert_eq!(err.to_string(), "User not found");

        let err = repo.find_task(TaskId::new(999)).await.unwrap_err();
        assert_eq!(err.to_string(), "Task not found");
    }

    #[tokio::test]
    async fn test_update_user_replaces_email() {
        let repo = MemoryRepository::new();

        let created = repo
            .insert_user(NewUser {
                name: "Alice".to_string(),
                email: Some("alice@example.com".to_string()),
            })
            .await
            .unwrap();

        let updated = repo
            .update_user(
                UserId::new(created.id),
                UserUpdate {
                    name: "Alicia".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Alicia");
        assert_eq!(updated.email, None);
    }

    #[tokio::test]
    async fn test_deleted_id_is_never_reused() {
        let repo = MemoryRepository::new();

        repo.insert_user(new_user("Alice")).await.unwrap();
        let bob = repo.insert_user(new_user("Bob")).await.unwrap();
        repo.delete_user(UserId::new(bob.id)).await.unwrap();

        let carol = repo.insert_user(new_user("Carol")).await.unwrap();
        assert_eq!(carol.id, 3);
    }

    #[tokio::test]
    async fn test_delete_user_twice_reports_not_found() {
        let repo = MemoryRepository::new();

        let user = repo.insert_user(new_user("Alice")).await.unwrap();
        repo.delete_user(UserId::new(user.id)).await.unwrap();

        let result = repo.delete_user(UserId::new(user.id)).await;
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_unhealthy_repository_rejects_operations() {
        let repo = MemoryRepository::new();
        repo.set_healthy(false);

        let result = repo.list_users().await;
        assert!(matches!(result, Err(RepositoryError::Connection(_))));
    }

    #[tokio::test]
    async fn test_insert_task_assigns_default_status() {
        let repo = MemoryRepository::new();

        let task = repo.insert_task(new_task(1, "Write report")).await.unwrap();
        assert_eq!(task.id, 1);
        assert_eq!(task.status, DEFAULT_TASK_STATUS);
    }

    #[tokio::test]
    async fn test_tasks_for_user_filters_by_owner() {
        let repo = MemoryRepository::new();

        repo.insert_task(new_task(1, "First")).await.unwrap();
        repo.insert_task(new_task(2, "Second")).await.unwrap();
        repo.insert_task(new_task(1, "Third")).await.unwrap();

        let tasks = repo.tasks_for_user(UserId::new(1)).await.unwrap();
        let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Third"]);

        let none = repo.tasks_for_user(UserId::new(42)).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_update_task_status() {
        let repo = MemoryRepository::new();

        let task = repo.insert_task(new_task(1, "Write report")).await.unwrap();
        let updated = repo
            .update_task_status(TaskId::new(task.id), "done")
            .await
            .unwrap();

        assert_eq!(updated.status, "done");
        assert_eq!(updated.title, "Write report");
    }

    #[tokio::test]
    async fn test_clear_keeps_counters() {
        let repo = MemoryRepository::new();

        repo.insert_user(new_user("Alice")).await.unwrap();
        repo.clear();
        assert_eq!(repo.user_count(), 0);

        let user = repo.insert_user(new_user("Bob")).await.unwrap();
        assert_eq!(user.id, 2);
    }
}
