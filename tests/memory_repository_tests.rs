//! Expanded tests for MemoryRepository.
//!
//! These tests cover concurrent access patterns, trait-object usage, and
//! lifecycle edge cases for the in-memory repository implementation.

use std::sync::Arc;

use taskman::api::{TaskId, UserId};
use taskman::db::repositories::MemoryRepository;
use taskman::db::repository::{
    FullRepository, RepositoryError, TaskRepository, UserRepository,
};
use taskman::models::{NewTask, NewUser, UserUpdate};

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

// =========================================================
// Concurrent Access Tests
// =========================================================

#[tokio::test]
async fn test_concurrent_inserts_assign_unique_ids() {
    let repo = Arc::new(MemoryRepository::new());

    let mut handles = vec![];
    for i in 0..10 {
        let repo_clone = Arc::clone(&repo);
        handles.push(tokio::spawn(async move {
            repo_clone.insert_user(new_user(&format!("user_{}", i))).await
        }));
    }

    let mut ids = vec![];
    for handle in handles {
        let user = handle.await.unwrap().unwrap();
        ids.push(user.id);
    }

    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 10);

    let users = repo.list_users().await.unwrap();
    assert_eq!(users.len(), 10);
}

#[tokio::test]
async fn test_concurrent_reads_during_writes() {
    let repo = Arc::new(MemoryRepository::new());
    repo.insert_user(new_user("Alice")).await.unwrap();

    let mut handles = vec![];
    for _ in 0..5 {
        let repo_clone = Arc::clone(&repo);
        handles.push(tokio::spawn(async move {
            repo_clone.list_users().await.map(|users| users.len())
        }));
    }
    for i in 0..5 {
        let repo_clone = Arc::clone(&repo);
        handles.push(tokio::spawn(async move {
            repo_clone
                .insert_user(new_user(&format!("writer_{}", i)))
                .await
                .map(|_| 0)
        }));
    }

    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }

    assert_eq!(repo.user_count(), 6);
}

// =========================================================
// Trait Object Tests
// =========================================================

#[tokio::test]
async fn test_full_repository_trait_object_lifecycle() {
    let repo: Arc<dyn FullRepository> = Arc::new(MemoryRepository::new());

    let user = repo.insert_user(new_user("Alice")).await.unwrap();
    assert_eq!(user.id, 1);

    let task = repo.insert_task(new_task(user.id, "Write report")).await.unwrap();
    assert_eq!(task.status, "pending");

    let updated = repo
        .update_user(UserId::new(user.id), UserUpdate { name: "Alicia".to_string() })
        .await
        .unwrap();
    assert_eq!(updated.name, "Alicia");

    let done = repo
        .update_task_status(TaskId::new(task.id), "done")
        .await
        .unwrap();
    assert_eq!(done.status, "done");

    repo.delete_task(TaskId::new(task.id)).await.unwrap();
    repo.delete_user(UserId::new(user.id)).await.unwrap();

    assert!(repo.list_users().await.unwrap().is_empty());
    assert!(repo.list_tasks().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_trait_object_not_found_messages() {
    let repo: Arc<dyn FullRepository> = Arc::new(MemoryRepository::new());

    let err = repo.find_user(UserId::new(1)).await.unwrap_err();
    assert_eq!(err.to_string(), "User not found");

    let err = repo.find_task(TaskId::new(1)).await.unwrap_err();
    assert_eq!(err.to_string(), "Task not found");
}

// =========================================================
// Lifecycle Edge Cases
// =========================================================

#[tokio::test]
async fn test_list_stays_sorted_after_deletes() {
    let repo = MemoryRepository::new();

    for name in ["A", "B", "C", "D"] {
        repo.insert_user(new_user(name)).await.unwrap();
    }
    repo.delete_user(UserId::new(2)).await.unwrap();

    let users = repo.list_users().await.unwrap();
    let ids: Vec<i64> = users.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![1, 3, 4]);
}

#[tokio::test]
async fn test_update_after_delete_is_not_found() {
    let repo = MemoryRepository::new();

    let user = repo.insert_user(new_user("Alice")).await.unwrap();
    repo.delete_user(UserId::new(user.id)).await.unwrap();

    let result = repo
        .update_user(UserId::new(user.id), UserUpdate { name: "Ghost".to_string() })
        .await;
    assert!(matches!(result, Err(RepositoryError::NotFound(_))));
}

#[tokio::test]
async fn test_health_toggle_round_trip() {
    let repo = MemoryRepository::new();
    assert!(repo.health_check().await.unwrap());

    repo.set_healthy(false);
    assert!(!repo.health_check().await.unwrap());
    assert!(matches!(
        repo.list_users().await,
        Err(RepositoryError::Connection(_))
    ));

    repo.set_healthy(true);
    assert!(repo.list_users().await.is_ok());
}

#[tokio::test]
async fn test_clear_resets_rows_but_not_counters() {
    let repo = MemoryRepository::new();

    repo.insert_user(new_user("Alice")).await.unwrap();
    repo.insert_task(new_task(1, "Write report")).await.unwrap();
    repo.clear();

    assert_eq!(repo.user_count(), 0);
    assert_eq!(repo.task_count(), 0);

    // Counters keep advancing so old IDs never come back
    let user = repo.insert_user(new_user("Bob")).await.unwrap();
    assert_eq!(user.id, 2);
    let task = repo.insert_task(new_task(user.id, "Second")).await.unwrap();
    assert_eq!(task.id, 2);
}
