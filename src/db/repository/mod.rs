//! Repository trait definitions for storage operations.
//!
//! This module provides focused repository traits that abstract the backing
//! store. Splitting the contract per resource keeps implementations small
//! and lets tests target one collection at a time.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`users`]: User collection CRUD
//! - [`tasks`]: Task collection CRUD and status updates
//!
//! # Convenience Trait Bound
//!
//! For functions that need both collections, use the [`FullRepository`]
//! trait bound:
//!
//! ```ignore
//! async fn my_service<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<()> {
//!     let users = repo.list_users().await?;
//!     let tasks = repo.list_tasks().await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod tasks;
pub mod users;

// Re-export error types
pub use error::{RepositoryError, RepositoryResult};

// Re-export all traits
pub use tasks::{TaskRepository, TASK_NOT_FOUND};
pub use users::{UserRepository, USER_NOT_FOUND};

/// Composite trait bound for a complete repository implementation.
///
/// Automatically implemented for any type that implements both resource
/// traits. Use this as the bound when a caller needs access to users and
/// tasks through one handle.
pub trait FullRepository: UserRepository + TaskRepository {}

// Blanket implementation: implementing both traits yields FullRepository for free
impl<T> FullRepository for T where T: UserRepository + TaskRepository {}
