//! Data access for users and tasks.
//!
//! This module provides abstractions for storage operations via the
//! Repository pattern, allowing different backing stores to be swapped
//! easily.
//!
//! # Repository Pattern
//! The module includes:
//! - `services`: High-level domain operations (use these in your application!)
//! - `repository`: Trait definitions for storage operations
//! - `repositories::postgres`: Postgres implementation with Diesel ORM
//! - `repositories::memory`: In-memory implementation for unit testing and local development
//! - `factory`: Factory for creating repository instances
//!
//! # Recommended Usage
//!
//! **For new code, use the service layer:**
//! ```ignore
//! use taskman::db::{services, RepositoryFactory, RepositoryType};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = RepositoryFactory::create(RepositoryType::Memory, None).await?;
//!
//!     // Use service layer functions
//!     let users = services::list_users(repo.as_ref()).await?;
//!     println!("Found {} users", users.len());
//!     Ok(())
//! }
//! ```
//!
//! The created repository is injected into whatever needs it (the HTTP
//! server carries it in its shared state); there is no process-global
//! instance.
//!
//! # Postgres Implementation
//! PostgreSQL-specific code is in `repositories::postgres`.

#[cfg(not(any(feature = "postgres-repo", feature = "memory-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;

// Postgres config is colocated with the repository implementation.
#[cfg(feature = "postgres-repo")]
pub use repositories::postgres::PostgresConfig;
#[cfg(not(feature = "postgres-repo"))]
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    _private: (),
}

// ==================== Service Layer (Recommended for new code) ====================
// Use these high-level functions that work with any repository implementation

pub use services::{
    create_task, create_user, delete_task, delete_user, get_user, get_user_tasks, health_check,
    list_tasks, list_users, update_task_status, update_user, ServiceError, ServiceResult,
};

// ==================== Repository Pattern Exports ====================

pub use repo_config::RepositoryConfig;

// Repository traits and implementations
pub use factory::{RepositoryBuilder, RepositoryFactory, RepositoryType};
pub use repositories::MemoryRepository;
#[cfg(feature = "postgres-repo")]
pub use repositories::PostgresRepository;
pub use repository::{
    FullRepository, RepositoryError, RepositoryResult, TaskRepository, UserRepository,
};
