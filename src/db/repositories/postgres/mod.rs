//! Postgres repository implementation using Diesel.
//!
//! This module implements the repository traits against a PostgreSQL
//! database.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic retry for transient connection failures
//! - Blocking Diesel calls isolated on the blocking thread pool
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
//! - `PG_MAX_RETRIES`: Maximum retry attempts for transient failures (default: 3)
//! - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)
//!
//! ## Schema
//!
//! Migrations are managed outside this crate. The repository expects the
//! following tables; `GENERATED ALWAYS AS IDENTITY` provides the monotonic,
//! never-reused ID allocation the traits require:
//!
//! ```sql
//! CREATE TABLE users (
//!     id BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
//!     name TEXT NOT NULL,
//!     email TEXT
//! );
//!
//! CREATE TABLE tasks (
//!     id BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
//!     user_id BIGINT NOT NULL REFERENCES users (id),
//!     title TEXT NOT NULL,
//!     description TEXT,
//!     status TEXT NOT NULL
//! );
//! ```

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use std::time::Duration;
use tokio::task;

use crate::api::{TaskId, UserId};
use crate::db::repository::{
    RepositoryError, RepositoryResult, TaskRepository, UserRepository, TASK_NOT_FOUND,
    USER_NOT_FOUND,
};
use crate::models::{NewTask, NewUser, Task, User, UserUpdate, DEFAULT_TASK_STATUS};

mod models;
mod schema;

use models::{NewTaskRow, NewUserRow, TaskRow, UserRow};
use schema::{tasks, users};

type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
    /// Maximum number of retry attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    ///
    /// `DATABASE_URL` (or `PG_DATABASE_URL`) is required; the pool tuning
    /// knobs fall back to their defaults when unset or unparseable.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let max_pool_size = std::env::var("PG_POOL_MAX")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        let min_pool_size = std::env::var("PG_POOL_MIN")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(1);

        let connection_timeout_sec = std::env::var("PG_CONN_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        let idle_timeout_sec = std::env::var("PG_IDLE_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(600);

        let max_retries = std::env::var("PG_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(3);

        let retry_delay_ms = std::env::var("PG_RETRY_DELAY_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(100);

        Ok(Self {
            database_url,
            max_pool_size,
            min_pool_size,
            connection_timeout_sec,
            idle_timeout_sec,
            max_retries,
            retry_delay_ms,
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Diesel-backed repository for Postgres.
#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
}

impl PostgresRepository {
    /// Create a new repository with a connection pool.
    ///
    /// # Arguments
    /// * `config` - Database configuration
    ///
    /// # Returns
    /// * `Ok(PostgresRepository)` on success
    /// * `Err(RepositoryError)` if the pool cannot be built
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true) // Validate connections before use
            .build(manager)
            .map_err(|e| RepositoryError::Connection(e.to_string()))?;

        Ok(Self { pool, config })
    }

    /// Execute a database operation with automatic retry for transient failures.
    ///
    /// The operation runs on the blocking thread pool since Diesel is
    /// synchronous. Connection failures are retried up to `max_retries`
    /// times with exponential backoff.
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static + Clone,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let retry_delay_ms = self.config.retry_delay_ms;

        task::spawn_blocking(move || {
            let mut last_error = None;
            let mut retry_delay = Duration::from_millis(retry_delay_ms);

            for attempt in 0..=max_retries {
                if attempt > 0 {
                    std::thread::sleep(retry_delay);
                    retry_delay *= 2; // Exponential backoff
                }

                let mut conn = match pool.get() {
                    Ok(c) => c,
                    Err(e) => {
                        let err = RepositoryError::from(e);
                        if attempt < max_retries {
                            last_error = Some(err);
                            continue;
                        }
                        return Err(err);
                    }
                };

                match f.clone()(&mut conn) {
                    Ok(result) => return Ok(result),
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        last_error = Some(e);
                        continue;
                    }
                    Err(e) => return Err(e),
                }
            }

            Err(last_error.unwrap_or_else(|| {
                RepositoryError::Internal("Max retries exceeded with no error captured".to_string())
            }))
        })
        .await
        .map_err(|e| RepositoryError::Internal(format!("Task join error: {}", e)))?
    }
}

fn map_diesel_error(err: diesel::result::Error) -> RepositoryError {
    RepositoryError::from(err)
}

fn user_from_row(row: UserRow) -> User {
    User {
        id: row.id,
        name: row.name,
        email: row.email,
    }
}

fn task_from_row(row: TaskRow) -> Task {
    Task {
        id: row.id,
        user_id: row.user_id,
        title: row.title,
        description: row.description,
        status: row.status,
    }
}

#[async_trait]
impl UserRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn list_users(&self) -> RepositoryResult<Vec<User>> {
        self.with_conn(|conn| {
            let rows = users::table
                .select(UserRow::as_select())
                .order(users::id.asc())
                .load::<UserRow>(conn)
                .map_err(map_diesel_error)?;

            Ok(rows.into_iter().map(user_from_row).collect())
        })
        .await
    }

    async fn find_user(&self, user_id: UserId) -> RepositoryResult<User> {
        self.with_conn(move |conn| {
            let row = users::table
                .find(user_id.0)
                .select(UserRow::as_select())
                .first::<UserRow>(conn)
                .optional()
                .map_err(map_diesel_error)?;

            row.map(user_from_row)
                .ok_or_else(|| RepositoryError::NotFound(USER_NOT_FOUND.to_string()))
        })
        .await
    }

    async fn insert_user(&self, new_user: NewUser) -> RepositoryResult<User> {
        let new_row = NewUserRow {
            name: new_user.name,
            email: new_user.email,
        };

        self.with_conn(move |conn| {
            let inserted: UserRow = diesel::insert_into(users::table)
                .values(&new_row)
                .returning(UserRow::as_returning())
                .get_result(conn)
                .map_err(map_diesel_error)?;

            Ok(user_from_row(inserted))
        })
        .await
    }

    async fn update_user(&self, user_id: UserId, update: UserUpdate) -> RepositoryResult<User> {
        let name = update.name;

        self.with_conn(move |conn| {
            // Full replacement: the email column is cleared alongside the name
            let row = diesel::update(users::table.find(user_id.0))
                .set((users::name.eq(name.clone()), users::email.eq(None::<String>)))
                .returning(UserRow::as_returning())
                .get_result::<UserRow>(conn)
                .optional()
                .map_err(map_diesel_error)?;

            row.map(user_from_row)
                .ok_or_else(|| RepositoryError::NotFound(USER_NOT_FOUND.to_string()))
        })
        .await
    }

    async fn delete_user(&self, user_id: UserId) -> RepositoryResult<()> {
        self.with_conn(move |conn| {
            let deleted = diesel::delete(users::table.find(user_id.0))
                .execute(conn)
                .map_err(map_diesel_error)?;

            if deleted == 0 {
                return Err(RepositoryError::NotFound(USER_NOT_FOUND.to_string()));
            }
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl TaskRepository for PostgresRepository {
    async fn list_tasks(&self) -> RepositoryResult<Vec<Task>> {
        self.with_conn(|conn| {
            let rows = tasks::table
                .select(TaskRow::as_select())
                .order(tasks::id.asc())
                .load::<TaskRow>(conn)
                .map_err(map_diesel_error)?;

            Ok(rows.into_iter().map(task_from_row).collect())
        })
        .await
    }

    async fn find_task(&self, task_id: TaskId) -> RepositoryResult<Task> {
        self.with_conn(move |conn| {
            let row = tasks::table
                .find(task_id.0)
                .select(TaskRow::as_select())
                .first::<TaskRow>(conn)
                .optional()
                .map_err(map_diesel_error)?;

            row.map(task_from_row)
                .ok_or_else(|| RepositoryError::NotFound(TASK_NOT_FOUND.to_string()))
        })
        .await
    }

    async fn tasks_for_user(&self, user_id: UserId) -> RepositoryResult<Vec<Task>> {
        self.with_conn(move |conn| {
            let rows = tasks::table
                .filter(tasks::user_id.eq(user_id.0))
                .select(TaskRow::as_select())
                .order(tasks::id.asc())
                .load::<TaskRow>(conn)
                .map_err(map_diesel_error)?;

            Ok(rows.into_iter().map(task_from_row).collect())
        })
        .await
    }

    async fn insert_task(&self, new_task: NewTask) -> RepositoryResult<Task> {
        let new_row = NewTaskRow {
            user_id: new_task.user_id,
            title: new_task.title,
            description: new_task.description,
            status: DEFAULT_TASK_STATUS.to_string(),
        };

        self.with_conn(move |conn| {
            let inserted: TaskRow = diesel::insert_into(tasks::table)
                .values(&new_row)
                .returning(TaskRow::as_returning())
                .get_result(conn)
                .map_err(map_diesel_error)?;

            Ok(task_from_row(inserted))
        })
        .await
    }

    async fn update_task_status(&self, task_id: TaskId, status: &str) -> RepositoryResult<Task> {
        let status = status.to_string();

        self.with_conn(move |conn| {
            let row = diesel::update(tasks::table.find(task_id.0))
                .set(tasks::status.eq(status.clone()))
                .returning(TaskRow::as_returning())
                .get_result::<TaskRow>(conn)
                .optional()
                .map_err(map_diesel_error)?;

            row.map(task_from_row)
                .ok_or_else(|| RepositoryError::NotFound(TASK_NOT_FOUND.to_string()))
        })
        .await
    }

    async fn delete_task(&self, task_id: TaskId) -> RepositoryResult<()> {
        self.with_conn(move |conn| {
            let deleted = diesel::delete(tasks::table.find(task_id.0))
                .execute(conn)
                .map_err(map_diesel_error)?;

            if deleted == 0 {
                return Err(RepositoryError::NotFound(TASK_NOT_FOUND.to_string()));
            }
            Ok(())
        })
        .await
    }
}
