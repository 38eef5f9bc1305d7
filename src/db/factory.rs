//! Backend selection and construction.
//!
//! Everything that turns deployment configuration into a live repository
//! lives here. The rest of the crate only ever sees the
//! `Arc<dyn FullRepository>` that comes out; which backend sits behind it
//! is decided once, at startup, by the caller.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use super::repo_config::RepositoryConfig;
use super::repositories::MemoryRepository;
#[cfg(feature = "postgres-repo")]
use super::repositories::PostgresRepository;
use super::repository::{FullRepository, RepositoryError, RepositoryResult};
use super::PostgresConfig;

/// Which backing store the server runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// Diesel + r2d2 against a PostgreSQL database
    Postgres,
    /// Process-local store for development and tests
    Memory,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Parse a backend name as written in `REPOSITORY_TYPE` or
    /// `repository.toml`.
    ///
    /// Accepts `"postgres"`/`"pg"` and `"memory"`/`"mem"`, in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "pg" => Ok(Self::Postgres),
            "memory" | "mem" => Ok(Self::Memory),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl RepositoryType {
    /// Resolve the backend from the environment.
    ///
    /// `REPOSITORY_TYPE` wins when set; an unrecognized value falls back
    /// to the in-memory store. Without it, the presence of `DATABASE_URL`
    /// or `PG_DATABASE_URL` selects Postgres, and an unconfigured process
    /// gets the in-memory store.
    pub fn from_env() -> Self {
        if let Ok(raw) = std::env::var("REPOSITORY_TYPE") {
            return raw.parse().unwrap_or(Self::Memory);
        }

        let has_database_url =
            std::env::var("DATABASE_URL").is_ok() || std::env::var("PG_DATABASE_URL").is_ok();
        if has_database_url {
            Self::Postgres
        } else {
            Self::Memory
        }
    }
}

/// Constructs the repository the rest of the crate runs against.
///
/// All construction paths end in an `Arc<dyn FullRepository>`, so the
/// transport layer never learns which backend it holds. Nothing is stored
/// globally; the caller owns the handle and threads it through state.
///
/// # Example
/// ```ignore
/// use taskman::db::{RepositoryFactory, RepositoryType};
///
/// // Local development: users and tasks live in process memory.
/// let repo = RepositoryFactory::create(RepositoryType::Memory, None).await?;
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Construct a repository of the given type.
    ///
    /// # Arguments
    /// * `repo_type` - Backend to construct
    /// * `postgres_config` - Connection settings, required when the type
    ///   is [`RepositoryType::Postgres`]
    ///
    /// # Returns
    /// * `Ok(Arc<dyn FullRepository>)` - Ready repository handle
    /// * `Err(RepositoryError)` - Missing settings, a compiled-out
    ///   backend, or a failed connection
    pub async fn create(
        repo_type: RepositoryType,
        postgres_config: Option<&PostgresConfig>,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        match repo_type {
            RepositoryType::Postgres => Self::postgres_backend(postgres_config).await,
            RepositoryType::Memory => Ok(Self::create_memory()),
        }
    }

    /// Construct the Diesel/Postgres repository from explicit settings.
    ///
    /// Fails fast if the connection pool cannot be established.
    #[cfg(feature = "postgres-repo")]
    pub async fn create_postgres(
        config: &PostgresConfig,
    ) -> RepositoryResult<Arc<PostgresRepository>> {
        Ok(Arc::new(PostgresRepository::new(config.clone())?))
    }

    /// Construct the in-memory repository.
    ///
    /// Starts empty; seeding demo data is the server binary's concern.
    pub fn create_memory() -> Arc<dyn FullRepository> {
        Arc::new(MemoryRepository::new())
    }

    /// Construct the repository selected by the environment.
    ///
    /// Combines [`RepositoryType::from_env`] with connection settings
    /// read from the environment when the Postgres backend is selected.
    ///
    /// # Returns
    /// * `Ok(Arc<dyn FullRepository>)` - Ready repository handle
    /// * `Err(RepositoryError)` - If construction fails
    pub async fn from_env() -> RepositoryResult<Arc<dyn FullRepository>> {
        match RepositoryType::from_env() {
            RepositoryType::Memory => Ok(Self::create_memory()),
            RepositoryType::Postgres => {
                #[cfg(feature = "postgres-repo")]
                {
                    let config =
                        PostgresConfig::from_env().map_err(RepositoryError::Configuration)?;
                    Self::postgres_backend(Some(&config)).await
                }
                #[cfg(not(feature = "postgres-repo"))]
                {
                    Self::postgres_backend(None).await
                }
            }
        }
    }

    /// Construct the repository described by a `repository.toml` file.
    ///
    /// # Arguments
    /// * `config_path` - Path to the TOML file
    ///
    /// # Returns
    /// * `Ok(Arc<dyn FullRepository>)` - Ready repository handle
    /// * `Err(RepositoryError)` - Unreadable file, invalid contents, or a
    ///   failed connection
    pub async fn from_config_file<P: AsRef<Path>>(
        config_path: P,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        let config = RepositoryConfig::from_file(config_path)?;
        let repo_type = config.repository_type().map_err(|e| {
            RepositoryError::Configuration(format!("Invalid repository type: {}", e))
        })?;

        match repo_type {
            RepositoryType::Memory => Ok(Self::create_memory()),
            RepositoryType::Postgres => {
                #[cfg(feature = "postgres-repo")]
                {
                    let pg_config = config.to_postgres_config()?.ok_or_else(|| {
                        RepositoryError::Configuration(
                            "Postgres repository requires database configuration".to_string(),
                        )
                    })?;
                    Self::postgres_backend(Some(&pg_config)).await
                }
                #[cfg(not(feature = "postgres-repo"))]
                {
                    Self::postgres_backend(None).await
                }
            }
        }
    }

    /// Postgres arm shared by every construction path.
    #[cfg(feature = "postgres-repo")]
    async fn postgres_backend(
        config: Option<&PostgresConfig>,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        let config = config.ok_or_else(|| {
            RepositoryError::Configuration(
                "Postgres repository requires PostgresConfig".to_string(),
            )
        })?;
        let repo: Arc<dyn FullRepository> = Self::create_postgres(config).await?;
        Ok(repo)
    }

    /// Every Postgres construction path lands here when the feature is
    /// compiled out.
    #[cfg(not(feature = "postgres-repo"))]
    async fn postgres_backend(
        _config: Option<&PostgresConfig>,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        Err(RepositoryError::Configuration(
            "Postgres repository feature not enabled".to_string(),
        ))
    }
}

/// Fluent construction for callers that choose the backend in code.
///
/// The factory functions read everything from the environment or a file;
/// the builder is for callers that already hold the pieces.
///
/// # Example
/// ```ignore
/// use taskman::db::{RepositoryBuilder, RepositoryType};
///
/// let repo = RepositoryBuilder::new()
///     .repository_type(RepositoryType::Memory)
///     .build()
///     .await?;
/// ```
pub struct RepositoryBuilder {
    repo_type: RepositoryType,
    #[cfg(feature = "postgres-repo")]
    postgres_config: Option<PostgresConfig>,
}

impl RepositoryBuilder {
    /// Start from the environment's backend selection.
    pub fn new() -> Self {
        Self {
            repo_type: RepositoryType::from_env(),
            #[cfg(feature = "postgres-repo")]
            postgres_config: None,
        }
    }

    /// Override the backend to construct.
    pub fn repository_type(mut self, repo_type: RepositoryType) -> Self {
        self.repo_type = repo_type;
        self
    }

    /// Supply connection settings for the Postgres backend.
    #[cfg(feature = "postgres-repo")]
    pub fn postgres_config(mut self, config: PostgresConfig) -> Self {
        self.postgres_config = Some(config);
        self
    }

    /// Construct the configured repository.
    pub async fn build(self) -> RepositoryResult<Arc<dyn FullRepository>> {
        #[cfg(feature = "postgres-repo")]
        let config = self.postgres_config.as_ref();
        #[cfg(not(feature = "postgres-repo"))]
        let config = None;

        RepositoryFactory::create(self.repo_type, config).await
    }
}

impl Default for RepositoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
