//! Repository implementations module.
//!
//! This module contains different implementations of the repository traits:
//! - `postgres`: PostgreSQL implementation with Diesel ORM
//! - `memory`: In-memory implementation for unit testing and local development
pub mod memory;
#[cfg(feature = "postgres-repo")]
pub mod postgres;

pub use memory::MemoryRepository;
#[cfg(feature = "postgres-repo")]
pub use postgres::{PostgresConfig, PostgresRepository};
