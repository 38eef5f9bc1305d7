//! # Taskman Backend
//!
//! REST backend for managing users and their tasks.
//!
//! This crate provides a resource-oriented HTTP service built on Axum, with a
//! repository pattern that keeps the business logic independent of the storage
//! backend. Requests flow through a uniform pipeline: request logging, JSON
//! body parsing, route dispatch, payload validation, and a single centralized
//! translation of domain errors into HTTP responses.
//!
//! ## Features
//!
//! - **User CRUD**: create, list, fetch, full-update, and delete users
//! - **Task management**: per-user tasks with status tracking (library-level)
//! - **Pluggable storage**: in-memory repository or PostgreSQL via Diesel,
//!   selected by cargo feature and runtime configuration
//! - **Typed errors**: a closed error taxonomy translated to HTTP statuses at
//!   one boundary, with internal detail kept out of response bodies
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Identifier newtypes and the public data types
//! - [`models`]: Domain entities and their input payload shapes
//! - [`services`]: Input validation rules and creation policy
//! - [`db`]: Repository traits, storage backends, and the service layer
//! - [`http`]: Axum-based HTTP server and request handlers
//!

pub mod api;

pub mod db;
pub mod models;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
