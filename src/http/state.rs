//! Application state for the HTTP server.

use crate::db::repository::FullRepository;
use crate::services::CreatePolicy;
use std::sync::Arc;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for storage operations
    pub repository: Arc<dyn FullRepository>,
    /// Which fields a user create payload must carry
    pub create_policy: CreatePolicy,
}

impl AppState {
    /// Create a new application state with the given repository.
    pub fn new(repository: Arc<dyn FullRepository>) -> Self {
        Self {
            repository,
            create_policy: CreatePolicy::default(),
        }
    }

    /// Override the user creation policy.
    pub fn with_create_policy(mut self, policy: CreatePolicy) -> Self {
        self.create_policy = policy;
        self
    }
}
