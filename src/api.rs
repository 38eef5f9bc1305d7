//! Public API surface for the taskman backend.
//!
//! This module exposes the identifier newtypes used throughout the crate and
//! re-exports the domain entities so application code can depend on a single
//! import path.

pub use crate::models::{NewTask, NewUser, Task, User, UserUpdate, DEFAULT_TASK_STATUS};

use serde::{Deserialize, Serialize};

/// User identifier (repository-assigned primary key).
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct UserId(pub i64);

/// Task identifier (repository-assigned primary key).
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TaskId(pub i64);

impl UserId {
    pub fn new(value: i64) -> Self {
        UserId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl TaskId {
    pub fn new(value: i64) -> Self {
        TaskId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for i64 {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl From<TaskId> for i64 {
    fn from(id: TaskId) -> Self {
        id.0
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        UserId(value)
    }
}

impl From<i64> for TaskId {
    fn from(value: i64) -> Self {
        TaskId(value)
    }
}
