//! Domain entities and their input payload shapes.
//!
//! Entities carry repository-assigned IDs; the `New*`/`*Update` structs are
//! the validated inputs the service layer hands to a repository. Optional
//! fields are omitted from serialized output when absent.

use serde::{Deserialize, Serialize};

/// Initial status assigned to every newly created task.
pub const DEFAULT_TASK_STATUS: &str = "pending";

/// A registered user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier assigned by the repository
    pub id: i64,
    /// Display name, always non-empty
    pub name: String,
    /// Contact email, present only when supplied at creation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A task belonging to a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier assigned by the repository
    pub id: i64,
    /// Owning user's ID (not verified by this layer)
    pub user_id: i64,
    /// Short task title, always non-empty
    pub title: String,
    /// Free-form details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Current status, starts as [`DEFAULT_TASK_STATUS`]
    pub status: String,
}

/// Validated payload for creating a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: Option<String>,
}

/// Validated payload for a full user update.
///
/// Updates use replace semantics: the stored name is overwritten and any
/// stored email is cleared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserUpdate {
    pub name: String,
}

/// Validated payload for creating a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTask {
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_serializes_without_empty_email() {
        let user = User {
            id: 1,
            name: "Alice".to_string(),
            email: None,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json, serde_json::json!({"id": 1, "name": "Alice"}));
    }

    #[test]
    fn test_user_serializes_with_email() {
        let user = User {
            id: 2,
            name: "Bob".to_string(),
            email: Some("bob@example.com".to_string()),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["email"], "bob@example.com");
    }

    #[test]
    fn test_task_serializes_without_empty_description() {
        let task = Task {
            id: 1,
            user_id: 1,
            title: "Write report".to_string(),
            description: None,
            status: DEFAULT_TASK_STATUS.to_string(),
        };
        let json = serde_json::to_value(&task).unwrap();
        assert!(json.get("description").is_none());
        assert_eq!(json["status"], "pending");
    }
}
