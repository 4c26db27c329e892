//! Todo record types and schema validation.

use serde::{Deserialize, Serialize};

/// Priority levels for a todo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// High priority.
    High,
    /// Medium priority.
    Medium,
    /// Low priority.
    Low,
}

impl Priority {
    /// Parse a priority from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not one of `high`, `medium`, `low`.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, ValidationError> {
        match s.to_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(ValidationError::InvalidPriority(s.to_string())),
        }
    }

    /// Get the string representation of the priority.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error produced when a candidate record fails schema validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The task text is empty or whitespace.
    EmptyTask,
    /// The priority string is outside the high/medium/low enumeration.
    InvalidPriority(String),
    /// `completed_at` does not agree with the `completed` flag.
    CompletedAtMismatch {
        /// The value of the `completed` flag at validation time.
        completed: bool,
    },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTask => write!(f, "task text must not be empty"),
            Self::InvalidPriority(s) => {
                write!(f, "invalid priority: '{s}' (must be one of: high, medium, low)")
            }
            Self::CompletedAtMismatch { completed } => write!(
                f,
                "completedAt must be {} when completed is {completed}",
                if *completed { "present" } else { "absent" }
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

/// A todo record.
///
/// Serialized with camelCase field names, which is the wire format both
/// front ends expose. `task` text is a secondary lookup key and is NOT
/// unique across records; `id` is the identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Unique identifier (slug from task text + 4 random hex chars).
    pub id: String,
    /// The task description.
    pub task: String,
    /// Whether the task is completed.
    pub completed: bool,
    /// RFC 3339 timestamp when the todo was created.
    pub created_at: String,
    /// RFC 3339 timestamp when the todo was last updated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// RFC 3339 timestamp when the todo was marked complete.
    /// Present if and only if `completed` is true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    /// Assignee identifier for agent coordination.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    /// Priority level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// Estimated time to complete in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<u32>,
    /// Actual time spent in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_minutes: Option<u32>,
    /// Parent todo id for hierarchical breakdown (not validated for existence).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_task_id: Option<String>,
    /// Tags for categorization, in insertion order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl Todo {
    /// Validate the record against the schema invariants.
    ///
    /// Pure, no side effects; called on every write path before persistence.
    ///
    /// # Errors
    ///
    /// Returns an error when the task text is empty or the
    /// completed/`completed_at` invariant does not hold.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.task.trim().is_empty() {
            return Err(ValidationError::EmptyTask);
        }
        if self.completed != self.completed_at.is_some() {
            return Err(ValidationError::CompletedAtMismatch { completed: self.completed });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_todo() -> Todo {
        Todo {
            id: "buy-milk-0000".to_string(),
            task: "Buy milk".to_string(),
            completed: false,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: None,
            completed_at: None,
            assigned_to: None,
            priority: None,
            estimated_minutes: None,
            actual_minutes: None,
            parent_task_id: None,
            tags: None,
        }
    }

    #[test]
    fn test_priority_from_str() {
        assert_eq!(Priority::from_str("high").unwrap(), Priority::High);
        assert_eq!(Priority::from_str("HIGH").unwrap(), Priority::High);
        assert_eq!(Priority::from_str("medium").unwrap(), Priority::Medium);
        assert_eq!(Priority::from_str("low").unwrap(), Priority::Low);
        assert!(Priority::from_str("urgent").is_err());
        assert!(Priority::from_str("").is_err());
    }

    #[test]
    fn test_priority_as_str_round_trips() {
        for p in [Priority::High, Priority::Medium, Priority::Low] {
            assert_eq!(Priority::from_str(p.as_str()).unwrap(), p);
        }
    }

    #[test]
    fn test_priority_display() {
        assert_eq!(Priority::High.to_string(), "high");
        assert_eq!(Priority::Low.to_string(), "low");
    }

    #[test]
    fn test_invalid_priority_display() {
        let err = ValidationError::InvalidPriority("urgent".to_string());
        assert!(err.to_string().contains("urgent"));
        assert!(err.to_string().contains("high"));
    }

    #[test]
    fn test_validate_accepts_minimal_todo() {
        assert!(sample_todo().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_task() {
        let mut todo = sample_todo();
        todo.task = String::new();
        assert_eq!(todo.validate(), Err(ValidationError::EmptyTask));

        todo.task = "   ".to_string();
        assert_eq!(todo.validate(), Err(ValidationError::EmptyTask));
    }

    #[test]
    fn test_validate_enforces_completed_at_invariant() {
        let mut todo = sample_todo();
        todo.completed = true;
        assert_eq!(todo.validate(), Err(ValidationError::CompletedAtMismatch { completed: true }));

        todo.completed_at = Some("2024-01-02T00:00:00Z".to_string());
        assert!(todo.validate().is_ok());

        todo.completed = false;
        assert_eq!(todo.validate(), Err(ValidationError::CompletedAtMismatch { completed: false }));
    }

    #[test]
    fn test_serialization_uses_camel_case_and_omits_absent_fields() {
        let mut todo = sample_todo();
        todo.assigned_to = Some("agent-1".to_string());
        todo.estimated_minutes = Some(45);

        let json = serde_json::to_string(&todo).unwrap();
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"assignedTo\":\"agent-1\""));
        assert!(json.contains("\"estimatedMinutes\":45"));
        assert!(!json.contains("completedAt"));
        assert!(!json.contains("parentTaskId"));
    }

    #[test]
    fn test_todo_round_trips_through_json() {
        let todo = Todo {
            priority: Some(Priority::High),
            tags: Some(vec!["feature".to_string(), "security".to_string()]),
            parent_task_id: Some("parent-abcd".to_string()),
            ..sample_todo()
        };

        let json = serde_json::to_string(&todo).unwrap();
        let parsed: Todo = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, todo);
    }
}
