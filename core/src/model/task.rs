use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Task priority with a fixed sort order: High before Medium before Low.
///
/// `Other` holds a value read from a task file this build does not know.
/// It round-trips verbatim and sorts after every known priority.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    High,
    Medium,
    Low,
    Other(String),
}

impl Priority {
    /// Sort rank, ascending. Unrecognized values rank last.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
            Priority::Other(_) => 4,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
            Priority::Other(s) => s,
        }
    }

    /// Case-insensitive label comparison, used by the store filter.
    pub fn matches(&self, label: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(label)
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl From<String> for Priority {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "high" => Priority::High,
            "medium" => Priority::Medium,
            "low" => Priority::Low,
            _ => Priority::Other(value),
        }
    }
}

impl From<Priority> for String {
    fn from(value: Priority) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single tracked task. The id is the task's identity: two tasks with
/// identical fields are still distinct entities.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Task {
    pub id: Uuid,
    pub description: String,
    pub priority: Priority,
    pub due: NaiveDate,
    pub completed: bool,
}

impl Task {
    pub fn new(description: String, priority: Priority, due: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            description,
            priority,
            due,
            completed: false,
        }
    }

    pub fn complete(&mut self) {
        self.completed = true;
    }

    pub fn reopen(&mut self) {
        self.completed = false;
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.completed {
            write!(
                f,
                "[✔] [{}] {} (Due: {})",
                self.priority, self.description, self.due
            )
        } else {
            write!(f, "[{}] {} (Due: {})", self.priority, self.description, self.due)
        }
    }
}

/// Parses a user-supplied due date, strictly `YYYY-MM-DD`.
pub fn parse_due_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|source| Error::InvalidDate {
        input: input.to_string(),
        source,
    })
}
