//! Todo item domain model.
//!
//! # Responsibility
//! - Define the row shown by every todo screen.
//! - Normalize todo text once, before it reaches storage.
//!
//! # Invariants
//! - `text` is trimmed and never empty.
//! - `updated_at >= created_at`.

use crate::model::now_epoch_ms;
use crate::model::owner::OwnerTag;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier of a todo row.
pub type TodoId = Uuid;

/// One todo entry owned by a family member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub owner: OwnerTag,
    pub text: String,
    pub completed: bool,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds, bumped by every mutation.
    pub updated_at: i64,
}

/// Validation errors for todo rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoValidationError {
    NilId,
    BlankText,
    TimestampOrder { created_at: i64, updated_at: i64 },
}

impl Display for TodoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "todo id must not be nil"),
            Self::BlankText => write!(f, "todo text must not be blank"),
            Self::TimestampOrder {
                created_at,
                updated_at,
            } => write!(
                f,
                "todo updated_at ({updated_at}) must not be earlier than created_at ({created_at})"
            ),
        }
    }
}

impl Error for TodoValidationError {}

impl Todo {
    /// Creates a new incomplete todo with a generated id and current time.
    pub fn new(owner: OwnerTag, text: &str) -> Result<Self, TodoValidationError> {
        let text = normalize_todo_text(text)?;
        let now = now_epoch_ms();
        Ok(Self {
            id: Uuid::new_v4(),
            owner,
            text,
            completed: false,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn validate(&self) -> Result<(), TodoValidationError> {
        if self.id.is_nil() {
            return Err(TodoValidationError::NilId);
        }
        if self.text.trim().is_empty() {
            return Err(TodoValidationError::BlankText);
        }
        if self.updated_at < self.created_at {
            return Err(TodoValidationError::TimestampOrder {
                created_at: self.created_at,
                updated_at: self.updated_at,
            });
        }
        Ok(())
    }
}

/// Trims todo text and rejects blank input.
pub fn normalize_todo_text(text: &str) -> Result<String, TodoValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TodoValidationError::BlankText);
    }
    Ok(trimmed.to_string())
}

/// List filter offered by todo screens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoFilter {
    #[default]
    All,
    /// Incomplete items only.
    Active,
    Completed,
}

impl TodoFilter {
    pub fn matches(self, todo: &Todo) -> bool {
        match self {
            Self::All => true,
            Self::Active => !todo.completed,
            Self::Completed => todo.completed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    /// Message shown when the filtered list is empty.
    pub fn empty_message(self) -> &'static str {
        match self {
            Self::All => "할 일이 없습니다.",
            Self::Active => "미완료된 할 일이 없습니다.",
            Self::Completed => "완료된 할 일이 없습니다.",
        }
    }
}

impl FromStr for TodoFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" | "done" => Ok(Self::Completed),
            other => Err(format!(
                "unsupported todo filter `{other}`; expected all|active|completed"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_todo_text, Todo, TodoFilter, TodoValidationError};
    use crate::model::owner::OwnerTag;

    fn owner() -> OwnerTag {
        OwnerTag::new("gyubaek").unwrap()
    }

    #[test]
    fn new_todo_is_trimmed_and_incomplete() {
        let todo = Todo::new(owner(), "  buy milk ").unwrap();
        assert_eq!(todo.text, "buy milk");
        assert!(!todo.completed);
        assert_eq!(todo.created_at, todo.updated_at);
        assert!(todo.validate().is_ok());
    }

    #[test]
    fn blank_text_is_rejected() {
        assert_eq!(
            normalize_todo_text("   ").unwrap_err(),
            TodoValidationError::BlankText
        );
        assert!(Todo::new(owner(), "\n").is_err());
    }

    #[test]
    fn validate_rejects_reversed_timestamps() {
        let mut todo = Todo::new(owner(), "x").unwrap();
        todo.updated_at = todo.created_at - 1;
        assert!(matches!(
            todo.validate(),
            Err(TodoValidationError::TimestampOrder { .. })
        ));
    }

    #[test]
    fn filter_matches_completion_state() {
        let mut todo = Todo::new(owner(), "x").unwrap();
        assert!(TodoFilter::All.matches(&todo));
        assert!(TodoFilter::Active.matches(&todo));
        assert!(!TodoFilter::Completed.matches(&todo));

        todo.completed = true;
        assert!(!TodoFilter::Active.matches(&todo));
        assert!(TodoFilter::Completed.matches(&todo));
    }

    #[test]
    fn filter_parses_labels() {
        assert_eq!("Active".parse::<TodoFilter>().unwrap(), TodoFilter::Active);
        assert_eq!("done".parse::<TodoFilter>().unwrap(), TodoFilter::Completed);
        assert_eq!("".parse::<TodoFilter>().unwrap(), TodoFilter::All);
        assert!("later".parse::<TodoFilter>().is_err());
    }
}
