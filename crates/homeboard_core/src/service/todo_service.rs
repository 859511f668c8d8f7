//! Todo use-case service.
//!
//! # Responsibility
//! - Provide the create/toggle/edit/delete entry points of a todo screen.
//! - Read back rows after writes so callers always see stored state.
//!
//! # Invariants
//! - Service APIs never bypass repository validation.
//! - Every mutation stamps `updated_at` with the current time.

use crate::model::now_epoch_ms;
use crate::model::owner::OwnerTag;
use crate::model::todo::{Todo, TodoId, TodoValidationError};
use crate::repo::todo_repo::TodoRepository;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for todo use-cases.
#[derive(Debug)]
pub enum TodoServiceError {
    /// Rejected user input (blank text, ...).
    InvalidInput(TodoValidationError),
    TodoNotFound(TodoId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for TodoServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(err) => write!(f, "{err}"),
            Self::TodoNotFound(id) => write!(f, "todo not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent todo state: {details}"),
        }
    }
}

impl Error for TodoServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidInput(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TodoServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::TodoNotFound(id),
            RepoError::TodoValidation(err) => Self::InvalidInput(err),
            other => Self::Repo(other),
        }
    }
}

impl From<TodoValidationError> for TodoServiceError {
    fn from(value: TodoValidationError) -> Self {
        Self::InvalidInput(value)
    }
}

pub type TodoServiceResult<T> = Result<T, TodoServiceError>;

/// Todo service facade over repository implementations.
pub struct TodoService<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> TodoService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists the owner's todos, most recent first.
    pub fn list(&self, owner: &OwnerTag) -> TodoServiceResult<Vec<Todo>> {
        Ok(self.repo.list_todos(owner)?)
    }

    pub fn get(&self, id: TodoId) -> TodoServiceResult<Option<Todo>> {
        Ok(self.repo.get_todo(id)?)
    }

    /// Creates one todo from raw input text.
    pub fn add(&self, owner: &OwnerTag, text: &str) -> TodoServiceResult<Todo> {
        let todo = Todo::new(owner.clone(), text)?;
        self.insert(&todo)
    }

    /// Persists a todo built by the caller (e.g. an optimistic view entry).
    pub fn insert(&self, todo: &Todo) -> TodoServiceResult<Todo> {
        let id = self.repo.create_todo(todo)?;
        self.read_back(id, "created todo not found in read-back")
    }

    /// Flips the completion flag of one todo.
    pub fn toggle(&self, id: TodoId) -> TodoServiceResult<Todo> {
        let current = self
            .repo
            .get_todo(id)?
            .ok_or(TodoServiceError::TodoNotFound(id))?;
        self.set_completed(id, !current.completed)
    }

    pub fn set_completed(&self, id: TodoId, completed: bool) -> TodoServiceResult<Todo> {
        self.repo.set_completed(id, completed, now_epoch_ms())?;
        self.read_back(id, "toggled todo not found in read-back")
    }

    /// Replaces the text of one todo; blank text is rejected.
    pub fn update_text(&self, id: TodoId, text: &str) -> TodoServiceResult<Todo> {
        self.repo.update_text(id, text, now_epoch_ms())?;
        self.read_back(id, "edited todo not found in read-back")
    }

    pub fn delete(&self, id: TodoId) -> TodoServiceResult<()> {
        self.repo.delete_todo(id)?;
        Ok(())
    }

    fn read_back(&self, id: TodoId, details: &'static str) -> TodoServiceResult<Todo> {
        self.repo
            .get_todo(id)?
            .ok_or(TodoServiceError::InconsistentState(details))
    }
}
