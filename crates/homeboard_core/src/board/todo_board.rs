//! Optimistic todo view state.
//!
//! # Responsibility
//! - Hold the list one todo screen renders, plus filter and edit session.
//! - Apply user actions locally before the backend confirms them.
//! - Roll back failed actions by re-fetching the authoritative list.
//!
//! # Invariants
//! - `items` is most-recent-first; a new item is inserted at index 0.
//! - An action touches only the targeted item.
//! - After a failed action `items` equals the backend list, or the
//!   pre-action snapshot when the re-fetch fails as well.

use crate::model::owner::OwnerTag;
use crate::model::todo::{normalize_todo_text, Todo, TodoFilter, TodoId, TodoValidationError};
use crate::repo::todo_repo::TodoRepository;
use crate::service::todo_service::{TodoService, TodoServiceError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum BoardError {
    /// Input rejected before any state change.
    InvalidInput(TodoValidationError),
    /// The id is not part of the current list.
    UnknownItem(TodoId),
    NotEditing,
    /// Backend call failed; the board has already been rolled back.
    Backend(TodoServiceError),
}

impl Display for BoardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(err) => write!(f, "{err}"),
            Self::UnknownItem(id) => write!(f, "todo is not on this board: {id}"),
            Self::NotEditing => write!(f, "no todo is being edited"),
            Self::Backend(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BoardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidInput(err) => Some(err),
            Self::Backend(err) => Some(err),
            _ => None,
        }
    }
}

pub type BoardResult<T> = Result<T, BoardError>;

/// In-progress text edit of one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub id: TodoId,
    pub draft: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BoardAction {
    Add,
    Toggle,
    Delete,
    Edit,
}

impl BoardAction {
    fn event(self) -> &'static str {
        match self {
            Self::Add => "todo_add",
            Self::Toggle => "todo_toggle",
            Self::Delete => "todo_delete",
            Self::Edit => "todo_edit",
        }
    }

    fn user_message(self) -> &'static str {
        match self {
            Self::Add => "할일 추가 중 오류가 발생했습니다.",
            Self::Toggle => "할일 상태 변경 중 오류가 발생했습니다.",
            Self::Delete => "할일 삭제 중 오류가 발생했습니다.",
            Self::Edit => "할일 수정 중 오류가 발생했습니다.",
        }
    }
}

/// View state of one owner's todo screen.
pub struct TodoBoard<R: TodoRepository> {
    service: TodoService<R>,
    owner: OwnerTag,
    items: Vec<Todo>,
    filter: TodoFilter,
    edit: Option<EditSession>,
    last_error: Option<String>,
}

impl<R: TodoRepository> TodoBoard<R> {
    /// Creates an empty board; call [`TodoBoard::refresh`] to populate it.
    pub fn new(repo: R, owner: OwnerTag) -> Self {
        Self {
            service: TodoService::new(repo),
            owner,
            items: Vec::new(),
            filter: TodoFilter::All,
            edit: None,
            last_error: None,
        }
    }

    /// Creates a board and loads the owner's list from the backend.
    pub fn load(repo: R, owner: OwnerTag) -> BoardResult<Self> {
        let mut board = Self::new(repo, owner);
        board.refresh()?;
        Ok(board)
    }

    /// Replaces local state with the backend list.
    pub fn refresh(&mut self) -> BoardResult<()> {
        match self.service.list(&self.owner) {
            Ok(items) => {
                self.set_items(items);
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event=todo_refresh module=board status=error owner={} error={}",
                    self.owner, err
                );
                self.last_error = Some("할일 목록을 불러오지 못했습니다.".to_string());
                Err(BoardError::Backend(err))
            }
        }
    }

    pub fn owner(&self) -> &OwnerTag {
        &self.owner
    }

    /// Every item, most recent first.
    pub fn items(&self) -> &[Todo] {
        &self.items
    }

    /// Items passing the current filter.
    pub fn visible(&self) -> Vec<&Todo> {
        self.items
            .iter()
            .filter(|todo| self.filter.matches(todo))
            .collect()
    }

    pub fn filter(&self) -> TodoFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: TodoFilter) {
        self.filter = filter;
    }

    /// Number of incomplete items ("남은 할 일").
    pub fn active_count(&self) -> usize {
        self.items.iter().filter(|todo| !todo.completed).count()
    }

    /// Message from the last failed action, cleared by the next action.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn editing(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    /// Adds a todo at the top of the list, then persists it.
    pub fn add(&mut self, text: &str) -> BoardResult<TodoId> {
        self.last_error = None;
        let todo = Todo::new(self.owner.clone(), text).map_err(BoardError::InvalidInput)?;
        let id = todo.id;

        let snapshot = self.items.clone();
        self.items.insert(0, todo.clone());

        match self.service.insert(&todo) {
            Ok(stored) => {
                self.replace(stored);
                info!(
                    "event=todo_add module=board status=ok owner={} todo_id={}",
                    self.owner, id
                );
                Ok(id)
            }
            Err(err) => Err(self.roll_back(BoardAction::Add, snapshot, err)),
        }
    }

    /// Flips the completion flag of one item, then persists it.
    pub fn toggle(&mut self, id: TodoId) -> BoardResult<()> {
        self.last_error = None;
        let index = self.position(id).ok_or(BoardError::UnknownItem(id))?;

        let snapshot = self.items.clone();
        let completed = !self.items[index].completed;
        self.items[index].completed = completed;

        match self.service.set_completed(id, completed) {
            Ok(stored) => {
                self.replace(stored);
                Ok(())
            }
            Err(err) => Err(self.roll_back(BoardAction::Toggle, snapshot, err)),
        }
    }

    /// Removes one item, then deletes it in the backend.
    pub fn delete(&mut self, id: TodoId) -> BoardResult<()> {
        self.last_error = None;
        let index = self.position(id).ok_or(BoardError::UnknownItem(id))?;

        let snapshot = self.items.clone();
        self.items.remove(index);
        if self.edit.as_ref().is_some_and(|edit| edit.id == id) {
            self.edit = None;
        }

        match self.service.delete(id) {
            Ok(()) => Ok(()),
            Err(err) => Err(self.roll_back(BoardAction::Delete, snapshot, err)),
        }
    }

    /// Replaces the text of one item, then persists it.
    pub fn update_text(&mut self, id: TodoId, text: &str) -> BoardResult<()> {
        self.last_error = None;
        let text = normalize_todo_text(text).map_err(BoardError::InvalidInput)?;
        let index = self.position(id).ok_or(BoardError::UnknownItem(id))?;

        let snapshot = self.items.clone();
        self.items[index].text = text.clone();

        match self.service.update_text(id, &text) {
            Ok(stored) => {
                self.replace(stored);
                Ok(())
            }
            Err(err) => Err(self.roll_back(BoardAction::Edit, snapshot, err)),
        }
    }

    /// Starts editing one item with its current text as draft.
    pub fn begin_edit(&mut self, id: TodoId) -> BoardResult<()> {
        let index = self.position(id).ok_or(BoardError::UnknownItem(id))?;
        self.edit = Some(EditSession {
            id,
            draft: self.items[index].text.clone(),
        });
        Ok(())
    }

    pub fn set_draft(&mut self, text: impl Into<String>) -> BoardResult<()> {
        let edit = self.edit.as_mut().ok_or(BoardError::NotEditing)?;
        edit.draft = text.into();
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }

    /// Saves the draft; the session stays open when saving fails.
    pub fn save_edit(&mut self) -> BoardResult<()> {
        let edit = self.edit.clone().ok_or(BoardError::NotEditing)?;
        self.update_text(edit.id, &edit.draft)?;
        self.edit = None;
        Ok(())
    }

    fn position(&self, id: TodoId) -> Option<usize> {
        self.items.iter().position(|todo| todo.id == id)
    }

    /// Installs a new item list; an edit session on a vanished item ends.
    fn set_items(&mut self, items: Vec<Todo>) {
        self.items = items;
        let stale = self
            .edit
            .as_ref()
            .is_some_and(|edit| self.position(edit.id).is_none());
        if stale {
            self.edit = None;
        }
    }

    fn replace(&mut self, stored: Todo) {
        if let Some(index) = self.position(stored.id) {
            self.items[index] = stored;
        }
    }

    fn roll_back(
        &mut self,
        action: BoardAction,
        snapshot: Vec<Todo>,
        err: TodoServiceError,
    ) -> BoardError {
        warn!(
            "event={} module=board status=error owner={} error={}",
            action.event(),
            self.owner,
            err
        );
        self.last_error = Some(action.user_message().to_string());

        match self.service.list(&self.owner) {
            Ok(items) => self.set_items(items),
            Err(refetch_err) => {
                warn!(
                    "event=todo_refresh module=board status=error owner={} error={}",
                    self.owner, refetch_err
                );
                self.set_items(snapshot);
            }
        }
        BoardError::Backend(err)
    }
}
