//! Todo repository contract and SQLite implementation.
//!
//! # Invariants
//! - Lists are per owner and most-recent-first: `created_at DESC`, with
//!   insertion order (`seq DESC`) breaking ties.
//! - `updated_at` never moves below `created_at`.

use crate::model::owner::OwnerTag;
use crate::model::todo::{normalize_todo_text, Todo, TodoId};
use crate::repo::{
    bool_to_int, ensure_connection_ready, parse_bool, parse_owner, parse_uuid, RepoError,
    RepoResult,
};
use rusqlite::{params, Connection, Row};

const TODO_SELECT_SQL: &str = "SELECT
    uuid,
    owner,
    text,
    completed,
    created_at,
    updated_at
FROM todos";

/// Repository interface for todo CRUD operations.
pub trait TodoRepository {
    fn create_todo(&self, todo: &Todo) -> RepoResult<TodoId>;
    fn get_todo(&self, id: TodoId) -> RepoResult<Option<Todo>>;
    /// Returns the owner's todos, most recent first.
    fn list_todos(&self, owner: &OwnerTag) -> RepoResult<Vec<Todo>>;
    fn set_completed(&self, id: TodoId, completed: bool, updated_at: i64) -> RepoResult<()>;
    fn update_text(&self, id: TodoId, text: &str, updated_at: i64) -> RepoResult<()>;
    fn delete_todo(&self, id: TodoId) -> RepoResult<()>;
}

impl<R: TodoRepository + ?Sized> TodoRepository for &R {
    fn create_todo(&self, todo: &Todo) -> RepoResult<TodoId> {
        (**self).create_todo(todo)
    }

    fn get_todo(&self, id: TodoId) -> RepoResult<Option<Todo>> {
        (**self).get_todo(id)
    }

    fn list_todos(&self, owner: &OwnerTag) -> RepoResult<Vec<Todo>> {
        (**self).list_todos(owner)
    }

    fn set_completed(&self, id: TodoId, completed: bool, updated_at: i64) -> RepoResult<()> {
        (**self).set_completed(id, completed, updated_at)
    }

    fn update_text(&self, id: TodoId, text: &str, updated_at: i64) -> RepoResult<()> {
        (**self).update_text(id, text, updated_at)
    }

    fn delete_todo(&self, id: TodoId) -> RepoResult<()> {
        (**self).delete_todo(id)
    }
}

/// SQLite-backed todo repository.
pub struct SqliteTodoRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTodoRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl TodoRepository for SqliteTodoRepository<'_> {
    fn create_todo(&self, todo: &Todo) -> RepoResult<TodoId> {
        todo.validate()?;

        self.conn.execute(
            "INSERT INTO todos (
                uuid,
                owner,
                text,
                completed,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                todo.id.to_string(),
                todo.owner.as_str(),
                todo.text.as_str(),
                bool_to_int(todo.completed),
                todo.created_at,
                todo.updated_at,
            ],
        )?;

        Ok(todo.id)
    }

    fn get_todo(&self, id: TodoId) -> RepoResult<Option<Todo>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TODO_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_todo_row(row)?));
        }
        Ok(None)
    }

    fn list_todos(&self, owner: &OwnerTag) -> RepoResult<Vec<Todo>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TODO_SELECT_SQL}
             WHERE owner = ?1
             ORDER BY created_at DESC, seq DESC;"
        ))?;
        let mut rows = stmt.query([owner.as_str()])?;
        let mut todos = Vec::new();
        while let Some(row) = rows.next()? {
            todos.push(parse_todo_row(row)?);
        }
        Ok(todos)
    }

    fn set_completed(&self, id: TodoId, completed: bool, updated_at: i64) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE todos
             SET
                completed = ?2,
                updated_at = MAX(created_at, ?3)
             WHERE uuid = ?1;",
            params![id.to_string(), bool_to_int(completed), updated_at],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn update_text(&self, id: TodoId, text: &str, updated_at: i64) -> RepoResult<()> {
        let text = normalize_todo_text(text)?;
        let changed = self.conn.execute(
            "UPDATE todos
             SET
                text = ?2,
                updated_at = MAX(created_at, ?3)
             WHERE uuid = ?1;",
            params![id.to_string(), text, updated_at],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn delete_todo(&self, id: TodoId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM todos WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

fn parse_todo_row(row: &Row<'_>) -> RepoResult<Todo> {
    let uuid_text: String = row.get("uuid")?;
    let todo = Todo {
        id: parse_uuid(&uuid_text, "todos.uuid")?,
        owner: parse_owner(row.get("owner")?, "todos.owner")?,
        text: row.get("text")?,
        completed: parse_bool(row.get("completed")?, "todos.completed")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    todo.validate()?;
    Ok(todo)
}
