use homeboard_core::db::open_db_in_memory;
use homeboard_core::{
    OwnerTag, RepoError, SqliteTodoRepository, Todo, TodoRepository, TodoService,
    TodoServiceError, TodoValidationError,
};
use uuid::Uuid;

fn owner(tag: &str) -> OwnerTag {
    OwnerTag::new(tag).unwrap()
}

#[test]
fn add_then_list_puts_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());
    let dad = owner("dad");

    let first = service.add(&dad, "buy milk").unwrap();
    let second = service.add(&dad, "  fix bike  ").unwrap();

    let listed = service.list(&dad).unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, second.id);
    assert_eq!(listed[0].text, "fix bike");
    assert_eq!(listed[1].id, first.id);
    assert!(listed.iter().all(|todo| !todo.completed));
}

#[test]
fn lists_are_scoped_by_owner() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());

    service.add(&owner("dad"), "dad's task").unwrap();
    service.add(&owner("gyubaek"), "homework").unwrap();

    let listed = service.list(&owner("gyubaek")).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].text, "homework");
}

#[test]
fn blank_text_is_rejected_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());
    let dad = owner("dad");

    let err = service.add(&dad, "   ").unwrap_err();
    assert!(matches!(
        err,
        TodoServiceError::InvalidInput(TodoValidationError::BlankText)
    ));
    assert!(service.list(&dad).unwrap().is_empty());
}

#[test]
fn toggle_flips_only_the_target() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());
    let dad = owner("dad");
    let a = service.add(&dad, "a").unwrap();
    let b = service.add(&dad, "b").unwrap();

    let toggled = service.toggle(a.id).unwrap();
    assert!(toggled.completed);
    assert!(toggled.updated_at >= a.updated_at);
    assert!(!service.get(b.id).unwrap().unwrap().completed);

    let back = service.toggle(a.id).unwrap();
    assert!(!back.completed);
}

#[test]
fn update_text_trims_and_rejects_blank() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());
    let todo = service.add(&owner("mom"), "draft").unwrap();

    let edited = service.update_text(todo.id, "  final  ").unwrap();
    assert_eq!(edited.text, "final");

    assert!(matches!(
        service.update_text(todo.id, ""),
        Err(TodoServiceError::InvalidInput(_))
    ));
    assert_eq!(service.get(todo.id).unwrap().unwrap().text, "final");
}

#[test]
fn delete_removes_exactly_one_row() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());
    let dad = owner("dad");
    let keep = service.add(&dad, "keep").unwrap();
    let drop_me = service.add(&dad, "drop").unwrap();

    service.delete(drop_me.id).unwrap();

    let listed = service.list(&dad).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, keep.id);
    assert!(matches!(
        service.delete(drop_me.id),
        Err(TodoServiceError::TodoNotFound(id)) if id == drop_me.id
    ));
}

#[test]
fn repository_reports_missing_rows() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    let missing = Uuid::new_v4();

    assert!(repo.get_todo(missing).unwrap().is_none());
    assert!(matches!(
        repo.set_completed(missing, true, 1),
        Err(RepoError::NotFound(id)) if id == missing
    ));
    assert!(matches!(
        repo.update_text(missing, "x", 1),
        Err(RepoError::NotFound(_))
    ));
}

#[test]
fn duplicate_ids_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    let todo = Todo::new(owner("dad"), "once").unwrap();

    repo.create_todo(&todo).unwrap();
    assert!(repo.create_todo(&todo).is_err());
}

#[test]
fn repository_requires_migrated_connection() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    assert!(SqliteTodoRepository::try_new(&conn).is_err());
}
