//! Tests for database error types.

use crate::db::{DbError, DbResult};

#[test]
fn not_found_error_displays_correctly() {
    let err = DbError::NotFound {
        collection: "todo_lists".to_string(),
        id: "abc12345".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Document not found: todo_lists with id 'abc12345'"
    );
}

#[test]
fn already_exists_error_displays_correctly() {
    let err = DbError::AlreadyExists {
        collection: "todo_items".to_string(),
        id: "xyz78901".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Document already exists: todo_items with id 'xyz78901'"
    );
}

#[test]
fn invalid_data_error_includes_hint() {
    let err = DbError::InvalidData {
        message: "field name 'a.b' is not supported".to_string(),
        help: "use plain field names".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Invalid data: field name 'a.b' is not supported (hint: use plain field names)"
    );
}

#[test]
fn connection_error_displays_correctly() {
    let err = DbError::Connection {
        message: "unable to open database file".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Connection error: unable to open database file"
    );
}

#[test]
fn serde_errors_become_invalid_data() {
    let parse: Result<u32, _> = serde_json::from_str("\"nope\"");
    let err: DbError = parse.unwrap_err().into();
    assert!(matches!(err, DbError::InvalidData { .. }));
}

#[test]
fn db_result_works_with_question_mark() {
    fn inner() -> DbResult<i32> {
        Err(DbError::Database {
            message: "boom".to_string(),
        })
    }

    fn outer() -> DbResult<i32> {
        let value = inner()?;
        Ok(value + 1)
    }

    assert!(outer().is_err());
}
