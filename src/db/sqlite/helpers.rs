//! Shared helper functions for the SQLite store.

use serde_json::Value;
use sqlx::{QueryBuilder, Sqlite};

use crate::db::document::{Document, Filter, ID_FIELD, is_plain_field};
use crate::db::{DbError, DbResult};

/// Map a sqlx error, treating pool and I/O failures as connection errors so
/// callers can fall back to the in-memory store.
pub fn map_sqlx_error(e: sqlx::Error) -> DbError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            DbError::Connection {
                message: e.to_string(),
            }
        }
        other => DbError::Database {
            message: other.to_string(),
        },
    }
}

/// JSON path for a top-level field.
fn json_path(field: &str) -> DbResult<String> {
    if is_plain_field(field) {
        Ok(format!("$.{}", field))
    } else {
        Err(DbError::InvalidData {
            message: format!("field name '{}' is not supported", field),
            help: "use plain field names made of letters, digits and underscores".to_string(),
        })
    }
}

/// Append ` WHERE collection = ? AND ...` for every filter field.
pub fn push_filter(
    qb: &mut QueryBuilder<'_, Sqlite>,
    collection: &str,
    filter: &Filter,
) -> DbResult<()> {
    qb.push(" WHERE collection = ")
        .push_bind(collection.to_string());

    for (field, value) in filter.fields() {
        if field == ID_FIELD
            && let Value::String(id) = value
        {
            qb.push(" AND id = ").push_bind(id.clone());
            continue;
        }

        let path = json_path(field)?;
        match value {
            Value::Null => {
                qb.push(" AND json_extract(body, ")
                    .push_bind(path)
                    .push(") IS NULL");
            }
            // json_extract yields 0/1 for booleans, indistinguishable from numbers.
            Value::Bool(flag) => {
                qb.push(" AND json_type(body, ")
                    .push_bind(path)
                    .push(if *flag { ") = 'true'" } else { ") = 'false'" });
            }
            Value::String(s) => {
                qb.push(" AND json_extract(body, ")
                    .push_bind(path)
                    .push(") = ")
                    .push_bind(s.clone());
            }
            // Same type guard, so `1` never matches a stored `true`.
            Value::Number(n) => {
                qb.push(" AND json_type(body, ")
                    .push_bind(path.clone())
                    .push(") IN ('integer', 'real') AND json_extract(body, ")
                    .push_bind(path)
                    .push(") = ");
                match n.as_i64() {
                    Some(i) => qb.push_bind(i),
                    None => qb.push_bind(n.as_f64().unwrap_or_default()),
                };
            }
            Value::Array(_) | Value::Object(_) => {
                return Err(DbError::InvalidData {
                    message: format!("cannot filter '{}' on a nested value", field),
                    help: "filters support strings, numbers, booleans and null".to_string(),
                });
            }
        }
    }

    Ok(())
}

/// Parse a stored JSON body.
pub fn parse_body(body: &str) -> DbResult<Document> {
    Ok(serde_json::from_str(body)?)
}
