//! Conversions between loosely typed JSON and SQLite values.

use rusqlite::types::{Value as SqlValue, ValueRef};
use serde_json::{Map, Number, Value};

/// Bind a client-supplied JSON value the way a permissive driver would:
/// scalars map onto their SQL counterparts, booleans become 0/1, and
/// arrays/objects are stored as their JSON text.
pub fn json_to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => SqlValue::Real(n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

pub fn sql_to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::String(String::from_utf8_lossy(b).into_owned()),
    }
}

/// Map a row of any shape to a JSON object keyed by column name.
pub fn row_to_object(row: &rusqlite::Row<'_>) -> rusqlite::Result<Map<String, Value>> {
    let stmt = row.as_ref();
    let mut object = Map::with_capacity(stmt.column_count());
    for (idx, name) in stmt.column_names().into_iter().enumerate() {
        object.insert(name.to_string(), sql_to_json(row.get_ref(idx)?));
    }
    Ok(object)
}

/// Truthiness of a stored flag. Anything but NULL, zero, or empty text counts.
pub fn sql_truthy(value: &SqlValue) -> bool {
    match value {
        SqlValue::Null => false,
        SqlValue::Integer(i) => *i != 0,
        SqlValue::Real(f) => *f != 0.0,
        SqlValue::Text(s) => !s.is_empty() && s != "0",
        SqlValue::Blob(b) => !b.is_empty(),
    }
}
