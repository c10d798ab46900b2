//! Record model shared by all conversions.
//!
//! A record is an insertion-ordered JSON object. Field order is observable:
//! overwriting a field keeps its position, new fields are appended.

use serde_json::{Map, Value};

use crate::domain::error::{DomainError, DomainResult};

/// Ordered field map used for flat records, tree nodes and form records.
pub type Record = Map<String, Value>;

/// Identity and parent-reference values.
pub type RecordId = i64;

/// Parent reference meaning "no parent".
pub const ROOT_ID: RecordId = 0;

pub const DEFAULT_ID_FIELD: &str = "id";
pub const DEFAULT_PARENT_FIELD: &str = "pid";
pub const DEFAULT_CHILD_FIELD: &str = "children";
pub const DEFAULT_LEVEL_FIELD: &str = "level";
pub const DEFAULT_INDENT_FIELD: &str = "html";
pub const DEFAULT_INDENT_TOKEN: &str = "|--";

/// Nesting limit for built trees. Nested JSON is dropped and serialized
/// recursively, so deeper output would exhaust the stack.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Reads an integer identity field, rejecting absent or non-integer values.
pub fn read_id(record: &Record, index: usize, field: &str) -> DomainResult<RecordId> {
    match record.get(field) {
        None => Err(DomainError::invalid(index, field, "is missing")),
        Some(value) => value.as_i64().ok_or_else(|| {
            let reason = if value.is_u64() {
                format!("is out of range, {} exceeds {}", value, RecordId::MAX)
            } else {
                format!("must be an integer, got {}", value_kind(value))
            };
            DomainError::invalid(index, field, reason)
        }),
    }
}

/// Borrows a value as a record, failing for scalars and sequences.
pub fn as_record(value: &Value, index: usize) -> DomainResult<&Record> {
    value.as_object().ok_or_else(|| {
        DomainError::invalid(
            index,
            "<node>",
            format!("must be an object, got {}", value_kind(value)),
        )
    })
}

/// Short type name for error messages.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "float",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Converts a slice of JSON values into records, position by position.
pub fn records_from_values(values: &[Value]) -> DomainResult<Vec<Record>> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| as_record(value, index).cloned())
        .collect()
}

/// Wraps records back into JSON values.
pub fn records_into_values(records: Vec<Record>) -> Vec<Value> {
    records.into_iter().map(Value::Object).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_read_id_accepts_integers() {
        let r = record(json!({"id": 7, "pid": 0}));
        assert_eq!(read_id(&r, 0, "id").unwrap(), 7);
        assert_eq!(read_id(&r, 0, "pid").unwrap(), 0);
    }

    #[test]
    fn test_read_id_rejects_missing_field() {
        let r = record(json!({"pid": 0}));
        let err = read_id(&r, 3, "id").unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidRecord {
                index: 3,
                field: "id".into(),
                reason: "is missing".into()
            }
        );
    }

    #[test]
    fn test_read_id_rejects_non_integers() {
        for bad in [json!("1"), json!(1.5), json!(null), json!(true)] {
            let r = record(json!({ "id": bad }));
            assert!(matches!(
                read_id(&r, 0, "id"),
                Err(DomainError::InvalidRecord { .. })
            ));
        }
    }

    #[test]
    fn test_read_id_reports_out_of_range() {
        let r = record(json!({ "id": u64::MAX }));
        let err = read_id(&r, 2, "id").unwrap_err();
        assert!(matches!(err, DomainError::InvalidRecord { index: 2, .. }));
        assert!(err.to_string().contains("out of range"));
        assert!(!err.to_string().contains("got integer"));
    }

    #[test]
    fn test_overwrite_keeps_field_position() {
        let mut r = record(json!({"a": 1, "id": 9, "b": 2}));
        r.insert("id".into(), json!(1));
        r.insert("c".into(), json!(3));
        let keys: Vec<_> = r.keys().cloned().collect();
        assert_eq!(keys, vec!["a", "id", "b", "c"]);
    }

    #[test]
    fn test_records_from_values_rejects_scalars() {
        let values = vec![json!({"a": 1}), json!(2)];
        let err = records_from_values(&values).unwrap_err();
        assert!(matches!(err, DomainError::InvalidRecord { index: 1, .. }));
    }
}
