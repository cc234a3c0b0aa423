//! Reshapes backend container records into the canonical response form.
//!
//! Normalization only ever adds defaults: unknown keys survive untouched,
//! collections are never `null` and every mount carries all four keys.

use crate::domain::containers::models::record::GenericRecord;
use serde_json::Value;

pub fn normalize_container(mut record: GenericRecord) -> GenericRecord {
    let mounts = match record.remove("mounts") {
        Some(Value::Array(entries)) => entries
            .into_iter()
            .filter_map(|entry| match entry {
                Value::Object(mount) => Some(Value::Object(normalize_mount(mount))),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };
    record.insert("mounts".to_string(), Value::Array(mounts));

    for key in ["ports", "networks"] {
        default_if_missing(&mut record, key, || Value::Array(Vec::new()));
    }
    default_if_missing(&mut record, "labels", || Value::Object(GenericRecord::new()));
    record
}

pub fn normalize_mount(mut mount: GenericRecord) -> GenericRecord {
    default_if_missing(&mut mount, "source", || Value::String(String::new()));
    default_if_missing(&mut mount, "destination", || Value::String(String::new()));
    default_if_missing(&mut mount, "type", || Value::String("bind".to_string()));
    default_if_missing(&mut mount, "read_only", || Value::Bool(false));
    mount
}

// absent and null are treated the same
fn default_if_missing(record: &mut GenericRecord, key: &str, default: impl FnOnce() -> Value) {
    match record.get(key) {
        None | Some(Value::Null) => {
            record.insert(key.to_string(), default());
        }
        Some(_) => {}
    }
}
