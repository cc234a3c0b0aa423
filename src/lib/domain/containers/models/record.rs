use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

pub type ContainerId = String;

/// A loosely typed keyed record as handed out by backends that speak plain JSON.
pub type GenericRecord = Map<String, Value>;

/// A container as reported by a typed backend.
///
/// Collections stay `None` when the backend did not report them, so the
/// serialized form carries `null` exactly as received.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ContainerRecord {
    pub id: ContainerId,
    pub name: Option<String>,
    pub image: Option<String>,
    pub state: Option<String>,
    pub created: Option<String>,
    pub mounts: Option<Vec<MountEntry>>,
    pub ports: Option<Vec<PortEntry>>,
    pub networks: Option<Vec<String>>,
    pub labels: Option<HashMap<String, String>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct MountEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct PortEntry {
    pub container_port: String,
    pub protocol: String,
    pub host_ip: Option<String>,
    pub host_port: Option<String>,
}

/// What a backend returns for a single container: either already a keyed
/// record or a typed structure that has to be flattened first.
#[derive(Debug, Clone)]
pub enum BackendRecord {
    Generic(GenericRecord),
    Typed(ContainerRecord),
}

impl BackendRecord {
    /// Canonicalize into a keyed record. Typed records take a round trip
    /// through `serde_json::Value` so callers only ever see one shape.
    pub fn into_generic(self) -> GenericRecord {
        match self {
            BackendRecord::Generic(record) => record,
            BackendRecord::Typed(record) => match serde_json::to_value(record) {
                Ok(Value::Object(map)) => map,
                _ => GenericRecord::new(),
            },
        }
    }
}

impl From<ContainerRecord> for BackendRecord {
    fn from(record: ContainerRecord) -> Self {
        BackendRecord::Typed(record)
    }
}

impl From<GenericRecord> for BackendRecord {
    fn from(record: GenericRecord) -> Self {
        BackendRecord::Generic(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn typed_record_flattens_with_nulls_preserved() {
        let record = ContainerRecord {
            id: "abc".to_string(),
            state: Some("running".to_string()),
            mounts: Some(vec![MountEntry {
                source: Some("/srv".to_string()),
                ..Default::default()
            }]),
            ..Default::default()
        };

        let generic = BackendRecord::from(record).into_generic();
        assert_eq!(generic["id"], json!("abc"));
        assert_eq!(generic["state"], json!("running"));
        assert_eq!(generic["labels"], Value::Null);
        assert_eq!(generic["mounts"], json!([{"source": "/srv"}]));
    }

    #[test]
    fn generic_record_passes_through_untouched() {
        let Value::Object(map) = json!({"id": "x", "custom": 1}) else {
            unreachable!()
        };
        let generic = BackendRecord::from(map.clone()).into_generic();
        assert_eq!(generic, map);
    }
}
