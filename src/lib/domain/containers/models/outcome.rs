use crate::domain::containers::models::operation::{Operation, OperationError};
use crate::domain::containers::models::record::ContainerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of a single-target operation as reported to the caller.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OperationOutcome {
    pub success: bool,
    pub message: String,
    pub id: ContainerId,
    pub operation: Operation,
    pub timestamp: DateTime<Utc>,
}

impl OperationOutcome {
    pub fn from_result(id: &str, operation: Operation, result: &Result<(), OperationError>) -> Self {
        let (success, message) = match result {
            Ok(()) => (true, success_message(id, operation)),
            Err(e) => (false, e.to_string()),
        };
        Self {
            success,
            message,
            id: id.to_string(),
            operation,
            timestamp: Utc::now(),
        }
    }
}

/// One slot of a bulk response. Exactly one of `message` and `error` is set.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BulkOutcome {
    pub id: ContainerId,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BulkOutcome {
    pub fn from_result(id: &str, operation: Operation, result: Result<(), OperationError>) -> Self {
        match result {
            Ok(()) => Self {
                id: id.to_string(),
                success: true,
                message: Some(success_message(id, operation)),
                error: None,
            },
            Err(e) => Self {
                id: id.to_string(),
                success: false,
                message: None,
                error: Some(e.to_string()),
            },
        }
    }
}

fn success_message(id: &str, operation: Operation) -> String {
    format!("container {id} {} successfully", operation.past_tense())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn failed_bulk_slot_serializes_without_message() {
        let outcome = BulkOutcome::from_result(
            "b",
            Operation::Stop,
            Err(OperationError::BackendFailure("boom".to_string())),
        );
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"id": "b", "success": false, "error": "backend failure: boom"})
        );
    }

    #[test]
    fn single_outcome_carries_operation_name() {
        let outcome = OperationOutcome::from_result("a", Operation::Restart, &Ok(()));
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["operation"], json!("restart"));
        assert_eq!(value["message"], json!("container a restarted successfully"));
        assert!(value["timestamp"].is_string());
    }
}
