use crate::domain::containers::models::record::ContainerId;
use crate::domain::containers::validation::Rejection;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// Timeout handed to the backend when the caller did not supply a usable one.
pub const DEFAULT_TIMEOUT_SECS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Start,
    Stop,
    Restart,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Start => "start",
            Operation::Stop => "stop",
            Operation::Restart => "restart",
        }
    }

    pub fn past_tense(&self) -> &'static str {
        match self {
            Operation::Start => "started",
            Operation::Stop => "stopped",
            Operation::Restart => "restarted",
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Operation {
    type Err = OperationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(Operation::Start),
            "stop" => Ok(Operation::Stop),
            "restart" => Ok(Operation::Restart),
            other => Err(OperationError::UnknownOperation(other.to_string())),
        }
    }
}

/// Per-call parameters parsed from the optional request body.
///
/// `timeout` only overrides the default when it is a positive integer.
/// `force` is carried through for logging, no backend call consumes it.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct OperationParams {
    pub timeout: Option<i64>,
    pub force: Option<bool>,
}

impl OperationParams {
    /// An empty body means defaults. Anything else has to be a JSON object;
    /// fields of the wrong type are ignored.
    pub fn from_body(body: &[u8]) -> Result<Self, OperationError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| OperationError::BadRequest(format!("invalid request body: {e}")))?;
        let Value::Object(fields) = value else {
            return Err(OperationError::BadRequest(
                "request body must be a JSON object".to_string(),
            ));
        };
        Ok(Self {
            timeout: fields.get("timeout").and_then(Value::as_i64),
            force: fields.get("force").and_then(Value::as_bool),
        })
    }

    pub fn resolved_timeout(&self) -> u32 {
        match self.timeout {
            Some(timeout) if timeout > 0 => u32::try_from(timeout).unwrap_or(u32::MAX),
            _ => DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn force(&self) -> bool {
        self.force.unwrap_or(false)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct BulkOperationRequest {
    pub container_ids: Vec<ContainerId>,
    #[serde(default)]
    pub force: bool,
}

impl BulkOperationRequest {
    pub fn from_body(body: &[u8]) -> Result<Self, OperationError> {
        let request: Self = serde_json::from_slice(body)
            .map_err(|e| OperationError::BadRequest(format!("invalid request body: {e}")))?;
        if request.container_ids.is_empty() {
            return Err(OperationError::BadRequest(
                "container_ids must not be empty".to_string(),
            ));
        }
        if request.container_ids.iter().any(|id| id.trim().is_empty()) {
            return Err(OperationError::BadRequest(
                "container_ids must not contain blank identifiers".to_string(),
            ));
        }
        Ok(request)
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum OperationError {
    #[error("container {0} not found")]
    NotFound(ContainerId),
    #[error("cannot {operation} container {id}: {reason}")]
    ValidationFailed {
        id: ContainerId,
        operation: Operation,
        reason: Rejection,
    },
    #[error("unknown operation: {0}")]
    UnknownOperation(String),
    #[error("backend failure: {0}")]
    BackendFailure(String),
    #[error("bad request: {0}")]
    BadRequest(String),
}
