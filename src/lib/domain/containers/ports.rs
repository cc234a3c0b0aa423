use crate::domain::containers::models::operation::{Operation, OperationError, OperationParams};
use crate::domain::containers::models::outcome::BulkOutcome;
use crate::domain::containers::models::record::{BackendRecord, ContainerId, GenericRecord};
use crate::domain::containers::models::state::Inspection;
use crate::domain::system::info::SystemInfoSummary;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BackendError {
    #[error("no such container: {0}")]
    NotFound(ContainerId),
    #[error("{0}")]
    Failure(String),
}

// A container backend talks to the runtime that actually owns the containers
pub trait ContainerBackend: Send + Sync + 'static + Clone {
    fn get_container(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<BackendRecord, BackendError>> + Send;

    fn list_containers(&self)
    -> impl Future<Output = Result<Vec<BackendRecord>, BackendError>> + Send;

    fn start_container(&self, id: &str) -> impl Future<Output = Result<(), BackendError>> + Send;

    fn stop_container(
        &self,
        id: &str,
        timeout_secs: u32,
    ) -> impl Future<Output = Result<(), BackendError>> + Send;

    fn restart_container(
        &self,
        id: &str,
        timeout_secs: u32,
    ) -> impl Future<Output = Result<(), BackendError>> + Send;

    fn system_info(&self) -> impl Future<Output = Result<Value, BackendError>> + Send;
}

// The container operations service validates, dispatches and normalizes
pub trait ContainerOperationsService: Send + Sync + 'static + Clone {
    fn inspect(&self, id: &str) -> impl Future<Output = Inspection> + Send;

    fn execute(
        &self,
        id: &str,
        operation: Operation,
        params: &OperationParams,
    ) -> impl Future<Output = Result<(), OperationError>> + Send;

    fn execute_bulk(
        &self,
        ids: &[ContainerId],
        operation: Operation,
        force: bool,
    ) -> impl Future<Output = Vec<BulkOutcome>> + Send;

    fn get_container(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<GenericRecord, OperationError>> + Send;

    fn list_containers(
        &self,
    ) -> impl Future<Output = Result<Vec<GenericRecord>, OperationError>> + Send;

    fn system_info(&self)
    -> impl Future<Output = Result<SystemInfoSummary, OperationError>> + Send;
}

impl From<BackendError> for OperationError {
    fn from(error: BackendError) -> Self {
        match error {
            BackendError::NotFound(id) => OperationError::NotFound(id),
            BackendError::Failure(message) => OperationError::BackendFailure(message),
        }
    }
}
