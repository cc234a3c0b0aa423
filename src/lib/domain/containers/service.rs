use crate::domain::containers::models::operation::{
    DEFAULT_TIMEOUT_SECS, Operation, OperationError, OperationParams,
};
use crate::domain::containers::models::outcome::BulkOutcome;
use crate::domain::containers::models::record::{ContainerId, GenericRecord};
use crate::domain::containers::models::state::{ContainerState, Inspection};
use crate::domain::containers::normalize::normalize_container;
use crate::domain::containers::ports::{BackendError, ContainerBackend, ContainerOperationsService};
use crate::domain::containers::validation::{ValidationOutcome, validate_transition};
use crate::domain::system::info::{SystemInfoSummary, normalize_system_info};
use futures_util::{StreamExt, stream};
use log::{debug, error, info, warn};
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_BULK_CONCURRENCY: usize = 4;
pub const DEFAULT_CALL_GRACE_SECS: u64 = 5;

#[derive(Clone)]
pub struct Service<CB: ContainerBackend> {
    backend: CB,
    bulk_concurrency: usize,
    call_grace: Duration,
}

impl<CB: ContainerBackend> Service<CB> {
    pub fn new(backend: CB) -> Self {
        Self {
            backend,
            bulk_concurrency: DEFAULT_BULK_CONCURRENCY,
            call_grace: Duration::from_secs(DEFAULT_CALL_GRACE_SECS),
        }
    }

    pub fn with_bulk_concurrency(mut self, bulk_concurrency: usize) -> Self {
        self.bulk_concurrency = bulk_concurrency.max(1);
        self
    }

    /// Extra time a backend call gets on top of its operation timeout.
    pub fn with_call_grace(mut self, call_grace: Duration) -> Self {
        self.call_grace = call_grace;
        self
    }

    async fn bounded<T>(
        &self,
        timeout_secs: u32,
        what: &str,
        call: impl Future<Output = Result<T, BackendError>>,
    ) -> Result<T, BackendError> {
        let limit = Duration::from_secs(u64::from(timeout_secs)) + self.call_grace;
        tokio::time::timeout(limit, call).await.unwrap_or_else(|_| {
            Err(BackendError::Failure(format!(
                "{what} timed out after {}s",
                limit.as_secs()
            )))
        })
    }

    async fn dispatch(
        &self,
        id: &str,
        operation: Operation,
        params: &OperationParams,
    ) -> Result<(), OperationError> {
        let result = match operation {
            Operation::Start => {
                self.bounded(
                    DEFAULT_TIMEOUT_SECS,
                    "start",
                    self.backend.start_container(id),
                )
                .await
            }
            Operation::Stop => {
                let timeout = params.resolved_timeout();
                debug!(
                    "Stopping container {id} (timeout {timeout}s, force {})",
                    params.force()
                );
                self.bounded(timeout, "stop", self.backend.stop_container(id, timeout))
                    .await
            }
            // restart never takes a caller supplied timeout
            Operation::Restart => {
                self.bounded(
                    DEFAULT_TIMEOUT_SECS,
                    "restart",
                    self.backend.restart_container(id, DEFAULT_TIMEOUT_SECS),
                )
                .await
            }
        };
        result.map_err(OperationError::from)
    }

    async fn run(
        &self,
        id: &str,
        operation: Operation,
        params: &OperationParams,
    ) -> Result<(), OperationError> {
        info!("{operation} requested for container {id}");
        let inspection = self.inspect(id).await;
        debug!("Container {id} inspected: {inspection:?}");

        match validate_transition(operation, &inspection) {
            ValidationOutcome::Allowed => {}
            ValidationOutcome::AllowedWithWarning(advisory) => {
                warn!("{operation} on container {id}: {advisory}, proceeding anyway");
            }
            ValidationOutcome::Rejected(reason) => {
                error!("Refusing to {operation} container {id}: {reason}");
                return Err(OperationError::ValidationFailed {
                    id: id.to_string(),
                    operation,
                    reason,
                });
            }
        }

        self.dispatch(id, operation, params)
            .await
            .inspect_err(|e| error!("{operation} failed for container {id}: {e}"))?;
        info!("Container {id} {}", operation.past_tense());
        Ok(())
    }
}

impl<CB: ContainerBackend> ContainerOperationsService for Service<CB> {
    async fn inspect(&self, id: &str) -> Inspection {
        let record = match self
            .bounded(DEFAULT_TIMEOUT_SECS, "inspect", self.backend.get_container(id))
            .await
        {
            Ok(record) => record.into_generic(),
            Err(e) => {
                warn!("Could not inspect container {id}: {e}");
                return Inspection::NotFound;
            }
        };
        match record.get("state").and_then(Value::as_str) {
            Some(label) if !label.trim().is_empty() => {
                Inspection::Found(ContainerState::from_label(label))
            }
            _ => Inspection::Undetermined,
        }
    }

    async fn execute(
        &self,
        id: &str,
        operation: Operation,
        params: &OperationParams,
    ) -> Result<(), OperationError> {
        self.run(id, operation, params).await
    }

    async fn execute_bulk(
        &self,
        ids: &[ContainerId],
        operation: Operation,
        force: bool,
    ) -> Vec<BulkOutcome> {
        let params = OperationParams {
            timeout: None,
            force: Some(force),
        };
        let params = &params;
        info!("Bulk {operation} on {} containers", ids.len());

        // `buffered` yields in input order, one slot per identifier
        let runs: Vec<_> = ids
            .iter()
            .map(move |id| async move {
                BulkOutcome::from_result(id, operation, self.run(id, operation, params).await)
            })
            .collect();
        let outcomes: Vec<BulkOutcome> = stream::iter(runs)
            .buffered(self.bulk_concurrency)
            .collect()
            .await;

        let failed = outcomes.iter().filter(|outcome| !outcome.success).count();
        if failed > 0 {
            warn!("Bulk {operation}: {failed} of {} containers failed", outcomes.len());
        } else {
            info!("Bulk {operation}: all {} containers succeeded", outcomes.len());
        }
        outcomes
    }

    async fn get_container(&self, id: &str) -> Result<GenericRecord, OperationError> {
        let record = self
            .bounded(DEFAULT_TIMEOUT_SECS, "inspect", self.backend.get_container(id))
            .await?;
        Ok(normalize_container(record.into_generic()))
    }

    async fn list_containers(&self) -> Result<Vec<GenericRecord>, OperationError> {
        let records = self
            .bounded(DEFAULT_TIMEOUT_SECS, "list", self.backend.list_containers())
            .await?;
        debug!("Backend listed {} containers", records.len());
        Ok(records
            .into_iter()
            .map(|record| normalize_container(record.into_generic()))
            .collect())
    }

    async fn system_info(&self) -> Result<SystemInfoSummary, OperationError> {
        let payload = self
            .bounded(DEFAULT_TIMEOUT_SECS, "system info", self.backend.system_info())
            .await?;
        Ok(normalize_system_info(payload))
    }
}
