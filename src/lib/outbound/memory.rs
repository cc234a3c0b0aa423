use crate::domain::containers::models::record::{
    BackendRecord, ContainerId, ContainerRecord, GenericRecord,
};
use log::warn;
use crate::domain::containers::ports::{BackendError, ContainerBackend};
use serde_json::{Value, json};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// A mutating call that reached the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    Start(ContainerId),
    Stop { id: ContainerId, timeout_secs: u32 },
    Restart { id: ContainerId, timeout_secs: u32 },
}

impl BackendCall {
    fn id(&self) -> &str {
        match self {
            BackendCall::Start(id) => id.as_str(),
            BackendCall::Stop { id, .. } | BackendCall::Restart { id, .. } => id.as_str(),
        }
    }
}

#[derive(Default)]
struct MemoryState {
    containers: BTreeMap<ContainerId, BackendRecord>,
    failing: HashSet<ContainerId>,
    stalled: HashMap<ContainerId, Duration>,
    calls: Vec<BackendCall>,
    system_info: Option<Value>,
}

/// Container backend that keeps records in memory.
///
/// Used for the `memory` backend mode and throughout the tests: failures
/// and stalls can be injected per container and every mutating call is
/// recorded. Records keep the shape they were inserted with.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `record` under `id`, filling in the `id` key when absent.
    pub async fn insert(&self, id: &str, mut record: GenericRecord) {
        record
            .entry("id")
            .or_insert_with(|| Value::String(id.to_string()));
        let mut state = self.state.write().await;
        state
            .containers
            .insert(id.to_string(), BackendRecord::Generic(record));
    }

    /// Stores a typed record under its own id.
    pub async fn insert_typed(&self, record: ContainerRecord) {
        let mut state = self.state.write().await;
        state
            .containers
            .insert(record.id.clone(), BackendRecord::Typed(record));
    }

    /// Builds a backend from keyed records. Records without a string `id` are skipped.
    pub async fn with_records(records: impl IntoIterator<Item = GenericRecord>) -> Self {
        let backend = Self::new();
        for record in records {
            let id = record.get("id").and_then(Value::as_str).map(str::to_string);
            match id {
                Some(id) if !id.trim().is_empty() => backend.insert(&id, record).await,
                _ => warn!("Skipping container record without an id: {record:?}"),
            }
        }
        backend
    }

    /// Every mutating call for `id` fails from now on.
    pub async fn fail_on(&self, id: &str) {
        self.state.write().await.failing.insert(id.to_string());
    }

    /// Mutating calls for `id` hang for `delay` before doing anything.
    pub async fn stall_on(&self, id: &str, delay: Duration) {
        self.state.write().await.stalled.insert(id.to_string(), delay);
    }

    pub async fn set_system_info(&self, payload: Value) {
        self.state.write().await.system_info = Some(payload);
    }

    pub async fn calls(&self) -> Vec<BackendCall> {
        self.state.read().await.calls.clone()
    }

    async fn mutate(&self, call: BackendCall, new_state: &str) -> Result<(), BackendError> {
        let id = call.id().to_string();
        let delay = self.state.read().await.stalled.get(&id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.write().await;
        state.calls.push(call);
        if state.failing.contains(&id) {
            return Err(BackendError::Failure(format!(
                "container {id} refused the request"
            )));
        }
        let record = state
            .containers
            .get_mut(&id)
            .ok_or_else(|| BackendError::NotFound(id.clone()))?;
        match record {
            BackendRecord::Generic(record) => {
                record.insert("state".to_string(), Value::String(new_state.to_string()));
            }
            BackendRecord::Typed(record) => record.state = Some(new_state.to_string()),
        }
        Ok(())
    }
}

fn state_label(record: &BackendRecord) -> Option<&str> {
    match record {
        BackendRecord::Generic(record) => record.get("state").and_then(Value::as_str),
        BackendRecord::Typed(record) => record.state.as_deref(),
    }
}

fn count_state(containers: &BTreeMap<ContainerId, BackendRecord>, label: &str) -> usize {
    containers
        .values()
        .filter(|record| state_label(record) == Some(label))
        .count()
}

impl ContainerBackend for MemoryBackend {
    async fn get_container(&self, id: &str) -> Result<BackendRecord, BackendError> {
        let state = self.state.read().await;
        state
            .containers
            .get(id)
            .cloned()
            .ok_or_else(|| BackendError::NotFound(id.to_string()))
    }

    async fn list_containers(&self) -> Result<Vec<BackendRecord>, BackendError> {
        let state = self.state.read().await;
        Ok(state.containers.values().cloned().collect())
    }

    async fn start_container(&self, id: &str) -> Result<(), BackendError> {
        self.mutate(BackendCall::Start(id.to_string()), "running")
            .await
    }

    async fn stop_container(&self, id: &str, timeout_secs: u32) -> Result<(), BackendError> {
        let call = BackendCall::Stop {
            id: id.to_string(),
            timeout_secs,
        };
        self.mutate(call, "exited").await
    }

    async fn restart_container(&self, id: &str, timeout_secs: u32) -> Result<(), BackendError> {
        let call = BackendCall::Restart {
            id: id.to_string(),
            timeout_secs,
        };
        self.mutate(call, "running").await
    }

    async fn system_info(&self) -> Result<Value, BackendError> {
        let state = self.state.read().await;
        if let Some(payload) = &state.system_info {
            return Ok(payload.clone());
        }
        let running = count_state(&state.containers, "running");
        let paused = count_state(&state.containers, "paused");
        Ok(json!({
            "Containers": state.containers.len(),
            "ContainersRunning": running,
            "ContainersPaused": paused,
            "ContainersStopped": state.containers.len() - running - paused,
            "Images": 0,
            "ServerVersion": "memory",
        }))
    }
}
