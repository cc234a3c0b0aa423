use crate::domain::containers::models::record::{
    BackendRecord, ContainerRecord, MountEntry, PortEntry,
};
use crate::domain::containers::ports::{BackendError, ContainerBackend};
use bollard::Docker;
use bollard::errors::Error as BollardError;
use bollard::models::{ContainerInspectResponse, MountPoint, PortMap};
use bollard::query_parameters::{
    InspectContainerOptions, ListContainersOptionsBuilder, RestartContainerOptionsBuilder,
    StartContainerOptions, StopContainerOptionsBuilder,
};
use log::{debug, error, trace};
use serde_json::Value;

impl From<BollardError> for BackendError {
    fn from(error: BollardError) -> Self {
        BackendError::Failure(error.to_string())
    }
}

// a 404 on a container endpoint means `id` does not exist
fn container_error(id: &str, error: BollardError) -> BackendError {
    match error {
        BollardError::DockerResponseServerError {
            status_code: 404, ..
        } => BackendError::NotFound(id.to_string()),
        other => BackendError::from(other),
    }
}

/// Talks to the local docker daemon.
#[derive(Clone)]
pub struct DockerBackend {
    docker: Docker,
}

impl DockerBackend {
    pub fn connect() -> Result<Self, BollardError> {
        let docker = Docker::connect_with_local_defaults()?;
        Ok(Self { docker })
    }

    async fn inspect(&self, id: &str) -> Result<ContainerInspectResponse, BackendError> {
        let details = self
            .docker
            .inspect_container(id, None::<InspectContainerOptions>)
            .await
            .inspect_err(|e| debug!("Error inspecting container {id}: {e:?}"))
            .map_err(|e| container_error(id, e))?;
        trace!(
            "container details: {}",
            serde_json::to_string_pretty(&details).unwrap_or_default()
        );
        Ok(details)
    }
}

// docker counts seconds as i32
fn docker_timeout(timeout_secs: u32) -> i32 {
    i32::try_from(timeout_secs).unwrap_or(i32::MAX)
}

impl From<ContainerInspectResponse> for ContainerRecord {
    fn from(details: ContainerInspectResponse) -> Self {
        let config = details.config.unwrap_or_default();
        let network_settings = details.network_settings.unwrap_or_default();
        ContainerRecord {
            id: details.id.unwrap_or_default(),
            name: details
                .name
                .map(|name| name.trim_start_matches('/').to_string()),
            image: config.image,
            state: details
                .state
                .and_then(|state| state.status)
                .map(|status| status.to_string()),
            created: details.created.map(|created| created.to_string()),
            mounts: details
                .mounts
                .map(|mounts| mounts.into_iter().map(MountEntry::from).collect()),
            ports: network_settings.ports.map(port_entries),
            networks: network_settings
                .networks
                .map(|networks| networks.into_keys().collect()),
            labels: config.labels,
        }
    }
}

impl From<MountPoint> for MountEntry {
    fn from(mount: MountPoint) -> Self {
        MountEntry {
            source: mount.source,
            destination: mount.destination,
            kind: mount.typ.map(|typ| typ.to_string()),
            read_only: mount.rw.map(|rw| !rw),
        }
    }
}

fn port_entries(ports: PortMap) -> Vec<PortEntry> {
    let mut entries = Vec::new();
    for (spec, bindings) in ports {
        let (container_port, protocol) = match spec.split_once('/') {
            Some((port, protocol)) => (port.to_string(), protocol.to_string()),
            None => (spec.clone(), "tcp".to_string()),
        };
        let bindings = bindings.unwrap_or_default();
        if bindings.is_empty() {
            entries.push(PortEntry {
                container_port,
                protocol,
                host_ip: None,
                host_port: None,
            });
            continue;
        }
        for binding in bindings {
            entries.push(PortEntry {
                container_port: container_port.clone(),
                protocol: protocol.clone(),
                host_ip: binding.host_ip,
                host_port: binding.host_port,
            });
        }
    }
    entries.sort_by(|a, b| a.container_port.cmp(&b.container_port));
    entries
}

impl ContainerBackend for DockerBackend {
    async fn get_container(&self, id: &str) -> Result<BackendRecord, BackendError> {
        let details = self.inspect(id).await?;
        Ok(BackendRecord::Typed(ContainerRecord::from(details)))
    }

    async fn list_containers(&self) -> Result<Vec<BackendRecord>, BackendError> {
        let options = ListContainersOptionsBuilder::default().all(true).build();
        let containers = self.docker.list_containers(Some(options)).await?;
        debug!("found {} containers", containers.len());

        let mut records = Vec::with_capacity(containers.len());
        for container in containers {
            let Some(id) = container.id else { continue };
            match self.inspect(&id).await {
                Ok(details) => records.push(BackendRecord::Typed(details.into())),
                // removed between listing and inspection
                Err(BackendError::NotFound(_)) => continue,
                Err(e) => {
                    error!("Error inspecting container {id}: {e}");
                    return Err(e);
                }
            }
        }
        Ok(records)
    }

    async fn start_container(&self, id: &str) -> Result<(), BackendError> {
        self.docker
            .start_container(id, None::<StartContainerOptions>)
            .await
            .map_err(|e| container_error(id, e))?;
        Ok(())
    }

    async fn stop_container(&self, id: &str, timeout_secs: u32) -> Result<(), BackendError> {
        let options = StopContainerOptionsBuilder::new()
            .t(docker_timeout(timeout_secs))
            .build();
        self.docker
            .stop_container(id, Some(options))
            .await
            .map_err(|e| container_error(id, e))?;
        Ok(())
    }

    async fn restart_container(&self, id: &str, timeout_secs: u32) -> Result<(), BackendError> {
        let options = RestartContainerOptionsBuilder::new()
            .t(docker_timeout(timeout_secs))
            .build();
        self.docker
            .restart_container(id, Some(options))
            .await
            .map_err(|e| container_error(id, e))?;
        Ok(())
    }

    async fn system_info(&self) -> Result<Value, BackendError> {
        let info = self.docker.info().await?;
        serde_json::to_value(info).map_err(|e| BackendError::Failure(e.to_string()))
    }
}
