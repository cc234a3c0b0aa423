use crate::domain::containers::models::record::GenericRecord;
use crate::domain::containers::service::{DEFAULT_BULK_CONCURRENCY, DEFAULT_CALL_GRACE_SECS};
use figment2::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Docker,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub api_secret: Option<String>,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub backend: BackendKind,
    #[serde(default = "default_bulk_concurrency")]
    pub bulk_concurrency: usize,
    #[serde(default = "default_call_grace_secs")]
    pub call_grace_secs: u64,
    /// Records the `memory` backend starts with.
    #[serde(default)]
    pub memory_containers: Vec<GenericRecord>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3033
}

fn default_bulk_concurrency() -> usize {
    DEFAULT_BULK_CONCURRENCY
}

fn default_call_grace_secs() -> u64 {
    DEFAULT_CALL_GRACE_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_secret: None,
            host: default_host(),
            port: default_port(),
            backend: BackendKind::default(),
            bulk_concurrency: default_bulk_concurrency(),
            call_grace_secs: default_call_grace_secs(),
            memory_containers: Vec::new(),
        }
    }
}

impl Config {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Defaults, then the optional TOML file, then `DOCKGATE_*` environment variables.
pub fn load_config(config_path: Option<&Path>) -> Result<Config, figment2::Error> {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));
    if let Some(path) = config_path {
        figment = figment.merge(Toml::file(path));
    }
    figment.merge(Env::prefixed("DOCKGATE_")).extract()
}
