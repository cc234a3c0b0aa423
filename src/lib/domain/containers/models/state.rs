use std::fmt::{Display, Formatter};

/// Lifecycle label of a container, parsed from whatever string the backend uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerState {
    Running,
    Exited,
    Stopped,
    Other(String),
}

impl ContainerState {
    pub fn from_label(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "running" => ContainerState::Running,
            "exited" => ContainerState::Exited,
            "stopped" => ContainerState::Stopped,
            other => ContainerState::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ContainerState::Running => "running",
            ContainerState::Exited => "exited",
            ContainerState::Stopped => "stopped",
            ContainerState::Other(label) => label,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, ContainerState::Running)
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, ContainerState::Exited | ContainerState::Stopped)
    }
}

/// What the state inspector learned about a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inspection {
    Found(ContainerState),
    /// The backend could not locate the container or the lookup failed.
    NotFound,
    /// The record exists but carries no usable `state` label.
    Undetermined,
}

impl Display for ContainerState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_case_insensitive() {
        assert_eq!(ContainerState::from_label("Running"), ContainerState::Running);
        assert!(ContainerState::from_label("EXITED").is_stopped());
        assert_eq!(
            ContainerState::from_label("paused"),
            ContainerState::Other("paused".to_string())
        );
    }
}
