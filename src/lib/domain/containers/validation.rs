//! Sanity checks for lifecycle transitions.
//!
//! Redundant transitions are allowed with an advisory; the backend treats
//! them as no-ops. Only a container whose state cannot be determined is
//! rejected.

use crate::domain::containers::models::operation::Operation;
use crate::domain::containers::models::state::Inspection;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    AlreadyRunning,
    AlreadyStopped,
}

impl Display for Advisory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Advisory::AlreadyRunning => write!(f, "container is already running"),
            Advisory::AlreadyStopped => write!(f, "container is already stopped"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NotFound,
    StateUnknown,
}

impl Display for Rejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::NotFound => write!(f, "container not found"),
            Rejection::StateUnknown => write!(f, "container state could not be determined"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Allowed,
    AllowedWithWarning(Advisory),
    Rejected(Rejection),
}

pub fn validate_transition(operation: Operation, inspection: &Inspection) -> ValidationOutcome {
    let state = match inspection {
        Inspection::Found(state) => state,
        Inspection::NotFound => return ValidationOutcome::Rejected(Rejection::NotFound),
        Inspection::Undetermined => return ValidationOutcome::Rejected(Rejection::StateUnknown),
    };
    match operation {
        Operation::Start if state.is_running() => {
            ValidationOutcome::AllowedWithWarning(Advisory::AlreadyRunning)
        }
        Operation::Stop if state.is_stopped() => {
            ValidationOutcome::AllowedWithWarning(Advisory::AlreadyStopped)
        }
        _ => ValidationOutcome::Allowed,
    }
}
