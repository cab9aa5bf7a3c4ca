//! Execution lifecycle.
//!
//! Every run moves through a fixed state machine:
//!
//! ```text
//!   Created ──→ Ready ──→ Executing ──→ Completed
//!     │           │           │
//!     └───────────┴───────────┴──────→ Failed(reason)
//! ```
//!
//! Transitions are monotonic and terminal states are permanent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{HalError, HalResult};

/// State of one execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionState {
    /// Request accepted, nothing validated yet.
    Created,
    /// Circuit and options validated.
    Ready,
    /// Gates are being applied or shots drawn.
    Executing,
    /// Histogram produced.
    Completed,
    /// Run aborted with a reason.
    Failed(String),
}

impl ExecutionState {
    /// Check if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExecutionState::Completed | ExecutionState::Failed(_))
    }

    /// Check whether `next` is a legal successor of this state.
    pub fn can_transition_to(&self, next: &ExecutionState) -> bool {
        use ExecutionState::*;
        matches!(
            (self, next),
            (Created, Ready)
                | (Ready, Executing)
                | (Executing, Completed)
                | (Created | Ready | Executing, Failed(_))
        )
    }

    fn label(&self) -> &'static str {
        match self {
            ExecutionState::Created => "Created",
            ExecutionState::Ready => "Ready",
            ExecutionState::Executing => "Executing",
            ExecutionState::Completed => "Completed",
            ExecutionState::Failed(_) => "Failed",
        }
    }
}

impl std::fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionState::Failed(msg) => write!(f, "Failed: {msg}"),
            other => f.write_str(other.label()),
        }
    }
}

/// One execution with its timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Execution {
    /// Id of the circuit being run.
    pub circuit_id: String,
    /// Current state.
    pub state: ExecutionState,
    /// Number of shots requested.
    pub shots: u32,
    /// Time the execution was created.
    pub created_at: DateTime<Utc>,
    /// Time execution started.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    /// Time the execution reached a terminal state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl Execution {
    /// Create an execution in the `Created` state.
    pub fn new(circuit_id: impl Into<String>, shots: u32) -> Self {
        Self {
            circuit_id: circuit_id.into(),
            state: ExecutionState::Created,
            shots,
            created_at: Utc::now(),
            started_at: None,
            finished_at: None,
        }
    }

    /// Move to `next`, rejecting illegal transitions.
    pub fn advance(&mut self, next: ExecutionState) -> HalResult<()> {
        if !self.state.can_transition_to(&next) {
            return Err(HalError::InvalidTransition {
                from: self.state.label().into(),
                to: next.label().into(),
            });
        }
        debug!(
            circuit_id = %self.circuit_id,
            from = self.state.label(),
            to = next.label(),
            "execution state transition"
        );
        if next == ExecutionState::Executing {
            self.started_at = Some(Utc::now());
        }
        if next.is_terminal() {
            self.finished_at = Some(Utc::now());
        }
        self.state = next;
        Ok(())
    }

    /// Mark the execution failed. A no-op if it already finished.
    pub fn fail(&mut self, reason: impl Into<String>) {
        if !self.state.is_terminal() {
            self.state = ExecutionState::Failed(reason.into());
            self.finished_at = Some(Utc::now());
        }
    }

    /// Milliseconds between start and finish, if both are known.
    pub fn elapsed_ms(&self) -> Option<u64> {
        let start = self.started_at?;
        let end = self.finished_at?;
        u64::try_from((end - start).num_milliseconds()).ok()
    }
}
