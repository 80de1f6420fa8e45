//! Machine-readable summary of an exploration.

use regvm_symbolic::{Executor, PathDiagnostic, StateId, Status};
use serde::Serialize;

/// Outcome of one finished execution state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateReport {
    pub id: StateId,
    pub parent: Option<StateId>,
    pub status: Status,
    /// Address of the last instruction the state ran.
    pub final_address: usize,
    pub diagnostics: Vec<PathDiagnostic>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExplorationReport {
    pub instructions: usize,
    pub steps: usize,
    pub terminated: usize,
    pub errored: usize,
    /// Set when the step budget stopped exploration early.
    pub truncated: bool,
    pub states: Vec<StateReport>,
}

impl ExplorationReport {
    pub fn from_executor(executor: &Executor) -> Self {
        let states = executor
            .finished()
            .iter()
            .map(|state| StateReport {
                id: state.id(),
                parent: state.parent(),
                status: state.status(),
                final_address: state.address(),
                diagnostics: executor
                    .diagnostics()
                    .iter()
                    .filter(|d| d.state == state.id())
                    .cloned()
                    .collect(),
            })
            .collect();

        Self {
            instructions: executor.program().len(),
            steps: executor.steps(),
            terminated: executor.count(Status::Terminated),
            errored: executor.count(Status::Errored),
            truncated: executor.is_truncated(),
            states,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
