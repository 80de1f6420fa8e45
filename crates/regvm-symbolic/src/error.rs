use regvm_instructions::Mnemonic;
use serde::Serialize;
use thiserror::Error;

use crate::cfg::CfgError;
use crate::semantics::EvalError;
use crate::state::StateId;

/// Errors that abort the whole exploration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    #[error("{mnemonic} at {address:#x} has no stepping rule")]
    UnsupportedInstruction { address: usize, mnemonic: Mnemonic },

    #[error("evaluation failed at {address:#x}: {source}")]
    Evaluation {
        address: usize,
        #[source]
        source: EvalError,
    },

    #[error(transparent)]
    Cfg(#[from] CfgError),
}

/// Errors local to one path. The path is marked errored and exploration
/// continues with the others.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PathError {
    #[error("jump offset `{offset}` is symbolic")]
    UnresolvableBranch { offset: String },

    #[error("jump target {target} is not an instruction boundary")]
    MissingJumpTarget { target: i64 },

    #[error("execution ran past the last instruction")]
    EndOfProgram,

    #[error("step budget exhausted")]
    BudgetExhausted,
}

/// A [`PathError`] attributed to the state and instruction that raised it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathDiagnostic {
    pub state: StateId,
    pub address: usize,
    pub error: PathError,
}
