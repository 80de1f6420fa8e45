//! Symbolic execution and control-flow reconstruction for the register VM.
//!
//! The executor runs every path of a decoded program at once, keeping each
//! register as either a concrete string or an expression over the program
//! input. Conditional jumps fork the running path; the statements each path
//! emits are collected in a tree that linearizes into C-like pseudocode.
//!
//! # Module Structure
//!
//! - `symbol`: register values and the expression trees they hold
//! - `semantics`: how each register operation combines values
//! - `program`: decoded instructions indexed by address
//! - `state`: one execution path
//! - `executor`: the scheduler driving all paths
//! - `cfg`: the statement tree and its linearization
//! - `pseudocode`: statement spelling and the function template
//! - `error`: fatal and per-path errors

pub mod cfg;
pub mod error;
pub mod executor;
pub mod program;
pub mod pseudocode;
pub mod semantics;
pub mod state;
pub mod symbol;

pub use cfg::{Cfg, CfgError, Node, NodeId};
pub use error::{ExecutionError, PathDiagnostic, PathError};
pub use executor::{Executor, ExecutorConfig, DEFAULT_INPUT_NAME};
pub use program::Program;
pub use semantics::EvalError;
pub use state::{ExecutionState, RegisterFile, StateId, Status};
pub use symbol::{StrLen, Symbol, Value};
