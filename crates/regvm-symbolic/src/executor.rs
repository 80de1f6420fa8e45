//! Round-robin scheduler over execution states.
//!
//! Each outer iteration advances every active state by exactly one
//! instruction. States forked during the iteration join the active set after
//! the surviving states, in the order they were forked. A state whose status
//! leaves [`Status::Active`] moves to the finished set. Exploration ends when
//! no active state remains, or when the optional step budget runs out.

use tracing::{debug, info, warn};

use crate::cfg::{Cfg, NodeId};
use crate::error::{ExecutionError, PathDiagnostic, PathError};
use crate::program::Program;
use crate::pseudocode;
use crate::state::{ExecutionState, StateId, Status, StepContext};

/// Buffer name used by `read_str` when none is configured.
pub const DEFAULT_INPUT_NAME: &str = "flag";

/// Exploration settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Length of every buffer read by `read_str`.
    pub input_length: usize,
    /// Name of the first buffer; later reads on the same path get `_1`, `_2`, ...
    pub input_name: String,
    /// Upper bound on single-instruction steps across all states.
    pub step_budget: Option<usize>,
}

impl ExecutorConfig {
    pub fn new(input_length: usize) -> Self {
        Self {
            input_length,
            input_name: DEFAULT_INPUT_NAME.to_string(),
            step_budget: None,
        }
    }

    pub fn with_input_name(mut self, name: impl Into<String>) -> Self {
        self.input_name = name.into();
        self
    }

    pub fn with_step_budget(mut self, budget: usize) -> Self {
        self.step_budget = Some(budget);
        self
    }
}

pub struct Executor {
    program: Program,
    config: ExecutorConfig,
    cfg: Cfg,
    root_node: NodeId,
    active: Vec<ExecutionState>,
    finished: Vec<ExecutionState>,
    next_id: usize,
    steps: usize,
    diagnostics: Vec<PathDiagnostic>,
    truncated: bool,
}

impl Executor {
    /// Create an executor with a single root state at the first instruction.
    pub fn new(program: impl Into<Program>, config: ExecutorConfig) -> Self {
        let mut cfg = Cfg::new();
        let root_node = cfg.new_linear();
        let root_id = ExecutionState::root_id();
        Self {
            program: program.into(),
            config,
            cfg,
            root_node,
            active: vec![ExecutionState::root(root_id, root_node)],
            finished: Vec::new(),
            next_id: root_id.index() + 1,
            steps: 0,
            diagnostics: Vec::new(),
            truncated: false,
        }
    }

    /// Run until no active state remains.
    pub fn explore(&mut self) -> Result<(), ExecutionError> {
        while self.step()? {}
        info!(
            states = self.finished.len(),
            steps = self.steps,
            diagnostics = self.diagnostics.len(),
            truncated = self.truncated,
            "exploration finished"
        );
        Ok(())
    }

    /// Run one outer iteration. Returns whether any state is still active.
    pub fn step(&mut self) -> Result<bool, ExecutionError> {
        let snapshot = std::mem::take(&mut self.active);
        let mut survivors = Vec::with_capacity(snapshot.len());
        let mut spawned = Vec::new();

        for mut state in snapshot {
            if self.budget_exhausted() {
                self.truncate(state)?;
                continue;
            }

            let outcome = {
                let mut ctx = StepContext::new(
                    &self.program,
                    &self.config,
                    &mut self.cfg,
                    &mut self.next_id,
                );
                state.step(&mut ctx)?
            };
            self.steps += 1;

            if let Some(error) = outcome.error {
                self.record(state.id(), state.address(), error);
            }
            spawned.extend(outcome.spawned);

            if state.is_active() {
                survivors.push(state);
            } else {
                debug!(state = %state.id(), status = ?state.status(), "state finished");
                self.finished.push(state);
            }
        }

        survivors.extend(spawned);
        if self.budget_exhausted() {
            for state in survivors {
                self.truncate(state)?;
            }
        } else {
            self.active = survivors;
        }

        Ok(!self.active.is_empty())
    }

    fn budget_exhausted(&self) -> bool {
        self.config
            .step_budget
            .is_some_and(|budget| self.steps >= budget)
    }

    fn truncate(&mut self, mut state: ExecutionState) -> Result<(), ExecutionError> {
        self.truncated = true;
        state.abandon(&mut self.cfg, pseudocode::EXPLORATION_TRUNCATED)?;
        self.record(state.id(), state.address(), PathError::BudgetExhausted);
        self.finished.push(state);
        Ok(())
    }

    fn record(&mut self, state: StateId, address: usize, error: PathError) {
        warn!(%state, address = format_args!("{address:#x}"), "{error}");
        self.diagnostics.push(PathDiagnostic {
            state,
            address,
            error,
        });
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    pub fn cfg(&self) -> &Cfg {
        &self.cfg
    }

    pub fn active(&self) -> &[ExecutionState] {
        &self.active
    }

    /// Finished states in the order they left the active set.
    pub fn finished(&self) -> &[ExecutionState] {
        &self.finished
    }

    pub fn diagnostics(&self) -> &[PathDiagnostic] {
        &self.diagnostics
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Whether the step budget cut exploration short.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Linearized statements of the root state's tree.
    pub fn root_lines(&self) -> Vec<String> {
        self.cfg.linearize(self.root_node)
    }

    /// The root tree wrapped in the function template.
    pub fn pseudocode(&self) -> String {
        pseudocode::render_function(&self.root_lines())
    }

    /// Count of finished states with the given status.
    pub fn count(&self, status: Status) -> usize {
        self.finished.iter().filter(|s| s.status() == status).count()
    }
}
