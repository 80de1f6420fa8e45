//! Decompiler for register-VM bytecode.
//!
//! [`decompile`] runs the whole pipeline: decode the byte stream, render the
//! disassembly listing, explore every path symbolically and emit C-like
//! pseudocode together with an [`ExplorationReport`].

pub mod config;
pub mod report;
pub mod secret;

use std::path::PathBuf;

use regvm_instructions::{decode, render_disassembly, DecodeError, DecodedInstr};
use regvm_symbolic::{ExecutionError, Executor, ExecutorConfig, DEFAULT_INPUT_NAME};
use thiserror::Error;
use tracing::info;

pub use config::ConfigError;
pub use report::ExplorationReport;
pub use secret::recover_secret;

#[derive(Debug, Error)]
pub enum Error {
    #[error("decoding failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("exploration failed: {0}")]
    Execution(#[from] ExecutionError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize report: {0}")]
    Report(#[from] serde_json::Error),
}

/// Settings for one decompilation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecompilerConfig {
    /// Length of the buffers declared for `read_str`.
    pub input_length: usize,
    /// Name of the first input buffer.
    pub input_name: String,
    /// Upper bound on single-instruction steps across all paths.
    pub step_budget: Option<usize>,
    /// Whether to render the disassembly listing.
    pub emit_disassembly: bool,
}

impl DecompilerConfig {
    /// Create a new builder for `DecompilerConfig`.
    pub fn builder() -> DecompilerConfigBuilder {
        DecompilerConfigBuilder::default()
    }

    pub fn executor_config(&self) -> ExecutorConfig {
        let config = ExecutorConfig::new(self.input_length).with_input_name(&self.input_name);
        match self.step_budget {
            Some(budget) => config.with_step_budget(budget),
            None => config,
        }
    }
}

/// Builder for `DecompilerConfig` with fluent API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecompilerConfigBuilder {
    input_length: Option<usize>,
    input_name: Option<String>,
    step_budget: Option<usize>,
    emit_disassembly: Option<bool>,
}

impl DecompilerConfigBuilder {
    /// Set the length of the buffers declared for `read_str`.
    pub fn input_length(mut self, length: usize) -> Self {
        self.input_length = Some(length);
        self
    }

    /// Set the name of the first input buffer.
    pub fn input_name(mut self, name: impl Into<String>) -> Self {
        self.input_name = Some(name.into());
        self
    }

    /// Bound the number of exploration steps.
    pub fn step_budget(mut self, budget: usize) -> Self {
        self.step_budget = Some(budget);
        self
    }

    /// Set whether to render the disassembly listing.
    pub fn emit_disassembly(mut self, enabled: bool) -> Self {
        self.emit_disassembly = Some(enabled);
        self
    }

    /// Layer `other` on top of `self`; values set in `other` win.
    pub fn merge(self, other: DecompilerConfigBuilder) -> Self {
        Self {
            input_length: other.input_length.or(self.input_length),
            input_name: other.input_name.or(self.input_name),
            step_budget: other.step_budget.or(self.step_budget),
            emit_disassembly: other.emit_disassembly.or(self.emit_disassembly),
        }
    }

    /// Build the `DecompilerConfig`.
    ///
    /// The input length has no default and must be set.
    pub fn build(self) -> Result<DecompilerConfig, ConfigError> {
        let input_length = self.input_length.ok_or(ConfigError::MissingInputLength)?;
        let input_name = self
            .input_name
            .unwrap_or_else(|| DEFAULT_INPUT_NAME.to_string());
        if !config::is_identifier(&input_name) {
            return Err(ConfigError::InvalidInputName(input_name));
        }
        Ok(DecompilerConfig {
            input_length,
            input_name,
            step_budget: self.step_budget,
            emit_disassembly: self.emit_disassembly.unwrap_or(true),
        })
    }
}

/// Artifacts produced by [`decompile`].
#[derive(Debug, Clone)]
pub struct Decompilation {
    pub instructions: Vec<DecodedInstr>,
    /// Disassembly listing, when enabled in the config.
    pub disassembly: Option<String>,
    pub pseudocode: String,
    pub report: ExplorationReport,
}

/// Decode `bytes` and reconstruct pseudocode for every path through them.
pub fn decompile(bytes: &[u8], config: &DecompilerConfig) -> Result<Decompilation, Error> {
    let instructions = decode(bytes)?;
    info!(
        bytes = bytes.len(),
        instructions = instructions.len(),
        "decoded bytecode"
    );

    let disassembly = config
        .emit_disassembly
        .then(|| render_disassembly(&instructions));

    let mut executor = Executor::new(instructions.clone(), config.executor_config());
    executor.explore()?;

    Ok(Decompilation {
        instructions,
        disassembly,
        pseudocode: executor.pseudocode(),
        report: ExplorationReport::from_executor(&executor),
    })
}
