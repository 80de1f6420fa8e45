//! A single execution path.
//!
//! An [`ExecutionState`] owns its register file and the CFG node its
//! statements go into. It is advanced one instruction at a time by the
//! executor; a conditional jump ends the state and hands back the two states
//! that continue from the branch.

use std::fmt;

use regvm_instructions::{Condition, DecodedInstr, Instruction, Register, REGISTER_COUNT};
use serde::Serialize;
use tracing::debug;

use crate::cfg::{Cfg, NodeId};
use crate::error::{ExecutionError, PathError};
use crate::executor::ExecutorConfig;
use crate::program::Program;
use crate::pseudocode;
use crate::semantics::{self, parse_int, EvalError};
use crate::symbol::{StrLen, Symbol, Value};

/// Identifier of an execution state, unique within one exploration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct StateId(usize);

impl StateId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Active,
    /// Reached `ret` or handed off to its children at a branch.
    Terminated,
    /// Stopped on a path error.
    Errored,
}

/// The eight registers of one path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterFile([Value; REGISTER_COUNT]);

impl RegisterFile {
    pub fn get(&self, reg: Register) -> &Value {
        &self.0[reg.index()]
    }

    pub fn set(&mut self, reg: Register, value: Value) {
        self.0[reg.index()] = value;
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.0.iter()
    }
}

/// Shared resources a state needs while stepping.
pub(crate) struct StepContext<'a> {
    pub(crate) program: &'a Program,
    pub(crate) config: &'a ExecutorConfig,
    pub(crate) cfg: &'a mut Cfg,
    next_id: &'a mut usize,
}

impl<'a> StepContext<'a> {
    pub(crate) fn new(
        program: &'a Program,
        config: &'a ExecutorConfig,
        cfg: &'a mut Cfg,
        next_id: &'a mut usize,
    ) -> Self {
        Self {
            program,
            config,
            cfg,
            next_id,
        }
    }

    fn fresh_id(&mut self) -> StateId {
        let id = StateId(*self.next_id);
        *self.next_id += 1;
        id
    }
}

/// What a single step produced besides mutating the state.
#[derive(Debug, Default)]
pub(crate) struct StepOutcome {
    /// States forked at a branch, consequent first.
    pub(crate) spawned: Vec<ExecutionState>,
    /// Set when the step ended this path with an error.
    pub(crate) error: Option<PathError>,
}

impl StepOutcome {
    fn failed(error: PathError) -> Self {
        Self {
            spawned: Vec::new(),
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExecutionState {
    id: StateId,
    parent: Option<StateId>,
    /// Index into the program of the next instruction to run.
    position: usize,
    /// Address of the last instruction this state ran.
    address: usize,
    registers: RegisterFile,
    status: Status,
    node: NodeId,
    /// Number of `read_str` executed on this path.
    reads: usize,
}

impl ExecutionState {
    /// The root state, starting at the first instruction with empty registers.
    pub(crate) fn root(id: StateId, node: NodeId) -> Self {
        Self {
            id,
            parent: None,
            position: 0,
            address: 0,
            registers: RegisterFile::default(),
            status: Status::Active,
            node,
            reads: 0,
        }
    }

    pub(crate) fn root_id() -> StateId {
        StateId(0)
    }

    pub fn id(&self) -> StateId {
        self.id
    }

    pub fn parent(&self) -> Option<StateId> {
        self.parent
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn address(&self) -> usize {
        self.address
    }

    pub fn registers(&self) -> &RegisterFile {
        &self.registers
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == Status::Active
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Stop this path with a placeholder statement in its own node.
    pub(crate) fn abandon(&mut self, cfg: &mut Cfg, placeholder: &str) -> Result<(), ExecutionError> {
        cfg.add_statement(self.node, placeholder)?;
        self.status = Status::Errored;
        Ok(())
    }

    /// Execute the instruction at the current position.
    pub(crate) fn step(&mut self, ctx: &mut StepContext<'_>) -> Result<StepOutcome, ExecutionError> {
        let Some(decoded) = ctx.program.get(self.position).copied() else {
            self.abandon(ctx.cfg, pseudocode::END_OF_PROGRAM)?;
            return Ok(StepOutcome::failed(PathError::EndOfProgram));
        };
        let DecodedInstr { address, instr } = decoded;
        self.address = address;
        self.position += 1;

        let eval = |source: EvalError| ExecutionError::Evaluation { address, source };

        match instr {
            Instruction::RelJmp { .. } => {
                return Err(ExecutionError::UnsupportedInstruction {
                    address,
                    mnemonic: instr.mnemonic(),
                });
            }
            Instruction::CondRelJmp {
                condition,
                offset,
                left,
                right,
            } => return self.branch(ctx, address, condition, offset, left, right),
            Instruction::Clear { reg } => self.registers.set(reg, Value::empty()),
            Instruction::Set { reg, value } => self.registers.set(reg, Value::concrete(value)),
            Instruction::Append { reg, value } => {
                let v = semantics::append(self.registers.get(reg), value);
                self.registers.set(reg, v);
            }
            Instruction::Add { dest, left, right } => {
                let v = semantics::add(self.registers.get(left), self.registers.get(right))
                    .map_err(eval)?;
                self.registers.set(dest, v);
            }
            Instruction::ConcatStrings { dest, left, right } => {
                let v = semantics::concat(self.registers.get(left), self.registers.get(right));
                self.registers.set(dest, v);
            }
            Instruction::InvertSign { reg } => {
                let v = semantics::negate(self.registers.get(reg)).map_err(eval)?;
                self.registers.set(reg, v);
            }
            Instruction::WriteChar { dest, src } => {
                let v = semantics::char_from_code(self.registers.get(src)).map_err(eval)?;
                self.registers.set(dest, v);
            }
            Instruction::WriteLastCharCode { dest, src } => {
                let v = semantics::last_char_code(self.registers.get(src)).map_err(eval)?;
                self.registers.set(dest, v);
            }
            Instruction::PopLastChar { reg } => {
                let v = semantics::pop_last_char(self.registers.get(reg));
                self.registers.set(reg, v);
            }
            Instruction::Print { src } => {
                let line = pseudocode::print(self.registers.get(src));
                ctx.cfg.add_statement(self.node, line)?;
            }
            Instruction::ReadStr { dest } => {
                let name = match self.reads {
                    0 => ctx.config.input_name.clone(),
                    n => format!("{}_{n}", ctx.config.input_name),
                };
                self.reads += 1;
                for line in pseudocode::read_input(&name, ctx.config.input_length) {
                    ctx.cfg.add_statement(self.node, line)?;
                }
                let buffer = Symbol::string(name, StrLen::Known(ctx.config.input_length));
                self.registers.set(dest, buffer.into());
            }
            Instruction::Ret => {
                ctx.cfg.add_statement(self.node, pseudocode::ret())?;
                self.status = Status::Terminated;
            }
        }

        Ok(StepOutcome::default())
    }

    fn branch(
        &mut self,
        ctx: &mut StepContext<'_>,
        address: usize,
        condition: Condition,
        offset: Register,
        left: Register,
        right: Register,
    ) -> Result<StepOutcome, ExecutionError> {
        let offset = match self.registers.get(offset) {
            Value::Symbolic(sym) => {
                let offset = sym.to_string();
                self.abandon(ctx.cfg, pseudocode::UNKNOWN_PATH)?;
                return Ok(StepOutcome::failed(PathError::UnresolvableBranch { offset }));
            }
            Value::Concrete(s) => {
                parse_int(s).map_err(|source| ExecutionError::Evaluation { address, source })?
            }
        };

        let target = (address as i64)
            .checked_add(1)
            .and_then(|a| a.checked_add(offset))
            .ok_or(ExecutionError::Evaluation {
                address,
                source: EvalError::Overflow,
            })?;
        let Some(target_position) = ctx.program.position_of(target) else {
            self.abandon(ctx.cfg, pseudocode::UNKNOWN_PATH)?;
            return Ok(StepOutcome::failed(PathError::MissingJumpTarget { target }));
        };
        let test = pseudocode::comparison(
            self.registers.get(left),
            condition.operator(),
            self.registers.get(right),
        );

        let consequent = self.fork(ctx, target_position);
        let alternate = self.fork(ctx, self.position);
        self.status = Status::Terminated;

        let joined = ctx.cfg.new_conditional(test, consequent.node, alternate.node);
        ctx.cfg.set_next(self.node, joined)?;
        debug!(
            state = %self.id,
            address = format_args!("{address:#x}"),
            consequent = %consequent.id,
            alternate = %alternate.id,
            "forked at branch"
        );
        Ok(StepOutcome {
            spawned: vec![consequent, alternate],
            error: None,
        })
    }

    /// A copy of this state continuing at `position` in a fresh node.
    fn fork(&self, ctx: &mut StepContext<'_>, position: usize) -> ExecutionState {
        ExecutionState {
            id: ctx.fresh_id(),
            parent: Some(self.id),
            position,
            address: self.address,
            registers: self.registers.clone(),
            status: Status::Active,
            node: ctx.cfg.new_linear(),
            reads: self.reads,
        }
    }
}
