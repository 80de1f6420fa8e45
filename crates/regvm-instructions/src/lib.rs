//! Instruction catalogue for the register VM.
//!
//! This crate turns a raw bytecode buffer into a typed instruction list and
//! renders the flat disassembly listing.
//!
//! # Module Structure
//!
//! - `register`: the eight register slots
//! - `instruction`: the closed instruction catalogue and its mnemonics
//! - `decoder`: byte stream to instruction list
//! - `listing`: textual disassembly

pub mod decoder;
pub mod instruction;
pub mod listing;
pub mod register;

pub use decoder::{decode, DecodeError};
pub use instruction::{
    Condition, DecodedInstr, Instruction, Mnemonic, Operand, APPEND_LITERAL, SET_LITERAL,
};
pub use listing::{disassembly_lines, render_disassembly};
pub use register::{Register, REGISTER_COUNT};
