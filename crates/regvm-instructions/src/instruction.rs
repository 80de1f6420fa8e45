use std::fmt;

use serde::Serialize;

use crate::register::Register;

/// Literal written by every `set` form.
pub const SET_LITERAL: &str = "0";

/// Literal appended by `append`.
pub const APPEND_LITERAL: &str = "1";

/// Mnemonic names as printed in the disassembly listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mnemonic {
    RelJmp,
    IfEqRelJmp,
    IfNeqRelJmp,
    IfLtRelJmp,
    Clear,
    WriteLastCharCode,
    WriteChar,
    ConcatStrings,
    Set,
    Add,
    Append,
    PopLastChar,
    InvertSign,
    Print,
    ReadStr,
    Ret,
}

impl Mnemonic {
    pub fn as_str(self) -> &'static str {
        match self {
            Mnemonic::RelJmp => "rel_jmp",
            Mnemonic::IfEqRelJmp => "if_eq_rel_jmp",
            Mnemonic::IfNeqRelJmp => "if_neq_rel_jmp",
            Mnemonic::IfLtRelJmp => "if_lt_rel_jmp",
            Mnemonic::Clear => "clear",
            Mnemonic::WriteLastCharCode => "write_last_char_code",
            Mnemonic::WriteChar => "write_char",
            Mnemonic::ConcatStrings => "concat_strings",
            Mnemonic::Set => "set",
            Mnemonic::Add => "add",
            Mnemonic::Append => "append",
            Mnemonic::PopLastChar => "pop_last_char",
            Mnemonic::InvertSign => "invert_sign",
            Mnemonic::Print => "print",
            Mnemonic::ReadStr => "read_str",
            Mnemonic::Ret => "ret",
        }
    }

    /// Whether the listing separates this instruction from the next one.
    pub fn is_control_transfer(self) -> bool {
        matches!(
            self,
            Mnemonic::RelJmp
                | Mnemonic::IfEqRelJmp
                | Mnemonic::IfNeqRelJmp
                | Mnemonic::IfLtRelJmp
                | Mnemonic::Ret
        )
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison performed by a conditional relative jump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    Eq,
    Neq,
    Lt,
}

impl Condition {
    /// Operator used when rendering the branch test.
    pub fn operator(self) -> &'static str {
        match self {
            Condition::Eq => "==",
            Condition::Neq => "!=",
            Condition::Lt => "<",
        }
    }
}

/// An operand as it appears in the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Reg(Register),
    Literal(&'static str),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Reg(reg) => write!(f, "{reg}"),
            Operand::Literal(lit) => f.write_str(lit),
        }
    }
}

/// The closed instruction catalogue.
///
/// Registers that are fixed by the opcode (the jump operands, the print
/// source, the read destination) are still carried explicitly so the
/// executor never has to know about them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    RelJmp {
        offset: Register,
    },
    CondRelJmp {
        condition: Condition,
        offset: Register,
        left: Register,
        right: Register,
    },
    Clear {
        reg: Register,
    },
    WriteLastCharCode {
        dest: Register,
        src: Register,
    },
    WriteChar {
        dest: Register,
        src: Register,
    },
    ConcatStrings {
        dest: Register,
        left: Register,
        right: Register,
    },
    Set {
        reg: Register,
        value: &'static str,
    },
    Add {
        dest: Register,
        left: Register,
        right: Register,
    },
    Append {
        reg: Register,
        value: &'static str,
    },
    PopLastChar {
        reg: Register,
    },
    InvertSign {
        reg: Register,
    },
    Print {
        src: Register,
    },
    ReadStr {
        dest: Register,
    },
    Ret,
}

impl Instruction {
    pub fn mnemonic(&self) -> Mnemonic {
        match self {
            Instruction::RelJmp { .. } => Mnemonic::RelJmp,
            Instruction::CondRelJmp { condition, .. } => match condition {
                Condition::Eq => Mnemonic::IfEqRelJmp,
                Condition::Neq => Mnemonic::IfNeqRelJmp,
                Condition::Lt => Mnemonic::IfLtRelJmp,
            },
            Instruction::Clear { .. } => Mnemonic::Clear,
            Instruction::WriteLastCharCode { .. } => Mnemonic::WriteLastCharCode,
            Instruction::WriteChar { .. } => Mnemonic::WriteChar,
            Instruction::ConcatStrings { .. } => Mnemonic::ConcatStrings,
            Instruction::Set { .. } => Mnemonic::Set,
            Instruction::Add { .. } => Mnemonic::Add,
            Instruction::Append { .. } => Mnemonic::Append,
            Instruction::PopLastChar { .. } => Mnemonic::PopLastChar,
            Instruction::InvertSign { .. } => Mnemonic::InvertSign,
            Instruction::Print { .. } => Mnemonic::Print,
            Instruction::ReadStr { .. } => Mnemonic::ReadStr,
            Instruction::Ret => Mnemonic::Ret,
        }
    }

    /// Operands in listing order.
    ///
    /// `if_lt_rel_jmp` lists its offset last; every other jump lists it first.
    pub fn operands(&self) -> Vec<Operand> {
        use Operand::{Literal, Reg};

        match *self {
            Instruction::RelJmp { offset } => vec![Reg(offset)],
            Instruction::CondRelJmp {
                condition: Condition::Lt,
                offset,
                left,
                right,
            } => vec![Reg(left), Reg(right), Reg(offset)],
            Instruction::CondRelJmp {
                offset,
                left,
                right,
                ..
            } => vec![Reg(offset), Reg(left), Reg(right)],
            Instruction::Clear { reg }
            | Instruction::PopLastChar { reg }
            | Instruction::InvertSign { reg } => vec![Reg(reg)],
            Instruction::WriteLastCharCode { dest, src } | Instruction::WriteChar { dest, src } => {
                vec![Reg(dest), Reg(src)]
            }
            Instruction::ConcatStrings { dest, left, right }
            | Instruction::Add { dest, left, right } => vec![Reg(dest), Reg(left), Reg(right)],
            Instruction::Set { reg, value } | Instruction::Append { reg, value } => {
                vec![Reg(reg), Literal(value)]
            }
            Instruction::Print { src } => vec![Reg(src)],
            Instruction::ReadStr { dest } => vec![Reg(dest)],
            Instruction::Ret => Vec::new(),
        }
    }
}

/// An instruction together with the byte offset of its opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedInstr {
    pub address: usize,
    pub instr: Instruction,
}

impl DecodedInstr {
    pub fn mnemonic(&self) -> Mnemonic {
        self.instr.mnemonic()
    }
}

/// Column the operand list starts at, counted from the mnemonic.
const OPERAND_COLUMN: usize = 22;

impl fmt::Display for DecodedInstr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mnemonic = self.mnemonic().as_str();
        let operands = self
            .instr
            .operands()
            .iter()
            .map(Operand::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let padding = OPERAND_COLUMN.saturating_sub(mnemonic.len());
        write!(
            f,
            "{:#x}:\t{}{}{}",
            self.address,
            mnemonic,
            " ".repeat(padding),
            operands
        )
    }
}
