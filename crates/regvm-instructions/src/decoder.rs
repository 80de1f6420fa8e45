//! Bytecode decoder.
//!
//! Every instruction is a single opcode byte followed by zero to three
//! register-index bytes. Jump, print and read forms take their registers
//! implicitly from the opcode.

use thiserror::Error;

use crate::instruction::{Condition, DecodedInstr, Instruction, APPEND_LITERAL, SET_LITERAL};
use crate::register::Register;

/// First opcode of the eight `clear` forms.
const CLEAR_BASE: u8 = 44;
/// First opcode of the eight `set` forms.
const SET_BASE: u8 = 64;

/// Errors raised while decoding a bytecode buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unknown opcode {opcode} at {address:#x}")]
    UnknownOpcode { address: usize, opcode: u8 },

    #[error("unknown register with id {index} in instruction at {address:#x}")]
    InvalidRegister { address: usize, index: u8 },

    #[error("bytecode ends inside the operands of the instruction at {address:#x}")]
    Truncated { address: usize },
}

/// Cursor over the bytecode buffer.
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn read_byte(&mut self, address: usize) -> Result<u8, DecodeError> {
        let byte = *self
            .bytes
            .get(self.pos)
            .ok_or(DecodeError::Truncated { address })?;
        self.pos += 1;
        Ok(byte)
    }

    fn read_reg(&mut self, address: usize) -> Result<Register, DecodeError> {
        let index = self.read_byte(address)?;
        Register::new(index).ok_or(DecodeError::InvalidRegister { address, index })
    }
}

/// Decode a full bytecode buffer into its instruction list.
pub fn decode(bytes: &[u8]) -> Result<Vec<DecodedInstr>, DecodeError> {
    let mut reader = Reader::new(bytes);
    let mut instructions = Vec::new();

    while !reader.at_end() {
        let address = reader.pos;
        let opcode = reader.read_byte(address)?;
        let instr = decode_one(&mut reader, address, opcode)?;
        instructions.push(DecodedInstr { address, instr });
    }

    Ok(instructions)
}

fn decode_one(reader: &mut Reader<'_>, address: usize, opcode: u8) -> Result<Instruction, DecodeError> {
    let instr = match opcode {
        40 => Instruction::RelJmp {
            offset: Register::R5,
        },
        41 => conditional(Condition::Eq),
        42 => conditional(Condition::Neq),
        43 => conditional(Condition::Lt),
        44..=51 => Instruction::Clear {
            reg: fixed_register(address, opcode - CLEAR_BASE)?,
        },
        61 => {
            let src = reader.read_reg(address)?;
            let dest = reader.read_reg(address)?;
            Instruction::WriteLastCharCode { dest, src }
        }
        62 => {
            let src = reader.read_reg(address)?;
            let dest = reader.read_reg(address)?;
            Instruction::WriteChar { dest, src }
        }
        63 => {
            let left = reader.read_reg(address)?;
            let right = reader.read_reg(address)?;
            let dest = reader.read_reg(address)?;
            Instruction::ConcatStrings { dest, left, right }
        }
        64..=71 => Instruction::Set {
            reg: fixed_register(address, opcode - SET_BASE)?,
            value: SET_LITERAL,
        },
        81 => {
            let left = reader.read_reg(address)?;
            let right = reader.read_reg(address)?;
            let dest = reader.read_reg(address)?;
            Instruction::Add { dest, left, right }
        }
        82 => Instruction::Append {
            reg: reader.read_reg(address)?,
            value: APPEND_LITERAL,
        },
        83 => Instruction::PopLastChar {
            reg: reader.read_reg(address)?,
        },
        84 => Instruction::InvertSign {
            reg: reader.read_reg(address)?,
        },
        85 => Instruction::Print { src: Register::R4 },
        86 => Instruction::ReadStr { dest: Register::R0 },
        87 => Instruction::Ret,
        _ => return Err(DecodeError::UnknownOpcode { address, opcode }),
    };
    Ok(instr)
}

/// Jump forms read their operands from fixed registers.
fn conditional(condition: Condition) -> Instruction {
    Instruction::CondRelJmp {
        condition,
        offset: Register::R5,
        left: Register::R6,
        right: Register::R7,
    }
}

/// Register encoded in the low bits of a `clear`/`set` opcode.
fn fixed_register(address: usize, index: u8) -> Result<Register, DecodeError> {
    Register::new(index).ok_or(DecodeError::InvalidRegister { address, index })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::Mnemonic;

    #[test]
    fn test_decode_straight_line() {
        let instrs = decode(&[64, 85, 87]).unwrap();
        let addresses: Vec<usize> = instrs.iter().map(|i| i.address).collect();
        let mnemonics: Vec<Mnemonic> = instrs.iter().map(|i| i.mnemonic()).collect();
        assert_eq!(addresses, vec![0, 1, 2]);
        assert_eq!(mnemonics, vec![Mnemonic::Set, Mnemonic::Print, Mnemonic::Ret]);
        assert_eq!(
            instrs[0].instr,
            Instruction::Set {
                reg: Register::R0,
                value: "0"
            }
        );
    }

    #[test]
    fn test_decode_operand_order() {
        // add left=1 right=2 dest=3, then write_char src=4 dest=5
        let instrs = decode(&[81, 1, 2, 3, 62, 4, 5]).unwrap();
        assert_eq!(
            instrs[0].instr,
            Instruction::Add {
                dest: Register::R3,
                left: Register::R1,
                right: Register::R2
            }
        );
        assert_eq!(instrs[1].address, 4);
        assert_eq!(
            instrs[1].instr,
            Instruction::WriteChar {
                dest: Register::R5,
                src: Register::R4
            }
        );
    }

    #[test]
    fn test_decode_register_ranges() {
        let instrs = decode(&[44, 51, 71]).unwrap();
        assert_eq!(instrs[0].instr, Instruction::Clear { reg: Register::R0 });
        assert_eq!(instrs[1].instr, Instruction::Clear { reg: Register::R7 });
        assert_eq!(
            instrs[2].instr,
            Instruction::Set {
                reg: Register::R7,
                value: "0"
            }
        );
    }

    #[test]
    fn test_decode_addresses_have_no_gaps() {
        let bytes = [86, 63, 0, 1, 2, 82, 3, 42, 61, 0, 6, 87];
        let instrs = decode(&bytes).unwrap();
        let addresses: Vec<usize> = instrs.iter().map(|i| i.address).collect();
        assert_eq!(addresses, vec![0, 1, 5, 7, 8, 11]);
    }

    #[test]
    fn test_decode_is_deterministic() {
        let bytes = [86, 61, 0, 6, 65, 42, 83, 0, 87];
        assert_eq!(decode(&bytes).unwrap(), decode(&bytes).unwrap());
    }

    #[test]
    fn test_unknown_opcode() {
        assert_eq!(
            decode(&[64, 55]),
            Err(DecodeError::UnknownOpcode {
                address: 1,
                opcode: 55
            })
        );
    }

    #[test]
    fn test_invalid_register() {
        assert_eq!(
            decode(&[83, 8]),
            Err(DecodeError::InvalidRegister {
                address: 0,
                index: 8
            })
        );
    }

    #[test]
    fn test_truncated_operands() {
        assert_eq!(decode(&[87, 81, 1]), Err(DecodeError::Truncated { address: 1 }));
    }

    #[test]
    fn test_empty_input() {
        assert!(decode(&[]).unwrap().is_empty());
    }
}
