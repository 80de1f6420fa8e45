use std::collections::HashMap;

use regvm_instructions::DecodedInstr;

/// A decoded program indexed by instruction address.
#[derive(Debug, Clone)]
pub struct Program {
    instructions: Vec<DecodedInstr>,
    /// Byte address -> position in `instructions`.
    positions: HashMap<usize, usize>,
}

impl Program {
    pub fn new(instructions: Vec<DecodedInstr>) -> Self {
        let positions = instructions
            .iter()
            .enumerate()
            .map(|(pos, instr)| (instr.address, pos))
            .collect();
        Self {
            instructions,
            positions,
        }
    }

    pub fn instructions(&self) -> &[DecodedInstr] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Instruction at a list position.
    pub fn get(&self, position: usize) -> Option<&DecodedInstr> {
        self.instructions.get(position)
    }

    /// List position of the instruction starting at `address`, if any.
    pub fn position_of(&self, address: i64) -> Option<usize> {
        let address = usize::try_from(address).ok()?;
        self.positions.get(&address).copied()
    }
}

impl From<Vec<DecodedInstr>> for Program {
    fn from(instructions: Vec<DecodedInstr>) -> Self {
        Self::new(instructions)
    }
}
