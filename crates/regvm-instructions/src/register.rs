use std::fmt;

use serde::Serialize;

/// Number of register slots in the VM.
pub const REGISTER_COUNT: usize = 8;

/// One of the eight VM register slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "String")]
pub struct Register(u8);

impl Register {
    pub const R0: Register = Register(0);
    pub const R1: Register = Register(1);
    pub const R2: Register = Register(2);
    pub const R3: Register = Register(3);
    pub const R4: Register = Register(4);
    pub const R5: Register = Register(5);
    pub const R6: Register = Register(6);
    pub const R7: Register = Register(7);

    /// Build a register from a raw index, rejecting anything outside `0..8`.
    pub fn new(index: u8) -> Option<Self> {
        if (index as usize) < REGISTER_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Slot index into a register file.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// All registers in slot order.
    pub fn all() -> impl Iterator<Item = Register> {
        (0..REGISTER_COUNT as u8).map(Register)
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "reg{}", self.0)
    }
}

impl From<Register> for String {
    fn from(reg: Register) -> Self {
        reg.to_string()
    }
}
