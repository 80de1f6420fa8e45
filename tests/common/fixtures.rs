//! Test fixture loading and a small bytecode assembler.

#![allow(dead_code)]

use std::path::PathBuf;

use regvm_decompiler::DecompilerConfig;

/// Directory containing test fixtures.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Path of a fixture file under tests/fixtures/.
pub fn fixture_path(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

/// Load a fixture file from tests/fixtures/
pub fn load_fixture(name: &str) -> String {
    let path = fixture_path(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to load fixture '{}': {}", path.display(), e))
}

/// Config with the given input length and everything else defaulted.
pub fn config(input_length: usize) -> DecompilerConfig {
    DecompilerConfig::builder()
        .input_length(input_length)
        .build()
        .unwrap()
}

/// Emits bytecode one instruction at a time.
///
/// Operands are taken in listing order and written in encoding order.
#[derive(Debug, Default, Clone)]
pub struct Asm {
    bytes: Vec<u8>,
}

impl Asm {
    pub fn new() -> Self {
        Self::default()
    }

    fn emit(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    /// Address the next instruction will be emitted at.
    pub fn here(&self) -> usize {
        self.bytes.len()
    }

    pub fn rel_jmp(self) -> Self {
        self.emit(&[40])
    }

    pub fn if_eq(self) -> Self {
        self.emit(&[41])
    }

    pub fn if_neq(self) -> Self {
        self.emit(&[42])
    }

    pub fn if_lt(self) -> Self {
        self.emit(&[43])
    }

    pub fn clear(self, reg: u8) -> Self {
        self.emit(&[44 + reg])
    }

    pub fn write_last_char_code(self, dest: u8, src: u8) -> Self {
        self.emit(&[61, src, dest])
    }

    pub fn write_char(self, dest: u8, src: u8) -> Self {
        self.emit(&[62, src, dest])
    }

    pub fn concat(self, dest: u8, left: u8, right: u8) -> Self {
        self.emit(&[63, left, right, dest])
    }

    pub fn set(self, reg: u8) -> Self {
        self.emit(&[64 + reg])
    }

    pub fn add(self, dest: u8, left: u8, right: u8) -> Self {
        self.emit(&[81, left, right, dest])
    }

    pub fn append(self, reg: u8) -> Self {
        self.emit(&[82, reg])
    }

    pub fn pop_last_char(self, reg: u8) -> Self {
        self.emit(&[83, reg])
    }

    pub fn invert_sign(self, reg: u8) -> Self {
        self.emit(&[84, reg])
    }

    pub fn print(self) -> Self {
        self.emit(&[85])
    }

    pub fn read_str(self) -> Self {
        self.emit(&[86])
    }

    pub fn ret(self) -> Self {
        self.emit(&[87])
    }

    /// `set` followed by `ones` appends: the decimal number made of `ones` ones.
    pub fn repunit(self, reg: u8, ones: usize) -> Self {
        (0..ones).fold(self.set(reg), |asm, _| asm.append(reg))
    }

    pub fn repeat(self, times: usize, f: impl Fn(Self) -> Self) -> Self {
        (0..times).fold(self, |asm, _| f(asm))
    }

    pub fn build(self) -> Vec<u8> {
        self.bytes
    }
}

/// A two-character checker for the input "ok".
///
/// Each input character plus a constant is compared against the empty
/// string; a mismatch jumps to a shared failure block at the end.
pub fn checker() -> Vec<u8> {
    Asm::new()
        .read_str()
        // flag[1] + 111
        .write_last_char_code(6, 0)
        .repunit(7, 3)
        .add(6, 6, 7)
        .clear(7)
        // reg5 = 11 * 5 = 55
        .repunit(5, 2)
        .repunit(2, 2)
        .repeat(4, |asm| asm.add(5, 5, 2))
        .if_neq()
        // flag[0] + 107
        .pop_last_char(0)
        .write_last_char_code(6, 0)
        .repunit(7, 3)
        .repunit(1, 1)
        .invert_sign(1)
        .repeat(4, |asm| asm.add(7, 7, 1))
        .add(6, 6, 7)
        .clear(7)
        .repunit(5, 2)
        .if_neq()
        // success
        .set(4)
        .append(4)
        .print()
        .ret()
        .repeat(6, |asm| asm.clear(3))
        // failure
        .clear(4)
        .print()
        .ret()
        .build()
}
