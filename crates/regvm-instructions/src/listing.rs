//! Flat disassembly listing.

use crate::instruction::DecodedInstr;

/// One listing line per instruction, with an empty line after every
/// control-transferring instruction.
pub fn disassembly_lines(instrs: &[DecodedInstr]) -> Vec<String> {
    let mut lines = Vec::with_capacity(instrs.len());
    for instr in instrs {
        lines.push(instr.to_string());
        if instr.mnemonic().is_control_transfer() {
            lines.push(String::new());
        }
    }
    lines
}

/// The listing as text, every line newline-terminated.
pub fn render_disassembly(instrs: &[DecodedInstr]) -> String {
    disassembly_lines(instrs)
        .into_iter()
        .map(|line| line + "\n")
        .collect()
}
