//! End-to-end decompilation scenarios.

mod common;

use common::fixtures::{checker, config, Asm};
use regvm_decompiler::{decompile, recover_secret, DecompilerConfig, Error};
use regvm_instructions::Mnemonic;
use regvm_symbolic::{ExecutionError, Status};

const HEADER: &str = "#include <stdio.h>\n\nint main(int argc, char* argv[]) {\n";

fn body(pseudocode: &str) -> Vec<&str> {
    pseudocode
        .strip_prefix(HEADER)
        .and_then(|rest| rest.strip_suffix('}'))
        .expect("pseudocode is wrapped in the main template")
        .lines()
        .map(|line| line.strip_prefix('\t').expect("body lines are indented"))
        .collect()
}

#[test]
fn straight_line_program() {
    let out = decompile(&[64, 85, 87], &config(8)).unwrap();

    let addresses: Vec<_> = out.instructions.iter().map(|i| i.address).collect();
    assert_eq!(addresses, vec![0, 1, 2]);
    let mnemonics: Vec<_> = out.instructions.iter().map(|i| i.mnemonic()).collect();
    assert_eq!(mnemonics, vec![Mnemonic::Set, Mnemonic::Print, Mnemonic::Ret]);

    let expected = format!(
        "0x0:\tset{}reg0, 0\n0x1:\tprint{}reg4\n0x2:\tret{}\n\n",
        " ".repeat(19),
        " ".repeat(17),
        " ".repeat(19)
    );
    assert_eq!(out.disassembly.as_deref(), Some(expected.as_str()));

    assert_eq!(body(&out.pseudocode), vec!["puts(\"\");", "return 0;"]);
    assert!(!out.pseudocode[HEADER.len()..].contains('{'));
    assert_eq!(out.report.states.len(), 1);
}

#[test]
fn single_branch_forks_two_paths() {
    let bytes = Asm::new()
        .set(4)
        .set(5)
        .append(6)
        .if_neq()
        .print()
        .ret()
        .build();
    let out = decompile(&bytes, &config(8)).unwrap();

    let children: Vec<_> = out
        .report
        .states
        .iter()
        .filter(|s| s.parent.is_some())
        .collect();
    assert_eq!(children.len(), 2);
    assert!(children.iter().all(|s| s.status == Status::Terminated));

    assert_eq!(
        body(&out.pseudocode),
        vec![
            "if (\"1\" != \"\") {",
            "\tputs(\"0\");",
            "\treturn 0;",
            "} else {",
            "\tputs(\"0\");",
            "\treturn 0;",
            "}",
        ]
    );
}

#[test]
fn symbolic_offset_leaves_placeholder() {
    let bytes = Asm::new()
        .read_str()
        .write_last_char_code(5, 0)
        .if_neq()
        .ret()
        .build();
    let out = decompile(&bytes, &config(29)).unwrap();

    assert_eq!(out.report.errored, 1);
    assert_eq!(out.report.states[0].status, Status::Errored);
    assert_eq!(
        body(&out.pseudocode),
        vec!["char flag[29];", "scanf(\"%s\", flag);", "// unknown path"]
    );
}

#[test]
fn less_than_branch_compares_symbolic_operand() {
    let bytes = Asm::new()
        .read_str()
        .write_last_char_code(6, 0)
        .set(7)
        .set(5)
        .if_lt()
        .print()
        .ret()
        .build();
    let out = decompile(&bytes, &config(8)).unwrap();

    assert!(out
        .disassembly
        .as_deref()
        .is_some_and(|text| text.contains("if_lt_rel_jmp")));
    assert_eq!(out.report.terminated, 3);
    assert_eq!(
        body(&out.pseudocode),
        vec![
            "char flag[8];",
            "scanf(\"%s\", flag);",
            "if (flag[7] < \"0\") {",
            "\tputs(\"\");",
            "\treturn 0;",
            "} else {",
            "\tputs(\"\");",
            "\treturn 0;",
            "}",
        ]
    );
}

#[test]
fn jump_into_operands_stops_the_path() {
    // reg5 = 1, so the branch lands on the first operand of `add`
    let bytes = Asm::new()
        .repunit(5, 1)
        .if_neq()
        .add(0, 1, 2)
        .set(4)
        .print()
        .ret()
        .build();
    let out = decompile(&bytes, &config(1)).unwrap();

    assert_eq!(out.report.states.len(), 1);
    assert_eq!(out.report.errored, 1);
    assert_eq!(body(&out.pseudocode), vec!["// unknown path"]);
    assert_eq!(
        out.report.states[0].diagnostics[0].error.to_string(),
        "jump target 5 is not an instruction boundary"
    );
}

#[test]
fn checker_program() {
    let out = decompile(&checker(), &config(2)).unwrap();

    assert_eq!(
        body(&out.pseudocode),
        vec![
            "char flag[2];",
            "scanf(\"%s\", flag);",
            "if ((flag[1] + 111) != \"\") {",
            "\tputs(\"\");",
            "\treturn 0;",
            "} else {",
            "\tif ((flag[0] + 107) != \"\") {",
            "\t\tputs(\"\");",
            "\t\treturn 0;",
            "\t} else {",
            "\t\tputs(\"01\");",
            "\t\treturn 0;",
            "\t}",
            "}",
        ]
    );
    assert_eq!(recover_secret(&out.pseudocode), "ok");

    assert_eq!(out.report.states.len(), 5);
    assert_eq!(out.report.terminated, 5);
    assert!(!out.report.truncated);
    assert!(out.report.states.iter().all(|s| s.diagnostics.is_empty()));
}

#[test]
fn decompilation_is_deterministic() {
    let first = decompile(&checker(), &config(2)).unwrap();
    let second = decompile(&checker(), &config(2)).unwrap();
    assert_eq!(first.pseudocode, second.pseudocode);
    assert_eq!(first.disassembly, second.disassembly);
    assert_eq!(first.report, second.report);
}

#[test]
fn step_budget_truncates_loops() {
    // reg5 = -1, so the branch targets itself
    let bytes = Asm::new()
        .repunit(5, 1)
        .invert_sign(5)
        .if_neq()
        .build();
    let config = DecompilerConfig::builder()
        .input_length(1)
        .step_budget(50)
        .build()
        .unwrap();
    let out = decompile(&bytes, &config).unwrap();

    assert!(out.report.truncated);
    assert_eq!(out.report.steps, 50);
    assert!(out.pseudocode.contains("// exploration truncated"));
}

#[test]
fn unconditional_jump_is_fatal() {
    let bytes = Asm::new().set(5).rel_jmp().ret().build();
    let err = decompile(&bytes, &config(1)).unwrap_err();
    assert!(matches!(
        err,
        Error::Execution(ExecutionError::UnsupportedInstruction {
            address: 1,
            mnemonic: Mnemonic::RelJmp
        })
    ));
}
