//! C-like statement text produced during exploration.
//!
//! Statements are plain strings appended to CFG nodes; this module owns their
//! exact spelling and the function template the root lines are wrapped in.

use crate::symbol::{escape, Value};

/// Placeholder for a branch whose target could not be followed.
pub const UNKNOWN_PATH: &str = "// unknown path";

/// Placeholder for a path cut short by the step budget.
pub const EXPLORATION_TRUNCATED: &str = "// exploration truncated";

/// Placeholder for a path that ran past the last instruction.
pub const END_OF_PROGRAM: &str = "// end of program";

// ═══════════════════════════════════════════════════════════════════════════
// Statements
// ═══════════════════════════════════════════════════════════════════════════

/// `puts(...)` for the value of the output register.
pub fn print(value: &Value) -> String {
    match value {
        Value::Concrete(s) => format!("puts(\"{}\");", escape(s)),
        Value::Symbolic(sym) => format!("puts({sym});"),
    }
}

/// Buffer declaration and read for a `read_str`.
pub fn read_input(name: &str, len: usize) -> [String; 2] {
    [
        format!("char {name}[{len}];"),
        format!("scanf(\"%s\", {name});"),
    ]
}

pub fn ret() -> String {
    "return 0;".to_string()
}

/// Branch test comparing the two operand registers.
pub fn comparison(left: &Value, operator: &str, right: &Value) -> String {
    format!("{} {} {}", left.to_operand(), operator, right.to_operand())
}

// ═══════════════════════════════════════════════════════════════════════════
// Function template
// ═══════════════════════════════════════════════════════════════════════════

/// Wrap linearized body lines in the `main` function template.
pub fn render_function(lines: &[String]) -> String {
    let mut out = String::from("#include <stdio.h>\n\nint main(int argc, char* argv[]) {\n");
    for line in lines {
        out.push('\t');
        out.push_str(line);
        out.push('\n');
    }
    out.push('}');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::{StrLen, Symbol};

    #[test]
    fn test_print_concrete_is_escaped() {
        assert_eq!(print(&Value::concrete("hi\n")), "puts(\"hi\\n\");");
        assert_eq!(print(&Value::empty()), "puts(\"\");");
    }

    #[test]
    fn test_print_symbolic() {
        let v: Value = Symbol::member(Symbol::string("flag", StrLen::Known(3)), 2usize).into();
        assert_eq!(print(&v), "puts(flag[2]);");
    }

    #[test]
    fn test_read_input() {
        assert_eq!(
            read_input("flag", 29),
            ["char flag[29];".to_string(), "scanf(\"%s\", flag);".to_string()]
        );
    }

    #[test]
    fn test_comparison_quotes_concrete() {
        let sym: Value = Symbol::identifier("x").into();
        assert_eq!(comparison(&sym, "!=", &Value::concrete("11")), "x != \"11\"");
    }

    #[test]
    fn test_render_function() {
        let lines = vec!["puts(\"0\");".to_string(), "return 0;".to_string()];
        assert_eq!(
            render_function(&lines),
            "#include <stdio.h>\n\nint main(int argc, char* argv[]) {\n\tputs(\"0\");\n\treturn 0;\n}"
        );
        assert_eq!(
            render_function(&[]),
            "#include <stdio.h>\n\nint main(int argc, char* argv[]) {\n}"
        );
    }
}
