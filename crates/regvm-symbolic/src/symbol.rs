//! Symbolic values held in registers.
//!
//! A register holds either a concrete scalar (kept in its string form, the
//! way the VM itself stores it) or a [`Symbol`] expression tree built over the
//! program input. Expression children are owned, so cloning a value clones
//! the whole tree and two forked paths can never observe each other's
//! updates.

use std::fmt;

/// Length of a string symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrLen {
    Known(usize),
    Unknown,
}

/// An expression over unknown program input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    /// A bare name.
    Identifier(String),
    /// A named string buffer of known or unknown length.
    String { name: String, len: StrLen },
    /// `(<op><arg>)`
    Unary { op: &'static str, arg: Box<Value> },
    /// `(<left> <op> <right>)`
    Binary {
        op: &'static str,
        left: Box<Value>,
        right: Box<Value>,
    },
    /// `<object>[<property>]`
    Member {
        object: Box<Symbol>,
        property: Box<Value>,
    },
}

impl Symbol {
    pub fn identifier(name: impl Into<String>) -> Self {
        Symbol::Identifier(name.into())
    }

    pub fn string(name: impl Into<String>, len: StrLen) -> Self {
        Symbol::String {
            name: name.into(),
            len,
        }
    }

    pub fn unary(op: &'static str, arg: impl Into<Value>) -> Self {
        Symbol::Unary {
            op,
            arg: Box::new(arg.into()),
        }
    }

    pub fn binary(op: &'static str, left: impl Into<Value>, right: impl Into<Value>) -> Self {
        Symbol::Binary {
            op,
            left: Box::new(left.into()),
            right: Box::new(right.into()),
        }
    }

    pub fn member(object: Symbol, property: impl Into<Value>) -> Self {
        Symbol::Member {
            object: Box::new(object),
            property: Box::new(property.into()),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Identifier(name) | Symbol::String { name, .. } => f.write_str(name),
            Symbol::Unary { op, arg } => write!(f, "({op}{arg})"),
            Symbol::Binary { op, left, right } => write!(f, "({left} {op} {right})"),
            Symbol::Member { object, property } => write!(f, "{object}[{property}]"),
        }
    }
}

/// Contents of one register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Concrete(String),
    Symbolic(Symbol),
}

impl Value {
    pub fn concrete(s: impl Into<String>) -> Self {
        Value::Concrete(s.into())
    }

    /// The empty string every register starts with.
    pub fn empty() -> Self {
        Value::Concrete(String::new())
    }

    /// Whether this is the empty-string sentinel.
    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Concrete(s) if s.is_empty())
    }

    /// Render as a comparison operand: symbols bare, concrete values quoted.
    pub fn to_operand(&self) -> String {
        match self {
            Value::Symbolic(sym) => sym.to_string(),
            Value::Concrete(s) => format!("\"{}\"", escape(s)),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::empty()
    }
}

impl From<Symbol> for Value {
    fn from(sym: Symbol) -> Self {
        Value::Symbolic(sym)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Concrete(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Concrete(s)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Concrete(n.to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Concrete(s) => f.write_str(s),
            Value::Symbolic(sym) => write!(f, "{sym}"),
        }
    }
}

/// Escape a string for use inside a C string literal.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out
}
