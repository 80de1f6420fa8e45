//! Statement tree built during exploration.
//!
//! Every execution state owns one linear node and appends statements to it.
//! When a state forks, its node's continuation is pointed at a conditional
//! node whose two branches are the linear nodes of the two child states. The
//! continuation edge is written exactly once, so the nodes always form a tree.
//!
//! Nodes live in an arena owned by the executor and are addressed by
//! [`NodeId`].

use std::fmt;

use thiserror::Error;

/// Handle to a node in a [`Cfg`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Straight-line statements, optionally followed by another node.
    Linear {
        statements: Vec<String>,
        next: Option<NodeId>,
    },
    /// `if (test) { consequent } else { alternate }`
    Conditional {
        test: String,
        consequent: NodeId,
        alternate: NodeId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CfgError {
    #[error("continuation of node {0} is already set")]
    ContinuationAlreadySet(NodeId),

    #[error("node {0} is not a linear node")]
    NotLinear(NodeId),
}

/// Arena of statement-tree nodes.
#[derive(Debug, Default, Clone)]
pub struct Cfg {
    nodes: Vec<Node>,
}

impl Cfg {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Allocate an empty linear node.
    pub fn new_linear(&mut self) -> NodeId {
        self.push(Node::Linear {
            statements: Vec::new(),
            next: None,
        })
    }

    /// Allocate a conditional node joining two existing subtrees.
    pub fn new_conditional(&mut self, test: String, consequent: NodeId, alternate: NodeId) -> NodeId {
        self.push(Node::Conditional {
            test,
            consequent,
            alternate,
        })
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append a statement to a linear node.
    pub fn add_statement(&mut self, id: NodeId, statement: impl Into<String>) -> Result<(), CfgError> {
        match &mut self.nodes[id.0] {
            Node::Linear { statements, .. } => {
                statements.push(statement.into());
                Ok(())
            }
            Node::Conditional { .. } => Err(CfgError::NotLinear(id)),
        }
    }

    /// Set the continuation of a linear node. Fails if it was already set.
    pub fn set_next(&mut self, id: NodeId, target: NodeId) -> Result<(), CfgError> {
        match &mut self.nodes[id.0] {
            Node::Linear { next: Some(_), .. } => Err(CfgError::ContinuationAlreadySet(id)),
            Node::Linear { next, .. } => {
                *next = Some(target);
                Ok(())
            }
            Node::Conditional { .. } => Err(CfgError::NotLinear(id)),
        }
    }

    /// Flatten the subtree rooted at `id` into output lines.
    ///
    /// Nested branch bodies are indented with one tab per level.
    pub fn linearize(&self, id: NodeId) -> Vec<String> {
        let mut lines = Vec::new();
        self.linearize_into(id, &mut lines);
        lines
    }

    fn linearize_into(&self, id: NodeId, lines: &mut Vec<String>) {
        match self.node(id) {
            Node::Linear { statements, next } => {
                lines.extend(statements.iter().cloned());
                if let Some(next) = next {
                    self.linearize_into(*next, lines);
                }
            }
            Node::Conditional {
                test,
                consequent,
                alternate,
            } => {
                lines.push(format!("if ({test}) {{"));
                lines.extend(self.linearize(*consequent).into_iter().map(indent));
                lines.push("} else {".to_string());
                lines.extend(self.linearize(*alternate).into_iter().map(indent));
                lines.push("}".to_string());
            }
        }
    }
}

fn indent(line: String) -> String {
    format!("\t{line}")
}
