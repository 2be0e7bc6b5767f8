use crate::functions::operators::Operator;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Number of operands an operator consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Arity {
    Unary,
    Binary,
}

impl Arity {
    pub fn operand_count(self) -> usize {
        match self {
            Arity::Unary => 1,
            Arity::Binary => 2,
        }
    }
}

/// Placement of an operator's rendering token relative to its operands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Notation {
    Infix,    // (a+b)
    Prefix,   // (-a)
    Function, // sin(a)
}

impl Notation {
    pub fn arity(self) -> Arity {
        match self {
            Notation::Infix => Arity::Binary,
            Notation::Prefix | Notation::Function => Arity::Unary,
        }
    }
}

/// Expression tree recovered from a prefix-functional encoding
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Leaf(String),
    Unary {
        operator: Arc<Operator>,
        operand: Box<Expr>,
    },
    Binary {
        operator: Arc<Operator>,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    /// Operator nesting depth; a bare variable has depth 0.
    pub fn depth(&self) -> usize {
        match self {
            Expr::Leaf(_) => 0,
            Expr::Unary { operand, .. } => 1 + operand.depth(),
            Expr::Binary { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    pub fn operator_count(&self) -> usize {
        match self {
            Expr::Leaf(_) => 0,
            Expr::Unary { operand, .. } => 1 + operand.operator_count(),
            Expr::Binary { left, right, .. } => 1 + left.operator_count() + right.operator_count(),
        }
    }

    /// Distinct variable names in the tree
    pub fn variables(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::new();
        self.collect_variables(&mut names);
        names
    }

    fn collect_variables<'a>(&'a self, names: &mut BTreeSet<&'a str>) {
        match self {
            Expr::Leaf(name) => {
                names.insert(name.as_str());
            }
            Expr::Unary { operand, .. } => operand.collect_variables(names),
            Expr::Binary { left, right, .. } => {
                left.collect_variables(names);
                right.collect_variables(names);
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::engines::expression::renderer::render(self))
    }
}
