use crate::error::{Result, SymregError};
use crate::types::{Arity, Notation};
use serde::{Deserialize, Serialize};

/// Operator keys are always this many characters, immediately followed by `(`.
pub const OPERATOR_KEY_LEN: usize = 3;

/// The default vocabulary: key, rendering token, notation
pub const DEFAULT_OPERATORS: [(&str, &str, Notation); 7] = [
    ("add", "+", Notation::Infix),
    ("sub", "-", Notation::Infix),
    ("mul", "*", Notation::Infix),
    ("div", "/", Notation::Infix),
    ("neg", "-", Notation::Prefix),
    ("sin", "sin", Notation::Function),
    ("cos", "cos", Notation::Function),
];

/// One entry of the operator table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operator {
    pub key: String,
    pub symbol: String,
    pub notation: Notation,
}

impl Operator {
    pub fn new(key: impl Into<String>, symbol: impl Into<String>, notation: Notation) -> Result<Self> {
        let operator = Self {
            key: key.into(),
            symbol: symbol.into(),
            notation,
        };
        operator.validate()?;
        Ok(operator)
    }

    pub fn validate(&self) -> Result<()> {
        if self.key.chars().count() != OPERATOR_KEY_LEN {
            return Err(SymregError::OperatorTable(format!(
                "Operator key `{}` must be exactly {} characters",
                self.key, OPERATOR_KEY_LEN
            )));
        }
        if self.key.chars().any(|c| is_delimiter(c) || c.is_whitespace()) {
            return Err(SymregError::OperatorTable(format!(
                "Operator key `{}` contains a delimiter or whitespace",
                self.key
            )));
        }
        if self.symbol.is_empty() {
            return Err(SymregError::OperatorTable(format!(
                "Operator `{}` has an empty rendering symbol",
                self.key
            )));
        }
        Ok(())
    }

    pub fn arity(&self) -> Arity {
        self.notation.arity()
    }
}

/// Characters that structure the encoding and may never appear in identifiers
pub fn is_delimiter(c: char) -> bool {
    matches!(c, '(' | ')' | ',')
}
