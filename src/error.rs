use thiserror::Error;

/// Failure while turning a prefix-functional expression into a tree.
///
/// Positions are character offsets into the original input string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Empty expression")]
    EmptyInput,

    #[error("Malformed expression at {position}: {reason} in `{fragment}`")]
    MalformedExpression {
        fragment: String,
        position: usize,
        reason: String,
    },

    #[error("Unknown operator `{operator}` at {position}")]
    UnknownOperator { operator: String, position: usize },

    #[error("Unknown variable `{name}` at {position}")]
    UnknownVariable { name: String, position: usize },

    #[error("Expression nesting exceeds the depth limit of {limit} at {position}")]
    DepthLimitExceeded { limit: usize, position: usize },
}

impl ParseError {
    pub(crate) fn malformed(fragment: &str, position: usize, reason: impl Into<String>) -> Self {
        ParseError::MalformedExpression {
            fragment: fragment.to_string(),
            position,
            reason: reason.into(),
        }
    }

    pub fn position(&self) -> Option<usize> {
        match self {
            ParseError::EmptyInput => None,
            ParseError::MalformedExpression { position, .. }
            | ParseError::UnknownOperator { position, .. }
            | ParseError::UnknownVariable { position, .. }
            | ParseError::DepthLimitExceeded { position, .. } => Some(*position),
        }
    }
}

#[derive(Error, Debug)]
pub enum SymregError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Unknown setting key: {0}")]
    UnknownSetting(String),

    #[error("Invalid setting value for {key}: {reason}")]
    InvalidSetting { key: String, reason: String },

    #[error("Operator table error: {0}")]
    OperatorTable(String),

    #[error("Fitness table error: {0}")]
    FitnessTable(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SymregError>;
