pub mod config;
pub mod data;
pub mod engines;
pub mod error;
pub mod functions;
pub mod types;

pub use engines::expression::render_infix;
pub use error::{ParseError, Result, SymregError};
pub use functions::OperatorTable;
