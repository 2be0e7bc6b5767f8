pub mod batch;
pub mod parser;
pub mod renderer;
pub mod scanner;

pub use batch::ExpressionRenderer;
pub use parser::{parse_with, ExpressionParser};
pub use renderer::render;
pub use scanner::{split_arguments, ArgumentSplit, ScanError};

use crate::config::parser::ParserConfig;
use crate::error::ParseError;
use crate::functions::registry::OperatorTable;

/// Converts a prefix-functional expression such as `add(x, mul(x,x))` into
/// fully parenthesized infix text such as `(x+(x*x))`.
pub fn render_infix(expression: &str, operators: &OperatorTable) -> Result<String, ParseError> {
    let tree = parse_with(expression, operators, &ParserConfig::default())?;
    Ok(render(&tree))
}
