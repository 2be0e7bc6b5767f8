use super::scanner::{split_arguments, ArgumentSplit, ScanError};
use crate::config::parser::ParserConfig;
use crate::error::ParseError;
use crate::functions::operators::{is_delimiter, OPERATOR_KEY_LEN};
use crate::functions::registry::OperatorTable;
use crate::types::{Arity, Expr};
use std::sync::Arc;

/// Recursive-descent parser for prefix-functional expression strings
/// such as `add(x, mul(x,x))`.
#[derive(Debug, Clone)]
pub struct ExpressionParser {
    operators: Arc<OperatorTable>,
    config: ParserConfig,
}

impl ExpressionParser {
    pub fn new(operators: Arc<OperatorTable>) -> Self {
        Self::with_config(operators, ParserConfig::default())
    }

    pub fn with_config(operators: Arc<OperatorTable>, config: ParserConfig) -> Self {
        Self { operators, config }
    }

    pub fn operators(&self) -> &OperatorTable {
        &self.operators
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn parse(&self, expression: &str) -> Result<Expr, ParseError> {
        parse_with(expression, &self.operators, &self.config)
    }
}

/// Parses `expression` into a tree using the given table and limits.
pub fn parse_with(
    expression: &str,
    operators: &OperatorTable,
    config: &ParserConfig,
) -> Result<Expr, ParseError> {
    if expression.trim().is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let descent = Descent {
        input: expression,
        operators,
        config,
    };
    let tree = descent.parse_node(0, expression.len(), 0)?;
    log::debug!(
        "Parsed `{}` into {} operator node(s), depth {}",
        expression,
        tree.operator_count(),
        tree.depth()
    );
    Ok(tree)
}

/// One parse over a fixed input; spans are byte ranges into `input`.
struct Descent<'a> {
    input: &'a str,
    operators: &'a OperatorTable,
    config: &'a ParserConfig,
}

impl<'a> Descent<'a> {
    /// `depth` counts the operator calls enclosing this span.
    fn parse_node(&self, start: usize, end: usize, depth: usize) -> Result<Expr, ParseError> {
        let (start, end) = trim_span(self.input, start, end);
        let text = &self.input[start..end];

        let Some(open) = text.find('(') else {
            return self.parse_leaf(text, start);
        };

        let key = &text[..open];
        if key.chars().count() != OPERATOR_KEY_LEN || key.chars().any(is_delimiter) {
            return Err(ParseError::malformed(
                text,
                self.offset(start),
                format!("`{}` is not a {}-character operator key", key, OPERATOR_KEY_LEN),
            ));
        }

        let operator = self
            .operators
            .get(key)
            .ok_or_else(|| ParseError::UnknownOperator {
                operator: key.to_string(),
                position: self.offset(start),
            })?;

        if depth >= self.config.max_depth {
            return Err(ParseError::DepthLimitExceeded {
                limit: self.config.max_depth,
                position: self.offset(start),
            });
        }

        if !text.ends_with(')') {
            return Err(ParseError::malformed(
                text,
                self.offset(end),
                "expected closing `)`",
            ));
        }

        let inner_start = start + open + 1;
        let inner_end = end - 1;
        let split = split_arguments(&self.input[inner_start..inner_end])
            .map_err(|e| self.scan_error(e, text, inner_start))?;

        match (operator.arity(), split) {
            (Arity::Unary, ArgumentSplit::Single) => {
                let operand = self.parse_argument(text, inner_start, inner_end, depth)?;
                Ok(Expr::Unary {
                    operator,
                    operand: Box::new(operand),
                })
            }
            (Arity::Binary, ArgumentSplit::Pair { comma }) => {
                let comma = inner_start + comma;
                let left = self.parse_argument(text, inner_start, comma, depth)?;
                let right = self.parse_argument(text, comma + 1, inner_end, depth)?;
                Ok(Expr::Binary {
                    operator,
                    left: Box::new(left),
                    right: Box::new(right),
                })
            }
            (arity, split) => Err(ParseError::malformed(
                text,
                self.offset(start),
                format!(
                    "`{}` takes {} operand(s), found {}",
                    key,
                    arity.operand_count(),
                    split.count()
                ),
            )),
        }
    }

    fn parse_argument(
        &self,
        call: &str,
        start: usize,
        end: usize,
        depth: usize,
    ) -> Result<Expr, ParseError> {
        let (arg_start, arg_end) = trim_span(self.input, start, end);
        if arg_start == arg_end {
            return Err(ParseError::malformed(
                call,
                self.offset(arg_start),
                "missing operand",
            ));
        }
        self.parse_node(arg_start, arg_end, depth + 1)
    }

    fn parse_leaf(&self, text: &str, start: usize) -> Result<Expr, ParseError> {
        if let Some(at) = text.find(is_delimiter) {
            return Err(ParseError::malformed(
                text,
                self.offset(start + at),
                "unexpected delimiter in variable",
            ));
        }

        if let Some(variables) = &self.config.variables {
            if !variables.iter().any(|v| v == text) {
                return Err(ParseError::UnknownVariable {
                    name: text.to_string(),
                    position: self.offset(start),
                });
            }
        }

        Ok(Expr::Leaf(text.to_string()))
    }

    fn scan_error(&self, error: ScanError, call: &str, inner_start: usize) -> ParseError {
        let (at, reason) = match error {
            ScanError::UnmatchedClose { at } => (at, "unbalanced `)`"),
            ScanError::UnclosedOpen { at } => (at, "unbalanced `(`"),
            ScanError::ExtraArgument { at } => (at, "too many operands"),
        };
        ParseError::malformed(call, self.offset(inner_start + at), reason)
    }

    /// Character offset of a byte index into the input
    fn offset(&self, byte: usize) -> usize {
        self.input[..byte].chars().count()
    }
}

/// Narrows a byte span so it excludes leading and trailing whitespace.
fn trim_span(input: &str, start: usize, end: usize) -> (usize, usize) {
    let slice = &input[start..end];
    let trimmed_start = slice.trim_start();
    let start = start + (slice.len() - trimmed_start.len());
    let end = start + trimmed_start.trim_end().len();
    (start, end)
}
