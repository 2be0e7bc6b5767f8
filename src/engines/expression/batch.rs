use super::{parser::ExpressionParser, renderer::render};
use crate::data::RenderCache;
use crate::error::ParseError;
use rayon::prelude::*;
use std::sync::Arc;

/// Parser plus an optional render cache; renders single expressions or whole
/// populations in parallel.
pub struct ExpressionRenderer {
    parser: ExpressionParser,
    cache: Option<Arc<RenderCache>>,
}

impl ExpressionRenderer {
    pub fn new(parser: ExpressionParser) -> Self {
        Self {
            parser,
            cache: None,
        }
    }

    pub fn with_cache(parser: ExpressionParser, cache: Arc<RenderCache>) -> Self {
        Self {
            parser,
            cache: Some(cache),
        }
    }

    pub fn parser(&self) -> &ExpressionParser {
        &self.parser
    }

    pub fn render(&self, expression: &str) -> Result<String, ParseError> {
        if let Some(cached) = self.cache.as_ref().and_then(|c| c.get(expression)) {
            return Ok(cached);
        }

        let tree = self.parser.parse(expression)?;
        let infix = render(&tree);
        log::debug!("Rendered `{}` as `{}`", expression, infix);

        if let Some(cache) = &self.cache {
            cache.set(expression.to_string(), infix.clone());
        }
        Ok(infix)
    }

    /// Renders every expression independently; output order matches input order.
    pub fn render_batch<S>(&self, expressions: &[S]) -> Vec<Result<String, ParseError>>
    where
        S: AsRef<str> + Sync,
    {
        let results: Vec<Result<String, ParseError>> = expressions
            .par_iter()
            .map(|expression| self.render(expression.as_ref()))
            .collect();

        let failures = results.iter().filter(|r| r.is_err()).count();
        if failures > 0 {
            log::warn!(
                "{} of {} expressions failed to render",
                failures,
                expressions.len()
            );
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::registry::OperatorTable;

    fn renderer() -> ExpressionRenderer {
        ExpressionRenderer::new(ExpressionParser::new(Arc::new(OperatorTable::new())))
    }

    #[test]
    fn test_render_single() {
        assert_eq!(renderer().render("mul(x,sin(x))").unwrap(), "(x*sin(x))");
    }

    #[test]
    fn test_batch_preserves_order() {
        let population = vec!["add(x,y)", "", "neg(x)", "xyz(a,b)", "cos(t)"];
        let results = renderer().render_batch(&population);
        assert_eq!(results.len(), 5);
        assert_eq!(results[0].as_deref(), Ok("(x+y)"));
        assert_eq!(results[1], Err(ParseError::EmptyInput));
        assert_eq!(results[2].as_deref(), Ok("(-x)"));
        assert!(matches!(results[3], Err(ParseError::UnknownOperator { .. })));
        assert_eq!(results[4].as_deref(), Ok("cos(t)"));
    }

    #[test]
    fn test_cache_is_populated() {
        let cache = Arc::new(RenderCache::new(16));
        let renderer = ExpressionRenderer::with_cache(
            ExpressionParser::new(Arc::new(OperatorTable::new())),
            Arc::clone(&cache),
        );
        renderer.render("div(a,b)").unwrap();
        assert_eq!(cache.get("div(a,b)").as_deref(), Some("(a/b)"));
        assert_eq!(renderer.render("div(a,b)").unwrap(), "(a/b)");
        // failures are never cached
        assert!(renderer.render("div(a)").is_err());
        assert_eq!(cache.len(), 1);
    }
}
