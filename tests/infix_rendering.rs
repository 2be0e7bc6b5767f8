use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::sync::Arc;
use symreg::config::ParserConfig;
use symreg::engines::expression::{parse_with, ExpressionParser};
use symreg::functions::{Operator, OperatorTable};
use symreg::types::Notation;
use symreg::{render_infix, ParseError};

fn render(expression: &str) -> Result<String, ParseError> {
    render_infix(expression, &OperatorTable::new())
}

fn paren_pairs(text: &str) -> usize {
    let mut depth: i64 = 0;
    let mut pairs = 0;
    for c in text.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                assert!(depth >= 0, "unbalanced output: {}", text);
                pairs += 1;
            }
            _ => {}
        }
    }
    assert_eq!(depth, 0, "unbalanced output: {}", text);
    pairs
}

#[test]
fn test_single_variable() {
    assert_eq!(render("y").unwrap(), "y");
}

#[test]
fn test_unary_operators() {
    assert_eq!(render("neg(y)").unwrap(), "(-y)");
    assert_eq!(render("sin(y)").unwrap(), "sin(y)");
    assert_eq!(render("cos(y)").unwrap(), "cos(y)");
}

#[test]
fn test_binary_operators() {
    assert_eq!(render("add(x,y)").unwrap(), "(x+y)");
    assert_eq!(render("sub(x,y)").unwrap(), "(x-y)");
    assert_eq!(render("mul(x,y)").unwrap(), "(x*y)");
    assert_eq!(render("div(x,y)").unwrap(), "(x/y)");
}

#[test]
fn test_nested_expressions() {
    assert_eq!(render("add(mul(x,y),neg(y))").unwrap(), "((x*y)+(-y))");
    assert_eq!(render("neg(sin(add(x,x)))").unwrap(), "(-sin((x+x)))");
    assert_eq!(render("neg(sin(add(x, x)))").unwrap(), "(-sin((x+x)))");
}

#[test]
fn test_deep_population_member() {
    let expression = "add(x, mul(add(x, mul(add(x, mul(x, add(x, mul(x, x)))), \
                      add(x, mul(x, x)))), x))";
    assert_eq!(
        render(expression).unwrap(),
        "(x+((x+((x+(x*(x+(x*x))))*(x+(x*x))))*x))"
    );
}

#[test]
fn test_mixed_unary_and_binary() {
    let expression = "add(x, mul(add(mul(x, x), add(add(add(sin(x), x), neg(sin(\
                      add(x, x)))), x)), x))";
    assert_eq!(
        render(expression).unwrap(),
        "(x+(((x*x)+(((sin(x)+x)+(-sin((x+x))))+x))*x))"
    );
}

#[test]
fn test_long_variable_names() {
    assert_eq!(render("profit").unwrap(), "profit");
    assert_eq!(render("neg(profit)").unwrap(), "(-profit)");
    assert_eq!(render("sin(profit)").unwrap(), "sin(profit)");
    assert_eq!(render("cos(profit)").unwrap(), "cos(profit)");
    assert_eq!(render("add(profit,debt)").unwrap(), "(profit+debt)");
    assert_eq!(render("sub(profit,debt)").unwrap(), "(profit-debt)");
    assert_eq!(render("mul(profit,debt)").unwrap(), "(profit*debt)");
    assert_eq!(render("div(profit,debt)").unwrap(), "(profit/debt)");
    assert_eq!(render("neg(cos(neg(profit)))").unwrap(), "(-cos((-profit)))");
}

#[test]
fn test_variable_sharing_a_prefix_with_an_operator() {
    assert_eq!(render("add(address,sine)").unwrap(), "(address+sine)");
}

#[test]
fn test_error_scenarios() {
    assert_eq!(render(""), Err(ParseError::EmptyInput));
    assert_eq!(
        render("xyz(a,b)"),
        Err(ParseError::UnknownOperator {
            operator: "xyz".to_string(),
            position: 0,
        })
    );
    assert!(matches!(
        render("add(x,y"),
        Err(ParseError::MalformedExpression { .. })
    ));
}

#[test]
fn test_error_message_names_fragment() {
    let err = render("mul(x,add(y,z)").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("mul(x,add(y,z)"), "{}", message);
}

#[test]
fn test_depth_fifty() {
    let mut expression = "x".to_string();
    for _ in 0..50 {
        expression = format!("add(x, {})", expression);
    }
    let infix = render(&expression).unwrap();
    assert_eq!(paren_pairs(&infix), 50);
    assert!(infix.starts_with("(x+(x+"));
}

#[test]
fn test_pathological_depth_is_rejected() {
    let mut expression = "x".to_string();
    for _ in 0..1_000 {
        expression = format!("neg({})", expression);
    }
    assert!(matches!(
        render(&expression),
        Err(ParseError::DepthLimitExceeded { limit: 256, .. })
    ));
}

#[test]
fn test_custom_operator_table() {
    let mut table = OperatorTable::new();
    table
        .register(Operator::new("mul", "·", Notation::Infix).unwrap())
        .unwrap();
    table
        .register(Operator::new("exp", "exp", Notation::Function).unwrap())
        .unwrap();
    assert_eq!(
        render_infix("mul(exp(x),y)", &table).unwrap(),
        "(exp(x)·y)"
    );
    // the default table is untouched
    assert!(matches!(
        render("exp(x)"),
        Err(ParseError::UnknownOperator { .. })
    ));
}

#[test]
fn test_parser_shares_table_across_threads() {
    let parser = Arc::new(ExpressionParser::new(Arc::new(OperatorTable::new())));
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let parser = Arc::clone(&parser);
            std::thread::spawn(move || {
                let expression = format!("add(x{},neg(y))", i);
                parser.parse(&expression).map(|tree| tree.to_string())
            })
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap().unwrap(), format!("(x{}+(-y))", i));
    }
}

#[derive(Debug, Clone)]
enum Shape {
    Leaf(String),
    Unary(&'static str, Box<Shape>),
    Binary(&'static str, Box<Shape>, Box<Shape>),
}

impl Shape {
    fn encode(&self) -> String {
        match self {
            Shape::Leaf(name) => name.clone(),
            Shape::Unary(op, a) => format!("{}({})", op, a.encode()),
            Shape::Binary(op, a, b) => format!("{}({}, {})", op, a.encode(), b.encode()),
        }
    }

    fn operators(&self) -> usize {
        match self {
            Shape::Leaf(_) => 0,
            Shape::Unary(_, a) => 1 + a.operators(),
            Shape::Binary(_, a, b) => 1 + a.operators() + b.operators(),
        }
    }
}

fn shape() -> impl Strategy<Value = Shape> {
    let leaf = "[a-z][a-z0-9_]{0,7}".prop_map(Shape::Leaf);
    leaf.prop_recursive(6, 48, 2, |inner| {
        prop_oneof![
            (prop::sample::select(vec!["neg", "sin", "cos"]), inner.clone())
                .prop_map(|(op, a)| Shape::Unary(op, Box::new(a))),
            (
                prop::sample::select(vec!["add", "sub", "mul", "div"]),
                inner.clone(),
                inner
            )
                .prop_map(|(op, a, b)| Shape::Binary(op, Box::new(a), Box::new(b))),
        ]
    })
}

proptest! {
    #[test]
    fn prop_leaf_identity(name in "[A-Za-z_][A-Za-z0-9_]{0,15}") {
        prop_assert_eq!(render(&name).unwrap(), name);
    }

    #[test]
    fn prop_one_paren_pair_per_operator(tree in shape()) {
        let infix = render(&tree.encode()).unwrap();
        prop_assert_eq!(paren_pairs(&infix), tree.operators());
    }

    #[test]
    fn prop_tree_metrics_match_encoding(tree in shape()) {
        let parsed = parse_with(&tree.encode(), &OperatorTable::new(), &ParserConfig::default()).unwrap();
        prop_assert_eq!(parsed.operator_count(), tree.operators());
        prop_assert_eq!(parsed.to_string(), render(&tree.encode()).unwrap());
    }
}
