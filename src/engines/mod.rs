pub mod expression;

pub use expression::{render_infix, ExpressionParser, ExpressionRenderer};
