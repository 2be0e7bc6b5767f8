use crate::types::{Expr, Notation};

/// Renders a tree as fully parenthesized infix text.
///
/// Binary and prefix operators wrap their whole application in one pair of
/// parentheses; function-style operators only get their call parentheses.
pub fn render(expr: &Expr) -> String {
    let mut out = String::new();
    write_infix(expr, &mut out);
    out
}

fn write_infix(expr: &Expr, out: &mut String) {
    match expr {
        Expr::Leaf(name) => out.push_str(name),
        Expr::Unary { operator, operand } => match operator.notation {
            Notation::Function => {
                out.push_str(&operator.symbol);
                out.push('(');
                write_infix(operand, out);
                out.push(')');
            }
            Notation::Prefix => {
                out.push('(');
                out.push_str(&operator.symbol);
                write_infix(operand, out);
                out.push(')');
            }
            // The parser never builds this: infix operators take two operands.
            // A hand-built tree still renders, with the missing left side left empty.
            Notation::Infix => {
                out.push('(');
                out.push_str(&operator.symbol);
                write_infix(operand, out);
                out.push(')');
            }
        },
        Expr::Binary {
            operator,
            left,
            right,
        } => {
            out.push('(');
            write_infix(left, out);
            out.push_str(&operator.symbol);
            write_infix(right, out);
            out.push(')');
        }
    }
}
