pub mod operators;
pub mod registry;

pub use operators::{Operator, DEFAULT_OPERATORS};
pub use registry::OperatorTable;
