pub mod cache;
pub mod fitness;

pub use cache::RenderCache;
pub use fitness::FitnessTable;
