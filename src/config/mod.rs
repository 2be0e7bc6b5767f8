pub mod traits;
pub mod evolution;
pub mod stopping;
pub mod parser;
pub mod operators;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use evolution::{EvolutionSettings, SettingKey, SettingValue};
pub use stopping::StoppingRule;
pub use parser::ParserConfig;
pub use operators::OperatorConfig;
