use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::error::{Result, SymregError};
use crate::functions::operators::is_delimiter;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Deepest operator nesting accepted before parsing fails
    pub max_depth: usize,
    /// When set, leaves must be one of these names
    pub variables: Option<Vec<String>>,
    /// Entries kept by the render cache; zero disables it
    pub cache_capacity: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            variables: None,
            cache_capacity: 1024,
        }
    }
}

impl ConfigSection for ParserConfig {
    fn section_name() -> &'static str {
        "parser"
    }

    fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(SymregError::Configuration(
                "Parser max depth must be at least 1".to_string(),
            ));
        }
        for name in self.variables.iter().flatten() {
            if name.trim().is_empty() || name.chars().any(is_delimiter) {
                return Err(SymregError::Configuration(format!(
                    "Invalid variable name `{}`",
                    name
                )));
            }
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Parser".to_string(),
            fields: vec![
                FieldManifest::new(
                    "max_depth",
                    "integer",
                    serde_json::json!(self.max_depth),
                    "Deepest operator nesting accepted",
                )
                .bounded(Some(1.0), None),
                FieldManifest::new(
                    "variables",
                    "list",
                    serde_json::json!(self.variables),
                    "Allowed variable names (any when unset)",
                ),
                FieldManifest::new(
                    "cache_capacity",
                    "integer",
                    serde_json::json!(self.cache_capacity),
                    "Rendered expressions kept in memory",
                )
                .bounded(Some(0.0), None),
            ],
        }
    }
}
