use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::error::{Result, SymregError};
use crate::functions::operators::Operator;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Operator entries layered over the default table, e.g.
///
/// ```toml
/// [[operators.overrides]]
/// key = "mul"
/// symbol = "·"
/// notation = "infix"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatorConfig {
    pub overrides: Vec<Operator>,
}

impl ConfigSection for OperatorConfig {
    fn section_name() -> &'static str {
        "operators"
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for operator in &self.overrides {
            operator
                .validate()
                .map_err(|e| SymregError::Configuration(e.to_string()))?;
            if !seen.insert(operator.key.as_str()) {
                return Err(SymregError::Configuration(format!(
                    "Operator `{}` is overridden more than once",
                    operator.key
                )));
            }
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Operators".to_string(),
            fields: vec![FieldManifest::new(
                "overrides",
                "list",
                serde_json::json!(self.overrides),
                "Operator entries replacing or extending the defaults",
            )],
        }
    }
}
