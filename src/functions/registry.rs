use super::operators::{Operator, DEFAULT_OPERATORS};
use crate::config::operators::OperatorConfig;
use crate::error::Result;
use std::{collections::HashMap, sync::Arc};

/// Read-only lookup from 3-character operator keys to their rendering.
///
/// Built once per session and shared behind an `Arc`; the parser never mutates it.
#[derive(Debug, Clone)]
pub struct OperatorTable {
    operators: HashMap<String, Arc<Operator>>,
}

impl OperatorTable {
    /// Table holding the seven default operators
    pub fn new() -> Self {
        let mut table = Self::empty();
        table.register_defaults();
        table
    }

    pub fn empty() -> Self {
        Self {
            operators: HashMap::new(),
        }
    }

    /// Defaults with the configured entries layered on top
    pub fn from_config(config: &OperatorConfig) -> Result<Self> {
        let mut table = Self::new();
        for operator in &config.overrides {
            table.register(operator.clone())?;
        }
        Ok(table)
    }

    /// Adds an operator, replacing any entry with the same key.
    pub fn register(&mut self, operator: Operator) -> Result<Option<Arc<Operator>>> {
        operator.validate()?;
        log::debug!(
            "Registering operator {} -> {} ({:?})",
            operator.key,
            operator.symbol,
            operator.notation
        );
        Ok(self.operators.insert(operator.key.clone(), Arc::new(operator)))
    }

    pub fn get(&self, key: &str) -> Option<Arc<Operator>> {
        self.operators.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.operators.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// Registered keys in sorted order
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.operators.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    fn register_defaults(&mut self) {
        for (key, symbol, notation) in DEFAULT_OPERATORS {
            self.operators.insert(
                key.to_string(),
                Arc::new(Operator {
                    key: key.to_string(),
                    symbol: symbol.to_string(),
                    notation,
                }),
            );
        }
    }
}

impl Default for OperatorTable {
    fn default() -> Self {
        Self::new()
    }
}
