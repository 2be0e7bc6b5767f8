use super::{
    evolution::EvolutionSettings,
    operators::OperatorConfig,
    parser::ParserConfig,
    traits::{ConfigManifest, ConfigSection},
};
use crate::data::RenderCache;
use crate::engines::expression::{ExpressionParser, ExpressionRenderer};
use crate::error::{Result, SymregError};
use crate::functions::registry::OperatorTable;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

/// Environment overrides look like `SYMREG_EVOLUTION__SEED=64`.
pub const ENV_PREFIX: &str = "SYMREG";

/// Length of the settings-hash prefix naming a run directory
pub const RUN_HASH_LEN: usize = 8;

pub const RUN_SETTINGS_FILE: &str = "settings.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub evolution: EvolutionSettings,
    pub parser: ParserConfig,
    pub operators: OperatorConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        self.evolution.validate()?;
        self.parser.validate()?;
        self.operators.validate()?;
        Ok(())
    }

    pub fn manifests(&self) -> Vec<ConfigManifest> {
        vec![
            self.evolution.to_manifest(),
            self.parser.to_manifest(),
            self.operators.to_manifest(),
        ]
    }

    pub fn operator_table(&self) -> Result<OperatorTable> {
        OperatorTable::from_config(&self.operators)
    }

    /// Renderer wired with the configured operator table, limits and cache
    pub fn build_renderer(&self) -> Result<ExpressionRenderer> {
        let parser =
            ExpressionParser::with_config(Arc::new(self.operator_table()?), self.parser.clone());
        Ok(if self.parser.cache_capacity > 0 {
            ExpressionRenderer::with_cache(
                parser,
                Arc::new(RenderCache::new(self.parser.cache_capacity)),
            )
        } else {
            ExpressionRenderer::new(parser)
        })
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    pub fn with_config(config: AppConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(RwLock::new(config)),
        })
    }

    /// Loads the file (TOML or JSON, by extension) with environment overrides on top.
    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config = ::config::Config::builder()
            .add_source(::config::File::from(path))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| SymregError::Configuration(format!("Failed to read config: {}", e)))?;

        let config: AppConfig = config
            .try_deserialize()
            .map_err(|e| SymregError::Configuration(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        log::info!(
            "Loaded configuration from {} (settings {})",
            path.display(),
            config.evolution.hash_prefix(Some(RUN_HASH_LEN))
        );

        *self.config.write().map_err(lock_poisoned)? = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let config = self.get();
        let toml_str = toml::to_string_pretty(&config)
            .map_err(|e| SymregError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| SymregError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Applies `f` to a copy; the change is kept only if the result validates.
    pub fn update<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.config.write().map_err(lock_poisoned)?;
        let mut updated = config.clone();
        f(&mut updated);
        updated.validate()?;
        *config = updated;
        Ok(())
    }

    /// Writes the evolution settings into `root/<hash prefix>/settings.toml`
    /// and returns that run directory.
    pub fn persist_run<P: AsRef<Path>>(&self, root: P) -> Result<PathBuf> {
        let settings = self.get().evolution;
        let dir = root
            .as_ref()
            .join(settings.hash_prefix(Some(RUN_HASH_LEN)));
        std::fs::create_dir_all(&dir)?;

        let toml_str = toml::to_string_pretty(&settings)
            .map_err(|e| SymregError::Configuration(format!("Failed to serialize: {}", e)))?;
        std::fs::write(dir.join(RUN_SETTINGS_FILE), toml_str)?;

        log::info!("Run settings persisted to {}", dir.display());
        Ok(dir)
    }

    /// Reads back the settings of a run directory, checking they still hash to its name.
    pub fn load_run<P: AsRef<Path>>(dir: P) -> Result<EvolutionSettings> {
        let dir = dir.as_ref();
        let contents = std::fs::read_to_string(dir.join(RUN_SETTINGS_FILE))?;
        let settings: EvolutionSettings = toml::from_str(&contents)
            .map_err(|e| SymregError::Configuration(format!("Failed to parse run settings: {}", e)))?;
        settings.validate()?;

        let expected = settings.hash_prefix(Some(RUN_HASH_LEN));
        let actual = dir.file_name().and_then(|name| name.to_str()).unwrap_or_default();
        if actual != expected {
            return Err(SymregError::Configuration(format!(
                "Run directory `{}` does not match settings hash `{}`",
                actual, expected
            )));
        }
        Ok(settings)
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_poisoned<T>(_: PoisonError<T>) -> SymregError {
    SymregError::Configuration("Configuration lock poisoned".to_string())
}
