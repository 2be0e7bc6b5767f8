use super::stopping::StoppingRule;
use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::error::{Result, SymregError};
use md5::{Digest, Md5};
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical names of the evolution settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    Cxpb,
    FreqOfCheckpoints,
    Mutpb,
    N,
    Ngen,
    Patience,
    Seed,
}

impl SettingKey {
    /// Every key, sorted by canonical name
    pub const ALL: [SettingKey; 7] = [
        SettingKey::Cxpb,
        SettingKey::FreqOfCheckpoints,
        SettingKey::Mutpb,
        SettingKey::N,
        SettingKey::Ngen,
        SettingKey::Patience,
        SettingKey::Seed,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SettingKey::Cxpb => "CXPB",
            SettingKey::FreqOfCheckpoints => "FREQ_OF_CHECKPOINTS",
            SettingKey::Mutpb => "MUTPB",
            SettingKey::N => "N",
            SettingKey::Ngen => "NGEN",
            SettingKey::Patience => "PATIENCE",
            SettingKey::Seed => "SEED",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SettingKey::Cxpb => "crossover probability",
            SettingKey::FreqOfCheckpoints => "save after this many generations",
            SettingKey::Mutpb => "mutation probability",
            SettingKey::N => "number of individuals in the population",
            SettingKey::Ngen => "number of generations to evolve",
            SettingKey::Patience => "abort after this many generations without improvement",
            SettingKey::Seed => "randomization seed",
        }
    }

    pub fn is_probability(self) -> bool {
        matches!(self, SettingKey::Cxpb | SettingKey::Mutpb)
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SettingKey {
    type Err = SymregError;

    fn from_str(s: &str) -> Result<Self> {
        SettingKey::ALL
            .into_iter()
            .find(|key| key.name() == s)
            .ok_or_else(|| SymregError::UnknownSetting(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettingValue {
    Float(f64),
    Integer(u64),
}

impl SettingValue {
    pub fn as_f64(self) -> f64 {
        match self {
            SettingValue::Float(v) => v,
            SettingValue::Integer(v) => v as f64,
        }
    }
}

impl From<f64> for SettingValue {
    fn from(value: f64) -> Self {
        SettingValue::Float(value)
    }
}

impl From<u64> for SettingValue {
    fn from(value: u64) -> Self {
        SettingValue::Integer(value)
    }
}

impl From<usize> for SettingValue {
    fn from(value: usize) -> Self {
        SettingValue::Integer(value as u64)
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Float(v) => write!(f, "{}", v),
            SettingValue::Integer(v) => write!(f, "{}", v),
        }
    }
}

/// Fixed-schema settings of one evolution run. Every setting defaults to zero.
///
/// The content hash identifies a run: checkpoints of runs with identical
/// settings land in the same directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionSettings {
    pub crossover_probability: f64,
    pub mutation_probability: f64,
    pub generations: usize,
    pub population_size: usize,
    pub checkpoint_frequency: usize,
    pub patience: usize,
    pub seed: u64,
}

impl EvolutionSettings {
    /// Builds settings from `(name, value)` pairs; unnamed settings stay zero.
    pub fn from_pairs<I, K>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, SettingValue)>,
        K: AsRef<str>,
    {
        let mut settings = Self::default();
        for (key, value) in pairs {
            settings.set_by_name(key.as_ref(), value)?;
        }
        Ok(settings)
    }

    pub fn get(&self, key: SettingKey) -> SettingValue {
        match key {
            SettingKey::Cxpb => SettingValue::Float(self.crossover_probability),
            SettingKey::Mutpb => SettingValue::Float(self.mutation_probability),
            SettingKey::Ngen => self.generations.into(),
            SettingKey::N => self.population_size.into(),
            SettingKey::FreqOfCheckpoints => self.checkpoint_frequency.into(),
            SettingKey::Patience => self.patience.into(),
            SettingKey::Seed => self.seed.into(),
        }
    }

    pub fn get_by_name(&self, name: &str) -> Result<SettingValue> {
        Ok(self.get(name.parse()?))
    }

    pub fn set(&mut self, key: SettingKey, value: impl Into<SettingValue>) -> Result<()> {
        let value = value.into();
        if key.is_probability() {
            let probability = value.as_f64();
            if !(0.0..=1.0).contains(&probability) {
                return Err(SymregError::InvalidSetting {
                    key: key.name().to_string(),
                    reason: format!("{} is not a probability between 0 and 1", probability),
                });
            }
            match key {
                SettingKey::Cxpb => self.crossover_probability = probability,
                _ => self.mutation_probability = probability,
            }
            return Ok(());
        }

        let count = match value {
            SettingValue::Integer(count) => count,
            SettingValue::Float(v) => {
                return Err(SymregError::InvalidSetting {
                    key: key.name().to_string(),
                    reason: format!("expected a non-negative integer, got {}", v),
                })
            }
        };

        if key == SettingKey::Seed {
            self.seed = count;
            return Ok(());
        }

        let count = usize::try_from(count).map_err(|_| SymregError::InvalidSetting {
            key: key.name().to_string(),
            reason: format!("{} does not fit in a count", count),
        })?;
        match key {
            SettingKey::Ngen => self.generations = count,
            SettingKey::N => self.population_size = count,
            SettingKey::FreqOfCheckpoints => self.checkpoint_frequency = count,
            _ => self.patience = count,
        }
        Ok(())
    }

    pub fn set_by_name(&mut self, name: &str, value: impl Into<SettingValue>) -> Result<()> {
        self.set(name.parse()?, value)
    }

    /// Settings in sorted key order, written the way existing run directories
    /// were keyed: `OrderedDict([('CXPB', 0), ('FREQ_OF_CHECKPOINTS', 0), ...])`.
    pub fn canonical_string(&self) -> String {
        let items = SettingKey::ALL
            .iter()
            .map(|key| format!("('{}', {})", key, python_repr(self.get(*key))))
            .collect::<Vec<_>>()
            .join(", ");
        format!("OrderedDict([{}])", items)
    }

    /// MD5 hex digest of the canonical string
    pub fn content_hash(&self) -> String {
        format!("{:x}", Md5::digest(self.canonical_string().as_bytes()))
    }

    /// The content hash cut to `length` hex characters; `None` or zero keeps it whole.
    pub fn hash_prefix(&self, length: Option<usize>) -> String {
        let hash = self.content_hash();
        match length {
            Some(length) if length > 0 && length < hash.len() => hash[..length].to_string(),
            _ => hash,
        }
    }

    pub fn summary_lines(&self) -> Vec<String> {
        SettingKey::ALL
            .iter()
            .map(|key| {
                format!(
                    " {:<20} {:>10}  ({})",
                    format!("{}:", key),
                    self.get(*key).to_string(),
                    key.description()
                )
            })
            .collect()
    }

    pub fn log_summary(&self) {
        log::info!("Evolution settings {}", self.hash_prefix(Some(8)));
        for line in self.summary_lines() {
            log::info!("{}", line);
        }
    }

    /// Random number generator seeded from SEED
    pub fn rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.seed)
    }

    pub fn is_checkpoint_generation(&self, generation: usize) -> bool {
        self.checkpoint_frequency != 0 && generation % self.checkpoint_frequency == 0
    }

    pub fn stopping_rule(&self) -> StoppingRule {
        StoppingRule::new(self.generations, self.patience)
    }
}

/// Integral probabilities print as integers, like the zero defaults;
/// tiny ones switch to exponent form (`1e-05`).
fn python_repr(value: SettingValue) -> String {
    match value {
        SettingValue::Integer(v) => v.to_string(),
        SettingValue::Float(v) if v.fract() == 0.0 => format!("{}", v as i64),
        SettingValue::Float(v) if v != 0.0 && v.abs() < 1e-4 => {
            let exp = format!("{:e}", v);
            match exp.split_once('e') {
                Some((mantissa, exponent)) => {
                    let (sign, digits) = match exponent.strip_prefix('-') {
                        Some(digits) => ('-', digits),
                        None => ('+', exponent),
                    };
                    format!("{}e{}{:0>2}", mantissa, sign, digits)
                }
                None => exp,
            }
        }
        SettingValue::Float(v) => v.to_string(),
    }
}

impl fmt::Display for EvolutionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, key) in SettingKey::ALL.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", key, self.get(*key))?;
        }
        f.write_str("}")
    }
}

impl ConfigSection for EvolutionSettings {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.crossover_probability) {
            return Err(SymregError::Configuration(
                "Crossover probability must be between 0 and 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_probability) {
            return Err(SymregError::Configuration(
                "Mutation probability must be between 0 and 1".to_string(),
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Evolution".to_string(),
            fields: vec![
                FieldManifest::new(
                    "crossover_probability",
                    "float",
                    serde_json::json!(self.crossover_probability),
                    SettingKey::Cxpb.description(),
                )
                .bounded(Some(0.0), Some(1.0)),
                FieldManifest::new(
                    "mutation_probability",
                    "float",
                    serde_json::json!(self.mutation_probability),
                    SettingKey::Mutpb.description(),
                )
                .bounded(Some(0.0), Some(1.0)),
                FieldManifest::new(
                    "generations",
                    "integer",
                    serde_json::json!(self.generations),
                    SettingKey::Ngen.description(),
                )
                .bounded(Some(0.0), None),
                FieldManifest::new(
                    "population_size",
                    "integer",
                    serde_json::json!(self.population_size),
                    SettingKey::N.description(),
                )
                .bounded(Some(0.0), None),
                FieldManifest::new(
                    "checkpoint_frequency",
                    "integer",
                    serde_json::json!(self.checkpoint_frequency),
                    SettingKey::FreqOfCheckpoints.description(),
                )
                .bounded(Some(0.0), None),
                FieldManifest::new(
                    "patience",
                    "integer",
                    serde_json::json!(self.patience),
                    SettingKey::Patience.description(),
                )
                .bounded(Some(0.0), None),
                FieldManifest::new(
                    "seed",
                    "integer",
                    serde_json::json!(self.seed),
                    SettingKey::Seed.description(),
                ),
            ],
        }
    }
}
