//! Configuration loading for MutantScope.
//! Reads mutantscope.toml from the current directory or the path in MUTANTSCOPE_CONFIG.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use mutantscope_common::{MutantscopeError, Result};
use mutantscope_ranker::Thresholds;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const CONFIG_ENV: &str = "MUTANTSCOPE_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "mutantscope.toml";
pub const NCBI_API_KEY_ENV: &str = "MUTANTSCOPE_NCBI_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub vep: VepConfig,
    #[serde(default)]
    pub literature: LiteratureConfig,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VepConfig {
    #[serde(default = "default_vep_base_url")]
    pub base_url: String,
    #[serde(default = "default_species")]
    pub species: String,
    #[serde(default = "default_vep_timeout")]
    pub timeout_secs: u64,
    /// Merged over the built-in plugin table; same-named keys win.
    #[serde(default)]
    pub extra_params: BTreeMap<String, String>,
}

fn default_vep_base_url() -> String { "https://rest.ensembl.org".to_string() }
fn default_species()      -> String { "human".to_string() }
fn default_vep_timeout()  -> u64    { 30 }

impl Default for VepConfig {
    fn default() -> Self {
        Self {
            base_url:     default_vep_base_url(),
            species:      default_species(),
            timeout_secs: default_vep_timeout(),
            extra_params: BTreeMap::new(),
        }
    }
}

impl VepConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiteratureConfig {
    #[serde(default = "bool_true")]
    pub enabled: bool,
    #[serde(default = "default_literature_timeout")]
    pub timeout_secs: u64,
    /// Publications resolved to title/abstract per lookup; the rest stay links.
    #[serde(default = "default_max_articles")]
    pub max_articles: usize,
    pub api_key: Option<String>,
}

fn bool_true()                  -> bool  { true }
fn default_literature_timeout() -> u64   { 10 }
fn default_max_articles()       -> usize { 5 }

impl Default for LiteratureConfig {
    fn default() -> Self {
        Self {
            enabled:      bool_true(),
            timeout_secs: default_literature_timeout(),
            max_articles: default_max_articles(),
            api_key:      None,
        }
    }
}

impl LiteratureConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Configured key, else MUTANTSCOPE_NCBI_API_KEY.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(NCBI_API_KEY_ENV).ok())
            .filter(|k| !k.trim().is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_max_phenotypes")]
    pub max_phenotypes: usize,
    #[serde(default = "default_max_publications")]
    pub max_publications: usize,
    #[serde(default = "default_max_go_terms")]
    pub max_go_terms: usize,
}

fn default_max_phenotypes()   -> usize { 15 }
fn default_max_publications() -> usize { 20 }
fn default_max_go_terms()     -> usize { 20 }

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_phenotypes:   default_max_phenotypes(),
            max_publications: default_max_publications(),
            max_go_terms:     default_max_go_terms(),
        }
    }
}

mod tests;

impl Config {
    /// Load configuration.
    ///
    /// A path in MUTANTSCOPE_CONFIG must exist. Without it, mutantscope.toml
    /// in the current directory is used when present, else the defaults.
    pub fn load() -> Result<Self> {
        match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_path(Path::new(&path)),
            Err(_) => {
                let path = Path::new(DEFAULT_CONFIG_PATH);
                if path.exists() {
                    Self::from_path(path)
                } else {
                    warn!("No {} found, using built-in defaults", DEFAULT_CONFIG_PATH);
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(MutantscopeError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
            .map_err(|e| MutantscopeError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| MutantscopeError::Config(e.to_string()))?;
        config.thresholds.validate()?;
        Ok(config)
    }
}
