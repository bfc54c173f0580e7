use serde::{Deserialize, Serialize};
use spellbook_markup_engine::{ContextOptions, DirectiveTemplate, FormatOptions};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Quiet windows before the host refreshes derived views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub highlight_debounce_ms: u64,
    pub context_debounce_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            highlight_debounce_ms: 50,
            context_debounce_ms: 50,
        }
    }
}

impl TimingConfig {
    pub fn highlight_debounce(&self) -> Duration {
        Duration::from_millis(self.highlight_debounce_ms)
    }

    pub fn context_debounce(&self) -> Duration {
        Duration::from_millis(self.context_debounce_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectivesConfig {
    /// TOML file listing the directives offered for insertion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,
}

/// Directive catalog file: a list of `[[directive]]` tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectiveCatalog {
    #[serde(default, rename = "directive")]
    pub directives: Vec<DirectiveTemplate>,
}

impl DirectiveCatalog {
    pub fn load_from_path<P: AsRef<Path>>(catalog_path: P) -> Result<Self, ConfigError> {
        let catalog_path = catalog_path.as_ref();
        let content = std::fs::read_to_string(catalog_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: catalog_path.to_path_buf(),
                source,
            }
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
            config_path: catalog_path.to_path_buf(),
            source,
        })
    }

    pub fn find(&self, name: &str) -> Option<&DirectiveTemplate> {
        self.directives.iter().find(|d| d.name == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub context: ContextOptions,
    pub format: FormatOptions,
    pub timing: TimingConfig,
    pub directives: DirectivesConfig,
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the catalog path
        if let Some(catalog) = config.directives.catalog_path.take() {
            config.directives.catalog_path = Some(Self::expand_path(&catalog).unwrap_or(catalog));
        }

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/spellbook-markup");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// The configured directive catalog, empty when none is set.
    pub fn directive_catalog(&self) -> Result<DirectiveCatalog, ConfigError> {
        match &self.directives.catalog_path {
            Some(path) => DirectiveCatalog::load_from_path(path),
            None => Ok(DirectiveCatalog::default()),
        }
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
