//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/rsshape/rsshape.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `RSSHAPE_*` prefix, `__` between nested keys
//!    (e.g. `RSSHAPE_FIELDS__PARENT=parent_id`)

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::domain::record::{
    RecordId, DEFAULT_CHILD_FIELD, DEFAULT_ID_FIELD, DEFAULT_INDENT_FIELD, DEFAULT_INDENT_TOKEN,
    DEFAULT_LEVEL_FIELD, DEFAULT_MAX_DEPTH, DEFAULT_PARENT_FIELD, ROOT_ID,
};
use crate::domain::{BuildOptions, FillMode, FlattenOptions, LevelOptions};

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("config error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("cannot render config: {0}")]
    Render(#[from] toml::ser::Error),
}

/// Field names used when none are given on the command line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FieldNames {
    pub id: String,
    pub parent: String,
    pub children: String,
    pub level: String,
    pub indent: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            id: DEFAULT_ID_FIELD.into(),
            parent: DEFAULT_PARENT_FIELD.into(),
            children: DEFAULT_CHILD_FIELD.into(),
            level: DEFAULT_LEVEL_FIELD.into(),
            indent: DEFAULT_INDENT_FIELD.into(),
        }
    }
}

/// Unified configuration for rsshape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Parent reference meaning "no parent" (default: 0)
    pub root_id: RecordId,
    /// Indentation marker repeated per level (default: "|--")
    pub indent_token: String,
    /// Extend assembled rows to the longest sequence (default: false)
    pub fill: bool,
    /// Nesting limit for `tree` output (default: 1024)
    pub max_depth: usize,
    pub fields: FieldNames,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root_id: ROOT_ID,
            indent_token: DEFAULT_INDENT_TOKEN.into(),
            fill: false,
            max_depth: DEFAULT_MAX_DEPTH,
            fields: FieldNames::default(),
        }
    }
}

/// Get the XDG config directory for rsshape.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "rsshape").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("rsshape.toml"))
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file, must exist if given
    #[instrument(level = "debug")]
    pub fn load(config_file: Option<&Path>) -> Result<Self, SettingsError> {
        let mut builder = Config::builder().add_source(Config::try_from(&Settings::default())?);

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("global config: {}", global_path.display());
                builder = builder.add_source(File::from(global_path).format(FileFormat::Toml));
            }
        }

        if let Some(path) = config_file {
            if !path.exists() {
                return Err(SettingsError::NotFound(path.to_path_buf()));
            }
            debug!("explicit config: {}", path.display());
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }

        builder = builder.add_source(
            Environment::with_prefix("RSSHAPE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings: Self = builder.build()?.try_deserialize()?;
        debug!("settings: {:?}", settings);
        Ok(settings)
    }

    /// Render as TOML, the format of the config files.
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn fill_mode(&self) -> FillMode {
        FillMode::from(self.fill)
    }
}

impl From<&Settings> for BuildOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            parent_id: settings.root_id,
            root_id: settings.root_id,
            id_field: settings.fields.id.clone(),
            parent_field: settings.fields.parent.clone(),
            child_field: settings.fields.children.clone(),
            max_depth: settings.max_depth,
        }
    }
}

impl From<&Settings> for FlattenOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            child_field: settings.fields.children.clone(),
            id_field: settings.fields.id.clone(),
            parent_id_field: settings.fields.parent.clone(),
            root_id: settings.root_id,
        }
    }
}

impl From<&Settings> for LevelOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            parent_id: settings.root_id,
            root_id: settings.root_id,
            parent_field: settings.fields.parent.clone(),
            id_field: settings.fields.id.clone(),
            indent_token: settings.indent_token.clone(),
            level_field: settings.fields.level.clone(),
            indent_field: settings.fields.indent.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_domain_defaults() {
        let settings = Settings::default();
        assert_eq!(BuildOptions::from(&settings), BuildOptions::default());
        assert_eq!(FlattenOptions::from(&settings), FlattenOptions::default());
        assert_eq!(LevelOptions::from(&settings), LevelOptions::default());
        assert_eq!(settings.fill_mode(), FillMode::Truncate);
    }

    #[test]
    fn test_toml_roundtrip() {
        let settings = Settings::default();
        let rendered = settings.to_toml().unwrap();
        assert!(rendered.contains("indent_token = \"|--\""));
        let parsed: Settings = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, settings);
    }
}
