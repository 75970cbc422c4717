//! Configuration layers and their sources
//!
//! A layer is a flat `dotted.key -> string` map. Layers are written as TOML;
//! nested tables and dotted keys are flattened back into dotted names so that
//! `[cellguard.unit]` + `lock.type = "memcached"` and
//! `"cellguard.unit.lock.type" = "memcached"` describe the same entry.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// Bundled default layer
pub const BUNDLED_DEFAULTS: &str = include_str!("../resources/unit-config-default.toml");

/// Bundled override layer, used when no override file is configured
pub const BUNDLED_OVERRIDES: &str = include_str!("../resources/unit-config.toml");

/// One flat configuration layer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layer {
    entries: BTreeMap<String, String>,
}

impl Layer {
    /// Create an empty layer
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a layer from TOML text
    pub fn parse(text: &str) -> Result<Self> {
        let table: toml::Table = toml::from_str(text)?;
        let mut entries = BTreeMap::new();
        flatten_into(&mut entries, "", &table)?;
        Ok(Self { entries })
    }

    /// Add an entry
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Look up a raw value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Iterate entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the layer has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn flatten_into(out: &mut BTreeMap<String, String>, prefix: &str, table: &toml::Table) -> Result<()> {
    for (name, value) in table {
        let key = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", prefix, name)
        };

        let flat = match value {
            toml::Value::Table(inner) => {
                flatten_into(out, &key, inner)?;
                continue;
            }
            toml::Value::String(s) => s.clone(),
            toml::Value::Integer(i) => i.to_string(),
            toml::Value::Float(f) => f.to_string(),
            toml::Value::Boolean(b) => b.to_string(),
            toml::Value::Datetime(d) => d.to_string(),
            toml::Value::Array(_) => {
                return Err(ConfigError::Unsupported { key, kind: "array" });
            }
        };
        out.insert(key, flat);
    }
    Ok(())
}

/// Where a layer is read from
#[derive(Clone)]
pub enum LayerSource {
    /// Text compiled into the binary
    Embedded {
        /// Resource name used in logs
        name: &'static str,
        /// TOML text
        text: &'static str,
    },

    /// File on disk, read on every load
    File(PathBuf),

    /// Text supplied at runtime
    Inline(String),
}

impl LayerSource {
    /// Bundled default layer
    pub fn bundled_defaults() -> Self {
        Self::Embedded {
            name: "unit-config-default.toml",
            text: BUNDLED_DEFAULTS,
        }
    }

    /// Bundled override layer
    pub fn bundled_overrides() -> Self {
        Self::Embedded {
            name: "unit-config.toml",
            text: BUNDLED_OVERRIDES,
        }
    }

    /// Read the source text
    pub fn read(&self) -> std::io::Result<String> {
        match self {
            Self::Embedded { text, .. } => Ok((*text).to_string()),
            Self::File(path) => std::fs::read_to_string(path),
            Self::Inline(text) => Ok(text.clone()),
        }
    }

    /// Read and parse the source
    pub fn load(&self) -> Result<Layer> {
        let text = self.read()?;
        Layer::parse(&text)
    }
}

impl fmt::Display for LayerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Embedded { name, .. } => write!(f, "bundled:{}", name),
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Inline(_) => write!(f, "inline"),
        }
    }
}

impl fmt::Debug for LayerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// The two layer sources a store reloads from
#[derive(Debug, Clone)]
pub struct ConfigSources {
    /// Baseline layer; failing to load it is fatal
    pub base: LayerSource,

    /// Override file; a missing file falls back to `fallback_override`
    pub override_file: Option<PathBuf>,

    /// Override used when no override file is set or it does not exist
    pub fallback_override: Option<LayerSource>,
}

impl ConfigSources {
    /// Bundled defaults and bundled overrides only
    pub fn bundled() -> Self {
        Self {
            base: LayerSource::bundled_defaults(),
            override_file: None,
            fallback_override: Some(LayerSource::bundled_overrides()),
        }
    }

    /// Bundled layers, with the override file taken from `CELLGUARD_CONFIG_FILE`
    pub fn from_env() -> Self {
        let override_file = std::env::var_os(crate::keys::CONFIG_FILE_ENV).map(PathBuf::from);
        Self {
            override_file,
            ..Self::bundled()
        }
    }

    /// Replace the override file path
    pub fn with_override_file(mut self, path: impl AsRef<Path>) -> Self {
        self.override_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Explicit base and override text, without any fallback
    pub fn inline(base: impl Into<String>, overrides: impl Into<String>) -> Self {
        Self {
            base: LayerSource::Inline(base.into()),
            override_file: None,
            fallback_override: Some(LayerSource::Inline(overrides.into())),
        }
    }
}
