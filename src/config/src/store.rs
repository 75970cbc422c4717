//! Layered configuration store
//!
//! The store keeps an immutable [`Snapshot`] behind an `Arc`. Reload and `set`
//! build a complete replacement snapshot and publish it with a single handle
//! swap, so a reader sees either the old map or the new one, never a partial
//! merge.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::error::{ConfigError, Result};
use crate::issuer;
use crate::keys;
use crate::layer::{ConfigSources, Layer};
use crate::limits;

/// One published state of the store
#[derive(Debug, Clone)]
pub struct Snapshot {
    base: Arc<Layer>,
    overrides: Arc<Layer>,
    effective: HashMap<String, String>,
}

impl Snapshot {
    /// Merge `overrides` over `base`
    pub fn merge(base: Layer, overrides: Layer) -> Self {
        let mut effective: HashMap<String, String> = base
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        for (key, value) in overrides.iter() {
            if base.get(key) != Some(value) {
                if keys::is_sensitive(key) {
                    debug!(key, "Overriding config (value redacted)");
                } else {
                    debug!(key, value, "Overriding config");
                }
            }
            effective.insert(key.to_string(), value.to_string());
        }

        Self {
            base: Arc::new(base),
            overrides: Arc::new(overrides),
            effective,
        }
    }

    /// Baseline layer
    pub fn base(&self) -> &Layer {
        &self.base
    }

    /// Override layer
    pub fn overrides(&self) -> &Layer {
        &self.overrides
    }

    /// Effective value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.effective.get(key).map(String::as_str)
    }

    /// Effective entries, sorted by key
    pub fn entries(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<_> = self
            .effective
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        entries.sort_unstable();
        entries
    }

    /// Required raw value
    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key)
            .ok_or_else(|| ConfigError::Missing(key.to_string()))
    }

    /// Required value parsed into `T`
    pub fn parse<T: FromStr>(&self, key: &str, expected: &'static str) -> Result<T> {
        let raw = self.require(key)?;
        raw.trim()
            .parse::<T>()
            .map_err(|_| ConfigError::invalid(key, raw, expected))
    }

    /// Parsed value, or `default` when the key is absent or empty
    pub fn parse_or<T: FromStr>(&self, key: &str, default: T, expected: &'static str) -> Result<T> {
        match self.get(key) {
            None => Ok(default),
            Some(raw) if raw.is_empty() => Ok(default),
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map_err(|_| ConfigError::invalid(key, raw, expected)),
        }
    }

    /// Required boolean (`true`/`false`, any case)
    pub fn parse_bool(&self, key: &str) -> Result<bool> {
        let raw = self.require(key)?;
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(ConfigError::invalid(key, raw, "boolean")),
        }
    }

    /// Layer limits for `key`, see [`limits::parse_layered_limits`]
    pub fn layered_limits(&self, key: &str, required_len: usize) -> Result<Vec<i32>> {
        limits::parse_layered_limits(key, self.get(key), required_len)
    }
}

/// Process-wide configuration resolver
///
/// Constructed once and shared as `Arc<ConfigStore>`.
pub struct ConfigStore {
    /// Where layers are reloaded from
    sources: ConfigSources,

    /// Currently published snapshot
    current: RwLock<Arc<Snapshot>>,

    /// Serializes reload and set
    writer: Mutex<()>,
}

impl ConfigStore {
    /// Load both layers from `sources`
    ///
    /// Fails only when the base layer cannot be loaded.
    pub fn load(sources: ConfigSources) -> Result<Self> {
        let snapshot = Self::read_layers(&sources)?;
        info!(
            "ConfigStore loaded: {} base keys, {} override keys",
            snapshot.base.len(),
            snapshot.overrides.len()
        );

        Ok(Self {
            sources,
            current: RwLock::new(Arc::new(snapshot)),
            writer: Mutex::new(()),
        })
    }

    /// Bundled defaults with the override file named by `CELLGUARD_CONFIG_FILE`
    pub fn from_env() -> Result<Self> {
        Self::load(ConfigSources::from_env())
    }

    /// Current snapshot
    ///
    /// Use one snapshot when several keys must be read consistently.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current.read().clone()
    }

    /// Effective value for `key`
    pub fn get(&self, key: &str) -> Option<String> {
        self.current.read().get(key).map(str::to_string)
    }

    /// Overwrite `key` in the effective map
    ///
    /// Neither layer changes, and the next [`reload`](Self::reload) discards
    /// the value.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        let _guard = self.writer.lock();
        let mut next = Snapshot::clone(&self.snapshot());
        next.effective.insert(key.into(), value.into());
        *self.current.write() = Arc::new(next);
    }

    /// Re-read both layers and publish the merged result
    pub fn reload(&self) -> Result<()> {
        let _guard = self.writer.lock();
        let next = Self::read_layers(&self.sources)?;
        info!("ConfigStore reloaded: {} effective keys", next.effective.len());
        *self.current.write() = Arc::new(next);
        Ok(())
    }

    /// Required value parsed as `i32`
    pub fn get_int(&self, key: &str) -> Result<i32> {
        self.snapshot().parse(key, "32-bit integer")
    }

    /// Required value parsed as `i64`
    pub fn get_long(&self, key: &str) -> Result<i64> {
        self.snapshot().parse(key, "64-bit integer")
    }

    /// Required boolean
    pub fn get_bool(&self, key: &str) -> Result<bool> {
        self.snapshot().parse_bool(key)
    }

    /// Required string
    pub fn get_required(&self, key: &str) -> Result<String> {
        self.snapshot().require(key).map(str::to_string)
    }

    /// Comma separated integer list
    pub fn get_int_array(&self, key: &str) -> Result<Vec<i32>> {
        self.layered_limits(key, 0)
    }

    /// Layer limits for `key`, see [`limits::parse_layered_limits`]
    pub fn layered_limits(&self, key: &str, required_len: usize) -> Result<Vec<i32>> {
        self.snapshot().layered_limits(key, required_len)
    }

    /// Whether `candidate` is in the space separated `list`, after rewriting
    /// local-unit entries against `unit_base_url`
    pub fn membership_check(
        &self,
        list: Option<&str>,
        candidate: Option<&str>,
        unit_base_url: &str,
    ) -> bool {
        issuer::is_listed(list, candidate, unit_base_url)
    }

    fn read_layers(sources: &ConfigSources) -> Result<Snapshot> {
        let base = sources.base.load().map_err(|e| ConfigError::BaseLayer {
            source_name: sources.base.to_string(),
            reason: e.to_string(),
        })?;
        let overrides = Self::read_override(sources);
        Ok(Snapshot::merge(base, overrides))
    }

    fn read_override(sources: &ConfigSources) -> Layer {
        if let Some(path) = &sources.override_file {
            match std::fs::read_to_string(path) {
                Ok(text) => {
                    info!("Loading config overrides from {}", path.display());
                    return Layer::parse(&text).unwrap_or_else(|e| {
                        warn!("Ignoring override file {}: {}", path.display(), e);
                        Layer::new()
                    });
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    info!(
                        "Override file {} not found, using bundled overrides",
                        path.display()
                    );
                }
                Err(e) => {
                    warn!("Cannot read override file {}: {}", path.display(), e);
                    return Layer::new();
                }
            }
        }

        match &sources.fallback_override {
            Some(source) => source.load().unwrap_or_else(|e| {
                warn!("Ignoring override layer {}: {}", source, e);
                Layer::new()
            }),
            None => {
                debug!("No override layer configured");
                Layer::new()
            }
        }
    }
}

impl std::fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigStore")
            .field("sources", &self.sources)
            .field("keys", &self.current.read().effective.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = r#"
        [cellguard.unit]
        lock.type = "memcached"
        dav.depth.maxnum = 5
        cache.cell.enabled = "TRUE"
        es.topnum = "lots"
    "#;

    fn store(overrides: &str) -> ConfigStore {
        ConfigStore::load(ConfigSources::inline(BASE, overrides)).unwrap()
    }

    #[test]
    fn test_override_wins() {
        let store = store("\"cellguard.unit.lock.type\" = \"inProcess\"");
        assert_eq!(store.get(keys::lock::TYPE).as_deref(), Some("inProcess"));
        assert_eq!(store.snapshot().base().get(keys::lock::TYPE), Some("memcached"));
    }

    #[test]
    fn test_override_only_key_visible() {
        let store = store("[cellguard.unit]\nengine.host = \"engine.local\"");
        assert_eq!(store.get(keys::engine::HOST).as_deref(), Some("engine.local"));
        assert!(store.snapshot().base().get(keys::engine::HOST).is_none());
    }

    #[test]
    fn test_typed_getters() {
        let store = store("");
        assert_eq!(store.get_int(keys::dav::COLLECTION_DEPTH_MAX_NUM).unwrap(), 5);
        assert!(store.get_bool(keys::cache::CELL_CACHE_ENABLED).unwrap());
        assert!(matches!(
            store.get_int(keys::es::TOP_NUM),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            store.get_int(keys::event::HOP_MAXNUM),
            Err(ConfigError::Missing(_))
        ));
    }

    #[test]
    fn test_set_is_immediate_and_dropped_on_reload() {
        let store = store("");
        store.set(keys::dav::COLLECTION_DEPTH_MAX_NUM, "9");
        assert_eq!(store.get_int(keys::dav::COLLECTION_DEPTH_MAX_NUM).unwrap(), 9);
        assert!(store.snapshot().base().get(keys::dav::COLLECTION_DEPTH_MAX_NUM) == Some("5"));

        store.reload().unwrap();
        assert_eq!(store.get_int(keys::dav::COLLECTION_DEPTH_MAX_NUM).unwrap(), 5);
    }

    #[test]
    fn test_snapshot_unaffected_by_later_set() {
        let store = store("");
        let before = store.snapshot();
        store.set(keys::lock::TYPE, "none");
        assert_eq!(before.get(keys::lock::TYPE), Some("memcached"));
        assert_eq!(store.get(keys::lock::TYPE).as_deref(), Some("none"));
    }

    #[test]
    fn test_bad_override_is_soft() {
        let store = store("this is = = not toml");
        assert!(store.snapshot().overrides().is_empty());
        assert_eq!(store.get(keys::lock::TYPE).as_deref(), Some("memcached"));
    }

    #[test]
    fn test_bad_base_is_fatal() {
        let result = ConfigStore::load(ConfigSources::inline("not = = toml", ""));
        assert!(matches!(result, Err(ConfigError::BaseLayer { .. })));
    }

    #[test]
    fn test_parse_or_defaults_on_empty() {
        let store = store("");
        store.set("cellguard.unit.empty", "");
        let snapshot = store.snapshot();
        assert_eq!(snapshot.parse_or("cellguard.unit.empty", 7u64, "integer").unwrap(), 7);
        assert_eq!(snapshot.parse_or("cellguard.unit.absent", 8u64, "integer").unwrap(), 8);
        assert_eq!(
            snapshot
                .parse_or(keys::dav::COLLECTION_DEPTH_MAX_NUM, 0u64, "integer")
                .unwrap(),
            5
        );
    }
}
