//! ConfigStore integration tests
//!
//! Layer precedence, override file handling, reload visibility, typed getter
//! defaults and the simple/complex limit coupling.

use cellguard_config::{keys, ConfigError, ConfigSources, ConfigStore, LayerSource};
use proptest::prelude::*;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tempfile::NamedTempFile;

const BASE: &str = r#"
[cellguard.unit]
lock.type = "memcached"
cache.type = "memcached"
unitUser.issuers = "https://issuer.example.com/ cellguard-localunit:/unitadmin/"
box.odata.schema.property.LayerLimits.SimpleType = "400,100,20,0"
box.odata.schema.property.LayerLimits.ComplexType = "20,20,50,0"
"#;

fn write_override(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn store_with_file(file: &NamedTempFile) -> ConfigStore {
    let sources = ConfigSources {
        base: LayerSource::Inline(BASE.to_string()),
        override_file: Some(file.path().to_path_buf()),
        fallback_override: None,
    };
    ConfigStore::load(sources).unwrap()
}

// ============================================================================
// LAYER PRECEDENCE
// ============================================================================

#[test]
fn test_override_file_wins_over_base() {
    let file = write_override("[cellguard.unit]\nlock.type = \"inProcess\"\n");
    let store = store_with_file(&file);

    assert_eq!(store.lock_type().as_deref(), Some("inProcess"));
    assert_eq!(store.cache_type().as_deref(), Some("memcached"), "untouched key keeps base value");
}

#[test]
fn test_override_only_key_after_reload() {
    let file = write_override("");
    let store = store_with_file(&file);
    assert!(store.engine_host().is_none());

    std::fs::write(file.path(), "[cellguard.unit]\nengine.host = \"engine.internal\"\n").unwrap();
    store.reload().unwrap();

    assert_eq!(store.engine_host().as_deref(), Some("engine.internal"));
    assert!(store.snapshot().base().get(keys::engine::HOST).is_none(), "base layer unaffected");
}

#[test]
fn test_missing_override_file_uses_fallback() {
    let sources = ConfigSources {
        base: LayerSource::Inline(BASE.to_string()),
        override_file: Some("/nonexistent/cellguard/unit-config.toml".into()),
        fallback_override: Some(LayerSource::Inline(
            "[cellguard.unit]\ncache.type = \"none\"\n".to_string(),
        )),
    };
    let store = ConfigStore::load(sources).unwrap();

    assert_eq!(store.cache_type().as_deref(), Some("none"));
}

#[test]
fn test_unparsable_override_file_falls_back_to_base() {
    let file = write_override("lock.type = = broken");
    let store = store_with_file(&file);

    assert!(store.snapshot().overrides().is_empty());
    assert_eq!(store.lock_type().as_deref(), Some("memcached"));
}

#[test]
fn test_missing_base_is_fatal() {
    let sources = ConfigSources {
        base: LayerSource::File("/nonexistent/cellguard/defaults.toml".into()),
        override_file: None,
        fallback_override: None,
    };

    assert!(matches!(
        ConfigStore::load(sources),
        Err(ConfigError::BaseLayer { .. })
    ));
}

#[test]
fn test_reload_failure_keeps_current_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let base_path = dir.path().join("defaults.toml");
    std::fs::write(&base_path, BASE).unwrap();

    let store = ConfigStore::load(ConfigSources {
        base: LayerSource::File(base_path.clone()),
        override_file: None,
        fallback_override: None,
    })
    .unwrap();

    std::fs::remove_file(&base_path).unwrap();
    assert!(store.reload().is_err());
    assert_eq!(store.lock_type().as_deref(), Some("memcached"));
}

// ============================================================================
// TYPED GETTERS
// ============================================================================

#[test]
fn test_batch_timing_defaults_when_unset() {
    let store = ConfigStore::load(ConfigSources::inline(BASE, "")).unwrap();

    assert_eq!(store.odata_batch_timeout_ms().unwrap(), 270_000);
    assert_eq!(store.odata_batch_sleep_ms().unwrap(), 50);
    assert_eq!(store.odata_batch_sleep_interval_ms().unwrap(), 1_000);
}

#[test]
fn test_batch_timing_configured_values() {
    let store = ConfigStore::load(ConfigSources::inline(
        BASE,
        r#"
        [cellguard.unit.odata.batch]
        timeoutInMillis = 1000
        sleepInMillis = 5
        sleepIntervalInMillis = 20
        "#,
    ))
    .unwrap();

    assert_eq!(store.odata_batch_timeout_ms().unwrap(), 1_000);
    assert_eq!(store.odata_batch_sleep_ms().unwrap(), 5);
    assert_eq!(store.odata_batch_sleep_interval_ms().unwrap(), 20);
}

#[test]
fn test_batch_timing_empty_value_uses_default() {
    let store = ConfigStore::load(ConfigSources::inline(BASE, "")).unwrap();
    store.set(keys::odata::BATCH_REQUEST_TIMEOUT_IN_MILLIS, "");

    assert_eq!(store.odata_batch_timeout_ms().unwrap(), 270_000);
}

#[test]
fn test_batch_timing_garbage_is_fatal() {
    let store = ConfigStore::load(ConfigSources::inline(BASE, "")).unwrap();
    store.set(keys::odata::BATCH_SLEEP_IN_MILLIS, "soon");

    assert!(matches!(
        store.odata_batch_sleep_ms(),
        Err(ConfigError::Invalid { .. })
    ));
}

#[test]
fn test_required_getter_without_default_fails() {
    let store = ConfigStore::load(ConfigSources::inline(BASE, "")).unwrap();

    assert!(matches!(store.top_query_max_size(), Err(ConfigError::Missing(_))));
    assert!(matches!(store.is_cell_cache_enabled(), Err(ConfigError::Missing(_))));
}

#[test]
fn test_layered_limits_examples() {
    let store = ConfigStore::load(ConfigSources::inline(BASE, "")).unwrap();
    store.set("cellguard.unit.test.limits", "1,2,3,4");
    assert_eq!(store.layered_limits("cellguard.unit.test.limits", 2).unwrap(), vec![1, 2]);

    store.set("cellguard.unit.test.limits", "1,2");
    assert_eq!(store.layered_limits("cellguard.unit.test.limits", 4).unwrap(), vec![1, 2, 0, 0]);

    store.set("cellguard.unit.test.limits", "1,*,3");
    assert_eq!(store.layered_limits("cellguard.unit.test.limits", 0).unwrap(), vec![1, -1, 3]);
    assert_eq!(store.get_int_array("cellguard.unit.test.limits").unwrap(), vec![1, -1, 3]);
}

// ============================================================================
// ISSUER MEMBERSHIP
// ============================================================================

#[test]
fn test_membership_check() {
    let store = ConfigStore::load(ConfigSources::inline(BASE, "")).unwrap();
    let unit = "https://unit.example.com/";

    assert!(store.membership_check(Some("http://a http://b"), Some("http://a"), unit));
    assert!(!store.membership_check(Some("http://a http://b"), Some("http://c"), unit));
    assert!(!store.membership_check(None, Some("http://a"), unit));
    assert!(!store.membership_check(Some("http://a"), None, unit));

    assert!(store.check_unit_user_issuers("https://issuer.example.com/", unit));
    assert!(store.check_unit_user_issuers("https://unit.example.com/unitadmin/", unit));
    assert!(!store.check_unit_user_issuers("https://other.example.com/unitadmin/", unit));
}

// ============================================================================
// CONCURRENT RELOAD
// ============================================================================

#[test]
fn test_readers_never_see_partial_merge() {
    const KEYS: usize = 32;

    let layer = |marker: &str| {
        let mut text = String::from("[cellguard.unit.test]\n");
        for i in 0..KEYS {
            text.push_str(&format!("k{} = \"{}\"\n", i, marker));
        }
        text
    };

    let file = write_override(&layer("one"));
    let store = Arc::new(
        ConfigStore::load(ConfigSources {
            base: LayerSource::Inline(layer("base")),
            override_file: Some(file.path().to_path_buf()),
            fallback_override: None,
        })
        .unwrap(),
    );

    let done = Arc::new(AtomicBool::new(false));
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                while !done.load(Ordering::Relaxed) {
                    let snapshot = store.snapshot();
                    let first = snapshot.get("cellguard.unit.test.k0").unwrap().to_string();
                    for i in 1..KEYS {
                        let value = snapshot.get(&format!("cellguard.unit.test.k{}", i)).unwrap();
                        assert_eq!(value, first, "snapshot mixes two merges");
                    }
                }
            })
        })
        .collect();

    for round in 0..50 {
        let marker = if round % 2 == 0 { "two" } else { "one" };
        std::fs::write(file.path(), layer(marker)).unwrap();
        store.reload().unwrap();
    }

    done.store(true, Ordering::Relaxed);
    for reader in readers {
        reader.join().unwrap();
    }
}

// ============================================================================
// LIMIT COUPLING
// ============================================================================

fn limit_list() -> impl Strategy<Value = String> {
    proptest::collection::vec(prop_oneof![Just("*".to_string()), (0i32..500).prop_map(|n| n.to_string())], 1..8)
        .prop_map(|layers| layers.join(","))
}

proptest! {
    #[test]
    fn prop_complex_limits_follow_simple_length(simple in limit_list(), complex in limit_list()) {
        let store = ConfigStore::load(ConfigSources::inline(BASE, "")).unwrap();
        store.set(keys::user_data::SIMPLE_TYPE_PROPERTY_LIMITS, simple.clone());
        store.set(keys::user_data::COMPLEX_TYPE_PROPERTY_LIMITS, complex);

        let limits = store.userdata_property_limits().unwrap();
        prop_assert_eq!(limits.simple.len(), simple.split(',').count());
        prop_assert_eq!(limits.complex.len(), limits.simple.len());
        prop_assert_eq!(
            store.userdata_complex_type_property_limits().unwrap().len(),
            store.userdata_simple_type_property_limits().unwrap().len()
        );
    }
}
