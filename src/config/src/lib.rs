//! # Cellguard Unit Configuration
//!
//! Layered key/value configuration for a cellguard unit.
//!
//! ## Features
//!
//! - **Two layers**: bundled defaults overlaid by an override file
//!   (`CELLGUARD_CONFIG_FILE`) or the bundled override resource
//! - **Copy-and-swap publication**: reload and ad-hoc `set` never expose a
//!   partially merged map to readers
//! - **Typed accessors** with fail-fast parsing; only the `$batch` timing keys
//!   fall back to built-in defaults
//! - **Layered limits** with `*` meaning unlimited
//! - **Local-unit scheme virtualization** for issuer allow-lists
//!
//! ## Example
//!
//! ```rust
//! use cellguard_config::{ConfigSources, ConfigStore};
//!
//! let store = ConfigStore::load(ConfigSources::bundled())?;
//! assert_eq!(store.odata_batch_timeout_ms()?, 270_000);
//! # Ok::<(), cellguard_config::ConfigError>(())
//! ```

pub mod error;
pub mod issuer;
pub mod keys;
pub mod layer;
pub mod limits;
pub mod store;
pub mod unit;

pub use error::{ConfigError, Result};
pub use issuer::LOCAL_UNIT_SCHEME;
pub use layer::{ConfigSources, Layer, LayerSource};
pub use limits::UNLIMITED;
pub use store::{ConfigStore, Snapshot};
pub use unit::{PropertyLimits, Secret};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
