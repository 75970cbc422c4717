//! # unit-config
//!
//! Inspect the effective unit configuration.
//!
//! ```text
//! unit-config show [--overrides] [--json]
//! unit-config get <KEY>
//! unit-config check-issuer <ISSUER> --unit-url <URL>
//! unit-config limits [--json]
//! ```
//!
//! The override file comes from `--config` or `CELLGUARD_CONFIG_FILE`.
//! `RUST_LOG` controls log output (default: info).

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use cellguard_config::{keys, ConfigSources, ConfigStore};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "unit-config", version, about = "Inspect the effective unit configuration")]
struct Cli {
    /// Override file (takes precedence over the bundled overrides)
    #[arg(long, short, env = keys::CONFIG_FILE_ENV)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print effective entries
    Show {
        /// Only keys set by the override layer
        #[arg(long)]
        overrides: bool,

        /// Emit a JSON object instead of `key = value` lines
        #[arg(long)]
        json: bool,
    },

    /// Print one effective value
    Get {
        /// Full key, or a suffix under the unit root
        key: String,
    },

    /// Check an issuer against the unit user issuer allow-list
    CheckIssuer {
        /// Issuer URL presented by a token
        issuer: String,

        /// Base URL of this unit
        #[arg(long)]
        unit_url: String,
    },

    /// Print user data property layer limits
    Limits {
        /// Emit a JSON object instead of `name = [..]` lines
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut sources = ConfigSources::bundled();
    if let Some(path) = &cli.config {
        sources = sources.with_override_file(path);
    }
    let store = ConfigStore::load(sources).context("failed to load unit configuration")?;

    match cli.command {
        Command::Show { overrides, json } => show(&store, overrides, json)?,
        Command::Get { key } => {
            let full = if key.starts_with(keys::KEY_ROOT) {
                key
            } else {
                format!("{}{}", keys::KEY_ROOT, key)
            };
            match store.get(&full) {
                Some(value) => println!("{}", display_value(&full, &value)),
                None => bail!("{} is not set", full),
            }
        }
        Command::CheckIssuer { issuer, unit_url } => {
            let accepted = store.check_unit_user_issuers(&issuer, &unit_url);
            info!(issuer = %issuer, accepted, "Issuer check");
            println!("{}", if accepted { "accepted" } else { "rejected" });
        }
        Command::Limits { json } => {
            let limits = store.userdata_property_limits()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&limits)?);
            } else {
                println!("simple  = {:?}", limits.simple);
                println!("complex = {:?}", limits.complex);
            }
        }
    }

    Ok(())
}

fn show(store: &ConfigStore, overrides_only: bool, json: bool) -> Result<()> {
    let snapshot = store.snapshot();
    let entries: Vec<(String, String)> = snapshot
        .entries()
        .into_iter()
        .filter(|(key, _)| !overrides_only || snapshot.overrides().get(key).is_some())
        .map(|(key, value)| (key.to_string(), display_value(key, value)))
        .collect();

    if json {
        let object: serde_json::Map<String, serde_json::Value> = entries
            .into_iter()
            .map(|(k, v)| (k, serde_json::Value::String(v)))
            .collect();
        println!("{}", serde_json::to_string_pretty(&object)?);
    } else {
        for (key, value) in entries {
            println!("{} = {}", key, value);
        }
    }
    Ok(())
}

fn display_value(key: &str, value: &str) -> String {
    if keys::is_sensitive(key) && !value.is_empty() {
        "***".to_string()
    } else {
        value.to_string()
    }
}
