//! Strata - layered settings inspector
//!
//! Usage:
//!   strata get Filters.Clip.Threshold --as double
//!   strata set View.Background 0.1 0.2 0.3 --vector
//!   strata proxy clip.json --prefix defaults

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{Value, json};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use strata_core::proxy::{InMemoryProxy, ProxyDescription};
use strata_core::settings::{SettingsLocations, SettingsStore, ToSetting};
use strata_core::types::SettingsTier;

#[derive(Parser)]
#[command(name = "strata")]
#[command(about = "Layered user/site settings", long_about = None)]
struct Cli {
    /// User settings file (default: ~/.strata.user.json)
    #[arg(long, global = true)]
    user_settings: Option<PathBuf>,

    /// Site settings file (default: strata.site.json next to the executable)
    #[arg(long, global = true)]
    site_settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved value of a setting
    Get {
        /// Setting path, e.g. Filters.Clip.Threshold
        path: String,

        /// Type to read the value as
        #[arg(long = "as", value_enum, default_value = "string")]
        kind: ValueKind,

        /// Read a single element of a vector setting
        #[arg(long, conflicts_with = "vector")]
        index: Option<usize>,

        /// Print every element as a JSON array
        #[arg(long)]
        vector: bool,

        /// Value printed when the setting is missing or not readable
        #[arg(long)]
        default: Option<String>,
    },

    /// Check whether a setting exists (non-zero exit if not)
    Has {
        path: String,
    },

    /// Print the number of elements in a setting
    Count {
        path: String,
    },

    /// Write a setting into the user settings file
    Set {
        path: String,

        /// One value for a scalar, several for a vector
        #[arg(required = true)]
        values: Vec<String>,

        /// Type of the values (auto: int, then double, then string)
        #[arg(long = "as", value_enum, default_value = "auto")]
        kind: ValueKind,

        /// Store a single value as a one-element vector
        #[arg(long)]
        vector: bool,
    },

    /// Print the raw settings text of a tier
    Show {
        #[arg(long, default_value = "user")]
        tier: SettingsTier,
    },

    /// Apply settings to a proxy described by a JSON file
    Proxy {
        /// Proxy description: {"group", "name", "properties": [...]}
        file: PathBuf,

        /// Root under which <group>.<name> is looked up
        #[arg(long, default_value = "")]
        prefix: String,

        /// Record the proxy's non-default values in the user settings instead
        #[arg(long)]
        record: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum ValueKind {
    Auto,
    Int,
    Double,
    String,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "strata=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut store = open_store(&cli)?;

    match cli.command {
        Commands::Get {
            path,
            kind,
            index,
            vector,
            default,
        } => run_get(&store, &path, kind, index, vector, default.as_deref()),
        Commands::Has { path } => {
            let found = store.has_setting(path.as_str());
            println!("{found}");
            if !found {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Count { path } => {
            println!("{}", store.get_number_of_elements(path.as_str()));
            Ok(())
        }
        Commands::Set {
            path,
            values,
            kind,
            vector,
        } => run_set(&mut store, &path, &values, kind, vector),
        Commands::Show { tier } => {
            match store.settings_string(tier) {
                Some(text) => println!("{text}"),
                None => tracing::info!("No {tier} settings loaded"),
            }
            Ok(())
        }
        Commands::Proxy {
            file,
            prefix,
            record,
        } => run_proxy(&mut store, &file, &prefix, record),
    }
}

fn open_store(cli: &Cli) -> Result<SettingsStore> {
    let defaults = || SettingsLocations::from_env().context("Failed to resolve settings locations");
    let user = match &cli.user_settings {
        Some(path) => path.clone(),
        None => defaults()?.user().to_path_buf(),
    };
    let site = match &cli.site_settings {
        Some(path) => path.clone(),
        None => defaults()?.site().to_path_buf(),
    };

    let locations = SettingsLocations::new(user, site);
    let mut store = SettingsStore::with_locations(locations.clone());
    for tier in SettingsTier::precedence_order() {
        let path = locations.path_for_tier(*tier);
        if !path.exists() {
            tracing::debug!("No {tier} settings at {}", path.display());
            continue;
        }
        store
            .load_settings_from(*tier, path)
            .with_context(|| format!("Failed to load {tier} settings: {}", path.display()))?;
    }
    Ok(store)
}

fn run_get(
    store: &SettingsStore,
    path: &str,
    kind: ValueKind,
    index: Option<usize>,
    vector: bool,
    default: Option<&str>,
) -> Result<()> {
    if vector {
        let values = match kind {
            ValueKind::Int => json!(store.get_vector_setting_as_ints(path)),
            ValueKind::Double => json!(store.get_vector_setting_as_doubles(path)),
            ValueKind::Auto | ValueKind::String => json!(store.get_vector_setting_as_strings(path)),
        };
        println!("{values}");
        return Ok(());
    }

    let output = match (kind, index) {
        (ValueKind::Int, Some(index)) => store
            .get_vector_setting_as_int(path, index, parse_default(default, 0)?)
            .to_string(),
        (ValueKind::Int, None) => store
            .get_scalar_setting_as_int(path, parse_default(default, 0)?)
            .to_string(),
        (ValueKind::Double, Some(index)) => store
            .get_vector_setting_as_double(path, index, parse_default(default, 0.0)?)
            .to_string(),
        (ValueKind::Double, None) => store
            .get_scalar_setting_as_double(path, parse_default(default, 0.0)?)
            .to_string(),
        (ValueKind::Auto | ValueKind::String, Some(index)) => {
            store.get_vector_setting_as_string(path, index, default.unwrap_or_default())
        }
        (ValueKind::Auto | ValueKind::String, None) => {
            store.get_scalar_setting_as_string(path, default.unwrap_or_default())
        }
    };
    println!("{output}");
    Ok(())
}

fn parse_default<T>(default: Option<&str>, fallback: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match default {
        Some(text) => text
            .parse()
            .with_context(|| format!("Invalid default value: {text}")),
        None => Ok(fallback),
    }
}

fn run_set(
    store: &mut SettingsStore,
    path: &str,
    values: &[String],
    kind: ValueKind,
    vector: bool,
) -> Result<()> {
    let parsed = parse_values(values, kind)?;

    if parsed.len() == 1 && !vector {
        store.set_scalar_setting(path, parsed[0].clone());
    } else {
        store.set_vector_setting(path, parsed);
    }

    store
        .save_user_settings()
        .context("Failed to save user settings")?;
    tracing::info!("Updated {path}");
    Ok(())
}

/// Parse command-line values as one element kind. `Auto` picks the
/// narrowest kind every value fits: int, then double, then string.
fn parse_values(values: &[String], kind: ValueKind) -> Result<Vec<Value>> {
    let kind = match kind {
        ValueKind::Auto => infer_kind(values),
        explicit => explicit,
    };
    values.iter().map(|value| parse_value(value, kind)).collect()
}

fn infer_kind(values: &[String]) -> ValueKind {
    if values.iter().all(|value| value.parse::<i64>().is_ok()) {
        ValueKind::Int
    } else if values.iter().all(|value| value.parse::<f64>().is_ok()) {
        ValueKind::Double
    } else {
        ValueKind::String
    }
}

fn parse_value(text: &str, kind: ValueKind) -> Result<Value> {
    let value = match kind {
        ValueKind::Int => Value::from(
            text.parse::<i64>()
                .with_context(|| format!("Not an int: {text}"))?,
        ),
        ValueKind::Double => text
            .parse::<f64>()
            .with_context(|| format!("Not a double: {text}"))?
            .to_setting(),
        ValueKind::Auto | ValueKind::String => Value::from(text),
    };
    Ok(value)
}

fn run_proxy(store: &mut SettingsStore, file: &Path, prefix: &str, record: bool) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read proxy file: {}", file.display()))?;
    let description: ProxyDescription = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse proxy file: {}", file.display()))?;
    let mut proxy = InMemoryProxy::from_description(&description)?;

    if record {
        let written = store.set_proxy_settings(&proxy);
        store
            .save_user_settings()
            .context("Failed to save user settings")?;
        tracing::info!("Recorded {written} properties of {}", description.name);
        return Ok(());
    }

    let report = store.get_proxy_settings_with_prefix(&mut proxy, prefix);
    let skipped: Vec<Value> = report
        .skipped
        .iter()
        .map(|(property, err)| json!({"property": property, "error": err.to_string()}))
        .collect();
    let output = json!({
        "applied": report.applied,
        "skipped": skipped,
        "values": proxy.to_json(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
