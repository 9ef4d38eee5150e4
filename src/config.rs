use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::AuditError;

pub const STORE_VAR: &str = "CARBON_AUDIT_STORE";
pub const DECIMALS_VAR: &str = "CARBON_AUDIT_DECIMALS";
pub const LOG_JSON_VAR: &str = "CARBON_AUDIT_LOG_JSON";

const MAX_DECIMALS: usize = 9;

/// Runtime settings for the `carbon-audit` binary.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub store_path: PathBuf,
    /// Decimal places for tonne figures in summaries.
    pub decimals: usize,
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("carbon-audit-store.json"),
            decimals: 3,
            log_json: false,
        }
    }
}

impl Config {
    /// Read from the process environment.
    pub fn load() -> Result<Self, AuditError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read through an arbitrary lookup, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AuditError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let store_path = lookup(STORE_VAR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.store_path);
        let decimals: usize = try_load(&lookup, DECIMALS_VAR, defaults.decimals)?;
        if decimals > MAX_DECIMALS {
            return Err(AuditError::Config(format!(
                "{DECIMALS_VAR} must be at most {MAX_DECIMALS}, got {decimals}"
            )));
        }
        let log_json = match lookup(LOG_JSON_VAR) {
            None => defaults.log_json,
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                AuditError::Config(format!("{LOG_JSON_VAR} is not a boolean: {raw}"))
            })?,
        };
        Ok(Self {
            store_path,
            decimals,
            log_json,
        })
    }
}

fn try_load<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AuditError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
        Some(raw) => raw.trim().parse().map_err(|e| {
            warn!("Invalid {key} value: {e}");
            AuditError::Config(format!("invalid {key} value {raw:?}: {e}"))
        }),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim() {
        "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
        "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
        _ => None,
    }
}

/// Install the global subscriber. `RUST_LOG` controls the filter.
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing(json: bool) -> Result<(), AuditError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| AuditError::Config(format!("tracing subscriber: {e}")))
}
