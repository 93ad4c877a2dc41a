// Configuration loader
// Flags win over environment variables, which win over the config file

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use super::settings::Settings;
use crate::client::{Validation, REQUEST_TIMEOUT};
use crate::errors::config_parse_error;
use crate::protocol::DeviceConfig;

pub const HOST_ENV_VAR: &str = "CHARACTERWORKS_HOST";
pub const PORT_ENV_VAR: &str = "CHARACTERWORKS_PORT";

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct TargetOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Force schema validation regardless of the config file
    pub validate: bool,
}

/// Everything the CLI needs to make calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub target: DeviceConfig,
    pub validation: Validation,
    pub timeout: Duration,
}

/// `~/.characterworks/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".characterworks").join("config.toml"))
}

/// Read settings from `path`; a missing file yields empty settings
pub fn load_settings(path: &Path) -> Result<Settings> {
    if !path.exists() {
        debug!(path = %path.display(), "No config file");
        return Ok(Settings::default());
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    match toml::from_str(&contents) {
        Ok(settings) => Ok(settings),
        Err(e) => bail!(config_parse_error(&format!("{}: {}", path.display(), e))),
    }
}

/// Merge flags, environment and file settings into a connection target
///
/// `env` looks up an environment variable; it is injected so callers (and
/// tests) control where values come from.
pub fn resolve(
    overrides: &TargetOverrides,
    env: impl Fn(&str) -> Option<String>,
    settings: &Settings,
) -> Result<ResolvedConfig> {
    let env_host = env(HOST_ENV_VAR).filter(|host| !host.trim().is_empty());
    let env_port = match env(PORT_ENV_VAR).filter(|port| !port.trim().is_empty()) {
        Some(raw) => Some(
            raw.trim()
                .parse::<u16>()
                .with_context(|| format!("{} is not a valid port: '{}'", PORT_ENV_VAR, raw))?,
        ),
        None => None,
    };

    let host = overrides
        .host
        .clone()
        .or(env_host)
        .or_else(|| settings.device.host.clone());
    let port = overrides.port.or(env_port).or(settings.device.port);

    let (host, port) = match (host, port) {
        (Some(host), Some(port)) => (host, port),
        (host, port) => {
            let mut missing = Vec::new();
            if host.is_none() {
                missing.push("host");
            }
            if port.is_none() {
                missing.push("port");
            }
            bail!(
                "No CharacterWorks {} configured.\n\n\
                Pass --host/--port, set {}/{}, or add a [device] table to\n\
                ~/.characterworks/config.toml:\n\n\
                \x1b[36m[device]\n\
                host = \"127.0.0.1\"\n\
                port = 7000\x1b[0m",
                missing.join(" or "),
                HOST_ENV_VAR,
                PORT_ENV_VAR
            );
        }
    };

    let validation = if overrides.validate || settings.client.validate_responses {
        Validation::Schema
    } else {
        Validation::Trust
    };

    let timeout = match settings.client.timeout_seconds {
        Some(0) => bail!("timeout_seconds in [client] must be at least 1"),
        Some(seconds) => Duration::from_secs(seconds),
        None => REQUEST_TIMEOUT,
    };

    Ok(ResolvedConfig {
        target: DeviceConfig::new(host, port),
        validation,
        timeout,
    })
}

/// Load the CLI configuration from the process environment and `config_path`
pub fn load_config(
    overrides: &TargetOverrides,
    config_path: Option<&Path>,
) -> Result<ResolvedConfig> {
    let settings = match config_path {
        Some(path) => load_settings(path)?,
        None => match default_config_path() {
            Some(path) => load_settings(&path)?,
            None => Settings::default(),
        },
    };

    resolve(overrides, |key| std::env::var(key).ok(), &settings)
}
