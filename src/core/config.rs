//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.parley/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::responder::DEFAULT_RESPONSE_PREFIX;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ParleyConfig {
    #[serde(default)]
    pub general: GeneralConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub response_delay_ms: Option<u64>,
    pub response_prefix: Option<String>,
    pub greeting: Option<String>,
    pub duplicate_window_ms: Option<u64>,
}

/// Values that came from command-line flags. `None` = flag not given.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub response_delay_ms: Option<u64>,
    pub greeting: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_RESPONSE_DELAY_MS: u64 = 500;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub response_delay: Duration,
    pub response_prefix: String,
    pub greeting: Option<String>,
    /// `None` disables the duplicate-submission guard.
    pub duplicate_window: Option<Duration>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        resolve(&ParleyConfig::default(), &CliOverrides::default())
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.parley/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".parley").join("config.toml"))
}

/// Load config from `~/.parley/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ParleyConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<ParleyConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(ParleyConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(ParleyConfig::default());
    }

    load_config_from(&path)
}

/// Parse a config file at an explicit path.
pub fn load_config_from(path: &Path) -> Result<ParleyConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ParleyConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Parley Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# response_delay_ms = 500                       # Or set PARLEY_RESPONSE_DELAY_MS
# response_prefix = "Thanks! Your message was: "
# greeting = "Hello! Type a message to begin."  # Or set PARLEY_GREETING
# duplicate_window_ms = 0                       # 0 disables the repeat guard
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &ParleyConfig, cli: &CliOverrides) -> ResolvedConfig {
    // Delay: CLI → env → config → default
    let delay_ms = cli
        .response_delay_ms
        .or_else(|| env_u64("PARLEY_RESPONSE_DELAY_MS"))
        .or(config.general.response_delay_ms)
        .unwrap_or(DEFAULT_RESPONSE_DELAY_MS);

    // Greeting: CLI → env → config. Blank means "no greeting".
    let greeting = cli
        .greeting
        .clone()
        .or_else(|| std::env::var("PARLEY_GREETING").ok())
        .or_else(|| config.general.greeting.clone())
        .filter(|g| !g.trim().is_empty());

    let duplicate_window = config
        .general
        .duplicate_window_ms
        .filter(|&ms| ms > 0)
        .map(Duration::from_millis);

    ResolvedConfig {
        response_delay: Duration::from_millis(delay_ms),
        response_prefix: config
            .general
            .response_prefix
            .clone()
            .unwrap_or_else(|| DEFAULT_RESPONSE_PREFIX.to_string()),
        greeting,
        duplicate_window,
    }
}

fn env_u64(key: &str) -> Option<u64> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring {}={:?}: {}", key, raw, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = ParleyConfig::default();
        assert!(config.general.response_delay_ms.is_none());
        assert!(config.general.greeting.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = ResolvedConfig::default();
        assert_eq!(
            resolved.response_delay,
            Duration::from_millis(DEFAULT_RESPONSE_DELAY_MS)
        );
        assert_eq!(resolved.response_prefix, "Thanks! Your message was: ");
        assert!(resolved.duplicate_window.is_none());
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = ParleyConfig {
            general: GeneralConfig {
                response_delay_ms: Some(1200),
                response_prefix: Some("Echo: ".to_string()),
                greeting: None,
                duplicate_window_ms: Some(800),
            },
        };
        let resolved = resolve(&config, &CliOverrides::default());
        assert_eq!(resolved.response_delay, Duration::from_millis(1200));
        assert_eq!(resolved.response_prefix, "Echo: ");
        assert_eq!(resolved.duplicate_window, Some(Duration::from_millis(800)));
    }

    #[test]
    fn test_resolve_cli_delay_wins() {
        let config = ParleyConfig {
            general: GeneralConfig {
                response_delay_ms: Some(1200),
                ..Default::default()
            },
        };
        let cli = CliOverrides {
            response_delay_ms: Some(50),
            ..Default::default()
        };
        let resolved = resolve(&config, &cli);
        assert_eq!(resolved.response_delay, Duration::from_millis(50));
    }

    #[test]
    fn test_blank_greeting_is_dropped() {
        let cli = CliOverrides {
            greeting: Some("   ".to_string()),
            ..Default::default()
        };
        let resolved = resolve(&ParleyConfig::default(), &cli);
        assert!(resolved.greeting.is_none());
    }

    #[test]
    fn test_zero_duplicate_window_disables_guard() {
        let config = ParleyConfig {
            general: GeneralConfig {
                duplicate_window_ms: Some(0),
                ..Default::default()
            },
        };
        let resolved = resolve(&config, &CliOverrides::default());
        assert!(resolved.duplicate_window.is_none());
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r#"
[general]
response_delay_ms = 250
response_prefix = "Got it: "
greeting = "Welcome!"
duplicate_window_ms = 800
"#;
        let config: ParleyConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.response_delay_ms, Some(250));
        assert_eq!(config.general.response_prefix.as_deref(), Some("Got it: "));
        assert_eq!(config.general.greeting.as_deref(), Some("Welcome!"));
        assert_eq!(config.general.duplicate_window_ms, Some(800));
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing, everything else stays default
        let toml_str = r#"
[general]
greeting = "Hi"
"#;
        let config: ParleyConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.greeting.as_deref(), Some("Hi"));
        assert!(config.general.response_delay_ms.is_none());
        assert!(config.general.response_prefix.is_none());
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let path = std::env::temp_dir().join(format!(
            "parley-config-test-{}.toml",
            std::process::id()
        ));
        fs::write(&path, "[general\nresponse_delay_ms = ").unwrap();
        let result = load_config_from(&path);
        let _ = fs::remove_file(&path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
