//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// Viewport width (px) below which the sidebar moves into a slide-over panel.
pub const DEFAULT_MOBILE_BREAKPOINT: u32 = 768;

/// Service configuration, built from `COMPLIANCE_DESK_*` environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port the HTTP server binds on.
    pub port: u16,
    /// Viewport width at which the sidebar switches from slide-over to inline.
    pub mobile_breakpoint: u32,
    /// Simulated latency of the mock "complete onboarding" call.
    pub completion_delay: Duration,
    /// When set, the mock completion collaborator rejects every submission.
    pub fail_completions: bool,
    /// Directory for rolling log files (stderr only when unset).
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            mobile_breakpoint: DEFAULT_MOBILE_BREAKPOINT,
            completion_delay: Duration::from_millis(800),
            fail_completions: false,
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Build config from environment variables, falling back to defaults.
    ///
    /// Unset variables take the default; set-but-malformed ones are an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup. Used by `from_env` and tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = parse_var(&lookup, "COMPLIANCE_DESK_PORT")?.unwrap_or(defaults.port);
        let mobile_breakpoint = parse_var(&lookup, "COMPLIANCE_DESK_MOBILE_BREAKPOINT")?
            .unwrap_or(defaults.mobile_breakpoint);
        let completion_delay = parse_var::<u64, _>(&lookup, "COMPLIANCE_DESK_COMPLETION_DELAY_MS")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.completion_delay);
        let fail_completions = parse_var(&lookup, "COMPLIANCE_DESK_FAIL_COMPLETIONS")?
            .unwrap_or(defaults.fail_completions);
        let log_dir = lookup("COMPLIANCE_DESK_LOG_DIR")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        if mobile_breakpoint == 0 {
            return Err(ConfigError::InvalidValue {
                key: "COMPLIANCE_DESK_MOBILE_BREAKPOINT".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            port,
            mobile_breakpoint,
            completion_delay,
            fail_completions,
            log_dir,
        })
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("{raw:?}: {e}"),
            }),
    }
}
