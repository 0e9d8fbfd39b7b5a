//! Typeface cache configuration
//!
//! The idle window defaults to 60 seconds. Set `FONTBIND_TYPEFACE_IDLE_MS`
//! to override it at startup:
//!
//! ```bash
//! FONTBIND_TYPEFACE_IDLE_MS=300000 ./my_app
//! ```

use std::time::Duration;

/// Environment variable holding the idle window in milliseconds
pub const IDLE_TIMEOUT_ENV: &str = "FONTBIND_TYPEFACE_IDLE_MS";

/// How long an unused typeface stays cached
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// Settings for the typeface cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypefaceCacheConfig {
    pub idle_timeout: Duration,
}

impl TypefaceCacheConfig {
    pub fn new(idle_timeout: Duration) -> Self {
        Self { idle_timeout }
    }

    /// Defaults, overridden by `FONTBIND_TYPEFACE_IDLE_MS` when it parses
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var(IDLE_TIMEOUT_ENV).ok().as_deref())
    }

    fn from_env_value(value: Option<&str>) -> Self {
        let Some(raw) = value else {
            return Self::default();
        };

        match raw.trim().parse::<u64>() {
            Ok(ms) if ms > 0 => {
                log::info!("Typeface cache idle timeout set to {}ms via {}", ms, IDLE_TIMEOUT_ENV);
                Self::new(Duration::from_millis(ms))
            }
            _ => {
                log::warn!(
                    "Ignoring {}={:?}: expected a positive number of milliseconds",
                    IDLE_TIMEOUT_ENV,
                    raw
                );
                Self::default()
            }
        }
    }
}

impl Default for TypefaceCacheConfig {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_TIMEOUT)
    }
}
