//! Server configuration from environment variables.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use flashcard_core::DpiBounds;

/// Runtime configuration. Every field has a default.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Path to libpdfium; the system library is used when unset.
    pub pdfium_lib_path: Option<PathBuf>,
    pub max_upload_bytes: usize,
    /// Number of rendered cards kept in memory.
    pub render_cache_capacity: usize,
    pub session_ttl: Duration,
    pub dpi: DpiBounds,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            pdfium_lib_path: None,
            max_upload_bytes: 50 * 1024 * 1024,
            render_cache_capacity: 256,
            session_ttl: Duration::from_secs(12 * 60 * 60),
            dpi: DpiBounds::default(),
        }
    }
}

impl Config {
    /// Read configuration from the environment.
    ///
    /// Recognized variables:
    /// - HOST, PORT: listen address
    /// - PDFIUM_LIB_PATH: explicit pdfium shared library
    /// - MAX_UPLOAD_BYTES: upload size limit
    /// - RENDER_CACHE_CAPACITY: cached card count
    /// - SESSION_TTL_SECS: idle time before a session is dropped
    /// - DPI_MIN, DPI_MAX, DPI_STEP, DPI_DEFAULT: resolution slider bounds
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let defaults_dpi = defaults.dpi;

        let dpi = DpiBounds::new(
            parse_or(&lookup, "DPI_MIN", defaults_dpi.min),
            parse_or(&lookup, "DPI_MAX", defaults_dpi.max),
            parse_or(&lookup, "DPI_STEP", defaults_dpi.step),
            parse_or(&lookup, "DPI_DEFAULT", defaults_dpi.default),
        );

        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port),
            pdfium_lib_path: lookup("PDFIUM_LIB_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", defaults.max_upload_bytes),
            render_cache_capacity: parse_or(
                &lookup,
                "RENDER_CACHE_CAPACITY",
                defaults.render_cache_capacity,
            )
            .max(1),
            session_ttl: Duration::from_secs(parse_or(
                &lookup,
                "SESSION_TTL_SECS",
                defaults.session_ttl.as_secs(),
            )),
            dpi,
        }
    }

    /// Listen address as `host:port`.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy + std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid {} value {:?}, using default {}", key, raw, default);
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup_from(&[]));
        assert_eq!(config.addr(), "0.0.0.0:3000");
        assert_eq!(config.pdfium_lib_path, None);
        assert_eq!(config.render_cache_capacity, 256);
        assert_eq!(config.dpi, DpiBounds::default());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("PDFIUM_LIB_PATH", "/opt/pdfium/libpdfium.so"),
            ("SESSION_TTL_SECS", "60"),
            ("DPI_DEFAULT", "240"),
        ]));
        assert_eq!(config.addr(), "127.0.0.1:8080");
        assert_eq!(
            config.pdfium_lib_path,
            Some(PathBuf::from("/opt/pdfium/libpdfium.so"))
        );
        assert_eq!(config.session_ttl, Duration::from_secs(60));
        assert_eq!(config.dpi.default, 240);
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "not-a-port"),
            ("RENDER_CACHE_CAPACITY", "0"),
        ]));
        assert_eq!(config.port, 3000);
        assert_eq!(config.render_cache_capacity, 1);
    }
}
