//! Listener address and observability switches.
//!
//! - `HOST`: bind address (default `0.0.0.0`)
//! - `PORT`: bind port (default `3000`)
//! - `OBSERVABILITY_ENABLED`: install the Prometheus recorder (default `true`)
//! - `LOG_DIR`: when set, also write JSON logs to a daily rolling file there

use std::env;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub observability_enabled: bool,
    pub log_dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            observability_enabled: true,
            log_dir: None,
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. Unparseable values
    /// fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            host: lookup("HOST")
                .filter(|h| !h.trim().is_empty())
                .unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            observability_enabled: lookup("OBSERVABILITY_ENABLED")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.observability_enabled),
            log_dir: lookup("LOG_DIR").filter(|d| !d.trim().is_empty()),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("OBSERVABILITY_ENABLED", "false"),
            ("LOG_DIR", "/var/log/rollcall"),
        ]));
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert!(!config.observability_enabled);
        assert_eq!(config.log_dir.as_deref(), Some("/var/log/rollcall"));
    }

    #[test]
    fn test_invalid_port_falls_back() {
        let config = ServerConfig::from_lookup(lookup(&[("PORT", "not-a-port")]));
        assert_eq!(config.port, 3000);
    }
}
