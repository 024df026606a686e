use std::env;

const DEFAULT_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn from_env() -> Self {
        Self::from_origins(
            &env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| DEFAULT_ORIGINS.to_string()),
        )
    }

    /// Parses a comma-separated origin list, skipping blank entries.
    pub fn from_origins(raw: &str) -> Self {
        let allowed_origins = raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self { allowed_origins }
    }

    pub fn allows_any(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self::from_origins(DEFAULT_ORIGINS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origins_are_trimmed_and_blank_entries_dropped() {
        let config = CorsConfig::from_origins(" http://a.test , ,http://b.test,");
        assert_eq!(
            config.allowed_origins,
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
        assert!(!config.allows_any());
    }

    #[test]
    fn test_wildcard() {
        assert!(CorsConfig::from_origins("*").allows_any());
    }

    #[test]
    fn test_default_origins() {
        assert_eq!(CorsConfig::default().allowed_origins.len(), 2);
    }
}
