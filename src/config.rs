use dotenvy::dotenv;
use std::env;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    // Hosted data / auth service
    pub supabase_url:      String,
    pub supabase_anon_key: String,
    pub http_timeout_secs: u64,

    // Backend
    pub backend_host:      String,
    pub backend_port:      u16,

    // App
    pub site_url:          String,
    pub app_env:           String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup. `from_env` passes the process
    /// environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| -> Result<String, ConfigError> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingVar(key.to_string()))
        };

        let parse_or = |key: &str, default: u64| -> Result<u64, ConfigError> {
            match lookup(key) {
                Some(raw) => raw
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidValue(key.to_string(), raw)),
                None => Ok(default),
            }
        };

        let port = parse_or("BACKEND_PORT", 8080)?;
        let backend_port = u16::try_from(port)
            .map_err(|_| ConfigError::InvalidValue("BACKEND_PORT".into(), port.to_string()))?;

        Ok(Self {
            supabase_url:      require("SUPABASE_URL")?,
            supabase_anon_key: require("SUPABASE_ANON_KEY")?,
            http_timeout_secs: parse_or("HTTP_TIMEOUT_SECS", 10)?,

            backend_host: lookup("BACKEND_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            backend_port,

            site_url: lookup("SITE_URL").unwrap_or_else(|| "http://localhost:3000".into()),
            app_env:  lookup("APP_ENV").unwrap_or_else(|| "development".into()),
        })
    }

    pub fn is_development(&self) -> bool {
        self.app_env == "development"
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
    fn loads_defaults_with_credentials_only() {
        let config = Config::from_lookup(lookup_from(&[
            ("SUPABASE_URL", "https://project.supabase.co"),
            ("SUPABASE_ANON_KEY", "anon"),
        ]))
        .unwrap();

        assert_eq!(config.backend_port, 8080);
        assert_eq!(config.http_timeout_secs, 10);
        assert_eq!(config.site_url, "http://localhost:3000");
        assert!(config.is_development());
    }

    #[test]
    fn missing_url_is_fatal() {
        let err = Config::from_lookup(lookup_from(&[("SUPABASE_ANON_KEY", "anon")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(ref k) if k == "SUPABASE_URL"));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let err = Config::from_lookup(lookup_from(&[
            ("SUPABASE_URL", "https://project.supabase.co"),
            ("SUPABASE_ANON_KEY", "   "),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(ref k) if k == "SUPABASE_ANON_KEY"));
    }

    #[test]
    fn rejects_out_of_range_port() {
        let err = Config::from_lookup(lookup_from(&[
            ("SUPABASE_URL", "https://project.supabase.co"),
            ("SUPABASE_ANON_KEY", "anon"),
            ("BACKEND_PORT", "70000"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref k, _) if k == "BACKEND_PORT"));
    }

    #[test]
    fn production_flag() {
        let config = Config::from_lookup(lookup_from(&[
            ("SUPABASE_URL", "https://project.supabase.co"),
            ("SUPABASE_ANON_KEY", "anon"),
            ("APP_ENV", "production"),
        ]))
        .unwrap();
        assert!(!config.is_development());
    }
}
