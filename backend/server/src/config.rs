use std::{env, fmt::Display, fs::read_to_string, str::FromStr};

use anyhow::{Result, anyhow};
use tracing::{info, warn};

const SECRETS_DIR: &str = "/run/secrets";

pub struct Config {
    pub port: u16,
    /// Redis connection string. `None` runs the server on the in-memory store.
    pub db_url: Option<String>,
    pub cors_origin: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok(), read_secret)
    }

    /// Builds the config from arbitrary sources so tests never touch the process environment.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        secret: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        Ok(Self {
            port: try_load(&lookup, "PORT", "3000")?,
            db_url: lookup("DB_URL").or_else(|| {
                info!("DB_URL not set, trying {SECRETS_DIR}/DB_URL");
                secret("DB_URL")
            }),
            cors_origin: try_load(&lookup, "CORS_ORIGIN", "http://localhost:5173")?,
        })
    }
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T>
where
    T::Err: Display,
{
    lookup(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| anyhow!("Invalid {key} value: {e}"))
}

fn read_secret(secret_name: &str) -> Option<String> {
    let path = format!("{SECRETS_DIR}/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            warn!("Failed to read {secret_name} from file: {e}");
        })
        .ok()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::Config;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[]), |_| None).unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.db_url, None);
        assert_eq!(config.cors_origin, "http://localhost:5173");
    }

    #[test]
    fn test_environment_overrides() {
        let config = Config::from_lookup(
            lookup(&[
                ("PORT", "8080"),
                ("DB_URL", "redis://cache:6379"),
                ("CORS_ORIGIN", "https://give.example"),
            ]),
            |_| None,
        )
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.db_url.as_deref(), Some("redis://cache:6379"));
        assert_eq!(config.cors_origin, "https://give.example");
    }

    #[test]
    fn test_secret_fallback() {
        let config =
            Config::from_lookup(lookup(&[]), |_| Some("redis://secret:6379".to_string())).unwrap();

        assert_eq!(config.db_url.as_deref(), Some("redis://secret:6379"));
    }

    #[test]
    fn test_invalid_port() {
        let result = Config::from_lookup(lookup(&[("PORT", "not-a-port")]), |_| None);

        assert!(result.is_err());
    }
}
