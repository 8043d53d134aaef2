// src/config.rs
use std::{env, fmt::Display, net::SocketAddr, str::FromStr, time::Duration};

use thiserror::Error;
use tracing::{info, warn};

use crate::notify::{NotifyConfig, RelayCredentials};

#[derive(Debug, Error)]
#[error("invalid value for {key}: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: String,
    pub bind_addr: SocketAddr,
    pub max_workers: usize,
    pub api_base_url: String,
    pub api_timeout: Duration,
    pub relay: RelayCredentials,
    pub notify: NotifyConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Unset keys fall back to logged defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &'static str, default: &str| -> String {
            match lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
                Some(v) => v,
                None => {
                    info!("{key} not set, using default: {default}");
                    default.to_string()
                }
            }
        };

        let timeout_secs: u64 = parse("API_TIMEOUT_SECS", &get("API_TIMEOUT_SECS", "60"))?;
        let max_workers: usize = parse("APP_MAX_WORKERS", &get("APP_MAX_WORKERS", "8"))?;
        if max_workers == 0 {
            return Err(ConfigError {
                key: "APP_MAX_WORKERS",
                reason: "must be at least 1".into(),
            });
        }

        let relay = RelayCredentials {
            service_id: get("EMAILJS_SERVICE_ID", "demo_service"),
            public_key: get("EMAILJS_PUBLIC_KEY", crate::notify::relay::SENTINEL_PUBLIC_KEY),
        };
        if relay.public_key == crate::notify::relay::SENTINEL_PUBLIC_KEY {
            warn!("EMAILJS_PUBLIC_KEY is the demo key, notifications will only be logged");
        }

        Ok(Self {
            db_path: get("APP_DB_PATH", "listings.sqlite3"),
            bind_addr: parse("APP_BIND_ADDR", &get("APP_BIND_ADDR", "127.0.0.1:3000"))?,
            max_workers,
            api_base_url: get("API_BASE_URL", "http://localhost:8080/api"),
            api_timeout: Duration::from_secs(timeout_secs),
            relay,
            notify: NotifyConfig {
                admin_email: get("ADMIN_EMAIL", "admin@example.com"),
                admin_template_id: get("EMAILJS_ADMIN_TEMPLATE", "demo_template"),
                user_template_id: get("EMAILJS_USER_TEMPLATE", "demo_template"),
                company_name: get("COMPANY_NAME", "Clement Regency Developers"),
                company_phone: get("COMPANY_PHONE", "+91 98765 43210"),
                company_email: get("COMPANY_EMAIL", "info@clementregency.com"),
            },
        })
    }
}

fn parse<T: FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    raw.parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError {
            key,
            reason: e.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = load(&[]).unwrap();
        assert_eq!(cfg.db_path, "listings.sqlite3");
        assert_eq!(cfg.bind_addr.to_string(), "127.0.0.1:3000");
        assert_eq!(cfg.max_workers, 8);
        assert_eq!(cfg.api_timeout, Duration::from_secs(60));
        assert_eq!(cfg.relay.public_key, "demo_key");
        assert_eq!(cfg.notify.admin_email, "admin@example.com");
    }

    #[test]
    fn overrides_and_blank_values() {
        let cfg = load(&[
            ("API_BASE_URL", "https://api.example.com/api"),
            ("API_TIMEOUT_SECS", "5"),
            ("ADMIN_EMAIL", "  "),
        ])
        .unwrap();
        assert_eq!(cfg.api_base_url, "https://api.example.com/api");
        assert_eq!(cfg.api_timeout, Duration::from_secs(5));
        assert_eq!(cfg.notify.admin_email, "admin@example.com");
    }

    #[test]
    fn bad_numbers_are_errors() {
        let err = load(&[("APP_MAX_WORKERS", "many")]).unwrap_err();
        assert_eq!(err.key, "APP_MAX_WORKERS");
        assert!(load(&[("APP_MAX_WORKERS", "0")]).is_err());
        assert!(load(&[("APP_BIND_ADDR", "localhost")]).is_err());
    }
}
