//! Configuration module for the CMS backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default admin password, matching the one documented on the login page.
/// Startup logs a warning while it is still in use.
pub const DEFAULT_ADMIN_PASSWORD: &str = "changeme123";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Admin username accepted by the login endpoint
    pub admin_username: String,
    /// Admin password accepted by the login endpoint
    pub admin_password: String,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Session lifetime in seconds
    pub session_ttl_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let admin_username = env::var("CMS_ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());

        let admin_password =
            env::var("CMS_ADMIN_PASSWORD").unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.to_string());

        let db_path = env::var("CMS_DB_PATH")
            .unwrap_or_else(|_| "./data/cms.sqlite".to_string())
            .into();

        let bind_addr = env::var("CMS_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid CMS_BIND_ADDR format");

        let log_level = env::var("CMS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let session_ttl_secs = env::var("CMS_SESSION_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(86400);

        Self {
            admin_username,
            admin_password,
            db_path,
            bind_addr,
            log_level,
            session_ttl_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CMS_VARS: &[&str] = &[
        "CMS_ADMIN_USERNAME",
        "CMS_ADMIN_PASSWORD",
        "CMS_DB_PATH",
        "CMS_BIND_ADDR",
        "CMS_LOG_LEVEL",
        "CMS_SESSION_TTL_SECS",
    ];

    /// Clears the CMS env vars for the duration of a test and restores the
    /// previous values on drop, so the process environment is left as found.
    struct EnvGuard {
        saved: Vec<(&'static str, Option<String>)>,
    }

    impl EnvGuard {
        fn clear() -> Self {
            let saved = CMS_VARS.iter().map(|k| (*k, env::var(k).ok())).collect();
            for key in CMS_VARS {
                env::remove_var(key);
            }
            Self { saved }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, value) in &self.saved {
                match value {
                    Some(value) => env::set_var(key, value),
                    None => env::remove_var(key),
                }
            }
        }
    }

    #[test]
    fn test_default_config() {
        let _guard = EnvGuard::clear();

        // A stray .env file would repopulate the cleared vars through
        // dotenvy and break the defaults below
        assert!(
            !std::path::Path::new(".env").exists(),
            "remove ./.env before running the config tests"
        );

        let config = Config::from_env();

        assert_eq!(config.admin_username, "admin");
        assert_eq!(config.admin_password, DEFAULT_ADMIN_PASSWORD);
        assert_eq!(config.db_path, PathBuf::from("./data/cms.sqlite"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.session_ttl_secs, 86400);
    }
}
