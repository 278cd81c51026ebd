use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
use samaritan_core::Tables;

/// Where records live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// In-process store; contents vanish on exit.
    Memory,
    Sqlite { path: PathBuf, busy_timeout: Duration },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub backend: StoreBackend,
    pub tables: Tables,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str, default: &str| var(key).unwrap_or_else(|| default.into());

        let host = get("SAMARITAN_HOST", "0.0.0.0");
        let port: u16 = get("SAMARITAN_PORT", "3000")
            .parse()
            .context("SAMARITAN_PORT")?;
        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", host, port))?;

        let backend = match get("SAMARITAN_ENV", "local").as_str() {
            "local" => StoreBackend::Memory,
            "deployed" => {
                let busy_ms: u64 = get("SAMARITAN_DB_BUSY_TIMEOUT_MS", "5000")
                    .parse()
                    .context("SAMARITAN_DB_BUSY_TIMEOUT_MS")?;
                StoreBackend::Sqlite {
                    path: PathBuf::from(get("SAMARITAN_DB_PATH", "samaritan.db")),
                    busy_timeout: Duration::from_millis(busy_ms),
                }
            }
            other => bail!("SAMARITAN_ENV must be `local` or `deployed`, got `{}`", other),
        };

        let defaults = Tables::default();
        let tables = Tables {
            users: get("USERS_TABLE", &defaults.users),
            issues: get("ISSUES_TABLE", &defaults.issues),
            posts: get("POSTS_TABLE", &defaults.posts),
            user_emails: get("USER_EMAILS_TABLE", &defaults.user_emails),
        };

        let timeout_secs: u64 = get("SAMARITAN_REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .context("SAMARITAN_REQUEST_TIMEOUT_SECS")?;

        Ok(Self {
            addr,
            backend,
            tables,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_to_local_memory_store() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.addr, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(cfg.backend, StoreBackend::Memory);
        assert_eq!(cfg.tables, Tables::default());
        assert_eq!(cfg.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn deployed_uses_sqlite_and_table_overrides() {
        let cfg = config(&[
            ("SAMARITAN_ENV", "deployed"),
            ("SAMARITAN_DB_PATH", "/var/lib/samaritan.db"),
            ("SAMARITAN_DB_BUSY_TIMEOUT_MS", "250"),
            ("ISSUES_TABLE", "prod-issues"),
            ("SAMARITAN_PORT", "8080"),
        ])
        .unwrap();
        assert_eq!(
            cfg.backend,
            StoreBackend::Sqlite {
                path: PathBuf::from("/var/lib/samaritan.db"),
                busy_timeout: Duration::from_millis(250),
            }
        );
        assert_eq!(cfg.tables.issues, "prod-issues");
        assert_eq!(cfg.tables.users, "users");
        assert_eq!(cfg.addr.port(), 8080);
    }

    #[test]
    fn rejects_unknown_environment_and_bad_numbers() {
        assert!(config(&[("SAMARITAN_ENV", "staging")]).is_err());
        assert!(config(&[("SAMARITAN_PORT", "http")]).is_err());
        assert!(config(&[("SAMARITAN_REQUEST_TIMEOUT_SECS", "-1")]).is_err());
    }
}
