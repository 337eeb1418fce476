//! Application configuration.

use std::{env, path::PathBuf};

use entities::DEFAULT_LOAN_LIMIT_DAYS;

/// Configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Catalog display name.
    pub library_name: String,
    /// Loan period applied to new loans.
    pub loan_limit_days: u32,
    /// Where the catalog snapshot is read from and written to.
    pub snapshot_path: Option<PathBuf>,
    /// Whether to seed the demo catalog when no snapshot was restored.
    pub seed_demo: bool,
    /// Log level.
    pub log_level: String,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let loan_limit_days = match lookup("CIRCULATION_LOAN_LIMIT_DAYS") {
            Some(raw) => raw.parse::<u32>().map_err(|e| {
                anyhow::anyhow!("CIRCULATION_LOAN_LIMIT_DAYS must be a positive integer: {e}")
            })?,
            None => DEFAULT_LOAN_LIMIT_DAYS,
        };
        if loan_limit_days == 0 {
            anyhow::bail!("CIRCULATION_LOAN_LIMIT_DAYS must be greater than 0");
        }

        Ok(Self {
            library_name: lookup("CIRCULATION_LIBRARY_NAME")
                .unwrap_or_else(|| "Central Library".to_string()),
            loan_limit_days,
            snapshot_path: lookup("CIRCULATION_SNAPSHOT_PATH")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            seed_demo: lookup("CIRCULATION_SEED_DEMO")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(true),
            log_level: lookup("CIRCULATION_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.library_name, "Central Library");
        assert_eq!(config.loan_limit_days, 14);
        assert!(config.snapshot_path.is_none());
        assert!(config.seed_demo);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("CIRCULATION_LIBRARY_NAME", "Branch"),
            ("CIRCULATION_LOAN_LIMIT_DAYS", "21"),
            ("CIRCULATION_SNAPSHOT_PATH", "/tmp/catalog.json"),
            ("CIRCULATION_SEED_DEMO", "false"),
        ]))
        .unwrap();
        assert_eq!(config.library_name, "Branch");
        assert_eq!(config.loan_limit_days, 21);
        assert_eq!(config.snapshot_path, Some(PathBuf::from("/tmp/catalog.json")));
        assert!(!config.seed_demo);
    }

    #[test]
    fn test_invalid_loan_limit() {
        assert!(Config::from_lookup(lookup(&[("CIRCULATION_LOAN_LIMIT_DAYS", "0")])).is_err());
        assert!(Config::from_lookup(lookup(&[("CIRCULATION_LOAN_LIMIT_DAYS", "two")])).is_err());
    }
}
