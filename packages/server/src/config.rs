use anyhow::{Context, Result};
use dotenvy::dotenv;
use post_extraction::{ExtractorConfig, DEFAULT_MAX_BODY_CHARS};
use sheet_sync::{SyncConfig, SyncPolicy};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub service_account_file: PathBuf,
    pub destination_tab: String,
    pub sync_policy: SyncPolicy,
    pub max_body_chars: usize,
    pub fetch_timeout: Duration,
    pub store_timeout: Duration,
    pub request_timeout: Duration,
    pub tab_initial_rows: usize,
    pub tab_initial_cols: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            port: parse_var(&lookup, "PORT", 5000)?,
            service_account_file: lookup("GOOGLE_SERVICE_ACCOUNT_FILE")
                .unwrap_or_else(|| "service.json".to_string())
                .into(),
            destination_tab: lookup("DESTINATION_TAB")
                .map(|tab| tab.trim().to_string())
                .filter(|tab| !tab.is_empty())
                .unwrap_or_else(|| sheet_sync::sync::DEFAULT_TAB_NAME.to_string()),
            sync_policy: parse_var(&lookup, "SYNC_POLICY", SyncPolicy::default())?,
            max_body_chars: parse_var(&lookup, "MAX_BODY_CHARS", DEFAULT_MAX_BODY_CHARS)?,
            fetch_timeout: Duration::from_secs(parse_var(&lookup, "FETCH_TIMEOUT_SECS", 30)?),
            store_timeout: Duration::from_secs(parse_var(&lookup, "STORE_TIMEOUT_SECS", 30)?),
            request_timeout: Duration::from_secs(parse_var(&lookup, "REQUEST_TIMEOUT_SECS", 120)?),
            tab_initial_rows: parse_var(
                &lookup,
                "TAB_INITIAL_ROWS",
                sheet_sync::sync::DEFAULT_INITIAL_ROWS,
            )?,
            tab_initial_cols: parse_var(
                &lookup,
                "TAB_INITIAL_COLS",
                sheet_sync::sync::DEFAULT_INITIAL_COLS,
            )?,
        })
    }

    pub fn extractor_config(&self) -> ExtractorConfig {
        ExtractorConfig::default().with_max_body_chars(self.max_body_chars)
    }

    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig::default()
            .with_tab_name(self.destination_tab.clone())
            .with_policy(self.sync_policy)
            .with_initial_size(self.tab_initial_rows, self.tab_initial_cols)
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();

        assert_eq!(config.port, 5000);
        assert_eq!(config.service_account_file, PathBuf::from("service.json"));
        assert_eq!(config.destination_tab, "Source");
        assert_eq!(config.sync_policy, SyncPolicy::ClearAndRewrite);
        assert_eq!(config.max_body_chars, 2000);
        assert_eq!(config.fetch_timeout, Duration::from_secs(30));
        assert_eq!(config.store_timeout, Duration::from_secs(30));
        assert_eq!(config.request_timeout, Duration::from_secs(120));
        assert_eq!((config.tab_initial_rows, config.tab_initial_cols), (1000, 10));
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("PORT", "8080"),
            ("DESTINATION_TAB", "Posts"),
            ("SYNC_POLICY", "append"),
            ("MAX_BODY_CHARS", "500"),
            ("FETCH_TIMEOUT_SECS", "10"),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.sync_policy, SyncPolicy::AppendPreserving);
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));

        let sync = config.sync_config();
        assert_eq!(sync.tab_name, "Posts");
        assert_eq!(sync.policy, SyncPolicy::AppendPreserving);
        assert_eq!(config.extractor_config().max_body_chars, 500);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(config(&[("PORT", "eighty")]).is_err());
        assert!(config(&[("SYNC_POLICY", "merge")]).is_err());
        assert!(config(&[("MAX_BODY_CHARS", "-1")]).is_err());
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = config(&[("PORT", " "), ("DESTINATION_TAB", "  ")]).unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.destination_tab, "Source");
    }
}
