//! Server configuration from the process environment.

use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, bail};
use spritsit_core::{DEFAULT_MAX_WORD_LEN, DEFAULT_REMOTE_API_URL, RemoteConfig, SpritsitConfig};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TOKEN_MAX_AGE_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Prefix every request token must start with.
    pub read_api_token: String,
    /// How far a token timestamp may drift from now, either way.
    pub token_max_age: Duration,
    pub max_word_len: usize,
    pub debug: bool,
    pub remote: Option<RemoteConfig>,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let Some(read_api_token) = get("READ_API_TOKEN") else {
            bail!("READ_API_TOKEN must be set");
        };

        let remote = get("READABILITY_API_KEY").map(|token| {
            let api_url = get("READABILITY_API_URL").unwrap_or_else(|| DEFAULT_REMOTE_API_URL.to_string());
            RemoteConfig::new(api_url, token)
        });

        Ok(Self {
            port: parse_var(&get, "PORT", DEFAULT_PORT)?,
            read_api_token,
            token_max_age: Duration::from_secs(parse_var(&get, "TOKEN_MAX_AGE_SECS", DEFAULT_TOKEN_MAX_AGE_SECS)?),
            max_word_len: parse_var(&get, "MAX_WORD_LEN", DEFAULT_MAX_WORD_LEN)?,
            debug: get("APP_DEBUG").is_some_and(|v| !matches!(v.to_lowercase().as_str(), "0" | "false" | "no")),
            remote,
        })
    }

    /// Pipeline configuration derived from this server configuration.
    pub fn pipeline(&self) -> SpritsitConfig {
        let builder = SpritsitConfig::builder().max_word_len(self.max_word_len);
        match &self.remote {
            Some(remote) => builder.remote(remote.clone()).build(),
            None => builder.build(),
        }
    }
}

fn parse_var<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(value) => value.trim().parse().with_context(|| format!("{key} has an invalid value {value:?}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[("READ_API_TOKEN", "abc")])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.read_api_token, "abc");
        assert_eq!(config.token_max_age, Duration::from_secs(86_400));
        assert_eq!(config.max_word_len, 24);
        assert!(!config.debug);
        assert!(config.remote.is_none());
    }

    #[test]
    fn test_token_is_mandatory() {
        let err = ServerConfig::from_lookup(lookup(&[("PORT", "9000")])).unwrap_err();
        assert!(err.to_string().contains("READ_API_TOKEN"));
    }

    #[test]
    fn test_remote_config() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("READ_API_TOKEN", "abc"),
            ("READABILITY_API_KEY", "key"),
            ("APP_DEBUG", "1"),
            ("MAX_WORD_LEN", "30"),
        ]))
        .unwrap();

        let remote = config.remote.clone().unwrap();
        assert_eq!(remote.api_url, DEFAULT_REMOTE_API_URL);
        assert_eq!(remote.token, "key");
        assert!(config.debug);
        assert_eq!(config.pipeline().max_word_len, 30);
        assert!(config.pipeline().remote.is_some());
    }

    #[test]
    fn test_malformed_number_names_variable() {
        let err = ServerConfig::from_lookup(lookup(&[("READ_API_TOKEN", "abc"), ("PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
