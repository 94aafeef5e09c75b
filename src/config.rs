use std::env;

pub const DEFAULT_API_URL: &str = "https://nanobananaapi.ai/api/cartoon";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_PORT: u16 = 3000;

pub const API_KEY_VAR: &str = "NANOBANANA_API_KEY";
pub const API_URL_VAR: &str = "NANOBANANA_API_URL";

#[derive(Debug, Clone, Default)]
pub struct NanoBananaConfig {
    pub api_key: Option<String>,
    pub api_url: Option<String>,
    pub(crate) timeout_secs: Option<u64>,
}

impl NanoBananaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blank values are treated as unset.
    pub fn from_env() -> Self {
        let api_key = non_blank(env::var(API_KEY_VAR).ok());
        let api_url = non_blank(env::var(API_URL_VAR).ok());

        NanoBananaConfig {
            api_key,
            api_url,
            timeout_secs: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = Some(api_url.into());
        self
    }

    /// The 120s timeout is fixed; only tests shorten it.
    #[cfg(test)]
    pub(crate) fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn endpoint(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_deref()
            .map_or(false, |key| !key.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub port: Option<u16>,
    pub nanobanana: NanoBananaConfig,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let port = env::var("PORT").ok().and_then(|port| port.parse().ok());

        Config {
            port,
            nanobanana: NanoBananaConfig::from_env(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_nanobanana(mut self, config: NanoBananaConfig) -> Self {
        self.nanobanana = config;
        self
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NanoBananaConfig::new();
        assert_eq!(config.endpoint(), DEFAULT_API_URL);
        assert_eq!(config.timeout_secs(), 120);
        assert!(!config.has_api_key());
        assert_eq!(Config::new().port(), 3000);
        assert_eq!(NanoBananaConfig::from_env().timeout_secs(), 120);
    }

    #[test]
    fn test_builders_override_defaults() {
        let config = Config::new().with_port(8080).with_nanobanana(
            NanoBananaConfig::new()
                .with_api_key("secret")
                .with_api_url("http://localhost:9000/api/cartoon"),
        );

        assert_eq!(config.port(), 8080);
        assert_eq!(config.nanobanana.endpoint(), "http://localhost:9000/api/cartoon");
        assert!(config.nanobanana.has_api_key());
    }

    #[test]
    fn test_blank_key_is_not_a_key() {
        let config = NanoBananaConfig::new().with_api_key("   ");
        assert!(!config.has_api_key());
        assert_eq!(non_blank(Some("  ".into())), None);
        assert_eq!(non_blank(Some("k".into())), Some("k".to_string()));
    }
}
