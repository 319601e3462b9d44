//! Configuration module
//!
//! Configuration is read once at startup (`.env` file first, then the process
//! environment) into an explicit [`Config`] value. Components receive it by
//! reference; nothing else in the workspace reads environment variables.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

// Common constants
const HTTP_PORT: u16 = 8080;
const MAX_REQUEST_SIZE_MB: usize = 10;
const CLIENT_CACHE_SECS: u64 = 10;
const EMAIL_API_BASE_URL: &str = "https://api.sendgrid.com";
const EMAIL_API_TIMEOUT_SECS: u64 = 10;
const EMAIL_API_MAX_RETRIES: u32 = 0;

/// Server-level settings: listener, static site, middleware.
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub static_path: PathBuf,
    pub debug_level: String,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub max_request_size_bytes: usize,
    pub client_cache_secs: u64,
}

/// Settings for the transactional email API.
#[derive(Clone)]
pub struct EmailApiConfig {
    pub api_key: String,
    pub base_url: String,
    pub from_address: String,
    pub to_address: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl fmt::Debug for EmailApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailApiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("from_address", &self.from_address)
            .field("to_address", &self.to_address)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub upload_path: PathBuf,
    pub email: EmailApiConfig,
}

impl Config {
    /// Load configuration from `.env` (if present) and the process environment.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins: Vec<String> = var("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_request_size_mb = var("MAX_REQUEST_SIZE_MB")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(MAX_REQUEST_SIZE_MB);
        let max_request_size_bytes = max_request_size_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| anyhow::anyhow!("MAX_REQUEST_SIZE_MB is too large"))?;

        let base = BaseConfig {
            server_port: match var("HTTP_PORT").or_else(|| var("PORT")) {
                Some(port) => port
                    .parse()
                    .map_err(|_| anyhow::anyhow!("HTTP_PORT must be a valid number"))?,
                None => HTTP_PORT,
            },
            static_path: var("STATIC_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./static")),
            debug_level: var("DEBUG_LEVEL")
                .unwrap_or_else(|| "info".to_string())
                .to_lowercase(),
            environment,
            cors_origins,
            max_request_size_bytes,
            client_cache_secs: var("CLIENT_CACHE_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(CLIENT_CACHE_SECS),
        };

        let email = EmailApiConfig {
            api_key: var("SENDGRID_API_KEY")
                .ok_or_else(|| anyhow::anyhow!("SENDGRID_API_KEY must be set"))?,
            base_url: var("EMAIL_API_BASE_URL")
                .unwrap_or_else(|| EMAIL_API_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            from_address: var("EMAIL_ADDRESS_FROM")
                .ok_or_else(|| anyhow::anyhow!("EMAIL_ADDRESS_FROM must be set"))?,
            to_address: var("EMAIL_ADDRESS_TO")
                .ok_or_else(|| anyhow::anyhow!("EMAIL_ADDRESS_TO must be set"))?,
            timeout_secs: var("EMAIL_API_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(EMAIL_API_TIMEOUT_SECS),
            max_retries: var("EMAIL_API_MAX_RETRIES")
                .and_then(|s| s.parse().ok())
                .unwrap_or(EMAIL_API_MAX_RETRIES),
        };

        let config = Config {
            base,
            upload_path: var("UPLOAD_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./uploads")),
            email,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.max_request_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_REQUEST_SIZE_MB cannot be 0"));
        }

        if self.email.timeout_secs == 0 {
            return Err(anyhow::anyhow!("EMAIL_API_TIMEOUT_SECS cannot be 0"));
        }

        if !self.email.base_url.starts_with("http://")
            && !self.email.base_url.starts_with("https://")
        {
            return Err(anyhow::anyhow!("EMAIL_API_BASE_URL must be an http(s) URL"));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn static_path(&self) -> &std::path::Path {
        &self.base.static_path
    }

    pub fn upload_path(&self) -> &std::path::Path {
        &self.upload_path
    }

    pub fn debug_level(&self) -> &str {
        &self.base.debug_level
    }

    pub fn environment(&self) -> &str {
        &self.base.environment
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.base.cors_origins
    }

    pub fn max_request_size_bytes(&self) -> usize {
        self.base.max_request_size_bytes
    }

    pub fn client_cache_secs(&self) -> u64 {
        self.base.client_cache_secs
    }

    pub fn email_api_timeout(&self) -> Duration {
        Duration::from_secs(self.email.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("SENDGRID_API_KEY", "SG.test-key"),
        ("EMAIL_ADDRESS_FROM", "site@example.com"),
        ("EMAIL_ADDRESS_TO", "sales@example.com"),
    ];

    #[test]
    fn defaults_apply_when_only_credentials_are_set() {
        let config = Config::from_lookup(lookup(&REQUIRED)).unwrap();
        assert_eq!(config.server_port(), 8080);
        assert_eq!(config.upload_path(), std::path::Path::new("./uploads"));
        assert_eq!(config.max_request_size_bytes(), 10 * 1024 * 1024);
        assert_eq!(config.email.base_url, "https://api.sendgrid.com");
        assert_eq!(config.email_api_timeout(), Duration::from_secs(10));
        assert_eq!(config.email.max_retries, 0);
        assert_eq!(config.cors_origins(), ["*".to_string()]);
        assert!(!config.is_production());
    }

    #[test]
    fn reads_overrides() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("HTTP_PORT", "9000"),
            ("UPLOAD_PATH", "/srv/uploads/"),
            ("STATIC_PATH", "/srv/www"),
            ("DEBUG_LEVEL", "DEBUG"),
            ("EMAIL_API_BASE_URL", "http://127.0.0.1:1234/"),
            ("EMAIL_API_MAX_RETRIES", "2"),
            ("MAX_REQUEST_SIZE_MB", "1"),
            ("CORS_ORIGINS", "https://a.example, https://b.example"),
            ("ENVIRONMENT", "Production"),
        ]);
        let config = Config::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.server_port(), 9000);
        assert_eq!(config.upload_path(), std::path::Path::new("/srv/uploads/"));
        assert_eq!(config.debug_level(), "debug");
        assert_eq!(config.email.base_url, "http://127.0.0.1:1234");
        assert_eq!(config.email.max_retries, 2);
        assert_eq!(config.max_request_size_bytes(), 1024 * 1024);
        assert_eq!(config.cors_origins().len(), 2);
        assert!(config.is_production());
    }

    #[test]
    fn port_falls_back_to_port_variable() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("PORT", "3000"));
        let config = Config::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.server_port(), 3000);
    }

    #[test]
    fn missing_credentials_fail() {
        let err = Config::from_lookup(lookup(&REQUIRED[1..])).unwrap_err();
        assert!(err.to_string().contains("SENDGRID_API_KEY"));

        let err = Config::from_lookup(lookup(&REQUIRED[..2])).unwrap_err();
        assert!(err.to_string().contains("EMAIL_ADDRESS_TO"));
    }

    #[test]
    fn invalid_values_fail_validation() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("HTTP_PORT", "eighty"));
        assert!(Config::from_lookup(lookup(&vars)).is_err());

        let mut vars = REQUIRED.to_vec();
        vars.push(("MAX_REQUEST_SIZE_MB", "0"));
        assert!(Config::from_lookup(lookup(&vars)).is_err());

        let mut vars = REQUIRED.to_vec();
        vars.push(("EMAIL_API_BASE_URL", "api.sendgrid.com"));
        assert!(Config::from_lookup(lookup(&vars)).is_err());
    }

    #[test]
    fn oversized_request_limit_is_rejected() {
        let mut vars = REQUIRED.to_vec();
        // usize::MAX on 64-bit targets
        vars.push(("MAX_REQUEST_SIZE_MB", "18446744073709551615"));

        let err = Config::from_lookup(lookup(&vars)).unwrap_err();
        assert!(err.to_string().contains("MAX_REQUEST_SIZE_MB"));
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = Config::from_lookup(lookup(&REQUIRED)).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("SG.test-key"));
        assert!(rendered.contains("<redacted>"));
    }
}
