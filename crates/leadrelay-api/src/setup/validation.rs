//! Configuration validation
//!
//! Validates critical configuration values at startup to catch misconfigurations early.

use anyhow::Result;
use leadrelay_core::Config;

/// Validate critical configuration values
///
/// Re-runs the value checks of [`Config::validate`] and adds the checks that
/// only matter once the server is about to start.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if config.is_production() && config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!(
            "CORS allows all origins (*) in production - set CORS_ORIGINS to restrict the form to your site"
        );
    }

    if !config.static_path().is_dir() {
        tracing::warn!(
            static_path = %config.static_path().display(),
            "Static directory does not exist - every non-API route will return 404"
        );
    }

    if config.upload_path().exists() && !config.upload_path().is_dir() {
        return Err(anyhow::anyhow!(
            "UPLOAD_PATH {} exists but is not a directory",
            config.upload_path().display()
        ));
    }

    tracing::info!("Configuration validation passed");
    Ok(())
}
