mod types;

pub use types::*;

use anyhow::{Context, Result};
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Url;
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./config.toml",
        "./mpd2hls.toml",
        "~/.config/mpd2hls/config.toml",
        "/etc/mpd2hls/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    // Return default config if no file found
    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    // Validate server config
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    // Validate upstream endpoints
    validate_url("upstream.manifest_url", &config.upstream.manifest_url)?;
    match &config.keys {
        KeysConfig::Hex { url } => validate_url("keys.url", url)?,
        KeysConfig::ClearKey { license_url } => validate_url("keys.license_url", license_url)?,
    }

    if config.upstream.max_concurrent_requests == 0 {
        anyhow::bail!("upstream.max_concurrent_requests must be at least 1");
    }

    if config.upstream.timeout_secs == Some(0) {
        anyhow::bail!("upstream.timeout_secs cannot be 0");
    }

    for (name, value) in &config.upstream.headers {
        HeaderName::from_bytes(name.as_bytes())
            .with_context(|| format!("Invalid upstream header name: {:?}", name))?;
        HeaderValue::from_str(value)
            .with_context(|| format!("Invalid value for upstream header {:?}", name))?;
    }

    Ok(())
}

fn validate_url(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{} is not set", field);
    }

    let url = Url::parse(value).with_context(|| format!("{} is not a valid URL: {}", field, value))?;
    if !matches!(url.scheme(), "http" | "https") {
        anyhow::bail!("{} must be an http(s) URL, got scheme {:?}", field, url.scheme());
    }

    Ok(())
}
