use std::{collections::HashMap, fs, path::Path};

use anyhow::{anyhow, Context};
use shared::protocol::DEFAULT_COLLECTION_URL;
use url::Url;

pub const SETTINGS_FILE: &str = "characters.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_COLLECTION_URL.into(),
            request_timeout_secs: 30,
        }
    }
}

impl Settings {
    /// Applies a command-line override on top of file/env settings.
    pub fn with_base_url_override(mut self, base_url: Option<&str>) -> anyhow::Result<Self> {
        if let Some(raw) = base_url {
            self.base_url = normalize_base_url(raw)?;
        }
        Ok(self)
    }
}

/// Defaults, then `characters.toml` in the working directory, then environment.
pub fn load_settings() -> anyhow::Result<Settings> {
    load_settings_from(Path::new(SETTINGS_FILE))
}

pub fn load_settings_from(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        let file_cfg = toml::from_str::<HashMap<String, toml::Value>>(&raw)
            .with_context(|| format!("failed to parse settings file '{}'", path.display()))?;
        if let Some(v) = file_cfg.get("base_url").and_then(toml::Value::as_str) {
            settings.base_url = v.to_string();
        }
        if let Some(v) = file_cfg.get("request_timeout_secs") {
            settings.request_timeout_secs = match v {
                toml::Value::Integer(secs) if *secs > 0 => *secs as u64,
                toml::Value::String(secs) => parse_timeout(secs)?,
                other => return Err(anyhow!("invalid request_timeout_secs: {other}")),
            };
        }
    }

    if let Ok(v) = std::env::var("CHARACTERS_BASE_URL") {
        settings.base_url = v;
    }
    if let Ok(v) = std::env::var("APP__BASE_URL") {
        settings.base_url = v;
    }

    if let Ok(v) = std::env::var("APP__REQUEST_TIMEOUT_SECS") {
        settings.request_timeout_secs = parse_timeout(&v)?;
    }

    settings.base_url = normalize_base_url(&settings.base_url)?;
    Ok(settings)
}

fn parse_timeout(raw: &str) -> anyhow::Result<u64> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(anyhow!("invalid request timeout '{raw}': expected whole seconds > 0")),
    }
}

/// Trims whitespace and trailing slashes and checks the url is http(s).
pub fn normalize_base_url(raw: &str) -> anyhow::Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Ok(Settings::default().base_url);
    }

    let parsed = Url::parse(trimmed)
        .with_context(|| format!("invalid collection url '{trimmed}'"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        scheme => Err(anyhow!(
            "collection url must start with http:// or https:// (got {scheme}://)"
        )),
    }
}
