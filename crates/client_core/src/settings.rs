use anyhow::{anyhow, Context};
use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:5001";
pub const API_URL_ENV: &str = "LAB_API_URL";
pub const API_URL_ENV_ALIAS: &str = "APP__API_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub api_base_url: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.into(),
        }
    }
}

impl ClientSettings {
    /// Reads the backend base URL from the process environment.
    pub fn load() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut settings = Self::default();

        if let Some(v) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            settings.api_base_url = v;
        }
        if let Some(v) = lookup(API_URL_ENV_ALIAS).filter(|v| !v.trim().is_empty()) {
            settings.api_base_url = v;
        }

        settings.api_base_url = normalize_api_url(&settings.api_base_url)
            .with_context(|| format!("invalid {API_URL_ENV} value '{}'", settings.api_base_url))?;
        Ok(settings)
    }

    pub fn with_api_url(raw: &str) -> anyhow::Result<Self> {
        Ok(Self {
            api_base_url: normalize_api_url(raw)?,
        })
    }
}

pub fn normalize_api_url(raw: &str) -> anyhow::Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Ok(DEFAULT_API_URL.to_string());
    }

    let parsed = Url::parse(trimmed).with_context(|| format!("'{trimmed}' is not a URL"))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(anyhow!("unsupported scheme '{other}', expected http or https")),
    }
    if parsed.host_str().is_none() {
        return Err(anyhow!("'{trimmed}' has no host"));
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_to_local_backend() {
        let settings = ClientSettings::from_lookup(lookup_from(&[])).expect("settings");
        assert_eq!(settings.api_base_url, "http://localhost:5001");
    }

    #[test]
    fn env_override_drops_trailing_slash() {
        let settings =
            ClientSettings::from_lookup(lookup_from(&[("LAB_API_URL", "https://lab.example.org/ ")]))
                .expect("settings");
        assert_eq!(settings.api_base_url, "https://lab.example.org");
    }

    #[test]
    fn app_alias_wins_over_plain_name() {
        let settings = ClientSettings::from_lookup(lookup_from(&[
            ("LAB_API_URL", "http://one:5001"),
            ("APP__API_URL", "http://two:5001"),
        ]))
        .expect("settings");
        assert_eq!(settings.api_base_url, "http://two:5001");
    }

    #[test]
    fn blank_env_value_is_ignored() {
        let settings = ClientSettings::from_lookup(lookup_from(&[("LAB_API_URL", "   ")]))
            .expect("settings");
        assert_eq!(settings, ClientSettings::default());
    }

    #[test]
    fn rejects_non_http_scheme() {
        let err = normalize_api_url("ftp://lab.example.org").expect_err("must fail");
        assert!(err.to_string().contains("unsupported scheme"), "{err}");
    }

    #[test]
    fn rejects_garbage() {
        assert!(ClientSettings::with_api_url("not a url").is_err());
    }
}
