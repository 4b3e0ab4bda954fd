//! Runtime configuration: endpoints, transport knobs and demo mode.
//!
//! Values come from defaults, then an optional YAML file, then `JURBOT_*`
//! environment variables (highest precedence).

use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;
use url::Url;

pub const ENV_EXCHANGE_URL: &str = "JURBOT_EXCHANGE_URL";
pub const ENV_PAYMENT_URL: &str = "JURBOT_PAYMENT_URL";
pub const ENV_RETURN_URL: &str = "JURBOT_RETURN_URL";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "JURBOT_HTTP_TIMEOUT_SECS";
pub const ENV_PROXY_URL: &str = "JURBOT_PROXY_URL";
pub const ENV_DEMO: &str = "JURBOT_DEMO";
pub const ENV_DEMO_DELAY_MS: &str = "JURBOT_DEMO_DELAY_MS";

const DEFAULT_RETURN_URL: &str = "http://localhost:8080/chat";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_DEMO_DELAY_MS: u64 = 1500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// AI exchange endpoint (full URL, POST).
    pub exchange_url: Option<String>,
    /// Payment initiation endpoint (full URL, POST).
    pub payment_url: Option<String>,
    /// Where the payment provider sends the user back to.
    pub return_url: String,
    pub http_timeout_secs: u64,
    pub proxy_url: Option<String>,
    /// Answer turns locally with canned replies instead of calling the AI endpoint.
    pub demo: bool,
    pub demo_delay_ms: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            exchange_url: None,
            payment_url: None,
            return_url: DEFAULT_RETURN_URL.to_string(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            proxy_url: None,
            demo: false,
            demo_delay_ms: DEFAULT_DEMO_DELAY_MS,
        }
    }
}

impl ChatConfig {
    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Load a YAML file, then apply the process environment on top.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let base = match path {
            Some(p) => Self::from_yaml_file(p)?,
            None => Self::default(),
        };
        Ok(base.with_overrides(|key| std::env::var(key).ok()))
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&raw).map_err(|e| match e {
            Error::Configuration { message, context } => Error::Configuration {
                message,
                context: context.with_field_path(path.display().to_string()),
            },
            other => other,
        })
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        serde_yaml::from_str(raw).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid configuration file: {}", e),
                ErrorContext::new().with_source("config"),
            )
        })
    }

    /// Apply `JURBOT_*` overrides using the given lookup.
    ///
    /// Unparseable numeric values are ignored and the previous value is kept.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_EXCHANGE_URL) {
            self.exchange_url = Some(v);
        }
        if let Some(v) = lookup(ENV_PAYMENT_URL) {
            self.payment_url = Some(v);
        }
        if let Some(v) = lookup(ENV_RETURN_URL) {
            self.return_url = v;
        }
        if let Some(v) = lookup(ENV_HTTP_TIMEOUT_SECS).and_then(|s| s.parse::<u64>().ok()) {
            self.http_timeout_secs = v;
        }
        if let Some(v) = lookup(ENV_PROXY_URL) {
            self.proxy_url = Some(v);
        }
        if let Some(v) = lookup(ENV_DEMO) {
            self.demo = matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on");
        }
        if let Some(v) = lookup(ENV_DEMO_DELAY_MS).and_then(|s| s.parse::<u64>().ok()) {
            self.demo_delay_ms = v;
        }
        debug!(demo = self.demo, "configuration resolved");
        self
    }

    pub fn with_exchange_url(mut self, url: impl Into<String>) -> Self {
        self.exchange_url = Some(url.into());
        self
    }

    pub fn with_payment_url(mut self, url: impl Into<String>) -> Self {
        self.payment_url = Some(url.into());
        self
    }

    pub fn with_return_url(mut self, url: impl Into<String>) -> Self {
        self.return_url = url.into();
        self
    }

    pub fn with_demo(mut self, enable: bool) -> Self {
        self.demo = enable;
        self
    }

    /// Check that every endpoint needed for the chosen mode is present and well-formed.
    pub fn validate(&self) -> Result<()> {
        if !self.demo {
            self.exchange_endpoint()?;
        }
        if self.payment_url.is_some() {
            self.payment_endpoint()?;
        }
        parse_url("return_url", Some(&self.return_url))?;
        if let Some(proxy) = &self.proxy_url {
            parse_url("proxy_url", Some(proxy))?;
        }
        Ok(())
    }

    pub fn exchange_endpoint(&self) -> Result<Url> {
        parse_url("exchange_url", self.exchange_url.as_deref())
    }

    pub fn payment_endpoint(&self) -> Result<Url> {
        parse_url("payment_url", self.payment_url.as_deref())
    }
}

fn parse_url(field: &str, value: Option<&str>) -> Result<Url> {
    let raw = value.ok_or_else(|| {
        Error::configuration_with_context(
            format!("{} is not configured", field),
            ErrorContext::new()
                .with_field_path(field)
                .with_source("config"),
        )
    })?;
    Url::parse(raw).map_err(|e| {
        Error::configuration_with_context(
            format!("{} is not a valid URL", field),
            ErrorContext::new()
                .with_field_path(field)
                .with_details(format!("{}: {}", raw, e))
                .with_source("config"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn environment_wins_over_file() {
        let cfg = ChatConfig::from_yaml_str(
            "exchange_url: http://file.local/chat\nhttp_timeout_secs: 10\n",
        )
        .unwrap()
        .with_overrides(lookup(&[
            (ENV_EXCHANGE_URL, "http://env.local/chat"),
            (ENV_DEMO, "true"),
        ]));

        assert_eq!(cfg.exchange_url.as_deref(), Some("http://env.local/chat"));
        assert_eq!(cfg.http_timeout_secs, 10);
        assert!(cfg.demo);
        assert_eq!(cfg.return_url, DEFAULT_RETURN_URL);
    }

    #[test]
    fn bad_numbers_keep_previous_value() {
        let cfg = ChatConfig::default().with_overrides(lookup(&[(ENV_DEMO_DELAY_MS, "soon")]));
        assert_eq!(cfg.demo_delay_ms, DEFAULT_DEMO_DELAY_MS);
    }

    #[test]
    fn validate_requires_exchange_url_outside_demo() {
        let cfg = ChatConfig::default().with_payment_url("http://pay.local/create");
        let err = cfg.validate().unwrap_err();
        assert_eq!(
            err.context().and_then(|c| c.field_path.as_deref()),
            Some("exchange_url")
        );

        assert!(cfg.with_demo(true).validate().is_ok());
    }

    #[test]
    fn malformed_url_is_reported() {
        let cfg = ChatConfig::default()
            .with_exchange_url("not a url")
            .with_payment_url("http://pay.local/create");
        assert!(matches!(cfg.validate(), Err(Error::Configuration { .. })));
    }

    #[test]
    fn unknown_yaml_is_rejected_as_configuration_error() {
        assert!(matches!(
            ChatConfig::from_yaml_str("demo: [1, 2"),
            Err(Error::Configuration { .. })
        ));
    }
}
