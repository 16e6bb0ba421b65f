use std::time::Duration;

use reqwest::Url;

use crate::error::{CaptionDocError, Result};

pub const WATCH_URL_ENV: &str = "CAPTIONDOC_WATCH_URL";
pub const OEMBED_URL_ENV: &str = "CAPTIONDOC_OEMBED_URL";
pub const USER_AGENT_ENV: &str = "CAPTIONDOC_USER_AGENT";
pub const TIMEOUT_ENV: &str = "CAPTIONDOC_TIMEOUT_SECS";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Endpoints and HTTP settings for the hosting service.
#[derive(Debug, Clone)]
pub struct HostingConfig {
    pub watch_url: String,
    pub oembed_url: String,
    pub user_agent: String,
    pub accept_language: String,
    pub timeout: Duration,
}

impl Default for HostingConfig {
    fn default() -> Self {
        Self {
            watch_url: "https://www.youtube.com/watch".to_string(),
            oembed_url: "https://www.youtube.com/oembed".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl HostingConfig {
    /// Defaults overridden by any `CAPTIONDOC_*` variables that are set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup(WATCH_URL_ENV) {
            config.watch_url = url;
        }
        if let Some(url) = lookup(OEMBED_URL_ENV) {
            config.oembed_url = url;
        }
        if let Some(agent) = lookup(USER_AGENT_ENV) {
            config.user_agent = agent;
        }
        if let Some(raw) = lookup(TIMEOUT_ENV) {
            let secs: u64 = raw.trim().parse().map_err(|_| CaptionDocError::Config {
                reason: format!("{TIMEOUT_ENV} must be a whole number of seconds, got {raw:?}"),
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Canonical watch-page URL for a video id, with the id query-encoded.
    pub fn watch_page_url(&self, video_id: &str) -> Result<Url> {
        Url::parse_with_params(&self.watch_url, &[("v", video_id)]).map_err(|e| {
            CaptionDocError::Config {
                reason: format!("invalid watch URL {:?}: {e}", self.watch_url),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn overrides_apply_on_top_of_defaults() {
        let vars = HashMap::from([
            (OEMBED_URL_ENV, "http://localhost:9000/oembed".to_string()),
            (TIMEOUT_ENV, " 5 ".to_string()),
        ]);
        let config = HostingConfig::from_lookup(|k| vars.get(k).cloned()).unwrap();

        assert_eq!(config.oembed_url, "http://localhost:9000/oembed");
        assert_eq!(config.watch_url, "https://www.youtube.com/watch");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn bad_timeout_is_a_config_error() {
        let err = HostingConfig::from_lookup(|k| (k == TIMEOUT_ENV).then(|| "soon".to_string()))
            .unwrap_err();
        assert!(matches!(err, CaptionDocError::Config { .. }));
    }

    #[test]
    fn watch_page_url_embeds_id() {
        let config = HostingConfig::default();
        assert_eq!(
            config.watch_page_url("dQw4w9WgXcQ").unwrap().as_str(),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );

        let url = config.watch_page_url("abc&x=1#frag").unwrap();
        assert_eq!(url.query(), Some("v=abc%26x%3D1%23frag"));
        assert_eq!(url.query_pairs().count(), 1);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn unparsable_watch_url_is_a_config_error() {
        let config = HostingConfig {
            watch_url: "not a url".to_string(),
            ..HostingConfig::default()
        };
        assert!(matches!(
            config.watch_page_url("abc"),
            Err(CaptionDocError::Config { .. })
        ));
    }
}
