//! YAML settings file.
//!
//! ```yaml
//! elasticsearch:
//!   url: https://search.example.com:9200
//!   username: ingest
//!   password: secret
//! index: results   # optional
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::IndexingError;
use bulk_indexer_repository::ConnectionConfig;

/// Contents of the settings file.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Search engine connection. `opensearch:` is accepted as well.
    #[serde(alias = "opensearch")]
    pub elasticsearch: ServerSettings,

    /// Index used when none is given on the command line.
    #[serde(default)]
    pub index: Option<String>,
}

#[derive(Clone, Deserialize)]
pub struct ServerSettings {
    pub url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for ServerSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerSettings")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

impl Settings {
    /// Read and validate a settings file.
    pub fn load(path: &Path) -> Result<Self, IndexingError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            IndexingError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }

    /// Parse and validate settings from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self, IndexingError> {
        let mut settings: Settings = serde_yaml::from_str(content)
            .map_err(|e| IndexingError::config(format!("Failed to parse YAML: {}", e)))?;

        // An empty `index:` means no index
        settings.index = settings.index.filter(|index| !index.trim().is_empty());

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), IndexingError> {
        let server = &self.elasticsearch;

        let url = Url::parse(&server.url).map_err(|e| {
            IndexingError::config(format!("Invalid search engine URL '{}': {}", server.url, e))
        })?;
        if url.host_str().is_none() || !has_explicit_port(&server.url) {
            return Err(IndexingError::config(
                "Search engine URL must include a scheme and a port (e.g. https://example.us-central1.gcp.cloud.es.io:443)",
            ));
        }

        if server.username.is_empty() {
            return Err(IndexingError::config(
                "Missing 'username' field in the 'elasticsearch' object of the config YAML file",
            ));
        }
        if server.password.is_empty() {
            return Err(IndexingError::config(
                "Missing 'password' field in the 'elasticsearch' object of the config YAML file",
            ));
        }

        Ok(())
    }

    /// Connection settings for the search client.
    pub fn connection_config(&self, request_timeout: Duration) -> ConnectionConfig {
        let server = &self.elasticsearch;
        ConnectionConfig::new(&server.url, &server.username, &server.password)
            .with_request_timeout(request_timeout)
    }
}

/// `Url` drops ports equal to the scheme default, so look at the raw text.
fn has_explicit_port(raw: &str) -> bool {
    let Some((_, rest)) = raw.split_once("://") else {
        return false;
    };
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host_port = authority.rsplit('@').next().unwrap_or_default();
    // Skip past a bracketed IPv6 host
    let after_host = match host_port.rfind(']') {
        Some(end) => &host_port[end + 1..],
        None => host_port,
    };
    after_host
        .rsplit_once(':')
        .is_some_and(|(_, port)| !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "
elasticsearch:
  url: https://search.example.com:9200
  username: elastic
  password: dolphin1
index: results
";

    #[test]
    fn test_valid_settings() {
        let settings = Settings::from_yaml(VALID).unwrap();

        assert_eq!(settings.elasticsearch.url, "https://search.example.com:9200");
        assert_eq!(settings.index.as_deref(), Some("results"));

        let connection = settings.connection_config(Duration::from_secs(5));
        assert_eq!(connection.username, "elastic");
        assert_eq!(connection.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_opensearch_alias() {
        let settings = Settings::from_yaml(
            "opensearch:\n  url: http://localhost:9200\n  username: admin\n  password: admin\n",
        )
        .unwrap();

        assert_eq!(settings.elasticsearch.url, "http://localhost:9200");
        assert!(settings.index.is_none());
    }

    #[test]
    fn test_missing_password() {
        let err = Settings::from_yaml(
            "elasticsearch:\n  url: http://localhost:9200\n  username: admin\n",
        )
        .unwrap_err();

        assert!(matches!(err, IndexingError::ConfigError(_)));
        assert!(err.to_string().contains("password"));
    }

    #[test]
    fn test_missing_root_object() {
        let err = Settings::from_yaml("index: results\n").unwrap_err();
        assert!(matches!(err, IndexingError::ConfigError(_)));
    }

    #[test]
    fn test_url_needs_port() {
        for url in [
            "https://search.example.com",
            "https://search.example.com/path:9200",
            "search.example.com:9200",
            "https://user:pw@search.example.com",
        ] {
            let yaml = format!(
                "elasticsearch:\n  url: '{}'\n  username: a\n  password: b\n",
                url
            );
            let err = Settings::from_yaml(&yaml).unwrap_err();
            assert!(matches!(err, IndexingError::ConfigError(_)), "{}", url);
        }
    }

    #[test]
    fn test_explicit_port() {
        assert!(has_explicit_port("https://example.com:443"));
        assert!(has_explicit_port("http://localhost:80/"));
        assert!(has_explicit_port("http://user:pw@localhost:9200"));
        assert!(has_explicit_port("http://[::1]:9200"));
        assert!(!has_explicit_port("http://[::1]"));
        assert!(!has_explicit_port("http://localhost"));
    }

    #[test]
    fn test_empty_index_is_none() {
        let settings = Settings::from_yaml(
            "elasticsearch:\n  url: http://localhost:9200\n  username: a\n  password: b\nindex: ''\n",
        )
        .unwrap();
        assert!(settings.index.is_none());
    }

    #[test]
    fn test_debug_redacts_password() {
        let settings = Settings::from_yaml(VALID).unwrap();
        assert!(!format!("{:?}", settings).contains("dolphin1"));
    }
}
