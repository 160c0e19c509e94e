//! Connection settings for the search engine client.

use std::time::Duration;

/// Default timeout applied to every request sent to the cluster.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for a search engine cluster.
#[derive(Clone)]
pub struct ConnectionConfig {
    /// Cluster URL including scheme and port.
    pub url: String,
    /// Basic-auth username.
    pub username: String,
    /// Basic-auth password.
    pub password: String,
    /// Timeout applied to each request.
    pub request_timeout: Duration,
}

impl ConnectionConfig {
    /// Create connection settings with the default request timeout.
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            username: username.into(),
            password: password.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Override the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

// Keep the password out of logs.
impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"********")
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password() {
        let config = ConnectionConfig::new("https://localhost:9200", "elastic", "dolphin1");
        let rendered = format!("{:?}", config);

        assert!(rendered.contains("elastic"));
        assert!(!rendered.contains("dolphin1"));
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
    }
}
