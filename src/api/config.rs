//! Connection settings for the admin backend. Values come from CLI flags or the
//! environment; nothing here is secret.

use super::errors::ClientError;
use std::time::Duration;
use url::Url;

/// Default request timeout applied to every gateway call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

impl ApiConfig {
    /// Builds a config from a base origin such as `https://api.example.com`.
    ///
    /// # Errors
    /// Returns `ClientError::Config` if the URL is empty, malformed or not http(s).
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Joins an API path onto the base origin, keeping any base path prefix.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        build_url_with_base(self.base_url.as_str(), path)
    }
}

fn parse_base_url(value: &str) -> Result<Url, ClientError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ClientError::Config("API base URL is not configured.".to_string()));
    }

    let url = Url::parse(trimmed)
        .map_err(|err| ClientError::Config(format!("Invalid API base URL: {err}")))?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(ClientError::Config(format!(
                "Unsupported API URL scheme: {scheme}"
            )))
        }
    }

    if url.host().is_none() {
        return Err(ClientError::Config("API base URL has no host.".to_string()));
    }

    Ok(url)
}

fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slashes() {
        let config = ApiConfig::new("https://api.example.com/").unwrap();
        assert_eq!(
            config.endpoint("/api/auth/login"),
            "https://api.example.com/api/auth/login"
        );
    }

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        let config = ApiConfig::new("https://example.com/backend").unwrap();
        assert_eq!(
            config.endpoint("api/user/profile"),
            "https://example.com/backend/api/user/profile"
        );
    }

    #[test]
    fn rejects_empty_and_unsupported_urls() {
        assert!(matches!(ApiConfig::new("  "), Err(ClientError::Config(_))));
        assert!(matches!(
            ApiConfig::new("ftp://files.example.com"),
            Err(ClientError::Config(_))
        ));
        assert!(matches!(ApiConfig::new("not a url"), Err(ClientError::Config(_))));
    }

    #[test]
    fn default_timeout_is_applied() {
        let config = ApiConfig::new("http://localhost:8080").unwrap();
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        let config = config.with_timeout(Duration::from_secs(3));
        assert_eq!(config.timeout, Duration::from_secs(3));
    }
}
