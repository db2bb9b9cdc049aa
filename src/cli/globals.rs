use crate::{
    api::{ApiClient, ApiConfig, CancelSignal},
    session::{FileTokenStore, TokenStore},
};
use anyhow::{Context, Result};
use std::{path::PathBuf, sync::Arc, time::Duration};

/// Settings shared by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub api_url: String,
    pub token_file: PathBuf,
    pub timeout: Duration,
    pub json: bool,
}

impl GlobalArgs {
    /// # Errors
    /// Returns an error when no token file is given and no config directory exists.
    pub fn new(
        api_url: String,
        token_file: Option<PathBuf>,
        timeout: Duration,
        json: bool,
    ) -> Result<Self> {
        let token_file = match token_file {
            Some(path) => path,
            None => FileTokenStore::default_path()
                .context("no config directory found; pass --token-file")?,
        };

        Ok(Self {
            api_url,
            token_file,
            timeout,
            json,
        })
    }

    #[must_use]
    pub fn token_store(&self) -> Arc<dyn TokenStore> {
        Arc::new(FileTokenStore::new(&self.token_file))
    }

    /// Gateway client over the file-backed token store, aborted by `cancel`.
    ///
    /// # Errors
    /// Returns an error if the API URL is invalid.
    pub fn api_client(&self, cancel: CancelSignal) -> Result<ApiClient> {
        let config = ApiConfig::new(&self.api_url)
            .with_context(|| format!("invalid API URL: {}", self.api_url))?
            .with_timeout(self.timeout);
        let client = ApiClient::new(config, self.token_store())?;
        Ok(client.with_cancel(cancel))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::CancelHandle;

    #[test]
    fn test_global_args() {
        let args = GlobalArgs::new(
            "https://admin.example.com".to_string(),
            Some(PathBuf::from("/tmp/session.json")),
            Duration::from_secs(10),
            false,
        )
        .unwrap();
        assert_eq!(args.token_file, PathBuf::from("/tmp/session.json"));

        let handle = CancelHandle::new();
        let client = args.api_client(handle.signal()).unwrap();
        assert_eq!(client.config().timeout, Duration::from_secs(10));
        assert_eq!(client.config().base_url.as_str(), "https://admin.example.com/");
    }

    #[test]
    fn test_invalid_api_url() {
        let args = GlobalArgs::new(
            "ftp://admin.example.com".to_string(),
            Some(PathBuf::from("/tmp/session.json")),
            Duration::from_secs(10),
            false,
        )
        .unwrap();
        assert!(args.api_client(CancelHandle::new().signal()).is_err());
    }
}
