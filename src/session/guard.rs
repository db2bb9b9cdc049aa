use crate::{
    api::ApiClient,
    auth::{client, UserProfile},
};
use tracing::{debug, info, instrument, warn};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// The backend accepted the stored credential.
    Authenticated(UserProfile),
    /// No usable credential; the caller should run the login flow.
    Unauthenticated,
}

impl SessionState {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

/// Validates a stored credential on entry. The backend is the only authority:
/// there is no local expiry or signature check.
#[derive(Debug, Clone)]
pub struct SessionGuard {
    api: ApiClient,
}

impl SessionGuard {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Checks the stored credential against the profile endpoint. Any failure,
    /// network errors included, clears the credential.
    #[instrument(skip_all)]
    pub async fn check(&self) -> SessionState {
        if self.api.tokens().is_empty() {
            debug!("no stored credential");
            return SessionState::Unauthenticated;
        }

        match client::fetch_profile(&self.api).await {
            Ok(profile) => {
                info!("stored session is valid");
                SessionState::Authenticated(profile)
            }
            Err(err) => {
                warn!("stored session rejected: {err}");
                if let Err(clear_err) = self.api.tokens().clear() {
                    warn!("failed to clear stored credential: {clear_err}");
                }
                SessionState::Unauthenticated
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{
        api::ApiConfig,
        session::{MemoryTokenStore, TokenStore},
    };
    use secrecy::SecretString;
    use serde_json::json;
    use std::{net::TcpListener, sync::Arc};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn guard_for(uri: &str, store: Arc<MemoryTokenStore>) -> SessionGuard {
        let config = ApiConfig::new(uri).unwrap();
        SessionGuard::new(ApiClient::new(config, store).unwrap())
    }

    #[tokio::test]
    async fn empty_store_never_calls_profile() -> anyhow::Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(client::PROFILE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryTokenStore::new());
        store.set(SecretString::from("old"))?;
        store.clear()?;

        let state = guard_for(&server.uri(), store).check().await;
        assert_eq!(state, SessionState::Unauthenticated);
        Ok(())
    }

    #[tokio::test]
    async fn valid_credential_skips_login() -> anyhow::Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(client::PROFILE_PATH))
            .and(header("Authorization", "Bearer live"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"id": 1, "email": "ops@example.com", "role": "admin"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryTokenStore::new());
        store.set(SecretString::from("live"))?;

        let state = guard_for(&server.uri(), store.clone()).check().await;
        match state {
            SessionState::Authenticated(profile) => {
                assert_eq!(profile.email.as_deref(), Some("ops@example.com"));
            }
            SessionState::Unauthenticated => panic!("expected an authenticated session"),
        }
        assert!(store.get().is_some());
        Ok(())
    }

    #[tokio::test]
    async fn rejected_credential_is_cleared() -> anyhow::Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(client::PROFILE_PATH))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "jwt expired"})))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryTokenStore::new());
        store.set(SecretString::from("stale"))?;

        let state = guard_for(&server.uri(), store.clone()).check().await;
        assert!(!state.is_authenticated());
        assert!(store.get().is_none());
        Ok(())
    }

    #[tokio::test]
    async fn network_failure_also_clears() -> anyhow::Result<()> {
        let listener = match TcpListener::bind("127.0.0.1:0") {
            Ok(listener) => listener,
            Err(_) => {
                eprintln!("Skipping test: cannot bind localhost");
                return Ok(());
            }
        };
        let port = listener.local_addr()?.port();
        drop(listener);

        let store = Arc::new(MemoryTokenStore::new());
        store.set(SecretString::from("token"))?;

        let state = guard_for(&format!("http://127.0.0.1:{port}"), store.clone())
            .check()
            .await;
        assert_eq!(state, SessionState::Unauthenticated);
        assert!(store.get().is_none());
        Ok(())
    }
}
