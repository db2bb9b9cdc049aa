//! Gateway to the admin backend. Every feature client goes through `ApiClient` so
//! request setup, bearer attachment, timeouts and error normalization live in one
//! place. The client reads the credential from the token store but never writes
//! it, and it never logs request or response bodies.

pub mod cancel;
pub mod config;
pub mod errors;

pub use self::cancel::{CancelHandle, CancelSignal};
pub use self::config::ApiConfig;
pub use self::errors::ClientError;

use crate::{session::TokenStore, APP_USER_AGENT};
use reqwest::{Client, Method, RequestBuilder, Response};
use secrecy::ExposeSecret;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use ulid::Ulid;
use url::form_urlencoded;

/// Header carrying a per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Whether a call should carry the stored bearer credential.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Auth {
    None,
    Required,
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    config: ApiConfig,
    tokens: Arc<dyn TokenStore>,
    cancel: Option<CancelSignal>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.config.base_url.as_str())
            .field("timeout", &self.config.timeout)
            .field("has_credential", &!self.tokens.is_empty())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// # Errors
    /// Returns `ClientError::Config` if the HTTP client cannot be built.
    pub fn new(config: ApiConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, ClientError> {
        let http = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|err| ClientError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            config,
            tokens,
            cancel: None,
        })
    }

    /// Returns a client whose calls abort once `signal` fires.
    #[must_use]
    pub fn with_cancel(&self, signal: CancelSignal) -> Self {
        Self {
            cancel: Some(signal),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Issues one call and returns the decoded JSON body as-is.
    ///
    /// # Errors
    /// `Request` for non-2xx responses, `Network`/`Timeout`/`Cancelled` when no
    /// response arrives, `Parse` when a success body is not JSON.
    #[instrument(
        skip(self, body),
        fields(http.method = %method, http.status = tracing::field::Empty)
    )]
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        auth: Auth,
    ) -> Result<Value, ClientError> {
        let url = self.config.endpoint(path);
        let mut builder = self
            .http
            .request(method, &url)
            .header(REQUEST_ID_HEADER, Ulid::new().to_string());

        if auth == Auth::Required {
            if let Some(token) = self.tokens.get() {
                builder = builder.bearer_auth(token.expose_secret());
            } else {
                debug!("no stored credential, sending request without Authorization");
            }
        }

        if let Some(body) = body {
            builder = builder.json(&body);
        }

        let response = self.send(builder).await?;
        tracing::Span::current().record("http.status", response.status().as_u16());
        handle_json_response(response).await
    }

    /// Like [`ApiClient::request`] but decodes into `T`.
    ///
    /// # Errors
    /// Same as `request`, plus `Parse` when the body does not match `T`.
    pub async fn request_as<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        auth: Auth,
    ) -> Result<T, ClientError> {
        let value = self.request(method, path, body, auth).await?;
        decode(value)
    }

    /// # Errors
    /// See [`ApiClient::request_as`].
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        auth: Auth,
    ) -> Result<T, ClientError> {
        self.request_as(Method::GET, path, None, auth).await
    }

    /// # Errors
    /// See [`ApiClient::request`]; also fails if `body` cannot be encoded.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        auth: Auth,
    ) -> Result<Value, ClientError> {
        let body = encode(body)?;
        self.request(Method::POST, path, Some(body), auth).await
    }

    /// # Errors
    /// See [`ApiClient::request`]; also fails if `body` cannot be encoded.
    pub async fn put_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        auth: Auth,
    ) -> Result<Value, ClientError> {
        let body = encode(body)?;
        self.request(Method::PUT, path, Some(body), auth).await
    }

    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn delete(&self, path: &str, auth: Auth) -> Result<Value, ClientError> {
        self.request(Method::DELETE, path, None, auth).await
    }

    /// Sends with the configured timeout, racing the cancel signal if one is set.
    async fn send(&self, builder: RequestBuilder) -> Result<Response, ClientError> {
        let send = tokio::time::timeout(self.config.timeout, builder.send());

        let result = match self.cancel.clone() {
            Some(mut signal) => {
                if signal.is_cancelled() {
                    return Err(ClientError::Cancelled);
                }
                tokio::select! {
                    result = send => result,
                    () = signal.cancelled() => {
                        debug!("request cancelled");
                        return Err(ClientError::Cancelled);
                    }
                }
            }
            None => send.await,
        };

        match result {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(err)) => Err(map_request_error(&err)),
            Err(_) => Err(ClientError::Timeout),
        }
    }
}

/// Appends url-encoded query parameters, skipping empty values.
#[must_use]
pub fn with_query(path: &str, params: &[(&str, &str)]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    let mut any = false;
    for (key, value) in params {
        if value.trim().is_empty() {
            continue;
        }
        serializer.append_pair(key, value);
        any = true;
    }

    if any {
        format!("{path}?{}", serializer.finish())
    } else {
        path.to_string()
    }
}

/// Lists arrive bare or wrapped under one of `keys`; anything else is empty.
#[must_use]
pub fn unwrap_list(value: Value, keys: &[&str]) -> Value {
    match value {
        Value::Array(_) => value,
        Value::Object(mut object) => keys
            .iter()
            .find_map(|key| match object.remove(*key) {
                Some(list @ Value::Array(_)) => Some(list),
                _ => None,
            })
            .unwrap_or_else(|| Value::Array(Vec::new())),
        _ => Value::Array(Vec::new()),
    }
}

/// Decodes a JSON value into a typed response.
///
/// # Errors
/// Returns `ClientError::Parse` on shape mismatch.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ClientError> {
    serde_json::from_value(value)
        .map_err(|err| ClientError::Parse(format!("Failed to decode response: {err}")))
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<Value, ClientError> {
    serde_json::to_value(body)
        .map_err(|err| ClientError::Parse(format!("Failed to encode request: {err}")))
}

fn map_request_error(err: &reqwest::Error) -> ClientError {
    if err.is_timeout() {
        ClientError::Timeout
    } else {
        ClientError::Network(format!("Unable to reach the server: {err}"))
    }
}

async fn handle_json_response(response: Response) -> Result<Value, ClientError> {
    let status = response.status();
    let bytes = response.bytes().await.map_err(|err| map_request_error(&err))?;

    if status.is_success() {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        return serde_json::from_slice(&bytes)
            .map_err(|err| ClientError::Parse(format!("Failed to decode response: {err}")));
    }

    // An undecodable error body is treated as an empty object.
    let body: Value =
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::Object(Map::new()));
    let message = error_message(&body);
    warn!(status = status.as_u16(), "request failed");

    Err(ClientError::Request {
        status: status.as_u16(),
        message,
    })
}

fn error_message(body: &Value) -> Option<String> {
    ["error", "message"]
        .iter()
        .filter_map(|key| body.get(key).and_then(Value::as_str))
        .map(str::trim)
        .find(|message| !message.is_empty())
        .map(str::to_string)
}
