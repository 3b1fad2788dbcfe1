//! Session-managing client for the iRacing membersite.
//!
//! Every public call goes through [`Client::dispatch`], which makes sure a
//! session exists (logging in on first use), sends exactly one request and
//! optionally decodes the JSON body.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::auth::{Credentials, Session, SessionInfo, SESSION_COOKIE};
use crate::config::{options_from_env, ClientConfig, ClientOption};

use super::{ApiError, ApiRequest, ApiResponse, AuthFailure, ConfigError, RawResponse};

/// API client for the membersite stats endpoints.
/// Clone is cheap - clones share the connection pool, cookie jar and session.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    config: Arc<ClientConfig>,
    credentials: Arc<Credentials>,
    session: Arc<Session>,
}

impl Client {
    /// Create a client. No network traffic happens until the first request.
    pub fn new<I>(
        username: impl Into<String>,
        password: impl Into<String>,
        options: I,
    ) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = ClientOption>,
    {
        Self::with_credentials(Credentials::new(username, password)?, options)
    }

    pub fn with_credentials<I>(credentials: Credentials, options: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = ClientOption>,
    {
        let mut config = ClientConfig::default();
        for option in options {
            option.apply(&mut config)?;
        }
        let http = config.build_transport()?;

        debug!(
            base_url = %config.base_url(),
            username = %credentials.username(),
            "Client configured"
        );

        Ok(Self {
            http,
            config: Arc::new(config),
            credentials: Arc::new(credentials),
            session: Arc::new(Session::new()),
        })
    }

    /// Build a client from `IRSTATS_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::with_credentials(Credentials::from_env()?, options_from_env()?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn username(&self) -> &str {
        self.credentials.username()
    }

    /// Current session flag. Never waits on an in-flight login.
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn session_info(&self) -> SessionInfo {
        self.session.info()
    }

    // ===== Request Methods =====

    pub async fn get(&self, path: &str) -> Result<RawResponse, ApiError> {
        self.dispatch(&ApiRequest::get(path)).await
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>, ApiError> {
        self.dispatch_json(&ApiRequest::get(path)).await
    }

    pub async fn post<I, K, V>(&self, path: &str, form: I) -> Result<RawResponse, ApiError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.dispatch(&ApiRequest::post(path, form)).await
    }

    pub async fn post_json<T, I, K, V>(&self, path: &str, form: I) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.dispatch_json(&ApiRequest::post(path, form)).await
    }

    /// Ensure a session, then send the request and return the raw response.
    pub async fn dispatch(&self, request: &ApiRequest) -> Result<RawResponse, ApiError> {
        self.assert_logged_in().await?;
        self.send(request).await
    }

    /// Like [`dispatch`](Self::dispatch), then decode the body as JSON.
    ///
    /// A body that does not decode yields [`ApiError::Decode`], which still
    /// carries the raw response.
    pub async fn dispatch_json<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
    ) -> Result<ApiResponse<T>, ApiError> {
        let raw = self.dispatch(request).await?;
        match raw.json::<T>() {
            Ok(data) => Ok(ApiResponse { raw, data }),
            Err(source) => {
                warn!(path = request.path(), error = %source, "Failed to decode response body");
                Err(ApiError::Decode {
                    source,
                    response: raw,
                })
            }
        }
    }

    // ===== Session =====

    async fn assert_logged_in(&self) -> Result<(), ApiError> {
        self.session
            .ensure(|| self.login())
            .await
            .map_err(ApiError::AuthenticationFailed)
    }

    async fn login(&self) -> Result<(), AuthFailure> {
        let url = self
            .config
            .url_for(self.config.login_path())
            .map_err(AuthFailure::Transport)?;
        info!(username = %self.credentials.username(), "Logging in");

        let response = self
            .http
            .post(url.clone())
            .form(&self.credentials.login_form())
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "Login request failed");
                AuthFailure::Transport(e.to_string())
            })?;

        if has_session_cookie(&response) {
            info!("Login succeeded");
            Ok(())
        } else {
            warn!(status = %response.status(), "Login response had no session cookie");
            Err(AuthFailure::MissingSessionCookie)
        }
    }

    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, ApiError> {
        let url = self.config.url_for(request.path()).map_err(|reason| {
            warn!(path = request.path(), error = %reason, "Invalid request path");
            ApiError::InvalidPath {
                path: request.path().to_string(),
                reason,
            }
        })?;
        let transport_error = |source: reqwest::Error, response: Option<RawResponse>| {
            warn!(path = request.path(), error = %source, "API request failed");
            ApiError::Transport {
                path: request.path().to_string(),
                source,
                response,
            }
        };

        let builder = match request.form() {
            None => self.http.get(url),
            Some(form) => self.http.post(url).form(form),
        };

        let response = builder
            .send()
            .await
            .map_err(|source| transport_error(source, None))?;
        let raw = RawResponse::read(response)
            .await
            .map_err(|(source, partial)| transport_error(source, Some(partial)))?;

        debug!(
            method = %request.method(),
            path = request.path(),
            status = %raw.status(),
            bytes = raw.body().len(),
            "API response received"
        );
        Ok(raw)
    }
}

fn has_session_cookie(response: &reqwest::Response) -> bool {
    response
        .cookies()
        .any(|c| c.name() == SESSION_COOKIE && !c.value().is_empty())
}
