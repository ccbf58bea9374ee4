//! HTTP transport to the TV.
//!
//! The TV serves its API over HTTPS on port 1926 with a self-signed
//! certificate, so certificate verification is disabled. Authenticated
//! endpoints use HTTP Digest with the pairing credentials.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, PoisonError, RwLock};
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::digest::{generate_cnonce, DigestChallenge};
use crate::error::{HttpMethod, Result, TvError};

/// Default port of the JointSpace API.
pub const DEFAULT_PORT: u16 = 1926;

/// Digest credentials issued by a successful pairing.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Credentials {
    /// Device ID used during pairing (Digest username).
    pub id: String,
    /// Auth key returned by the TV (Digest password).
    pub key: String,
}

impl Credentials {
    pub fn new(id: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            key: key.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("id", &self.id)
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Response future of a [`Transport`] request.
pub type TransportFuture<'a> = Pin<Box<dyn Future<Output = Result<Option<Value>>> + Send + 'a>>;

/// Raw JSON access to the TV.
///
/// Paths are relative to the API root; a leading slash is ignored. A `None`
/// result means the TV answered with an empty body.
pub trait Transport: Send + Sync {
    /// Host name or address of the TV.
    fn host(&self) -> &str;

    /// Returns the credentials currently used for requests.
    fn auth(&self) -> Option<Credentials>;

    /// Replaces the credentials; `None` makes requests unauthenticated.
    fn set_auth(&self, auth: Option<Credentials>);

    /// Sends a `GET` request.
    fn get<'a>(&'a self, path: &'a str) -> TransportFuture<'a>;

    /// Sends a `POST` request with an optional JSON body.
    fn post<'a>(&'a self, path: &'a str, payload: Option<&'a Value>) -> TransportFuture<'a>;
}

/// Connection settings for [`TvTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    pub host: String,
    pub port: u16,
    /// Overall request timeout; `None` keeps the HTTP stack default.
    pub timeout: Option<Duration>,
    /// Use HTTPS. Plain HTTP is only meant for local test servers.
    pub tls: bool,
}

impl TransportConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            timeout: None,
            tls: true,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_tls(mut self, tls: bool) -> Self {
        self.tls = tls;
        self
    }

    /// Returns the API root, e.g. `https://192.168.0.10:1926/`.
    pub fn base_url(&self) -> String {
        let scheme = if self.tls { "https" } else { "http" };
        format!("{}://{}:{}/", scheme, self.host, self.port)
    }
}

/// Last Digest challenge seen, reused until the TV issues a new nonce.
///
/// The client nonce is fixed per challenge so that an MD5-sess session key
/// stays the same for every request signed with it.
#[derive(Debug)]
struct DigestState {
    challenge: DigestChallenge,
    nonce_count: u32,
    cnonce: String,
}

/// [`Transport`] implementation over `reqwest`.
pub struct TvTransport {
    config: TransportConfig,
    base_url: Url,
    client: reqwest::Client,
    auth: RwLock<Option<Credentials>>,
    digest: Mutex<Option<DigestState>>,
}

impl TvTransport {
    /// Creates a transport for the TV described by `config`.
    pub fn new(config: TransportConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url())
            .map_err(|e| TvError::ClientSetup(format!("invalid TV address: {e}")))?;

        let mut builder = reqwest::Client::builder().danger_accept_invalid_certs(true);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TvError::ClientSetup(e.to_string()))?;

        Ok(Self {
            config,
            base_url,
            client,
            auth: RwLock::new(None),
            digest: Mutex::new(None),
        })
    }

    /// Creates an authenticated transport on the default port.
    pub fn with_auth(host: impl Into<String>, auth: Option<Credentials>) -> Result<Self> {
        let transport = Self::new(TransportConfig::new(host))?;
        transport.set_auth(auth);
        Ok(transport)
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Joins `path` onto the API root, tolerating a leading slash.
    pub fn url(&self, path: &str) -> std::result::Result<Url, url::ParseError> {
        self.base_url.join(path.trim_start_matches('/'))
    }

    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        payload: Option<&Value>,
    ) -> Result<Option<Value>> {
        tracing::debug!("Request: {} {} {:?}", method, path, payload);

        let url = self.url(path).map_err(|e| TvError::Transport {
            method,
            path: path.to_string(),
            status: None,
            reason: format!("invalid request path: {e}"),
        })?;
        let auth = self.auth();

        let preemptive = auth
            .as_ref()
            .and_then(|creds| self.preemptive_authorization(creds, method, &url));
        let mut response = self.send(method, path, &url, payload, preemptive).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            if let Some(creds) = &auth {
                if let Some(header) = self.answer_challenge(creds, method, &url, &response) {
                    tracing::debug!("Answering digest challenge for {} {}", method, path);
                    response = self.send(method, path, &url, payload, Some(header)).await?;
                }
            }
        }

        let status = response.status();
        if !status.is_success() {
            return Err(TvError::Transport {
                method,
                path: path.to_string(),
                status: Some(status.as_u16()),
                reason: format!("HTTP {status}"),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(method, path, e))?;
        let body: Option<Value> = if body.is_empty() {
            None
        } else {
            Some(
                serde_json::from_slice(&body).map_err(|e| TvError::Transport {
                    method,
                    path: path.to_string(),
                    status: Some(status.as_u16()),
                    reason: format!("response body is not JSON: {e}"),
                })?,
            )
        };

        tracing::debug!("Response: {} {:?}", status.as_u16(), body);
        Ok(body)
    }

    async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        url: &Url,
        payload: Option<&Value>,
        authorization: Option<String>,
    ) -> Result<Response> {
        let mut request = match method {
            HttpMethod::Get => self.client.get(url.clone()),
            HttpMethod::Post => self.client.post(url.clone()),
        };
        if let Some(payload) = payload {
            request = request.json(payload);
        }
        if let Some(authorization) = authorization {
            request = request.header(AUTHORIZATION, authorization);
        }
        request
            .send()
            .await
            .map_err(|e| transport_error(method, path, e))
    }

    /// Signs the request with the cached challenge, if there is one.
    fn preemptive_authorization(
        &self,
        creds: &Credentials,
        method: HttpMethod,
        url: &Url,
    ) -> Option<String> {
        let mut digest = self.digest.lock().unwrap_or_else(PoisonError::into_inner);
        let state = digest.as_mut()?;
        state.nonce_count += 1;
        Some(state.challenge.authorization(
            &creds.id,
            &creds.key,
            method.as_str(),
            &request_uri(url),
            state.nonce_count,
            &state.cnonce,
        ))
    }

    /// Caches the challenge from a 401 response and signs a retry with it.
    fn answer_challenge(
        &self,
        creds: &Credentials,
        method: HttpMethod,
        url: &Url,
        response: &Response,
    ) -> Option<String> {
        let challenge = response
            .headers()
            .get_all(WWW_AUTHENTICATE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(DigestChallenge::parse)?;

        let cnonce = generate_cnonce();
        let header = challenge.authorization(
            &creds.id,
            &creds.key,
            method.as_str(),
            &request_uri(url),
            1,
            &cnonce,
        );
        *self.digest.lock().unwrap_or_else(PoisonError::into_inner) = Some(DigestState {
            challenge,
            nonce_count: 1,
            cnonce,
        });
        Some(header)
    }
}

impl Transport for TvTransport {
    fn host(&self) -> &str {
        &self.config.host
    }

    fn auth(&self) -> Option<Credentials> {
        self.auth
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_auth(&self, auth: Option<Credentials>) {
        *self.auth.write().unwrap_or_else(PoisonError::into_inner) = auth;
        *self.digest.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn get<'a>(&'a self, path: &'a str) -> TransportFuture<'a> {
        Box::pin(self.request(HttpMethod::Get, path, None))
    }

    fn post<'a>(&'a self, path: &'a str, payload: Option<&'a Value>) -> TransportFuture<'a> {
        Box::pin(self.request(HttpMethod::Post, path, payload))
    }
}

impl fmt::Debug for TvTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TvTransport")
            .field("base_url", &self.base_url.as_str())
            .field("auth", &self.auth())
            .finish()
    }
}

/// Path and query of a URL, as used in the Digest `uri` field.
fn request_uri(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}

fn transport_error(method: HttpMethod, path: &str, err: reqwest::Error) -> TvError {
    TvError::Transport {
        method,
        path: path.to_string(),
        status: err.status().map(|s| s.as_u16()),
        reason: err.to_string(),
    }
}
