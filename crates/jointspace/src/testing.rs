//! In-memory [`Transport`] for tests.
//!
//! Responses are registered per method and full path (e.g. `6/pair/request`).
//! Every request is recorded together with the credentials that were active
//! when it was sent. Unregistered paths fail with HTTP 404.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError, RwLock};

use serde_json::Value;

use crate::error::{HttpMethod, Result, TvError};
use crate::transport::{Credentials, Transport, TransportFuture};

/// Canned answer for one path.
#[derive(Debug, Clone)]
pub enum FakeResponse {
    /// 2xx with the given body (`None` = empty body).
    Body(Option<Value>),
    /// Non-2xx status.
    Status(u16),
}

/// A request seen by [`FakeTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: HttpMethod,
    pub path: String,
    pub payload: Option<Value>,
    pub auth: Option<Credentials>,
}

#[derive(Debug, Default)]
pub struct FakeTransport {
    host: String,
    auth: RwLock<Option<Credentials>>,
    responses: HashMap<(HttpMethod, String), FakeResponse>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self {
            host: "192.168.0.1".to_string(),
            ..Self::default()
        }
    }

    pub fn with_get(self, path: &str, body: Value) -> Self {
        self.respond(HttpMethod::Get, path, FakeResponse::Body(Some(body)))
    }

    pub fn with_post(self, path: &str, body: Value) -> Self {
        self.respond(HttpMethod::Post, path, FakeResponse::Body(Some(body)))
    }

    /// Accepts `POST path` with an empty response body.
    pub fn with_empty_post(self, path: &str) -> Self {
        self.respond(HttpMethod::Post, path, FakeResponse::Body(None))
    }

    pub fn with_status(self, method: HttpMethod, path: &str, status: u16) -> Self {
        self.respond(method, path, FakeResponse::Status(status))
    }

    pub fn respond(mut self, method: HttpMethod, path: &str, response: FakeResponse) -> Self {
        self.responses.insert((method, path.to_string()), response);
        self
    }

    /// All requests, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Requests sent to one method and path, in order.
    pub fn requests_to(&self, method: HttpMethod, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    /// Payload of the last `POST` to `path`.
    pub fn last_post(&self, path: &str) -> Option<Value> {
        self.requests_to(HttpMethod::Post, path)
            .pop()
            .and_then(|r| r.payload)
    }

    fn handle(
        &self,
        method: HttpMethod,
        path: &str,
        payload: Option<&Value>,
    ) -> Result<Option<Value>> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedRequest {
                method,
                path: path.to_string(),
                payload: payload.cloned(),
                auth: self.auth(),
            });

        let status = match self.responses.get(&(method, path.to_string())) {
            Some(FakeResponse::Body(body)) => return Ok(body.clone()),
            Some(FakeResponse::Status(status)) => *status,
            None => 404,
        };
        Err(TvError::Transport {
            method,
            path: path.to_string(),
            status: Some(status),
            reason: format!("HTTP {status}"),
        })
    }
}

impl Transport for FakeTransport {
    fn host(&self) -> &str {
        &self.host
    }

    fn auth(&self) -> Option<Credentials> {
        self.auth
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_auth(&self, auth: Option<Credentials>) {
        *self.auth.write().unwrap_or_else(PoisonError::into_inner) = auth;
    }

    fn get<'a>(&'a self, path: &'a str) -> TransportFuture<'a> {
        Box::pin(async move { self.handle(HttpMethod::Get, path, None) })
    }

    fn post<'a>(&'a self, path: &'a str, payload: Option<&'a Value>) -> TransportFuture<'a> {
        Box::pin(async move { self.handle(HttpMethod::Post, path, payload) })
    }
}
