//! Thin client for the hosted data + auth service.
//!
//! Data goes through the REST interface under `/rest/v1`, auth through
//! `/auth/v1`. Every request carries the public `apikey` header and a bearer
//! token: the signed-in user's access token when the handle is scoped with
//! [`Client::as_user`], otherwise the anon key itself.

pub mod auth;
pub mod query;

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use thiserror::Error;

use query::Table;

/// Postgres `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    #[error("Request to data service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{message}")]
    Api {
        status:  StatusCode,
        code:    Option<String>,
        message: String,
    },

    #[error("Expected exactly one row, got {0}")]
    RowCount(usize),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, ClientError::Api { code: Some(code), .. } if code == UNIQUE_VIOLATION)
    }
}

/// Error bodies differ between the REST and auth endpoints; accept both shapes.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    code:              Option<serde_json::Value>,
    error_code:        Option<String>,
    message:           Option<String>,
    msg:               Option<String>,
    error_description: Option<String>,
    error:             Option<String>,
}

impl ErrorBody {
    fn into_error(self, status: StatusCode) -> ClientError {
        let code = self.error_code.or_else(|| {
            self.code.map(|c| match c {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
        });
        let message = self
            .message
            .or(self.msg)
            .or(self.error_description)
            .or(self.error)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_owned());
        ClientError::Api { status, code, message }
    }
}

/// Cheaply clonable handle; clones share one connection pool.
#[derive(Clone)]
pub struct Client {
    http:         reqwest::Client,
    base_url:     String,
    anon_key:     String,
    access_token: Option<String>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("scoped", &self.access_token.is_some())
            .finish()
    }
}

impl Client {
    pub fn new(base_url: &str, anon_key: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(ClientError::InvalidConfig("endpoint URL is empty".into()));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::InvalidConfig(format!(
                "endpoint URL must be http(s): {base_url}"
            )));
        }
        let anon_key = anon_key.trim();
        if anon_key.is_empty() {
            return Err(ClientError::InvalidConfig("anon key is empty".into()));
        }

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.to_owned(),
            anon_key: anon_key.to_owned(),
            access_token: None,
        })
    }

    /// A handle whose data requests run under the given user's token.
    pub fn as_user(&self, access_token: &str) -> Self {
        Self {
            access_token: Some(access_token.to_owned()),
            ..self.clone()
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn table(&self, name: &str) -> Table<'_> {
        Table::new(self, name)
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        let bearer = self.access_token.as_deref().unwrap_or(&self.anon_key);
        self.http
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
    }

    /// Pass successful responses through; turn anything else into `ClientError::Api`.
    async fn check(resp: Response) -> Result<Response, ClientError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let text = resp.text().await.unwrap_or_default();
        let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
        Err(body.into_error(status))
    }
}
