//! Thin request wrapper that stamps every call with the tool's `User-Agent`.

use reqwest::{
    Client, Method,
    header::{HeaderMap, HeaderValue, USER_AGENT},
};
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

pub const HOMEPAGE: &str = "https://github.com/duckinator/skysniff";

/// `skysniff/<version> (+<homepage>)`
pub fn user_agent() -> String {
    format!("skysniff/{} (+{HOMEPAGE})", env!("CARGO_PKG_VERSION"))
}

/// Request payload. Structured values are sent as JSON.
#[derive(Debug, Clone)]
pub enum Body {
    Json(serde_json::Value),
    Raw(String),
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    http: Client,
    user_agent: HeaderValue,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    pub fn new() -> Self {
        let user_agent = HeaderValue::from_str(&user_agent())
            .unwrap_or_else(|_| HeaderValue::from_static("skysniff"));
        Self { http: Client::new(), user_agent }
    }

    /// Sends one request and returns the response body. Caller headers are
    /// merged into a per-request copy; the identifying header always wins.
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<Body>,
        headers: Option<&HeaderMap>,
    ) -> Result<String> {
        let mut merged = headers.cloned().unwrap_or_default();
        merged.insert(USER_AGENT, self.user_agent.clone());

        tracing::debug!(%method, url, "sending request");

        let mut req = self.http.request(method, url).headers(merged);
        req = match body {
            Some(Body::Json(value)) => req.json(&value),
            Some(Body::Raw(text)) => req.body(text),
            None => req,
        };

        let res = req.send().await?;
        let status = res.status();
        let text = res.text().await?;

        if !status.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status,
                body: truncate_body(&text),
            });
        }

        Ok(text)
    }

    pub async fn get(&self, url: &str) -> Result<String> {
        self.request(Method::GET, url, None, None).await
    }

    pub async fn post(&self, url: &str, body: Body) -> Result<String> {
        self.request(Method::POST, url, Some(body), None).await
    }

    /// GET and decode the body as JSON into `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let body = self.get(url).await?;
        serde_json::from_str(&body).map_err(|source| Error::Parse { url: url.to_string(), source })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
