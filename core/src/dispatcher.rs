//! A configured HTTP client instance: base path, timeout and fallback text.
//!
//! # Design
//! Each round-trip is split in three: `request` builds an `HttpRequest`,
//! `execute` performs the I/O with reqwest, and `parse` turns the
//! `HttpResponse` into the payload or a normalized `ApiError`. `send` chains
//! the three. Building and parsing never touch the network, so hosts that do
//! their own I/O can skip `execute`.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::envelope;
use crate::error::{ApiError, Failure};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Fallback message of the standard dispatcher.
pub const STANDARD_FALLBACK: &str = "请求失败";

/// Fallback message of the generation dispatcher.
pub const GENERATION_FALLBACK: &str = "生成失败";

#[derive(Debug, Clone)]
pub struct Dispatcher {
    http: Client,
    base_url: String,
    timeout: Duration,
    fallback: String,
}

impl Dispatcher {
    pub fn new(base_url: &str, timeout: Duration, fallback: impl Into<String>) -> Self {
        Self::with_http(Client::new(), base_url, timeout, fallback)
    }

    /// Build a dispatcher on an existing reqwest client so several
    /// dispatchers share one connection pool.
    pub fn with_http(
        http: Client,
        base_url: &str,
        timeout: Duration,
        fallback: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            fallback: fallback.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// A request without a body.
    pub fn request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers: json_headers(),
            body: None,
            timeout: self.timeout,
        }
    }

    /// A request carrying `body` serialized as JSON.
    pub fn request_json<B: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        body: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(body)
            .map_err(|e| Failure::Encode(e.to_string()).into_api_error(&self.fallback))?;
        Ok(HttpRequest {
            body: Some(body),
            ..self.request(method, path)
        })
    }

    /// Turn a response into the envelope payload, or the normalized error.
    pub fn parse<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, ApiError> {
        decode(response).map_err(|failure| failure.into_api_error(&self.fallback))
    }

    /// Send `request` and parse the result. One attempt, no retries.
    pub async fn send<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<T, ApiError> {
        tracing::debug!(
            method = %request.method,
            path = %request.path,
            timeout_ms = %request.timeout.as_millis(),
            "dispatching request"
        );
        let result = match self.execute(&request).await {
            Ok(response) => decode(response),
            Err(failure) => Err(failure),
        };
        result.map_err(|failure| {
            let err = failure.into_api_error(&self.fallback);
            tracing::warn!(
                method = %request.method,
                path = %request.path,
                error = %err,
                "request failed"
            );
            err
        })
    }

    /// Perform the round-trip, reporting non-2xx statuses as data.
    pub async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, Failure> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        };
        let mut builder = self
            .http
            .request(method, &request.path)
            .timeout(request.timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| transport_failure(e, request.timeout))?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .text()
            .await
            .map_err(|e| transport_failure(e, request.timeout))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn json_headers() -> Vec<(String, String)> {
    vec![("content-type".to_string(), "application/json".to_string())]
}

fn decode<T: DeserializeOwned>(response: HttpResponse) -> Result<T, Failure> {
    if !response.is_success() {
        return Err(Failure::Server {
            status: response.status,
            body: response.body,
        });
    }
    let payload = envelope::payload(&response.body)?;
    serde_json::from_value(payload).map_err(|e| Failure::Decode(e.to_string()))
}

fn transport_failure(err: reqwest::Error, timeout: Duration) -> Failure {
    if err.is_timeout() {
        Failure::Timeout(timeout)
    } else {
        Failure::Transport(err.to_string())
    }
}
