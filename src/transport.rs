// src/transport.rs
//! HTTP transport - one request per call, no retries

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use url::Url;

use crate::app_log;
use crate::config::ClientConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Status and raw body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a bodiless JSON request.
    ///
    /// `Err` only when no response was received. Every HTTP status,
    /// error statuses included, comes back as `Ok`.
    async fn send(&self, method: Method, path: &str) -> Result<RawResponse>;
}

pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout_seconds: Option<u64>) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid base URL: {}", base_url))?;

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(&config.base_url, config.timeout_seconds)
    }

    /// Base URL path prefix followed by the request path, query-free.
    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, method: Method, path: &str) -> Result<RawResponse> {
        let url = self.url_for(path);
        app_log!(trace, "Calling profile service: {:?} {}", method, url);

        let request = match method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };

        let response = request
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        let status = response.status();
        app_log!(trace, "Response status: {}", status);

        // An error status still gets rendered when its body is cut short.
        let body = match response.bytes().await {
            Ok(body) => body.to_vec(),
            Err(e) if !status.is_success() => {
                app_log!(warn, "Failed to read error body from {}: {}", url, e);
                Vec::new()
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read response body from {}", url))
            }
        };

        Ok(RawResponse::new(status.as_u16(), body))
    }
}
