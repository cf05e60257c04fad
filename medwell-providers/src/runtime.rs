use crate::request::{Body, HttpRequest, Method};
use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

/// Shared reqwest client; one per client context.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> anyhow::Result<Self> {
        // Without an explicit timeout a dead webhook would stall the chat forever.
        let inner = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .context("build http client")?;
        Ok(Self { inner })
    }

    /// One attempt, no retries. Non-2xx statuses are returned, not raised.
    pub async fn execute(&self, req: &HttpRequest) -> anyhow::Result<HttpResponse> {
        let method = match req.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };
        let mut builder = self
            .inner
            .request(method, &req.url)
            .headers(header_map(&req.headers)?);
        if let Body::Json(json) = &req.body {
            builder = builder.body(json.clone());
        }

        let resp = builder
            .send()
            .await
            .with_context(|| format!("{} {} failed", req.method.as_str(), req.url))?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await.context("read webhook response body")?;

        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}

fn header_map(pairs: &[(String, String)]) -> anyhow::Result<HeaderMap> {
    pairs
        .iter()
        .map(|(k, v)| -> anyhow::Result<(HeaderName, HeaderValue)> {
            let name = HeaderName::from_bytes(k.as_bytes())
                .with_context(|| format!("invalid header name: {k}"))?;
            let value =
                HeaderValue::from_str(v).with_context(|| format!("invalid header value for {k}"))?;
            Ok((name, value))
        })
        .collect()
}
