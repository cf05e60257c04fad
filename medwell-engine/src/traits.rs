use async_trait::async_trait;
use medwell_providers::request::HttpRequest;
use medwell_providers::runtime::{HttpClient, HttpResponse};

/// String key-value persistence for the session (browser local storage, a
/// JSON file, or memory).
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
    fn remove(&self, key: &str) -> anyhow::Result<()>;
}

/// Executes one webhook exchange. Non-2xx statuses are returned, not raised.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, req: &HttpRequest) -> anyhow::Result<HttpResponse>;
}

#[async_trait]
impl Transport for HttpClient {
    async fn execute(&self, req: &HttpRequest) -> anyhow::Result<HttpResponse> {
        HttpClient::execute(self, req).await
    }
}
