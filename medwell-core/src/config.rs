use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://willclower.app.n8n.cloud";
pub const DEFAULT_WEBHOOK_PATH: &str = "webhook";
pub const DEFAULT_HISTORY_LIMIT: u32 = 50;
pub const DEFAULT_GUEST_NAME: &str = "Guest";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub webhook_path: String,
    pub history_limit: u32,

    // Sent as `userName` until the user registers with a real name.
    pub guest_name: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            webhook_path: DEFAULT_WEBHOOK_PATH.into(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            guest_name: DEFAULT_GUEST_NAME.into(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Absolute URL of a webhook endpoint.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let prefix = self.webhook_path.trim_matches('/');
        let endpoint = endpoint.trim_start_matches('/');
        if prefix.is_empty() {
            format!("{base}/{endpoint}")
        } else {
            format!("{base}/{prefix}/{endpoint}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_url_handles_slashes() {
        let cfg = ClientConfig::default().with_base_url("https://n8n.example.com/");
        assert_eq!(
            cfg.endpoint_url("/register-user"),
            "https://n8n.example.com/webhook/register-user"
        );
    }

    #[test]
    fn empty_webhook_path_is_skipped() {
        let cfg = ClientConfig {
            webhook_path: "/".into(),
            ..ClientConfig::default().with_base_url("http://127.0.0.1:9000")
        };
        assert_eq!(cfg.endpoint_url("nona_chat"), "http://127.0.0.1:9000/nona_chat");
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: ClientConfig = serde_json::from_str(r#"{"base_url":"http://x"}"#).unwrap();
        assert_eq!(cfg.base_url, "http://x");
        assert_eq!(cfg.webhook_path, "webhook");
        assert_eq!(cfg.history_limit, 50);
        assert_eq!(cfg.guest_name, "Guest");
    }
}
