use crate::request::HttpRequest;
use medwell_core::config::ClientConfig;
use medwell_core::persona::Persona;
use serde_json::{Value, json};

pub const SELECT_ASSISTANT: &str = "select-assistant";
pub const REGISTER_USER: &str = "register-user";
pub const UPDATE_PREFERENCES: &str = "update-preferences";
pub const MESSAGE_HISTORY: &str = "message-history";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatInput<'a> {
    pub text: &'a str,
    pub user_id: &'a str,
    pub session_id: &'a str,
    pub user_name: &'a str,
}

pub fn build_chat_request(
    cfg: &ClientConfig,
    token: Option<&str>,
    persona: Persona,
    input: &ChatInput<'_>,
) -> HttpRequest {
    let payload = json!({
        "chatInput": input.text,
        "userId": input.user_id,
        "sessionId": input.session_id,
        "userName": input.user_name,
    });
    HttpRequest::post_json(cfg.endpoint_url(&persona.chat_endpoint()), &payload).with_bearer(token)
}

pub fn build_select_assistant_request(
    cfg: &ClientConfig,
    token: Option<&str>,
    user_id: &str,
    persona: Persona,
) -> HttpRequest {
    let payload = json!({
        "user_id": user_id,
        "assistant_id": persona.id(),
    });
    HttpRequest::post_json(cfg.endpoint_url(SELECT_ASSISTANT), &payload).with_bearer(token)
}

/// Registration is anonymous: no bearer header even if a stale token exists.
pub fn build_register_request(
    cfg: &ClientConfig,
    email: &str,
    name: &str,
    preferences: &Value,
) -> HttpRequest {
    let payload = json!({
        "email": email,
        "name": name,
        "preferences": preferences,
    });
    HttpRequest::post_json(cfg.endpoint_url(REGISTER_USER), &payload)
}

pub fn build_update_preferences_request(
    cfg: &ClientConfig,
    token: Option<&str>,
    user_id: &str,
    preferences: &Value,
) -> HttpRequest {
    let payload = json!({
        "user_id": user_id,
        "preferences": preferences,
    });
    HttpRequest::post_json(cfg.endpoint_url(UPDATE_PREFERENCES), &payload).with_bearer(token)
}

pub fn build_message_history_request(
    cfg: &ClientConfig,
    token: Option<&str>,
    user_id: &str,
    limit: u32,
) -> HttpRequest {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("user_id", user_id)
        .append_pair("limit", &limit.to_string())
        .finish();
    let url = format!("{}?{}", cfg.endpoint_url(MESSAGE_HISTORY), query);
    HttpRequest::get(url).with_bearer(token)
}
