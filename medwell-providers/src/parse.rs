use anyhow::{Context, anyhow};
use serde_json::{Map, Value};

/// Fields that may carry the assistant's reply, in priority order.
const MESSAGE_FIELDS: [&str; 5] = ["output", "message", "response", "assistant_message", "text"];

/// A chat webhook reply: either a JSON object or literal message text.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatBody {
    Json(Map<String, Value>),
    Text(String),
}

/// JSON first, plain text on any parse failure.
///
/// n8n "respond with all items" wraps the object in an array; the first item
/// is used. A bare JSON string is treated as the message itself.
pub fn parse_chat_body(body: &[u8]) -> ChatBody {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => ChatBody::Json(map),
        Ok(Value::Array(items)) => match items.into_iter().next() {
            Some(Value::Object(map)) => ChatBody::Json(map),
            _ => ChatBody::Text(String::from_utf8_lossy(body).trim().to_string()),
        },
        Ok(Value::String(s)) => ChatBody::Text(s),
        _ => ChatBody::Text(String::from_utf8_lossy(body).trim().to_string()),
    }
}

/// Removes and returns the first non-empty string reply field.
pub fn take_message(map: &mut Map<String, Value>) -> Option<String> {
    let key = MESSAGE_FIELDS
        .iter()
        .copied()
        .find(|k| map.get(*k).and_then(Value::as_str).is_some_and(|s| !s.is_empty()))?;
    match map.remove(key) {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}

/// A message-history reply.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryBody {
    /// `{"messages": [...], ...}`
    Object(Map<String, Value>),
    /// n8n "all items": the messages themselves, unwrapped.
    Items(Vec<Value>),
}

pub fn parse_history_body(body: &[u8]) -> anyhow::Result<HistoryBody> {
    match decode_json(body)? {
        Value::Object(map) => Ok(HistoryBody::Object(map)),
        Value::Array(items) => Ok(HistoryBody::Items(items)),
        other => Err(anyhow!("expected JSON object or array, got {}", json_kind(&other))),
    }
}

/// Strict object decode for endpoints that always answer JSON.
pub fn parse_json_object(body: &[u8]) -> anyhow::Result<Map<String, Value>> {
    match decode_json(body)? {
        Value::Object(map) => Ok(map),
        Value::Array(items) => match items.into_iter().next() {
            Some(Value::Object(map)) => Ok(map),
            _ => Err(anyhow!("webhook JSON array has no object item")),
        },
        other => Err(anyhow!("expected JSON object, got {}", json_kind(&other))),
    }
}

fn decode_json(body: &[u8]) -> anyhow::Result<Value> {
    serde_json::from_slice(body).context("decode webhook JSON")
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
