use medwell_core::persona::AssistantDescriptor;
use medwell_core::recipe::{Recipe, is_recipe_response, parse_recipe};
use medwell_providers::parse::{ChatBody, HistoryBody, take_message};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const CONNECT_FALLBACK_MESSAGE: &str = "Unable to connect to assistant. Please try again.";

/// Result of a chat or persona operation.
///
/// Base fields are typed; anything else the webhook returned is carried in
/// `extra` and flattened back on serialization.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatEnvelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assistant: Option<AssistantDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_recipe: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe: Option<Recipe>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatEnvelope {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(CONNECT_FALLBACK_MESSAGE.into()),
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// Builds the envelope for a successful chat exchange.
    ///
    /// The recipe classification is computed from the message first; a
    /// boolean `isRecipe` in the payload replaces it.
    pub fn from_chat_body(body: ChatBody) -> Self {
        let (message, mut extra) = match body {
            ChatBody::Json(mut map) => (take_message(&mut map), map),
            ChatBody::Text(text) => (Some(text), Map::new()),
        };

        let computed = message.as_deref().is_some_and(is_recipe_response);
        let is_recipe = match extra.get("isRecipe") {
            Some(Value::Bool(remote)) => *remote,
            _ => computed,
        };
        let recipe = if is_recipe {
            message.as_deref().map(parse_recipe)
        } else {
            None
        };

        let success = take_bool(&mut extra, "success").unwrap_or(true);
        let error = take_string(&mut extra, "error");

        Self {
            success,
            message,
            error,
            assistant: None,
            is_recipe: Some(is_recipe),
            recipe,
            extra: Map::new(),
        }
        .with_extra(extra)
    }

    /// Sets `extra`, dropping raw keys a populated typed field serializes over.
    ///
    /// `assistant` always goes: the local persona is authoritative.
    pub(crate) fn with_extra(mut self, mut extra: Map<String, Value>) -> Self {
        let shadowed = [
            ("success", true),
            ("message", self.message.is_some()),
            ("error", self.error.is_some()),
            ("assistant", true),
            ("isRecipe", self.is_recipe.is_some()),
            ("recipe", self.recipe.is_some()),
        ];
        for (key, drop) in shadowed {
            if drop {
                extra.remove(key);
            }
        }
        self.extra = extra;
        self
    }

    pub fn with_assistant(mut self, assistant: AssistantDescriptor) -> Self {
        self.assistant = Some(assistant);
        self
    }
}

/// Raw webhook reply for register/update-preferences, or a local failure.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RemoteReply {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RemoteReply {
    /// `success` defaults to true: the exchange itself succeeded.
    pub fn from_map(mut map: Map<String, Value>) -> Self {
        Self {
            success: take_bool(&mut map, "success").unwrap_or(true),
            error: take_string(&mut map, "error"),
            extra: map,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            extra: Map::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MessageHistory {
    pub success: bool,
    #[serde(default)]
    pub messages: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MessageHistory {
    pub fn from_body(body: HistoryBody) -> Self {
        match body {
            HistoryBody::Object(map) => Self::from_map(map),
            HistoryBody::Items(messages) => Self {
                success: true,
                messages,
                ..Self::default()
            },
        }
    }

    pub fn from_map(mut map: Map<String, Value>) -> Self {
        let messages = match map.remove("messages") {
            Some(Value::Array(items)) => items,
            _ => vec![],
        };
        Self {
            success: take_bool(&mut map, "success").unwrap_or(true),
            messages,
            error: take_string(&mut map, "error"),
            extra: map,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            messages: vec![],
            error: Some(error.into()),
            extra: Map::new(),
        }
    }
}

fn take_bool(map: &mut Map<String, Value>, key: &str) -> Option<bool> {
    match map.remove(key) {
        Some(Value::Bool(b)) => Some(b),
        _ => None,
    }
}

/// Only a non-empty string is taken; anything else stays in `map`.
fn take_string(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match map.remove(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        Some(other) => {
            map.insert(key.to_string(), other);
            None
        }
        None => None,
    }
}
