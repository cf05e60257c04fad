use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Backend personality a chat session is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    #[default]
    Nona,
    Dundee,
    Chiara,
    Lina,
}

impl Persona {
    pub const ALL: [Persona; 4] = [Persona::Nona, Persona::Dundee, Persona::Chiara, Persona::Lina];

    /// Stable wire/storage id.
    pub fn id(self) -> &'static str {
        match self {
            Persona::Nona => "nona",
            Persona::Dundee => "dundee",
            Persona::Chiara => "chiara",
            Persona::Lina => "lina",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.id().eq_ignore_ascii_case(value))
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Persona::Nona => "Nona",
            Persona::Dundee => "Dundee",
            Persona::Chiara => "Chiara",
            Persona::Lina => "Lina",
        }
    }

    pub fn default_greeting(self) -> &'static str {
        match self {
            Persona::Nona => "Ciao bella! Ready to cook something delicious today?",
            Persona::Dundee => "Hey there! Ready to crush your workout today?",
            Persona::Chiara => "Welcome. Let's find some peace together.",
            Persona::Lina => "Hi! Let's create a nutrition plan that works for you.",
        }
    }

    /// Webhook endpoint that serves this persona's chat.
    pub fn chat_endpoint(self) -> String {
        format!("{}_chat", self.id())
    }

    pub fn descriptor(self) -> AssistantDescriptor {
        AssistantDescriptor {
            id: self,
            name: self.display_name().to_string(),
            greeting: self.default_greeting().to_string(),
        }
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// What the UI shows for the active persona.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantDescriptor {
    pub id: Persona,
    pub name: String,
    pub greeting: String,
}

impl AssistantDescriptor {
    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = greeting.into();
        self
    }
}

/// Temporary identity used before registration: `user_<unix-ms>_<9 chars>`.
pub fn generate_user_id() -> String {
    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(9).collect();
    format!("user_{now_ms}_{suffix}")
}
