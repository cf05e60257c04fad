use crate::traits::SessionStorage;
use medwell_core::persona::{Persona, generate_user_id};
use medwell_core::token;
use std::sync::Arc;

pub const KEY_TOKEN: &str = "mw_token";
pub const KEY_USER_ID: &str = "mw_user_id";
pub const KEY_ASSISTANT: &str = "mw_assistant";
pub const KEY_USER_NAME: &str = "mw_user_name";

const ALL_KEYS: [&str; 4] = [KEY_TOKEN, KEY_USER_ID, KEY_ASSISTANT, KEY_USER_NAME];

/// Identity, persona selection and credential, written through to storage.
///
/// Storage is best-effort: a failed write is logged and the in-memory value
/// still applies for the rest of the process.
pub struct Session {
    storage: Arc<dyn SessionStorage>,
    user_id: Option<String>,
    assistant: Persona,
    token: Option<String>,
    user_name: Option<String>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("assistant", &self.assistant)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("user_name", &self.user_name)
            .finish()
    }
}

impl Session {
    pub fn load(storage: Arc<dyn SessionStorage>) -> Self {
        let read = |key: &str| storage.get(key).filter(|v| !v.is_empty());

        let assistant = match read(KEY_ASSISTANT) {
            Some(raw) => Persona::parse(&raw).unwrap_or_else(|| {
                log::warn!("unknown stored assistant {raw:?}; using {}", Persona::default());
                Persona::default()
            }),
            None => Persona::default(),
        };

        Self {
            user_id: read(KEY_USER_ID),
            token: read(KEY_TOKEN),
            user_name: read(KEY_USER_NAME),
            assistant,
            storage,
        }
    }

    /// Never empty: generates and persists a temporary id on first access.
    pub fn user_id(&mut self) -> &str {
        let storage = &self.storage;
        self.user_id.get_or_insert_with(|| {
            let id = generate_user_id();
            log::info!("generated temporary user id {id}");
            write_key(storage.as_ref(), KEY_USER_ID, &id);
            id
        })
    }

    pub fn current_assistant(&self) -> Persona {
        self.assistant
    }

    pub fn set_assistant(&mut self, persona: Persona) {
        self.assistant = persona;
        write_key(self.storage.as_ref(), KEY_ASSISTANT, persona.id());
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    pub fn is_token_expired(&self) -> bool {
        token::is_token_expired(self.token())
    }

    pub fn is_token_expired_at(&self, now_ms: u128) -> bool {
        token::is_token_expired_at(self.token(), now_ms)
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && !self.is_token_expired()
    }

    /// Replaces the local identity with the one issued by registration.
    ///
    /// A response without a user id keeps the current one.
    pub fn store_registration(&mut self, token: &str, user_id: Option<&str>, name: Option<&str>) {
        let store = self.storage.as_ref();

        self.token = Some(token.to_string());
        write_key(store, KEY_TOKEN, token);

        if let Some(id) = user_id.filter(|id| !id.is_empty()) {
            self.user_id = Some(id.to_string());
            write_key(store, KEY_USER_ID, id);
        }

        if let Some(name) = name.filter(|n| !n.is_empty()) {
            self.user_name = Some(name.to_string());
            write_key(store, KEY_USER_NAME, name);
        }
    }

    /// Clears every persisted field. Safe to call repeatedly.
    pub fn logout(&mut self) {
        for key in ALL_KEYS {
            if let Err(e) = self.storage.remove(key) {
                log::warn!("failed to clear {key}: {e:#}");
            }
        }
        self.user_id = None;
        self.token = None;
        self.user_name = None;
        self.assistant = Persona::default();
    }
}

fn write_key(storage: &dyn SessionStorage, key: &str, value: &str) {
    if let Err(e) = storage.set(key, value) {
        log::warn!("failed to persist {key}: {e:#}");
    }
}
