use crate::envelope::{ChatEnvelope, MessageHistory, RemoteReply};
use crate::session::Session;
use crate::traits::{SessionStorage, Transport};
use medwell_core::config::ClientConfig;
use medwell_core::persona::Persona;
use medwell_providers::parse::{parse_chat_body, parse_history_body, parse_json_object};
use medwell_providers::request::HttpRequest;
use medwell_providers::webhook::{
    ChatInput, build_chat_request, build_message_history_request, build_register_request,
    build_select_assistant_request, build_update_preferences_request,
};
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;

/// Why a webhook exchange produced no usable body.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0:#}")]
    Transport(anyhow::Error),
    #[error("HTTP {status}")]
    Status { status: u16 },
    #[error("invalid response body: {0:#}")]
    Decode(anyhow::Error),
}

/// The client context: construct once, hand to whatever needs to talk to
/// the assistants.
///
/// Every remote operation makes exactly one attempt and reports failures in
/// its return value; nothing here returns `Err`.
pub struct WellnessClient {
    cfg: ClientConfig,
    session: Session,
    transport: Arc<dyn Transport>,
}

impl WellnessClient {
    pub fn new(
        cfg: ClientConfig,
        storage: Arc<dyn SessionStorage>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            cfg,
            session: Session::load(storage),
            transport,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.cfg
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn user_id(&mut self) -> &str {
        self.session.user_id()
    }

    pub fn current_assistant(&self) -> Persona {
        self.session.current_assistant()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn is_token_expired(&self) -> bool {
        self.session.is_token_expired()
    }

    pub fn logout(&mut self) {
        self.session.logout();
    }

    /// Sends one chat message to the current persona.
    pub async fn send_message(&mut self, text: &str) -> ChatEnvelope {
        let persona = self.session.current_assistant();
        let user_id = self.session.user_id().to_string();
        let user_name = self
            .session
            .user_name()
            .unwrap_or(self.cfg.guest_name.as_str())
            .to_string();

        let req = build_chat_request(
            &self.cfg,
            self.session.token(),
            persona,
            &ChatInput {
                text,
                user_id: &user_id,
                session_id: &user_id,
                user_name: &user_name,
            },
        );

        match self.exchange(&req).await {
            Ok(body) => ChatEnvelope::from_chat_body(parse_chat_body(&body))
                .with_assistant(persona.descriptor()),
            Err(e) => {
                log::error!("send message to {persona} failed: {e}");
                ChatEnvelope::failure(e.to_string())
            }
        }
    }

    /// Switches persona. The local selection always sticks, whatever the
    /// webhook says.
    pub async fn switch_assistant(&mut self, persona: Persona) -> ChatEnvelope {
        let user_id = self.session.user_id().to_string();
        let req =
            build_select_assistant_request(&self.cfg, self.session.token(), &user_id, persona);
        let outcome = self.exchange_json(&req).await;

        self.session.set_assistant(persona);
        let descriptor = persona.descriptor();

        match outcome {
            Ok(mut extra) => {
                let descriptor = match extra.remove("greeting") {
                    Some(Value::String(g)) if !g.is_empty() => descriptor.with_greeting(g),
                    _ => descriptor,
                };
                ChatEnvelope {
                    success: true,
                    ..ChatEnvelope::default()
                }
                .with_extra(extra)
                .with_assistant(descriptor)
            }
            Err(e) => {
                log::warn!("select-assistant failed, switched to {persona} locally: {e}");
                ChatEnvelope {
                    success: true,
                    ..ChatEnvelope::default()
                }
                .with_assistant(descriptor)
            }
        }
    }

    /// Registers a user; on `success` with a token, adopts the returned identity.
    pub async fn register(&mut self, email: &str, name: &str, preferences: &Value) -> RemoteReply {
        let req = build_register_request(&self.cfg, email, name, preferences);
        let map = match self.exchange_json(&req).await {
            Ok(map) => map,
            Err(e) => {
                log::error!("registration failed: {e}");
                return RemoteReply::failure(e.to_string());
            }
        };

        let confirmed = map.get("success").and_then(Value::as_bool) == Some(true);
        let token = map.get("token").and_then(Value::as_str).filter(|t| !t.is_empty());
        if let (true, Some(token)) = (confirmed, token) {
            let user_id = map.get("user_id").and_then(id_string);
            self.session
                .store_registration(token, user_id.as_deref(), Some(name));
            log::info!("registered; adopted server-issued identity");
        }

        RemoteReply::from_map(map)
    }

    pub async fn update_preferences(&mut self, preferences: &Value) -> RemoteReply {
        let user_id = self.session.user_id().to_string();
        let req =
            build_update_preferences_request(&self.cfg, self.session.token(), &user_id, preferences);
        match self.exchange_json(&req).await {
            Ok(map) => RemoteReply::from_map(map),
            Err(e) => {
                log::error!("update preferences failed: {e}");
                RemoteReply::failure(e.to_string())
            }
        }
    }

    /// Fetches recent messages; `None` uses the configured limit.
    pub async fn message_history(&mut self, limit: Option<u32>) -> MessageHistory {
        let limit = limit.unwrap_or(self.cfg.history_limit);
        let user_id = self.session.user_id().to_string();
        let req = build_message_history_request(&self.cfg, self.session.token(), &user_id, limit);
        let outcome = self
            .exchange(&req)
            .await
            .and_then(|body| parse_history_body(&body).map_err(ClientError::Decode));
        match outcome {
            Ok(body) => MessageHistory::from_body(body),
            Err(e) => {
                log::error!("get message history failed: {e}");
                MessageHistory::failure(e.to_string())
            }
        }
    }

    async fn exchange(&self, req: &HttpRequest) -> Result<Vec<u8>, ClientError> {
        log::debug!("webhook request: {req:?}");
        let resp = self
            .transport
            .execute(req)
            .await
            .map_err(ClientError::Transport)?;
        if !resp.is_success() {
            return Err(ClientError::Status {
                status: resp.status,
            });
        }
        Ok(resp.body)
    }

    async fn exchange_json(&self, req: &HttpRequest) -> Result<Map<String, Value>, ClientError> {
        let body = self.exchange(req).await?;
        parse_json_object(&body).map_err(ClientError::Decode)
    }
}

/// Server ids may arrive as strings or numbers.
fn id_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
