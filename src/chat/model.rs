//! Chat message model — messages, card payloads, and feedback annotations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pipeline::actions::ActionKey;
use crate::pipeline::types::ResponsePayload;

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Assistant,
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// How a message renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Text,
    Card,
    Carousel,
    Form,
    System,
}

/// A follow-up button on a card. The key is always dispatchable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardAction {
    pub label: String,
    pub action: ActionKey,
}

impl CardAction {
    /// A button labelled with the action's default label.
    pub fn from_key(action: ActionKey) -> Self {
        Self {
            label: action.label().to_string(),
            action,
        }
    }
}

/// A structured card: title, description, and follow-up actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPayload {
    pub title: String,
    pub description: String,
    pub actions: Vec<CardAction>,
}

/// A single field in a form payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub required: bool,
}

/// Structured data attached to non-text messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessagePayload {
    Card(CardPayload),
    Carousel { cards: Vec<CardPayload> },
    Form { fields: Vec<FormField> },
    System { code: String },
}

impl MessagePayload {
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::Card(_) => MessageKind::Card,
            Self::Carousel { .. } => MessageKind::Carousel,
            Self::Form { .. } => MessageKind::Form,
            Self::System { .. } => MessageKind::System,
        }
    }
}

/// A chat message. Immutable once appended to a session.
///
/// `kind` is derived from `payload`: a message has a payload iff it is not
/// plain text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    /// Position in the session log, assigned on append (0 until then).
    pub seq: u64,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    pub kind: MessageKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<MessagePayload>,
}

impl Message {
    fn build(sender: Sender, content: String, payload: Option<MessagePayload>) -> Self {
        let kind = payload
            .as_ref()
            .map(MessagePayload::kind)
            .unwrap_or(MessageKind::Text);
        Self {
            id: Uuid::new_v4(),
            seq: 0,
            content,
            sender,
            timestamp: Utc::now(),
            kind,
            payload,
        }
    }

    /// A plain-text message from the user.
    pub fn user(content: impl Into<String>) -> Self {
        Self::build(Sender::User, content.into(), None)
    }

    /// A plain-text message from the assistant.
    pub fn assistant_text(content: impl Into<String>) -> Self {
        Self::build(Sender::Assistant, content.into(), None)
    }

    /// An assistant message built from a pipeline response.
    pub fn from_response(response: ResponsePayload) -> Self {
        match response {
            ResponsePayload::Text { content } => Self::assistant_text(content),
            ResponsePayload::Card { content, card } => {
                Self::build(Sender::Assistant, content, Some(MessagePayload::Card(card)))
            }
        }
    }

    /// An assistant-side system notice tagged with a machine-readable code.
    pub fn system(content: impl Into<String>, code: impl Into<String>) -> Self {
        Self::build(
            Sender::Assistant,
            content.into(),
            Some(MessagePayload::System { code: code.into() }),
        )
    }

    /// The card payload, if this is a card message.
    pub fn card(&self) -> Option<&CardPayload> {
        match &self.payload {
            Some(MessagePayload::Card(card)) => Some(card),
            _ => None,
        }
    }

    /// Display time, e.g. "14:05".
    pub fn display_time(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }
}

/// Thumbs up / thumbs down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Up,
    Down,
}

impl std::str::FromStr for Rating {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "up" | "+" | "👍" => Ok(Self::Up),
            "down" | "-" | "👎" => Ok(Self::Down),
            other => Err(format!("Unknown rating: {}", other)),
        }
    }
}

/// User feedback on a message, kept beside the log so messages stay immutable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageFeedback {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reactions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job_card() -> CardPayload {
        CardPayload {
            title: "Job Search Assistant".into(),
            description: "Let's find roles".into(),
            actions: vec![CardAction::from_key(ActionKey::SearchJobs)],
        }
    }

    #[test]
    fn text_messages_have_no_payload() {
        let user = Message::user("hi");
        assert_eq!(user.sender, Sender::User);
        assert_eq!(user.kind, MessageKind::Text);
        assert!(user.payload.is_none());

        let reply = Message::from_response(ResponsePayload::text("hello"));
        assert_eq!(reply.sender, Sender::Assistant);
        assert_eq!(reply.kind, MessageKind::Text);
        assert!(reply.payload.is_none());
    }

    #[test]
    fn card_response_becomes_card_message() {
        let msg = Message::from_response(ResponsePayload::card("Sure!", job_card()));
        assert_eq!(msg.kind, MessageKind::Card);
        assert_eq!(msg.content, "Sure!");
        assert_eq!(msg.card().unwrap().title, "Job Search Assistant");
    }

    #[test]
    fn system_message_carries_payload() {
        let msg = Message::system("Conversation started", "session_start");
        assert_eq!(msg.kind, MessageKind::System);
        assert!(msg.card().is_none());
        assert!(msg.payload.is_some());
    }

    #[test]
    fn ids_are_unique() {
        let a = Message::user("a");
        let b = Message::user("a");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn card_serializes_action_keys_as_strings() {
        let msg = Message::from_response(ResponsePayload::card("Sure!", job_card()));
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["kind"], "card");
        assert_eq!(json["payload"]["type"], "card");
        assert_eq!(json["payload"]["actions"][0]["action"], "search_jobs");
    }

    #[test]
    fn rating_parses() {
        assert_eq!("up".parse::<Rating>().unwrap(), Rating::Up);
        assert_eq!("👎".parse::<Rating>().unwrap(), Rating::Down);
        assert!("sideways".parse::<Rating>().is_err());
    }

    #[test]
    fn empty_feedback_serializes_compactly() {
        let json = serde_json::to_string(&MessageFeedback::default()).unwrap();
        assert_eq!(json, "{}");
    }
}
