//! Conversation session — the single source of truth for one mounted widget.
//!
//! The message log is append-only: there is no API to edit or remove a
//! message once appended. Feedback lives in a side table keyed by id.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use super::model::{Message, MessageFeedback, Rating, Sender};
use super::settings::ChatSettings;
use super::state::WidgetState;
use crate::error::SessionError;

/// Result of a successful state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: WidgetState,
    pub to: WidgetState,
    /// The widget opened with an empty log and needs its greeting.
    pub needs_greeting: bool,
}

/// Read-only copy of the session for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub messages: Vec<Message>,
    pub state: WidgetState,
    pub is_typing: bool,
    pub is_listening: bool,
    pub unread_count: u32,
    pub settings: ChatSettings,
    pub draft: String,
    #[serde(default)]
    pub feedback: HashMap<Uuid, MessageFeedback>,
}

impl SessionSnapshot {
    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    pub fn is_minimized(&self) -> bool {
        self.state.is_minimized()
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}

/// Conversation state for one widget instance.
#[derive(Debug, Clone, Default)]
pub struct ConversationSession {
    messages: Vec<Message>,
    state: WidgetState,
    is_typing: bool,
    is_listening: bool,
    unread_count: u32,
    settings: ChatSettings,
    draft: String,
    feedback: HashMap<Uuid, MessageFeedback>,
    next_seq: u64,
}

impl ConversationSession {
    /// Create an empty, closed session.
    pub fn new(settings: ChatSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn state(&self) -> WidgetState {
        self.state
    }

    pub fn is_typing(&self) -> bool {
        self.is_typing
    }

    pub fn is_listening(&self) -> bool {
        self.is_listening
    }

    pub fn unread_count(&self) -> u32 {
        self.unread_count
    }

    pub fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Set the typing flag. Returns true if it changed.
    pub fn set_typing(&mut self, typing: bool) -> bool {
        std::mem::replace(&mut self.is_typing, typing) != typing
    }

    /// Set the listening flag. Returns true if it changed.
    pub fn set_listening(&mut self, listening: bool) -> bool {
        std::mem::replace(&mut self.is_listening, listening) != listening
    }

    pub fn set_settings(&mut self, settings: ChatSettings) {
        self.settings = settings;
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    /// Take the draft, leaving the input field empty.
    pub fn take_draft(&mut self) -> String {
        std::mem::take(&mut self.draft)
    }

    /// Append a message, assigning its sequence number.
    ///
    /// Assistant messages that arrive while Closed bump the unread count.
    pub fn append(&mut self, mut message: Message) -> &Message {
        message.seq = self.next_seq;
        self.next_seq += 1;

        if message.sender == Sender::Assistant && self.state.counts_unread() {
            self.unread_count += 1;
        }

        debug!(
            message_id = %message.id,
            seq = message.seq,
            sender = %message.sender,
            state = %self.state,
            "Message appended"
        );

        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    /// Move the widget to `target`.
    ///
    /// Re-entering the current state is a no-op and returns `Ok(None)`.
    /// Opening resets the unread count.
    pub fn transition(&mut self, target: WidgetState) -> Result<Option<Transition>, SessionError> {
        if self.state == target {
            return Ok(None);
        }
        if !self.state.can_transition_to(target) {
            return Err(SessionError::InvalidTransition {
                from: self.state,
                to: target,
            });
        }

        let from = std::mem::replace(&mut self.state, target);
        if target.is_open() {
            self.unread_count = 0;
        }

        info!(from = %from, to = %target, "Widget state changed");

        Ok(Some(Transition {
            from,
            to: target,
            needs_greeting: target.is_open() && self.messages.is_empty(),
        }))
    }

    fn ensure_message(&self, id: Uuid) -> Result<(), SessionError> {
        if self.messages.iter().any(|m| m.id == id) {
            Ok(())
        } else {
            Err(SessionError::UnknownMessage(id))
        }
    }

    /// Add a reaction to a message. Duplicate reactions are ignored.
    pub fn react(&mut self, id: Uuid, reaction: impl Into<String>) -> Result<&MessageFeedback, SessionError> {
        self.ensure_message(id)?;
        let reaction = reaction.into();
        let entry = self.feedback.entry(id).or_default();
        if !entry.reactions.contains(&reaction) {
            entry.reactions.push(reaction);
        }
        Ok(entry)
    }

    /// Rate a message, replacing any previous rating.
    pub fn rate(&mut self, id: Uuid, rating: Rating) -> Result<&MessageFeedback, SessionError> {
        self.ensure_message(id)?;
        let entry = self.feedback.entry(id).or_default();
        entry.rating = Some(rating);
        Ok(entry)
    }

    pub fn feedback(&self, id: Uuid) -> Option<&MessageFeedback> {
        self.feedback.get(&id)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            messages: self.messages.clone(),
            state: self.state,
            is_typing: self.is_typing,
            is_listening: self.is_listening,
            unread_count: self.unread_count,
            settings: self.settings.clone(),
            draft: self.draft.clone(),
            feedback: self.feedback.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::model::Message;

    fn session() -> ConversationSession {
        ConversationSession::new(ChatSettings::default())
    }

    #[test]
    fn new_session_is_closed_and_empty() {
        let s = session();
        assert_eq!(s.state(), WidgetState::Closed);
        assert!(s.messages().is_empty());
        assert!(!s.is_typing());
        assert!(!s.is_listening());
        assert_eq!(s.unread_count(), 0);
    }

    #[test]
    fn append_assigns_increasing_seq() {
        let mut s = session();
        let a = s.append(Message::user("a")).seq;
        let b = s.append(Message::user("b")).seq;
        let c = s.append(Message::assistant_text("c")).seq;
        assert!(a < b && b < c);
        assert_eq!(s.messages().len(), 3);
    }

    #[test]
    fn appended_messages_never_change() {
        let mut s = session();
        s.transition(WidgetState::Open).unwrap();
        let first = s.append(Message::user("first")).clone();
        for i in 0..10 {
            s.append(Message::assistant_text(format!("reply {i}")));
        }
        s.rate(first.id, Rating::Up).unwrap();
        assert_eq!(s.messages()[0], first);
    }

    #[test]
    fn unread_counts_only_assistant_messages_while_closed() {
        let mut s = session();
        s.append(Message::assistant_text("one"));
        s.append(Message::user("from user"));
        s.append(Message::assistant_text("two"));
        assert_eq!(s.unread_count(), 2);

        s.transition(WidgetState::Open).unwrap();
        assert_eq!(s.unread_count(), 0);
        s.append(Message::assistant_text("while open"));
        assert_eq!(s.unread_count(), 0);

        s.transition(WidgetState::Minimized).unwrap();
        s.append(Message::assistant_text("while minimized"));
        assert_eq!(s.unread_count(), 0);

        s.transition(WidgetState::Closed).unwrap();
        s.append(Message::assistant_text("while closed"));
        assert_eq!(s.unread_count(), 1);
    }

    #[test]
    fn first_open_requests_greeting() {
        let mut s = session();
        let t = s.transition(WidgetState::Open).unwrap().unwrap();
        assert!(t.needs_greeting);
        s.append(Message::assistant_text("hello"));

        s.transition(WidgetState::Closed).unwrap();
        let t = s.transition(WidgetState::Open).unwrap().unwrap();
        assert!(!t.needs_greeting);
    }

    #[test]
    fn same_state_is_noop() {
        let mut s = session();
        assert!(s.transition(WidgetState::Closed).unwrap().is_none());
    }

    #[test]
    fn closed_to_minimized_is_rejected() {
        let mut s = session();
        let err = s.transition(WidgetState::Minimized).unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidTransition {
                from: WidgetState::Closed,
                to: WidgetState::Minimized
            }
        ));
        assert_eq!(s.state(), WidgetState::Closed);
    }

    #[test]
    fn flags_report_changes() {
        let mut s = session();
        assert!(s.set_typing(true));
        assert!(!s.set_typing(true));
        assert!(s.set_typing(false));
        assert!(s.set_listening(true));
        assert!(!s.set_listening(true));
    }

    #[test]
    fn draft_take_clears() {
        let mut s = session();
        s.set_draft("hello");
        assert_eq!(s.take_draft(), "hello");
        assert_eq!(s.draft(), "");
    }

    #[test]
    fn reactions_deduplicate() {
        let mut s = session();
        let id = s.append(Message::assistant_text("tip")).id;
        s.react(id, "🔥").unwrap();
        s.react(id, "🔥").unwrap();
        s.react(id, "👏").unwrap();
        assert_eq!(s.feedback(id).unwrap().reactions, vec!["🔥", "👏"]);
    }

    #[test]
    fn feedback_on_unknown_message_fails() {
        let mut s = session();
        let missing = Uuid::new_v4();
        assert!(matches!(
            s.rate(missing, Rating::Down),
            Err(SessionError::UnknownMessage(id)) if id == missing
        ));
        assert!(s.feedback(missing).is_none());
    }

    #[test]
    fn snapshot_reflects_state() {
        let mut s = session();
        s.transition(WidgetState::Open).unwrap();
        s.append(Message::user("hi"));
        s.set_typing(true);
        let snap = s.snapshot();
        assert!(snap.is_open());
        assert!(snap.is_typing);
        assert_eq!(snap.last_message().unwrap().content, "hi");
    }
}
