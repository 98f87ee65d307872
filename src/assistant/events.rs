//! Outbound events from the assistant core to the presentation shell.

use serde::{Deserialize, Serialize};

use crate::chat::model::Message;
use crate::chat::settings::ChatSettings;
use crate::chat::state::WidgetState;

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
}

/// A fire-and-forget request for the shell to show a toast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Warning,
            message: message.into(),
        }
    }
}

/// Everything the shell may want to re-render or present.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WidgetEvent {
    /// A message was appended to the transcript.
    MessageAppended { message: Message },
    /// The widget moved between Closed / Open / Minimized.
    StateChanged { from: WidgetState, to: WidgetState },
    /// Typing indicator toggled.
    TypingChanged { typing: bool },
    /// Voice capture started or stopped.
    ListeningChanged { listening: bool },
    /// The input field text changed (voice result, submit).
    DraftChanged { draft: String },
    /// Unread badge count changed.
    UnreadChanged { count: u32 },
    /// Settings were updated.
    SettingsChanged { settings: ChatSettings },
    /// Scroll the transcript to the newest message.
    ScrollToLatest,
    /// Show a toast.
    Notification { notification: Notification },
}
