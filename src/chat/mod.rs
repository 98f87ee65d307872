//! Conversation state: messages, widget state machine, session store, settings.

pub mod model;
pub mod session;
pub mod settings;
pub mod state;

pub use model::{CardAction, CardPayload, Message, MessageFeedback, MessageKind, MessagePayload, Rating, Sender};
pub use session::{ConversationSession, SessionSnapshot, Transition};
pub use settings::{ChatSettings, JsonFileSettingsStore, MemorySettingsStore, SettingsStore, Theme};
pub use state::WidgetState;
