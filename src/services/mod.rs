//! Stand-ins for external services the widget depends on.
//!
//! Speech-to-text and document analysis are simulated. Each sits behind a
//! trait so a real implementation only replaces how the task resolves, not
//! the widget state machine around it.

pub mod attachment;
pub mod voice;

pub use attachment::{Attachment, AttachmentAcknowledger, TemplateAcknowledger};
pub use voice::{ScriptedRecognizer, SpeechRecognizer};
