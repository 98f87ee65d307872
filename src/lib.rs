//! Hiro — conversational assistant core for the recruitment widget.

pub mod assistant;
pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod services;
pub mod timing;

pub use assistant::{Assistant, AssistantBuilder, VoiceToggle};
