//! Response pipeline.
//!
//! Free text flows through:
//! 1. `IntentClassifier::classify()` — ordered keyword rules, first match wins
//! 2. `ResponseGenerator::generate()` — intent + role → text or card
//!
//! Quick actions and card buttons skip both steps and go straight to
//! `QuickActionDispatcher::dispatch()`. Every step is total: unknown input
//! degrades to a fallback reply, never an error.

pub mod actions;
pub mod generator;
pub mod rules;
pub mod types;

pub use actions::{ActionKey, QuickAction, QuickActionDispatcher};
pub use generator::ResponseGenerator;
pub use rules::{IntentClassifier, IntentRule, IntentTag};
pub use types::{ResponsePayload, UserRole};
