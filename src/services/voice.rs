//! Speech recognition.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::VoiceError;

/// Turns a finished voice capture into text.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Recognizer name for logs.
    fn name(&self) -> &str;

    /// Produce the recognized text for the capture that just ended.
    async fn transcribe(&self, language: &str) -> Result<String, VoiceError>;
}

/// Returns canned phrases in rotation. Used until a real recognizer is wired in.
#[derive(Debug)]
pub struct ScriptedRecognizer {
    phrases: Vec<String>,
    next: AtomicUsize,
}

impl ScriptedRecognizer {
    pub fn new(phrases: Vec<String>) -> Self {
        Self {
            phrases,
            next: AtomicUsize::new(0),
        }
    }
}

impl Default for ScriptedRecognizer {
    fn default() -> Self {
        Self::new(vec![
            "I'm looking for software engineering jobs in San Francisco".to_string(),
            "How can I improve my resume?".to_string(),
            "Help me prepare for an interview".to_string(),
        ])
    }
}

#[async_trait]
impl SpeechRecognizer for ScriptedRecognizer {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn transcribe(&self, _language: &str) -> Result<String, VoiceError> {
        if self.phrases.is_empty() {
            return Err(VoiceError::NoSpeech);
        }
        let index = self.next.fetch_add(1, Ordering::Relaxed) % self.phrases.len();
        Ok(self.phrases[index].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rotates_through_phrases() {
        let recognizer = ScriptedRecognizer::new(vec!["a".into(), "b".into()]);
        assert_eq!(recognizer.transcribe("en").await.unwrap(), "a");
        assert_eq!(recognizer.transcribe("en").await.unwrap(), "b");
        assert_eq!(recognizer.transcribe("en").await.unwrap(), "a");
    }

    #[tokio::test]
    async fn empty_script_means_no_speech() {
        let recognizer = ScriptedRecognizer::new(Vec::new());
        assert!(matches!(
            recognizer.transcribe("en").await,
            Err(VoiceError::NoSpeech)
        ));
    }

    #[tokio::test]
    async fn default_script_mentions_jobs() {
        let recognizer = ScriptedRecognizer::default();
        let text = recognizer.transcribe("en").await.unwrap();
        assert!(text.contains("jobs"));
    }
}
