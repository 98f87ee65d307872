//! Shared types for the response pipeline.

use serde::{Deserialize, Serialize};

use crate::chat::model::CardPayload;

/// Who the signed-in user is, as reported by the surrounding shell.
///
/// Role only varies content (copy, menus, card titles), never control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[serde(alias = "job_seeker")]
    Jobseeker,
    Recruiter,
}

impl Default for UserRole {
    fn default() -> Self {
        Self::Jobseeker
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Jobseeker => write!(f, "jobseeker"),
            Self::Recruiter => write!(f, "recruiter"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "jobseeker" | "job_seeker" | "job-seeker" | "seeker" => Ok(Self::Jobseeker),
            "recruiter" => Ok(Self::Recruiter),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// What the assistant says back: plain text, or text plus an action card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponsePayload {
    Text { content: String },
    Card { content: String, card: CardPayload },
}

impl ResponsePayload {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    pub fn card(content: impl Into<String>, card: CardPayload) -> Self {
        Self::Card {
            content: content.into(),
            card,
        }
    }

    /// The text body, regardless of variant.
    pub fn content(&self) -> &str {
        match self {
            Self::Text { content } | Self::Card { content, .. } => content,
        }
    }

    /// The card, if this payload carries one.
    pub fn as_card(&self) -> Option<&CardPayload> {
        match self {
            Self::Card { card, .. } => Some(card),
            Self::Text { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_common_spellings() {
        assert_eq!("jobseeker".parse::<UserRole>().unwrap(), UserRole::Jobseeker);
        assert_eq!("Job-Seeker".parse::<UserRole>().unwrap(), UserRole::Jobseeker);
        assert_eq!(" RECRUITER ".parse::<UserRole>().unwrap(), UserRole::Recruiter);
        assert!("admin".parse::<UserRole>().is_err());
    }

    #[test]
    fn display_matches_serde() {
        for role in [UserRole::Jobseeker, UserRole::Recruiter] {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(format!("\"{role}\""), json);
        }
    }

    #[test]
    fn text_payload_has_no_card() {
        let payload = ResponsePayload::text("hello");
        assert_eq!(payload.content(), "hello");
        assert!(payload.as_card().is_none());
    }
}
