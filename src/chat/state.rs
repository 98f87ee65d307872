//! Widget visibility state machine.

use serde::{Deserialize, Serialize};

/// Visible states of the chat widget.
///
/// Closed → Open, Open ⇄ Minimized, and both Open and Minimized → Closed.
/// Transitions are only ever user-triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetState {
    /// Only the floating trigger (with unread badge) is visible.
    Closed,
    /// Transcript and input surface visible.
    Open,
    /// Header bar only. Counts as "seen" for unread purposes.
    Minimized,
}

impl WidgetState {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: WidgetState) -> bool {
        use WidgetState::*;
        matches!(
            (self, target),
            (Closed, Open) | (Open, Minimized) | (Minimized, Open) | (Open, Closed) | (Minimized, Closed)
        )
    }

    /// Whether assistant messages arriving now count as unread.
    pub fn counts_unread(&self) -> bool {
        matches!(self, Self::Closed)
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }

    pub fn is_minimized(&self) -> bool {
        matches!(self, Self::Minimized)
    }
}

impl Default for WidgetState {
    fn default() -> Self {
        Self::Closed
    }
}

impl std::fmt::Display for WidgetState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Closed => "closed",
            Self::Open => "open",
            Self::Minimized => "minimized",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_transitions() {
        use WidgetState::*;
        let transitions = [
            (Closed, Open),
            (Open, Minimized),
            (Minimized, Open),
            (Open, Closed),
            (Minimized, Closed),
        ];
        for (from, to) in transitions {
            assert!(from.can_transition_to(to), "{from} should transition to {to}");
        }
    }

    #[test]
    fn invalid_transitions() {
        use WidgetState::*;
        assert!(!Closed.can_transition_to(Minimized));
        assert!(!Closed.can_transition_to(Closed));
        assert!(!Open.can_transition_to(Open));
    }

    #[test]
    fn only_closed_counts_unread() {
        assert!(WidgetState::Closed.counts_unread());
        assert!(!WidgetState::Open.counts_unread());
        assert!(!WidgetState::Minimized.counts_unread());
    }

    #[test]
    fn starts_closed() {
        assert_eq!(WidgetState::default(), WidgetState::Closed);
    }

    #[test]
    fn display_matches_serde() {
        use WidgetState::*;
        for state in [Closed, Open, Minimized] {
            let json = serde_json::to_string(&state).unwrap();
            assert_eq!(format!("\"{state}\""), json);
        }
    }
}
