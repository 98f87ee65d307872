//! Ordered keyword rules that map free text to an intent.
//!
//! Rules are tested in insertion order and the first match wins. Order is the
//! only tie-break: a message that mentions both a rejection and a job is
//! classified by whichever rule comes first. Input that matches nothing maps
//! to [`IntentTag::Fallback`], so classification is total.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What a user message is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentTag {
    Motivation,
    ResumeHelp,
    InterviewPrep,
    Salary,
    JobSearch,
    Help,
    Gratitude,
    Greeting,
    Fallback,
}

impl std::fmt::Display for IntentTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Motivation => "motivation",
            Self::ResumeHelp => "resume_help",
            Self::InterviewPrep => "interview_prep",
            Self::Salary => "salary",
            Self::JobSearch => "job_search",
            Self::Help => "help",
            Self::Gratitude => "gratitude",
            Self::Greeting => "greeting",
            Self::Fallback => "fallback",
        };
        write!(f, "{s}")
    }
}

/// A single keyword rule.
#[derive(Debug, Clone)]
pub struct IntentRule {
    /// Intent produced when this rule matches.
    pub tag: IntentTag,
    /// Case-insensitive keyword pattern.
    pub regex: Regex,
    /// Human-readable description of the keywords.
    pub description: String,
}

impl IntentRule {
    /// Build a rule from a list of keywords. Keywords match on word
    /// boundaries, case-insensitively; a trailing `*` allows any suffix.
    pub fn keywords(tag: IntentTag, keywords: &[&str]) -> Result<Self, regex::Error> {
        let alternatives: Vec<String> = keywords
            .iter()
            .map(|k| match k.strip_suffix('*') {
                Some(stem) => format!(r"{}\w*", regex::escape(stem)),
                None => regex::escape(k),
            })
            .collect();
        let pattern = format!(r"(?i)\b(?:{})\b", alternatives.join("|"));
        Ok(Self {
            tag,
            regex: Regex::new(&pattern)?,
            description: keywords.join(", "),
        })
    }
}

/// Keyword-based intent classifier.
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    rules: Vec<IntentRule>,
}

impl IntentClassifier {
    /// Create a classifier with the built-in rule set.
    pub fn default_rules() -> Self {
        let table: &[(IntentTag, &[&str])] = &[
            (
                IntentTag::Motivation,
                &[
                    "discouraged",
                    "frustrat*",
                    "give up",
                    "giving up",
                    "rejected",
                    "rejection*",
                    "hopeless",
                    "depress*",
                    "demotivated",
                    "unmotivated",
                    "no luck",
                    "tired of",
                    "losing hope",
                ],
            ),
            (
                IntentTag::ResumeHelp,
                &["resume*", "résumé*", "cv", "cvs", "curriculum vitae", "cover letter*"],
            ),
            (
                IntentTag::InterviewPrep,
                &["interview*", "mock", "behavioral question*", "star method"],
            ),
            (
                IntentTag::Salary,
                &[
                    "salary",
                    "salaries",
                    "pay",
                    "paid",
                    "compensation",
                    "wage*",
                    "negotiat*",
                    "raise",
                    "offer letter",
                    "equity",
                ],
            ),
            (
                IntentTag::JobSearch,
                &[
                    "job",
                    "jobs",
                    "position*",
                    "opening*",
                    "vacanc*",
                    "role",
                    "roles",
                    "opportunit*",
                    "hiring",
                    "career",
                    "candidate*",
                    "talent",
                ],
            ),
            (
                IntentTag::Help,
                &["help", "stuck", "confused", "how do i", "what can you do", "support"],
            ),
            (
                IntentTag::Gratitude,
                &["thanks", "thank you", "thank*", "thx", "ty", "appreciate*", "cheers"],
            ),
            (
                IntentTag::Greeting,
                &["hi", "hello", "hey", "howdy", "good morning", "good afternoon", "good evening"],
            ),
        ];

        let rules = table
            .iter()
            .map(|(tag, keywords)| {
                IntentRule::keywords(*tag, keywords).expect("built-in intent keywords are valid")
            })
            .collect();

        Self { rules }
    }

    /// Create an empty classifier (every input falls back).
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule at the lowest priority.
    pub fn push_rule(&mut self, rule: IntentRule) {
        self.rules.push(rule);
    }

    /// Insert a rule at a given priority (0 = checked first).
    pub fn insert_rule(&mut self, index: usize, rule: IntentRule) {
        let index = index.min(self.rules.len());
        self.rules.insert(index, rule);
    }

    /// The rules, in evaluation order.
    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }

    /// Classify a message. First matching rule wins; no match is `Fallback`.
    pub fn classify(&self, text: &str) -> IntentTag {
        let normalized = text.to_lowercase();
        for rule in &self.rules {
            if rule.regex.is_match(&normalized) {
                debug!(intent = %rule.tag, rule = %rule.description, "Message matched intent rule");
                return rule.tag;
            }
        }
        IntentTag::Fallback
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::default_rules()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> IntentTag {
        IntentClassifier::default_rules().classify(text)
    }

    #[test]
    fn resume_question() {
        assert_eq!(classify("how can I improve my resume"), IntentTag::ResumeHelp);
        assert_eq!(classify("Can you review my CV?"), IntentTag::ResumeHelp);
    }

    #[test]
    fn job_search_request() {
        assert_eq!(classify("find me a job"), IntentTag::JobSearch);
        assert_eq!(classify("Any remote positions open?"), IntentTag::JobSearch);
    }

    #[test]
    fn interview_and_salary() {
        assert_eq!(classify("I have an interview tomorrow"), IntentTag::InterviewPrep);
        assert_eq!(classify("What salary should I ask for?"), IntentTag::Salary);
        assert_eq!(classify("how do I negotiate"), IntentTag::Salary);
    }

    #[test]
    fn help_gratitude_greeting() {
        assert_eq!(classify("I'm stuck"), IntentTag::Help);
        assert_eq!(classify("thanks a lot!"), IntentTag::Gratitude);
        assert_eq!(classify("Hello there"), IntentTag::Greeting);
    }

    #[test]
    fn motivation_wins_over_later_rules() {
        // Mentions both a rejection and jobs; motivation is ordered first.
        assert_eq!(
            classify("I keep getting rejected from every job"),
            IntentTag::Motivation
        );
    }

    #[test]
    fn keywords_match_on_word_boundaries() {
        // "this" contains "hi", "payment" contains "pay"; neither should match.
        assert_eq!(classify("this is it"), IntentTag::Fallback);
        assert_eq!(classify("payment"), IntentTag::Fallback);
    }

    #[test]
    fn is_case_insensitive() {
        assert_eq!(classify("FIND ME A JOB"), IntentTag::JobSearch);
        assert_eq!(classify("Résumé tips"), IntentTag::ResumeHelp);
    }

    #[test]
    fn degenerate_inputs_fall_back() {
        let long = "lorem ipsum ".repeat(10_000);
        for text in ["", "   ", "🙂🙂🙂", "???", long.as_str()] {
            assert_eq!(classify(text), IntentTag::Fallback);
        }
    }

    #[test]
    fn classification_is_deterministic() {
        let classifier = IntentClassifier::default_rules();
        for text in ["find me a job", "thanks", "nothing relevant"] {
            assert_eq!(classifier.classify(text), classifier.classify(text));
        }
    }

    #[test]
    fn empty_classifier_falls_back() {
        assert_eq!(IntentClassifier::empty().classify("find me a job"), IntentTag::Fallback);
    }

    #[test]
    fn inserted_rule_takes_priority() {
        let mut classifier = IntentClassifier::default_rules();
        classifier.insert_rule(0, IntentRule::keywords(IntentTag::Gratitude, &["job"]).unwrap());
        assert_eq!(classifier.classify("find me a job"), IntentTag::Gratitude);
    }

    #[test]
    fn pushed_rule_is_checked_last() {
        let mut classifier = IntentClassifier::empty();
        classifier.push_rule(IntentRule::keywords(IntentTag::Help, &["assist*"]).unwrap());
        classifier.push_rule(IntentRule::keywords(IntentTag::Greeting, &["assistance"]).unwrap());
        assert_eq!(classifier.classify("need assistance"), IntentTag::Help);
        assert_eq!(classifier.rules().len(), 2);
    }
}
