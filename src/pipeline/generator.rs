//! Response generator — intent + role → text or card payload.
//!
//! Greeting, motivation, gratitude and fallback copy is picked from a small
//! set of variants using the caller's RNG, so a seeded RNG gives repeatable
//! output. Job search and interview intents produce cards whose actions are
//! [`ActionKey`]s and therefore always dispatchable.

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use super::actions::ActionKey;
use super::rules::IntentTag;
use super::types::{ResponsePayload, UserRole};
use crate::chat::model::{CardAction, CardPayload};

const SEEKER_GREETINGS: &[&str] = &[
    "Hi there! 👋 I'm {name}, your career assistant. I can help you find jobs, polish your resume, and prepare for interviews. What would you like to do today?",
    "Hello! I'm {name} 😊 Looking for your next role? Ask me about job search, resumes, interviews or salaries.",
    "Hey! {name} here. Let's get your job search moving. Pick a quick action below or just tell me what you need.",
];

const RECRUITER_GREETINGS: &[&str] = &[
    "Hi there! 👋 I'm {name}, your recruiting assistant. I can help you post jobs, screen candidates, and track your pipeline. What can I do for you?",
    "Hello! I'm {name} 😊 Ready to find great talent? Ask me about postings, candidates or market insights.",
    "Hey! {name} here. Let's fill those open roles. Pick a quick action below or tell me what you need.",
];

const MOTIVATION_VARIANTS: &[&str] = &[
    "I hear you. Job searching can be tough, and every rejection stings. 💪 Remember that each application teaches you something, and the right opportunity often comes when you least expect it. Want me to look at your resume together?",
    "It's completely normal to feel discouraged sometimes. 🌱 Progress isn't always visible, but you're building momentum with every step. How about we set one small goal for today?",
    "Don't give up! 🌟 Many successful people faced dozens of rejections before landing the right role. Let's focus on what you can control: a sharper resume and great interview stories.",
];

const GRATITUDE_VARIANTS: &[&str] = &[
    "You're welcome! 😊 Anything else I can help with?",
    "Happy to help! Let me know if you need anything else.",
    "Anytime! Good luck, and come back whenever you need me. 🍀",
];

const FALLBACK_VARIANTS: &[&str] = &[
    "I'm not sure I understood that. 🤔 I can help with job search, resumes, interview prep and salary questions. Could you rephrase?",
    "Hmm, I didn't quite catch that. Try asking about jobs, your CV, interviews or pay, or use one of the quick actions below.",
    "I'm still learning! Could you tell me a bit more about what you're looking for?",
];

/// Builds assistant responses for classified intents.
#[derive(Debug, Clone)]
pub struct ResponseGenerator {
    assistant_name: String,
}

impl ResponseGenerator {
    pub fn new(assistant_name: impl Into<String>) -> Self {
        Self {
            assistant_name: assistant_name.into(),
        }
    }

    /// The opening message synthesized when the widget first opens.
    pub fn greeting<R: Rng + ?Sized>(&self, role: UserRole, rng: &mut R) -> ResponsePayload {
        let variants = match role {
            UserRole::Jobseeker => SEEKER_GREETINGS,
            UserRole::Recruiter => RECRUITER_GREETINGS,
        };
        ResponsePayload::text(self.fill(pick(variants, rng)))
    }

    /// Build the response for an intent.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        intent: IntentTag,
        role: UserRole,
        rng: &mut R,
    ) -> ResponsePayload {
        debug!(intent = %intent, role = %role, "Generating response");
        match intent {
            IntentTag::JobSearch => job_search_card(role),
            IntentTag::InterviewPrep => interview_card(role),
            IntentTag::ResumeHelp => ResponsePayload::text(resume_help(role)),
            IntentTag::Salary => ResponsePayload::text(salary_help(role)),
            IntentTag::Help => ResponsePayload::text(self.fill(help_text(role))),
            IntentTag::Motivation => ResponsePayload::text(pick(MOTIVATION_VARIANTS, rng)),
            IntentTag::Gratitude => ResponsePayload::text(pick(GRATITUDE_VARIANTS, rng)),
            IntentTag::Greeting => self.greeting(role, rng),
            IntentTag::Fallback => ResponsePayload::text(pick(FALLBACK_VARIANTS, rng)),
        }
    }

    /// Every card this generator can produce, for both roles.
    pub fn all_cards() -> Vec<CardPayload> {
        let mut cards = Vec::new();
        for role in [UserRole::Jobseeker, UserRole::Recruiter] {
            for payload in [job_search_card(role), interview_card(role)] {
                if let ResponsePayload::Card { card, .. } = payload {
                    cards.push(card);
                }
            }
        }
        cards
    }

    fn fill(&self, template: &str) -> String {
        template.replace("{name}", &self.assistant_name)
    }
}

impl Default for ResponseGenerator {
    fn default() -> Self {
        Self::new("Hiro")
    }
}

fn pick<'a, R: Rng + ?Sized>(variants: &[&'a str], rng: &mut R) -> &'a str {
    variants.choose(rng).copied().unwrap_or_default()
}

fn card(title: &str, description: &str, actions: &[ActionKey]) -> CardPayload {
    CardPayload {
        title: title.to_string(),
        description: description.to_string(),
        actions: actions.iter().copied().map(CardAction::from_key).collect(),
    }
}

fn job_search_card(role: UserRole) -> ResponsePayload {
    match role {
        UserRole::Jobseeker => ResponsePayload::card(
            "I'd love to help you find your next opportunity! 🎯",
            card(
                "Job Search Assistant",
                "I can search open roles that match your skills, set up alerts for new postings, and show what similar roles pay.",
                &[ActionKey::SearchJobs, ActionKey::SetJobAlerts, ActionKey::SalaryInsights],
            ),
        ),
        UserRole::Recruiter => ResponsePayload::card(
            "Let's find the right people for your team! 🎯",
            card(
                "Candidate Search Assistant",
                "I can search the candidate database, help you publish a new posting, and screen applicants against your requirements.",
                &[ActionKey::SearchCandidates, ActionKey::PostJob, ActionKey::ScreenCandidates],
            ),
        ),
    }
}

fn interview_card(role: UserRole) -> ResponsePayload {
    match role {
        UserRole::Jobseeker => ResponsePayload::card(
            "Interviews are your chance to shine! ✨",
            card(
                "Interview Preparation",
                "Practice with a mock interview, review the questions that come up most, or get a quick prep checklist.",
                &[ActionKey::MockInterview, ActionKey::CommonQuestions, ActionKey::InterviewPrep],
            ),
        ),
        UserRole::Recruiter => ResponsePayload::card(
            "Let's make your interviews count! ✨",
            card(
                "Interview Planning",
                "Schedule interviews with shortlisted candidates or review a bank of well-tested questions.",
                &[ActionKey::ScheduleInterviews, ActionKey::CommonQuestions],
            ),
        ),
    }
}

fn resume_help(role: UserRole) -> &'static str {
    match role {
        UserRole::Jobseeker => {
            "Here are some ways to improve your resume 📄\n\n• Start each bullet with a strong action verb\n• Quantify your impact with numbers and results\n• Tailor your skills section to the job description\n• Keep formatting clean and consistent\n• Put your most relevant experience first\n\nYou can also upload your CV with the 📎 button for a quick review."
        }
        UserRole::Recruiter => {
            "Tips for reviewing resumes quickly 📄\n\n• Scan for measurable achievements, not just duties\n• Check skills against your must-have requirements\n• Look for progression and tenure patterns\n• Note gaps as questions, not red flags\n\nUpload a CV with the 📎 button and I'll summarize it."
        }
    }
}

fn salary_help(role: UserRole) -> &'static str {
    match role {
        UserRole::Jobseeker => {
            "Let's talk compensation 💰\n\n• Research the market rate for your title and location\n• Consider the full package: bonus, equity, benefits\n• Give a researched range rather than a single number\n• Don't be afraid to negotiate; most offers have room\n\nWant me to pull salary insights for a specific role?"
        }
        UserRole::Recruiter => {
            "Setting competitive pay 💰\n\n• Benchmark against current market data for the role\n• Publish a salary range to attract more applicants\n• Balance base pay with equity and benefits\n• Review bands regularly as the market shifts\n\nCheck Market Insights for up-to-date figures."
        }
    }
}

fn help_text(role: UserRole) -> &'static str {
    match role {
        UserRole::Jobseeker => {
            "No problem, I'm here to help! 🙌 Here's what {name} can do:\n\n• 🔍 Find jobs that match your profile\n• 📄 Improve your resume or CV\n• 🎯 Prepare for interviews\n• 💰 Research salaries\n\nJust type a question or tap a quick action."
        }
        UserRole::Recruiter => {
            "No problem, I'm here to help! 🙌 Here's what {name} can do:\n\n• 📝 Create job postings\n• 👥 Screen and rank candidates\n• 📅 Schedule interviews\n• 📊 Share market insights\n\nJust type a question or tap a quick action."
        }
    }
}
