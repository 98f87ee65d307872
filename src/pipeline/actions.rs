//! Quick actions — role menus and the canned-response dispatch table.
//!
//! Quick actions bypass intent classification entirely. The dispatch table
//! covers every [`ActionKey`], which is also the only type a card action can
//! carry, so any key a card emits is dispatchable.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::types::{ResponsePayload, UserRole};

/// Text returned for keys the table does not know.
pub const FALLBACK_ACTION_RESPONSE: &str =
    "That feature is still in progress. Is there anything else I can help you with?";

/// Every action key the assistant understands, across both roles and all cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKey {
    // Job seeker menu
    SearchJobs,
    ImproveResume,
    InterviewPrep,
    SalaryInsights,
    CareerAdvice,
    // Recruiter menu
    PostJob,
    ScreenCandidates,
    ScheduleInterviews,
    MarketInsights,
    TalentPipeline,
    // Card follow-ups
    SetJobAlerts,
    MockInterview,
    CommonQuestions,
    SearchCandidates,
}

impl ActionKey {
    /// All keys, in table order.
    pub const ALL: [ActionKey; 14] = [
        Self::SearchJobs,
        Self::ImproveResume,
        Self::InterviewPrep,
        Self::SalaryInsights,
        Self::CareerAdvice,
        Self::PostJob,
        Self::ScreenCandidates,
        Self::ScheduleInterviews,
        Self::MarketInsights,
        Self::TalentPipeline,
        Self::SetJobAlerts,
        Self::MockInterview,
        Self::CommonQuestions,
        Self::SearchCandidates,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SearchJobs => "search_jobs",
            Self::ImproveResume => "improve_resume",
            Self::InterviewPrep => "interview_prep",
            Self::SalaryInsights => "salary_insights",
            Self::CareerAdvice => "career_advice",
            Self::PostJob => "post_job",
            Self::ScreenCandidates => "screen_candidates",
            Self::ScheduleInterviews => "schedule_interviews",
            Self::MarketInsights => "market_insights",
            Self::TalentPipeline => "talent_pipeline",
            Self::SetJobAlerts => "set_job_alerts",
            Self::MockInterview => "mock_interview",
            Self::CommonQuestions => "common_questions",
            Self::SearchCandidates => "search_candidates",
        }
    }

    /// Button label shown in menus and echoed as the user's message.
    pub fn label(&self) -> &'static str {
        match self {
            Self::SearchJobs => "Search Jobs",
            Self::ImproveResume => "Improve Resume",
            Self::InterviewPrep => "Interview Prep",
            Self::SalaryInsights => "Salary Insights",
            Self::CareerAdvice => "Career Advice",
            Self::PostJob => "Post a Job",
            Self::ScreenCandidates => "Screen Candidates",
            Self::ScheduleInterviews => "Schedule Interviews",
            Self::MarketInsights => "Market Insights",
            Self::TalentPipeline => "Talent Pipeline",
            Self::SetJobAlerts => "Set Job Alerts",
            Self::MockInterview => "Start Mock Interview",
            Self::CommonQuestions => "Common Questions",
            Self::SearchCandidates => "Search Candidates",
        }
    }
}

impl std::fmt::Display for ActionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActionKey {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == needle)
            .ok_or_else(|| format!("Unknown action key: {}", needle))
    }
}

/// A menu entry shown as a shortcut button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickAction {
    pub key: ActionKey,
    pub label: String,
    pub icon: String,
}

impl QuickAction {
    fn new(key: ActionKey, icon: &str) -> Self {
        Self {
            key,
            label: key.label().to_string(),
            icon: icon.to_string(),
        }
    }
}

/// Maps action keys straight to canned text responses.
#[derive(Debug, Default, Clone)]
pub struct QuickActionDispatcher;

impl QuickActionDispatcher {
    pub fn new() -> Self {
        Self
    }

    /// The shortcut menu for a role. The two menus share no keys.
    pub fn menu(&self, role: UserRole) -> Vec<QuickAction> {
        match role {
            UserRole::Jobseeker => vec![
                QuickAction::new(ActionKey::SearchJobs, "🔍"),
                QuickAction::new(ActionKey::ImproveResume, "📄"),
                QuickAction::new(ActionKey::InterviewPrep, "🎯"),
                QuickAction::new(ActionKey::SalaryInsights, "💰"),
                QuickAction::new(ActionKey::CareerAdvice, "🧭"),
            ],
            UserRole::Recruiter => vec![
                QuickAction::new(ActionKey::PostJob, "📝"),
                QuickAction::new(ActionKey::ScreenCandidates, "👥"),
                QuickAction::new(ActionKey::ScheduleInterviews, "📅"),
                QuickAction::new(ActionKey::MarketInsights, "📊"),
                QuickAction::new(ActionKey::TalentPipeline, "🚀"),
            ],
        }
    }

    /// Whether a raw key resolves to a table entry.
    pub fn handles(&self, key: &str) -> bool {
        key.parse::<ActionKey>().is_ok()
    }

    /// Resolve a raw key to a text response. Unknown keys get the fallback.
    pub fn dispatch(&self, key: &str, role: UserRole) -> ResponsePayload {
        match key.parse::<ActionKey>() {
            Ok(action) => self.dispatch_key(action, role),
            Err(_) => {
                warn!(action = %key, "Unknown quick action, using fallback");
                ResponsePayload::text(FALLBACK_ACTION_RESPONSE)
            }
        }
    }

    /// Resolve a typed key to a text response.
    pub fn dispatch_key(&self, action: ActionKey, role: UserRole) -> ResponsePayload {
        debug!(action = %action, role = %role, "Dispatching quick action");
        ResponsePayload::text(canned_response(action, role))
    }
}

fn canned_response(action: ActionKey, role: UserRole) -> String {
    use ActionKey::*;
    let text = match (action, role) {
        (SearchJobs, UserRole::Jobseeker) => {
            "Great! Let me start a job search for you. 🔍\n\nI'll look for roles that match your skills, experience and location preferences. You can refine the results on the Jobs page using filters for salary, remote work and seniority."
        }
        (SearchJobs, UserRole::Recruiter) => {
            "Starting a job search now. 🔍\n\nI'll pull up comparable postings so you can benchmark titles, requirements and salary ranges against your own openings."
        }
        (ImproveResume, _) => {
            "Let's make your resume stand out! 📄\n\n• Lead each bullet with a strong action verb\n• Quantify achievements (\"cut costs by 20%\")\n• Tailor keywords to each job description\n• Keep it to one or two pages\n\nUpload your CV with the 📎 button and I'll take a look."
        }
        (InterviewPrep, _) => {
            "Interview prep mode activated! 🎯\n\nResearch the company, prepare three STAR stories that show impact, and have two thoughtful questions ready for the interviewer. Want to run a mock interview?"
        }
        (SalaryInsights, _) => {
            "Here's how to approach salary research 💰\n\n• Check market data for your title and city\n• Factor in total compensation, not just base\n• Anchor negotiations with a researched range\n\nOpen the Salary Insights tab for role-specific figures."
        }
        (CareerAdvice, _) => {
            "Happy to help you plan your next move! 🧭\n\nTell me where you are now and where you'd like to be in two years, and I'll suggest skills to build and roles to target."
        }
        (PostJob, _) => {
            "Let's create a new job posting! 📝\n\nI'll open the posting builder. Start with a clear title, a short pitch about the team, and the three must-have requirements."
        }
        (ScreenCandidates, _) => {
            "Starting candidate screening. 👥\n\nI'll rank applicants by how well their skills and experience match your requirements. Top matches will appear first on the Candidates page."
        }
        (ScheduleInterviews, _) => {
            "Let's get interviews on the calendar. 📅\n\nPick the candidates you want to meet and I'll suggest slots based on your availability."
        }
        (MarketInsights, _) => {
            "Here's your market snapshot 📊\n\nDemand for experienced engineers remains high and time-to-hire is trending up. Competitive salary bands and a fast process are your strongest levers."
        }
        (TalentPipeline, _) => {
            "Opening your talent pipeline. 🚀\n\nYou can track every candidate from sourcing to offer, and I'll flag anyone who has been waiting too long for a response."
        }
        (SetJobAlerts, _) => {
            "Job alerts are on! 🔔\n\nI'll let you know as soon as new roles matching your profile are posted."
        }
        (MockInterview, _) => {
            "Let's practice! 🎤\n\nFirst question: \"Tell me about yourself.\" Take a moment, then type your answer and I'll give you feedback."
        }
        (CommonQuestions, _) => {
            "Here are questions that come up in almost every interview:\n\n• Tell me about yourself\n• Why do you want this role?\n• Describe a challenge you overcame\n• Where do you see yourself in five years?\n• What questions do you have for us?"
        }
        (SearchCandidates, _) => {
            "Searching the candidate database now. 👥\n\nI'll surface profiles that match your open roles, starting with the strongest skill overlap."
        }
    };
    text.to_string()
}
