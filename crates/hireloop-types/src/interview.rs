//! Interview conversation types.
//!
//! A conversation is one persisted [`ConversationRecord`] per applicant key.
//! Each turn appends the applicant's message and the hiring manager's
//! generated reply to the transcript.

use std::fmt;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Session store namespace holding applicant key -> applicant name.
pub const REGISTRY_NAMESPACE: &str = "applicants";

/// Session store namespace holding applicant key -> conversation record.
pub const CONVERSATION_NAMESPACE: &str = "log";

/// Default maximum number of turns before an interview is forced to conclude.
pub const DEFAULT_MAX_TURNS: u32 = 10;

/// The evaluation dimension a hiring-manager question is probing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuestionCategory {
    TechnicalAccuracy,
    MemoryConsistency,
    AuthenticityHumanLikeness,
    HandlingOfUnknownsUncertainty,
    EfficiencyVerbosity,
    TrickQuestionHandling,
}

impl QuestionCategory {
    pub const ALL: [QuestionCategory; 6] = [
        QuestionCategory::TechnicalAccuracy,
        QuestionCategory::MemoryConsistency,
        QuestionCategory::AuthenticityHumanLikeness,
        QuestionCategory::HandlingOfUnknownsUncertainty,
        QuestionCategory::EfficiencyVerbosity,
        QuestionCategory::TrickQuestionHandling,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionCategory::TechnicalAccuracy => "technical_accuracy",
            QuestionCategory::MemoryConsistency => "memory_consistency",
            QuestionCategory::AuthenticityHumanLikeness => "authenticity_human_likeness",
            QuestionCategory::HandlingOfUnknownsUncertainty => "handling_of_unknowns_uncertainty",
            QuestionCategory::EfficiencyVerbosity => "efficiency_verbosity",
            QuestionCategory::TrickQuestionHandling => "trick_question_handling",
        }
    }
}

impl fmt::Display for QuestionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the interview transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "speaker", rename_all = "snake_case")]
pub enum TranscriptEntry {
    Applicant {
        name: String,
        text: String,
    },
    HiringManager {
        category: QuestionCategory,
        text: String,
    },
}

impl fmt::Display for TranscriptEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranscriptEntry::Applicant { name, text } => write!(f, "{name}: {text}"),
            TranscriptEntry::HiringManager { category, text } => {
                write!(f, "Hiring Manager [{category}]: {text}")
            }
        }
    }
}

/// Lifecycle state of a conversation. `New` means no record exists yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    New,
    Active,
    Concluded,
}

impl SessionState {
    /// State of the conversation stored under a key, `None` meaning no record.
    pub fn of(record: Option<&ConversationRecord>) -> Self {
        record.map_or(SessionState::New, ConversationRecord::state)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::New => write!(f, "new"),
            SessionState::Active => write!(f, "active"),
            SessionState::Concluded => write!(f, "concluded"),
        }
    }
}

/// Persisted per-applicant conversation state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub history: Vec<TranscriptEntry>,
    pub turn_count: u32,
    pub concluded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ConversationRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        if self.concluded {
            SessionState::Concluded
        } else {
            SessionState::Active
        }
    }

    /// Start a fresh interview in place: clear history, zero the turn count.
    pub fn reset(&mut self) {
        self.history.clear();
        self.turn_count = 0;
        self.concluded = false;
    }

    /// Render the transcript as newline-separated lines for prompting.
    pub fn transcript(&self) -> String {
        self.history
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Structured output the interviewer LLM must produce for each turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GeneratedTurn {
    /// The next question or statement for the applicant.
    pub message: String,
    /// Evaluation area the message is testing.
    #[serde(rename = "question_type")]
    pub category: QuestionCategory,
    /// True when the interviewer is ending the interview.
    #[serde(rename = "done")]
    pub concluded: bool,
}

/// Message delivered from the hiring manager to the applicant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub message: String,
    pub concluded: bool,
}

/// Result of one successful `advance` call.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub outbound: OutboundMessage,
    pub record: ConversationRecord,
    /// Final evaluation report, present only when this turn concluded the interview.
    pub evaluation: Option<String>,
}

/// Reply returned to whoever sent an inbound message to the hiring manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerReply {
    pub done: bool,
    pub text: String,
}

impl HandlerReply {
    pub fn new(done: bool, text: impl Into<String>) -> Self {
        Self {
            done,
            text: text.into(),
        }
    }
}
