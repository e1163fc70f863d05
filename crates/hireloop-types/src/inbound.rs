//! Inbound message shapes accepted by the hiring manager.
//!
//! Every message carries an explicit `kind` discriminant. Field values are
//! kept optional on the wire so the access gate can report precisely which
//! required field is missing instead of failing with a generic parse error.
//! The validated forms ([`AdminAction`], [`ValidTurn`]) carry no options.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::InterviewError;

/// Tagged union of everything the hiring manager accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InboundMessage {
    /// Register or unregister an applicant.
    Admin(AdminRequest),
    /// One interview turn from an applicant.
    Turn(TurnRequest),
}

impl InboundMessage {
    /// Parse a raw JSON value, mapping any type/shape error to `InvalidShape`.
    pub fn from_value(value: serde_json::Value) -> Result<Self, InterviewError> {
        serde_json::from_value(value).map_err(|e| InterviewError::InvalidShape(e.to_string()))
    }
}

/// Admin request as received on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminRequest {
    #[serde(default)]
    pub applicant_name: Option<String>,
    #[serde(default)]
    pub applicant_key: Option<String>,
    #[serde(default)]
    pub admin_key: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
}

/// Interview turn as received on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnRequest {
    #[serde(default)]
    pub applicant_name: Option<String>,
    #[serde(default)]
    pub applicant_key: Option<String>,
    #[serde(default)]
    pub applicant_message: Option<String>,
    /// Agent id of the sender, used for direct in-process replies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_id: Option<String>,
    /// Callback URL of the sender, used for webhook replies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_webhook: Option<String>,
}

impl TurnRequest {
    /// Build a well-formed turn for `applicant` replying via `route`.
    pub fn new(applicant: &ApplicantIdentity, message: impl Into<String>, route: &ReplyRoute) -> Self {
        let (from_id, from_webhook) = match route {
            ReplyRoute::Direct { agent_id } => (Some(agent_id.clone()), None),
            ReplyRoute::Callback { url } => (None, Some(url.clone())),
        };
        Self {
            applicant_name: Some(applicant.name.clone()),
            applicant_key: Some(applicant.key.clone()),
            applicant_message: Some(message.into()),
            from_id,
            from_webhook,
        }
    }
}

/// Admin operation on the applicant registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminCommand {
    Register,
    Unregister,
}

impl AdminCommand {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "register" => Some(AdminCommand::Register),
            "unregister" => Some(AdminCommand::Unregister),
            _ => None,
        }
    }
}

impl fmt::Display for AdminCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdminCommand::Register => write!(f, "register"),
            AdminCommand::Unregister => write!(f, "unregister"),
        }
    }
}

/// A shape-checked admin action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminAction {
    pub applicant: ApplicantIdentity,
    pub admin_key: String,
    pub command: AdminCommand,
}

/// Name and key identifying one interview participant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicantIdentity {
    pub name: String,
    pub key: String,
}

impl ApplicantIdentity {
    pub fn new(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
        }
    }
}

/// Where the reply to a turn must be delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "transport", rename_all = "snake_case")]
pub enum ReplyRoute {
    /// In-process dispatch to a named agent.
    Direct { agent_id: String },
    /// HTTP POST to a callback address.
    Callback { url: String },
}

impl fmt::Display for ReplyRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplyRoute::Direct { agent_id } => write!(f, "agent:{agent_id}"),
            ReplyRoute::Callback { url } => write!(f, "{url}"),
        }
    }
}

/// A shape- and route-checked interview turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidTurn {
    pub applicant: ApplicantIdentity,
    pub message: String,
    pub route: ReplyRoute,
}
