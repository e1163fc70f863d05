//! Configuration types for hireloop.
//!
//! [`FileConfig`] mirrors `config.toml` and holds no secrets. The loader in
//! hireloop-infra layers environment overrides on top of it and produces a
//! [`HireloopConfig`], which is passed explicitly to the gate, the session
//! machine and both agents.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::inbound::{ApplicantIdentity, ReplyRoute};
use crate::interview::DEFAULT_MAX_TURNS;

/// Agent id of the hiring manager on the in-process message bus.
pub const HIRING_MANAGER_AGENT_ID: &str = "hiring-manager";

/// Agent id of the applicant on the in-process message bus.
pub const APPLICANT_AGENT_ID: &str = "applicant";

/// Selects the reply transport.
///
/// `Local` dispatches replies in-process to a named agent; `Deployed` posts
/// them to the sender's callback URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentMode {
    #[default]
    Local,
    Deployed,
}

impl fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeploymentMode::Local => write!(f, "local"),
            DeploymentMode::Deployed => write!(f, "deployed"),
        }
    }
}

impl FromStr for DeploymentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" | "dev" => Ok(DeploymentMode::Local),
            "deployed" | "prod" => Ok(DeploymentMode::Deployed),
            other => Err(format!("invalid deployment mode: '{other}'")),
        }
    }
}

/// Contents of `config.toml`. All fields have defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub mode: DeploymentMode,

    #[serde(default = "default_max_turns")]
    pub max_turns: u32,

    #[serde(default)]
    pub hiring_manager_webhook: Option<String>,

    #[serde(default)]
    pub applicant_webhook: Option<String>,

    #[serde(default)]
    pub applicant: ApplicantSettings,

    #[serde(default)]
    pub responder: ResponderSettings,

    #[serde(default)]
    pub delivery: DeliverySettings,
}

fn default_max_turns() -> u32 {
    DEFAULT_MAX_TURNS
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            mode: DeploymentMode::default(),
            max_turns: default_max_turns(),
            hiring_manager_webhook: None,
            applicant_webhook: None,
            applicant: ApplicantSettings::default(),
            responder: ResponderSettings::default(),
            delivery: DeliverySettings::default(),
        }
    }
}

/// Identity the bundled applicant agent interviews under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicantSettings {
    #[serde(default = "default_applicant_name")]
    pub name: String,
    #[serde(default)]
    pub key: Option<String>,
}

fn default_applicant_name() -> String {
    "Foo Bar".to_string()
}

impl Default for ApplicantSettings {
    fn default() -> Self {
        Self {
            name: default_applicant_name(),
            key: None,
        }
    }
}

/// LLM settings for both agents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponderSettings {
    #[serde(default = "default_interviewer_model")]
    pub interviewer_model: String,
    #[serde(default = "default_applicant_model")]
    pub applicant_model: String,
    #[serde(default = "default_turn_max_tokens")]
    pub turn_max_tokens: u32,
    #[serde(default = "default_evaluation_max_tokens")]
    pub evaluation_max_tokens: u32,
    #[serde(default = "default_responder_timeout_secs")]
    pub timeout_secs: u64,
    /// Override the provider base URL (proxies, tests).
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_interviewer_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_applicant_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_turn_max_tokens() -> u32 {
    1024
}

fn default_evaluation_max_tokens() -> u32 {
    4096
}

fn default_responder_timeout_secs() -> u64 {
    120
}

impl Default for ResponderSettings {
    fn default() -> Self {
        Self {
            interviewer_model: default_interviewer_model(),
            applicant_model: default_applicant_model(),
            turn_max_tokens: default_turn_max_tokens(),
            evaluation_max_tokens: default_evaluation_max_tokens(),
            timeout_secs: default_responder_timeout_secs(),
            base_url: None,
        }
    }
}

impl ResponderSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Outbound delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliverySettings {
    #[serde(default = "default_delivery_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_delivery_timeout_secs() -> u64 {
    15
}

impl Default for DeliverySettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_delivery_timeout_secs(),
        }
    }
}

impl DeliverySettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Fully resolved runtime configuration.
#[derive(Debug)]
pub struct HireloopConfig {
    pub mode: DeploymentMode,
    pub max_turns: u32,
    pub admin_key: Option<SecretString>,
    pub anthropic_api_key: Option<SecretString>,
    pub hiring_manager_webhook: Option<String>,
    pub applicant_webhook: Option<String>,
    pub applicant: ApplicantSettings,
    pub responder: ResponderSettings,
    pub delivery: DeliverySettings,
}

impl HireloopConfig {
    /// Build a runtime config from file settings with no secrets attached.
    pub fn from_file(file: FileConfig) -> Self {
        Self {
            mode: file.mode,
            max_turns: file.max_turns,
            admin_key: None,
            anthropic_api_key: None,
            hiring_manager_webhook: file.hiring_manager_webhook,
            applicant_webhook: file.applicant_webhook,
            applicant: file.applicant,
            responder: file.responder,
            delivery: file.delivery,
        }
    }

    /// Check that the selected mode has everything it needs.
    ///
    /// Deployed mode requires both webhook URLs; every mode requires a
    /// non-zero turn limit.
    pub fn validate_for_mode(&self) -> Result<(), ConfigError> {
        if self.max_turns == 0 {
            return Err(ConfigError::Invalid {
                field: "max_turns",
                message: "must be at least 1".to_string(),
            });
        }
        if self.mode == DeploymentMode::Deployed {
            if self.hiring_manager_webhook.is_none() {
                return Err(ConfigError::Missing("HIRING_MANAGER_WEBHOOK"));
            }
            if self.applicant_webhook.is_none() {
                return Err(ConfigError::Missing("EXAMPLE_APPLICANT_WEBHOOK"));
            }
        }
        Ok(())
    }

    /// Identity of the bundled applicant agent.
    pub fn applicant_identity(&self) -> ApplicantIdentity {
        ApplicantIdentity::new(
            self.applicant.name.clone(),
            self.applicant
                .key
                .clone()
                .unwrap_or_else(|| "missing-key".to_string()),
        )
    }

    /// Route on which the applicant wants to receive replies.
    pub fn applicant_route(&self) -> Result<ReplyRoute, ConfigError> {
        match self.mode {
            DeploymentMode::Local => Ok(ReplyRoute::Direct {
                agent_id: APPLICANT_AGENT_ID.to_string(),
            }),
            DeploymentMode::Deployed => self
                .applicant_webhook
                .clone()
                .map(|url| ReplyRoute::Callback { url })
                .ok_or(ConfigError::Missing("EXAMPLE_APPLICANT_WEBHOOK")),
        }
    }

    /// How long the applicant waits for the hiring manager to take a turn.
    ///
    /// One turn may call the responder twice (turn, then evaluation) and
    /// deliver the reply before it answers.
    pub fn turn_delivery_timeout(&self) -> Duration {
        self.responder.timeout() * 2 + self.delivery.timeout()
    }

    /// Route on which the hiring manager receives turns.
    pub fn hiring_manager_route(&self) -> Result<ReplyRoute, ConfigError> {
        match self.mode {
            DeploymentMode::Local => Ok(ReplyRoute::Direct {
                agent_id: HIRING_MANAGER_AGENT_ID.to_string(),
            }),
            DeploymentMode::Deployed => self
                .hiring_manager_webhook
                .clone()
                .map(|url| ReplyRoute::Callback { url })
                .ok_or(ConfigError::Missing("HIRING_MANAGER_WEBHOOK")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_config_defaults_from_empty_toml() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config.mode, DeploymentMode::Local);
        assert_eq!(config.max_turns, 10);
        assert_eq!(config.applicant.name, "Foo Bar");
        assert_eq!(config.responder.timeout_secs, 120);
        assert_eq!(config.delivery.timeout_secs, 15);
    }

    #[test]
    fn test_file_config_with_values() {
        let toml_str = r#"
mode = "deployed"
max_turns = 4
hiring_manager_webhook = "https://hm.example.com/hook"
applicant_webhook = "https://app.example.com/hook"

[applicant]
name = "Ada"
key = "k-1"

[responder]
interviewer_model = "claude-haiku-4"
timeout_secs = 30
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.mode, DeploymentMode::Deployed);
        assert_eq!(config.max_turns, 4);
        assert_eq!(config.applicant.key.as_deref(), Some("k-1"));
        assert_eq!(config.responder.interviewer_model, "claude-haiku-4");
        assert_eq!(config.responder.evaluation_max_tokens, 4096);
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("local".parse::<DeploymentMode>().unwrap(), DeploymentMode::Local);
        assert_eq!("DEPLOYED".parse::<DeploymentMode>().unwrap(), DeploymentMode::Deployed);
        assert!("cloud".parse::<DeploymentMode>().is_err());
    }

    #[test]
    fn test_deployed_requires_both_webhooks() {
        let mut config = HireloopConfig::from_file(FileConfig {
            mode: DeploymentMode::Deployed,
            ..FileConfig::default()
        });
        assert!(matches!(
            config.validate_for_mode(),
            Err(ConfigError::Missing("HIRING_MANAGER_WEBHOOK"))
        ));
        config.hiring_manager_webhook = Some("https://hm".to_string());
        assert!(matches!(
            config.validate_for_mode(),
            Err(ConfigError::Missing("EXAMPLE_APPLICANT_WEBHOOK"))
        ));
        config.applicant_webhook = Some("https://app".to_string());
        assert!(config.validate_for_mode().is_ok());
    }

    #[test]
    fn test_routes_follow_mode() {
        let local = HireloopConfig::from_file(FileConfig::default());
        assert_eq!(
            local.applicant_route().unwrap(),
            ReplyRoute::Direct {
                agent_id: APPLICANT_AGENT_ID.to_string()
            }
        );

        let mut deployed = HireloopConfig::from_file(FileConfig {
            mode: DeploymentMode::Deployed,
            ..FileConfig::default()
        });
        deployed.applicant_webhook = Some("https://app/hook".to_string());
        assert_eq!(
            deployed.applicant_route().unwrap(),
            ReplyRoute::Callback {
                url: "https://app/hook".to_string()
            }
        );
        assert!(deployed.hiring_manager_route().is_err());
    }

    #[test]
    fn test_turn_delivery_outlasts_a_concluding_turn() {
        let config = HireloopConfig::from_file(FileConfig::default());
        // two 120 s responder calls plus the 15 s reply delivery
        assert_eq!(config.turn_delivery_timeout(), Duration::from_secs(255));
    }

    #[test]
    fn test_zero_max_turns_rejected() {
        let config = HireloopConfig::from_file(FileConfig {
            max_turns: 0,
            ..FileConfig::default()
        });
        assert!(config.validate_for_mode().is_err());
    }
}
