//! Application state wiring the ports to their concrete implementations.
//!
//! `AppState` holds what every command needs (config, store, bus, delivery).
//! The two agents need an LLM provider, so they are built on demand by
//! [`AppState::agents`] and only by the commands that talk to the model.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use secrecy::{ExposeSecret, SecretString};

use hireloop_core::agent::applicant::ApplicantAgentConfig;
use hireloop_core::agent::{ApplicantAgent, HiringManager};
use hireloop_core::interview::{AccessGate, LlmResponder, LlmResponderSettings, SessionMachine};
use hireloop_core::message::MessageBus;
use hireloop_infra::archive::FileEvaluationArchive;
use hireloop_infra::config::{load_config, resolve_data_dir};
use hireloop_infra::delivery::RoutedDelivery;
use hireloop_infra::llm::create_provider;
use hireloop_infra::sqlite::kv::SqliteKvStore;
use hireloop_infra::sqlite::pool::{DatabasePool, database_url};
use hireloop_types::config::HireloopConfig;

pub type ConcreteGate = AccessGate<SqliteKvStore>;

pub type ConcreteHiringManager =
    HiringManager<SqliteKvStore, LlmResponder, FileEvaluationArchive, RoutedDelivery>;

pub type ConcreteApplicant = ApplicantAgent<RoutedDelivery>;

/// Shared state for CLI commands and HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<HireloopConfig>,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
    pub store: Arc<SqliteKvStore>,
    pub bus: Arc<MessageBus>,
    pub delivery: Arc<RoutedDelivery>,
    pub archive: Arc<FileEvaluationArchive>,
}

/// Both agents, sharing one provider, store and message bus.
#[derive(Clone)]
pub struct Agents {
    pub hiring_manager: Arc<ConcreteHiringManager>,
    pub applicant: Arc<ConcreteApplicant>,
}

/// State handed to the HTTP router: the shared state plus both agents.
#[derive(Clone)]
pub struct ServerState {
    pub app: AppState,
    pub agents: Agents,
}

impl AppState {
    /// Load configuration, open the database and wire the transports.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("failed to create {}", data_dir.display()))?;

        let config = load_config(&data_dir).await?;
        config.validate_for_mode()?;

        let db_pool = DatabasePool::new(&database_url(&data_dir)).await?;
        let store = Arc::new(SqliteKvStore::new(db_pool.clone()));

        let bus = Arc::new(MessageBus::new());
        let delivery = Arc::new(RoutedDelivery::new(
            Arc::clone(&bus),
            config.delivery.timeout(),
        )?);
        let archive = Arc::new(FileEvaluationArchive::new(&data_dir));

        tracing::debug!(data_dir = %data_dir.display(), mode = %config.mode, "application state ready");

        Ok(Self {
            config: Arc::new(config),
            data_dir,
            db_pool,
            store,
            bus,
            delivery,
            archive,
        })
    }

    /// Access gate over the shared store, using the configured admin key.
    pub fn gate(&self) -> ConcreteGate {
        let admin_key = self
            .config
            .admin_key
            .as_ref()
            .map(|key| SecretString::from(key.expose_secret().to_string()));
        AccessGate::new(Arc::clone(&self.store), admin_key, self.config.mode)
    }

    /// Build both agents. Requires `ANTHROPIC_API_KEY`.
    pub fn agents(&self) -> anyhow::Result<Agents> {
        let config = &self.config;
        let provider = Arc::new(
            create_provider(config).context("LLM provider unavailable (is ANTHROPIC_API_KEY set?)")?,
        );

        let responder = LlmResponder::new(
            Arc::clone(&provider),
            LlmResponderSettings {
                model: config.responder.interviewer_model.clone(),
                max_turns: config.max_turns,
                turn_max_tokens: config.responder.turn_max_tokens,
                evaluation_max_tokens: config.responder.evaluation_max_tokens,
            },
        );
        let sessions = SessionMachine::new(
            Arc::clone(&self.store),
            Arc::new(responder),
            Arc::clone(&self.archive),
            config.max_turns,
            config.responder.timeout(),
        );
        let hiring_manager = HiringManager::new(self.gate(), sessions, Arc::clone(&self.delivery));

        // Turns are posted to a hiring manager that answers only after the
        // turn is persisted, so they get a longer deadline than replies.
        let turn_delivery = Arc::new(RoutedDelivery::new(
            Arc::clone(&self.bus),
            config.turn_delivery_timeout(),
        )?);
        let applicant = ApplicantAgent::new(
            provider,
            turn_delivery,
            ApplicantAgentConfig {
                identity: config.applicant_identity(),
                own_route: config.applicant_route()?,
                hiring_manager_route: config.hiring_manager_route()?,
                model: config.responder.applicant_model.clone(),
                max_tokens: config.responder.turn_max_tokens,
                timeout: config.responder.timeout(),
            },
        );

        Ok(Agents {
            hiring_manager: Arc::new(hiring_manager),
            applicant: Arc::new(applicant),
        })
    }
}
