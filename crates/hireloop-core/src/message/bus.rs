//! Agent-to-agent message bus with direct mailboxes.
//!
//! Each registered agent gets a bounded `mpsc` mailbox. `send` never waits:
//! a full mailbox is reported as an error so a caller cannot block on a
//! counterpart that is itself waiting on the caller.

use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::debug;

use super::envelope::Envelope;

/// Buffer size for per-agent mailboxes.
const MAILBOX_BUFFER: usize = 64;

/// Errors that can occur during message bus operations.
#[derive(Debug, Error)]
pub enum MessageError {
    /// The target agent is not registered with the bus.
    #[error("agent '{0}' is not registered")]
    NotRegistered(String),

    /// The mailbox is full.
    #[error("mailbox full for agent '{0}'")]
    ChannelFull(String),

    /// The receiving side of the mailbox was dropped.
    #[error("mailbox closed for agent '{0}'")]
    Closed(String),
}

/// Central message bus for local-mode agents.
#[derive(Default)]
pub struct MessageBus {
    mailboxes: DashMap<String, mpsc::Sender<Envelope>>,
}

impl MessageBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an agent and return its mailbox.
    ///
    /// If the agent is already registered, the old mailbox is replaced.
    pub fn register(&self, agent_id: &str) -> mpsc::Receiver<Envelope> {
        let (tx, rx) = mpsc::channel(MAILBOX_BUFFER);
        self.mailboxes.insert(agent_id.to_string(), tx);
        debug!(agent_id, "registered agent with message bus");
        rx
    }

    /// Unregister an agent. Returns `true` if it was registered.
    pub fn unregister(&self, agent_id: &str) -> bool {
        let removed = self.mailboxes.remove(agent_id).is_some();
        if removed {
            debug!(agent_id, "unregistered agent from message bus");
        }
        removed
    }

    pub fn is_registered(&self, agent_id: &str) -> bool {
        self.mailboxes.contains_key(agent_id)
    }

    /// Deliver an envelope to `envelope.to` (fire-and-forget).
    pub fn send(&self, envelope: Envelope) -> Result<(), MessageError> {
        let to = envelope.to.clone();
        let sender = self
            .mailboxes
            .get(&to)
            .ok_or_else(|| MessageError::NotRegistered(to.clone()))?;

        sender.try_send(envelope).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => MessageError::ChannelFull(to.clone()),
            mpsc::error::TrySendError::Closed(_) => MessageError::Closed(to.clone()),
        })?;

        debug!(to = %to, "queued envelope");
        Ok(())
    }
}
