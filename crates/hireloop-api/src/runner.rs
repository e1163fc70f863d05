//! Local-mode agent loops over the in-process message bus.
//!
//! Each agent owns one mailbox and handles envelopes one at a time. Sends
//! between agents never wait (see `MessageBus::send`), so the hiring
//! manager can reply to the applicant while the applicant's next turn is
//! still being generated.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use hireloop_core::agent::ApplicantStep;
use hireloop_core::message::{Envelope, MessageBus};
use hireloop_types::config::{APPLICANT_AGENT_ID, HIRING_MANAGER_AGENT_ID};
use hireloop_types::error::{ApplicantError, InterviewError};
use hireloop_types::interview::{HandlerReply, OutboundMessage};

use crate::state::{Agents, ConcreteApplicant, ConcreteHiringManager};

/// Something that happened inside one of the local agent loops.
#[derive(Debug)]
pub enum LocalEvent {
    /// An envelope was taken from an agent's mailbox.
    Received(Envelope),
    /// The hiring manager finished handling a message.
    Handled(Result<HandlerReply, InterviewError>),
    /// The applicant finished handling a hiring manager message.
    Applicant(Result<ApplicantStep, ApplicantError>),
}

type EventSink = Option<mpsc::UnboundedSender<LocalEvent>>;

fn emit(events: &EventSink, event: LocalEvent) {
    if let Some(tx) = events {
        // The observer may have stopped listening.
        let _ = tx.send(event);
    }
}

/// Register both agents on `bus` and start their loops.
///
/// The loops stop when `cancel` fires. Events are sent to `events` when given.
pub fn spawn_local_agents(
    agents: &Agents,
    bus: &MessageBus,
    cancel: CancellationToken,
    events: EventSink,
) -> Vec<JoinHandle<()>> {
    let hiring_manager_mailbox = bus.register(HIRING_MANAGER_AGENT_ID);
    let applicant_mailbox = bus.register(APPLICANT_AGENT_ID);
    info!("local agents registered on the message bus");

    vec![
        tokio::spawn(hiring_manager_loop(
            Arc::clone(&agents.hiring_manager),
            hiring_manager_mailbox,
            cancel.clone(),
            events.clone(),
        )),
        tokio::spawn(applicant_loop(
            Arc::clone(&agents.applicant),
            applicant_mailbox,
            cancel,
            events,
        )),
    ]
}

async fn next_envelope(
    mailbox: &mut mpsc::Receiver<Envelope>,
    cancel: &CancellationToken,
) -> Option<Envelope> {
    tokio::select! {
        _ = cancel.cancelled() => None,
        next = mailbox.recv() => next,
    }
}

async fn hiring_manager_loop(
    manager: Arc<ConcreteHiringManager>,
    mut mailbox: mpsc::Receiver<Envelope>,
    cancel: CancellationToken,
    events: EventSink,
) {
    while let Some(envelope) = next_envelope(&mut mailbox, &cancel).await {
        debug!(from = %envelope.from, id = %envelope.id, "hiring manager received envelope");
        let payload = envelope.payload.clone();
        emit(&events, LocalEvent::Received(envelope));

        let result = manager.handle_value(payload).await;
        match &result {
            Ok(reply) => debug!(done = reply.done, "hiring manager replied to sender"),
            Err(e) => warn!(code = e.code(), error = %e, "hiring manager rejected message"),
        }
        emit(&events, LocalEvent::Handled(result));
    }
    debug!("hiring manager loop stopped");
}

async fn applicant_loop(
    applicant: Arc<ConcreteApplicant>,
    mut mailbox: mpsc::Receiver<Envelope>,
    cancel: CancellationToken,
    events: EventSink,
) {
    while let Some(envelope) = next_envelope(&mut mailbox, &cancel).await {
        let message = match serde_json::from_value::<OutboundMessage>(envelope.payload.clone()) {
            Ok(message) => message,
            Err(e) => {
                warn!(from = %envelope.from, error = %e, "applicant dropped malformed message");
                continue;
            }
        };
        emit(&events, LocalEvent::Received(envelope));

        let result = applicant.on_message(message).await;
        if let Err(e) = &result {
            warn!(error = %e, "applicant failed to answer");
        }
        emit(&events, LocalEvent::Applicant(result));
    }
    debug!("applicant loop stopped");
}
