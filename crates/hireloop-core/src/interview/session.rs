//! Interview session state machine.
//!
//! One [`ConversationRecord`] per applicant key moves through
//! `New -> Active -> Concluded`, and a turn arriving for a concluded record
//! starts a fresh interview. [`SessionMachine::advance`] is a single
//! read-modify-write of that record, serialized per key by an async mutex.
//! Nothing is written unless every responder and archive call in the turn
//! succeeded.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use hireloop_types::error::InterviewError;
use hireloop_types::inbound::ApplicantIdentity;
use hireloop_types::interview::{
    CONVERSATION_NAMESPACE, ConversationRecord, OutboundMessage, TranscriptEntry, TurnOutcome,
};
use hireloop_types::llm::LlmError;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::responder::Responder;
use crate::storage::archive::EvaluationArchive;
use crate::storage::kv_store::KvStore;

/// Drives conversations for all applicants.
pub struct SessionMachine<S, R, A> {
    store: Arc<S>,
    responder: Arc<R>,
    archive: Arc<A>,
    max_turns: u32,
    responder_timeout: Duration,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl<S, R, A> SessionMachine<S, R, A>
where
    S: KvStore,
    R: Responder,
    A: EvaluationArchive,
{
    pub fn new(
        store: Arc<S>,
        responder: Arc<R>,
        archive: Arc<A>,
        max_turns: u32,
        responder_timeout: Duration,
    ) -> Self {
        Self {
            store,
            responder,
            archive,
            max_turns,
            responder_timeout,
            locks: DashMap::new(),
        }
    }

    /// Load the persisted record for `key`, if any.
    pub async fn load(&self, key: &str) -> Result<Option<ConversationRecord>, InterviewError> {
        match self.store.get(CONVERSATION_NAMESPACE, key).await? {
            Some(value) => serde_json::from_value(value).map(Some).map_err(|e| {
                InterviewError::UpstreamFailure(format!("unreadable conversation record: {e}"))
            }),
            None => Ok(None),
        }
    }

    /// Run one interview turn for `applicant`.
    ///
    /// Appends `message` and the generated reply, decides whether the
    /// interview concludes, archives the evaluation on conclusion and
    /// persists the record. On any error the stored record is untouched.
    pub async fn advance(
        &self,
        applicant: &ApplicantIdentity,
        message: &str,
    ) -> Result<TurnOutcome, InterviewError> {
        let lock = self.lock_for(&applicant.key);
        let _guard = lock.lock().await;

        let mut record = match self.load(&applicant.key).await? {
            Some(mut record) => {
                if record.concluded {
                    info!(applicant_key = %applicant.key, "previous interview concluded, starting over");
                    record.reset();
                }
                record
            }
            None => {
                info!(applicant_key = %applicant.key, "creating conversation record");
                ConversationRecord::new()
            }
        };

        let prior_turns = record.turn_count;
        record.history.push(TranscriptEntry::Applicant {
            name: applicant.name.clone(),
            text: message.to_string(),
        });

        let generated = self
            .bounded(self.responder.next_turn(&record.transcript(), prior_turns))
            .await?;

        record.history.push(TranscriptEntry::HiringManager {
            category: generated.category,
            text: generated.message.clone(),
        });

        let concluded = prior_turns >= self.max_turns || generated.concluded;
        let evaluation = if concluded {
            info!(
                applicant_key = %applicant.key,
                turn_count = prior_turns,
                forced = !generated.concluded,
                "interview concluded, evaluating"
            );
            let report = self
                .bounded(self.responder.evaluate(&record.transcript()))
                .await?;
            self.archive.save(applicant, &report).await?;
            Some(report)
        } else {
            None
        };

        record.turn_count = prior_turns + 1;
        record.concluded = concluded;
        record.updated_at = Some(Utc::now());

        let value = serde_json::to_value(&record).map_err(|e| {
            InterviewError::UpstreamFailure(format!("unserializable conversation record: {e}"))
        })?;
        self.store
            .set(CONVERSATION_NAMESPACE, &applicant.key, &value)
            .await?;

        info!(
            applicant_key = %applicant.key,
            turn_count = record.turn_count,
            concluded,
            "turn persisted"
        );

        Ok(TurnOutcome {
            outbound: OutboundMessage {
                message: generated.message,
                concluded,
            },
            record,
            evaluation,
        })
    }

    fn lock_for(&self, key: &str) -> Arc<Mutex<()>> {
        Arc::clone(
            self.locks
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .value(),
        )
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, LlmError>>,
    ) -> Result<T, InterviewError> {
        match tokio::time::timeout(self.responder_timeout, call).await {
            Ok(result) => Ok(result?),
            Err(_) => {
                warn!(timeout_secs = self.responder_timeout.as_secs(), "responder timed out");
                Err(LlmError::Timeout(self.responder_timeout.as_secs()).into())
            }
        }
    }
}
