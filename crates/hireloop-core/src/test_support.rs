//! In-memory fakes of the ports, shared by the unit tests in this crate.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use hireloop_types::error::RepositoryError;
use hireloop_types::inbound::{ApplicantIdentity, ReplyRoute};
use hireloop_types::interview::{GeneratedTurn, QuestionCategory};
use hireloop_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, Message, StopReason, Usage,
};

use crate::delivery::{Delivery, DeliveryError};
use crate::interview::responder::Responder;
use crate::llm::provider::LlmProvider;
use crate::storage::archive::EvaluationArchive;
use crate::storage::kv_store::KvStore;

#[derive(Default)]
pub struct MemoryKvStore {
    entries: Mutex<HashMap<(String, String), serde_json::Value>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryKvStore {
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }

    fn check(&self, flag: &AtomicBool) -> Result<(), RepositoryError> {
        if flag.load(Ordering::SeqCst) {
            Err(RepositoryError::Query("injected failure".to_string()))
        } else {
            Ok(())
        }
    }
}

impl KvStore for MemoryKvStore {
    async fn get(
        &self,
        namespace: &str,
        key: &str,
    ) -> Result<Option<serde_json::Value>, RepositoryError> {
        self.check(&self.fail_reads)?;
        let entries = self.entries.lock().unwrap();
        Ok(entries
            .get(&(namespace.to_string(), key.to_string()))
            .cloned())
    }

    async fn set(
        &self,
        namespace: &str,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<(), RepositoryError> {
        self.check(&self.fail_writes)?;
        self.entries
            .lock()
            .unwrap()
            .insert((namespace.to_string(), key.to_string()), value.clone());
        Ok(())
    }

    async fn delete(&self, namespace: &str, key: &str) -> Result<(), RepositoryError> {
        self.check(&self.fail_writes)?;
        self.entries
            .lock()
            .unwrap()
            .remove(&(namespace.to_string(), key.to_string()));
        Ok(())
    }
}

enum Scripted {
    Turn(GeneratedTurn),
    Failure,
}

/// Responder that replays queued turns, then falls back to a
/// deterministic question derived from the turn index.
#[derive(Default)]
pub struct ScriptedResponder {
    script: Mutex<VecDeque<Scripted>>,
    turn_calls: Mutex<Vec<(String, u32)>>,
    evaluations: AtomicUsize,
    fail_evaluation: AtomicBool,
    delay: Mutex<Option<Duration>>,
}

impl ScriptedResponder {
    pub fn push_turn(&self, message: &str, category: QuestionCategory, concluded: bool) {
        self.script.lock().unwrap().push_back(Scripted::Turn(GeneratedTurn {
            message: message.to_string(),
            category,
            concluded,
        }));
    }

    pub fn push_failure(&self) {
        self.script.lock().unwrap().push_back(Scripted::Failure);
    }

    pub fn fail_next_evaluation(&self) {
        self.fail_evaluation.store(true, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn turn_calls(&self) -> Vec<(String, u32)> {
        self.turn_calls.lock().unwrap().clone()
    }

    pub fn evaluation_count(&self) -> usize {
        self.evaluations.load(Ordering::SeqCst)
    }

    async fn pause(&self) {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

impl Responder for ScriptedResponder {
    async fn next_turn(&self, transcript: &str, turn: u32) -> Result<GeneratedTurn, LlmError> {
        self.pause().await;
        self.turn_calls
            .lock()
            .unwrap()
            .push((transcript.to_string(), turn));

        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Scripted::Turn(generated)) => Ok(generated),
            Some(Scripted::Failure) => Err(LlmError::Provider {
                message: "scripted failure".to_string(),
            }),
            None => Ok(GeneratedTurn {
                message: format!("Question {turn}"),
                category: QuestionCategory::ALL[turn as usize % QuestionCategory::ALL.len()],
                concluded: false,
            }),
        }
    }

    async fn evaluate(&self, _transcript: &str) -> Result<String, LlmError> {
        self.pause().await;
        if self.fail_evaluation.swap(false, Ordering::SeqCst) {
            return Err(LlmError::Overloaded("scripted evaluation failure".to_string()));
        }
        let n = self.evaluations.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("evaluation #{n}"))
    }
}

#[derive(Default)]
pub struct MemoryArchive {
    saved: Mutex<Vec<(ApplicantIdentity, String)>>,
    fail: AtomicBool,
}

impl MemoryArchive {
    pub fn saved(&self) -> Vec<(ApplicantIdentity, String)> {
        self.saved.lock().unwrap().clone()
    }

    pub fn fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

impl EvaluationArchive for MemoryArchive {
    async fn save(&self, applicant: &ApplicantIdentity, report: &str) -> Result<(), RepositoryError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(RepositoryError::FileSystem("disk full".to_string()));
        }
        self.saved
            .lock()
            .unwrap()
            .push((applicant.clone(), report.to_string()));
        Ok(())
    }
}

/// Delivery that records every payload instead of sending it.
#[derive(Default)]
pub struct RecordingDelivery {
    sent: Mutex<Vec<(String, ReplyRoute, serde_json::Value)>>,
    fail: AtomicBool,
    unreachable: AtomicBool,
}

impl RecordingDelivery {
    pub fn sent(&self) -> Vec<(String, ReplyRoute, serde_json::Value)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }
}

impl Delivery for RecordingDelivery {
    async fn deliver(
        &self,
        from: &str,
        route: &ReplyRoute,
        payload: &serde_json::Value,
    ) -> Result<(), DeliveryError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DeliveryError::Rejected { status: 503 });
        }
        self.sent
            .lock()
            .unwrap()
            .push((from.to_string(), route.clone(), payload.clone()));
        Ok(())
    }

    fn is_reachable(&self, _route: &ReplyRoute) -> bool {
        !self.unreachable.load(Ordering::SeqCst)
    }
}

/// LLM provider that replays canned text responses and records requests.
#[derive(Clone)]
pub struct FakeProvider {
    replies: Arc<Mutex<VecDeque<String>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl FakeProvider {
    pub fn replying<I, T>(replies: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            replies: Arc::new(Mutex::new(replies.into_iter().map(Into::into).collect())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request(text: &str) -> CompletionRequest {
        CompletionRequest {
            model: "fake-model".to_string(),
            messages: vec![Message::user(text)],
            system: None,
            max_tokens: 64,
            temperature: None,
            stop_sequences: None,
            output_config: None,
        }
    }
}

impl LlmProvider for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(content) => Ok(CompletionResponse {
                id: "msg_fake".to_string(),
                content,
                model: request.model.clone(),
                stop_reason: StopReason::EndTurn,
                usage: Usage::default(),
            }),
            None => Err(LlmError::Provider {
                message: "no scripted reply left".to_string(),
            }),
        }
    }
}
