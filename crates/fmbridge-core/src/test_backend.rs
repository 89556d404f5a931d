//! Scripted backend doubles for exercising the dispatcher and sessions.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::availability::ModelAvailability;
use crate::backend::{BackendFailure, GuidedGeneration, TextModelBackend};
use crate::request::{GenerationReply, GenerationRequest, GuidedReply, GuidedRequest};

/// A backend that replays a queue of canned replies and records what it
/// was asked.
pub(crate) struct ScriptedBackend {
    availability: ModelAvailability,
    text_replies: Mutex<VecDeque<Result<GenerationReply, BackendFailure>>>,
    text_calls: AtomicUsize,
    last_text_request: Mutex<Option<GenerationRequest>>,
    guided: Option<ScriptedGuided>,
}

impl ScriptedBackend {
    pub(crate) fn available() -> Self {
        Self {
            availability: ModelAvailability::Available,
            text_replies: Mutex::new(VecDeque::new()),
            text_calls: AtomicUsize::new(0),
            last_text_request: Mutex::new(None),
            guided: None,
        }
    }

    pub(crate) fn with_availability(mut self, availability: ModelAvailability) -> Self {
        self.availability = availability;
        self
    }

    pub(crate) fn with_guided(mut self, guided: ScriptedGuided) -> Self {
        self.guided = Some(guided);
        self
    }

    pub(crate) fn push_text(self, reply: Result<GenerationReply, BackendFailure>) -> Self {
        self.text_replies
            .lock()
            .expect("script lock should not be poisoned")
            .push_back(reply);
        self
    }

    pub(crate) fn push_text_ok(self, text: &str, session_id: &str) -> Self {
        self.push_text(Ok(GenerationReply {
            text: text.to_owned(),
            session_id: session_id.to_owned(),
        }))
    }

    pub(crate) fn text_calls(&self) -> usize {
        self.text_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn last_text_request(&self) -> Option<GenerationRequest> {
        self.last_text_request
            .lock()
            .expect("script lock should not be poisoned")
            .clone()
    }

    pub(crate) fn guided_calls(&self) -> usize {
        self.guided.as_ref().map_or(0, ScriptedGuided::calls)
    }

    pub(crate) fn last_guided_request(&self) -> Option<GuidedRequest> {
        self.guided.as_ref().and_then(ScriptedGuided::last_request)
    }
}

#[async_trait]
impl TextModelBackend for ScriptedBackend {
    async fn check_availability(&self) -> ModelAvailability {
        self.availability
    }

    async fn generate_text(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationReply, BackendFailure> {
        self.text_calls.fetch_add(1, Ordering::SeqCst);
        *self
            .last_text_request
            .lock()
            .expect("script lock should not be poisoned") = Some(request.clone());
        self.text_replies
            .lock()
            .expect("script lock should not be poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(BackendFailure::coded("RUNTIME", "text script exhausted")))
    }

    fn guided(&self) -> Option<&dyn GuidedGeneration> {
        self.guided
            .as_ref()
            .map(|guided| guided as &dyn GuidedGeneration)
    }
}

/// A guided capability that replays a queue of canned replies.
pub(crate) struct ScriptedGuided {
    replies: Mutex<VecDeque<Result<GuidedReply, BackendFailure>>>,
    calls: AtomicUsize,
    last_request: Mutex<Option<GuidedRequest>>,
}

impl ScriptedGuided {
    pub(crate) fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub(crate) fn push(self, reply: Result<GuidedReply, BackendFailure>) -> Self {
        self.replies
            .lock()
            .expect("script lock should not be poisoned")
            .push_back(reply);
        self
    }

    pub(crate) fn push_ok(self, json: &str, session_id: &str) -> Self {
        self.push(Ok(GuidedReply {
            json: json.to_owned(),
            session_id: session_id.to_owned(),
        }))
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_request(&self) -> Option<GuidedRequest> {
        self.last_request
            .lock()
            .expect("script lock should not be poisoned")
            .clone()
    }
}

#[async_trait]
impl GuidedGeneration for ScriptedGuided {
    async fn generate_object(
        &self,
        request: &GuidedRequest,
    ) -> Result<GuidedReply, BackendFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self
            .last_request
            .lock()
            .expect("script lock should not be poisoned") = Some(request.clone());
        self.replies
            .lock()
            .expect("script lock should not be poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(BackendFailure::coded("RUNTIME", "guided script exhausted")))
    }
}
