//! In-process transport for tests.
//!
//! [`RecordingTransport`] captures every request it receives and answers from
//! a script. Once the script runs out it answers `204 No Content`.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::transport::{HttpRequest, HttpResponse, Transport, TransportError};

/// One scripted answer.
#[derive(Debug)]
pub enum ScriptedReply {
    Respond(HttpResponse),
    Fail(TransportError),
}

#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    requests: Arc<Mutex<Vec<HttpRequest>>>,
    replies: Arc<Mutex<VecDeque<ScriptedReply>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response with the given status and body.
    pub async fn respond(&self, status: u16, body: impl Into<String>) {
        self.replies
            .lock()
            .await
            .push_back(ScriptedReply::Respond(HttpResponse::new(status, body)));
    }

    /// Queues a transport failure.
    pub async fn fail(&self, error: TransportError) {
        self.replies
            .lock()
            .await
            .push_back(ScriptedReply::Fail(error));
    }

    /// Every request received so far, in order.
    pub async fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn request_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().await.push(request);
        match self.replies.lock().await.pop_front() {
            Some(ScriptedReply::Respond(response)) => Ok(response),
            Some(ScriptedReply::Fail(error)) => Err(error),
            None => Ok(HttpResponse::new(204, "")),
        }
    }
}
