//! Scripted collaborator for tests and offline demos.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{
    ClientError, Collaborator, CollaboratorFuture, ExtractResponse, ProcessResponse,
    ProcessSummary,
};
use crate::registry::UploadFile;

/// A cloneable stand-in for [`ClientError`].
#[derive(Debug, Clone)]
pub enum MockFailure {
    Status(u16),
    ExtractRejected { status: u16, body: String },
    Malformed(String),
}

impl From<MockFailure> for ClientError {
    fn from(f: MockFailure) -> Self {
        match f {
            MockFailure::Status(code) => ClientError::Status(code),
            MockFailure::ExtractRejected { status, body } => {
                ClientError::ExtractRejected { status, body }
            }
            MockFailure::Malformed(msg) => ClientError::Decode(msg),
        }
    }
}

type Script<T> = Mutex<VecDeque<Result<T, MockFailure>>>;

/// A hand-rolled [`Collaborator`] that replays scripted replies.
///
/// Each operation has its own queue. Replies are consumed in order and the
/// last one repeats once the queue is down to a single entry. An empty
/// queue answers with HTTP 501.
#[derive(Default)]
pub struct MockCollaborator {
    process: Script<ProcessResponse>,
    extract: Script<ExtractResponse>,
    download: Script<Vec<u8>>,
    delay: Option<Duration>,
    process_calls: AtomicUsize,
    extract_calls: AtomicUsize,
    download_calls: AtomicUsize,
    last_process_text: Mutex<Option<String>>,
    last_extract_names: Mutex<Vec<String>>,
}

fn next_reply<T: Clone>(script: &Script<T>) -> Result<T, MockFailure> {
    let mut queue = script.lock().unwrap_or_else(|e| e.into_inner());
    match queue.len() {
        0 => Err(MockFailure::Status(501)),
        1 => queue[0].clone(),
        _ => queue.pop_front().unwrap_or(Err(MockFailure::Status(501))),
    }
}

impl MockCollaborator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_process(self, reply: Result<ProcessResponse, MockFailure>) -> Self {
        self.process
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(reply);
        self
    }

    pub fn on_extract(self, reply: Result<ExtractResponse, MockFailure>) -> Self {
        self.extract
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(reply);
        self
    }

    pub fn on_download(self, reply: Result<Vec<u8>, MockFailure>) -> Self {
        self.download
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(reply);
        self
    }

    /// Simulated latency applied to every call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn process_calls(&self) -> usize {
        self.process_calls.load(Ordering::SeqCst)
    }

    pub fn extract_calls(&self) -> usize {
        self.extract_calls.load(Ordering::SeqCst)
    }

    pub fn download_calls(&self) -> usize {
        self.download_calls.load(Ordering::SeqCst)
    }

    /// Text of the most recent process call.
    pub fn last_process_text(&self) -> Option<String> {
        self.last_process_text
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// File names of the most recent extract call, in submission order.
    pub fn last_extract_names(&self) -> Vec<String> {
        self.last_extract_names
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl Collaborator for MockCollaborator {
    fn process<'a>(&'a self, references: &'a str) -> CollaboratorFuture<'a, ProcessResponse> {
        self.process_calls.fetch_add(1, Ordering::SeqCst);
        *self
            .last_process_text
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = Some(references.to_string());
        let reply = next_reply(&self.process);
        let delay = self.delay;
        Box::pin(async move {
            if let Some(d) = delay {
                tokio::time::sleep(d).await;
            }
            reply.map_err(ClientError::from)
        })
    }

    fn extract<'a>(&'a self, files: &'a [UploadFile]) -> CollaboratorFuture<'a, ExtractResponse> {
        self.extract_calls.fetch_add(1, Ordering::SeqCst);
        *self
            .last_extract_names
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = files.iter().map(|f| f.name.clone()).collect();
        let reply = next_reply(&self.extract);
        let delay = self.delay;
        Box::pin(async move {
            if let Some(d) = delay {
                tokio::time::sleep(d).await;
            }
            reply.map_err(ClientError::from)
        })
    }

    fn download_report<'a>(&'a self, _references: &'a str) -> CollaboratorFuture<'a, Vec<u8>> {
        self.download_calls.fetch_add(1, Ordering::SeqCst);
        let reply = next_reply(&self.download);
        let delay = self.delay;
        Box::pin(async move {
            if let Some(d) = delay {
                tokio::time::sleep(d).await;
            }
            reply.map_err(ClientError::from)
        })
    }
}

/// A successful process payload.
pub fn processed(formatted_output: &str, errors: usize, preview: &str) -> ProcessResponse {
    ProcessResponse {
        success: true,
        formatted_output: Some(formatted_output.to_string()),
        summary: Some(ProcessSummary {
            total: 0,
            success: 0,
            errors,
        }),
        preview: Some(preview.to_string()),
        ..ProcessResponse::default()
    }
}

/// A process payload that reports failure.
pub fn process_failed(error: &str) -> ProcessResponse {
    ProcessResponse {
        success: false,
        error: Some(error.to_string()),
        ..ProcessResponse::default()
    }
}

/// An extract payload carrying `text`.
pub fn extracted(text: &str) -> ExtractResponse {
    ExtractResponse {
        text: Some(text.to_string()),
    }
}
