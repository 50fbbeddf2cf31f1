// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The offload transport: a background execution context for documents too
//! large to tokenize on the calling thread. A plain OS thread plus a
//! request/response channel, no async runtime.
//!
//! Wire messages are plain, serde-serializable data even though the
//! in-process channel never actually serializes them: this documents, and
//! lets tests enforce, that nothing behind this boundary shares memory with
//! the caller. `version` on every request/response is the document's own
//! monotonic version counter — the one the caller bumps on every text
//! mutation — not a private sequence number of the transport's own, so that
//! the outdated-response filter compares on the same axis the caller already
//! reasons about.

use crate::cache::{DocumentHighlightState, LineHighlight};
use crate::edit::EditNotification;
use crate::token::LanguageId;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use serde::{Deserialize, Serialize};
use std::thread::JoinHandle;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum WorkerRequest {
    Init { language: LanguageId, lines: Vec<String>, version: u64 },
    Update {
        language: LanguageId,
        changed_from_line: usize,
        lines_from_changed: Vec<String>,
        total_line_count: usize,
        version: u64,
    },
    Dispose,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum WorkerResponse {
    /// `lines` is the full new sequence.
    InitComplete { version: u64, lines: Vec<LineHighlight> },
    /// `lines` is only the suffix starting at `changed_from_line`.
    UpdateComplete { version: u64, changed_from_line: usize, lines: Vec<LineHighlight> },
    Error { version: u64, message: String },
}

impl WorkerResponse {
    /// The document version this response answers, used by the
    /// outdated-response filter regardless of which variant arrived.
    pub fn version(&self) -> u64 {
        match self {
            WorkerResponse::InitComplete { version, .. } => *version,
            WorkerResponse::UpdateComplete { version, .. } => *version,
            WorkerResponse::Error { version, .. } => *version,
        }
    }
}

/// The offload boundary's typed failure modes. Rendered to a plain message
/// string only at the driver's error-callback boundary.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("offload worker thread is no longer running")]
    WorkerThreadDied,
    #[error("offload worker channel disconnected before a response arrived")]
    ChannelDisconnected,
    #[error("timed out waiting for the offload worker to respond")]
    Timeout,
}

/// A document's background execution context. Owns the thread and the two
/// ends of the request/response channel; dropping it disposes the worker.
pub struct WorkerHandle {
    to_worker: Sender<WorkerRequest>,
    from_worker: Receiver<WorkerResponse>,
    join: Option<JoinHandle<()>>,
}

impl WorkerHandle {
    /// Spawns the background thread and sends the initial tokenization request.
    /// Does not block for the response; call [`WorkerHandle::recv_blocking`] (or
    /// poll with [`WorkerHandle::try_recv`]) to collect `InitComplete`.
    pub fn spawn(language: LanguageId, lines: Vec<String>, version: u64) -> Self {
        let (to_worker_tx, to_worker_rx) = crossbeam_channel::unbounded::<WorkerRequest>();
        let (from_worker_tx, from_worker_rx) = crossbeam_channel::unbounded::<WorkerResponse>();

        let join = std::thread::Builder::new()
            .name("maple-syntax-worker".into())
            .spawn(move || worker_loop(to_worker_rx, from_worker_tx))
            .expect("failed to spawn offload worker thread");

        let handle = Self { to_worker: to_worker_tx, from_worker: from_worker_rx, join: Some(join) };
        handle.send(WorkerRequest::Init { language, lines, version });
        handle
    }

    fn send(&self, request: WorkerRequest) {
        if self.to_worker.send(request).is_err() {
            warn!("offload worker channel closed; worker thread likely died");
        }
    }

    /// Sends an incremental update request. `lines_from_changed` is only the
    /// suffix from `changed_from_line` onward — the background retains its own
    /// copy of the document text and splices it in, the same way the driver's
    /// local cache only ever sees the changed suffix plus whatever it already
    /// had cached.
    pub fn send_update(
        &self,
        language: LanguageId,
        changed_from_line: usize,
        lines_from_changed: Vec<String>,
        total_line_count: usize,
        version: u64,
    ) {
        self.send(WorkerRequest::Update { language, changed_from_line, lines_from_changed, total_line_count, version });
    }

    /// Non-blocking poll for a response; the calling thread must never block
    /// on the worker. Returns `None` if nothing has arrived yet.
    pub fn try_recv(&self) -> Option<WorkerResponse> {
        self.from_worker.try_recv().ok()
    }

    /// Blocks up to `timeout` for a response. Used by tests and by the driver's
    /// synchronous fallback path; the editor's real event loop should prefer
    /// [`WorkerHandle::try_recv`].
    pub fn recv_blocking(&self, timeout: Duration) -> Result<WorkerResponse, WorkerError> {
        match self.from_worker.recv_timeout(timeout) {
            Ok(response) => Ok(response),
            Err(RecvTimeoutError::Timeout) => Err(WorkerError::Timeout),
            Err(RecvTimeoutError::Disconnected) => Err(WorkerError::ChannelDisconnected),
        }
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        self.send(WorkerRequest::Dispose);
        if let Some(join) = self.join.take() {
            if join.join().is_err() {
                error!("offload worker thread panicked during disposal");
            }
        }
    }
}

/// The background peer's private state: the token cache plus the raw
/// document text it was built from. The raw text has to be retained here
/// too, separately from the driver's own copy, because an `update` request
/// only ships the changed suffix — reconstructing the document for a
/// language-change reinit needs the untouched prefix, and the cache itself
/// only stores tokens and states, not source text.
struct WorkerDocument {
    state: DocumentHighlightState,
    text: Vec<String>,
}

/// The background thread's body: owns its own [`DocumentHighlightState`] and
/// processes requests until `Dispose` or the channel closes.
fn worker_loop(requests: Receiver<WorkerRequest>, responses: Sender<WorkerResponse>) {
    let mut doc: Option<WorkerDocument> = None;

    for request in requests.iter() {
        match request {
            WorkerRequest::Init { language, lines, version } => {
                let state = DocumentHighlightState::full_init(language, &lines, version);
                let response = WorkerResponse::InitComplete { version, lines: state.lines().to_vec() };
                doc = Some(WorkerDocument { state, text: lines });
                if responses.send(response).is_err() {
                    return;
                }
            }
            WorkerRequest::Update { language, changed_from_line, lines_from_changed, total_line_count, version } => {
                let Some(current) = doc.as_mut() else {
                    let message = format!("update received before init (version {version})");
                    let _ = responses.send(WorkerResponse::Error { version, message });
                    continue;
                };

                let keep = changed_from_line.saturating_sub(1).min(current.text.len());
                let mut text = current.text[..keep].to_vec();
                text.extend(lines_from_changed);
                text.truncate(total_line_count);

                // A differing language means the existing chain is meaningless,
                // so rebuild from scratch and answer as if this had been an `init`.
                if language != current.state.language() {
                    let state = DocumentHighlightState::full_init(language, &text, version);
                    let response = WorkerResponse::InitComplete { version, lines: state.lines().to_vec() };
                    *current = WorkerDocument { state, text };
                    if responses.send(response).is_err() {
                        return;
                    }
                } else {
                    let edit = EditNotification { changed_from_line, total_line_count, version };
                    current.state.update(&text, edit);
                    current.text = text;
                    let suffix_start = keep.min(current.state.lines().len());
                    let lines = current.state.lines()[suffix_start..].to_vec();
                    let response = WorkerResponse::UpdateComplete { version, changed_from_line, lines };
                    if responses.send(response).is_err() {
                        return;
                    }
                }
            }
            WorkerRequest::Dispose => return,
        }
    }
}
