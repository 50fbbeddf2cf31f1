// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The Tokenizer Driver: the caller-facing facade. Initializes the cache,
//! accepts edit notifications, returns tokens for any line, and picks between
//! running the [`crate::cache::DocumentHighlightState`] in-process or driving
//! it through the [`crate::worker`] offload transport.

use crate::cache::DocumentHighlightState;
use crate::edit::{EditNotification, PendingEdit};
use crate::token::{LanguageId, Token};
use crate::worker::{WorkerHandle, WorkerResponse};
use tracing::{debug, info, warn};

/// The construction-time accessors a driver needs from its embedder — a
/// language accessor, a line accessor, a line-count accessor, a version
/// accessor, and an edit-metadata accessor with a way to clear it — bundled
/// as one trait so an embedder writes a single adapter over its own text
/// buffer instead of five separate closures.
pub trait DocumentSource {
    fn language(&self) -> LanguageId;
    fn line_count(&self) -> usize;
    fn line(&self, index: usize) -> String;
    /// The consumer's monotonic version counter: bumped whenever the
    /// consumer mutates text. The driver polls this to notice edits.
    fn version(&self) -> u64;
    /// Returns and clears the most recent edit's metadata. `None` means no
    /// edit is pending, or it was already consumed by a prior poll.
    fn take_pending_edit(&mut self) -> Option<PendingEdit>;

    /// Snapshots every line of the current document. The cache's full-init
    /// and incremental update both need the complete current text; this is
    /// the one place that assembles it from the per-line accessor.
    fn snapshot_lines(&self) -> Vec<String> {
        (0..self.line_count()).map(|i| self.line(i)).collect()
    }
}

/// Tunable parameters: the worker-offload threshold and the cooperative-yield
/// granularity for long in-process updates. This is the crate's only
/// configuration surface: a typed struct passed at construction, not a
/// hardcoded constant, a file, or an env var.
#[derive(Debug, Clone, Copy)]
pub struct DriverConfig {
    /// Documents with more lines than this use the offload transport.
    pub offload_line_threshold: usize,
    /// Lets callers without a background execution context (tests, or a host
    /// that can't spawn threads) force in-process mode regardless of size.
    pub offload_enabled: bool,
    /// How many lines an in-process update processes before it would yield
    /// cooperatively. This crate's update path runs to completion in one
    /// synchronous call — there's no scheduler to yield to on a single thread
    /// with no competing work — so this field only gates a diagnostic log,
    /// not an actual suspension point; offload mode is how this crate keeps
    /// large documents off the caller's thread.
    pub cooperative_yield_lines: usize,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self { offload_line_threshold: 1_000, offload_enabled: true, cooperative_yield_lines: 2_000 }
    }
}

enum Backend {
    InProcess,
    Offloaded(WorkerHandle),
}

/// The caller-facing facade. Owns exactly one [`DocumentHighlightState`] for
/// one open document, plus whichever backend is currently producing it.
pub struct Driver<S: DocumentSource> {
    source: S,
    config: DriverConfig,
    cache: DocumentHighlightState,
    backend: Backend,
    /// The last document version this driver has seen from `source`, used to
    /// detect that an edit happened at all.
    last_seen_version: u64,
    /// The version most recently sent to the offload worker; responses
    /// carrying an older version are stale.
    last_sent_version: u64,
    /// The language the backend (in-process cache or background worker) is
    /// currently tokenizing under, tracked separately from `cache.language()`
    /// because while offloaded the cache doesn't update until the response
    /// for a language-change request comes back.
    pending_language: LanguageId,
    ready: bool,
    on_ready: Option<Box<dyn FnMut()>>,
    on_error: Option<Box<dyn FnMut(String)>>,
    disposed: bool,
}

impl<S: DocumentSource> Driver<S> {
    /// Constructs a driver and performs the first full initialization
    /// immediately.
    pub fn new(mut source: S, config: DriverConfig) -> Self {
        let language = source.language();
        let lines = source.snapshot_lines();
        let version = source.version();
        source.take_pending_edit();

        let mut driver = Self {
            source,
            config,
            cache: DocumentHighlightState::full_init(language, &[], version),
            backend: Backend::InProcess,
            last_seen_version: version,
            last_sent_version: version,
            pending_language: language,
            ready: false,
            on_ready: None,
            on_error: None,
            disposed: false,
        };
        driver.establish_backend(language, lines, version);
        driver
    }

    /// Tears down whatever backend is running and spins up a fresh one under
    /// `language`, choosing in-process vs. offload by the current line count.
    /// Dropping the old `WorkerHandle`, if any, disposes its background
    /// thread.
    fn establish_backend(&mut self, language: LanguageId, lines: Vec<String>, version: u64) {
        let use_offload = self.config.offload_enabled && lines.len() > self.config.offload_line_threshold;
        self.pending_language = language;
        self.last_sent_version = version;

        if use_offload {
            info!(language = ?language, line_count = lines.len(), "driver offloading large document to background worker");
            self.backend = Backend::Offloaded(WorkerHandle::spawn(language, lines, version));
            self.ready = false;
        } else {
            if lines.len() > self.config.cooperative_yield_lines {
                debug!(line_count = lines.len(), "large in-process init; no offload facility, running synchronously");
            }
            self.cache.reinit(language, &lines, version);
            self.backend = Backend::InProcess;
            self.ready = true;
            self.fire_ready();
        }
    }

    /// Returns the tokens for `line_number` (1-indexed). Empty for
    /// out-of-range lines or before the cache has ever been populated. Never
    /// triggers tokenization — purely a cache read.
    pub fn get_tokens(&self, line_number: usize) -> Vec<Token> {
        if line_number == 0 {
            return Vec::new();
        }
        self.cache.get_tokens(line_number - 1).map(|tokens| tokens.to_vec()).unwrap_or_default()
    }

    /// True once the first init has populated the cache. In offload mode this
    /// stays false until the first `init-complete` arrives.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Registers a readiness callback. Fires once, the next time (or
    /// immediately, if already ready) the cache becomes populated.
    pub fn on_ready(&mut self, callback: impl FnMut() + 'static) {
        if self.ready {
            let mut callback = callback;
            callback();
            return;
        }
        self.on_ready = Some(Box::new(callback));
    }

    /// Registers the offload-error callback: invoked once per offload
    /// failure, with the message the driver falls back on in-process mode
    /// for.
    pub fn on_error(&mut self, callback: impl FnMut(String) + 'static) {
        self.on_error = Some(Box::new(callback));
    }

    /// Releases all resources, including the background execution context.
    /// Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.backend = Backend::InProcess;
        self.cache = DocumentHighlightState::full_init(self.pending_language, &[], self.last_seen_version);
        self.ready = false;
        self.disposed = true;
    }

    /// Drains any offload responses and, if the source's version has moved
    /// on, issues whatever update or reinit that implies. Call this from the
    /// host's event loop after any text mutation.
    pub fn poll(&mut self) {
        if self.disposed {
            return;
        }

        self.drain_worker_responses();

        let version = self.source.version();
        if version == self.last_seen_version {
            return;
        }
        self.last_seen_version = version;

        let language = self.source.language();
        let pending = self.source.take_pending_edit();

        if language != self.pending_language {
            let lines = self.source.snapshot_lines();
            self.establish_backend(language, lines, version);
            return;
        }

        let changed_from_line = pending.map(|edit| edit.changed_from_line).unwrap_or(1);

        match &self.backend {
            Backend::InProcess => {
                let lines = self.source.snapshot_lines();
                let edit = EditNotification { changed_from_line, total_line_count: lines.len(), version };
                self.cache.update(&lines, edit);
            }
            Backend::Offloaded(handle) => {
                let all_lines = self.source.snapshot_lines();
                let keep = changed_from_line.saturating_sub(1).min(all_lines.len());
                let suffix = all_lines[keep..].to_vec();
                handle.send_update(language, changed_from_line, suffix, all_lines.len(), version);
                self.last_sent_version = version;
            }
        }
    }

    fn drain_worker_responses(&mut self) {
        let Backend::Offloaded(handle) = &self.backend else { return };

        let mut responses = Vec::new();
        while let Some(response) = handle.try_recv() {
            responses.push(response);
        }

        for response in responses {
            // Drop anything answering an older request than the most recent
            // one this driver sent.
            if response.version() < self.last_sent_version {
                debug!(version = response.version(), last_sent = self.last_sent_version, "dropping outdated worker response");
                continue;
            }

            match response {
                WorkerResponse::InitComplete { version, lines } => {
                    self.cache.adopt_remote_full(self.pending_language, lines, version);
                    if !self.ready {
                        self.ready = true;
                        self.fire_ready();
                    }
                }
                WorkerResponse::UpdateComplete { version, changed_from_line, lines } => {
                    self.cache.apply_remote_suffix(changed_from_line.saturating_sub(1), lines, version);
                }
                WorkerResponse::Error { message, .. } => {
                    self.fall_back_to_in_process(message);
                }
            }
        }
    }

    /// On an offload error, fall back to in-process mode and immediately
    /// perform a full-init, recording the error once.
    fn fall_back_to_in_process(&mut self, message: String) {
        warn!(error = %message, "offload worker reported an error; falling back to in-process tokenization");
        if let Some(callback) = self.on_error.as_mut() {
            callback(message);
        }
        let lines = self.source.snapshot_lines();
        self.cache.reinit(self.pending_language, &lines, self.last_seen_version);
        self.backend = Backend::InProcess;
        self.ready = true;
        self.fire_ready();
    }

    fn fire_ready(&mut self) {
        if let Some(callback) = self.on_ready.as_mut() {
            callback();
        }
    }
}
