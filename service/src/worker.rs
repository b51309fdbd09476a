//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Highlight worker implementation
//!
//! A HighlightWorker is one armed recomputation of one document:
//! - Waits out the debounce delay
//! - Serializes with other recomputations of the same document
//! - Re-checks the size ceiling against a fresh snapshot
//! - Publishes the snapshot together with the spans computed from it
//! - Computes spans on the blocking pool
//! - Publishes only if nothing newer happened in the meantime

use crate::scheduler::ScheduledDocument;
use crate::{
    DocumentHighlights, DocumentId, DocumentSource, DocumentState, HighlightError,
    HighlightHandler, HighlightSettings, SchedulerMetrics, SpanCache,
};
use ansilog_sgrcodec::{HighlightConfig, Highlights};
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::Weak;
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Scheduling state shared between the registry and a document's workers
#[derive(Debug)]
pub(crate) struct DocumentShared {
    /// Bumped on every edit; a worker only publishes its own generation
    generation: AtomicU64,
    /// Current [`DocumentState`]
    state: AtomicU8,
    /// Held across the blocking computation
    compute_lock: Arc<Mutex<()>>,
}

impl DocumentShared {
    pub(crate) fn new() -> Self {
        Self {
            generation: AtomicU64::new(0),
            state: AtomicU8::new(DocumentState::Idle.as_u8()),
            compute_lock: Arc::new(Mutex::new(())),
        }
    }

    pub(crate) fn state(&self) -> DocumentState {
        DocumentState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Records an edit, returning its generation
    pub(crate) fn bump(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Sets the state unless the document is already closed
    pub(crate) fn set_state(&self, state: DocumentState) {
        let _ = self
            .state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                (current != DocumentState::Closed.as_u8()).then_some(state.as_u8())
            });
    }

    pub(crate) fn close(&self) {
        self.state
            .store(DocumentState::Closed.as_u8(), Ordering::Release);
    }

    fn transition(&self, from: DocumentState, to: DocumentState) -> bool {
        self.state
            .compare_exchange(from.as_u8(), to.as_u8(), Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

/// Per-recomputation settings, captured when the worker is armed
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Quiet period before computing
    pub debounce: Duration,
    /// Size ceiling in characters
    pub max_document_chars: usize,
    /// Span builder options
    pub highlight: HighlightConfig,
}

impl From<&HighlightSettings> for WorkerConfig {
    fn from(settings: &HighlightSettings) -> Self {
        Self {
            debounce: settings.debounce,
            max_document_chars: settings.max_document_chars,
            highlight: settings.highlight_config(),
        }
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self::from(&HighlightSettings::default())
    }
}

/// Why a worker finished without publishing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Skip {
    /// A newer edit arrived or the document was unregistered
    Stale,
    /// The document was dropped by its owner, possibly mid computation
    Dropped,
    /// The document exceeded the size ceiling when the timer fired
    Oversized,
}

/// One armed recomputation of a single document
pub(crate) struct HighlightWorker {
    pub(crate) id: DocumentId,
    pub(crate) generation: u64,
    pub(crate) source: Weak<dyn DocumentSource>,
    pub(crate) shared: Arc<DocumentShared>,
    pub(crate) config: WorkerConfig,
    pub(crate) handler: Arc<dyn HighlightHandler>,
    pub(crate) metrics: Arc<SchedulerMetrics>,
    pub(crate) cache: Option<Arc<SpanCache>>,
    pub(crate) documents: Arc<DashMap<DocumentId, ScheduledDocument>>,
}

impl HighlightWorker {
    /// Debounce, then compute and publish
    pub(crate) async fn run(self) {
        tokio::time::sleep(self.config.debounce).await;
        tracing::trace!(document_id = %self.id, generation = self.generation, "Debounce elapsed");
        let _ = self.execute().await;
    }

    /// Moves the state from `from` to `to` if this worker's edit is still the
    /// latest
    ///
    /// Runs under the registry entry, so it cannot interleave with
    /// `notify_edit`. Leaving `Pending` detaches the worker from the entry's
    /// pending slot; later edits then discard this run instead of aborting it.
    fn advance(&self, from: DocumentState, to: DocumentState) -> bool {
        let Some(mut entry) = self.documents.get_mut(&self.id) else {
            return false;
        };
        if self.shared.generation() != self.generation || !self.shared.transition(from, to) {
            return false;
        }
        if from == DocumentState::Pending {
            entry.detach_pending();
        }
        true
    }

    /// Compute and publish without waiting
    ///
    /// Returns the published highlights, or why nothing was published.
    pub(crate) async fn execute(
        &self,
    ) -> std::result::Result<DocumentHighlights, ExecuteError> {
        let guard = self.shared.compute_lock.clone().lock_owned().await;

        if !self.advance(DocumentState::Pending, DocumentState::Computing) {
            return Err(self.skip(Skip::Stale));
        }

        let Some(source) = self.source.upgrade() else {
            return Err(self.release_dropped().await);
        };
        let text = source.snapshot();
        drop(source);

        if exceeds(&text, self.config.max_document_chars) {
            self.advance(DocumentState::Computing, DocumentState::Idle);
            let chars = text.chars().count();
            tracing::debug!(
                document_id = %self.id,
                chars,
                max = self.config.max_document_chars,
                "Document over size ceiling, skipping highlight"
            );
            let skipped = self.skip(Skip::Oversized);
            self.handler.on_bypass(self.id, chars).await;
            return Err(skipped);
        }

        let snapshot = text.clone();
        let config = self.config.highlight.clone();
        let cache = self.cache.clone();
        let start = Instant::now();
        let result = tokio::task::spawn_blocking(move || {
            let _guard = guard;
            match cache {
                Some(cache) => {
                    let (highlights, hit) = cache.get_or_compute(text, &config);
                    (highlights, Some(hit))
                }
                None => (Arc::new(Highlights::compute(&text, &config)), None),
            }
        })
        .await;

        let highlights = match result {
            Ok((highlights, hit)) => {
                match hit {
                    Some(true) => self.metrics.cache_hit(),
                    Some(false) => {
                        self.metrics.cache_miss();
                        self.metrics.computed(start.elapsed());
                    }
                    None => self.metrics.computed(start.elapsed()),
                }
                highlights
            }
            Err(error) => {
                self.metrics.compute_error();
                self.advance(DocumentState::Computing, DocumentState::Idle);
                tracing::warn!(document_id = %self.id, error = %error, "Highlight job failed");
                let error = HighlightError::from(error);
                let message = error.to_string();
                self.handler.on_error(self.id, error).await;
                return Err(ExecuteError::Failed(message));
            }
        };

        if self.source.strong_count() == 0 {
            return Err(self.release_dropped().await);
        }
        if !self.advance(DocumentState::Computing, DocumentState::Idle) {
            return Err(self.skip(Skip::Stale));
        }

        self.metrics.published();
        tracing::debug!(
            document_id = %self.id,
            generation = self.generation,
            spans = highlights.spans.len(),
            folds = highlights.fold_ranges.len(),
            elapsed = ?start.elapsed(),
            "Publishing highlights"
        );
        let published = DocumentHighlights {
            generation: self.generation,
            text: snapshot,
            highlights,
        };
        self.handler
            .on_highlights(self.id, published.clone())
            .await;
        Ok(published)
    }

    /// Closes and unregisters a document whose owner dropped it
    async fn release_dropped(&self) -> ExecuteError {
        tracing::warn!(document_id = %self.id, "Document dropped during highlighting");
        self.shared.close();
        let skipped = self.skip(Skip::Dropped);
        if self.documents.remove(&self.id).is_some() {
            self.metrics.document_closed();
            tracing::info!(document_id = %self.id, "Released dropped document");
            self.handler.on_closed(self.id).await;
        }
        skipped
    }

    fn skip(&self, reason: Skip) -> ExecuteError {
        match reason {
            Skip::Stale | Skip::Dropped => self.metrics.discarded(),
            Skip::Oversized => self.metrics.oversized(),
        }
        if reason == Skip::Stale {
            tracing::debug!(
                document_id = %self.id,
                generation = self.generation,
                "Discarding stale highlight run"
            );
        }
        ExecuteError::Skipped(reason)
    }
}

/// Outcome of [`HighlightWorker::execute`] when nothing was published
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ExecuteError {
    Skipped(Skip),
    Failed(String),
}

/// Checks the character ceiling, counting characters only when the byte
/// length could exceed it
pub(crate) fn exceeds(text: &str, max_chars: usize) -> bool {
    text.len() > max_chars && text.chars().count() > max_chars
}
