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

//! Highlight scheduler implementation
//!
//! The HighlightScheduler is responsible for:
//! - Tracking open documents by [`DocumentId`]
//! - Arming one debounced recomputation per document, latest edit wins
//! - Skipping documents over the size ceiling
//! - Releasing document state on unregister or when the owner drops it

use crate::worker::{DocumentShared, ExecuteError, HighlightWorker, Skip, WorkerConfig};
use crate::{
    DocumentHighlights, DocumentId, DocumentInfo, DocumentSource, DocumentState, EditOutcome,
    HighlightError, HighlightHandler, HighlightSettings, Result, SchedulerMetrics, SpanCache,
};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};
use tokio::task::JoinHandle;

/// Registry entry of one open document
pub(crate) struct ScheduledDocument {
    /// Non-owning back reference to the host's document
    source: Weak<dyn DocumentSource>,
    /// Generation, state and compute lock shared with workers
    shared: Arc<DocumentShared>,
    /// Armed debounce task, if any
    pending: Option<JoinHandle<()>>,
}

impl ScheduledDocument {
    fn info(&self, id: DocumentId) -> DocumentInfo {
        DocumentInfo {
            id,
            state: self.shared.state(),
            generation: self.shared.generation(),
        }
    }

    /// Forgets the armed task without aborting it
    pub(crate) fn detach_pending(&mut self) {
        self.pending = None;
    }

    /// Aborts the armed task, returning whether one was still running
    fn cancel_pending(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }
}

/// Debounced incremental highlight scheduler
///
/// Must be used from within a Tokio runtime; edits spawn timer tasks.
///
/// # Example
///
/// ```no_run
/// use ansilog_service::{DocumentSource, HighlightScheduler, HighlightSettings, NoopHandler};
/// use std::sync::Arc;
///
/// struct Buffer(Arc<str>);
///
/// impl DocumentSource for Buffer {
///     fn snapshot(&self) -> Arc<str> {
///         self.0.clone()
///     }
/// }
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let scheduler = HighlightScheduler::new(HighlightSettings::default(), Arc::new(NoopHandler))?;
///     let buffer = Arc::new(Buffer(Arc::from("\x1b[31mERROR\x1b[0m disk full")));
///     let id = scheduler.register(&buffer);
///     scheduler.notify_edit(id)?;
///     Ok(())
/// }
/// ```
pub struct HighlightScheduler {
    /// Open documents
    documents: Arc<DashMap<DocumentId, ScheduledDocument>>,
    /// Next document ID (monotonically increasing)
    next_id: AtomicU64,
    /// Current settings; armed workers keep the values they were armed with
    settings: RwLock<HighlightSettings>,
    /// Result receiver
    handler: Arc<dyn HighlightHandler>,
    /// Scheduler metrics
    metrics: Arc<SchedulerMetrics>,
    /// Optional content cache shared by all documents
    cache: Option<Arc<SpanCache>>,
}

impl HighlightScheduler {
    /// Create a new scheduler
    pub fn new(settings: HighlightSettings, handler: Arc<dyn HighlightHandler>) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            documents: Arc::new(DashMap::new()),
            next_id: AtomicU64::new(1),
            settings: RwLock::new(settings),
            handler,
            metrics: Arc::new(SchedulerMetrics::new()),
            cache: None,
        })
    }

    /// Share a span cache between all documents
    pub fn with_cache(mut self, cache: Arc<SpanCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Report into an existing metrics instance
    pub fn with_metrics(mut self, metrics: Arc<SchedulerMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Get the scheduler metrics
    pub fn metrics(&self) -> &Arc<SchedulerMetrics> {
        &self.metrics
    }

    /// Get the span cache, if one is installed
    pub fn cache(&self) -> Option<&Arc<SpanCache>> {
        self.cache.as_ref()
    }

    /// Get a copy of the current settings
    pub fn settings(&self) -> HighlightSettings {
        self.settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn worker_config(&self) -> WorkerConfig {
        WorkerConfig::from(&*self.settings.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Replace the settings and re-arm every open document
    ///
    /// Returns the outcome for each document that was re-armed.
    pub fn reconfigure(
        &self,
        settings: HighlightSettings,
    ) -> Result<Vec<(DocumentId, EditOutcome)>> {
        settings.validate()?;
        *self.settings.write().unwrap_or_else(PoisonError::into_inner) = settings;
        tracing::info!(documents = self.documents.len(), "Highlight settings updated");

        let mut outcomes = Vec::new();
        for id in self.document_ids() {
            match self.notify_edit(id) {
                Ok(outcome) => outcomes.push((id, outcome)),
                Err(error) if error.is_document_error() => {}
                Err(error) => return Err(error),
            }
        }
        Ok(outcomes)
    }

    fn next_document_id(&self) -> DocumentId {
        DocumentId::new(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    /// Start tracking a document
    ///
    /// Only a weak reference is kept; the caller stays the owner.
    pub fn register<D: DocumentSource>(&self, document: &Arc<D>) -> DocumentId {
        let id = self.next_document_id();
        let weak: Weak<D> = Arc::downgrade(document);
        let source: Weak<dyn DocumentSource> = weak;
        self.documents.insert(
            id,
            ScheduledDocument {
                source,
                shared: Arc::new(DocumentShared::new()),
                pending: None,
            },
        );
        self.metrics.document_registered();
        tracing::info!(document_id = %id, "Registered document");
        id
    }

    fn worker(
        &self,
        id: DocumentId,
        generation: u64,
        document: &ScheduledDocument,
        config: WorkerConfig,
    ) -> HighlightWorker {
        HighlightWorker {
            id,
            generation,
            source: document.source.clone(),
            shared: document.shared.clone(),
            config,
            handler: self.handler.clone(),
            metrics: self.metrics.clone(),
            cache: self.cache.clone(),
            documents: self.documents.clone(),
        }
    }

    /// Report that a document changed
    ///
    /// Cancels any pending recomputation and arms a new one after the
    /// debounce delay. Documents over the size ceiling get nothing armed.
    pub fn notify_edit(&self, id: DocumentId) -> Result<EditOutcome> {
        let source = self
            .documents
            .get(&id)
            .map(|entry| entry.source.clone())
            .ok_or(HighlightError::DocumentNotFound(id))?;
        self.metrics.edit();

        let Some(document) = source.upgrade() else {
            if self.release(id) {
                let handler = self.handler.clone();
                tokio::spawn(async move { handler.on_closed(id).await });
            }
            return Err(HighlightError::DocumentClosed(id));
        };
        let chars = document.char_len();
        drop(document);

        let config = self.worker_config();
        let mut entry = self
            .documents
            .get_mut(&id)
            .ok_or(HighlightError::DocumentNotFound(id))?;
        let generation = entry.shared.bump();
        if entry.cancel_pending() {
            self.metrics.superseded();
        }

        if chars > config.max_document_chars {
            entry.shared.set_state(DocumentState::Idle);
            self.metrics.bypassed();
            tracing::debug!(
                document_id = %id,
                chars,
                max = config.max_document_chars,
                "Document over size ceiling, not scheduling"
            );
            return Ok(EditOutcome::Bypassed);
        }

        entry.shared.set_state(DocumentState::Pending);
        let debounce = config.debounce;
        let worker = self.worker(id, generation, &entry, config);
        entry.pending = Some(tokio::spawn(worker.run()));
        tracing::debug!(document_id = %id, generation, ?debounce, "Scheduled highlight");
        Ok(EditOutcome::Scheduled)
    }

    /// Highlight a document immediately, skipping the debounce delay
    ///
    /// Any pending recomputation is cancelled. Returns `None` when the
    /// document is over the size ceiling or a newer edit overtook this run.
    pub async fn highlight_now(&self, id: DocumentId) -> Result<Option<DocumentHighlights>> {
        let worker = {
            let mut entry = self
                .documents
                .get_mut(&id)
                .ok_or(HighlightError::DocumentNotFound(id))?;
            let generation = entry.shared.bump();
            if entry.cancel_pending() {
                self.metrics.superseded();
            }
            entry.shared.set_state(DocumentState::Pending);
            self.worker(id, generation, &entry, self.worker_config())
        };

        match worker.execute().await {
            Ok(highlights) => Ok(Some(highlights)),
            Err(ExecuteError::Skipped(Skip::Dropped)) => Err(HighlightError::DocumentClosed(id)),
            Err(ExecuteError::Skipped(_)) => Ok(None),
            Err(ExecuteError::Failed(message)) => Err(HighlightError::ComputeFailed(message)),
        }
    }

    /// Stop tracking a document
    ///
    /// Any pending or in-flight result for it is discarded.
    pub async fn unregister(&self, id: DocumentId) -> Result<()> {
        if self.release(id) {
            self.handler.on_closed(id).await;
            Ok(())
        } else {
            Err(HighlightError::DocumentNotFound(id))
        }
    }

    /// Release documents whose owner dropped them, returning how many
    pub async fn sweep(&self) -> usize {
        let dropped: Vec<DocumentId> = self
            .documents
            .iter()
            .filter(|entry| entry.source.strong_count() == 0)
            .map(|entry| *entry.key())
            .collect();

        let mut released = 0;
        for id in dropped {
            if self.release(id) {
                tracing::warn!(document_id = %id, "Document dropped without unregister");
                self.handler.on_closed(id).await;
                released += 1;
            }
        }
        released
    }

    /// Release every document
    pub async fn shutdown(&self) {
        let released: Vec<DocumentId> = self
            .document_ids()
            .into_iter()
            .filter(|id| self.release(*id))
            .collect();

        let handler = &self.handler;
        futures_util::future::join_all(released.iter().map(|id| handler.on_closed(*id))).await;
        tracing::info!(documents = released.len(), "Highlight scheduler shut down");
    }

    /// Remove a document from the registry, returning whether it was present
    fn release(&self, id: DocumentId) -> bool {
        let Some((_, mut document)) = self.documents.remove(&id) else {
            return false;
        };
        document.shared.close();
        document.cancel_pending();
        self.metrics.document_closed();
        tracing::info!(document_id = %id, "Released document");
        true
    }

    /// Check if a document is registered
    pub fn contains(&self, id: DocumentId) -> bool {
        self.documents.contains_key(&id)
    }

    /// Get a snapshot of a document's scheduling state
    pub fn document_info(&self, id: DocumentId) -> Option<DocumentInfo> {
        self.documents.get(&id).map(|entry| entry.info(id))
    }

    /// Get all registered document IDs
    pub fn document_ids(&self) -> Vec<DocumentId> {
        self.documents.iter().map(|entry| *entry.key()).collect()
    }

    /// Get the number of registered documents
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }
}

impl Drop for HighlightScheduler {
    fn drop(&mut self) {
        for mut entry in self.documents.iter_mut() {
            entry.shared.close();
            entry.cancel_pending();
        }
    }
}

impl std::fmt::Debug for HighlightScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighlightScheduler")
            .field("document_count", &self.document_count())
            .field("next_id", &self.next_id.load(Ordering::Relaxed))
            .field("cache", &self.cache)
            .finish()
    }
}
