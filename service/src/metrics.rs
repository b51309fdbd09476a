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

//! Lock-free metrics for the highlight scheduler
//!
//! Every event is counted locally and mirrored to the `metrics` facade under
//! the `ansilog.` prefix.

use metrics::{counter, gauge, histogram};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Lock-free scheduler metrics
#[derive(Debug)]
pub struct SchedulerMetrics {
    // Documents
    documents_registered: AtomicU64,
    documents_active: AtomicU64,

    // Scheduling
    edits: AtomicU64,
    bypassed: AtomicU64,
    superseded: AtomicU64,

    // Outcomes
    published: AtomicU64,
    discarded: AtomicU64,
    oversized: AtomicU64,
    compute_errors: AtomicU64,

    // Cache
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,

    // Timing (stored as nanoseconds)
    total_compute_ns: AtomicU64,
    computations: AtomicU64,

    started_at: Instant,
}

impl Default for SchedulerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl SchedulerMetrics {
    /// Create a new metrics instance
    pub fn new() -> Self {
        Self {
            documents_registered: AtomicU64::new(0),
            documents_active: AtomicU64::new(0),
            edits: AtomicU64::new(0),
            bypassed: AtomicU64::new(0),
            superseded: AtomicU64::new(0),
            published: AtomicU64::new(0),
            discarded: AtomicU64::new(0),
            oversized: AtomicU64::new(0),
            compute_errors: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
            cache_misses: AtomicU64::new(0),
            total_compute_ns: AtomicU64::new(0),
            computations: AtomicU64::new(0),
            started_at: Instant::now(),
        }
    }

    /// Record a document registration
    pub fn document_registered(&self) {
        self.documents_registered.fetch_add(1, Ordering::Relaxed);
        self.documents_active.fetch_add(1, Ordering::Relaxed);
        counter!("ansilog.documents.total").increment(1);
        gauge!("ansilog.documents.active").increment(1.0);
    }

    /// Record a document leaving the registry
    pub fn document_closed(&self) {
        self.documents_active.fetch_sub(1, Ordering::Relaxed);
        gauge!("ansilog.documents.active").decrement(1.0);
    }

    /// Record an edit notification
    pub fn edit(&self) {
        self.edits.fetch_add(1, Ordering::Relaxed);
        counter!("ansilog.edits").increment(1);
    }

    /// Record an edit on an oversized document
    pub fn bypassed(&self) {
        self.bypassed.fetch_add(1, Ordering::Relaxed);
        counter!("ansilog.edits.bypassed").increment(1);
    }

    /// Record a pending timer cancelled by a newer edit
    pub fn superseded(&self) {
        self.superseded.fetch_add(1, Ordering::Relaxed);
        counter!("ansilog.timers.superseded").increment(1);
    }

    /// Record highlights handed to the handler
    pub fn published(&self) {
        self.published.fetch_add(1, Ordering::Relaxed);
        counter!("ansilog.highlights.published").increment(1);
    }

    /// Record a result dropped because the document closed or changed
    pub fn discarded(&self) {
        self.discarded.fetch_add(1, Ordering::Relaxed);
        counter!("ansilog.highlights.discarded").increment(1);
    }

    /// Record a timer that fired on an oversized document
    pub fn oversized(&self) {
        self.oversized.fetch_add(1, Ordering::Relaxed);
        counter!("ansilog.highlights.oversized").increment(1);
    }

    /// Record a failed blocking job
    pub fn compute_error(&self) {
        self.compute_errors.fetch_add(1, Ordering::Relaxed);
        counter!("ansilog.errors.compute").increment(1);
    }

    /// Record a span cache hit
    pub fn cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
        counter!("ansilog.cache.hits").increment(1);
    }

    /// Record a span cache miss
    pub fn cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
        counter!("ansilog.cache.misses").increment(1);
    }

    /// Record the duration of one span computation
    pub fn computed(&self, duration: Duration) {
        self.computations.fetch_add(1, Ordering::Relaxed);
        self.total_compute_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
        histogram!("ansilog.compute.duration").record(duration.as_secs_f64());
    }

    /// Get the number of registered documents
    pub fn active_documents(&self) -> u64 {
        self.documents_active.load(Ordering::Relaxed)
    }

    /// Get the number of published results
    pub fn published_count(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }

    /// Get a snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            documents_registered: self.documents_registered.load(Ordering::Relaxed),
            documents_active: self.documents_active.load(Ordering::Relaxed),
            edits: self.edits.load(Ordering::Relaxed),
            bypassed: self.bypassed.load(Ordering::Relaxed),
            superseded: self.superseded.load(Ordering::Relaxed),
            published: self.published.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
            oversized: self.oversized.load(Ordering::Relaxed),
            compute_errors: self.compute_errors.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            computations: self.computations.load(Ordering::Relaxed),
            uptime: self.started_at.elapsed(),
            avg_compute_duration: self.average_compute_duration(),
        }
    }

    fn average_compute_duration(&self) -> Duration {
        let total = self.computations.load(Ordering::Relaxed);
        if total == 0 {
            return Duration::ZERO;
        }
        Duration::from_nanos(self.total_compute_ns.load(Ordering::Relaxed) / total)
    }
}

/// A snapshot of scheduler metrics at a point in time
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSnapshot {
    /// Documents registered since creation
    pub documents_registered: u64,
    /// Documents currently registered
    pub documents_active: u64,
    /// Edit notifications received
    pub edits: u64,
    /// Edits ignored because the document was oversized
    pub bypassed: u64,
    /// Pending timers replaced by a newer edit
    pub superseded: u64,
    /// Results handed to the handler
    pub published: u64,
    /// Results dropped for closed or changed documents
    pub discarded: u64,
    /// Timers that fired on oversized documents
    pub oversized: u64,
    /// Failed blocking jobs
    pub compute_errors: u64,
    /// Span cache hits
    pub cache_hits: u64,
    /// Span cache misses
    pub cache_misses: u64,
    /// Span computations run
    pub computations: u64,
    /// Time since the scheduler was created
    pub uptime: Duration,
    /// Average span computation time
    pub avg_compute_duration: Duration,
}

impl MetricsSnapshot {
    /// Fraction of cache lookups that hit, in `0.0..=1.0`
    pub fn cache_hit_rate(&self) -> f64 {
        let lookups = self.cache_hits + self.cache_misses;
        if lookups == 0 {
            return 0.0;
        }
        self.cache_hits as f64 / lookups as f64
    }

    /// Edits per published result; higher means the debounce coalesces more
    pub fn coalescing_ratio(&self) -> f64 {
        if self.published == 0 {
            return 0.0;
        }
        self.edits as f64 / self.published as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_tracking() {
        let metrics = SchedulerMetrics::new();
        assert_eq!(metrics.active_documents(), 0);

        metrics.document_registered();
        metrics.document_registered();
        metrics.document_closed();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.documents_registered, 2);
        assert_eq!(snapshot.documents_active, 1);
    }

    #[test]
    fn test_outcome_tracking() {
        let metrics = SchedulerMetrics::new();
        for _ in 0..3 {
            metrics.edit();
        }
        metrics.superseded();
        metrics.superseded();
        metrics.published();
        metrics.bypassed();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.edits, 3);
        assert_eq!(snapshot.superseded, 2);
        assert_eq!(snapshot.published, 1);
        assert_eq!(snapshot.bypassed, 1);
        assert!((snapshot.coalescing_ratio() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_compute_duration() {
        let metrics = SchedulerMetrics::new();
        assert_eq!(metrics.snapshot().avg_compute_duration, Duration::ZERO);

        metrics.computed(Duration::from_millis(10));
        metrics.computed(Duration::from_millis(30));

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.computations, 2);
        assert_eq!(snapshot.avg_compute_duration, Duration::from_millis(20));
    }

    #[test]
    fn test_cache_hit_rate() {
        let metrics = SchedulerMetrics::new();
        assert_eq!(metrics.snapshot().cache_hit_rate(), 0.0);

        metrics.cache_hit();
        metrics.cache_hit();
        metrics.cache_hit();
        metrics.cache_miss();
        assert!((metrics.snapshot().cache_hit_rate() - 0.75).abs() < f64::EPSILON);
    }
}
