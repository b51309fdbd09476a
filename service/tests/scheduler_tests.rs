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

//! Timing and lifecycle tests for the highlight scheduler
//!
//! All tests run on a paused clock, so sleeps advance virtual time only.

use ansilog_service::{
    DocumentHighlights, DocumentId, DocumentSource, DocumentState, EditOutcome, HighlightError,
    HighlightHandler, HighlightScheduler, HighlightSettings, SharedDocument, SpanCache,
};
use ansilog_sgrcodec::Color;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant, sleep};

#[derive(Debug)]
enum Event {
    Highlights(DocumentId, DocumentHighlights),
    Bypass(DocumentId, usize),
    Error(DocumentId, String),
    Closed(DocumentId),
}

/// Forwards every handler call into a channel
struct RecordingHandler {
    events: mpsc::UnboundedSender<Event>,
}

#[async_trait]
impl HighlightHandler for RecordingHandler {
    async fn on_highlights(&self, id: DocumentId, published: DocumentHighlights) {
        let _ = self.events.send(Event::Highlights(id, published));
    }

    async fn on_bypass(&self, id: DocumentId, chars: usize) {
        let _ = self.events.send(Event::Bypass(id, chars));
    }

    async fn on_error(&self, id: DocumentId, error: HighlightError) {
        let _ = self.events.send(Event::Error(id, error.to_string()));
    }

    async fn on_closed(&self, id: DocumentId) {
        let _ = self.events.send(Event::Closed(id));
    }
}

fn create_scheduler(
    settings: HighlightSettings,
) -> (HighlightScheduler, mpsc::UnboundedReceiver<Event>) {
    let (events, receiver) = mpsc::unbounded_channel();
    let scheduler = HighlightScheduler::new(settings, Arc::new(RecordingHandler { events }))
        .expect("valid settings");
    (scheduler, receiver)
}

/// Document that runs a one-shot hook the first time its text is read
///
/// Reports a fixed character count so edit notifications never read the text.
struct HookedDocument {
    text: Arc<str>,
    chars: usize,
    hook: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl HookedDocument {
    fn new(text: &str, chars: usize) -> Arc<Self> {
        Arc::new(Self {
            text: Arc::from(text),
            chars,
            hook: Mutex::new(None),
        })
    }

    fn set_hook(&self, hook: impl FnOnce() + Send + 'static) {
        *self.hook.lock().unwrap() = Some(Box::new(hook));
    }
}

impl DocumentSource for HookedDocument {
    fn snapshot(&self) -> Arc<str> {
        let hook = self.hook.lock().unwrap().take();
        if let Some(hook) = hook {
            hook();
        }
        self.text.clone()
    }

    fn char_len(&self) -> usize {
        self.chars
    }
}

/// Waits long enough for any armed timer to fire and finish
async fn settle() {
    sleep(Duration::from_secs(2)).await;
}

#[tokio::test(start_paused = true)]
async fn test_three_quick_edits_publish_once_from_last_edit() {
    let (scheduler, mut events) = create_scheduler(HighlightSettings::default());
    let doc = Arc::new(SharedDocument::new("one"));
    let id = scheduler.register(&doc);
    let start = Instant::now();

    assert_eq!(scheduler.notify_edit(id).unwrap(), EditOutcome::Scheduled);
    sleep(Duration::from_millis(50)).await;
    doc.append(" two");
    scheduler.notify_edit(id).unwrap();
    sleep(Duration::from_millis(50)).await;
    doc.replace("\x1b[31merror\x1b[0m");
    scheduler.notify_edit(id).unwrap();

    let event = events.recv().await.unwrap();
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(300), "fired early: {elapsed:?}");
    assert!(elapsed < Duration::from_millis(400), "fired late: {elapsed:?}");

    match event {
        Event::Highlights(got, published) => {
            assert_eq!(got, id);
            assert_eq!(published.generation, 3);
            assert_eq!(&*published.text, "\x1b[31merror\x1b[0m");
            assert_eq!(published.spans().len(), 1);
            assert_eq!(published.spans()[0].range(), 5..10);
            assert_eq!(published.spans()[0].style.foreground, Some(Color::Named(1)));
            assert_eq!(published.fold_ranges(), &[0..5, 10..14]);
        }
        other => panic!("unexpected event {other:?}"),
    }

    settle().await;
    assert!(events.try_recv().is_err());

    let snapshot = scheduler.metrics().snapshot();
    assert_eq!(snapshot.edits, 3);
    assert_eq!(snapshot.superseded, 2);
    assert_eq!(snapshot.published, 1);
    assert_eq!(snapshot.computations, 1);
}

#[tokio::test(start_paused = true)]
async fn test_edit_rearms_pending_timer() {
    let (scheduler, mut events) = create_scheduler(HighlightSettings::default());
    let doc = Arc::new(SharedDocument::new("text"));
    let id = scheduler.register(&doc);
    let start = Instant::now();

    scheduler.notify_edit(id).unwrap();
    sleep(Duration::from_millis(150)).await;
    scheduler.notify_edit(id).unwrap();

    // The first timer would have fired at 200ms
    sleep(Duration::from_millis(100)).await;
    assert!(events.try_recv().is_err());
    assert_eq!(scheduler.document_info(id).unwrap().state, DocumentState::Pending);

    assert!(matches!(events.recv().await, Some(Event::Highlights(got, _)) if got == id));
    assert!(start.elapsed() >= Duration::from_millis(350));
    assert_eq!(scheduler.document_info(id).unwrap().state, DocumentState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_oversized_document_is_bypassed() {
    let settings = HighlightSettings::default().with_max_document_chars(10);
    let (scheduler, mut events) = create_scheduler(settings);
    let doc = Arc::new(SharedDocument::new("\x1b[1mthis is far too long"));
    let id = scheduler.register(&doc);

    assert_eq!(scheduler.notify_edit(id).unwrap(), EditOutcome::Bypassed);
    settle().await;

    assert!(events.try_recv().is_err());
    assert_eq!(scheduler.document_info(id).unwrap().state, DocumentState::Idle);
    assert_eq!(scheduler.metrics().snapshot().bypassed, 1);
    assert_eq!(scheduler.metrics().published_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_bypass_cancels_pending_timer() {
    let settings = HighlightSettings::default().with_max_document_chars(10);
    let (scheduler, mut events) = create_scheduler(settings);
    let doc = Arc::new(SharedDocument::new("short"));
    let id = scheduler.register(&doc);

    assert_eq!(scheduler.notify_edit(id).unwrap(), EditOutcome::Scheduled);
    doc.append(" and now much longer");
    assert_eq!(scheduler.notify_edit(id).unwrap(), EditOutcome::Bypassed);

    settle().await;
    assert!(events.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_growth_past_ceiling_before_fire_publishes_nothing() {
    let settings = HighlightSettings::default().with_max_document_chars(10);
    let (scheduler, mut events) = create_scheduler(settings);
    let doc = Arc::new(SharedDocument::new("short"));
    let id = scheduler.register(&doc);

    scheduler.notify_edit(id).unwrap();
    doc.append(" grew without notice");

    match events.recv().await.unwrap() {
        Event::Bypass(got, chars) => {
            assert_eq!(got, id);
            assert_eq!(chars, 25);
        }
        other => panic!("unexpected event {other:?}"),
    }
    settle().await;
    assert!(events.try_recv().is_err());
    assert_eq!(scheduler.metrics().snapshot().oversized, 1);
}

#[tokio::test(start_paused = true)]
async fn test_unregister_discards_pending_result() {
    let (scheduler, mut events) = create_scheduler(HighlightSettings::default());
    let doc = Arc::new(SharedDocument::new("\x1b[1mbold"));
    let id = scheduler.register(&doc);

    scheduler.notify_edit(id).unwrap();
    sleep(Duration::from_millis(100)).await;
    scheduler.unregister(id).await.unwrap();

    assert!(matches!(events.recv().await, Some(Event::Closed(got)) if got == id));
    settle().await;
    assert!(events.try_recv().is_err());
    assert!(!scheduler.contains(id));
    assert!(matches!(
        scheduler.notify_edit(id),
        Err(HighlightError::DocumentNotFound(_))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_dropped_document_is_released_when_timer_fires() {
    let (scheduler, mut events) = create_scheduler(HighlightSettings::default());
    let doc = Arc::new(SharedDocument::new("text"));
    let id = scheduler.register(&doc);

    scheduler.notify_edit(id).unwrap();
    drop(doc);

    assert!(matches!(events.recv().await, Some(Event::Closed(got)) if got == id));
    assert!(!scheduler.contains(id));
    assert_eq!(scheduler.metrics().snapshot().discarded, 1);
    assert_eq!(scheduler.metrics().active_documents(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_documents_are_independent() {
    let (scheduler, mut events) = create_scheduler(HighlightSettings::default());
    let first = Arc::new(SharedDocument::new("\x1b[32mok"));
    let second = Arc::new(SharedDocument::new("\x1b[33mwarn"));
    let first_id = scheduler.register(&first);
    let second_id = scheduler.register(&second);

    scheduler.notify_edit(first_id).unwrap();
    sleep(Duration::from_millis(100)).await;
    scheduler.notify_edit(second_id).unwrap();

    let mut published = Vec::new();
    for _ in 0..2 {
        match events.recv().await.unwrap() {
            Event::Highlights(id, result) => {
                published.push((id, result.spans()[0].style.foreground));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
    assert_eq!(
        published,
        vec![
            (first_id, Some(Color::Named(2))),
            (second_id, Some(Color::Named(3))),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_reconfigure_rearms_with_new_settings() {
    let (scheduler, mut events) = create_scheduler(HighlightSettings::default());
    let doc = Arc::new(SharedDocument::new("\x1b[1mX"));
    let id = scheduler.register(&doc);

    let outcomes = scheduler
        .reconfigure(
            HighlightSettings::default()
                .with_hide_ansi_codes(false)
                .with_debounce(Duration::from_millis(20)),
        )
        .unwrap();
    assert_eq!(outcomes, vec![(id, EditOutcome::Scheduled)]);

    let start = Instant::now();
    match events.recv().await.unwrap() {
        Event::Highlights(_, published) => {
            assert!(published.fold_ranges().is_empty());
            assert!(published.spans()[0].style.bold);
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert!(start.elapsed() < Duration::from_millis(200));
    assert!(!scheduler.settings().hide_ansi_codes);
}

#[tokio::test(start_paused = true)]
async fn test_reconfigure_rejects_invalid_settings() {
    let (scheduler, _events) = create_scheduler(HighlightSettings::default());
    let err = scheduler
        .reconfigure(HighlightSettings::default().with_debounce(Duration::ZERO))
        .unwrap_err();
    assert!(matches!(err, HighlightError::InvalidConfig(_)));
    assert_eq!(scheduler.settings(), HighlightSettings::default());
}

#[tokio::test(start_paused = true)]
async fn test_highlight_now_cancels_pending() {
    let (scheduler, mut events) = create_scheduler(HighlightSettings::default());
    let doc = Arc::new(SharedDocument::new("\x1b[4munder"));
    let id = scheduler.register(&doc);

    scheduler.notify_edit(id).unwrap();
    let published = scheduler.highlight_now(id).await.unwrap().unwrap();
    assert!(published.spans()[0].style.underline);
    assert!(matches!(events.recv().await, Some(Event::Highlights(..))));

    settle().await;
    assert!(events.try_recv().is_err());
    assert_eq!(scheduler.metrics().snapshot().superseded, 1);
}

#[tokio::test(start_paused = true)]
async fn test_highlight_now_respects_ceiling() {
    let settings = HighlightSettings::default().with_max_document_chars(3);
    let (scheduler, mut events) = create_scheduler(settings);
    let doc = Arc::new(SharedDocument::new("four"));
    let id = scheduler.register(&doc);

    assert!(scheduler.highlight_now(id).await.unwrap().is_none());
    assert!(matches!(events.recv().await, Some(Event::Bypass(_, 4))));
}

#[tokio::test(start_paused = true)]
async fn test_shared_cache_hits_identical_text() {
    let (scheduler, _events) = create_scheduler(HighlightSettings::default());
    let scheduler = scheduler.with_cache(Arc::new(SpanCache::new()));
    let first = Arc::new(SharedDocument::new("\x1b[35msame"));
    let second = Arc::new(SharedDocument::new("\x1b[35msame"));
    let first_id = scheduler.register(&first);
    let second_id = scheduler.register(&second);

    let a = scheduler.highlight_now(first_id).await.unwrap().unwrap();
    let b = scheduler.highlight_now(second_id).await.unwrap().unwrap();
    assert!(Arc::ptr_eq(&a.highlights, &b.highlights));

    let snapshot = scheduler.metrics().snapshot();
    assert_eq!(snapshot.cache_misses, 1);
    assert_eq!(snapshot.cache_hits, 1);
    assert_eq!(scheduler.cache().map(|cache| cache.len()), Some(1));
}

#[tokio::test(start_paused = true)]
async fn test_no_error_events_for_malformed_text() {
    let (scheduler, mut events) = create_scheduler(HighlightSettings::default());
    let doc = Arc::new(SharedDocument::new("\x1b[38;2;1m\x1b[abc;1m\x1b[31"));
    let id = scheduler.register(&doc);

    scheduler.notify_edit(id).unwrap();
    match events.recv().await.unwrap() {
        Event::Highlights(_, published) => assert!(!published.highlights.is_empty()),
        Event::Error(_, message) => panic!("unexpected error {message}"),
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_published_text_matches_offsets_after_edit() {
    let (scheduler, mut events) = create_scheduler(HighlightSettings::default());
    let doc = Arc::new(SharedDocument::new("\x1b[1;31mfatal\x1b[0m: out of memory"));
    let id = scheduler.register(&doc);

    scheduler.notify_edit(id).unwrap();
    let published = match events.recv().await.unwrap() {
        Event::Highlights(_, published) => published,
        other => panic!("unexpected event {other:?}"),
    };

    // The host shrank the text without notifying yet
    doc.replace("ok");
    let pieces: Vec<&str> = published
        .spans()
        .iter()
        .map(|span| published.span_text(span))
        .collect();
    assert_eq!(pieces, vec!["fatal", ": out of memory"]);
    assert_eq!(published.plain_text(), "fatal: out of memory");
}

#[tokio::test(start_paused = true)]
async fn test_edit_during_computation_discards_result() {
    let (scheduler, mut events) = create_scheduler(HighlightSettings::default());
    let scheduler = Arc::new(scheduler);
    let doc = HookedDocument::new("\x1b[32mfirst", 5);
    let id = scheduler.register(&doc);
    let weak = Arc::downgrade(&scheduler);
    doc.set_hook(move || {
        if let Some(scheduler) = weak.upgrade() {
            assert_eq!(scheduler.notify_edit(id).unwrap(), EditOutcome::Scheduled);
        }
    });
    let start = Instant::now();

    scheduler.notify_edit(id).unwrap();
    match events.recv().await.unwrap() {
        Event::Highlights(got, published) => {
            assert_eq!(got, id);
            assert_eq!(published.generation, 2);
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert!(start.elapsed() >= Duration::from_millis(400));

    settle().await;
    assert!(events.try_recv().is_err());
    let snapshot = scheduler.metrics().snapshot();
    assert_eq!(snapshot.discarded, 1);
    assert_eq!(snapshot.published, 1);
    assert_eq!(snapshot.superseded, 0);
}

#[tokio::test(start_paused = true)]
async fn test_dispose_during_computation_discards_result() {
    let (scheduler, mut events) = create_scheduler(HighlightSettings::default());
    let doc = HookedDocument::new("\x1b[1mgone", 4);
    let id = scheduler.register(&doc);
    let owner = doc.clone();
    doc.set_hook(move || drop(owner));
    drop(doc);

    scheduler.notify_edit(id).unwrap();
    assert!(matches!(events.recv().await, Some(Event::Closed(got)) if got == id));
    settle().await;
    assert!(events.try_recv().is_err());

    assert!(!scheduler.contains(id));
    let snapshot = scheduler.metrics().snapshot();
    assert_eq!(snapshot.discarded, 1);
    assert_eq!(snapshot.published, 0);
    assert_eq!(scheduler.metrics().active_documents(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_oversized_run_keeps_newer_pending_edit() {
    let settings = HighlightSettings::default().with_max_document_chars(10);
    let (scheduler, mut events) = create_scheduler(settings);
    let scheduler = Arc::new(scheduler);
    // Reports a small length but reads back past the ceiling
    let doc = HookedDocument::new("this text is well over ten", 4);
    let id = scheduler.register(&doc);
    let weak = Arc::downgrade(&scheduler);
    doc.set_hook(move || {
        if let Some(scheduler) = weak.upgrade() {
            scheduler.notify_edit(id).unwrap();
        }
    });

    scheduler.notify_edit(id).unwrap();
    assert!(matches!(events.recv().await, Some(Event::Bypass(_, 26))));
    let info = scheduler.document_info(id).unwrap();
    assert_eq!(info.state, DocumentState::Pending);
    assert_eq!(info.generation, 2);

    assert!(matches!(events.recv().await, Some(Event::Bypass(_, 26))));
    assert_eq!(scheduler.document_info(id).unwrap().state, DocumentState::Idle);
    assert_eq!(scheduler.metrics().snapshot().oversized, 2);
}
