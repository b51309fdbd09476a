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

//! Host facing traits for the highlight scheduler

use crate::{DocumentHighlights, DocumentId, HighlightError};
use async_trait::async_trait;
use std::sync::Arc;

/// Read access to a document's current text
///
/// The scheduler only keeps a `Weak` reference to a source; the host owns it.
/// Dropping the last strong reference closes the document.
pub trait DocumentSource: Send + Sync + 'static {
    /// Returns the full text as of now.
    fn snapshot(&self) -> Arc<str>;

    /// Returns the length of the text in characters.
    ///
    /// Called on every edit notification, on the caller's thread. The default
    /// counts the characters of a full snapshot; sources that track their
    /// length should override it.
    fn char_len(&self) -> usize {
        self.snapshot().chars().count()
    }
}

/// Receiver of highlighting results
///
/// All methods are async and have default implementations that do nothing.
///
/// # Example
///
/// ```no_run
/// use ansilog_service::{DocumentHighlights, DocumentId, HighlightHandler};
/// use async_trait::async_trait;
///
/// struct Painter;
///
/// #[async_trait]
/// impl HighlightHandler for Painter {
///     async fn on_highlights(&self, id: DocumentId, published: DocumentHighlights) {
///         // Replace the document's markup, slicing `published.text`
///     }
/// }
/// ```
#[async_trait]
pub trait HighlightHandler: Send + Sync + 'static {
    /// Called with fresh highlights for a document
    ///
    /// The host replaces all previous markup of the document with these
    /// spans and fold ranges. Offsets index `published.text`, which may
    /// already differ from the document's current text.
    async fn on_highlights(&self, _id: DocumentId, _published: DocumentHighlights) {}

    /// Called when a debounced recomputation is skipped because the document
    /// grew past the size ceiling
    async fn on_bypass(&self, _id: DocumentId, _chars: usize) {}

    /// Called when a recomputation fails
    async fn on_error(&self, _id: DocumentId, _error: HighlightError) {}

    /// Called once a document is unregistered or found dropped
    async fn on_closed(&self, _id: DocumentId) {}
}

/// Handler that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHandler;

#[async_trait]
impl HighlightHandler for NoopHandler {}

/// Callback-based handler implementation
///
/// # Example
///
/// ```no_run
/// use ansilog_service::CallbackHandler;
/// use std::sync::Arc;
///
/// let handler = Arc::new(CallbackHandler {
///     on_highlights: Some(Box::new(|id, published| {
///         println!("{} has {} spans", id, published.spans().len());
///     })),
///     ..Default::default()
/// });
/// ```
#[derive(Default)]
pub struct CallbackHandler {
    /// Called with fresh highlights
    pub on_highlights: Option<Box<dyn Fn(DocumentId, DocumentHighlights) + Send + Sync + 'static>>,
    /// Called on size bypass
    pub on_bypass: Option<Box<dyn Fn(DocumentId, usize) + Send + Sync + 'static>>,
    /// Called on error
    pub on_error: Option<Box<dyn Fn(DocumentId, HighlightError) + Send + Sync + 'static>>,
    /// Called when a document closes
    pub on_closed: Option<Box<dyn Fn(DocumentId) + Send + Sync + 'static>>,
}

#[async_trait]
impl HighlightHandler for CallbackHandler {
    async fn on_highlights(&self, id: DocumentId, published: DocumentHighlights) {
        if let Some(ref f) = self.on_highlights {
            f(id, published);
        }
    }

    async fn on_bypass(&self, id: DocumentId, chars: usize) {
        if let Some(ref f) = self.on_bypass {
            f(id, chars);
        }
    }

    async fn on_error(&self, id: DocumentId, error: HighlightError) {
        if let Some(ref f) = self.on_error {
            f(id, error);
        }
    }

    async fn on_closed(&self, id: DocumentId) {
        if let Some(ref f) = self.on_closed {
            f(id);
        }
    }
}

impl std::fmt::Debug for CallbackHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackHandler")
            .field("on_highlights", &self.on_highlights.is_some())
            .field("on_bypass", &self.on_bypass.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("on_closed", &self.on_closed.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ansilog_sgrcodec::Highlights;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixed(&'static str);

    impl DocumentSource for Fixed {
        fn snapshot(&self) -> Arc<str> {
            Arc::from(self.0)
        }
    }

    #[test]
    fn test_default_char_len_counts_chars() {
        assert_eq!(Fixed("héllo").char_len(), 5);
        assert_eq!(Fixed("").char_len(), 0);
    }

    #[tokio::test]
    async fn test_callback_handler_dispatch() {
        let published = Arc::new(AtomicUsize::new(0));
        let closed = Arc::new(AtomicUsize::new(0));
        let handler = CallbackHandler {
            on_highlights: Some(Box::new({
                let published = published.clone();
                move |_, highlights: DocumentHighlights| {
                    published.fetch_add(highlights.spans().len(), Ordering::SeqCst);
                }
            })),
            on_closed: Some(Box::new({
                let closed = closed.clone();
                move |_| {
                    closed.fetch_add(1, Ordering::SeqCst);
                }
            })),
            ..Default::default()
        };

        let id = DocumentId::new(7);
        let text: Arc<str> = Arc::from("a\x1b[1mb");
        let highlights = Highlights::compute(&text, &Default::default());
        let result = DocumentHighlights {
            generation: 1,
            text,
            highlights: Arc::new(highlights),
        };
        handler.on_highlights(id, result).await;
        handler.on_bypass(id, 10).await;
        handler.on_closed(id).await;

        assert_eq!(published.load(Ordering::SeqCst), 2);
        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }
}
