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

//! Incremental ANSI Highlighting Service
//!
//! Keeps the styled spans of live, mutating documents current without
//! recomputing on every keystroke:
//!
//! - One debounced recomputation per document; a newer edit cancels and
//!   re-arms the pending one
//! - A size ceiling above which documents are never highlighted
//! - Span computation on the blocking pool, never concurrent with itself for
//!   the same document
//! - Results for closed or changed documents are discarded, never published
//!
//! # Architecture
//!
//! ```text
//! host edit ──▶ HighlightScheduler ──▶ HighlightWorker (debounce)
//!                                            ↓
//!                                   Highlights::compute (blocking)
//!                                            ↓
//!                                   HighlightHandler::on_highlights
//! ```
//!
//! # Example
//!
//! ```no_run
//! use ansilog_service::{
//!     DocumentHighlights, DocumentId, HighlightHandler, HighlightScheduler, HighlightSettings,
//!     StaticDocument,
//! };
//! use async_trait::async_trait;
//! use std::sync::Arc;
//!
//! struct Painter;
//!
//! #[async_trait]
//! impl HighlightHandler for Painter {
//!     async fn on_highlights(&self, id: DocumentId, published: DocumentHighlights) {
//!         for span in published.spans() {
//!             println!("{id}: {:?} {:?}", span.style, published.span_text(span));
//!         }
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let scheduler = HighlightScheduler::new(HighlightSettings::default(), Arc::new(Painter))?;
//!     let document = Arc::new(StaticDocument::new("\x1b[33mWARN\x1b[0m low memory"));
//!     let id = scheduler.register(&document);
//!     scheduler.highlight_now(id).await?;
//!     Ok(())
//! }
//! ```

mod cache;
mod config;
mod document;
mod error;
mod handler;
mod metrics;
mod scheduler;
mod types;
mod worker;

pub use self::cache::{DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL, SpanCache};
pub use self::config::{
    DEFAULT_DEBOUNCE, DEFAULT_EXTENSION, DEFAULT_MAX_DOCUMENT_CHARS, HighlightSettings, Theme,
};
pub use self::document::{SharedDocument, StaticDocument};
pub use self::error::{HighlightError, Result};
pub use self::handler::{CallbackHandler, DocumentSource, HighlightHandler, NoopHandler};
pub use self::metrics::{MetricsSnapshot, SchedulerMetrics};
pub use self::scheduler::HighlightScheduler;
pub use self::types::{DocumentHighlights, DocumentId, DocumentInfo, DocumentState, EditOutcome};
pub use self::worker::WorkerConfig;
