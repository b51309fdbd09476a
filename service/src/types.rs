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

//! Core types for the highlight scheduler

use ansilog_sgrcodec::{Highlights, StyledSpan};
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

/// Unique identifier for a registered document (monotonically increasing, never reused)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(u64);

impl DocumentId {
    /// Create a new document ID
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the underlying u64 value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc-{}", self.0)
    }
}

/// Scheduling state of a document (stored as atomic u8)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DocumentState {
    /// No recomputation armed
    Idle = 0,
    /// Debounce timer armed
    Pending = 1,
    /// Spans are being computed on the blocking pool
    Computing = 2,
    /// Document unregistered or dropped
    Closed = 3,
}

impl DocumentState {
    /// Convert from u8 (for atomic operations)
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Idle,
            1 => Self::Pending,
            2 => Self::Computing,
            _ => Self::Closed,
        }
    }

    /// Convert to u8 (for atomic operations)
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Check if a recomputation is armed or running
    pub fn is_busy(self) -> bool {
        matches!(self, Self::Pending | Self::Computing)
    }
}

impl fmt::Display for DocumentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Pending => write!(f, "pending"),
            Self::Computing => write!(f, "computing"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// What an edit notification did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// A debounce timer was armed, replacing any pending one
    Scheduled,
    /// The document exceeds the size ceiling; nothing is armed
    Bypassed,
}

/// Point-in-time view of a registered document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentInfo {
    /// Document ID
    pub id: DocumentId,
    /// Current scheduling state
    pub state: DocumentState,
    /// Number of edits seen so far
    pub generation: u64,
}

/// Highlights published for a document, together with the text they index
///
/// Span and fold offsets are byte positions in `text`, the snapshot the
/// computation ran on. The document may have changed since; slice `text`,
/// not a fresh snapshot.
#[derive(Debug, Clone)]
pub struct DocumentHighlights {
    /// Generation of the edit this result belongs to
    pub generation: u64,
    /// Snapshot the offsets refer to
    pub text: Arc<str>,
    /// Computed spans and fold ranges
    pub highlights: Arc<Highlights>,
}

impl DocumentHighlights {
    /// Styled literal runs
    pub fn spans(&self) -> &[StyledSpan] {
        &self.highlights.spans
    }

    /// Escape sequence ranges to fold
    pub fn fold_ranges(&self) -> &[Range<usize>] {
        &self.highlights.fold_ranges
    }

    /// Text covered by `span` in the snapshot
    pub fn span_text(&self, span: &StyledSpan) -> &str {
        span.text(&self.text)
    }

    /// The snapshot with every recognized escape sequence removed
    pub fn plain_text(&self) -> String {
        self.highlights.plain_text(&self.text)
    }
}
