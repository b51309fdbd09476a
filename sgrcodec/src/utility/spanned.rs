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

use crate::{HighlightConfig, Style, Tokenizer};
use std::ops::Range;

/// A run of literal text sharing one style.
///
/// Offsets are byte positions in the original text. A span never covers the
/// bytes of an escape sequence and is never empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StyledSpan {
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
    /// Style in effect for the whole run
    pub style: Style,
}

impl StyledSpan {
    /// Creates a new span.
    pub fn new(start: usize, end: usize, style: Style) -> Self {
        Self { start, end, style }
    }

    /// Byte range covered by the span.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Spans produced by the builder are never empty.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Returns the text covered by this span.
    ///
    /// `source` must be the text the span was computed from.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.range()]
    }
}

/// The result of one highlighting pass over a document.
///
/// `spans` cover every literal byte of the text in order; `fold_ranges` are
/// the escape sequence ranges the host may collapse. Together they tile the
/// text exactly: every byte belongs to one span or one fold range.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Highlights {
    /// Styled literal runs, strictly increasing and non-overlapping
    pub spans: Vec<StyledSpan>,
    /// Escape sequence ranges, empty when fold ranges are disabled
    pub fold_ranges: Vec<Range<usize>>,
}

impl Highlights {
    /// Runs the tokenizer and the SGR interpreter over `text`.
    ///
    /// The style register starts from [`Style::default`] on every call, so the
    /// result depends only on `text` and `config`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ansilog_sgrcodec::{Color, HighlightConfig, Highlights};
    ///
    /// let text = "\x1b[31merror\x1b[0m";
    /// let highlights = Highlights::compute(text, &HighlightConfig::default());
    ///
    /// assert_eq!(highlights.spans.len(), 1);
    /// assert_eq!(highlights.spans[0].range(), 5..10);
    /// assert_eq!(highlights.spans[0].style.foreground, Some(Color::Named(1)));
    /// assert_eq!(highlights.fold_ranges, vec![0..5, 10..14]);
    /// ```
    pub fn compute(text: &str, config: &HighlightConfig) -> Highlights {
        let mut highlights = Highlights::default();
        let mut cursor = 0;
        let mut style = Style::default();
        let mut tokens = 0usize;

        let tokenizer = Tokenizer::new(text).with_literal_escapes(config.recognize_literal_escapes);
        for token in tokenizer {
            if token.start > cursor {
                highlights
                    .spans
                    .push(StyledSpan::new(cursor, token.start, style));
            }
            style = style.apply(&token.codes);
            cursor = token.end;
            tokens += 1;
            if config.emit_fold_ranges {
                highlights.fold_ranges.push(token.range());
            }
        }

        if cursor < text.len() {
            highlights
                .spans
                .push(StyledSpan::new(cursor, text.len(), style));
        }

        tracing::trace!(
            bytes = text.len(),
            tokens,
            spans = highlights.spans.len(),
            "Computed highlights"
        );
        highlights
    }

    /// Returns `true` when there is nothing to paint or fold.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty() && self.fold_ranges.is_empty()
    }

    /// Style of the literal character at `offset`, if it is not inside an
    /// escape sequence.
    pub fn style_at(&self, offset: usize) -> Option<Style> {
        let index = self.spans.partition_point(|span| span.end <= offset);
        self.spans
            .get(index)
            .filter(|span| span.start <= offset)
            .map(|span| span.style)
    }

    /// Fold range containing `offset`.
    ///
    /// Hosts that reveal escape codes under the caret use this to pick the
    /// fold to expand.
    pub fn fold_at(&self, offset: usize) -> Option<Range<usize>> {
        let index = self.fold_ranges.partition_point(|range| range.end <= offset);
        self.fold_ranges
            .get(index)
            .filter(|range| range.start <= offset)
            .cloned()
    }

    /// Concatenates the literal text of every span, i.e. the text with all
    /// recognized escape sequences removed.
    pub fn plain_text(&self, source: &str) -> String {
        let mut output = String::with_capacity(self.spans.iter().map(StyledSpan::len).sum());
        for span in &self.spans {
            output.push_str(span.text(source));
        }
        output
    }
}

/// Builds the ordered styled spans of `text`.
///
/// Both escape marker forms are recognized. The function is total: empty text
/// yields no spans and text without escapes yields a single default span.
///
/// # Examples
///
/// ```rust
/// use ansilog_sgrcodec::{build_spans, Style, StyledSpan};
///
/// assert_eq!(build_spans("hello world"), vec![StyledSpan::new(0, 11, Style::default())]);
/// assert!(build_spans("").is_empty());
/// ```
pub fn build_spans(text: &str) -> Vec<StyledSpan> {
    Highlights::compute(text, &HighlightConfig::default().with_fold_ranges(false)).spans
}
