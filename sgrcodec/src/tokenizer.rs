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

use crate::consts::{CSI, ESC, LITERAL_ESCAPE_LEN, PARAM_SEPARATOR, SGR_FINAL};
use std::ops::Range;

/// A recognized SGR escape sequence inside a larger text.
///
/// `start` and `end` are byte offsets into the original text and include the
/// escape marker, the `[` and the final `m`. `codes` holds the raw parameter
/// strings between `[` and `m`, split on `;`, borrowed from the text.
///
/// An empty parameter list (`ESC[m`) is represented by a single empty code,
/// which the interpreter treats as a reset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EscapeToken<'a> {
    /// Byte offset of the escape marker
    pub start: usize,
    /// Byte offset one past the terminating `m`
    pub end: usize,
    /// Raw `;` separated parameters
    pub codes: Vec<&'a str>,
}

impl EscapeToken<'_> {
    /// Byte range covered by the token.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Length of the token in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Tokens always contain at least `ESC[m`, so they are never empty.
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Lazy scanner over the SGR escape sequences of a text.
///
/// The tokenizer recognizes two escape marker forms:
///
/// - the raw ESC control byte (`0x1B`), and
/// - the six character literal `\u001B` (lowercase `u`, hex digits in
///   either case), as
///   written by log producers that escape control characters.
///
/// A marker must be followed by `[`, any run of digits and semicolons, and a
/// terminating `m`. Anything else (a different final byte, a foreign
/// character, the end of input) leaves the candidate as literal text and
/// scanning resumes on the byte after the marker's first byte. No errors are
/// ever produced.
///
/// Tokens are yielded in order of their start offset and never overlap. The
/// tokenizer is `Clone`, and [`Tokenizer::starting_at`] restarts a scan from
/// any byte offset.
///
/// # Examples
///
/// ```rust
/// use ansilog_sgrcodec::Tokenizer;
///
/// let tokens: Vec<_> = Tokenizer::new("\x1b[1;31mfail\x1b[0m").collect();
/// assert_eq!(tokens.len(), 2);
/// assert_eq!(tokens[0].range(), 0..7);
/// assert_eq!(tokens[0].codes, vec!["1", "31"]);
/// assert_eq!(tokens[1].range(), 11..15);
/// ```
#[derive(Clone, Debug)]
pub struct Tokenizer<'a> {
    text: &'a str,
    position: usize,
    literal_escapes: bool,
}

impl<'a> Tokenizer<'a> {
    /// Creates a tokenizer positioned at the start of `text`.
    pub fn new(text: &'a str) -> Self {
        Self::starting_at(text, 0)
    }

    /// Creates a tokenizer that only reports tokens starting at or after
    /// `offset`. Offsets beyond the end of the text yield nothing.
    pub fn starting_at(text: &'a str, offset: usize) -> Self {
        Self {
            text,
            position: offset.min(text.len()),
            literal_escapes: true,
        }
    }

    /// Enables or disables recognition of the textual `\u001B` marker.
    pub fn with_literal_escapes(mut self, enabled: bool) -> Self {
        self.literal_escapes = enabled;
        self
    }

    /// Current scan offset.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Length of the escape marker at `pos`, if one starts there.
    fn marker_len_at(&self, pos: usize) -> Option<usize> {
        let bytes = self.text.as_bytes();
        match bytes.get(pos) {
            Some(&ESC) => Some(1),
            Some(&b'\\') if self.literal_escapes => bytes
                .get(pos + 1..pos + LITERAL_ESCAPE_LEN)
                .filter(|tail| tail[0] == b'u' && tail[1..].eq_ignore_ascii_case(b"001b"))
                .map(|_| LITERAL_ESCAPE_LEN),
            _ => None,
        }
    }

    /// Attempts to match a complete SGR sequence whose marker starts at `pos`.
    fn match_at(&self, pos: usize) -> Option<EscapeToken<'a>> {
        let bytes = self.text.as_bytes();
        let open = pos + self.marker_len_at(pos)?;
        if bytes.get(open) != Some(&CSI) {
            return None;
        }

        let params_start = open + 1;
        let params_end = params_start
            + bytes[params_start..]
                .iter()
                .take_while(|b| b.is_ascii_digit() || **b == b';')
                .count();

        if bytes.get(params_end) != Some(&SGR_FINAL) {
            return None;
        }

        Some(EscapeToken {
            start: pos,
            end: params_end + 1,
            codes: self.text[params_start..params_end]
                .split(PARAM_SEPARATOR)
                .collect(),
        })
    }

    /// Offset of the next byte that could begin an escape marker.
    fn next_candidate(&self) -> Option<usize> {
        let literal = self.literal_escapes;
        self.text.as_bytes()[self.position..]
            .iter()
            .position(|&b| b == ESC || (literal && b == b'\\'))
            .map(|offset| self.position + offset)
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = EscapeToken<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(candidate) = self.next_candidate() {
            if let Some(token) = self.match_at(candidate) {
                self.position = token.end;
                return Some(token);
            }
            self.position = candidate + 1;
        }
        self.position = self.text.len();
        None
    }
}

impl std::iter::FusedIterator for Tokenizer<'_> {}

/// Returns the first token that starts strictly after `offset`.
///
/// Used by hosts to jump the caret to the next escape sequence.
pub fn next_token_after(text: &str, offset: usize) -> Option<EscapeToken<'_>> {
    Tokenizer::starting_at(text, offset.saturating_add(1)).next()
}

/// Cheap check for any escape marker, well-formed or not.
pub fn contains_escape_marker(text: &str) -> bool {
    text.as_bytes().contains(&ESC) || text.contains("\\u001B") || text.contains("\\u001b")
}
