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

//! Token level rewriting of SGR sequences.

use super::category::{SgrCategory, code_groups};
use crate::consts::{ESC, LITERAL_ESCAPE_LEN};
use crate::{EscapeToken, Tokenizer};
use std::borrow::Cow;

/// Rewrites every recognized SGR sequence of `text` through `rewrite`.
///
/// `rewrite` receives each token and returns its replacement text, or `None`
/// to keep the sequence as is. Literal text between tokens is never touched.
/// Returns the input borrowed when nothing was replaced.
pub fn rewrite_tokens<F>(text: &str, mut rewrite: F) -> Cow<'_, str>
where
    F: FnMut(&EscapeToken<'_>) -> Option<String>,
{
    let mut output: Option<String> = None;
    let mut cursor = 0;
    for token in Tokenizer::new(text) {
        let Some(replacement) = rewrite(&token) else {
            continue;
        };
        let buffer = output.get_or_insert_with(|| String::with_capacity(text.len()));
        buffer.push_str(&text[cursor..token.start]);
        buffer.push_str(&replacement);
        cursor = token.end;
    }

    match output {
        Some(mut buffer) => {
            buffer.push_str(&text[cursor..]);
            Cow::Owned(buffer)
        }
        None => Cow::Borrowed(text),
    }
}

/// Replaces every `38;5;n` sequence with a plain `ESC[0m` reset.
///
/// Only sequences consisting of exactly one foreground 256-color code are
/// rewritten; combined sequences such as `1;38;5;n` are kept.
///
/// # Examples
///
/// ```
/// # use ansilog_sgrcodec::normalize_indexed_colors;
/// assert_eq!(normalize_indexed_colors("\x1b[38;5;244mdim"), "\x1b[0mdim");
/// ```
pub fn normalize_indexed_colors(text: &str) -> Cow<'_, str> {
    rewrite_tokens(text, |token| {
        let indexed = token.codes.len() == 3
            && token.codes[0] == "38"
            && !token.codes[2].is_empty()
            && token.has_category(SgrCategory::IndexedColor);
        indexed.then(|| "\x1b[0m".to_string())
    })
}

/// Replaces one SGR code with another inside every sequence.
///
/// `from` is matched against whole code groups, so replacing `31` leaves the
/// palette entry of `38;5;31` alone, and `38;5;208` can be replaced as a unit.
/// An empty `to` removes the code; a sequence left without codes is removed
/// entirely rather than turned into a reset. The escape marker form of each
/// rewritten sequence is preserved.
///
/// # Examples
///
/// ```
/// # use ansilog_sgrcodec::replace_code;
/// assert_eq!(replace_code("\x1b[1;31mred", "31", "32"), "\x1b[1;32mred");
/// assert_eq!(replace_code("\x1b[1mbold", "1", ""), "bold");
/// ```
pub fn replace_code<'t>(text: &'t str, from: &str, to: &str) -> Cow<'t, str> {
    rewrite_tokens(text, |token| {
        let mut replaced = false;
        let mut codes: Vec<String> = Vec::with_capacity(token.codes.len());
        for group in code_groups(token.codes.as_slice()) {
            let joined = group.join(";");
            if joined == from {
                replaced = true;
                if !to.is_empty() {
                    codes.push(to.to_string());
                }
            } else {
                codes.push(joined);
            }
        }

        if !replaced {
            None
        } else if codes.is_empty() {
            Some(String::new())
        } else {
            Some(format!("{}[{}m", marker(text, token), codes.join(";")))
        }
    })
}

/// The escape marker of `token` as written in `text`.
fn marker<'t>(text: &'t str, token: &EscapeToken<'_>) -> &'t str {
    let len = if text.as_bytes()[token.start] == ESC {
        1
    } else {
        LITERAL_ESCAPE_LEN
    };
    &text[token.start..token.start + len]
}
