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

use crate::Tokenizer;
use std::borrow::Cow;

/// Removes SGR escape sequences from a string.
///
/// Exactly the sequences the [`Tokenizer`] recognizes are removed, in both the
/// raw ESC form and the textual `\u001B` form. Unterminated sequences and
/// other escape families (cursor movement, OSC, ...) are left untouched, so
/// the result matches what a highlighted view shows once codes are folded.
///
/// # Performance
///
/// When the input holds no sequence the original string is returned borrowed
/// (zero-copy). Otherwise a new `String` is allocated once.
///
/// # Examples
///
/// ```
/// use std::borrow::Cow;
/// # use ansilog_sgrcodec::strip_ansi_codes;
///
/// let colored = "\x1b[1;31mRed Text\x1b[0m";
/// assert_eq!(strip_ansi_codes(colored), "Red Text");
///
/// let escaped = "\\u001B[32mok\\u001B[0m";
/// assert_eq!(strip_ansi_codes(escaped), "ok");
///
/// let plain = "Plain Text";
/// assert!(matches!(strip_ansi_codes(plain), Cow::Borrowed(_)));
/// ```
pub fn strip_ansi_codes(str: &str) -> Cow<'_, str> {
    let mut tokens = Tokenizer::new(str).peekable();
    if tokens.peek().is_none() {
        return Cow::Borrowed(str);
    }

    let mut result = String::with_capacity(str.len());
    let mut cursor = 0;
    for token in tokens {
        result.push_str(&str[cursor..token.start]);
        cursor = token.end;
    }
    result.push_str(&str[cursor..]);

    Cow::Owned(result)
}
