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

//! SGR escape sequence interpretation for log highlighting.
//!
//! Converts text containing ANSI Select Graphic Rendition sequences into
//! ordered, non-overlapping styled spans:
//!
//! ```text
//! text ──▶ Tokenizer ──▶ EscapeToken ──▶ Style::apply ──▶ StyledSpan
//!                                              │
//!                                        Color::resolve ──▶ Rgb
//! ```
//!
//! Every function in this crate is total. Malformed input never produces an
//! error; it simply stays literal text.

mod color;
mod config;
mod consts;
mod style;
mod tokenizer;
pub mod utility;

pub use self::color::{Color, Rgb};
pub use self::config::HighlightConfig;
pub use self::style::Style;
pub use self::tokenizer::{EscapeToken, Tokenizer, contains_escape_marker, next_token_after};
pub use self::utility::{
    AnsiStatistics, CodeGroups, Highlights, SgrCategory, StyledSpan, build_spans, code_groups,
    normalize_indexed_colors, replace_code, rewrite_tokens, strip_ansi_codes,
};
