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

//! Classification of SGR sequences by the kind of attribute they set.

use crate::EscapeToken;
use crate::style::parse_code;

/// The kind of attribute a group of SGR codes sets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SgrCategory {
    /// `0` or an empty code
    Reset,
    /// `1`
    Bold,
    /// Foreground `30-37`
    BasicColor,
    /// Foreground `90-97`
    BrightColor,
    /// Background `40-47` and `100-107`
    Background,
    /// `38;5;n` or `48;5;n`
    IndexedColor,
    /// `38;2;r;g;b` or `48;2;r;g;b`
    Truecolor,
}

impl SgrCategory {
    /// Number of categories.
    pub const COUNT: usize = 7;

    /// Every category, in declaration order.
    pub const ALL: [SgrCategory; SgrCategory::COUNT] = [
        SgrCategory::Reset,
        SgrCategory::Bold,
        SgrCategory::BasicColor,
        SgrCategory::BrightColor,
        SgrCategory::Background,
        SgrCategory::IndexedColor,
        SgrCategory::Truecolor,
    ];

    /// Position in [`SgrCategory::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Human readable name.
    pub fn name(self) -> &'static str {
        match self {
            SgrCategory::Reset => "reset",
            SgrCategory::Bold => "bold",
            SgrCategory::BasicColor => "basic color",
            SgrCategory::BrightColor => "bright color",
            SgrCategory::Background => "background",
            SgrCategory::IndexedColor => "256-color",
            SgrCategory::Truecolor => "truecolor",
        }
    }

    /// Category of one code group as produced by [`code_groups`].
    pub fn of_group<S: AsRef<str>>(group: &[S]) -> Option<SgrCategory> {
        let first = group.first()?.as_ref();
        if first.is_empty() {
            return Some(SgrCategory::Reset);
        }
        match (parse_code(first)?, group.len()) {
            (0, 1) => Some(SgrCategory::Reset),
            (1, 1) => Some(SgrCategory::Bold),
            (30..=37, 1) => Some(SgrCategory::BasicColor),
            (90..=97, 1) => Some(SgrCategory::BrightColor),
            (40..=47 | 100..=107, 1) => Some(SgrCategory::Background),
            (38 | 48, 3) => Some(SgrCategory::IndexedColor),
            (38 | 48, 5) => Some(SgrCategory::Truecolor),
            _ => None,
        }
    }
}

impl std::fmt::Display for SgrCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Splits SGR codes into the groups the interpreter consumes together.
///
/// A `38`/`48` followed by `5;n` or `2;r;g;b` forms one group; every other
/// code is a group of its own. The grouping matches [`crate::Style::apply`],
/// so a color parameter is never mistaken for a standalone code.
pub fn code_groups<S: AsRef<str>>(codes: &[S]) -> CodeGroups<'_, S> {
    CodeGroups { codes }
}

/// Iterator returned by [`code_groups`].
#[derive(Debug)]
pub struct CodeGroups<'c, S> {
    codes: &'c [S],
}

impl<'c, S: AsRef<str>> Iterator for CodeGroups<'c, S> {
    type Item = &'c [S];

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.codes.first()?.as_ref();
        let extended = matches!(parse_code(first), Some(38 | 48));
        let len = match self.codes.get(1).map(|s| s.as_ref()) {
            Some("5") if extended && self.codes.len() >= 3 => 3,
            Some("2") if extended && self.codes.len() >= 5 => 5,
            _ => 1,
        };
        let (group, rest) = self.codes.split_at(len);
        self.codes = rest;
        Some(group)
    }
}

impl EscapeToken<'_> {
    /// Distinct categories of the codes in this token, in category order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ansilog_sgrcodec::{SgrCategory, Tokenizer};
    ///
    /// let token = Tokenizer::new("\x1b[1;38;5;208m").next().unwrap();
    /// assert_eq!(token.categories(), vec![SgrCategory::Bold, SgrCategory::IndexedColor]);
    /// ```
    pub fn categories(&self) -> Vec<SgrCategory> {
        let mut categories: Vec<SgrCategory> = code_groups(self.codes.as_slice())
            .filter_map(SgrCategory::of_group)
            .collect();
        categories.sort_unstable();
        categories.dedup();
        categories
    }

    /// Returns `true` if any code group of this token is in `category`.
    pub fn has_category(&self, category: SgrCategory) -> bool {
        code_groups(self.codes.as_slice()).any(|group| SgrCategory::of_group(group) == Some(category))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tokenizer;

    fn groups<'a>(codes: &'a [&'a str]) -> Vec<&'a [&'a str]> {
        code_groups(codes).collect()
    }

    fn categories(text: &str) -> Vec<SgrCategory> {
        Tokenizer::new(text).next().map(|t| t.categories()).unwrap_or_default()
    }

    #[test]
    fn test_code_groups() {
        assert_eq!(groups(&["1", "31"]), vec![&["1"][..], &["31"][..]]);
        assert_eq!(
            groups(&["38", "5", "1", "4"]),
            vec![&["38", "5", "1"][..], &["4"][..]]
        );
        assert_eq!(groups(&["48", "2", "1", "2", "3"]), vec![&["48", "2", "1", "2", "3"][..]]);
        // Too short or unknown selector: the 38 stands alone
        assert_eq!(groups(&["38", "2", "1"]), vec![&["38"][..], &["2"][..], &["1"][..]]);
        assert_eq!(groups(&["38", "05", "1"]).len(), 3);
        assert!(groups(&[]).is_empty());
    }

    #[test]
    fn test_token_categories() {
        assert_eq!(categories("\x1b[0m"), vec![SgrCategory::Reset]);
        assert_eq!(categories("\x1b[m"), vec![SgrCategory::Reset]);
        assert_eq!(categories("\x1b[1;31m"), vec![SgrCategory::Bold, SgrCategory::BasicColor]);
        assert_eq!(categories("\x1b[93m"), vec![SgrCategory::BrightColor]);
        assert_eq!(categories("\x1b[44;101m"), vec![SgrCategory::Background]);
        assert_eq!(categories("\x1b[48;5;17m"), vec![SgrCategory::IndexedColor]);
        assert_eq!(categories("\x1b[38;2;1;2;3m"), vec![SgrCategory::Truecolor]);
        assert!(categories("\x1b[22;5m").is_empty());
    }

    #[test]
    fn test_color_parameters_are_not_categorized() {
        // The 1 and 31 are palette entries here
        let token = Tokenizer::new("\x1b[38;5;1m\x1b[38;5;31m").next().unwrap();
        assert!(!token.has_category(SgrCategory::Bold));
        assert!(token.has_category(SgrCategory::IndexedColor));
    }

    #[test]
    fn test_category_names() {
        for (index, category) in SgrCategory::ALL.iter().enumerate() {
            assert_eq!(category.index(), index);
            assert!(!category.name().is_empty());
        }
        assert_eq!(SgrCategory::IndexedColor.to_string(), "256-color");
    }
}
