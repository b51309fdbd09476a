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

use crate::{SgrCategory, Tokenizer};

/// Escape sequence counts for a document.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AnsiStatistics {
    /// Number of recognized SGR sequences
    pub total_codes: usize,
    /// Number of lines in the document (an empty document has one line)
    pub total_lines: usize,
    /// Number of lines holding at least one sequence
    pub lines_with_codes: usize,
    /// Size of the document in bytes
    pub bytes: usize,
    /// Sequences per [`SgrCategory`], indexed by [`SgrCategory::index`]
    ///
    /// A sequence is counted once in every category it touches.
    pub category_counts: [usize; SgrCategory::COUNT],
}

impl AnsiStatistics {
    /// Scans `text` once and counts its sequences per line.
    pub fn collect(text: &str) -> AnsiStatistics {
        let mut stats = AnsiStatistics {
            total_lines: text.bytes().filter(|b| *b == b'\n').count() + 1,
            bytes: text.len(),
            ..Default::default()
        };

        let mut scanned = 0;
        let mut line = 0;
        let mut last_counted_line = None;
        for token in Tokenizer::new(text) {
            line += text.as_bytes()[scanned..token.start]
                .iter()
                .filter(|b| **b == b'\n')
                .count();
            scanned = token.start;
            stats.total_codes += 1;
            for category in token.categories() {
                stats.category_counts[category.index()] += 1;
            }
            if last_counted_line != Some(line) {
                stats.lines_with_codes += 1;
                last_counted_line = Some(line);
            }
        }

        stats
    }

    /// Number of sequences setting an attribute of `category`.
    pub fn count(&self, category: SgrCategory) -> usize {
        self.category_counts[category.index()]
    }

    /// Average number of sequences on lines that have any.
    pub fn codes_per_line(&self) -> f64 {
        if self.lines_with_codes == 0 {
            0.0
        } else {
            self.total_codes as f64 / self.lines_with_codes as f64
        }
    }
}

impl std::fmt::Display for AnsiStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} codes on {}/{} lines ({:.1} per line, {:.1} KB)",
            self.total_codes,
            self.lines_with_codes,
            self.total_lines,
            self.codes_per_line(),
            self.bytes as f64 / 1024.0
        )
    }
}
