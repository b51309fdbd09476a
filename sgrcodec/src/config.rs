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

/// Options for a single highlighting pass.
///
/// # Examples
///
/// ```rust
/// use ansilog_sgrcodec::{HighlightConfig, Highlights};
///
/// let config = HighlightConfig::default().with_fold_ranges(false);
/// let highlights = Highlights::compute("\x1b[1mbold", &config);
/// assert!(highlights.fold_ranges.is_empty());
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct HighlightConfig {
    /// Recognize the textual `\u001B` marker in addition to the ESC byte
    pub recognize_literal_escapes: bool,
    /// Report escape token ranges so the host can fold them away
    pub emit_fold_ranges: bool,
}

impl HighlightConfig {
    /// Only the raw ESC byte starts a sequence; fold ranges are reported.
    pub fn raw_only() -> HighlightConfig {
        HighlightConfig {
            recognize_literal_escapes: false,
            emit_fold_ranges: true,
        }
    }

    /// Both marker forms, fold ranges reported.
    pub fn enabled() -> HighlightConfig {
        HighlightConfig {
            recognize_literal_escapes: true,
            emit_fold_ranges: true,
        }
    }

    /// Set whether the textual `\u001B` marker is recognized
    pub fn with_literal_escapes(mut self, enabled: bool) -> Self {
        self.recognize_literal_escapes = enabled;
        self
    }

    /// Set whether fold ranges are reported
    pub fn with_fold_ranges(mut self, enabled: bool) -> Self {
        self.emit_fold_ranges = enabled;
        self
    }
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self::enabled()
    }
}
