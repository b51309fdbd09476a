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

//! Highlight settings and theme
//!
//! # Examples
//!
//! ```
//! use ansilog_service::HighlightSettings;
//! use std::time::Duration;
//!
//! let settings = HighlightSettings::default()
//!     .with_debounce(Duration::from_millis(50))
//!     .with_file_extensions(["log", "out"])
//!     .with_dark_theme(false);
//!
//! assert!(settings.matches_path("build/output.OUT"));
//! assert!(settings.validate().is_ok());
//! ```

use crate::{HighlightError, Result};
use ansilog_sgrcodec::{HighlightConfig, Rgb};
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;

/// Extension used when none is configured
pub const DEFAULT_EXTENSION: &str = "log";

/// Default quiet period before recomputing
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

/// Default document size ceiling, in characters
pub const DEFAULT_MAX_DOCUMENT_CHARS: usize = 5_000_000;

/// Editor color scheme the host renders with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Theme {
    /// Dark background
    #[default]
    Dark,
    /// Light background
    Light,
}

impl Theme {
    /// Foreground that makes a folded escape sequence blend into the background.
    pub fn concealed_color(self) -> Rgb {
        match self {
            Theme::Dark => Rgb::new(30, 30, 30),
            Theme::Light => Rgb::new(255, 255, 255),
        }
    }

    /// Foreground for an escape sequence revealed under the caret.
    pub fn hint_color(self) -> Rgb {
        match self {
            Theme::Dark => Rgb::new(100, 100, 100),
            Theme::Light => Rgb::new(150, 150, 150),
        }
    }
}

/// User facing highlight settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightSettings {
    /// Fold escape sequences out of view
    pub hide_ansi_codes: bool,
    /// Reveal the folded sequence under the caret
    pub show_on_cursor: bool,
    /// Render with the dark theme colors
    pub dark_theme: bool,
    /// Lowercase file extensions (without the dot) that get highlighted
    pub file_extensions: BTreeSet<String>,
    /// Quiet period after the last edit before recomputing
    pub debounce: Duration,
    /// Documents longer than this many characters are never highlighted
    pub max_document_chars: usize,
}

impl Default for HighlightSettings {
    fn default() -> Self {
        Self {
            hide_ansi_codes: true,
            show_on_cursor: true,
            dark_theme: true,
            file_extensions: BTreeSet::from([DEFAULT_EXTENSION.to_string()]),
            debounce: DEFAULT_DEBOUNCE,
            max_document_chars: DEFAULT_MAX_DOCUMENT_CHARS,
        }
    }
}

impl HighlightSettings {
    /// Create settings with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable folding of escape sequences
    pub fn with_hide_ansi_codes(mut self, enabled: bool) -> Self {
        self.hide_ansi_codes = enabled;
        self
    }

    /// Enable or disable revealing codes under the caret
    pub fn with_show_on_cursor(mut self, enabled: bool) -> Self {
        self.show_on_cursor = enabled;
        self
    }

    /// Select the dark or light theme
    pub fn with_dark_theme(mut self, dark: bool) -> Self {
        self.dark_theme = dark;
        self
    }

    /// Replace the highlighted file extensions
    ///
    /// Entries are trimmed, lowercased and stripped of a leading dot. An empty
    /// list falls back to `log`.
    pub fn with_file_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.file_extensions = extensions
            .into_iter()
            .map(|ext| normalize_extension(ext.as_ref()))
            .filter(|ext| !ext.is_empty())
            .collect();
        if self.file_extensions.is_empty() {
            self.file_extensions.insert(DEFAULT_EXTENSION.to_string());
        }
        self
    }

    /// Set the debounce delay
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Set the document size ceiling
    pub fn with_max_document_chars(mut self, max: usize) -> Self {
        self.max_document_chars = max;
        self
    }

    /// Check the settings for values the scheduler cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.debounce.is_zero() {
            return Err(HighlightError::InvalidConfig(
                "debounce must be positive".into(),
            ));
        }
        if self.max_document_chars == 0 {
            return Err(HighlightError::InvalidConfig(
                "max_document_chars must be positive".into(),
            ));
        }
        if let Some(ext) = self
            .file_extensions
            .iter()
            .find(|ext| ext.is_empty() || ext.contains(['.', '/', '\\']))
        {
            return Err(HighlightError::InvalidConfig(format!(
                "invalid file extension {ext:?}"
            )));
        }
        Ok(())
    }

    /// Check whether a file should be highlighted, by extension
    pub fn matches_path(&self, path: impl AsRef<Path>) -> bool {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.file_extensions.contains(&ext.to_ascii_lowercase()))
    }

    /// Span builder configuration derived from these settings
    pub fn highlight_config(&self) -> HighlightConfig {
        HighlightConfig::default().with_fold_ranges(self.hide_ansi_codes)
    }

    /// Theme selected by `dark_theme`
    pub fn theme(&self) -> Theme {
        if self.dark_theme {
            Theme::Dark
        } else {
            Theme::Light
        }
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_ascii_lowercase()
}
