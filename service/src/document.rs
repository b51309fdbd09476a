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

//! Ready made [`DocumentSource`] implementations

use crate::DocumentSource;
use std::sync::{Arc, PoisonError, RwLock};

/// Immutable text, e.g. a file opened read-only
#[derive(Debug, Clone)]
pub struct StaticDocument {
    text: Arc<str>,
    chars: usize,
}

impl StaticDocument {
    /// Wrap `text`
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        let text = text.into();
        let chars = text.chars().count();
        Self { text, chars }
    }
}

impl DocumentSource for StaticDocument {
    fn snapshot(&self) -> Arc<str> {
        self.text.clone()
    }

    fn char_len(&self) -> usize {
        self.chars
    }
}

#[derive(Debug)]
struct Contents {
    text: Arc<str>,
    chars: usize,
}

/// Mutable text buffer, e.g. a log file being tailed
///
/// Snapshots are cheap clones of the current text; writers replace it.
#[derive(Debug)]
pub struct SharedDocument {
    contents: RwLock<Contents>,
}

impl Default for SharedDocument {
    fn default() -> Self {
        Self::new("")
    }
}

impl SharedDocument {
    /// Create a buffer holding `text`
    pub fn new(text: &str) -> Self {
        Self {
            contents: RwLock::new(Contents {
                text: Arc::from(text),
                chars: text.chars().count(),
            }),
        }
    }

    /// Replace the whole text
    pub fn replace(&self, text: &str) {
        let mut contents = self.contents.write().unwrap_or_else(PoisonError::into_inner);
        contents.text = Arc::from(text);
        contents.chars = text.chars().count();
    }

    /// Append to the end of the text
    pub fn append(&self, text: &str) {
        let mut contents = self.contents.write().unwrap_or_else(PoisonError::into_inner);
        let mut joined = String::with_capacity(contents.text.len() + text.len());
        joined.push_str(&contents.text);
        joined.push_str(text);
        contents.text = Arc::from(joined);
        contents.chars += text.chars().count();
    }

    /// Length of the text in bytes
    pub fn len(&self) -> usize {
        self.contents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .text
            .len()
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DocumentSource for SharedDocument {
    fn snapshot(&self) -> Arc<str> {
        self.contents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .text
            .clone()
    }

    fn char_len(&self) -> usize {
        self.contents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .chars
    }
}
