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

//! Error types for the highlight scheduler

use crate::types::DocumentId;
use thiserror::Error;

/// Result type for scheduler operations
pub type Result<T> = std::result::Result<T, HighlightError>;

/// Highlight scheduler error types
///
/// Escape sequence content never produces an error; these cover the
/// document lifecycle and configuration only.
#[derive(Debug, Error)]
pub enum HighlightError {
    /// Document with the given ID is not registered
    #[error("Document {0} not found")]
    DocumentNotFound(DocumentId),

    /// Document was dropped by its owner
    #[error("Document {0} closed")]
    DocumentClosed(DocumentId),

    /// Settings failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The blocking highlight job panicked or was cancelled
    #[error("Highlight computation failed: {0}")]
    ComputeFailed(String),
}

impl HighlightError {
    /// Check if the error concerns a document's lifecycle
    pub fn is_document_error(&self) -> bool {
        matches!(
            self,
            HighlightError::DocumentNotFound(_) | HighlightError::DocumentClosed(_)
        )
    }
}

impl From<tokio::task::JoinError> for HighlightError {
    fn from(error: tokio::task::JoinError) -> Self {
        HighlightError::ComputeFailed(error.to_string())
    }
}
