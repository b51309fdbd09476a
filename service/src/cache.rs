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

//! Bounded cache of computed highlights keyed by document content

use ansilog_sgrcodec::{HighlightConfig, Highlights};
use dashmap::DashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Default number of cached results
pub const DEFAULT_CACHE_CAPACITY: usize = 100;

/// Default lifetime of a cached result
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

struct CacheEntry {
    text: Arc<str>,
    config: HighlightConfig,
    highlights: Arc<Highlights>,
    inserted_at: Instant,
}

impl CacheEntry {
    fn matches(&self, text: &str, config: &HighlightConfig) -> bool {
        self.config == *config && *self.text == *text
    }
}

/// Content addressed highlight cache
///
/// Identical text highlighted with the same configuration is computed once
/// per TTL. When full, the oldest entry is evicted. The cache is shared by
/// reference; there is no global instance.
pub struct SpanCache {
    entries: DashMap<u64, CacheEntry>,
    capacity: usize,
    ttl: Duration,
}

impl Default for SpanCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SpanCache {
    /// Create a cache with the default capacity and TTL
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            capacity: DEFAULT_CACHE_CAPACITY,
            ttl: DEFAULT_CACHE_TTL,
        }
    }

    /// Set the maximum number of entries (at least one)
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// Set how long an entry stays valid
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Lifetime of an entry
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of entries, expired ones included until purged
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the highlights of `text`, dropping the entry if it expired
    pub fn get(&self, text: &str, config: &HighlightConfig) -> Option<Arc<Highlights>> {
        let key = content_key(text, config);
        let expired = {
            let entry = self.entries.get(&key)?;
            if !entry.matches(text, config) {
                return None;
            }
            if entry.inserted_at.elapsed() <= self.ttl {
                return Some(entry.highlights.clone());
            }
            true
        };
        if expired {
            self.entries.remove(&key);
        }
        None
    }

    /// Store the highlights of `text`
    pub fn insert(&self, text: Arc<str>, config: &HighlightConfig, highlights: Arc<Highlights>) {
        let key = content_key(&text, config);
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.purge_expired();
            if self.entries.len() >= self.capacity {
                self.evict_oldest();
            }
        }
        self.entries.insert(
            key,
            CacheEntry {
                text,
                config: config.clone(),
                highlights,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Return cached highlights or compute and store them
    ///
    /// The flag is `true` on a cache hit.
    pub fn get_or_compute(
        &self,
        text: Arc<str>,
        config: &HighlightConfig,
    ) -> (Arc<Highlights>, bool) {
        if let Some(highlights) = self.get(&text, config) {
            return (highlights, true);
        }
        let highlights = Arc::new(Highlights::compute(&text, config));
        self.insert(text, config, highlights.clone());
        (highlights, false)
    }

    /// Remove every entry
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Remove expired entries, returning how many were dropped
    pub fn purge_expired(&self) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| entry.inserted_at.elapsed() <= self.ttl);
        let purged = before.saturating_sub(self.entries.len());
        if purged > 0 {
            tracing::debug!(purged, "Purged expired highlight cache entries");
        }
        purged
    }

    fn evict_oldest(&self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.inserted_at)
            .map(|entry| *entry.key());
        if let Some(key) = oldest {
            self.entries.remove(&key);
            tracing::trace!(key, "Evicted oldest highlight cache entry");
        }
    }
}

impl std::fmt::Debug for SpanCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpanCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .field("ttl", &self.ttl)
            .finish()
    }
}

fn content_key(text: &str, config: &HighlightConfig) -> u64 {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    config.hash(&mut hasher);
    hasher.finish()
}
