/*!
 * Translation result caching.
 *
 * This module provides a bounded LRU cache keyed by a fingerprint of the
 * translation request, so repeated identical requests skip the backend
 * entirely. The cache is a pure memoization layer: disabling it (capacity 0)
 * changes latency, never output.
 */

use std::num::NonZeroUsize;
use std::sync::Arc;

use log::debug;
use lru::LruCache;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};

/// Bounded LRU cache of translation results
pub struct ResultCache {
    /// Internal cache storage; `None` when caching is disabled
    cache: Option<Arc<Mutex<LruCache<String, String>>>>,

    /// Cache hit counter
    hits: Arc<Mutex<usize>>,

    /// Cache miss counter
    misses: Arc<Mutex<usize>>,
}

impl ResultCache {
    /// Create a new result cache with the given capacity; 0 disables caching
    pub fn new(capacity: usize) -> Self {
        let cache = NonZeroUsize::new(capacity)
            .map(|cap| Arc::new(Mutex::new(LruCache::new(cap))));

        Self {
            cache,
            hits: Arc::new(Mutex::new(0)),
            misses: Arc::new(Mutex::new(0)),
        }
    }

    /// Look up a previously computed translation
    pub fn lookup(&self, from: &str, to: &str, text: &str, is_html: bool) -> Option<String> {
        let cache = self.cache.as_ref()?;
        let key = fingerprint(from, to, text, is_html);

        // get() bumps recency, so even reads take the lock mutably
        match cache.lock().get(&key) {
            Some(result) => {
                *self.hits.lock() += 1;
                debug!(
                    "Cache hit for '{}' ({} -> {})",
                    truncate_text(text, 30),
                    from,
                    to
                );
                Some(result.clone())
            }
            None => {
                *self.misses.lock() += 1;
                debug!(
                    "Cache miss for '{}' ({} -> {})",
                    truncate_text(text, 30),
                    from,
                    to
                );
                None
            }
        }
    }

    /// Store a successful translation, evicting the least-recently-used entry
    /// if the cache is at capacity
    pub fn store(&self, from: &str, to: &str, text: &str, is_html: bool, result: &str) {
        let Some(cache) = self.cache.as_ref() else {
            return;
        };

        let key = fingerprint(from, to, text, is_html);
        cache.lock().put(key, result.to_string());

        debug!(
            "Cached translation for '{}' ({} -> {})",
            truncate_text(text, 30),
            from,
            to
        );
    }

    /// Get cache statistics as (hits, misses, hit rate)
    pub fn stats(&self) -> (usize, usize, f64) {
        let hits = *self.hits.lock();
        let misses = *self.misses.lock();
        let total = hits + misses;

        let hit_rate = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };

        (hits, misses, hit_rate)
    }

    /// Get the number of entries currently in the cache
    pub fn len(&self) -> usize {
        self.cache.as_ref().map_or(0, |cache| cache.lock().len())
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if the cache is enabled
    pub fn is_enabled(&self) -> bool {
        self.cache.is_some()
    }

    /// Drop every entry and reset the counters
    pub fn clear(&self) {
        if let Some(cache) = self.cache.as_ref() {
            cache.lock().clear();
        }
        *self.hits.lock() = 0;
        *self.misses.lock() = 0;

        debug!("Result cache cleared");
    }
}

impl Clone for ResultCache {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            hits: self.hits.clone(),
            misses: self.misses.clone(),
        }
    }
}

/// Compute the cache key for a request.
///
/// The key material is the normalized arguments joined with `_` plus the
/// combined length, hashed with SHA-256; appending the length keeps inputs of
/// different shapes from accidentally colliding after joining.
fn fingerprint(from: &str, to: &str, text: &str, is_html: bool) -> String {
    let joined = format!("{}_{}_{}_{}", from, to, text, is_html);
    let material = format!("{}_{}", joined, joined.len());

    let mut hasher = Sha256::new();
    hasher.update(material.as_bytes());
    let digest = hasher.finalize();

    format!("{:x}", digest)
}

/// Truncate text to a maximum length with ellipsis
fn truncate_text(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(max_length).collect::<String>())
    }
}
