//! Cache of emotion analyses keyed by content fingerprint.

use dashmap::DashMap;
use std::time::{Duration, Instant};

use super::EmotionAnalysis;

/// Storage for finished analyses. Implementations must be safe to share
/// across tasks.
pub trait AnalysisCache: Send + Sync {
    /// Returns the analysis stored under `fingerprint`, if still valid.
    fn get(&self, fingerprint: &str) -> Option<EmotionAnalysis>;

    /// Stores `analysis` under `fingerprint`, replacing any previous entry.
    fn put(&self, fingerprint: String, analysis: EmotionAnalysis);

    /// Drops every entry.
    fn clear(&self);

    /// Number of stored entries, expired ones included.
    fn len(&self) -> usize;

    /// Returns true if nothing is stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

struct CacheEntry {
    analysis: EmotionAnalysis,
    created_at: Instant,
}

/// In-process [`AnalysisCache`] with a fixed time-to-live.
pub struct InMemoryAnalysisCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl InMemoryAnalysisCache {
    /// Creates a cache whose entries expire after `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Drops expired entries.
    pub fn purge_expired(&self) {
        let ttl = self.ttl;
        self.entries.retain(|_, entry| entry.created_at.elapsed() < ttl);
    }
}

impl Default for InMemoryAnalysisCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(86_400))
    }
}

impl std::fmt::Debug for InMemoryAnalysisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryAnalysisCache")
            .field("entries", &self.entries.len())
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl AnalysisCache for InMemoryAnalysisCache {
    fn get(&self, fingerprint: &str) -> Option<EmotionAnalysis> {
        if let Some(entry) = self.entries.get(fingerprint) {
            if entry.created_at.elapsed() < self.ttl {
                return Some(entry.analysis.clone());
            }
            // Expired
            drop(entry);
            self.entries.remove(fingerprint);
        }
        None
    }

    fn put(&self, fingerprint: String, analysis: EmotionAnalysis) {
        self.entries.insert(
            fingerprint,
            CacheEntry {
                analysis,
                created_at: Instant::now(),
            },
        );
    }

    fn clear(&self) {
        self.entries.clear();
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Sentiment;

    fn analysis(emotion: Sentiment) -> EmotionAnalysis {
        EmotionAnalysis {
            emotion,
            keywords: vec!["coffee".to_string()],
            emojis: String::new(),
        }
    }

    #[test]
    fn test_put_get() {
        let cache = InMemoryAnalysisCache::default();
        assert!(cache.get("abc").is_none());
        assert!(cache.is_empty());

        cache.put("abc".to_string(), analysis(Sentiment::Positive));
        assert_eq!(cache.get("abc"), Some(analysis(Sentiment::Positive)));
        assert_eq!(cache.len(), 1);

        cache.put("abc".to_string(), analysis(Sentiment::Negative));
        assert_eq!(cache.get("abc").unwrap().emotion, Sentiment::Negative);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_expiry() {
        let cache = InMemoryAnalysisCache::new(Duration::from_millis(1));
        cache.put("abc".to_string(), analysis(Sentiment::Neutral));
        cache.put("def".to_string(), analysis(Sentiment::Neutral));

        std::thread::sleep(Duration::from_millis(10));

        assert!(cache.get("abc").is_none());
        assert_eq!(cache.len(), 1);
        cache.purge_expired();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear() {
        let cache = InMemoryAnalysisCache::default();
        cache.put("abc".to_string(), analysis(Sentiment::Neutral));
        cache.clear();
        assert!(cache.is_empty());
    }
}
