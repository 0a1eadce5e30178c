use std::num::NonZeroUsize;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use lru::LruCache;
use tracing::debug;
use worldtrue_common::{Config, Event, SuggestedEvent};

/// Key under which an event's similar-event suggestions are cached.
pub fn cache_key(event: &Event) -> String {
    format!("{}-{}", event.id, event.title)
}

/// Bounds on the suggestion cache. The default keeps every entry for the
/// life of the process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CachePolicy {
    /// Least-recently-used entries are evicted beyond this many keys.
    pub capacity: Option<NonZeroUsize>,
    /// Entries older than this are treated as absent.
    pub ttl: Option<Duration>,
}

impl CachePolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            capacity: config.cache_capacity.and_then(NonZeroUsize::new),
            ttl: config.cache_ttl_secs.map(Duration::from_secs),
        }
    }
}

struct CacheEntry {
    suggestions: Vec<SuggestedEvent>,
    stored_at: Instant,
}

/// Similar-event suggestions keyed by source event.
///
/// Values are stored without source annotation; callers annotate on read.
/// `put` overwrites whatever was there.
pub struct SuggestionCache {
    entries: Mutex<LruCache<String, CacheEntry>>,
    ttl: Option<Duration>,
}

impl Default for SuggestionCache {
    fn default() -> Self {
        Self::new(CachePolicy::default())
    }
}

impl SuggestionCache {
    pub fn new(policy: CachePolicy) -> Self {
        let entries = match policy.capacity {
            Some(capacity) => LruCache::new(capacity),
            None => LruCache::unbounded(),
        };
        Self {
            entries: Mutex::new(entries),
            ttl: policy.ttl,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, key: &str) -> Option<Vec<SuggestedEvent>> {
        self.get_at(key, Instant::now())
    }

    fn get_at(&self, key: &str, now: Instant) -> Option<Vec<SuggestedEvent>> {
        let mut entries = self.lock();

        let expired = match (self.ttl, entries.peek(key)) {
            (Some(ttl), Some(entry)) => now.saturating_duration_since(entry.stored_at) > ttl,
            _ => false,
        };
        if expired {
            debug!(key, "Suggestion cache entry expired");
            entries.pop(key);
            return None;
        }

        entries.get(key).map(|entry| entry.suggestions.clone())
    }

    pub fn put(&self, key: impl Into<String>, suggestions: Vec<SuggestedEvent>) {
        let key = key.into();
        let mut entries = self.lock();
        if let Some((evicted, _)) = entries.push(
            key.clone(),
            CacheEntry {
                suggestions,
                stored_at: Instant::now(),
            },
        ) {
            if evicted != key {
                debug!(key = %evicted, "Suggestion cache evicted least-recently-used entry");
            }
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggestion(title: &str) -> SuggestedEvent {
        SuggestedEvent {
            title: title.to_string(),
            description: String::new(),
            year: 1800,
            location: "Somewhere".to_string(),
            kind: "battle".to_string(),
        }
    }

    #[test]
    fn key_joins_id_and_title() {
        let event = Event::new("e1", "Battle of X", 1800, 0.0, 0.0);
        assert_eq!(cache_key(&event), "e1-Battle of X");
    }

    #[test]
    fn miss_then_hit() {
        let cache = SuggestionCache::default();
        assert_eq!(cache.get("e1-A"), None);

        cache.put("e1-A", vec![suggestion("B"), suggestion("C")]);
        let hit = cache.get("e1-A").unwrap();
        assert_eq!(hit.iter().map(|s| s.title.as_str()).collect::<Vec<_>>(), ["B", "C"]);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn put_replaces_without_merging() {
        let cache = SuggestionCache::default();
        cache.put("k", vec![suggestion("old")]);
        cache.put("k", vec![suggestion("new")]);

        assert_eq!(cache.get("k"), Some(vec![suggestion("new")]));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn unbounded_by_default() {
        let cache = SuggestionCache::default();
        for i in 0..1000 {
            cache.put(format!("k{i}"), vec![suggestion("s")]);
        }
        assert_eq!(cache.len(), 1000);
        assert!(cache.get("k0").is_some());
    }

    #[test]
    fn capacity_evicts_least_recently_used() {
        let cache = SuggestionCache::new(CachePolicy {
            capacity: NonZeroUsize::new(2),
            ttl: None,
        });
        cache.put("a", vec![suggestion("a")]);
        cache.put("b", vec![suggestion("b")]);
        // touch "a" so "b" becomes the eviction candidate
        assert!(cache.get("a").is_some());
        cache.put("c", vec![suggestion("c")]);

        assert!(cache.get("a").is_some());
        assert!(cache.get("b").is_none());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn ttl_expires_entries() {
        let cache = SuggestionCache::new(CachePolicy {
            capacity: None,
            ttl: Some(Duration::from_secs(60)),
        });
        cache.put("k", vec![suggestion("s")]);

        let now = Instant::now();
        assert!(cache.get_at("k", now).is_some());
        assert!(cache.get_at("k", now + Duration::from_secs(120)).is_none());
        // expired entries are dropped, not just hidden
        assert!(cache.is_empty());
    }

    #[test]
    fn clear_empties_cache() {
        let cache = SuggestionCache::default();
        cache.put("k", vec![suggestion("s")]);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn policy_from_config() {
        let config = Config {
            anthropic_api_key: Some("k".into()),
            research_model: "m".into(),
            research_api_url: None,
            cache_capacity: Some(64),
            cache_ttl_secs: Some(30),
        };
        let policy = CachePolicy::from_config(&config);
        assert_eq!(policy.capacity, NonZeroUsize::new(64));
        assert_eq!(policy.ttl, Some(Duration::from_secs(30)));
    }
}
