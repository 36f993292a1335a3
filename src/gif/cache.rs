//! Process-lifetime memoization of GIF search results.

use std::collections::HashMap;
use std::sync::RwLock;

use super::tenor::TenorGif;

/// In-memory memo cache for GIF lookups.
///
/// Same at-most-one-entry-per-key contract as the response cache, minus
/// persistence, expiry and eviction: entries live for the process
/// lifetime. The key carries a mode discriminator so tone lookups and
/// free-text searches with the same term never collide.
pub struct GifCache {
    entries: RwLock<HashMap<String, Vec<TenorGif>>>,
}

impl GifCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Compose the memo key for a lookup: `<mode>-<term>-<limit>`.
    pub fn key(mode: &str, term: &str, limit: usize) -> String {
        format!("{}-{}-{}", mode, term, limit)
    }

    pub fn get(&self, key: &str) -> Option<Vec<TenorGif>> {
        self.entries.read().unwrap().get(key).cloned()
    }

    pub fn insert(&self, key: String, gifs: Vec<TenorGif>) {
        self.entries.write().unwrap().insert(key, gifs);
    }

    pub fn clear(&self) {
        self.entries.write().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for GifCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gif(id: &str) -> TenorGif {
        TenorGif {
            id: id.to_string(),
            url: format!("https://media.tenor.com/{}.gif", id),
            preview: format!("https://media.tenor.com/{}-tiny.gif", id),
            title: "test".to_string(),
            width: 320,
            height: 240,
        }
    }

    #[test]
    fn test_key_format() {
        assert_eq!(GifCache::key("tone", "formal", 5), "tone-formal-5");
        assert_eq!(GifCache::key("custom", "office cats", 8), "custom-office cats-8");
    }

    #[test]
    fn test_modes_do_not_collide() {
        assert_ne!(GifCache::key("tone", "formal", 5), GifCache::key("custom", "formal", 5));
    }

    #[test]
    fn test_insert_get_clear() {
        let cache = GifCache::new();
        let key = GifCache::key("tone", "casual", 5);
        assert_eq!(cache.get(&key), None);

        cache.insert(key.clone(), vec![gif("abc")]);
        assert_eq!(cache.get(&key).unwrap().len(), 1);
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get(&key), None);
    }

    #[test]
    fn test_insert_overwrites() {
        let cache = GifCache::new();
        let key = GifCache::key("tone", "genz", 3);
        cache.insert(key.clone(), vec![gif("a")]);
        cache.insert(key.clone(), vec![gif("b"), gif("c")]);
        assert_eq!(cache.get(&key).unwrap().len(), 2);
        assert_eq!(cache.len(), 1);
    }
}
