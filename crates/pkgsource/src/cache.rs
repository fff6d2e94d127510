use once_cell::sync::Lazy;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

static GLOBAL_CACHE: Lazy<TransportCache> = Lazy::new(TransportCache::new);

/// In-memory store of remote payloads, keyed by the URL they were fetched from.
/// Entries live until explicitly cleared. Clones share the same store.
#[derive(Clone, Default)]
pub struct TransportCache {
    entries: Arc<scc::HashMap<String, Vec<u8>>>,
}

impl TransportCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process wide cache used by factories that aren't given their own.
    pub fn global() -> &'static TransportCache {
        &GLOBAL_CACHE
    }

    pub async fn get(&self, url: &str) -> Option<Vec<u8>> {
        self.entries
            .read_async(url, |_, payload| payload.clone())
            .await
    }

    pub async fn set(&self, url: &str, payload: Vec<u8>) {
        use scc::hash_map::Entry;

        trace!(url, size = payload.len(), "Caching payload");

        match self.entries.entry_async(url.to_owned()).await {
            Entry::Occupied(mut entry) => {
                *entry.get_mut() = payload;
            }
            Entry::Vacant(entry) => {
                entry.insert_entry(payload);
            }
        };
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains(url)
    }

    pub fn clear(&self) {
        trace!(entries = self.entries.len(), "Clearing transport cache");

        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for TransportCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportCache")
            .field("entries", &self.entries.len())
            .finish()
    }
}
