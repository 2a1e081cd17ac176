use crate::{EventId, EventStore, HistoricalEvent, KeyValueStore, StorageError};

pub const FAVOURITES_KEY: &str = "favourites";

/// User-curated list of event ids, most recently added first, mirrored to a
/// [`KeyValueStore`] as a JSON array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Favourites {
    key: String,
    ids: Vec<EventId>,
}

impl Default for Favourites {
    fn default() -> Self {
        Self::with_key(FAVOURITES_KEY)
    }
}

impl Favourites {
    /// Empty list persisted under `key`.
    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ids: Vec::new(),
        }
    }

    /// Loads the list stored under the default key.
    pub fn load(store: &(impl KeyValueStore + ?Sized)) -> Self {
        Self::load_with_key(store, FAVOURITES_KEY)
    }

    /// Loads the list stored under `key`. A missing or unreadable value yields
    /// an empty list.
    pub fn load_with_key(store: &(impl KeyValueStore + ?Sized), key: &str) -> Self {
        let mut favourites = Self::with_key(key);

        let Some(raw) = store.get_string(key) else {
            log::debug!("no favourites stored under {key:?}");
            return favourites;
        };

        match serde_json::from_str::<Vec<EventId>>(&raw) {
            Ok(ids) => {
                for id in ids {
                    if !favourites.ids.contains(&id) {
                        favourites.ids.push(id);
                    }
                }
                log::info!("loaded {} favourites", favourites.ids.len());
            }
            Err(err) => {
                log::warn!("ignoring unreadable favourites under {key:?}: {err}");
            }
        }

        favourites
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn ids(&self) -> &[EventId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn is_favourite(&self, id: EventId) -> bool {
        self.ids.contains(&id)
    }

    /// Removes `id` if present, otherwise puts it at the front, then persists.
    ///
    /// Returns whether `id` is a favourite afterwards. A failed write is logged
    /// and the in-memory list is kept.
    pub fn toggle(&mut self, id: EventId, store: &mut (impl KeyValueStore + ?Sized)) -> bool {
        let was = self.is_favourite(id);
        if was {
            self.ids.retain(|&x| x != id);
        } else {
            self.ids.insert(0, id);
        }

        if let Err(err) = self.persist(store) {
            log::warn!("favourites kept in memory only: {err}");
        }

        !was
    }

    /// # Errors
    /// Returns [`StorageError`] if serialization or the store write fails.
    pub fn persist(&self, store: &mut (impl KeyValueStore + ?Sized)) -> Result<(), StorageError> {
        let raw = serde_json::to_string(&self.ids)?;
        store.set_string(&self.key, raw)
    }

    /// Favourite events in list order. Ids that no longer resolve are skipped.
    pub fn resolve<'a>(
        &'a self,
        events: &'a EventStore,
    ) -> impl Iterator<Item = &'a HistoricalEvent> + 'a {
        self.ids.iter().filter_map(|&id| events.get(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Category, MemoryStore, Position};

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get_string(&self, _: &str) -> Option<String> {
            None
        }

        fn set_string(&mut self, _: &str, _: String) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
    }

    fn store_of(ids: &[u32]) -> EventStore {
        EventStore::new(
            ids.iter()
                .map(|&id| HistoricalEvent {
                    id: EventId(id),
                    title: format!("event {id}"),
                    description: String::new(),
                    position: Position::default(),
                    category: Category::History,
                })
                .collect(),
        )
    }

    #[test]
    fn test_toggle_inserts_front_and_removes() {
        let mut kv = MemoryStore::new();
        let mut f = Favourites::default();

        assert!(f.toggle(EventId(3), &mut kv));
        assert!(f.toggle(EventId(1), &mut kv));
        assert_eq!(f.ids(), &[EventId(1), EventId(3)]);

        assert!(!f.toggle(EventId(3), &mut kv));
        assert_eq!(f.ids(), &[EventId(1)]);
        assert_eq!(kv.get_string(FAVOURITES_KEY).as_deref(), Some("[1]"));
    }

    #[test]
    fn test_double_toggle_restores() {
        let mut kv = MemoryStore::new();
        let mut f = Favourites::default();
        f.toggle(EventId(5), &mut kv);
        f.toggle(EventId(9), &mut kv);
        let before = f.clone();

        f.toggle(EventId(7), &mut kv);
        f.toggle(EventId(7), &mut kv);
        assert_eq!(f, before);
        assert!(!f.is_favourite(EventId(7)));
    }

    #[test]
    fn test_persist_load_roundtrip() {
        let mut kv = MemoryStore::new();
        let mut f = Favourites::default();
        for id in [4, 8, 15, 16] {
            f.toggle(EventId(id), &mut kv);
        }
        f.persist(&mut kv).unwrap();

        let loaded = Favourites::load(&kv);
        assert_eq!(loaded, f);
        assert_eq!(
            loaded.ids(),
            &[EventId(16), EventId(15), EventId(8), EventId(4)]
        );
    }

    #[test]
    fn test_load_missing_or_corrupt_is_empty() {
        let mut kv = MemoryStore::new();
        assert!(Favourites::load(&kv).is_empty());

        kv.set_string(FAVOURITES_KEY, "{not json".to_string()).unwrap();
        assert!(Favourites::load(&kv).is_empty());

        kv.set_string(FAVOURITES_KEY, r#"["a","b"]"#.to_string())
            .unwrap();
        assert!(Favourites::load(&kv).is_empty());
    }

    #[test]
    fn test_load_drops_duplicates() {
        let mut kv = MemoryStore::new();
        kv.set_string(FAVOURITES_KEY, "[2,1,2]".to_string()).unwrap();
        assert_eq!(Favourites::load(&kv).ids(), &[EventId(2), EventId(1)]);
    }

    #[test]
    fn test_custom_key() {
        let mut kv = MemoryStore::new();
        let mut f = Favourites::with_key("liked");
        f.toggle(EventId(1), &mut kv);
        assert!(kv.get_string(FAVOURITES_KEY).is_none());
        assert_eq!(Favourites::load_with_key(&kv, "liked").ids(), &[EventId(1)]);
    }

    #[test]
    fn test_failed_write_keeps_memory_state() {
        let mut f = Favourites::default();
        assert!(f.toggle(EventId(2), &mut BrokenStore));
        assert!(f.is_favourite(EventId(2)));
    }

    #[test]
    fn test_resolve_skips_stale_ids() {
        let mut kv = MemoryStore::new();
        let events = store_of(&[1, 2, 3]);
        let mut f = Favourites::default();
        f.toggle(EventId(2), &mut kv);
        f.toggle(EventId(42), &mut kv);
        f.toggle(EventId(1), &mut kv);

        let titles: Vec<_> = f.resolve(&events).map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["event 1", "event 2"]);
        assert_eq!(f.len(), 3);
    }
}
