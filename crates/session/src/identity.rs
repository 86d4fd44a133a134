use crate::KeyValueStore;
use assist_protocol::VISITOR_ID_KEY;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Stable anonymous identifier for a browser profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VisitorId(String);

impl VisitorId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VisitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone)]
pub struct IdentityStore {
    store: Arc<dyn KeyValueStore>,
}

impl IdentityStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Returns the persisted visitor id, creating and persisting one on first
    /// use. An existing id is never replaced.
    ///
    /// When storage is unavailable the caller gets a fresh id that is not
    /// persisted, so each call yields a different one.
    pub async fn get_or_create_visitor_id(&self) -> VisitorId {
        match self.store.get(VISITOR_ID_KEY).await {
            Ok(Some(existing)) if !existing.is_empty() => return VisitorId(existing),
            Ok(_) => {}
            Err(err) => {
                log::warn!("Visitor id storage unavailable, using ephemeral id: {err}");
                return VisitorId::generate();
            }
        }

        let id = VisitorId::generate();
        if let Err(err) = self.store.set(VISITOR_ID_KEY, id.as_str()).await {
            log::warn!("Failed to persist visitor id: {err}");
        } else {
            log::debug!("Created visitor id {id}");
        }
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryStore, UnavailableStore};

    #[tokio::test]
    async fn creates_once_and_reuses() {
        let store = Arc::new(MemoryStore::new());
        let identity = IdentityStore::new(store.clone());

        let first = identity.get_or_create_visitor_id().await;
        let second = identity.get_or_create_visitor_id().await;
        assert_eq!(first, second);
        assert_eq!(
            store.get(VISITOR_ID_KEY).await.unwrap().as_deref(),
            Some(first.as_str())
        );
    }

    #[tokio::test]
    async fn keeps_existing_id() {
        let store = Arc::new(MemoryStore::with_entries([(VISITOR_ID_KEY, "known-visitor")]));
        let identity = IdentityStore::new(store);
        assert_eq!(
            identity.get_or_create_visitor_id().await.as_str(),
            "known-visitor"
        );
    }

    #[tokio::test]
    async fn generated_ids_are_uuid_v4() {
        let id = VisitorId::generate();
        let parsed = Uuid::parse_str(id.as_str()).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
    }

    #[tokio::test]
    async fn unavailable_storage_degrades_to_ephemeral_ids() {
        let identity = IdentityStore::new(Arc::new(UnavailableStore));
        let first = identity.get_or_create_visitor_id().await;
        let second = identity.get_or_create_visitor_id().await;
        assert_ne!(first, second);
    }
}
