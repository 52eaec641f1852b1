//! In-process record store.
//!
//! Used for local development (`SITE_STORE=memory`) and tests. Besides the
//! [`RecordStore`] contract it offers hooks for seeding raw documents and for
//! injecting write failures.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::store::{Collection, Document, FieldValue, Fields, RecordStore, StoreError};

/// Record store that keeps every document in memory.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<MemoryState>>,
}

#[derive(Default)]
struct MemoryState {
    collections: HashMap<Collection, BTreeMap<String, Fields>>,
    /// Writes attempted so far, successful or not.
    writes: usize,
    /// Remaining writes allowed to succeed; `None` means unlimited.
    writes_before_failure: Option<usize>,
    unavailable: bool,
}

impl MemoryState {
    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable {
            return Err(StoreError::Injected("store unavailable"));
        }
        Ok(())
    }

    fn begin_write(&mut self) -> Result<(), StoreError> {
        self.writes += 1;
        self.check_available()?;
        match &mut self.writes_before_failure {
            Some(0) => Err(StoreError::Injected("write rejected")),
            Some(remaining) => {
                *remaining -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn documents(&self, collection: Collection) -> impl Iterator<Item = Document> + '_ {
        self.collections
            .get(&collection)
            .into_iter()
            .flatten()
            .map(|(id, fields)| Document {
                id: id.clone(),
                fields: fields.clone(),
            })
    }
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a raw document under a chosen id, bypassing failure injection
    /// and write counting. Replaces any existing document with that id.
    pub async fn insert(&self, collection: Collection, id: impl Into<String>, fields: Fields) {
        let mut state = self.inner.write().await;
        state
            .collections
            .entry(collection)
            .or_default()
            .insert(id.into(), fields);
    }

    /// Raw fields of a document, if present.
    pub async fn get(&self, collection: Collection, id: &str) -> Option<Fields> {
        let state = self.inner.read().await;
        state
            .collections
            .get(&collection)
            .and_then(|documents| documents.get(id))
            .cloned()
    }

    /// Number of writes attempted so far, including failed ones.
    pub async fn write_count(&self) -> usize {
        self.inner.read().await.writes
    }

    /// Let the next `n` writes succeed, then fail every write after that.
    pub async fn fail_writes_after(&self, n: usize) {
        self.inner.write().await.writes_before_failure = Some(n);
    }

    /// Make every read and write fail (or succeed again).
    pub async fn set_unavailable(&self, unavailable: bool) {
        self.inner.write().await.unavailable = unavailable;
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn query_eq(
        &self,
        collection: Collection,
        field: &str,
        value: &FieldValue,
    ) -> Result<Vec<Document>, StoreError> {
        let state = self.inner.read().await;
        state.check_available()?;
        Ok(state
            .documents(collection)
            .filter(|document| document.fields.get(field) == Some(value))
            .collect())
    }

    async fn list(&self, collection: Collection) -> Result<Vec<Document>, StoreError> {
        let state = self.inner.read().await;
        state.check_available()?;
        Ok(state.documents(collection).collect())
    }

    async fn create(&self, collection: Collection, fields: Fields) -> Result<String, StoreError> {
        let mut state = self.inner.write().await;
        state.begin_write()?;

        let id = Uuid::new_v4().simple().to_string();
        state
            .collections
            .entry(collection)
            .or_default()
            .insert(id.clone(), fields);
        Ok(id)
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        fields: Fields,
    ) -> Result<(), StoreError> {
        let mut state = self.inner.write().await;
        state.begin_write()?;

        let document = state
            .collections
            .get_mut(&collection)
            .and_then(|documents| documents.get_mut(id))
            .ok_or_else(|| StoreError::NotFound {
                collection,
                id: id.to_owned(),
            })?;
        document.extend(fields);
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        let mut state = self.inner.write().await;
        state.begin_write()?;

        if let Some(documents) = state.collections.get_mut(&collection) {
            documents.remove(id);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, FieldValue)]) -> Fields {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), value.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_query_eq_matches_exactly() {
        let store = MemoryStore::new();
        store
            .insert(Collection::Products, "a", fields(&[("category", "rejas".into())]))
            .await;
        store
            .insert(Collection::Products, "b", fields(&[("category", "Rejas".into())]))
            .await;

        let docs = store
            .query_eq(Collection::Products, "category", &"rejas".into())
            .await
            .unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "a");
    }

    #[tokio::test]
    async fn test_collections_are_separate() {
        let store = MemoryStore::new();
        store.create(Collection::FeaturedProducts, Fields::new()).await.unwrap();

        assert!(store.list(Collection::Products).await.unwrap().is_empty());
        assert_eq!(store.list(Collection::FeaturedProducts).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let store = MemoryStore::new();
        store
            .insert(
                Collection::Products,
                "a",
                fields(&[("name", "Old".into()), ("price", "100".into())]),
            )
            .await;

        store
            .update(Collection::Products, "a", fields(&[("name", "New".into())]))
            .await
            .unwrap();

        let stored = store.get(Collection::Products, "a").await.unwrap();
        assert_eq!(stored.get("name"), Some(&FieldValue::from("New")));
        assert_eq!(stored.get("price"), Some(&FieldValue::from("100")));
    }

    #[tokio::test]
    async fn test_update_missing_document_fails() {
        let store = MemoryStore::new();
        let result = store
            .update(Collection::Products, "ghost", Fields::new())
            .await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_missing_document_is_ok() {
        let store = MemoryStore::new();
        assert!(store.delete(Collection::Products, "ghost").await.is_ok());
    }

    #[tokio::test]
    async fn test_fail_writes_after() {
        let store = MemoryStore::new();
        store.fail_writes_after(1).await;

        assert!(store.create(Collection::Products, Fields::new()).await.is_ok());
        assert!(store.create(Collection::Products, Fields::new()).await.is_err());
        assert_eq!(store.write_count().await, 2);
    }

    #[tokio::test]
    async fn test_unavailable_fails_reads() {
        let store = MemoryStore::new();
        store.set_unavailable(true).await;
        assert!(store.list(Collection::Products).await.is_err());

        store.set_unavailable(false).await;
        assert!(store.list(Collection::Products).await.is_ok());
    }
}
