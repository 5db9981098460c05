//! In-process store: records kept in id order, ids assigned from 1.

use super::{Fields, Id, Storage, StorageError};
use crate::pagination::PaginationRequest;
use crate::schema::merge;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

pub struct MemoryStore {
    id_field: String,
    inner: RwLock<Inner>,
}

struct Inner {
    next_id: Id,
    rows: BTreeMap<Id, Fields>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_id_field("id")
    }

    pub fn with_id_field(id_field: impl Into<String>) -> Self {
        MemoryStore {
            id_field: id_field.into(),
            inner: RwLock::new(Inner {
                next_id: 1,
                rows: BTreeMap::new(),
            }),
        }
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.rows.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MemoryStore {
    fn id_field(&self) -> &str {
        &self.id_field
    }

    async fn create(&self, mut fields: Fields) -> Result<Fields, StorageError> {
        let mut inner = self.inner.write().await;
        let id = inner.next_id;
        inner.next_id += 1;
        fields.insert(self.id_field.clone(), Value::from(id));
        inner.rows.insert(id, fields.clone());
        Ok(fields)
    }

    async fn list(&self, window: PaginationRequest) -> Result<Vec<Fields>, StorageError> {
        let inner = self.inner.read().await;
        let skip = usize::try_from(window.skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(window.limit).unwrap_or(usize::MAX);
        Ok(inner.rows.values().skip(skip).take(limit).cloned().collect())
    }

    async fn get(&self, id: Id) -> Result<Option<Fields>, StorageError> {
        Ok(self.inner.read().await.rows.get(&id).cloned())
    }

    async fn update(&self, id: Id, mut fields: Fields) -> Result<Option<Fields>, StorageError> {
        fields.remove(&self.id_field);
        let mut inner = self.inner.write().await;
        let Some(row) = inner.rows.get_mut(&id) else {
            return Ok(None);
        };
        merge(row, fields);
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: Id) -> Result<Option<Fields>, StorageError> {
        Ok(self.inner.write().await.rows.remove(&id))
    }

    async fn delete_all(&self) -> Result<u64, StorageError> {
        let mut inner = self.inner.write().await;
        let removed = inner.rows.len() as u64;
        inner.rows.clear();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(v: Value) -> Fields {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn assigns_sequential_ids() {
        let store = MemoryStore::new();
        let a = store.create(fields(json!({ "name": "a" }))).await.unwrap();
        let b = store.create(fields(json!({ "name": "b" }))).await.unwrap();
        assert_eq!(a["id"], json!(1));
        assert_eq!(b["id"], json!(2));
    }

    #[tokio::test]
    async fn list_respects_window_in_insertion_order() {
        let store = MemoryStore::new();
        for name in ["a", "b", "c", "d"] {
            store.create(fields(json!({ "name": name }))).await.unwrap();
        }
        let page = store.list(PaginationRequest { skip: 1, limit: 2 }).await.unwrap();
        let names: Vec<_> = page.iter().map(|r| r["name"].clone()).collect();
        assert_eq!(names, vec![json!("b"), json!("c")]);
    }

    #[tokio::test]
    async fn update_merges_and_keeps_id() {
        let store = MemoryStore::new();
        store.create(fields(json!({ "name": "a", "note": "n" }))).await.unwrap();
        let row = store
            .update(1, fields(json!({ "id": 99, "name": "z" })))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(Value::Object(row), json!({ "id": 1, "name": "z", "note": "n" }));
        assert!(store.update(2, Fields::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_all_does_not_reuse_ids() {
        let store = MemoryStore::new();
        store.create(fields(json!({ "name": "a" }))).await.unwrap();
        assert_eq!(store.delete_all().await.unwrap(), 1);
        assert_eq!(store.delete_all().await.unwrap(), 0);
        assert!(store.is_empty().await);
        let next = store.create(fields(json!({ "name": "b" }))).await.unwrap();
        assert_eq!(next["id"], json!(2));
    }

    #[tokio::test]
    async fn custom_id_field() {
        let store = MemoryStore::with_id_field("item_id");
        let row = store.create(fields(json!({ "name": "a" }))).await.unwrap();
        assert_eq!(row["item_id"], json!(1));
        assert_eq!(store.id_field(), "item_id");
        assert_eq!(store.delete(1).await.unwrap().unwrap()["name"], json!("a"));
        assert!(store.get(1).await.unwrap().is_none());
    }
}
