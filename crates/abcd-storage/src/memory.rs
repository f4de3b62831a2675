//! In-memory blob store for tests and local runs.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::error::{StorageError, StorageResult};
use crate::store::{BlobStore, ObjectInfo, PutPrecondition};

/// Blob store over a mutex-guarded map.
///
/// Preconditions are checked and applied under one lock acquisition, so
/// concurrent `IfNotExists` writers observe the same winner the real store
/// would pick.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object, bypassing preconditions. Test setup helper.
    pub fn insert(&self, key: impl Into<String>, data: Vec<u8>) {
        self.objects.lock().unwrap().insert(key.into(), data);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn list(&self, prefix: &str) -> StorageResult<Vec<ObjectInfo>> {
        let objects = self.objects.lock().unwrap();
        Ok(objects
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| ObjectInfo {
                key: k.clone(),
                size: v.len() as u64,
            })
            .collect())
    }

    async fn head(&self, key: &str) -> StorageResult<Option<ObjectInfo>> {
        let objects = self.objects.lock().unwrap();
        Ok(objects.get(key).map(|v| ObjectInfo {
            key: key.to_string(),
            size: v.len() as u64,
        }))
    }

    async fn get_bytes(&self, key: &str) -> StorageResult<Vec<u8>> {
        let objects = self.objects.lock().unwrap();
        objects
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::not_found(key))
    }

    async fn put_bytes(
        &self,
        key: &str,
        data: Vec<u8>,
        precondition: PutPrecondition,
    ) -> StorageResult<()> {
        let mut objects = self.objects.lock().unwrap();
        if precondition == PutPrecondition::IfNotExists && objects.contains_key(key) {
            return Err(StorageError::precondition_failed(key));
        }
        objects.insert(key.to_string(), data);
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("memory://{}", key)
    }

    async fn signed_url(&self, key: &str, ttl: Duration) -> StorageResult<String> {
        Ok(format!("memory://{}?ttl={}", key, ttl.as_secs()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_put_get_head_list() {
        let store = MemoryBlobStore::new();
        store
            .put_bytes("acme/videos/a.mp4", b"aaa".to_vec(), PutPrecondition::None)
            .await
            .unwrap();
        store
            .put_bytes("acme/videos/b.mp4", b"bb".to_vec(), PutPrecondition::None)
            .await
            .unwrap();

        assert_eq!(store.get_bytes("acme/videos/a.mp4").await.unwrap(), b"aaa");
        assert!(matches!(
            store.get_bytes("missing").await,
            Err(StorageError::NotFound(_))
        ));

        let head = store.head("acme/videos/b.mp4").await.unwrap().unwrap();
        assert_eq!(head.size, 2);
        assert!(store.head("missing").await.unwrap().is_none());

        let listed = store.list("acme/videos/").await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].key, "acme/videos/a.mp4");

        assert_eq!(store.public_url("acme/videos/a.mp4"), "memory://acme/videos/a.mp4");
    }

    #[tokio::test]
    async fn test_if_not_exists_precondition() {
        let store = MemoryBlobStore::new();
        store
            .put_bytes("k", b"first".to_vec(), PutPrecondition::IfNotExists)
            .await
            .unwrap();

        let second = store
            .put_bytes("k", b"second".to_vec(), PutPrecondition::IfNotExists)
            .await;
        assert!(matches!(second, Err(StorageError::PreconditionFailed(_))));

        // Loser did not clobber the winner
        assert_eq!(store.get_bytes("k").await.unwrap(), b"first");
    }

    #[tokio::test]
    async fn test_concurrent_conditional_writers_pick_one_winner() {
        let store = Arc::new(MemoryBlobStore::new());
        let mut handles = Vec::new();
        for i in 0..8u8 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .put_bytes("race", vec![i], PutPrecondition::IfNotExists)
                    .await
                    .is_ok()
            }));
        }

        let mut winners = 0;
        for h in handles {
            if h.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
        assert_eq!(store.get_bytes("race").await.unwrap().len(), 1);
    }
}
