use crate::error::Result;
use crate::models::HighlightPayload;
use crate::services::BlobStore;

const ARCHIVE_PREFIX: &str = "highlights";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Object key for an archive. Fixed per name, so reruns overwrite.
pub fn archive_key(name: &str) -> String {
    format!("{}/{}.json", ARCHIVE_PREFIX, name)
}

/// Ensures the container exists, then writes the whole payload under
/// `highlights/<name>.json`. Returns the key written.
pub async fn archive_highlights(
    store: &dyn BlobStore,
    payload: &HighlightPayload,
    name: &str,
) -> Result<String> {
    if store.container_exists().await? {
        tracing::info!("Bucket {} exists", store.container());
    } else {
        tracing::info!("Bucket {} does not exist, creating", store.container());
        store.create_container().await?;
        tracing::info!("Bucket {} created", store.container());
    }

    let key = archive_key(name);
    let body = payload.to_json_bytes()?;
    store.put_object(&key, body, JSON_CONTENT_TYPE).await?;

    tracing::info!("Highlights saved to {}/{}", store.container(), key);
    Ok(key)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use crate::error::AppError;

    /// In-memory blob store that records every call made against it.
    #[derive(Default)]
    pub(crate) struct RecordingStore {
        pub exists: Mutex<bool>,
        pub create_calls: Mutex<usize>,
        pub objects: Mutex<HashMap<String, (Vec<u8>, String)>>,
        pub fail_writes: bool,
    }

    #[async_trait]
    impl BlobStore for RecordingStore {
        fn container(&self) -> &str {
            "test-bucket"
        }

        async fn container_exists(&self) -> Result<bool> {
            Ok(*self.exists.lock().unwrap())
        }

        async fn create_container(&self) -> Result<()> {
            *self.create_calls.lock().unwrap() += 1;
            *self.exists.lock().unwrap() = true;
            Ok(())
        }

        async fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<()> {
            if self.fail_writes {
                return Err(AppError::BlobStore("write refused".to_string()));
            }
            self.objects
                .lock()
                .unwrap()
                .insert(key.to_string(), (body, content_type.to_string()));
            Ok(())
        }
    }

    #[test]
    fn key_is_derived_from_name() {
        assert_eq!(archive_key("basketball_highlights"), "highlights/basketball_highlights.json");
    }

    #[tokio::test]
    async fn creates_missing_container_once() {
        let store = RecordingStore::default();
        let payload = HighlightPayload::new(json!({"data": []}));

        archive_highlights(&store, &payload, "run").await.unwrap();
        archive_highlights(&store, &payload, "run").await.unwrap();

        assert_eq!(*store.create_calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn existing_container_is_not_recreated() {
        let store = RecordingStore {
            exists: Mutex::new(true),
            ..Default::default()
        };
        let payload = HighlightPayload::new(json!({"data": []}));

        archive_highlights(&store, &payload, "run").await.unwrap();

        assert_eq!(*store.create_calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn writes_json_and_overwrites_same_name() {
        let store = RecordingStore::default();

        let first = HighlightPayload::new(json!({"data": [{"id": 1}]}));
        let second = HighlightPayload::new(json!({"data": [{"id": 2}]}));
        archive_highlights(&store, &first, "basketball_highlights").await.unwrap();
        let key = archive_highlights(&store, &second, "basketball_highlights")
            .await
            .unwrap();

        let objects = store.objects.lock().unwrap();
        assert_eq!(objects.len(), 1);
        let (body, content_type) = &objects[&key];
        assert_eq!(content_type, "application/json");
        let stored: serde_json::Value = serde_json::from_slice(body).unwrap();
        assert_eq!(stored, json!({"data": [{"id": 2}]}));
    }

    #[tokio::test]
    async fn write_failure_is_returned() {
        let store = RecordingStore {
            fail_writes: true,
            ..Default::default()
        };
        let payload = HighlightPayload::new(json!({"data": []}));

        let err = archive_highlights(&store, &payload, "run").await.unwrap_err();
        assert!(matches!(err, AppError::BlobStore(_)));
    }
}
