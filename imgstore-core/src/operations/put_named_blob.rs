use super::put_blob::store_if_absent;
use crate::{ContentId, ImgStoreError, NameIndex, ObjectStore, Result, validate_name};
use bytes::Bytes;
use std::sync::Arc;

#[derive(Clone)]
pub struct PutNamedBlobOperation {
    object_store: Arc<ObjectStore>,
    name_index: Arc<NameIndex>,
}

#[derive(Debug, Clone)]
pub struct PutNamedBlobOperationRequest {
    pub name: String,
    pub body: Bytes,
}

#[derive(Debug, Clone)]
pub struct PutNamedBlobOperationResult {
    pub name: String,
    pub id: ContentId,
    pub size: u64,
    /// false when the blob was already stored under `id`
    pub blob_stored: bool,
}

#[derive(Debug, Clone)]
pub enum PutNamedBlobOperationOutcome {
    Created(PutNamedBlobOperationResult),
    Updated {
        result: PutNamedBlobOperationResult,
        /// `None` only when the previous mapping file was unreadable
        previous_id: Option<ContentId>,
    },
}

impl PutNamedBlobOperation {
    pub fn new(object_store: Arc<ObjectStore>, name_index: Arc<NameIndex>) -> Self {
        Self {
            object_store,
            name_index,
        }
    }

    /// Store the blob if needed, then unconditionally point `name` at it.
    ///
    /// A failure while writing the mapping leaves the freshly stored blob in
    /// place; it stays reachable by id.
    pub async fn run(
        &self,
        request: PutNamedBlobOperationRequest,
    ) -> Result<PutNamedBlobOperationOutcome> {
        let PutNamedBlobOperationRequest { name, body } = request;

        validate_name(&name)?;
        if body.is_empty() {
            return Err(ImgStoreError::InvalidRequest("empty payload".to_string()));
        }

        let id = ContentId::of(&body);
        let size = body.len() as u64;

        let previous = match self.name_index.get_mapping(&name).await {
            Ok(previous) => previous.map(Some),
            Err(ImgStoreError::CorruptMapping { .. }) => {
                tracing::warn!("Overwriting unreadable mapping for name {}", name);
                Some(None)
            }
            Err(error) => return Err(error),
        };

        let blob_stored = store_if_absent(&self.object_store, &id, body).await?;
        self.name_index.set_mapping(&name, &id).await?;

        let result = PutNamedBlobOperationResult {
            name,
            id,
            size,
            blob_stored,
        };

        match previous {
            None => {
                tracing::info!("Created name {} -> {}", result.name, result.id);
                Ok(PutNamedBlobOperationOutcome::Created(result))
            }
            Some(previous_id) => {
                tracing::info!(
                    "Updated name {} -> {} (previous {:?})",
                    result.name,
                    result.id,
                    previous_id.as_ref().map(ContentId::as_str)
                );
                Ok(PutNamedBlobOperationOutcome::Updated {
                    result,
                    previous_id,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NAMES_DIR, ShardLayout, hash64, shard_path};

    fn setup(dir: &std::path::Path) -> (PutNamedBlobOperation, Arc<ObjectStore>, Arc<NameIndex>) {
        let layout = ShardLayout::default();
        let store = Arc::new(ObjectStore::new(dir.to_path_buf(), layout).unwrap());
        let index = Arc::new(NameIndex::new(dir, layout).unwrap());
        (
            PutNamedBlobOperation::new(store.clone(), index.clone()),
            store,
            index,
        )
    }

    fn request(name: &str, body: &'static [u8]) -> PutNamedBlobOperationRequest {
        PutNamedBlobOperationRequest {
            name: name.to_string(),
            body: Bytes::from_static(body),
        }
    }

    #[tokio::test]
    async fn test_create_then_repoint() {
        let temp_dir = tempfile::tempdir().unwrap();
        let (operation, store, index) = setup(temp_dir.path());

        let first = operation.run(request("a", b"B1")).await.unwrap();
        let PutNamedBlobOperationOutcome::Created(created) = first else {
            panic!("expected created outcome");
        };
        assert_eq!(created.id, ContentId::of(b"B1"));
        assert!(created.blob_stored);

        let second = operation.run(request("a", b"B2")).await.unwrap();
        let PutNamedBlobOperationOutcome::Updated {
            result,
            previous_id,
        } = second
        else {
            panic!("expected updated outcome");
        };
        assert_eq!(previous_id, Some(ContentId::of(b"B1")));
        assert_eq!(result.id, ContentId::of(b"B2"));

        assert_eq!(index.get_mapping("a").await.unwrap(), Some(ContentId::of(b"B2")));
        assert_eq!(
            store.get(&ContentId::of(b"B1")).await.unwrap(),
            Some(Bytes::from_static(b"B1"))
        );
    }

    #[tokio::test]
    async fn test_reuses_existing_blob() {
        let temp_dir = tempfile::tempdir().unwrap();
        let (operation, _, _) = setup(temp_dir.path());

        operation.run(request("first", b"same")).await.unwrap();
        let outcome = operation.run(request("second", b"same")).await.unwrap();
        let PutNamedBlobOperationOutcome::Created(result) = outcome else {
            panic!("expected created outcome");
        };
        assert!(!result.blob_stored);
    }

    #[tokio::test]
    async fn test_same_content_update_reports_previous() {
        let temp_dir = tempfile::tempdir().unwrap();
        let (operation, _, _) = setup(temp_dir.path());

        operation.run(request("n", b"same")).await.unwrap();
        let outcome = operation.run(request("n", b"same")).await.unwrap();
        let PutNamedBlobOperationOutcome::Updated { previous_id, .. } = outcome else {
            panic!("expected updated outcome");
        };
        assert_eq!(previous_id, Some(ContentId::of(b"same")));
    }

    #[tokio::test]
    async fn test_invalid_input_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let (operation, _, index) = setup(temp_dir.path());

        assert!(matches!(
            operation.run(request("", b"data")).await,
            Err(ImgStoreError::InvalidRequest(_))
        ));
        assert!(matches!(
            operation.run(request("empty", b"")).await,
            Err(ImgStoreError::InvalidRequest(_))
        ));
        assert!(index.list_names().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_previous_mapping_is_replaced() {
        let temp_dir = tempfile::tempdir().unwrap();
        let (operation, _, index) = setup(temp_dir.path());

        let path = index.mapping_path("broken");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"???").unwrap();

        let outcome = operation.run(request("broken", b"fresh")).await.unwrap();
        assert!(matches!(
            outcome,
            PutNamedBlobOperationOutcome::Updated { previous_id: None, .. }
        ));
        assert_eq!(
            index.get_mapping("broken").await.unwrap(),
            Some(ContentId::of(b"fresh"))
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_mapping_failure_keeps_blob() {
        let temp_dir = tempfile::tempdir().unwrap();
        let (operation, store, index) = setup(temp_dir.path());

        // a dangling link reads as "no mapping" but cannot be created through
        let segments = shard_path(hash64(b"stuck"), 3, 2);
        std::os::unix::fs::symlink(
            temp_dir.path().join("missing"),
            temp_dir.path().join(NAMES_DIR).join(&segments[0]),
        )
        .unwrap();

        let result = operation.run(request("stuck", b"orphan")).await;
        assert!(matches!(result, Err(ImgStoreError::Io(_))));

        assert_eq!(
            store.get(&ContentId::of(b"orphan")).await.unwrap(),
            Some(Bytes::from_static(b"orphan"))
        );
        assert_eq!(index.get_mapping("stuck").await.unwrap(), None);
    }
}
