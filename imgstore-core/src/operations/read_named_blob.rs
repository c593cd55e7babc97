use crate::{ContentId, NameIndex, ObjectStore, Result, detect_content_type};
use bytes::Bytes;
use std::sync::Arc;

#[derive(Clone)]
pub struct ReadNamedBlobOperation {
    object_store: Arc<ObjectStore>,
    name_index: Arc<NameIndex>,
}

#[derive(Debug, Clone)]
pub struct ReadNamedBlobOperationRequest {
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct ReadNamedBlobOperationResult {
    pub name: String,
    pub id: ContentId,
    pub body: Bytes,
    pub content_type: &'static str,
}

#[derive(Debug, Clone)]
pub enum ReadNamedBlobOperationOutcome {
    Found(ReadNamedBlobOperationResult),
    NameNotFound,
    /// The mapping exists but its blob was deleted by id
    DataNotFound(ContentId),
}

impl ReadNamedBlobOperation {
    pub fn new(object_store: Arc<ObjectStore>, name_index: Arc<NameIndex>) -> Self {
        Self {
            object_store,
            name_index,
        }
    }

    pub async fn run(
        &self,
        request: ReadNamedBlobOperationRequest,
    ) -> Result<ReadNamedBlobOperationOutcome> {
        let ReadNamedBlobOperationRequest { name } = request;

        let Some(id) = self.name_index.get_mapping(&name).await? else {
            return Ok(ReadNamedBlobOperationOutcome::NameNotFound);
        };

        let Some(body) = self.object_store.get(&id).await? else {
            tracing::warn!("Name {} points at missing blob {}", name, id);
            return Ok(ReadNamedBlobOperationOutcome::DataNotFound(id));
        };

        Ok(ReadNamedBlobOperationOutcome::Found(ReadNamedBlobOperationResult {
            content_type: detect_content_type(&body),
            name,
            id,
            body,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ShardLayout;

    #[tokio::test]
    async fn test_resolution_outcomes() {
        let temp_dir = tempfile::tempdir().unwrap();
        let layout = ShardLayout::default();
        let store = Arc::new(ObjectStore::new(temp_dir.path().to_path_buf(), layout).unwrap());
        let index = Arc::new(NameIndex::new(temp_dir.path(), layout).unwrap());
        let operation = ReadNamedBlobOperation::new(store.clone(), index.clone());
        let read = |name: &str| {
            operation.run(ReadNamedBlobOperationRequest {
                name: name.to_string(),
            })
        };

        assert!(matches!(
            read("avatar").await.unwrap(),
            ReadNamedBlobOperationOutcome::NameNotFound
        ));

        let body = Bytes::from_static(b"\x89PNG\r\n\x1a\nrest");
        let id = ContentId::of(&body);
        store.put(&id, body.clone()).await.unwrap();
        index.set_mapping("avatar", &id).await.unwrap();

        let ReadNamedBlobOperationOutcome::Found(found) = read("avatar").await.unwrap() else {
            panic!("expected named blob to resolve");
        };
        assert_eq!(found.id, id);
        assert_eq!(found.body, body);
        assert_eq!(found.content_type, "image/png");

        store.delete(&id).await.unwrap();
        let dangling = read("avatar").await.unwrap();
        assert!(matches!(
            dangling,
            ReadNamedBlobOperationOutcome::DataNotFound(ref missing) if *missing == id
        ));

        // the dangling mapping is reported, not repaired
        assert!(index.mapping_exists("avatar").await.unwrap());
    }
}
