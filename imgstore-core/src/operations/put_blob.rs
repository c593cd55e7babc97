use crate::{ContentId, ImgStoreError, ObjectStore, Result};
use bytes::Bytes;
use std::sync::Arc;

#[derive(Clone)]
pub struct PutBlobOperation {
    object_store: Arc<ObjectStore>,
}

#[derive(Debug, Clone)]
pub struct PutBlobOperationRequest {
    pub body: Bytes,
}

#[derive(Debug, Clone)]
pub struct PutBlobOperationResult {
    pub id: ContentId,
    pub size: u64,
}

#[derive(Debug, Clone)]
pub enum PutBlobOperationOutcome {
    Stored(PutBlobOperationResult),
    AlreadyExists(PutBlobOperationResult),
}

impl PutBlobOperation {
    pub fn new(object_store: Arc<ObjectStore>) -> Self {
        Self { object_store }
    }

    pub async fn run(&self, request: PutBlobOperationRequest) -> Result<PutBlobOperationOutcome> {
        let PutBlobOperationRequest { body } = request;

        if body.is_empty() {
            return Err(ImgStoreError::InvalidRequest("empty payload".to_string()));
        }

        let id = ContentId::of(&body);
        let result = PutBlobOperationResult {
            id: id.clone(),
            size: body.len() as u64,
        };

        if store_if_absent(&self.object_store, &id, body).await? {
            tracing::info!("Stored blob {} ({} bytes)", id, result.size);
            Ok(PutBlobOperationOutcome::Stored(result))
        } else {
            tracing::info!("Blob {} already present", id);
            Ok(PutBlobOperationOutcome::AlreadyExists(result))
        }
    }
}

/// Write the blob unless it is already stored. Returns whether a write happened.
///
/// Two uploads of the same bytes may both pass the existence check; both then
/// write identical content to the same path.
pub(crate) async fn store_if_absent(
    object_store: &ObjectStore,
    id: &ContentId,
    body: Bytes,
) -> Result<bool> {
    if object_store.exists(id).await? {
        return Ok(false);
    }

    object_store.put(id, body).await?;
    Ok(true)
}
