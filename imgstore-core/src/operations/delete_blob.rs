use crate::{ContentId, ObjectStore, RemoveOutcome, Result};
use std::sync::Arc;

#[derive(Clone)]
pub struct DeleteBlobOperation {
    object_store: Arc<ObjectStore>,
}

#[derive(Debug, Clone)]
pub struct DeleteBlobOperationRequest {
    pub id: String,
}

#[derive(Debug, Clone)]
pub enum DeleteBlobOperationOutcome {
    Deleted(ContentId),
    NotFound,
}

impl DeleteBlobOperation {
    pub fn new(object_store: Arc<ObjectStore>) -> Self {
        Self { object_store }
    }

    /// Remove a blob by id. Name mappings pointing at it are left in place.
    pub async fn run(
        &self,
        request: DeleteBlobOperationRequest,
    ) -> Result<DeleteBlobOperationOutcome> {
        let id = ContentId::parse(&request.id)?;

        match self.object_store.delete(&id).await? {
            RemoveOutcome::Removed => {
                tracing::info!("Deleted blob {}", id);
                Ok(DeleteBlobOperationOutcome::Deleted(id))
            }
            RemoveOutcome::NotFound => Ok(DeleteBlobOperationOutcome::NotFound),
        }
    }
}
