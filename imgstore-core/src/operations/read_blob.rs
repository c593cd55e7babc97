use crate::{ContentId, ObjectStore, Result, detect_content_type};
use bytes::Bytes;
use std::sync::Arc;

#[derive(Clone)]
pub struct ReadBlobOperation {
    object_store: Arc<ObjectStore>,
}

#[derive(Debug, Clone)]
pub struct ReadBlobOperationRequest {
    pub id: String,
}

#[derive(Debug, Clone)]
pub struct ReadBlobOperationResult {
    pub id: ContentId,
    pub body: Bytes,
    pub content_type: &'static str,
}

#[derive(Debug, Clone)]
pub enum ReadBlobOperationOutcome {
    Found(ReadBlobOperationResult),
    NotFound,
}

impl ReadBlobOperation {
    pub fn new(object_store: Arc<ObjectStore>) -> Self {
        Self { object_store }
    }

    pub async fn run(&self, request: ReadBlobOperationRequest) -> Result<ReadBlobOperationOutcome> {
        let id = ContentId::parse(&request.id)?;

        let Some(body) = self.object_store.get(&id).await? else {
            return Ok(ReadBlobOperationOutcome::NotFound);
        };

        Ok(ReadBlobOperationOutcome::Found(ReadBlobOperationResult {
            content_type: detect_content_type(&body),
            id,
            body,
        }))
    }
}
