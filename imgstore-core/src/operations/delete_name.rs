use crate::{NameIndex, RemoveOutcome, Result};
use std::sync::Arc;

#[derive(Clone)]
pub struct DeleteNameOperation {
    name_index: Arc<NameIndex>,
}

#[derive(Debug, Clone)]
pub struct DeleteNameOperationRequest {
    pub name: String,
}

#[derive(Debug, Clone)]
pub enum DeleteNameOperationOutcome {
    Deleted(String),
    NameNotFound,
}

impl DeleteNameOperation {
    pub fn new(name_index: Arc<NameIndex>) -> Self {
        Self { name_index }
    }

    /// Remove the mapping only; the blob it pointed at is never touched
    pub async fn run(
        &self,
        request: DeleteNameOperationRequest,
    ) -> Result<DeleteNameOperationOutcome> {
        let DeleteNameOperationRequest { name } = request;

        match self.name_index.delete_mapping(&name).await? {
            RemoveOutcome::Removed => {
                tracing::info!("Deleted name {}", name);
                Ok(DeleteNameOperationOutcome::Deleted(name))
            }
            RemoveOutcome::NotFound => Ok(DeleteNameOperationOutcome::NameNotFound),
        }
    }
}
