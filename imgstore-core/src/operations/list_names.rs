use crate::{NameIndex, Result};
use std::sync::Arc;

#[derive(Clone)]
pub struct ListNamesOperation {
    name_index: Arc<NameIndex>,
}

#[derive(Debug, Clone)]
pub struct ListNamesOperationResult {
    pub names: Vec<String>,
}

impl ListNamesOperation {
    pub fn new(name_index: Arc<NameIndex>) -> Self {
        Self { name_index }
    }

    pub async fn run(&self) -> Result<ListNamesOperationResult> {
        let names = self.name_index.list_names().await?;
        Ok(ListNamesOperationResult { names })
    }
}
