use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use shapeflow_domain::ports::StoreGateway;
use shapeflow_domain::value_objects::CollectionPath;
use shapeflow_domain::StoredLog;

/// Document store backed by one JSON file per collection under a data
/// directory: `<data_dir>/<collection>.json` holding a map of record key to
/// stored log.
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn collection_path(&self, collection: CollectionPath) -> PathBuf {
        self.root.join(format!("{}.json", collection.file_stem()))
    }
}

#[async_trait]
impl StoreGateway for JsonFileStore {
    async fn read(
        &self,
        collection: CollectionPath,
    ) -> anyhow::Result<Option<BTreeMap<String, StoredLog>>> {
        let path = self.collection_path(collection);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).await?;
        let records: BTreeMap<String, StoredLog> = serde_json::from_str(&content)?;
        Ok(Some(records))
    }
}
