// Port Traits (Interfaces)
// Define what the transform core needs from the outside world

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::entities::StoredLog;
use crate::value_objects::CollectionPath;

/// External document store, keyed by collection path. `BTreeMap` keeps the
/// iteration order stable, which the "first key wins" ingestion policy
/// depends on.
#[async_trait]
pub trait StoreGateway: Send + Sync {
    /// Reads a whole collection; `None` when the collection does not exist.
    async fn read(
        &self,
        collection: CollectionPath,
    ) -> anyhow::Result<Option<BTreeMap<String, StoredLog>>>;
}

/// Maps a free-text action description to a coarse action label. The
/// vocabulary is externally defined.
pub trait ActionCategorizer: Send + Sync {
    fn categorize(&self, description: &str) -> String;
}
