mod dynamodb;
mod local_blob;
mod s3;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::HighlightRecord;

pub use dynamodb::DynamoTable;
pub use local_blob::LocalBlobStore;
pub use s3::{location_constraint, S3BlobStore};

/// Object storage addressed by container and key.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Name of the container this store writes into.
    fn container(&self) -> &str;

    async fn container_exists(&self) -> Result<bool>;

    async fn create_container(&self) -> Result<()>;

    /// Writes `body` at `key`, replacing any existing object.
    async fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<()>;
}

/// Key-value table used for upsert-style writes.
#[async_trait]
pub trait ItemTable: Send + Sync {
    /// Inserts the record under `key`, replacing any existing item.
    async fn put_item(&self, key: &str, item: &HighlightRecord) -> Result<()>;
}
