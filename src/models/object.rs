//! Represents an object (blob) as stored in the catalog and as seen by the
//! browser.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// A single object row in the catalog.
///
/// The row carries metadata only; payload bytes live on disk.
#[derive(Clone, FromRow, Debug)]
pub struct StoredObject {
    pub id: Uuid,

    /// Foreign key linking to the parent bucket.
    pub bucket_id: Uuid,

    /// Flat object key, conventionally `/`-delimited.
    pub key: String,

    /// Content type (MIME type).
    pub content_type: Option<String>,

    /// Size in bytes.
    pub size_bytes: i64,

    /// MD5 checksum of the payload.
    pub etag: Option<String>,

    /// Timestamp the current payload was written.
    pub last_modified: DateTime<Utc>,

    /// Whether the object is marked as deleted (soft delete / delete marker).
    pub is_deleted: bool,
}

/// Metadata for one object, as returned by any [`ObjectStore`] backend.
///
/// Lives for one request; nothing caches it.
///
/// [`ObjectStore`]: crate::store::ObjectStore
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectMetadata {
    pub key: String,
    pub size_bytes: u64,
    pub content_type: Option<String>,
    pub etag: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<StoredObject> for ObjectMetadata {
    fn from(row: StoredObject) -> Self {
        Self {
            key: row.key,
            // negative sizes never come out of the writer; clamp rather than wrap
            size_bytes: row.size_bytes.max(0) as u64,
            content_type: row.content_type,
            etag: row.etag,
            created_at: Some(row.last_modified),
        }
    }
}
