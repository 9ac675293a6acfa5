//! Represents a logical bucket — the namespace every browsed key lives in.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// A bucket row from the catalog.
///
/// The browser only ever reads one bucket, chosen by configuration and
/// resolved once at startup.
#[derive(Clone, FromRow, Debug)]
pub struct Bucket {
    /// Unique identifier used as the foreign key of object rows.
    pub id: Uuid,

    /// Globally unique bucket name.
    pub name: String,

    /// ID of the user or account that owns this bucket.
    pub owner_id: Uuid,

    /// Region where the bucket is hosted (e.g. "us-west-2").
    pub region: String,

    /// When this bucket was created.
    pub created_at: DateTime<Utc>,

    pub versioning_enabled: bool,
}
