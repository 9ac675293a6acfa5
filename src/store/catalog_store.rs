//! CatalogStore — read-only view of the bucket layout written by the
//! object-store service: object metadata in SQLite, payloads on local disk
//! sharded beneath `base_path/{bucket}/{shard}/{shard}/{key}`.

use super::{ByteStream, ObjectStore, PrefixListing, StoreError, StoreResult};
use crate::models::{
    bucket::Bucket,
    object::{ObjectMetadata, StoredObject},
    range::ByteRange,
};
use async_trait::async_trait;
use futures::StreamExt;
use sqlx::SqlitePool;
use std::{
    io::{self, SeekFrom},
    path::PathBuf,
    sync::Arc,
};
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncSeekExt},
};
use tokio_util::io::ReaderStream;
use tracing::debug;

const OBJECT_COLUMNS: &str =
    "id, bucket_id, key, content_type, size_bytes, etag, last_modified, is_deleted";

/// Payload read size; one chunk is the most a stalled client can hold us to.
const READ_CHUNK: usize = 64 * 1024;

#[derive(Clone)]
pub struct CatalogStore {
    /// Shared SQLite connection pool used for metadata lookups.
    pub db: Arc<SqlitePool>,

    /// Base directory on disk where object payloads are stored.
    pub base_path: PathBuf,

    /// The single bucket this store exposes, resolved once.
    pub bucket: Bucket,
}

impl CatalogStore {
    /// Resolve `bucket_name` in the catalog and build a store over it.
    ///
    /// Fails with `BucketNotFound` when the catalog has no such bucket.
    pub async fn connect(
        db: Arc<SqlitePool>,
        base_path: impl Into<PathBuf>,
        bucket_name: &str,
    ) -> StoreResult<Self> {
        let bucket = sqlx::query_as::<_, Bucket>(
            "SELECT id, name, owner_id, region, created_at, versioning_enabled
             FROM buckets WHERE name = ?",
        )
        .bind(bucket_name)
        .fetch_optional(&*db)
        .await?
        .ok_or_else(|| StoreError::BucketNotFound(bucket_name.to_string()))?;

        Ok(Self {
            db,
            base_path: base_path.into(),
            bucket,
        })
    }

    /// Reject keys that could escape the bucket directory once joined onto
    /// `base_path`.
    fn ensure_key_safe(key: &str) -> StoreResult<()> {
        let unsafe_key = key.is_empty()
            || key.starts_with('/')
            || key.split('/').any(|segment| segment == "..")
            || key
                .bytes()
                .any(|b| b.is_ascii_control() || b == b'\\' || b == b'\0');
        if unsafe_key {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(())
    }

    /// Two-level shard identifiers: the first two bytes of MD5(bucket/key)
    /// as lowercase hex.
    fn object_shards(bucket_name: &str, key: &str) -> (String, String) {
        let digest = md5::compute(format!("{}/{}", bucket_name, key));
        (format!("{:02x}", digest[0]), format!("{:02x}", digest[1]))
    }

    /// Path of the payload file for `key`. Does not check existence.
    pub fn object_path(&self, key: &str) -> PathBuf {
        let (shard_a, shard_b) = Self::object_shards(&self.bucket.name, key);
        let mut path = self.base_path.clone();
        path.push(&self.bucket.name);
        path.push(shard_a);
        path.push(shard_b);
        path.push(key);
        path
    }
}

#[async_trait]
impl ObjectStore for CatalogStore {
    async fn list_prefix(&self, prefix: &str, max_keys: usize) -> StoreResult<PrefixListing> {
        // fetch one extra row to learn whether the listing was cut short
        let fetch_limit = max_keys.saturating_add(1);

        // substr keeps the match literal and case-sensitive, unlike LIKE
        let query = format!(
            "SELECT {OBJECT_COLUMNS} FROM objects
             WHERE bucket_id = ? AND is_deleted = 0
               AND substr(key, 1, length(?)) = ?
             ORDER BY key ASC LIMIT ?"
        );
        let mut rows: Vec<StoredObject> = sqlx::query_as(&query)
            .bind(self.bucket.id)
            .bind(prefix)
            .bind(prefix)
            .bind(i64::try_from(fetch_limit).unwrap_or(i64::MAX))
            .fetch_all(&*self.db)
            .await?;

        let is_truncated = rows.len() > max_keys;
        rows.truncate(max_keys);
        debug!(prefix, rows = rows.len(), is_truncated, "catalog enumeration");

        Ok(PrefixListing {
            objects: rows.into_iter().map(ObjectMetadata::from).collect(),
            is_truncated,
        })
    }

    async fn head(&self, key: &str) -> StoreResult<Option<ObjectMetadata>> {
        let query = format!(
            "SELECT {OBJECT_COLUMNS} FROM objects
             WHERE key = ? AND bucket_id = ? AND is_deleted = 0"
        );
        let row: Option<StoredObject> = sqlx::query_as(&query)
            .bind(key)
            .bind(self.bucket.id)
            .fetch_optional(&*self.db)
            .await?;
        Ok(row.map(ObjectMetadata::from))
    }

    async fn open(
        &self,
        meta: &ObjectMetadata,
        range: Option<ByteRange>,
    ) -> StoreResult<ByteStream> {
        Self::ensure_key_safe(&meta.key)?;
        let file_path = self.object_path(&meta.key);
        let mut file = File::open(&file_path).await.map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                debug!("payload {} missing for cataloged key", file_path.display());
            }
            StoreError::Io(err)
        })?;

        let stream = match range {
            None => ReaderStream::with_capacity(file, READ_CHUNK).boxed(),
            Some(window) => {
                file.seek(SeekFrom::Start(window.start)).await?;
                ReaderStream::with_capacity(file.take(window.len()), READ_CHUNK).boxed()
            }
        };
        Ok(stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use futures::TryStreamExt;
    use sqlx::sqlite::SqlitePoolOptions;
    use uuid::Uuid;

    const SCHEMA: &str = include_str!("../../migrations/0001_init.sql");

    /// An in-memory catalog holding one bucket, plus a temp payload dir.
    async fn fixture(bucket: &str) -> (CatalogStore, tempfile::TempDir) {
        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        for stmt in SCHEMA.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            sqlx::query(stmt).execute(&db).await.unwrap();
        }
        sqlx::query(
            "INSERT INTO buckets (id, name, owner_id, region, created_at, versioning_enabled)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(Uuid::new_v4())
        .bind(bucket)
        .bind(Uuid::new_v4())
        .bind("local")
        .bind(Utc::now())
        .bind(false)
        .execute(&db)
        .await
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let store = CatalogStore::connect(Arc::new(db), dir.path(), bucket)
            .await
            .unwrap();
        (store, dir)
    }

    async fn put(store: &CatalogStore, key: &str, body: &[u8], deleted: bool) {
        sqlx::query(
            "INSERT INTO objects (
                id, bucket_id, key, filename, content_type, size_bytes,
                etag, storage_class, last_modified, version_id, is_deleted
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(Uuid::new_v4())
        .bind(store.bucket.id)
        .bind(key)
        .bind(key.rsplit('/').next().unwrap_or(key))
        .bind(Some("text/plain"))
        .bind(body.len() as i64)
        .bind(format!("{:x}", md5::compute(body)))
        .bind("STANDARD")
        .bind(Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 45).unwrap())
        .bind::<Option<String>>(None)
        .bind(deleted)
        .execute(&*store.db)
        .await
        .unwrap();

        if !key.ends_with('/') {
            let path = store.object_path(key);
            tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
            tokio::fs::write(&path, body).await.unwrap();
        }
    }

    async fn read_all(stream: ByteStream) -> Vec<u8> {
        let chunks: Vec<_> = stream.try_collect().await.unwrap();
        chunks.concat()
    }

    #[tokio::test]
    async fn missing_bucket_is_an_error() {
        let (store, _dir) = fixture("tiles").await;
        let err = CatalogStore::connect(store.db.clone(), "/tmp", "nope")
            .await
            .err()
            .unwrap();
        assert!(matches!(err, StoreError::BucketNotFound(name) if name == "nope"));
    }

    #[tokio::test]
    async fn list_prefix_is_literal_and_ordered() {
        let (store, _dir) = fixture("tiles").await;
        put(&store, "download/b.txt", b"b", false).await;
        put(&store, "download/a/", b"", false).await;
        put(&store, "Download/upper.txt", b"x", false).await;
        put(&store, "download/gone.txt", b"x", true).await;
        put(&store, "other/c.txt", b"c", false).await;

        let listing = store.list_prefix("download/", 100).await.unwrap();
        let keys: Vec<_> = listing.objects.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["download/a/", "download/b.txt"]);
        assert!(!listing.is_truncated);

        let all = store.list_prefix("", 100).await.unwrap();
        assert_eq!(all.objects.len(), 4);
    }

    #[tokio::test]
    async fn list_prefix_reports_truncation() {
        let (store, _dir) = fixture("tiles").await;
        for i in 0..5 {
            put(&store, &format!("k/{i}"), b"x", false).await;
        }
        let listing = store.list_prefix("k/", 3).await.unwrap();
        assert_eq!(listing.objects.len(), 3);
        assert!(listing.is_truncated);

        let exact = store.list_prefix("k/", 5).await.unwrap();
        assert!(!exact.is_truncated);
    }

    #[tokio::test]
    async fn head_maps_catalog_row() {
        let (store, _dir) = fixture("tiles").await;
        put(&store, "download/a.txt", b"hello", false).await;
        put(&store, "download/deleted.txt", b"bye", true).await;

        let meta = store.head("download/a.txt").await.unwrap().unwrap();
        assert_eq!(meta.size_bytes, 5);
        assert_eq!(meta.content_type.as_deref(), Some("text/plain"));
        assert_eq!(meta.etag, Some(format!("{:x}", md5::compute(b"hello"))));
        assert!(meta.created_at.is_some());

        assert!(store.head("download/deleted.txt").await.unwrap().is_none());
        assert!(store.head("download/none.txt").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn open_streams_full_and_windowed() {
        let (store, _dir) = fixture("tiles").await;
        let body: Vec<u8> = (0..1000u32).map(|i| (i % 251) as u8).collect();
        put(&store, "download/blob.bin", &body, false).await;
        let meta = store.head("download/blob.bin").await.unwrap().unwrap();

        let full = read_all(store.open(&meta, None).await.unwrap()).await;
        assert_eq!(full, body);

        let window = ByteRange { start: 100, end: 199 };
        let part = read_all(store.open(&meta, Some(window)).await.unwrap()).await;
        assert_eq!(part, &body[100..=199]);
    }

    #[tokio::test]
    async fn open_rejects_traversal_keys() {
        let (store, _dir) = fixture("tiles").await;
        let meta = ObjectMetadata {
            key: "download/../../etc/passwd".into(),
            size_bytes: 1,
            content_type: None,
            etag: None,
            created_at: None,
        };
        let err = store.open(&meta, None).await.err().unwrap();
        assert!(matches!(err, StoreError::InvalidKey(_)));
    }
}
