//! The object store the browser reads from.
//!
//! Keys are flat; every backend enumerates by literal prefix and serves
//! metadata plus a byte stream per key.

pub mod catalog_store;
#[cfg(test)]
pub mod memory_store;

use crate::models::{object::ObjectMetadata, range::ByteRange};
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use std::io;
use thiserror::Error;

/// Object bytes as they come off the store, chunk by chunk.
pub type ByteStream = BoxStream<'static, io::Result<Bytes>>;

/// Result of one bounded enumeration.
#[derive(Debug)]
pub struct PrefixListing {
    /// Objects whose key starts with the prefix, in key order.
    pub objects: Vec<ObjectMetadata>,
    /// More objects matched than `max_keys`.
    pub is_truncated: bool,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("bucket `{0}` not found")]
    BucketNotFound(String),
    #[error("invalid object key `{0}`")]
    InvalidKey(String),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Enumerate objects whose key literally starts with `prefix`, returning
    /// at most `max_keys` of them.
    async fn list_prefix(&self, prefix: &str, max_keys: usize) -> StoreResult<PrefixListing>;

    /// Metadata for `key`, or `None` when no such object exists.
    async fn head(&self, key: &str) -> StoreResult<Option<ObjectMetadata>>;

    /// Stream the object's bytes, or only `range` when given.
    ///
    /// The stream reads lazily; dropping it releases the underlying handle.
    async fn open(&self, meta: &ObjectMetadata, range: Option<ByteRange>)
    -> StoreResult<ByteStream>;
}
