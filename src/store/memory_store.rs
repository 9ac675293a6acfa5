//! In-memory backend used by the service and router tests.

use super::{ByteStream, ObjectStore, PrefixListing, StoreResult};
use crate::models::{object::ObjectMetadata, range::ByteRange};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{TimeZone, Utc};
use futures::{StreamExt, stream};
use std::{collections::BTreeMap, io};

const CHUNK: usize = 256;

#[derive(Default)]
pub struct MemoryStore {
    objects: BTreeMap<String, (ObjectMetadata, Bytes)>,
    /// When set, every call fails as an unreachable store would.
    pub offline: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    pub fn with(mut self, key: &str, body: impl Into<Bytes>) -> Self {
        self.insert(key, body, None);
        self
    }

    pub fn insert(&mut self, key: &str, body: impl Into<Bytes>, content_type: Option<&str>) {
        let body = body.into();
        let meta = ObjectMetadata {
            key: key.to_string(),
            size_bytes: body.len() as u64,
            content_type: content_type.map(str::to_string),
            etag: Some(format!("{:x}", md5::compute(&body))),
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 45).single(),
        };
        self.objects.insert(key.to_string(), (meta, body));
    }

    fn check_online(&self) -> StoreResult<()> {
        if self.offline {
            return Err(io::Error::new(io::ErrorKind::ConnectionRefused, "store offline").into());
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list_prefix(&self, prefix: &str, max_keys: usize) -> StoreResult<PrefixListing> {
        self.check_online()?;
        let mut objects: Vec<ObjectMetadata> = self
            .objects
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(_, (meta, _))| meta.clone())
            .take(max_keys.saturating_add(1))
            .collect();
        let is_truncated = objects.len() > max_keys;
        objects.truncate(max_keys);
        Ok(PrefixListing {
            objects,
            is_truncated,
        })
    }

    async fn head(&self, key: &str) -> StoreResult<Option<ObjectMetadata>> {
        self.check_online()?;
        Ok(self.objects.get(key).map(|(meta, _)| meta.clone()))
    }

    async fn open(
        &self,
        meta: &ObjectMetadata,
        range: Option<ByteRange>,
    ) -> StoreResult<ByteStream> {
        self.check_online()?;
        let Some((_, body)) = self.objects.get(&meta.key) else {
            return Err(io::Error::from(io::ErrorKind::NotFound).into());
        };
        let window = match range {
            Some(r) => body.slice(r.start as usize..=r.end as usize),
            None => body.clone(),
        };
        let chunks: Vec<io::Result<Bytes>> = (0..window.len())
            .step_by(CHUNK)
            .map(|at| Ok(window.slice(at..window.len().min(at + CHUNK))))
            .collect();
        Ok(stream::iter(chunks).boxed())
    }
}
