//! BrowseService — the shared state behind every request: the object store,
//! the path codec, the compiled listing template and the serving policy.
//!
//! Holds nothing mutable; every request works on its own data.

use super::{
    listing::{self, ListingResult},
    path_codec::PathCodec,
    render::ListingRenderer,
    streamer::{self, ObjectTransfer},
};
use crate::{errors::AppError, store::ObjectStore};
use std::sync::Arc;

/// Per-deployment serving knobs.
#[derive(Clone, Debug)]
pub struct ServePolicy {
    /// Prepended to file URLs in listings, e.g. `/download`.
    pub link_prefix: String,
    /// Upper bound on objects enumerated for one listing.
    pub max_list_keys: usize,
    /// `max-age` of listing pages, in seconds.
    pub listing_max_age: u64,
    /// `max-age` of object bodies, in seconds.
    pub object_max_age: u64,
}

impl Default for ServePolicy {
    fn default() -> Self {
        Self {
            link_prefix: "/download".into(),
            max_list_keys: 10_000,
            listing_max_age: 3600,
            object_max_age: 7 * 24 * 3600,
        }
    }
}

#[derive(Clone)]
pub struct BrowseService {
    pub store: Arc<dyn ObjectStore>,
    pub codec: PathCodec,
    pub renderer: Arc<ListingRenderer>,
    pub policy: ServePolicy,
}

impl BrowseService {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        codec: PathCodec,
        renderer: ListingRenderer,
        policy: ServePolicy,
    ) -> Self {
        Self {
            store,
            codec,
            renderer: Arc::new(renderer),
            policy,
        }
    }

    pub async fn synthesize_listing(&self, prefix: &str) -> Result<ListingResult, AppError> {
        listing::synthesize_listing(
            self.store.as_ref(),
            &self.codec,
            &self.policy.link_prefix,
            prefix,
            self.policy.max_list_keys,
        )
        .await
    }

    /// The listing page for `prefix`, or `NotFound` when nothing lives under it.
    pub async fn render_listing(&self, prefix: &str) -> Result<String, AppError> {
        match self.synthesize_listing(prefix).await? {
            ListingResult::NotFound => Err(AppError::NotFound),
            ListingResult::Ok(entries) => {
                let url_path = self.codec.key_to_url(prefix);
                Ok(self.renderer.render(&url_path, &entries)?)
            }
        }
    }

    pub async fn stream_object(
        &self,
        key: &str,
        range_header: Option<&str>,
    ) -> Result<Option<ObjectTransfer>, AppError> {
        streamer::stream_object(self.store.as_ref(), key, range_header).await
    }
}
