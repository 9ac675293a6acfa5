//! Virtual directory listings synthesized from a flat key space.
//!
//! One listing shows exactly one level of hierarchy below a key prefix:
//! child directories (from `/`-terminated marker keys, or implied by keys
//! nested under an unmarked child) and the files directly inside it.

use super::path_codec::PathCodec;
use crate::{
    errors::AppError,
    models::{entry::VirtualEntry, object::ObjectMetadata},
    store::ObjectStore,
};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, PartialEq)]
pub enum ListingResult {
    NotFound,
    Ok(Vec<VirtualEntry>),
}

/// Enumerate `prefix` in the store and synthesize its listing.
///
/// An enumeration that hits `max_keys` fails rather than render a partial
/// listing.
pub async fn synthesize_listing(
    store: &dyn ObjectStore,
    codec: &PathCodec,
    link_prefix: &str,
    prefix: &str,
    max_keys: usize,
) -> Result<ListingResult, AppError> {
    let listing = store.list_prefix(prefix, max_keys).await?;
    if listing.is_truncated {
        return Err(AppError::ListingTruncated {
            prefix: prefix.to_string(),
            limit: max_keys,
        });
    }
    if listing.objects.is_empty() {
        return Ok(ListingResult::NotFound);
    }

    let entries = synthesize_entries(codec, link_prefix, prefix, &listing.objects);
    debug!(prefix, objects = listing.objects.len(), entries = entries.len(), "listing synthesized");
    Ok(ListingResult::Ok(entries))
}

/// Build the ordered, deduplicated rows for `prefix` from `objects`.
///
/// The input order does not affect the output: rows are keyed by display URL
/// (first one wins) and then sorted parent link, directories, files, each
/// group by display URL.
pub fn synthesize_entries(
    codec: &PathCodec,
    link_prefix: &str,
    prefix: &str,
    objects: &[ObjectMetadata],
) -> Vec<VirtualEntry> {
    let mut entries: BTreeMap<String, VirtualEntry> = BTreeMap::new();
    let mut add = |entry: VirtualEntry| {
        entries.entry(entry.display_url.clone()).or_insert(entry);
    };

    if codec.key_to_url(prefix).len() > 1 {
        add(VirtualEntry::parent_link(
            codec.key_to_url(&PathCodec::parent_prefix(prefix)),
        ));
    }

    for meta in objects {
        let Some(remainder) = meta.key.strip_prefix(prefix) else {
            continue;
        };
        if remainder.is_empty() {
            continue;
        }

        if let Some(dir) = remainder.strip_suffix('/') {
            // marker of a deeper level, listed when that level is browsed
            if dir.is_empty() || dir.contains('/') {
                continue;
            }
            add(VirtualEntry::directory(
                codec.key_to_url(&meta.key),
                remainder.to_string(),
            ));
        } else if let Some((child, _)) = remainder.split_once('/') {
            // nested under a child that has no marker object
            if child.is_empty() {
                continue;
            }
            add(VirtualEntry::directory(
                codec.key_to_url(&format!("{prefix}{child}/")),
                format!("{child}/"),
            ));
        } else {
            add(VirtualEntry::file(
                format!("{link_prefix}{}", codec.key_to_url(&meta.key)),
                remainder.to_string(),
                meta.size_bytes,
                meta.created_at,
            ));
        }
    }

    let mut ordered: Vec<VirtualEntry> = entries.into_values().collect();
    ordered.sort_by(|a, b| {
        a.kind
            .cmp(&b.kind)
            .then_with(|| a.display_url.cmp(&b.display_url))
    });
    ordered
}
