//! Rows of a synthesized directory listing.

use chrono::{DateTime, Utc};

/// What a listing row points at.
///
/// Variant order is display order: the parent link first, then directories,
/// then files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum EntryKind {
    ParentLink,
    Directory,
    File,
}

/// One row in a rendered listing. `display_url` is unique within a listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VirtualEntry {
    pub display_url: String,
    pub display_name: String,
    pub kind: EntryKind,
    pub size_bytes: Option<u64>,
    pub created_at: Option<DateTime<Utc>>,
}

impl VirtualEntry {
    pub fn parent_link(display_url: String) -> Self {
        Self {
            display_url,
            display_name: "..".into(),
            kind: EntryKind::ParentLink,
            size_bytes: None,
            created_at: None,
        }
    }

    pub fn directory(display_url: String, display_name: String) -> Self {
        Self {
            display_url,
            display_name,
            kind: EntryKind::Directory,
            size_bytes: None,
            created_at: None,
        }
    }

    pub fn file(
        display_url: String,
        display_name: String,
        size_bytes: u64,
        created_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            display_url,
            display_name,
            kind: EntryKind::File,
            size_bytes: Some(size_bytes),
            created_at,
        }
    }
}
