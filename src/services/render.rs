//! HTML rendering of synthesized listings.

use crate::models::entry::{EntryKind, VirtualEntry};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tera::{Context, Tera};

const INDEX_TEMPLATE_NAME: &str = "index.html";
const INDEX_TEMPLATE: &str = include_str!("../../templates/index.html");

/// Compiled listing template, built once at startup and shared.
pub struct ListingRenderer {
    tera: Tera,
}

/// A listing row with size and date already formatted for display.
#[derive(Serialize)]
struct ListingRow<'a> {
    url: &'a str,
    name: &'a str,
    kind: &'static str,
    size: String,
    date: String,
}

impl<'a> From<&'a VirtualEntry> for ListingRow<'a> {
    fn from(entry: &'a VirtualEntry) -> Self {
        Self {
            url: &entry.display_url,
            name: &entry.display_name,
            kind: match entry.kind {
                EntryKind::ParentLink => "parent",
                EntryKind::Directory => "directory",
                EntryKind::File => "file",
            },
            size: entry.size_bytes.map(human_size).unwrap_or_default(),
            date: entry.created_at.as_ref().map(display_date).unwrap_or_default(),
        }
    }
}

impl ListingRenderer {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_template(INDEX_TEMPLATE_NAME, INDEX_TEMPLATE)?;
        Ok(Self { tera })
    }

    /// Render `entries` as the listing page for the directory at `url_path`.
    pub fn render(&self, url_path: &str, entries: &[VirtualEntry]) -> Result<String, tera::Error> {
        let rows: Vec<ListingRow<'_>> = entries.iter().map(ListingRow::from).collect();
        let mut ctx = Context::new();
        ctx.insert("path", url_path);
        ctx.insert("entries", &rows);
        self.tera.render(INDEX_TEMPLATE_NAME, &ctx)
    }
}

/// Human-readable size: plain bytes below 1000, otherwise KB/MB/GB in 1024
/// steps with two decimals.
pub fn human_size(size: u64) -> String {
    const KIB: f64 = 1024.0;
    let bytes = size as f64;
    if size < 1000 {
        format!("{size} B")
    } else if bytes < KIB * KIB {
        format!("{:.2} KB", bytes / KIB)
    } else if bytes < KIB * KIB * KIB {
        format!("{:.2} MB", bytes / (KIB * KIB))
    } else {
        format!("{:.2} GB", bytes / (KIB * KIB * KIB))
    }
}

/// `YYYY-MM-DD HH:MM:SS`, UTC.
pub fn display_date(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d %H:%M:%S").to_string()
}
