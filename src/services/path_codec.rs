//! Mapping between external URL paths and internal storage keys.
//!
//! Every key the browser can reach lives under one fixed key prefix
//! (e.g. `download/`); URLs never show it.

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

/// Characters escaped when a key becomes a URL path. `/` is kept so the
/// hierarchy stays visible.
const URL_PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[derive(Clone, Debug)]
pub struct PathCodec {
    key_prefix: String,
}

impl PathCodec {
    pub fn new(key_prefix: impl Into<String>) -> Self {
        Self {
            key_prefix: key_prefix.into(),
        }
    }

    /// Trim, strip leading slashes and percent-decode a request path.
    ///
    /// Invalid UTF-8 sequences decode to U+FFFD rather than failing.
    pub fn decode_url(url: &str) -> String {
        let trimmed = url.trim().trim_start_matches('/');
        percent_decode_str(trimmed).decode_utf8_lossy().into_owned()
    }

    /// Whether `url` names a directory: empty, or ending in `/` once decoded.
    pub fn is_directory_path(url: &str) -> bool {
        let decoded = Self::decode_url(url);
        decoded.is_empty() || decoded.ends_with('/')
    }

    /// Storage key for a request path. The empty path maps to the key prefix
    /// itself, the store root.
    pub fn url_to_key(&self, url: &str) -> String {
        format!("{}{}", self.key_prefix, Self::decode_url(url))
    }

    /// URL path for a storage key, always starting with a single `/`.
    ///
    /// The key prefix is stripped case-insensitively when present.
    pub fn key_to_url(&self, key: &str) -> String {
        let key = key.trim().trim_start_matches('/');
        let rest = match key.get(..self.key_prefix.len()) {
            Some(head) if head.eq_ignore_ascii_case(&self.key_prefix) => {
                &key[self.key_prefix.len()..]
            }
            _ => key,
        };
        format!("/{}", utf8_percent_encode(rest, URL_PATH))
    }

    /// The directory prefix one level above `prefix`.
    ///
    /// `download/a/b/` becomes `download/a/`; a single segment becomes the
    /// empty prefix.
    pub fn parent_prefix(prefix: &str) -> String {
        let trimmed = prefix.strip_suffix('/').unwrap_or(prefix);
        match trimmed.rfind('/') {
            Some(idx) => trimmed[..=idx].to_string(),
            None => String::new(),
        }
    }
}
