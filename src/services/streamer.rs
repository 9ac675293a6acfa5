//! Range-aware object retrieval.

use crate::{
    errors::AppError,
    models::{
        object::ObjectMetadata,
        range::{ByteRange, parse_range_header},
    },
    store::{ByteStream, ObjectStore},
};

/// An object ready to be sent: its metadata, the window being sent
/// (`None` for the whole object) and the lazily-read bytes.
pub struct ObjectTransfer {
    pub meta: ObjectMetadata,
    pub window: Option<ByteRange>,
    pub body: ByteStream,
}

impl ObjectTransfer {
    /// Bytes the body will yield.
    pub fn content_length(&self) -> u64 {
        self.window
            .map(|w| w.len())
            .unwrap_or(self.meta.size_bytes)
    }
}

/// Decide which window of an object of `size` bytes to send.
///
/// A missing header or a non-`bytes` unit selects the whole object.
pub fn select_window(range_header: Option<&str>, size: u64) -> Result<Option<ByteRange>, AppError> {
    let Some(value) = range_header else {
        return Ok(None);
    };
    match parse_range_header(value) {
        Ok(None) => Ok(None),
        Ok(Some(spec)) => spec
            .resolve(size)
            .map(Some)
            .ok_or(AppError::RangeNotSatisfiable { size }),
        Err(_) => Err(AppError::RangeNotSatisfiable { size }),
    }
}

/// Look up `key` and open the window selected by `range_header`.
///
/// `Ok(None)` means no object has that key, so the caller may fall back to a
/// directory listing.
pub async fn stream_object(
    store: &dyn ObjectStore,
    key: &str,
    range_header: Option<&str>,
) -> Result<Option<ObjectTransfer>, AppError> {
    let Some(meta) = store.head(key).await? else {
        return Ok(None);
    };
    let window = select_window(range_header, meta.size_bytes)?;
    let body = store.open(&meta, window).await?;
    Ok(Some(ObjectTransfer { meta, window, body }))
}
