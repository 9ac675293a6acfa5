//! HTTP byte-range parsing and validation.
//!
//! Only the first range of a `Range: bytes=...` header is honored; any further
//! comma-separated ranges are ignored.

/// An inclusive, validated byte window: `start <= end < size`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    /// Number of bytes covered by the window.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    pub fn content_range(&self, size: u64) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, size)
    }
}

/// A range as written by the client, before it is checked against a size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangeSpec {
    /// `bytes=start-end`
    FromTo(u64, u64),
    /// `bytes=start-`
    From(u64),
    /// `bytes=-n`, the last `n` bytes
    Suffix(u64),
}

/// The header used the `bytes` unit but its first range could not be parsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MalformedRange;

/// Parse a `Range` header value.
///
/// Returns `Ok(None)` for units other than `bytes`, which are ignored.
pub fn parse_range_header(value: &str) -> Result<Option<RangeSpec>, MalformedRange> {
    let value = value.trim();
    let Some(unit) = value.get(..6) else {
        return Ok(None);
    };
    if !unit.eq_ignore_ascii_case("bytes=") {
        return Ok(None);
    }

    let first = value[6..].split(',').next().unwrap_or("").trim();
    let (start, end) = first.split_once('-').ok_or(MalformedRange)?;
    let (start, end) = (start.trim(), end.trim());

    let parse = |s: &str| s.parse::<u64>().map_err(|_| MalformedRange);
    match (start.is_empty(), end.is_empty()) {
        (true, true) => Err(MalformedRange),
        (true, false) => Ok(Some(RangeSpec::Suffix(parse(end)?))),
        (false, true) => Ok(Some(RangeSpec::From(parse(start)?))),
        (false, false) => Ok(Some(RangeSpec::FromTo(parse(start)?, parse(end)?))),
    }
}

impl RangeSpec {
    /// Resolve against an object size. `None` means the range is not
    /// satisfiable; an explicit end at or past `size` is rejected, not clamped.
    pub fn resolve(self, size: u64) -> Option<ByteRange> {
        if size == 0 {
            return None;
        }
        let (start, end) = match self {
            RangeSpec::FromTo(start, end) => (start, end),
            RangeSpec::From(start) => (start, size - 1),
            RangeSpec::Suffix(0) => return None,
            RangeSpec::Suffix(n) => (size.saturating_sub(n), size - 1),
        };
        (start <= end && end < size).then_some(ByteRange { start, end })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_three_forms() {
        assert_eq!(
            parse_range_header("bytes=100-199"),
            Ok(Some(RangeSpec::FromTo(100, 199)))
        );
        assert_eq!(parse_range_header("bytes=5-"), Ok(Some(RangeSpec::From(5))));
        assert_eq!(parse_range_header("bytes=-3"), Ok(Some(RangeSpec::Suffix(3))));
    }

    #[test]
    fn only_first_range_counts() {
        assert_eq!(
            parse_range_header("bytes=0-9, 20-29,garbage"),
            Ok(Some(RangeSpec::FromTo(0, 9)))
        );
    }

    #[test]
    fn other_units_are_ignored() {
        assert_eq!(parse_range_header("items=0-9"), Ok(None));
        assert_eq!(parse_range_header("byt"), Ok(None));
    }

    #[test]
    fn malformed_bytes_ranges() {
        assert_eq!(parse_range_header("bytes=abc"), Err(MalformedRange));
        assert_eq!(parse_range_header("bytes=-"), Err(MalformedRange));
        assert_eq!(parse_range_header("bytes=1-x"), Err(MalformedRange));
        assert_eq!(parse_range_header("bytes="), Err(MalformedRange));
    }

    #[test]
    fn resolve_checks_bounds() {
        let window = RangeSpec::FromTo(100, 199).resolve(1000).unwrap();
        assert_eq!(window.len(), 100);
        assert_eq!(window.content_range(1000), "bytes 100-199/1000");

        assert_eq!(RangeSpec::FromTo(900, 1500).resolve(1000), None);
        assert_eq!(RangeSpec::FromTo(10, 5).resolve(1000), None);
        assert_eq!(RangeSpec::From(1000).resolve(1000), None);
        assert_eq!(RangeSpec::FromTo(0, 0).resolve(0), None);
        assert_eq!(RangeSpec::Suffix(0).resolve(1000), None);
    }

    #[test]
    fn open_and_suffix_ranges_reach_the_end() {
        assert_eq!(
            RangeSpec::From(990).resolve(1000),
            Some(ByteRange { start: 990, end: 999 })
        );
        assert_eq!(
            RangeSpec::Suffix(10).resolve(1000),
            Some(ByteRange { start: 990, end: 999 })
        );
        assert_eq!(
            RangeSpec::Suffix(5000).resolve(1000),
            Some(ByteRange { start: 0, end: 999 })
        );
    }
}
