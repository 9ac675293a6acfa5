//! Core data models for the bucket browser.
//!
//! `bucket` and `object` mirror the catalog rows written by the object-store
//! service; `entry` and `range` are request-scoped values synthesized while
//! answering a single HTTP request.

pub mod bucket;
pub mod entry;
pub mod object;
pub mod range;
