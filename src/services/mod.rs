//! Translation between the flat key space and the hierarchical HTTP view.

pub mod browse_service;
pub mod listing;
pub mod path_codec;
pub mod render;
pub mod streamer;
