//! # aggregator
//!
//! Burst aggregator for message albums: collapses a rapid sequence of events
//! sharing one group id into a single batch after a fixed debounce window.

mod album;

pub use album::AlbumAggregator;
