//! Listing acquisition for a video-sharing site.
//!
//! A [`QueryEngine`] turns a [`QuerySpec`] into canonical records, scraping
//! the public pages or calling the Data API depending on whether a key is
//! configured.

pub mod config;
pub mod engine;
pub mod extractor;
pub mod fetcher;
pub mod model;
pub mod selector;

pub use engine::QueryEngine;
pub use model::{CanonicalRecord, ChannelSource, Query, QuerySpec, QueryType, RecordKind};
pub use selector::Mode;
