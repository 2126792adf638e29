//! Mapping of Data API pages onto canonical records.

pub mod model;

use serde::Deserialize;
use tracing::debug;

use crate::extractor::ExtractionError;
use crate::model::{CanonicalRecord, QueryType, RecordKind};
use model::{Envelope, Item, ItemId};

pub const KIND_VIDEO: &str = "youtube#video";
pub const KIND_CHANNEL: &str = "youtube#channel";
pub const KIND_PLAYLIST: &str = "youtube#playlist";
pub const KIND_SEARCH_RESULT: &str = "youtube#searchResult";
pub const KIND_PLAYLIST_ITEM: &str = "youtube#playlistItem";

/// API resource each query is served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiEndpoint {
    /// `videos?chart=mostPopular`
    Videos,
    /// `search?q=` or `search?channelId=`
    Search,
    PlaylistItems,
    Channels,
}

impl ApiEndpoint {
    pub fn for_query(query_type: QueryType) -> Self {
        match query_type {
            QueryType::Trending => Self::Videos,
            QueryType::Search | QueryType::ChannelVideos => Self::Search,
            QueryType::PlaylistVideos => Self::PlaylistItems,
            QueryType::ChannelDirectory => Self::Channels,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Self::Videos => "videos",
            Self::Search => "search",
            Self::PlaylistItems => "playlistItems",
            Self::Channels => "channels",
        }
    }
}

/// One decoded page: its records and the cursor of the next page, if any.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ApiPage {
    pub records: Vec<CanonicalRecord>,
    pub next_cursor: Option<String>,
}

/// Decodes a response body. Only an unreadable envelope or an API error
/// object fails the page; bad items are skipped.
pub fn extract_page(body: &str) -> Result<ApiPage, ExtractionError> {
    let envelope: Envelope =
        serde_json::from_str(body).map_err(|e| ExtractionError::InvalidJson(e.to_string()))?;

    if let Some(error) = envelope.error {
        return Err(ExtractionError::Api {
            code: error.code,
            message: error.message,
        });
    }

    let total = envelope.items.len();
    let records: Vec<CanonicalRecord> = envelope
        .items
        .iter()
        .map(map_item)
        .filter_map(|result| match result {
            Ok(record) => Some(record),
            Err(err) => {
                debug!(error = %err, "skipping api item");
                None
            }
        })
        .collect();

    debug!(
        kind = envelope.kind.as_deref().unwrap_or("unknown"),
        total,
        extracted = records.len(),
        "api page decoded"
    );

    Ok(ApiPage {
        records,
        next_cursor: envelope.next_page_token.filter(|token| !token.is_empty()),
    })
}

fn map_item(value: &serde_json::Value) -> Result<CanonicalRecord, ExtractionError> {
    let item = Item::deserialize(value).map_err(|e| ExtractionError::MalformedItem(e.to_string()))?;
    let snippet = item
        .snippet
        .as_ref()
        .ok_or(ExtractionError::MalformedItem("missing snippet".into()))?;

    let (kind, id) = match item.kind.as_str() {
        KIND_VIDEO => (RecordKind::Video, plain_id(&item)?),
        KIND_CHANNEL => (RecordKind::Channel, plain_id(&item)?),
        KIND_PLAYLIST => (RecordKind::Playlist, plain_id(&item)?),
        KIND_SEARCH_RESULT => search_result_id(&item)?,
        // The entry always points at a video, whatever the nested kind says.
        KIND_PLAYLIST_ITEM => (
            RecordKind::Video,
            snippet
                .resource_id
                .as_ref()
                .and_then(|resource| resource.video_id.clone())
                .or_else(|| {
                    item.content_details
                        .as_ref()
                        .and_then(|details| details.video_id.clone())
                })
                .filter(|id| !id.is_empty())
                .ok_or_else(|| ExtractionError::MissingId(item.kind.clone()))?,
        ),
        other => return Err(ExtractionError::UnsupportedKind(other.to_string())),
    };

    if snippet.title.trim().is_empty() {
        return Err(ExtractionError::EmptyTitle);
    }

    Ok(CanonicalRecord::new(kind, id, &snippet.title)
        .with_thumbnail(snippet.thumbnails.preferred().map(str::to_string))
        .with_published_at(snippet.published_at.clone()))
}

fn plain_id(item: &Item) -> Result<String, ExtractionError> {
    match &item.id {
        Some(ItemId::Plain(id)) if !id.is_empty() => Ok(id.clone()),
        _ => Err(ExtractionError::MissingId(item.kind.clone())),
    }
}

fn search_result_id(item: &Item) -> Result<(RecordKind, String), ExtractionError> {
    let Some(ItemId::Resource(resource)) = &item.id else {
        return Err(ExtractionError::MissingId(item.kind.clone()));
    };

    let (kind, id) = match resource.kind.as_deref() {
        Some(KIND_VIDEO) => (RecordKind::Video, &resource.video_id),
        Some(KIND_CHANNEL) => (RecordKind::Channel, &resource.channel_id),
        Some(KIND_PLAYLIST) => (RecordKind::Playlist, &resource.playlist_id),
        other => {
            return Err(ExtractionError::UnsupportedKind(
                other.unwrap_or("missing").to_string(),
            ));
        }
    };

    id.clone()
        .filter(|id| !id.is_empty())
        .map(|id| (kind, id))
        .ok_or_else(|| ExtractionError::MissingId(item.kind.clone()))
}
