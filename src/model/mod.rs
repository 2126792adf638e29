//! Canonical record schema shared by every listing, whatever source produced it.

pub mod links;
pub mod query;
pub mod source;

pub use query::{Query, QuerySpec, QueryType};
pub use source::{ChannelSource, SourceError, SourceType};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Video,
    Channel,
    Playlist,
}

impl RecordKind {
    /// Canonical absolute URL for an identifier of this kind.
    pub fn canonical_url(self, id: &str) -> String {
        match self {
            Self::Video => links::watch_url(id),
            Self::Channel => links::channel_url(id),
            Self::Playlist => links::playlist_url(id),
        }
    }
}

/// The unit returned by every query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalRecord {
    pub kind: RecordKind,
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_count: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_label: Option<String>,
}

impl CanonicalRecord {
    /// Record with the canonical URL derived from `kind` and `id`.
    pub fn new(kind: RecordKind, id: impl Into<String>, title: &str) -> Self {
        let id = id.into();
        Self {
            kind,
            url: kind.canonical_url(&id),
            id,
            title: normalize_title(title),
            thumbnail: None,
            published_at: None,
            view_count: None,
            duration_label: None,
        }
    }

    pub fn with_thumbnail(mut self, thumbnail: Option<String>) -> Self {
        self.thumbnail = thumbnail.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn with_published_at(mut self, published_at: Option<String>) -> Self {
        self.published_at = published_at.filter(|p| !p.trim().is_empty());
        self
    }
}

/// Trims and collapses inner runs of whitespace left behind by markup.
pub fn normalize_title(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_derives_canonical_url() {
        let video = CanonicalRecord::new(RecordKind::Video, "abc123", "  A   title\n");
        assert_eq!(video.url, "https://www.youtube.com/watch?v=abc123");
        assert_eq!(video.title, "A title");

        let playlist = CanonicalRecord::new(RecordKind::Playlist, "PL1", "List");
        assert_eq!(playlist.url, "https://www.youtube.com/playlist?list=PL1");

        let channel = CanonicalRecord::new(RecordKind::Channel, "UCx", "Chan");
        assert_eq!(channel.url, "https://www.youtube.com/channel/UCx");
    }

    #[test]
    fn blank_optionals_are_dropped() {
        let record = CanonicalRecord::new(RecordKind::Video, "v", "t")
            .with_thumbnail(Some("  ".into()))
            .with_published_at(Some(String::new()));
        assert_eq!(record.thumbnail, None);
        assert_eq!(record.published_at, None);
    }

    #[test]
    fn serializes_camel_case_without_empty_fields() {
        let record = CanonicalRecord::new(RecordKind::Video, "v1", "Title")
            .with_published_at(Some("2024-01-01T00:00:00Z".into()));
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["kind"], "video");
        assert_eq!(json["publishedAt"], "2024-01-01T00:00:00Z");
        assert!(json.get("thumbnail").is_none());
    }
}
