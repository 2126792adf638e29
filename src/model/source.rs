use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::model::links;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Channel,
    User,
}

impl SourceType {
    /// Path segment the site uses for this kind of reference.
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::Channel => "channel",
            Self::User => "user",
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SourceError {
    #[error("source is blank")]
    Blank,

    #[error("unsupported source type: {0}")]
    UnsupportedSourceType(String),
}

/// A subscribed channel or user, as configured by the front end.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelSource {
    pub id: String,
    pub source_type: SourceType,
}

impl ChannelSource {
    pub fn channel(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source_type: SourceType::Channel,
        }
    }

    pub fn user(name: impl Into<String>) -> Self {
        Self {
            id: name.into(),
            source_type: SourceType::User,
        }
    }

    /// Parses a configured source reference.
    ///
    /// Accepted shapes: `/channel/<id>`, `channel/<id>`, `/user/<name>`,
    /// `user/<name>`, absolute URLs containing either path, and a bare token
    /// which is taken as a channel id.
    pub fn parse(raw: &str) -> Result<Self, SourceError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(SourceError::Blank);
        }

        if raw.starts_with("http://") || raw.starts_with("https://") {
            let url = Url::parse(raw)
                .map_err(|_| SourceError::UnsupportedSourceType(raw.to_string()))?;
            return Self::from_segments(url.path_segments().into_iter().flatten())
                .ok_or_else(|| SourceError::UnsupportedSourceType(raw.to_string()));
        }

        let trimmed = raw.trim_start_matches('/');
        if !trimmed.contains('/') && !trimmed.contains(char::is_whitespace) {
            return Ok(Self::channel(trimmed));
        }

        Self::from_segments(trimmed.split('/'))
            .ok_or_else(|| SourceError::UnsupportedSourceType(raw.to_string()))
    }

    fn from_segments<'a>(segments: impl Iterator<Item = &'a str>) -> Option<Self> {
        let mut segments = segments.filter(|s| !s.is_empty());
        let source_type = match segments.next()? {
            "channel" => SourceType::Channel,
            "user" => SourceType::User,
            _ => return None,
        };
        let id = segments.next()?;
        Some(Self {
            id: id.to_string(),
            source_type,
        })
    }

    /// Canonical page for this source.
    pub fn canonical_url(&self) -> String {
        match self.source_type {
            SourceType::Channel => links::channel_url(&self.id),
            SourceType::User => links::user_url(&self.id),
        }
    }
}
