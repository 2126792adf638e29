use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::model::ChannelSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryType {
    Trending,
    Search,
    ChannelVideos,
    PlaylistVideos,
    ChannelDirectory,
}

impl QueryType {
    pub const ALL: [QueryType; 5] = [
        QueryType::Trending,
        QueryType::Search,
        QueryType::ChannelVideos,
        QueryType::PlaylistVideos,
        QueryType::ChannelDirectory,
    ];

    /// Whether the structured API can serve this query. Html is always available.
    pub fn supports_api(self) -> bool {
        match self {
            Self::Trending
            | Self::Search
            | Self::ChannelVideos
            | Self::PlaylistVideos
            | Self::ChannelDirectory => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Query {
    Trending,
    Search { text: String },
    ChannelVideos { channel: ChannelSource },
    PlaylistVideos { playlist_id: String },
    ChannelDirectory { sources: Vec<ChannelSource> },
}

impl Query {
    pub fn query_type(&self) -> QueryType {
        match self {
            Self::Trending => QueryType::Trending,
            Self::Search { .. } => QueryType::Search,
            Self::ChannelVideos { .. } => QueryType::ChannelVideos,
            Self::PlaylistVideos { .. } => QueryType::PlaylistVideos,
            Self::ChannelDirectory { .. } => QueryType::ChannelDirectory,
        }
    }
}

/// Everything one call needs. Immutable once built; also usable as a cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuerySpec {
    pub query: Query,
    pub region: String,
    pub api_key: Option<String>,
}

impl QuerySpec {
    pub fn new(query: Query, region: impl Into<String>) -> Self {
        Self {
            query,
            region: region.into(),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Region and credential taken from configuration.
    pub fn from_config(query: Query, config: &Config) -> Self {
        Self {
            query,
            region: config.region().to_string(),
            api_key: config.api_key().map(str::to_string),
        }
    }

    pub fn query_type(&self) -> QueryType {
        self.query.query_type()
    }
}
