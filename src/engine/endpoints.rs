//! Request URLs for both acquisition modes.

use url::Url;

use crate::config::{Config, DEFAULT_API_BASE, DEFAULT_WEB_BASE};
use crate::extractor::api::ApiEndpoint;
use crate::model::{ChannelSource, links};

/// Page size requested from the API.
pub const API_PAGE_SIZE: &str = "50";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    web_base: String,
    api_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(DEFAULT_WEB_BASE, DEFAULT_API_BASE)
    }
}

impl Endpoints {
    pub fn new(web_base: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            web_base: web_base.into().trim_end_matches('/').to_string(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.web_base(), config.api_base())
    }

    fn web(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&format!("{}{}", self.web_base, path))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    pub fn trending_page(&self, region: &str) -> Result<Url, url::ParseError> {
        self.web("/feed/trending", &[("gl", region)])
    }

    /// Spaces become `+`, everything else is form-encoded.
    pub fn search_page(&self, text: &str) -> Result<Url, url::ParseError> {
        self.web("/results", &[("search_query", text.trim())])
    }

    /// Videos tab of a channel or user page; also the page the directory
    /// reads the channel header from.
    pub fn channel_videos_page(&self, source: &ChannelSource) -> Result<Url, url::ParseError> {
        self.web(
            &format!(
                "/{}/{}/videos",
                source.source_type.path_segment(),
                links::encode(&source.id)
            ),
            &[],
        )
    }

    pub fn playlist_page(&self, playlist_id: &str) -> Result<Url, url::ParseError> {
        self.web("/playlist", &[("list", playlist_id)])
    }

    /// `<api_base>/<endpoint>?part=snippet&<params>&key=<key>`.
    pub fn api(
        &self,
        endpoint: ApiEndpoint,
        params: &[(&str, &str)],
        key: &str,
    ) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&format!("{}/{}", self.api_base, endpoint.path()))?;
        url.query_pairs_mut()
            .append_pair("part", "snippet")
            .extend_pairs(params)
            .append_pair("key", key);
        Ok(url)
    }

    pub fn api_trending(&self, region: &str, key: &str) -> Result<Url, url::ParseError> {
        self.api(
            ApiEndpoint::Videos,
            &[
                ("chart", "mostPopular"),
                ("regionCode", region),
                ("maxResults", API_PAGE_SIZE),
            ],
            key,
        )
    }

    pub fn api_search(&self, text: &str, key: &str) -> Result<Url, url::ParseError> {
        self.api(
            ApiEndpoint::Search,
            &[
                ("q", text.trim()),
                ("maxResults", API_PAGE_SIZE),
                ("order", "relevance"),
            ],
            key,
        )
    }

    pub fn api_channel_videos(&self, channel_id: &str, key: &str) -> Result<Url, url::ParseError> {
        self.api(
            ApiEndpoint::Search,
            &[("channelId", channel_id), ("maxResults", API_PAGE_SIZE)],
            key,
        )
    }

    pub fn api_playlist_items(&self, playlist_id: &str, key: &str) -> Result<Url, url::ParseError> {
        self.api(
            ApiEndpoint::PlaylistItems,
            &[("playlistId", playlist_id), ("maxResults", API_PAGE_SIZE)],
            key,
        )
    }

    pub fn api_channels_by_username(
        &self,
        usernames: &[&str],
        key: &str,
    ) -> Result<Url, url::ParseError> {
        self.api(
            ApiEndpoint::Channels,
            &[("forUsername", usernames.join(",").as_str())],
            key,
        )
    }

    pub fn api_channels_by_id(&self, ids: &[&str], key: &str) -> Result<Url, url::ParseError> {
        self.api(ApiEndpoint::Channels, &[("id", ids.join(",").as_str())], key)
    }
}

/// Appends the continuation cursor to a page request.
pub fn with_cursor(url: &Url, cursor: Option<&str>) -> Url {
    let mut url = url.clone();
    if let Some(cursor) = cursor {
        url.query_pairs_mut().append_pair("pageToken", cursor);
    }
    url
}
