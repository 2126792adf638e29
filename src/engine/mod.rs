//! The query engine: one operation per listing.
//!
//! Every operation picks a mode through the selector, fetches, extracts and
//! returns the records in source order. Nothing here ever fails the caller;
//! the worst outcome of any operation is an empty list, with the reason in
//! the logs.

pub mod endpoints;

pub use endpoints::Endpoints;

use std::collections::HashSet;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::config::Config;
use crate::extractor::{self, RuleSet, api};
use crate::fetcher::{Fetch, FetchError, HttpFetcher, PageResponse};
use crate::model::{
    CanonicalRecord, ChannelSource, Query, QuerySpec, QueryType, RecordKind, SourceType,
};
use crate::selector::{Mode, Strategy, select};

/// Continuation pages followed after the first one. Bounds a single
/// operation at 21 API requests even if the source never stops paging.
pub const MAX_CONTINUATION_PAGES: usize = 20;

pub struct QueryEngine<F> {
    fetcher: F,
    endpoints: Endpoints,
    timeout: Option<Duration>,
}

impl QueryEngine<HttpFetcher> {
    /// Engine over the real HTTP client, configured from `config`.
    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        Ok(Self::new(HttpFetcher::new(config.verify_tls())?, Endpoints::from_config(config))
            .with_timeout(config.timeout()))
    }
}

impl<F: Fetch> QueryEngine<F> {
    pub fn new(fetcher: F, endpoints: Endpoints) -> Self {
        Self {
            fetcher,
            endpoints,
            timeout: None,
        }
    }

    /// Bounds every individual request; an elapsed request counts as a
    /// connectivity failure.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Runs whichever operation `spec` describes.
    pub async fn run(&self, spec: &QuerySpec) -> Vec<CanonicalRecord> {
        let key = spec.api_key.as_deref();
        match &spec.query {
            Query::Trending => self.trending(&spec.region, key).await,
            Query::Search { text } => self.search(text, key).await,
            Query::ChannelVideos { channel } => self.channel_videos(channel, key).await,
            Query::PlaylistVideos { playlist_id } => self.playlist_videos(playlist_id, key).await,
            Query::ChannelDirectory { sources } => self.channel_directory(sources, key).await,
        }
    }

    #[instrument(skip(self, api_key))]
    pub async fn trending(&self, region: &str, api_key: Option<&str>) -> Vec<CanonicalRecord> {
        let records = match strategy(QueryType::Trending, api_key) {
            Strategy::Html(rules) => self.scrape(self.endpoints.trending_page(region), rules).await,
            Strategy::Api(_) => {
                let key = api_key.unwrap_or_default().trim();
                self.paginate(self.endpoints.api_trending(region, key)).await
            }
        };
        info!(count = records.len(), "trending listing");
        records
    }

    #[instrument(skip(self, api_key))]
    pub async fn search(&self, text: &str, api_key: Option<&str>) -> Vec<CanonicalRecord> {
        if text.trim().is_empty() {
            debug!("empty search text");
            return Vec::new();
        }

        let records = match strategy(QueryType::Search, api_key) {
            Strategy::Html(rules) => self.scrape(self.endpoints.search_page(text), rules).await,
            Strategy::Api(_) => {
                let key = api_key.unwrap_or_default().trim();
                self.paginate(self.endpoints.api_search(text, key)).await
            }
        };
        info!(count = records.len(), "search listing");
        records
    }

    #[instrument(skip(self, api_key), fields(channel = %channel.id))]
    pub async fn channel_videos(
        &self,
        channel: &ChannelSource,
        api_key: Option<&str>,
    ) -> Vec<CanonicalRecord> {
        let records = match strategy(QueryType::ChannelVideos, api_key) {
            Strategy::Html(rules) => {
                self.scrape(self.endpoints.channel_videos_page(channel), rules)
                    .await
            }
            Strategy::Api(_) => {
                let key = api_key.unwrap_or_default().trim();
                match self.api_channel_id(channel, key).await {
                    Some(channel_id) => {
                        self.paginate(self.endpoints.api_channel_videos(&channel_id, key))
                            .await
                    }
                    None => Vec::new(),
                }
            }
        };
        info!(count = records.len(), "channel videos listing");
        records
    }

    #[instrument(skip(self, api_key))]
    pub async fn playlist_videos(
        &self,
        playlist_id: &str,
        api_key: Option<&str>,
    ) -> Vec<CanonicalRecord> {
        let records = match strategy(QueryType::PlaylistVideos, api_key) {
            Strategy::Html(rules) => {
                self.scrape(self.endpoints.playlist_page(playlist_id), rules)
                    .await
            }
            Strategy::Api(_) => {
                let key = api_key.unwrap_or_default().trim();
                self.paginate(self.endpoints.api_playlist_items(playlist_id, key))
                    .await
            }
        };
        info!(count = records.len(), "playlist listing");
        records
    }

    /// One channel record per configured source that could be resolved, in
    /// configured order for Html. The Api path issues one batched lookup for
    /// user names and one for channel ids, users first.
    #[instrument(skip(self, sources, api_key), fields(sources = sources.len()))]
    pub async fn channel_directory(
        &self,
        sources: &[ChannelSource],
        api_key: Option<&str>,
    ) -> Vec<CanonicalRecord> {
        if sources.is_empty() {
            return Vec::new();
        }

        let records = match strategy(QueryType::ChannelDirectory, api_key) {
            Strategy::Html(_) => {
                let pages = sources.iter().map(|source| self.scrape_channel(source));
                join_all(pages).await.into_iter().flatten().collect()
            }
            Strategy::Api(_) => {
                let key = api_key.unwrap_or_default().trim();
                let users = ids_of(sources, SourceType::User);
                let channels = ids_of(sources, SourceType::Channel);

                let by_username = async {
                    if users.is_empty() {
                        Vec::new()
                    } else {
                        self.paginate(self.endpoints.api_channels_by_username(&users, key))
                            .await
                    }
                };
                let by_id = async {
                    if channels.is_empty() {
                        Vec::new()
                    } else {
                        self.paginate(self.endpoints.api_channels_by_id(&channels, key))
                            .await
                    }
                };
                let (mut records, by_id) = futures::join!(by_username, by_id);
                records.extend(by_id);
                records
            }
        };
        let records = dedupe(records);
        info!(count = records.len(), "channel directory");
        records
    }

    async fn scrape_channel(&self, source: &ChannelSource) -> Option<CanonicalRecord> {
        let page = self.get(self.endpoints.channel_videos_page(source)).await?;
        match extractor::extract_channel_page(&page.body_utf8, source) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(channel = %source.id, error = %err, "channel page not understood");
                None
            }
        }
    }

    /// A single page, a single extraction pass.
    async fn scrape(
        &self,
        url: Result<Url, url::ParseError>,
        rules: RuleSet,
    ) -> Vec<CanonicalRecord> {
        match self.get(url).await {
            Some(page) => extractor::extract_list(&page.body_utf8, rules),
            None => Vec::new(),
        }
    }

    /// Follows continuation cursors, concatenating records in page order. A
    /// record repeated on a later page is dropped.
    async fn paginate(&self, first: Result<Url, url::ParseError>) -> Vec<CanonicalRecord> {
        let first = match first {
            Ok(url) => url,
            Err(err) => {
                warn!(error = %err, "invalid api request url");
                return Vec::new();
            }
        };

        let mut records = Vec::new();
        let mut cursor: Option<String> = None;

        for page in 0..=MAX_CONTINUATION_PAGES {
            let url = endpoints::with_cursor(&first, cursor.as_deref());
            let Some(response) = self.request(&url).await else {
                break;
            };

            if !response.is_success() {
                let detail = api::extract_page(&response.body_utf8)
                    .err()
                    .map(|err| err.to_string())
                    .unwrap_or_default();
                warn!(page, status = %response.status, %detail, "api request rejected");
                cursor = None;
                break;
            }

            match api::extract_page(&response.body_utf8) {
                Ok(decoded) => {
                    debug!(page, count = decoded.records.len(), "api page");
                    records.extend(decoded.records);
                    cursor = decoded.next_cursor;
                }
                Err(err) => {
                    warn!(page, error = %err, "api page not understood");
                    cursor = None;
                    break;
                }
            }

            if cursor.is_none() {
                break;
            }
        }

        if cursor.is_some() {
            warn!(
                pages = MAX_CONTINUATION_PAGES + 1,
                "pagination cap reached, remaining pages ignored"
            );
        }
        dedupe(records)
    }

    /// Resolves the id `search?channelId=` needs. User references cost one
    /// extra lookup because the search endpoint only takes channel ids.
    async fn api_channel_id(&self, channel: &ChannelSource, key: &str) -> Option<String> {
        match channel.source_type {
            SourceType::Channel => Some(channel.id.clone()),
            SourceType::User => {
                let lookup = self
                    .paginate(self.endpoints.api_channels_by_username(&[channel.id.as_str()], key))
                    .await;
                let resolved = lookup.into_iter().next().map(|record| record.id);
                if resolved.is_none() {
                    warn!(user = %channel.id, "user name did not resolve to a channel");
                }
                resolved
            }
        }
    }

    /// Successful page or nothing. Non-2xx statuses and connectivity failures
    /// are logged here.
    async fn get(&self, url: Result<Url, url::ParseError>) -> Option<PageResponse> {
        let url = match url {
            Ok(url) => url,
            Err(err) => {
                warn!(error = %err, "invalid request url");
                return None;
            }
        };

        let response = self.request(&url).await?;
        if response.is_success() {
            Some(response)
        } else {
            warn!(%url, status = %response.status, "unexpected status");
            None
        }
    }

    /// Any response, or `None` after a logged connectivity failure. Never retried.
    async fn request(&self, url: &Url) -> Option<PageResponse> {
        let fetch = self.fetcher.fetch(url.as_str());
        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, fetch)
                .await
                .unwrap_or(Err(FetchError::RequestTimeout)),
            None => fetch.await,
        };

        match result {
            Ok(response) => Some(response),
            Err(err) => {
                warn!(
                    %url,
                    error = %err,
                    connectivity = err.is_connectivity(),
                    "fetch failed"
                );
                None
            }
        }
    }
}

fn ids_of(sources: &[ChannelSource], source_type: SourceType) -> Vec<&str> {
    sources
        .iter()
        .filter(|source| source.source_type == source_type)
        .map(|source| source.id.as_str())
        .collect()
}

/// Keeps the first record for each `(kind, id)`, preserving order.
fn dedupe(records: Vec<CanonicalRecord>) -> Vec<CanonicalRecord> {
    let mut seen: HashSet<(RecordKind, String)> = HashSet::with_capacity(records.len());
    let before = records.len();
    let unique: Vec<_> = records
        .into_iter()
        .filter(|record| seen.insert((record.kind, record.id.clone())))
        .collect();
    if unique.len() < before {
        debug!(dropped = before - unique.len(), "duplicate records");
    }
    unique
}

fn strategy(query_type: QueryType, api_key: Option<&str>) -> Strategy {
    let mode = select(query_type, api_key);
    if mode == Mode::Api {
        debug!(?query_type, "using api");
    }
    Strategy::resolve(query_type, mode)
}
