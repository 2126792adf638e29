use scraper::Selector;
use std::sync::LazyLock;

use crate::model::QueryType;

/// The five page layouts the scraper knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleSet {
    Trending,
    Search,
    ChannelVideos,
    PlaylistVideos,
    ChannelDirectory,
}

/// How an item's id and kind are derived from its title anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdRule {
    /// `v` query parameter, always a video.
    VideoParam,
    /// Kind decided by the href shape.
    ClassifyHref,
    /// Subscribe button id or `/channel/<id>` segment, always a channel.
    ChannelPage,
}

pub struct Rules {
    pub item: Selector,
    /// Tried in order; the first matching `img` wins.
    pub thumbnail: Vec<Selector>,
    /// When set, an item without a thumbnail image is malformed.
    pub thumbnail_required: bool,
    pub anchor: Selector,
    pub id_rule: IdRule,
    pub duration: Option<Selector>,
    pub meta: Option<Selector>,
}

pub static SUBSCRIBE_BUTTON: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[data-channel-external-id]").unwrap());

static TRENDING: LazyLock<Rules> = LazyLock::new(|| Rules {
    item: Selector::parse(".expanded-shelf-content-item").unwrap(),
    thumbnail: vec![
        Selector::parse(".yt-thumb .yt-thumb-simple img").unwrap(),
        Selector::parse(".video-thumb .yt-thumb-simple img").unwrap(),
    ],
    thumbnail_required: true,
    anchor: Selector::parse(".yt-lockup-title a").unwrap(),
    id_rule: IdRule::VideoParam,
    duration: Some(Selector::parse(".yt-lockup-title .accessible-description").unwrap()),
    meta: Some(Selector::parse(".yt-lockup-meta-info").unwrap()),
});

static SEARCH: LazyLock<Rules> = LazyLock::new(|| Rules {
    item: Selector::parse(".yt-lockup").unwrap(),
    thumbnail: vec![Selector::parse(".video-thumb img").unwrap()],
    thumbnail_required: true,
    anchor: Selector::parse(".yt-lockup-title a").unwrap(),
    id_rule: IdRule::ClassifyHref,
    duration: Some(Selector::parse(".video-time").unwrap()),
    meta: None,
});

static CHANNEL_VIDEOS: LazyLock<Rules> = LazyLock::new(|| Rules {
    item: Selector::parse(".channels-content-item").unwrap(),
    thumbnail: vec![Selector::parse(".yt-thumb-clip img").unwrap()],
    thumbnail_required: true,
    anchor: Selector::parse(".yt-lockup-title a").unwrap(),
    id_rule: IdRule::VideoParam,
    duration: None,
    meta: None,
});

static PLAYLIST_VIDEOS: LazyLock<Rules> = LazyLock::new(|| Rules {
    item: Selector::parse(".pl-video").unwrap(),
    thumbnail: vec![Selector::parse(".pl-video-thumbnail img").unwrap()],
    thumbnail_required: false,
    anchor: Selector::parse("a.pl-video-title-link").unwrap(),
    id_rule: IdRule::VideoParam,
    duration: Some(Selector::parse(".timestamp").unwrap()),
    meta: None,
});

static CHANNEL_DIRECTORY: LazyLock<Rules> = LazyLock::new(|| Rules {
    item: Selector::parse(".qualified-channel-title-text").unwrap(),
    thumbnail: vec![Selector::parse("img.channel-header-profile-image").unwrap()],
    thumbnail_required: false,
    anchor: Selector::parse("a").unwrap(),
    id_rule: IdRule::ChannelPage,
    duration: None,
    meta: None,
});

impl RuleSet {
    pub fn for_query(query_type: QueryType) -> Self {
        match query_type {
            QueryType::Trending => Self::Trending,
            QueryType::Search => Self::Search,
            QueryType::ChannelVideos => Self::ChannelVideos,
            QueryType::PlaylistVideos => Self::PlaylistVideos,
            QueryType::ChannelDirectory => Self::ChannelDirectory,
        }
    }

    pub fn rules(self) -> &'static Rules {
        match self {
            Self::Trending => &TRENDING,
            Self::Search => &SEARCH,
            Self::ChannelVideos => &CHANNEL_VIDEOS,
            Self::PlaylistVideos => &PLAYLIST_VIDEOS,
            Self::ChannelDirectory => &CHANNEL_DIRECTORY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_rule_set_compiles() {
        for query_type in QueryType::ALL {
            let rules = RuleSet::for_query(query_type).rules();
            assert!(!rules.thumbnail.is_empty());
        }
        LazyLock::force(&SUBSCRIBE_BUTTON);
    }
}
