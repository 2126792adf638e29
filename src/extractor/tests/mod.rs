use std::fs;

use crate::extractor::{ExtractionError, RuleSet, extract_channel_page, extract_list};
use crate::model::{ChannelSource, RecordKind};

fn fixture(name: &str) -> String {
    fs::read_to_string(format!("src/extractor/tests/fixtures/{name}"))
        .expect("Failed to read test fixture")
}

#[test]
fn test_trending_skips_malformed_item() {
    let records = extract_list(&fixture("trending.html"), RuleSet::Trending);

    // four containers, one without a thumbnail block
    let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["trend1", "trend2", "trend3"]);
    assert!(records.iter().all(|r| r.kind == RecordKind::Video));

    let first = &records[0];
    assert_eq!(first.title, "First Trending Video");
    assert_eq!(first.url, "https://www.youtube.com/watch?v=trend1");
    assert_eq!(
        first.thumbnail.as_deref(),
        Some("https://i.ytimg.com/vi/trend1/hqdefault.jpg")
    );
    assert_eq!(first.duration_label.as_deref(), Some("4:13"));
    assert_eq!(first.published_at.as_deref(), Some("2 days ago"));
    assert_eq!(first.view_count.as_deref(), Some("1,234,567"));

    let second = &records[1];
    assert_eq!(second.title, "Second Trending Video");
    assert_eq!(
        second.thumbnail.as_deref(),
        Some("https://i.ytimg.com/vi/trend2/hqdefault.jpg")
    );
    assert_eq!(second.view_count, None);

    // image present but without any source attribute
    assert_eq!(records[2].thumbnail, None);
    assert_eq!(records[2].view_count.as_deref(), Some("88"));
}

#[test]
fn test_search_classifies_results() {
    let records = extract_list(&fixture("search.html"), RuleSet::Search);

    let summary: Vec<_> = records.iter().map(|r| (r.kind, r.id.as_str())).collect();
    assert_eq!(
        summary,
        vec![
            (RecordKind::Video, "abc123"),
            (RecordKind::Channel, "UCcats"),
            (RecordKind::Playlist, "PLcats"),
            (RecordKind::Playlist, "pl1"),
            (RecordKind::Channel, "UCcatlover"),
        ]
    );

    assert_eq!(records[0].duration_label.as_deref(), Some("3:21"));
    assert_eq!(
        records[0].thumbnail.as_deref(),
        Some("https://i.ytimg.com/vi/abc123/mqdefault.jpg")
    );
    assert_eq!(
        records[1].thumbnail.as_deref(),
        Some("https://yt3.ggpht.com/cat-channel.jpg")
    );
    assert_eq!(records[3].url, "https://www.youtube.com/playlist?list=pl1");
    assert_eq!(records[4].url, "https://www.youtube.com/channel/UCcatlover");
}

#[test]
fn test_search_drops_user_without_channel_id() {
    let html = r#"<html><body>
        <div class="yt-lockup">
          <div class="video-thumb"><img src="https://yt3.ggpht.com/a.jpg"></div>
          <h3 class="yt-lockup-title"><a href="/user/nobody">nobody</a></h3>
        </div>
        <div class="yt-lockup">
          <div class="video-thumb"><img src="https://i.ytimg.com/vi/v1/default.jpg"></div>
          <h3 class="yt-lockup-title"><a href="/watch?v=v1">A video</a></h3>
        </div>
    </body></html>"#;

    let records = extract_list(html, RuleSet::Search);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "v1");
}

#[test]
fn test_search_user_falls_back_to_page_subscribe_button() {
    let html = r#"<html><body>
        <button class="yt-uix-subscription-button" data-channel-external-id="UCpage"></button>
        <div class="yt-lockup">
          <div class="video-thumb"><img src="https://yt3.ggpht.com/a.jpg"></div>
          <h3 class="yt-lockup-title"><a href="/user/someone">someone</a></h3>
        </div>
    </body></html>"#;

    let records = extract_list(html, RuleSet::Search);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].kind, RecordKind::Channel);
    assert_eq!(records[0].id, "UCpage");
}

#[test]
fn test_channel_videos_skip_items_without_id() {
    let records = extract_list(&fixture("channel_videos.html"), RuleSet::ChannelVideos);

    let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["cv1", "cv3"]);
    assert_eq!(
        records[0].thumbnail.as_deref(),
        Some("https://i.ytimg.com/vi/cv1/mqdefault.jpg")
    );
    assert_eq!(records[1].title, "Channel video three");
}

#[test]
fn test_playlist_entries_are_videos() {
    let records = extract_list(&fixture("playlist.html"), RuleSet::PlaylistVideos);

    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.kind == RecordKind::Video));
    assert_eq!(records[0].id, "pv1");
    assert_eq!(records[0].title, "Playlist entry one");
    assert_eq!(records[0].duration_label.as_deref(), Some("2:05"));
    assert_eq!(records[0].url, "https://www.youtube.com/watch?v=pv1");
    assert_eq!(records[1].id, "pv2");
    assert_eq!(records[1].thumbnail, None);
}

#[test]
fn test_one_malformed_among_many() {
    let good = |id: &str| {
        format!(
            r#"<li class="channels-content-item"><span class="yt-thumb-clip"><img src="https://i.ytimg.com/vi/{id}/default.jpg"></span><h3 class="yt-lockup-title"><a href="/watch?v={id}">Video {id}</a></h3></li>"#
        )
    };
    let mut body = String::from("<html><body><ul>");
    for index in 0..5 {
        body.push_str(&good(&format!("v{index}")));
        if index == 2 {
            body.push_str(r#"<li class="channels-content-item"><h3 class="yt-lockup-title"><a href="/watch?v=bad">bad</a></h3></li>"#);
        }
    }
    body.push_str("</ul></body></html>");

    let records = extract_list(&body, RuleSet::ChannelVideos);
    assert_eq!(records.len(), 5);
}

#[test]
fn test_channel_page_resolves_durable_id() {
    let source = ChannelSource::user("catlover");
    let record = extract_channel_page(&fixture("channel_page.html"), &source).unwrap();

    assert_eq!(record.kind, RecordKind::Channel);
    assert_eq!(record.id, "UCcatlover");
    assert_eq!(record.title, "Cat Channel");
    assert_eq!(record.url, "https://www.youtube.com/channel/UCcatlover");
    assert_eq!(
        record.thumbnail.as_deref(),
        Some("https://yt3.ggpht.com/cat-profile.jpg")
    );
}

#[test]
fn test_channel_page_falls_back_to_configured_source() {
    let html = r#"<html><body>
        <span class="qualified-channel-title-text"><a href="/user/oldname">Old Name</a></span>
    </body></html>"#;

    let record = extract_channel_page(html, &ChannelSource::user("oldname")).unwrap();
    assert_eq!(record.id, "oldname");
    assert_eq!(record.title, "Old Name");
    assert_eq!(record.url, "https://www.youtube.com/user/oldname");
}

#[test]
fn test_channel_page_without_header_is_an_error() {
    let result = extract_channel_page("<html><body></body></html>", &ChannelSource::channel("UC1"));
    assert_eq!(
        result,
        Err(ExtractionError::MissingElement("channel title"))
    );
}
