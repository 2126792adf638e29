//! Canonical URLs and identifier extraction from site-relative hrefs.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use std::sync::LazyLock;
use url::Url;

pub const CANONICAL_BASE: &str = "https://www.youtube.com";

// Identifiers keep `-` and `_`; only characters that would break a path or
// query component are escaped.
const COMPONENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b',')
    .add(b'/')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

static BASE_URL: LazyLock<Url> =
    LazyLock::new(|| Url::parse(CANONICAL_BASE).expect("canonical base is a valid url"));

pub fn watch_url(id: &str) -> String {
    format!("{CANONICAL_BASE}/watch?v={}", encode(id))
}

pub fn channel_url(id: &str) -> String {
    format!("{CANONICAL_BASE}/channel/{}", encode(id))
}

pub fn user_url(name: &str) -> String {
    format!("{CANONICAL_BASE}/user/{}", encode(name))
}

pub fn playlist_url(id: &str) -> String {
    format!("{CANONICAL_BASE}/playlist?list={}", encode(id))
}

pub fn encode(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// Resolves an href (relative or absolute) against the canonical site.
pub fn resolve(href: &str) -> Option<Url> {
    BASE_URL.join(href.trim()).ok()
}

/// First non-empty value of a query parameter.
pub fn query_param(href: &str, name: &str) -> Option<String> {
    resolve(href)?
        .query_pairs()
        .find(|(key, value)| key == name && !value.is_empty())
        .map(|(_, value)| value.into_owned())
}

/// Path segment following `marker`, e.g. `channel` in `/channel/UCxyz/videos`.
pub fn segment_after(href: &str, marker: &str) -> Option<String> {
    let url = resolve(href)?;
    let mut segments = url.path_segments()?;
    segments.find(|segment| *segment == marker)?;
    segments
        .next()
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}
