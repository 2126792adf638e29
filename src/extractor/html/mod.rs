//! Scraping of the public listing pages.
//!
//! Each [`RuleSet`] describes one page layout. Every matched item container
//! is extracted on its own; a container that fails is logged and skipped so
//! the rest of the page still comes through.

pub mod rules;

pub use rules::RuleSet;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::extractor::ExtractionError;
use crate::model::{CanonicalRecord, ChannelSource, RecordKind, links, normalize_title};
use rules::{IdRule, Rules, SUBSCRIBE_BUTTON};

/// Where a search-result link points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    Video(String),
    Channel(String),
    User(String),
    Playlist(String),
}

/// Classifies a result href. A `list` parameter wins over `/watch`, so a
/// video opened inside a playlist is reported as the playlist.
pub fn classify_href(href: &str) -> Result<LinkTarget, ExtractionError> {
    let url = links::resolve(href).ok_or_else(|| ExtractionError::UnclassifiedHref(href.into()))?;
    let path = url.path();
    let missing_id = || ExtractionError::MissingId(href.to_string());

    if path.starts_with("/playlist") || url.query_pairs().any(|(key, _)| key == "list") {
        return links::query_param(href, "list")
            .map(LinkTarget::Playlist)
            .ok_or_else(missing_id);
    }
    if path.starts_with("/watch") {
        return links::query_param(href, "v")
            .map(LinkTarget::Video)
            .ok_or_else(missing_id);
    }
    if path.starts_with("/channel") {
        return links::segment_after(href, "channel")
            .map(LinkTarget::Channel)
            .ok_or_else(missing_id);
    }
    if path.starts_with("/user") {
        return links::segment_after(href, "user")
            .map(LinkTarget::User)
            .ok_or_else(missing_id);
    }

    Err(ExtractionError::UnclassifiedHref(href.to_string()))
}

/// Extracts every well-formed item of `rule_set` from a page.
pub fn extract_list(body: &str, rule_set: RuleSet) -> Vec<CanonicalRecord> {
    let document = Html::parse_document(body);
    let rules = rule_set.rules();

    let mut matched = 0usize;
    let records: Vec<CanonicalRecord> = document
        .select(&rules.item)
        .inspect(|_| matched += 1)
        .map(|item| extract_item(&document, item, rules))
        .filter_map(|result| match result {
            Ok(record) => Some(record),
            Err(err) => {
                debug!(?rule_set, error = %err, "skipping item");
                None
            }
        })
        .collect();

    debug!(
        ?rule_set,
        matched,
        extracted = records.len(),
        "html extraction finished"
    );
    records
}

/// Header of a configured channel's page.
///
/// The durable channel id comes from the page when it exposes one; otherwise
/// the configured reference is kept, with its own canonical URL.
pub fn extract_channel_page(
    body: &str,
    source: &ChannelSource,
) -> Result<CanonicalRecord, ExtractionError> {
    let document = Html::parse_document(body);
    let rules = RuleSet::ChannelDirectory.rules();

    let header = document
        .select(&rules.item)
        .next()
        .ok_or(ExtractionError::MissingElement("channel title"))?;

    match extract_item(&document, header, rules) {
        Ok(record) => Ok(record),
        Err(ExtractionError::MissingId(_)) => {
            let anchor = header
                .select(&rules.anchor)
                .next()
                .ok_or(ExtractionError::MissingElement("channel title link"))?;
            let mut record = CanonicalRecord::new(RecordKind::Channel, &source.id, &title(anchor)?)
                .with_thumbnail(first_thumbnail(document.root_element(), &rules.thumbnail));
            record.url = source.canonical_url();
            Ok(record)
        }
        Err(err) => Err(err),
    }
}

fn extract_item(
    document: &Html,
    item: ElementRef<'_>,
    rules: &Rules,
) -> Result<CanonicalRecord, ExtractionError> {
    let thumbnail = match rules.id_rule {
        // The profile image sits in the page header, outside the title block.
        IdRule::ChannelPage => first_thumbnail(document.root_element(), &rules.thumbnail),
        _ => thumbnail(item, rules)?,
    };

    let anchor = item
        .select(&rules.anchor)
        .next()
        .ok_or(ExtractionError::MissingElement("title link"))?;
    let href = anchor
        .value()
        .attr("href")
        .ok_or(ExtractionError::MissingAttribute {
            element: "title link",
            attribute: "href",
        })?;
    let title = title(anchor)?;

    let (kind, id) = match rules.id_rule {
        IdRule::VideoParam => (
            RecordKind::Video,
            links::query_param(href, "v").ok_or_else(|| ExtractionError::MissingId(href.into()))?,
        ),
        IdRule::ClassifyHref => match classify_href(href)? {
            LinkTarget::Video(id) => (RecordKind::Video, id),
            LinkTarget::Playlist(id) => (RecordKind::Playlist, id),
            LinkTarget::Channel(id) => (RecordKind::Channel, id),
            // User names are not stable; take the id off the subscribe button.
            LinkTarget::User(name) => (
                RecordKind::Channel,
                subscribe_channel_id(document, item)
                    .ok_or(ExtractionError::UnresolvedUser(name))?,
            ),
        },
        IdRule::ChannelPage => (
            RecordKind::Channel,
            subscribe_channel_id(document, item)
                .or_else(|| links::segment_after(href, "channel"))
                .ok_or_else(|| ExtractionError::MissingId(href.into()))?,
        ),
    };

    let mut record = CanonicalRecord::new(kind, id, &title).with_thumbnail(thumbnail);

    if let Some(selector) = &rules.duration {
        record.duration_label = item
            .select(selector)
            .next()
            .map(|el| duration_label(&el.text().collect::<String>()))
            .filter(|label| !label.is_empty());
    }

    if let Some(selector) = &rules.meta
        && let Some(meta) = item.select(selector).next()
    {
        let entries: Vec<String> = meta
            .child_elements()
            .map(|el| normalize_title(&el.text().collect::<String>()))
            .collect();
        if entries.len() > 1 {
            record.published_at = Some(entries[0].clone()).filter(|d| !d.is_empty());
            record.view_count = entries[1]
                .split(' ')
                .next()
                .filter(|v| !v.is_empty())
                .map(str::to_string);
        }
    }

    Ok(record)
}

/// Anchor text, or its `title` attribute when the text is empty.
fn title(anchor: ElementRef<'_>) -> Result<String, ExtractionError> {
    let mut text = normalize_title(&anchor.text().collect::<String>());
    if text.is_empty() {
        text = anchor.value().attr("title").map(normalize_title).unwrap_or_default();
    }

    if text.is_empty() {
        Err(ExtractionError::EmptyTitle)
    } else {
        Ok(text)
    }
}

fn thumbnail(item: ElementRef<'_>, rules: &Rules) -> Result<Option<String>, ExtractionError> {
    let image = rules
        .thumbnail
        .iter()
        .find_map(|selector| item.select(selector).next());

    match image {
        Some(image) => Ok(image_source(image)),
        None if rules.thumbnail_required => Err(ExtractionError::MissingElement("thumbnail")),
        None => Ok(None),
    }
}

fn first_thumbnail(scope: ElementRef<'_>, selectors: &[Selector]) -> Option<String> {
    selectors
        .iter()
        .find_map(|selector| scope.select(selector).next())
        .and_then(image_source)
}

/// Lazy-loaded images keep the real URL in `data-thumb`; `src` is a placeholder.
fn image_source(image: ElementRef<'_>) -> Option<String> {
    let element = image.value();
    element
        .attr("data-thumb")
        .or_else(|| element.attr("src"))
        .map(|src| absolute_thumbnail(src.trim()))
}

fn absolute_thumbnail(src: &str) -> String {
    if let Some(rest) = src.strip_prefix("//") {
        format!("https://{rest}")
    } else {
        src.to_string()
    }
}

fn subscribe_channel_id(document: &Html, item: ElementRef<'_>) -> Option<String> {
    let attribute = |el: ElementRef<'_>| {
        el.value()
            .attr("data-channel-external-id")
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
    };

    item.select(&SUBSCRIBE_BUTTON)
        .find_map(attribute)
        .or_else(|| document.select(&SUBSCRIBE_BUTTON).find_map(attribute))
}

/// `- Duration: 4:13.` becomes `4:13`.
fn duration_label(raw: &str) -> String {
    let text = normalize_title(raw);
    let text = text.trim_start_matches('-').trim();
    let text = text
        .strip_prefix("Duration:")
        .map(str::trim)
        .unwrap_or(text);
    text.trim_end_matches('.').to_string()
}
