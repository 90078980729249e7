//! Small text and attribute helpers shared by site adapters

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use scraper::ElementRef;
use url::Url;

/// Image attributes in resolution order: full-resolution, standard, lazy-load
pub const IMAGE_SOURCE_ATTRS: [&str; 3] = ["data-fullscreen-src", "src", "data-src"];

/// Collapses whitespace runs (non-breaking spaces included) and trims
///
/// Serialized markup carries non-breaking spaces as `&nbsp;`, so the entity is
/// treated as whitespace too.
pub fn normalize_whitespace(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Returns the first non-empty value among `attrs` on `element`
pub fn first_attr<'a>(element: &ElementRef<'a>, attrs: &[&str]) -> Option<&'a str> {
    attrs
        .iter()
        .filter_map(|name| element.value().attr(name))
        .map(str::trim)
        .find(|value| !value.is_empty())
}

/// Resolves an image element's source using [`IMAGE_SOURCE_ATTRS`]
pub fn image_source(image: &ElementRef<'_>, base: &Url) -> Option<String> {
    first_attr(image, &IMAGE_SOURCE_ATTRS).and_then(|src| resolve_url(base, src))
}

/// Resolves `href` against `base`
///
/// Absolute URLs are returned verbatim so that exact-string deduplication sees
/// the same value the page contained.
pub fn resolve_url(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    match Url::parse(href) {
        Ok(_) => Some(href.to_string()),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            base.join(href).ok().map(|url| url.to_string())
        }
        Err(_) => None,
    }
}

/// Parses a `datetime` attribute value
///
/// Accepts RFC 3339 and the offset-less forms the index pages use; values
/// without an offset are taken as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Some(date.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
