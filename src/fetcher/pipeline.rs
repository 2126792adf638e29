use crate::fetcher::types::{Charset, PageResponse};
use bytes::Bytes;
use chrono::Utc;
use encoding_rs::Encoding;
use regex::Regex;
use reqwest::{StatusCode, header::HeaderMap};
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

static CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

static META_CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>]+)"#).unwrap());

static META_HTTP_EQUIV_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\s+[^>]*?http-equiv\s*=\s*["']?content-type["']?[^>]*?content\s*=\s*["']?[^"'>]*?charset\s*=\s*([^"'\s;/>]+)"#).unwrap()
});

pub fn process_response(
    url_final: Url,
    status: StatusCode,
    headers: HeaderMap,
    body_bytes: Bytes,
    content_type: &str,
) -> PageResponse {
    let charset = detect_charset(content_type, &body_bytes);
    let body_utf8 = decode_to_utf8(&body_bytes, &charset);

    PageResponse {
        url_final,
        status,
        headers,
        body_utf8,
        charset,
        fetched_at: Utc::now(),
    }
}

fn charset_from_captures(regex: &Regex, haystack: &str) -> Option<Charset> {
    let name = regex.captures(haystack)?.get(1)?.as_str().to_lowercase();
    Encoding::for_label(name.as_bytes()).map(Charset::from_encoding)
}

fn detect_charset(content_type: &str, body_bytes: &[u8]) -> Charset {
    // 1. Content-Type header
    if let Some(charset) = charset_from_captures(&CHARSET_REGEX, content_type) {
        return charset;
    }

    // JSON is UTF-8 unless told otherwise
    if content_type.contains("json") {
        return Charset::Utf8;
    }

    // 2. <meta charset> / <meta http-equiv> in the first 4KB
    let search_bytes = &body_bytes[..body_bytes.len().min(4096)];
    let search_str = String::from_utf8_lossy(search_bytes);

    if let Some(charset) = charset_from_captures(&META_CHARSET_REGEX, &search_str) {
        return charset;
    }
    if let Some(charset) = charset_from_captures(&META_HTTP_EQUIV_REGEX, &search_str) {
        return charset;
    }

    // 3. Heuristic
    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(search_bytes, false);
    Charset::from_encoding(detector.guess(None, true))
}

fn decode_to_utf8(body_bytes: &[u8], charset: &Charset) -> String {
    let encoding = charset.encoding();
    let (decoded, _encoding, had_errors) = encoding.decode(body_bytes);

    if had_errors {
        debug!(encoding = encoding.name(), "body contained undecodable bytes");
    }

    decoded.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_charset_from_content_type() {
        let content_type = "text/html; charset=utf-8";
        let body = b"<html><head><title>Test</title></head></html>";

        assert!(matches!(detect_charset(content_type, body), Charset::Utf8));
    }

    #[test]
    fn test_detect_charset_from_meta_tag() {
        let content_type = "text/html";
        let body = b"<html><head><meta charset=\"iso-8859-1\"><title>Test</title></head></html>";

        // encoding_rs maps ISO-8859-1 onto its Windows-1252 superset
        assert!(matches!(
            detect_charset(content_type, body),
            Charset::Windows1252
        ));
    }

    #[test]
    fn test_detect_charset_from_meta_http_equiv() {
        let content_type = "text/html";
        let body = b"<html><head><meta http-equiv=\"Content-Type\" content=\"text/html; charset=windows-1252\"><title>Test</title></head></html>";

        assert!(matches!(
            detect_charset(content_type, body),
            Charset::Windows1252
        ));
    }

    #[test]
    fn test_json_defaults_to_utf8() {
        let body = "{\"title\":\"Grüße\"}".as_bytes();

        assert!(matches!(
            detect_charset("application/json", body),
            Charset::Utf8
        ));
    }

    #[test]
    fn test_decode_is_lossy_instead_of_failing() {
        let body = [b'o', b'k', 0xFF, b'!'];

        let decoded = decode_to_utf8(&body, &Charset::Utf8);
        assert!(decoded.starts_with("ok"));
        assert!(decoded.ends_with('!'));
    }
}
