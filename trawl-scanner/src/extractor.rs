use lazy_static::lazy_static;
use regex::bytes::Regex;
use scraper::{Html, Selector};

lazy_static! {
    static ref LINK_RE: Regex =
        Regex::new(r#"https?://[^\s"'<>]+"#).expect("link pattern is valid");
    static ref TITLE_SELECTOR: Selector = Selector::parse("title").expect("title selector is valid");
}

/// Every absolute http(s) URL in `body`, in order of appearance.
///
/// Matching runs on raw bytes so a body cut mid-character by the fetch cap
/// still yields its links. Repeated URLs are kept.
pub fn extract_links(body: &[u8]) -> Vec<String> {
    LINK_RE
        .find_iter(body)
        .map(|m| String::from_utf8_lossy(m.as_bytes()).into_owned())
        .collect()
}

/// Text of the first `<title>` element, trimmed. `None` when there is none.
///
/// The HTML parser recovers from any malformed input, so this never fails;
/// broken markup simply has no title.
pub fn parse_title(body: &[u8]) -> Option<String> {
    let html = String::from_utf8_lossy(body);
    let document = Html::parse_document(&html);

    document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
}

/// Page title, or an empty string when there is none.
pub fn extract_title(body: &[u8]) -> String {
    parse_title(body).unwrap_or_default()
}
