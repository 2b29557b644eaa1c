//! HTML parser for directory listings
//!
//! This module handles parsing listing pages to extract:
//! - Every followable anchor, resolved against the page URL
//! - The anchor text, used later for display names
//! - A size hint for the entry when the listing shows one
//!
//! Apache listings put the size in a table cell of the same row; nginx and
//! lighttpd `<pre>` listings put it in the bare text that follows the anchor.

use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use std::sync::OnceLock;
use url::Url;

/// An anchor found on a listing page
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    /// Absolute URL, resolved against the page
    pub url: Url,

    /// The raw `href` attribute
    pub href: String,

    /// Visible anchor text, trimmed
    pub text: String,

    /// Size in bytes, when the listing shows one next to the entry
    pub size: Option<u64>,
}

/// Extracted information from a listing page
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// The page title (from <title> tag)
    pub title: Option<String>,

    /// All followable anchors, in document order
    pub links: Vec<Link>,
}

/// Parses a listing page and extracts its links and title
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` tags anywhere in the document
///
/// **Exclude:**
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Fragment-only links
/// - Anything that does not resolve to an HTTP(S) URL
///
/// # Example
///
/// ```
/// use reel_harvest::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<html><head><title>Index of /movies/</title></head>
/// <body><a href="Alita%20(2019)/">Alita (2019)/</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/movies/").unwrap();
/// let parsed = parse_html(html, &base_url);
///
/// assert_eq!(parsed.title.as_deref(), Some("Index of /movies/"));
/// assert_eq!(parsed.links[0].url.as_str(), "https://example.com/movies/Alita%20(2019)/");
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        links: extract_links(&document, base_url),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts all valid anchors from the HTML document
fn extract_links(document: &Html, base_url: &Url) -> Vec<Link> {
    let mut links = Vec::new();

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&a_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        if let Some(url) = resolve_link(href, base_url) {
            let text = element.text().collect::<String>().trim().to_string();
            let size = size_hint(&element, &text);

            links.push(Link {
                url,
                href: href.trim().to_string(),
                text,
                size,
            });
        }
    }

    links
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    // Skip fragment-only links (same page anchors)
    if href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(mut absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                absolute_url.set_fragment(None);
                Some(absolute_url)
            } else {
                None
            }
        }
        Err(_) => None,
    }
}

/// Finds the size shown next to an anchor, if any
fn size_hint(element: &ElementRef<'_>, anchor_text: &str) -> Option<u64> {
    // table listings: the size is a cell of the anchor's row
    if let Some(row) = element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| ancestor.value().name() == "tr")
    {
        let row_text = row.text().collect::<Vec<_>>().join(" ");
        return parse_size(&row_text.replacen(anchor_text, " ", 1));
    }

    // preformatted listings: the size trails the anchor up to the next one
    let mut trailing = String::new();
    for node in element.next_siblings() {
        match node.value() {
            Node::Text(text) => trailing.push_str(text),
            Node::Element(el) if el.name() == "a" => break,
            _ => {}
        }
        if trailing.contains('\n') {
            break;
        }
    }

    parse_size(&trailing)
}

fn unit_size_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(b|k|kb|kib|m|mb|mib|g|gb|gib|t|tb|tib)\b")
            .expect("valid size regex")
    })
}

fn raw_size_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:^|\s)(\d+)\s*$").expect("valid raw size regex"))
}

/// Parses a listing size column
///
/// Understands human-readable sizes such as `1.4G`, `700 MB` or `350KiB`
/// (binary multiples) and plain byte counts at the end of the text. Thousands
/// separators are ignored. Returns None for `-` and for text without a size.
pub fn parse_size(text: &str) -> Option<u64> {
    let text = text.replace(',', "");

    if let Some(caps) = unit_size_regex().captures_iter(&text).last() {
        let value: f64 = caps.get(1)?.as_str().parse().ok()?;
        let multiplier: u64 = match caps.get(2)?.as_str().to_ascii_lowercase().chars().next()? {
            'k' => 1 << 10,
            'm' => 1 << 20,
            'g' => 1 << 30,
            't' => 1 << 40,
            _ => 1,
        };
        return Some((value * multiplier as f64) as u64);
    }

    raw_size_regex()
        .captures(text.trim_end())
        .and_then(|caps| caps.get(1)?.as_str().parse().ok())
}
