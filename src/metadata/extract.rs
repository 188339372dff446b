//! Meta tag extraction from raw HTML.
//!
//! Tag-level: `<title>`, `<meta>`, `<link>` and `<html lang>`
//! are matched with regexes and their attributes parsed independently of
//! order and quoting. The first occurrence of each field wins.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use url::Url;

use super::MetadataRecord;

static TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<title\b[^>]*>(.*?)</title\s*>").expect("valid title regex"));

static META_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<meta\b[^>]*>").expect("valid meta regex"));

static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<link\b[^>]*>").expect("valid link regex"));

static HTML_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<html\b[^>]*>").expect("valid html regex"));

static ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("valid attribute regex")
});

static NUMERIC_ENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&#(x[0-9A-Fa-f]+|[0-9]+);").expect("valid entity regex"));

/// Meta `name`/`property` keys and the record field each one fills.
/// Several keys may feed the same field; earlier entries in the document win.
const META_FIELDS: &[(&str, &str)] = &[
    ("description", "description"),
    ("keywords", "keywords"),
    ("robots", "robots"),
    ("viewport", "viewport"),
    ("author", "author"),
    ("generator", "generator"),
    ("theme-color", "themeColor"),
    ("og:title", "ogTitle"),
    ("og:description", "ogDescription"),
    ("og:image", "ogImage"),
    ("og:image:url", "ogImage"),
    ("og:image:secure_url", "ogImage"),
    ("og:image:width", "ogImageWidth"),
    ("og:image:height", "ogImageHeight"),
    ("og:image:alt", "ogImageAlt"),
    ("og:type", "ogType"),
    ("og:site_name", "ogSiteName"),
    ("og:url", "ogUrl"),
    ("og:locale", "ogLocale"),
    ("og:video", "ogVideo"),
    ("og:video:url", "ogVideo"),
    ("og:audio", "ogAudio"),
    ("og:audio:url", "ogAudio"),
    ("twitter:card", "twitterCard"),
    ("twitter:title", "twitterTitle"),
    ("twitter:description", "twitterDescription"),
    ("twitter:image", "twitterImage"),
    ("twitter:image:src", "twitterImage"),
    ("twitter:image:alt", "twitterImageAlt"),
    ("twitter:site", "twitterSite"),
    ("twitter:creator", "twitterCreator"),
    ("fb:app_id", "fbAppId"),
    ("fb:pages", "fbPages"),
    ("facebook-domain-verification", "fbDomainVerification"),
];

/// Parse the attributes of a single tag. Names are lowercased; values are
/// entity-decoded.
pub fn parse_attributes(tag: &str) -> HashMap<String, String> {
    let mut attrs = HashMap::new();
    for caps in ATTR_RE.captures_iter(tag) {
        let name = caps[1].to_lowercase();
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map(|m| m.as_str())
            .unwrap_or_default();
        attrs.entry(name).or_insert_with(|| decode_entities(value));
    }
    attrs
}

/// Decode the common named entities and numeric character references
pub fn decode_entities(text: &str) -> String {
    let named = text
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ");

    let numeric = NUMERIC_ENTITY_RE.replace_all(&named, |caps: &regex::Captures| {
        let code = &caps[1];
        let parsed = match code.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => code.parse::<u32>().ok(),
        };
        parsed
            .and_then(char::from_u32)
            .map(|c| c.to_string())
            .unwrap_or_else(|| caps[0].to_string())
    });

    // Last, so "&amp;lt;" decodes to "&lt;" rather than "<"
    numeric.replace("&amp;", "&")
}

fn clean_text(text: &str) -> Option<String> {
    let collapsed = decode_entities(text)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    (!collapsed.is_empty()).then_some(collapsed)
}

fn resolve(base: Option<&Url>, href: &str) -> String {
    match base {
        Some(base) => base
            .join(href)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| href.to_string()),
        None => href.to_string(),
    }
}

fn set_if_empty(record: &mut MetadataRecord, field: &str, value: String) {
    let already_set = record
        .present_fields()
        .iter()
        .any(|(name, _)| *name == field);
    if !already_set {
        record.set_field(field, value);
    }
}

/// Extract page metadata from `html`. Relative URLs are resolved against `base`.
///
/// Only the document itself is inspected; robots.txt and sitemap state are
/// filled in by the fetcher.
pub fn extract_metadata(html: &str, base: Option<&Url>) -> MetadataRecord {
    let mut record = MetadataRecord::default();

    if let Some(caps) = TITLE_RE.captures(html) {
        record.title = clean_text(&caps[1]);
    }

    for tag in META_RE.find_iter(html) {
        let attrs = parse_attributes(tag.as_str());

        if let Some(charset) = attrs.get("charset").and_then(|c| clean_text(c)) {
            if record.charset.is_none() {
                record.charset = Some(charset);
            }
            continue;
        }

        let key = attrs
            .get("property")
            .or_else(|| attrs.get("name"))
            .or_else(|| attrs.get("itemprop"))
            .map(|k| k.trim().to_lowercase());
        let (Some(key), Some(content)) = (key, attrs.get("content").and_then(|c| clean_text(c)))
        else {
            continue;
        };

        if let Some((_, field)) = META_FIELDS.iter().find(|(k, _)| *k == key) {
            set_if_empty(&mut record, field, content);
        }
    }

    if let Some(tag) = HTML_RE.find(html) {
        record.language = parse_attributes(tag.as_str())
            .get("lang")
            .and_then(|l| clean_text(l));
    }

    for tag in LINK_RE.find_iter(html) {
        let attrs = parse_attributes(tag.as_str());
        let (Some(rel), Some(href)) = (attrs.get("rel"), attrs.get("href")) else {
            continue;
        };
        let href = href.trim();
        if href.is_empty() {
            continue;
        }
        let rels: Vec<String> = rel.split_whitespace().map(|r| r.to_lowercase()).collect();
        let has = |name: &str| rels.iter().any(|r| r == name);

        if has("canonical") && record.canonical_url.is_none() {
            record.canonical_url = Some(resolve(base, href));
        } else if (has("apple-touch-icon") || has("apple-touch-icon-precomposed"))
            && record.apple_touch_icon.is_none()
        {
            record.apple_touch_icon = Some(resolve(base, href));
        } else if has("icon") && record.favicon.is_none() {
            record.favicon = Some(resolve(base, href));
        }
    }

    for image in [&mut record.og_image, &mut record.twitter_image] {
        if let Some(src) = image.take() {
            *image = Some(resolve(base, &src));
        }
    }

    record
}

/// The first `Sitemap:` directive in a robots.txt body
pub fn sitemap_from_robots(robots_txt: &str) -> Option<String> {
    robots_txt.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        if key.trim().eq_ignore_ascii_case("sitemap") {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r##"<!DOCTYPE html>
<html lang="en-US">
<head>
  <meta charset="utf-8">
  <title>
     Example &amp; Co —  Home
  </title>
  <meta name="description" content="We make   things.">
  <meta content="index, follow" name="robots">
  <meta name='viewport' content='width=device-width, initial-scale=1'>
  <meta property="og:title" content="Example OG">
  <meta property="og:image" content="/img/share.png">
  <meta property="og:image:width" content="1200">
  <meta property="og:image" content="/img/second.png">
  <meta name="twitter:card" content="summary_large_image">
  <meta name="twitter:site" content="@example">
  <meta property="fb:app_id" content="12345">
  <meta name="theme-color" content="#ffffff">
  <link rel="canonical" href="https://example.com/">
  <link rel="shortcut icon" href="/favicon.ico">
  <link rel="apple-touch-icon" href="/apple.png">
</head>
<body></body>
</html>"##;

    fn base() -> Url {
        Url::parse("https://example.com/page").unwrap()
    }

    #[test]
    fn test_extracts_basic_fields() {
        let record = extract_metadata(PAGE, Some(&base()));
        assert_eq!(record.title.as_deref(), Some("Example & Co — Home"));
        assert_eq!(record.description.as_deref(), Some("We make things."));
        assert_eq!(record.robots.as_deref(), Some("index, follow"));
        assert_eq!(
            record.viewport.as_deref(),
            Some("width=device-width, initial-scale=1")
        );
        assert_eq!(record.charset.as_deref(), Some("utf-8"));
        assert_eq!(record.language.as_deref(), Some("en-US"));
        assert_eq!(record.theme_color.as_deref(), Some("#ffffff"));
    }

    #[test]
    fn test_extracts_social_fields_first_wins() {
        let record = extract_metadata(PAGE, Some(&base()));
        assert_eq!(record.og_title.as_deref(), Some("Example OG"));
        assert_eq!(
            record.og_image.as_deref(),
            Some("https://example.com/img/share.png")
        );
        assert_eq!(record.og_image_width.as_deref(), Some("1200"));
        assert_eq!(record.twitter_card.as_deref(), Some("summary_large_image"));
        assert_eq!(record.twitter_site.as_deref(), Some("@example"));
        assert_eq!(record.fb_app_id.as_deref(), Some("12345"));
    }

    #[test]
    fn test_extracts_links() {
        let record = extract_metadata(PAGE, Some(&base()));
        assert_eq!(record.canonical_url.as_deref(), Some("https://example.com/"));
        assert_eq!(
            record.favicon.as_deref(),
            Some("https://example.com/favicon.ico")
        );
        assert_eq!(
            record.apple_touch_icon.as_deref(),
            Some("https://example.com/apple.png")
        );
    }

    #[test]
    fn test_without_base_keeps_relative_urls() {
        let record = extract_metadata(PAGE, None);
        assert_eq!(record.og_image.as_deref(), Some("/img/share.png"));
    }

    #[test]
    fn test_empty_document() {
        let record = extract_metadata("", None);
        assert_eq!(record, MetadataRecord::default());
    }

    #[test]
    fn test_ignores_empty_content() {
        let html = r#"<meta name="description" content="  "><meta name="keywords">"#;
        let record = extract_metadata(html, None);
        assert!(record.description.is_none());
        assert!(record.keywords.is_none());
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("a &amp; b"), "a & b");
        assert_eq!(decode_entities("&lt;b&gt;"), "<b>");
        assert_eq!(decode_entities("it&#39;s &#x41;"), "it's A");
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_parse_attributes_unquoted_and_mixed() {
        let attrs = parse_attributes(r#"<meta NAME=robots content='noindex'>"#);
        assert_eq!(attrs.get("name").map(String::as_str), Some("robots"));
        assert_eq!(attrs.get("content").map(String::as_str), Some("noindex"));
    }

    #[test]
    fn test_sitemap_from_robots() {
        let robots = "User-agent: *\nDisallow: /admin\nSitemap: https://example.com/sitemap_index.xml\n";
        assert_eq!(
            sitemap_from_robots(robots).as_deref(),
            Some("https://example.com/sitemap_index.xml")
        );
        assert!(sitemap_from_robots("User-agent: *\n").is_none());
    }
}
