//! Parsing model output and merging it with fetched metadata

use once_cell::sync::Lazy;
use regex::Regex;

use super::GenerateError;
use crate::metadata::MetadataRecord;

static FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```(?:json)?\n?").expect("valid fence regex"));

/// Remove markdown code fences and surrounding whitespace
pub fn strip_code_fences(text: &str) -> String {
    FENCE_RE.replace_all(text, "").trim().to_string()
}

/// Parse the model's text into a record
pub fn parse_generated(text: &str) -> Result<MetadataRecord, GenerateError> {
    let json = strip_code_fences(text);
    serde_json::from_str(&json).map_err(|e| GenerateError::MalformedResponse(e.to_string()))
}

/// Carry over what the model cannot know from the fetched page.
///
/// Without an existing record only the crawl flags are touched, and those
/// already default to false.
pub fn merge_with_existing(mut generated: MetadataRecord, existing: &MetadataRecord) -> MetadataRecord {
    generated.og_image = generated.og_image.or_else(|| existing.og_image.clone());
    generated.twitter_image = generated
        .twitter_image
        .or_else(|| existing.twitter_image.clone());

    generated.og_image_width = existing.og_image_width.clone();
    generated.og_image_height = existing.og_image_height.clone();
    generated.favicon = existing.favicon.clone();
    generated.apple_touch_icon = existing.apple_touch_icon.clone();
    generated.canonical_url = existing.canonical_url.clone();
    generated.og_url = existing
        .og_url
        .clone()
        .or_else(|| existing.canonical_url.clone());

    generated.sitemap_url = existing.sitemap_url.clone();
    generated.sitemap_exists = existing.sitemap_exists;
    generated.robots_txt_exists = existing.robots_txt_exists;
    generated.robots_txt_content = existing.robots_txt_content.clone();

    generated.discord_title = generated.og_title.clone();
    generated.discord_description = generated.og_description.clone();
    generated.discord_image = generated.og_image.clone();
    generated.slack_title = generated.og_title.clone();
    generated.slack_description = generated.og_description.clone();
    generated.slack_image = generated.og_image.clone();

    generated
}
