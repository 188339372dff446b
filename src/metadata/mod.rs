//! Webpage metadata model, HTML extraction and fetching.
//!
//! `MetadataRecord` is the flat record shared by the fetcher, the AI
//! generator and the wizard. Its camelCase field names are the vocabulary
//! the wizard step table classifies.

pub mod extract;
pub mod fetcher;

pub use fetcher::{normalize_url, FetchError, HttpMetadataFetcher, MetadataFetcher};

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

/// SEO and social metadata for one page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS, JsonSchema, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MetadataRecord {
    // ─────────────────────────────────────────────────────────────────────
    // Basic
    // ─────────────────────────────────────────────────────────────────────
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,

    // ─────────────────────────────────────────────────────────────────────
    // Open Graph
    // ─────────────────────────────────────────────────────────────────────
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_image_width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_image_height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_image_alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_site_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_video: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_audio: Option<String>,

    // ─────────────────────────────────────────────────────────────────────
    // Twitter / Facebook
    // ─────────────────────────────────────────────────────────────────────
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_card: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_image_alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_site: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_creator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fb_app_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fb_pages: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fb_domain_verification: Option<String>,

    // ─────────────────────────────────────────────────────────────────────
    // Technical
    // ─────────────────────────────────────────────────────────────────────
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub robots: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewport: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apple_touch_icon: Option<String>,

    // ─────────────────────────────────────────────────────────────────────
    // Crawlability
    // ─────────────────────────────────────────────────────────────────────
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sitemap_url: Option<String>,
    #[serde(default)]
    pub sitemap_exists: bool,
    #[serde(default)]
    pub robots_txt_exists: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub robots_txt_content: Option<String>,

    // ─────────────────────────────────────────────────────────────────────
    // Chat-app previews (mirrors of the Open Graph values)
    // ─────────────────────────────────────────────────────────────────────
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discord_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discord_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discord_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slack_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slack_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slack_image: Option<String>,

    /// Present only on AI-generated records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_analysis: Option<AiAnalysis>,
}

impl MetadataRecord {
    /// Non-empty string fields as `(camelCase name, value)`, in declaration order.
    ///
    /// Booleans, crawlability details, chat-app mirrors and the analysis are
    /// not included; these are the fields the wizard displays per step.
    pub fn present_fields(&self) -> Vec<(&'static str, &str)> {
        let fields: [(&'static str, &Option<String>); 35] = [
            ("title", &self.title),
            ("description", &self.description),
            ("keywords", &self.keywords),
            ("ogTitle", &self.og_title),
            ("ogDescription", &self.og_description),
            ("ogImage", &self.og_image),
            ("ogImageWidth", &self.og_image_width),
            ("ogImageHeight", &self.og_image_height),
            ("ogImageAlt", &self.og_image_alt),
            ("ogType", &self.og_type),
            ("ogSiteName", &self.og_site_name),
            ("ogUrl", &self.og_url),
            ("ogLocale", &self.og_locale),
            ("ogVideo", &self.og_video),
            ("ogAudio", &self.og_audio),
            ("twitterCard", &self.twitter_card),
            ("twitterTitle", &self.twitter_title),
            ("twitterDescription", &self.twitter_description),
            ("twitterImage", &self.twitter_image),
            ("twitterImageAlt", &self.twitter_image_alt),
            ("twitterSite", &self.twitter_site),
            ("twitterCreator", &self.twitter_creator),
            ("fbAppId", &self.fb_app_id),
            ("fbPages", &self.fb_pages),
            ("fbDomainVerification", &self.fb_domain_verification),
            ("robots", &self.robots),
            ("canonicalUrl", &self.canonical_url),
            ("viewport", &self.viewport),
            ("charset", &self.charset),
            ("language", &self.language),
            ("author", &self.author),
            ("generator", &self.generator),
            ("themeColor", &self.theme_color),
            ("favicon", &self.favicon),
            ("appleTouchIcon", &self.apple_touch_icon),
        ];

        fields
            .into_iter()
            .filter_map(|(name, value)| {
                value
                    .as_deref()
                    .filter(|v| !v.trim().is_empty())
                    .map(|v| (name, v))
            })
            .collect()
    }

    /// Set a string field by its camelCase name. Returns false for unknown names.
    pub fn set_field(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "title" => &mut self.title,
            "description" => &mut self.description,
            "keywords" => &mut self.keywords,
            "ogTitle" => &mut self.og_title,
            "ogDescription" => &mut self.og_description,
            "ogImage" => &mut self.og_image,
            "ogImageWidth" => &mut self.og_image_width,
            "ogImageHeight" => &mut self.og_image_height,
            "ogImageAlt" => &mut self.og_image_alt,
            "ogType" => &mut self.og_type,
            "ogSiteName" => &mut self.og_site_name,
            "ogUrl" => &mut self.og_url,
            "ogLocale" => &mut self.og_locale,
            "ogVideo" => &mut self.og_video,
            "ogAudio" => &mut self.og_audio,
            "twitterCard" => &mut self.twitter_card,
            "twitterTitle" => &mut self.twitter_title,
            "twitterDescription" => &mut self.twitter_description,
            "twitterImage" => &mut self.twitter_image,
            "twitterImageAlt" => &mut self.twitter_image_alt,
            "twitterSite" => &mut self.twitter_site,
            "twitterCreator" => &mut self.twitter_creator,
            "fbAppId" => &mut self.fb_app_id,
            "fbPages" => &mut self.fb_pages,
            "fbDomainVerification" => &mut self.fb_domain_verification,
            "robots" => &mut self.robots,
            "canonicalUrl" => &mut self.canonical_url,
            "viewport" => &mut self.viewport,
            "charset" => &mut self.charset,
            "language" => &mut self.language,
            "author" => &mut self.author,
            "generator" => &mut self.generator,
            "themeColor" => &mut self.theme_color,
            "favicon" => &mut self.favicon,
            "appleTouchIcon" => &mut self.apple_touch_icon,
            _ => return false,
        };
        *slot = Some(value);
        true
    }
}

/// AI assessment attached to a generated record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS, JsonSchema, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AiAnalysis {
    /// Overall score, 0-100
    #[serde(default, deserialize_with = "deserialize_score")]
    pub seo_score: u8,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub improvements: Vec<String>,
    #[serde(default)]
    pub missing_fields: Vec<MissingField>,
}

/// A field the AI recommends adding or fixing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, JsonSchema, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MissingField {
    pub field: String,
    #[serde(default, deserialize_with = "deserialize_importance")]
    pub importance: Importance,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub recommendation: String,
}

/// How urgently a missing field should be addressed
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS, JsonSchema, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Importance {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

impl Importance {
    /// Parse leniently; anything unrecognized is `Medium`
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "critical" => Importance::Critical,
            "high" => Importance::High,
            "low" => Importance::Low,
            _ => Importance::Medium,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Importance::Critical => "Critical",
            Importance::High => "High",
            Importance::Medium => "Medium",
            Importance::Low => "Low",
        }
    }
}

fn deserialize_importance<'de, D>(deserializer: D) -> Result<Importance, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().map(Importance::parse).unwrap_or_default())
}

fn deserialize_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(raw.map(|s| s.round().clamp(0.0, 100.0) as u8).unwrap_or(0))
}
