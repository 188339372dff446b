//! Handlebars prompt for metadata generation

use handlebars::Handlebars;
use serde_json::json;

use super::GenerateError;
use crate::metadata::MetadataRecord;

/// Instructions sent with every request: the exact JSON shape to return
const BASE_INSTRUCTIONS: &str = r#"You are an SEO expert. Generate optimized metadata for a webpage.
Return ONLY a valid JSON object (no markdown, no code blocks) matching this exact structure:
{
  "title": "SEO optimized title (50-60 chars)",
  "description": "Compelling meta description (150-160 chars)",
  "keywords": "comma, separated, keywords",
  "ogTitle": "Open Graph title",
  "ogDescription": "Open Graph description",
  "ogType": "website",
  "ogSiteName": "Site name",
  "ogLocale": "en_US",
  "twitterCard": "summary_large_image",
  "twitterTitle": "Twitter card title",
  "twitterDescription": "Twitter card description",
  "robots": "index, follow",
  "viewport": "width=device-width, initial-scale=1",
  "charset": "UTF-8",
  "language": "en",
  "sitemapExists": false,
  "robotsTxtExists": false,
  "aiAnalysis": {
    "seoScore": 0,
    "summary": "One paragraph assessment",
    "improvements": ["General improvement"],
    "missingFields": [
      {"field": "ogImage", "importance": "critical|high|medium|low", "reason": "Why it matters", "recommendation": "What to add"}
    ]
  }
}

Include ALL fields that make sense. For fields you cannot determine, omit them.
Make titles engaging and click-worthy while being accurate.
Make descriptions compelling with clear value propositions.
Optimize keywords for search intent."#;

const PROMPT_TEMPLATE: &str = r#"{{base}}
{{~#if existing}}


Here is the current metadata for this page. Analyze it and generate IMPROVED, SEO-optimized versions of all fields:

Current metadata:
{{existing}}

Generate better metadata that will improve search rankings and social media engagement. Keep what's already good, improve what's weak, and add missing fields.
{{~else}}{{#if description}}


Generate optimized metadata for a webpage with this description:
{{description}}

Create complete, professional metadata that would rank well in search engines and look great when shared on social media.
{{~/if}}{{/if}}"#;

/// Renders the generation prompt
pub struct PromptBuilder {
    handlebars: Handlebars<'static>,
}

impl PromptBuilder {
    pub fn new() -> Result<Self, GenerateError> {
        let mut handlebars = Handlebars::new();
        // Prompts are plain text
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars
            .register_template_string("generate", PROMPT_TEMPLATE)
            .map_err(|e| GenerateError::Template(e.to_string()))?;
        Ok(Self { handlebars })
    }

    /// Build the prompt. Existing metadata wins over a free-text description.
    pub fn render(
        &self,
        existing: Option<&MetadataRecord>,
        description: Option<&str>,
    ) -> Result<String, GenerateError> {
        let existing_json = existing
            .map(|record| {
                let mut record = record.clone();
                record.ai_analysis = None;
                serde_json::to_string_pretty(&record)
            })
            .transpose()
            .map_err(|e| GenerateError::Template(e.to_string()))?;

        let description = description.map(str::trim).filter(|d| !d.is_empty());

        let context = json!({
            "base": BASE_INSTRUCTIONS,
            "existing": existing_json,
            "description": description,
        });

        self.handlebars
            .render("generate", &context)
            .map_err(|e| GenerateError::Template(e.to_string()))
    }
}
