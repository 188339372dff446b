//! Wizard step table and field-to-step classification.
//!
//! The table is built once and never mutated. Classification is an ordered
//! linear scan: for each non-final step the exact field set is checked, then
//! that step's fallback patterns, before moving on. Anything unclaimed lands
//! on the final step.

use once_cell::sync::Lazy;
use regex::Regex;

/// One stage of the SEO wizard
#[derive(Debug, Clone)]
pub struct StepDefinition {
    /// Short unique identifier (e.g., "title", "social")
    pub id: &'static str,
    /// Display title
    pub title: &'static str,
    /// Display description
    pub description: &'static str,
    /// Icon hint for the frontend
    pub icon: &'static str,
    /// Metadata fields owned explicitly by this step
    pub exact_fields: &'static [&'static str],
    /// Case-insensitive patterns tried after `exact_fields`
    pub fallback_patterns: Vec<Regex>,
}

impl StepDefinition {
    /// Build a step, compiling its fallback patterns case-insensitively
    pub fn new(
        id: &'static str,
        title: &'static str,
        description: &'static str,
        icon: &'static str,
        exact_fields: &'static [&'static str],
        patterns: &[&str],
    ) -> Self {
        let fallback_patterns = patterns
            .iter()
            .filter_map(|p| match Regex::new(&format!("(?i){}", p)) {
                Ok(r) => Some(r),
                Err(e) => {
                    tracing::warn!(step = id, pattern = p, error = %e, "Failed to compile field pattern");
                    None
                }
            })
            .collect();

        Self {
            id,
            title,
            description,
            icon,
            exact_fields,
            fallback_patterns,
        }
    }

    /// True if `field` is one of this step's exact fields
    pub fn owns_field(&self, field: &str) -> bool {
        self.exact_fields.contains(&field)
    }

    /// True if any fallback pattern matches `field`
    pub fn pattern_matches(&self, field: &str) -> bool {
        self.fallback_patterns.iter().any(|re| re.is_match(field))
    }

    /// Exact membership first, then patterns
    pub fn claims(&self, field: &str) -> bool {
        self.owns_field(field) || self.pattern_matches(field)
    }

    /// Source text of the fallback patterns, without the case-insensitivity flag
    pub fn pattern_sources(&self) -> Vec<String> {
        self.fallback_patterns
            .iter()
            .map(|re| re.as_str().trim_start_matches("(?i)").to_string())
            .collect()
    }
}

/// The four wizard steps, in navigation order
pub static WIZARD_STEPS: Lazy<Vec<StepDefinition>> = Lazy::new(|| {
    vec![
        StepDefinition::new(
            "title",
            "Title Optimization",
            "Craft a compelling, keyword-rich title that drives clicks from search results",
            "Type",
            &["title", "ogTitle", "twitterTitle"],
            &["^title$", "title"],
        ),
        StepDefinition::new(
            "description",
            "Meta Description",
            "Write a persuasive meta description that improves click-through rates",
            "FileText",
            &["description", "ogDescription", "twitterDescription", "keywords"],
            &["^description$", "description", "^keywords$"],
        ),
        StepDefinition::new(
            "social",
            "Open Graph & Social",
            "Optimize how your pages appear when shared on social media platforms",
            "Share2",
            &[
                "ogImage",
                "ogImageWidth",
                "ogImageHeight",
                "ogImageAlt",
                "ogType",
                "ogSiteName",
                "ogUrl",
                "ogLocale",
                "ogVideo",
                "ogAudio",
                "twitterCard",
                "twitterImage",
                "twitterImageAlt",
                "twitterSite",
                "twitterCreator",
                "fbAppId",
                "fbPages",
                "fbDomainVerification",
            ],
            &["^og", "^twitter", "^fb", "social", "image"],
        ),
        StepDefinition::new(
            "content",
            "Content & Improvements",
            "Review AI-powered content suggestions and overall SEO improvements",
            "Lightbulb",
            &[
                "robots",
                "canonicalUrl",
                "viewport",
                "charset",
                "language",
                "author",
                "generator",
                "themeColor",
                "favicon",
                "appleTouchIcon",
            ],
            &[".*"],
        ),
    ]
});

/// Number of wizard steps
pub fn step_count() -> usize {
    WIZARD_STEPS.len()
}

/// Look up a step by index
pub fn step(index: usize) -> Option<&'static StepDefinition> {
    WIZARD_STEPS.get(index)
}

/// Look up a step index by id
pub fn step_index(id: &str) -> Option<usize> {
    WIZARD_STEPS.iter().position(|s| s.id == id)
}

/// Index of the wizard step that should display `field`.
///
/// Never fails: unknown fields resolve to the last step.
pub fn step_for_field(field: &str) -> usize {
    classify(&WIZARD_STEPS, field)
}

/// Classify `field` against an arbitrary ordered step table.
///
/// The final step is the default, not a competitor; its own fields and
/// patterns are never consulted. An empty table yields 0.
pub fn classify(steps: &[StepDefinition], field: &str) -> usize {
    let last = steps.len().saturating_sub(1);
    steps[..last]
        .iter()
        .position(|step| step.claims(field))
        .unwrap_or(last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_has_exactly_four_steps() {
        assert_eq!(step_count(), 4);
    }

    #[test]
    fn test_step_ids_unique_and_ordered() {
        let ids: Vec<&str> = WIZARD_STEPS.iter().map(|s| s.id).collect();
        let unique: HashSet<&str> = ids.iter().copied().collect();
        assert_eq!(unique.len(), ids.len());
        assert_eq!(ids, vec!["title", "description", "social", "content"]);
    }

    #[test]
    fn test_all_patterns_compile() {
        let counts: Vec<usize> = WIZARD_STEPS
            .iter()
            .map(|s| s.fallback_patterns.len())
            .collect();
        assert_eq!(counts, vec![2, 3, 5, 1]);
    }

    #[test]
    fn test_title_fields() {
        assert_eq!(step_for_field("title"), 0);
        assert_eq!(step_for_field("ogTitle"), 0);
        assert_eq!(step_for_field("twitterTitle"), 0);
    }

    #[test]
    fn test_description_fields() {
        assert_eq!(step_for_field("description"), 1);
        assert_eq!(step_for_field("ogDescription"), 1);
        assert_eq!(step_for_field("twitterDescription"), 1);
        assert_eq!(step_for_field("keywords"), 1);
    }

    #[test]
    fn test_social_fields() {
        assert_eq!(step_for_field("ogImage"), 2);
        assert_eq!(step_for_field("twitterImage"), 2);
        assert_eq!(step_for_field("twitterCard"), 2);
        assert_eq!(step_for_field("fbAppId"), 2);
        assert_eq!(step_for_field("ogSiteName"), 2);
        assert_eq!(step_for_field("twitterSite"), 2);
    }

    #[test]
    fn test_technical_fields_fall_to_last_step() {
        for field in ["robots", "canonicalUrl", "viewport", "charset", "favicon"] {
            assert_eq!(step_for_field(field), 3, "field {}", field);
        }
    }

    #[test]
    fn test_unknown_fields_fall_to_last_step() {
        assert_eq!(step_for_field("unknownField"), 3);
        assert_eq!(step_for_field("someRandomField"), 3);
        assert_eq!(step_for_field(""), 3);
    }

    #[test]
    fn test_patterns_are_case_insensitive() {
        assert_eq!(step_for_field("PageTitle"), 0);
        assert_eq!(step_for_field("SHORT_DESCRIPTION"), 1);
        assert_eq!(step_for_field("OgWhatever"), 2);
        assert_eq!(step_for_field("heroImage"), 2);
    }

    #[test]
    fn test_earlier_pattern_shadows_later_step() {
        // `^og` would claim this for step 2, but step 0's `title` pattern wins
        assert_eq!(step_for_field("ogImageTitle"), 0);
        assert_eq!(step_for_field("socialDescription"), 1);
    }

    #[test]
    fn test_earlier_pattern_shadows_later_exact_match() {
        let steps = vec![
            StepDefinition::new("a", "A", "", "", &["alpha"], &["og"]),
            StepDefinition::new("b", "B", "", "", &["ogImage"], &[]),
            StepDefinition::new("c", "C", "", "", &[], &[".*"]),
        ];
        assert_eq!(classify(&steps, "ogImage"), 0);
        assert_eq!(classify(&steps, "alpha"), 0);
        assert_eq!(classify(&steps, "beta"), 2);
    }

    #[test]
    fn test_final_step_is_default_not_competitor() {
        let steps = vec![
            StepDefinition::new("a", "A", "", "", &["alpha"], &[]),
            StepDefinition::new("b", "B", "", "", &["beta"], &[]),
        ];
        assert_eq!(classify(&steps, "beta"), 1);
        assert_eq!(classify(&steps, "anything"), 1);
    }

    #[test]
    fn test_classify_is_deterministic_and_in_range() {
        for field in ["title", "ogUrl", "x", "twitterCreator", "??", "themeColor"] {
            let first = step_for_field(field);
            assert!(first < step_count());
            assert_eq!(first, step_for_field(field));
        }
    }

    #[test]
    fn test_step_lookup() {
        assert_eq!(step_index("social"), Some(2));
        assert_eq!(step_index("missing"), None);
        assert_eq!(step(3).map(|s| s.id), Some("content"));
        assert!(step(4).is_none());
    }

    #[test]
    fn test_pattern_sources_strip_flag() {
        let sources = WIZARD_STEPS[2].pattern_sources();
        assert_eq!(sources[0], "^og");
        assert_eq!(sources.len(), 5);
    }
}
