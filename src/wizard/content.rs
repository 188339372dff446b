//! Per-step wizard content: the fields, AI recommendations and length checks
//! shown on one step.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::steps::{self, step_for_field};
use crate::metadata::{AiAnalysis, MetadataRecord, MissingField};

/// Optimal SEO title length in characters (inclusive)
pub const TITLE_OPTIMAL: (usize, usize) = (50, 60);

/// Optimal meta description length in characters (inclusive)
pub const DESCRIPTION_OPTIMAL: (usize, usize) = (150, 160);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LengthStatus {
    TooShort,
    Optimal,
    TooLong,
}

/// Character-count verdict for a title or description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LengthAssessment {
    /// Field the assessment applies to
    pub field: String,
    pub chars: usize,
    pub min: usize,
    pub max: usize,
    pub status: LengthStatus,
    /// Display label, e.g. "(too short — aim for 50-60)"
    pub label: String,
}

impl LengthAssessment {
    fn new(field: &str, value: &str, (min, max): (usize, usize)) -> Self {
        let chars = value.chars().count();
        let status = if chars < min {
            LengthStatus::TooShort
        } else if chars > max {
            LengthStatus::TooLong
        } else {
            LengthStatus::Optimal
        };
        let label = match status {
            LengthStatus::TooShort => format!("(too short — aim for {}-{})", min, max),
            LengthStatus::TooLong => format!("(too long — aim for {}-{})", min, max),
            LengthStatus::Optimal => "(optimal length)".to_string(),
        };

        Self {
            field: field.to_string(),
            chars,
            min,
            max,
            status,
            label,
        }
    }

    pub fn is_optimal(&self) -> bool {
        self.status == LengthStatus::Optimal
    }
}

pub fn assess_title(title: &str) -> LengthAssessment {
    LengthAssessment::new("title", title, TITLE_OPTIMAL)
}

pub fn assess_description(description: &str) -> LengthAssessment {
    LengthAssessment::new("description", description, DESCRIPTION_OPTIMAL)
}

/// Missing-field recommendations whose field classifies to `step`, in order
pub fn recommendations_for_step(analysis: &AiAnalysis, step: usize) -> Vec<&MissingField> {
    analysis
        .missing_fields
        .iter()
        .filter(|m| step_for_field(&m.field) == step)
        .collect()
}

/// General improvements are only shown on the final step
pub fn improvements_for_step(analysis: &AiAnalysis, step: usize) -> &[String] {
    if step + 1 == steps::step_count() {
        &analysis.improvements
    } else {
        &[]
    }
}

/// One metadata value shown on a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldValue {
    pub name: String,
    pub value: String,
}

/// Everything needed to render one wizard step for a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StepView {
    pub index: usize,
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub fields: Vec<FieldValue>,
    pub recommendations: Vec<MissingField>,
    pub improvements: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<LengthAssessment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_score: Option<u8>,
}

/// Build the view for step `index`. `None` when the index is out of range.
pub fn step_view(metadata: &MetadataRecord, index: usize) -> Option<StepView> {
    let step = steps::step(index)?;

    let fields = metadata
        .present_fields()
        .into_iter()
        .filter(|(name, _)| step_for_field(name) == index)
        .map(|(name, value)| FieldValue {
            name: name.to_string(),
            value: value.to_string(),
        })
        .collect();

    let (recommendations, improvements) = match &metadata.ai_analysis {
        Some(analysis) => (
            recommendations_for_step(analysis, index)
                .into_iter()
                .cloned()
                .collect(),
            improvements_for_step(analysis, index).to_vec(),
        ),
        None => (Vec::new(), Vec::new()),
    };

    let length = match step.id {
        "title" => metadata.title.as_deref().map(assess_title),
        "description" => metadata.description.as_deref().map(assess_description),
        _ => None,
    };

    Some(StepView {
        index,
        id: step.id.to_string(),
        title: step.title.to_string(),
        description: step.description.to_string(),
        icon: step.icon.to_string(),
        fields,
        recommendations,
        improvements,
        length,
        seo_score: metadata.ai_analysis.as_ref().map(|a| a.seo_score),
    })
}
