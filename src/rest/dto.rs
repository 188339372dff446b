//! Data Transfer Objects for the REST API.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::wizard::{NavigationAction, StepDefinition, StepProgress, WizardSnapshot};

// =============================================================================
// Health DTOs
// =============================================================================

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Status response with wizard and AI info
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
    pub version: String,
    pub step_count: usize,
    pub ai_configured: bool,
    pub ai_model: String,
}

// =============================================================================
// Metadata DTOs
// =============================================================================

/// Query for fetching a page's metadata
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MetadataQuery {
    /// Page URL; `https://` is assumed when no scheme is given
    pub url: Option<String>,
}

// =============================================================================
// Wizard DTOs
// =============================================================================

/// One wizard step
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StepResponse {
    pub index: usize,
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub exact_fields: Vec<String>,
    pub fallback_patterns: Vec<String>,
}

impl StepResponse {
    pub fn new(index: usize, step: &StepDefinition) -> Self {
        Self {
            index,
            id: step.id.to_string(),
            title: step.title.to_string(),
            description: step.description.to_string(),
            icon: step.icon.to_string(),
            exact_fields: step.exact_fields.iter().map(|f| f.to_string()).collect(),
            fallback_patterns: step.pattern_sources(),
        }
    }
}

/// Field classification result
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClassifyResponse {
    pub field: String,
    pub step_index: usize,
    pub step_id: String,
}

/// Navigation request; without `state` a fresh wizard is assumed
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NavigateRequest {
    #[serde(default)]
    pub state: Option<WizardSnapshot>,
    pub action: NavigationAction,
}

/// State after a navigation action
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NavigateResponse {
    pub state: WizardSnapshot,
    pub is_first_step: bool,
    pub is_last_step: bool,
    pub progress: Vec<StepProgress>,
}
