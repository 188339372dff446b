//! OpenAPI specification builder using utoipa.

use utoipa::OpenApi;

use crate::generate::GenerateRequest;
use crate::metadata::{AiAnalysis, Importance, MetadataRecord, MissingField};
use crate::rest::dto::{
    ClassifyResponse, HealthResponse, NavigateRequest, NavigateResponse, StatusResponse,
    StepResponse,
};
use crate::rest::error::ErrorResponse;
use crate::wizard::content::{FieldValue, LengthAssessment, LengthStatus, StepView};
use crate::wizard::{NavigationAction, StepProgress, WizardSnapshot};

/// OpenAPI documentation for the Metachecker REST API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Metachecker API",
        description = "Fetch, generate and review SEO metadata through a four-step wizard.",
        license(name = "MIT")
    ),
    paths(
        // Health endpoints
        crate::rest::routes::health::health,
        crate::rest::routes::health::status,
        // Metadata endpoints
        crate::rest::routes::metadata::fetch,
        crate::rest::routes::generate::generate,
        // Wizard endpoints
        crate::rest::routes::wizard::list_steps,
        crate::rest::routes::wizard::classify,
        crate::rest::routes::wizard::navigate,
        crate::rest::routes::wizard::view_step,
    ),
    components(
        schemas(
            // Response types
            HealthResponse,
            StatusResponse,
            StepResponse,
            ClassifyResponse,
            NavigateResponse,
            StepView,
            FieldValue,
            LengthAssessment,
            LengthStatus,
            StepProgress,
            WizardSnapshot,
            MetadataRecord,
            AiAnalysis,
            MissingField,
            Importance,
            ErrorResponse,
            // Request types
            GenerateRequest,
            NavigateRequest,
            NavigationAction,
        )
    ),
    tags(
        (name = "Health", description = "Health check and status endpoints"),
        (name = "Metadata", description = "Page metadata extraction"),
        (name = "Generate", description = "AI metadata generation"),
        (name = "Wizard", description = "Wizard steps, classification and navigation"),
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Generate the OpenAPI specification as a JSON string
    pub fn json() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::openapi())
    }

    /// Generate the OpenAPI specification as a YAML string
    pub fn yaml() -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&Self::openapi())
    }
}
