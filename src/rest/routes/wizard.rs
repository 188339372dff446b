//! Wizard endpoints: step table, field classification, navigation and
//! per-step views.

use axum::{
    extract::{rejection::JsonRejection, Path},
    Json,
};

use crate::metadata::MetadataRecord;
use crate::rest::dto::{ClassifyResponse, NavigateRequest, NavigateResponse, StepResponse};
use crate::rest::error::{ApiError, ErrorResponse};
use crate::wizard::{step_count, step_for_field, step_view, StepView, WizardNavigator, WIZARD_STEPS};

/// List the wizard steps in order
#[utoipa::path(
    get,
    path = "/api/v1/wizard/steps",
    tag = "Wizard",
    responses(
        (status = 200, description = "Wizard steps", body = Vec<StepResponse>)
    )
)]
pub async fn list_steps() -> Json<Vec<StepResponse>> {
    Json(
        WIZARD_STEPS
            .iter()
            .enumerate()
            .map(|(i, step)| StepResponse::new(i, step))
            .collect(),
    )
}

/// Classify a metadata field name to its wizard step
#[utoipa::path(
    get,
    path = "/api/v1/wizard/classify/{field}",
    tag = "Wizard",
    params(
        ("field" = String, Path, description = "camelCase metadata field name")
    ),
    responses(
        (status = 200, description = "Owning step", body = ClassifyResponse)
    )
)]
pub async fn classify(Path(field): Path<String>) -> Json<ClassifyResponse> {
    let step_index = step_for_field(&field);
    let step_id = WIZARD_STEPS[step_index].id.to_string();

    Json(ClassifyResponse {
        field,
        step_index,
        step_id,
    })
}

/// Apply a navigation action to a wizard state
#[utoipa::path(
    post,
    path = "/api/v1/wizard/navigate",
    tag = "Wizard",
    request_body = NavigateRequest,
    responses(
        (status = 200, description = "State after the action", body = NavigateResponse),
        (status = 400, description = "Malformed body or step count mismatch", body = ErrorResponse)
    )
)]
pub async fn navigate(
    payload: Result<Json<NavigateRequest>, JsonRejection>,
) -> Result<Json<NavigateResponse>, ApiError> {
    let Json(request) = payload?;
    let mut nav = match &request.state {
        Some(snapshot) if snapshot.step_count != step_count() => {
            return Err(ApiError::BadRequest(format!(
                "stepCount must be {}, got {}",
                step_count(),
                snapshot.step_count
            )));
        }
        Some(snapshot) => WizardNavigator::from_snapshot(snapshot),
        None => WizardNavigator::new(step_count(), None),
    };
    nav.apply(request.action);

    Ok(Json(NavigateResponse {
        state: nav.snapshot(),
        is_first_step: nav.is_first_step(),
        is_last_step: nav.is_last_step(),
        progress: nav.progress(),
    }))
}

/// Render one wizard step for a metadata record
#[utoipa::path(
    post,
    path = "/api/v1/wizard/steps/{index}/view",
    tag = "Wizard",
    params(
        ("index" = i64, Path, description = "Zero-based step index")
    ),
    request_body = MetadataRecord,
    responses(
        (status = 200, description = "Step content", body = StepView),
        (status = 400, description = "Body is not a metadata record", body = ErrorResponse),
        (status = 404, description = "Step not found", body = ErrorResponse)
    )
)]
pub async fn view_step(
    Path(index): Path<i64>,
    payload: Result<Json<MetadataRecord>, JsonRejection>,
) -> Result<Json<StepView>, ApiError> {
    let Json(record) = payload?;
    usize::try_from(index)
        .ok()
        .and_then(|i| step_view(&record, i))
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Step {} not found", index)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::{NavigationAction, WizardSnapshot};

    #[tokio::test]
    async fn test_list_steps() {
        let steps = list_steps().await;
        let ids: Vec<_> = steps.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["title", "description", "social", "content"]);
    }

    #[tokio::test]
    async fn test_classify() {
        let resp = classify(Path("twitterSite".to_string())).await;
        assert_eq!(resp.step_index, 2);
        assert_eq!(resp.step_id, "social");

        let resp = classify(Path("unknownField".to_string())).await;
        assert_eq!(resp.step_id, "content");
    }

    #[tokio::test]
    async fn test_navigate_from_fresh_state() {
        let resp = navigate(Ok(Json(NavigateRequest {
            state: None,
            action: NavigationAction::Next,
        })))
        .await
        .unwrap();
        assert_eq!(resp.state.current_step, 1);
        assert_eq!(resp.state.completed_steps, vec![0]);
        assert!(!resp.is_first_step);
    }

    #[tokio::test]
    async fn test_navigate_ignores_invalid_goto() {
        let state = WizardSnapshot {
            step_count: 4,
            current_step: 3,
            completed_steps: vec![0, 1, 2],
        };
        let resp = navigate(Ok(Json(NavigateRequest {
            state: Some(state.clone()),
            action: NavigationAction::GoTo { step: 7 },
        })))
        .await
        .unwrap();
        assert_eq!(resp.state, state);
        assert!(resp.is_last_step);
    }

    #[tokio::test]
    async fn test_navigate_rejects_foreign_step_count() {
        for step_count in [3, 50_000_000, usize::MAX] {
            let result = navigate(Ok(Json(NavigateRequest {
                state: Some(WizardSnapshot {
                    step_count,
                    current_step: 0,
                    completed_steps: vec![],
                }),
                action: NavigationAction::Next,
            })))
            .await;
            assert!(matches!(result, Err(ApiError::BadRequest(_))));
        }
    }

    #[tokio::test]
    async fn test_view_step_not_found() {
        assert!(view_step(Path(4), Ok(Json(MetadataRecord::default())))
            .await
            .is_err());
        assert!(view_step(Path(-1), Ok(Json(MetadataRecord::default())))
            .await
            .is_err());
    }
}
