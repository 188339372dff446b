//! SEO wizard: step table, field classification, navigation state and
//! per-step content.

pub mod content;
pub mod navigation;
pub mod steps;

pub use content::{
    assess_description, assess_title, improvements_for_step, recommendations_for_step, step_view,
    LengthAssessment, LengthStatus, StepView,
};
pub use navigation::{NavigationAction, StepProgress, WizardNavigator, WizardSnapshot};
pub use steps::{classify, step, step_count, step_for_field, step_index, StepDefinition, WIZARD_STEPS};
