//! Wizard navigation state machine.
//!
//! A bounded stepper over a fixed number of steps. Every operation is total:
//! invalid indices are ignored (or reset to 0 on construction) and moving past
//! either end is a no-op. A step is marked completed only when `go_next`
//! leaves it; completions are never cleared.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Largest step count a navigator will hold; larger requests are clamped
pub const MAX_STEPS: usize = 64;

/// Stepper over `step_count` ordered steps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardNavigator {
    step_count: usize,
    current_step: usize,
    completed: Vec<bool>,
}

/// A caller-initiated transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NavigationAction {
    /// Advance one step, marking the current one completed
    Next,
    /// Go back one step
    Previous,
    /// Jump directly to a step
    GoTo { step: i64 },
}

/// Serializable wizard state, as exchanged with the frontend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WizardSnapshot {
    pub step_count: usize,
    pub current_step: i64,
    #[serde(default)]
    pub completed_steps: Vec<i64>,
}

/// Render hints for one entry of the progress bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StepProgress {
    pub index: usize,
    pub active: bool,
    pub completed: bool,
    pub clickable: bool,
}

impl WizardNavigator {
    /// Create a navigator. `initial_step` outside `[0, total_steps)` resets to 0.
    ///
    /// `total_steps` is clamped to `1..=MAX_STEPS`.
    pub fn new(total_steps: usize, initial_step: Option<i64>) -> Self {
        let step_count = total_steps.clamp(1, MAX_STEPS);
        let current_step = initial_step
            .and_then(|i| Self::index_in(step_count, i))
            .unwrap_or(0);

        Self {
            step_count,
            current_step,
            completed: vec![false; step_count],
        }
    }

    /// Rebuild a navigator from a snapshot, dropping anything out of range
    pub fn from_snapshot(snapshot: &WizardSnapshot) -> Self {
        let mut nav = Self::new(snapshot.step_count, Some(snapshot.current_step));
        for &i in &snapshot.completed_steps {
            if let Some(idx) = Self::index_in(nav.step_count, i) {
                nav.completed[idx] = true;
            }
        }
        nav
    }

    /// Current state as a snapshot
    pub fn snapshot(&self) -> WizardSnapshot {
        WizardSnapshot {
            step_count: self.step_count,
            current_step: self.current_step as i64,
            completed_steps: self.completed_steps().into_iter().map(|i| i as i64).collect(),
        }
    }

    fn index_in(step_count: usize, index: i64) -> Option<usize> {
        usize::try_from(index).ok().filter(|&i| i < step_count)
    }

    fn index(&self, index: i64) -> Option<usize> {
        Self::index_in(self.step_count, index)
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Indices of completed steps, ascending
    pub fn completed_steps(&self) -> Vec<usize> {
        self.completed
            .iter()
            .enumerate()
            .filter_map(|(i, &done)| done.then_some(i))
            .collect()
    }

    /// Advance one step. No-op on the last step.
    pub fn go_next(&mut self) {
        if self.current_step + 1 < self.step_count {
            self.completed[self.current_step] = true;
            self.current_step += 1;
        }
    }

    /// Go back one step. No-op on the first step.
    pub fn go_previous(&mut self) {
        if self.current_step > 0 {
            self.current_step -= 1;
        }
    }

    /// Jump to `target`. Out-of-range targets are ignored.
    pub fn go_to_step(&mut self, target: i64) {
        if let Some(idx) = self.index(target) {
            self.current_step = idx;
        }
    }

    /// Apply a transition
    pub fn apply(&mut self, action: NavigationAction) {
        match action {
            NavigationAction::Next => self.go_next(),
            NavigationAction::Previous => self.go_previous(),
            NavigationAction::GoTo { step } => self.go_to_step(step),
        }
    }

    pub fn is_first_step(&self) -> bool {
        self.current_step == 0
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step == self.step_count - 1
    }

    pub fn is_step_completed(&self, index: i64) -> bool {
        self.index(index).map(|i| self.completed[i]).unwrap_or(false)
    }

    /// Only the current step and steps already passed through are reachable
    pub fn can_navigate_to(&self, index: i64) -> bool {
        match self.index(index) {
            Some(i) => i == self.current_step || self.completed[i],
            None => false,
        }
    }

    /// One entry per step for rendering the progress bar
    pub fn progress(&self) -> Vec<StepProgress> {
        (0..self.step_count)
            .map(|index| StepProgress {
                index,
                active: index == self.current_step,
                completed: self.completed[index],
                clickable: self.can_navigate_to(index as i64),
            })
            .collect()
    }
}
