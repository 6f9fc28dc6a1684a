use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::odometer::{QuestionIndex, Reading};
use crate::questions::{DatasetPolicy, LookupError, QuestionBundle};

#[derive(Clone, Serialize, TS)]
#[ts(export)]
pub struct PermisSettings {
    /// How long the frontend spins the dice before showing the roll.
    pub roll_duration_ms: u64,
    pub answers_revealed_by_default: bool,
    pub dataset_policy: DatasetPolicy,
}

impl Default for PermisSettings {
    fn default() -> Self {
        PermisSettings {
            roll_duration_ms: 800,
            answers_revealed_by_default: false,
            dataset_policy: DatasetPolicy::Strict,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct OdometerRoll {
    pub reading: Reading,
    pub index: QuestionIndex,
}

impl From<(Reading, QuestionIndex)> for OdometerRoll {
    fn from((reading, index): (Reading, QuestionIndex)) -> Self {
        OdometerRoll { reading, index }
    }
}

/// What the question screen renders: the bundle, or a "no question found" state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(tag = "status")]
#[ts(export)]
pub enum LookupOutcome {
    Found { bundle: QuestionBundle },
    NotFound { index: QuestionIndex },
}

impl LookupOutcome {
    /// Turns a lookup result into an outcome. Only a miss is expected here,
    /// anything else is passed back to the caller.
    pub fn from_lookup(result: Result<&QuestionBundle, LookupError>) -> Result<Self, LookupError> {
        match result {
            Ok(bundle) => Ok(LookupOutcome::Found {
                bundle: bundle.clone(),
            }),
            Err(LookupError::NotFound(index)) => Ok(LookupOutcome::NotFound { index }),
            Err(e) => Err(e),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum AnswerSlot {
    Check,
    RoadSafety,
    FirstAid,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct AnswerVisibility {
    pub check: bool,
    pub road_safety: bool,
    pub first_aid: bool,
}

impl AnswerVisibility {
    pub fn all(revealed: bool) -> Self {
        AnswerVisibility {
            check: revealed,
            road_safety: revealed,
            first_aid: revealed,
        }
    }

    pub fn toggle(&mut self, slot: AnswerSlot) -> bool {
        let shown = match slot {
            AnswerSlot::Check => &mut self.check,
            AnswerSlot::RoadSafety => &mut self.road_safety,
            AnswerSlot::FirstAid => &mut self.first_aid,
        };
        *shown = !*shown;
        *shown
    }
}

/// Per-session state of the question screen.
#[derive(Default)]
pub struct PermisState {
    current: Option<QuestionIndex>,
    visibility: AnswerVisibility,
}

impl PermisState {
    /// Updates the screen for a lookup. A miss leaves no question shown.
    pub fn show(&mut self, outcome: &LookupOutcome, settings: &PermisSettings) {
        self.current = match outcome {
            LookupOutcome::Found { bundle } => Some(bundle.index),
            LookupOutcome::NotFound { .. } => None,
        };
        self.visibility = AnswerVisibility::all(settings.answers_revealed_by_default);
    }

    /// Flips one answer of the shown question, `None` if there is none.
    pub fn toggle(&mut self, slot: AnswerSlot) -> Option<AnswerVisibility> {
        self.current?;
        self.visibility.toggle(slot);
        Some(self.visibility)
    }

    pub fn current(&self) -> Option<QuestionIndex> {
        self.current
    }

    pub fn visibility(&self) -> AnswerVisibility {
        self.visibility
    }
}
