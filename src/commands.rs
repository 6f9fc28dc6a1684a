use std::sync::Mutex;
use tauri::State;

use crate::common::{
    AnswerSlot, AnswerVisibility, LookupOutcome, OdometerRoll, PermisSettings, PermisState,
};
use crate::odometer::{self, QuestionIndex};
use crate::questions::QuestionDatabase;

#[tauri::command]
pub fn roll_odometer() -> OdometerRoll {
    odometer::generate().into()
}

#[tauri::command]
pub fn get_questions(
    index: u8,
    database: State<'_, QuestionDatabase>,
    settings: State<'_, PermisSettings>,
    state: State<'_, Mutex<PermisState>>,
) -> Result<LookupOutcome, String> {
    let index = QuestionIndex::try_from(index).map_err(|e| e.to_string())?;
    let outcome = LookupOutcome::from_lookup(database.lookup(index)).map_err(|e| e.to_string())?;
    state
        .lock()
        .map_err(|e| e.to_string())?
        .show(&outcome, &settings);
    Ok(outcome)
}

#[tauri::command]
pub fn toggle_answer(
    slot: AnswerSlot,
    state: State<'_, Mutex<PermisState>>,
) -> Result<AnswerVisibility, String> {
    let visibility = state
        .lock()
        .map_err(|e| e.to_string())?
        .toggle(slot)
        .ok_or_else(|| "No question is shown.".to_string())?;
    log::debug!("Answer visibility now {:?}", visibility);
    Ok(visibility)
}

#[tauri::command]
pub fn get_settings(settings: State<'_, PermisSettings>) -> PermisSettings {
    settings.inner().clone()
}
