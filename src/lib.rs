pub mod common;
pub mod odometer;
pub mod questions;

#[cfg(feature = "app")]
mod commands;

pub use common::{AnswerSlot, AnswerVisibility, LookupOutcome, OdometerRoll, PermisSettings};
pub use odometer::{generate, OdometerError, QuestionIndex, Reading};
pub use questions::{
    DatasetError, DatasetPolicy, LookupError, PrimaryCheck, QaPair, QuestionBundle,
    QuestionDatabase,
};

#[cfg(feature = "app")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use std::sync::Mutex;
    use tauri::Manager;

    let settings = PermisSettings::default();
    let policy = settings.dataset_policy;

    tauri::Builder::default()
        .plugin(tauri_plugin_log::Builder::new().build())
        .setup(move |app| {
            // No lookups are possible before the dataset is managed.
            let database = QuestionDatabase::from_json(questions::DATASET, policy)?;
            app.manage(database);
            Ok(())
        })
        .manage(settings)
        .manage(Mutex::new(common::PermisState::default()))
        .invoke_handler(tauri::generate_handler![
            commands::roll_odometer,
            commands::get_questions,
            commands::toggle_answer,
            commands::get_settings
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
