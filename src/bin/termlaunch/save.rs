use std::process::ExitCode;

use termlaunch::prompt::InquirePrompter;
use termlaunch::save::{SaveOutcome, save_project};
use termlaunch::store::ProjectStore;
use termlaunch::workspace::Workspace;

/// Run the interactive save flow.
///
/// # Errors
///
/// Returns an error if prompting or writing the store fails.
pub fn run(
    store: &mut ProjectStore,
    workspace: &Workspace,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match save_project(store, workspace, &mut InquirePrompter)? {
        SaveOutcome::Cancelled => eprintln!("Nothing saved."),
        SaveOutcome::Saved { .. } => {}
    }
    Ok(ExitCode::SUCCESS)
}
