use std::io::IsTerminal;
use std::path::Path;
use std::process::{Command, ExitCode};

use log::debug;

use termlaunch::store::StoreError;

#[cfg(windows)]
const FALLBACK_EDITOR: &str = "notepad";
#[cfg(not(windows))]
const FALLBACK_EDITOR: &str = "vi";

fn editor() -> String {
    ["VISUAL", "EDITOR"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_EDITOR.to_string())
}

/// Open the projects file in the user's editor, creating an empty one first.
///
/// # Errors
///
/// Returns an error if the file cannot be created or the editor cannot be started.
pub fn run(projects_file: &Path) -> Result<ExitCode, Box<dyn std::error::Error>> {
    if !projects_file.exists() {
        if let Some(parent) = projects_file.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(projects_file, "[]")?;
    }

    let editor = editor();
    let mut words = editor.split_whitespace();
    let program = words.next().unwrap_or(FALLBACK_EDITOR);
    debug!("Opening {} with {editor}", projects_file.display());
    let status = Command::new(program)
        .args(words)
        .arg(projects_file)
        .status()?;
    Ok(if status.success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Report a store that failed to load and, when interactive, offer to open it for repair.
///
/// # Errors
///
/// Returns an error if prompting or starting the editor fails.
pub fn offer_repair(
    error: &StoreError,
    projects_file: &Path,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    eprintln!("Error: {error}");
    if !matches!(error, StoreError::Parse { .. })
        || !std::io::stdin().is_terminal()
        || !std::io::stderr().is_terminal()
    {
        return Ok(ExitCode::FAILURE);
    }

    let open = inquire::Confirm::new("Open the projects file to fix it?")
        .with_default(true)
        .prompt_skippable()?
        .unwrap_or(false);
    if open {
        run(projects_file)?;
    }
    Ok(ExitCode::FAILURE)
}
