//! Saving the current workspace as a project, one group at a time

use log::info;
use thiserror::Error;

use crate::projects::command::TerminalCommand;
use crate::prompt::{PromptError, Prompter};
use crate::store::{ProjectStore, StoreError};
use crate::workspace::Workspace;

const ADD_COMMANDS: &str = "Add Commands";
const CANCEL: &str = "Cancel";

#[derive(Error, Debug)]
pub enum SaveError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Prompt(#[from] PromptError),
}

/// How a save ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The user backed out; nothing was written.
    Cancelled,
    Saved {
        project: String,
        group: String,
        commands: Vec<TerminalCommand>,
    },
}

/// Save a group of commands for `workspace`, creating the project if needed.
///
/// # Errors
///
/// Returns `SaveError::Prompt` if asking the user fails, or
/// `SaveError::Store` if the store cannot be updated or written.
pub fn save_project(
    store: &mut ProjectStore,
    workspace: &Workspace,
    prompter: &mut impl Prompter,
) -> Result<SaveOutcome, SaveError> {
    let default_name = workspace.default_project_name();
    let Some(name) = prompter.input("Project name", Some(default_name.as_str()))? else {
        return Ok(SaveOutcome::Cancelled);
    };
    if name.is_empty() {
        prompter.warn("You must define a name for the project.");
        return Ok(SaveOutcome::Cancelled);
    }

    let is_new = !store.exists(&name);
    if !is_new {
        let choice = prompter.choose("Project already exists!", &[ADD_COMMANDS, CANCEL])?;
        if choice != Some(0) {
            return Ok(SaveOutcome::Cancelled);
        }
    }

    let Some((group, commands)) = collect_group(prompter)? else {
        return Ok(SaveOutcome::Cancelled);
    };
    // Only a project that ends up with commands is added
    if is_new {
        store.add_to_project_list(name.as_str(), workspace.root_path_string());
    }
    store_group(store, prompter, name, group, commands)
}

fn store_group(
    store: &mut ProjectStore,
    prompter: &mut impl Prompter,
    project: String,
    group: String,
    commands: Vec<TerminalCommand>,
) -> Result<SaveOutcome, SaveError> {
    store.add_commands(&project, &group, commands.clone())?;
    store.save()?;
    info!(
        "Saved {} commands in group '{group}' of project '{project}'",
        commands.len()
    );
    prompter.info("Commands saved!");
    Ok(SaveOutcome::Saved {
        project,
        group,
        commands,
    })
}

/// Ask for a group name and its commands. `None` if the user gave up before
/// entering at least one command.
fn collect_group(
    prompter: &mut impl Prompter,
) -> Result<Option<(String, Vec<TerminalCommand>)>, PromptError> {
    let group = match prompter.input("Group name", None)? {
        Some(group) if !group.is_empty() => group,
        Some(_) => {
            prompter.warn("You must define a name for the group.");
            return Ok(None);
        }
        None => return Ok(None),
    };

    let mut commands = Vec::new();
    loop {
        let Some(name) = prompter.input("Command name", None)? else {
            break;
        };
        let Some(script) = prompter.input("Command script", None)? else {
            break;
        };
        if name.is_empty() || script.is_empty() {
            prompter.warn("A command needs both a name and a script, skipped.");
        } else {
            commands.push(TerminalCommand { name, script });
        }
        if !prompter.confirm("Command added, do you need to add more?")? {
            break;
        }
    }

    if commands.is_empty() {
        prompter.warn("No commands entered, nothing saved.");
        return Ok(None);
    }
    Ok(Some((group, commands)))
}
