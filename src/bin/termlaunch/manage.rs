use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;

use termlaunch::replay::ReplayError;
use termlaunch::store::{PickItem, ProjectStore};
use termlaunch::workspace::Workspace;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Project name (defaults to the project of the current workspace)
    name: Option<String>,
}

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Project name
    name: String,
}

#[derive(Args, Debug)]
pub struct GroupArgs {
    /// Project name
    project: String,
    /// Group name
    group: String,
}

#[derive(Args, Debug)]
pub struct RemoveCommandArgs {
    /// Project name
    project: String,
    /// Group name
    group: String,
    /// Command name (the first command with this name is removed)
    command: String,
}

#[derive(Args, Debug)]
pub struct SetRootArgs {
    /// Project name
    project: String,
    /// New root directory
    path: PathBuf,
}

pub fn list(store: &ProjectStore) -> ExitCode {
    for line in list_lines(&store.pick_items()) {
        println!("{line}");
    }
    ExitCode::SUCCESS
}

/// Labels padded to a common width. Padding counts characters, so the width
/// does too.
fn list_lines(items: &[PickItem]) -> Vec<String> {
    let width = items
        .iter()
        .map(|i| i.label.chars().count())
        .max()
        .unwrap_or(0);
    items
        .iter()
        .map(|item| format!("{:<width$}  {}", item.label, item.description))
        .collect()
}

/// # Errors
///
/// Returns an error if the project does not exist.
pub fn show(
    args: &ShowArgs,
    store: &ProjectStore,
    workspace: &Workspace,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let project = match &args.name {
        Some(name) => store
            .project(name)
            .ok_or_else(|| format!("No project named '{name}'"))?,
        None => {
            let root = workspace.root_path_string();
            store
                .exists_with_root_path(&root)
                .ok_or(ReplayError::NoProject(root))?
        }
    };

    println!("{} ({})", project.name, project.root_path);
    for (group, commands) in project.groups.iter() {
        println!("  {group}");
        for command in commands {
            println!("    {}: {}", command.name, command.script);
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// # Errors
///
/// Returns an error if the project does not exist or the store cannot be written.
pub fn add_group(
    args: &GroupArgs,
    store: &mut ProjectStore,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    store.add_group(&args.project, &args.group)?;
    store.save()?;
    println!("Group '{}' saved in '{}'", args.group, args.project);
    Ok(ExitCode::SUCCESS)
}

/// # Errors
///
/// Returns an error if the project does not exist or the store cannot be written.
pub fn remove(
    args: &RemoveArgs,
    store: &mut ProjectStore,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let project = store
        .remove_from_project_list(&args.name)
        .ok_or_else(|| format!("No project named '{}'", args.name))?;
    store.save()?;
    println!("Removed project '{}' ({})", project.name, project.root_path);
    Ok(ExitCode::SUCCESS)
}

/// # Errors
///
/// Returns an error if the project does not exist or the store cannot be written.
pub fn remove_group(
    args: &GroupArgs,
    store: &mut ProjectStore,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match store.remove_group(&args.project, &args.group)? {
        Some(commands) => {
            store.save()?;
            println!(
                "Removed group '{}' with {} commands",
                args.group,
                commands.len()
            );
        }
        None => println!("No group '{}' in '{}'", args.group, args.project),
    }
    Ok(ExitCode::SUCCESS)
}

/// # Errors
///
/// Returns an error if the project does not exist or the store cannot be written.
pub fn remove_command(
    args: &RemoveCommandArgs,
    store: &mut ProjectStore,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match store.remove_command(&args.project, &args.group, &args.command)? {
        Some(command) => {
            store.save()?;
            println!("Removed command '{}' ({})", command.name, command.script);
        }
        None => println!("No command '{}' in group '{}'", args.command, args.group),
    }
    Ok(ExitCode::SUCCESS)
}

/// # Errors
///
/// Returns an error if the project does not exist, the path cannot be made
/// absolute, or the store cannot be written.
pub fn set_root(
    args: &SetRootArgs,
    store: &mut ProjectStore,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let path = std::path::absolute(&args.path)?;
    let root = path.to_string_lossy().into_owned();
    store.update_root_path(&args.project, root.as_str())?;
    store.save()?;
    println!("Root of '{}' is now {root}", args.project);
    Ok(ExitCode::SUCCESS)
}
