use std::process::ExitCode;

use clap::Args;
use log::info;

use termlaunch::replay::{Placement, ProcessHost, ReplayError, launch_plan, replay};
use termlaunch::store::ProjectStore;
use termlaunch::workspace::Workspace;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Print the terminals that would be opened without starting them
    #[arg(long)]
    dry_run: bool,
}

/// Replay the project saved for the current workspace.
///
/// # Errors
///
/// Returns `ReplayError::NoProject` if nothing is saved for the workspace, or
/// an error if a shell cannot be started.
pub async fn run(
    args: &RunArgs,
    store: &ProjectStore,
    workspace: &Workspace,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let root = workspace.root_path_string();
    let project = store
        .exists_with_root_path(&root)
        .ok_or(ReplayError::NoProject(root))?;

    if args.dry_run {
        for step in launch_plan(project) {
            let marker = match step.placement {
                Placement::NewWindow => "+",
                Placement::Split => "|",
            };
            println!(
                "{marker} [{}] {}: {}",
                step.group, step.command.name, step.command.script
            );
        }
        return Ok(ExitCode::SUCCESS);
    }

    let mut host = ProcessHost::new(workspace.root());
    let opened = replay(project, &mut host).await?;
    info!(
        "Started {opened} terminals for '{}' in {}",
        project.name,
        host.cwd().display()
    );

    let failures = host.wait().await?;
    Ok(if failures == 0 {
        ExitCode::SUCCESS
    } else {
        eprintln!("{failures} of {opened} terminals failed");
        ExitCode::FAILURE
    })
}
