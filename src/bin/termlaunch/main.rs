mod edit;
mod manage;
mod run;
mod save;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use termlaunch::config_file::{LOCATION_ENV, Settings};
use termlaunch::open_store;
use termlaunch::workspace::Workspace;

#[derive(Parser, Debug)]
#[command(
    name = "termlaunch",
    about = "Save grouped terminal commands per project and replay them"
)]
struct Cli {
    /// Settings file (defaults to termlaunch/settings.json in the user config directory)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Directory holding terminal-projects.json
    #[arg(short, long)]
    location: Option<PathBuf>,

    /// Log file path (receives debug logs in addition to stderr)
    #[arg(long)]
    log_file: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Save a group of commands for the current workspace
    Save,
    /// Open the raw projects file in your editor
    Edit,
    /// Open one terminal per saved command of the current workspace
    Run(run::RunArgs),
    /// List saved projects
    List,
    /// Show the groups and commands of a project
    Show(manage::ShowArgs),
    /// Create an empty group, or empty an existing one
    AddGroup(manage::GroupArgs),
    /// Delete a project
    Remove(manage::RemoveArgs),
    /// Delete a group from a project
    RemoveGroup(manage::GroupArgs),
    /// Delete a command from a group
    RemoveCommand(manage::RemoveCommandArgs),
    /// Change the root path a project is replayed from
    SetRoot(manage::SetRootArgs),
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[tokio::main]
async fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let log_file = cli
        .log_file
        .as_ref()
        .map(std::fs::File::create)
        .transpose()?;
    termlaunch::logger::init(log_file);

    let settings = Settings::load(cli.settings.as_deref())?
        .with_overrides(std::env::var(LOCATION_ENV).ok(), cli.location);
    let projects_file = settings.projects_file();

    // Editing works on the raw file, so it must not require a parseable store
    if matches!(cli.command, Commands::Edit) {
        return edit::run(&projects_file);
    }

    let mut store = match open_store(&settings) {
        Ok(store) => store,
        Err(e) => return edit::offer_repair(&e, &projects_file),
    };
    let workspace = Workspace::discover(&std::env::current_dir()?);

    match cli.command {
        Commands::Save => save::run(&mut store, &workspace),
        Commands::Run(ref args) => run::run(args, &store, &workspace).await,
        Commands::List => Ok(manage::list(&store)),
        Commands::Show(ref args) => manage::show(args, &store, &workspace),
        Commands::AddGroup(ref args) => manage::add_group(args, &mut store),
        Commands::Remove(ref args) => manage::remove(args, &mut store),
        Commands::RemoveGroup(ref args) => manage::remove_group(args, &mut store),
        Commands::RemoveCommand(ref args) => manage::remove_command(args, &mut store),
        Commands::SetRoot(ref args) => manage::set_root(args, &mut store),
        Commands::Edit => unreachable!("handled before loading the store"),
    }
}
