//! Replaying a project: one terminal per command, group by group
//!
//! The first command of every group opens a new terminal window and the
//! remaining commands of that group are split into it. Terminals are opened,
//! named and fed their script strictly one after another.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use anstyle::{AnsiColor, Reset, Style};
use log::{debug, warn};
use parking_lot::Mutex;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, Command};
use tokio::task::JoinHandle;

use crate::projects::command::TerminalCommand;
use crate::projects::project::Project;

#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("No saved project for {0}")]
    NoProject(String),
    #[error("Unable to start shell: {0}")]
    Spawn(#[source] io::Error),
    #[error("Terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Where a terminal is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    NewWindow,
    Split,
}

/// One terminal to open while replaying
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchStep<'a> {
    pub group: &'a str,
    pub command: &'a TerminalCommand,
    pub placement: Placement,
}

/// Every terminal a replay of `project` opens, in order.
#[must_use]
pub fn launch_plan(project: &Project) -> Vec<LaunchStep<'_>> {
    project
        .groups
        .iter()
        .flat_map(|(group, commands)| {
            commands.iter().enumerate().map(move |(i, command)| LaunchStep {
                group,
                command,
                placement: if i == 0 {
                    Placement::NewWindow
                } else {
                    Placement::Split
                },
            })
        })
        .collect()
}

/// Something that can open terminals
#[allow(async_fn_in_trait)]
pub trait TerminalHost {
    type Terminal: Terminal;

    /// Open a terminal and wait until it is ready for input.
    ///
    /// # Errors
    ///
    /// Returns `ReplayError` if the terminal cannot be opened.
    async fn open(&mut self, placement: Placement) -> Result<Self::Terminal, ReplayError>;
}

/// An open terminal
#[allow(async_fn_in_trait)]
pub trait Terminal {
    /// # Errors
    ///
    /// Returns `ReplayError` if the terminal is gone.
    async fn rename(&mut self, name: &str) -> Result<(), ReplayError>;

    /// Type `text` into the terminal, followed by a newline when `add_new_line` is set.
    ///
    /// # Errors
    ///
    /// Returns `ReplayError` if the text cannot be delivered.
    async fn send_text(&mut self, text: &str, add_new_line: bool) -> Result<(), ReplayError>;
}

/// Open, name and start one terminal per command of `project`.
///
/// Returns the number of terminals opened.
///
/// # Errors
///
/// Stops at and returns the first error reported by the host.
pub async fn replay<H: TerminalHost>(project: &Project, host: &mut H) -> Result<usize, ReplayError> {
    let steps = launch_plan(project);
    for step in &steps {
        debug!(
            "Opening {:?} terminal for '{}' in group '{}'",
            step.placement, step.command.name, step.group
        );
        let mut terminal = host.open(step.placement).await?;
        terminal.rename(&step.command.name).await?;
        terminal.send_text(&step.command.script, true).await?;
    }
    Ok(steps.len())
}

const WINDOW_COLORS: [AnsiColor; 5] = [
    AnsiColor::Cyan,
    AnsiColor::Magenta,
    AnsiColor::Blue,
    AnsiColor::Green,
    AnsiColor::Yellow,
];

/// Prefix colour per terminal: a new window takes the next colour, a split
/// keeps the colour of the window it is split into.
#[derive(Debug, Default)]
pub struct WindowColors {
    windows: usize,
}

impl WindowColors {
    pub fn next(&mut self, placement: Placement) -> AnsiColor {
        if placement == Placement::NewWindow || self.windows == 0 {
            self.windows += 1;
        }
        WINDOW_COLORS[(self.windows - 1) % WINDOW_COLORS.len()]
    }
}

/// One line printed by a terminal of [`ProcessHost`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    /// Name of the terminal at the time the line was read
    pub terminal: String,
    pub color: AnsiColor,
    pub stderr: bool,
    pub text: String,
}

impl OutputLine {
    /// The line with its coloured terminal-name prefix.
    #[must_use]
    pub fn render(&self) -> String {
        let style = Style::new().fg_color(Some(anstyle::Color::Ansi(self.color)));
        format!("{style}{} |{Reset} {}", self.terminal, self.text)
    }
}

/// Receives every output line of every terminal
pub type LineSink = Arc<dyn Fn(OutputLine) + Send + Sync>;

fn print_line(line: OutputLine) {
    if line.stderr {
        eprintln!("{}", line.render());
    } else {
        println!("{}", line.render());
    }
}

/// [`TerminalHost`] that runs every terminal as a `sh` child of this process.
///
/// Output lines are prefixed with the terminal's name. Terminals split into
/// the same window share a prefix colour.
pub struct ProcessHost {
    cwd: PathBuf,
    children: Vec<(Arc<Mutex<String>>, Child)>,
    forwarders: Vec<JoinHandle<()>>,
    colors: WindowColors,
    sink: LineSink,
}

impl ProcessHost {
    /// Host printing terminal output to this process's stdout and stderr.
    #[must_use]
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self::with_sink(cwd, Arc::new(print_line))
    }

    /// Host handing terminal output to `sink` instead of printing it.
    #[must_use]
    pub fn with_sink(cwd: impl Into<PathBuf>, sink: LineSink) -> Self {
        Self {
            cwd: cwd.into(),
            children: Vec::new(),
            forwarders: Vec::new(),
            colors: WindowColors::default(),
            sink,
        }
    }

    #[must_use]
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Wait for every shell to exit and all output to be forwarded.
    ///
    /// Returns the number of shells that exited unsuccessfully.
    ///
    /// # Errors
    ///
    /// Returns `ReplayError::Io` with the first failure to wait on a child,
    /// after every other child has been waited on.
    pub async fn wait(self) -> Result<usize, ReplayError> {
        let mut failures = 0;
        let mut first_error = None;
        for (label, mut child) in self.children {
            match child.wait().await {
                Ok(status) if status.success() => {}
                Ok(status) => {
                    warn!("Terminal '{}' exited with {status}", label.lock());
                    failures += 1;
                }
                Err(e) => {
                    warn!("Unable to wait for terminal '{}': {e}", label.lock());
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }
        for forwarder in self.forwarders {
            if let Err(e) = forwarder.await {
                warn!("Output forwarder failed: {e}");
            }
        }
        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(failures),
        }
    }
}

impl TerminalHost for ProcessHost {
    type Terminal = ProcessTerminal;

    async fn open(&mut self, placement: Placement) -> Result<ProcessTerminal, ReplayError> {
        let color = self.colors.next(placement);

        let mut child = Command::new("sh")
            .current_dir(&self.cwd)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(ReplayError::Spawn)?;

        let label = Arc::new(Mutex::new(format!("terminal-{}", self.children.len() + 1)));
        if let Some(stdout) = child.stdout.take() {
            self.forwarders.push(tokio::spawn(forward_lines(
                stdout,
                label.clone(),
                color,
                false,
                self.sink.clone(),
            )));
        }
        if let Some(stderr) = child.stderr.take() {
            self.forwarders.push(tokio::spawn(forward_lines(
                stderr,
                label.clone(),
                color,
                true,
                self.sink.clone(),
            )));
        }
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::other("shell stdin is not piped"))?;

        self.children.push((label.clone(), child));
        Ok(ProcessTerminal { label, stdin })
    }
}

/// A `sh` child opened by [`ProcessHost`]. Dropping it closes the shell's
/// input, so the shell exits once the text sent so far has run.
pub struct ProcessTerminal {
    label: Arc<Mutex<String>>,
    stdin: ChildStdin,
}

impl Terminal for ProcessTerminal {
    async fn rename(&mut self, name: &str) -> Result<(), ReplayError> {
        *self.label.lock() = name.to_string();
        Ok(())
    }

    async fn send_text(&mut self, text: &str, add_new_line: bool) -> Result<(), ReplayError> {
        self.stdin.write_all(text.as_bytes()).await?;
        if add_new_line {
            self.stdin.write_all(b"\n").await?;
        }
        self.stdin.flush().await?;
        Ok(())
    }
}

/// Forward `reader` line by line until EOF. Bytes that are not UTF-8 are
/// replaced, never dropped, so the pipe stays drained for the shell.
async fn forward_lines<R>(
    reader: R,
    label: Arc<Mutex<String>>,
    color: AnsiColor,
    stderr: bool,
    sink: LineSink,
) where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = buf.strip_suffix(b"\n").unwrap_or(buf.as_slice());
                let line = line.strip_suffix(b"\r").unwrap_or(line);
                let terminal = label.lock().clone();
                sink(OutputLine {
                    terminal,
                    color,
                    stderr,
                    text: String::from_utf8_lossy(line).into_owned(),
                });
            }
            Err(e) => {
                warn!("Reading output of '{}' failed: {e}", label.lock());
                break;
            }
        }
    }
}
