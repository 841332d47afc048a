//! JSON-file-backed list of saved projects

use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use thiserror::Error;

use crate::lookup::index_where_field;
use crate::projects::command::TerminalCommand;
use crate::projects::project::Project;

/// Errors that can occur while reading, writing or editing the project store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Unable to read projects file {path}: {source}")]
    Read {
        source: io::Error,
        path: PathBuf,
    },
    #[error("Unable to parse projects file {path}: {source}")]
    Parse {
        source: serde_json::Error,
        path: PathBuf,
    },
    #[error("Unable to write projects file {path}: {source}")]
    Write {
        source: io::Error,
        path: PathBuf,
    },
    #[error("Unable to serialize projects: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("No project named '{0}'")]
    ProjectNotFound(String),
}

/// One row of a project picker: the project name and its root path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickItem {
    pub label: String,
    pub description: String,
}

/// Ordered list of projects bound to the file it is persisted in
#[derive(Debug)]
pub struct ProjectStore {
    path: PathBuf,
    projects: Vec<Project>,
}

impl ProjectStore {
    /// Create an empty store backed by `path`. Nothing is read until [`ProjectStore::load`].
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            projects: Vec::new(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the backing file into memory.
    ///
    /// A missing file is a first run and yields an empty store.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Read` if the file exists but cannot be read, or
    /// `StoreError::Parse` if it is not a list of projects. In both cases the
    /// store is left empty.
    pub fn load(&mut self) -> Result<(), StoreError> {
        self.projects.clear();

        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(
                    "No projects file at {}, starting empty",
                    self.path.display()
                );
                return Ok(());
            }
            Err(e) => {
                return Err(StoreError::Read {
                    source: e,
                    path: self.path.clone(),
                });
            }
        };

        if contents.trim().is_empty() {
            debug!("Projects file {} is empty", self.path.display());
            return Ok(());
        }

        self.projects = serde_json::from_str(&contents).map_err(|e| StoreError::Parse {
            source: e,
            path: self.path.clone(),
        })?;
        debug!(
            "Loaded {} projects from {}",
            self.projects.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Discard in-memory state and read the file again, picking up external edits.
    ///
    /// # Errors
    ///
    /// Same as [`ProjectStore::load`].
    pub fn reload(&mut self) -> Result<(), StoreError> {
        debug!("Reloading projects from {}", self.path.display());
        self.load()
    }

    /// Overwrite the backing file with every project, tab-indented.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Serialize` or `StoreError::Write` if the file
    /// cannot be produced.
    pub fn save(&self) -> Result<(), StoreError> {
        let contents = self.to_json()?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Write {
                source: e,
                path: self.path.clone(),
            })?;
        }
        std::fs::write(&self.path, contents).map_err(|e| StoreError::Write {
            source: e,
            path: self.path.clone(),
        })?;
        debug!(
            "Saved {} projects to {}",
            self.projects.len(),
            self.path.display()
        );
        Ok(())
    }

    /// The document [`ProjectStore::save`] writes.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Serialize` if serialization fails.
    pub fn to_json(&self) -> Result<String, StoreError> {
        let mut buf = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"\t"));
        self.projects.serialize(&mut serializer)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        index_where_field(&self.projects, |p| p.name.as_str(), name)
    }

    fn project_mut(&mut self, name: &str) -> Result<&mut Project, StoreError> {
        let index = self
            .index_of(name)
            .ok_or_else(|| StoreError::ProjectNotFound(name.to_string()))?;
        Ok(&mut self.projects[index])
    }

    #[must_use]
    pub fn exists(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// First project, in insertion order, saved from `root_path`.
    #[must_use]
    pub fn exists_with_root_path(&self, root_path: &str) -> Option<&Project> {
        index_where_field(&self.projects, |p| p.root_path.as_str(), root_path)
            .map(|i| &self.projects[i])
    }

    #[must_use]
    pub fn project(&self, name: &str) -> Option<&Project> {
        self.index_of(name).map(|i| &self.projects[i])
    }

    #[must_use]
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Append a project with no groups. Callers check [`ProjectStore::exists`] first.
    pub fn add_to_project_list(&mut self, name: impl Into<String>, root_path: impl Into<String>) {
        self.projects.push(Project::new(name, root_path));
    }

    /// Remove the first project called `name`.
    pub fn remove_from_project_list(&mut self, name: &str) -> Option<Project> {
        self.index_of(name).map(|i| self.projects.remove(i))
    }

    /// Create an empty group, or empty an existing one.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ProjectNotFound` if there is no such project.
    pub fn add_group(&mut self, project: &str, group: &str) -> Result<(), StoreError> {
        self.project_mut(project)?.groups.insert(group, Vec::new());
        Ok(())
    }

    /// Delete a group, returning its commands. A missing group is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ProjectNotFound` if there is no such project.
    pub fn remove_group(
        &mut self,
        project: &str,
        group: &str,
    ) -> Result<Option<Vec<TerminalCommand>>, StoreError> {
        Ok(self.project_mut(project)?.groups.remove(group))
    }

    /// Replace a group's commands, creating the group if needed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ProjectNotFound` if there is no such project.
    pub fn add_commands(
        &mut self,
        project: &str,
        group: &str,
        commands: Vec<TerminalCommand>,
    ) -> Result<(), StoreError> {
        self.project_mut(project)?.groups.insert(group, commands);
        Ok(())
    }

    /// Remove the first command called `command` from a group. Nothing is
    /// removed when the group or the command does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ProjectNotFound` if there is no such project.
    pub fn remove_command(
        &mut self,
        project: &str,
        group: &str,
        command: &str,
    ) -> Result<Option<TerminalCommand>, StoreError> {
        let Some(commands) = self.project_mut(project)?.groups.get_mut(group) else {
            return Ok(None);
        };
        Ok(index_where_field(commands, |c| c.name.as_str(), command).map(|i| commands.remove(i)))
    }

    /// # Errors
    ///
    /// Returns `StoreError::ProjectNotFound` if there is no such project.
    pub fn update_root_path(
        &mut self,
        project: &str,
        root_path: impl Into<String>,
    ) -> Result<(), StoreError> {
        self.project_mut(project)?.root_path = root_path.into();
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Picker rows, one per project, in store order.
    #[must_use]
    pub fn pick_items(&self) -> Vec<PickItem> {
        self.projects
            .iter()
            .map(|p| PickItem {
                label: p.name.clone(),
                description: p.root_path.clone(),
            })
            .collect()
    }
}
