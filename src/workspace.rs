//! The directory a project is saved from and replayed in

use std::path::{Path, PathBuf};

use log::debug;

/// Root directory of the current workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The git work tree containing `start`, or `start` itself outside a repository.
    #[must_use]
    pub fn discover(start: &Path) -> Self {
        match git2::Repository::discover(start) {
            Ok(repo) => match repo.workdir() {
                Some(workdir) => {
                    let root = workdir.components().as_path().to_path_buf();
                    debug!("Workspace root from git: {}", root.display());
                    Self::new(root)
                }
                None => Self::new(start),
            },
            Err(e) => {
                debug!("No git repository at {}: {}", start.display(), e.message());
                Self::new(start)
            }
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The root as stored in a project's `root_path`.
    #[must_use]
    pub fn root_path_string(&self) -> String {
        self.root.to_string_lossy().into_owned()
    }

    /// Last component of the root, suggested as the project name.
    #[must_use]
    pub fn default_project_name(&self) -> String {
        self.root.file_name().map_or_else(
            || self.root_path_string(),
            |name| name.to_string_lossy().into_owned(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_project_name() {
        assert_eq!(
            Workspace::new("/home/me/code/demo").default_project_name(),
            "demo"
        );
        assert_eq!(Workspace::new("/").default_project_name(), "/");
    }

    #[test]
    fn test_discover_outside_repo() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::discover(dir.path());
        // tempdirs are not inside a repository on a normal machine
        if git2::Repository::discover(dir.path()).is_err() {
            assert_eq!(workspace.root(), dir.path());
        }
    }

    #[test]
    fn test_discover_repo_root_from_subdir() {
        let dir = tempfile::tempdir().unwrap();
        git2::Repository::init(dir.path()).unwrap();
        let nested = dir.path().join("src/deep");
        std::fs::create_dir_all(&nested).unwrap();

        let workspace = Workspace::discover(&nested);
        assert_eq!(
            workspace.root().canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
    }
}
