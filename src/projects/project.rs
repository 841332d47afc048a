use serde::{Deserialize, Serialize};

use crate::projects::groups::Groups;

/// A saved project, keyed both by its name and by the workspace root it was saved from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub root_path: String,
    #[serde(default)]
    pub groups: Groups,
}

impl Project {
    /// Create a project with no groups.
    #[must_use]
    pub fn new(name: impl Into<String>, root_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            root_path: root_path.into(),
            groups: Groups::default(),
        }
    }

    /// Total number of commands across all groups
    #[must_use]
    pub fn command_count(&self) -> usize {
        self.groups.iter().map(|(_, commands)| commands.len()).sum()
    }
}
