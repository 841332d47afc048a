use serde::{Deserialize, Serialize};

/// A named script line that is sent to its own terminal
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalCommand {
    pub name: String,
    pub script: String,
}

impl TerminalCommand {
    #[must_use]
    pub fn new(name: impl Into<String>, script: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script: script.into(),
        }
    }
}
