use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::lookup::index_where_field;
use crate::projects::command::TerminalCommand;

/// Named command groups of a project, kept in insertion order.
///
/// Serialized as a JSON object whose key order is the group order, which is
/// also the order groups are replayed in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Groups {
    entries: Vec<(String, Vec<TerminalCommand>)>,
}

impl Groups {
    fn position(&self, name: &str) -> Option<usize> {
        index_where_field(&self.entries, |(group, _)| group.as_str(), name)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Vec<TerminalCommand>> {
        self.position(name).map(|i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Vec<TerminalCommand>> {
        self.position(name).map(|i| &mut self.entries[i].1)
    }

    /// Set the commands of a group. An existing group keeps its position and
    /// its previous commands are returned; a new group is appended.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        commands: Vec<TerminalCommand>,
    ) -> Option<Vec<TerminalCommand>> {
        let name = name.into();
        match self.position(&name) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, commands)),
            None => {
                self.entries.push((name, commands));
                None
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<TerminalCommand>> {
        self.position(name).map(|i| self.entries.remove(i).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[TerminalCommand])> {
        self.entries
            .iter()
            .map(|(name, commands)| (name.as_str(), commands.as_slice()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>> FromIterator<(N, Vec<TerminalCommand>)> for Groups {
    fn from_iter<I: IntoIterator<Item = (N, Vec<TerminalCommand>)>>(iter: I) -> Self {
        let mut groups = Groups::default();
        for (name, commands) in iter {
            groups.insert(name, commands);
        }
        groups
    }
}

impl Serialize for Groups {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, commands) in &self.entries {
            map.serialize_entry(name, commands)?;
        }
        map.end()
    }
}

struct GroupsVisitor;

impl<'de> Visitor<'de> for GroupsVisitor {
    type Value = Groups;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of group names to command lists")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut groups = Groups::default();
        // Repeated keys overwrite the earlier value in place
        while let Some((name, commands)) = access.next_entry::<String, Vec<TerminalCommand>>()? {
            groups.insert(name, commands);
        }
        Ok(groups)
    }
}

impl<'de> Deserialize<'de> for Groups {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(GroupsVisitor)
    }
}
