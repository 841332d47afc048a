//! Data types for saved projects
//!
//! A [`project::Project`] owns named [`groups::Groups`] of
//! [`command::TerminalCommand`]s. The layout matches the on-disk JSON document.

pub mod command;
pub mod groups;
pub mod project;
