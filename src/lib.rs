//! yamlnav: find, resolve, and reverse-search file-path references in
//! YAML documents.
//!
//! The core pipeline parses a YAML document into an offset-carrying node
//! tree, lets a format-aware provider extract file references from it, and
//! resolves each raw path against the workspace. On top of that sit a
//! cursor query (which reference is at this position?), a reverse search
//! (which files reference this one?), and a watch mode that keeps the
//! reverse search current as the workspace changes.

pub mod commands;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod index;
pub mod parser;
pub mod providers;
pub mod registry;
pub mod service;
pub mod types;
pub mod watch;
