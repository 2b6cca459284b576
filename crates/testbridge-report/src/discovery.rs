// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Test discovery parsing
//!
//! Parses the plain-text output of `<binary> --list`:
//!
//! ```text
//! MyHobbesTest
//!   Arrays
//!   Compiler
//! ```
//!
//! Every line becomes one entry with an empty child list. Indentation is not
//! interpreted, and blank lines are kept as entries with an empty name.

use serde::{Deserialize, Serialize};

/// Flat list of discovered names
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiscoveryTree {
    /// Entries in output order
    pub entries: Vec<DiscoveryEntry>,
}

impl DiscoveryTree {
    /// Check if nothing was listed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries, blank ones included
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Non-blank names, suitable for `--tests` selection
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|e| e.name.as_str())
            .filter(|n| !n.is_empty())
            .collect()
    }
}

/// A discovered name and its (always empty) children
///
/// Serialised as a `[name, children]` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, Vec<String>)", into = "(String, Vec<String>)")]
pub struct DiscoveryEntry {
    /// Trimmed line text
    pub name: String,
    /// Second naming level, never populated by this adapter
    pub children: Vec<String>,
}

impl DiscoveryEntry {
    /// Create an entry with no children
    #[must_use]
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }
}

impl From<(String, Vec<String>)> for DiscoveryEntry {
    fn from((name, children): (String, Vec<String>)) -> Self {
        Self { name, children }
    }
}

impl From<DiscoveryEntry> for (String, Vec<String>) {
    fn from(entry: DiscoveryEntry) -> Self {
        (entry.name, entry.children)
    }
}

/// Parse `--list` output into a discovery tree
#[must_use]
pub fn parse_discovery_output(output: &str) -> DiscoveryTree {
    let entries = output
        .lines()
        .map(|line| DiscoveryEntry::leaf(line.trim()))
        .collect();
    DiscoveryTree { entries }
}
