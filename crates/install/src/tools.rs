//! Tool identifier translation between Claude-style and Vibe-style hosts.

use std::collections::BTreeMap;

/// Default mapping from Claude tool names to Vibe tool names.
const VIBE_TOOLS: &[(&str, &str)] = &[
    ("Read", "read_file"),
    ("Write", "write_file"),
    ("Bash", "bash"),
    ("Glob", "list_dir"),
    ("Grep", "grep"),
    ("AskUserQuestion", "ask_user_question"),
    ("Task", "task"),
];

/// Immutable tool-name translation table.
///
/// Unknown identifiers map to themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolMap {
    entries: BTreeMap<String, String>,
}

impl ToolMap {
    /// Translates a tool identifier, passing unknown ones through.
    pub fn map<'a>(&'a self, tool: &'a str) -> &'a str {
        self.entries.get(tool).map(String::as_str).unwrap_or(tool)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ToolMap {
    fn default() -> Self {
        VIBE_TOOLS.iter().copied().collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ToolMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
