//! Ignore-rule filtering for the walker.

use crate::error::IgnoreError;
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use ignore::Match;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A rule from the ignore file, for tracing why a path was excluded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnoreRule {
    /// 1-based line number in the rule file
    pub line: usize,
    /// Rule text, trailing whitespace removed unless escaped
    pub pattern: String,
}

/// Outcome of matching one path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreDecision {
    pub excluded: bool,
    /// Rule that excluded the path. `None` with `excluded` set means a hidden entry.
    pub reason: Option<IgnoreRule>,
}

impl IgnoreDecision {
    fn keep() -> Self {
        Self {
            excluded: false,
            reason: None,
        }
    }

    fn hidden() -> Self {
        Self {
            excluded: true,
            reason: None,
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.excluded && self.reason.is_none()
    }
}

/// Decides which paths the walker skips.
///
/// Entries whose name starts with `.` or `_` are always skipped, before any
/// rule is looked at. Everything else goes through the compiled gitignore rules.
#[derive(Debug, Clone)]
pub struct IgnoreMatcher {
    gitignore: Gitignore,
    rules: Vec<IgnoreRule>,
}

impl IgnoreMatcher {
    /// Compile the rule file at `path`, anchored at the directory that contains it
    pub fn from_file(path: &Path) -> Result<Self, IgnoreError> {
        let text = fs::read_to_string(path).map_err(|source| IgnoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let root = path
            .canonicalize()
            .ok()
            .and_then(|p| p.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));
        Self::compile(&root, Some(path), &text)
    }

    /// Compile rules held in memory, anchored at `root`
    pub fn from_rules(root: &Path, text: &str) -> Result<Self, IgnoreError> {
        Self::compile(root, None, text)
    }

    /// A matcher with no rules; only hidden entries are excluded
    pub fn empty() -> Self {
        Self {
            gitignore: Gitignore::empty(),
            rules: Vec::new(),
        }
    }

    fn compile(root: &Path, source: Option<&Path>, text: &str) -> Result<Self, IgnoreError> {
        let origin = source.map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
        let compile_error = |reason: String| IgnoreError::Compile {
            path: origin.clone(),
            reason,
        };

        let mut builder = GitignoreBuilder::new(root);
        let mut rules = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            let pattern = normalize_rule(line);
            if pattern.is_empty() || pattern.starts_with('#') {
                continue;
            }
            builder
                .add_line(source.map(Path::to_path_buf), line)
                .map_err(|e| compile_error(e.to_string()))?;
            rules.push(IgnoreRule {
                line: idx + 1,
                pattern: pattern.to_string(),
            });
        }
        let gitignore = builder.build().map_err(|e| compile_error(e.to_string()))?;

        tracing::debug!(rules = rules.len(), root = %root.display(), "compiled ignore rules");
        Ok(Self { gitignore, rules })
    }

    /// Number of rules compiled
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Decide whether `path` is excluded
    pub fn decide(&self, path: &Path, is_dir: bool) -> IgnoreDecision {
        if is_hidden(path) {
            return IgnoreDecision::hidden();
        }

        match self.gitignore.matched(path, is_dir) {
            Match::Ignore(glob) => IgnoreDecision {
                excluded: true,
                reason: Some(self.rule_for(glob.original())),
            },
            Match::Whitelist(_) | Match::None => IgnoreDecision::keep(),
        }
    }

    /// Later rules take precedence in gitignore, so search from the end
    fn rule_for(&self, original: &str) -> IgnoreRule {
        self.rules
            .iter()
            .rev()
            .find(|rule| rule.pattern == original)
            .cloned()
            .unwrap_or_else(|| IgnoreRule {
                line: 0,
                pattern: original.to_string(),
            })
    }
}

/// Trailing whitespace is dropped unless the last space is escaped,
/// matching how `GitignoreBuilder` stores a glob's original text
fn normalize_rule(line: &str) -> &str {
    if line.ends_with("\\ ") {
        line
    } else {
        line.trim_end()
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with(['.', '_']))
        .unwrap_or(false)
}
