use std::path::{Path, PathBuf};

// ── Layout constants ────────────────────────────────────────────────────────

/// A directory is a skill if and only if it directly contains this file.
pub const MARKER_FILE: &str = "SKILL.md";

/// Top-level directory whose children are searched one level deeper.
pub const NAMESPACE_DIR: &str = ".system";

/// Token meaning "every discoverable skill".
pub const WILDCARD: &str = "all";

/// Extension appended to a skill path to name its archive.
pub const ARCHIVE_EXTENSION: &str = "skill";

/// Top-level directories never considered as skills, even with a marker file.
pub const IGNORED_TOP_LEVEL_DIRS: &[&str] = &[".git", ".idea", "dist", "node_modules", "scripts"];

// ── Skill path ──────────────────────────────────────────────────────────────

/// Relative, `/`-separated path of a skill under the repository root.
///
/// Either a single directory name (`review`) or a namespaced pair
/// (`.system/creator`). Paths supplied by a caller are taken verbatim.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SkillPath(String);

impl SkillPath {
    /// A skill directly under the repository root.
    pub fn top_level(name: &str) -> Self {
        Self(name.to_owned())
    }

    /// A skill under the `.system` namespace.
    pub fn namespaced(name: &str) -> Self {
        Self(format!("{NAMESPACE_DIR}/{name}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_namespaced(&self) -> bool {
        self.0
            .strip_prefix(NAMESPACE_DIR)
            .is_some_and(|rest| rest.starts_with('/'))
    }

    /// The path relative to the repository root, using native separators.
    pub fn relative_path(&self) -> PathBuf {
        self.0.split('/').filter(|s| !s.is_empty()).collect()
    }

    /// The skill's source directory.
    pub fn source_dir(&self, repo_root: &Path) -> PathBuf {
        repo_root.join(self.relative_path())
    }

    /// `<dist_dir>/<skill path>.skill`
    pub fn archive_file(&self, dist_dir: &Path) -> PathBuf {
        let mut file = dist_dir.join(self.relative_path()).into_os_string();
        file.push(".");
        file.push(ARCHIVE_EXTENSION);
        PathBuf::from(file)
    }
}

impl std::fmt::Display for SkillPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SkillPath {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for SkillPath {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for SkillPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
