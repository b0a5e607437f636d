use std::path::Path;

use crate::{
    error::Result,
    types::{IGNORED_TOP_LEVEL_DIRS, MARKER_FILE, NAMESPACE_DIR, SkillPath},
};

/// Whether `<repo_root>/<path>` directly contains a `SKILL.md` file.
pub fn is_skill_dir(repo_root: &Path, path: &SkillPath) -> bool {
    path.source_dir(repo_root).join(MARKER_FILE).is_file()
}

/// Scan the repository root for skills.
///
/// Top-level directories are admitted by their own `SKILL.md`; the children of
/// `.system` are admitted one level deeper as `.system/<name>`. Ignored
/// top-level directories and directories without a marker file are skipped
/// silently. The result is sorted by string form.
pub fn discover(repo_root: &Path) -> Result<Vec<SkillPath>> {
    let mut skills = Vec::new();

    for name in child_dirs(repo_root)? {
        if IGNORED_TOP_LEVEL_DIRS.contains(&name.as_str()) {
            continue;
        }

        if name == NAMESPACE_DIR {
            discover_namespace(repo_root, &mut skills);
            continue;
        }

        let path = SkillPath::top_level(&name);
        if is_skill_dir(repo_root, &path) {
            tracing::debug!(skill = %path, "discovered skill");
            skills.push(path);
        }
    }

    skills.sort();
    Ok(skills)
}

/// Scan `.system/*`. A missing or unreadable namespace contributes nothing.
fn discover_namespace(repo_root: &Path, skills: &mut Vec<SkillPath>) {
    let namespace_root = repo_root.join(NAMESPACE_DIR);
    if !namespace_root.is_dir() {
        return;
    }

    let names = match child_dirs(&namespace_root) {
        Ok(names) => names,
        Err(e) => {
            tracing::warn!(path = %namespace_root.display(), %e, "failed to read namespace dir");
            return;
        },
    };

    for name in names {
        let path = SkillPath::namespaced(&name);
        if is_skill_dir(repo_root, &path) {
            tracing::debug!(skill = %path, "discovered namespaced skill");
            skills.push(path);
        }
    }
}

/// Names of the immediate subdirectories of `dir`. Symlinks are not followed
/// when classifying entries; names that are not valid UTF-8 are skipped.
fn child_dirs(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => {
                tracing::warn!(name = ?raw, dir = %dir.display(), "skipping non UTF-8 directory name");
            },
        }
    }
    Ok(names)
}
