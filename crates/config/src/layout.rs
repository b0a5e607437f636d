//! Resolution of the directories a run reads from and writes to.

use std::path::{Path, PathBuf};

use crate::schema::{RuntimeConfig, SkillpackConfig};

/// Directory name of the default runtime home under the user's home.
const DEFAULT_HOME_DIR: &str = ".codex";

/// Resolved runtime directories, fixed for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeLayout {
    pub home: PathBuf,
    pub skills_dir: PathBuf,
}

impl RuntimeLayout {
    /// Resolve the runtime home in precedence order: `explicit_home` (the
    /// `--codex-home` flag or `CODEX_HOME`), then `runtime.home` from the
    /// config file, then `~/.codex`.
    pub fn resolve(explicit_home: Option<PathBuf>, runtime: &RuntimeConfig) -> anyhow::Result<Self> {
        let home = match explicit_home.or_else(|| runtime.home.clone()) {
            Some(home) => home,
            None => default_home()?,
        };
        Ok(Self::new(home, &runtime.skills_subdir))
    }

    pub fn new(home: PathBuf, skills_subdir: &str) -> Self {
        let skills_dir = home.join(skills_subdir);
        Self { home, skills_dir }
    }
}

fn default_home() -> anyhow::Result<PathBuf> {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(DEFAULT_HOME_DIR))
        .ok_or_else(|| anyhow::anyhow!("could not determine the user's home directory"))
}

/// Output directory for built archives: `explicit` (the `--dist-dir` flag),
/// then `dist_dir` from the config, then `<repo_root>/dist`. Relative paths
/// are anchored at the repository root.
pub fn resolve_dist_dir(
    repo_root: &Path,
    explicit: Option<PathBuf>,
    config: &SkillpackConfig,
) -> PathBuf {
    let dir = explicit
        .or_else(|| config.dist_dir.clone())
        .unwrap_or_else(|| PathBuf::from("dist"));
    if dir.is_absolute() {
        dir
    } else {
        repo_root.join(dir)
    }
}
