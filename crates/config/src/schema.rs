//! Config schema types (archiver selection, runtime home, external tools).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillpackConfig {
    /// Output directory for built archives. Relative paths are resolved
    /// against the repository root. Defaults to `<repo>/dist`.
    pub dist_dir: Option<PathBuf>,
    pub archiver: ArchiverKind,
    pub runtime: RuntimeConfig,
    pub tools: ToolsConfig,
}

/// Which archive backend packs and unpacks skills.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiverKind {
    /// Shell out to `zip` / `unzip`.
    #[default]
    Command,
    /// In-process zip implementation.
    Builtin,
}

impl std::fmt::Display for ArchiverKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Command => write!(f, "command"),
            Self::Builtin => write!(f, "builtin"),
        }
    }
}

impl std::str::FromStr for ArchiverKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "command" => Ok(Self::Command),
            "builtin" => Ok(Self::Builtin),
            other => Err(format!(
                "unknown archiver '{other}' (expected 'command' or 'builtin')"
            )),
        }
    }
}

/// Where installed skills land.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Runtime home. `CODEX_HOME` and `--codex-home` take precedence.
    pub home: Option<PathBuf>,
    /// Subdirectory of the runtime home that receives expanded archives.
    pub skills_subdir: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            home: None,
            skills_subdir: "skills".into(),
        }
    }
}

/// External programs used by the command archiver.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub zip: String,
    pub unzip: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            zip: "zip".into(),
            unzip: "unzip".into(),
        }
    }
}
