use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::schema::SkillpackConfig;

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "skillpack.toml",
    "skillpack.yaml",
    "skillpack.yml",
    "skillpack.json",
];

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> anyhow::Result<SkillpackConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    parse_config(&raw, path)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `<repo_root>/skillpack.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/skillpack/skillpack.{toml,yaml,yml,json}` (user-global)
///
/// Returns `SkillpackConfig::default()` if no config file is found or the
/// file fails to parse.
pub fn discover_and_load(repo_root: &Path) -> SkillpackConfig {
    if let Some(path) = find_config_file(repo_root) {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => return cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            },
        }
    } else {
        debug!("no config file found, using defaults");
    }
    SkillpackConfig::default()
}

/// Find the first config file in standard locations.
pub fn find_config_file(repo_root: &Path) -> Option<PathBuf> {
    if let Some(p) = first_existing(repo_root) {
        return Some(p);
    }
    config_dir().and_then(|dir| first_existing(&dir))
}

fn first_existing(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.is_file())
}

/// Returns the user-global config directory (`~/.config/skillpack/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "skillpack").map(|d| d.config_dir().to_path_buf())
}

fn parse_config(raw: &str, path: &Path) -> anyhow::Result<SkillpackConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}
