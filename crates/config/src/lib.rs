//! Configuration loading and runtime layout resolution.
//!
//! Config files: `skillpack.toml`, `skillpack.yaml`, or `skillpack.json`
//! Searched in the repository root, then `~/.config/skillpack/`.
//!
//! Every value here is resolved once at startup and passed explicitly to the
//! packager and installer; nothing reads the environment later.

pub mod layout;
pub mod loader;
pub mod schema;

pub use {
    layout::{RuntimeLayout, resolve_dist_dir},
    loader::{config_dir, discover_and_load, find_config_file, load_config},
    schema::{ArchiverKind, RuntimeConfig, SkillpackConfig, ToolsConfig},
};
