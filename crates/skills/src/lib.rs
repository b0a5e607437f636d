//! Skill discovery, resolution, packaging, and installation.
//!
//! Skills are directories containing a `SKILL.md` file, either directly under
//! the repository root or one level below the `.system` namespace directory.

pub mod archive;
pub mod discover;
pub mod error;
pub mod install;
pub mod package;
pub mod resolve;
pub mod types;

pub use {
    archive::{Archiver, BuiltinArchiver, CommandArchiver, build_archiver},
    discover::{discover, is_skill_dir},
    error::{Error, Result},
    install::Installer,
    package::Packager,
    resolve::{require_any, resolve},
    types::SkillPath,
};
