use std::path::{Path, PathBuf};

use crate::{
    archive::Archiver,
    error::{Error, Result},
    types::SkillPath,
};

/// Builds one `.skill` archive per skill into the dist directory.
pub struct Packager<'a> {
    repo_root: PathBuf,
    dist_dir: PathBuf,
    archiver: &'a dyn Archiver,
}

impl<'a> Packager<'a> {
    pub fn new(repo_root: PathBuf, dist_dir: PathBuf, archiver: &'a dyn Archiver) -> Self {
        Self {
            repo_root,
            dist_dir,
            archiver,
        }
    }

    pub fn dist_dir(&self) -> &Path {
        &self.dist_dir
    }

    /// Package a single skill, replacing any archive left by a previous build.
    ///
    /// Nothing is written when the skill's source directory is missing.
    pub fn package(&self, skill: &SkillPath) -> Result<PathBuf> {
        let source = skill.source_dir(&self.repo_root);
        if !source.is_dir() {
            return Err(Error::MissingSourceDirectory { path: source });
        }

        let out_file = skill.archive_file(&self.dist_dir);
        if let Some(parent) = out_file.parent() {
            std::fs::create_dir_all(parent)?;
        }
        // Also catches a dangling symlink, which `exists()` reports as absent.
        if std::fs::symlink_metadata(&out_file).is_ok() {
            std::fs::remove_file(&out_file)?;
        }

        self.archiver.pack(&self.repo_root, skill, &out_file)?;
        tracing::info!(%skill, archive = %out_file.display(), "packaged skill");
        Ok(out_file)
    }

    /// Package each skill in order, stopping at the first failure. Archives
    /// already written are left in place.
    pub fn package_all(&self, skills: &[SkillPath]) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(&self.dist_dir)?;
        skills.iter().map(|skill| self.package(skill)).collect()
    }
}
