use std::path::{Path, PathBuf};

use crate::{
    archive::Archiver,
    error::{Error, Result},
    types::SkillPath,
};

/// Expands built archives into the runtime skills directory.
pub struct Installer<'a> {
    dist_dir: PathBuf,
    skills_dir: PathBuf,
    archiver: &'a dyn Archiver,
}

impl<'a> Installer<'a> {
    pub fn new(dist_dir: PathBuf, skills_dir: PathBuf, archiver: &'a dyn Archiver) -> Self {
        Self {
            dist_dir,
            skills_dir,
            archiver,
        }
    }

    pub fn skills_dir(&self) -> &Path {
        &self.skills_dir
    }

    /// Install one skill from its archive. Entries already present in the
    /// skills directory are overwritten; other entries are kept.
    ///
    /// The skills directory is only created once the archive is known to
    /// exist, so a missing archive leaves the runtime untouched.
    pub fn install(&self, skill: &SkillPath) -> Result<PathBuf> {
        let archive = skill.archive_file(&self.dist_dir);
        if !archive.is_file() {
            return Err(Error::MissingArchive {
                archive,
                skill: skill.clone(),
            });
        }

        std::fs::create_dir_all(&self.skills_dir)?;
        self.archiver.unpack(&archive, &self.skills_dir)?;

        let installed = skill.source_dir(&self.skills_dir);
        tracing::info!(%skill, path = %installed.display(), "installed skill");
        Ok(installed)
    }

    /// Install each skill in order, stopping at the first failure. Skills
    /// installed before the failure stay installed.
    pub fn install_all(&self, skills: &[SkillPath]) -> Result<Vec<PathBuf>> {
        skills.iter().map(|skill| self.install(skill)).collect()
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{archive::BuiltinArchiver, package::Packager, types::MARKER_FILE},
    };

    fn built(skills: &[&str]) -> (tempfile::TempDir, PathBuf) {
        let tmp = tempfile::tempdir().unwrap();
        for rel in skills {
            let dir = tmp.path().join(rel);
            std::fs::create_dir_all(&dir).unwrap();
            std::fs::write(dir.join(MARKER_FILE), format!("skill {rel}")).unwrap();
        }
        let dist = tmp.path().join("dist");
        let paths: Vec<SkillPath> = skills.iter().copied().map(SkillPath::from).collect();
        Packager::new(tmp.path().to_path_buf(), dist.clone(), &BuiltinArchiver)
            .package_all(&paths)
            .unwrap();
        (tmp, dist)
    }

    #[test]
    fn missing_archive_leaves_runtime_untouched() {
        let (tmp, dist) = built(&[]);
        let runtime = tmp.path().join("home/skills");
        let installer = Installer::new(dist, runtime.clone(), &BuiltinArchiver);

        let err = installer.install(&SkillPath::top_level("nope")).unwrap_err();
        assert!(matches!(err, Error::MissingArchive { ref skill, .. } if skill.as_str() == "nope"));
        assert!(err.to_string().contains("skillpack build nope"));
        assert!(!runtime.exists());
    }

    #[test]
    fn existing_runtime_contents_survive_missing_archive() {
        let (tmp, dist) = built(&[]);
        let runtime = tmp.path().join("home/skills");
        std::fs::create_dir_all(runtime.join("other")).unwrap();
        std::fs::write(runtime.join("other/SKILL.md"), "other").unwrap();

        let installer = Installer::new(dist, runtime.clone(), &BuiltinArchiver);
        assert!(installer.install(&SkillPath::top_level("nope")).is_err());

        let entries: Vec<_> = std::fs::read_dir(&runtime).unwrap().flatten().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(
            std::fs::read_to_string(runtime.join("other/SKILL.md")).unwrap(),
            "other"
        );
    }

    #[test]
    fn installs_into_qualified_location() {
        let (tmp, dist) = built(&["a", ".system/x"]);
        let runtime = tmp.path().join("home/skills");
        let installer = Installer::new(dist, runtime.clone(), &BuiltinArchiver);

        let installed = installer
            .install_all(&[SkillPath::top_level("a"), SkillPath::namespaced("x")])
            .unwrap();
        assert_eq!(installed, vec![runtime.join("a"), runtime.join(".system").join("x")]);
        assert_eq!(
            std::fs::read_to_string(runtime.join(".system/x/SKILL.md")).unwrap(),
            "skill .system/x"
        );
    }

    #[test]
    fn install_all_halts_on_first_missing_archive() {
        let (tmp, dist) = built(&["a", "c"]);
        let runtime = tmp.path().join("home/skills");
        let installer = Installer::new(dist, runtime.clone(), &BuiltinArchiver);
        let skills: Vec<SkillPath> = ["a", "b", "c"].into_iter().map(SkillPath::from).collect();

        let err = installer.install_all(&skills).unwrap_err();
        assert!(matches!(err, Error::MissingArchive { .. }));
        assert!(runtime.join("a/SKILL.md").is_file());
        assert!(!runtime.join("c").exists());
    }

    #[test]
    fn reinstall_overwrites_previous_copy() {
        let (tmp, dist) = built(&["a"]);
        let runtime = tmp.path().join("home/skills");
        std::fs::create_dir_all(runtime.join("a")).unwrap();
        std::fs::write(runtime.join("a/SKILL.md"), "edited locally").unwrap();

        Installer::new(dist, runtime.clone(), &BuiltinArchiver)
            .install(&SkillPath::top_level("a"))
            .unwrap();
        assert_eq!(
            std::fs::read_to_string(runtime.join("a/SKILL.md")).unwrap(),
            "skill a"
        );
    }
}
