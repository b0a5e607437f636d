//! Archive backends.
//!
//! Packing always produces entries named relative to the base directory, so
//! an archive for `.system/creator` contains `.system/creator/SKILL.md` and
//! unpacks into `<dest>/.system/creator/`.

use std::{
    fs::File,
    io,
    path::Path,
    process::{Command, ExitStatus},
};

use {
    skillpack_config::{ArchiverKind, ToolsConfig},
    walkdir::WalkDir,
    zip::{CompressionMethod, ZipArchive, ZipWriter, write::SimpleFileOptions},
};

use crate::{
    error::{Error, Result},
    types::SkillPath,
};

/// Packs a skill directory into a single file and expands such files.
pub trait Archiver: Send + Sync {
    /// Archive `base_dir/<skill>` recursively into `dest_file`.
    fn pack(&self, base_dir: &Path, skill: &SkillPath, dest_file: &Path) -> Result<()>;

    /// Expand `src_file` into `dest_dir`, overwriting conflicting entries.
    fn unpack(&self, src_file: &Path, dest_dir: &Path) -> Result<()>;
}

/// Build the archiver selected in configuration.
pub fn build_archiver(kind: ArchiverKind, tools: &ToolsConfig) -> Box<dyn Archiver> {
    match kind {
        ArchiverKind::Command => Box::new(CommandArchiver::new(&tools.zip, &tools.unzip)),
        ArchiverKind::Builtin => Box::new(BuiltinArchiver),
    }
}

// ── External zip/unzip ──────────────────────────────────────────────────────

/// Runs `zip -r` and `unzip -o` with inherited stdio.
#[derive(Debug, Clone)]
pub struct CommandArchiver {
    zip: String,
    unzip: String,
}

impl CommandArchiver {
    pub fn new(zip: impl Into<String>, unzip: impl Into<String>) -> Self {
        Self {
            zip: zip.into(),
            unzip: unzip.into(),
        }
    }
}

impl Default for CommandArchiver {
    fn default() -> Self {
        Self::new("zip", "unzip")
    }
}

impl Archiver for CommandArchiver {
    fn pack(&self, base_dir: &Path, skill: &SkillPath, dest_file: &Path) -> Result<()> {
        // zip runs inside base_dir, so the output path must not be relative.
        let dest_file = std::path::absolute(dest_file)?;
        let status = Command::new(&self.zip)
            .arg("-r")
            .arg(&dest_file)
            .arg(skill.as_str())
            .current_dir(base_dir)
            .status()
            .map_err(|e| spawn_error(&self.zip, e))?;
        check_status(&self.zip, status)
    }

    fn unpack(&self, src_file: &Path, dest_dir: &Path) -> Result<()> {
        let status = Command::new(&self.unzip)
            .arg("-o")
            .arg(src_file)
            .arg("-d")
            .arg(dest_dir)
            .status()
            .map_err(|e| spawn_error(&self.unzip, e))?;
        check_status(&self.unzip, status)
    }
}

fn spawn_error(program: &str, e: io::Error) -> Error {
    Error::Io(io::Error::new(e.kind(), format!("failed to run {program}: {e}")))
}

fn check_status(program: &str, status: ExitStatus) -> Result<()> {
    if status.success() {
        return Ok(());
    }
    tracing::debug!(%program, ?status, "archive tool failed");
    Err(Error::SubprocessFailure {
        program: program.to_owned(),
        status: status.code(),
    })
}

// ── In-process zip ──────────────────────────────────────────────────────────

/// Pure-Rust archiver producing the same layout as `zip -r`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinArchiver;

impl Archiver for BuiltinArchiver {
    fn pack(&self, base_dir: &Path, skill: &SkillPath, dest_file: &Path) -> Result<()> {
        let source = skill.source_dir(base_dir);
        let mut writer = ZipWriter::new(File::create(dest_file)?);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for entry in WalkDir::new(&source).follow_links(true).sort_by_file_name() {
            let entry = entry?;
            let name = entry_name(base_dir, entry.path())?;
            let options = with_permissions(options, &entry.metadata()?);

            if entry.file_type().is_dir() {
                writer.add_directory(name, options)?;
            } else {
                writer.start_file(name, options)?;
                io::copy(&mut File::open(entry.path())?, &mut writer)?;
            }
        }

        writer.finish()?;
        Ok(())
    }

    fn unpack(&self, src_file: &Path, dest_dir: &Path) -> Result<()> {
        let mut archive = ZipArchive::new(File::open(src_file)?)?;
        std::fs::create_dir_all(dest_dir)?;

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let Some(relative) = file.enclosed_name() else {
                return Err(Error::message(format!(
                    "archive entry escapes destination: {}",
                    file.name()
                )));
            };
            let dest = dest_dir.join(relative);

            if file.unix_mode().is_some_and(is_symlink_mode) {
                tracing::warn!(entry = file.name(), "skipping symlink archive entry");
                continue;
            }

            if file.is_dir() {
                std::fs::create_dir_all(&dest)?;
                continue;
            }

            if let Some(parent) = dest.parent() {
                std::fs::create_dir_all(parent)?;
            }
            remove_symlink(&dest)?;
            io::copy(&mut file, &mut File::create(&dest)?)?;
            apply_permissions(&dest, file.unix_mode())?;
        }

        Ok(())
    }
}

/// Archive entry name for `path`: relative to `base_dir`, `/`-separated.
fn entry_name(base_dir: &Path, path: &Path) -> Result<String> {
    let relative = path.strip_prefix(base_dir).map_err(|_| {
        Error::message(format!(
            "{} is not inside {}",
            path.display(),
            base_dir.display()
        ))
    })?;
    let segments: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(segments.join("/"))
}

fn is_symlink_mode(mode: u32) -> bool {
    mode & 0o170000 == 0o120000
}

/// Replace rather than write through a symlink already at `path`.
fn remove_symlink(path: &Path) -> io::Result<()> {
    match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => std::fs::remove_file(path),
        _ => Ok(()),
    }
}

#[cfg(unix)]
fn with_permissions(options: SimpleFileOptions, meta: &std::fs::Metadata) -> SimpleFileOptions {
    use std::os::unix::fs::PermissionsExt;
    options.unix_permissions(meta.permissions().mode() & 0o777)
}

#[cfg(not(unix))]
fn with_permissions(options: SimpleFileOptions, _meta: &std::fs::Metadata) -> SimpleFileOptions {
    options
}

#[cfg(unix)]
fn apply_permissions(path: &Path, mode: Option<u32>) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    match mode {
        Some(mode) => {
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode & 0o777))
        },
        None => Ok(()),
    }
}

#[cfg(not(unix))]
fn apply_permissions(_path: &Path, _mode: Option<u32>) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use {super::*, crate::types::MARKER_FILE, std::path::PathBuf};

    fn list_entries(archive_file: &Path) -> Vec<PathBuf> {
        let archive = ZipArchive::new(File::open(archive_file).unwrap()).unwrap();
        archive.file_names().map(PathBuf::from).collect()
    }

    fn sample_repo() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        let skill = tmp.path().join(".system/creator");
        std::fs::create_dir_all(skill.join("scripts")).unwrap();
        std::fs::write(skill.join(MARKER_FILE), "---\nname: creator\n---\n").unwrap();
        std::fs::write(skill.join("scripts/run.sh"), "#!/bin/sh\necho hi\n").unwrap();
        tmp
    }

    #[test]
    fn builtin_pack_names_entries_from_base_dir() {
        let repo = sample_repo();
        let out = tempfile::tempdir().unwrap();
        let dest = out.path().join("creator.skill");

        BuiltinArchiver
            .pack(repo.path(), &SkillPath::namespaced("creator"), &dest)
            .unwrap();

        let names: Vec<String> = list_entries(&dest)
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
        assert!(names.contains(&".system/creator/".to_string()));
        assert!(names.contains(&".system/creator/SKILL.md".to_string()));
        assert!(names.contains(&".system/creator/scripts/run.sh".to_string()));
    }

    #[test]
    fn builtin_roundtrip_overwrites_existing_files() {
        let repo = sample_repo();
        let out = tempfile::tempdir().unwrap();
        let dest = out.path().join("creator.skill");
        BuiltinArchiver
            .pack(repo.path(), &SkillPath::namespaced("creator"), &dest)
            .unwrap();

        let runtime = out.path().join("runtime");
        let stale = runtime.join(".system/creator/SKILL.md");
        std::fs::create_dir_all(stale.parent().unwrap()).unwrap();
        std::fs::write(&stale, "stale").unwrap();
        std::fs::write(runtime.join("unrelated.txt"), "keep").unwrap();

        BuiltinArchiver.unpack(&dest, &runtime).unwrap();

        assert_eq!(
            std::fs::read_to_string(&stale).unwrap(),
            "---\nname: creator\n---\n"
        );
        assert!(runtime.join(".system/creator/scripts/run.sh").is_file());
        assert_eq!(
            std::fs::read_to_string(runtime.join("unrelated.txt")).unwrap(),
            "keep"
        );
    }

    #[cfg(unix)]
    #[test]
    fn builtin_preserves_executable_bits() {
        use std::os::unix::fs::PermissionsExt;

        let repo = sample_repo();
        let script = repo.path().join(".system/creator/scripts/run.sh");
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let out = tempfile::tempdir().unwrap();
        let dest = out.path().join("creator.skill");
        BuiltinArchiver
            .pack(repo.path(), &SkillPath::namespaced("creator"), &dest)
            .unwrap();
        let runtime = out.path().join("runtime");
        BuiltinArchiver.unpack(&dest, &runtime).unwrap();

        let mode = std::fs::metadata(runtime.join(".system/creator/scripts/run.sh"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn builtin_unpack_rejects_escaping_entries() {
        let out = tempfile::tempdir().unwrap();
        let evil = out.path().join("evil.skill");
        let mut writer = ZipWriter::new(File::create(&evil).unwrap());
        writer
            .start_file("../escape.txt", SimpleFileOptions::default())
            .unwrap();
        io::Write::write_all(&mut writer, b"x").unwrap();
        writer.finish().unwrap();

        let runtime = out.path().join("runtime");
        assert!(BuiltinArchiver.unpack(&evil, &runtime).is_err());
        assert!(!out.path().join("escape.txt").exists());
    }

    #[test]
    fn missing_tool_is_an_io_error() {
        let repo = sample_repo();
        let archiver = CommandArchiver::new("skillpack-no-such-zip", "skillpack-no-such-unzip");
        let err = archiver
            .pack(
                repo.path(),
                &SkillPath::namespaced("creator"),
                &repo.path().join("out.skill"),
            )
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("skillpack-no-such-zip"));
    }

    #[cfg(unix)]
    #[test]
    fn failing_tool_reports_its_status() {
        let repo = sample_repo();
        let archiver = CommandArchiver::new("false", "false");
        let err = archiver
            .unpack(&repo.path().join("x.skill"), repo.path())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::SubprocessFailure {
                status: Some(1),
                ..
            }
        ));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn command_archiver_roundtrip_when_tools_present() {
        if which::which("zip").is_err() || which::which("unzip").is_err() {
            return;
        }
        let repo = sample_repo();
        let out = tempfile::tempdir().unwrap();
        let dest = out.path().join("creator.skill");
        let archiver = CommandArchiver::default();

        archiver
            .pack(repo.path(), &SkillPath::namespaced("creator"), &dest)
            .unwrap();
        let runtime = out.path().join("runtime");
        archiver.unpack(&dest, &runtime).unwrap();

        assert!(runtime.join(".system/creator/SKILL.md").is_file());
        assert!(runtime.join(".system/creator/scripts/run.sh").is_file());
    }

    #[test]
    fn build_archiver_follows_kind() {
        let tools = ToolsConfig::default();
        let repo = sample_repo();
        let dest = repo.path().join("built.skill");
        build_archiver(ArchiverKind::Builtin, &tools)
            .pack(repo.path(), &SkillPath::namespaced("creator"), &dest)
            .unwrap();
        assert!(dest.is_file());
    }
}
