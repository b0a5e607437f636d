//! `build`, `install`, and `list` commands.

use std::path::PathBuf;

use {
    anyhow::Context as _,
    skillpack_config::{ArchiverKind, RuntimeLayout, SkillpackConfig},
    skillpack_skills::{Archiver, Installer, Packager, build_archiver, discover, require_any, resolve},
};

/// Values given on the command line (or via `CODEX_HOME`), applied over the
/// config file.
pub struct Overrides {
    pub repo_root: Option<PathBuf>,
    pub dist_dir: Option<PathBuf>,
    pub codex_home: Option<PathBuf>,
    pub archiver: Option<ArchiverKind>,
}

/// Everything a command needs, resolved once per run.
pub struct Context {
    repo_root: PathBuf,
    dist_dir: PathBuf,
    codex_home: Option<PathBuf>,
    config: SkillpackConfig,
    archiver: Box<dyn Archiver>,
}

impl Context {
    pub fn load(overrides: Overrides) -> anyhow::Result<Self> {
        let repo_root = match overrides.repo_root {
            Some(dir) => dir,
            None => std::env::current_dir()?,
        };
        let repo_root = std::fs::canonicalize(&repo_root)
            .with_context(|| format!("repository root {} is not accessible", repo_root.display()))?;

        let config = skillpack_config::discover_and_load(&repo_root);
        let dist_dir = skillpack_config::resolve_dist_dir(&repo_root, overrides.dist_dir, &config);
        let kind = overrides.archiver.unwrap_or(config.archiver);
        let archiver = build_archiver(kind, &config.tools);

        tracing::debug!(
            repo_root = %repo_root.display(),
            dist_dir = %dist_dir.display(),
            archiver = %kind,
            "resolved workspace"
        );

        Ok(Self {
            repo_root,
            dist_dir,
            codex_home: overrides.codex_home,
            config,
            archiver,
        })
    }

    /// Only `install` needs the runtime home, so it is resolved lazily.
    fn runtime_layout(&self) -> anyhow::Result<RuntimeLayout> {
        RuntimeLayout::resolve(self.codex_home.clone(), &self.config.runtime)
    }
}

pub fn handle_build(ctx: &Context, tokens: &[String]) -> anyhow::Result<()> {
    let skills = require_any(resolve(&ctx.repo_root, tokens)?, "build")?;
    let packager = Packager::new(
        ctx.repo_root.clone(),
        ctx.dist_dir.clone(),
        ctx.archiver.as_ref(),
    );
    let archives = packager.package_all(&skills)?;
    tracing::info!(count = archives.len(), dist_dir = %packager.dist_dir().display(), "build complete");
    Ok(())
}

pub fn handle_install(ctx: &Context, tokens: &[String]) -> anyhow::Result<()> {
    let skills = require_any(resolve(&ctx.repo_root, tokens)?, "install")?;
    let layout = ctx.runtime_layout()?;
    let installer = Installer::new(
        ctx.dist_dir.clone(),
        layout.skills_dir.clone(),
        ctx.archiver.as_ref(),
    );
    let installed = installer.install_all(&skills)?;
    tracing::info!(count = installed.len(), skills_dir = %installer.skills_dir().display(), "install complete");
    Ok(())
}

pub fn handle_list(ctx: &Context) -> anyhow::Result<()> {
    let skills = discover(&ctx.repo_root)?;
    if skills.is_empty() {
        eprintln!("No skills found. Expected folders containing SKILL.md.");
        return Ok(());
    }
    for skill in &skills {
        println!("{skill}");
    }
    Ok(())
}
