mod skills_commands;

use std::{path::PathBuf, process::ExitCode};

use {
    clap::{Parser, Subcommand},
    skillpack_config::ArchiverKind,
    tracing::debug,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "skillpack", about = "Build and install local skill archives")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Repository containing the skills (defaults to `SKILLPACK_REPO_ROOT`,
    /// then the current directory).
    #[arg(long, global = true)]
    repo_root: Option<PathBuf>,
    /// Output directory for archives (overrides config value).
    #[arg(long, global = true)]
    dist_dir: Option<PathBuf>,
    /// Runtime home receiving installed skills (defaults to `CODEX_HOME`,
    /// then the config value).
    #[arg(long, global = true)]
    codex_home: Option<PathBuf>,
    /// Archive backend: command (zip/unzip) or builtin.
    #[arg(long, global = true)]
    archiver: Option<ArchiverKind>,
}

#[derive(Subcommand)]
enum Commands {
    /// Package skills into `<dist>/<skill>.skill` archives.
    Build {
        /// Skill paths (`name` or `.system/name`), or `all`. Defaults to all.
        skills: Vec<String>,
    },
    /// Expand previously built archives into the runtime skills directory.
    Install {
        /// Skill paths (`name` or `.system/name`), or `all`. Defaults to all.
        skills: Vec<String>,
    },
    /// List discovered skills.
    List,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_telemetry(&cli);

    debug!(version = env!("CARGO_PKG_VERSION"), "skillpack starting");

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(exit_code(&e))
        },
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = skills_commands::Context::load(skills_commands::Overrides {
        repo_root: cli.repo_root.or_else(|| env_path("SKILLPACK_REPO_ROOT")),
        dist_dir: cli.dist_dir,
        codex_home: cli.codex_home.or_else(|| env_path("CODEX_HOME")),
        archiver: cli.archiver,
    })?;

    match cli.command {
        Commands::Build { skills } => skills_commands::handle_build(&ctx, &skills),
        Commands::Install { skills } => skills_commands::handle_install(&ctx, &skills),
        Commands::List => skills_commands::handle_list(&ctx),
    }
}

/// A path from the environment; set-but-empty counts as unset.
fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Mirror a failed archive tool's status; everything else exits with 1.
fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<skillpack_skills::Error>()
        .map_or(1, skillpack_skills::Error::exit_code)
        .try_into()
        .ok()
        .filter(|code| *code != 0)
        .unwrap_or(1)
}
