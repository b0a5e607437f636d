use std::path::PathBuf;

use crate::types::SkillPath;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("No skills found to {action}. Expected folders containing SKILL.md.")]
    NoSkillsResolved { action: &'static str },

    #[error("Missing skill folder: {}", path.display())]
    MissingSourceDirectory { path: PathBuf },

    #[error("Missing dist file: {}\nRun: skillpack build {skill}", archive.display())]
    MissingArchive { archive: PathBuf, skill: SkillPath },

    #[error("{program} exited with {}", status.map_or_else(|| "no status".to_string(), |code| format!("status {code}")))]
    SubprocessFailure {
        program: String,
        status: Option<i32>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),

    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    #[error("{message}")]
    Message { message: String },
}

impl Error {
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }

    /// Process exit code for this error: the subprocess status when one is
    /// available and non-zero, otherwise `1`.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::SubprocessFailure {
                status: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
