//! Error types for a LigandMPNN run.
//!
//! Every failure ends the run. The variants only exist so the carried detail
//! says what went wrong.
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    /// A required parameter is missing or empty.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// A relative file reference could not be made absolute.
    #[error("failed to resolve path '{path}': {source}")]
    PathResolution {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The run's output directory could not be created.
    #[error("failed to create output directory '{path}': {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A GPU preflight check could not run or reported failure.
    #[error("preflight check `{command}` failed: {detail}")]
    Preflight { command: String, detail: String },

    /// The model runner could not be started.
    #[error("failed to launch `{program}`: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The model runner terminated unsuccessfully.
    #[error("command `{command}` returned non-zero {status}")]
    Exit { command: String, status: ExitStatus },

    /// A saved parameter bundle could not be read.
    #[error("failed to read parameter file '{path}': {source}")]
    ParameterFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A saved parameter bundle is not valid JSON for a parameter set.
    #[error("failed to parse parameter file '{path}': {source}")]
    ParameterFileParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl RunError {
    /// Exit code of the model runner, when it got far enough to have one.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            RunError::Exit { status, .. } => status.code(),
            _ => None,
        }
    }
}
