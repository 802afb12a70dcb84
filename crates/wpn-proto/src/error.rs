use std::path::PathBuf;

use thiserror::Error;

/// Why a snapshot fetch produced no data.
///
/// Per-channel problems never show up here: a channel with a missing or
/// malformed track list is carried in the snapshot as unusable instead.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned HTTP {0}")]
    Status(u16),

    #[error("cannot read `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` exited with {status}{stderr_suffix}")]
    CommandFailed {
        program: String,
        status: String,
        stderr_suffix: String,
    },

    #[error("`{program}` timed out after {timeout_secs}s")]
    Timeout { program: String, timeout_secs: u64 },

    #[error("malformed snapshot: {0}")]
    Malformed(String),
}

impl ProviderError {
    pub fn command_failed(program: &str, status: std::process::ExitStatus, stderr: &[u8]) -> Self {
        let stderr = String::from_utf8_lossy(stderr);
        let trimmed = stderr.trim();
        let stderr_suffix = if trimmed.is_empty() {
            String::new()
        } else {
            format!(": {trimmed}")
        };
        Self::CommandFailed {
            program: program.to_string(),
            status: status.to_string(),
            stderr_suffix,
        }
    }
}
