//! Snapshot providers — the only way the dashboard learns about channels.
//!
//! A provider has one job: return a complete [`Snapshot`] or fail.  It never
//! retries; a failed fetch simply leaves the caller with its previous data.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use tracing::debug;

use crate::config::SourceConfig;
use crate::error::ProviderError;
use crate::model::Snapshot;

pub trait SnapshotProvider: Send + Sync {
    /// Fetch every channel's current listing.
    fn fetch(&self) -> impl Future<Output = Result<Snapshot, ProviderError>> + Send;

    /// Human-readable origin, for logs and the status line.
    fn describe(&self) -> String;
}

// ── HTTP ──────────────────────────────────────────────────────────────────────

pub struct HttpProvider {
    client: reqwest::Client,
    url: String,
}

impl HttpProvider {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("wpn/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl SnapshotProvider for HttpProvider {
    async fn fetch(&self) -> Result<Snapshot, ProviderError> {
        debug!("GET {}", self.url);
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }
        let text = response.text().await?;
        Snapshot::from_json_str(&text)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

// ── File ──────────────────────────────────────────────────────────────────────

pub struct FileProvider {
    path: PathBuf,
}

impl FileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotProvider for FileProvider {
    async fn fetch(&self) -> Result<Snapshot, ProviderError> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| ProviderError::Io {
                path: self.path.clone(),
                source,
            })?;
        Snapshot::from_json_str(&text)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

// ── Command ───────────────────────────────────────────────────────────────────

pub struct CommandProvider {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandProvider {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }
}

impl SnapshotProvider for CommandProvider {
    async fn fetch(&self) -> Result<Snapshot, ProviderError> {
        debug!("running {} {:?}", self.program, self.args);
        let child = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ProviderError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|source| ProviderError::Spawn {
                program: self.program.clone(),
                source,
            })?,
            Err(_) => {
                return Err(ProviderError::Timeout {
                    program: self.program.clone(),
                    timeout_secs: self.timeout.as_secs(),
                })
            }
        };

        if !output.status.success() {
            return Err(ProviderError::command_failed(
                &self.program,
                output.status,
                &output.stderr,
            ));
        }
        let text = String::from_utf8(output.stdout).map_err(|e| {
            ProviderError::Malformed(format!("{} wrote invalid UTF-8: {}", self.program, e))
        })?;
        Snapshot::from_json_str(&text)
    }

    fn describe(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

// ── Configured source ─────────────────────────────────────────────────────────

/// The provider picked by configuration.
pub enum Source {
    Http(HttpProvider),
    File(FileProvider),
    Command(CommandProvider),
}

impl Source {
    pub fn from_config(config: &SourceConfig) -> Result<Self, ProviderError> {
        Ok(match config {
            SourceConfig::Http { url, timeout_secs } => Self::Http(HttpProvider::new(
                url.clone(),
                Duration::from_secs(*timeout_secs),
            )?),
            SourceConfig::File { path } => Self::File(FileProvider::new(path.clone())),
            SourceConfig::Command {
                program,
                args,
                timeout_secs,
            } => Self::Command(CommandProvider::new(
                program.clone(),
                args.clone(),
                Duration::from_secs(*timeout_secs),
            )),
        })
    }
}

impl SnapshotProvider for Source {
    async fn fetch(&self) -> Result<Snapshot, ProviderError> {
        match self {
            Self::Http(p) => p.fetch().await,
            Self::File(p) => p.fetch().await,
            Self::Command(p) => p.fetch().await,
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Http(p) => p.describe(),
            Self::File(p) => p.describe(),
            Self::Command(p) => p.describe(),
        }
    }
}
