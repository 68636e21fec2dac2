//! Best-effort loading of the full source file a fragment was cut from.
//!
//! Any failure yields empty content; the reason is kept as a [`FileStatus`]
//! so callers can log or expose it without failing the request.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tracing::{debug, warn};

/// Outcome of a full-file read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FileStatus {
    /// The match carried no `filepath`.
    NotRecorded,
    /// The file was read and attached.
    Loaded,
    NotFound,
    /// The file exceeds the configured byte cap.
    TooLarge { limit: u64 },
    /// Content is not valid UTF-8.
    NotUtf8,
    /// Any other I/O failure (permissions, a directory, ...).
    Unreadable(String),
    TimedOut,
}

impl FileStatus {
    /// Short machine-friendly label, e.g. `not_found`.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileStatus::NotRecorded => "not_recorded",
            FileStatus::Loaded => "loaded",
            FileStatus::NotFound => "not_found",
            FileStatus::TooLarge { .. } => "too_large",
            FileStatus::NotUtf8 => "not_utf8",
            FileStatus::Unreadable(_) => "unreadable",
            FileStatus::TimedOut => "timed_out",
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileStatus::TooLarge { limit } => write!(f, "too_large (limit {limit} bytes)"),
            FileStatus::Unreadable(reason) => write!(f, "unreadable ({reason})"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Reads source files with a size cap and a time limit.
#[derive(Clone, Debug)]
pub struct FileReader {
    root: Option<PathBuf>,
    max_bytes: u64,
    timeout: Duration,
}

impl FileReader {
    /// `root` resolves relative paths; absolute paths are used as is.
    pub fn new(root: Option<PathBuf>, max_bytes: u64, timeout: Duration) -> Self {
        Self {
            root,
            max_bytes,
            timeout,
        }
    }

    /// Returns `(content, status)`. Content is empty unless the status is
    /// [`FileStatus::Loaded`].
    ///
    /// The time limit frees the request, not the blocking-pool thread doing
    /// the I/O: an `open` stuck on e.g. a FIFO without writer keeps that
    /// thread busy until the open returns.
    pub async fn read(&self, filepath: Option<&str>) -> (String, FileStatus) {
        let Some(raw) = filepath.map(str::trim).filter(|p| !p.is_empty()) else {
            return (String::new(), FileStatus::NotRecorded);
        };
        let path = self.resolve(raw);

        let status = match tokio::time::timeout(self.timeout, read_capped(&path, self.max_bytes))
            .await
        {
            Ok(Ok(text)) => {
                debug!(path = %path.display(), bytes = text.len(), "full file loaded");
                return (text, FileStatus::Loaded);
            }
            Ok(Err(status)) => status,
            Err(_) => FileStatus::TimedOut,
        };

        warn!(path = %path.display(), %status, "full file context unavailable");
        (String::new(), status)
    }

    fn resolve(&self, raw: &str) -> PathBuf {
        let p = Path::new(raw);
        match &self.root {
            Some(root) if p.is_relative() => root.join(p),
            _ => p.to_path_buf(),
        }
    }
}

async fn read_capped(path: &Path, max_bytes: u64) -> Result<String, FileStatus> {
    let file = tokio::fs::File::open(path).await.map_err(io_status)?;
    let meta = file.metadata().await.map_err(io_status)?;
    if !meta.is_file() {
        return Err(FileStatus::Unreadable("not a regular file".into()));
    }
    if meta.len() > max_bytes {
        return Err(FileStatus::TooLarge { limit: max_bytes });
    }

    // The file may grow after the metadata check.
    let mut buf = Vec::with_capacity(meta.len() as usize);
    file.take(max_bytes + 1)
        .read_to_end(&mut buf)
        .await
        .map_err(io_status)?;
    if buf.len() as u64 > max_bytes {
        return Err(FileStatus::TooLarge { limit: max_bytes });
    }

    String::from_utf8(buf).map_err(|_| FileStatus::NotUtf8)
}

fn io_status(e: io::Error) -> FileStatus {
    match e.kind() {
        io::ErrorKind::NotFound => FileStatus::NotFound,
        _ => FileStatus::Unreadable(e.to_string()),
    }
}
