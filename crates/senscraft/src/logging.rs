//! Tracing setup for the CLI
//!
//! Logs go to stderr by default. With a log directory they are appended to
//! `senscraft.log`, which is cut back to its most recent tail once it grows
//! past a size limit.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::util::io::atomic_write;

const LOG_FILE: &str = "senscraft.log";

/// Size policy for the log file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LogRotation {
    /// Files larger than this are cut back
    max_bytes: u64,
    /// Bytes of recent output retained after a cut
    keep_bytes: u64,
}

impl Default for LogRotation {
    fn default() -> Self {
        Self {
            max_bytes: 5 * 1024 * 1024,
            keep_bytes: 1024 * 1024,
        }
    }
}

impl LogRotation {
    /// Cut `path` back to its last `keep_bytes`, starting at a line boundary.
    ///
    /// Returns the number of bytes dropped, zero when the file is missing or
    /// still small enough.
    fn apply(&self, path: &Path) -> io::Result<u64> {
        let len = match fs::metadata(path) {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e),
        };
        if len <= self.max_bytes {
            return Ok(0);
        }

        let mut tail = Vec::new();
        let mut file = File::open(path)?;
        file.seek(SeekFrom::Start(len.saturating_sub(self.keep_bytes)))?;
        file.read_to_end(&mut tail)?;

        let first_line = tail.iter().position(|&b| b == b'\n').map_or(0, |i| i + 1);
        let kept = &tail[first_line..];
        let dropped = len - kept.len() as u64;
        let content = format!(
            "--- senscraft log cut, {dropped} older bytes dropped ---\n{}",
            String::from_utf8_lossy(kept)
        );
        atomic_write(path, &content)?;
        Ok(dropped)
    }
}

fn env_filter(level: &str) -> EnvFilter {
    let default_filter = format!("senscraft={level},senscraft_core=warn");
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter))
}

/// Initialize logging to stderr, or to `{log_dir}/senscraft.log` when given.
///
/// The level applies to the binary; core engines log at `warn` unless
/// `RUST_LOG` says otherwise. The returned guard flushes the file writer on
/// drop and must be held until exit.
pub fn init_logging(
    level: &str,
    log_dir: Option<&Path>,
) -> color_eyre::Result<Option<WorkerGuard>> {
    let Some(dir) = log_dir else {
        tracing_subscriber::registry()
            .with(env_filter(level))
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .init();
        return Ok(None);
    };

    fs::create_dir_all(dir)?;
    let log_path = dir.join(LOG_FILE);
    let dropped = LogRotation::default().apply(&log_path).unwrap_or_else(|e| {
        eprintln!("Warning: could not trim {}: {e}", log_path.display());
        0
    });
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false),
        )
        .init();

    tracing::info!(log_path = %log_path.display(), dropped, "senscraft logging initialized");
    Ok(Some(guard))
}
