use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_FILE_NAME: &str = "hammer_scalpel.log";

/// Maximum log file size before rotation (5 MB)
const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;
/// Size to keep after rotation (1 MB of most recent logs)
const KEEP_SIZE: u64 = 1024 * 1024;

/// Rotate log file if it exceeds `max_size`, keeping the last `keep` bytes.
fn rotate_log_if_needed(log_path: &Path, max_size: u64, keep: u64) -> std::io::Result<()> {
    if !log_path.exists() {
        return Ok(());
    }

    let metadata = fs::metadata(log_path)?;
    if metadata.len() <= max_size {
        return Ok(());
    }

    let mut file = File::open(log_path)?;
    let start_pos = metadata.len().saturating_sub(keep);
    file.seek(SeekFrom::Start(start_pos))?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;
    drop(file);

    // Skip to the first newline to avoid partial lines
    let skip = buffer
        .iter()
        .position(|&b| b == b'\n')
        .map(|i| i + 1)
        .unwrap_or(0);

    let mut file = File::create(log_path)?;
    file.write_all(b"--- Log rotated (older entries removed) ---\n")?;
    file.write_all(&buffer[skip..])?;

    Ok(())
}

/// Initialize logging to stderr and to a file in the output directory.
///
/// Logs are appended to `{out_dir}/hammer_scalpel.log`, which is trimmed to
/// its last 1MB once it grows past 5MB. `RUST_LOG` takes precedence over
/// `level`. The returned guard flushes the file writer on drop and must be
/// held until the program exits.
pub fn init_logging(out_dir: &Path, level: &str) -> color_eyre::Result<WorkerGuard> {
    fs::create_dir_all(out_dir)?;

    let log_path = out_dir.join(LOG_FILE_NAME);
    if let Err(e) = rotate_log_if_needed(&log_path, MAX_LOG_SIZE, KEEP_SIZE) {
        eprintln!("Warning: Failed to rotate log file: {e}");
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;
    let (file_writer, guard) = tracing_appender::non_blocking(file);

    let default_filter = format!("hammer_scalpel={level},hammer_scalpel_core={level}");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_target(true)
                .with_thread_names(true),
        )
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();

    tracing::info!(log_path = %log_path.display(), "logging initialized");
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_small_log_is_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(LOG_FILE_NAME);
        fs::write(&path, "one\ntwo\n").unwrap();

        rotate_log_if_needed(&path, 1024, 4).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn test_rotation_keeps_whole_recent_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(LOG_FILE_NAME);
        fs::write(&path, "first line\nsecond line\nthird\n").unwrap();

        rotate_log_if_needed(&path, 10, 14).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("--- Log rotated"));
        assert!(content.ends_with("third\n"));
        assert!(!content.contains("first"));
    }

    #[test]
    fn test_missing_log_is_fine() {
        let dir = tempdir().unwrap();
        rotate_log_if_needed(&dir.path().join("absent.log"), 10, 5).unwrap();
    }
}
