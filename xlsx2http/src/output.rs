//! Output directory and `.http` file handling

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::clock::Clock;

const FILE_PREFIX: &str = "output_";
const FILE_EXTENSION: &str = "http";
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M";

/// Failure while preparing the output file
#[derive(Debug)]
pub enum OutputError {
    CreateDir { path: PathBuf, source: io::Error },
    CreateFile { path: PathBuf, source: io::Error },
}

impl std::fmt::Display for OutputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputError::CreateDir { path, source } => {
                write!(f, "Failed to create directory {}: {}", path.display(), source)
            }
            OutputError::CreateFile { path, source } => {
                write!(f, "Failed to create output file {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for OutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OutputError::CreateDir { source, .. } | OutputError::CreateFile { source, .. } => {
                Some(source)
            }
        }
    }
}

/// `output_<YYYYMMDDHHMM>.http`
pub fn output_file_name(clock: &dyn Clock) -> String {
    format!(
        "{}{}.{}",
        FILE_PREFIX,
        clock.now().format(TIMESTAMP_FORMAT),
        FILE_EXTENSION
    )
}

/// Create `dir` and all missing parents
pub fn ensure_dir(dir: &Path) -> Result<(), OutputError> {
    if dir.is_dir() {
        return Ok(());
    }

    log::info!("Directory {} does not exist, creating it", dir.display());
    fs::create_dir_all(dir).map_err(|source| OutputError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;
    log::info!("Created directory {}", dir.display());
    Ok(())
}

/// An open, buffered output file
pub struct OutputFile {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl OutputFile {
    /// Create (or truncate) the timestamped output file inside `dir`
    pub fn create(dir: &Path, clock: &dyn Clock) -> Result<Self, OutputError> {
        ensure_dir(dir)?;

        let path = dir.join(output_file_name(clock));
        let file = File::create(&path).map_err(|source| OutputError::CreateFile {
            path: path.clone(),
            source,
        })?;

        log::info!("Created output file {}", path.display());
        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn writer(&mut self) -> &mut impl Write {
        &mut self.writer
    }

    /// Flush and sync the file
    ///
    /// Failures are logged here; the return value tells the caller whether
    /// everything written so far actually reached the file.
    pub fn close(self) -> bool {
        let path = self.path;
        match self.writer.into_inner() {
            Ok(file) => match file.sync_all() {
                Ok(()) => true,
                Err(e) => {
                    log::error!("Failed to sync output file {}: {}", path.display(), e);
                    false
                }
            },
            Err(e) => {
                log::error!(
                    "Failed to flush output file {}: {}",
                    path.display(),
                    e.error()
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    #[test]
    fn test_output_file_name() {
        let clock = FixedClock::at(2024, 3, 5, 9, 7).unwrap();
        assert_eq!(output_file_name(&clock), "output_202403050907.http");
    }

    #[test]
    fn test_ensure_dir_creates_nested() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a").join("b").join("c");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
        // Existing directory is fine
        ensure_dir(&nested).unwrap();
    }

    #[test]
    fn test_ensure_dir_fails_on_file() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        let err = ensure_dir(&blocker.join("child")).unwrap_err();
        assert!(matches!(err, OutputError::CreateDir { .. }));
    }

    #[test]
    fn test_create_write_close() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("out");
        let clock = FixedClock::at(2023, 12, 31, 23, 59).unwrap();

        let mut output = OutputFile::create(&dir, &clock).unwrap();
        let path = output.path().to_path_buf();
        assert_eq!(path, dir.join("output_202312312359.http"));

        write!(output.writer(), "hello").unwrap();
        assert!(output.close());

        assert_eq!(fs::read_to_string(path).unwrap(), "hello");
    }

    #[test]
    fn test_create_truncates_existing() {
        let tmp = tempfile::tempdir().unwrap();
        let clock = FixedClock::at(2023, 1, 2, 3, 4).unwrap();
        let path = tmp.path().join(output_file_name(&clock));
        fs::write(&path, "stale content").unwrap();

        let output = OutputFile::create(tmp.path(), &clock).unwrap();
        assert!(output.close());
        assert_eq!(fs::read_to_string(path).unwrap(), "");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_close_reports_failed_flush() {
        let file = File::options().write(true).open("/dev/full").unwrap();
        let mut output = OutputFile {
            path: PathBuf::from("/dev/full"),
            writer: BufWriter::new(file),
        };

        // Buffered, so the write itself succeeds
        write!(output.writer(), "request").unwrap();
        assert!(!output.close());
    }
}
