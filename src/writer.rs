//! Persists a [TraceSet] as a JSON document of the form `{"PASSED": [...], "FAILED": [...]}`.
//!
//! Every run gets a fresh file named `<prefix>-<timestamp>.json`. Files are created, never
//! opened for writing if they already exist, so an earlier run's traces are never truncated.

use crate::error::WriteError;
use crate::generator::TraceSet;
use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Second-granularity timestamp embedded in artifact names.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H-%M-%S";

/// Artifact file name for traces generated at `time`.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use fsm_tracegen::writer::file_name;
///
/// let time = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
/// assert_eq!(
///     file_name("small-dfa-traces", &time),
///     "small-dfa-traces-2024-03-09 14-05-07.json"
/// );
/// ```
pub fn file_name<Tz>(prefix: &str, time: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!("{}-{}.json", prefix, time.format(TIMESTAMP_FORMAT))
}

/// Writes trace sets into a directory.
#[derive(Debug, Clone)]
pub struct ResultWriter {
    dir: PathBuf,
}

impl ResultWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        ResultWriter { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `traces` to a new file stamped with the current local time.
    pub fn write(&self, traces: &TraceSet, prefix: &str) -> Result<PathBuf, WriteError> {
        self.write_at(traces, prefix, &Local::now())
    }

    /// Write `traces` to a new file stamped with `time`.
    ///
    /// Fails with [WriteError::NameConflict] if that file already exists.
    pub fn write_at<Tz>(
        &self,
        traces: &TraceSet,
        prefix: &str,
        time: &DateTime<Tz>,
    ) -> Result<PathBuf, WriteError>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let path = self.dir.join(file_name(prefix, time));

        // Serialize up front so that only I/O can fail once the file exists.
        let mut document = serde_json::to_vec_pretty(traces)?;
        document.push(b'\n');

        let file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                return Err(WriteError::NameConflict(path))
            }
            Err(err) => return Err(err.into()),
        };
        finish(&path, file, &document)?;

        info!(
            "wrote {} passing and {} failing traces to {}",
            traces.passed.len(),
            traces.failed.len(),
            path.display()
        );

        Ok(path)
    }
}

/// Write `document` through `out`, removing the file at `path` if any of it fails to land.
fn finish<W: Write>(path: &Path, mut out: W, document: &[u8]) -> Result<(), WriteError> {
    let written = out.write_all(document).and_then(|()| out.flush());
    drop(out);

    if let Err(err) = written {
        if let Err(cleanup) = fs::remove_file(path) {
            warn!("could not remove partial file {}: {}", path.display(), cleanup);
        }
        return Err(WriteError::Io(err));
    }
    Ok(())
}

/// Read an artifact written by [ResultWriter] back into a [TraceSet].
///
/// Attempt statistics are not stored, so they come back zeroed.
pub fn read_traces(path: &Path) -> Result<TraceSet, WriteError> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    /// Accepts `room` bytes, then fails like a full disk.
    struct Quota<W> {
        inner: W,
        room: usize,
    }

    impl<W: Write> Write for Quota<W> {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.room == 0 {
                return Err(io::Error::new(ErrorKind::Other, "file too large"));
            }
            let n = buf.len().min(self.room);
            self.room -= n;
            self.inner.write(&buf[..n])
        }

        fn flush(&mut self) -> io::Result<()> {
            self.inner.flush()
        }
    }

    fn many_traces() -> TraceSet {
        TraceSet {
            passed: (0..20_000).map(|n| format!("{:b}", n)).collect(),
            failed: vec!["0".into()],
            ..Default::default()
        }
    }

    #[test]
    fn interrupted_write_leaves_no_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("small-dfa-traces-2023-05-17 09-30-00.json");
        let document = serde_json::to_vec_pretty(&many_traces()).unwrap();

        let file = File::create(&path).unwrap();
        let out = Quota {
            inner: file,
            room: 16_384,
        };

        match finish(&path, out, &document) {
            Err(WriteError::Io(err)) => assert_eq!(err.kind(), ErrorKind::Other),
            other => panic!("expected an I/O error, got {:?}", other),
        }
        assert!(!path.exists());
    }

    #[test]
    fn completed_write_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bridge-dfa-traces-2023-05-17 09-30-00.json");
        let document = serde_json::to_vec_pretty(&many_traces()).unwrap();

        finish(&path, File::create(&path).unwrap(), &document).unwrap();

        let read = read_traces(&path).unwrap();
        assert_eq!(read.passed.len(), 20_000);
        assert_eq!(read.failed, ["0"]);
    }
}
