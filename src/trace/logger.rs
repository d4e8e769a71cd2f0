use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::warn;

use crate::trace::trace::TraceEvent;

/// JSONL sink for autofill trace events. A logger whose file could not be
/// opened is a silent no-op.
pub struct TraceLogger {
    sink: Option<(PathBuf, Mutex<File>)>,
}

impl TraceLogger {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Self {
                sink: Some((path.to_path_buf(), Mutex::new(file))),
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not open trace file, tracing disabled");
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        Self { sink: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    pub fn path(&self) -> Option<&Path> {
        self.sink.as_ref().map(|(path, _)| path.as_path())
    }

    /// Append one event as a single line. Failures are logged and dropped.
    pub fn log(&self, event: &TraceEvent) {
        let Some((path, file)) = &self.sink else {
            return;
        };

        let line = match serde_json::to_string(event) {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "failed to serialize trace event");
                return;
            }
        };

        let Ok(mut file) = file.lock() else {
            warn!(path = %path.display(), "trace file lock poisoned");
            return;
        };
        if let Err(e) = writeln!(file, "{}", line) {
            warn!(path = %path.display(), error = %e, "failed to write trace event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::trace::TraceKind;

    #[test]
    fn appends_across_loggers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.jsonl");

        TraceLogger::new(&path).log(&TraceEvent::now(TraceKind::Frame).with_frame("top"));
        let second = TraceLogger::new(&path);
        second.log(&TraceEvent::now(TraceKind::Frame).with_message("AUTOFILL_COMPLETED"));

        assert_eq!(second.path(), Some(path.as_path()));
        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(raw.lines().count(), 2);
    }
}
