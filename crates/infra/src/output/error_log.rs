use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::warn;

/// Append-only failure log. The file is opened and closed on every call, so
/// concurrent runs can share it.
#[derive(Debug, Clone)]
pub struct ErrorLog {
    path: PathBuf,
}

impl ErrorLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, message: &str) -> Result<(), std::io::Error> {
        let message = single_line(message);
        warn!(log = %self.path.display(), "{message}");
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let timestamp = Local::now().format("%Y-%m-%dT%H:%M:%S%.6f");
        writeln!(file, "{timestamp}: {message}")
    }
}

fn single_line(message: &str) -> String {
    message
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use super::*;

    #[test]
    fn appends_timestamped_lines() {
        let dir = tempfile::tempdir().unwrap();
        let log = ErrorLog::new(dir.path().join("errors.log"));
        log.append("message[c1]: field unavailable: link_id").unwrap();
        log.append("thread[2]: unexpected error: http error").unwrap();

        let contents = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        let (timestamp, message) = lines[0].split_once(": ").unwrap();
        assert!(NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f").is_ok());
        assert_eq!(message, "message[c1]: field unavailable: link_id");
        assert!(lines[1].ends_with("thread[2]: unexpected error: http error"));
    }

    #[test]
    fn keeps_existing_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("errors.log");
        std::fs::write(&path, "earlier run\n").unwrap();
        ErrorLog::new(&path).append("next").unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("earlier run\n"));
        assert_eq!(contents.lines().count(), 2);
    }

    #[test]
    fn multiline_messages_are_folded() {
        assert_eq!(single_line("status 500\nbody <html>\n"), "status 500 body <html>");
    }
}
