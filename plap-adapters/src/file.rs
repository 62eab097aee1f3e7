//! Sources backed by a file on disk or text already in memory

use anyhow::{Context, Result};
use plap_core::TelemetrySource;
use std::fs;
use std::path::{Path, PathBuf};

/// Reads a telemetry export from disk
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path.display().to_string();
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TelemetrySource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_text(&mut self) -> Result<String> {
        fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read telemetry file: {}", self.path.display()))
    }
}

/// Telemetry text that has already been received, e.g. an upload body
pub struct TextSource {
    name: String,
    text: String,
}

impl TextSource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

impl TelemetrySource for TextSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_text(&mut self) -> Result<String> {
        Ok(self.text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_source_returns_text() {
        let mut source = TextSource::new("upload.csv", "time,speed\n1,2\n");
        assert_eq!(source.name(), "upload.csv");
        assert_eq!(source.read_text().unwrap(), "time,speed\n1,2\n");
    }

    #[test]
    fn test_file_source_round_trip() {
        let path = std::env::temp_dir().join("plap-file-source-test.csv");
        fs::write(&path, "timestamp,speed\n0.1,80\n").unwrap();

        let mut source = FileSource::new(&path);
        assert_eq!(source.path(), path.as_path());
        assert_eq!(source.read_text().unwrap(), "timestamp,speed\n0.1,80\n");

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_file_source_missing_file_has_context() {
        let mut source = FileSource::new("/nonexistent/session.csv");
        let err = source.read_text().unwrap_err();
        assert!(err.to_string().contains("Failed to read telemetry file"));
    }
}
