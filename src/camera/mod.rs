use std::path::PathBuf;

use anyhow::{bail, Result};

/// Camera seam: one call, one frame on disk.
///
/// The surrounding application owns camera setup and teardown; the
/// detection loop only asks for the latest frame's path. The handle is
/// called from a single loop task at a time, never concurrently.
pub trait FrameSource: Send + Sync {
    fn capture_frame(&self) -> Result<PathBuf>;
}

/// Frame source that always hands back the same file. Covers bring-up
/// and tests, where a real camera pipeline is not available.
pub struct StillFrameSource {
    path: PathBuf,
}

impl StillFrameSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FrameSource for StillFrameSource {
    fn capture_frame(&self) -> Result<PathBuf> {
        if !self.path.exists() {
            bail!("frame file {} does not exist", self.path.display());
        }
        Ok(self.path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn still_source_returns_existing_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let source = StillFrameSource::new(file.path());
        assert_eq!(source.capture_frame().unwrap(), file.path());
    }

    #[test]
    fn still_source_rejects_missing_file() {
        let source = StillFrameSource::new("/nonexistent/frame.jpg");
        assert!(source.capture_frame().is_err());
    }
}
