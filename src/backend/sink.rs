//! Download sinks for exported documents.

use std::path::{Component, Path, PathBuf};

use super::{BackendError, BackendResult, DownloadSink, ExportFile};

/// Writes exported files into a folder.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    folder: PathBuf,
}

impl DirectorySink {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
        }
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }
}

impl DownloadSink for DirectorySink {
    fn deliver(&mut self, file: ExportFile) -> BackendResult<PathBuf> {
        // Only a bare file name may land in the folder
        let name = Path::new(&file.filename);
        let mut components = name.components();
        let (Some(Component::Normal(_)), None) = (components.next(), components.next()) else {
            return Err(BackendError::InvalidDestination {
                path: name.to_path_buf(),
            });
        };

        std::fs::create_dir_all(&self.folder)?;
        let path = self.folder.join(name);
        std::fs::write(&path, &file.bytes)?;
        log::info!("Wrote {} ({} bytes) to {:?}", file.filename, file.bytes.len(), path);
        Ok(path)
    }
}

/// Keeps delivered files in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub files: Vec<ExportFile>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DownloadSink for CollectingSink {
    fn deliver(&mut self, file: ExportFile) -> BackendResult<PathBuf> {
        let path = PathBuf::from(&file.filename);
        self.files.push(file);
        Ok(path)
    }
}
