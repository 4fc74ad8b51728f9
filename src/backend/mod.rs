//! Annotation storage and export collaborators.
//!
//! The editor talks to storage only through [`AnnotationBackend`] and hands exported
//! documents to a [`DownloadSink`]. Two reference backends are provided: an in-memory
//! one and one that keeps everything under a directory.

mod directory;
mod error;
pub mod export;
mod memory;
mod sink;

#[cfg(test)]
mod tests;

use std::fmt;
use std::num::ParseIntError;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use directory::DirectoryBackend;
pub use error::BackendError;
pub use memory::MemoryBackend;
pub use sink::{CollectingSink, DirectorySink};

use crate::model::AnnotationSet;

/// Result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// Numeric identifier of an uploaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(pub u64);

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ImageId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(ImageId)
    }
}

/// Metadata about an uploaded image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub id: ImageId,
    /// Stored filename of the image.
    pub filename: String,
    /// Pixel width, if it could be determined at upload.
    #[serde(default)]
    pub width: Option<u32>,
    /// Pixel height, if it could be determined at upload.
    #[serde(default)]
    pub height: Option<u32>,
}

impl ImageInfo {
    pub fn new(id: ImageId, filename: impl Into<String>) -> Self {
        Self {
            id,
            filename: filename.into(),
            width: None,
            height: None,
        }
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Width and height, if both are known and non-zero.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match (self.width, self.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some((w, h)),
            _ => None,
        }
    }
}

/// Export document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Coco,
    Yolo,
}

impl ExportFormat {
    /// Get the display name for this format.
    pub fn name(&self) -> &'static str {
        match self {
            ExportFormat::Json => "JSON",
            ExportFormat::Coco => "COCO",
            ExportFormat::Yolo => "YOLO",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Json | ExportFormat::Coco => "application/json",
            ExportFormat::Yolo => "text/plain",
        }
    }

    /// Download filename for an image's export.
    pub fn filename(&self, image: ImageId) -> String {
        match self {
            ExportFormat::Json => format!("annotations_{}.json", image),
            ExportFormat::Coco => format!("coco_annotations_{}.json", image),
            ExportFormat::Yolo => format!("yolo_annotations_{}.txt", image),
        }
    }

    pub fn all() -> &'static [ExportFormat] {
        &[ExportFormat::Json, ExportFormat::Coco, ExportFormat::Yolo]
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "coco" => Ok(ExportFormat::Coco),
            "yolo" => Ok(ExportFormat::Yolo),
            other => Err(format!("unknown export format '{}' (expected json, coco or yolo)", other)),
        }
    }
}

/// A downloadable export document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ExportFile {
    pub fn new(filename: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Contents as text, if valid UTF-8.
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.bytes).ok()
    }
}

/// Storage and export for the annotations of uploaded images.
pub trait AnnotationBackend {
    /// Load an image's annotations. An image without saved annotations yields an
    /// empty set.
    fn load(&mut self, image: ImageId) -> BackendResult<AnnotationSet>;

    /// Replace an image's annotations with `annotations`.
    fn save(&mut self, image: ImageId, annotations: &AnnotationSet) -> BackendResult<()>;

    fn export_json(&mut self, image: ImageId) -> BackendResult<ExportFile>;

    fn export_coco(&mut self, image: ImageId) -> BackendResult<ExportFile>;

    fn export_yolo(&mut self, image: ImageId) -> BackendResult<ExportFile>;

    /// Export in the given format.
    fn export(&mut self, image: ImageId, format: ExportFormat) -> BackendResult<ExportFile> {
        match format {
            ExportFormat::Json => self.export_json(image),
            ExportFormat::Coco => self.export_coco(image),
            ExportFormat::Yolo => self.export_yolo(image),
        }
    }
}

impl<B: AnnotationBackend + ?Sized> AnnotationBackend for &mut B {
    fn load(&mut self, image: ImageId) -> BackendResult<AnnotationSet> {
        (**self).load(image)
    }

    fn save(&mut self, image: ImageId, annotations: &AnnotationSet) -> BackendResult<()> {
        (**self).save(image, annotations)
    }

    fn export_json(&mut self, image: ImageId) -> BackendResult<ExportFile> {
        (**self).export_json(image)
    }

    fn export_coco(&mut self, image: ImageId) -> BackendResult<ExportFile> {
        (**self).export_coco(image)
    }

    fn export_yolo(&mut self, image: ImageId) -> BackendResult<ExportFile> {
        (**self).export_yolo(image)
    }
}

/// Receives exported documents, e.g. by writing them to disk or offering a download.
pub trait DownloadSink {
    /// Deliver a file and return where it ended up.
    fn deliver(&mut self, file: ExportFile) -> BackendResult<PathBuf>;
}

impl<S: DownloadSink + ?Sized> DownloadSink for &mut S {
    fn deliver(&mut self, file: ExportFile) -> BackendResult<PathBuf> {
        (**self).deliver(file)
    }
}
