//! In-memory backend.

use std::collections::HashMap;

use super::{AnnotationBackend, BackendError, BackendResult, ExportFile, ExportFormat, ImageId, ImageInfo, export};
use crate::model::AnnotationSet;
use crate::wire::{self, WireError};

/// Backend that keeps images and annotations in memory.
///
/// It can be told to fail every request, to exercise error handling.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    images: HashMap<ImageId, ImageInfo>,
    annotations: HashMap<ImageId, AnnotationSet>,
    failure: Option<String>,
    saves: usize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an image, replacing any image with the same id.
    pub fn add_image(&mut self, info: ImageInfo) {
        self.images.insert(info.id, info);
    }

    pub fn with_image(mut self, info: ImageInfo) -> Self {
        self.add_image(info);
        self
    }

    pub fn image(&self, id: ImageId) -> Option<&ImageInfo> {
        self.images.get(&id)
    }

    /// Store annotations from a wire-format payload, as if saved by another client.
    pub fn insert_annotations_json(&mut self, id: ImageId, json: &str) -> Result<(), WireError> {
        let set = wire::parse_annotation_set(json)?;
        self.annotations.insert(id, set);
        Ok(())
    }

    /// The stored annotations of an image.
    pub fn annotations(&self, id: ImageId) -> Option<&AnnotationSet> {
        self.annotations.get(&id)
    }

    /// Make every subsequent request fail with `message`, or succeed again with `None`.
    pub fn set_failure(&mut self, message: Option<String>) {
        self.failure = message;
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves
    }

    fn check(&self) -> BackendResult<()> {
        match &self.failure {
            Some(message) => Err(BackendError::transport(message.clone())),
            None => Ok(()),
        }
    }

    fn export_format(&self, image: ImageId, format: ExportFormat) -> BackendResult<ExportFile> {
        self.check()?;
        let info = self
            .images
            .get(&image)
            .ok_or(BackendError::ImageNotFound { id: image })?;
        let empty = AnnotationSet::new();
        let annotations = self.annotations.get(&image).unwrap_or(&empty);
        export::export(format, info, annotations)
    }
}

impl AnnotationBackend for MemoryBackend {
    fn load(&mut self, image: ImageId) -> BackendResult<AnnotationSet> {
        self.check()?;
        Ok(self.annotations.get(&image).cloned().unwrap_or_default())
    }

    fn save(&mut self, image: ImageId, annotations: &AnnotationSet) -> BackendResult<()> {
        self.check()?;
        self.annotations.insert(image, annotations.clone());
        self.saves += 1;
        log::debug!("Stored {} annotations for image {}", annotations.len(), image);
        Ok(())
    }

    fn export_json(&mut self, image: ImageId) -> BackendResult<ExportFile> {
        self.export_format(image, ExportFormat::Json)
    }

    fn export_coco(&mut self, image: ImageId) -> BackendResult<ExportFile> {
        self.export_format(image, ExportFormat::Coco)
    }

    fn export_yolo(&mut self, image: ImageId) -> BackendResult<ExportFile> {
        self.export_format(image, ExportFormat::Yolo)
    }
}
