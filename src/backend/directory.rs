//! Directory-backed backend.
//!
//! Layout under the root directory:
//!
//! ```text
//! images.json              image index, a list of image records
//! images/<name>            imported image files
//! annotations/<id>.json    wire-format annotation list per image
//! ```

use std::path::{Path, PathBuf};

use image::ImageFormat;
use uuid::Uuid;

use super::{
    AnnotationBackend, BackendError, BackendResult, ExportFile, ExportFormat, ImageId, ImageInfo,
    export,
};
use crate::model::AnnotationSet;
use crate::wire;

const INDEX_FILE: &str = "images.json";
const IMAGES_DIR: &str = "images";
const ANNOTATIONS_DIR: &str = "annotations";

/// Image types accepted by `import_image`.
const ACCEPTED_FORMATS: [ImageFormat; 4] = [
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

/// Backend storing images and annotations as JSON files under a directory.
#[derive(Debug, Clone)]
pub struct DirectoryBackend {
    root: PathBuf,
}

impl DirectoryBackend {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> BackendResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(root.join(ANNOTATIONS_DIR))?;
        log::debug!("Opened annotation store at {:?}", root);
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILE)
    }

    fn annotations_path(&self, image: ImageId) -> PathBuf {
        self.root.join(ANNOTATIONS_DIR).join(format!("{}.json", image))
    }

    /// All registered images. A store without an index has none.
    pub fn images(&self) -> BackendResult<Vec<ImageInfo>> {
        let path = self.index_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let json = std::fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn image(&self, id: ImageId) -> BackendResult<ImageInfo> {
        self.images()?
            .into_iter()
            .find(|info| info.id == id)
            .ok_or(BackendError::ImageNotFound { id })
    }

    /// Register an image, replacing any image with the same id.
    pub fn add_image(&mut self, info: ImageInfo) -> BackendResult<()> {
        let mut images = self.images()?;
        images.retain(|existing| existing.id != info.id);
        log::info!("Registered image {} ({})", info.id, info.filename);
        images.push(info);
        images.sort_by_key(|i| i.id);
        write_atomic(&self.index_path(), serde_json::to_string_pretty(&images)?.as_bytes())
    }

    /// Path of a registered image's file inside the store.
    pub fn image_file(&self, info: &ImageInfo) -> PathBuf {
        self.root.join(IMAGES_DIR).join(&info.filename)
    }

    /// Copy an image file into the store and register it under the next free id.
    ///
    /// The file extension and the file content must both name the same accepted
    /// format. The stored copy is named `<stem>_<uuid><ext>`.
    pub fn import_image(&mut self, source: &Path) -> BackendResult<ImageInfo> {
        let claimed = ImageFormat::from_path(source)
            .ok()
            .filter(|format| ACCEPTED_FORMATS.contains(format))
            .ok_or_else(|| {
                BackendError::unsupported_image(source, "extension is not png, jpeg, gif or webp")
            })?;

        let bytes = std::fs::read(source)?;
        let sniffed = image::guess_format(&bytes).map_err(|_| {
            BackendError::unsupported_image(source, "content is not a recognized image")
        })?;
        if sniffed != claimed {
            return Err(BackendError::unsupported_image(
                source,
                format!("content is {:?} but the extension says {:?}", sniffed, claimed),
            ));
        }
        let (width, height) = image::image_dimensions(source)?;

        let next_id = self
            .images()?
            .iter()
            .map(|info| info.id.0)
            .max()
            .map_or(1, |max| max + 1);
        let info = ImageInfo::new(ImageId(next_id), unique_filename(source))
            .with_dimensions(width, height);

        let dest = self.image_file(&info);
        std::fs::create_dir_all(self.root.join(IMAGES_DIR))?;
        std::fs::write(&dest, &bytes)?;
        if let Err(e) = self.add_image(info.clone()) {
            let _ = std::fs::remove_file(&dest);
            return Err(e);
        }
        log::info!(
            "Imported {:?} as image {} ({}x{})",
            source,
            info.id,
            width,
            height
        );
        Ok(info)
    }

    fn export_format(&self, image: ImageId, format: ExportFormat) -> BackendResult<ExportFile> {
        let info = self.image(image)?;
        let annotations = self.read_annotations(image)?;
        export::export(format, &info, &annotations)
    }

    fn read_annotations(&self, image: ImageId) -> BackendResult<AnnotationSet> {
        let path = self.annotations_path(image);
        if !path.exists() {
            log::debug!("No annotations stored for image {}", image);
            return Ok(AnnotationSet::new());
        }
        let json = std::fs::read_to_string(&path)?;
        Ok(wire::parse_annotation_set(&json)?)
    }
}

/// `<stem>_<uuid><ext>`, with anything outside `[A-Za-z0-9._-]` in the stem
/// replaced by `_`.
fn unique_filename(source: &Path) -> String {
    let stem: String = source
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let stem = if stem.trim_matches(['.', '_']).is_empty() {
        "image".to_string()
    } else {
        stem
    };
    let ext = source
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_ascii_lowercase()))
        .unwrap_or_default();
    format!("{}_{}{}", stem, Uuid::new_v4(), ext)
}

/// Write via a temporary sibling file so readers never see a partial file.
fn write_atomic(path: &Path, bytes: &[u8]) -> BackendResult<()> {
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

impl AnnotationBackend for DirectoryBackend {
    fn load(&mut self, image: ImageId) -> BackendResult<AnnotationSet> {
        self.read_annotations(image)
    }

    fn save(&mut self, image: ImageId, annotations: &AnnotationSet) -> BackendResult<()> {
        let json = wire::to_json_pretty(annotations)?;
        write_atomic(&self.annotations_path(image), json.as_bytes())?;
        log::info!("Saved {} annotations for image {}", annotations.len(), image);
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
