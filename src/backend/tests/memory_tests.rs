//! Tests for the in-memory backend and the collecting sink.

use super::{sample_image, sample_set};
use crate::backend::{
    AnnotationBackend, BackendError, CollectingSink, DownloadSink, ExportFormat, ImageId,
    MemoryBackend,
};

#[test]
fn test_load_unknown_image_is_empty() {
    let mut backend = MemoryBackend::new();
    let set = backend.load(ImageId(1)).expect("load");
    assert!(set.is_empty());
}

#[test]
fn test_save_replaces_annotations() {
    let mut backend = MemoryBackend::new().with_image(sample_image());
    backend.save(ImageId(3), &sample_set()).expect("save");
    assert_eq!(backend.load(ImageId(3)).expect("load"), sample_set());

    let fewer = sample_set().without(&crate::model::AnnotationId::new("a")).expect("a exists");
    backend.save(ImageId(3), &fewer).expect("save");
    assert_eq!(backend.annotations(ImageId(3)).map(|s| s.len()), Some(3));
    assert_eq!(backend.save_count(), 2);
}

#[test]
fn test_failure_mode() {
    let mut backend = MemoryBackend::new().with_image(sample_image());
    backend.set_failure(Some("server unavailable".to_string()));
    assert!(matches!(
        backend.save(ImageId(3), &sample_set()),
        Err(BackendError::Transport { .. })
    ));
    assert!(backend.export_json(ImageId(3)).is_err());
    assert_eq!(backend.save_count(), 0);

    backend.set_failure(None);
    assert!(backend.save(ImageId(3), &sample_set()).is_ok());
}

#[test]
fn test_export_unknown_image() {
    let mut backend = MemoryBackend::new();
    assert!(matches!(
        backend.export(ImageId(8), ExportFormat::Coco),
        Err(BackendError::ImageNotFound { id: ImageId(8) })
    ));
}

#[test]
fn test_lenient_seed_payload() {
    let mut backend = MemoryBackend::new();
    backend
        .insert_annotations_json(
            ImageId(2),
            r#"[{"type":"box","x":1,"y":2,"w":30,"h":40,"id":5},{"type":"triangle"}]"#,
        )
        .expect("list payload");
    assert_eq!(backend.load(ImageId(2)).expect("load").len(), 1);
    assert!(backend.insert_annotations_json(ImageId(2), "{}").is_err());
}

#[test]
fn test_collecting_sink() {
    let mut backend = MemoryBackend::new().with_image(sample_image());
    backend.save(ImageId(3), &sample_set()).expect("save");

    let mut sink = CollectingSink::new();
    for format in ExportFormat::all() {
        let file = backend.export(ImageId(3), *format).expect("export");
        sink.deliver(file).expect("deliver");
    }
    let names: Vec<&str> = sink.files.iter().map(|f| f.filename.as_str()).collect();
    assert_eq!(
        names,
        vec!["annotations_3.json", "coco_annotations_3.json", "yolo_annotations_3.txt"]
    );
}
