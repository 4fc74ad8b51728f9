//! labelkit command line: add images to a store, render or export the stored
//! annotations of one image.
//!
//! ```text
//! labelkit add-image <store-dir> <image-file>
//! labelkit render <store-dir> <image-id> <image-file> <out.png>
//! labelkit export <store-dir> <image-id> <json|coco|yolo> <out-dir>
//! ```

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::path::PathBuf;

    use labelkit::backend::{BackendError, CollectingSink, DirectoryBackend, DirectorySink};
    use labelkit::render::{self, RenderError};
    use labelkit::{EditorConfig, Editor, EditorError, EditorMessage, ExportFormat, ImageId};
    use thiserror::Error;

    pub const USAGE: &str = "usage:\n  \
        labelkit add-image <store-dir> <image-file>\n  \
        labelkit render <store-dir> <image-id> <image-file> <out.png>\n  \
        labelkit export <store-dir> <image-id> <json|coco|yolo> <out-dir>";

    #[derive(Error, Debug)]
    pub enum CliError {
        #[error("{0}")]
        Usage(String),

        #[error(transparent)]
        Editor(#[from] EditorError),

        #[error(transparent)]
        Backend(#[from] BackendError),

        #[error(transparent)]
        Render(#[from] RenderError),

        #[error("Failed to read image: {0}")]
        Image(#[from] image::ImageError),

        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),

        #[error("{0}")]
        Export(String),
    }

    pub enum Command {
        AddImage {
            store: PathBuf,
            image_file: PathBuf,
        },
        Render {
            store: PathBuf,
            image: ImageId,
            image_file: PathBuf,
            output: PathBuf,
        },
        Export {
            store: PathBuf,
            image: ImageId,
            format: ExportFormat,
            out_dir: PathBuf,
        },
    }

    impl Command {
        pub fn parse(args: &[String]) -> Result<Self, CliError> {
            match args {
                [command, store, image_file] if command == "add-image" => Ok(Command::AddImage {
                    store: store.into(),
                    image_file: image_file.into(),
                }),
                [command, store, image, a, b] => {
                    let image: ImageId = image
                        .parse()
                        .map_err(|_| CliError::Usage(format!("Invalid image id: {}", image)))?;
                    match command.as_str() {
                        "render" => Ok(Command::Render {
                            store: store.into(),
                            image,
                            image_file: a.into(),
                            output: b.into(),
                        }),
                        "export" => Ok(Command::Export {
                            store: store.into(),
                            image,
                            format: a.parse().map_err(CliError::Usage)?,
                            out_dir: b.into(),
                        }),
                        other => Err(CliError::Usage(format!(
                            "Unknown command '{}'\n{}",
                            other, USAGE
                        ))),
                    }
                }
                _ => Err(CliError::Usage(USAGE.to_string())),
            }
        }

        pub fn run(self, config: &EditorConfig) -> Result<(), CliError> {
            match self {
                Command::AddImage { store, image_file } => {
                    let mut backend = DirectoryBackend::open(store)?;
                    let info = backend.import_image(&image_file)?;
                    println!("{}", info.id);
                    Ok(())
                }
                Command::Render {
                    store,
                    image,
                    image_file,
                    output,
                } => {
                    let backend = DirectoryBackend::open(store)?;
                    let editor = Editor::open(image, backend, CollectingSink::new(), config)?;
                    let base = image::open(&image_file)?.to_rgba8();
                    let canvas = editor.render(&base)?;
                    std::fs::write(&output, render::render_to_png(&canvas)?)?;
                    log::info!(
                        "Rendered {} annotations to {:?}",
                        editor.annotations().len(),
                        output
                    );
                    Ok(())
                }
                Command::Export {
                    store,
                    image,
                    format,
                    out_dir,
                } => {
                    let backend = DirectoryBackend::open(store)?;
                    let sink = DirectorySink::new(out_dir);
                    let mut editor = Editor::open(image, backend, sink, config)?;
                    editor.update(EditorMessage::Export(format));
                    match editor.status() {
                        Some(status) if status.is_error() => {
                            Err(CliError::Export(status.text.clone()))
                        }
                        _ => Ok(()),
                    }
                }
            }
        }
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use labelkit::EditorConfig;

    let config = EditorConfig::load_from_default_path().unwrap_or_default();
    let default_level = config.preferences.log_level.to_level_filter().as_str();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = cli::Command::parse(&args).and_then(|command| command.run(&config));

    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(cli::CliError::Usage(message)) => {
            eprintln!("{}", message);
            std::process::ExitCode::from(2)
        }
        Err(e) => {
            log::error!("{}", e);
            std::process::ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}
