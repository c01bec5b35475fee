//! Inkleaf command line: list stored documents and export pages to SVG.

use clap::{Parser, Subcommand};
use inkleaf_core::{ConfigError, Document, EngineConfig, FileStorage, Storage, StorageError, Viewport};
use inkleaf_render::{RenderOptions, RendererError, SvgTarget, render_page};
use kurbo::Size;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;

#[derive(Debug, Parser)]
#[command(name = "inkleaf", version, about = "Export annotated Inkleaf pages")]
struct Args {
    /// Directory holding stored documents (defaults to the user data dir)
    #[arg(short = 's', long = "store", global = true)]
    store: Option<PathBuf>,

    /// JSON file with engine configuration overrides
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List stored document ids
    List,
    /// Render one page of a document to an SVG file
    Export {
        /// Document id
        id: String,
        /// Output SVG path
        output: PathBuf,
        /// Page to export (0-based)
        #[arg(short = 'p', long = "page", default_value_t = 0)]
        page: usize,
        /// Output width in pixels
        #[arg(short = 'w', long = "width", default_value_t = 1000.0)]
        width: f64,
        /// Output height in pixels (defaults to the page aspect ratio)
        #[arg(long = "height")]
        height: Option<f64>,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Render(#[from] RendererError),
    #[error("Failed to write {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Document {id} has {count} pages, no page {page}")]
    PageOutOfRange { id: String, page: usize, count: usize },
    #[error("Output size must be positive, got {0}x{1}")]
    InvalidSize(f64, f64),
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("inkleaf: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let storage = match &args.store {
        Some(dir) => FileStorage::new(dir.clone())?,
        None => FileStorage::default_location()?,
    };
    log::debug!("Using document store at {}", storage.base_path().display());

    match args.command {
        Command::List => {
            for id in pollster::block_on(storage.list())? {
                println!("{}", id);
            }
            Ok(())
        }
        Command::Export {
            id,
            output,
            page,
            width,
            height,
        } => {
            let document = pollster::block_on(storage.load(&id))?;
            export_page(&config, &document, page, width, height, &output)
        }
    }
}

/// Device size for an export: `width` wide, tall enough to keep the page
/// aspect ratio unless `height` is given.
fn output_size(config: &EngineConfig, width: f64, height: Option<f64>) -> Result<Size, CliError> {
    let extent = config.document_space.extent();
    let height = height.unwrap_or_else(|| {
        if extent.width > 0.0 {
            width * extent.height / extent.width
        } else {
            width
        }
    });
    if width <= 0.0 || height <= 0.0 || !width.is_finite() || !height.is_finite() {
        return Err(CliError::InvalidSize(width, height));
    }
    Ok(Size::new(width, height))
}

/// Render one page into an SVG target of `size` pixels.
fn page_svg(config: &EngineConfig, document: &Document, index: usize, size: Size) -> Result<SvgTarget, CliError> {
    let page = document.page(index).ok_or_else(|| CliError::PageOutOfRange {
        id: document.id.clone(),
        page: index,
        count: document.page_count(),
    })?;

    let viewport = Viewport::from_config(config, size);
    let options = RenderOptions::default().with_stroke(config.stroke.clone());
    let mut target = SvgTarget::new(size);
    render_page(
        &options,
        page,
        config.document_space.extent(),
        None,
        viewport.document_to_device(),
        &mut target,
    );
    Ok(target)
}

fn export_page(
    config: &EngineConfig,
    document: &Document,
    index: usize,
    width: f64,
    height: Option<f64>,
    output: &Path,
) -> Result<(), CliError> {
    let size = output_size(config, width, height)?;
    let target = page_svg(config, document, index, size)?;

    let file = File::create(output).map_err(|source| CliError::Output {
        path: output.to_path_buf(),
        source,
    })?;
    write_svg(&target, file, output)?;

    log::info!(
        "Exported page {} of '{}' to {} ({}x{})",
        index,
        document.name,
        output.display(),
        size.width,
        size.height
    );
    Ok(())
}

/// Write the finished document through a buffer, surfacing the final flush.
fn write_svg(target: &SvgTarget, sink: impl Write, path: &Path) -> Result<(), CliError> {
    let mut writer = BufWriter::new(sink);
    target.write_to(&mut writer)?;
    writer.flush().map_err(|source| CliError::Output {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkleaf_core::elements::{SerializableColor, Shape, ShapeKind};
    use inkleaf_core::viewport::DocumentSpace;
    use kurbo::Point;

    fn sample_document() -> Document {
        let mut doc = Document::new("Sketch");
        let line = Shape::new(
            ShapeKind::Line,
            Point::new(0.0, 0.0),
            Point::new(500.0, 707.0),
            SerializableColor::black(),
            2.0,
        );
        doc.append_element(line.into());
        doc
    }

    #[test]
    fn test_output_size_keeps_aspect() {
        let size = output_size(&EngineConfig::notebook(), 500.0, None).unwrap();
        assert!((size.height - 707.0).abs() < 1e-9);

        let config = EngineConfig {
            document_space: DocumentSpace::Percent,
            ..EngineConfig::default()
        };
        let size = output_size(&config, 300.0, Some(400.0)).unwrap();
        assert_eq!(size, Size::new(300.0, 400.0));
    }

    #[test]
    fn test_output_size_rejects_zero() {
        assert!(matches!(
            output_size(&EngineConfig::notebook(), 0.0, None),
            Err(CliError::InvalidSize(..))
        ));
    }

    #[test]
    fn test_page_svg_scales_to_output() {
        let config = EngineConfig::notebook();
        let doc = sample_document();
        let svg = page_svg(&config, &doc, 0, Size::new(500.0, 707.0)).unwrap().finish();
        assert!(svg.contains(r#"width="500" height="707""#));
        assert!(svg.contains("transform=\"matrix(0.5 0 0 0.5 0 0)\""));
        assert!(svg.contains("L500,707"));
    }

    /// Sink that accepts nothing.
    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("no space left on device"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_failed_flush_is_reported() {
        let target = SvgTarget::new(Size::new(10.0, 10.0));
        let err = write_svg(&target, FullDisk, Path::new("out.svg")).unwrap_err();
        assert!(matches!(err, CliError::Output { ref path, .. } if path == Path::new("out.svg")));
    }

    #[test]
    fn test_missing_page_is_an_error() {
        let doc = sample_document();
        let err = page_svg(&EngineConfig::notebook(), &doc, 3, Size::new(10.0, 10.0)).unwrap_err();
        assert!(matches!(err, CliError::PageOutOfRange { page: 3, count: 1, .. }));
    }

    #[test]
    fn test_export_from_file_storage() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("docs")).unwrap();
        let doc = sample_document();
        pollster::block_on(storage.save(&doc.id, &doc)).unwrap();

        let loaded = pollster::block_on(storage.load(&doc.id)).unwrap();
        let out = dir.path().join("page.svg");
        export_page(&EngineConfig::notebook(), &loaded, 0, 1000.0, None, &out).unwrap();

        let svg = std::fs::read_to_string(&out).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("stroke=\"rgb(0,0,0)\""));
    }
}
