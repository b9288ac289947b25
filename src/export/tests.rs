use std::{
    fs,
    io::Read,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use flate2::read::ZlibDecoder;

use super::{
    encoder::{DocumentEncoder, PdfEncoder},
    file::generate_filename,
    pipeline::Exporter,
    types::{ExportError, PageLayout},
};
use crate::config::Config;
use crate::draw::{CanvasSurface, Raster};
use crate::draw::color::RED;
use crate::input::{DrawingSession, StyleState};
use crate::session::MemoryStore;
use crate::util::Point;

#[derive(Clone, Default)]
struct MockEncoder {
    pub should_fail: bool,
    pub calls: Arc<Mutex<Vec<(u32, u32, PathBuf)>>>,
}

impl DocumentEncoder for MockEncoder {
    fn extension(&self) -> &'static str {
        "mock"
    }

    fn encode(&self, raster: &Raster, path: &Path) -> Result<PageLayout, ExportError> {
        self.calls
            .lock()
            .unwrap()
            .push((raster.width(), raster.height(), path.to_path_buf()));
        if self.should_fail {
            return Err(ExportError::Encode("mock failure".to_string()));
        }
        fs::write(path, b"mock")?;
        Ok(PageLayout::single_page(raster.width(), raster.height()))
    }
}

fn blank_raster(width: i32, height: i32) -> Raster {
    CanvasSurface::new(width, height).unwrap().raster().unwrap()
}

/// PDF object text with every Flate stream inflated in place and whitespace
/// collapsed, so dictionaries inside compressed object streams are searchable.
fn pdf_text(bytes: &[u8]) -> String {
    let mut text = String::from_utf8_lossy(bytes).into_owned();
    let mut rest = bytes;
    while let Some(at) = find(rest, b"stream") {
        let is_end = at >= 3 && &rest[at - 3..at] == b"end";
        rest = &rest[at + b"stream".len()..];
        if is_end {
            continue;
        }
        let body = rest
            .strip_prefix(b"\r\n")
            .or_else(|| rest.strip_prefix(b"\n"))
            .unwrap_or(rest);
        let end = find(body, b"endstream").unwrap_or(body.len());
        let mut inflated = Vec::new();
        let _ = ZlibDecoder::new(&body[..end]).read_to_end(&mut inflated);
        text.push('\n');
        text.push_str(&String::from_utf8_lossy(&inflated));
    }

    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace("[ ", "[")
        .replace(" ]", "]")
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Number of `/Type /Page` dictionaries, not counting the `/Pages` tree node.
fn page_count(text: &str) -> usize {
    text.match_indices("/Type /Page")
        .filter(|(at, matched)| {
            !text[at + matched.len()..]
                .starts_with(|c: char| c.is_ascii_alphanumeric())
        })
        .count()
}

#[test]
fn generated_names_are_unique_tokens() {
    let first = generate_filename("pdf");
    let second = generate_filename("pdf");
    assert_ne!(first, second);

    let (token, ext) = first.split_once('.').unwrap();
    assert_eq!(ext, "pdf");
    assert_eq!(token.len(), 32);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn exporter_creates_directory_and_writes_one_file_per_call() {
    let temp = tempfile::tempdir().unwrap();
    let target = temp.path().join("nested").join("exports");
    let encoder = MockEncoder::default();
    let exporter = Exporter::with_encoder(&target, Arc::new(encoder.clone()));

    let raster = blank_raster(300, 200);
    let first = exporter.export(&raster).unwrap();
    let second = exporter.export(&raster).unwrap();

    assert!(target.is_dir());
    assert_ne!(first.path, second.path);
    assert!(first.path.exists());
    assert_eq!(
        first.path.extension().and_then(|ext| ext.to_str()),
        Some("mock")
    );

    let calls = encoder.calls.lock().unwrap();
    assert_eq!(calls.len(), 2);
    assert_eq!((calls[0].0, calls[0].1), (300, 200));
}

#[test]
fn exporter_propagates_encoder_errors() {
    let temp = tempfile::tempdir().unwrap();
    let encoder = MockEncoder {
        should_fail: true,
        ..Default::default()
    };
    let exporter = Exporter::with_encoder(temp.path(), Arc::new(encoder));

    let err = exporter.export(&blank_raster(10, 10)).unwrap_err();
    assert!(matches!(err, ExportError::Encode(_)));
}

#[test]
fn pdf_page_matches_raster_size() {
    let temp = tempfile::tempdir().unwrap();
    let exporter = Exporter::new(temp.path());

    let document = exporter.export(&blank_raster(300, 200)).unwrap();
    assert_eq!(document.layout, PageLayout::single_page(300, 200));
    assert_eq!(document.layout.pages, 1);
    assert_eq!((document.layout.image_x, document.layout.image_y), (0.0, 0.0));

    let bytes = fs::read(&document.path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));

    let text = pdf_text(&bytes);
    assert_eq!(page_count(&text), 1);
    assert!(text.contains("/Count 1"), "pages tree should hold one page");
    assert!(
        text.contains("/MediaBox [0 0 300 200]"),
        "page should span the raster exactly"
    );
}

#[test]
fn session_export_writes_single_page_sized_to_canvas() {
    let mut config = Config::default();
    config.canvas.width = 300;
    config.canvas.height = 200;
    let mut session = DrawingSession::new(&config, Box::new(MemoryStore::new()));
    session.set_color(RED);
    session.set_width(6);
    session.on_pointer_down(Point::new(10.0, 10.0));
    session.on_pointer_move(Point::new(290.0, 190.0));
    session.on_pointer_up();

    let temp = tempfile::tempdir().unwrap();
    let document = session.export(&Exporter::new(temp.path())).unwrap();
    assert_eq!(document.path.parent(), Some(temp.path()));

    let text = pdf_text(&fs::read(&document.path).unwrap());
    assert_eq!(page_count(&text), 1);
    assert!(text.contains("/MediaBox [0 0 300 200]"));
    assert!(text.contains("/Subtype /Image"), "page should carry the raster image");
}

#[test]
fn pdf_encoder_accepts_painted_raster() {
    let temp = tempfile::tempdir().unwrap();
    let mut surface = CanvasSurface::new(64, 32).unwrap();
    let style = StyleState::new(RED, 4, 1, 15);
    surface
        .paint_segment(Point::new(4.0, 16.0), Point::new(60.0, 16.0), &style)
        .unwrap();
    let raster = surface.raster().unwrap();

    let path = temp.path().join("painted.pdf");
    let layout = PdfEncoder.encode(&raster, &path).unwrap();
    assert_eq!((layout.width, layout.height), (64.0, 32.0));
    assert!(fs::metadata(&path).unwrap().len() > 0);
}

#[test]
fn exporter_from_config_expands_directory() {
    let config = crate::config::ExportConfig {
        directory: Some("/tmp/inkpad-exports".to_string()),
    };
    let exporter = Exporter::from_config(&config);
    assert_eq!(exporter.directory(), Path::new("/tmp/inkpad-exports"));
}
