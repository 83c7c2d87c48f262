//! Turns a document on disk into a [`Deck`].
//!
//! Decoding is delegated to external converters: `pdftoppm` rasterises PDF
//! pages, and PowerPoint files are first converted to PDF with a headless
//! LibreOffice (`soffice`). Rendered pages are kept in the per-document cache
//! and reused while the source file's size, mtime and the render DPI are
//! unchanged.

use crate::cache;
use crate::deck::{Deck, Slide};
use crate::error::{Result, ViewerError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::UNIX_EPOCH;
use tracing::{debug, info, warn};

pub const DEFAULT_RENDER_DPI: u32 = 144;
const PAGE_PREFIX: &str = "page";
const META_FILE: &str = "meta.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    PowerPoint,
}

impl DocumentKind {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        match ext.as_deref() {
            Some("pdf") => Ok(DocumentKind::Pdf),
            Some("ppt") | Some("pptx") => Ok(DocumentKind::PowerPoint),
            Some(other) => Err(ViewerError::UnsupportedFormat(format!(".{other}"))),
            None => Err(ViewerError::UnsupportedFormat(format!(
                "{} has no file extension",
                path.display()
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoaderOptions {
    pub pdftoppm_bin: String,
    pub soffice_bin: String,
    pub cache_root: PathBuf,
    pub render_dpi: u32,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        LoaderOptions {
            pdftoppm_bin: "pdftoppm".to_string(),
            soffice_bin: "soffice".to_string(),
            cache_root: PathBuf::from(cache::DEFAULT_CACHE_DIR),
            render_dpi: DEFAULT_RENDER_DPI,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct RenderMeta {
    source_len: u64,
    source_modified_unix_secs: Option<u64>,
    render_dpi: u32,
    pages: usize,
}

/// Decode every page of `path` into a deck. Blocking; run it off the UI thread.
pub fn load_deck(path: &Path, options: &LoaderOptions) -> Result<Deck> {
    let kind = DocumentKind::from_path(path)?;
    info!(path = %path.display(), ?kind, "Loading presentation");

    let signature = source_signature(path, options.render_dpi)?;
    let slides_dir = cache::slides_dir(&options.cache_root, path);

    if let Some(pages) = cached_pages(&slides_dir, &signature) {
        info!(path = %path.display(), pages = pages.len(), "Using cached slide renders");
        return deck_from_pages(path, &pages);
    }

    if slides_dir.exists() {
        fs::remove_dir_all(&slides_dir).map_err(|err| {
            ViewerError::io(format!("clearing {}", slides_dir.display()), err)
        })?;
    }
    fs::create_dir_all(&slides_dir)
        .map_err(|err| ViewerError::io(format!("creating {}", slides_dir.display()), err))?;

    let pdf = match kind {
        DocumentKind::Pdf => path.to_path_buf(),
        DocumentKind::PowerPoint => convert_to_pdf(path, &slides_dir, &options.soffice_bin)?,
    };
    render_pages(&pdf, &slides_dir, options)?;

    let pages = list_pages(&slides_dir)?;
    if pages.is_empty() {
        return Err(ViewerError::DecodeFailure(format!(
            "{} produced no pages",
            path.display()
        )));
    }

    let meta = RenderMeta {
        pages: pages.len(),
        ..signature
    };
    if let Err(err) = write_meta(&slides_dir, &meta) {
        warn!(path = %path.display(), "Failed to record slide cache metadata: {err}");
    }

    deck_from_pages(path, &pages)
}

fn deck_from_pages(source: &Path, pages: &[PathBuf]) -> Result<Deck> {
    let mut slides = Vec::with_capacity(pages.len());
    for page in pages {
        let image = image::open(page).map_err(|err| {
            ViewerError::DecodeFailure(format!("{}: {err}", page.display()))
        })?;
        slides.push(Slide::new(image.to_rgba8()));
    }
    info!(path = %source.display(), slides = slides.len(), "Presentation loaded");
    Ok(Deck::new(slides).with_source(source))
}

fn source_signature(path: &Path, render_dpi: u32) -> Result<RenderMeta> {
    let meta = fs::metadata(path)
        .map_err(|err| ViewerError::io(format!("reading {}", path.display()), err))?;
    if !meta.is_file() {
        return Err(ViewerError::DecodeFailure(format!(
            "{} is not a regular file",
            path.display()
        )));
    }
    let modified = meta
        .modified()
        .ok()
        .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
        .map(|duration| duration.as_secs());
    Ok(RenderMeta {
        source_len: meta.len(),
        source_modified_unix_secs: modified,
        render_dpi,
        pages: 0,
    })
}

fn cached_pages(slides_dir: &Path, signature: &RenderMeta) -> Option<Vec<PathBuf>> {
    let data = fs::read_to_string(slides_dir.join(META_FILE)).ok()?;
    let cached: RenderMeta = toml::from_str(&data).ok()?;
    let matches = cached.source_len == signature.source_len
        && cached.source_modified_unix_secs == signature.source_modified_unix_secs
        && cached.render_dpi == signature.render_dpi;
    if !matches {
        debug!(dir = %slides_dir.display(), "Slide cache is stale");
        return None;
    }
    let pages = list_pages(slides_dir).ok()?;
    (pages.len() == cached.pages && !pages.is_empty()).then_some(pages)
}

fn write_meta(slides_dir: &Path, meta: &RenderMeta) -> Result<()> {
    let path = slides_dir.join(META_FILE);
    let encoded = toml::to_string(meta).map_err(|err| {
        ViewerError::io(
            format!("encoding {}", path.display()),
            io::Error::other(err.to_string()),
        )
    })?;
    fs::write(&path, encoded)
        .map_err(|err| ViewerError::io(format!("writing {}", path.display()), err))
}

fn convert_to_pdf(source: &Path, work_dir: &Path, soffice_bin: &str) -> Result<PathBuf> {
    info!(path = %source.display(), "Converting slides to PDF with LibreOffice");
    let output = Command::new(soffice_bin)
        .arg("--headless")
        .arg("--convert-to")
        .arg("pdf")
        .arg("--outdir")
        .arg(work_dir)
        .arg(source)
        .output()
        .map_err(|err| tool_error(soffice_bin, "LibreOffice", err))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ViewerError::DecodeFailure(format!(
            "{soffice_bin} failed for {}: {}",
            source.display(),
            stderr.trim()
        )));
    }

    let stem = source.file_stem().unwrap_or_default().to_string_lossy();
    let pdf = work_dir.join(format!("{stem}.pdf"));
    if !pdf.is_file() {
        return Err(ViewerError::DecodeFailure(format!(
            "{soffice_bin} did not produce {}",
            pdf.display()
        )));
    }
    Ok(pdf)
}

fn render_pages(pdf: &Path, out_dir: &Path, options: &LoaderOptions) -> Result<()> {
    debug!(pdf = %pdf.display(), dpi = options.render_dpi, "Rasterising pages");
    let output = Command::new(&options.pdftoppm_bin)
        .arg("-r")
        .arg(options.render_dpi.to_string())
        .arg("-png")
        .arg(pdf)
        .arg(out_dir.join(PAGE_PREFIX))
        .output()
        .map_err(|err| tool_error(&options.pdftoppm_bin, "poppler-utils", err))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ViewerError::DecodeFailure(format!(
            "{} failed for {}: {}",
            options.pdftoppm_bin,
            pdf.display(),
            stderr.trim()
        )));
    }
    Ok(())
}

fn tool_error(bin: &str, package: &str, err: io::Error) -> ViewerError {
    if err.kind() == io::ErrorKind::NotFound {
        ViewerError::DecodeFailure(format!("{bin} not found (install {package})"))
    } else {
        ViewerError::io(format!("starting {bin}"), err)
    }
}

/// Rendered page files in page order. `pdftoppm` zero-pads numbers to the
/// width of the page count, so order by the parsed number, not by name.
fn list_pages(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .map_err(|err| ViewerError::io(format!("listing {}", dir.display()), err))?;
    let mut pages: Vec<(u32, PathBuf)> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter_map(|path| page_number(&path).map(|n| (n, path)))
        .collect();
    pages.sort_by_key(|(n, _)| *n);
    Ok(pages.into_iter().map(|(_, path)| path).collect())
}

fn page_number(path: &Path) -> Option<u32> {
    if path.extension()?.to_str()? != "png" {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    let digits = stem.strip_prefix(PAGE_PREFIX)?.strip_prefix('-')?;
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn options_in(root: &Path) -> LoaderOptions {
        LoaderOptions {
            pdftoppm_bin: "podium-test-missing-pdftoppm".to_string(),
            soffice_bin: "podium-test-missing-soffice".to_string(),
            cache_root: root.to_path_buf(),
            render_dpi: DEFAULT_RENDER_DPI,
        }
    }

    #[test]
    fn detects_kind_from_extension() {
        assert_eq!(DocumentKind::from_path(Path::new("a.PDF")).ok(), Some(DocumentKind::Pdf));
        assert_eq!(
            DocumentKind::from_path(Path::new("b.pptx")).ok(),
            Some(DocumentKind::PowerPoint)
        );
        assert_eq!(
            DocumentKind::from_path(Path::new("c.ppt")).ok(),
            Some(DocumentKind::PowerPoint)
        );
        assert!(matches!(
            DocumentKind::from_path(Path::new("notes.docx")),
            Err(ViewerError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            DocumentKind::from_path(Path::new("README")),
            Err(ViewerError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn unsupported_format_is_rejected_before_touching_disk() {
        let root = tempfile::tempdir().expect("tempdir");
        let result = load_deck(Path::new("/does/not/exist.key"), &options_in(root.path()));
        assert!(matches!(result, Err(ViewerError::UnsupportedFormat(_))));
    }

    #[test]
    fn missing_source_is_io_error() {
        let root = tempfile::tempdir().expect("tempdir");
        let result = load_deck(&root.path().join("gone.pdf"), &options_in(root.path()));
        assert!(matches!(result, Err(ViewerError::Io { .. })));
    }

    #[test]
    fn missing_renderer_is_decode_failure() {
        let root = tempfile::tempdir().expect("tempdir");
        let doc = root.path().join("talk.pdf");
        fs::write(&doc, b"%PDF-1.4").expect("write doc");
        let result = load_deck(&doc, &options_in(root.path()));
        match result {
            Err(ViewerError::DecodeFailure(message)) => {
                assert!(message.contains("podium-test-missing-pdftoppm"));
            }
            other => panic!("expected decode failure, got {other:?}"),
        }
    }

    #[test]
    fn cached_renders_are_reused_without_running_tools() {
        let root = tempfile::tempdir().expect("tempdir");
        let options = options_in(root.path());
        let doc = root.path().join("deck.pdf");
        fs::write(&doc, b"%PDF-1.4 cached").expect("write doc");

        let slides_dir = cache::slides_dir(&options.cache_root, &doc);
        fs::create_dir_all(&slides_dir).expect("slides dir");
        for (n, shade) in [(1u32, 10u8), (2, 20), (10, 100)] {
            let img = RgbaImage::from_pixel(4, 3, Rgba([shade, shade, shade, 255]));
            img.save(slides_dir.join(format!("page-{n:02}.png"))).expect("save page");
        }
        let meta = RenderMeta {
            pages: 3,
            ..source_signature(&doc, options.render_dpi).expect("signature")
        };
        write_meta(&slides_dir, &meta).expect("meta");

        let mut deck = load_deck(&doc, &options).expect("cached deck");
        assert_eq!(deck.len(), 3);
        assert_eq!(deck.source(), Some(doc.as_path()));
        deck.last();
        let last = deck.current_slide().expect("slide");
        assert_eq!(last.image().get_pixel(0, 0).0[0], 100);
    }

    #[test]
    fn pages_sort_numerically() {
        let dir = tempfile::tempdir().expect("tempdir");
        for name in ["page-10.png", "page-2.png", "page-1.png", "meta.toml", "other-3.png"] {
            fs::write(dir.path().join(name), b"").expect("touch");
        }
        let names: Vec<_> = list_pages(dir.path())
            .expect("list")
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(str::to_string))
            .collect();
        assert_eq!(names, vec!["page-1.png", "page-2.png", "page-10.png"]);
    }
}
