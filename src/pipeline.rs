use std::path::PathBuf;

use tracing::info;

use crate::assets::color::ResolvedColors;
use crate::assets::fonts::FontBook;
use crate::encode::buffer::{EncodedImage, encode_surface};
use crate::encode::writer::{WriteOpts, ensure_output_dir, write_copies};
use crate::foundation::error::OliveResult;
use crate::render::canvas::render_surface;
use crate::request::options::ImageRequest;

/// What a completed run produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerateReport {
    /// Files written.
    pub written: usize,
    /// Directory the files were written to.
    pub output: PathBuf,
    /// Concurrency bound the writer used.
    pub concurrency: usize,
    /// Size of the shared encoded buffer.
    pub encoded_bytes: usize,
}

/// Resolve colors, draw and encode `req` once.
///
/// Nothing touches the filesystem here, so every color or font failure surfaces before any
/// output exists.
pub fn render_encoded(req: &ImageRequest, fonts: &FontBook) -> OliveResult<EncodedImage> {
    let colors = ResolvedColors::resolve(req)?;
    let surface = render_surface(req, &colors, fonts)?;
    let encoded = encode_surface(&surface, req.format(), req.quality())?;

    if req.verbose() {
        info!(
            "Generated {} image buffer: {}x{}",
            req.kind(),
            req.width(),
            req.height()
        );
    }
    Ok(encoded)
}

/// Render once, then write `req.count()` copies into `req.output()`.
#[tracing::instrument(skip_all, fields(kind = %req.kind(), count = req.count()))]
pub fn generate(req: &ImageRequest, fonts: &FontBook) -> OliveResult<GenerateReport> {
    let encoded = render_encoded(req, fonts)?;

    ensure_output_dir(req.output())?;
    let opts = WriteOpts {
        output: req.output().to_path_buf(),
        prefix: req.prefix().to_owned(),
        count: req.count(),
        concurrency: req.concurrency(),
        verbose: req.verbose(),
    };
    let report = write_copies(&encoded, &opts)?;

    Ok(GenerateReport {
        written: report.written,
        output: opts.output,
        concurrency: report.concurrency,
        encoded_bytes: encoded.len(),
    })
}
