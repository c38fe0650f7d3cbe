use std::fmt::Write as _;

use tracing::{debug, info};

use crate::assets::color::ResolvedColors;
use crate::assets::fonts::FontBook;
use crate::foundation::core::{Canvas, HexColor};
use crate::foundation::error::{OliveError, OliveResult};
use crate::render::surface::PixelSurface;
use crate::request::options::{Direction, ImageKind, ImageRequest};

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f64 = 1.2;

/// Draw the content `req` asks for.
///
/// `fonts` is only consulted for text images.
pub fn render_surface(
    req: &ImageRequest,
    colors: &ResolvedColors,
    fonts: &FontBook,
) -> OliveResult<PixelSurface> {
    let canvas = Canvas {
        width: req.width(),
        height: req.height(),
    };

    match req.kind() {
        ImageKind::Solid => PixelSurface::filled(canvas, colors.solid),
        ImageKind::Gradient => {
            let mut surface = PixelSurface::filled(canvas, colors.start)?;
            paint_gradient(&mut surface, colors.start, colors.end, req.direction());
            Ok(surface)
        }
        ImageKind::Text => {
            let mut surface = PixelSurface::filled(canvas, colors.background)?;
            let family = fonts.resolve_family(req.font())?;
            let block = TextBlock::layout(req.text(), req.font_size(), req.height());
            paint_text(&mut surface, &block, &family, colors, fonts, req.verbose())?;
            Ok(surface)
        }
    }
}

/// Two-stop linear gradient spanning the full axis.
///
/// The first and last pixel along the axis carry the stop colors exactly.
pub fn paint_gradient(
    surface: &mut PixelSurface,
    start: HexColor,
    end: HexColor,
    direction: Direction,
) {
    fn t_at(i: u32, n: u32) -> f64 {
        if n <= 1 {
            return 0.0;
        }
        f64::from(i) / f64::from(n - 1)
    }

    match direction {
        Direction::Horizontal => {
            let n = surface.width;
            for x in 0..n {
                surface.fill_column(x, start.lerp(end, t_at(x, n)));
            }
        }
        Direction::Vertical => {
            let n = surface.height;
            for y in 0..n {
                surface.fill_row(y, start.lerp(end, t_at(y, n)));
            }
        }
    }
}

/// Vertical placement of a block of centered text lines.
#[derive(Clone, Debug, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub font_size: u32,
    pub line_height: f64,
    /// Baseline-middle `y` of the first line.
    pub start_y: f64,
}

impl TextBlock {
    /// Split `text` into lines and center the block within `height`.
    ///
    /// Both the two-character sequence `\n` and real newlines break lines.
    pub fn layout(text: &str, font_size: u32, height: u32) -> Self {
        let lines: Vec<String> = text
            .replace("\\n", "\n")
            .split('\n')
            .map(str::to_owned)
            .collect();

        let size = f64::from(font_size);
        let line_height = size * LINE_HEIGHT_FACTOR;
        let total_height = lines.len() as f64 * line_height;
        let start_y = (f64::from(height) - total_height) / 2.0 + size / 2.0;

        Self {
            lines,
            font_size,
            line_height,
            start_y,
        }
    }

    /// `y` at which line `k` is centered.
    pub fn line_y(&self, k: usize) -> f64 {
        self.start_y + k as f64 * self.line_height
    }
}

fn paint_text(
    surface: &mut PixelSurface,
    block: &TextBlock,
    family: &str,
    colors: &ResolvedColors,
    fonts: &FontBook,
    verbose: bool,
) -> OliveResult<()> {
    let svg = text_document(surface.canvas(), block, family, colors);

    let opts = usvg::Options {
        fontdb: fonts.database(),
        ..usvg::Options::default()
    };
    let tree = usvg::Tree::from_data(svg.as_bytes(), &opts)
        .map_err(|e| OliveError::render(format!("parse text document: {e}")))?;

    if verbose {
        for (k, line) in block.lines.iter().enumerate() {
            let Some(node) = tree.node_by_id(&line_id(k)) else {
                // Lines with no visible glyphs produce no node.
                debug!("line {}/{} \"{}\": no rendered node", k + 1, block.lines.len(), line);
                continue;
            };
            info!(
                "line {}/{} \"{}\": width={:.1}px y={:.1}",
                k + 1,
                block.lines.len(),
                line,
                node.abs_bounding_box().width(),
                block.line_y(k)
            );
        }
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(surface.width, surface.height)
        .ok_or_else(|| OliveError::render("failed to allocate text pixmap"))?;
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::default(),
        &mut pixmap.as_mut(),
    );
    surface.copy_from_premul(pixmap.data())
}

fn line_id(k: usize) -> String {
    format!("line-{k}")
}

fn text_document(
    canvas: Canvas,
    block: &TextBlock,
    family: &str,
    colors: &ResolvedColors,
) -> String {
    let (w, h) = (canvas.width, canvas.height);
    let cx = f64::from(w) / 2.0;

    let mut svg = String::new();
    // Writing into a String cannot fail.
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );
    let _ = write!(
        svg,
        r#"<rect x="0" y="0" width="{w}" height="{h}" fill="{}"/>"#,
        colors.background
    );
    for (k, line) in block.lines.iter().enumerate() {
        let _ = write!(
            svg,
            r#"<text id="{}" x="{cx}" y="{}" font-family="{}" font-size="{}" fill="{}" text-anchor="middle" dominant-baseline="middle" xml:space="preserve">{}</text>"#,
            line_id(k),
            block.line_y(k),
            xml_escape(&css_family(family)),
            block.font_size,
            colors.text,
            xml_escape(line)
        );
    }
    svg.push_str("</svg>");
    svg
}

/// Quote `family` as a CSS string.
///
/// The CSS parser keeps backslashes verbatim, so the quote character is picked to not occur in
/// the name. Escaping is the fallback only when the name holds both quote characters.
fn css_family(family: &str) -> String {
    let quote = if family.contains('"') { '\'' } else { '"' };
    let mut out = String::with_capacity(family.len() + 2);
    out.push(quote);
    for c in family.chars() {
        if c == quote {
            out.push('\\');
        }
        out.push(c);
    }
    out.push(quote);
    out
}

fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/canvas.rs"]
mod tests;
