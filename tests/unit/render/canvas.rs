use super::*;

fn request(raw: crate::RawOptions) -> ImageRequest {
    raw.validate().unwrap()
}

fn draw(req: &ImageRequest, fonts: &FontBook) -> PixelSurface {
    let colors = ResolvedColors::resolve(req).unwrap();
    render_surface(req, &colors, fonts).unwrap()
}

/// A family the host can actually render, preferring common sans faces.
fn installed_family(book: &FontBook) -> Option<String> {
    for candidate in ["DejaVu Sans", "Liberation Sans", "Noto Sans", "Arial", "Helvetica"] {
        if let Ok(family) = book.resolve_family(candidate) {
            return Some(family);
        }
    }
    book.families().into_iter().next()
}

/// Runs of consecutive rows that contain at least one non-background pixel.
fn ink_bands(surface: &PixelSurface, background: [u8; 4]) -> Vec<(u32, u32)> {
    let mut bands = Vec::new();
    let mut current: Option<(u32, u32)> = None;
    for y in 0..surface.height {
        let inked = (0..surface.width).any(|x| surface.pixel(x, y) != background);
        current = match (current, inked) {
            (None, true) => Some((y, y)),
            (Some((start, _)), true) => Some((start, y)),
            (Some(band), false) => {
                bands.push(band);
                None
            }
            (None, false) => None,
        };
    }
    bands.extend(current);
    bands
}

/// Leftmost and rightmost inked columns within rows `y0..=y1`.
fn ink_columns(surface: &PixelSurface, background: [u8; 4], y0: u32, y1: u32) -> (u32, u32) {
    let inked: Vec<u32> = (0..surface.width)
        .filter(|&x| (y0..=y1).any(|y| surface.pixel(x, y) != background))
        .collect();
    (inked[0], inked[inked.len() - 1])
}

#[test]
fn solid_fills_every_pixel() {
    let req = request(crate::RawOptions {
        width: Some("7".into()),
        height: Some("5".into()),
        color: Some("tomato".into()),
        ..Default::default()
    });
    let surface = draw(&req, &FontBook::empty());

    assert_eq!((surface.width, surface.height), (7, 5));
    for y in 0..5 {
        for x in 0..7 {
            assert_eq!(surface.pixel(x, y), [255, 99, 71, 255]);
        }
    }
}

#[test]
fn horizontal_gradient_hits_both_stops() {
    let req = request(crate::RawOptions {
        kind: Some("gradient".into()),
        width: Some("11".into()),
        height: Some("3".into()),
        start_color: Some("#000".into()),
        end_color: Some("#fff".into()),
        ..Default::default()
    });
    let surface = draw(&req, &FontBook::empty());

    for y in 0..3 {
        assert_eq!(surface.pixel(0, y), [0, 0, 0, 255]);
        assert_eq!(surface.pixel(10, y), [255, 255, 255, 255]);
        assert_eq!(surface.pixel(5, y), [128, 128, 128, 255]);
    }
    let reds: Vec<u8> = (0..11).map(|x| surface.pixel(x, 1)[0]).collect();
    assert!(reds.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn vertical_gradient_runs_top_to_bottom() {
    let req = request(crate::RawOptions {
        kind: Some("gradient".into()),
        direction: Some("vertical".into()),
        width: Some("10".into()),
        height: Some("100".into()),
        start_color: Some("#fff".into()),
        end_color: Some("#000".into()),
        ..Default::default()
    });
    let surface = draw(&req, &FontBook::empty());

    for x in 0..10 {
        assert_eq!(surface.pixel(x, 0), [255, 255, 255, 255]);
        assert_eq!(surface.pixel(x, 99), [0, 0, 0, 255]);
    }
    assert_eq!(surface.pixel(0, 50), surface.pixel(9, 50));
}

#[test]
fn single_pixel_gradient_uses_start_color() {
    let mut surface = PixelSurface::filled(
        Canvas {
            width: 1,
            height: 1,
        },
        HexColor::BLACK,
    )
    .unwrap();
    paint_gradient(
        &mut surface,
        HexColor::rgb(10, 20, 30),
        HexColor::WHITE,
        Direction::Horizontal,
    );
    assert_eq!(surface.pixel(0, 0), [10, 20, 30, 255]);
}

#[test]
fn wide_thin_surfaces_render() {
    let req = request(crate::RawOptions {
        kind: Some("gradient".into()),
        width: Some("20000".into()),
        height: Some("1".into()),
        ..Default::default()
    });
    let surface = draw(&req, &FontBook::empty());
    assert_eq!((surface.width, surface.height), (20_000, 1));
    assert_eq!(surface.pixel(0, 0), [255, 255, 255, 255]);
    assert_eq!(surface.pixel(19_999, 0), [0, 0, 0, 255]);
}

#[test]
fn oversized_areas_are_rejected() {
    let req = request(crate::RawOptions {
        width: Some("100000".into()),
        height: Some("100000".into()),
        ..Default::default()
    });
    let colors = ResolvedColors::resolve(&req).unwrap();
    let err = render_surface(&req, &colors, &FontBook::empty()).unwrap_err();
    assert!(matches!(err, OliveError::Render(_)));
    assert!(err.to_string().contains("100000x100000"));
}

#[test]
fn text_block_is_vertically_centered() {
    let block = TextBlock::layout("one\\ntwo\nthree", 20, 200);
    assert_eq!(block.lines, vec!["one", "two", "three"]);
    assert!((block.line_height - 24.0).abs() < 1e-9);
    // (200 - 3 * 24) / 2 + 20 / 2
    assert!((block.start_y - 74.0).abs() < 1e-9);
    assert!((block.line_y(2) - 122.0).abs() < 1e-9);

    let single = TextBlock::layout("Dummy Image", 20, 100);
    assert_eq!(single.lines.len(), 1);
    assert!((single.line_y(0) - 48.0).abs() < 1e-9);
}

#[test]
fn text_document_escapes_markup() {
    let block = TextBlock::layout("a<b & \"c\"", 12, 40);
    let colors = ResolvedColors {
        solid: HexColor::BLACK,
        start: HexColor::BLACK,
        end: HexColor::BLACK,
        text: HexColor::rgb(255, 0, 0),
        background: HexColor::WHITE,
    };
    let svg = text_document(
        Canvas {
            width: 80,
            height: 40,
        },
        &block,
        "Fam",
        &colors,
    );
    assert!(svg.contains("a&lt;b &amp; &quot;c&quot;"));
    assert!(svg.contains(r##"fill="#FF0000""##));
    assert!(svg.contains(r##"fill="#FFFFFF""##));
    assert!(svg.contains(r#"text-anchor="middle""#));
}

#[test]
fn family_names_with_quotes_stay_intact() {
    assert_eq!(css_family("DejaVu Sans"), r#""DejaVu Sans""#);
    assert_eq!(css_family("O'Brien Sans"), r#""O'Brien Sans""#);
    assert_eq!(css_family(r#"The "Face""#), r#"'The "Face"'"#);
    assert_eq!(css_family(r#"It's "odd""#), r#"'It\'s "odd"'"#);

    let block = TextBlock::layout("x", 12, 40);
    let colors = ResolvedColors {
        solid: HexColor::BLACK,
        start: HexColor::BLACK,
        end: HexColor::BLACK,
        text: HexColor::BLACK,
        background: HexColor::WHITE,
    };
    let svg = text_document(
        Canvas {
            width: 40,
            height: 40,
        },
        &block,
        "O'Brien Sans",
        &colors,
    );
    assert!(
        svg.contains(r#"font-family="&quot;O&apos;Brien Sans&quot;""#),
        "{svg}"
    );
}

#[test]
fn text_without_fonts_is_fatal() {
    let req = request(crate::RawOptions {
        kind: Some("text".into()),
        ..Default::default()
    });
    let colors = ResolvedColors::resolve(&req).unwrap();
    let err = render_surface(&req, &colors, &FontBook::empty()).unwrap_err();
    assert!(matches!(err, OliveError::FontResolution(_)));
}

#[test]
fn text_lines_render_as_separate_centered_rows() {
    let system = FontBook::system();
    let Some(family) = installed_family(&system) else {
        eprintln!("no fonts installed; skipping");
        return;
    };

    let req = request(crate::RawOptions {
        kind: Some("text".into()),
        text: Some("HH\\nHH".into()),
        font: Some(family),
        font_size: Some("20".into()),
        width: Some("200".into()),
        height: Some("120".into()),
        text_color: Some("black".into()),
        background_color: Some("#ffcc00".into()),
        verbose: true,
        ..Default::default()
    });
    let surface = draw(&req, &system);
    let background = [255, 204, 0, 255];

    for (x, y) in [(0, 0), (199, 0), (0, 119), (199, 119)] {
        assert_eq!(surface.pixel(x, y), background);
    }

    let bands = ink_bands(&surface, background);
    assert_eq!(bands.len(), 2, "bands: {bands:?}");

    let top = bands[0].0 as f64;
    let bottom = bands[1].1 as f64;
    let middle = (top + bottom) / 2.0;
    assert!((middle - 60.0).abs() <= 8.0, "block middle at {middle}");

    for &(y0, y1) in &bands {
        let (left, right) = ink_columns(&surface, background, y0, y1);
        let center = (left + right) as f64 / 2.0;
        assert!(
            (center - 100.0).abs() <= 8.0,
            "rows {y0}..={y1} centered at x={center}"
        );
    }
}

#[test]
fn text_rendering_is_deterministic() {
    let system = FontBook::system();
    let Some(family) = installed_family(&system) else {
        return;
    };

    let req = request(crate::RawOptions {
        kind: Some("text".into()),
        font: Some(family),
        ..Default::default()
    });
    let a = draw(&req, &system);
    let b = draw(&req, &system);
    assert_eq!(a.data, b.data);
}
