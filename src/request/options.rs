use std::fmt;
use std::path::{Path, PathBuf};

use crate::foundation::error::{OliveError, OliveResult, ValidationErrors};

pub const DEFAULT_COUNT: u32 = 1;
pub const DEFAULT_WIDTH: u32 = 100;
pub const DEFAULT_HEIGHT: u32 = 100;
pub const DEFAULT_COLOR: &str = "#808080";
pub const DEFAULT_START_COLOR: &str = "#ffffff";
pub const DEFAULT_END_COLOR: &str = "#000000";
pub const DEFAULT_TEXT: &str = "Dummy Image";
pub const DEFAULT_FONT: &str = "Arial";
pub const DEFAULT_FONT_SIZE: u32 = 20;
pub const DEFAULT_TEXT_COLOR: &str = "#000000";
pub const DEFAULT_BACKGROUND_COLOR: &str = "#ffffff";
pub const DEFAULT_QUALITY: u8 = 80;
pub const DEFAULT_OUTPUT: &str = ".";
pub const DEFAULT_PREFIX: &str = "dummy";

/// Unvalidated options, as they arrive from the command line.
///
/// Every value is kept as the raw string the user typed so that parse failures can be reported
/// together with every other violation. `None` means "use the default".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawOptions {
    pub count: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
    pub size: Option<String>,
    pub kind: Option<String>,
    pub color: Option<String>,
    pub start_color: Option<String>,
    pub end_color: Option<String>,
    pub direction: Option<String>,
    pub text: Option<String>,
    pub font: Option<String>,
    pub font_file: Option<PathBuf>,
    pub font_size: Option<String>,
    pub text_color: Option<String>,
    pub background_color: Option<String>,
    pub format: Option<String>,
    pub quality: Option<String>,
    pub output: Option<PathBuf>,
    pub prefix: Option<String>,
    pub concurrency: Option<String>,
    pub verbose: bool,
}

impl RawOptions {
    /// Copy `size` over `width` and `height`.
    ///
    /// Runs before validation, so an invalid size is reported against all three fields.
    pub fn normalize_size(mut self) -> Self {
        if let Some(size) = &self.size {
            self.width = Some(size.clone());
            self.height = Some(size.clone());
        }
        self
    }

    /// Normalize, then validate every field.
    pub fn validate(self) -> OliveResult<ImageRequest> {
        validate_options(&self.normalize_size()).map_err(OliveError::Validation)
    }
}

/// What the generated image contains.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageKind {
    Solid,
    Gradient,
    Text,
}

impl ImageKind {
    const NAMES: &'static [&'static str] = &["solid", "gradient", "text"];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::Gradient => "gradient",
            Self::Text => "text",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "solid" => Some(Self::Solid),
            "gradient" => Some(Self::Gradient),
            "text" => Some(Self::Text),
            _ => None,
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gradient axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Horizontal,
    Vertical,
}

impl Direction {
    const NAMES: &'static [&'static str] = &["horizontal", "vertical"];

    fn parse(s: &str) -> Option<Self> {
        match s {
            "horizontal" => Some(Self::Horizontal),
            "vertical" => Some(Self::Vertical),
            _ => None,
        }
    }
}

/// Encoded output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
}

impl OutputFormat {
    const NAMES: &'static [&'static str] = &["png", "jpeg"];

    fn parse(s: &str) -> Option<Self> {
        match s {
            "png" => Some(Self::Png),
            "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    /// File extension used for written files.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }
}

/// A fully validated generation request. Only [`RawOptions::validate`] builds one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageRequest {
    count: u32,
    width: u32,
    height: u32,
    kind: ImageKind,
    color: String,
    start_color: String,
    end_color: String,
    direction: Direction,
    text: String,
    font: String,
    font_file: Option<PathBuf>,
    font_size: u32,
    text_color: String,
    background_color: String,
    format: OutputFormat,
    quality: u8,
    output: PathBuf,
    prefix: String,
    concurrency: Option<usize>,
    verbose: bool,
}

impl ImageRequest {
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn kind(&self) -> ImageKind {
        self.kind
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn start_color(&self) -> &str {
        &self.start_color
    }

    pub fn end_color(&self) -> &str {
        &self.end_color
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn font(&self) -> &str {
        &self.font
    }

    pub fn font_file(&self) -> Option<&Path> {
        self.font_file.as_deref()
    }

    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    pub fn text_color(&self) -> &str {
        &self.text_color
    }

    pub fn background_color(&self) -> &str {
        &self.background_color
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// JPEG quality on the 0..=100 scale.
    pub fn quality(&self) -> u8 {
        self.quality
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Explicit writer concurrency, if the user set one.
    pub fn concurrency(&self) -> Option<usize> {
        self.concurrency
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }
}

fn validate_options(raw: &RawOptions) -> Result<ImageRequest, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let count = int_field(&mut errors, "count", raw.count.as_deref(), DEFAULT_COUNT)
        .and_then(|v| at_least(&mut errors, "count", v, 1, "Count must be at least 1"));
    let width = int_field(&mut errors, "width", raw.width.as_deref(), DEFAULT_WIDTH)
        .and_then(|v| at_least(&mut errors, "width", v, 1, "Width must be positive"));
    let height = int_field(&mut errors, "height", raw.height.as_deref(), DEFAULT_HEIGHT)
        .and_then(|v| at_least(&mut errors, "height", v, 1, "Height must be positive"));
    if let Some(size) = raw.size.as_deref() {
        let _ = parse_int(&mut errors, "size", size)
            .and_then(|v| at_least(&mut errors, "size", v, 1, "Size must be positive"));
    }

    let kind = enum_field(
        &mut errors,
        "type",
        raw.kind.as_deref(),
        "solid",
        ImageKind::NAMES,
        ImageKind::parse,
    );
    let direction = enum_field(
        &mut errors,
        "direction",
        raw.direction.as_deref(),
        "horizontal",
        Direction::NAMES,
        Direction::parse,
    );

    let font_size = int_field(
        &mut errors,
        "font-size",
        raw.font_size.as_deref(),
        DEFAULT_FONT_SIZE,
    )
    .and_then(|v| at_least(&mut errors, "font-size", v, 1, "Font size must be positive"));

    let format = enum_field(
        &mut errors,
        "format",
        raw.format.as_deref(),
        "png",
        OutputFormat::NAMES,
        OutputFormat::parse,
    );
    let quality = int_field(
        &mut errors,
        "quality",
        raw.quality.as_deref(),
        u32::from(DEFAULT_QUALITY),
    )
    .and_then(|v| {
        if (0..=100).contains(&v) {
            Some(v as u8)
        } else {
            errors.push("quality", "Quality must be between 0 and 100");
            None
        }
    });

    let concurrency = match raw.concurrency.as_deref() {
        None => Some(None),
        Some(s) => parse_int(&mut errors, "concurrency", s)
            .and_then(|v| {
                at_least(&mut errors, "concurrency", v, 1, "Concurrency must be at least 1")
            })
            .map(|v| Some(v as usize)),
    };

    if let Some(file) = &raw.font_file
        && file.as_os_str().is_empty()
    {
        errors.push("font-file", "Font file path must not be empty");
    }

    let (
        Some(count),
        Some(width),
        Some(height),
        Some(kind),
        Some(direction),
        Some(font_size),
        Some(format),
        Some(quality),
        Some(concurrency),
    ) = (count, width, height, kind, direction, font_size, format, quality, concurrency)
    else {
        return Err(errors);
    };
    if !errors.is_empty() {
        return Err(errors);
    }

    let text_or =
        |v: &Option<String>, default: &str| v.clone().unwrap_or_else(|| default.to_owned());

    Ok(ImageRequest {
        count,
        width,
        height,
        kind,
        color: text_or(&raw.color, DEFAULT_COLOR),
        start_color: text_or(&raw.start_color, DEFAULT_START_COLOR),
        end_color: text_or(&raw.end_color, DEFAULT_END_COLOR),
        direction,
        text: text_or(&raw.text, DEFAULT_TEXT),
        font: text_or(&raw.font, DEFAULT_FONT),
        font_file: raw.font_file.clone(),
        font_size,
        text_color: text_or(&raw.text_color, DEFAULT_TEXT_COLOR),
        background_color: text_or(&raw.background_color, DEFAULT_BACKGROUND_COLOR),
        format,
        quality,
        output: raw.output.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
        prefix: text_or(&raw.prefix, DEFAULT_PREFIX),
        concurrency,
        verbose: raw.verbose,
    })
}

fn parse_int(errors: &mut ValidationErrors, field: &str, raw: &str) -> Option<i64> {
    match raw.trim().parse::<i64>() {
        Ok(v) => Some(v),
        Err(_) => {
            errors.push(field, format!("Expected an integer (got '{raw}')"));
            None
        }
    }
}

fn int_field(
    errors: &mut ValidationErrors,
    field: &str,
    raw: Option<&str>,
    default: u32,
) -> Option<i64> {
    match raw {
        None => Some(i64::from(default)),
        Some(s) => parse_int(errors, field, s),
    }
}

fn at_least(
    errors: &mut ValidationErrors,
    field: &str,
    v: i64,
    min: i64,
    message: &str,
) -> Option<u32> {
    if v < min {
        errors.push(field, message);
        return None;
    }
    match u32::try_from(v) {
        Ok(v) => Some(v),
        Err(_) => {
            errors.push(field, format!("Value is too large (max {})", u32::MAX));
            None
        }
    }
}

fn enum_field<T>(
    errors: &mut ValidationErrors,
    field: &str,
    raw: Option<&str>,
    default: &str,
    names: &[&str],
    parse: fn(&str) -> Option<T>,
) -> Option<T> {
    let s = raw.unwrap_or(default);
    let parsed = parse(s);
    if parsed.is_none() {
        errors.push(field, format!("Expected one of: {} (got '{s}')", names.join(", ")));
    }
    parsed
}

#[cfg(test)]
#[path = "../../tests/unit/request/options.rs"]
mod tests;
