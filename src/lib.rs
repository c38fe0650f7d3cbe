//! olive generates placeholder images.
//!
//! A run turns command-line options into `count` identical image files:
//!
//! 1. **Validate**: [`RawOptions`] -> [`ImageRequest`] (all violations reported together)
//! 2. **Resolve colors**: names and hex codes -> [`ResolvedColors`]
//! 3. **Render**: solid fill, linear gradient, or centered text -> [`PixelSurface`]
//! 4. **Encode**: PNG or JPEG, once -> [`EncodedImage`]
//! 5. **Write**: the one buffer to `count` files on a bounded worker pool
//!
//! Rendering and encoding happen exactly once per run regardless of `count`.
#![forbid(unsafe_code)]

mod assets;
mod encode;
mod foundation;
mod pipeline;
mod render;
mod request;

pub use assets::color::{ResolvedColors, resolve_color};
pub use assets::fonts::FontBook;
pub use encode::buffer::{EncodedImage, encode_surface, quality_fraction};
pub use encode::writer::{
    WriteOpts, WriteReport, WriteTask, default_concurrency, ensure_output_dir, plan_tasks,
    write_copies,
};
pub use foundation::core::{Canvas, HexColor};
pub use foundation::error::{
    FailedWrite, FieldViolation, OliveError, OliveResult, ValidationErrors, WriteFailures,
};
pub use pipeline::{GenerateReport, generate, render_encoded};
pub use render::canvas::{LINE_HEIGHT_FACTOR, TextBlock, paint_gradient, render_surface};
pub use render::surface::{MAX_SURFACE_BYTES, PixelSurface};
pub use request::options::{Direction, ImageKind, ImageRequest, OutputFormat, RawOptions};
