use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Generate placeholder images.
#[derive(Parser, Debug)]
#[command(name = "olive", version, about)]
struct Cli {
    /// Number of images to generate.
    #[arg(long, value_name = "NUMBER")]
    count: Option<String>,

    /// Image width in pixels.
    #[arg(long, value_name = "NUMBER")]
    width: Option<String>,

    /// Image height in pixels.
    #[arg(long, value_name = "NUMBER")]
    height: Option<String>,

    /// Square image size (overrides width and height).
    #[arg(long, value_name = "NUMBER")]
    size: Option<String>,

    /// Image type: solid, gradient, text.
    #[arg(long = "type", value_name = "TYPE")]
    kind: Option<String>,

    /// Color for solid images (hex or name).
    #[arg(long)]
    color: Option<String>,

    /// Gradient start color.
    #[arg(long)]
    start_color: Option<String>,

    /// Gradient end color.
    #[arg(long)]
    end_color: Option<String>,

    /// Gradient direction: horizontal, vertical.
    #[arg(long)]
    direction: Option<String>,

    /// Text content for text images; `\n` starts a new line.
    #[arg(long)]
    text: Option<String>,

    /// Font file to register under the `--font` family name.
    #[arg(long)]
    font_file: Option<PathBuf>,

    /// Font family for text.
    #[arg(long)]
    font: Option<String>,

    /// Font size for text, in pixels.
    #[arg(long, value_name = "NUMBER")]
    font_size: Option<String>,

    /// Text color.
    #[arg(long)]
    text_color: Option<String>,

    /// Background color for text images.
    #[arg(long)]
    background_color: Option<String>,

    /// Image format: png, jpeg.
    #[arg(long)]
    format: Option<String>,

    /// JPEG quality (0-100).
    #[arg(long, value_name = "NUMBER")]
    quality: Option<String>,

    /// Output folder.
    #[arg(long)]
    output: Option<PathBuf>,

    /// File name prefix.
    #[arg(long)]
    prefix: Option<String>,

    /// Maximum concurrent file writes (defaults to the number of CPUs).
    #[arg(long, value_name = "NUMBER")]
    concurrency: Option<String>,

    /// Print the resolved font family and loaded face count before rendering.
    #[arg(long)]
    dump_fonts: bool,

    /// Enable verbose output.
    #[arg(long)]
    verbose: bool,
}

impl Cli {
    fn into_raw(self) -> olive::RawOptions {
        olive::RawOptions {
            count: self.count,
            width: self.width,
            height: self.height,
            size: self.size,
            kind: self.kind,
            color: self.color,
            start_color: self.start_color,
            end_color: self.end_color,
            direction: self.direction,
            text: self.text,
            font: self.font,
            font_file: self.font_file,
            font_size: self.font_size,
            text_color: self.text_color,
            background_color: self.background_color,
            format: self.format,
            quality: self.quality,
            output: self.output,
            prefix: self.prefix,
            concurrency: self.concurrency,
            verbose: self.verbose,
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "olive=info" } else { "olive=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let dump_fonts = cli.dump_fonts;
    let req = cli.into_raw().validate()?;

    let fonts = olive::FontBook::for_request(&req)?;
    if dump_fonts {
        dump_font_diagnostics(&req, &fonts)?;
    }

    let report = olive::generate(&req, &fonts)?;
    println!(
        "Generated {} image(s) in {}",
        report.written,
        report.output.display()
    );
    Ok(())
}

fn dump_font_diagnostics(req: &olive::ImageRequest, fonts: &olive::FontBook) -> anyhow::Result<()> {
    eprintln!("font diagnostics:");
    eprintln!("  font_faces: {}", fonts.face_count());
    eprintln!("  families:   {}", fonts.families().len());
    if req.kind() == olive::ImageKind::Text {
        eprintln!("  requested:  {}", req.font());
        eprintln!("  family:     {}", fonts.resolve_family(req.font())?);
    }
    if let Some(path) = req.font_file() {
        eprintln!("  font_file:  {}", path.display());
    }
    Ok(())
}
