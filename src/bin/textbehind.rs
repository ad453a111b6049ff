use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use sha2::Digest as _;
use textbehind::{
    Canvas, CommandRemover, DEFAULT_TEXT, DOWNLOAD_FILE_NAME, FontChain, JobConfig, RemoverConfig,
    Rgba8, TextSpec, default_font_size, encode_png, process_upload, render_text_layer,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "textbehind", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Cut out the subject, draw text behind it, and write the result as PNG.
    Process(ProcessArgs),
    /// Render only the transparent text layer as PNG.
    TextLayer(TextLayerArgs),
}

#[derive(Parser, Debug)]
struct ProcessArgs {
    /// Input image (PNG/JPEG).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Use a precomputed cutout instead of running a remover.
    #[arg(long, conflicts_with = "remover")]
    cutout: Option<PathBuf>,

    /// Background removal program, invoked as `<program> <args>... <in.png> <out.png>`.
    #[arg(long)]
    remover: Option<String>,

    /// Extra argument for the remover program (repeatable).
    #[arg(long = "remover-arg", allow_hyphen_values = true, requires = "remover")]
    remover_args: Vec<String>,

    /// Overlay text; `\n` starts a new line.
    #[arg(long)]
    text: Option<String>,

    /// Font size in pixels (default: 15% of the image height).
    #[arg(long, value_parser = clap::value_parser!(u32).range(10..=500))]
    font_size: Option<u32>,

    /// Text color as #rrggbb or #rrggbbaa.
    #[arg(long, value_parser = parse_color)]
    color: Option<Rgba8>,

    /// Font file to try before the system fonts (repeatable, tried in order).
    #[arg(long = "font")]
    fonts: Vec<PathBuf>,

    /// JSON job config; flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long, default_value = DOWNLOAD_FILE_NAME)]
    out: PathBuf,

    /// Print which font was resolved at the size used (source + SHA-256 of font bytes).
    #[arg(long)]
    dump_fonts: bool,
}

#[derive(Parser, Debug)]
struct TextLayerArgs {
    #[arg(long)]
    width: u32,

    #[arg(long)]
    height: u32,

    /// Overlay text; `\n` starts a new line.
    #[arg(long, default_value = DEFAULT_TEXT)]
    text: String,

    /// Font size in pixels (default: 15% of the height).
    #[arg(long, value_parser = clap::value_parser!(u32).range(10..=500))]
    font_size: Option<u32>,

    /// Text color as #rrggbb or #rrggbbaa.
    #[arg(long, value_parser = parse_color, default_value = "#ffffff")]
    color: Rgba8,

    /// Font file to try before the system fonts (repeatable, tried in order).
    #[arg(long = "font")]
    fonts: Vec<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Process(args) => cmd_process(args),
        Command::TextLayer(args) => cmd_text_layer(args),
    }
}

fn parse_color(s: &str) -> Result<Rgba8, String> {
    Rgba8::parse_hex(s).map_err(|e| e.to_string())
}

fn cmd_process(args: ProcessArgs) -> anyhow::Result<()> {
    let mut job = match &args.config {
        Some(path) => JobConfig::from_path(path)?,
        None => JobConfig::default(),
    };

    if args.text.is_some() {
        job.text = args.text;
    }
    if args.font_size.is_some() {
        job.font_size = args.font_size;
    }
    if args.color.is_some() {
        job.color = args.color;
    }
    if !args.fonts.is_empty() {
        let mut fonts = args.fonts;
        fonts.append(&mut job.fonts);
        job.fonts = fonts;
    }
    if let Some(path) = args.cutout {
        job.remover = Some(RemoverConfig::Cutout(path));
    } else if let Some(program) = args.remover {
        job.remover = Some(RemoverConfig::Command(CommandRemover::new(
            program,
            args.remover_args,
        )));
    }
    job.validate()?;

    let fonts = job.font_chain();
    let upload = std::fs::read(&args.in_path)
        .with_context(|| format!("read input image '{}'", args.in_path.display()))?;

    let mut remover = job.build_remover();
    let download = process_upload(
        &upload,
        &job.overlay_settings(),
        remover.as_mut(),
        &fonts,
    )?;

    for w in &download.warnings {
        eprintln!("warning: {w}");
    }
    if args.dump_fonts {
        dump_font_diagnostics(&fonts, download.font_size);
    }

    write_output(&args.out, &download.bytes)
}

fn cmd_text_layer(args: TextLayerArgs) -> anyhow::Result<()> {
    let canvas = Canvas::new(args.width, args.height);
    let font_size = args
        .font_size
        .unwrap_or_else(|| default_font_size(args.height));
    let spec = TextSpec::new(args.text, font_size).with_color(args.color);

    let layer = render_text_layer(canvas, &spec, &FontChain::with_preferred(&args.fonts))?;
    for w in &layer.warnings {
        eprintln!("warning: {w}");
    }

    write_output(&args.out, &encode_png(&layer.image)?)
}

fn write_output(out: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(out, bytes).with_context(|| format!("write png '{}'", out.display()))?;

    eprintln!("wrote {}", out.display());
    Ok(())
}

fn dump_font_diagnostics(fonts: &FontChain, px: u32) {
    let font = fonts.resolve(px as f32);
    eprintln!("text font diagnostics:");
    eprintln!("  source: {}", font.label());
    eprintln!("  px: {px}");
    match font.source_bytes() {
        Some(bytes) => eprintln!("  sha256: {}", sha256_hex(bytes)),
        None => eprintln!("  sha256: (built-in)"),
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}
