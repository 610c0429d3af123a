use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use socialflow::{
    Document, EditorSession, ExportOptions, Exporter, FileStore, JsonFileGenerator, RenderMode,
    StateStore,
};

#[derive(Parser, Debug)]
#[command(name = "socialflow", version)]
struct Cli {
    /// Directory holding the saved editor state.
    #[arg(long, global = true, default_value = ".")]
    state_dir: PathBuf,

    /// Log debug detail to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export every slide as PNG, optionally bundled as a zip.
    Export(ExportArgs),
    /// Render a single slide as a PNG.
    Slide(SlideArgs),
    /// List the style presets and their palettes.
    Presets,
    /// Replace the slides with generated content read from a JSON response file.
    Generate(GenerateArgs),
    /// Forget the saved state and start from the default document.
    Reset,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Document JSON to export instead of the saved state.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Output directory.
    #[arg(long)]
    out: PathBuf,

    /// Also write `socialflow-carousel.zip` into the output directory.
    #[arg(long)]
    zip: bool,

    /// Device pixels per slide pixel.
    #[arg(long)]
    supersample: Option<u32>,

    /// Extra directory of .ttf/.otf/.ttc fonts.
    #[arg(long)]
    fonts_dir: Option<PathBuf>,

    /// Directory background image references resolve against.
    #[arg(long)]
    assets_root: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct SlideArgs {
    /// Document JSON to render instead of the saved state.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Slide position, 1-based.
    #[arg(long, default_value_t = 1)]
    index: usize,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Render scale; 1 is the full slide size.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Draw editor guides.
    #[arg(long)]
    preview: bool,

    #[arg(long)]
    fonts_dir: Option<PathBuf>,

    #[arg(long)]
    assets_root: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Topic sent along with the request.
    #[arg(long)]
    prompt: String,

    /// Requested number of slides (clamped to 1..=10).
    #[arg(long, default_value = "5")]
    pages: String,

    /// JSON file holding the generation response.
    #[arg(long)]
    response: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Export(args) => cmd_export(&cli.state_dir, args),
        Command::Slide(args) => cmd_slide(&cli.state_dir, args),
        Command::Presets => cmd_presets(),
        Command::Generate(args) => cmd_generate(&cli.state_dir, args),
        Command::Reset => cmd_reset(&cli.state_dir),
    }
}

fn load_document(state_dir: &Path, in_path: Option<&Path>) -> anyhow::Result<Document> {
    match in_path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read document '{}'", path.display()))?;
            Ok(Document::from_json_str(&text)
                .with_context(|| format!("parse document '{}'", path.display()))?)
        }
        None => Ok(socialflow::load_or_default(&FileStore::new(state_dir))),
    }
}

fn export_options(
    fonts_dir: Option<PathBuf>,
    assets_root: Option<PathBuf>,
    in_path: Option<&Path>,
) -> ExportOptions {
    let mut options = ExportOptions::from_env();
    if let Some(dir) = fonts_dir {
        options.fonts_dir = Some(dir);
    }
    options.assets_root = assets_root
        .or_else(|| in_path.and_then(Path::parent).map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));
    options
}

fn cmd_export(state_dir: &Path, args: ExportArgs) -> anyhow::Result<()> {
    let doc = load_document(state_dir, args.in_path.as_deref())?;
    let mut options = export_options(args.fonts_dir, args.assets_root, args.in_path.as_deref());
    if let Some(n) = args.supersample {
        options.supersample = n.max(1);
    }

    let mut exporter = Exporter::new(options);
    let images = exporter.export_slides(&doc, |p| {
        eprintln!("exported {}/{} ({:.0}%)", p.completed, p.total, p.fraction() * 100.0);
    })?;
    for img in &images {
        let path = img.write_to(&args.out)?;
        eprintln!("wrote {}", path.display());
    }
    if args.zip {
        let path = args.out.join(socialflow::ARCHIVE_FILE_NAME);
        socialflow::write_archive(&images, &path)?;
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}

fn cmd_slide(state_dir: &Path, args: SlideArgs) -> anyhow::Result<()> {
    let doc = load_document(state_dir, args.in_path.as_deref())?;
    let options = export_options(args.fonts_dir, args.assets_root, args.in_path.as_deref());
    let index = args
        .index
        .checked_sub(1)
        .context("slide index is 1-based")?;
    let mode = if args.preview {
        RenderMode::Preview
    } else {
        RenderMode::Export
    };

    let mut exporter = Exporter::new(options);
    let frame = exporter.render_slide(&doc, index, args.scale, mode)?;
    let png = socialflow::encode_png(frame)?;
    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, png).with_context(|| format!("write png '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_presets() -> anyhow::Result<()> {
    let catalog = socialflow::Catalog::builtin();
    for preset in catalog.presets() {
        println!("{}\t{}\t{}", preset.id, preset.name, preset.description);
        for (i, palette) in preset.palettes.iter().enumerate() {
            println!(
                "  [{i}] {}\tbg {}\ttitle {}\tbody {}",
                palette.label,
                palette.bg.to_hex(),
                palette.title.to_hex(),
                palette.body.to_hex()
            );
        }
    }
    Ok(())
}

fn cmd_generate(state_dir: &Path, args: GenerateArgs) -> anyhow::Result<()> {
    let mut session = EditorSession::open(Box::new(FileStore::new(state_dir)));
    let generator = JsonFileGenerator::new(&args.response);
    session.generate(&generator, &args.prompt, &args.pages)?;
    let doc = session.document();
    for (i, slide) in doc.slides.iter().enumerate() {
        println!("{}\t{}\t{}", i + 1, slide.kind.as_str(), slide.title);
    }
    Ok(())
}

fn cmd_reset(state_dir: &Path) -> anyhow::Result<()> {
    let store = FileStore::new(state_dir);
    store.clear()?;
    eprintln!("cleared {}", store.path().display());
    Ok(())
}
