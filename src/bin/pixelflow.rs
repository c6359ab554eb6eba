use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

use pixelflow::{
    Artwork, BackgroundConfig, FileStore, FrameRequest, GenerationFlow, GridSize, HistoryStore,
    ManualClock, Rgb8, SystemClock, default_background, export_file_name, preset_background,
};

#[derive(Parser, Debug)]
#[command(name = "pixelflow", version)]
struct Cli {
    /// Directory of the history store (defaults to `PIXELFLOW_HISTORY_DIR` or `./.pixelflow`).
    #[arg(long, global = true)]
    history_dir: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Quantize an image, run the reveal and save it to history.
    Generate(GenerateArgs),
    /// Render a stored artwork as a framed PNG card.
    Export(ExportArgs),
    /// Inspect or edit the history.
    #[command(subcommand)]
    History(HistoryCommand),
}

#[derive(Args, Debug)]
struct CardArgs {
    /// Dark box chrome (app dark theme).
    #[arg(long, default_value_t = false)]
    dark: bool,

    /// Solid backdrop: a preset name (e.g. `Obsidian`, `Rose Dust`) or `#rrggbb`.
    #[arg(long, conflicts_with = "gradient")]
    bg: Option<String>,

    /// Gradient backdrop; without a value the artwork's theme color is the base.
    #[arg(long, num_args = 0..=1)]
    gradient: Option<Option<Rgb8>>,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Source image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Artwork name (required, non-blank).
    #[arg(long)]
    name: String,

    /// Board size: 50 or 100.
    #[arg(long, default_value_t = GridSize::Fifty)]
    grid: GridSize,

    /// Skip the timed reveal.
    #[arg(long, default_value_t = false)]
    instant: bool,

    /// Also write the finished card to this PNG path.
    #[arg(long)]
    out: Option<PathBuf>,

    #[command(flatten)]
    card: CardArgs,
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Artwork id (see `history list`); defaults to the most recent.
    #[arg(long)]
    id: Option<String>,

    /// Output PNG path, or a directory to place `<name>.png` in.
    #[arg(long)]
    out: PathBuf,

    /// Render at preview width instead of full size.
    #[arg(long, default_value_t = false)]
    preview: bool,

    #[command(flatten)]
    card: CardArgs,
}

#[derive(Subcommand, Debug)]
enum HistoryCommand {
    /// List stored artworks, most recent first.
    List,
    /// Print one artwork as JSON.
    Show { id: String },
    /// Delete an artwork; unknown ids are a no-op.
    Delete { id: String },
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let store = match &cli.history_dir {
        Some(dir) => FileStore::new(dir),
        None => FileStore::from_env(),
    };
    match cli.cmd {
        Command::Generate(args) => cmd_generate(store, args),
        Command::Export(args) => cmd_export(store, args),
        Command::History(cmd) => cmd_history(store, cmd),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("PIXELFLOW_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_generate(store: FileStore, args: GenerateArgs) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.in_path)
        .with_context(|| format!("read image '{}'", args.in_path.display()))?;

    let mut flow = GenerationFlow::new(HistoryStore::load(store));
    flow.set_grid_size(args.grid)?;
    flow.set_label(args.name.clone())?;

    let finished = if args.instant {
        let clock = ManualClock::new();
        let first = flow.generate_from_bytes(&bytes, pixelflow::Clock::now(&clock))?;
        pixelflow::run_reveal(
            &mut flow,
            first,
            &clock,
            pixelflow::reveal_duration(args.grid),
            |_| {},
        )
    } else {
        let clock = SystemClock::new();
        let first = flow.generate_from_bytes(&bytes, pixelflow::Clock::now(&clock))?;
        let total = args.grid.cell_count();
        let mut last_decile = 0;
        pixelflow::run_reveal(
            &mut flow,
            first,
            &clock,
            pixelflow::frame_interval_from_env(),
            |progress| {
                let decile = progress * 10 / total;
                if decile > last_decile {
                    last_decile = decile;
                    eprintln!("revealed {progress}/{total}");
                }
            },
        )
    };
    let artwork = finished.context("reveal was cancelled")?;

    eprintln!(
        "saved '{}' ({} beads, theme {}) as {}",
        artwork.name,
        artwork.cells.len(),
        artwork.theme_color,
        artwork.id
    );

    if let Some(out) = &args.out {
        let background = resolve_background(&args.card, &artwork)?;
        let cells = artwork.cell_set()?;
        let request = FrameRequest::complete(&cells, args.card.dark, &artwork.name, background);
        let img = pixelflow::render_rgba(&request, pixelflow::EXPORT_WIDTH)?;
        write_rgba_png(out, &img)?;
    }
    println!("{}", artwork.id);
    Ok(())
}

fn cmd_export(store: FileStore, args: ExportArgs) -> anyhow::Result<()> {
    let history = HistoryStore::load(store);
    let artwork = match &args.id {
        Some(id) => history
            .get(id)
            .with_context(|| format!("no artwork with id '{id}'"))?,
        None => history.items().first().context("history is empty")?,
    };

    let background = resolve_background(&args.card, artwork)?;
    let cells = artwork.cell_set()?;
    let request = FrameRequest::complete(&cells, args.card.dark, &artwork.name, background);

    let out = if args.out.is_dir() {
        args.out.join(export_file_name(&artwork.name))
    } else {
        args.out.clone()
    };
    if args.preview {
        let img = pixelflow::preview(&request)?;
        write_rgba_png(&out, &img)?;
    } else {
        let png = pixelflow::export_png(&request)?;
        ensure_parent(&out)?;
        std::fs::write(&out, png).with_context(|| format!("write png '{}'", out.display()))?;
        eprintln!("wrote {}", out.display());
    }
    Ok(())
}

fn cmd_history(store: FileStore, cmd: HistoryCommand) -> anyhow::Result<()> {
    let mut history = HistoryStore::load(store);
    match cmd {
        HistoryCommand::List => {
            for art in history.items() {
                println!(
                    "{}\t{}\t{}x{}\t{} beads\t{}",
                    art.id,
                    art.name,
                    art.grid_size,
                    art.grid_size,
                    art.cells.len(),
                    art.theme_color
                );
            }
        }
        HistoryCommand::Show { id } => {
            let art = history
                .get(&id)
                .with_context(|| format!("no artwork with id '{id}'"))?;
            println!("{}", serde_json::to_string_pretty(art)?);
        }
        HistoryCommand::Delete { id } => {
            if history.delete(&id)? {
                eprintln!("deleted {id}");
            } else {
                eprintln!("no artwork with id '{id}'");
            }
        }
    }
    Ok(())
}

fn resolve_background(card: &CardArgs, artwork: &Artwork) -> anyhow::Result<BackgroundConfig> {
    if let Some(gradient) = card.gradient {
        return Ok(BackgroundConfig::Gradient(
            gradient.unwrap_or(artwork.theme_color),
        ));
    }
    match &card.bg {
        Some(value) => preset_background(value)
            .or_else(|| value.parse::<Rgb8>().ok().map(BackgroundConfig::Solid))
            .with_context(|| format!("unknown background '{value}'")),
        None => Ok(default_background(card.dark, artwork.theme_color)),
    }
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn write_rgba_png(path: &Path, img: &image::RgbaImage) -> anyhow::Result<()> {
    ensure_parent(path)?;
    image::save_buffer_with_format(
        path,
        img.as_raw(),
        img.width(),
        img.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}
