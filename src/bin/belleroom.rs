use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "belleroom", version)]
struct Cli {
    /// Log per-step details.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a storyboard to a PNG sequence and export it as video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// List the layers of a GIMP scene (requires `xcfinfo` on PATH).
    Layers(LayersArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Storyboard JSON.
    #[arg(long)]
    storyboard: PathBuf,

    /// Override the storyboard's output video path.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Only write the PNG sequence; skip video export.
    #[arg(long)]
    frames_only: bool,

    /// Keep the frame directory after export.
    #[arg(long)]
    keep_frames: bool,
}

#[derive(Parser, Debug)]
struct LayersArgs {
    /// Scene name (the `.xcf` file stem).
    #[arg(long)]
    scene: String,

    /// Directory holding `<scene>.xcf`.
    #[arg(long, default_value = "scenes")]
    scenes_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Layers(args) => cmd_layers(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut storyboard = belleroom::Storyboard::from_path(&args.storyboard)?;
    if let Some(out) = args.out {
        storyboard.output = Some(out);
    }
    if args.keep_frames {
        storyboard.cleanup = false;
    }

    let encoder = storyboard.encoder.clone();
    let encoder: Option<&dyn belleroom::VideoEncoder> = if args.frames_only {
        None
    } else {
        Some(&encoder)
    };

    let summary = belleroom::run_storyboard(&storyboard, &storyboard.extractor, encoder)
        .with_context(|| format!("render storyboard '{}'", args.storyboard.display()))?;

    eprintln!(
        "wrote {} frames to {}",
        summary.frames,
        storyboard.frames_dir.display()
    );
    if let Some(out) = summary.output {
        eprintln!("wrote {}", out.display());
    }
    Ok(())
}

fn cmd_layers(args: LayersArgs) -> anyhow::Result<()> {
    let extractor = belleroom::XcfLayerExtractor {
        scenes_dir: args.scenes_dir,
        ..belleroom::XcfLayerExtractor::default()
    };
    let source = extractor.source_path(&args.scene);
    for name in extractor.layer_names(&source)? {
        println!("{name}");
    }
    Ok(())
}
