use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "lindenwarp", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Warp an image with an L-system displacement overlay.
    Warp(WarpArgs),
    /// Write the intermediate fractal overlay instead of warping.
    Overlay(OverlayArgs),
    /// Run a batch manifest of warp jobs.
    Batch(BatchArgs),
}

#[derive(Parser, Debug)]
struct WarpArgs {
    /// Input image path.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output image path (codec picked by extension).
    #[arg(long)]
    out: PathBuf,

    /// Recipe JSON; defaults apply when omitted.
    #[arg(long)]
    recipe: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct OverlayArgs {
    /// Input image path (sizes the overlay).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output image path (codec picked by extension).
    #[arg(long)]
    out: PathBuf,

    /// Recipe JSON; defaults apply when omitted.
    #[arg(long)]
    recipe: Option<PathBuf>,

    /// Composite the overlay over the source instead of writing it alone.
    #[arg(long)]
    composite: bool,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// Batch manifest JSON: {"jobs": [{"source", "output", "recipe"?}]}.
    #[arg(long)]
    manifest: PathBuf,

    /// Run jobs on a rayon pool instead of sequentially.
    #[arg(long)]
    parallel: bool,

    /// Worker threads for --parallel (defaults to the rayon heuristic).
    #[arg(long)]
    threads: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Warp(args) => cmd_warp(args),
        Command::Overlay(args) => cmd_overlay(args),
        Command::Batch(args) => cmd_batch(args),
    }
}

fn read_recipe_json(path: Option<&Path>) -> anyhow::Result<lindenwarp::WarpRecipe> {
    let Some(path) = path else {
        return Ok(lindenwarp::WarpRecipe::default());
    };
    let f = File::open(path).with_context(|| format!("open recipe '{}'", path.display()))?;
    let r = BufReader::new(f);
    let recipe: lindenwarp::WarpRecipe = serde_json::from_reader(r).map_err(|e| {
        lindenwarp::LindenwarpError::invalid_config(format!(
            "parse recipe '{}': {e}",
            path.display()
        ))
    })?;
    Ok(recipe)
}

fn read_manifest_json(path: &Path) -> anyhow::Result<lindenwarp::BatchManifest> {
    let f = File::open(path).with_context(|| format!("open manifest '{}'", path.display()))?;
    let r = BufReader::new(f);
    let manifest: lindenwarp::BatchManifest = serde_json::from_reader(r).map_err(|e| {
        lindenwarp::LindenwarpError::invalid_config(format!(
            "parse manifest '{}': {e}",
            path.display()
        ))
    })?;
    Ok(manifest)
}

fn cmd_warp(args: WarpArgs) -> anyhow::Result<()> {
    let recipe = read_recipe_json(args.recipe.as_deref())?;
    recipe.validate()?;

    let source = lindenwarp::load_rgba8(&args.in_path)?;
    let frame = lindenwarp::warp_frame(&recipe, &source)?;
    lindenwarp::save_rgba8(&args.out, &frame)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_overlay(args: OverlayArgs) -> anyhow::Result<()> {
    let recipe = read_recipe_json(args.recipe.as_deref())?;
    recipe.validate()?;

    let source = lindenwarp::load_rgba8(&args.in_path)?;
    let overlay = lindenwarp::render_overlay(&recipe, source.canvas())?;

    let frame = if args.composite {
        let mut preview = source;
        lindenwarp::composite_over(&mut preview, &overlay)?;
        preview
    } else {
        overlay
    };
    lindenwarp::save_rgba8(&args.out, &frame)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_batch(args: BatchArgs) -> anyhow::Result<()> {
    let manifest = read_manifest_json(&args.manifest)?;
    manifest.validate()?;

    let opts = lindenwarp::BatchOpts {
        parallel: args.parallel,
        threads: args.threads,
    };
    let report = lindenwarp::warp_batch(&manifest.jobs, &opts)?;

    for failure in &report.failures {
        eprintln!("failed {}: {}", failure.source.display(), failure.error);
    }
    eprintln!("completed {}/{} jobs", report.completed, manifest.jobs.len());

    if !report.failures.is_empty() {
        anyhow::bail!(
            "{} of {} jobs failed",
            report.failures.len(),
            manifest.jobs.len()
        );
    }
    Ok(())
}
