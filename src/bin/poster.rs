use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "poster", version)]
struct Cli {
    /// Log filter, e.g. `warn`, `info` or `poster=debug`.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one layout document in its requested format.
    Render(RenderArgs),
    /// Render one layout document and write a scaled-down PNG.
    Thumb(ThumbArgs),
    /// Render every `*.json` document in a directory.
    Batch(BatchArgs),
}

#[derive(Args, Debug)]
struct HostArgs {
    /// JSON config file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Root for storage-relative image references.
    #[arg(long)]
    storage_root: Option<PathBuf>,

    /// Directory holding font files.
    #[arg(long)]
    fonts_dir: Option<PathBuf>,

    /// Skip the on-disk HTTP response cache.
    #[arg(long)]
    no_cache: bool,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Input layout document.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output image path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    host: HostArgs,
}

#[derive(Args, Debug)]
struct ThumbArgs {
    /// Input layout document.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Scale factor applied to both sides.
    #[arg(long, default_value_t = poster::DEFAULT_THUMBNAIL_SCALE)]
    scale: f64,

    #[command(flatten)]
    host: HostArgs,
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// Directory of layout documents.
    #[arg(long)]
    in_dir: PathBuf,

    /// Directory receiving one image per document.
    #[arg(long)]
    out_dir: PathBuf,

    /// Worker threads; rayon's default when unset.
    #[arg(long)]
    threads: Option<usize>,

    #[command(flatten)]
    host: HostArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Thumb(args) => cmd_thumb(args),
        Command::Batch(args) => cmd_batch(args),
    }
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_new(level)
        .with_context(|| format!("invalid log level '{level}'"))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn make_poster(host: &HostArgs) -> anyhow::Result<poster::Poster> {
    let mut cfg = match &host.config {
        Some(path) => poster::PosterConfig::from_path(path)?,
        None => poster::PosterConfig::default(),
    };
    if let Some(root) = &host.storage_root {
        cfg.storage_root = root.clone();
    }
    if let Some(dir) = &host.fonts_dir {
        cfg.fonts_dir = dir.clone();
    }

    let poster = if host.no_cache {
        poster::Poster::with_cache(cfg, Arc::new(poster::NoCache))?
    } else {
        poster::Poster::new(cfg)?
    };
    Ok(poster)
}

fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))
}

fn render_one(
    poster: &poster::Poster,
    doc: &poster::LayoutDocument,
    in_path: &Path,
    out: &Path,
) -> anyhow::Result<()> {
    let (img, report) = poster.render_with_report(doc)?;
    for skipped in &report.skipped {
        eprintln!(
            "{}: skipped item {} ({}): {}",
            in_path.display(),
            skipped.index,
            skipped.kind,
            skipped.error
        );
    }
    let encoded = poster::encode::output::encode_image(&img, doc.format, doc.quality)?;
    write_output(out, &encoded.bytes)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let poster = make_poster(&args.host)?;
    let doc = poster::LayoutDocument::from_path(&args.in_path)?;
    render_one(&poster, &doc, &args.in_path, &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_thumb(args: ThumbArgs) -> anyhow::Result<()> {
    let poster = make_poster(&args.host)?;
    let doc = poster::LayoutDocument::from_path(&args.in_path)?;
    let thumb = poster.thumbnail(&doc, args.scale)?;
    let encoded = poster::encode::output::encode_image(&thumb, poster::OutputFormat::Png, 100)?;
    write_output(&args.out, &encoded.bytes)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_batch(args: BatchArgs) -> anyhow::Result<()> {
    let poster = make_poster(&args.host)?;

    let mut inputs = Vec::new();
    for entry in std::fs::read_dir(&args.in_dir)
        .with_context(|| format!("read input dir '{}'", args.in_dir.display()))?
    {
        let path = entry?.path();
        if path.extension().is_some_and(|e| e == "json") {
            inputs.push(path);
        }
    }
    inputs.sort();

    let pool = {
        let mut b = rayon::ThreadPoolBuilder::new();
        if let Some(n) = args.threads {
            b = b.num_threads(n);
        }
        b.build().context("build rayon thread pool")?
    };

    let failures: Vec<(PathBuf, anyhow::Error)> = pool.install(|| {
        inputs
            .par_iter()
            .filter_map(|in_path| {
                let result = batch_one(&poster, in_path, &args.out_dir);
                match result {
                    Ok(out) => {
                        eprintln!("wrote {}", out.display());
                        None
                    }
                    Err(e) => Some((in_path.clone(), e)),
                }
            })
            .collect()
    });

    for (path, e) in &failures {
        eprintln!("{}: {e:#}", path.display());
    }
    if !failures.is_empty() {
        anyhow::bail!("{} of {} documents failed", failures.len(), inputs.len());
    }
    Ok(())
}

fn batch_one(poster: &poster::Poster, in_path: &Path, out_dir: &Path) -> anyhow::Result<PathBuf> {
    let doc = poster::LayoutDocument::from_path(in_path)?;
    let stem = in_path
        .file_stem()
        .with_context(|| format!("no file name in '{}'", in_path.display()))?;
    let out = out_dir.join(format!(
        "{}.{}",
        stem.to_string_lossy(),
        doc.format.extension()
    ));
    render_one(poster, &doc, in_path, &out)?;
    Ok(out)
}
