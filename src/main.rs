use clap::{Parser, Subcommand};
use picture_press::asset::ContextProvider;
use picture_press::config::{self, ConfigLayers};
use picture_press::imaging::NamingProvider;
use picture_press::options::PartialOptions;
use picture_press::pipeline::Renderer;
use picture_press::scan;
use picture_press::stats::RenderStats;
use std::path::{Path, PathBuf};
use tracing::{Level, debug, warn};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "picture-press")]
#[command(about = "Responsive WebP <picture> markup for image collections")]
#[command(long_about = "\
Responsive WebP <picture> markup for image collections

Every image becomes a <picture> with a WebP <source> and a fallback <img>,
both carrying a width-based srcset, intrinsic dimensions and lazy loading.

Options are resolved per key, first match wins:

  call-site (--options)  >  fields.json  >  templates.json  >  config.toml

Config directory layout:

  config/
  ├── config.toml        # Global defaults (sparse, merged over stock values)
  ├── templates.json     # { \"home\": { \"figure\": true } }
  └── fields.json        # { \"gallery\": { \"sizes\": \"100vw\" } }

Run 'picture-press gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Directory holding config.toml, templates.json and fields.json
    #[arg(long, default_value = ".", global = true)]
    config: PathBuf,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render markup for the images in a directory
    Render(RenderArgs),
    /// Validate the config directory strictly
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
    /// Show or reset render statistics
    Stats {
        /// Stats file
        #[arg(long, default_value = "picture-press-stats.json")]
        file: PathBuf,
        /// Zero all counters
        #[arg(long)]
        reset: bool,
    },
}

#[derive(clap::Args)]
struct RenderArgs {
    /// Directory of images to render
    #[arg(long)]
    source: PathBuf,

    /// URL prefix the images are published under
    #[arg(long, default_value = "")]
    base_url: String,

    /// Page template to render for
    #[arg(long, default_value = "")]
    template: String,

    /// Image field name [default: source directory name]
    #[arg(long)]
    field: Option<String>,

    /// Render only the first image
    #[arg(long)]
    first: bool,

    /// Call-site options as a JSON object
    #[arg(long, default_value = "{}")]
    options: String,

    /// Count renders into this stats file
    #[arg(long)]
    stats: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Render(args) => render(&cli.config, args)?,
        Command::Check => check(&cli.config)?,
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::Stats { file, reset } => {
            let stats = RenderStats::load(&file, 1);
            if reset {
                stats.reset();
                stats.flush()?;
                println!("==> Stats reset: {}", file.display());
            }
            println!("{}", serde_json::to_string_pretty(&stats.snapshot())?);
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn render(config_dir: &Path, args: RenderArgs) -> Result<(), Box<dyn std::error::Error>> {
    let layers = ConfigLayers::load(config_dir)?;
    let call: PartialOptions = serde_json::from_str(&args.options)?;

    let field = args.field.unwrap_or_else(|| {
        args.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    });
    let images = scan::scan_dir(&args.source, &args.base_url)?.with_context(args.template, field);
    let ctx = images.context();
    debug!(count = images.len(), template = %ctx.template, field = %ctx.field, "rendering");

    let stats = args
        .stats
        .map(|path| RenderStats::load(path, layers.global.stats_flush_every));
    let provider = NamingProvider;
    let mut renderer = Renderer::new(&layers, &provider);
    if let Some(stats) = &stats {
        renderer = renderer.with_stats(stats);
    }

    let html = if args.first {
        renderer.render_first(&images, &call)?
    } else {
        renderer.render_all(&images, &call)?
    };
    println!("{html}");

    if let Some(stats) = &stats {
        if let Err(err) = stats.flush() {
            warn!(error = %err, "could not persist render stats");
        }
    }
    Ok(())
}

/// Strict validation: unlike rendering, malformed JSON is an error here.
fn check(dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("==> Checking {}", dir.display());
    let global = config::load_config(dir)?;
    println!(
        "{}: ok (breakpoints {})",
        config::CONFIG_FILE,
        global.breakpoints
    );

    for file in [config::TEMPLATES_FILE, config::FIELDS_FILE] {
        let path = dir.join(file);
        if !path.exists() {
            println!("{file}: not present");
            continue;
        }
        let map = config::parse_context_defaults(&std::fs::read_to_string(&path)?)
            .map_err(|err| format!("{}: {err}", path.display()))?;
        let names: Vec<&str> = map.keys().map(String::as_str).collect();
        println!("{file}: {} entries {names:?}", map.len());
    }

    println!("==> Config is valid");
    Ok(())
}
