use clap::{Parser, Subcommand};
use pixmill::batch;
use pixmill::config::{self, EngineConfig};
use pixmill::image::Image;
use pixmill::recipe::Recipe;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pixmill")]
#[command(about = "Raster image transforms, filters and re-encoding")]
#[command(long_about = "\
Raster image transforms, filters and re-encoding

Transforms are described in a TOML recipe, one [[steps]] table per
operation:

  [[steps]]
  op = \"resize\"
  mode = \"resizecrop\"      # classic | reduce | crop | resizecrop
  size = [400, 300]

  [[steps]]
  op = \"vignette\"
  size = 0.7
  level = 0.8

Supported formats: GIF, PNG, JPEG. The output format follows the output
file extension.

Run 'pixmill gen-config' to generate a documented pixmill.toml.")]
#[command(version)]
struct Cli {
    /// Engine config file
    #[arg(long, default_value = "pixmill.toml", global = true)]
    config: PathBuf,

    /// Log debug events to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print image metadata as JSON
    Info { file: PathBuf },
    /// Apply a recipe to one image
    Apply {
        input: PathBuf,
        output: PathBuf,
        /// Recipe file
        #[arg(long)]
        recipe: PathBuf,
    },
    /// Apply a recipe to every image under a directory
    Batch {
        dir: PathBuf,
        out_dir: PathBuf,
        /// Recipe file
        #[arg(long)]
        recipe: PathBuf,
    },
    /// Re-encode an image and print it as base64
    Encode {
        file: PathBuf,
        /// Prefix with data:<mime>;base64,
        #[arg(long)]
        data_uri: bool,
    },
    /// Print a stock pixmill.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Info { file } => {
            let engine = config::load_config(&cli.config)?;
            let img = load(&file, &engine)?;
            println!("{}", serde_json::to_string_pretty(img.metadata())?);
        }
        Command::Apply {
            input,
            output,
            recipe,
        } => {
            let engine = config::load_config(&cli.config)?;
            let recipe = Recipe::load(&recipe)?;
            batch::process_file(&input, &output, &recipe, &engine)?;
            println!("{} → {}", input.display(), output.display());
        }
        Command::Batch {
            dir,
            out_dir,
            recipe,
        } => {
            let engine = config::load_config(&cli.config)?;
            let recipe = Recipe::load(&recipe)?;
            init_thread_pool(&engine.processing);
            let report = batch::run(&dir, &out_dir, &recipe, &engine);
            for (input, message) in &report.failed {
                eprintln!("FAILED {}: {}", input.display(), message);
            }
            println!(
                "Processed {} image(s), {} failed",
                report.processed.len(),
                report.failed.len()
            );
            if !report.is_success() {
                return Err(format!("{} image(s) failed", report.failed.len()).into());
            }
        }
        Command::Encode { file, data_uri } => {
            let engine = config::load_config(&cli.config)?;
            let img = load(&file, &engine)?;
            println!("{}", img.to_base64(data_uri)?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn load(file: &Path, engine: &EngineConfig) -> pixmill::Result<Image> {
    let mut img = Image::new()?;
    img.configure(engine).load(file)?;
    if engine.auto_orientate {
        img.auto_orientate()?;
    }
    Ok(img)
}

/// `RUST_LOG` wins when set; otherwise `warn`, or `debug` with `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "pixmill=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; users can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
