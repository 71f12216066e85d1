use clap::{ArgGroup, Parser, Subcommand};
use retouch::dispatch;
use retouch::imaging::{OutputFormat, codec};
use retouch::pipeline::{Pipeline, Selection};
use retouch::{config, output, process};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

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
#[command(name = "retouch")]
#[command(about = "Apply named photo effects to raster images")]
#[command(long_about = "\
Apply named photo effects to raster images

Effects are picked from a free-text name by keyword. Every keyword found in
the name applies, in a fixed order, so \"Dark Vignette\" darkens and then
vignettes, and \"Vintage Film\" applies sepia and then grain. A name with no
known keyword returns the image unchanged.

Keywords:
  grayscale | black   invert       sepia | vintage   blur       bright
  dark                red          blue              green      contrast
  pixelate            sharpen      vignette          saturation (+ reduce)
  warm                cool         grain | film      glitch | vhs
  sketch              resize       enhance | auto

Use --only with canonical ids to skip keyword matching entirely.
Run 'retouch effects' for the full list and 'retouch gen-config' for a
documented retouch.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (optional; stock defaults apply when it does not exist)
    #[arg(long, default_value = "retouch.toml", global = true)]
    config: PathBuf,

    /// More log output on stderr (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

/// How to choose effects.
#[derive(clap::Args, Clone)]
#[command(group(ArgGroup::new("selection").required(true).args(["effect", "only"])))]
struct SelectionArgs {
    /// Free-text effect name, matched by keyword (e.g. "Dark Vignette")
    #[arg(short, long)]
    effect: Option<String>,

    /// Comma-separated canonical effect ids, applied in the given order
    #[arg(long, value_delimiter = ',')]
    only: Vec<String>,

    /// Seed for film grain (overrides [grain] seed)
    #[arg(long)]
    seed: Option<u64>,
}

impl SelectionArgs {
    fn selection(&self) -> Result<Selection, dispatch::UnknownEffect> {
        match &self.effect {
            Some(name) => Ok(Selection::Named(name.clone())),
            None => Ok(Selection::Explicit(dispatch::parse_effects(&self.only)?)),
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Apply effects to one image
    Apply {
        input: PathBuf,
        /// Output file; its extension picks the format when recognized
        output: PathBuf,
        #[command(flatten)]
        selection: SelectionArgs,
    },
    /// Apply effects to every image under a directory
    Batch {
        input_dir: PathBuf,
        output_dir: PathBuf,
        #[command(flatten)]
        selection: SelectionArgs,
    },
    /// List effects, or show what a name resolves to
    Effects {
        /// Effect name to resolve
        name: Option<String>,
    },
    /// Print a stock retouch.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Apply {
            input,
            output: target,
            selection,
        } => {
            let config = config::load_config(&cli.config)?;
            let pipeline = pipeline_for(&config, &selection);
            let effects = pipeline.effects_for(&selection.selection()?);
            let format = OutputFormat::from_path(&target).unwrap_or(config.output.format);

            let buffer = codec::load(&input)?;
            let before = buffer.dimensions();
            let buffer = pipeline.apply_effects(buffer, &effects)?;
            codec::save(&buffer, &target, format)?;
            output::print_apply_result(&input, &target, &effects, before, buffer.dimensions());
        }
        Command::Batch {
            input_dir,
            output_dir,
            selection,
        } => {
            let config = config::load_config(&cli.config)?;
            init_thread_pool(&config.processing);
            let pipeline = pipeline_for(&config, &selection);
            let chosen = selection.selection()?;

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_process_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = process::process(
                &input_dir,
                &output_dir,
                &pipeline,
                &chosen,
                config.output.format,
                Some(tx),
            );
            printer
                .join()
                .map_err(|_| "progress printer thread panicked")?;
            let report = result?;
            output::print_batch_summary(&report, &output_dir);
        }
        Command::Effects { name } => match name {
            Some(name) => {
                let config = config::load_config(&cli.config)?;
                let effects = dispatch::resolve(&name, config.dispatch.mode);
                output::print_resolution(&name, &effects);
            }
            None => output::print_effect_list(),
        },
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn pipeline_for(config: &config::RetouchConfig, args: &SelectionArgs) -> Pipeline {
    Pipeline::from_config(config).with_seed(args.seed.or(config.grain.seed))
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "retouch=info",
        _ => "retouch=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

