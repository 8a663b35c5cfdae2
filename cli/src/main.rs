use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use prost_types::FileOptions;
use protomod_image::Image;
use protomod_modify::{
    FileOptionField, FileOptionSweeper, GoPackageConfig, ManagedConfig, Modifier, OptionValue,
};
use serde_json::{Map, Value, json};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "protomod")]
#[command(about = "Rewrite code generation options across a protobuf image")]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply a managed-mode configuration to an image.
    Modify(ModifyArgs),
    /// Print every file's path and set options as JSON.
    Inspect(InspectArgs),
}

#[derive(Debug, Args)]
struct ModifyArgs {
    /// Input image (serialized FileDescriptorSet).
    #[arg(long)]
    image: PathBuf,
    /// Managed-mode YAML configuration.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output image path.
    #[arg(long)]
    output: PathBuf,
    /// Number of parallel per-file jobs (default: config, then number of CPUs).
    #[arg(long)]
    jobs: Option<usize>,
    /// go_package import path prefix; replaces the configured one.
    #[arg(long)]
    go_package_prefix: Option<String>,
}

#[derive(Debug, Args)]
struct InspectArgs {
    /// Input image (serialized FileDescriptorSet).
    #[arg(long)]
    image: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Modify(args) => run_modify(args),
        Command::Inspect(args) => run_inspect(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "protomod=debug" } else { "protomod=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_modify(args: ModifyArgs) -> Result<(), String> {
    let mut config = match &args.config {
        Some(path) => ManagedConfig::load(path)
            .map_err(|e| format!("Failed to load config {}: {e}", path.display()))?,
        None => ManagedConfig::default(),
    };
    if let Some(prefix) = args.go_package_prefix {
        let overrides = config
            .go_package
            .take()
            .map(|go| go.overrides)
            .unwrap_or_default();
        config.go_package = Some(GoPackageConfig { prefix, overrides });
    }
    if let Some(jobs) = args.jobs {
        config.jobs = Some(jobs);
    }
    config.validate().map_err(|e| e.to_string())?;
    if config.is_empty() {
        return Err(
            "Nothing to modify: enable at least one option in --config or pass --go-package-prefix"
                .to_string(),
        );
    }

    let mut image = Image::read(&args.image)
        .map_err(|e| format!("Failed to read image {}: {e}", args.image.display()))?;
    info!(files = image.len(), path = %args.image.display(), "Loaded image");

    let before: Vec<Option<FileOptions>> =
        image.files().iter().map(|f| f.options().cloned()).collect();

    let sweeper = FileOptionSweeper::new();
    let runner = config.build(&sweeper).map_err(|e| e.to_string())?;
    debug!(modifiers = runner.len(), "Built modification pass");

    let mut pool = rayon::ThreadPoolBuilder::new();
    if let Some(jobs) = config.jobs {
        pool = pool.num_threads(jobs);
    }
    let pool = pool
        .build()
        .map_err(|e| format!("Failed to create thread pool: {e}"))?;
    pool.install(|| runner.modify(&mut image))
        .map_err(|e| e.to_string())?;

    let touched = image
        .files()
        .iter()
        .zip(&before)
        .filter(|(file, before)| file.options() != before.as_ref())
        .count();

    image
        .write(&args.output)
        .map_err(|e| format!("Failed to write image {}: {e}", args.output.display()))?;
    info!(touched, path = %args.output.display(), "Wrote image");

    println!("Files: {}", image.len());
    println!("Touched: {touched}");
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<(), String> {
    let image = Image::read(&args.image)
        .map_err(|e| format!("Failed to read image {}: {e}", args.image.display()))?;

    let files: Vec<Value> = image
        .files()
        .iter()
        .map(|file| {
            json!({
                "path": file.path(),
                "package": file.package(),
                "well_known": file.is_well_known(),
                "options": file.options().map(options_json).unwrap_or_default(),
            })
        })
        .collect();

    let output = serde_json::to_string_pretty(&json!({ "files": files }))
        .map_err(|e| format!("Failed to serialize image summary: {e}"))?;
    println!("{output}");
    Ok(())
}

fn options_json(options: &FileOptions) -> Map<String, Value> {
    FileOptionField::ALL
        .iter()
        .filter_map(|field| {
            let value = match field.get(options)? {
                OptionValue::String(value) => Value::String(value),
                OptionValue::Bool(value) => Value::Bool(value),
                OptionValue::OptimizeMode(mode) => Value::String(mode.as_str_name().to_string()),
            };
            Some((field.name().to_string(), value))
        })
        .collect()
}
