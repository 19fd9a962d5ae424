//! yolo2coco: convert partitioned YOLO datasets into COCO JSON.
//!
//! A YOLO dataset keeps one normalized label file per image under
//! `labels/<partition>/`. yolo2coco turns each partition into a single
//! `instances_<partition>.json` in COCO detection layout, with absolute
//! top-left boxes and a category table built from a configured class list.
//!
//! # Modules
//!
//! - [`config`]: conversion settings and class-name loading
//! - [`ir`]: COCO-shaped dataset types and YOLO/COCO file I/O
//! - [`conversion`]: the per-partition converter and its report
//! - [`driver`]: runs every partition and writes the outputs
//! - [`error`]: error types for yolo2coco operations
//!
//! # Example
//!
//! ```no_run
//! use yolo2coco::{convert_dataset, ConvertConfig};
//!
//! let config = ConvertConfig::new("/data/cattle", ["body", "head", "leg"]).validated()?;
//! let summary = convert_dataset(&config);
//! print!("{summary}");
//! # Ok::<(), yolo2coco::Yolo2CocoError>(())
//! ```

pub mod config;
pub mod conversion;
pub mod driver;
pub mod error;
pub mod ir;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

pub use config::ConvertConfig;
pub use driver::{convert_dataset, convert_dataset_with, PartitionOutcome, RunSummary};
pub use error::Yolo2CocoError;

/// The yolo2coco CLI application.
#[derive(Parser)]
#[command(name = "yolo2coco")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Convert every partition of a YOLO dataset to COCO JSON.
    Convert(ConvertArgs),
}

/// Arguments for the convert subcommand.
///
/// Flags override values from `--config`.
#[derive(clap::Args)]
struct ConvertArgs {
    /// YAML config file (root, partitions, classes, image_extensions, ...).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Dataset root containing images/ and labels/.
    #[arg(long)]
    root: Option<PathBuf>,

    /// Partitions to convert, in order.
    #[arg(long, value_delimiter = ',')]
    partitions: Option<Vec<String>>,

    /// Class names; position is the category id.
    #[arg(long, value_delimiter = ',', conflicts_with = "classes_file")]
    classes: Option<Vec<String>>,

    /// Read class names from a data.yaml or classes.txt.
    #[arg(long)]
    classes_file: Option<PathBuf>,

    /// Accepted image extensions.
    #[arg(long = "ext", value_delimiter = ',')]
    image_extensions: Option<Vec<String>>,

    /// Supercategory written on every category.
    #[arg(long)]
    supercategory: Option<String>,

    /// Pretty-print the output JSON files.
    #[arg(long)]
    pretty: bool,

    /// Format of the summary printed to stdout.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    output: ReportFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

/// Run the yolo2coco CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), Yolo2CocoError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Convert(args)) => run_convert(args),
        None => {
            println!("yolo2coco {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Convert partitioned YOLO datasets into COCO JSON.");
            println!();
            println!("Run 'yolo2coco --help' for usage information.");
            Ok(())
        }
    }
}

fn run_convert(args: ConvertArgs) -> Result<(), Yolo2CocoError> {
    let config = resolve_config(&args)?;
    let summary = convert_dataset(&config);

    match args.output {
        ReportFormat::Json => {
            let reports: Vec<serde_json::Value> = summary
                .partitions
                .iter()
                .map(|(name, outcome)| outcome_json(name, outcome))
                .collect();
            let json = serde_json::to_string_pretty(&reports)
                .map_err(|source| Yolo2CocoError::SummarySerialize { source })?;
            println!("{json}");
        }
        ReportFormat::Text => print!("{summary}"),
    }

    summary.into_result().map(|_| ())
}

fn resolve_config(args: &ConvertArgs) -> Result<ConvertConfig, Yolo2CocoError> {
    let mut config = match (&args.config, &args.root) {
        (Some(path), _) => ConvertConfig::read_yaml_file(path)?,
        (None, Some(root)) => ConvertConfig::new(root.clone(), Vec::<String>::new()),
        (None, None) => {
            return Err(Yolo2CocoError::InvalidConfig(
                "either --root or --config is required".to_string(),
            ))
        }
    };

    if let (Some(_), Some(root)) = (&args.config, &args.root) {
        config.root = root.clone();
    }
    if let Some(partitions) = &args.partitions {
        config.partitions = partitions.clone();
    }
    if let Some(classes) = &args.classes {
        config.classes = classes.clone();
    }
    if let Some(path) = &args.classes_file {
        config.classes = crate::config::read_class_names(path)?;
    }
    if let Some(extensions) = &args.image_extensions {
        config.image_extensions = extensions.clone();
    }
    if let Some(supercategory) = &args.supercategory {
        config.supercategory = supercategory.clone();
    }
    if args.pretty {
        config.pretty = true;
    }

    config.validated()
}

fn outcome_json(name: &str, outcome: &PartitionOutcome) -> serde_json::Value {
    match outcome {
        PartitionOutcome::Written { path, report } => serde_json::json!({
            "partition": name,
            "status": "written",
            "path": path,
            "report": report,
        }),
        PartitionOutcome::Skipped { reason } => serde_json::json!({
            "partition": name,
            "status": "skipped",
            "reason": reason.to_string(),
        }),
        PartitionOutcome::Failed { error } => serde_json::json!({
            "partition": name,
            "status": "failed",
            "error": error.to_string(),
        }),
    }
}
