// nameplate-pdf: Generate printable nameplates for fire-department personnel

use chrono::Local;
use clap::{Args, Parser, Subcommand};
use log::{error, info};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use nameplate_pdf::preview;
use nameplate_pdf::{
    Assets, ErrorPolicy, NameplateConfig, NameplateError, PaperSize, Person, PersonInput, Sheet,
};

// ============================================================================
// Constants
// ============================================================================

/// Title prefix when the batch does not name one
const DEFAULT_TITLE: &str = "Namensschilder";

// ============================================================================
// Data Structures
// ============================================================================

/// CLI Arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Generate printable fire-department nameplates")]
struct Cli {
    /// Log debug output (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render every person of a batch into one PDF
    Pdf(PdfArgs),
    /// Render a single card to PNG
    Preview(PreviewArgs),
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Batch file (JSON: {"title": ..., "persons": [...]} or an array of persons)
    #[arg(short, long)]
    input: PathBuf,

    /// Configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PdfArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Paper: A4 landscape grid or one card per label
    #[arg(short, long, value_enum, default_value = "a4")]
    paper: PaperSize,

    /// Output filename (defaults to a fresh UUID)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Skip persons whose card cannot be built instead of aborting
    #[arg(long)]
    skip_invalid: bool,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Position of the person in the batch
    #[arg(long, default_value = "0")]
    index: usize,

    /// Output filename (defaults to a fresh UUID)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Batch file contents
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BatchFile {
    Titled {
        #[serde(default)]
        title: Option<String>,
        persons: Vec<PersonInput>,
    },
    Bare(Vec<PersonInput>),
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<(), NameplateError> {
    match command {
        Command::Pdf(args) => run_pdf(args),
        Command::Preview(args) => run_preview(args),
    }
}

fn run_pdf(args: PdfArgs) -> Result<(), NameplateError> {
    let config = load_config(&args.common.config)?;
    let policy = if args.skip_invalid {
        ErrorPolicy::Skip
    } else {
        ErrorPolicy::Abort
    };

    let (title, inputs) = load_batch(&args.common.input)?;
    let (persons, invalid) = convert_persons(inputs, policy)?;
    let assets = Assets::load(&config)?;

    let title = title.unwrap_or_else(default_title);
    let sheet = Sheet::new(&config, &assets, args.paper, policy);
    let (surface, report) = sheet.render_pdf(&title, &persons)?;

    let output_file = args.output.unwrap_or_else(|| default_output("pdf"));
    surface.save(&output_file)?;

    println!("✓ Generated: {}", output_file.display());
    println!("  Title: {}", title);
    println!("  Cards: {} on {} pages", report.cards_drawn, report.pages);
    let skipped = invalid + report.skipped.len();
    if skipped > 0 {
        println!("  Skipped: {}", skipped);
    }

    Ok(())
}

fn run_preview(args: PreviewArgs) -> Result<(), NameplateError> {
    let config = load_config(&args.common.config)?;
    let (_, mut inputs) = load_batch(&args.common.input)?;

    if args.index >= inputs.len() {
        return Err(NameplateError::InputError(format!(
            "index {} out of range, batch has {} persons",
            args.index,
            inputs.len()
        )));
    }
    let person = Person::try_from(inputs.swap_remove(args.index))?;
    let assets = Assets::load(&config)?;

    let png = preview::render_png(&person, &config, &assets)
        .map_err(|e| e.for_person(person.display_name()))?;

    let output_file = args.output.unwrap_or_else(|| default_output("png"));
    std::fs::write(&output_file, png)?;

    println!("✓ Generated: {}", output_file.display());
    println!("  Person: {}", person.display_name());

    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn load_config(path: &Option<PathBuf>) -> Result<NameplateConfig, NameplateError> {
    match path {
        Some(p) => {
            let config = NameplateConfig::load(p)?;
            info!("Loaded config from {}", p.display());
            Ok(config)
        }
        None => Ok(NameplateConfig::default()),
    }
}

fn load_batch(path: &Path) -> Result<(Option<String>, Vec<PersonInput>), NameplateError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| NameplateError::InputError(format!("{}: {}", path.display(), e)))?;
    let batch: BatchFile = serde_json::from_str(&content)
        .map_err(|e| NameplateError::InputError(format!("Invalid JSON: {}", e)))?;

    Ok(match batch {
        BatchFile::Titled { title, persons } => (title, persons),
        BatchFile::Bare(persons) => (None, persons),
    })
}

/// Validate raw persons. Under the skip policy invalid entries are logged
/// and counted instead of failing the run.
fn convert_persons(
    inputs: Vec<PersonInput>,
    policy: ErrorPolicy,
) -> Result<(Vec<Person>, usize), NameplateError> {
    let mut persons = Vec::with_capacity(inputs.len());
    let mut invalid = 0;

    for input in inputs {
        match Person::try_from(input) {
            Ok(person) => persons.push(person),
            Err(e) if policy == ErrorPolicy::Skip => {
                error!("Skipping person: {}", e);
                invalid += 1;
            }
            Err(e) => return Err(e),
        }
    }
    Ok((persons, invalid))
}

fn default_title() -> String {
    format!("{} {}", DEFAULT_TITLE, Local::now().format("%Y-%m-%d"))
}

fn default_output(extension: &str) -> PathBuf {
    PathBuf::from(format!("{}.{}", Uuid::new_v4(), extension))
}
