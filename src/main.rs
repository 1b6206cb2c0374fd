use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use prodname::settings::{self, Settings};
use prodname::{table, Extractor};

#[derive(Parser)]
#[command(
    name = "prodname",
    about = "Derive product names from regulatory product descriptions"
)]
struct Cli {
    /// Settings file (toml, yaml, json, ...); skipped when absent
    #[arg(long, global = true, default_value = settings::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a "Product Name" column to a spreadsheet (.csv, .xlsx, .xls, .ods)
    Process {
        input: PathBuf,
        /// Output .csv or .xlsx (default: <output_dir>/processed_<input stem>,
        /// CSV for CSV input and xlsx for workbook input)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Rows per batch (default from settings)
        #[arg(long)]
        chunk_size: Option<usize>,
    },
    /// Run the extractor on descriptions given as arguments
    Extract {
        #[arg(required = true)]
        texts: Vec<String>,
    },
    /// Print the effective extraction rules as JSON
    Rules,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load(&cli.config)?;
    info!(config = %cli.config.display(), chunk_size = settings.chunk_size, "settings loaded");

    let result = match cli.command {
        Commands::Process {
            input,
            output,
            chunk_size,
        } => {
            let output = output.unwrap_or_else(|| default_output(&settings.output_dir, &input));
            let chunk_size = chunk_size.unwrap_or(settings.chunk_size);
            process_file(&settings, &input, &output, chunk_size)
        }
        Commands::Extract { texts } => {
            let extractor = Extractor::new(&settings.rules).context("invalid extraction rules")?;
            for text in &texts {
                let e = extractor.extract(text);
                println!("{}", e.name);
                println!("  stage:   {}", e.source);
                println!("  cleaned: {}", e.cleaned);
            }
            Ok(())
        }
        Commands::Rules => {
            println!("{}", serde_json::to_string_pretty(&settings.rules)?);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

/// Nothing is written unless every row was processed.
fn process_file(
    settings: &Settings,
    input: &Path,
    output: &Path,
    chunk_size: usize,
) -> anyhow::Result<()> {
    let extractor = Extractor::new(&settings.rules).context("invalid extraction rules")?;
    let sheet = table::read_table(input)
        .with_context(|| format!("failed to read {}", input.display()))?;

    println!("Processing {} rows from {}...", sheet.rows.len(), input.display());
    let pb = ProgressBar::new(sheet.rows.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let augmented = table::augment(sheet, &extractor, chunk_size, |n| pb.inc(n as u64));
    pb.finish_and_clear();
    let (sheet, counts) = augmented?;

    table::write_table(output, &sheet)
        .with_context(|| format!("failed to write {}", output.display()))?;
    counts.print();
    println!("Wrote {}", output.display());
    Ok(())
}

fn default_output(output_dir: &Path, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sheet".to_string());
    output_dir.join(format!(
        "processed_{}.{}",
        stem,
        table::output_extension(input)
    ))
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
