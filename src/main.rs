//! edinet-dl CLI — fetch filing metadata for a date range or document
//! content for a set of identifiers.
//!
//! Exit code 0 means the driver ran to completion; individual fetch
//! failures are reported in the summary, not via the exit code. Non-zero
//! exits are reserved for problems that prevent a run from starting at all
//! (bad arguments, no credential).

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use edinet_dl::{
    BatchSummary, Config, ContentKind, DailyMetadataDriver, DocumentFetchDriver, DocumentId,
    FetchWorker, credential,
};

#[derive(Parser)]
#[command(
    name = "edinet-dl",
    about = "Bulk downloader for EDINET filing metadata and documents",
    version
)]
struct Cli {
    /// Path to a JSON key file ({"Subscription-Key": "..."}). The
    /// EDINET_API_KEY environment variable takes precedence.
    #[arg(long, global = true)]
    key_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch filing metadata listings for a closed date range
    Listings {
        /// First date of the range (YYYY-MM-DD)
        #[arg(long)]
        from: NaiveDate,

        /// Last date of the range, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to: NaiveDate,

        /// Directory for per-date and combined TSV files
        #[arg(long, default_value = "./tsv")]
        tsv_dir: PathBuf,
    },

    /// Fetch document content for a set of identifiers
    Documents {
        /// Document identifier (repeatable)
        #[arg(long = "id")]
        ids: Vec<String>,

        /// File with one document identifier per line
        #[arg(long)]
        ids_file: Option<PathBuf>,

        /// Directory to write the downloaded files into
        #[arg(long, default_value = "./doc")]
        target_dir: PathBuf,

        /// Content form to fetch
        #[arg(long, value_enum, default_value_t = Format::Xbrl)]
        format: Format,

        /// Maximum simultaneously in-flight fetches
        #[arg(long, default_value_t = 16)]
        max_concurrent: usize,
    },
}

/// Content form, CLI-facing
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// XBRL structured-data archive (saved as .zip)
    Xbrl,
    /// Rendered PDF
    Pdf,
}

impl From<Format> for ContentKind {
    fn from(format: Format) -> Self {
        match format {
            Format::Xbrl => ContentKind::StructuredArchive,
            Format::Pdf => ContentKind::RenderedDocument,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let credential = credential::resolve(cli.key_file.as_deref())?;

    match cli.command {
        Commands::Listings { from, to, tsv_dir } => {
            let config = Config {
                tsv_dir,
                ..Config::default()
            };
            let worker = FetchWorker::new(&config, credential)?;
            let report = DailyMetadataDriver::new(&worker, &config)
                .run(from, to)
                .await?;

            report_failures(&report.outcomes);
            println!("{}", BatchSummary::of(&report.outcomes));
            println!(
                "combined listing: {} rows -> {}",
                report.combined.len(),
                report.combined_path.display()
            );
        }
        Commands::Documents {
            ids,
            ids_file,
            target_dir,
            format,
            max_concurrent,
        } => {
            let mut raw_ids = ids;
            if let Some(path) = ids_file {
                raw_ids.extend(read_ids_file(&path)?);
            }
            if raw_ids.is_empty() {
                return Err("no document ids supplied (use --id or --ids-file)".into());
            }

            let documents = raw_ids
                .into_iter()
                .map(|id| Ok((DocumentId::new(id)?, target_dir.clone())))
                .collect::<edinet_dl::Result<Vec<_>>>()?;

            let config = Config {
                max_concurrent_fetches: max_concurrent,
                ..Config::default()
            };
            let worker = FetchWorker::new(&config, credential)?;
            let outcomes = DocumentFetchDriver::new(&worker, &config)
                .run(documents, format.into())
                .await?;

            report_failures(&outcomes);
            println!("{}", BatchSummary::of(&outcomes));
        }
    }

    Ok(())
}

/// Print every non-success outcome to stderr, one line each
fn report_failures(outcomes: &[edinet_dl::FetchOutcome]) {
    for outcome in outcomes {
        if !outcome.status.is_success() {
            eprintln!("{}: {}", outcome.request.operation, outcome.status);
        }
    }
}

/// Read document identifiers from a file: one per line, blank lines and
/// `#` comments skipped
fn read_ids_file(path: &std::path::Path) -> std::io::Result<Vec<String>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}
