//! gradesheet CLI - student transcript export tool

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use gradesheet::{
    collect_inputs, detect_format_from_path, run_batch, split, BatchEvent, DocumentSegmenter,
    ExtractOptions, FieldMatcher, JsonFormat, OutputFormat, PageSource, PdfSource, RecordOutcome,
    SubjectTagSet,
};

#[derive(Parser)]
#[command(name = "gradesheet")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Export PDF student transcripts to CSV", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract grade tables to one CSV per document
    Extract {
        /// PDF file or directory of PDF files
        #[arg(value_name = "PATH")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long = "output-dir", value_name = "DIR", default_value = ".")]
        output: PathBuf,

        /// Write INFO logs to this file (truncated)
        #[arg(short, long, value_name = "FILE")]
        log_file: Option<PathBuf>,

        /// Comma-separated subject tags
        #[arg(long, env = "GRADESHEET_TAGS", value_name = "TAGS")]
        tags: Option<String>,

        /// Write JSON records instead of CSV
        #[arg(long)]
        json: bool,

        /// Process documents one at a time
        #[arg(long)]
        sequential: bool,
    },

    /// Split a multi-student PDF into one PDF per student
    Split {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output: PathBuf,

        /// Treat the first page as a student page, not a cover sheet
        #[arg(long)]
        keep_cover: bool,

        /// Only list the detected segments
        #[arg(long)]
        dry_run: bool,
    },

    /// Write every page of a PDF to its own file
    Pages {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output: PathBuf,
    },

    /// Show what is detected on a transcript
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();

    let log_file = match &cli.command {
        Commands::Extract { log_file, .. } => log_file.clone(),
        _ => None,
    };
    if let Err(e) = init_logging(log_file.as_deref()) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }

    let result = match cli.command {
        Commands::Extract {
            input,
            output,
            log_file,
            tags,
            json,
            sequential,
        } => cmd_extract(
            &input,
            &output,
            log_file.as_deref(),
            tags.as_deref(),
            json,
            sequential,
        ),
        Commands::Split {
            input,
            output,
            keep_cover,
            dry_run,
        } => cmd_split(&input, &output, keep_cover, dry_run),
        Commands::Pages { input, output } => cmd_pages(&input, &output),
        Commands::Info { input, json } => cmd_info(&input, json),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Route logs to `log_file` at INFO level, or to stderr under `RUST_LOG`.
fn init_logging(log_file: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match log_file {
        Some(path) => {
            let file = File::create(path)?;
            env_logger::Builder::new()
                .filter_level(log::LevelFilter::Info)
                .format(|buf, record| {
                    writeln!(buf, "{} {}: {}", buf.timestamp(), record.level(), record.args())
                })
                .target(env_logger::Target::Pipe(Box::new(file)))
                .try_init()?;
        }
        None => env_logger::try_init()?,
    }
    Ok(())
}

fn cmd_extract(
    input: &Path,
    output: &Path,
    log_file: Option<&Path>,
    tags: Option<&str>,
    json: bool,
    sequential: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let inputs = collect_inputs(input)?;
    if inputs.is_empty() {
        println!("{} {}", "No PDF files found in".yellow(), input.display());
        return Ok(());
    }

    let mut options = ExtractOptions::new().with_parallel(!sequential);
    if let Some(tags) = tags {
        options = options.with_tags(SubjectTagSet::parse(tags));
    }
    if json {
        options = options.with_format(OutputFormat::Json(JsonFormat::Pretty));
    }

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let (tx, rx) = crossbeam_channel::unbounded();
    let outcomes = thread::scope(|scope| {
        let worker = scope.spawn(|| {
            let outcomes = run_batch(&inputs, &options, output, Some(&tx));
            drop(tx);
            outcomes
        });

        for event in rx.iter() {
            match event {
                BatchEvent::Started { source } => pb.set_message(file_label(&source)),
                event if event.is_final() => pb.inc(1),
                _ => {}
            }
        }
        worker.join()
    })
    .map_err(|_| "batch worker panicked")?;
    pb.finish_and_clear();

    report_outcomes(&outcomes);
    println!("{}", "Traitement terminé.".green().bold());
    if let Some(path) = log_file {
        println!("Logs disponibles dans: {}", path.display());
    }
    Ok(())
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn report_outcomes(outcomes: &[RecordOutcome]) {
    for outcome in outcomes {
        match outcome {
            RecordOutcome::Exported { output, rows, .. } => {
                println!("  {} {} ({} rows)", "✓".green(), output.display(), rows)
            }
            RecordOutcome::Empty { source } => println!(
                "  {} {}: no grade table",
                "!".yellow(),
                source.display()
            ),
            RecordOutcome::Failed { source, error } => {
                println!("  {} {}: {}", "✗".red(), source.display(), error)
            }
        }
    }
}

fn cmd_split(
    input: &Path,
    output: &Path,
    keep_cover: bool,
    dry_run: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = PdfSource::open(input)?;
    let segments = DocumentSegmenter::new()
        .with_skip_cover(!keep_cover)
        .segment_source(&source)?;

    if segments.is_empty() {
        println!("{}", "No student pages found".yellow());
        return Ok(());
    }

    let base = split::base_name(input);
    if dry_run {
        for segment in &segments {
            println!(
                "{} pages {}-{}",
                segment.label(&base),
                segment.pages.first + 1,
                segment.pages.last + 1
            );
        }
        return Ok(());
    }

    for path in split::write_segments(input, &segments, output)? {
        println!("{} {}", "Saved".green(), path.display());
    }
    println!(
        "\n{} {} students written to {}",
        "Done!".green().bold(),
        segments.len(),
        output.display()
    );
    Ok(())
}

fn cmd_pages(input: &Path, output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let written = split::split_pages(input, output)?;
    for path in &written {
        println!("{} {}", "Saved".green(), path.display());
    }
    println!("\n{} {} pages written", "Done!".green().bold(), written.len());
    Ok(())
}

fn cmd_info(input: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let format = detect_format_from_path(input)?;
    let source = PdfSource::open(input)?;
    let first_page = if source.page_count() > 0 {
        source.page_text(0)?
    } else {
        Default::default()
    };
    let fields = FieldMatcher::new().match_page(&first_page);

    let mut fragments = 0;
    for index in 0..source.page_count() {
        fragments += source.page_tables(index)?.len();
    }

    if json {
        let info = serde_json::json!({
            "file": input.display().to_string(),
            "version": format.version,
            "pages": source.page_count(),
            "identity": fields.identity,
            "birth": fields.birth,
            "table_fragments": fragments,
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Format".bold(), format);
    println!("{}: {}", "Pages".bold(), source.page_count());

    println!();
    println!("{}", "First Page".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Name".bold(), fields.identity.name);
    println!("{}: {}", "Student ID".bold(), fields.identity.student_id);
    println!("{}: {}", "INE".bold(), fields.identity.national_id);
    println!("{}: {}", "Born".bold(), fields.birth.date);
    println!("{}: {}", "Place".bold(), fields.birth.place);
    println!("{}: {}", "Table fragments".bold(), fragments);

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "gradesheet".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Student transcript export tool");
    println!();
    println!("License: MIT");
}
