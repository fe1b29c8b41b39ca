//! CLI tool for converting PowerPoint presentations into HTML5 sites.

use anyhow::{Context, Result};
use clap::Parser;
use slideweb_core::{ConvertOptions, ErrorKind};
use slideweb_pptx::PptxConverter;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Convert a PowerPoint presentation to a static HTML5 website.
#[derive(Parser, Debug)]
#[command(name = "pptx-to-html")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input PowerPoint file (.pptx)
    input: PathBuf,

    /// Output directory (default: directory named after the input file, next to it)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Include speaker notes in the generated site
    #[arg(short = 'n', long)]
    include_notes: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Print the extracted slide records as JSON instead of writing a site
    #[arg(long)]
    print_json: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    match run(&args) {
        Ok(Some(index)) => {
            println!("✓ Successfully converted presentation to HTML5");
            println!("✓ Output: {}", index.display());
            println!();
            println!(
                "Open {} in your web browser to view the presentation.",
                index.display()
            );
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", describe_failure(&e));
            ExitCode::FAILURE
        }
    }
}

/// Convert the input, or dump its records when `--print-json` is set.
///
/// Returns the path of `index.html` when a site was written.
fn run(args: &Args) -> Result<Option<PathBuf>> {
    let options = ConvertOptions::new().with_include_notes(args.include_notes);
    let converter = PptxConverter::open(&args.input)?;

    if args.verbose {
        eprintln!(
            "Processing: {} ({} slides)",
            args.input.display(),
            converter.presentation().slides.len()
        );
    }

    if args.print_json {
        let records = converter.slide_records(&options);
        log::debug!("Printing {} slide records as JSON", records.len());
        let json =
            serde_json::to_string_pretty(&records).context("Failed to serialize slide records")?;
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", json).context("Failed to write to stdout")?;
        return Ok(None);
    }

    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_dir(&args.input));
    log::debug!("Writing site to {}", output_dir.display());
    let index = converter.convert(&output_dir, &options)?;

    Ok(Some(index))
}

/// `deck.pptx` -> `deck/` beside the input.
fn default_output_dir(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or(input.as_os_str());
    match input.parent() {
        Some(parent) => parent.join(stem),
        None => PathBuf::from(stem),
    }
}

/// One-line diagnostic: `Error:` for a missing or unusable input file,
/// `Unexpected error:` for everything else.
fn describe_failure(err: &anyhow::Error) -> String {
    match err.downcast_ref::<slideweb_core::Error>() {
        Some(core) if matches!(core.kind(), ErrorKind::NotFound | ErrorKind::InvalidFormat) => {
            format!("Error: {}", core)
        }
        _ => format!("Unexpected error: {:#}", err),
    }
}
