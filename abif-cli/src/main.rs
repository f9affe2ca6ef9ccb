//! ABIF Dump CLI Application
//!
//! Command-line front end for the abif-decoder library. It opens one ABIF
//! trace file, lists its tags in display order, and pretty-prints the
//! decoded value of each. On top of the decoder it adds:
//! - Deterministic tag ordering (name bytes, then number)
//! - Text rendering of known char-array tags (base calls etc.)
//! - JSON output and per-tag selection

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use abif_decoder::{Reader, Tag};

mod config;
mod display;

/// ABIF Dump - list tags and decoded values from ABIF trace files
#[derive(Parser, Debug)]
#[command(name = "abif-cli")]
#[command(about = "List tags and decoded values from ABIF trace files", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the ABIF file to dump
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Dump only these tags, as NAME:NUM (can be repeated)
    #[arg(short, long, value_name = "TAG")]
    tag: Vec<Tag>,

    /// Print each tag's decoded type only, without the value
    #[arg(long)]
    no_values: bool,

    /// Do not render known char-array tags as text
    #[arg(long)]
    raw: bool,

    /// Emit JSON instead of text lines
    #[arg(long)]
    json: bool,

    /// Path to configuration file with extra display settings
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("ABIF dump v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using decoder library v{}", abif_decoder::VERSION);

    dump(&args)
}

/// Open the file, resolve every selected tag, print one line (or one JSON
/// record) per tag
fn dump(args: &Args) -> Result<()> {
    let app_config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => config::AppConfig::default(),
    };
    let text_tags = display::text_tag_names(&app_config.display.text_tags, args.raw);

    let mut reader = Reader::open(&args.file)
        .with_context(|| format!("Failed to open ABIF file: {:?}", args.file))?;
    log::debug!(
        "File version {}, {} tags in directory",
        reader.version(),
        reader.len()
    );

    let mut tags = reader.tags();
    tags.sort();
    if !args.tag.is_empty() {
        tags.retain(|tag| args.tag.contains(tag));
    }

    if args.json {
        let records: Vec<display::JsonRecord> = tags
            .into_iter()
            .map(|tag| {
                let result = reader
                    .value(tag)
                    .map(|value| display::interpret(tag, value, &text_tags));
                display::JsonRecord::new(tag, result)
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        for tag in tags {
            let result = reader
                .value(tag)
                .map(|value| display::interpret(tag, value, &text_tags));
            println!("{}", display::format_line(tag, &result, !args.no_values));
        }
    }

    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
