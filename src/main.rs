#![forbid(unsafe_code)]
//! # excel_ngrams CLI
//!
//! Reads a column of keywords from a spreadsheet, ranks the most frequent
//! word n-grams for every phrase length up to `--max-n` and writes them to a
//! timestamped file next to the input.
//!
//! ## Example
//! ```bash
//! cargo run --release -- --file-path keywords.xlsx --column-name Keyword --max-n 3 --top-results 100
//! ```
//!
//! Set `RUST_LOG=info` (or `debug`) for progress details.

use std::path::PathBuf;
use std::process;

use chrono::Local;
use clap::{ArgAction, Parser};
use excel_ngrams::{
    EnglishLexicon, ExportFormat, NgramOptions, SheetSelector, analyze_file, destination_path,
    write_table,
};
use log::{debug, error};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Spreadsheet to read (.xlsx, .xlsm, .csv or .tsv)
    #[arg(short, long, value_parser = existing_file)]
    file_path: PathBuf,

    /// Sheet name or zero-based sheet number (ignored for .csv/.tsv)
    #[arg(short, long, default_value = "0")]
    sheet_name: SheetSelector,

    /// Header of the column holding the terms
    #[arg(short, long, default_value = "Keyword")]
    column_name: String,

    /// Longest phrase length to count
    #[arg(short, long, default_value_t = 5)]
    max_n: usize,

    /// Shortest phrase length to count
    #[arg(long, default_value_t = 1)]
    min_n: usize,

    /// Number of results kept per phrase length
    #[arg(short, long, default_value_t = 250)]
    top_results: usize,

    /// Remove English stopwords before counting (true/false)
    #[arg(short = 'w', long, default_value_t = true, action = ArgAction::Set)]
    stopwords: bool,

    /// Optional path to additional stopword file (.txt, one word per line)
    #[arg(long)]
    extra_stopwords: Option<PathBuf>,

    /// Do not build n-grams that span two cells
    #[arg(long, default_value_t = false)]
    within_terms: bool,

    /// Output format for export (csv, tsv, json)
    #[arg(long, default_value = "csv")]
    export_format: ExportFormat,

    /// Write to this path instead of <input>_<timestamp>_n-grams.<ext>
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn existing_file(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);
    if path.is_file() {
        Ok(path)
    } else {
        Err(format!("file {s:?} does not exist"))
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        error!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> excel_ngrams::Result<()> {
    let options = NgramOptions {
        min_n: cli.min_n,
        max_n: cli.max_n,
        top_n: cli.top_results,
        stopwords: cli.stopwords,
        within_terms: cli.within_terms,
    };
    options.validate()?;

    let mut lexicon = EnglishLexicon::new();
    if let Some(path) = &cli.extra_stopwords {
        lexicon = lexicon.with_extra_stopwords(path)?;
    }
    if cli.stopwords {
        debug!("Filtering {} stopwords", lexicon.stopword_count());
    }

    println!("Reading file...");
    println!("Performing n-gram analysis...");
    let table = analyze_file(
        &lexicon,
        &cli.file_path,
        &cli.sheet_name,
        &cli.column_name,
        &options,
    )?;

    let destination = match &cli.output {
        Some(path) => path.clone(),
        None => destination_path(
            &cli.file_path,
            Local::now().naive_local(),
            cli.export_format,
        ),
    };
    let written = write_table(&table, &destination, cli.export_format)?;
    println!(
        "{} file written to {}.",
        cli.export_format.extension().to_uppercase(),
        written.display()
    );
    Ok(())
}
