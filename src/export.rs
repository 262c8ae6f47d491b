use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use clap::ValueEnum;
use csv::WriterBuilder;
use serde::Serialize;

use crate::error::{NgramError, Result};
use crate::table::{Cell, CombinedTable, TableRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ExportFormat {
    #[default]
    Csv,
    Tsv,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
            ExportFormat::Json => "json",
        }
    }
}

/// `<dir>/<stem>_<YYYYmmddHHMMSS>_n-grams.<ext>`, next to the input file.
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use excel_ngrams::{ExportFormat, destination_path};
/// let stamp = NaiveDate::from_ymd_opt(2020, 11, 22)
///     .unwrap()
///     .and_hms_opt(1, 2, 3)
///     .unwrap();
/// let path = destination_path("test/test_path.xlsx", stamp, ExportFormat::Csv);
/// assert_eq!(path, std::path::PathBuf::from("test/test_path_20201122010203_n-grams.csv"));
/// ```
pub fn destination_path<P: AsRef<Path>>(
    input: P,
    stamp: NaiveDateTime,
    format: ExportFormat,
) -> PathBuf {
    let input = input.as_ref();
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let file_name = format!(
        "{}_{}_n-grams.{}",
        stem,
        stamp.format("%Y%m%d%H%M%S"),
        format.extension()
    );
    input.with_file_name(file_name)
}

/// Neutralizes cells a spreadsheet would read as a formula by prefixing `'`.
pub fn csv_safe_cell(cell: String) -> String {
    match cell.chars().next() {
        Some('=' | '+' | '-' | '@') => format!("'{cell}"),
        _ => cell,
    }
}

/// Writes `table` to `path` and returns the path written.
pub fn write_table<P: AsRef<Path>>(
    table: &CombinedTable,
    path: P,
    format: ExportFormat,
) -> Result<PathBuf> {
    let path = path.as_ref();
    let written = match format {
        ExportFormat::Csv => write_delimited(table, path, b','),
        ExportFormat::Tsv => write_delimited(table, path, b'\t'),
        ExportFormat::Json => write_json(table, path),
    };
    written.map_err(|source| NgramError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(path.to_path_buf())
}

fn write_delimited(table: &CombinedTable, path: &Path, delimiter: u8) -> io::Result<()> {
    let file = File::create(path)?;
    let mut wtr = WriterBuilder::new().delimiter(delimiter).from_writer(file);

    let mut header = vec![String::new()];
    header.extend(table.headers());
    wtr.write_record(&header)?;

    for (index, cells) in table.rows().enumerate() {
        let mut record = Vec::with_capacity(cells.len() + 1);
        record.push(index.to_string());
        record.extend(cells.into_iter().map(|cell| match cell {
            Cell::Term(term) => csv_safe_cell(term.to_string()),
            Cell::Frequency(n) => n.to_string(),
            Cell::Missing => String::new(),
        }));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct JsonTable<'a> {
    order: usize,
    headers: [String; 2],
    rows: &'a [TableRow],
}

fn write_json(table: &CombinedTable, path: &Path) -> io::Result<()> {
    let tables: Vec<JsonTable<'_>> = table
        .tables()
        .iter()
        .map(|t| JsonTable {
            order: t.order,
            headers: t.headers(),
            rows: &t.rows,
        })
        .collect();
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut out, &tables)?;
    out.flush()
}
