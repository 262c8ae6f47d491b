#![forbid(unsafe_code)]
//! # excel_ngrams
//!
//! Finds the most frequent word n-grams in one column of a spreadsheet
//! (typically a keyword or search-query export) and writes the top results
//! per phrase length side by side.
//!
//! ## Pipeline
//! 1. [`read_column`] pulls the raw terms out of an `.xlsx`, `.csv` or `.tsv` file.
//! 2. [`tokenize`] cleans the terms and splits them into lowercase word tokens,
//!    dropping punctuation and (optionally) English stopwords.
//! 3. [`count_ngrams`] counts every contiguous window of `n` tokens.
//! 4. [`build_table`] turns the ranking into a `"{n}-gram"` / `"{n}-gram frequency"` table.
//! 5. [`ngram_range`] repeats 3-4 for each length and merges the tables.
//! 6. [`write_table`] persists the merged table as CSV, TSV or JSON.
//!
//! ## Example
//! ```
//! use excel_ngrams::{EnglishLexicon, NgramOptions, ngram_range};
//!
//! let terms = ["diet snacks", "keto snacks", "low carb snacks", "low calorie snacks"];
//! let options = NgramOptions { max_n: 2, ..Default::default() };
//! let table = ngram_range(EnglishLexicon::shared(), &terms, &options).unwrap();
//! assert_eq!(table.headers(), ["1-gram", "1-gram frequency", "2-gram", "2-gram frequency"]);
//! assert_eq!(table.tables()[1].rows[0].term, "snacks low");
//! ```

pub mod error;
pub mod export;
pub mod lexicon;
pub mod ngrams;
pub mod pipeline;
pub mod spreadsheet;
pub mod table;
pub mod tokenize;

use std::path::Path;

use log::info;

pub use error::{NgramError, Result};
pub use export::{ExportFormat, csv_safe_cell, destination_path, write_table};
pub use lexicon::{EnglishLexicon, Lexicon, warn_if_not_english};
pub use ngrams::{NgramCount, NgramCounter, count_ngrams, count_ngrams_within};
pub use pipeline::{NgramOptions, get_ngrams, ngram_range};
pub use spreadsheet::{SheetSelector, read_column};
pub use table::{Cell, CombinedTable, ResultTable, TableRow, build_table, combine_tables};
pub use tokenize::{remove_escaped_chars, tokenize, tokenize_terms};

/// Reads `column` from the spreadsheet at `path` and runs [`ngram_range`] over it.
pub fn analyze_file<L, P>(
    lexicon: &L,
    path: P,
    sheet: &SheetSelector,
    column: &str,
    options: &NgramOptions,
) -> Result<CombinedTable>
where
    L: Lexicon + ?Sized,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let terms = read_column(path, sheet, column)?;
    info!("Read {} terms from {}", terms.len(), path.display());
    warn_if_not_english(&terms);
    ngram_range(lexicon, &terms, options)
}
