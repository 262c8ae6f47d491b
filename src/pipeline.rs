use log::info;

use crate::error::{NgramError, Result};
use crate::lexicon::Lexicon;
use crate::ngrams::{NgramCount, count_ngrams, count_ngrams_within};
use crate::table::{CombinedTable, build_table, combine_tables};
use crate::tokenize::{tokenize, tokenize_terms};

/// Settings for an n-gram range extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NgramOptions {
    /// Shortest phrase length (default 1).
    pub min_n: usize,
    /// Longest phrase length (default 5).
    pub max_n: usize,
    /// Rows kept per order (default 250).
    pub top_n: usize,
    /// Drop stopwords before counting (default true).
    pub stopwords: bool,
    /// Only form n-grams inside a single term (default false: terms are one stream).
    pub within_terms: bool,
}

impl Default for NgramOptions {
    fn default() -> Self {
        NgramOptions {
            min_n: 1,
            max_n: 5,
            top_n: 250,
            stopwords: true,
            within_terms: false,
        }
    }
}

impl NgramOptions {
    pub fn validate(&self) -> Result<()> {
        if self.min_n == 0 {
            return Err(NgramError::InvalidOptions(
                "minimum n-gram length must be at least 1".to_string(),
            ));
        }
        if self.max_n < self.min_n {
            return Err(NgramError::InvalidOptions(format!(
                "maximum n-gram length ({}) is smaller than the minimum ({})",
                self.max_n, self.min_n
            )));
        }
        if self.top_n == 0 {
            return Err(NgramError::InvalidOptions(
                "number of results must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Most frequent `n`-grams across all terms, with terms treated as one token stream.
pub fn get_ngrams<L, S>(
    lexicon: &L,
    terms: &[S],
    n: usize,
    top_n: usize,
    stopwords: bool,
) -> Vec<NgramCount>
where
    L: Lexicon + ?Sized,
    S: AsRef<str>,
{
    let tokens = tokenize(lexicon, terms, stopwords);
    count_ngrams(&tokens, n, top_n)
}

/// Extracts every order from `min_n` to `max_n` and merges the per-order tables.
///
/// Terms are tokenized once. If any order has no n-grams at all the whole run
/// fails with [`NgramError::EmptyResults`]; there is no partial result.
pub fn ngram_range<L, S>(lexicon: &L, terms: &[S], options: &NgramOptions) -> Result<CombinedTable>
where
    L: Lexicon + ?Sized,
    S: AsRef<str>,
{
    options.validate()?;

    let per_term = tokenize_terms(lexicon, terms, options.stopwords);
    let flat: Vec<String> = if options.within_terms {
        Vec::new()
    } else {
        per_term.concat()
    };

    let mut tables = Vec::new();
    for order in options.min_n..=options.max_n {
        let ranked = if options.within_terms {
            count_ngrams_within(&per_term, order, options.top_n)
        } else {
            count_ngrams(&flat, order, options.top_n)
        };
        let table = build_table(order, &ranked)?;
        info!("{}-grams: kept {} rows", order, table.len());
        tables.push(table);
    }

    if tables.len() == 1 {
        return Ok(CombinedTable::from(tables.remove(0)));
    }
    Ok(combine_tables(tables))
}
