use std::collections::HashMap;

use log::debug;
use serde::Serialize;

/// One n-gram and the number of times it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NgramCount {
    pub ngram: Vec<String>,
    pub count: u32,
}

impl NgramCount {
    /// Tokens joined by a single space.
    pub fn term(&self) -> String {
        self.ngram.join(" ")
    }

    pub fn order(&self) -> usize {
        self.ngram.len()
    }
}

/// Accumulates counts of `n`-token windows over one or more token sequences.
///
/// Windows never span two sequences passed to [`NgramCounter::add_sequence`].
/// Entries keep the order in which each distinct window was first seen, which
/// is what ranking falls back on for equal counts.
#[derive(Debug)]
pub struct NgramCounter<'a> {
    n: usize,
    index: HashMap<&'a [String], usize>,
    entries: Vec<(&'a [String], u32)>,
}

impl<'a> NgramCounter<'a> {
    pub fn new(n: usize) -> Self {
        NgramCounter {
            n,
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    pub fn add_sequence(&mut self, tokens: &'a [String]) {
        if self.n == 0 || tokens.len() < self.n {
            return;
        }
        for window in tokens.windows(self.n) {
            match self.index.get(window) {
                Some(&i) => self.entries[i].1 += 1,
                None => {
                    self.index.insert(window, self.entries.len());
                    self.entries.push((window, 1));
                }
            }
        }
    }

    /// Number of distinct windows seen so far.
    pub fn distinct(&self) -> usize {
        self.entries.len()
    }

    /// The `limit` most frequent windows, highest count first, ties by first occurrence.
    pub fn into_ranked(mut self, limit: usize) -> Vec<NgramCount> {
        // stable sort: equal counts stay in first-seen order
        self.entries.sort_by(|a, b| b.1.cmp(&a.1));
        self.entries
            .into_iter()
            .take(limit)
            .map(|(window, count)| NgramCount {
                ngram: window.to_vec(),
                count,
            })
            .collect()
    }
}

/// Counts every contiguous window of `n` tokens and returns the `limit` most frequent.
/// # Example
/// ```
/// use excel_ngrams::count_ngrams;
/// let tokens: Vec<String> = "low carb snacks low carb bars"
///     .split(' ')
///     .map(String::from)
///     .collect();
/// let top = count_ngrams(&tokens, 2, 1);
/// assert_eq!(top[0].term(), "low carb");
/// assert_eq!(top[0].count, 2);
/// ```
pub fn count_ngrams(tokens: &[String], n: usize, limit: usize) -> Vec<NgramCount> {
    let mut counter = NgramCounter::new(n);
    counter.add_sequence(tokens);
    debug!("{} distinct {}-grams", counter.distinct(), n);
    counter.into_ranked(limit)
}

/// Like [`count_ngrams`], but windows are formed inside each sequence only.
pub fn count_ngrams_within(sequences: &[Vec<String>], n: usize, limit: usize) -> Vec<NgramCount> {
    let mut counter = NgramCounter::new(n);
    for tokens in sequences {
        counter.add_sequence(tokens);
    }
    debug!("{} distinct {}-grams within terms", counter.distinct(), n);
    counter.into_ranked(limit)
}
