//! Word segmentation, punctuation and stopword classification.
//!
//! The tokenizer never reaches for global state: it is handed a [`Lexicon`]
//! and asks it three questions. [`EnglishLexicon`] is the implementation
//! shipped with the crate; it carries the English stopword list in the
//! binary, so building one cannot fail. Extra stopwords can be layered on
//! from a file, and that load reports its own error instead of quietly
//! turning filtering off.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use log::{debug, warn};
use unicode_properties::{GeneralCategoryGroup, UnicodeGeneralCategory};
use unicode_segmentation::UnicodeSegmentation;
use whatlang::Lang;

use crate::error::{NgramError, Result};

const ENGLISH_STOPWORDS: &str = include_str!("../assets/stopwords_en.txt");

/// Suffixes split off the word they attach to, longest-ambiguity first
/// (`n't` must win over a bare `'t`).
const CLITICS: [&str; 7] = ["n't", "'s", "'re", "'ve", "'ll", "'d", "'m"];

/// Language capability the tokenizer depends on.
pub trait Lexicon {
    /// Split `text` into word pieces on word boundaries. Whitespace is not returned.
    fn segment(&self, text: &str) -> Vec<String>;

    /// True when `token` consists of punctuation only.
    fn is_punctuation(&self, token: &str) -> bool {
        !token.is_empty() && token.chars().all(is_punctuation_char)
    }

    /// Case-insensitive stopword membership.
    fn is_stopword(&self, token: &str) -> bool;
}

#[derive(Debug, Clone)]
pub struct EnglishLexicon {
    stopwords: HashSet<String>,
}

impl EnglishLexicon {
    /// Lexicon with the embedded English stopword list.
    pub fn new() -> Self {
        let stopwords: HashSet<String> = parse_stopword_list(ENGLISH_STOPWORDS).collect();
        EnglishLexicon { stopwords }
    }

    /// Process-wide lexicon, built on first use.
    pub fn shared() -> &'static EnglishLexicon {
        static SHARED: OnceLock<EnglishLexicon> = OnceLock::new();
        SHARED.get_or_init(EnglishLexicon::new)
    }

    /// Adds the words of a stopword file (one per line, `#` starts a comment line).
    pub fn with_extra_stopwords<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| NgramError::StopwordsUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        let before = self.stopwords.len();
        self.stopwords.extend(parse_stopword_list(&text));
        debug!(
            "Loaded {} additional stopwords from {}",
            self.stopwords.len() - before,
            path.display()
        );
        Ok(self)
    }

    pub fn stopword_count(&self) -> usize {
        self.stopwords.len()
    }
}

impl Default for EnglishLexicon {
    fn default() -> Self {
        EnglishLexicon::new()
    }
}

impl Lexicon for EnglishLexicon {
    fn segment(&self, text: &str) -> Vec<String> {
        let mut pieces = Vec::new();
        for word in text.split_word_bounds() {
            if word.trim().is_empty() {
                continue;
            }
            match split_clitic(word) {
                (stem, Some(clitic)) => {
                    pieces.push(stem.to_string());
                    pieces.push(clitic.to_string());
                }
                (word, None) => pieces.push(word.to_string()),
            }
        }
        pieces
    }

    fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(&token.to_lowercase())
    }
}

/// Logs a warning when the terms are reliably detected as a language other
/// than English. Returns the detected language in that case.
pub fn warn_if_not_english<S: AsRef<str>>(terms: &[S]) -> Option<Lang> {
    let sample = terms
        .iter()
        .map(|t| t.as_ref())
        .collect::<Vec<&str>>()
        .join(" ");
    let info = whatlang::detect(&sample)?;
    if info.is_reliable() && info.lang() != Lang::Eng {
        warn!(
            "Input looks like {} rather than English; tokenization and stopwords assume English",
            info.lang().eng_name()
        );
        return Some(info.lang());
    }
    None
}

fn parse_stopword_list(text: &str) -> impl Iterator<Item = String> + '_ {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| line.replace('’', "'").to_lowercase())
}

fn split_clitic(word: &str) -> (&str, Option<&str>) {
    for clitic in CLITICS {
        if word.len() <= clitic.len() {
            continue;
        }
        let at = word.len() - clitic.len();
        if let Some(tail) = word.get(at..) {
            if tail.eq_ignore_ascii_case(clitic) {
                return (&word[..at], Some(tail));
            }
        }
    }
    (word, None)
}

/// General category P*. Symbols (S*, e.g. `$`, `+`, `~`) are not punctuation.
fn is_punctuation_char(c: char) -> bool {
    c.general_category_group() == GeneralCategoryGroup::Punctuation
}
