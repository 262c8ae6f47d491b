use log::debug;

use crate::lexicon::Lexicon;

/// Cleans raw terms before tokenization.
///
/// Each term is trimmed, loses every `\n` and `\t` (without a replacement, so
/// the fragments around them are joined) and has `’` normalized to `'`.
/// Terms that end up empty are dropped.
/// # Example
/// ```
/// use excel_ngrams::remove_escaped_chars;
/// let cleaned = remove_escaped_chars(&["\n", "\t", "without any"]);
/// assert_eq!(cleaned, vec!["without any".to_string()]);
/// ```
pub fn remove_escaped_chars<S: AsRef<str>>(terms: &[S]) -> Vec<String> {
    terms
        .iter()
        .map(|term| {
            term.as_ref()
                .trim()
                .replace(['\n', '\t'], "")
                .replace('’', "'")
        })
        .filter(|term| !term.is_empty())
        .collect()
}

/// Tokenizes every term separately, keeping one token list per non-empty term.
///
/// Tokens are lowercased and trimmed; punctuation is always dropped and
/// stopwords are dropped when `stopwords` is set.
pub fn tokenize_terms<L, S>(lexicon: &L, terms: &[S], stopwords: bool) -> Vec<Vec<String>>
where
    L: Lexicon + ?Sized,
    S: AsRef<str>,
{
    let cleaned = remove_escaped_chars(terms);
    let mut dropped_stopwords = 0usize;
    let per_term: Vec<Vec<String>> = cleaned
        .iter()
        .map(|term| {
            lexicon
                .segment(term)
                .into_iter()
                .map(|piece| piece.to_lowercase().trim().to_string())
                .filter(|word| !word.is_empty() && !lexicon.is_punctuation(word))
                .filter(|word| {
                    let drop = stopwords && lexicon.is_stopword(word);
                    if drop {
                        dropped_stopwords += 1;
                    }
                    !drop
                })
                .collect()
        })
        .collect();
    debug!(
        "Tokenized {} of {} terms into {} tokens ({} stopwords removed)",
        cleaned.len(),
        terms.len(),
        per_term.iter().map(Vec::len).sum::<usize>(),
        dropped_stopwords
    );
    per_term
}

/// Flat token stream across all terms, in input order.
pub fn tokenize<L, S>(lexicon: &L, terms: &[S], stopwords: bool) -> Vec<String>
where
    L: Lexicon + ?Sized,
    S: AsRef<str>,
{
    tokenize_terms(lexicon, terms, stopwords)
        .into_iter()
        .flatten()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::EnglishLexicon;

    #[test]
    fn strips_newlines_and_tabs() {
        let input = [
            "String with \n newline chars \n",
            "\n",
            "string with \t tab \t chars",
            "\t",
            "without any",
        ];
        assert_eq!(
            remove_escaped_chars(&input),
            vec![
                "String with  newline chars",
                "string with  tab  chars",
                "without any",
            ]
        );
    }

    #[test]
    fn joins_fragments_split_by_newline() {
        assert_eq!(remove_escaped_chars(&["snack\nbar"]), vec!["snackbar"]);
    }

    #[test]
    fn normalizes_curly_apostrophe() {
        assert_eq!(remove_escaped_chars(&["it’s"]), vec!["it's"]);
    }

    #[test]
    fn lowercases_and_drops_punctuation() {
        let lexicon = EnglishLexicon::new();
        let tokens = tokenize(&lexicon, &["Best, THING!", "'the' day?"], false);
        assert_eq!(tokens, vec!["best", "thing", "the", "day"]);
    }

    #[test]
    fn removes_stopwords_when_asked() {
        let lexicon = EnglishLexicon::new();
        let terms = ["it's the best thing"];
        assert_eq!(
            tokenize(&lexicon, &terms, true),
            vec!["'s", "best", "thing"]
        );
        assert_eq!(
            tokenize(&lexicon, &terms, false),
            vec!["it", "'s", "the", "best", "thing"]
        );
    }

    #[test]
    fn keeps_term_grouping() {
        let lexicon = EnglishLexicon::new();
        let grouped = tokenize_terms(&lexicon, &["diet snacks", " ", "keto snacks"], true);
        assert_eq!(
            grouped,
            vec![vec!["diet", "snacks"], vec!["keto", "snacks"]]
        );
    }
}
