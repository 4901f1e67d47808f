//! Completion suggestions for the word before the caret.
//!
//! Candidates are the language keywords, mnemonics for the symbolic
//! operators (`ass` for `←`, `neq` for `≠`, ...) and every word already in
//! the source. They are ranked by edit-distance similarity to the word
//! being typed.

use std::cmp::Ordering;

pub const MAX_OPTIONS: usize = 20;

/// `(key, insertion)` pairs offered regardless of the source text.
pub const WORDS: &[(&str, &str)] = &[
    ("PROCEDURE", "PROCEDURE"),
    ("FOR", "FOR"),
    ("EACH", "EACH"),
    ("IN", "IN"),
    ("IF", "IF"),
    ("ELSE", "ELSE"),
    ("RETURN", "RETURN"),
    ("MOD", "MOD"),
    ("NOT", "NOT"),
    ("AND", "AND"),
    ("OR", "OR"),
    ("REPEAT", "REPEAT"),
    ("TIMES", "TIMES"),
    ("UNTIL", "UNTIL"),
    ("ass", "←"),
    ("neq", "≠"),
    ("lteq", "≤"),
    ("qteq", "≥"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    /// What the typed word is matched against.
    pub key: String,
    /// What replaces the typed word when the suggestion is accepted.
    pub display: String,
    pub score: f64,
}

/// Levenshtein distance, counted in characters.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a_len = a.chars().count();
    let b_len = b.chars().count();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut prev_row: Vec<usize> = (0..=b_len).collect();
    let mut curr_row: Vec<usize> = vec![0; b_len + 1];

    for (i, a_char) in a.chars().enumerate() {
        curr_row[0] = i + 1;

        for (j, b_char) in b.chars().enumerate() {
            let cost = usize::from(a_char != b_char);

            curr_row[j + 1] = (prev_row[j + 1] + 1)
                .min(curr_row[j] + 1)
                .min(prev_row[j] + cost);
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b_len]
}

fn normalize(word: &str) -> String {
    word.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Similarity of `candidate` to `query` after lowercasing and dropping
/// everything but ASCII letters and digits.
///
/// An exact match scores 1.5. Otherwise the score is `1 - distance / longer
/// length`, plus 0.5 when the candidate starts with the query.
pub fn score(candidate: &str, query: &str) -> f64 {
    let candidate = normalize(candidate);
    let query = normalize(query);

    if candidate == query {
        return 1.5;
    }
    if candidate.is_empty() || query.is_empty() {
        return 0.0;
    }

    let distance = edit_distance(&candidate, &query) as f64;
    let longest = candidate.len().max(query.len()) as f64;

    let mut similarity = 1.0 - distance / longest;
    if candidate.starts_with(&query) {
        similarity += 0.5;
    }
    similarity
}

/// Ranks `(key, display)` candidates against `query`, best first. Ties keep
/// their input order.
pub fn rank<I>(candidates: I, query: &str) -> Vec<Suggestion>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut ranked: Vec<Suggestion> = candidates
        .into_iter()
        .map(|(key, display)| {
            let score = score(&key, query);
            Suggestion { key, display, score }
        })
        .collect();
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    ranked
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn clamp_caret(source: &str, caret: usize) -> usize {
    let mut caret = caret.min(source.len());
    while !source.is_char_boundary(caret) {
        caret -= 1;
    }
    caret
}

/// Byte offset where the word ending at `caret` starts.
fn word_start(source: &str, caret: usize) -> usize {
    source[..caret]
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_word_char(*c))
        .last()
        .map_or(caret, |(index, _)| index)
}

/// The word immediately before `caret` (a byte offset), lowercased. `None`
/// when the caret does not follow a word character.
pub fn query_at(source: &str, caret: usize) -> Option<String> {
    let caret = clamp_caret(source, caret);
    let start = word_start(source, caret);
    if start == caret {
        None
    } else {
        Some(source[start..caret].to_lowercase())
    }
}

fn source_words(source: &str) -> impl Iterator<Item = &str> {
    source.split(|c: char| !is_word_char(c)).filter(|word| !word.is_empty())
}

/// Ranked suggestions for the word before `caret`, at most `limit` of them.
pub fn suggest(source: &str, caret: usize, limit: usize) -> Vec<Suggestion> {
    let Some(query) = query_at(source, caret) else {
        return Vec::new();
    };

    let mut candidates: Vec<(String, String)> = WORDS
        .iter()
        .map(|(key, display)| (key.to_string(), display.to_string()))
        .collect();

    for word in source_words(source) {
        let known = candidates.iter().any(|(key, _)| key == word);
        if !known && !query.contains(&word.to_lowercase()) {
            candidates.push((word.to_string(), word.to_string()));
        }
    }

    let mut ranked = rank(candidates, &query);
    ranked.truncate(limit);
    tracing::debug!(query = %query, count = ranked.len(), "ranked suggestions");
    ranked
}

/// Replaces the word before `caret` with the suggestion followed by a space.
/// Returns the new text and the caret position after the inserted space.
pub fn apply(source: &str, caret: usize, suggestion: &Suggestion) -> (String, usize) {
    let caret = clamp_caret(source, caret);
    let start = word_start(source, caret);

    let mut text = String::with_capacity(source.len() + suggestion.display.len() + 1);
    text.push_str(&source[..start]);
    text.push_str(&suggestion.display);
    text.push(' ');
    let new_caret = text.len();
    text.push_str(&source[caret..]);
    (text, new_caret)
}
