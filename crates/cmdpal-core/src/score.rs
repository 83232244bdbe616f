#![forbid(unsafe_code)]

//! Match scoring.
//!
//! A filter function maps `(value, search, keywords)` to a relevance score.
//! Scores are compared only against each other and against zero: anything
//! `<= 0.0` hides the item, larger values sort earlier.
//!
//! The default, [`command_score`], is a weighted subsequence matcher tuned
//! for command names. Every character of the search must appear in order in
//! the candidate; the score then rewards contiguous runs and matches that
//! start a word, and decays with every skipped character.
//!
//! | Match step | Multiplier |
//! |------------|------------|
//! | Continues the previous match | 1.0 |
//! | Starts a word after whitespace or `-` | 0.9 |
//! | Starts a word after punctuation (`/ _ . # @ ( ...`) | 0.8 |
//! | Any other jump | 0.17 |
//! | Each skipped word (after the first match) | 0.999 |
//! | Case differs | 0.9999 |
//! | Candidate has unmatched trailing text | 0.99 |
//! | Adjacent transposition (`"hlelo"` for `"hello"`) | 0.1 |
//!
//! Results stay in `0.0..=1.0`; an exact match scores `1.0`.

use std::rc::Rc;

/// Pluggable scoring function: `(value, search, keywords) -> score`.
pub type FilterFn = Rc<dyn Fn(&str, &str, &[String]) -> f64>;

const SCORE_CONTINUE_MATCH: f64 = 1.0;
const SCORE_SPACE_WORD_JUMP: f64 = 0.9;
const SCORE_NON_SPACE_WORD_JUMP: f64 = 0.8;
const SCORE_CHARACTER_JUMP: f64 = 0.17;
const SCORE_TRANSPOSITION: f64 = 0.1;
const PENALTY_SKIPPED: f64 = 0.999;
const PENALTY_CASE_MISMATCH: f64 = 0.9999;
const PENALTY_NOT_COMPLETE: f64 = 0.99;

/// The filter used when the host does not install one.
#[must_use]
pub fn default_filter() -> FilterFn {
    Rc::new(command_score)
}

/// Score `value` (plus its `keywords`) against `search`.
///
/// Returns `0.0` when `search` is not a subsequence of the candidate.
#[must_use]
pub fn command_score(value: &str, search: &str, keywords: &[String]) -> f64 {
    let candidate: Vec<char> = if keywords.is_empty() {
        value.chars().collect()
    } else {
        let mut joined = String::with_capacity(
            value.len() + keywords.iter().map(|k| k.len() + 1).sum::<usize>(),
        );
        joined.push_str(value);
        for keyword in keywords {
            joined.push(' ');
            joined.push_str(keyword);
        }
        joined.chars().collect()
    };
    let search: Vec<char> = search.chars().collect();
    Matcher::new(&candidate, &search).score()
}

fn is_gap(c: char) -> bool {
    matches!(
        c,
        '\\' | '/' | '_' | '+' | '.' | '#' | '"' | '@' | '[' | '(' | '{' | '&'
    )
}

fn is_space(c: char) -> bool {
    c.is_whitespace() || c == '-'
}

/// Lowercase one char without changing the char count, and fold word
/// separators to a plain space.
fn fold(c: char) -> char {
    if is_space(c) {
        return ' ';
    }
    c.to_lowercase().next().unwrap_or(c)
}

struct Matcher<'a> {
    text: &'a [char],
    search: &'a [char],
    folded_text: Vec<char>,
    folded_search: Vec<char>,
    /// Row-major `(text_index, search_index)` memo.
    memo: Vec<Option<f64>>,
}

impl<'a> Matcher<'a> {
    fn new(text: &'a [char], search: &'a [char]) -> Self {
        Self {
            text,
            search,
            folded_text: text.iter().copied().map(fold).collect(),
            folded_search: search.iter().copied().map(fold).collect(),
            memo: vec![None; (text.len() + 1) * (search.len() + 1)],
        }
    }

    fn score(&mut self) -> f64 {
        self.inner(0, 0)
    }

    fn find(&self, needle: char, from: usize) -> Option<usize> {
        self.folded_text
            .get(from..)?
            .iter()
            .position(|&c| c == needle)
            .map(|offset| from + offset)
    }

    fn count_in(&self, from: usize, to: usize, pred: fn(char) -> bool) -> i32 {
        self.text
            .get(from..to)
            .map_or(0, |run| run.iter().filter(|&&c| pred(c)).count() as i32)
    }

    fn inner(&mut self, text_idx: usize, search_idx: usize) -> f64 {
        if search_idx == self.search.len() {
            return if text_idx == self.text.len() {
                SCORE_CONTINUE_MATCH
            } else {
                PENALTY_NOT_COMPLETE
            };
        }

        let key = text_idx * (self.search.len() + 1) + search_idx;
        if let Some(cached) = self.memo[key] {
            return cached;
        }

        let wanted = self.folded_search[search_idx];
        let following = self.folded_search.get(search_idx + 1).copied();
        let mut high_score = 0.0_f64;
        let mut next = self.find(wanted, text_idx);

        while let Some(index) = next {
            let mut score = self.inner(index + 1, search_idx + 1);
            let before = index.checked_sub(1).map(|i| self.text[i]);

            if score > high_score {
                if index == text_idx {
                    score *= SCORE_CONTINUE_MATCH;
                } else if before.is_some_and(is_gap) {
                    score *= SCORE_NON_SPACE_WORD_JUMP;
                    let breaks = self.count_in(text_idx, index - 1, is_gap);
                    if breaks > 0 && text_idx > 0 {
                        score *= PENALTY_SKIPPED.powi(breaks);
                    }
                } else if before.is_some_and(is_space) {
                    score *= SCORE_SPACE_WORD_JUMP;
                    let breaks = self.count_in(text_idx, index - 1, is_space);
                    if breaks > 0 && text_idx > 0 {
                        score *= PENALTY_SKIPPED.powi(breaks);
                    }
                } else {
                    score *= SCORE_CHARACTER_JUMP;
                    if text_idx > 0 {
                        score *= PENALTY_SKIPPED.powi((index - text_idx) as i32);
                    }
                }

                if self.text[index] != self.search[search_idx] {
                    score *= PENALTY_CASE_MISMATCH;
                }
            }

            let folded_before = index.checked_sub(1).map(|i| self.folded_text[i]);
            let swapped_pair = score < SCORE_TRANSPOSITION
                && following.is_some()
                && folded_before == following;
            let doubled_char = following == Some(wanted) && folded_before != Some(wanted);
            if swapped_pair || doubled_char {
                let transposed = self.inner(index + 1, search_idx + 2);
                if transposed * SCORE_TRANSPOSITION > score {
                    score = transposed * SCORE_TRANSPOSITION;
                }
            }

            if score > high_score {
                high_score = score;
            }
            next = self.find(wanted, index + 1);
        }

        self.memo[key] = Some(high_score);
        high_score
    }
}
