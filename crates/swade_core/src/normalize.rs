//! Text clean-up applied to every line before any pattern runs.
//!
//! Downstream patterns assume plain ASCII: column and length heuristics count
//! bytes, so every character outside ASCII is folded or replaced.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

pub const PLACEHOLDER: char = '-';

static HYPHENATED_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\p{L})-[ \t]*\r?\n[ \t]*(\p{Ll})").expect("hyphenation pattern is valid")
});

const PUNCTUATION_FOLDS: &[(char, &str)] = &[
    ('\u{2014}', "-"), // em dash
    ('\u{2013}', "-"), // en dash
    ('\u{2212}', "-"), // minus sign
    ('\u{2018}', "'"),
    ('\u{2019}', "'"),
    ('\u{2032}', "'"), // prime
    ('\u{201C}', "\""),
    ('\u{201D}', "\""),
    ('\u{2033}', "\""), // double prime
    ('\u{00A0}', " "),
    ('\u{2026}', "..."),
];

/// Full clean-up: hyphenation joins, punctuation folding, non-ASCII replacement.
pub fn normalize(text: &str) -> String {
    fold_to_ascii(&join_hyphenated_breaks(text))
}

/// Rejoin a word split across a line break ("Fight-\ning" -> "Fighting").
/// A hyphen followed by an uppercase letter or a digit is left alone.
pub fn join_hyphenated_breaks(text: &str) -> Cow<'_, str> {
    HYPHENATED_BREAK.replace_all(text, "$1$2")
}

pub fn fold_to_ascii(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch.is_ascii() {
            out.push(ch);
            continue;
        }
        match PUNCTUATION_FOLDS.iter().find(|(c, _)| *c == ch) {
            Some((_, folded)) => out.push_str(folded),
            None => out.push(PLACEHOLDER),
        }
    }
    out
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
