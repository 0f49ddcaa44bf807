//! Die notation: parsing, canonical rendering, and attribute substitution.

use std::error::Error;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::character::Character;
use crate::tables::ParserTables;

static DIE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^d\d+(?:[+-]\d+)?$").expect("die code pattern is valid"));

static VARIABLE_COUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\s*\d+\s*-\s*(\d+)\s*\]\s*[dD](\d+)").expect("variable count pattern is valid")
});

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]+").expect("word pattern is valid"));

static DICE_TERM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\[\s*\d+\s*-\s*\d+\s*\]\s*|\d+)?[dD]\d+")
        .expect("dice term pattern is valid")
});

/// A run of dice, abbreviations and flat numbers joined by `+`/`-`.
static EMBEDDED_EXPRESSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        (?:\b[A-Za-z]{3}\b | \b\d*[dD]\d+\b)
        (?:\s*[+-]\s*(?:\b[A-Za-z]{3}\b | \b\d*[dD]\d+\b | \d+\b))*
        ",
    )
    .expect("embedded expression pattern is valid")
});

static ARMOR_PIERCING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bAP\s*:?\s*(\d+)").expect("ap pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DieTerm {
    pub count: u32,
    pub sides: u32,
}

/// Sum of dice terms plus one flat modifier, e.g. `d8+d6+2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DieExpression {
    pub dice: Vec<DieTerm>,
    pub modifier: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DieParseError {
    pub input: String,
}

impl fmt::Display for DieParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not a die expression: '{}'", self.input)
    }
}

impl Error for DieParseError {}

impl FromStr for DieExpression {
    type Err = DieParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || DieParseError {
            input: s.to_string(),
        };
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            return Err(err());
        }

        let mut dice = Vec::new();
        let mut modifier = 0i32;
        for (negative, term) in signed_terms(&compact).ok_or_else(err)? {
            if let Some((count, sides)) = term.split_once(['d', 'D']) {
                if negative {
                    return Err(err());
                }
                let count = if count.is_empty() {
                    1
                } else {
                    count.parse::<u32>().map_err(|_| err())?
                };
                let sides = sides.parse::<u32>().map_err(|_| err())?;
                if count == 0 || sides == 0 {
                    return Err(err());
                }
                dice.push(DieTerm { count, sides });
            } else {
                let value = term.parse::<i32>().map_err(|_| err())?;
                let signed = if negative { value.checked_neg() } else { Some(value) };
                modifier = signed
                    .and_then(|v| modifier.checked_add(v))
                    .ok_or_else(err)?;
            }
        }

        Ok(Self { dice, modifier })
    }
}

impl fmt::Display for DieExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.dice.iter().enumerate() {
            if i > 0 {
                f.write_str("+")?;
            }
            if term.count == 1 {
                write!(f, "d{}", term.sides)?;
            } else {
                write!(f, "{}d{}", term.count, term.sides)?;
            }
        }
        match (self.dice.is_empty(), self.modifier) {
            (true, m) => write!(f, "{m}"),
            (false, 0) => Ok(()),
            (false, m) if m > 0 => write!(f, "+{m}"),
            (false, m) => write!(f, "{m}"),
        }
    }
}

/// Split `d8+d6-2` into `[(false, "d8"), (false, "d6"), (true, "2")]`.
/// `None` on an empty term ("d6++2", trailing sign).
fn signed_terms(compact: &str) -> Option<Vec<(bool, &str)>> {
    let mut out = Vec::new();
    let mut negative = false;
    let mut start = 0;
    for (i, ch) in compact.char_indices() {
        if ch == '+' || ch == '-' {
            if i > start {
                out.push((negative, &compact[start..i]));
            } else if i > 0 {
                return None;
            }
            negative = ch == '-';
            start = i + 1;
        }
    }
    if start >= compact.len() {
        return None;
    }
    out.push((negative, &compact[start..]));
    Some(out)
}

/// `d6`, `d12+1`, `d4-2`.
pub fn is_die_code(text: &str) -> bool {
    DIE_CODE.is_match(text)
}

/// Does a weapon detail token read as damage? Dice first (`2d6`, `[1-3]d6`),
/// or an attribute abbreviation as its first word (`Str+d6`, `Str`).
pub fn looks_like_damage(token: &str, tables: &ParserTables) -> bool {
    let token = token.trim();
    if DICE_TERM.is_match(token) {
        return true;
    }
    let first_word: String = token
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    !first_word.is_empty()
        && tables.attribute_for_abbreviation(&first_word).is_some()
        && token[first_word.len()..]
            .chars()
            .next()
            .is_none_or(|c| !c.is_ascii_alphanumeric())
}

/// `[1-3]d6` -> `3d6`: a bracketed count range becomes its maximum.
pub fn collapse_variable_counts(expr: &str) -> String {
    VARIABLE_COUNT.replace_all(expr, "${1}d${2}").into_owned()
}

/// Replace attribute abbreviations with the character's dice and render the
/// result canonically when it parses: dice in source order, then one summed
/// modifier. `Str+d6` with Str d8 gives `d8+d6`; bare `Str` gives `d8`;
/// `Str+d6+2` with Str d12+1 gives `d12+d6+3`. Unknown attributes leave the
/// abbreviation in place; text that does not parse is returned substituted
/// but otherwise untouched.
pub fn substitute_attributes(expr: &str, character: &Character, tables: &ParserTables) -> String {
    let collapsed = collapse_variable_counts(expr.trim());
    let substituted = WORD.replace_all(&collapsed, |caps: &Captures| {
        let word = &caps[0];
        tables
            .attribute_for_abbreviation(word)
            .and_then(|attribute| character.attribute_die(attribute))
            .map(str::to_string)
            .unwrap_or_else(|| word.to_string())
    });

    match substituted.parse::<DieExpression>() {
        Ok(parsed) => parsed.to_string(),
        Err(_) => substituted.into_owned(),
    }
}

/// First damage expression inside free text ("Bite: Str+d6, AP 2." -> "Str+d6").
/// Three-letter words count only when they are attribute abbreviations.
pub fn find_damage_expression(text: &str, tables: &ParserTables) -> Option<String> {
    EMBEDDED_EXPRESSION
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .find(|candidate| {
            let words: Vec<&str> = WORD
                .find_iter(candidate)
                .map(|w| w.as_str())
                .filter(|w| !is_die_letter(w))
                .collect();
            let has_dice = DICE_TERM.is_match(candidate) || candidate.contains(['d', 'D']);
            words
                .iter()
                .all(|w| tables.attribute_for_abbreviation(w).is_some())
                && (has_dice || !words.is_empty())
        })
        .map(str::to_string)
}

pub fn find_armor_piercing(text: &str) -> Option<String> {
    ARMOR_PIERCING
        .captures(text)
        .map(|caps| caps[1].to_string())
}

fn is_die_letter(word: &str) -> bool {
    word.eq_ignore_ascii_case("d")
}
