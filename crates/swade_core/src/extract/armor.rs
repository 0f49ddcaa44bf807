use std::sync::LazyLock;

use log::{debug, trace};
use regex::Regex;

use super::is_placeholder_entry;
use crate::character::{Armor, Character};
use crate::segment::Section;
use crate::split::{name_and_details, split_top_level};
use crate::tables::ParserTables;

static VALUE_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([+-]?\d+)\s*\((.+)\)$").expect("value-first armor pattern is valid")
});

static VALUE_LAST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)\s+([+-]\d+)$").expect("value-last armor pattern is valid")
});

static BARE_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:armor\s*)?([+-]?\d+)$").expect("armor value pattern is valid")
});

static MIN_STR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^min\.?\s*str(?:ength)?\.?\s*:?\s*(\S+)$").expect("min str pattern is valid")
});

static WEIGHT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:weight|wt\.?)\s*:?\s*(.+)$").expect("weight pattern is valid")
});

static COST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^cost\s*:?\s*(.+)$").expect("cost pattern is valid"));

fn parse_value(text: &str) -> Option<i32> {
    text.trim().trim_start_matches('+').parse().ok()
}

/// `Name (+N, Min Str d6, Weight 10, Cost 100)`, `+N (Name)` or `Name +N`.
/// A missing value reads as 0.
pub fn parse_armor(entry: &str) -> Option<Armor> {
    let entry = entry.trim().trim_end_matches('.');
    if is_placeholder_entry(entry) {
        return None;
    }

    if let Some(caps) = VALUE_FIRST.captures(entry) {
        return Some(Armor {
            name: caps[2].trim().to_string(),
            value: parse_value(&caps[1]).unwrap_or_default(),
            ..Armor::default()
        });
    }

    let (name, details) = name_and_details(entry);
    let Some(details) = details else {
        if let Some(caps) = VALUE_LAST.captures(entry) {
            return Some(Armor {
                name: caps[1].to_string(),
                value: parse_value(&caps[2]).unwrap_or_default(),
                ..Armor::default()
            });
        }
        return Some(Armor {
            name,
            ..Armor::default()
        });
    };

    let mut armor = Armor {
        name,
        ..Armor::default()
    };
    let mut notes = Vec::new();
    for token in split_top_level(&details, &[',', ';']) {
        if let Some(caps) = BARE_VALUE.captures(&token) {
            armor.value = parse_value(&caps[1]).unwrap_or_default();
        } else if let Some(caps) = MIN_STR.captures(&token) {
            armor.min_str = Some(caps[1].to_string());
        } else if let Some(caps) = WEIGHT.captures(&token) {
            armor.weight = Some(caps[1].trim().to_string());
        } else if let Some(caps) = COST.captures(&token) {
            armor.cost = Some(caps[1].trim().to_string());
        } else {
            notes.push(token);
        }
    }
    if !notes.is_empty() {
        armor.notes = Some(notes.join(", "));
    }
    Some(armor)
}

pub fn extract_armor(mut character: Character, section: &Section, _: &ParserTables) -> Character {
    for entry in split_top_level(&section.text(), &[',']) {
        match parse_armor(&entry) {
            Some(armor) => character.armor.push(armor),
            None => trace!("skipped armor entry '{entry}'"),
        }
    }
    debug!("armor: {} piece(s)", character.armor.len());
    character
}
