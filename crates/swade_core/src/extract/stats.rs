use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use crate::character::Character;
use crate::segment::Section;
use crate::tables::ParserTables;

static PACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bpace\s*:?\s*(\d+)").expect("pace pattern is valid"));

static PARRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bparry\s*:?\s*(\d+)").expect("parry pattern is valid"));

static TOUGHNESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\btoughness\s*:?\s*(\d+)(?:\s*\(\s*(\d+)\s*\))?")
        .expect("toughness pattern is valid")
});

static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\D{0,3}?(\d+)").expect("number pattern is valid"));

fn capture_u32(re: &Regex, text: &str, group: usize) -> Option<u32> {
    re.captures(text)?.get(group)?.as_str().parse().ok()
}

fn leading_number(text: &str) -> Option<u32> {
    capture_u32(&LEADING_NUMBER, text.trim(), 1)
}

/// Pace, Parry and Toughness often share a line (`Pace: 6; Parry: 5;
/// Toughness: 7 (2)`), so each of those sections is scanned for all three.
/// `Toughness: 7 (2)` also gives the armor value.
pub fn extract_combat_stats(
    mut character: Character,
    section: &Section,
    _: &ParserTables,
) -> Character {
    let text = section.labelled_text();

    if let Some(pace) = capture_u32(&PACE, &text, 1) {
        character.pace = Some(pace);
    }
    if let Some(parry) = capture_u32(&PARRY, &text, 1) {
        character.parry = Some(parry);
    }
    if let Some(caps) = TOUGHNESS.captures(&text) {
        if let Ok(toughness) = caps[1].parse() {
            character.toughness = Some(toughness);
        }
        if let Some(armor) = caps.get(2).and_then(|m| m.as_str().parse().ok()) {
            character.armor_value = Some(armor);
        }
    }
    debug!(
        "combat stats: pace={:?} parry={:?} toughness={:?} armor={:?}",
        character.pace, character.parry, character.toughness, character.armor_value
    );
    character
}

pub fn extract_experience(
    mut character: Character,
    section: &Section,
    _: &ParserTables,
) -> Character {
    if let Some(xp) = leading_number(&section.text()) {
        character.experience = Some(xp);
    }
    character
}

pub fn extract_bennies(mut character: Character, section: &Section, _: &ParserTables) -> Character {
    if let Some(bennies) = leading_number(&section.text()) {
        character.bennies = Some(bennies);
    }
    character
}

pub fn extract_power_points(
    mut character: Character,
    section: &Section,
    _: &ParserTables,
) -> Character {
    if let Some(points) = leading_number(&section.text()) {
        character.power_points = Some(points);
    }
    character
}

pub fn extract_wealth(mut character: Character, section: &Section, _: &ParserTables) -> Character {
    let text = section.text();
    let text = text.trim().trim_end_matches('.');
    if !text.is_empty() {
        character.wealth = Some(text.to_string());
    }
    character
}
