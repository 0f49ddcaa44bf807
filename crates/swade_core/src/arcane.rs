//! Arcane background name and the skill that governs it.

use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use crate::character::Character;
use crate::extract::traits::trait_key;
use crate::segment::Section;
use crate::split::matching_close;
use crate::tables::ParserTables;

static EDGE_FORM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^arcane\s+background\s*\(\s*([^)]+?)\s*\)").expect("edge pattern is valid")
});

const LABEL: &str = "arcane background";

/// `Arcane Background: Magic`, `(Miracles)`, `Weird Science (Smarts)` -> the
/// bare name. Text in trailing parentheses is not part of the name.
pub fn background_name(text: &str) -> Option<String> {
    let mut rest = text.trim();
    if rest
        .get(..LABEL.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(LABEL))
    {
        rest = &rest[LABEL.len()..];
    }
    let rest = rest.trim_start_matches([':', ' ']).trim_end_matches('.').trim();

    let name = if rest.starts_with('(') {
        match matching_close(rest, 0) {
            Some(close) => &rest[1..close],
            None => &rest[1..],
        }
    } else {
        rest.split('(').next().unwrap_or(rest)
    };
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// Skill key for a background, via the lookup table; `weird science`
/// becomes `weirdScience` so it matches skill keys.
pub fn governing_skill(background: &str, tables: &ParserTables) -> String {
    trait_key(tables.arcane_skill_for(background))
}

fn with_background(mut character: Character, name: String, tables: &ParserTables) -> Character {
    let skill = governing_skill(&name, tables);
    debug!("arcane background '{name}' -> {skill}");
    character.arcane_skill = Some(skill);
    character.arcane_background = Some(name);
    character
}

pub fn extract_arcane_background(
    character: Character,
    section: &Section,
    tables: &ParserTables,
) -> Character {
    match background_name(&section.text()) {
        Some(name) => with_background(character, name, tables),
        None => character,
    }
}

/// No Arcane Background section: take it from an `Arcane Background (Name)` edge.
pub fn arcane_from_edges(character: Character, tables: &ParserTables) -> Character {
    if character.arcane_background.is_some() {
        return character;
    }
    let found = character
        .edges
        .iter()
        .find_map(|edge| EDGE_FORM.captures(edge).map(|caps| caps[1].to_string()));
    match found {
        Some(name) => with_background(character, name, tables),
        None => character,
    }
}
