//! The lines before the first section: name, then quick info
//! (`Race: Human, Rank: Seasoned`) and free description.

use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use crate::character::Character;
use crate::source::LineSource;
use crate::split::split_top_level;
use crate::tables::ParserTables;

static KEY_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z ]*?)\s*:\s*(.+)$").expect("key-value pattern is valid")
});

static RANK_WITH_XP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([A-Za-z]+)\s*(?:\(\s*(\d+)\s*XP\s*\))?$").expect("rank pattern is valid")
});

static WILD_CARD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bwild\s*card\b").expect("wild card pattern is valid"));

/// If a heading shows up before any section header, skip whatever comes
/// before it (site navigation and the like). Otherwise stay put.
fn skip_to_first_heading<S: LineSource + ?Sized>(source: &mut S, tables: &ParserTables) {
    let start = source.mark();
    while let Some(line) = source.peek() {
        if line.heading {
            return;
        }
        if tables.is_section_header(&line.text) {
            break;
        }
        source.next_line();
    }
    source.reset(start);
}

/// Returns true when `piece` was recognised as quick info.
fn apply_quick_info(character: &mut Character, piece: &str, tables: &ParserTables) -> bool {
    if let Some(caps) = KEY_VALUE.captures(piece) {
        let key = caps[1].trim().to_ascii_lowercase();
        if tables.quick_info_keys.iter().any(|k| *k == key) {
            let value = caps[2].trim().to_string();
            match key.as_str() {
                "race" => character.race = Some(value),
                "gender" => character.gender = Some(value),
                "profession" => character.profession = Some(value),
                "type" => {
                    if WILD_CARD.is_match(&value) {
                        character.is_wild_card = true;
                    }
                    character.kind = Some(value);
                }
                "rank" => apply_rank(character, &value, tables),
                _ => {}
            }
            return true;
        }
    }

    if let Some(caps) = RANK_WITH_XP.captures(piece) {
        if let Some(rank) = tables.rank_named(&caps[1]) {
            character.rank = Some(rank.to_string());
            if let Some(xp) = caps.get(2).and_then(|m| m.as_str().parse().ok()) {
                character.experience = Some(xp);
            }
            return true;
        }
    }

    if WILD_CARD.is_match(piece) && piece.split_whitespace().count() <= 3 {
        character.is_wild_card = true;
        return true;
    }
    false
}

fn apply_rank(character: &mut Character, value: &str, tables: &ParserTables) {
    match RANK_WITH_XP.captures(value) {
        Some(caps) => {
            let rank = tables.rank_named(&caps[1]).unwrap_or(&caps[1]);
            character.rank = Some(rank.to_string());
            if let Some(xp) = caps.get(2).and_then(|m| m.as_str().parse().ok()) {
                character.experience = Some(xp);
            }
        }
        None => character.rank = Some(value.to_string()),
    }
}

/// Consume the name line and the quick-info/description lines after it,
/// stopping at the first section header or heading.
pub fn read_preamble<S: LineSource + ?Sized>(
    source: &mut S,
    mut character: Character,
    tables: &ParserTables,
) -> Character {
    skip_to_first_heading(source, tables);

    match source.peek() {
        Some(line) if !tables.is_section_header(&line.text) => {}
        _ => return character,
    }
    if let Some(name_line) = source.next_line() {
        character.name = name_line.text;
        character.is_wild_card |= name_line.marked;
    }

    let mut description: Vec<String> = Vec::new();
    while let Some(line) = source.peek() {
        if line.heading || tables.is_section_header(&line.text) {
            break;
        }
        let text = line.text.clone();
        let pieces = split_top_level(&text, &[',', ';']);
        let total = pieces.len();
        let leftover: Vec<String> = pieces
            .into_iter()
            .filter(|piece| !apply_quick_info(&mut character, piece, tables))
            .collect();
        if leftover.len() == total {
            description.push(text);
        } else if !leftover.is_empty() {
            description.push(leftover.join(", "));
        }
        source.next_line();
    }

    if !description.is_empty() {
        character.description = Some(description.join("\n"));
    }
    debug!(
        "preamble: name='{}' wild_card={} rank={:?}",
        character.name, character.is_wild_card, character.rank
    );
    character
}

#[cfg(test)]
mod tests {
    use super::read_preamble;
    use crate::character::Character;
    use crate::source::{LineSource, TextLines};
    use crate::tables::ParserTables;

    #[test]
    fn name_rank_and_stop_at_first_section() {
        let tables = ParserTables::default();
        let mut source = TextLines::new(
            "\u{2020} Mika\nRank: Veteran\nAttributes: Agility d8",
            &tables,
        );
        let c = read_preamble(&mut source, Character::default(), &tables);
        assert_eq!(c.name, "Mika");
        assert!(c.is_wild_card);
        assert_eq!(c.rank.as_deref(), Some("Veteran"));
        assert_eq!(
            source.peek().map(|l| l.text.as_str()),
            Some("Attributes: Agility d8")
        );
    }

    #[test]
    fn quick_info_pairs_and_headerless_rank() {
        let tables = ParserTables::default();
        let mut source = TextLines::from_clean_lines([
            "Brother Aldo",
            "Race: Human, Gender: Male, Seasoned (20 XP), Wild Card",
            "A wandering monk of few words.",
            "Skills: Faith d8",
        ]);
        let c = read_preamble(&mut source, Character::default(), &tables);
        assert_eq!(c.name, "Brother Aldo");
        assert_eq!(c.race.as_deref(), Some("Human"));
        assert_eq!(c.gender.as_deref(), Some("Male"));
        assert_eq!(c.rank.as_deref(), Some("Seasoned"));
        assert_eq!(c.experience, Some(20));
        assert!(c.is_wild_card);
        assert_eq!(
            c.description.as_deref(),
            Some("A wandering monk of few words.")
        );
    }

    #[test]
    fn sheet_without_preamble_is_left_alone() {
        let tables = ParserTables::default();
        let mut source = TextLines::from_clean_lines(["Skills: Fighting d6"]);
        let c = read_preamble(&mut source, Character::default(), &tables);
        assert_eq!(c.name, "");
        assert!(!source.is_exhausted());
    }
}
