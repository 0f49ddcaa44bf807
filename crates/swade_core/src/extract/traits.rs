use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use crate::character::{Character, Trait};
use crate::segment::Section;
use crate::split::split_top_level;
use crate::tables::ParserTables;

/// `Name die`, then an optional `(info)`. A bracketed superscript note
/// (`[1]`) may follow the die or the parenthetical.
static TRAIT_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        ^(?P<name>.+?)\s+
        (?P<die>d\d+(?:\s*[+-]\s*\d+)?)\s*
        (?:\[(?P<note>[^\]]*)\]\s*)?
        (?:\((?P<info>.*)\)\s*)?
        (?:\[(?P<tail_note>[^\]]*)\]\s*)?
        \.?$",
    )
    .expect("trait entry pattern is valid")
});

/// Lookup key for a trait name: lowercase first word, later words
/// capitalised, everything non-alphanumeric dropped.
/// `Knowledge (Arcana)` -> `knowledgeArcana`.
pub fn trait_key(name: &str) -> String {
    let mut key = String::new();
    for (i, word) in name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .enumerate()
    {
        let lower = word.to_ascii_lowercase();
        if i == 0 {
            key.push_str(&lower);
            continue;
        }
        let mut chars = lower.chars();
        if let Some(first) = chars.next() {
            key.push(first.to_ascii_uppercase());
            key.push_str(chars.as_str());
        }
    }
    key
}

/// `Fighting d8, Knowledge (Arcana) d6, Shooting d10+1` into keyed traits.
/// Entries without a die are skipped.
pub fn parse_trait_list(text: &str) -> Vec<Trait> {
    split_top_level(text, &[','])
        .iter()
        .filter_map(|entry| parse_trait(entry))
        .collect()
}

fn parse_trait(entry: &str) -> Option<Trait> {
    let caps = TRAIT_ENTRY.captures(entry.trim())?;
    let name = trait_key(&caps["name"]);
    if name.is_empty() {
        return None;
    }
    let die: String = caps["die"].chars().filter(|c| !c.is_whitespace()).collect();
    let notes: Vec<&str> = ["info", "note", "tail_note"]
        .iter()
        .filter_map(|group| caps.name(group))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .collect();
    let info = (!notes.is_empty()).then(|| notes.join("; "));
    Some(Trait { name, die, info })
}

/// Later entries with an existing key replace the earlier one in place.
fn merge_traits(into: &mut Vec<Trait>, parsed: Vec<Trait>) {
    for t in parsed {
        match into.iter_mut().find(|existing| existing.name == t.name) {
            Some(existing) => *existing = t,
            None => into.push(t),
        }
    }
}

pub fn extract_attributes(
    mut character: Character,
    section: &Section,
    _: &ParserTables,
) -> Character {
    let parsed = parse_trait_list(&section.text());
    debug!("attributes: {} parsed", parsed.len());
    merge_traits(&mut character.attributes, parsed);
    character
}

pub fn extract_skills(mut character: Character, section: &Section, _: &ParserTables) -> Character {
    let parsed = parse_trait_list(&section.text());
    debug!("skills: {} parsed", parsed.len());
    merge_traits(&mut character.skills, parsed);
    character
}

#[cfg(test)]
mod tests {
    use super::{parse_trait_list, trait_key};
    use crate::character::Trait;

    #[test]
    fn keys_are_camel_cased() {
        assert_eq!(trait_key("Fighting"), "fighting");
        assert_eq!(trait_key("Knowledge (Arcana)"), "knowledgeArcana");
        assert_eq!(trait_key("Weird Science"), "weirdScience");
        assert_eq!(trait_key("weird science"), "weirdScience");
        assert_eq!(trait_key("Common Knowledge"), "commonKnowledge");
    }

    #[test]
    fn parses_dice_modifiers_and_info() {
        let traits = parse_trait_list(
            "Fighting d8, Shooting d10 + 1, Knowledge (Arcana) d6 (Ancient lore), Notice d4-2.",
        );
        assert_eq!(
            traits,
            vec![
                Trait::new("fighting", "d8"),
                Trait::new("shooting", "d10+1"),
                Trait {
                    name: "knowledgeArcana".to_string(),
                    die: "d6".to_string(),
                    info: Some("Ancient lore".to_string()),
                },
                Trait::new("notice", "d4-2"),
            ]
        );
    }

    #[test]
    fn superscript_notes_become_info() {
        let traits = parse_trait_list("Fighting d8[1], Notice d6 (Alertness) [2], Stealth d4");
        assert_eq!(
            traits,
            vec![
                Trait {
                    name: "fighting".to_string(),
                    die: "d8".to_string(),
                    info: Some("1".to_string()),
                },
                Trait {
                    name: "notice".to_string(),
                    die: "d6".to_string(),
                    info: Some("Alertness; 2".to_string()),
                },
                Trait::new("stealth", "d4"),
            ]
        );
    }

    #[test]
    fn entries_without_a_die_are_skipped() {
        let traits = parse_trait_list("Agility d8, Smarts, Spirit d6");
        let names: Vec<&str> = traits.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["agility", "spirit"]);
    }
}
