use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core_api::{CoreError, CoreErrorCode};

/// After a colon-less label: an ability value (`+2:`) or a parenthetical
/// (`Arcane Background (Magic)` wrapped from an edge list).
static NOT_SECTION_CONTENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[+-]?\d+\s*:|\()").expect("section content guard pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionKind {
    Attributes,
    Skills,
    Edges,
    Hindrances,
    Gear,
    SpecialAbilities,
    Advances,
    Background,
    Cybertech,
    Experience,
    Bennies,
    Pace,
    Parry,
    Toughness,
    ArcaneBackground,
    Powers,
    SuperPowers,
    Weapons,
    Languages,
    Wealth,
    PowerPoints,
    Description,
    Vehicles,
    Armor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionHeader {
    pub kind: SectionKind,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamagePower {
    pub name: String,
    pub damage: String,
    pub damagemod: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArcaneSkill {
    pub background: String,
    pub skill: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeAbbreviation {
    pub abbreviation: String,
    pub attribute: String,
}

/// Lookup data shared by every extractor. Built once and passed by reference;
/// nothing in the parser reads global tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserTables {
    /// Checked in order; the first label that matches a line wins.
    pub sections: Vec<SectionHeader>,
    pub damage_powers: Vec<DamagePower>,
    pub arcane_skills: Vec<ArcaneSkill>,
    pub default_arcane_skill: String,
    pub thrown_weapons: Vec<String>,
    pub only_thrown_weapons: Vec<String>,
    pub natural_attacks: Vec<String>,
    pub attribute_abbreviations: Vec<AttributeAbbreviation>,
    pub melee_skill: String,
    /// First key present on the character wins.
    pub thrown_skills: Vec<String>,
    pub ranged_skill: String,
    pub unskilled_die: String,
    pub wild_card_glyphs: Vec<char>,
    pub quick_info_keys: Vec<String>,
    pub ranks: Vec<String>,
    pub root_selectors: Vec<String>,
}

impl Default for ParserTables {
    fn default() -> Self {
        use SectionKind::*;

        let sections = [
            (Attributes, "Attributes"),
            (Skills, "Skills"),
            (Edges, "Edges"),
            (Hindrances, "Hindrances"),
            (Gear, "Gear"),
            (SpecialAbilities, "Special Abilities"),
            (Advances, "Advances"),
            (Background, "Background"),
            (Cybertech, "Cybertech"),
            (Experience, "Experience"),
            (Bennies, "Bennies"),
            (Pace, "Pace"),
            (ArcaneBackground, "Arcane Background"),
            (Powers, "Powers"),
            (SuperPowers, "Super Powers"),
            (Weapons, "Weapons"),
            (Languages, "Languages"),
            (Wealth, "Wealth"),
            (PowerPoints, "Power Points"),
            (Description, "Description"),
            (Vehicles, "Vehicles"),
            (Parry, "Parry"),
            (Toughness, "Toughness"),
            // Last: "Armor" also opens special-ability lines such as "Armor +2: ...".
            (Armor, "Armor"),
        ]
        .into_iter()
        .map(|(kind, label)| SectionHeader {
            kind,
            label: label.to_string(),
        })
        .collect();

        let damage_powers = [
            ("minor bolt", "d6", "d6+d6"),
            ("bolt", "d6+d6", "d6+d6+d6"),
            ("blast", "d6+d6", "d6+d6+d6"),
            ("burst", "d6+d6", "d6+d6+d6"),
            ("damage field", "d4+d4", "d6+d6"),
        ]
        .into_iter()
        .map(|(name, damage, damagemod)| DamagePower {
            name: name.to_string(),
            damage: damage.to_string(),
            damagemod: damagemod.to_string(),
        })
        .collect();

        let arcane_skills = [
            ("bard", "performance"),
            ("cleric", "faith"),
            ("druid", "faith"),
            ("miracles", "faith"),
            ("oracle", "faith"),
            ("alchemist", "alchemy"),
            ("gifted", "focus"),
            ("super powers", "focus"),
            ("psionics", "psionics"),
            ("weird science", "weird science"),
        ]
        .into_iter()
        .map(|(background, skill)| ArcaneSkill {
            background: background.to_string(),
            skill: skill.to_string(),
        })
        .collect();

        let attribute_abbreviations = [
            ("agi", "agility"),
            ("sma", "smarts"),
            ("spi", "spirit"),
            ("str", "strength"),
            ("vig", "vigor"),
        ]
        .into_iter()
        .map(|(abbreviation, attribute)| AttributeAbbreviation {
            abbreviation: abbreviation.to_string(),
            attribute: attribute.to_string(),
        })
        .collect();

        Self {
            sections,
            damage_powers,
            arcane_skills,
            default_arcane_skill: "spellcasting".to_string(),
            thrown_weapons: strings(&[
                "axe, throwing",
                "throwing axe",
                "hand axe",
                "dagger",
                "knife",
                "spear",
                "javelin",
                "trident",
                "sling",
                "net",
                "bolas",
                "shuriken",
                "throwing star",
                "grenade",
                "rock",
            ]),
            only_thrown_weapons: strings(&[
                "sling",
                "net",
                "bolas",
                "shuriken",
                "throwing star",
                "grenade",
                "rock",
            ]),
            natural_attacks: strings(&[
                "bite", "bites", "claw", "claws", "sting", "stinger", "horn", "horns", "tentacle",
                "tentacles", "tail", "slam", "hoof", "hooves", "talon", "talons", "fang", "fangs",
                "gore", "tusk", "tusks", "pincer", "pincers", "beak", "kick", "fist", "fists",
                "spikes", "stomp", "trample", "crush",
            ]),
            attribute_abbreviations,
            melee_skill: "fighting".to_string(),
            thrown_skills: strings(&["athletics", "throwing"]),
            ranged_skill: "shooting".to_string(),
            unskilled_die: "d4-2".to_string(),
            wild_card_glyphs: vec!['\u{2020}', '\u{2021}', '\u{2605}', '\u{2606}', '\u{272A}'],
            quick_info_keys: strings(&["race", "gender", "rank", "type", "profession"]),
            ranks: strings(&["Novice", "Seasoned", "Veteran", "Heroic", "Legendary"]),
            root_selectors: strings(&[
                ".character-sheet",
                "#character-sheet",
                ".print-character",
                "main",
                "article",
            ]),
        }
    }
}

impl ParserTables {
    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        serde_json::from_str(json).map_err(|e| {
            CoreError::new(
                CoreErrorCode::InvalidTables,
                format!("failed to decode parser tables: {e}"),
            )
        })
    }

    /// Match a section header at the start of `line`: the label, compared
    /// case-insensitively, as a whole word with an optional colon after it.
    /// Without the colon, a special-ability label (`Armor +2: ...`) or a
    /// wrapped edge (`Arcane Background (Magic)`) is not a header. Returns the header and the text
    /// after it.
    pub fn match_section<'a>(&self, line: &'a str) -> Option<(&SectionHeader, &'a str)> {
        let line = line.trim_start();
        self.sections.iter().find_map(|header| {
            let n = header.label.len();
            let prefix = line.get(..n)?;
            if !prefix.eq_ignore_ascii_case(&header.label) {
                return None;
            }
            let rest = &line[n..];
            if rest.starts_with(|c: char| c.is_ascii_alphanumeric()) {
                return None;
            }
            let rest = rest.trim_start();
            if let Some(after) = rest.strip_prefix(':') {
                return Some((header, after.trim()));
            }
            if NOT_SECTION_CONTENT.is_match(rest) {
                return None;
            }
            Some((header, rest.trim_end()))
        })
    }

    pub fn is_section_header(&self, line: &str) -> bool {
        self.match_section(line).is_some()
    }

    pub fn is_section_label(&self, text: &str) -> bool {
        let text = text.trim().trim_end_matches(':').trim_end();
        self.sections
            .iter()
            .any(|header| header.label.eq_ignore_ascii_case(text))
    }

    pub fn damage_power(&self, name: &str) -> Option<&DamagePower> {
        let name = name.trim();
        self.damage_powers
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Governing skill for an arcane background name. Exact names match first,
    /// then names that start with a known background ("Super Powers (Heroic)").
    pub fn arcane_skill_for(&self, background: &str) -> &str {
        let lower = background.trim().to_ascii_lowercase();
        self.arcane_skills
            .iter()
            .find(|entry| entry.background == lower)
            .or_else(|| {
                self.arcane_skills
                    .iter()
                    .find(|entry| lower.starts_with(&entry.background))
            })
            .map(|entry| entry.skill.as_str())
            .unwrap_or(&self.default_arcane_skill)
    }

    pub fn is_thrown(&self, weapon_name: &str) -> bool {
        name_matches_any(weapon_name, &self.thrown_weapons)
    }

    pub fn is_only_thrown(&self, weapon_name: &str) -> bool {
        name_matches_any(weapon_name, &self.only_thrown_weapons)
    }

    pub fn is_natural_attack(&self, label: &str) -> bool {
        label
            .split(|c: char| !c.is_ascii_alphabetic())
            .filter(|word| !word.is_empty())
            .any(|word| {
                self.natural_attacks
                    .iter()
                    .any(|attack| attack.eq_ignore_ascii_case(word))
            })
    }

    pub fn attribute_for_abbreviation(&self, word: &str) -> Option<&str> {
        self.attribute_abbreviations
            .iter()
            .find(|a| a.abbreviation.eq_ignore_ascii_case(word))
            .map(|a| a.attribute.as_str())
    }

    pub fn rank_named(&self, word: &str) -> Option<&str> {
        self.ranks
            .iter()
            .find(|rank| rank.eq_ignore_ascii_case(word))
            .map(String::as_str)
    }
}

/// Whole-word containment: "Spear" and "Long Spear" match "spear",
/// "Spearmint" does not.
fn name_matches_any(name: &str, candidates: &[String]) -> bool {
    let lower = format!(" {} ", words_only(name));
    candidates
        .iter()
        .any(|candidate| lower.contains(&format!(" {} ", words_only(candidate))))
}

fn words_only(text: &str) -> String {
    text.to_ascii_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
