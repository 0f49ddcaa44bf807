//! Special abilities, with the entries that are really weapons, powers,
//! armor or size moved into their structured fields.

use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use crate::character::{Armor, Character, Weapon};
use crate::dice::{find_armor_piercing, find_damage_expression, substitute_attributes};
use crate::extract::powers::parse_power_list;
use crate::extract::weapons::MELEE;
use crate::segment::{Section, split_ability_entries};
use crate::split::substitute_nested;
use crate::tables::ParserTables;

static LABELLED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^:]+?)\s*:\s*(.*)$").expect("ability pattern is valid"));

static ARMOR_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^armor\s*\+\s*(\d+)").expect("armor label pattern is valid"));

static SIZE_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^size\s*([+-]\s*\d+)").expect("size label pattern is valid"));

/// What to do with one ability entry after reclassification.
enum Outcome {
    Keep,
    Remove,
}

fn natural_weapon(
    label: &str,
    detail: &str,
    character: &Character,
    tables: &ParserTables,
) -> Option<Weapon> {
    if !tables.is_natural_attack(label) {
        return None;
    }
    let damage = find_damage_expression(detail, tables)?;
    Some(Weapon {
        name: label.to_string(),
        damage: Some(substitute_attributes(&damage, character, tables)),
        range: MELEE.to_string(),
        reach: Some("1".to_string()),
        parry: Some("0".to_string()),
        ap: find_armor_piercing(detail),
        attack: Some(
            character
                .skill_die(&tables.melee_skill)
                .unwrap_or(&tables.unskilled_die)
                .to_string(),
        ),
        ..Weapon::default()
    })
}

/// Test one entry against the rules in priority order: natural attack,
/// innate powers, armor, size.
fn reclassify(character: &mut Character, entry: &str, tables: &ParserTables) -> Outcome {
    let Some(caps) = LABELLED.captures(entry) else {
        return Outcome::Keep;
    };
    let label = caps[1].trim();
    let detail = caps[2].trim();

    if let Some(weapon) = natural_weapon(label, detail, character, tables) {
        debug!("special ability '{label}' is a natural weapon");
        character.weapons.push(weapon);
        return Outcome::Remove;
    }

    if label.to_ascii_lowercase().ends_with("powers") {
        let protected = substitute_nested(detail, ',', ';');
        let powers = parse_power_list(&protected, tables);
        debug!("special ability '{label}' holds {} power(s)", powers.len());
        character.powers.extend(powers);
        return Outcome::Remove;
    }

    if let Some(caps) = ARMOR_LABEL.captures(label) {
        let value = caps[1].parse().unwrap_or_default();
        character.armor.push(Armor {
            name: label.to_string(),
            value,
            notes: (!detail.is_empty()).then(|| detail.to_string()),
            ..Armor::default()
        });
        return Outcome::Keep;
    }

    if let Some(caps) = SIZE_LABEL.captures(label) {
        let size: String = caps[1].chars().filter(|c| !c.is_whitespace()).collect();
        if let Ok(size) = size.trim_start_matches('+').parse() {
            character.size = Some(size);
        }
    }
    Outcome::Keep
}

/// Split the section into entries, reclassify each and keep the rest as text.
pub fn extract_special_abilities(
    mut character: Character,
    section: &Section,
    tables: &ParserTables,
) -> Character {
    for entry in split_ability_entries(&section.lines) {
        match reclassify(&mut character, &entry, tables) {
            Outcome::Keep => character.special_abilities.push(entry),
            Outcome::Remove => {}
        }
    }
    character
}
