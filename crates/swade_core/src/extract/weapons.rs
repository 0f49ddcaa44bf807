//! Weapon lists: `Long Sword (Str+d8), Bow (Range 12/24/48, Damage 2d6, AP 1)`.

use std::sync::LazyLock;

use log::{debug, trace};
use regex::Regex;

use super::is_placeholder_entry;
use crate::character::{Character, Weapon};
use crate::dice::{looks_like_damage, substitute_attributes};
use crate::segment::Section;
use crate::split::{name_and_details, split_top_level};
use crate::tables::ParserTables;

pub const MELEE: &str = "melee";

static KEYED_DETAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(range|reach|ap|rof|parry|damage|dmg)\b\s*:?\s*(\S.*)$")
        .expect("weapon detail pattern is valid")
});

static PARRY_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([+-]\s*\d+)\s*parry$").expect("parry suffix pattern is valid")
});

static RANGE_BANDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+/\d+/\d+$").expect("range bands pattern is valid"));

/// Raw detail fields before the category rules run.
#[derive(Debug, Default)]
struct Details {
    damage: Option<String>,
    range: Option<String>,
    reach: Option<String>,
    parry: Option<String>,
    rof: Option<String>,
    ap: Option<String>,
    notes: Vec<String>,
}

impl Details {
    fn has_weapon_evidence(&self) -> bool {
        self.damage.is_some()
            || self.range.is_some()
            || self.reach.is_some()
            || self.parry.is_some()
            || self.rof.is_some()
            || self.ap.is_some()
    }
}

fn parse_details(details: &str, tables: &ParserTables) -> Details {
    let mut out = Details::default();
    for token in split_top_level(details, &[',', ';']) {
        if let Some(caps) = KEYED_DETAIL.captures(&token) {
            let value = caps[2].trim().to_string();
            match caps[1].to_ascii_lowercase().as_str() {
                "range" => out.range = Some(value.to_ascii_lowercase()),
                "reach" => out.reach = Some(value),
                "ap" => out.ap = Some(value),
                "rof" => out.rof = Some(value),
                "parry" => out.parry = Some(value.replace(' ', "")),
                _ => out.damage = Some(value),
            }
        } else if let Some(caps) = PARRY_SUFFIX.captures(&token) {
            out.parry = Some(caps[1].replace(' ', ""));
        } else if RANGE_BANDS.is_match(&token) || token.eq_ignore_ascii_case(MELEE) {
            out.range = Some(token.to_ascii_lowercase());
        } else if out.damage.is_none() && looks_like_damage(&token, tables) {
            out.damage = Some(token);
        } else {
            out.notes.push(token);
        }
    }
    out
}

fn skill_die(character: &Character, key: &str, tables: &ParserTables) -> String {
    character
        .skill_die(key)
        .unwrap_or(&tables.unskilled_die)
        .to_string()
}

fn thrown_skill_die(character: &Character, tables: &ParserTables) -> String {
    tables
        .thrown_skills
        .iter()
        .find_map(|key| character.skill_die(key))
        .unwrap_or(&tables.unskilled_die)
        .to_string()
}

/// Parse one `Name (details)` entry. Returns `None` when nothing in the
/// details marks it as a weapon.
pub fn parse_weapon(entry: &str, character: &Character, tables: &ParserTables) -> Option<Weapon> {
    let (name, details) = name_and_details(entry);
    let details = parse_details(details.as_deref().unwrap_or_default(), tables);
    if name.is_empty() || !details.has_weapon_evidence() {
        trace!("not a weapon: '{entry}'");
        return None;
    }

    let damage = details
        .damage
        .as_deref()
        .map(|d| substitute_attributes(d, character, tables));
    let mut weapon = Weapon {
        name,
        damage,
        range: details.range.unwrap_or_default(),
        reach: details.reach,
        parry: details.parry,
        rof: details.rof,
        ap: details.ap,
        attack: None,
        thrown_attack: None,
        notes: (!details.notes.is_empty()).then(|| details.notes.join(", ")),
    };

    let has_range = !weapon.range.is_empty() && weapon.range != MELEE;
    let usable_in_melee = if tables.is_only_thrown(&weapon.name) {
        weapon.attack = Some(thrown_skill_die(character, tables));
        false
    } else if tables.is_thrown(&weapon.name) {
        weapon.attack = Some(skill_die(character, &tables.melee_skill, tables));
        weapon.thrown_attack = Some(thrown_skill_die(character, tables));
        true
    } else if has_range {
        weapon.attack = Some(skill_die(character, &tables.ranged_skill, tables));
        false
    } else {
        weapon.attack = Some(skill_die(character, &tables.melee_skill, tables));
        true
    };

    if usable_in_melee {
        if weapon.range.is_empty() {
            weapon.range = MELEE.to_string();
        }
        weapon.reach.get_or_insert_with(|| "1".to_string());
        weapon.parry.get_or_insert_with(|| "0".to_string());
    }
    Some(weapon)
}

pub fn parse_weapon_list(text: &str, character: &Character, tables: &ParserTables) -> Vec<Weapon> {
    split_top_level(text, &[','])
        .iter()
        .filter(|entry| !is_placeholder_entry(entry))
        .filter_map(|entry| parse_weapon(entry.trim_end_matches('.'), character, tables))
        .collect()
}

pub fn extract_weapons(
    mut character: Character,
    section: &Section,
    tables: &ParserTables,
) -> Character {
    let weapons = parse_weapon_list(&section.text(), &character, tables);
    debug!("weapons: {} parsed", weapons.len());
    character.weapons.extend(weapons);
    character
}

#[cfg(test)]
mod tests {
    use super::{parse_weapon, parse_weapon_list};
    use crate::character::{Character, Trait, Weapon};
    use crate::tables::ParserTables;

    fn fighter() -> Character {
        Character {
            attributes: vec![Trait::new("strength", "d6")],
            skills: vec![
                Trait::new("fighting", "d8"),
                Trait::new("athletics", "d6"),
                Trait::new("shooting", "d10"),
            ],
            ..Character::default()
        }
    }

    #[test]
    fn long_sword_is_a_melee_weapon() {
        let tables = ParserTables::default();
        let weapon = parse_weapon("Long Sword (Str+d8)", &fighter(), &tables).expect("weapon");
        assert_eq!(
            weapon,
            Weapon {
                name: "Long Sword".to_string(),
                damage: Some("d6+d8".to_string()),
                range: "melee".to_string(),
                reach: Some("1".to_string()),
                parry: Some("0".to_string()),
                attack: Some("d8".to_string()),
                ..Weapon::default()
            }
        );
    }

    #[test]
    fn spear_is_dual_mode() {
        let tables = ParserTables::default();
        let weapon = parse_weapon("Spear (Str+d6, +1 Parry, Reach 1)", &fighter(), &tables)
            .expect("weapon");
        assert_eq!(weapon.range, "melee");
        assert_eq!(weapon.attack.as_deref(), Some("d8"));
        assert_eq!(weapon.thrown_attack.as_deref(), Some("d6"));
        assert_eq!(weapon.parry.as_deref(), Some("+1"));
        assert_eq!(weapon.reach.as_deref(), Some("1"));
    }

    #[test]
    fn ranged_weapon_uses_shooting() {
        let tables = ParserTables::default();
        let weapon = parse_weapon(
            "Bow (Range 12/24/48, Damage: 2d6, AP 1, RoF 1, Shots 20)",
            &fighter(),
            &tables,
        )
        .expect("weapon");
        assert_eq!(weapon.range, "12/24/48");
        assert_eq!(weapon.damage.as_deref(), Some("2d6"));
        assert_eq!(weapon.ap.as_deref(), Some("1"));
        assert_eq!(weapon.rof.as_deref(), Some("1"));
        assert_eq!(weapon.attack.as_deref(), Some("d10"));
        assert_eq!(weapon.reach, None);
        assert_eq!(weapon.parry, None);
        assert_eq!(weapon.notes.as_deref(), Some("Shots 20"));
    }

    #[test]
    fn only_thrown_weapon_uses_thrown_skill() {
        let tables = ParserTables::default();
        let weapon =
            parse_weapon("Sling (4/8/16, Str+d4)", &fighter(), &tables).expect("weapon");
        assert_eq!(weapon.attack.as_deref(), Some("d6"));
        assert_eq!(weapon.thrown_attack, None);
        assert_eq!(weapon.range, "4/8/16");
    }

    #[test]
    fn missing_skill_falls_back_to_unskilled() {
        let tables = ParserTables::default();
        let weapon = parse_weapon("Pistol (Range 12/24/48, 2d6)", &Character::default(), &tables)
            .expect("weapon");
        assert_eq!(weapon.attack.as_deref(), Some("d4-2"));
    }

    #[test]
    fn entries_without_weapon_evidence_are_rejected() {
        let tables = ParserTables::default();
        let weapons = parse_weapon_list(
            "Unarmed, Lucky Charm (heirloom), Dagger (Str+d4, 3/6/12)",
            &fighter(),
            &tables,
        );
        assert_eq!(weapons.len(), 1);
        assert_eq!(weapons[0].name, "Dagger");
        assert_eq!(weapons[0].range, "3/6/12");
        assert_eq!(weapons[0].damage.as_deref(), Some("d6+d4"));
    }

    #[test]
    fn variable_dice_and_abbreviations_resolve() {
        let tables = ParserTables::default();
        let weapon = parse_weapon("Shotgun (Range 12/24/48, [1-3]d6)", &fighter(), &tables)
            .expect("weapon");
        assert_eq!(weapon.damage.as_deref(), Some("3d6"));
    }
}
