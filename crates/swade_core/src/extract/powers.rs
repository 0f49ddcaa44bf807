//! Power lists: `Bolt (SWADE; Range: Smarts x2 p150), Deflection (SWADE p156)`.

use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use super::is_placeholder_entry;
use super::traits::trait_key;
use crate::character::{Character, Power};
use crate::segment::Section;
use crate::split::{name_and_details, split_top_level};
use crate::tables::ParserTables;

static PAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|\s+)p(?:g|age)?\.?\s*(\d+)\s*$").expect("page pattern is valid")
});

static PROPERTY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z ]*?)\s*:\s*(.*)$").expect("property pattern is valid")
});

/// Apply the damage-power table. Table values replace whatever the entry said.
pub fn apply_damage_table(mut power: Power, tables: &ParserTables) -> Power {
    if let Some(entry) = tables.damage_power(&power.name) {
        power.damage = Some(entry.damage.clone());
        power.damagemod = Some(entry.damagemod.clone());
    }
    power
}

fn set_property(power: &mut Power, key: &str, value: String) {
    let slot = match key.to_ascii_lowercase().as_str() {
        "limitation" | "limitations" => &mut power.limitations,
        "skill bonus" | "skillbonus" => &mut power.skill_bonus,
        "duration" => &mut power.duration,
        "range" => &mut power.range,
        "damage" => &mut power.damage,
        "damagemod" | "damage mod" => &mut power.damagemod,
        _ => {
            power.extra.insert(trait_key(key), value);
            return;
        }
    };
    *slot = Some(value);
}

/// One power entry. Inside the parentheses the first part without a
/// `Key:` is the book, a trailing `pN` is the page and the remaining
/// `;`-separated parts are properties.
pub fn parse_power(entry: &str, tables: &ParserTables) -> Power {
    let (name, details) = name_and_details(entry);
    let mut power = Power::named(name);

    if let Some(details) = details {
        let (body, page) = match PAGE.captures(&details) {
            Some(caps) => {
                let start = caps.get(0).map_or(details.len(), |m| m.start());
                (details[..start].to_string(), Some(caps[1].to_string()))
            }
            None => (details.clone(), None),
        };
        power.page = page;

        for part in split_top_level(&body, &[';']) {
            match PROPERTY.captures(&part) {
                Some(caps) => {
                    let value = caps[2].trim().to_string();
                    if !value.is_empty() {
                        set_property(&mut power, &caps[1], value);
                    }
                }
                None if power.book.is_none() => power.book = Some(part),
                None => {
                    let notes = power.extra.entry("notes".to_string()).or_default();
                    if !notes.is_empty() {
                        notes.push_str("; ");
                    }
                    notes.push_str(&part);
                }
            }
        }
    }

    apply_damage_table(power, tables)
}

pub fn parse_power_list(text: &str, tables: &ParserTables) -> Vec<Power> {
    split_top_level(text, &[','])
        .iter()
        .filter(|entry| !is_placeholder_entry(entry))
        .map(|entry| parse_power(entry.trim_end_matches('.'), tables))
        .filter(|power| !power.name.is_empty())
        .collect()
}

/// Powers and Super Powers sections.
pub fn extract_powers(
    mut character: Character,
    section: &Section,
    tables: &ParserTables,
) -> Character {
    let powers = parse_power_list(&section.text(), tables);
    debug!("{:?}: {} power(s)", section.kind, powers.len());
    character.powers.extend(powers);
    character
}
