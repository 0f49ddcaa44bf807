//! One parse over any [`LineSource`]: preamble, sections, then a fixed-order
//! fold of extractors over the located sections.

use log::debug;

use crate::arcane::{arcane_from_edges, extract_arcane_background};
use crate::character::{Character, Trait};
use crate::core_api::ParseIssue;
use crate::extract::Extractor;
use crate::extract::armor::extract_armor;
use crate::extract::lists::{extract_advances, extract_narrative, extract_string_list};
use crate::extract::powers::extract_powers;
use crate::extract::preamble::read_preamble;
use crate::extract::stats::{
    extract_bennies, extract_combat_stats, extract_experience, extract_power_points,
    extract_wealth,
};
use crate::extract::traits::{extract_attributes, extract_skills};
use crate::extract::vehicles::extract_vehicles;
use crate::extract::weapons::extract_weapons;
use crate::segment::{Section, read_sections};
use crate::source::LineSource;
use crate::special::extract_special_abilities;
use crate::tables::{ParserTables, SectionKind as K};

/// Extractors in application order. Attributes and skills come first because
/// weapon damage and attack dice read them; special abilities come last so
/// promoted weapons and powers follow the listed ones.
const STEPS: &[(&[K], Extractor)] = &[
    (&[K::Attributes], extract_attributes),
    (&[K::Skills], extract_skills),
    (&[K::Pace, K::Parry, K::Toughness], extract_combat_stats),
    (&[K::Experience], extract_experience),
    (&[K::Bennies], extract_bennies),
    (&[K::PowerPoints], extract_power_points),
    (&[K::Wealth], extract_wealth),
    (
        &[K::Edges, K::Hindrances, K::Gear, K::Languages, K::Cybertech],
        extract_string_list,
    ),
    (&[K::Advances], extract_advances),
    (&[K::Description, K::Background], extract_narrative),
    (&[K::ArcaneBackground], extract_arcane_background),
    (&[K::Powers, K::SuperPowers], extract_powers),
    (&[K::Armor], extract_armor),
    (&[K::Weapons], extract_weapons),
    (&[K::Vehicles], extract_vehicles),
    (&[K::SpecialAbilities], extract_special_abilities),
];

fn fold_sections(sections: &[Section], tables: &ParserTables) -> Character {
    STEPS
        .iter()
        .fold(Character::default(), |character, (kinds, extractor)| {
            sections
                .iter()
                .filter(|section| kinds.contains(&section.kind))
                .fold(character, |character, section| {
                    extractor(character, section, tables)
                })
        })
}

/// The `unskilled` skill is always present, once, and last.
fn finalize(mut character: Character, tables: &ParserTables) -> Character {
    character.skills.retain(|skill| skill.name != "unskilled");
    character
        .skills
        .push(Trait::new("unskilled", tables.unskilled_die.clone()));
    arcane_from_edges(character, tables)
}

/// Parse everything left in `source`.
pub fn parse_source<S: LineSource + ?Sized>(
    source: &mut S,
    tables: &ParserTables,
) -> (Character, Vec<ParseIssue>) {
    let mut issues = Vec::new();
    let preamble = read_preamble(source, Character::default(), tables);
    let sections = read_sections(source, tables);
    if sections.is_empty() {
        issues.push(ParseIssue::NoSections);
    }
    debug!("located {} section(s)", sections.len());

    let parsed = fold_sections(&sections, tables);
    let character = Character {
        name: preamble.name,
        description: parsed.description.or(preamble.description),
        race: preamble.race,
        kind: preamble.kind,
        rank: preamble.rank,
        gender: preamble.gender,
        profession: preamble.profession,
        is_wild_card: preamble.is_wild_card,
        experience: parsed.experience.or(preamble.experience),
        ..parsed
    };
    (finalize(character, tables), issues)
}
