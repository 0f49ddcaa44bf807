use log::debug;

use super::is_placeholder_entry;
use crate::character::Character;
use crate::segment::Section;
use crate::split::split_top_level;
use crate::tables::{ParserTables, SectionKind};

/// Comma-separated entries, parentheses respected, trailing full stops and
/// `none` placeholders dropped.
pub fn parse_string_list(text: &str) -> Vec<String> {
    split_top_level(text, &[','])
        .into_iter()
        .filter(|entry| !is_placeholder_entry(entry))
        .map(|entry| entry.trim_end_matches('.').trim_end().to_string())
        .collect()
}

/// Edges, Hindrances, Gear, Languages and Cybertech.
pub fn extract_string_list(
    mut character: Character,
    section: &Section,
    _: &ParserTables,
) -> Character {
    let entries = parse_string_list(&section.text());
    debug!("{:?}: {} entr(ies)", section.kind, entries.len());
    let target = match section.kind {
        SectionKind::Edges => &mut character.edges,
        SectionKind::Hindrances => &mut character.hindrances,
        SectionKind::Gear => &mut character.gear,
        SectionKind::Languages => &mut character.languages,
        SectionKind::Cybertech => &mut character.cybertech,
        _ => return character,
    };
    target.extend(entries);
    character
}

/// One advance per line; several on a line are separated by `;`.
pub fn extract_advances(
    mut character: Character,
    section: &Section,
    _: &ParserTables,
) -> Character {
    for line in &section.lines {
        character.advances.extend(
            split_top_level(line, &[';'])
                .into_iter()
                .filter(|entry| !is_placeholder_entry(entry)),
        );
    }
    character
}

/// Description and Background sections: free text, space-joined.
pub fn extract_narrative(
    mut character: Character,
    section: &Section,
    _: &ParserTables,
) -> Character {
    let text = section.text();
    if text.trim().is_empty() {
        return character;
    }
    match section.kind {
        SectionKind::Description => character.description = Some(text),
        SectionKind::Background => character.background = Some(text),
        _ => {}
    }
    character
}
