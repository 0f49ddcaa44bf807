use log::{debug, trace};

use super::lists::parse_string_list;
use crate::character::{Character, Vehicle};
use crate::segment::Section;
use crate::split::{matching_close, paren_balance, split_top_level};
use crate::tables::ParserTables;

/// Lowercase key prefixes, longest first where they overlap.
const DETAIL_KEYS: &[&str] = &[
    "size",
    "handling",
    "toughness",
    "pace",
    "running die",
    "top speed",
    "notes",
];

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}

fn apply_detail(vehicle: &mut Vehicle, detail: &str) {
    let matched = DETAIL_KEYS.iter().find_map(|key| {
        let rest = strip_prefix_ignore_case(detail, key)?;
        // "Size 6" and "Size: 6", not "Sizeable".
        if rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return None;
        }
        Some((*key, rest.trim_start_matches([':', ' ']).trim().to_string()))
    });

    let Some((key, value)) = matched else {
        append_note(vehicle, detail);
        return;
    };
    let slot = match key {
        "size" => &mut vehicle.size,
        "handling" => &mut vehicle.handling,
        "toughness" => &mut vehicle.toughness,
        "pace" => &mut vehicle.pace,
        "running die" => &mut vehicle.running_die,
        "top speed" => &mut vehicle.top_speed,
        _ => {
            append_note(vehicle, &value);
            return;
        }
    };
    *slot = Some(value);
}

fn append_note(vehicle: &mut Vehicle, note: &str) {
    let note = note.trim();
    if note.is_empty() {
        return;
    }
    match &mut vehicle.notes {
        Some(existing) => {
            existing.push_str("; ");
            existing.push_str(note);
        }
        None => vehicle.notes = Some(note.to_string()),
    }
}

/// `Name (Size 6; Handling +1; Toughness 11 (2); Top Speed 60)`.
/// The name runs to the first `(`.
pub fn parse_vehicle(entry: &str) -> Vehicle {
    let entry = entry.trim().trim_end_matches('.');
    let Some(open) = entry.find('(') else {
        return Vehicle {
            name: entry.to_string(),
            ..Vehicle::default()
        };
    };

    let mut vehicle = Vehicle {
        name: entry[..open].trim().to_string(),
        ..Vehicle::default()
    };
    let inner = match matching_close(entry, open) {
        Some(close) => &entry[open + 1..close],
        None => &entry[open + 1..],
    };
    for detail in split_top_level(inner, &[';']) {
        apply_detail(&mut vehicle, &detail);
    }
    vehicle
}

/// Line state machine: an unclosed `(` keeps collecting lines until the
/// parentheses balance. A `Contains:` line lists the cargo of the vehicle
/// completed just before it.
pub fn parse_vehicle_lines(lines: &[String]) -> Vec<Vehicle> {
    let mut vehicles: Vec<Vehicle> = Vec::new();
    let mut buffer = String::new();

    for line in lines {
        if buffer.is_empty() {
            if let Some(rest) = strip_prefix_ignore_case(line, "contains") {
                let items = parse_string_list(rest.trim_start_matches([':', ' ']));
                match vehicles.last_mut() {
                    Some(last) => last.contains.get_or_insert_with(Vec::new).extend(items),
                    None => trace!("contains line with no vehicle: '{line}'"),
                }
                continue;
            }
        }

        if !buffer.is_empty() {
            buffer.push(' ');
        }
        buffer.push_str(line);
        if paren_balance(&buffer) <= 0 {
            flush(&mut buffer, &mut vehicles);
        }
    }
    flush(&mut buffer, &mut vehicles);
    vehicles
}

fn flush(buffer: &mut String, vehicles: &mut Vec<Vehicle>) {
    for entry in split_top_level(buffer, &[',']) {
        let vehicle = parse_vehicle(&entry);
        if !vehicle.name.is_empty() {
            vehicles.push(vehicle);
        }
    }
    buffer.clear();
}

pub fn extract_vehicles(
    mut character: Character,
    section: &Section,
    _: &ParserTables,
) -> Character {
    let vehicles = parse_vehicle_lines(&section.lines);
    debug!("vehicles: {} parsed", vehicles.len());
    character.vehicles.extend(vehicles);
    character
}
