use std::fmt::Write as _;

use serde_json::{Map as JsonMap, Value as JsonValue};
use swade_core::core_api::{ParseIssue, Sheet};
use swade_core::{Armor, Character, Power, Trait, Vehicle, Weapon};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    #[default]
    CanonicalV1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextStyle {
    #[default]
    StatBlock,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FieldSelection {
    pub name: bool,
    pub description: bool,
    pub race: bool,
    pub kind: bool,
    pub rank: bool,
    pub gender: bool,
    pub profession: bool,
    pub background: bool,
    pub wild_card: bool,
    pub attributes: bool,
    pub skills: bool,
    pub pace: bool,
    pub parry: bool,
    pub toughness: bool,
    pub size: bool,
    pub weapons: bool,
    pub armor: bool,
    pub edges: bool,
    pub hindrances: bool,
    pub gear: bool,
    pub languages: bool,
    pub special_abilities: bool,
    pub advances: bool,
    pub cybertech: bool,
    pub vehicles: bool,
    pub powers: bool,
    pub arcane: bool,
    pub experience: bool,
    pub bennies: bool,
    pub wealth: bool,
}

impl FieldSelection {
    pub fn is_any_selected(&self) -> bool {
        self.name
            || self.description
            || self.race
            || self.kind
            || self.rank
            || self.gender
            || self.profession
            || self.background
            || self.wild_card
            || self.attributes
            || self.skills
            || self.pace
            || self.parry
            || self.toughness
            || self.size
            || self.weapons
            || self.armor
            || self.edges
            || self.hindrances
            || self.gear
            || self.languages
            || self.special_abilities
            || self.advances
            || self.cybertech
            || self.vehicles
            || self.powers
            || self.arcane
            || self.experience
            || self.bennies
            || self.wealth
    }
}

pub fn render_json_full(sheet: &Sheet, style: JsonStyle) -> JsonValue {
    match style {
        JsonStyle::CanonicalV1 => JsonValue::Object(default_json(sheet)),
    }
}

pub fn render_json_selected(
    sheet: &Sheet,
    fields: &FieldSelection,
    style: JsonStyle,
) -> JsonValue {
    match style {
        JsonStyle::CanonicalV1 => JsonValue::Object(selected_json(fields, &sheet.character)),
    }
}

pub fn render_text(sheet: &Sheet, style: TextStyle) -> String {
    match style {
        TextStyle::StatBlock => render_stat_block(&sheet.character),
    }
}

fn selected_json(fields: &FieldSelection, c: &Character) -> JsonMap<String, JsonValue> {
    let mut out = JsonMap::new();

    if fields.name {
        out.insert("name".to_string(), JsonValue::String(c.name.clone()));
    }
    if fields.wild_card {
        out.insert("isWildCard".to_string(), JsonValue::Bool(c.is_wild_card));
    }
    if fields.description {
        out.insert("description".to_string(), opt_string(&c.description));
    }
    if fields.race {
        out.insert("race".to_string(), opt_string(&c.race));
    }
    if fields.kind {
        out.insert("type".to_string(), opt_string(&c.kind));
    }
    if fields.rank {
        out.insert("rank".to_string(), opt_string(&c.rank));
    }
    if fields.gender {
        out.insert("gender".to_string(), opt_string(&c.gender));
    }
    if fields.profession {
        out.insert("profession".to_string(), opt_string(&c.profession));
    }
    if fields.background {
        out.insert("background".to_string(), opt_string(&c.background));
    }
    if fields.attributes {
        out.insert("attributes".to_string(), traits_to_json(&c.attributes));
    }
    if fields.skills {
        out.insert("skills".to_string(), traits_to_json(&c.skills));
    }
    if fields.pace {
        out.insert("pace".to_string(), opt_number(c.pace));
    }
    if fields.parry {
        out.insert("parry".to_string(), opt_number(c.parry));
    }
    if fields.toughness {
        out.insert("toughness".to_string(), opt_number(c.toughness));
        out.insert("armorValue".to_string(), opt_number(c.armor_value));
    }
    if fields.size {
        out.insert("size".to_string(), opt_number(c.size));
    }
    if fields.weapons {
        out.insert("weapons".to_string(), weapons_to_json(&c.weapons));
    }
    if fields.armor {
        out.insert("armor".to_string(), armor_to_json(&c.armor));
    }
    if fields.edges {
        out.insert("edges".to_string(), strings_to_json(&c.edges));
    }
    if fields.hindrances {
        out.insert("hindrances".to_string(), strings_to_json(&c.hindrances));
    }
    if fields.gear {
        out.insert("gear".to_string(), strings_to_json(&c.gear));
    }
    if fields.languages {
        out.insert("languages".to_string(), strings_to_json(&c.languages));
    }
    if fields.special_abilities {
        out.insert(
            "specialAbilities".to_string(),
            strings_to_json(&c.special_abilities),
        );
    }
    if fields.advances {
        out.insert("advances".to_string(), strings_to_json(&c.advances));
    }
    if fields.cybertech {
        out.insert("cybertech".to_string(), strings_to_json(&c.cybertech));
    }
    if fields.vehicles {
        out.insert("vehicles".to_string(), vehicles_to_json(&c.vehicles));
    }
    if fields.powers {
        out.insert("powers".to_string(), powers_to_json(&c.powers));
    }
    if fields.arcane {
        out.insert(
            "arcaneBackground".to_string(),
            opt_string(&c.arcane_background),
        );
        out.insert("arcaneSkill".to_string(), opt_string(&c.arcane_skill));
        out.insert("powerPoints".to_string(), opt_number(c.power_points));
    }
    if fields.experience {
        out.insert("experience".to_string(), opt_number(c.experience));
    }
    if fields.bennies {
        out.insert("bennies".to_string(), opt_number(c.bennies));
    }
    if fields.wealth {
        out.insert("wealth".to_string(), opt_string(&c.wealth));
    }

    out
}

/// Every key is always present; absent optional values are `null`.
fn default_json(sheet: &Sheet) -> JsonMap<String, JsonValue> {
    let c = &sheet.character;
    let mut out = JsonMap::new();

    out.insert(
        "format".to_string(),
        JsonValue::String(sheet.format.as_str().to_string()),
    );
    out.insert("name".to_string(), JsonValue::String(c.name.clone()));
    out.insert("isWildCard".to_string(), JsonValue::Bool(c.is_wild_card));
    out.insert("description".to_string(), opt_string(&c.description));
    out.insert("race".to_string(), opt_string(&c.race));
    out.insert("type".to_string(), opt_string(&c.kind));
    out.insert("rank".to_string(), opt_string(&c.rank));
    out.insert("gender".to_string(), opt_string(&c.gender));
    out.insert("profession".to_string(), opt_string(&c.profession));
    out.insert("background".to_string(), opt_string(&c.background));

    out.insert("attributes".to_string(), traits_to_json(&c.attributes));
    out.insert("skills".to_string(), traits_to_json(&c.skills));

    out.insert("pace".to_string(), opt_number(c.pace));
    out.insert("parry".to_string(), opt_number(c.parry));
    out.insert("toughness".to_string(), opt_number(c.toughness));
    out.insert("armorValue".to_string(), opt_number(c.armor_value));
    out.insert("size".to_string(), opt_number(c.size));

    out.insert("weapons".to_string(), weapons_to_json(&c.weapons));
    out.insert("armor".to_string(), armor_to_json(&c.armor));
    out.insert("edges".to_string(), strings_to_json(&c.edges));
    out.insert("hindrances".to_string(), strings_to_json(&c.hindrances));
    out.insert("gear".to_string(), strings_to_json(&c.gear));
    out.insert("languages".to_string(), strings_to_json(&c.languages));
    out.insert(
        "specialAbilities".to_string(),
        strings_to_json(&c.special_abilities),
    );
    out.insert("advances".to_string(), strings_to_json(&c.advances));
    out.insert("cybertech".to_string(), strings_to_json(&c.cybertech));
    out.insert("vehicles".to_string(), vehicles_to_json(&c.vehicles));
    out.insert("powers".to_string(), powers_to_json(&c.powers));

    out.insert(
        "arcaneBackground".to_string(),
        opt_string(&c.arcane_background),
    );
    out.insert("arcaneSkill".to_string(), opt_string(&c.arcane_skill));
    out.insert("powerPoints".to_string(), opt_number(c.power_points));
    out.insert("experience".to_string(), opt_number(c.experience));
    out.insert("bennies".to_string(), opt_number(c.bennies));
    out.insert("wealth".to_string(), opt_string(&c.wealth));

    out.insert("issues".to_string(), issues_to_json(&sheet.issues));

    out
}

fn opt_string(value: &Option<String>) -> JsonValue {
    match value {
        Some(v) => JsonValue::String(v.clone()),
        None => JsonValue::Null,
    }
}

fn opt_number<N: Into<JsonValue> + Copy>(value: Option<N>) -> JsonValue {
    match value {
        Some(v) => v.into(),
        None => JsonValue::Null,
    }
}

/// Nested records only carry the fields that are set.
fn insert_some(m: &mut JsonMap<String, JsonValue>, key: &str, value: &Option<String>) {
    if let Some(v) = value {
        m.insert(key.to_string(), JsonValue::String(v.clone()));
    }
}

fn strings_to_json(values: &[String]) -> JsonValue {
    JsonValue::Array(values.iter().cloned().map(JsonValue::String).collect())
}

fn traits_to_json(traits: &[Trait]) -> JsonValue {
    JsonValue::Array(
        traits
            .iter()
            .map(|t| {
                let mut m = JsonMap::new();
                m.insert("name".to_string(), JsonValue::String(t.name.clone()));
                m.insert("die".to_string(), JsonValue::String(t.die.clone()));
                insert_some(&mut m, "info", &t.info);
                JsonValue::Object(m)
            })
            .collect(),
    )
}

fn weapons_to_json(weapons: &[Weapon]) -> JsonValue {
    JsonValue::Array(
        weapons
            .iter()
            .map(|w| {
                let mut m = JsonMap::new();
                m.insert("name".to_string(), JsonValue::String(w.name.clone()));
                insert_some(&mut m, "damage", &w.damage);
                m.insert("range".to_string(), JsonValue::String(w.range.clone()));
                insert_some(&mut m, "reach", &w.reach);
                insert_some(&mut m, "parry", &w.parry);
                insert_some(&mut m, "rof", &w.rof);
                insert_some(&mut m, "ap", &w.ap);
                insert_some(&mut m, "attack", &w.attack);
                insert_some(&mut m, "thrownAttack", &w.thrown_attack);
                insert_some(&mut m, "notes", &w.notes);
                JsonValue::Object(m)
            })
            .collect(),
    )
}

fn armor_to_json(armor: &[Armor]) -> JsonValue {
    JsonValue::Array(
        armor
            .iter()
            .map(|a| {
                let mut m = JsonMap::new();
                m.insert("name".to_string(), JsonValue::String(a.name.clone()));
                m.insert("value".to_string(), JsonValue::from(a.value));
                insert_some(&mut m, "minStr", &a.min_str);
                insert_some(&mut m, "weight", &a.weight);
                insert_some(&mut m, "cost", &a.cost);
                insert_some(&mut m, "notes", &a.notes);
                JsonValue::Object(m)
            })
            .collect(),
    )
}

fn vehicles_to_json(vehicles: &[Vehicle]) -> JsonValue {
    JsonValue::Array(
        vehicles
            .iter()
            .map(|v| {
                let mut m = JsonMap::new();
                m.insert("name".to_string(), JsonValue::String(v.name.clone()));
                insert_some(&mut m, "size", &v.size);
                insert_some(&mut m, "handling", &v.handling);
                insert_some(&mut m, "toughness", &v.toughness);
                insert_some(&mut m, "pace", &v.pace);
                insert_some(&mut m, "runningDie", &v.running_die);
                insert_some(&mut m, "topSpeed", &v.top_speed);
                insert_some(&mut m, "notes", &v.notes);
                if let Some(contains) = &v.contains {
                    m.insert("contains".to_string(), strings_to_json(contains));
                }
                JsonValue::Object(m)
            })
            .collect(),
    )
}

fn powers_to_json(powers: &[Power]) -> JsonValue {
    JsonValue::Array(
        powers
            .iter()
            .map(|p| {
                let mut m = JsonMap::new();
                m.insert("name".to_string(), JsonValue::String(p.name.clone()));
                insert_some(&mut m, "book", &p.book);
                insert_some(&mut m, "page", &p.page);
                insert_some(&mut m, "limitations", &p.limitations);
                insert_some(&mut m, "skillBonus", &p.skill_bonus);
                insert_some(&mut m, "duration", &p.duration);
                insert_some(&mut m, "range", &p.range);
                insert_some(&mut m, "damage", &p.damage);
                insert_some(&mut m, "damagemod", &p.damagemod);
                for (key, value) in &p.extra {
                    m.insert(key.clone(), JsonValue::String(value.clone()));
                }
                JsonValue::Object(m)
            })
            .collect(),
    )
}

fn issues_to_json(issues: &[ParseIssue]) -> JsonValue {
    JsonValue::Array(
        issues
            .iter()
            .map(|issue| JsonValue::String(issue.to_string()))
            .collect(),
    )
}

/// `knowledgeArcana` -> `Knowledge Arcana`.
fn display_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, ch) in key.chars().enumerate() {
        if i == 0 {
            out.push(ch.to_ascii_uppercase());
        } else if ch.is_ascii_uppercase() {
            out.push(' ');
            out.push(ch);
        } else {
            out.push(ch);
        }
    }
    out
}

fn traits_line(traits: &[Trait]) -> String {
    traits
        .iter()
        .filter(|t| t.name != "unskilled")
        .map(|t| match &t.info {
            Some(info) => format!("{} {} ({})", display_key(&t.name), t.die, info),
            None => format!("{} {}", display_key(&t.name), t.die),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn weapon_line(w: &Weapon) -> String {
    let mut parts = Vec::new();
    if let Some(damage) = &w.damage {
        parts.push(damage.clone());
    }
    if w.range != "melee" && !w.range.is_empty() {
        parts.push(format!("Range {}", w.range));
    }
    if let Some(ap) = &w.ap {
        parts.push(format!("AP {ap}"));
    }
    if let Some(rof) = &w.rof {
        parts.push(format!("RoF {rof}"));
    }
    if let Some(parry) = w.parry.as_deref().filter(|p| *p != "0") {
        parts.push(format!("Parry {parry}"));
    }
    if let Some(reach) = w.reach.as_deref().filter(|r| *r != "1") {
        parts.push(format!("Reach {reach}"));
    }
    if parts.is_empty() {
        w.name.clone()
    } else {
        format!("{} ({})", w.name, parts.join(", "))
    }
}

fn write_list(out: &mut String, label: &str, values: &[String]) {
    if !values.is_empty() {
        writeln!(out, "{label}: {}", values.join(", ")).expect("writing to String cannot fail");
    }
}

/// Stat-block layout: name, quick info, traits, derived stats, then lists.
/// Empty sections are left out.
pub fn render_stat_block(c: &Character) -> String {
    let mut out = String::new();

    let title = if c.is_wild_card {
        format!("{} (Wild Card)", c.name)
    } else {
        c.name.clone()
    };
    writeln!(&mut out, "{title}").expect("writing to String cannot fail");

    let quick: Vec<&str> = [&c.race, &c.gender, &c.rank, &c.kind, &c.profession]
        .into_iter()
        .filter_map(|v| v.as_deref())
        .collect();
    if !quick.is_empty() {
        writeln!(&mut out, "{}", quick.join(", ")).expect("writing to String cannot fail");
    }
    if let Some(description) = &c.description {
        writeln!(&mut out, "{description}").expect("writing to String cannot fail");
    }
    writeln!(&mut out).expect("writing to String cannot fail");

    if !c.attributes.is_empty() {
        writeln!(&mut out, "Attributes: {}", traits_line(&c.attributes))
            .expect("writing to String cannot fail");
    }
    let skills = traits_line(&c.skills);
    if !skills.is_empty() {
        writeln!(&mut out, "Skills: {skills}").expect("writing to String cannot fail");
    }

    let mut derived = Vec::new();
    if let Some(pace) = c.pace {
        derived.push(format!("Pace: {pace}"));
    }
    if let Some(parry) = c.parry {
        derived.push(format!("Parry: {parry}"));
    }
    match (c.toughness, c.armor_value) {
        (Some(t), Some(a)) => derived.push(format!("Toughness: {t} ({a})")),
        (Some(t), None) => derived.push(format!("Toughness: {t}")),
        _ => {}
    }
    if let Some(size) = c.size {
        derived.push(format!("Size: {size:+}"));
    }
    if !derived.is_empty() {
        writeln!(&mut out, "{}", derived.join("; ")).expect("writing to String cannot fail");
    }

    write_list(&mut out, "Hindrances", &c.hindrances);
    write_list(&mut out, "Edges", &c.edges);

    if let Some(background) = &c.arcane_background {
        let mut line = format!("Arcane Background: {background}");
        if let Some(skill) = &c.arcane_skill {
            write!(&mut line, " ({})", display_key(skill)).expect("writing to String cannot fail");
        }
        if let Some(points) = c.power_points {
            write!(&mut line, "; Power Points: {points}").expect("writing to String cannot fail");
        }
        writeln!(&mut out, "{line}").expect("writing to String cannot fail");
    }
    let powers: Vec<String> = c.powers.iter().map(|p| p.name.clone()).collect();
    write_list(&mut out, "Powers", &powers);

    let weapons: Vec<String> = c.weapons.iter().map(weapon_line).collect();
    write_list(&mut out, "Weapons", &weapons);
    let armor: Vec<String> = c
        .armor
        .iter()
        .map(|a| format!("{} ({:+})", a.name, a.value))
        .collect();
    write_list(&mut out, "Armor", &armor);
    write_list(&mut out, "Gear", &c.gear);
    write_list(&mut out, "Languages", &c.languages);
    write_list(&mut out, "Cybertech", &c.cybertech);
    let vehicles: Vec<String> = c.vehicles.iter().map(|v| v.name.clone()).collect();
    write_list(&mut out, "Vehicles", &vehicles);

    if !c.special_abilities.is_empty() {
        writeln!(&mut out, "Special Abilities:").expect("writing to String cannot fail");
        for ability in &c.special_abilities {
            writeln!(&mut out, "- {ability}").expect("writing to String cannot fail");
        }
    }
    if !c.advances.is_empty() {
        writeln!(&mut out, "Advances: {}", c.advances.join("; "))
            .expect("writing to String cannot fail");
    }

    let mut tally = Vec::new();
    if let Some(bennies) = c.bennies {
        tally.push(format!("Bennies: {bennies}"));
    }
    if let Some(xp) = c.experience {
        tally.push(format!("Experience: {xp}"));
    }
    if let Some(wealth) = &c.wealth {
        tally.push(format!("Wealth: {wealth}"));
    }
    if !tally.is_empty() {
        writeln!(&mut out, "{}", tally.join("; ")).expect("writing to String cannot fail");
    }

    out
}
