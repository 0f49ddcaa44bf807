use std::path::PathBuf;

use serde_json::Value;
use swade_core::core_api::{Engine, Sheet, SheetFormat};
use swade_render::{
    FieldSelection, JsonStyle, TextStyle, render_json_full, render_json_selected, render_text,
};

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn sheet_from_fixture(name: &str) -> Sheet {
    let text = std::fs::read_to_string(workspace_root().join("tests/fixtures").join(name))
        .expect("fixture should be readable");
    Engine::new()
        .open(&text, None)
        .expect("fixture should parse")
}

#[test]
fn full_json_uses_canonical_top_level_order() {
    let sheet = sheet_from_fixture("mika.txt");
    let value = render_json_full(&sheet, JsonStyle::CanonicalV1);
    let keys: Vec<&str> = value
        .as_object()
        .expect("json should be an object")
        .keys()
        .map(String::as_str)
        .collect();

    assert_eq!(
        keys,
        vec![
            "format",
            "name",
            "isWildCard",
            "description",
            "race",
            "type",
            "rank",
            "gender",
            "profession",
            "background",
            "attributes",
            "skills",
            "pace",
            "parry",
            "toughness",
            "armorValue",
            "size",
            "weapons",
            "armor",
            "edges",
            "hindrances",
            "gear",
            "languages",
            "specialAbilities",
            "advances",
            "cybertech",
            "vehicles",
            "powers",
            "arcaneBackground",
            "arcaneSkill",
            "powerPoints",
            "experience",
            "bennies",
            "wealth",
            "issues",
        ]
    );
    assert_eq!(value["format"], "text");
    assert_eq!(value["type"], Value::Null);
    assert_eq!(value["toughness"], 7);
    assert_eq!(value["size"], 1);
}

#[test]
fn selected_json_uses_canonical_subset_order() {
    let sheet = sheet_from_fixture("mika.txt");
    let fields = FieldSelection {
        wealth: true,
        name: true,
        toughness: true,
        arcane: true,
        ..FieldSelection::default()
    };
    assert!(fields.is_any_selected());

    let value = render_json_selected(&sheet, &fields, JsonStyle::CanonicalV1);
    let keys: Vec<&str> = value
        .as_object()
        .expect("json should be an object")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(
        keys,
        vec![
            "name",
            "toughness",
            "armorValue",
            "arcaneBackground",
            "arcaneSkill",
            "powerPoints",
            "wealth",
        ]
    );
    assert_eq!(value["arcaneSkill"], "spellcasting");
    assert_eq!(value["armorValue"], 2);
}

#[test]
fn quick_info_and_cybertech_can_be_selected() {
    let sheet = sheet_from_fixture("mika.txt");
    let fields = FieldSelection {
        cybertech: true,
        background: true,
        gender: true,
        profession: true,
        ..FieldSelection::default()
    };
    assert!(fields.is_any_selected());

    let value = render_json_selected(&sheet, &fields, JsonStyle::CanonicalV1);
    let keys: Vec<&str> = value
        .as_object()
        .expect("json should be an object")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, vec!["gender", "profession", "background", "cybertech"]);
    assert_eq!(value["gender"], "Female");
    assert_eq!(value["profession"], Value::Null);
    assert_eq!(value["cybertech"], Value::Array(Vec::new()));
}

#[test]
fn nested_records_skip_absent_fields() {
    let sheet = sheet_from_fixture("mika.txt");
    let value = render_json_full(&sheet, JsonStyle::CanonicalV1);

    let sword = &value["weapons"][0];
    assert_eq!(sword["name"], "Long Sword");
    assert_eq!(sword["damage"], "d6+d8");
    assert!(sword.get("thrownAttack").is_none());
    assert!(sword.get("ap").is_none());

    let bolt = &value["powers"][0];
    assert_eq!(bolt["damagemod"], "d6+d6+d6");
    assert!(bolt.get("limitations").is_none());
}

#[test]
fn issues_are_rendered_as_messages() {
    let sheet = Engine::new().parse_markup("<p>no sheet</p>");
    assert_eq!(sheet.format, SheetFormat::Markup);
    let value = render_json_full(&sheet, JsonStyle::CanonicalV1);
    let issues = value["issues"].as_array().expect("issues should be an array");
    assert_eq!(issues.len(), 1);
    assert!(
        issues[0]
            .as_str()
            .is_some_and(|s| s.starts_with("no character content found"))
    );
}

#[test]
fn stat_block_layout() {
    let sheet = sheet_from_fixture("mika.txt");
    let text = render_text(&sheet, TextStyle::StatBlock);
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "Mika (Wild Card)");
    assert_eq!(lines[1], "Human, Female, Veteran");
    assert_eq!(lines[3], "");
    assert!(lines.contains(
        &"Attributes: Agility d8, Smarts d6, Spirit d6, Strength d6, Vigor d6"
    ));
    assert!(lines.contains(
        &"Skills: Athletics d6, Fighting d8, Notice d6, Shooting d6, Spellcasting d8, Stealth d6, Knowledge Arcana d4"
    ));
    assert!(lines.contains(&"Pace: 6; Parry: 6; Toughness: 7 (2); Size: +1"));
    assert!(lines.contains(&"Arcane Background: Magic (Spellcasting); Power Points: 15"));
    assert!(lines.contains(
        &"Weapons: Long Sword (d6+d8), Spear (d6+d6, Parry +1), Crossbow (2d6, Range 15/30/60, AP 2, RoF 1), Bite (d6+d4)"
    ));
    assert!(lines.contains(&"Armor: Leather Armor (+2)"));
    assert!(lines.contains(&"- Size +1: Taller than most."));
    assert_eq!(
        lines.last().copied(),
        Some("Bennies: 3; Experience: 40; Wealth: $120")
    );
    assert!(!text.contains("Unskilled"));
}
