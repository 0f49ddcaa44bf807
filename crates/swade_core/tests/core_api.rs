use std::fs;
use std::path::PathBuf;

use swade_core::core_api::{CoreErrorCode, Engine, ParseIssue, SheetFormat, detect_format};
use swade_core::{ParserTables, parse_from_markup};

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../tests/fixtures")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to read {:?}: {}", path, e))
}

#[test]
fn engine_detects_markup_and_keeps_it() {
    let engine = Engine::new();
    let html = fixture("mika.html");

    let sheet = engine.open(&html, None).expect("failed to open markup sheet");

    assert_eq!(sheet.format, SheetFormat::Markup);
    assert!(sheet.is_clean());
    assert_eq!(sheet.markup.as_deref(), Some(html.as_str()));
    assert_eq!(sheet.character.name, "Mika");
}

#[test]
fn engine_detects_text() {
    let engine = Engine::new();
    let sheet = engine
        .open(&fixture("mika.txt"), None)
        .expect("failed to open text sheet");

    assert_eq!(sheet.format, SheetFormat::PlainText);
    assert_eq!(sheet.markup, None);
    assert_eq!(sheet.character.rank.as_deref(), Some("Veteran"));
}

#[test]
fn format_hint_overrides_detection() {
    let engine = Engine::new();
    let sheet = engine
        .open("<b>Skills:</b> Fighting d6", Some(SheetFormat::PlainText))
        .expect("failed to open with hint");
    assert_eq!(sheet.format, SheetFormat::PlainText);

    assert_eq!(detect_format("  <div>Mika</div>"), SheetFormat::Markup);
    assert_eq!(detect_format("Mika\nSkills: Fighting d6"), SheetFormat::PlainText);
    assert_eq!("html".parse::<SheetFormat>().ok(), Some(SheetFormat::Markup));
    assert_eq!("txt".parse::<SheetFormat>().ok(), Some(SheetFormat::PlainText));
    let err = "pdf".parse::<SheetFormat>().expect_err("pdf is not a sheet format");
    assert_eq!(err.code, CoreErrorCode::UnsupportedFormat);
}

#[test]
fn blank_input_is_an_error() {
    let engine = Engine::new();
    let err = engine.open("  \n\t", None).expect_err("blank input must fail");
    assert_eq!(err.code, CoreErrorCode::EmptyInput);

    let err = engine
        .open_bytes(b"", Some(SheetFormat::Markup))
        .expect_err("empty bytes must fail");
    assert_eq!(err.code, CoreErrorCode::EmptyInput);
}

#[test]
fn missing_content_root_gives_empty_character() {
    let engine = Engine::new();
    let sheet = engine.parse_markup("<html><body><p>Page not found</p></body></html>");

    assert_eq!(sheet.character, Default::default());
    assert!(matches!(
        sheet.issues.as_slice(),
        [ParseIssue::ContentNotFound { selectors }] if selectors.contains(&"main".to_string())
    ));
    assert!(sheet.markup.is_some());

    let character = parse_from_markup("<p>nothing</p>");
    assert!(character.skills.is_empty());
}

#[test]
fn text_with_no_sections_is_flagged() {
    let sheet = Engine::new().parse_text("Just somebody\nwith a story");
    assert_eq!(sheet.issues, vec![ParseIssue::NoSections]);
    assert_eq!(sheet.character.name, "Just somebody");
    assert_eq!(
        sheet.character.description.as_deref(),
        Some("with a story")
    );
}

#[test]
fn table_overrides_change_resolution() {
    let tables = ParserTables::from_json_str(
        r##"{
            "default_arcane_skill": "sorcery",
            "root_selectors": ["#sheet"],
            "unskilled_die": "d4-1"
        }"##,
    )
    .expect("failed to decode tables");
    assert_eq!(tables.melee_skill, "fighting");

    let engine = Engine::with_tables(tables);
    let sheet = engine.parse_markup(
        r#"<div id="sheet"><h2>Zed</h2><p><b>Arcane Background</b> Hedge Magic</p></div>"#,
    );
    assert!(sheet.is_clean());
    let c = sheet.character;
    assert_eq!(c.name, "Zed");
    assert_eq!(c.arcane_background.as_deref(), Some("Hedge Magic"));
    assert_eq!(c.arcane_skill.as_deref(), Some("sorcery"));
    assert_eq!(c.skills.last().map(|s| s.die.as_str()), Some("d4-1"));
}

#[test]
fn malformed_tables_are_rejected() {
    let err = ParserTables::from_json_str("{ \"ranks\": 5 }").expect_err("ranks must be a list");
    assert_eq!(err.code, CoreErrorCode::InvalidTables);
}

#[test]
fn sheet_serialises_with_issue_kinds() {
    let sheet = Engine::new().parse_markup("<p>nothing</p>");
    let json = serde_json::to_value(&sheet).expect("sheet serialises");
    assert_eq!(json["format"], "markup");
    assert_eq!(json["issues"][0]["kind"], "content_not_found");
}
