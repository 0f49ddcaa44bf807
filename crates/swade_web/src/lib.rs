use serde::{Deserialize, Serialize};
use swade_core::core_api::{CoreErrorCode, Engine, Sheet, SheetFormat};
use swade_core::{Character, ParserTables};
use swade_render::{TextStyle, render_text};
use wasm_bindgen::prelude::*;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct WebParseOptions {
    /// Replaces the built-in lookup tables; missing fields keep their defaults.
    pub tables: Option<ParserTables>,
    pub stat_block: bool,
}

#[derive(Debug, Clone)]
struct WebError {
    code: &'static str,
    message: String,
}

#[derive(Debug, Clone, Serialize)]
struct WebErrorPayload {
    code: String,
    message: String,
}

impl WebError {
    fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    fn to_js_value(&self) -> JsValue {
        let payload = WebErrorPayload {
            code: self.code.to_string(),
            message: self.message.clone(),
        };
        serde_wasm_bindgen::to_value(&payload).unwrap_or_else(|_| {
            JsValue::from_str(&format!("{}: {}", payload.code, payload.message))
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct WebParseResult {
    character: Character,
    #[serde(skip_serializing_if = "Option::is_none")]
    markup: Option<String>,
    issues: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stat_block: Option<String>,
}

impl WebParseResult {
    fn from_sheet(sheet: Sheet, with_stat_block: bool) -> Self {
        let stat_block = with_stat_block.then(|| render_text(&sheet, TextStyle::StatBlock));
        Self {
            issues: sheet.issues.iter().map(ToString::to_string).collect(),
            character: sheet.character,
            markup: sheet.markup,
            stat_block,
        }
    }
}

/// Parses a saved character page. A page without a recognised sheet container
/// still yields a (mostly empty) character, with the condition listed in `issues`.
#[wasm_bindgen(js_name = parseFromMarkup)]
pub fn parse_from_markup(html: &str, options: JsValue) -> Result<JsValue, JsValue> {
    parse_with(html, SheetFormat::Markup, options)
}

#[wasm_bindgen(js_name = parseFromPlainText)]
pub fn parse_from_plain_text(text: &str, options: JsValue) -> Result<JsValue, JsValue> {
    parse_with(text, SheetFormat::PlainText, options)
}

fn parse_with(input: &str, format: SheetFormat, options: JsValue) -> Result<JsValue, JsValue> {
    let parsed_options = parse_options(options).map_err(|err| err.to_js_value())?;
    let result = parse_impl(input, format, &parsed_options).map_err(|err| err.to_js_value())?;
    serde_wasm_bindgen::to_value(&result).map_err(|err| {
        WebError::new(
            "render_failed",
            format!("failed to convert parse result: {err}"),
        )
        .to_js_value()
    })
}

fn parse_impl(
    input: &str,
    format: SheetFormat,
    options: &WebParseOptions,
) -> Result<WebParseResult, WebError> {
    let engine = match &options.tables {
        Some(tables) => Engine::with_tables(tables.clone()),
        None => Engine::new(),
    };
    let sheet = engine
        .open(input, Some(format))
        .map_err(|err| WebError::new(error_code(err.code), err.message))?;
    Ok(WebParseResult::from_sheet(sheet, options.stat_block))
}

fn error_code(code: CoreErrorCode) -> &'static str {
    match code {
        CoreErrorCode::Io => "io",
        CoreErrorCode::EmptyInput => "empty_input",
        CoreErrorCode::InvalidTables => "invalid_tables",
        CoreErrorCode::UnsupportedFormat => "unsupported_format",
    }
}

fn parse_options(options: JsValue) -> Result<WebParseOptions, WebError> {
    if options.is_null() || options.is_undefined() {
        return Ok(WebParseOptions::default());
    }

    serde_wasm_bindgen::from_value(options).map_err(|err| {
        WebError::new(
            "invalid_options",
            format!("Failed to parse web parse options: {err}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use swade_core::ParserTables;
    use swade_core::core_api::SheetFormat;

    use super::{WebParseOptions, parse_impl};

    #[test]
    fn parse_impl_reads_markup_fixture() {
        let html = fixture_text("tests/fixtures/mika.html");
        let result = parse_impl(&html, SheetFormat::Markup, &WebParseOptions::default())
            .expect("markup fixture should parse");

        assert_eq!(result.character.name, "Mika");
        assert!(result.character.is_wild_card);
        assert!(result.issues.is_empty());
        assert_eq!(result.markup.as_deref(), Some(html.as_str()));
        assert!(result.stat_block.is_none());
    }

    #[test]
    fn parse_impl_reports_missing_container() {
        let result = parse_impl(
            "<html><body><p>404</p></body></html>",
            SheetFormat::Markup,
            &WebParseOptions::default(),
        )
        .expect("missing container is not an error");

        assert_eq!(result.character.name, "");
        assert_eq!(result.issues.len(), 1);
        assert!(result.issues[0].starts_with("no character content found"));
    }

    #[test]
    fn parse_impl_can_render_stat_block() {
        let text = fixture_text("tests/fixtures/mika.txt");
        let options = WebParseOptions {
            stat_block: true,
            ..WebParseOptions::default()
        };
        let result =
            parse_impl(&text, SheetFormat::PlainText, &options).expect("text fixture should parse");

        assert!(result.markup.is_none());
        let block = result.stat_block.expect("stat block requested");
        assert!(block.starts_with("Mika (Wild Card)\n"));
    }

    #[test]
    fn parse_result_serialises_camel_case() {
        let options = WebParseOptions {
            stat_block: true,
            ..WebParseOptions::default()
        };
        let result = parse_impl("Grunt\nPace: 5", SheetFormat::PlainText, &options)
            .expect("text should parse");
        let json = serde_json::to_value(&result).expect("result serialises");

        assert_eq!(json["character"]["name"], "Grunt");
        assert_eq!(json["character"]["pace"], 5);
        assert!(json.get("markup").is_none());
        assert!(json["statBlock"].as_str().is_some_and(|s| s.starts_with("Grunt")));
        assert_eq!(json["issues"].as_array().map(Vec::len), Some(0));
    }

    #[test]
    fn parse_impl_applies_table_override() {
        let tables = ParserTables {
            unskilled_die: "d4-1".to_string(),
            ..ParserTables::default()
        };
        let options = WebParseOptions {
            tables: Some(tables),
            ..WebParseOptions::default()
        };
        let result = parse_impl("Grunt\nSkills: Fighting d6", SheetFormat::PlainText, &options)
            .expect("text should parse");

        let last = result.character.skills.last().expect("skills present");
        assert_eq!(last.name, "unskilled");
        assert_eq!(last.die, "d4-1");
    }

    #[test]
    fn parse_impl_rejects_blank_input() {
        let err = parse_impl("   ", SheetFormat::PlainText, &WebParseOptions::default())
            .expect_err("blank input should fail");
        assert_eq!(err.code, "empty_input");
    }

    fn fixture_text(relative_path: &str) -> String {
        let full_path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../..")
            .join(relative_path);
        fs::read_to_string(full_path).expect("fixture text should be readable")
    }
}
