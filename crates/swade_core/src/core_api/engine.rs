use log::{debug, warn};

use crate::character::Character;
use crate::markup::MarkupLines;
use crate::pipeline::parse_source;
use crate::source::TextLines;
use crate::tables::ParserTables;

use super::error::{CoreError, CoreErrorCode};
use super::types::{Sheet, SheetFormat};

#[derive(Debug, Default, Clone)]
pub struct Engine {
    tables: ParserTables,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tables(tables: ParserTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &ParserTables {
        &self.tables
    }

    /// HTML pipeline. A page without a recognised root container gives an
    /// empty character and a `ContentNotFound` issue.
    pub fn parse_markup(&self, html: &str) -> Sheet {
        let (character, issues) = match MarkupLines::parse(html, &self.tables) {
            Ok(mut lines) => parse_source(&mut lines, &self.tables),
            Err(issue) => {
                warn!("{issue}");
                (Character::default(), vec![issue])
            }
        };
        Sheet {
            format: SheetFormat::Markup,
            character,
            issues,
            markup: Some(html.to_string()),
        }
    }

    pub fn parse_text(&self, text: &str) -> Sheet {
        let mut lines = TextLines::new(text, &self.tables);
        let (character, issues) = parse_source(&mut lines, &self.tables);
        Sheet {
            format: SheetFormat::PlainText,
            character,
            issues,
            markup: None,
        }
    }

    /// Parse with an explicit format, or detect it from the payload.
    pub fn open(&self, input: &str, hint: Option<SheetFormat>) -> Result<Sheet, CoreError> {
        if input.trim().is_empty() {
            return Err(CoreError::new(
                CoreErrorCode::EmptyInput,
                "input contains no sheet text",
            ));
        }

        let format = hint.unwrap_or_else(|| detect_format(input));
        debug!("parsing sheet as {format}");
        Ok(match format {
            SheetFormat::Markup => self.parse_markup(input),
            SheetFormat::PlainText => self.parse_text(input),
        })
    }

    /// Like [`Engine::open`]; invalid UTF-8 is replaced rather than rejected.
    pub fn open_bytes<B: AsRef<[u8]>>(
        &self,
        bytes: B,
        hint: Option<SheetFormat>,
    ) -> Result<Sheet, CoreError> {
        let text = String::from_utf8_lossy(bytes.as_ref());
        self.open(&text, hint)
    }
}

/// Markup when the payload opens with a tag or contains a document-level one.
pub fn detect_format(input: &str) -> SheetFormat {
    let head = input.trim_start();
    let lower = input.to_ascii_lowercase();
    if head.starts_with('<') || ["<html", "<body", "<div"].iter().any(|tag| lower.contains(tag)) {
        SheetFormat::Markup
    } else {
        SheetFormat::PlainText
    }
}
