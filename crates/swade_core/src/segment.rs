use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use crate::source::{LineCursor, LineSource, SheetLine};
use crate::tables::{ParserTables, SectionKind};

/// ASCII bullets need trailing whitespace so a signed continuation
/// (`-2 to Agility rolls.`) keeps its sign.
static BULLET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[-*>]+\s+|[\u{2022}\u{00B7}]+\s*)").expect("bullet pattern is valid")
});

static ABILITY_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][^:.;]{0,40}:").expect("label pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    pub label: String,
    /// Content lines; the first is the text after the header on its own line, if any.
    pub lines: Vec<String>,
}

impl Section {
    pub fn text(&self) -> String {
        self.lines.join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Header and content as one line ("Pace: 6 Parry: 6").
    pub fn labelled_text(&self) -> String {
        if self.lines.is_empty() {
            format!("{}:", self.label)
        } else {
            format!("{}: {}", self.label, self.text())
        }
    }
}

/// Read the section whose header is the next line of `source`.
///
/// Content runs until the line after it would itself be a header or a
/// heading. Returns `None`, consuming nothing, when the next line is not a
/// header.
pub fn read_section<S: LineSource + ?Sized>(
    source: &mut S,
    tables: &ParserTables,
) -> Option<Section> {
    let (kind, label, rest) = {
        let line = source.peek()?;
        let (header, rest) = tables.match_section(&line.text)?;
        (header.kind, header.label.clone(), rest.to_string())
    };
    source.next_line();

    let mut lines = Vec::new();
    if !rest.is_empty() {
        lines.push(rest);
    }
    while let Some(next) = source.peek() {
        if next.heading || tables.is_section_header(&next.text) {
            break;
        }
        lines.push(next.text.clone());
        source.next_line();
    }

    debug!("section {kind:?}: {} line(s)", lines.len());
    Some(Section { kind, label, lines })
}

/// Read every section left in `source`. Lines that belong to no section
/// (stray headings, text before the first header) are skipped.
pub fn read_sections<S: LineSource + ?Sized>(
    source: &mut S,
    tables: &ParserTables,
) -> Vec<Section> {
    let mut sections = Vec::new();
    while !source.is_exhausted() {
        match read_section(source, tables) {
            Some(section) => sections.push(section),
            None => {
                source.next_line();
            }
        }
    }
    sections
}

/// Index-based form over clean lines: joined content of the section starting
/// at `start`, and the index to resume scanning from.
pub fn extract_section(
    lines: &[String],
    start: usize,
    tables: &ParserTables,
) -> Option<(String, usize)> {
    let lines = lines.iter().map(|l| SheetLine::plain(l.as_str())).collect();
    let mut cursor = LineCursor::starting_at(lines, start);
    let section = read_section(&mut cursor, tables)?;
    Some((section.text(), cursor.position()))
}

/// Special-ability entries: a line that opens with a bullet or with a
/// capitalised `Label:` starts a new entry, anything else continues the
/// previous one. Bullets are stripped.
pub fn split_ability_entries(lines: &[String]) -> Vec<String> {
    let mut entries: Vec<String> = Vec::new();
    for line in lines {
        let bulleted = BULLET.is_match(line);
        let stripped = BULLET.replace(line, "");
        let stripped = stripped.trim();
        if stripped.is_empty() {
            continue;
        }

        let starts_entry = bulleted || ABILITY_LABEL.is_match(stripped);
        match entries.last_mut() {
            Some(previous) if !starts_entry => {
                previous.push(' ');
                previous.push_str(stripped);
            }
            _ => entries.push(stripped.to_string()),
        }
    }
    entries
}
