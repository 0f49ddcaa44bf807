//! Line sources: the one view of a sheet every extractor reads from.
//!
//! A sheet arrives either as plain text or as a document tree. Both are reduced
//! to an ordered run of [`SheetLine`]s behind the [`LineSource`] trait, so the
//! segmenter and the field extractors never know which pipeline fed them.

use crate::normalize::{collapse_whitespace, fold_to_ascii, join_hyphenated_breaks};
use crate::tables::ParserTables;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetLine {
    pub text: String,
    /// Came from a heading element. Always false for plain text.
    pub heading: bool,
    /// The raw line opened with a wild-card glyph (stripped from `text`).
    pub marked: bool,
}

impl SheetLine {
    /// Build a line from raw input. The wild-card glyph is checked before
    /// ASCII folding, which would otherwise turn it into a placeholder.
    pub fn from_raw(raw: &str, heading: bool, tables: &ParserTables) -> Option<Self> {
        let trimmed = raw.trim();
        let (marked, rest) = match trimmed.chars().next() {
            Some(first) if tables.wild_card_glyphs.contains(&first) => {
                (true, &trimmed[first.len_utf8()..])
            }
            _ => (false, trimmed),
        };

        let text = collapse_whitespace(&fold_to_ascii(rest));
        if text.is_empty() {
            return None;
        }
        Some(Self {
            text,
            heading,
            marked,
        })
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            heading: false,
            marked: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Mark(usize);

pub trait LineSource {
    fn peek(&self) -> Option<&SheetLine>;

    fn next_line(&mut self) -> Option<SheetLine>;

    fn mark(&self) -> Mark;

    fn reset(&mut self, mark: Mark);

    fn is_exhausted(&self) -> bool {
        self.peek().is_none()
    }
}

/// A source over pre-built lines with a cursor. Both pipelines end up here.
#[derive(Debug, Clone, Default)]
pub struct LineCursor {
    lines: Vec<SheetLine>,
    pos: usize,
}

impl LineCursor {
    pub fn new(lines: Vec<SheetLine>) -> Self {
        Self { lines, pos: 0 }
    }

    pub fn starting_at(lines: Vec<SheetLine>, pos: usize) -> Self {
        let pos = pos.min(lines.len());
        Self { lines, pos }
    }

    pub fn lines(&self) -> &[SheetLine] {
        &self.lines
    }

    pub fn position(&self) -> usize {
        self.pos
    }
}

impl LineSource for LineCursor {
    fn peek(&self) -> Option<&SheetLine> {
        self.lines.get(self.pos)
    }

    fn next_line(&mut self) -> Option<SheetLine> {
        let line = self.lines.get(self.pos).cloned()?;
        self.pos += 1;
        Some(line)
    }

    fn mark(&self) -> Mark {
        Mark(self.pos)
    }

    fn reset(&mut self, mark: Mark) {
        self.pos = mark.0.min(self.lines.len());
    }
}

/// Plain-text lines: hyphenation is joined across the whole text, then each
/// non-blank line is trimmed and folded.
#[derive(Debug, Clone)]
pub struct TextLines {
    cursor: LineCursor,
}

impl TextLines {
    pub fn new(text: &str, tables: &ParserTables) -> Self {
        let joined = join_hyphenated_breaks(text);
        let lines = joined
            .lines()
            .filter_map(|raw| SheetLine::from_raw(raw, false, tables))
            .collect();
        Self {
            cursor: LineCursor::new(lines),
        }
    }

    /// Lines that are already clean; nothing is folded or joined.
    pub fn from_clean_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines = lines
            .into_iter()
            .map(Into::into)
            .filter(|line: &String| !line.trim().is_empty())
            .map(|line| SheetLine::plain(line.trim()))
            .collect();
        Self {
            cursor: LineCursor::new(lines),
        }
    }

    pub fn lines(&self) -> &[SheetLine] {
        self.cursor.lines()
    }
}

impl LineSource for TextLines {
    fn peek(&self) -> Option<&SheetLine> {
        self.cursor.peek()
    }

    fn next_line(&mut self) -> Option<SheetLine> {
        self.cursor.next_line()
    }

    fn mark(&self) -> Mark {
        self.cursor.mark()
    }

    fn reset(&mut self, mark: Mark) {
        self.cursor.reset(mark)
    }
}
