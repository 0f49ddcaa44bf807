//! Document-tree line source.
//!
//! The sheet's root container is flattened into the same [`SheetLine`]s the
//! text pipeline produces. Block elements and `<br>` end a line, bold labels
//! start one, headings become heading lines and superscripts are kept in
//! brackets so inline annotations survive.

use log::warn;
use scraper::{ElementRef, Html, Node, Selector};

use crate::core_api::ParseIssue;
use crate::normalize::join_hyphenated_breaks;
use crate::source::{LineCursor, LineSource, Mark, SheetLine};
use crate::tables::ParserTables;

const BLOCK_TAGS: &[&str] = &[
    "p",
    "div",
    "li",
    "ul",
    "ol",
    "table",
    "tr",
    "section",
    "article",
    "header",
    "footer",
    "dl",
    "dd",
    "dt",
    "blockquote",
];

const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template"];

fn is_heading(tag: &str) -> bool {
    matches!(tag, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

/// Accumulates text into lines while walking the tree.
struct Flattener<'t> {
    tables: &'t ParserTables,
    lines: Vec<SheetLine>,
    current: String,
}

impl<'t> Flattener<'t> {
    fn new(tables: &'t ParserTables) -> Self {
        Self {
            tables,
            lines: Vec::new(),
            current: String::new(),
        }
    }

    fn push_text(&mut self, text: &str) {
        self.current.push_str(text);
    }

    fn break_line(&mut self) {
        self.finish_line(false);
    }

    fn finish_line(&mut self, heading: bool) {
        let raw = std::mem::take(&mut self.current);
        let joined = join_hyphenated_breaks(&raw);
        if let Some(line) = SheetLine::from_raw(&joined.replace('\n', " "), heading, self.tables) {
            self.lines.push(line);
        }
    }

    fn walk(&mut self, element: ElementRef<'_>) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => self.push_text(text),
                Node::Element(_) => {
                    if let Some(child) = ElementRef::wrap(child) {
                        self.element(child);
                    }
                }
                _ => {}
            }
        }
    }

    fn element(&mut self, element: ElementRef<'_>) {
        let tag = element.value().name();
        match tag {
            _ if SKIPPED_TAGS.contains(&tag) => {}
            "br" => self.break_line(),
            "sup" => {
                self.push_text("[");
                self.walk(element);
                self.push_text("]");
            }
            "strong" | "b" => {
                self.break_line();
                let label: String = element.text().collect();
                self.walk(element);
                if self.tables.is_section_label(&label) && !label.trim_end().ends_with(':') {
                    self.push_text(":");
                }
                self.push_text(" ");
            }
            "td" | "th" => {
                self.walk(element);
                self.push_text(" ");
            }
            _ if is_heading(tag) => {
                self.break_line();
                self.walk(element);
                self.finish_line(true);
            }
            _ if BLOCK_TAGS.contains(&tag) => {
                self.break_line();
                self.walk(element);
                self.break_line();
            }
            _ => self.walk(element),
        }
    }

    fn finish(mut self) -> Vec<SheetLine> {
        self.break_line();
        self.lines
    }
}

/// Lines of the first root container matched by the table's selectors.
#[derive(Debug, Clone)]
pub struct MarkupLines {
    cursor: LineCursor,
}

impl MarkupLines {
    pub fn parse(html: &str, tables: &ParserTables) -> Result<Self, ParseIssue> {
        let document = Html::parse_document(html);
        let root = tables.root_selectors.iter().find_map(|raw| {
            let selector = match Selector::parse(raw) {
                Ok(selector) => selector,
                Err(e) => {
                    warn!("ignoring invalid root selector '{raw}': {e:?}");
                    return None;
                }
            };
            document.select(&selector).next()
        });

        let Some(root) = root else {
            return Err(ParseIssue::ContentNotFound {
                selectors: tables.root_selectors.clone(),
            });
        };

        let mut flattener = Flattener::new(tables);
        flattener.element(root);
        Ok(Self {
            cursor: LineCursor::new(flattener.finish()),
        })
    }

    pub fn lines(&self) -> &[SheetLine] {
        self.cursor.lines()
    }
}

impl LineSource for MarkupLines {
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
        self.cursor.reset(mark);
    }
}

#[cfg(test)]
mod tests {
    use super::MarkupLines;
    use crate::core_api::ParseIssue;
    use crate::tables::ParserTables;

    fn texts(lines: &MarkupLines) -> Vec<(&str, bool)> {
        lines
            .lines()
            .iter()
            .map(|l| (l.text.as_str(), l.heading))
            .collect()
    }

    #[test]
    fn flattens_headings_labels_and_breaks() {
        let tables = ParserTables::default();
        let html = r#"<html><body><nav>Home</nav>
            <div class="character-sheet">
              <h1>Mika</h1>
              <div>Rank: Veteran</div>
              <p><strong>Attributes</strong> Agility d8, Smarts d6<br>
                 <b>Pace:</b> 6 <b>Parry:</b> 6</p>
            </div></body></html>"#;
        let lines = MarkupLines::parse(html, &tables).expect("root found");
        assert_eq!(
            texts(&lines),
            vec![
                ("Mika", true),
                ("Rank: Veteran", false),
                ("Attributes: Agility d8, Smarts d6", false),
                ("Pace: 6", false),
                ("Parry: 6", false),
            ]
        );
    }

    #[test]
    fn superscripts_are_bracketed_and_scripts_skipped() {
        let tables = ParserTables::default();
        let html = r#"<main><p><b>Edges:</b> Quick<sup>1</sup>, Luck</p>
            <script>var x = "Skills: nope";</script></main>"#;
        let lines = MarkupLines::parse(html, &tables).expect("root found");
        assert_eq!(texts(&lines), vec![("Edges: Quick[1], Luck", false)]);
    }

    #[test]
    fn wild_card_glyph_in_heading() {
        let tables = ParserTables::default();
        let html = "<article><h2>\u{2605} Red Jack</h2></article>";
        let lines = MarkupLines::parse(html, &tables).expect("root found");
        assert_eq!(lines.lines()[0].text, "Red Jack");
        assert!(lines.lines()[0].marked);
    }

    #[test]
    fn missing_root_is_reported() {
        let tables = ParserTables::default();
        let err = MarkupLines::parse("<p>Nothing here</p>", &tables).expect_err("no root");
        assert!(matches!(err, ParseIssue::ContentNotFound { .. }));
    }
}
