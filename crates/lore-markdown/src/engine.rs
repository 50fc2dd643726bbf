//! Block-level state machine.
//!
//! A single forward pass over the input lines. The running state is whether a
//! list or table is open, whether the next table row is the header row, and
//! the accumulated output.

use crate::inline::{render_inline, strip_inline};

/// Result of rendering a document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderResult {
    /// Rendered HTML fragment.
    pub html: String,
    /// Text of the first non-empty level-1 heading, inline markers removed
    /// (if title extraction is enabled).
    pub title: Option<String>,
}

/// Markdown renderer for the wiki dialect.
///
/// Pure and infallible: the same input always yields the same fragment.
#[derive(Clone, Copy, Debug, Default)]
pub struct MarkdownEngine {
    extract_title: bool,
}

impl MarkdownEngine {
    /// Create an engine with title extraction disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the first `# heading` as the document title.
    #[must_use]
    pub fn with_title_extraction(mut self) -> Self {
        self.extract_title = true;
        self
    }

    /// Render text to an HTML fragment.
    #[must_use]
    pub fn render(&self, text: &str) -> String {
        self.render_document(text).html
    }

    /// Render text to an HTML fragment, keeping the extracted title.
    #[must_use]
    pub fn render_document(&self, text: &str) -> RenderResult {
        let mut state = BlockState::default();

        for line in text.lines() {
            match classify(line) {
                Line::Heading(level, rest) => {
                    state.close_blocks();
                    if level == 1 && self.extract_title && state.title.is_none() && !rest.is_empty() {
                        state.title = Some(strip_inline(rest));
                    }
                    state.push_heading(level, rest);
                }
                Line::ListItem(rest) => {
                    state.close_table();
                    state.push_list_item(rest);
                }
                Line::TableRow(row) => {
                    state.close_list();
                    state.push_table_row(row);
                }
                Line::Blank => {
                    state.close_blocks();
                    state.output.push_str("<br>\n");
                }
                Line::Text(rest) => {
                    state.close_blocks();
                    state.output.push_str("<p>");
                    state.output.push_str(&render_inline(rest));
                    state.output.push_str("</p>\n");
                }
            }
        }

        state.close_blocks();

        RenderResult {
            html: state.output,
            title: state.title,
        }
    }
}

/// Render text with a default engine.
///
/// ```
/// assert_eq!(lore_markdown::render("## Tips"), "<h2>Tips</h2>\n");
/// ```
#[must_use]
pub fn render(text: &str) -> String {
    MarkdownEngine::new().render(text)
}

/// Classified input line.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Heading(u8, &'a str),
    ListItem(&'a str),
    TableRow(&'a str),
    Blank,
    Text(&'a str),
}

fn classify(line: &str) -> Line<'_> {
    let line = line.trim();

    if line.is_empty() {
        Line::Blank
    } else if let Some((level, rest)) = heading(line) {
        Line::Heading(level, rest)
    } else if let Some(rest) = line.strip_prefix("- ") {
        Line::ListItem(rest.trim())
    } else if line.starts_with('|') {
        Line::TableRow(line)
    } else {
        Line::Text(line)
    }
}

/// `#`, `##` or `###` followed by a space or nothing. A bare marker is an
/// empty heading.
fn heading(line: &str) -> Option<(u8, &str)> {
    [(3, "###"), (2, "##"), (1, "#")]
        .into_iter()
        .find_map(|(level, marker)| {
            let rest = line.strip_prefix(marker)?;
            if rest.is_empty() {
                Some((level, rest))
            } else {
                rest.strip_prefix(' ').map(|text| (level, text.trim()))
            }
        })
}

#[derive(Debug, Default)]
struct BlockState {
    output: String,
    in_list: bool,
    in_table: bool,
    is_first_table_row: bool,
    /// Table rows are buffered and flushed when the table closes.
    table: String,
    title: Option<String>,
}

impl BlockState {
    fn push_heading(&mut self, level: u8, text: &str) {
        self.output
            .push_str(&format!("<h{level}>{}</h{level}>\n", render_inline(text)));
    }

    fn push_list_item(&mut self, text: &str) {
        if !self.in_list {
            self.output.push_str("<ul>\n");
            self.in_list = true;
        }
        self.output.push_str("<li>");
        self.output.push_str(&render_inline(text));
        self.output.push_str("</li>\n");
    }

    fn push_table_row(&mut self, row: &str) {
        if !self.in_table {
            self.in_table = true;
            self.is_first_table_row = true;
        }

        // Header/body separator contributes no row
        if row.contains("---") {
            return;
        }

        let tag = if self.is_first_table_row { "th" } else { "td" };
        self.table.push_str("<tr>");
        for cell in split_cells(row) {
            self.table
                .push_str(&format!("<{tag}>{}</{tag}>", render_inline(cell)));
        }
        self.table.push_str("</tr>\n");
        self.is_first_table_row = false;
    }

    fn close_list(&mut self) {
        if self.in_list {
            self.output.push_str("</ul>\n");
            self.in_list = false;
        }
    }

    fn close_table(&mut self) {
        if self.in_table {
            self.output.push_str("<table>\n");
            self.output.push_str(&std::mem::take(&mut self.table));
            self.output.push_str("</table>\n");
            self.in_table = false;
        }
    }

    fn close_blocks(&mut self) {
        self.close_list();
        self.close_table();
    }
}

/// Split a table row on `|`, dropping the empty edge cells.
fn split_cells(row: &str) -> Vec<&str> {
    let mut cells: Vec<&str> = row.split('|').map(str::trim).collect();
    if cells.first().is_some_and(|c| c.is_empty()) {
        cells.remove(0);
    }
    if cells.last().is_some_and(|c| c.is_empty()) {
        cells.pop();
    }
    cells
}
