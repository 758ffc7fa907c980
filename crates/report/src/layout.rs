use crate::content::{BodyRow, COLUMN_COUNT, ReportContent};
use crate::metrics::FontFace;
use std::mem;

/// A4 in points.
pub const PAGE_WIDTH: f32 = 595.2756;
pub const PAGE_HEIGHT: f32 = 841.8898;
pub const MARGIN_X: f32 = 36.0;
pub const MARGIN_Y: f32 = 40.0;

/// Share of the usable width taken by each column.
pub const COLUMN_FRACTIONS: [f32; COLUMN_COUNT] = [0.18, 0.24, 0.18, 0.14, 0.26];

const CELL_PAD_X: f32 = 6.0;
const CELL_PAD_TOP: f32 = 3.0;
const BODY_PAD_BOTTOM: f32 = 3.0;
const HEADER_PAD_BOTTOM: f32 = 8.0;
const TABLE_FONT_SIZE: f32 = 10.0;
const TABLE_LEADING: f32 = 12.0;

/// Helvetica ascender, as a fraction of the font size.
const ASCENT: f32 = 0.718;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

pub const BLACK: Rgb = Rgb::new(0, 0, 0);
pub const WHITE: Rgb = Rgb::new(255, 255, 255);
pub const WHITESMOKE: Rgb = Rgb::new(245, 245, 245);
pub const HEADER_BACKGROUND: Rgb = Rgb::new(0x2d, 0x34, 0x36);
pub const STRIPE: Rgb = Rgb::new(0xec, 0xf0, 0xf1);
pub const GRID: Rgb = Rgb::new(128, 128, 128);
pub const GRID_WIDTH: f32 = 0.25;

#[derive(Debug, Clone, Copy)]
struct TextStyle {
    face: FontFace,
    size: f32,
    leading: f32,
    centered: bool,
}

const TITLE_STYLE: TextStyle = TextStyle {
    face: FontFace::Bold,
    size: 18.0,
    leading: 22.0,
    centered: true,
};

const NORMAL_STYLE: TextStyle = TextStyle {
    face: FontFace::Regular,
    size: 10.0,
    leading: 12.0,
    centered: false,
};

/// A single line of text. Coordinates are in points from the top-left
/// corner of the page; `baseline` is the y of the text baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub x: f32,
    pub baseline: f32,
    pub face: FontFace,
    pub size: f32,
    pub color: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    pub x: f32,
    pub width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Header,
    Alert,
    NoRecords,
}

/// A table row positioned on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedRow {
    pub kind: RowKind,
    pub top: f32,
    pub height: f32,
    pub background: Rgb,
    /// Draw the inner column borders. Off for the spanning "no records" row.
    pub column_borders: bool,
    /// The remainder of a row split at a page break.
    pub continued: bool,
    pub text: Vec<TextLine>,
    /// The wrapped lines of each cell, in column order.
    pub cells: Vec<Vec<String>>,
}

impl PlacedRow {
    /// The cell contents with wrapped lines joined back by spaces.
    pub fn cell_text(&self, column: usize) -> String {
        self.cells.get(column).map(|lines| lines.join(" ")).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub number: usize,
    /// Title block lines. Only the first page has them.
    pub text: Vec<TextLine>,
    pub rows: Vec<PlacedRow>,
}

impl PageLayout {
    fn new(number: usize) -> Self {
        Self {
            number,
            text: Vec::new(),
            rows: Vec::new(),
        }
    }
}

/// The fully positioned report, ready to be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLayout {
    pub title: String,
    pub columns: [Column; COLUMN_COUNT],
    pub pages: Vec<PageLayout>,
}

impl ReportLayout {
    pub fn build(content: &ReportContent) -> Self {
        let columns = column_geometry();
        let mut pager = Pager::new(columns);

        pager.paragraph(&content.title, TITLE_STYLE);
        pager.space(12.0);
        pager.paragraph(&content.generated_at, NORMAL_STYLE);
        pager.space(8.0);
        pager.paragraph(&content.summary, NORMAL_STYLE);
        pager.space(12.0);

        pager.header(PendingRow::header(&content.header, &columns));
        for (index, row) in content.rows.iter().enumerate() {
            pager.body(PendingRow::body(row, index, &columns));
        }

        Self {
            title: content.title.clone(),
            columns,
            pages: pager.pages,
        }
    }

    /// Body rows across all pages, with split rows counted once.
    pub fn body_rows(&self) -> impl Iterator<Item = &PlacedRow> {
        self.pages
            .iter()
            .flat_map(|page| page.rows.iter())
            .filter(|row| row.kind != RowKind::Header && !row.continued)
    }
}

/// Column positions for the usable width between the side margins.
pub fn column_geometry() -> [Column; COLUMN_COUNT] {
    let usable = PAGE_WIDTH - 2.0 * MARGIN_X;
    let mut x = MARGIN_X;
    COLUMN_FRACTIONS.map(|fraction| {
        let column = Column { x, width: usable * fraction };
        x += column.width;
        column
    })
}

/// Greedy word wrap. Explicit newlines are kept and words wider than
/// `max_width` are broken between characters.
pub fn wrap_text(text: &str, face: FontFace, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            for piece in break_word(word, face, size, max_width) {
                let candidate = if current.is_empty() {
                    piece.clone()
                } else {
                    format!("{current} {piece}")
                };
                if current.is_empty() || face.text_width(&candidate, size) <= max_width {
                    current = candidate;
                } else {
                    lines.push(mem::replace(&mut current, piece));
                }
            }
        }
        lines.push(current);
    }
    lines
}

fn break_word(word: &str, face: FontFace, size: f32, max_width: f32) -> Vec<String> {
    if face.text_width(word, size) <= max_width {
        return vec![word.to_string()];
    }
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut width = 0.0;
    for c in word.chars() {
        let w = face.char_width(c, size);
        if !current.is_empty() && width + w > max_width {
            pieces.push(mem::take(&mut current));
            width = 0.0;
        }
        current.push(c);
        width += w;
    }
    pieces.push(current);
    pieces
}

/// A row measured but not yet placed.
#[derive(Debug, Clone)]
struct PendingRow {
    kind: RowKind,
    cells: Vec<Vec<String>>,
    background: Rgb,
    face: FontFace,
    color: Rgb,
    pad_bottom: f32,
    column_borders: bool,
    continued: bool,
}

impl PendingRow {
    fn header(header: &[String; COLUMN_COUNT], columns: &[Column; COLUMN_COUNT]) -> Self {
        let cells = header
            .iter()
            .zip(columns)
            .map(|(text, column)| wrap_text(text, FontFace::Bold, TABLE_FONT_SIZE, inner_width(column)))
            .collect();
        Self {
            kind: RowKind::Header,
            cells,
            background: HEADER_BACKGROUND,
            face: FontFace::Bold,
            color: WHITESMOKE,
            pad_bottom: HEADER_PAD_BOTTOM,
            column_borders: true,
            continued: false,
        }
    }

    fn body(row: &BodyRow, index: usize, columns: &[Column; COLUMN_COUNT]) -> Self {
        let background = if index % 2 == 0 { WHITE } else { STRIPE };
        let (kind, cells, column_borders) = match row {
            BodyRow::Alert(values) => {
                let cells = values
                    .iter()
                    .zip(columns)
                    .map(|(text, column)| wrap_text(text, FontFace::Regular, TABLE_FONT_SIZE, inner_width(column)))
                    .collect();
                (RowKind::Alert, cells, true)
            }
            // Spans the whole row, so it is laid out as one unwrapped line.
            BodyRow::NoRecords => (
                RowKind::NoRecords,
                row.cells().iter().map(|text| vec![text.to_string()]).collect(),
                false,
            ),
        };
        Self {
            kind,
            cells,
            background,
            face: FontFace::Regular,
            color: BLACK,
            pad_bottom: BODY_PAD_BOTTOM,
            column_borders,
            continued: false,
        }
    }

    fn line_count(&self) -> usize {
        self.cells.iter().map(Vec::len).max().unwrap_or(0).max(1)
    }

    fn height(&self) -> f32 {
        CELL_PAD_TOP + self.line_count() as f32 * TABLE_LEADING + self.pad_bottom
    }

    fn lines_fitting(&self, available: f32) -> usize {
        let room = available - CELL_PAD_TOP - self.pad_bottom;
        if room <= 0.0 {
            0
        } else {
            (room / TABLE_LEADING).floor() as usize
        }
    }

    /// Keeps the first `at` lines of every cell and returns the rest as a
    /// continuation row.
    fn split_off(&mut self, at: usize) -> Self {
        let rest = self
            .cells
            .iter_mut()
            .map(|lines| if lines.len() > at { lines.split_off(at) } else { Vec::new() })
            .collect();
        Self {
            cells: rest,
            continued: true,
            ..self.clone()
        }
    }

    fn place(self, top: f32, columns: &[Column; COLUMN_COUNT]) -> PlacedRow {
        let height = self.height();
        let mut text = Vec::new();
        for (lines, column) in self.cells.iter().zip(columns) {
            for (i, line) in lines.iter().enumerate().filter(|(_, line)| !line.is_empty()) {
                text.push(TextLine {
                    text: line.clone(),
                    x: column.x + CELL_PAD_X,
                    baseline: top + CELL_PAD_TOP + i as f32 * TABLE_LEADING + ASCENT * TABLE_FONT_SIZE,
                    face: self.face,
                    size: TABLE_FONT_SIZE,
                    color: self.color,
                });
            }
        }
        PlacedRow {
            kind: self.kind,
            top,
            height,
            background: self.background,
            column_borders: self.column_borders,
            continued: self.continued,
            text,
            cells: self.cells,
        }
    }
}

fn inner_width(column: &Column) -> f32 {
    column.width - 2.0 * CELL_PAD_X
}

/// Flows the title block and table rows onto pages.
struct Pager {
    columns: [Column; COLUMN_COUNT],
    pages: Vec<PageLayout>,
    cursor: f32,
    header: Option<PendingRow>,
    /// The page holds only the repeated header so far.
    fresh: bool,
}

impl Pager {
    fn new(columns: [Column; COLUMN_COUNT]) -> Self {
        Self {
            columns,
            pages: vec![PageLayout::new(1)],
            cursor: MARGIN_Y,
            header: None,
            fresh: false,
        }
    }

    fn remaining(&self) -> f32 {
        PAGE_HEIGHT - MARGIN_Y - self.cursor
    }

    fn page(&mut self) -> &mut PageLayout {
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn space(&mut self, points: f32) {
        self.cursor += points;
    }

    fn paragraph(&mut self, text: &str, style: TextStyle) {
        let usable = PAGE_WIDTH - 2.0 * MARGIN_X;
        for line in wrap_text(text, style.face, style.size, usable) {
            let x = if style.centered {
                MARGIN_X + (usable - style.face.text_width(&line, style.size)) / 2.0
            } else {
                MARGIN_X
            };
            let baseline = self.cursor + ASCENT * style.size;
            self.page().text.push(TextLine {
                text: line,
                x,
                baseline,
                face: style.face,
                size: style.size,
                color: BLACK,
            });
            self.cursor += style.leading;
        }
    }

    fn put(&mut self, row: PendingRow) {
        let top = self.cursor;
        self.cursor += row.height();
        let placed = row.place(top, &self.columns);
        self.page().rows.push(placed);
    }

    fn header(&mut self, row: PendingRow) {
        self.header = Some(row.clone());
        self.put(row);
    }

    fn new_page(&mut self) {
        let number = self.pages.len() + 1;
        self.pages.push(PageLayout::new(number));
        self.cursor = MARGIN_Y;
        if let Some(header) = self.header.clone() {
            self.put(header);
        }
        self.fresh = true;
    }

    fn fresh_page_capacity(&self) -> f32 {
        let header = self.header.as_ref().map(PendingRow::height).unwrap_or(0.0);
        PAGE_HEIGHT - 2.0 * MARGIN_Y - header
    }

    fn body(&mut self, mut row: PendingRow) {
        loop {
            if row.height() <= self.remaining() {
                self.put(row);
                self.fresh = false;
                return;
            }
            if !self.fresh && row.height() <= self.fresh_page_capacity() {
                self.new_page();
                continue;
            }
            // Taller than a whole page: split it across pages.
            let mut fit = row.lines_fitting(self.remaining());
            if fit == 0 {
                if !self.fresh {
                    self.new_page();
                    continue;
                }
                fit = 1;
            }
            let rest = row.split_off(fit);
            self.put(row);
            self.new_page();
            row = rest;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::NO_RECORDS;
    use chrono::{FixedOffset, TimeZone, Utc};
    use core_types::{AlertRecord, AlertSource};

    fn content_with(records: usize, summary: &str) -> ReportContent {
        let base = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let records: Vec<_> = (0..records)
            .map(|i| AlertRecord {
                event_time: Some(base + chrono::Duration::minutes(i as i64)),
                summary: summary.to_string(),
                ..AlertRecord::from(AlertSource::default())
            })
            .collect();
        let generated_at = FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap();
        ReportContent::new(&records, generated_at)
    }

    #[test]
    fn columns_split_usable_width() {
        let columns = column_geometry();
        let usable = PAGE_WIDTH - 2.0 * MARGIN_X;
        let total: f32 = columns.iter().map(|c| c.width).sum();
        assert!((total - usable).abs() < 0.01);
        assert_eq!(columns[0].x, MARGIN_X);
        assert!((columns[1].width - usable * 0.24).abs() < 0.01);
        assert!((columns[4].x + columns[4].width - (PAGE_WIDTH - MARGIN_X)).abs() < 0.01);
    }

    #[test]
    fn wraps_on_word_boundaries() {
        let lines = wrap_text("alpha beta gamma delta", FontFace::Regular, 10.0, 60.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.join(" "), "alpha beta gamma delta");
        for line in &lines {
            assert!(FontFace::Regular.text_width(line, 10.0) <= 60.0, "{line}");
        }
    }

    #[test]
    fn breaks_words_wider_than_the_cell() {
        let word = "x".repeat(80);
        let lines = wrap_text(&word, FontFace::Regular, 10.0, 50.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn keeps_explicit_newlines() {
        let lines = wrap_text("um\ndois", FontFace::Regular, 10.0, 500.0);
        assert_eq!(lines, vec!["um".to_string(), "dois".to_string()]);
    }

    #[test]
    fn empty_text_is_one_blank_line() {
        assert_eq!(wrap_text("", FontFace::Regular, 10.0, 100.0), vec![String::new()]);
    }

    #[test]
    fn single_page_report_has_title_header_and_rows() {
        let layout = ReportLayout::build(&content_with(3, "ok"));
        assert_eq!(layout.pages.len(), 1);

        let page = &layout.pages[0];
        assert_eq!(page.text.len(), 3);
        assert_eq!(page.rows.len(), 4);
        assert_eq!(page.rows[0].kind, RowKind::Header);
        assert_eq!(page.rows[0].background, HEADER_BACKGROUND);
        assert_eq!(page.rows[1].background, WHITE);
        assert_eq!(page.rows[2].background, STRIPE);
        assert_eq!(page.rows[3].background, WHITE);
    }

    #[test]
    fn rows_are_stacked_without_gaps() {
        let layout = ReportLayout::build(&content_with(5, "ok"));
        let rows = &layout.pages[0].rows;
        for pair in rows.windows(2) {
            assert!((pair[0].top + pair[0].height - pair[1].top).abs() < 0.001);
        }
    }

    #[test]
    fn no_records_row_spans_the_table() {
        let layout = ReportLayout::build(&content_with(0, ""));
        let rows = &layout.pages[0].rows;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].kind, RowKind::NoRecords);
        assert!(!rows[1].column_borders);
        assert_eq!(rows[1].cell_text(0), NO_RECORDS);
        assert!((1..COLUMN_COUNT).all(|c| rows[1].cell_text(c).is_empty()));
    }

    #[test]
    fn long_tables_repeat_the_header_on_every_page() {
        let layout = ReportLayout::build(&content_with(120, "ok"));
        assert!(layout.pages.len() > 1);
        for page in &layout.pages {
            assert_eq!(page.rows[0].kind, RowKind::Header);
            let last = page.rows.last().unwrap();
            assert!(last.top + last.height <= PAGE_HEIGHT - MARGIN_Y + 0.001);
        }
        assert!(layout.pages[1].text.is_empty());
        assert_eq!(layout.body_rows().count(), 120);
    }

    #[test]
    fn rows_taller_than_a_page_are_split() {
        let layout = ReportLayout::build(&content_with(1, &"palavra ".repeat(900)));
        assert!(layout.pages.len() > 1);
        for page in &layout.pages {
            for row in &page.rows {
                assert!(row.top + row.height <= PAGE_HEIGHT - MARGIN_Y + 0.001);
            }
        }
        assert_eq!(layout.body_rows().count(), 1);
        assert!(layout.pages[1].rows[1].continued);
        assert_eq!(layout.pages[1].rows[1].background, WHITE);
    }
}
