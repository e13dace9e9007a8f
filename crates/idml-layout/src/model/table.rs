//! Table types.

use serde::{Deserialize, Serialize};

use super::story::Paragraph;

/// Default cell inset in points
pub const DEFAULT_CELL_INSET: f64 = 4.0;

/// A table rebuilt from a story's `Table` element
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// `Self`
    pub id: String,
    /// `AppliedTableStyle`
    pub style: Option<String>,
    /// Number of rows that kept at least one cell
    pub row_count: usize,
    /// Number of `Column` elements
    pub column_count: usize,
    /// `HeaderRowCount`
    pub header_row_count: u32,
    /// `BodyRowCount`
    pub body_row_count: u32,
    /// `SingleColumnWidth` of each `Column`, in declaration order
    pub column_widths: Vec<f64>,
    /// Rows, indexed contiguously from 0
    pub rows: Vec<TableRow>,
}

impl Table {
    /// Sum of column widths
    #[must_use = "returns the table width"]
    pub fn total_width(&self) -> f64 {
        self.column_widths.iter().sum()
    }

    /// Sum of known row heights
    #[must_use = "returns the table height"]
    pub fn total_height(&self) -> f64 {
        self.rows.iter().filter_map(|r| r.height).sum()
    }

    /// Cell at `(row, column)` anchor position
    #[must_use = "returns the cell if present"]
    pub fn cell(&self, row: usize, column: usize) -> Option<&TableCell> {
        self.rows
            .get(row)?
            .cells
            .iter()
            .find(|c| c.column_index == column)
    }

    /// Plain text grid, one line per row, cells separated by tabs
    #[must_use = "returns the table text"]
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| {
                row.cells
                    .iter()
                    .map(TableCell::plain_text)
                    .collect::<Vec<_>>()
                    .join("\t")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A table row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// `Self`
    pub id: String,
    /// Position after reconstruction
    pub index: usize,
    /// `SingleRowHeight`
    pub height: Option<f64>,
    /// `MinimumHeight`
    pub min_height: Option<f64>,
    /// `AutoGrow`, default true
    pub auto_grow: bool,
    /// Cells anchored in this row, ordered by column
    pub cells: Vec<TableCell>,
}

/// Stroke applied to one cell edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellBorder {
    /// Stroke color reference
    pub color: Option<String>,
    /// Stroke weight in points
    pub weight: f64,
    /// Stroke type reference (Solid, Dashed, ...)
    pub stroke_type: Option<String>,
    /// Tint percentage
    pub tint: f64,
}

impl Default for CellBorder {
    #[inline]
    fn default() -> Self {
        Self {
            color: None,
            weight: 1.0,
            stroke_type: None,
            tint: 100.0,
        }
    }
}

/// Per-edge borders of a cell plus the diagonal stroke
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellBorders {
    /// Top edge
    pub top: Option<CellBorder>,
    /// Bottom edge
    pub bottom: Option<CellBorder>,
    /// Left edge
    pub left: Option<CellBorder>,
    /// Right edge
    pub right: Option<CellBorder>,
    /// Diagonal line stroke
    pub diagonal: Option<CellBorder>,
}

/// Inner spacing in points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Insets {
    /// Top
    pub top: f64,
    /// Bottom
    pub bottom: f64,
    /// Left
    pub left: f64,
    /// Right
    pub right: f64,
}

impl Insets {
    /// Same value on all four sides
    #[inline]
    #[must_use = "creates uniform insets"]
    pub const fn uniform(value: f64) -> Self {
        Self {
            top: value,
            bottom: value,
            left: value,
            right: value,
        }
    }
}

impl Default for Insets {
    #[inline]
    fn default() -> Self {
        Self::uniform(DEFAULT_CELL_INSET)
    }
}

/// A table cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    /// `Self`
    pub id: String,
    /// Row after reconstruction
    pub row_index: usize,
    /// Column from the cell name
    pub column_index: usize,
    /// `RowSpan`
    pub row_span: u32,
    /// `ColumnSpan`
    pub column_span: u32,
    /// `AppliedCellStyle`
    pub style: Option<String>,
    /// `FillColor`
    pub fill_color: Option<String>,
    /// `FillTint`
    pub fill_tint: Option<f64>,
    /// Edge and diagonal strokes
    pub borders: CellBorders,
    /// `TopLeftDiagonalLine`
    pub top_left_diagonal: bool,
    /// `TopRightDiagonalLine`
    pub top_right_diagonal: bool,
    /// Cell insets
    pub insets: Insets,
    /// `VerticalJustification`
    pub vertical_justification: Option<String>,
    /// Cell content
    pub paragraphs: Vec<Paragraph>,
}

impl Default for TableCell {
    fn default() -> Self {
        Self {
            id: String::new(),
            row_index: 0,
            column_index: 0,
            row_span: 1,
            column_span: 1,
            style: None,
            fill_color: None,
            fill_tint: None,
            borders: CellBorders::default(),
            top_left_diagonal: false,
            top_right_diagonal: false,
            insets: Insets::default(),
            vertical_justification: None,
            paragraphs: Vec::new(),
        }
    }
}

impl TableCell {
    /// Spans more than one row or column
    #[inline]
    #[must_use = "checks whether the cell is merged"]
    pub const fn is_merged(&self) -> bool {
        self.row_span > 1 || self.column_span > 1
    }

    /// Paragraph texts joined with newlines
    #[must_use = "returns the cell text"]
    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
