//! Table reconstruction
//!
//! Cells are serialized as children of the `Table` (possibly wrapped in a
//! `TableStyleRange`), not of their `Row`. Each cell's `Name` holds its
//! `"<column>:<row>"` anchor, which is used to attach it back to a row.
//! Rows that end up without cells are dropped and the rest are reindexed so
//! row and cell indices stay contiguous.

use roxmltree::Node;

use super::story::parse_paragraph;
use crate::model::{
    CellBorder, CellBorders, Insets, Table, TableCell, TableRow, DEFAULT_CELL_INSET,
};
use crate::xml::{
    attr, attr_bool_or, attr_f64, attr_f64_or, attr_string, attr_u32_or, children_of_kind,
    ElementKind,
};

const DEFAULT_VERTICAL_JUSTIFICATION: &str = "TopAlign";

/// Rebuild a `Table` element into rows of cells
#[must_use = "returns the reconstructed table"]
pub fn reconstruct_table(node: Node<'_, '_>) -> Table {
    let row_nodes = rows_of(node);
    let column_nodes = table_children(node, ElementKind::Column);
    let column_count = column_nodes.len();

    let mut rows: Vec<TableRow> = row_nodes
        .iter()
        .enumerate()
        .map(|(index, row)| parse_row(*row, index))
        .collect();

    for cell_node in table_children(node, ElementKind::Cell) {
        let cell = parse_cell(cell_node);
        if cell.column_index >= column_count {
            log::debug!(
                "Dropping cell {} at column {} (table has {column_count} columns)",
                cell.id,
                cell.column_index
            );
            continue;
        }
        match rows.get_mut(cell.row_index) {
            Some(row) => row.cells.push(cell),
            None => log::debug!("Dropping cell {} with no row {}", cell.id, cell.row_index),
        }
    }

    rows.retain(|row| !row.cells.is_empty());
    for (index, row) in rows.iter_mut().enumerate() {
        row.index = index;
        row.cells.sort_by_key(|c| c.column_index);
        for cell in &mut row.cells {
            cell.row_index = index;
        }
    }

    Table {
        id: attr_string(node, "Self").unwrap_or_default(),
        style: attr_string(node, "AppliedTableStyle"),
        row_count: rows.len(),
        column_count,
        header_row_count: attr_u32_or(node, "HeaderRowCount", 0),
        body_row_count: attr_u32_or(node, "BodyRowCount", 0),
        column_widths: column_nodes
            .iter()
            .map(|c| attr_f64_or(*c, "SingleColumnWidth", 0.0))
            .collect(),
        rows,
    }
}

/// `Row` elements, from `TableStyleRange` wrappers first, else direct children
fn rows_of<'a, 'input: 'a>(table: Node<'a, 'input>) -> Vec<Node<'a, 'input>> {
    let wrapped = wrapped_children(table, ElementKind::Row);
    if wrapped.is_empty() {
        children_of_kind(table, ElementKind::Row).collect()
    } else {
        wrapped
    }
}

/// Direct children of a kind, else the same kind inside `TableStyleRange`
fn table_children<'a, 'input: 'a>(
    table: Node<'a, 'input>,
    kind: ElementKind,
) -> Vec<Node<'a, 'input>> {
    let direct: Vec<_> = children_of_kind(table, kind).collect();
    if direct.is_empty() {
        wrapped_children(table, kind)
    } else {
        direct
    }
}

fn wrapped_children<'a, 'input: 'a>(
    table: Node<'a, 'input>,
    kind: ElementKind,
) -> Vec<Node<'a, 'input>> {
    children_of_kind(table, ElementKind::TableStyleRange)
        .flat_map(|range| children_of_kind(range, kind))
        .collect()
}

fn parse_row(node: Node<'_, '_>, index: usize) -> TableRow {
    TableRow {
        id: attr_string(node, "Self").unwrap_or_default(),
        index,
        height: attr_f64(node, "SingleRowHeight"),
        min_height: attr_f64(node, "MinimumHeight"),
        auto_grow: attr_bool_or(node, "AutoGrow", true),
        cells: Vec::new(),
    }
}

/// `"<column>:<row>"`, `(0, 0)` when malformed
fn parse_cell_name(name: Option<&str>) -> (usize, usize) {
    name.and_then(|name| {
        let (column, row) = name.split_once(':')?;
        Some((column.trim().parse().ok()?, row.trim().parse().ok()?))
    })
    .unwrap_or((0, 0))
}

fn parse_cell(node: Node<'_, '_>) -> TableCell {
    let (column_index, row_index) = parse_cell_name(attr(node, "Name"));
    let inset = |name: &str| attr_f64_or(node, name, DEFAULT_CELL_INSET);

    TableCell {
        id: attr_string(node, "Self").unwrap_or_default(),
        row_index,
        column_index,
        row_span: attr_u32_or(node, "RowSpan", 1),
        column_span: attr_u32_or(node, "ColumnSpan", 1),
        style: attr_string(node, "AppliedCellStyle"),
        fill_color: attr_string(node, "FillColor"),
        fill_tint: attr_f64(node, "FillTint"),
        borders: CellBorders {
            top: parse_border(node, "TopEdgeStroke"),
            bottom: parse_border(node, "BottomEdgeStroke"),
            left: parse_border(node, "LeftEdgeStroke"),
            right: parse_border(node, "RightEdgeStroke"),
            diagonal: parse_border(node, "DiagonalLineStroke"),
        },
        top_left_diagonal: attr_bool_or(node, "TopLeftDiagonalLine", false),
        top_right_diagonal: attr_bool_or(node, "TopRightDiagonalLine", false),
        insets: Insets {
            top: inset("TextTopInset"),
            bottom: inset("TextBottomInset"),
            left: inset("TextLeftInset"),
            right: inset("TextRightInset"),
        },
        vertical_justification: Some(
            attr_string(node, "VerticalJustification")
                .unwrap_or_else(|| DEFAULT_VERTICAL_JUSTIFICATION.to_string()),
        ),
        paragraphs: node
            .descendants()
            .filter(|n| ElementKind::of(*n) == ElementKind::ParagraphStyleRange)
            .filter(|n| nearest_cell(*n) == Some(node))
            .map(parse_paragraph)
            .collect(),
    }
}

fn nearest_cell<'a, 'input>(node: Node<'a, 'input>) -> Option<Node<'a, 'input>> {
    node.ancestors()
        .skip(1)
        .find(|a| ElementKind::of(*a) == ElementKind::Cell)
}

/// Stroke on one edge, present if any of its attributes is set
fn parse_border(node: Node<'_, '_>, prefix: &str) -> Option<CellBorder> {
    let name = |suffix: &str| format!("{prefix}{suffix}");
    let color = attr_string(node, &name("Color"));
    let weight = attr_f64(node, &name("Weight"));
    let stroke_type = attr_string(node, &name("Type"));
    let tint = attr_f64(node, &name("Tint"));

    if color.is_none() && weight.is_none() && stroke_type.is_none() && tint.is_none() {
        return None;
    }
    let defaults = CellBorder::default();
    Some(CellBorder {
        color,
        weight: weight.unwrap_or(defaults.weight),
        stroke_type,
        tint: tint.unwrap_or(defaults.tint),
    })
}
