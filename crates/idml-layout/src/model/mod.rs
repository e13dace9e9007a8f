//! Document model produced by the loader

pub mod document;
pub mod graphic;
pub mod resource;
pub mod spread;
pub mod story;
pub mod table;

pub use document::IdmlDocument;
pub use graphic::{
    ContentKind, CornerRadii, Graphic, ImageFrame, LineCap, LineJoin, PathPoint, ShapeKind,
    ShapePath, SubPath, TextFrame, VectorShape,
};
pub use resource::{FontDef, Leading, Section, StyleDef};
pub use spread::{Group, Margins, Page, Spread};
pub use story::{CharacterRun, InlineFrame, Paragraph, ParagraphOverrides, Story};
pub use table::{
    CellBorder, CellBorders, Insets, Table, TableCell, TableRow, DEFAULT_CELL_INSET,
};
