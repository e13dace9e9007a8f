//! Spreads, pages and groups.

use serde::{Deserialize, Serialize};

use super::graphic::{ImageFrame, TextFrame, VectorShape};
use crate::geometry::{is_contained, BoundingBox, Bounds, Transform};

/// Page margins in points
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    /// Top
    pub top: f64,
    /// Bottom
    pub bottom: f64,
    /// Left
    pub left: f64,
    /// Right
    pub right: f64,
}

impl Margins {
    /// Create margins
    #[inline]
    #[must_use = "creates new margins"]
    pub const fn new(top: f64, bottom: f64, left: f64, right: f64) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    /// All four sides exactly zero
    #[inline]
    #[must_use = "checks whether all margins are zero"]
    pub fn is_zero(&self) -> bool {
        self.top == 0.0 && self.bottom == 0.0 && self.left == 0.0 && self.right == 0.0
    }
}

/// A page on a spread or master spread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// `Self`
    pub id: String,
    /// `Name` (the label shown in the pages panel)
    pub name: Option<String>,
    /// Local bounds
    pub bounds: Bounds,
    /// Spread transform
    pub transform: Transform,
    /// `MarginPreference` margins
    pub margins: Margins,
    /// `MarginPreference/@ColumnCount`, default 1
    pub column_count: u32,
    /// `MarginPreference/@ColumnGutter`
    pub column_gutter: f64,
    /// `AppliedMaster`
    pub applied_master: Option<String>,
    /// Printed page number, set once all spreads are parsed
    pub page_number: Option<u32>,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: None,
            bounds: Bounds::ZERO,
            transform: Transform::IDENTITY,
            margins: Margins::default(),
            column_count: 1,
            column_gutter: 0.0,
            applied_master: None,
            page_number: None,
        }
    }
}

impl Page {
    /// Page width in points
    #[inline]
    #[must_use = "returns the page width"]
    pub fn width(&self) -> f64 {
        self.bounds.width()
    }

    /// Page height in points
    #[inline]
    #[must_use = "returns the page height"]
    pub fn height(&self) -> f64 {
        self.bounds.height()
    }

    /// Whether an item's center lies on this page
    #[inline]
    #[must_use = "returns whether the item is on the page"]
    pub fn contains(&self, bounds: &Bounds, transform: &Transform) -> bool {
        is_contained(bounds, transform, &self.bounds, &self.transform)
    }

    /// `AppliedMaster` with the `"n"` (none) sentinel filtered out
    #[must_use = "returns the applied master id"]
    pub fn master_id(&self) -> Option<&str> {
        self.applied_master.as_deref().filter(|m| *m != "n")
    }
}

/// A group element, kept for reference after its children were flattened
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// `Self`
    pub id: String,
    /// Local bounds
    pub bounds: Bounds,
    /// Group transform composed with all enclosing groups
    pub transform: Transform,
    /// `ItemLayer`
    pub layer: Option<String>,
    /// Enclosing group, if nested
    pub parent_group: Option<String>,
}

/// A spread (or master spread) with flattened contents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Spread {
    /// `Self`
    pub id: String,
    /// `ItemTransform` of the spread element
    pub transform: Transform,
    /// Pages in document order
    pub pages: Vec<Page>,
    /// Text frames in document order
    pub text_frames: Vec<TextFrame>,
    /// Image frames in document order
    pub image_frames: Vec<ImageFrame>,
    /// Vector shapes in document order
    pub vector_shapes: Vec<VectorShape>,
    /// Every group met during flattening
    pub groups: Vec<Group>,
}

impl Spread {
    /// Create an empty spread
    #[inline]
    #[must_use = "creates a new spread"]
    pub fn new(id: String) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Page by id
    #[must_use = "returns the page if found"]
    pub fn page(&self, id: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == id)
    }

    /// Text frame by id
    #[must_use = "returns the text frame if found"]
    pub fn text_frame(&self, id: &str) -> Option<&TextFrame> {
        self.text_frames.iter().find(|f| f.id == id)
    }

    /// Text frames whose center lies on `page`
    #[must_use = "returns the text frames on the page"]
    pub fn text_frames_on_page(&self, page: &Page) -> Vec<&TextFrame> {
        self.text_frames
            .iter()
            .filter(|f| page.contains(&f.bounds, &f.transform))
            .collect()
    }

    /// Non-inline image frames on `page`
    #[must_use = "returns the image frames on the page"]
    pub fn image_frames_on_page(&self, page: &Page) -> Vec<&ImageFrame> {
        self.image_frames
            .iter()
            .filter(|f| !f.is_inline() && page.contains(&f.bounds, &f.transform))
            .collect()
    }

    /// Non-inline vector shapes on `page`, lowest z-order first
    #[must_use = "returns the vector shapes on the page"]
    pub fn vector_shapes_on_page(&self, page: &Page) -> Vec<&VectorShape> {
        let mut shapes: Vec<_> = self
            .vector_shapes
            .iter()
            .filter(|s| !s.is_inline() && page.contains(&s.bounds, &s.transform))
            .collect();
        shapes.sort_by_key(|s| s.z_order);
        shapes
    }

    /// Inline vector shapes on `page`, lowest z-order first
    #[must_use = "returns the inline shapes on the page"]
    pub fn inline_shapes_on_page(&self, page: &Page) -> Vec<&VectorShape> {
        let mut shapes: Vec<_> = self
            .vector_shapes
            .iter()
            .filter(|s| s.is_inline() && page.contains(&s.bounds, &s.transform))
            .collect();
        shapes.sort_by_key(|s| s.z_order);
        shapes
    }

    /// Inline image frames on `page`, lowest z-order first
    #[must_use = "returns the inline images on the page"]
    pub fn inline_images_on_page(&self, page: &Page) -> Vec<&ImageFrame> {
        let mut frames: Vec<_> = self
            .image_frames
            .iter()
            .filter(|f| f.is_inline() && page.contains(&f.bounds, &f.transform))
            .collect();
        frames.sort_by_key(|f| f.z_order);
        frames
    }

    /// Box enclosing every page in spread coordinates; `None` without pages
    #[must_use = "returns the spread bounds"]
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.pages
            .iter()
            .map(|p| p.bounds.transformed_box(&p.transform))
            .reduce(|acc, b| acc.union(&b))
    }

    /// Highest z-order in use, `None` when nothing is z-ordered
    #[must_use = "returns the highest z-order"]
    pub fn max_z_order(&self) -> Option<u32> {
        self.image_frames
            .iter()
            .map(|f| f.z_order)
            .chain(self.vector_shapes.iter().map(|s| s.z_order))
            .max()
    }
}
