//! Frames and shapes placed on a spread
//!
//! Every item here carries bounds in its own local space plus a transform
//! that has already been composed with all enclosing groups, so
//! `transform.apply(..)` yields spread coordinates directly.

use serde::{Deserialize, Serialize};

use super::table::Insets;
use crate::geometry::{BoundingBox, Bounds, Point, Transform};

/// Element a frame or shape was parsed from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    /// `Rectangle`
    #[default]
    Rectangle,
    /// `Polygon`
    Polygon,
    /// `Oval`
    Oval,
    /// `GraphicLine`
    GraphicLine,
}

/// Stroke end cap
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineCap {
    /// `ButtEndCap`
    #[default]
    Butt,
    /// `RoundEndCap`
    Round,
    /// `ProjectingEndCap`
    Projecting,
}

impl LineCap {
    /// Map an `EndCap` attribute value; unknown values give the default
    #[must_use = "returns the parsed cap"]
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("RoundEndCap") => Self::Round,
            Some("ProjectingEndCap") => Self::Projecting,
            _ => Self::Butt,
        }
    }
}

/// Stroke corner join
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineJoin {
    /// `MiterEndJoin`
    #[default]
    Miter,
    /// `RoundEndJoin`
    Round,
    /// `BevelEndJoin`
    Bevel,
}

impl LineJoin {
    /// Map an `EndJoin` attribute value; unknown values give the default
    #[must_use = "returns the parsed join"]
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("RoundEndJoin") => Self::Round,
            Some("BevelEndJoin") => Self::Bevel,
            _ => Self::Miter,
        }
    }
}

/// Per-corner radii of a rounded rectangle
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CornerRadii {
    /// `TopLeftCornerRadius`
    pub top_left: f64,
    /// `TopRightCornerRadius`
    pub top_right: f64,
    /// `BottomLeftCornerRadius`
    pub bottom_left: f64,
    /// `BottomRightCornerRadius`
    pub bottom_right: f64,
}

impl CornerRadii {
    /// Largest of the four radii
    #[must_use = "returns the largest radius"]
    pub fn max(&self) -> f64 {
        self.top_left
            .max(self.top_right)
            .max(self.bottom_left)
            .max(self.bottom_right)
    }
}

/// Anchor with its two Bezier handles
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    /// On-curve point
    pub anchor: Point,
    /// Incoming handle (`LeftDirection`)
    pub left: Point,
    /// Outgoing handle (`RightDirection`)
    pub right: Point,
}

impl PathPoint {
    /// A corner point whose handles sit on the anchor
    #[inline]
    #[must_use = "creates a new path point"]
    pub const fn corner(anchor: Point) -> Self {
        Self {
            anchor,
            left: anchor,
            right: anchor,
        }
    }

    /// Both handles coincide with the anchor
    #[inline]
    #[must_use = "checks whether the point has curve handles"]
    pub fn is_straight(&self) -> bool {
        self.left == self.anchor && self.right == self.anchor
    }
}

/// One `GeometryPathType`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubPath {
    /// Points in drawing order
    pub points: Vec<PathPoint>,
    /// `PathOpen="true"`: stroked line rather than fillable outline
    pub open: bool,
}

/// Path geometry of a vector shape
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum ShapePath {
    /// No `GeometryPathType` present
    #[default]
    None,
    /// Exactly one path
    Simple(SubPath),
    /// Several independent sub-paths
    Compound(Vec<SubPath>),
}

impl ShapePath {
    /// Build from parsed sub-paths
    #[must_use = "returns the shape path"]
    pub fn from_subpaths(mut subpaths: Vec<SubPath>) -> Self {
        match subpaths.len() {
            0 => Self::None,
            1 => subpaths.pop().map_or(Self::None, Self::Simple),
            _ => Self::Compound(subpaths),
        }
    }

    /// All sub-paths, in order
    #[must_use = "returns the sub-paths"]
    pub fn subpaths(&self) -> &[SubPath] {
        match self {
            Self::None => &[],
            Self::Simple(p) => std::slice::from_ref(p),
            Self::Compound(ps) => ps,
        }
    }

    /// More than one sub-path
    #[inline]
    #[must_use = "checks for a compound path"]
    pub const fn is_compound(&self) -> bool {
        matches!(self, Self::Compound(_))
    }

    /// A simple path that is open; compound paths count as closed
    #[inline]
    #[must_use = "checks whether the path is open"]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Simple(SubPath { open: true, .. }))
    }
}

/// A `Rectangle`, `Polygon`, `Oval` or `GraphicLine` without placed content
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VectorShape {
    /// `Self`
    pub id: String,
    /// Source element
    pub kind: ShapeKind,
    /// Local bounds
    pub bounds: Bounds,
    /// Spread transform (group-composed)
    pub transform: Transform,
    /// `ItemLayer`
    pub layer: Option<String>,
    /// `AppliedObjectStyle`
    pub object_style: Option<String>,
    /// `FillColor`
    pub fill_color: Option<String>,
    /// `FillTint`
    pub fill_tint: Option<f64>,
    /// `StrokeColor`
    pub stroke_color: Option<String>,
    /// `StrokeWeight`, default 1
    pub stroke_weight: f64,
    /// `StrokeType`
    pub stroke_type: Option<String>,
    /// `EndCap`
    pub line_cap: LineCap,
    /// `EndJoin`
    pub line_join: LineJoin,
    /// `MiterLimit`, default 4
    pub miter_limit: f64,
    /// Corner radii when any corner is rounded
    pub corner_radii: Option<CornerRadii>,
    /// Outline
    pub path: ShapePath,
    /// Paint order
    pub z_order: u32,
    /// Owning story when relocated from text
    pub inline_story: Option<String>,
}

impl VectorShape {
    /// Relocated from story text
    #[inline]
    #[must_use = "checks whether the shape is inline"]
    pub const fn is_inline(&self) -> bool {
        self.inline_story.is_some()
    }

    /// `GraphicLine` or open simple path
    #[inline]
    #[must_use = "checks whether the shape is a line"]
    pub fn is_line(&self) -> bool {
        self.kind == ShapeKind::GraphicLine || self.path.is_open()
    }
}

/// What an image frame holds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentKind {
    /// `Image`
    #[default]
    Image,
    /// `PDF`
    Pdf,
    /// `EPS`
    Eps,
}

/// A frame holding a placed `Image`, `PDF` or `EPS`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageFrame {
    /// `Self` of the frame
    pub id: String,
    /// Frame element
    pub kind: ShapeKind,
    /// Frame local bounds
    pub bounds: Bounds,
    /// Frame spread transform (group-composed)
    pub transform: Transform,
    /// `ItemLayer`
    pub layer: Option<String>,
    /// `AppliedObjectStyle`
    pub object_style: Option<String>,
    /// Placed content type
    pub content: ContentKind,
    /// `Link/@LinkResourceURI`
    pub link_uri: Option<String>,
    /// `Link/@StoredState` (Normal, Embedded, ...)
    pub stored_state: Option<String>,
    /// `Link/@LinkResourceFormat`
    pub link_format: Option<String>,
    /// Content transform relative to the frame, used for clipping
    pub image_transform: Transform,
    /// Extent of the placed graphic in its own space
    pub graphic_bounds: Option<Bounds>,
    /// Paint order
    pub z_order: u32,
    /// Owning story when relocated from text
    pub inline_story: Option<String>,
}

impl ImageFrame {
    /// `StoredState="Embedded"`
    #[inline]
    #[must_use = "checks whether the image is embedded"]
    pub fn is_embedded(&self) -> bool {
        self.stored_state.as_deref() == Some("Embedded")
    }

    /// Relocated from story text
    #[inline]
    #[must_use = "checks whether the frame is inline"]
    pub const fn is_inline(&self) -> bool {
        self.inline_story.is_some()
    }
}

/// A text frame on a spread
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextFrame {
    /// `Self`
    pub id: String,
    /// `ParentStory`
    pub parent_story: Option<String>,
    /// Local bounds
    pub bounds: Bounds,
    /// Spread transform (group-composed)
    pub transform: Transform,
    /// `ItemLayer`
    pub layer: Option<String>,
    /// `AppliedObjectStyle`
    pub object_style: Option<String>,
    /// `FillColor`
    pub fill_color: Option<String>,
    /// `StrokeColor`
    pub stroke_color: Option<String>,
    /// `StrokeWeight`
    pub stroke_weight: Option<f64>,
    /// `PreviousTextFrame`
    pub previous_frame: Option<String>,
    /// `NextTextFrame`
    pub next_frame: Option<String>,
    /// `TextFramePreference/@TextColumnCount`, default 1
    pub column_count: u32,
    /// `TextFramePreference/@TextColumnGutter`
    pub column_gutter: Option<f64>,
    /// `TextFramePreference/@InsetSpacing`
    pub inset_spacing: Option<Insets>,
    /// `TextFramePreference/@VerticalJustification`
    pub vertical_justification: Option<String>,
}

impl TextFrame {
    /// First frame of its thread
    #[inline]
    #[must_use = "checks whether the frame starts a thread"]
    pub const fn is_thread_start(&self) -> bool {
        self.previous_frame.is_none()
    }
}

/// An image frame or vector shape, before it is placed into a spread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Graphic {
    /// Frame with placed content
    Image(ImageFrame),
    /// Plain vector shape
    Vector(VectorShape),
}

impl Graphic {
    /// `Self` of the underlying element
    #[must_use = "returns the graphic id"]
    pub fn id(&self) -> &str {
        match self {
            Self::Image(f) => &f.id,
            Self::Vector(s) => &s.id,
        }
    }

    /// Local bounds
    #[must_use = "returns the bounds"]
    pub const fn bounds(&self) -> &Bounds {
        match self {
            Self::Image(f) => &f.bounds,
            Self::Vector(s) => &s.bounds,
        }
    }

    /// Current transform
    #[must_use = "returns the transform"]
    pub const fn transform(&self) -> &Transform {
        match self {
            Self::Image(f) => &f.transform,
            Self::Vector(s) => &s.transform,
        }
    }

    /// Replace the transform
    pub fn set_transform(&mut self, transform: Transform) {
        match self {
            Self::Image(f) => f.transform = transform,
            Self::Vector(s) => s.transform = transform,
        }
    }

    /// Paint order
    #[must_use = "returns the z-order"]
    pub const fn z_order(&self) -> u32 {
        match self {
            Self::Image(f) => f.z_order,
            Self::Vector(s) => s.z_order,
        }
    }

    /// Assign the paint order
    pub fn set_z_order(&mut self, z_order: u32) {
        match self {
            Self::Image(f) => f.z_order = z_order,
            Self::Vector(s) => s.z_order = z_order,
        }
    }

    /// Owning story if inline
    #[must_use = "returns the owning story"]
    pub fn inline_story(&self) -> Option<&str> {
        match self {
            Self::Image(f) => f.inline_story.as_deref(),
            Self::Vector(s) => s.inline_story.as_deref(),
        }
    }

    /// Tag as inline content of `story_id`
    pub fn mark_inline(&mut self, story_id: &str) {
        let story = Some(story_id.to_string());
        match self {
            Self::Image(f) => f.inline_story = story,
            Self::Vector(s) => s.inline_story = story,
        }
    }

    /// Spread-space bounding box
    #[must_use = "returns the absolute bounding box"]
    pub fn absolute_box(&self) -> BoundingBox {
        self.bounds().transformed_box(self.transform())
    }
}
