//! 2-D affine geometry for IDML coordinates
//!
//! IDML positions every item with two attributes:
//!
//! - `GeometricBounds="top left bottom right"` in the item's local space
//! - `ItemTransform="a b c d tx ty"` mapping local space into the parent's space
//!
//! A point is mapped with `x' = a·x + c·y + tx`, `y' = b·x + d·y + ty`.
//! All values here are immutable `Copy` types; composing or translating
//! produces a new value.

use serde::{Deserialize, Serialize};

/// A point in IDML user space (points, y grows downward)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

impl Point {
    /// Create a point
    #[inline]
    #[must_use = "creates a new point"]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Parse `"x y"` text; `None` if fewer than two numbers are present
    #[must_use = "parsing returns the point if the text was valid"]
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.split_whitespace().map(str::parse::<f64>);
        match (parts.next(), parts.next()) {
            (Some(Ok(x)), Some(Ok(y))) => Some(Self { x, y }),
            _ => None,
        }
    }
}

/// 2-D affine transform `[a, b, c, d, tx, ty]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Horizontal scale / rotation component
    pub a: f64,
    /// Vertical shear / rotation component
    pub b: f64,
    /// Horizontal shear / rotation component
    pub c: f64,
    /// Vertical scale / rotation component
    pub d: f64,
    /// Horizontal translation
    pub tx: f64,
    /// Vertical translation
    pub ty: f64,
}

impl Default for Transform {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// The identity transform `[1, 0, 0, 1, 0, 0]`
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    /// Create a transform from its six components
    #[inline]
    #[must_use = "creates a new transform"]
    pub const fn new(a: f64, b: f64, c: f64, d: f64, tx: f64, ty: f64) -> Self {
        Self { a, b, c, d, tx, ty }
    }

    /// Pure translation
    #[inline]
    #[must_use = "creates a new transform"]
    pub const fn translation(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Pure scale about the origin
    #[inline]
    #[must_use = "creates a new transform"]
    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Parse `ItemTransform` text
    ///
    /// Missing or empty text yields the identity. Missing trailing values
    /// are zero and values past the sixth are ignored; a non-numeric value
    /// yields the identity.
    #[must_use = "parsing returns the transform"]
    pub fn parse(text: Option<&str>) -> Self {
        let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) else {
            return Self::IDENTITY;
        };
        match parse_numbers::<6>(text) {
            Some([a, b, c, d, tx, ty]) => Self::new(a, b, c, d, tx, ty),
            None => {
                log::debug!("Unparsable ItemTransform {text:?}, using identity");
                Self::IDENTITY
            }
        }
    }

    /// Compose `self ∘ child`: the result applies `child` first, then `self`
    ///
    /// `self` is the parent (e.g. an enclosing group) and `child` the
    /// descendant's untouched local transform.
    #[must_use = "composition returns a new transform"]
    pub fn compose(&self, child: &Self) -> Self {
        Self {
            a: self.a * child.a + self.c * child.b,
            b: self.b * child.a + self.d * child.b,
            c: self.a * child.c + self.c * child.d,
            d: self.b * child.c + self.d * child.d,
            tx: self.a * child.tx + self.c * child.ty + self.tx,
            ty: self.b * child.tx + self.d * child.ty + self.ty,
        }
    }

    /// Map a point through this transform
    #[inline]
    #[must_use = "returns the transformed coordinates"]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.tx,
            self.b * x + self.d * y + self.ty,
        )
    }

    /// Map a [`Point`] through this transform
    #[inline]
    #[must_use = "returns the transformed point"]
    pub fn apply_point(&self, p: Point) -> Point {
        let (x, y) = self.apply(p.x, p.y);
        Point::new(x, y)
    }

    /// Same linear part, translation shifted by `(dx, dy)`
    #[inline]
    #[must_use = "returns a new translated transform"]
    pub const fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.a, self.b, self.c, self.d, self.tx + dx, self.ty + dy)
    }

    /// Rotation angle in degrees, `atan2(b, a)` (clockwise positive in IDML space)
    #[inline]
    #[must_use = "returns the rotation angle"]
    pub fn rotation_degrees(&self) -> f64 {
        self.b.atan2(self.a).to_degrees()
    }

    /// Whether this is exactly the identity
    #[inline]
    #[must_use = "checks for identity"]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Components as `[a, b, c, d, tx, ty]`
    #[inline]
    #[must_use = "returns the transform components"]
    pub const fn to_array(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.tx, self.ty]
    }
}

/// Local bounding box `[top, left, bottom, right]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Top edge
    pub top: f64,
    /// Left edge
    pub left: f64,
    /// Bottom edge
    pub bottom: f64,
    /// Right edge
    pub right: f64,
}

impl Bounds {
    /// All-zero bounds
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Create bounds from `top, left, bottom, right`
    #[inline]
    #[must_use = "creates new bounds"]
    pub const fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Parse `GeometricBounds` text
    ///
    /// Missing, empty or unparsable text yields [`Bounds::ZERO`]. Missing
    /// trailing values are zero.
    #[must_use = "parsing returns the bounds"]
    pub fn parse(text: Option<&str>) -> Self {
        let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) else {
            return Self::ZERO;
        };
        match parse_numbers::<4>(text) {
            Some([top, left, bottom, right]) => Self::new(top, left, bottom, right),
            None => {
                log::debug!("Unparsable GeometricBounds {text:?}, using zero bounds");
                Self::ZERO
            }
        }
    }

    /// Bounding box of a set of points, `None` when empty
    #[must_use = "returns the enclosing bounds"]
    pub fn enclosing<I: IntoIterator<Item = Point>>(points: I) -> Option<Self> {
        points.into_iter().fold(None, |acc, p| {
            Some(acc.map_or(Self::new(p.y, p.x, p.y, p.x), |b: Self| {
                Self::new(
                    b.top.min(p.y),
                    b.left.min(p.x),
                    b.bottom.max(p.y),
                    b.right.max(p.x),
                )
            }))
        })
    }

    /// `right - left`
    #[inline]
    #[must_use = "returns the width"]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// `bottom - top`
    #[inline]
    #[must_use = "returns the height"]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Local center point
    #[inline]
    #[must_use = "returns the center point"]
    pub fn center(&self) -> Point {
        Point::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    /// Axis-aligned box around all four transformed corners
    #[must_use = "returns the transformed bounding box"]
    pub fn transformed_box(&self, transform: &Transform) -> BoundingBox {
        let corners = [
            transform.apply(self.left, self.top),
            transform.apply(self.right, self.top),
            transform.apply(self.left, self.bottom),
            transform.apply(self.right, self.bottom),
        ];
        let mut bbox = BoundingBox::at(corners[0].0, corners[0].1);
        for (x, y) in &corners[1..] {
            bbox = bbox.including(*x, *y);
        }
        bbox
    }

    /// Width after applying `transform`
    #[inline]
    #[must_use = "returns the transformed width"]
    pub fn transformed_width(&self, transform: &Transform) -> f64 {
        self.transformed_box(transform).width()
    }

    /// Height after applying `transform`
    #[inline]
    #[must_use = "returns the transformed height"]
    pub fn transformed_height(&self, transform: &Transform) -> f64 {
        self.transformed_box(transform).height()
    }

    /// Top-left corner mapped through `transform`
    #[inline]
    #[must_use = "returns the absolute top-left corner"]
    pub fn absolute_top_left(&self, transform: &Transform) -> Point {
        transform.apply_point(Point::new(self.left, self.top))
    }

    /// Values as `[top, left, bottom, right]`
    #[inline]
    #[must_use = "returns the bounds values"]
    pub const fn to_array(&self) -> [f64; 4] {
        [self.top, self.left, self.bottom, self.right]
    }
}

/// Axis-aligned box in absolute (spread) coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Smallest x
    pub min_x: f64,
    /// Smallest y
    pub min_y: f64,
    /// Largest x
    pub max_x: f64,
    /// Largest y
    pub max_y: f64,
}

impl BoundingBox {
    /// Degenerate box at a single point
    #[inline]
    #[must_use = "creates a new bounding box"]
    pub const fn at(x: f64, y: f64) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    /// Box grown to include `(x, y)`
    #[inline]
    #[must_use = "returns the grown bounding box"]
    pub fn including(&self, x: f64, y: f64) -> Self {
        Self {
            min_x: self.min_x.min(x),
            min_y: self.min_y.min(y),
            max_x: self.max_x.max(x),
            max_y: self.max_y.max(y),
        }
    }

    /// Smallest box holding both
    #[inline]
    #[must_use = "returns the union of both boxes"]
    pub fn union(&self, other: &Self) -> Self {
        self.including(other.min_x, other.min_y)
            .including(other.max_x, other.max_y)
    }

    /// Inclusive containment test
    #[inline]
    #[must_use = "returns whether the point is inside"]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// `max_x - min_x`
    #[inline]
    #[must_use = "returns the width"]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// `max_y - min_y`
    #[inline]
    #[must_use = "returns the height"]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Parse `GeometricBounds` text, see [`Bounds::parse`]
#[inline]
#[must_use = "parsing returns the bounds"]
pub fn parse_bounds(text: Option<&str>) -> Bounds {
    Bounds::parse(text)
}

/// Parse `ItemTransform` text, see [`Transform::parse`]
#[inline]
#[must_use = "parsing returns the transform"]
pub fn parse_transform(text: Option<&str>) -> Transform {
    Transform::parse(text)
}

/// `parent ∘ child`: apply `child` first, then `parent`
#[inline]
#[must_use = "composition returns a new transform"]
pub fn compose(parent: &Transform, child: &Transform) -> Transform {
    parent.compose(child)
}

/// Map `(x, y)` through `transform`
#[inline]
#[must_use = "returns the transformed coordinates"]
pub fn apply(transform: &Transform, x: f64, y: f64) -> (f64, f64) {
    transform.apply(x, y)
}

/// Absolute axis-aligned box of a page from its two transformed corners
///
/// Only top-left and bottom-right are mapped; min/max is taken per axis so
/// flipped transforms still produce a valid box.
#[must_use = "returns the page box"]
pub fn page_box(page_bounds: &Bounds, page_transform: &Transform) -> BoundingBox {
    let (x1, y1) = page_transform.apply(page_bounds.left, page_bounds.top);
    let (x2, y2) = page_transform.apply(page_bounds.right, page_bounds.bottom);
    BoundingBox::at(x1, y1).including(x2, y2)
}

/// Whether a shape belongs to a page, judged by the shape's center point
///
/// The shape's local center is mapped to absolute coordinates and tested
/// (inclusively) against the page's absolute box. Straddling or rotated
/// shapes are classified by their center alone.
#[must_use = "returns whether the shape is on the page"]
pub fn is_contained(
    shape_bounds: &Bounds,
    shape_transform: &Transform,
    page_bounds: &Bounds,
    page_transform: &Transform,
) -> bool {
    let center = shape_transform.apply_point(shape_bounds.center());
    page_box(page_bounds, page_transform).contains(center.x, center.y)
}

/// Position of a frame's top-left relative to a page's top-left
#[must_use = "returns the page-relative position"]
pub fn page_relative_position(
    frame_bounds: &Bounds,
    frame_transform: &Transform,
    page_bounds: &Bounds,
    page_transform: &Transform,
) -> Point {
    let frame = frame_bounds.absolute_top_left(frame_transform);
    let page = page_bounds.absolute_top_left(page_transform);
    Point::new(frame.x - page.x, frame.y - page.y)
}

/// First `N` numbers of `text`, zero-filled when fewer are present
fn parse_numbers<const N: usize>(text: &str) -> Option<[f64; N]> {
    let mut values = [0.0; N];
    for (slot, part) in values.iter_mut().zip(text.split_whitespace()) {
        *slot = part.parse().ok()?;
    }
    Some(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn test_parse_bounds() {
        let b = parse_bounds(Some("0 0 100 200"));
        assert_eq!(b, Bounds::new(0.0, 0.0, 100.0, 200.0));
        assert!(approx(b.width(), 200.0));
        assert!(approx(b.height(), 100.0));
    }

    #[test]
    fn test_parse_bounds_fallbacks() {
        assert_eq!(parse_bounds(None), Bounds::ZERO);
        assert_eq!(parse_bounds(Some("")), Bounds::ZERO);
        assert_eq!(parse_bounds(Some("1 2 abc 4")), Bounds::ZERO);
    }

    #[test]
    fn test_short_text_is_zero_filled() {
        assert_eq!(parse_bounds(Some("1 2 3")), Bounds::new(1.0, 2.0, 3.0, 0.0));
        assert_eq!(
            parse_transform(Some("2 0 0 2")),
            Transform::new(2.0, 0.0, 0.0, 2.0, 0.0, 0.0)
        );
        assert_eq!(
            parse_transform(Some("1 0 0 1 5 6 7")),
            Transform::translation(5.0, 6.0)
        );
    }

    #[test]
    fn test_parse_transform() {
        assert_eq!(parse_transform(None), Transform::IDENTITY);
        assert_eq!(parse_transform(Some("  ")), Transform::IDENTITY);
        assert_eq!(parse_transform(Some("1 0 x 1 0 0")), Transform::IDENTITY);
        assert_eq!(
            parse_transform(Some("1 0 0 1 -306 -396")),
            Transform::translation(-306.0, -396.0)
        );
        assert_eq!(Transform::IDENTITY.to_array(), [1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_compose_order() {
        let translate = Transform::translation(10.0, 20.0);
        let scale = Transform::scale(2.0, 3.0);

        // scale first, then translate
        let t = compose(&translate, &scale);
        assert_eq!(t.apply(1.0, 1.0), (12.0, 23.0));

        // translate first, then scale
        let t = compose(&scale, &translate);
        assert_eq!(t.apply(1.0, 1.0), (22.0, 63.0));
    }

    #[test]
    fn test_compose_then_apply_matches_sequential() {
        let parent = Transform::new(0.0, 1.0, -1.0, 0.0, 5.0, 7.0);
        let child = Transform::new(2.0, 0.5, 0.25, 3.0, -4.0, 9.0);
        let combined = compose(&parent, &child);
        let (cx, cy) = child.apply(3.0, -2.0);
        let (ex, ey) = parent.apply(cx, cy);
        let (x, y) = combined.apply(3.0, -2.0);
        assert!(approx(x, ex));
        assert!(approx(y, ey));
    }

    #[test]
    fn test_apply_identity() {
        assert_eq!(apply(&Transform::IDENTITY, 3.5, -8.0), (3.5, -8.0));
    }

    #[test]
    fn test_translated_is_new_value() {
        let t = Transform::translation(1.0, 2.0);
        let moved = t.translated(10.0, 20.0);
        assert_eq!(t, Transform::translation(1.0, 2.0));
        assert_eq!(moved, Transform::translation(11.0, 22.0));
    }

    #[test]
    fn test_is_contained() {
        let page = Bounds::new(0.0, 0.0, 100.0, 100.0);
        let shape = Bounds::new(0.0, 0.0, 10.0, 10.0);
        assert!(is_contained(
            &shape,
            &Transform::IDENTITY,
            &page,
            &Transform::IDENTITY
        ));

        // center at (205, 5): outside
        let moved = Transform::translation(200.0, 0.0);
        assert!(!is_contained(&shape, &moved, &page, &Transform::IDENTITY));
    }

    #[test]
    fn test_is_contained_edge_inclusive() {
        let page = Bounds::new(0.0, 0.0, 100.0, 100.0);
        // center lands exactly on the right edge
        let shape = Bounds::new(0.0, 90.0, 10.0, 110.0);
        assert!(is_contained(
            &shape,
            &Transform::IDENTITY,
            &page,
            &Transform::IDENTITY
        ));
    }

    #[test]
    fn test_is_contained_flipped_page() {
        let page = Bounds::new(0.0, 0.0, 100.0, 100.0);
        let flip = Transform::new(-1.0, 0.0, 0.0, -1.0, 0.0, 0.0);
        let shape = Bounds::new(-60.0, -60.0, -40.0, -40.0);
        assert!(is_contained(&shape, &Transform::IDENTITY, &page, &flip));
    }

    #[test]
    fn test_transformed_box_rotation() {
        let b = Bounds::new(0.0, 0.0, 10.0, 20.0);
        let rot90 = Transform::new(0.0, 1.0, -1.0, 0.0, 0.0, 0.0);
        assert!(approx(b.transformed_width(&rot90), 10.0));
        assert!(approx(b.transformed_height(&rot90), 20.0));
        assert!(approx(rot90.rotation_degrees(), 90.0));
    }

    #[test]
    fn test_enclosing() {
        let pts = [Point::new(5.0, -2.0), Point::new(-1.0, 8.0), Point::new(3.0, 3.0)];
        assert_eq!(
            Bounds::enclosing(pts),
            Some(Bounds::new(-2.0, -1.0, 8.0, 5.0))
        );
        assert_eq!(Bounds::enclosing(std::iter::empty()), None);
    }

    #[test]
    fn test_page_relative_position() {
        let page = Bounds::new(0.0, 0.0, 792.0, 612.0);
        let page_t = Transform::translation(-612.0, -396.0);
        let frame = Bounds::new(36.0, 36.0, 100.0, 300.0);
        let frame_t = Transform::translation(-612.0, -396.0);
        let rel = page_relative_position(&frame, &frame_t, &page, &page_t);
        assert_eq!(rel, Point::new(36.0, 36.0));
    }

    #[test]
    fn test_point_parse() {
        assert_eq!(Point::parse("1.5 -2"), Some(Point::new(1.5, -2.0)));
        assert_eq!(Point::parse("1.5"), None);
        assert_eq!(Point::parse("a b"), None);
    }
}
