//! Path geometry and bounds resolution

use roxmltree::Node;

use crate::geometry::{Bounds, Point};
use crate::model::{PathPoint, ShapePath, SubPath};
use crate::xml::{attr, attr_bool_or, child_path, descendants_named, first_child, ElementKind};

/// Read every `GeometryPathType` under `Properties/PathGeometry`
///
/// One path gives [`ShapePath::Simple`], several give
/// [`ShapePath::Compound`]. Missing handles default to the anchor; points
/// without a readable anchor are skipped.
#[must_use = "returns the parsed path"]
pub fn parse_path_geometry(node: Node<'_, '_>) -> ShapePath {
    let Some(geometry) = child_path(node, &["Properties", "PathGeometry"]) else {
        return ShapePath::None;
    };

    let subpaths = geometry
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "GeometryPathType")
        .map(parse_subpath)
        .collect();
    ShapePath::from_subpaths(subpaths)
}

fn parse_subpath(path: Node<'_, '_>) -> SubPath {
    let points = descendants_named(path, "PathPointType")
        .filter_map(parse_path_point)
        .collect();
    SubPath {
        points,
        open: attr_bool_or(path, "PathOpen", false),
    }
}

fn parse_path_point(node: Node<'_, '_>) -> Option<PathPoint> {
    let Some(anchor) = attr(node, "Anchor").and_then(Point::parse) else {
        log::debug!("Skipping path point without a valid Anchor");
        return None;
    };
    let handle = |name: &str| attr(node, name).and_then(Point::parse).unwrap_or(anchor);
    Some(PathPoint {
        anchor,
        left: handle("LeftDirection"),
        right: handle("RightDirection"),
    })
}

/// Local bounds of an element
///
/// Uses `GeometricBounds` when present, otherwise the box around every
/// descendant path anchor (untransformed), otherwise zero bounds.
#[must_use = "returns the resolved bounds"]
pub fn resolve_bounds(node: Node<'_, '_>) -> Bounds {
    if let Some(text) = attr(node, "GeometricBounds") {
        return Bounds::parse(Some(text));
    }
    let anchors = descendants_named(node, "PathPointType")
        .filter_map(|p| attr(p, "Anchor").and_then(Point::parse));
    Bounds::enclosing(anchors).unwrap_or(Bounds::ZERO)
}

/// `Image`/`PDF`/`EPS` descendant of a frame, probing in that order
#[must_use = "returns the placed content if any"]
pub fn find_placed_content<'a, 'input>(
    node: Node<'a, 'input>,
) -> Option<(ElementKind, Node<'a, 'input>)> {
    [ElementKind::Image, ElementKind::Pdf, ElementKind::Eps]
        .into_iter()
        .find_map(|kind| {
            node.descendants()
                .skip(1)
                .find(|n| ElementKind::of(*n) == kind)
                .map(|n| (kind, n))
        })
}

/// First `Link` child of placed content
#[must_use = "returns the link element if any"]
pub fn link_of<'a, 'input>(content: Node<'a, 'input>) -> Option<Node<'a, 'input>> {
    first_child(content, "Link")
}
