//! Spread flattening
//!
//! A spread file nests frames and shapes inside arbitrarily deep `Group`
//! elements. [`SpreadFlattener`] walks that tree once, folds every group
//! transform into its descendants and collects everything into flat
//! per-spread lists. Image frames and vector shapes receive a z-order from a
//! counter that runs across the whole spread, nested groups included.

use std::collections::BTreeSet;

use roxmltree::Node;

use super::path::{find_placed_content, link_of, parse_path_geometry, resolve_bounds};
use crate::error::{IdmlError, Result};
use crate::geometry::{Bounds, Transform};
use crate::model::{
    ContentKind, CornerRadii, Graphic, Group, ImageFrame, Insets, LineCap, LineJoin, Margins,
    Page, ShapeKind, Spread, TextFrame, VectorShape,
};
use crate::xml::{
    attr, attr_f64, attr_f64_or, attr_string, attr_u32_or, child_elements, child_path,
    find_payload, first_child, parse_document, text_content, ElementKind,
};

/// `StrokeWeight` when the attribute is absent
pub const DEFAULT_STROKE_WEIGHT: f64 = 1.0;

/// `MiterLimit` when the attribute is absent
pub const DEFAULT_MITER_LIMIT: f64 = 4.0;

/// Flattens a `Spread` or `MasterSpread` element into a [`Spread`]
#[derive(Debug, Clone, Copy)]
pub struct SpreadFlattener<'a> {
    hidden_layers: &'a BTreeSet<String>,
}

impl<'a> SpreadFlattener<'a> {
    /// Create a flattener that drops items on `hidden_layers`
    #[inline]
    #[must_use = "creates a new flattener"]
    pub const fn new(hidden_layers: &'a BTreeSet<String>) -> Self {
        Self { hidden_layers }
    }

    /// Parse a spread or master spread file
    ///
    /// # Errors
    ///
    /// - `IdmlError::Xml` if the content is not well-formed
    /// - `IdmlError::InvalidStructure` if it holds no spread element
    pub fn parse_file(&self, content: &str, file: &str) -> Result<Spread> {
        let doc = parse_document(content, file)?;
        let node = find_payload(&doc, &[ElementKind::Spread, ElementKind::MasterSpread])
            .ok_or_else(|| IdmlError::structure(file, "no Spread or MasterSpread element"))?;
        Ok(self.flatten(node))
    }

    /// Flatten an already located spread element
    #[must_use = "returns the flattened spread"]
    pub fn flatten(&self, node: Node<'_, '_>) -> Spread {
        let mut spread = Spread::new(attr_string(node, "Self").unwrap_or_default());
        spread.transform = Transform::parse(attr(node, "ItemTransform"));

        let shapes = self.walk(node, &Transform::IDENTITY, None, &mut spread, 0);
        log::debug!(
            "Spread {}: {} pages, {} text frames, {} z-ordered shapes, {} groups",
            spread.id,
            spread.pages.len(),
            spread.text_frames.len(),
            shapes,
            spread.groups.len()
        );
        spread
    }

    fn is_hidden(&self, node: Node<'_, '_>) -> bool {
        attr(node, "ItemLayer").is_some_and(|layer| self.hidden_layers.contains(layer))
    }

    /// Visit the children of `parent`; returns the next free z-order
    fn walk(
        &self,
        parent: Node<'_, '_>,
        accumulated: &Transform,
        parent_group: Option<&str>,
        spread: &mut Spread,
        mut z_order: u32,
    ) -> u32 {
        for child in child_elements(parent) {
            if self.is_hidden(child) {
                log::debug!(
                    "Skipping {} {} on hidden layer",
                    child.tag_name().name(),
                    child.attribute("Self").unwrap_or("?")
                );
                continue;
            }

            match ElementKind::of(child) {
                ElementKind::Page => {
                    let mut page = parse_page(child);
                    page.transform = accumulated.compose(&page.transform);
                    spread.pages.push(page);
                }
                ElementKind::TextFrame => {
                    if let Some(mut frame) = parse_text_frame(child) {
                        frame.transform = accumulated.compose(&frame.transform);
                        spread.text_frames.push(frame);
                    }
                }
                kind @ (ElementKind::Rectangle
                | ElementKind::Polygon
                | ElementKind::Oval
                | ElementKind::GraphicLine) => {
                    if let Some(mut graphic) = parse_graphic(child, kind) {
                        graphic.set_transform(accumulated.compose(graphic.transform()));
                        graphic.set_z_order(z_order);
                        z_order += 1;
                        match graphic {
                            Graphic::Image(frame) => spread.image_frames.push(frame),
                            Graphic::Vector(shape) => spread.vector_shapes.push(shape),
                        }
                    }
                }
                ElementKind::Group => {
                    let local = Transform::parse(attr(child, "ItemTransform"));
                    let combined = accumulated.compose(&local);
                    let group = Group {
                        id: attr_string(child, "Self").unwrap_or_default(),
                        bounds: resolve_bounds(child),
                        transform: combined,
                        layer: attr_string(child, "ItemLayer"),
                        parent_group: parent_group.map(str::to_string),
                    };
                    let group_id = group.id.clone();
                    spread.groups.push(group);
                    z_order =
                        self.walk(child, &combined, Some(group_id.as_str()), spread, z_order);
                }
                _ => {}
            }
        }
        z_order
    }
}

/// Parse a `Page` element
#[must_use = "returns the parsed page"]
pub fn parse_page(node: Node<'_, '_>) -> Page {
    let mut page = Page {
        id: attr_string(node, "Self").unwrap_or_default(),
        name: attr_string(node, "Name"),
        bounds: Bounds::parse(attr(node, "GeometricBounds")),
        transform: Transform::parse(attr(node, "ItemTransform")),
        applied_master: attr_string(node, "AppliedMaster"),
        ..Page::default()
    };
    if let Some(pref) = first_child(node, "MarginPreference") {
        page.margins = Margins::new(
            attr_f64_or(pref, "Top", 0.0),
            attr_f64_or(pref, "Bottom", 0.0),
            attr_f64_or(pref, "Left", 0.0),
            attr_f64_or(pref, "Right", 0.0),
        );
        page.column_count = attr_u32_or(pref, "ColumnCount", 1);
        page.column_gutter = attr_f64_or(pref, "ColumnGutter", 0.0);
    }
    page
}

/// `"n"` is the IDML spelling of "no reference"
fn reference(node: Node<'_, '_>, name: &str) -> Option<String> {
    attr(node, name).filter(|v| *v != "n").map(str::to_string)
}

/// Parse a `TextFrame`; `None` for graphic placeholders (`ContentType="GraphicType"`)
#[must_use = "returns the parsed text frame"]
pub fn parse_text_frame(node: Node<'_, '_>) -> Option<TextFrame> {
    if attr(node, "ContentType") == Some("GraphicType") {
        log::debug!(
            "Dropping graphic placeholder frame {}",
            node.attribute("Self").unwrap_or("?")
        );
        return None;
    }

    let mut frame = TextFrame {
        id: attr_string(node, "Self").unwrap_or_default(),
        parent_story: reference(node, "ParentStory"),
        bounds: resolve_bounds(node),
        transform: Transform::parse(attr(node, "ItemTransform")),
        layer: attr_string(node, "ItemLayer"),
        object_style: attr_string(node, "AppliedObjectStyle"),
        fill_color: attr_string(node, "FillColor"),
        stroke_color: attr_string(node, "StrokeColor"),
        stroke_weight: attr_f64(node, "StrokeWeight"),
        previous_frame: reference(node, "PreviousTextFrame"),
        next_frame: reference(node, "NextTextFrame"),
        column_count: 1,
        ..TextFrame::default()
    };

    if let Some(pref) = first_child(node, "TextFramePreference") {
        frame.column_count = attr_u32_or(pref, "TextColumnCount", 1);
        frame.column_gutter = attr_f64(pref, "TextColumnGutter");
        frame.vertical_justification = attr_string(pref, "VerticalJustification");
        frame.inset_spacing = parse_inset_spacing(pref);
    }
    Some(frame)
}

/// `InsetSpacing` as a four-item list `[top, left, bottom, right]` or a single value
fn parse_inset_spacing(pref: Node<'_, '_>) -> Option<Insets> {
    let node = child_path(pref, &["Properties", "InsetSpacing"])?;
    let items: Vec<f64> = child_elements(node)
        .filter_map(|item| text_content(item).trim().parse().ok())
        .collect();
    match items.as_slice() {
        [top, left, bottom, right] => Some(Insets {
            top: *top,
            bottom: *bottom,
            left: *left,
            right: *right,
        }),
        [] => text_content(node).trim().parse().ok().map(Insets::uniform),
        _ => None,
    }
}

fn shape_kind(kind: ElementKind) -> ShapeKind {
    match kind {
        ElementKind::Polygon => ShapeKind::Polygon,
        ElementKind::Oval => ShapeKind::Oval,
        ElementKind::GraphicLine => ShapeKind::GraphicLine,
        _ => ShapeKind::Rectangle,
    }
}

/// Parse a frame-like element as an image frame or a vector shape
///
/// `Rectangle`, `Polygon` and `Oval` holding `Image`/`PDF`/`EPS` content become
/// image frames; everything else becomes a vector shape. The transform is
/// the element's own local `ItemTransform` and the z-order is left at 0.
/// Returns `None` for element kinds that are not shapes.
#[must_use = "returns the parsed graphic"]
pub fn parse_graphic(node: Node<'_, '_>, kind: ElementKind) -> Option<Graphic> {
    if kind.is_frame_shape() {
        if let Some((content_kind, content)) = find_placed_content(node) {
            return Some(Graphic::Image(parse_image_frame(
                node,
                kind,
                content_kind,
                content,
            )));
        }
    } else if kind != ElementKind::GraphicLine {
        return None;
    }
    Some(Graphic::Vector(parse_vector_shape(node, kind)))
}

fn parse_image_frame(
    node: Node<'_, '_>,
    kind: ElementKind,
    content_kind: ElementKind,
    content: Node<'_, '_>,
) -> ImageFrame {
    let link = link_of(content);
    let link_attr = |name: &str| link.and_then(|l| attr_string(l, name));
    let graphic_bounds = child_path(content, &["Properties", "GraphicBounds"]).map(|gb| {
        Bounds::new(
            attr_f64_or(gb, "Top", 0.0),
            attr_f64_or(gb, "Left", 0.0),
            attr_f64_or(gb, "Bottom", 0.0),
            attr_f64_or(gb, "Right", 0.0),
        )
    });

    ImageFrame {
        id: attr_string(node, "Self").unwrap_or_default(),
        kind: shape_kind(kind),
        bounds: resolve_bounds(node),
        transform: Transform::parse(attr(node, "ItemTransform")),
        layer: attr_string(node, "ItemLayer"),
        object_style: attr_string(node, "AppliedObjectStyle"),
        content: match content_kind {
            ElementKind::Pdf => ContentKind::Pdf,
            ElementKind::Eps => ContentKind::Eps,
            _ => ContentKind::Image,
        },
        link_uri: link_attr("LinkResourceURI"),
        stored_state: link_attr("StoredState"),
        link_format: link_attr("LinkResourceFormat"),
        image_transform: Transform::parse(attr(content, "ItemTransform")),
        graphic_bounds,
        z_order: 0,
        inline_story: None,
    }
}

fn parse_vector_shape(node: Node<'_, '_>, kind: ElementKind) -> VectorShape {
    VectorShape {
        id: attr_string(node, "Self").unwrap_or_default(),
        kind: shape_kind(kind),
        bounds: resolve_bounds(node),
        transform: Transform::parse(attr(node, "ItemTransform")),
        layer: attr_string(node, "ItemLayer"),
        object_style: attr_string(node, "AppliedObjectStyle"),
        fill_color: attr_string(node, "FillColor"),
        fill_tint: attr_f64(node, "FillTint"),
        stroke_color: attr_string(node, "StrokeColor"),
        stroke_weight: attr_f64_or(node, "StrokeWeight", DEFAULT_STROKE_WEIGHT),
        stroke_type: attr_string(node, "StrokeType"),
        line_cap: LineCap::parse(attr(node, "EndCap")),
        line_join: LineJoin::parse(attr(node, "EndJoin")),
        miter_limit: attr_f64_or(node, "MiterLimit", DEFAULT_MITER_LIMIT),
        corner_radii: parse_corner_radii(node),
        path: parse_path_geometry(node),
        z_order: 0,
        inline_story: None,
    }
}

/// Radii of corners whose `*CornerOption` is set and not `None`
fn parse_corner_radii(node: Node<'_, '_>) -> Option<CornerRadii> {
    let radius = |corner: &str| {
        let option = attr(node, &format!("{corner}CornerOption"))?;
        if option == "None" {
            return None;
        }
        attr_f64(node, &format!("{corner}CornerRadius")).filter(|r| *r > 0.0)
    };
    let (tl, tr, bl, br) = (
        radius("TopLeft"),
        radius("TopRight"),
        radius("BottomLeft"),
        radius("BottomRight"),
    );
    if tl.is_none() && tr.is_none() && bl.is_none() && br.is_none() {
        return None;
    }
    Some(CornerRadii {
        top_left: tl.unwrap_or(0.0),
        top_right: tr.unwrap_or(0.0),
        bottom_left: bl.unwrap_or(0.0),
        bottom_right: br.unwrap_or(0.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPREAD: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<idPkg:Spread xmlns:idPkg="http://ns.adobe.com/AdobeInDesign/idml/1.0/packaging" DOMVersion="18.0">
  <Spread Self="ub6" PageCount="1" ItemTransform="1 0 0 1 0 0">
    <Page Self="ub7" Name="1" AppliedMaster="uc4" GeometricBounds="0 0 792 612" ItemTransform="1 0 0 1 -306 -396">
      <MarginPreference ColumnCount="2" ColumnGutter="12" Top="36" Bottom="36" Left="36" Right="36"/>
    </Page>
    <TextFrame Self="uf1" ParentStory="u10e" PreviousTextFrame="n" NextTextFrame="uf9" ContentType="TextType" GeometricBounds="0 0 100 200" ItemTransform="1 0 0 1 -270 -360" ItemLayer="ub3">
      <TextFramePreference TextColumnCount="2" TextColumnGutter="9" VerticalJustification="CenterAlign">
        <Properties>
          <InsetSpacing type="list"><ListItem type="unit">1</ListItem><ListItem type="unit">2</ListItem><ListItem type="unit">3</ListItem><ListItem type="unit">4</ListItem></InsetSpacing>
        </Properties>
      </TextFramePreference>
    </TextFrame>
    <TextFrame Self="uf2" ContentType="GraphicType" GeometricBounds="0 0 10 10"/>
    <Rectangle Self="ur1" GeometricBounds="0 0 50 50" ItemTransform="1 0 0 1 -200 -200" FillColor="Color/Red" TopLeftCornerOption="RoundedCorner" TopLeftCornerRadius="6" TopRightCornerOption="None" TopRightCornerRadius="12"/>
    <Rectangle Self="ur2" ItemTransform="1 0 0 1 0 0">
      <Properties>
        <PathGeometry>
          <GeometryPathType PathOpen="false">
            <PathPointArray>
              <PathPointType Anchor="10 10"/><PathPointType Anchor="90 10"/><PathPointType Anchor="90 40"/>
            </PathPointArray>
          </GeometryPathType>
        </PathGeometry>
      </Properties>
      <Image Self="ui1" ItemTransform="0.5 0 0 0.5 10 10">
        <Properties><GraphicBounds Left="0" Top="0" Right="400" Bottom="300"/></Properties>
        <Link Self="ul1" LinkResourceURI="file:/images/photo.jpg" StoredState="Normal" LinkResourceFormat="$ID/JPEG"/>
      </Image>
    </Rectangle>
    <Group Self="ug1" ItemTransform="1 0 0 1 100 50">
      <GraphicLine Self="ul2" GeometricBounds="0 0 0 100" StrokeWeight="2" EndCap="RoundEndCap"/>
      <Group Self="ug2" ItemTransform="2 0 0 2 10 0">
        <Oval Self="uo1" GeometricBounds="0 0 10 10" ItemTransform="1 0 0 1 5 5"/>
        <Polygon Self="up1" GeometricBounds="0 0 10 10" ItemLayer="ub4"/>
      </Group>
      <TextFrame Self="uf3" ParentStory="u200" GeometricBounds="0 0 20 20"/>
    </Group>
    <Group Self="ug3" ItemLayer="ub4">
      <Rectangle Self="ur9" GeometricBounds="0 0 10 10"/>
    </Group>
    <Polygon Self="up2" GeometricBounds="0 0 10 10"/>
  </Spread>
</idPkg:Spread>"#;

    fn hidden() -> BTreeSet<String> {
        BTreeSet::from(["ub4".to_string()])
    }

    fn flatten(content: &str) -> Spread {
        let hidden = hidden();
        SpreadFlattener::new(&hidden)
            .parse_file(content, "Spreads/Spread_ub6.xml")
            .unwrap()
    }

    #[test]
    fn test_pages_and_margins() {
        let spread = flatten(SPREAD);
        assert_eq!(spread.id, "ub6");
        assert_eq!(spread.pages.len(), 1);
        let page = &spread.pages[0];
        assert_eq!(page.id, "ub7");
        assert_eq!(page.name.as_deref(), Some("1"));
        assert_eq!(page.applied_master.as_deref(), Some("uc4"));
        assert_eq!(page.margins, Margins::new(36.0, 36.0, 36.0, 36.0));
        assert_eq!(page.column_count, 2);
        assert!((page.column_gutter - 12.0).abs() < f64::EPSILON);
        assert_eq!(page.transform, Transform::translation(-306.0, -396.0));
        assert!(page.page_number.is_none());
    }

    #[test]
    fn test_text_frames() {
        let spread = flatten(SPREAD);
        let ids: Vec<_> = spread.text_frames.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["uf1", "uf3"]);

        let frame = &spread.text_frames[0];
        assert_eq!(frame.parent_story.as_deref(), Some("u10e"));
        assert_eq!(frame.previous_frame, None);
        assert_eq!(frame.next_frame.as_deref(), Some("uf9"));
        assert_eq!(frame.column_count, 2);
        assert_eq!(frame.column_gutter, Some(9.0));
        assert_eq!(frame.vertical_justification.as_deref(), Some("CenterAlign"));
        assert_eq!(
            frame.inset_spacing,
            Some(Insets {
                top: 1.0,
                left: 2.0,
                bottom: 3.0,
                right: 4.0
            })
        );

        // frame inside the group picks up the group translation
        assert_eq!(spread.text_frames[1].transform, Transform::translation(100.0, 50.0));
    }

    #[test]
    fn test_image_frame() {
        let spread = flatten(SPREAD);
        assert_eq!(spread.image_frames.len(), 1);
        let image = &spread.image_frames[0];
        assert_eq!(image.id, "ur2");
        assert_eq!(image.content, ContentKind::Image);
        assert_eq!(image.link_uri.as_deref(), Some("file:/images/photo.jpg"));
        assert_eq!(image.stored_state.as_deref(), Some("Normal"));
        assert_eq!(image.link_format.as_deref(), Some("$ID/JPEG"));
        assert!(!image.is_embedded());
        assert_eq!(image.image_transform, Transform::new(0.5, 0.0, 0.0, 0.5, 10.0, 10.0));
        assert_eq!(image.graphic_bounds, Some(Bounds::new(0.0, 0.0, 300.0, 400.0)));
        // no GeometricBounds: box around the path anchors
        assert_eq!(image.bounds, Bounds::new(10.0, 10.0, 40.0, 90.0));
    }

    #[test]
    fn test_z_order_runs_through_groups() {
        let spread = flatten(SPREAD);
        let mut ordered: Vec<(u32, &str)> = spread
            .image_frames
            .iter()
            .map(|f| (f.z_order, f.id.as_str()))
            .chain(spread.vector_shapes.iter().map(|s| (s.z_order, s.id.as_str())))
            .collect();
        ordered.sort_unstable();
        assert_eq!(
            ordered,
            vec![(0, "ur1"), (1, "ur2"), (2, "ul2"), (3, "uo1"), (4, "up2")]
        );
    }

    #[test]
    fn test_hidden_layers_are_absent() {
        let spread = flatten(SPREAD);
        let ids: Vec<_> = spread.vector_shapes.iter().map(|s| s.id.as_str()).collect();
        assert!(!ids.contains(&"up1"));
        assert!(!ids.contains(&"ur9"));
        assert!(spread.groups.iter().all(|g| g.id != "ug3"));
    }

    #[test]
    fn test_nested_group_composition() {
        let spread = flatten(SPREAD);
        let oval = spread.vector_shapes.iter().find(|s| s.id == "uo1").unwrap();
        // outer translate(100, 50) then scale 2 + translate(10, 0) then translate(5, 5)
        assert_eq!(oval.transform, Transform::new(2.0, 0.0, 0.0, 2.0, 120.0, 60.0));
        assert_eq!(oval.kind, ShapeKind::Oval);

        let inner = spread.groups.iter().find(|g| g.id == "ug2").unwrap();
        assert_eq!(inner.parent_group.as_deref(), Some("ug1"));
    }

    #[test]
    fn test_vector_shape_attributes() {
        let spread = flatten(SPREAD);
        let line = spread.vector_shapes.iter().find(|s| s.id == "ul2").unwrap();
        assert_eq!(line.kind, ShapeKind::GraphicLine);
        assert!(line.is_line());
        assert!((line.stroke_weight - 2.0).abs() < f64::EPSILON);
        assert_eq!(line.line_cap, LineCap::Round);
        assert_eq!(line.line_join, LineJoin::Miter);
        assert!((line.miter_limit - DEFAULT_MITER_LIMIT).abs() < f64::EPSILON);

        let rect = spread.vector_shapes.iter().find(|s| s.id == "ur1").unwrap();
        assert_eq!(rect.fill_color.as_deref(), Some("Color/Red"));
        assert!((rect.stroke_weight - DEFAULT_STROKE_WEIGHT).abs() < f64::EPSILON);
        let radii = rect.corner_radii.unwrap();
        assert!((radii.top_left - 6.0).abs() < f64::EPSILON);
        assert!(radii.top_right.abs() < f64::EPSILON);
    }

    #[test]
    fn test_master_spread_payload() {
        let master = flatten(
            r#"<idPkg:MasterSpread xmlns:idPkg="p"><MasterSpread Self="uc4" Name="A-Master"><Page Self="uc5"/></MasterSpread></idPkg:MasterSpread>"#,
        );
        assert_eq!(master.id, "uc4");
        assert_eq!(master.pages.len(), 1);
        assert_eq!(master.pages[0].column_count, 1);
    }

    #[test]
    fn test_missing_spread_element() {
        let hidden = hidden();
        let err = SpreadFlattener::new(&hidden)
            .parse_file("<idPkg:Spread xmlns:idPkg=\"p\"/>", "Spreads/x.xml")
            .unwrap_err();
        assert!(matches!(err, IdmlError::InvalidStructure { .. }));
    }
}
