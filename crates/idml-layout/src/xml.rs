//! XML access helpers shared by the parsers
//!
//! Spread, master and story files are parsed whole into a `roxmltree`
//! document. Tag names are mapped once to [`ElementKind`] and matched on
//! that enum from then on. The flat designmap and resource files are read
//! with the `quick-xml` event reader; [`event_attr`] covers those.

use std::fs;
use std::path::Path;

use quick_xml::events::BytesStart;
use roxmltree::{Document, Node, ParsingOptions};

use crate::error::{IdmlError, Result};

/// IDML element tags the loader reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// `Spread`
    Spread,
    /// `MasterSpread`
    MasterSpread,
    /// `Page`
    Page,
    /// `TextFrame`
    TextFrame,
    /// `Rectangle`
    Rectangle,
    /// `Polygon`
    Polygon,
    /// `Oval`
    Oval,
    /// `GraphicLine`
    GraphicLine,
    /// `Group`
    Group,
    /// `Image`
    Image,
    /// `PDF`
    Pdf,
    /// `EPS`
    Eps,
    /// `Story`
    Story,
    /// `ParagraphStyleRange`
    ParagraphStyleRange,
    /// `CharacterStyleRange`
    CharacterStyleRange,
    /// `Content`
    Content,
    /// `Br`
    Br,
    /// `Table`
    Table,
    /// `TableStyleRange`
    TableStyleRange,
    /// `Row`
    Row,
    /// `Column`
    Column,
    /// `Cell`
    Cell,
    /// Anything else
    Other,
}

impl ElementKind {
    /// Classify an element by its local tag name
    #[must_use = "returns the element kind"]
    pub fn of(node: Node<'_, '_>) -> Self {
        if !node.is_element() {
            return Self::Other;
        }
        match node.tag_name().name() {
            "Spread" => Self::Spread,
            "MasterSpread" => Self::MasterSpread,
            "Page" => Self::Page,
            "TextFrame" => Self::TextFrame,
            "Rectangle" => Self::Rectangle,
            "Polygon" => Self::Polygon,
            "Oval" => Self::Oval,
            "GraphicLine" => Self::GraphicLine,
            "Group" => Self::Group,
            "Image" => Self::Image,
            "PDF" => Self::Pdf,
            "EPS" => Self::Eps,
            "Story" => Self::Story,
            "ParagraphStyleRange" => Self::ParagraphStyleRange,
            "CharacterStyleRange" => Self::CharacterStyleRange,
            "Content" => Self::Content,
            "Br" => Self::Br,
            "Table" => Self::Table,
            "TableStyleRange" => Self::TableStyleRange,
            "Row" => Self::Row,
            "Column" => Self::Column,
            "Cell" => Self::Cell,
            _ => Self::Other,
        }
    }

    /// `Rectangle`, `Polygon` or `Oval`: frames that may hold a placed image
    #[inline]
    #[must_use = "checks the element kind"]
    pub const fn is_frame_shape(self) -> bool {
        matches!(self, Self::Rectangle | Self::Polygon | Self::Oval)
    }

    /// `Image`, `PDF` or `EPS`: placed graphic content
    #[inline]
    #[must_use = "checks the element kind"]
    pub const fn is_placed_graphic(self) -> bool {
        matches!(self, Self::Image | Self::Pdf | Self::Eps)
    }
}

/// Read a package file relative to `base` into a string
///
/// # Errors
///
/// Returns `IdmlError::Io` if the file cannot be read.
pub fn read_package_file(base: &Path, relative: &str) -> Result<String> {
    Ok(fs::read_to_string(base.join(relative))?)
}

/// Parse XML text into a DOM, tagging failures with the package file name
///
/// # Errors
///
/// Returns `IdmlError::Xml` if the text is not well-formed XML.
pub fn parse_document<'input>(content: &'input str, file: &str) -> Result<Document<'input>> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    Document::parse_with_options(content, options).map_err(|e| IdmlError::xml(file, e))
}

/// First element named `name` (without namespace) in document order
///
/// Package files wrap their payload in a namespaced `idPkg:*` element that
/// shares the local name of the payload element, so the namespace check
/// selects the inner one.
#[must_use = "returns the matching element if any"]
pub fn find_payload<'a, 'input>(
    doc: &'a Document<'input>,
    kinds: &[ElementKind],
) -> Option<Node<'a, 'input>> {
    doc.descendants()
        .find(|n| n.tag_name().namespace().is_none() && kinds.contains(&ElementKind::of(*n)))
}

/// Element children of `node`
pub fn child_elements<'a, 'input: 'a>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children().filter(Node::is_element)
}

/// Element children of `node` of one kind
pub fn children_of_kind<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    kind: ElementKind,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    child_elements(node).filter(move |n| ElementKind::of(*n) == kind)
}

/// First element child with the given local name
#[must_use = "returns the matching child if any"]
pub fn first_child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    child_elements(node).find(|n| n.tag_name().name() == name)
}

/// Follow a path of local names through first children
#[must_use = "returns the element at the end of the path if any"]
pub fn child_path<'a, 'input>(node: Node<'a, 'input>, path: &[&str]) -> Option<Node<'a, 'input>> {
    path.iter()
        .try_fold(node, |current, name| first_child(current, name))
}

/// Descendant elements (excluding `node`) with the given local name
pub fn descendants_named<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.descendants()
        .skip(1)
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

/// Attribute value, `None` when absent or empty
#[inline]
#[must_use = "returns the attribute value if present"]
pub fn attr<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attribute(name).filter(|v| !v.is_empty())
}

/// Attribute value as an owned string, `None` when absent or empty
#[inline]
#[must_use = "returns the attribute value if present"]
pub fn attr_string(node: Node<'_, '_>, name: &str) -> Option<String> {
    attr(node, name).map(str::to_string)
}

/// Numeric attribute, `None` when absent or unparsable
#[must_use = "returns the parsed attribute if valid"]
pub fn attr_f64(node: Node<'_, '_>, name: &str) -> Option<f64> {
    let value = attr(node, name)?;
    match value.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            log::debug!("Ignoring non-numeric {name}={value:?}");
            None
        }
    }
}

/// Numeric attribute with a fallback
#[inline]
#[must_use = "returns the parsed attribute or the default"]
pub fn attr_f64_or(node: Node<'_, '_>, name: &str, default: f64) -> f64 {
    attr_f64(node, name).unwrap_or(default)
}

/// Unsigned integer attribute with a fallback
#[must_use = "returns the parsed attribute or the default"]
pub fn attr_u32_or(node: Node<'_, '_>, name: &str, default: u32) -> u32 {
    attr(node, name)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// `"true"` / `"false"` attribute with a fallback
#[inline]
#[must_use = "returns the parsed attribute or the default"]
pub fn attr_bool_or(node: Node<'_, '_>, name: &str, default: bool) -> bool {
    match attr(node, name) {
        Some("true") => true,
        Some("false") => false,
        _ => default,
    }
}

/// Concatenated text of every text node below `node`
#[must_use = "returns the collected text"]
pub fn text_content(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(Node::is_text)
        .filter_map(|n| n.text())
        .collect()
}

/// Trimmed text of a `<Properties>` child such as `<AppliedFont>`
///
/// Returns `None` when the property is missing or blank.
#[must_use = "returns the property text if present"]
pub fn property_text(node: Node<'_, '_>, property: &str) -> Option<String> {
    let props = first_child(node, "Properties")?;
    let text = text_content(first_child(props, property)?);
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Attribute of a `quick-xml` start tag, `None` when absent, empty or undecodable
#[must_use = "returns the attribute value if present"]
pub fn event_attr(element: &BytesStart<'_>, name: &str) -> Option<String> {
    let attr = element.try_get_attribute(name).ok().flatten()?;
    let value = attr.unescape_value().ok()?;
    (!value.is_empty()).then(|| value.into_owned())
}

/// Numeric attribute of a `quick-xml` start tag
#[must_use = "returns the parsed attribute if valid"]
pub fn event_attr_f64(element: &BytesStart<'_>, name: &str) -> Option<f64> {
    event_attr(element, name)?.trim().parse().ok()
}
