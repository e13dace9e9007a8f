//! Story parsing

use roxmltree::Node;

use super::inline::collect_inline_graphics;
use super::table::reconstruct_table;
use crate::error::{IdmlError, Result};
use crate::model::{
    CharacterRun, Graphic, InlineFrame, Leading, Paragraph, ParagraphOverrides, Story,
};
use crate::xml::{
    attr, attr_f64, attr_string, child_elements, children_of_kind, find_payload, parse_document,
    property_text, text_content, ElementKind,
};

/// A parsed story plus the anchored graphics found in its runs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedStory {
    /// Text and tables
    pub story: Story,
    /// Anchored graphics, transforms composed with their enclosing groups
    pub inline_graphics: Vec<Graphic>,
}

/// Parse a `Stories/Story_<id>.xml` file
///
/// # Errors
///
/// - `IdmlError::Xml` if the content is not well-formed
/// - `IdmlError::InvalidStructure` if it holds no `Story` element
pub fn parse_story(content: &str, file: &str, story_id: &str) -> Result<ParsedStory> {
    let doc = parse_document(content, file)?;
    let node = find_payload(&doc, &[ElementKind::Story])
        .ok_or_else(|| IdmlError::structure(file, "no Story element"))?;

    let mut story = Story::new(story_id.to_string());
    for element in node.descendants().skip(1) {
        match ElementKind::of(element) {
            ElementKind::ParagraphStyleRange if !inside_cell(element) => {
                story.add_paragraph(parse_paragraph(element));
            }
            ElementKind::Table if !inside_cell(element) => {
                story.add_table(reconstruct_table(element));
            }
            _ => {}
        }
    }

    let inline_graphics = collect_inline_graphics(node, story_id);
    log::debug!(
        "Story {story_id}: {} paragraphs, {} tables, {} inline graphics",
        story.paragraphs.len(),
        story.tables.len(),
        inline_graphics.len()
    );
    Ok(ParsedStory {
        story,
        inline_graphics,
    })
}

fn inside_cell(node: Node<'_, '_>) -> bool {
    node.ancestors()
        .skip(1)
        .any(|a| ElementKind::of(a) == ElementKind::Cell)
}

/// Parse a `ParagraphStyleRange`
#[must_use = "returns the parsed paragraph"]
pub fn parse_paragraph(node: Node<'_, '_>) -> Paragraph {
    let mut paragraph = Paragraph::with_style(attr_string(node, "AppliedParagraphStyle"));
    paragraph.overrides = ParagraphOverrides {
        justification: attr_string(node, "Justification"),
        first_line_indent: attr_f64(node, "FirstLineIndent"),
        left_indent: attr_f64(node, "LeftIndent"),
        right_indent: attr_f64(node, "RightIndent"),
        space_before: attr_f64(node, "SpaceBefore"),
        space_after: attr_f64(node, "SpaceAfter"),
        leading: property_text(node, "Leading").and_then(|t| Leading::parse(&t).points()),
        tracking: attr_f64(node, "Tracking"),
    };
    for range in children_of_kind(node, ElementKind::CharacterStyleRange) {
        paragraph.add_run(parse_run(range));
    }
    paragraph
}

/// Parse a `CharacterStyleRange`
#[must_use = "returns the parsed run"]
pub fn parse_run(node: Node<'_, '_>) -> CharacterRun {
    let mut run = CharacterRun {
        style: attr_string(node, "AppliedCharacterStyle"),
        font_family: property_text(node, "AppliedFont"),
        font_size: attr_f64(node, "PointSize"),
        font_style: attr_string(node, "FontStyle"),
        fill_color: attr_string(node, "FillColor"),
        position: attr_string(node, "Position"),
        ..CharacterRun::default()
    };

    let mut text = String::new();
    for child in child_elements(node) {
        match ElementKind::of(child) {
            ElementKind::Content => text.push_str(&text_content(child)),
            ElementKind::Br => text.push('\n'),
            ElementKind::TextFrame => run.inline_frames.push(InlineFrame {
                id: attr_string(child, "Self").unwrap_or_default(),
                parent_story: attr(child, "ParentStory")
                    .filter(|s| *s != "n")
                    .map(str::to_string),
                object_style: attr_string(child, "AppliedObjectStyle"),
            }),
            _ => {}
        }
    }
    run.content = (!text.is_empty()).then_some(text);
    run
}
