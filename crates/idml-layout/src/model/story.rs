//! Story content: paragraphs, character runs, inline frames

use serde::{Deserialize, Serialize};

use super::table::Table;

/// The text content of one or more linked text frames
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Story {
    /// Story ID (e.g., "u1000")
    pub id: String,
    /// Paragraphs in reading order, excluding those inside table cells
    pub paragraphs: Vec<Paragraph>,
    /// Tables in reading order
    pub tables: Vec<Table>,
}

impl Story {
    /// Create a new story with ID
    #[inline]
    #[must_use = "creates a new story with the given ID"]
    pub const fn new(id: String) -> Self {
        Self {
            id,
            paragraphs: Vec::new(),
            tables: Vec::new(),
        }
    }

    /// Add a paragraph to the story
    #[inline]
    pub fn add_paragraph(&mut self, paragraph: Paragraph) {
        self.paragraphs.push(paragraph);
    }

    /// Add a table to the story
    #[inline]
    pub fn add_table(&mut self, table: Table) {
        self.tables.push(table);
    }

    /// No tables and no paragraph with non-blank text
    #[must_use = "checks whether the story has content"]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
            && self
                .paragraphs
                .iter()
                .all(|p| p.plain_text().trim().is_empty())
    }

    /// Paragraph texts joined with newlines
    #[must_use = "returns the story text"]
    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Paragraph attributes set directly on a `ParagraphStyleRange`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParagraphOverrides {
    /// `Justification` (LeftAlign, CenterAlign, ...)
    pub justification: Option<String>,
    /// `FirstLineIndent`
    pub first_line_indent: Option<f64>,
    /// `LeftIndent`
    pub left_indent: Option<f64>,
    /// `RightIndent`
    pub right_indent: Option<f64>,
    /// `SpaceBefore`
    pub space_before: Option<f64>,
    /// `SpaceAfter`
    pub space_after: Option<f64>,
    /// Fixed `Properties/Leading`; `None` for auto
    pub leading: Option<f64>,
    /// `Tracking`
    pub tracking: Option<f64>,
}

/// One `ParagraphStyleRange`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// `AppliedParagraphStyle` reference
    pub style: Option<String>,
    /// Local overrides of the applied style
    pub overrides: ParagraphOverrides,
    /// Character runs in order
    pub runs: Vec<CharacterRun>,
}

impl Paragraph {
    /// Create a paragraph with an applied style
    #[inline]
    #[must_use = "creates a new paragraph"]
    pub fn with_style(style: Option<String>) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    /// Add a run to the paragraph
    #[inline]
    pub fn add_run(&mut self, run: CharacterRun) {
        self.runs.push(run);
    }

    /// Concatenated content of all runs
    #[must_use = "returns the paragraph text"]
    pub fn plain_text(&self) -> String {
        self.runs
            .iter()
            .filter_map(|r| r.content.as_deref())
            .collect()
    }

    /// Style name without the `ParagraphStyle/` prefix
    #[must_use = "returns the short style name"]
    pub fn style_name(&self) -> Option<&str> {
        self.style
            .as_deref()
            .map(|s| s.rsplit('/').next().unwrap_or(s))
    }
}

/// One `CharacterStyleRange`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterRun {
    /// `AppliedCharacterStyle` reference
    pub style: Option<String>,
    /// `Properties/AppliedFont`
    pub font_family: Option<String>,
    /// `PointSize`
    pub font_size: Option<f64>,
    /// `FontStyle`
    pub font_style: Option<String>,
    /// `FillColor`
    pub fill_color: Option<String>,
    /// `Position` (Normal, Superscript, Subscript, ...)
    pub position: Option<String>,
    /// Text of `Content` children with `Br` as newline; absent when empty
    pub content: Option<String>,
    /// Text frames anchored in this run
    pub inline_frames: Vec<InlineFrame>,
}

impl CharacterRun {
    /// `Position="Subscript"`
    #[inline]
    #[must_use = "checks the run position"]
    pub fn is_subscript(&self) -> bool {
        self.position.as_deref() == Some("Subscript")
    }

    /// `Position="Superscript"`
    #[inline]
    #[must_use = "checks the run position"]
    pub fn is_superscript(&self) -> bool {
        self.position.as_deref() == Some("Superscript")
    }
}

/// A `TextFrame` anchored inside a character run
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InlineFrame {
    /// `Self`
    pub id: String,
    /// `ParentStory`
    pub parent_story: Option<String>,
    /// `AppliedObjectStyle`
    pub object_style: Option<String>,
}
