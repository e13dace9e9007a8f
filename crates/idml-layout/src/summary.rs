//! Structure summary of a loaded document
//!
//! A flat, serializable view of spreads, pages and the frames placed on each
//! page, with page-relative positions. Used by the inspection CLI.

use serde::{Deserialize, Serialize};

use crate::geometry::{page_relative_position, BoundingBox, Bounds, Transform};
use crate::model::{IdmlDocument, Margins, Page, Spread};
use crate::options::PageRange;

/// What a summarized frame is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameKind {
    /// Text frame
    Text,
    /// Frame with placed image/PDF/EPS content
    Image,
    /// Vector shape
    Vector,
}

/// One frame on a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSummary {
    /// `Self`
    pub id: String,
    /// Frame kind
    pub kind: FrameKind,
    /// Left edge relative to the page
    pub x: f64,
    /// Top edge relative to the page
    pub y: f64,
    /// Transformed width
    pub width: f64,
    /// Transformed height
    pub height: f64,
    /// Paint order, for image frames and vector shapes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_order: Option<u32>,
    /// Story shown by a text frame, or owning an inline graphic
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story_id: Option<String>,
    /// Link URI of placed content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Anchored in story text
    pub inline: bool,
}

impl FrameSummary {
    fn new(id: &str, kind: FrameKind, bounds: &Bounds, transform: &Transform, page: &Page) -> Self {
        let position = page_relative_position(bounds, transform, &page.bounds, &page.transform);
        Self {
            id: id.to_string(),
            kind,
            x: position.x,
            y: position.y,
            width: bounds.transformed_width(transform),
            height: bounds.transformed_height(transform),
            z_order: None,
            story_id: None,
            link: None,
            inline: false,
        }
    }
}

/// One page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSummary {
    /// `Self`
    pub id: String,
    /// `Name`
    pub name: Option<String>,
    /// Printed page number
    pub page_number: Option<u32>,
    /// Width in points
    pub width: f64,
    /// Height in points
    pub height: f64,
    /// `[top, left, bottom, right]`
    pub geometric_bounds: [f64; 4],
    /// `[a, b, c, d, tx, ty]`
    pub item_transform: [f64; 6],
    /// Margins after master inheritance
    pub margins: Margins,
    /// Column count after master inheritance
    pub column_count: u32,
    /// Applied master spread
    pub master_spread: Option<String>,
    /// Frames whose center lies on the page
    pub frames: Vec<FrameSummary>,
}

/// One spread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadSummary {
    /// `Self`
    pub id: String,
    /// Number of pages
    pub page_count: usize,
    /// Number of text frames
    pub text_frame_count: usize,
    /// Number of image frames
    pub image_frame_count: usize,
    /// Number of vector shapes
    pub vector_count: usize,
    /// Number of groups flattened
    pub group_count: usize,
    /// Box enclosing all pages
    pub bounds: Option<BoundingBox>,
    /// Pages, restricted to the requested range
    pub pages: Vec<PageSummary>,
}

/// One master spread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterSummary {
    /// `Self`
    pub id: String,
    /// Number of pages
    pub page_count: usize,
    /// Number of text frames
    pub text_frame_count: usize,
    /// Number of image frames
    pub image_frame_count: usize,
    /// Number of vector shapes
    pub vector_count: usize,
    /// Number of groups flattened
    pub group_count: usize,
    /// Ids of document pages that apply this master
    pub applied_pages: Vec<String>,
}

/// Whole-document summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// Spreads with at least one page in range
    pub spreads: Vec<SpreadSummary>,
    /// Master spreads
    pub master_spreads: Vec<MasterSummary>,
    /// Pages in range
    pub total_pages: usize,
    /// Text frames across all spreads
    pub total_text_frames: usize,
    /// Image frames across all spreads
    pub total_image_frames: usize,
    /// Vector shapes across all spreads
    pub total_vector_shapes: usize,
    /// Tables across loaded stories
    pub total_tables: usize,
    /// Loaded stories
    pub total_stories: usize,
}

impl DocumentSummary {
    /// Summarize every page of `document`
    #[must_use = "returns the document summary"]
    pub fn from_document(document: &IdmlDocument) -> Self {
        Self::for_pages(document, &PageRange::all())
    }

    /// Summarize the pages of `document` whose printed number is in `range`
    #[must_use = "returns the document summary"]
    pub fn for_pages(document: &IdmlDocument, range: &PageRange) -> Self {
        let spreads: Vec<SpreadSummary> = document
            .spreads
            .iter()
            .map(|spread| summarize_spread(spread, range))
            .filter(|s| range.includes_all() || !s.pages.is_empty())
            .collect();

        let master_spreads = document
            .master_spreads
            .values()
            .map(|master| MasterSummary {
                id: master.id.clone(),
                page_count: master.pages.len(),
                text_frame_count: master.text_frames.len(),
                image_frame_count: master.image_frames.len(),
                vector_count: master.vector_shapes.len(),
                group_count: master.groups.len(),
                applied_pages: document
                    .all_pages()
                    .filter(|p| p.master_id() == Some(master.id.as_str()))
                    .map(|p| p.id.clone())
                    .collect(),
            })
            .collect();

        Self {
            total_pages: spreads.iter().map(|s| s.pages.len()).sum(),
            spreads,
            master_spreads,
            total_text_frames: document.spreads.iter().map(|s| s.text_frames.len()).sum(),
            total_image_frames: document.spreads.iter().map(|s| s.image_frames.len()).sum(),
            total_vector_shapes: document.spreads.iter().map(|s| s.vector_shapes.len()).sum(),
            total_tables: document.stories.values().map(|s| s.tables.len()).sum(),
            total_stories: document.stories.len(),
        }
    }

    /// Render as JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

fn summarize_spread(spread: &Spread, range: &PageRange) -> SpreadSummary {
    SpreadSummary {
        id: spread.id.clone(),
        page_count: spread.pages.len(),
        text_frame_count: spread.text_frames.len(),
        image_frame_count: spread.image_frames.len(),
        vector_count: spread.vector_shapes.len(),
        group_count: spread.groups.len(),
        bounds: spread.bounds(),
        pages: spread
            .pages
            .iter()
            .filter(|p| range.includes_all() || p.page_number.is_some_and(|n| range.contains(n)))
            .map(|page| summarize_page(spread, page))
            .collect(),
    }
}

fn summarize_page(spread: &Spread, page: &Page) -> PageSummary {
    let mut frames = Vec::new();

    for frame in spread.text_frames_on_page(page) {
        let mut summary =
            FrameSummary::new(&frame.id, FrameKind::Text, &frame.bounds, &frame.transform, page);
        summary.story_id.clone_from(&frame.parent_story);
        frames.push(summary);
    }

    let images = spread
        .image_frames_on_page(page)
        .into_iter()
        .chain(spread.inline_images_on_page(page));
    for image in images {
        let mut summary =
            FrameSummary::new(&image.id, FrameKind::Image, &image.bounds, &image.transform, page);
        summary.z_order = Some(image.z_order);
        summary.link.clone_from(&image.link_uri);
        summary.story_id.clone_from(&image.inline_story);
        summary.inline = image.is_inline();
        frames.push(summary);
    }

    let shapes = spread
        .vector_shapes_on_page(page)
        .into_iter()
        .chain(spread.inline_shapes_on_page(page));
    for shape in shapes {
        let mut summary =
            FrameSummary::new(&shape.id, FrameKind::Vector, &shape.bounds, &shape.transform, page);
        summary.z_order = Some(shape.z_order);
        summary.story_id.clone_from(&shape.inline_story);
        summary.inline = shape.is_inline();
        frames.push(summary);
    }

    PageSummary {
        id: page.id.clone(),
        name: page.name.clone(),
        page_number: page.page_number,
        width: page.width(),
        height: page.height(),
        geometric_bounds: page.bounds.to_array(),
        item_transform: page.transform.to_array(),
        margins: page.margins,
        column_count: page.column_count,
        master_spread: page.master_id().map(str::to_string),
        frames,
    }
}
