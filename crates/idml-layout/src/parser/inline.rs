//! Anchored graphics inside story text
//!
//! Shapes placed inside a `CharacterStyleRange` travel with the text and are
//! stored in the story file, not in a spread. Their coordinates are either
//! already spread-absolute or relative to the frame holding the text, and
//! nothing in the file says which. [`InlineGraphicResolver`] picks the
//! closest text frame of the story, decides between the two readings with a
//! distance threshold and moves the shape onto that frame's spread.

use roxmltree::Node;

use super::spread::parse_graphic;
use crate::geometry::Transform;
use crate::model::{Graphic, Spread};
use crate::options::LoadOptions;
use crate::xml::{attr, child_elements, ElementKind};

/// Anchored `Rectangle`/`Polygon`/`Oval` elements of a story
///
/// Group transforms met on the way are composed onto each graphic. The
/// returned graphics are tagged with `story_id` and not yet z-ordered.
#[must_use = "returns the anchored graphics"]
pub fn collect_inline_graphics(story: Node<'_, '_>, story_id: &str) -> Vec<Graphic> {
    let mut found = Vec::new();
    visit(story, &Transform::IDENTITY, false, story_id, &mut found);
    found
}

fn visit(
    node: Node<'_, '_>,
    accumulated: &Transform,
    in_run: bool,
    story_id: &str,
    found: &mut Vec<Graphic>,
) {
    for child in child_elements(node) {
        match ElementKind::of(child) {
            ElementKind::CharacterStyleRange => visit(child, accumulated, true, story_id, found),
            ElementKind::Group => {
                let local = Transform::parse(attr(child, "ItemTransform"));
                visit(child, &accumulated.compose(&local), in_run, story_id, found);
            }
            kind @ (ElementKind::Rectangle | ElementKind::Polygon | ElementKind::Oval) => {
                if !in_run {
                    continue;
                }
                if let Some(mut graphic) = parse_graphic(child, kind) {
                    graphic.set_transform(accumulated.compose(graphic.transform()));
                    graphic.mark_inline(story_id);
                    found.push(graphic);
                }
            }
            // paragraphs, tables, cells, XMLElement, notes and other wrappers
            _ => visit(child, accumulated, in_run, story_id, found),
        }
    }
}

/// The text frame chosen to host an inline graphic
#[derive(Debug, Clone, Copy, PartialEq)]
struct Host {
    spread: usize,
    tx: f64,
    ty: f64,
    distance: f64,
}

/// Places inline graphics onto the spreads of their owning text frames
///
/// Z-orders are handed out from one counter across the whole document,
/// starting at [`LoadOptions::inline_z_order_base`], so inline graphics
/// always paint above spread-level shapes.
#[derive(Debug, Clone)]
pub struct InlineGraphicResolver {
    threshold: f64,
    next_z_order: u32,
}

impl InlineGraphicResolver {
    /// Create a resolver from load options
    #[inline]
    #[must_use = "creates a resolver"]
    pub const fn new(options: &LoadOptions) -> Self {
        Self {
            threshold: options.inline_distance_threshold,
            next_z_order: options.inline_z_order_base,
        }
    }

    /// Z-order the next placed graphic will receive
    #[inline]
    #[must_use = "returns the next z-order"]
    pub const fn next_z_order(&self) -> u32 {
        self.next_z_order
    }

    /// Place the inline graphics of `story_id` onto `spreads`
    ///
    /// For each graphic the text frame of the same story whose vertical
    /// translation is closest to the graphic's is chosen. When that distance
    /// exceeds the threshold the graphic's coordinates are taken as relative
    /// to the frame and the frame's translation is added. Graphics of a story
    /// with no text frame are dropped.
    ///
    /// Returns the number of graphics placed.
    pub fn resolve(
        &mut self,
        spreads: &mut [Spread],
        story_id: &str,
        graphics: Vec<Graphic>,
    ) -> usize {
        let mut placed = 0;
        for mut graphic in graphics {
            let Some(host) = find_host(spreads, story_id, graphic.transform().ty) else {
                log::warn!(
                    "Inline graphic {} of story {story_id} has no owning text frame, skipping",
                    graphic.id()
                );
                continue;
            };

            if host.distance > self.threshold {
                log::debug!(
                    "Inline graphic {} is {:.1} from its frame, treating as frame-relative",
                    graphic.id(),
                    host.distance
                );
                graphic.set_transform(graphic.transform().translated(host.tx, host.ty));
            }
            graphic.set_z_order(self.next_z_order);
            self.next_z_order += 1;

            let Some(spread) = spreads.get_mut(host.spread) else {
                continue;
            };
            match graphic {
                Graphic::Image(frame) => spread.image_frames.push(frame),
                Graphic::Vector(shape) => spread.vector_shapes.push(shape),
            }
            placed += 1;
        }
        placed
    }
}

/// Text frame of `story_id` with the closest vertical translation to `ty`
fn find_host(spreads: &[Spread], story_id: &str, ty: f64) -> Option<Host> {
    spreads
        .iter()
        .enumerate()
        .flat_map(|(index, spread)| {
            spread
                .text_frames
                .iter()
                .filter(|f| f.parent_story.as_deref() == Some(story_id))
                .map(move |f| Host {
                    spread: index,
                    tx: f.transform.tx,
                    ty: f.transform.ty,
                    distance: (f.transform.ty - ty).abs(),
                })
        })
        .fold(None, |best: Option<Host>, candidate| match best {
            Some(b) if b.distance <= candidate.distance => Some(b),
            _ => Some(candidate),
        })
}
