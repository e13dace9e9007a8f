//! Load-time configuration

use serde::{Deserialize, Serialize};

/// Vertical distance (points) beyond which an inline graphic's coordinates
/// are taken as relative to its text frame rather than absolute.
pub const DEFAULT_INLINE_DISTANCE_THRESHOLD: f64 = 1000.0;

/// First z-order handed to inline graphics, above any spread-level shape
pub const DEFAULT_INLINE_Z_ORDER_BASE: u32 = 10_000;

/// Options controlling how an IDML package is loaded
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadOptions {
    /// See [`DEFAULT_INLINE_DISTANCE_THRESHOLD`]
    pub inline_distance_threshold: f64,

    /// See [`DEFAULT_INLINE_Z_ORDER_BASE`]
    pub inline_z_order_base: u32,

    /// Relocate anchored graphics found in story text onto their spreads
    pub resolve_inline_graphics: bool,

    /// Parse the stories referenced by text frames
    ///
    /// When disabled only page geometry is loaded and inline graphics are
    /// not resolved.
    pub load_stories: bool,
}

impl Default for LoadOptions {
    #[inline]
    fn default() -> Self {
        Self {
            inline_distance_threshold: DEFAULT_INLINE_DISTANCE_THRESHOLD,
            inline_z_order_base: DEFAULT_INLINE_Z_ORDER_BASE,
            resolve_inline_graphics: true,
            load_stories: true,
        }
    }
}

impl LoadOptions {
    /// Create options with a custom inline distance threshold
    #[inline]
    #[must_use = "returns options with the threshold configured"]
    pub const fn with_inline_distance_threshold(mut self, threshold: f64) -> Self {
        self.inline_distance_threshold = threshold;
        self
    }

    /// Create options with a custom inline z-order base
    #[inline]
    #[must_use = "returns options with the z-order base configured"]
    pub const fn with_inline_z_order_base(mut self, base: u32) -> Self {
        self.inline_z_order_base = base;
        self
    }

    /// Create options with inline graphic resolution toggled
    #[inline]
    #[must_use = "returns options with inline resolution configured"]
    pub const fn with_inline_graphics(mut self, enable: bool) -> Self {
        self.resolve_inline_graphics = enable;
        self
    }

    /// Create options with story loading toggled
    #[inline]
    #[must_use = "returns options with story loading configured"]
    pub const fn with_stories(mut self, enable: bool) -> Self {
        self.load_stories = enable;
        self
    }
}

/// Inclusive range of printed page numbers; `None` leaves that end open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRange {
    /// First printed page to include
    pub start: Option<u32>,
    /// Last printed page to include
    pub end: Option<u32>,
}

impl PageRange {
    /// Range covering every page
    #[inline]
    #[must_use = "creates an unbounded page range"]
    pub const fn all() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    /// Range from `start` to `end`, both inclusive
    #[inline]
    #[must_use = "creates a page range"]
    pub const fn new(start: Option<u32>, end: Option<u32>) -> Self {
        Self { start, end }
    }

    /// Whether a printed page number falls inside the range
    #[must_use = "returns whether the page is included"]
    pub fn contains(&self, page_number: u32) -> bool {
        self.start.map_or(true, |s| page_number >= s) && self.end.map_or(true, |e| page_number <= e)
    }

    /// Whether the range places no limit
    #[inline]
    #[must_use = "returns whether every page is included"]
    pub const fn includes_all(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Keep only the page numbers inside the range
    #[must_use = "returns the filtered page numbers"]
    pub fn filter(&self, page_numbers: &[u32]) -> Vec<u32> {
        page_numbers
            .iter()
            .copied()
            .filter(|n| self.contains(*n))
            .collect()
    }
}
