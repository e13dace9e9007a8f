//! The loaded IDML document

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::TempDir;

use super::graphic::TextFrame;
use super::resource::{FontDef, Section, StyleDef};
use super::spread::{Page, Spread};
use super::story::Story;
use crate::error::Result;
use crate::options::PageRange;

/// A fully loaded IDML package
///
/// When the document was loaded from a zip package it owns the temporary
/// extraction directory. Call [`IdmlDocument::release`] once done with it;
/// dropping the document also removes the directory.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct IdmlDocument {
    /// Spreads in designmap order
    pub spreads: Vec<Spread>,
    /// Master spreads keyed by `Self`
    pub master_spreads: BTreeMap<String, Spread>,
    /// Fonts keyed by `Self`
    pub fonts: BTreeMap<String, FontDef>,
    /// Paragraph styles keyed by `Self`
    pub paragraph_styles: BTreeMap<String, StyleDef>,
    /// Character styles keyed by `Self`
    pub character_styles: BTreeMap<String, StyleDef>,
    /// Color swatches keyed by `Self`, as `#RRGGBB`
    pub colors: BTreeMap<String, String>,
    /// Layers with `Visible="false"`
    pub hidden_layers: BTreeSet<String>,
    /// Numbering sections in designmap order
    pub sections: Vec<Section>,
    /// Story ids listed in the designmap
    pub story_sources: Vec<String>,
    /// Stories referenced by at least one text frame
    pub stories: BTreeMap<String, Story>,
    /// Directory the package files were read from
    pub base_path: PathBuf,
    #[serde(skip)]
    temp_dir: Option<TempDir>,
}

impl IdmlDocument {
    /// Create an empty document rooted at `base_path`
    #[must_use = "creates a new document"]
    pub fn new(base_path: PathBuf) -> Self {
        Self {
            base_path,
            ..Self::default()
        }
    }

    pub(crate) fn attach_temp_dir(&mut self, dir: TempDir) {
        self.temp_dir = Some(dir);
    }

    /// Path of the extraction directory, if the document owns one
    #[must_use = "returns the temporary directory path"]
    pub fn temp_dir(&self) -> Option<&Path> {
        self.temp_dir.as_ref().map(TempDir::path)
    }

    /// Delete the extraction directory
    ///
    /// Only the first call does any work; later calls return `Ok(())`.
    ///
    /// # Errors
    ///
    /// Returns `IdmlError::Io` if the directory could not be removed.
    pub fn release(&mut self) -> Result<()> {
        if let Some(dir) = self.temp_dir.take() {
            log::debug!("Releasing {}", dir.path().display());
            dir.close()?;
        }
        Ok(())
    }

    /// Every page across spreads, in order
    pub fn all_pages(&self) -> impl Iterator<Item = &Page> {
        self.spreads.iter().flat_map(|s| s.pages.iter())
    }

    /// Number of pages across spreads
    #[must_use = "returns the page count"]
    pub fn total_page_count(&self) -> usize {
        self.spreads.iter().map(|s| s.pages.len()).sum()
    }

    /// Pages whose printed number falls inside `range`
    #[must_use = "returns the pages in range"]
    pub fn pages_in_range(&self, range: &PageRange) -> Vec<&Page> {
        self.all_pages()
            .filter(|p| p.page_number.is_some_and(|n| range.contains(n)))
            .collect()
    }

    /// Spread holding the page with `page_id`
    #[must_use = "returns the spread if found"]
    pub fn spread_of_page(&self, page_id: &str) -> Option<&Spread> {
        self.spreads.iter().find(|s| s.page(page_id).is_some())
    }

    /// Master spread by id
    #[must_use = "returns the master spread if found"]
    pub fn master_spread(&self, id: &str) -> Option<&Spread> {
        self.master_spreads.get(id)
    }

    /// Loaded story by id
    #[must_use = "returns the story if loaded"]
    pub fn story(&self, id: &str) -> Option<&Story> {
        self.stories.get(id)
    }

    /// Text frames (across spreads) showing `story_id`, in document order
    #[must_use = "returns the frames of the story"]
    pub fn frames_of_story(&self, story_id: &str) -> Vec<&TextFrame> {
        self.spreads
            .iter()
            .flat_map(|s| s.text_frames.iter())
            .filter(|f| f.parent_story.as_deref() == Some(story_id))
            .collect()
    }

    /// Font by `Self`
    #[must_use = "returns the font if found"]
    pub fn font(&self, id: &str) -> Option<&FontDef> {
        self.fonts.get(id)
    }

    /// Paragraph style by `Self`
    #[must_use = "returns the style if found"]
    pub fn paragraph_style(&self, id: &str) -> Option<&StyleDef> {
        self.paragraph_styles.get(id)
    }

    /// Character style by `Self`
    #[must_use = "returns the style if found"]
    pub fn character_style(&self, id: &str) -> Option<&StyleDef> {
        self.character_styles.get(id)
    }

    /// `#RRGGBB` of a color swatch
    #[must_use = "returns the color if found"]
    pub fn color(&self, id: &str) -> Option<&str> {
        self.colors.get(id).map(String::as_str)
    }

    /// Whether `layer_id` is hidden
    #[inline]
    #[must_use = "checks whether the layer is hidden"]
    pub fn is_layer_hidden(&self, layer_id: &str) -> bool {
        self.hidden_layers.contains(layer_id)
    }
}
