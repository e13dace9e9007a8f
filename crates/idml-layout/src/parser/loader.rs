//! Document assembly
//!
//! [`IdmlLoader`] drives the whole pipeline: designmap, resources, master
//! spreads, spreads (with margin inheritance and page numbering), the stories
//! referenced by text frames, and finally inline graphic placement.

use std::collections::BTreeSet;
use std::path::Path;

use super::designmap::{parse_designmap, story_file, DesignMap, DESIGNMAP_FILE};
use super::inline::InlineGraphicResolver;
use super::numbering::{MasterMarginResolver, PageNumberResolver};
use super::package::extract_package;
use super::resources::ResourceCatalog;
use super::spread::SpreadFlattener;
use super::story::parse_story;
use crate::error::{IdmlError, Result};
use crate::model::{Graphic, IdmlDocument, Spread};
use crate::options::LoadOptions;
use crate::xml::read_package_file;

/// Loads IDML packages and extracted package directories
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IdmlLoader {
    options: LoadOptions,
}

impl IdmlLoader {
    /// Create a loader with default options
    #[inline]
    #[must_use = "creates a new loader"]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a loader with custom options
    #[inline]
    #[must_use = "creates a new loader"]
    pub const fn with_options(options: LoadOptions) -> Self {
        Self { options }
    }

    /// Options in use
    #[inline]
    #[must_use = "returns the load options"]
    pub const fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Load a package file or an extracted package directory
    ///
    /// # Errors
    ///
    /// See [`IdmlLoader::load_package`] and [`IdmlLoader::load_directory`].
    #[must_use = "loading produces a result that should be handled"]
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<IdmlDocument> {
        let path = path.as_ref();
        if path.is_dir() {
            self.load_directory(path)
        } else {
            self.load_package(path)
        }
    }

    /// Extract a `.idml` zip into a temporary directory and load it
    ///
    /// On success the document owns the directory until
    /// [`IdmlDocument::release`] is called. On failure it is deleted before
    /// the error is returned.
    ///
    /// # Errors
    ///
    /// - `IdmlError::PackageNotFound` if `path` is not a file
    /// - `IdmlError::Extract` if it is not a zip archive
    /// - any error of [`IdmlLoader::load_directory`]
    #[must_use = "loading produces a result that should be handled"]
    pub fn load_package<P: AsRef<Path>>(&self, path: P) -> Result<IdmlDocument> {
        let path = path.as_ref();
        let temp_dir = extract_package(path)?;

        match self.load_directory(temp_dir.path()) {
            Ok(mut document) => {
                document.attach_temp_dir(temp_dir);
                Ok(document)
            }
            Err(e) => {
                if let Err(cleanup) = temp_dir.close() {
                    log::warn!("Failed to remove extraction directory: {cleanup}");
                }
                Err(e)
            }
        }
    }

    /// Load an extracted package directory in place
    ///
    /// Missing spread and story files are skipped with a warning. Resource
    /// files are optional.
    ///
    /// # Errors
    ///
    /// - `IdmlError::DirectoryNotFound` if `dir` is not a directory
    /// - `IdmlError::MissingDesignMap` if it has no `designmap.xml`
    /// - `IdmlError::Xml` / `IdmlError::InvalidStructure` for a malformed file
    /// - `IdmlError::Io` if a present file cannot be read
    #[must_use = "loading produces a result that should be handled"]
    pub fn load_directory<P: AsRef<Path>>(&self, dir: P) -> Result<IdmlDocument> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(IdmlError::DirectoryNotFound(dir.to_path_buf()));
        }
        if !dir.join(DESIGNMAP_FILE).is_file() {
            return Err(IdmlError::MissingDesignMap(dir.to_path_buf()));
        }

        let design_map = parse_designmap(&read_package_file(dir, DESIGNMAP_FILE)?)?;
        let mut document = IdmlDocument::new(dir.to_path_buf());

        let resources = ResourceCatalog::load(dir)?;
        document.fonts = resources.fonts;
        document.paragraph_styles = resources.paragraph_styles;
        document.character_styles = resources.character_styles;
        document.colors = resources.colors;

        let flattener = SpreadFlattener::new(&design_map.hidden_layers);
        for src in &design_map.master_sources {
            if let Some(master) = load_spread_file(dir, src, &flattener)? {
                document.master_spreads.insert(master.id.clone(), master);
            }
        }

        let margins = MasterMarginResolver::new(&document.master_spreads);
        let numbering = PageNumberResolver::new(&design_map.sections);
        let mut page_count = 0;
        let mut spreads = Vec::with_capacity(design_map.spread_sources.len());
        for src in &design_map.spread_sources {
            if let Some(mut spread) = load_spread_file(dir, src, &flattener)? {
                margins.apply_to_spread(&mut spread);
                page_count = numbering.number_pages(&mut spread, page_count);
                spreads.push(spread);
            }
        }
        document.spreads = spreads;

        if self.options.load_stories {
            self.load_stories(dir, &mut document)?;
        }

        document.story_sources = design_map.story_ids();
        let DesignMap {
            sections,
            hidden_layers,
            ..
        } = design_map;
        document.sections = sections;
        document.hidden_layers = hidden_layers;

        log::info!(
            "Loaded {}: {} spreads, {} pages, {} master spreads, {} stories",
            dir.display(),
            document.spreads.len(),
            document.total_page_count(),
            document.master_spreads.len(),
            document.stories.len()
        );
        Ok(document)
    }

    /// Parse the stories referenced by text frames, then place their inline
    /// graphics
    fn load_stories(&self, dir: &Path, document: &mut IdmlDocument) -> Result<()> {
        let mut inline: Vec<(String, Vec<Graphic>)> = Vec::new();

        for story_id in referenced_stories(&document.spreads) {
            let file = story_file(&story_id);
            if !dir.join(&file).is_file() {
                log::warn!("Story file {file} not found, skipping");
                continue;
            }
            let parsed = parse_story(&read_package_file(dir, &file)?, &file, &story_id)?;
            if !parsed.inline_graphics.is_empty() {
                inline.push((story_id.clone(), parsed.inline_graphics));
            }
            document.stories.insert(story_id, parsed.story);
        }

        if self.options.resolve_inline_graphics {
            let mut resolver = InlineGraphicResolver::new(&self.options);
            for (story_id, graphics) in inline {
                let placed = resolver.resolve(&mut document.spreads, &story_id, graphics);
                log::debug!("Placed {placed} inline graphics of story {story_id}");
            }
        }
        Ok(())
    }
}

/// Story ids referenced by text frames, first reference first
fn referenced_stories(spreads: &[Spread]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    spreads
        .iter()
        .flat_map(|s| &s.text_frames)
        .filter_map(|f| f.parent_story.as_deref())
        .filter(|id| seen.insert(*id))
        .map(str::to_string)
        .collect()
}

fn load_spread_file(
    dir: &Path,
    src: &str,
    flattener: &SpreadFlattener<'_>,
) -> Result<Option<Spread>> {
    if !dir.join(src).is_file() {
        log::warn!("Spread file {src} not found, skipping");
        return Ok(None);
    }
    let content = read_package_file(dir, src)?;
    flattener.parse_file(&content, src).map(Some)
}
