//! # idml-layout
//!
//! Loads `InDesign` Markup Language (IDML) packages into a document model
//! with fully resolved page geometry.
//!
//! IDML stores frames, shapes and tables as nested XML whose real position
//! and page membership only follow from composing per-element affine
//! transforms. This crate does that work once at load time:
//!
//! - **Geometry**: bounds/transform parsing, composition, center-point page
//!   containment ([`geometry`])
//! - **Spread flattening**: nested groups folded into flat per-spread lists
//!   with a spread-wide z-order ([`parser::SpreadFlattener`])
//! - **Tables**: rows rebuilt from the flattened `Cell` list
//!   ([`parser::reconstruct_table`])
//! - **Page numbers** from designmap sections and **margins** inherited from
//!   master spreads ([`parser::PageNumberResolver`],
//!   [`parser::MasterMarginResolver`])
//! - **Inline graphics**: shapes anchored in story text placed onto the
//!   spread of their owning text frame ([`parser::InlineGraphicResolver`])
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use idml_layout::{IdmlLoader, LoadOptions};
//!
//! let loader = IdmlLoader::with_options(LoadOptions::default());
//! let mut doc = loader.load("brochure.idml")?;
//!
//! for spread in &doc.spreads {
//!     for page in &spread.pages {
//!         println!(
//!             "page {:?}: {} frames, {} shapes",
//!             page.page_number,
//!             spread.text_frames_on_page(page).len(),
//!             spread.vector_shapes_on_page(page).len()
//!         );
//!     }
//! }
//!
//! // Delete the extraction directory
//! doc.release()?;
//! # Ok::<(), idml_layout::IdmlError>(())
//! ```
//!
//! ## Package layout
//!
//! ```text
//! document.idml/
//! ├── designmap.xml            # Spread/master/story order, sections, layers
//! ├── Resources/
//! │   ├── Fonts.xml            # Optional
//! │   ├── Styles.xml           # Optional
//! │   └── Graphic.xml          # Optional (color swatches)
//! ├── MasterSpreads/
//! ├── Spreads/
//! └── Stories/
//!     └── Story_<id>.xml       # Loaded only when a text frame references it
//! ```
//!
//! ## Error Handling
//!
//! ```rust,no_run
//! use idml_layout::{load_idml, ErrorPhase};
//!
//! match load_idml("document.idml") {
//!     Ok(doc) => println!("{} pages", doc.total_page_count()),
//!     Err(e) if e.phase() == ErrorPhase::Loading => eprintln!("cannot open: {e}"),
//!     Err(e) => eprintln!("bad content: {e}"),
//! }
//! ```

use std::path::Path;

/// Error types
pub mod error;
/// Affine geometry
pub mod geometry;
/// Document model
pub mod model;
/// Load configuration
pub mod options;
/// Package parsing and assembly
pub mod parser;
/// Structure summary
pub mod summary;
/// XML access helpers
pub mod xml;

pub use error::{ErrorPhase, IdmlError, Result};
pub use geometry::{BoundingBox, Bounds, Point, Transform};
pub use model::{
    Graphic, IdmlDocument, ImageFrame, Page, Spread, Story, Table, TextFrame, VectorShape,
};
pub use options::{LoadOptions, PageRange};
pub use parser::IdmlLoader;
pub use summary::DocumentSummary;

/// Load a package file or extracted directory with default options
///
/// # Errors
///
/// See [`IdmlLoader::load`].
#[must_use = "loading produces a result that should be handled"]
pub fn load_idml<P: AsRef<Path>>(path: P) -> Result<IdmlDocument> {
    IdmlLoader::new().load(path)
}
