//! IDML package parsing
//!
//! One module per package part, plus the resolvers that run after parsing
//! and the [`IdmlLoader`] that ties them together.

pub mod designmap;
pub mod inline;
pub mod loader;
pub mod numbering;
pub mod package;
pub mod path;
pub mod resources;
pub mod spread;
pub mod story;
pub mod table;

pub use designmap::{parse_designmap, DesignMap};
pub use inline::{collect_inline_graphics, InlineGraphicResolver};
pub use loader::IdmlLoader;
pub use numbering::{MasterMarginResolver, PageNumberResolver};
pub use package::extract_package;
pub use resources::{color_to_hex, ResourceCatalog};
pub use spread::SpreadFlattener;
pub use story::{parse_story, ParsedStory};
pub use table::reconstruct_table;
