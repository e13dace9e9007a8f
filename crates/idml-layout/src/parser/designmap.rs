//! `designmap.xml` reader

use std::collections::BTreeSet;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{IdmlError, Result};
use crate::model::Section;
use crate::xml::event_attr;

/// Package file name of the designmap
pub const DESIGNMAP_FILE: &str = "designmap.xml";

/// Ordering and numbering information from `designmap.xml`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesignMap {
    /// `idPkg:Spread/@src`, in order
    pub spread_sources: Vec<String>,
    /// `idPkg:MasterSpread/@src`, in order
    pub master_sources: Vec<String>,
    /// `idPkg:Story/@src`, in order
    pub story_sources: Vec<String>,
    /// `Section` records, in order
    pub sections: Vec<Section>,
    /// `Self` of each `Layer` with `Visible="false"`
    pub hidden_layers: BTreeSet<String>,
}

impl DesignMap {
    /// Story ids derived from the story sources
    #[must_use = "returns the story ids"]
    pub fn story_ids(&self) -> Vec<String> {
        self.story_sources
            .iter()
            .filter_map(|src| story_id_from_source(src))
            .collect()
    }
}

/// `"Stories/Story_u1000.xml"` to `"u1000"`
#[must_use = "returns the story id if the name matches"]
pub fn story_id_from_source(src: &str) -> Option<String> {
    src.rsplit('/')
        .next()?
        .strip_prefix("Story_")?
        .strip_suffix(".xml")
        .map(str::to_string)
}

/// Package path of a story file
#[inline]
#[must_use = "returns the story file path"]
pub fn story_file(story_id: &str) -> String {
    format!("Stories/Story_{story_id}.xml")
}

/// Parse `designmap.xml` content
///
/// Only direct children of the root element are considered.
///
/// # Errors
///
/// Returns `IdmlError::Xml` if the content is not well-formed.
pub fn parse_designmap(content: &str) -> Result<DesignMap> {
    let mut reader = Reader::from_str(content);
    reader.trim_text(true);

    let mut map = DesignMap::default();
    let mut depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if depth == 1 {
                    handle_child(&e, &mut map);
                }
                depth += 1;
            }
            Ok(Event::Empty(e)) => {
                if depth == 1 {
                    handle_child(&e, &mut map);
                }
            }
            Ok(Event::End(_)) => depth = depth.saturating_sub(1),
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(IdmlError::xml(
                    DESIGNMAP_FILE,
                    format!("at position {}: {e}", reader.buffer_position()),
                ))
            }
            _ => {}
        }
    }

    log::debug!(
        "designmap: {} spreads, {} masters, {} stories, {} sections, {} hidden layers",
        map.spread_sources.len(),
        map.master_sources.len(),
        map.story_sources.len(),
        map.sections.len(),
        map.hidden_layers.len()
    );
    Ok(map)
}

fn handle_child(e: &BytesStart<'_>, map: &mut DesignMap) {
    match e.name().as_ref() {
        b"idPkg:Spread" => map.spread_sources.extend(event_attr(e, "src")),
        b"idPkg:MasterSpread" => map.master_sources.extend(event_attr(e, "src")),
        b"idPkg:Story" => map.story_sources.extend(event_attr(e, "src")),
        b"Section" => map.sections.push(parse_section(e)),
        b"Layer" => {
            if event_attr(e, "Visible").as_deref() == Some("false") {
                map.hidden_layers.extend(event_attr(e, "Self"));
            }
        }
        _ => {}
    }
}

fn parse_section(e: &BytesStart<'_>) -> Section {
    let number = |name: &str, default: u32| {
        event_attr(e, name)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    };
    Section {
        self_id: event_attr(e, "Self").unwrap_or_default(),
        page_start: event_attr(e, "PageStart"),
        page_number_start: number("PageNumberStart", 1),
        length: number("Length", 0),
        name: event_attr(e, "Name"),
        marker: event_attr(e, "Marker"),
    }
}
