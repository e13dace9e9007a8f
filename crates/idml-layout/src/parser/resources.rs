//! Resource catalog: fonts, styles and color swatches
//!
//! The three resource files are optional. A file that is absent leaves its
//! table empty; a file that is present but malformed is an error.

use std::collections::BTreeMap;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{IdmlError, Result};
use crate::model::{FontDef, Leading, StyleDef};
use crate::xml::{event_attr, event_attr_f64, read_package_file};

/// Package path of the font table
pub const FONTS_FILE: &str = "Resources/Fonts.xml";
/// Package path of the style table
pub const STYLES_FILE: &str = "Resources/Styles.xml";
/// Package path of the swatch table
pub const GRAPHIC_FILE: &str = "Resources/Graphic.xml";

/// Lookup tables built from the `Resources/` files
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceCatalog {
    /// Fonts keyed by `Self`
    pub fonts: BTreeMap<String, FontDef>,
    /// Paragraph styles keyed by `Self`
    pub paragraph_styles: BTreeMap<String, StyleDef>,
    /// Character styles keyed by `Self`
    pub character_styles: BTreeMap<String, StyleDef>,
    /// Colors keyed by `Self`, as `#RRGGBB`
    pub colors: BTreeMap<String, String>,
}

impl ResourceCatalog {
    /// Read whichever resource files exist under `base`
    ///
    /// # Errors
    ///
    /// Returns an error if a present file cannot be read or is malformed.
    pub fn load(base: &Path) -> Result<Self> {
        let mut catalog = Self::default();

        if let Some(content) = read_optional(base, FONTS_FILE)? {
            catalog.fonts = parse_fonts(&content)?;
        }
        if let Some(content) = read_optional(base, STYLES_FILE)? {
            let (paragraph, character) = parse_styles(&content)?;
            catalog.paragraph_styles = paragraph;
            catalog.character_styles = character;
        }
        if let Some(content) = read_optional(base, GRAPHIC_FILE)? {
            catalog.colors = parse_colors(&content)?;
        }

        log::debug!(
            "Resources: {} fonts, {} paragraph styles, {} character styles, {} colors",
            catalog.fonts.len(),
            catalog.paragraph_styles.len(),
            catalog.character_styles.len(),
            catalog.colors.len()
        );
        Ok(catalog)
    }
}

fn read_optional(base: &Path, relative: &str) -> Result<Option<String>> {
    if base.join(relative).is_file() {
        read_package_file(base, relative).map(Some)
    } else {
        log::debug!("{relative} not present, skipping");
        Ok(None)
    }
}

fn xml_error(file: &str, reader: &Reader<&[u8]>, err: &quick_xml::Error) -> IdmlError {
    IdmlError::xml(file, format!("at position {}: {err}", reader.buffer_position()))
}

/// Parse `Resources/Fonts.xml`
///
/// # Errors
///
/// Returns `IdmlError::Xml` if the content is not well-formed.
pub fn parse_fonts(content: &str) -> Result<BTreeMap<String, FontDef>> {
    let mut reader = Reader::from_str(content);
    reader.trim_text(true);

    let mut fonts = BTreeMap::new();
    let mut family = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"FontFamily" => {
                family = event_attr(&e, "Name").unwrap_or_default();
            }
            Ok(Event::Start(e) | Event::Empty(e)) if e.name().as_ref() == b"Font" => {
                let font = FontDef {
                    self_ref: event_attr(&e, "Self").unwrap_or_default(),
                    family: family.clone(),
                    style_name: event_attr(&e, "FontStyleName"),
                    postscript_name: event_attr(&e, "PostScriptName"),
                    font_type: event_attr(&e, "FontType"),
                };
                fonts.insert(font.self_ref.clone(), font);
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"FontFamily" => family.clear(),
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(FONTS_FILE, &reader, &e)),
            _ => {}
        }
    }
    Ok(fonts)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StyleKind {
    Paragraph,
    Character,
}

impl StyleKind {
    fn of(name: &[u8]) -> Option<Self> {
        match name {
            b"ParagraphStyle" => Some(Self::Paragraph),
            b"CharacterStyle" => Some(Self::Character),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StyleProperty {
    BasedOn,
    AppliedFont,
    Leading,
}

impl StyleProperty {
    fn of(name: &[u8]) -> Option<Self> {
        match name {
            b"BasedOn" => Some(Self::BasedOn),
            b"AppliedFont" => Some(Self::AppliedFont),
            b"Leading" => Some(Self::Leading),
            _ => None,
        }
    }
}

fn style_from_attributes(e: &BytesStart<'_>) -> StyleDef {
    let mut style = StyleDef {
        self_ref: event_attr(e, "Self").unwrap_or_default(),
        name: event_attr(e, "Name"),
        font_size: event_attr_f64(e, "PointSize"),
        fill_color: event_attr(e, "FillColor"),
        justification: event_attr(e, "Justification"),
        first_line_indent: event_attr_f64(e, "FirstLineIndent"),
        left_indent: event_attr_f64(e, "LeftIndent"),
        right_indent: event_attr_f64(e, "RightIndent"),
        space_before: event_attr_f64(e, "SpaceBefore"),
        space_after: event_attr_f64(e, "SpaceAfter"),
        horizontal_scale: event_attr_f64(e, "HorizontalScale"),
        tracking: event_attr_f64(e, "Tracking"),
        ..StyleDef::default()
    };
    style.set_font_style(event_attr(e, "FontStyle"));
    style
}

fn apply_property(style: &mut StyleDef, property: StyleProperty, text: &str) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    match property {
        StyleProperty::BasedOn => style.based_on = Some(text.to_string()),
        StyleProperty::AppliedFont => style.font_family = Some(text.to_string()),
        StyleProperty::Leading => style.leading = Some(Leading::parse(text)),
    }
}

type StyleTables = (BTreeMap<String, StyleDef>, BTreeMap<String, StyleDef>);

/// Parse `Resources/Styles.xml` into paragraph and character style tables
///
/// # Errors
///
/// Returns `IdmlError::Xml` if the content is not well-formed.
pub fn parse_styles(content: &str) -> Result<StyleTables> {
    let mut reader = Reader::from_str(content);
    reader.trim_text(true);

    let mut paragraph = BTreeMap::new();
    let mut character = BTreeMap::new();
    let mut current: Option<(StyleKind, StyleDef)> = None;
    let mut property: Option<(StyleProperty, String)> = None;

    let mut store = |kind: StyleKind, style: StyleDef| {
        let table = match kind {
            StyleKind::Paragraph => &mut paragraph,
            StyleKind::Character => &mut character,
        };
        table.insert(style.self_ref.clone(), style);
    };

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if let Some(kind) = StyleKind::of(e.name().as_ref()) {
                    current = Some((kind, style_from_attributes(&e)));
                } else if current.is_some() {
                    property = StyleProperty::of(e.name().as_ref()).map(|p| (p, String::new()));
                }
            }
            Ok(Event::Empty(e)) => {
                if let Some(kind) = StyleKind::of(e.name().as_ref()) {
                    store(kind, style_from_attributes(&e));
                }
            }
            Ok(Event::Text(t)) => {
                if let Some((_, text)) = property.as_mut() {
                    let unescaped = t
                        .unescape()
                        .map_err(|err| xml_error(STYLES_FILE, &reader, &err))?;
                    text.push_str(&unescaped);
                }
            }
            Ok(Event::End(e)) => {
                let name = e.name();
                if StyleKind::of(name.as_ref()).is_some() {
                    if let Some((kind, style)) = current.take() {
                        store(kind, style);
                    }
                    property = None;
                } else if let Some((prop, text)) = property.take() {
                    if let Some((_, style)) = current.as_mut() {
                        apply_property(style, prop, &text);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(STYLES_FILE, &reader, &e)),
            _ => {}
        }
    }
    Ok((paragraph, character))
}

/// Parse `Resources/Graphic.xml` colors into `#RRGGBB` values
///
/// Colors whose value cannot be converted are left out.
///
/// # Errors
///
/// Returns `IdmlError::Xml` if the content is not well-formed.
pub fn parse_colors(content: &str) -> Result<BTreeMap<String, String>> {
    let mut reader = Reader::from_str(content);
    reader.trim_text(true);

    let mut colors = BTreeMap::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(e) | Event::Empty(e)) if e.name().as_ref() == b"Color" => {
                let Some(id) = event_attr(&e, "Self") else {
                    continue;
                };
                let value = event_attr(&e, "ColorValue");
                let space = event_attr(&e, "Space");
                match color_to_hex(value.as_deref(), space.as_deref()) {
                    Some(hex) => {
                        colors.insert(id, hex);
                    }
                    None => log::debug!("Color {id} has no convertible value, skipping"),
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(GRAPHIC_FILE, &reader, &e)),
            _ => {}
        }
    }
    Ok(colors)
}

/// Convert a `ColorValue` in the `CMYK` (percent) or `RGB` (0-255) space to `#RRGGBB`
///
/// Channels are rounded and clamped to `0..=255`. Other spaces, missing
/// components and non-numeric values give `None`.
#[must_use = "returns the hex color if convertible"]
pub fn color_to_hex(color_value: Option<&str>, space: Option<&str>) -> Option<String> {
    let values: Vec<f64> = color_value?
        .split_whitespace()
        .map(str::parse)
        .collect::<std::result::Result<_, _>>()
        .ok()?;

    let (r, g, b) = match (space?, values.as_slice()) {
        ("CMYK", [c, m, y, k, ..]) => {
            let (c, m, y, k) = (c / 100.0, m / 100.0, y / 100.0, k / 100.0);
            (
                255.0 * (1.0 - c) * (1.0 - k),
                255.0 * (1.0 - m) * (1.0 - k),
                255.0 * (1.0 - y) * (1.0 - k),
            )
        }
        ("RGB", [r, g, b, ..]) => (*r, *g, *b),
        _ => return None,
    };
    Some(format!(
        "#{:02X}{:02X}{:02X}",
        channel(r),
        channel(g),
        channel(b)
    ))
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "value is rounded and clamped to 0..=255 first"
)]
fn channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
