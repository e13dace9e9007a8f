//! Resource catalog entries: fonts, styles, sections

use serde::{Deserialize, Serialize};

/// A font from `Resources/Fonts.xml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontDef {
    /// `Self` reference, e.g. `"di3b"`
    pub self_ref: String,
    /// Enclosing `FontFamily/@Name`
    pub family: String,
    /// `FontStyleName`, e.g. `"Bold Italic"`
    pub style_name: Option<String>,
    /// `PostScriptName`
    pub postscript_name: Option<String>,
    /// `FontType`, e.g. `"OpenTypeCFF"`
    pub font_type: Option<String>,
}

/// How a style's leading is specified
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Leading {
    /// Leading follows the point size
    Auto,
    /// Fixed leading in points
    Fixed(f64),
    /// Any other keyword found in the file
    Other(String),
}

impl Leading {
    /// Interpret `<Leading>` property text
    #[must_use = "returns the parsed leading"]
    pub fn parse(text: &str) -> Self {
        if text.eq_ignore_ascii_case("auto") {
            return Self::Auto;
        }
        text.parse()
            .map_or_else(|_| Self::Other(text.to_string()), Self::Fixed)
    }

    /// Fixed leading in points, if fixed
    #[inline]
    #[must_use = "returns the fixed leading if any"]
    pub const fn points(&self) -> Option<f64> {
        match self {
            Self::Fixed(v) => Some(*v),
            _ => None,
        }
    }
}

/// A paragraph or character style from `Resources/Styles.xml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleDef {
    /// `Self` reference, e.g. `"ParagraphStyle/Body"`
    pub self_ref: String,
    /// Display name
    pub name: Option<String>,
    /// `Properties/BasedOn`
    pub based_on: Option<String>,
    /// `Properties/AppliedFont`
    pub font_family: Option<String>,
    /// `PointSize`
    pub font_size: Option<f64>,
    /// `FontStyle`, e.g. `"Bold"`
    pub font_style: Option<String>,
    /// Derived from `font_style`
    pub bold: bool,
    /// Derived from `font_style` (italic or oblique)
    pub italic: bool,
    /// `FillColor` reference
    pub fill_color: Option<String>,
    /// `Justification`
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
    /// `Properties/Leading`
    pub leading: Option<Leading>,
    /// `HorizontalScale` (percent)
    pub horizontal_scale: Option<f64>,
    /// `Tracking` (1/1000 em)
    pub tracking: Option<f64>,
}

impl StyleDef {
    /// Set `font_style` and derive the bold/italic flags from it
    pub fn set_font_style(&mut self, font_style: Option<String>) {
        let lower = font_style.as_deref().map(str::to_lowercase);
        self.bold = lower.as_deref().is_some_and(|s| s.contains("bold"));
        self.italic = lower
            .as_deref()
            .is_some_and(|s| s.contains("italic") || s.contains("oblique"));
        self.font_style = font_style;
    }
}

/// A numbering section from `designmap.xml`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Section {
    /// `Self`
    pub self_id: String,
    /// `PageStart`: id of the page the section starts on
    pub page_start: Option<String>,
    /// `PageNumberStart`, default 1
    pub page_number_start: u32,
    /// `Length`, default 0
    pub length: u32,
    /// `Name`
    pub name: Option<String>,
    /// `Marker`
    pub marker: Option<String>,
}

impl Default for Section {
    #[inline]
    fn default() -> Self {
        Self {
            self_id: String::new(),
            page_start: None,
            page_number_start: 1,
            length: 0,
            name: None,
            marker: None,
        }
    }
}
