//! Shared WordprocessingML value types

use serde::{Deserialize, Serialize};

use super::error::DocxError;

/// Vertical alignment of a run (superscript/subscript)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VertAlign {
    Superscript,
    Subscript,
}

impl VertAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            VertAlign::Superscript => "superscript",
            VertAlign::Subscript => "subscript",
        }
    }
}

/// Character-level formatting shared by all text in one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunProperties {
    pub bold: bool,
    pub italic: bool,
    pub vert_align: Option<VertAlign>,
}

impl RunProperties {
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn superscript(mut self) -> Self {
        self.vert_align = Some(VertAlign::Superscript);
        self
    }

    pub fn subscript(mut self) -> Self {
        self.vert_align = Some(VertAlign::Subscript);
        self
    }

    /// True when no formatting is set and the `<w:rPr>` element can be omitted
    pub fn is_plain(&self) -> bool {
        !self.bold && !self.italic && self.vert_align.is_none()
    }
}

/// A span of text sharing one set of character-level formatting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub text: String,
    pub properties: RunProperties,
}

impl Run {
    pub fn new(text: &str, properties: RunProperties) -> Self {
        Run {
            text: text.to_string(),
            properties,
        }
    }

    pub fn plain(text: &str) -> Self {
        Run::new(text, RunProperties::default())
    }
}

/// Number format of a list level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumberFormat {
    Bullet,
    Decimal,
    LowerLetter,
    UpperLetter,
    LowerRoman,
    UpperRoman,
}

impl NumberFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            NumberFormat::Bullet => "bullet",
            NumberFormat::Decimal => "decimal",
            NumberFormat::LowerLetter => "lowerLetter",
            NumberFormat::UpperLetter => "upperLetter",
            NumberFormat::LowerRoman => "lowerRoman",
            NumberFormat::UpperRoman => "upperRoman",
        }
    }

    /// Parse the wire string; unknown names fail fast rather than defaulting
    pub fn parse(s: &str) -> Result<Self, DocxError> {
        match s {
            "bullet" => Ok(NumberFormat::Bullet),
            "decimal" => Ok(NumberFormat::Decimal),
            "lowerLetter" => Ok(NumberFormat::LowerLetter),
            "upperLetter" => Ok(NumberFormat::UpperLetter),
            "lowerRoman" => Ok(NumberFormat::LowerRoman),
            "upperRoman" => Ok(NumberFormat::UpperRoman),
            other => Err(DocxError::InvalidNumberFormat(other.to_string())),
        }
    }
}

/// Label justification of a list level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Justification {
    Left,
    Center,
    Right,
}

impl Justification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Justification::Left => "left",
            Justification::Center => "center",
            Justification::Right => "right",
        }
    }
}

/// One indentation level of an abstract numbering definition
///
/// `indent` is the distance between the text and the left page margin,
/// `hanging` the distance between the text edge and the bullet, both in
/// twips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDefinition {
    pub level: u32,
    pub start: u32,
    pub format: NumberFormat,
    pub text: String,
    pub justification: Justification,
    pub indent: u32,
    pub hanging: u32,
}

impl Default for LevelDefinition {
    fn default() -> Self {
        LevelDefinition {
            level: 0,
            start: 1,
            format: NumberFormat::UpperLetter,
            text: "%1.".to_string(),
            justification: Justification::Left,
            indent: 360,
            hanging: 360,
        }
    }
}

impl LevelDefinition {
    /// The single-level lettered list used for question options
    pub fn letter_level() -> Self {
        LevelDefinition::default()
    }
}

/// Uniform border applied to every edge of a table
///
/// `size` is in eighths of a point; `style` is a WordprocessingML border
/// line style such as `single` or `double`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorderSpec {
    pub color: String,
    pub size: u32,
    pub space: u32,
    pub style: String,
}

impl Default for BorderSpec {
    fn default() -> Self {
        BorderSpec {
            color: "#000000".to_string(),
            size: 1,
            space: 0,
            style: "single".to_string(),
        }
    }
}

impl BorderSpec {
    /// Border color without the leading `#` the web layer tends to send
    pub fn hex_color(&self) -> &str {
        self.color.strip_prefix('#').unwrap_or(&self.color)
    }
}

/// Break marker kind for an explicit break paragraph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreakType {
    Page,
    Column,
    Section,
}

impl BreakType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BreakType::Page => "page",
            BreakType::Column => "column",
            BreakType::Section => "section",
        }
    }
}

/// Page orientation of the section following a section break
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Core document properties written to docProps/core.xml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreProperties {
    pub title: String,
    pub subject: String,
    pub creator: String,
}

impl Default for CoreProperties {
    fn default() -> Self {
        CoreProperties {
            title: "Questions".to_string(),
            subject: "A set of peer-reviewed MCQ questions for this block.".to_string(),
            creator: String::new(),
        }
    }
}
