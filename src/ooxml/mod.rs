//! OOXML (Office Open XML) generation module for Word documents (.docx)
//!
//! This module assembles WordprocessingML packages from scratch: content is
//! appended to a [`WordDocument`] as typed nodes, then a single save renders
//! the document, styles, numbering, and relationship parts and packages them
//! with the boilerplate template into a ZIP archive.
//!
//! # Example
//!
//! ```rust,no_run
//! use quizbank_core::ooxml::{CoreProperties, Template, WordDocument, BODY_TEXT_STYLE};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut document = WordDocument::new(CoreProperties::default());
//!     document.add_heading("Cardiology - Questions", 1);
//!     document.add_paragraph("Question 1: Which chamber pumps systemic blood?", BODY_TEXT_STYLE);
//!
//!     let template = Template::bundled()?;
//!     let mut buffer = Vec::new();
//!     document.save(&template, &mut buffer)?;
//!     std::fs::write("questions.docx", &buffer)?;
//!     Ok(())
//! }
//! ```

mod error;
mod xml;
mod types;
mod numbering;
mod styles;
mod relationships;
mod html;
mod template;
mod document;
mod package;

pub use error::DocxError;
pub use xml::{XmlElement, XmlNode};
pub use types::{
    BorderSpec,
    BreakType,
    CoreProperties,
    Justification,
    LevelDefinition,
    NumberFormat,
    Orientation,
    Run,
    RunProperties,
    VertAlign,
};
pub use numbering::{
    AbstractNumId,
    NumId,
    NumberingRegistry,
    INITIAL_ABSTRACT_NUM_ID,
    INITIAL_NUM_ID,
};
pub use styles::{StyleDefinition, StyleRegistry, StyleType, HYPERLINK_STYLE};
pub use relationships::{Relationship, RelationshipTable, REL_TYPE_HYPERLINK};
pub use html::{lower_fragment, parse_blocks};
pub use template::Template;
pub use document::{
    DocNode,
    Hyperlink,
    List,
    Paragraph,
    Table,
    WordDocument,
    BODY_TEXT_STYLE,
    LIST_LETTER_STYLE,
};
