//! Numbering registry for word/numbering.xml
//!
//! Tracks abstract numbering definitions (the shape of a list) and numbering
//! instances (one concrete use of an abstract definition), assigns their IDs,
//! and renders both into the numbering part.

use super::types::LevelDefinition;
use super::xml::XmlElement;

/// First abstract numbering ID handed out by the registry. The base template
/// ships abstract definitions with IDs below this value; starting here keeps
/// the two ID spaces disjoint.
pub const INITIAL_ABSTRACT_NUM_ID: u32 = 12;

/// First numbering-instance ID handed out by the registry, chosen the same
/// way as [`INITIAL_ABSTRACT_NUM_ID`].
pub const INITIAL_NUM_ID: u32 = 13;

/// Handle to a registered abstract numbering definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbstractNumId(pub u32);

/// Handle to a registered numbering instance, referenced from paragraph
/// properties as `<w:numId>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumId(pub u32);

#[derive(Debug, Clone)]
struct AbstractDefinition {
    id: u32,
    levels: Vec<LevelDefinition>,
}

#[derive(Debug, Clone, Copy)]
struct Instance {
    id: u32,
    abstract_id: u32,
}

/// Allocates numbering IDs and renders the dynamic part of numbering.xml.
///
/// Owned by one `WordDocument`; IDs are dense and monotonic within a single
/// document so two documents generated in the same process cannot perturb
/// each other's numbering.
#[derive(Debug, Clone, Default)]
pub struct NumberingRegistry {
    abstracts: Vec<AbstractDefinition>,
    instances: Vec<Instance>,
}

impl NumberingRegistry {
    pub fn new() -> Self {
        NumberingRegistry::default()
    }

    /// Register an abstract definition and return its handle. IDs are
    /// assigned densely starting from [`INITIAL_ABSTRACT_NUM_ID`].
    pub fn register_abstract(&mut self, levels: Vec<LevelDefinition>) -> AbstractNumId {
        let id = INITIAL_ABSTRACT_NUM_ID + self.abstracts.len() as u32;
        self.abstracts.push(AbstractDefinition { id, levels });
        AbstractNumId(id)
    }

    /// Register a concrete instance of `abstract_id` and return its handle.
    /// IDs are assigned densely starting from [`INITIAL_NUM_ID`].
    pub fn register_instance(&mut self, abstract_id: AbstractNumId) -> NumId {
        let id = INITIAL_NUM_ID + self.instances.len() as u32;
        self.instances.push(Instance {
            id,
            abstract_id: abstract_id.0,
        });
        NumId(id)
    }

    pub fn abstract_count(&self) -> usize {
        self.abstracts.len()
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Render registrations into the numbering base part.
    ///
    /// Abstract definitions are spliced in front of the base part's first
    /// `<w:num>` so the part stays ordered abstractNum-then-num; instances go
    /// just before the closing tag. The base part's own definitions are left
    /// untouched.
    pub fn render_into(&self, numbering_base: &str) -> String {
        let mut abstracts_xml = String::new();
        for definition in &self.abstracts {
            Self::abstract_element(definition).render_into(&mut abstracts_xml);
        }

        let mut instances_xml = String::new();
        for instance in &self.instances {
            Self::instance_element(instance).render_into(&mut instances_xml);
        }

        let mut out = numbering_base.to_string();
        let close = out.rfind("</w:numbering>").unwrap_or(out.len());
        let first_num = out.find("<w:num ").unwrap_or(close);
        out.insert_str(first_num, &abstracts_xml);
        let close = out.rfind("</w:numbering>").unwrap_or(out.len());
        out.insert_str(close, &instances_xml);
        out
    }

    fn abstract_element(definition: &AbstractDefinition) -> XmlElement {
        let mut element =
            XmlElement::w("abstractNum").w_attr("abstractNumId", &definition.id.to_string());
        let mut levels = definition.levels.clone();
        // Levels may be registered out of order; the part wants them ascending.
        levels.sort_by_key(|level| level.level);
        for level in &levels {
            element.push(Self::level_element(level));
        }
        element
    }

    fn level_element(level: &LevelDefinition) -> XmlElement {
        XmlElement::w("lvl")
            .w_attr("ilvl", &level.level.to_string())
            .child(XmlElement::w("start").w_val(&level.start.to_string()))
            .child(XmlElement::w("numFmt").w_val(level.format.as_str()))
            .child(XmlElement::w("lvlText").w_val(&level.text))
            .child(XmlElement::w("lvlJc").w_val(level.justification.as_str()))
            .child(
                XmlElement::w("pPr")
                    .child(
                        XmlElement::w("tabs").child(
                            XmlElement::w("tab")
                                .w_val("num")
                                .w_attr("pos", &level.indent.to_string()),
                        ),
                    )
                    .child(
                        XmlElement::w("ind")
                            .w_attr("left", &level.indent.to_string())
                            .w_attr("hanging", &level.hanging.to_string()),
                    ),
            )
    }

    fn instance_element(instance: &Instance) -> XmlElement {
        // The level-0 override pins the visible start at 1 no matter what
        // start value the abstract definition configured.
        XmlElement::w("num")
            .w_attr("numId", &instance.id.to_string())
            .child(XmlElement::w("abstractNumId").w_val(&instance.abstract_id.to_string()))
            .child(
                XmlElement::w("lvlOverride")
                    .w_attr("ilvl", "0")
                    .child(XmlElement::w("startOverride").w_val("1")),
            )
    }
}
