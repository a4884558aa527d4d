//! Relationship table for word/_rels/document.xml.rels
//!
//! Dynamic relationships (hyperlink targets) are allocated dense 1-based IDs
//! in document order. The package's fixed relationships are renumbered past
//! the dynamic space at render time so the two never collide.

use super::xml::{XmlElement, NS_PACKAGE_RELATIONSHIPS, XML_DECLARATION};

/// Relationship type URI of an external hyperlink target
pub const REL_TYPE_HYPERLINK: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";

pub const REL_TYPE_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
pub const REL_TYPE_NUMBERING: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering";
pub const REL_TYPE_FONT_TABLE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/fontTable";
pub const REL_TYPE_SETTINGS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/settings";
pub const REL_TYPE_WEB_SETTINGS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/webSettings";
pub const REL_TYPE_THEME: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";

/// One entry of the document relationship part
#[derive(Debug, Clone)]
pub struct Relationship {
    pub id: u32,
    pub rel_type: String,
    pub target: String,
    pub target_mode: Option<String>,
}

/// Tracks dynamically added relationships for one document
#[derive(Debug, Clone, Default)]
pub struct RelationshipTable {
    dynamic: Vec<Relationship>,
}

impl RelationshipTable {
    pub fn new() -> Self {
        RelationshipTable::default()
    }

    /// Add a relationship and return its ID. IDs start at 1 and are dense.
    pub fn add(&mut self, rel_type: &str, target: &str, target_mode: Option<&str>) -> u32 {
        let id = self.dynamic.len() as u32 + 1;
        self.dynamic.push(Relationship {
            id,
            rel_type: rel_type.to_string(),
            target: target.to_string(),
            target_mode: target_mode.map(str::to_string),
        });
        id
    }

    pub fn len(&self) -> usize {
        self.dynamic.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dynamic.is_empty()
    }

    /// Render the relationships part: dynamic entries first, then the fixed
    /// set renumbered to start after the highest dynamic ID.
    pub fn render(&self, fixed: &[(&str, &str)]) -> String {
        let mut root =
            XmlElement::new("Relationships").attr("xmlns", NS_PACKAGE_RELATIONSHIPS);
        for relationship in &self.dynamic {
            root.push(Self::relationship_element(relationship));
        }
        let offset = self.dynamic.len() as u32;
        for (index, (rel_type, target)) in fixed.iter().enumerate() {
            root.push(Self::relationship_element(&Relationship {
                id: offset + index as u32 + 1,
                rel_type: rel_type.to_string(),
                target: target.to_string(),
                target_mode: None,
            }));
        }

        let mut out = String::from(XML_DECLARATION);
        root.render_into(&mut out);
        out
    }

    fn relationship_element(relationship: &Relationship) -> XmlElement {
        let mut element = XmlElement::new("Relationship")
            .attr("Id", &format!("rId{}", relationship.id))
            .attr("Type", &relationship.rel_type)
            .attr("Target", &relationship.target);
        if let Some(mode) = &relationship.target_mode {
            element = element.attr("TargetMode", mode);
        }
        element
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_dense_and_one_based() {
        let mut table = RelationshipTable::new();
        let a = table.add(REL_TYPE_HYPERLINK, "http://example.com/1", Some("External"));
        let b = table.add(REL_TYPE_HYPERLINK, "http://example.com/2", Some("External"));
        assert_eq!((a, b), (1, 2));
    }

    #[test]
    fn test_external_mode_is_rendered() {
        let mut table = RelationshipTable::new();
        table.add(REL_TYPE_HYPERLINK, "http://example.com/q/4", Some("External"));
        let xml = table.render(&[]);
        assert!(xml.contains(
            r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="http://example.com/q/4" TargetMode="External"/>"#
        ));
    }

    #[test]
    fn test_fixed_relationships_offset_past_dynamic() {
        let mut table = RelationshipTable::new();
        table.add(REL_TYPE_HYPERLINK, "http://example.com/1", Some("External"));
        table.add(REL_TYPE_HYPERLINK, "http://example.com/2", Some("External"));
        let xml = table.render(&[
            (REL_TYPE_STYLES, "styles.xml"),
            (REL_TYPE_NUMBERING, "numbering.xml"),
        ]);
        assert!(xml.contains(r#"Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml""#));
        assert!(xml.contains(r#"Id="rId4""#));
        // No ID appears twice across the two spaces.
        for id in 1..=4 {
            assert_eq!(xml.matches(&format!(r#"Id="rId{}""#, id)).count(), 1);
        }
    }

    #[test]
    fn test_fixed_only_table_starts_at_one() {
        let table = RelationshipTable::new();
        let xml = table.render(&[(REL_TYPE_STYLES, "styles.xml")]);
        assert!(xml.contains(r#"Id="rId1""#));
    }
}
