//! Style registry for word/styles.xml
//!
//! The base template defines the built-in styles (BodyText, the headings,
//! DefaultParagraphFont); this registry holds the styles synthesized per
//! document, chiefly the numbered paragraph styles derived for each list.

use log::debug;

use super::numbering::NumId;
use super::xml::XmlElement;

/// Style ID of the reserved hyperlink character style
pub const HYPERLINK_STYLE: &str = "Hyperlink";

/// WordprocessingML style type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleType {
    Paragraph,
    Character,
}

impl StyleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StyleType::Paragraph => "paragraph",
            StyleType::Character => "character",
        }
    }
}

/// A style definition queued for emission into the styles part
#[derive(Debug, Clone)]
pub struct StyleDefinition {
    pub name: String,
    pub style_type: StyleType,
    pub num_id: Option<NumId>,
}

/// Collects style definitions and renders them into the styles part.
/// Owned by one `WordDocument`.
#[derive(Debug, Clone, Default)]
pub struct StyleRegistry {
    styles: Vec<StyleDefinition>,
}

impl StyleRegistry {
    pub fn new() -> Self {
        StyleRegistry::default()
    }

    /// Register a plain style. Registration is idempotent by name: the first
    /// definition wins and later ones are ignored. Returns whether the style
    /// was newly added.
    pub fn register(&mut self, name: &str, style_type: StyleType) -> bool {
        self.insert(StyleDefinition {
            name: name.to_string(),
            style_type,
            num_id: None,
        })
    }

    /// Register a paragraph style bound to a numbering instance
    pub fn register_numbered(&mut self, name: &str, num_id: NumId) -> bool {
        self.insert(StyleDefinition {
            name: name.to_string(),
            style_type: StyleType::Paragraph,
            num_id: Some(num_id),
        })
    }

    fn insert(&mut self, definition: StyleDefinition) -> bool {
        if self.contains(&definition.name) {
            debug!("style {} already registered, keeping the first definition", definition.name);
            return false;
        }
        self.styles.push(definition);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.styles.iter().any(|style| style.name == name)
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Render registrations into the styles base part, appending just before
    /// the closing tag. With `include_hyperlink` the reserved Hyperlink
    /// character style is appended exactly once.
    pub fn render_into(&self, styles_base: &str, include_hyperlink: bool) -> String {
        let mut appended = String::new();
        for style in &self.styles {
            Self::style_element(style).render_into(&mut appended);
        }
        if include_hyperlink {
            hyperlink_style_element().render_into(&mut appended);
        }

        let mut out = styles_base.to_string();
        let close = out.rfind("</w:styles>").unwrap_or(out.len());
        out.insert_str(close, &appended);
        out
    }

    fn style_element(style: &StyleDefinition) -> XmlElement {
        let mut element = XmlElement::w("style")
            .w_attr("styleId", &style.name)
            .w_attr("type", style.style_type.as_str());
        if let Some(num_id) = style.num_id {
            element.push(
                XmlElement::w("pPr")
                    .child(
                        XmlElement::w("numPr")
                            .child(XmlElement::w("numId").w_val(&num_id.0.to_string())),
                    )
                    .child(XmlElement::w("contextualSpacing")),
            );
        }
        element
    }
}

/// The reserved blue underlined character style hyperlink runs reference
fn hyperlink_style_element() -> XmlElement {
    XmlElement::w("style")
        .w_attr("styleId", HYPERLINK_STYLE)
        .w_attr("type", StyleType::Character.as_str())
        .child(XmlElement::w("name").w_val(HYPERLINK_STYLE))
        .child(XmlElement::w("basedOn").w_val("DefaultParagraphFont"))
        .child(
            XmlElement::w("rPr")
                .child(
                    XmlElement::w("color")
                        .w_val("0000FF")
                        .w_attr("themeColor", "hyperlink"),
                )
                .child(XmlElement::w("u").w_val("single")),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY_BASE: &str = r#"<w:styles xmlns:w="ns"></w:styles>"#;

    #[test]
    fn test_register_is_idempotent_by_name() {
        let mut registry = StyleRegistry::new();
        assert!(registry.register("BodyIndent", StyleType::Paragraph));
        assert!(!registry.register("BodyIndent", StyleType::Paragraph));
        assert_eq!(registry.len(), 1);

        let xml = registry.render_into(EMPTY_BASE, false);
        assert_eq!(xml.matches(r#"w:styleId="BodyIndent""#).count(), 1);
    }

    #[test]
    fn test_numbered_style_nests_numbering_reference() {
        let mut registry = StyleRegistry::new();
        registry.register_numbered("ListUpperLetter13", NumId(13));
        let xml = registry.render_into(EMPTY_BASE, false);
        assert!(xml.contains(
            r#"<w:style w:styleId="ListUpperLetter13" w:type="paragraph"><w:pPr><w:numPr><w:numId w:val="13"/></w:numPr><w:contextualSpacing/></w:pPr></w:style>"#
        ));
    }

    #[test]
    fn test_hyperlink_style_emitted_once_on_demand() {
        let registry = StyleRegistry::new();
        let without = registry.render_into(EMPTY_BASE, false);
        assert!(!without.contains(r#"w:styleId="Hyperlink""#));

        let with = registry.render_into(EMPTY_BASE, true);
        assert_eq!(with.matches(r#"w:styleId="Hyperlink""#).count(), 1);
        assert!(with.contains(r#"<w:color w:val="0000FF" w:themeColor="hyperlink"/>"#));
        assert!(with.contains(r#"<w:u w:val="single"/>"#));
    }

    #[test]
    fn test_base_definitions_are_preserved() {
        let base = r#"<w:styles xmlns:w="ns"><w:style w:styleId="BodyText" w:type="paragraph"/></w:styles>"#;
        let mut registry = StyleRegistry::new();
        registry.register_numbered("ListUpperLetter13", NumId(13));
        let xml = registry.render_into(base, false);
        assert!(xml.contains(r#"w:styleId="BodyText""#));
        assert!(xml.ends_with("</w:styles>"));
        let body = xml.find(r#"w:styleId="BodyText""#).unwrap();
        let derived = xml.find(r#"w:styleId="ListUpperLetter13""#).unwrap();
        assert!(body < derived);
    }
}
