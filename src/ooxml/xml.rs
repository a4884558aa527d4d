//! XML element builder for the WordprocessingML vocabulary
//!
//! Output parts are built as small element trees and rendered to strings by
//! hand; no XML library is involved on the writing side. Attribute and child
//! order is emission order, which WordprocessingML cares about.

/// Main WordprocessingML namespace (`w:`)
pub const NS_WORDPROCESSINGML: &str =
    "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Officedocument relationship namespace (`r:`)
pub const NS_DOC_RELATIONSHIPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Package-level relationships vocabulary (the .rels parts)
pub const NS_PACKAGE_RELATIONSHIPS: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships";

/// Content-types vocabulary ([Content_Types].xml)
pub const NS_CONTENT_TYPES: &str =
    "http://schemas.openxmlformats.org/package/2006/content-types";

/// Standard XML declaration written at the top of every generated part
pub const XML_DECLARATION: &str =
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// A child of an element: nested element or character data
#[derive(Debug, Clone)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// An XML element with a qualified name, ordered attributes, and ordered children
#[derive(Debug, Clone)]
pub struct XmlElement {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<XmlNode>,
}

impl XmlElement {
    /// Create an element with a fully qualified name (e.g. `"w:p"`)
    pub fn new(name: &str) -> Self {
        XmlElement {
            name: name.to_string(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create an element in the `w:` namespace prefix
    pub fn w(name: &str) -> Self {
        Self::new(&format!("w:{}", name))
    }

    /// Append an attribute, builder style
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }

    /// Append a `w:`-prefixed attribute
    pub fn w_attr(self, name: &str, value: &str) -> Self {
        let qualified = format!("w:{}", name);
        self.attr(&qualified, value)
    }

    /// Shorthand for the ubiquitous `w:val` attribute
    pub fn w_val(self, value: &str) -> Self {
        self.w_attr("val", value)
    }

    /// Append a child element, builder style
    pub fn child(mut self, element: XmlElement) -> Self {
        self.children.push(XmlNode::Element(element));
        self
    }

    /// Append a child element in place
    pub fn push(&mut self, element: XmlElement) {
        self.children.push(XmlNode::Element(element));
    }

    /// Append character data, builder style
    pub fn text(mut self, content: &str) -> Self {
        self.children.push(XmlNode::Text(content.to_string()));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Render this element and its subtree into `out`
    pub fn render_into(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_xml_attr(value));
            out.push('"');
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &self.children {
            match child {
                XmlNode::Element(element) => element.render_into(out),
                XmlNode::Text(text) => out.push_str(&escape_xml_text(text)),
            }
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }

    /// Render this element and its subtree to a fresh string
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }
}

/// Escape special XML characters in text content
pub fn escape_xml_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape special XML characters in attribute values
pub fn escape_xml_attr(attr: &str) -> String {
    escape_xml_text(attr)
        .replace('\"', "&quot;")
        .replace('\'', "&apos;")
}
