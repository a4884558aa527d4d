//! Document element model and the `WordDocument` aggregate
//!
//! Content is a flat, ordered sequence of nodes. Generation is two walks over
//! that sequence: a registration walk that populates the style, numbering,
//! and relationship registries, then a production walk that lowers every node
//! to WordprocessingML elements in append order.

use log::warn;

use super::html;
use super::numbering::{NumId, NumberingRegistry};
use super::relationships::{RelationshipTable, REL_TYPE_HYPERLINK};
use super::styles::{StyleRegistry, HYPERLINK_STYLE};
use super::types::{
    BorderSpec, BreakType, CoreProperties, LevelDefinition, Orientation, Run, RunProperties,
};
use super::xml::XmlElement;

/// Default paragraph style for body text
pub const BODY_TEXT_STYLE: &str = "BodyText";

/// Default style-name prefix for lettered option lists
pub const LIST_LETTER_STYLE: &str = "ListUpperLetter";

/// US Letter page size in twips
const PAGE_WIDTH: &str = "12240";
const PAGE_HEIGHT: &str = "15840";

/// A hyperlink attached to the end of a paragraph. The relationship ID is
/// assigned during the registration walk.
#[derive(Debug, Clone)]
pub struct Hyperlink {
    pub text: String,
    pub uri: String,
    rel_id: Option<u32>,
}

/// A paragraph: ordered formatted runs, a paragraph style, optional list
/// membership, optional trailing hyperlink
#[derive(Debug, Clone)]
pub struct Paragraph {
    style: String,
    runs: Vec<Run>,
    numbering: Option<(u32, NumId)>,
    hyperlink: Option<Hyperlink>,
}

impl Paragraph {
    pub fn new(style: &str) -> Self {
        Paragraph {
            style: style.to_string(),
            runs: Vec::new(),
            numbering: None,
            hyperlink: None,
        }
    }

    /// Single-run paragraph from plain text
    pub fn with_text(text: &str, style: &str) -> Self {
        let mut paragraph = Paragraph::new(style);
        paragraph.add_text(text, RunProperties::default());
        paragraph
    }

    pub fn add_text(&mut self, text: &str, properties: RunProperties) {
        self.runs.push(Run::new(text, properties));
    }

    pub fn add_run(&mut self, run: Run) {
        self.runs.push(run);
    }

    /// Attach a hyperlink rendered after the runs as blue underlined text
    pub fn set_hyperlink(&mut self, text: &str, uri: &str) {
        self.hyperlink = Some(Hyperlink {
            text: text.to_string(),
            uri: uri.to_string(),
            rel_id: None,
        });
    }

    pub fn set_numbering(&mut self, level: u32, num_id: NumId) {
        self.numbering = Some((level, num_id));
    }

    pub fn style(&self) -> &str {
        &self.style
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    fn register(&mut self, relationships: &mut RelationshipTable) -> bool {
        match &mut self.hyperlink {
            Some(link) => {
                if link.rel_id.is_none() {
                    link.rel_id =
                        Some(relationships.add(REL_TYPE_HYPERLINK, &link.uri, Some("External")));
                }
                true
            }
            None => false,
        }
    }

    fn produce(&self) -> XmlElement {
        let mut paragraph = XmlElement::w("p");

        let mut properties = XmlElement::w("pPr")
            .child(XmlElement::w("pStyle").w_val(&self.style));
        if let Some((level, num_id)) = self.numbering {
            properties.push(
                XmlElement::w("numPr")
                    .child(XmlElement::w("ilvl").w_val(&level.to_string()))
                    .child(XmlElement::w("numId").w_val(&num_id.0.to_string())),
            );
        }
        paragraph.push(properties);

        for run in &self.runs {
            paragraph.push(run_element(run));
        }

        if let Some(link) = &self.hyperlink {
            match link.rel_id {
                Some(rel_id) => paragraph.push(hyperlink_element(link, rel_id)),
                None => warn!("hyperlink to {} was never registered, dropping it", link.uri),
            }
        }

        paragraph
    }
}

fn run_element(run: &Run) -> XmlElement {
    let mut element = XmlElement::w("r");
    if !run.properties.is_plain() {
        let mut run_properties = XmlElement::w("rPr");
        if run.properties.bold {
            run_properties.push(XmlElement::w("b"));
        }
        if run.properties.italic {
            run_properties.push(XmlElement::w("i"));
        }
        if let Some(align) = run.properties.vert_align {
            run_properties.push(XmlElement::w("vertAlign").w_val(align.as_str()));
        }
        element.push(run_properties);
    }
    element.push(text_element(&run.text));
    element
}

/// `<w:t>`, space-preserved when Word would otherwise collapse the text
fn text_element(text: &str) -> XmlElement {
    let mut element = XmlElement::w("t");
    if text.trim() != text {
        element = element.attr("xml:space", "preserve");
    }
    element.text(text)
}

fn hyperlink_element(link: &Hyperlink, rel_id: u32) -> XmlElement {
    XmlElement::w("hyperlink")
        .attr("r:id", &format!("rId{}", rel_id))
        .child(
            XmlElement::w("r")
                .child(
                    XmlElement::w("rPr")
                        .child(XmlElement::w("rStyle").w_val(HYPERLINK_STYLE)),
                )
                .child(text_element(&link.text)),
        )
}

/// An ordered list. Registration creates its numbering instance and derived
/// style; production emits one paragraph per item (or per block-level piece
/// when items are HTML fragments).
#[derive(Debug, Clone)]
pub struct List {
    items: Vec<String>,
    style_prefix: String,
    as_html: bool,
    style: Option<String>,
    num_id: Option<NumId>,
}

impl List {
    pub fn new(items: Vec<String>, style_prefix: &str, as_html: bool) -> Self {
        List {
            items,
            style_prefix: style_prefix.to_string(),
            as_html,
            style: None,
            num_id: None,
        }
    }

    /// The derived style name, available after registration
    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    pub fn num_id(&self) -> Option<NumId> {
        self.num_id
    }

    fn register(&mut self, styles: &mut StyleRegistry, numbering: &mut NumberingRegistry) {
        if self.num_id.is_some() {
            return;
        }
        let abstract_id = numbering.register_abstract(vec![LevelDefinition::letter_level()]);
        let num_id = numbering.register_instance(abstract_id);
        let style = format!("{}{}", self.style_prefix, num_id.0);
        styles.register_numbered(&style, num_id);
        self.num_id = Some(num_id);
        self.style = Some(style);
    }

    fn produce(&self) -> Vec<XmlElement> {
        let (style, num_id) = match (&self.style, self.num_id) {
            (Some(style), Some(num_id)) => (style.as_str(), num_id),
            _ => {
                warn!("list was never registered, emitting unnumbered body text");
                (BODY_TEXT_STYLE, NumId(0))
            }
        };

        let mut elements = Vec::new();
        for item in &self.items {
            if self.as_html {
                for runs in html::lower_fragment(item) {
                    let mut paragraph = Paragraph::new(style);
                    for run in runs {
                        paragraph.add_run(run);
                    }
                    paragraph.set_numbering(0, num_id);
                    elements.push(paragraph.produce());
                }
            } else {
                let mut paragraph = Paragraph::with_text(item, style);
                paragraph.set_numbering(0, num_id);
                elements.push(paragraph.produce());
            }
        }
        elements
    }
}

/// A table of plain-text cells with uniform borders
#[derive(Debug, Clone)]
pub struct Table {
    rows: Vec<Vec<String>>,
    has_heading_row: bool,
    borders: BorderSpec,
}

impl Table {
    pub fn new(rows: Vec<Vec<String>>, has_heading_row: bool, borders: BorderSpec) -> Self {
        Table {
            rows,
            has_heading_row,
            borders,
        }
    }

    fn produce(&self) -> XmlElement {
        let columns = self.rows.iter().map(Vec::len).max().unwrap_or(0);

        let mut table = XmlElement::w("tbl").child(
            XmlElement::w("tblPr")
                .child(XmlElement::w("tblW").w_attr("w", "0").w_attr("type", "auto"))
                .child(self.borders_element()),
        );

        let mut grid = XmlElement::w("tblGrid");
        for _ in 0..columns {
            grid.push(XmlElement::w("gridCol"));
        }
        table.push(grid);

        for (row_index, row) in self.rows.iter().enumerate() {
            let heading = self.has_heading_row && row_index == 0;
            let mut table_row = XmlElement::w("tr");
            if heading {
                table_row.push(XmlElement::w("trPr").child(XmlElement::w("tblHeader")));
            }
            for column in 0..columns {
                let text = row.get(column).map(String::as_str).unwrap_or("");
                table_row.push(cell_element(text, heading));
            }
            table.push(table_row);
        }
        table
    }

    fn borders_element(&self) -> XmlElement {
        let mut borders = XmlElement::w("tblBorders");
        for edge in ["top", "left", "bottom", "right", "insideH", "insideV"] {
            borders.push(
                XmlElement::w(edge)
                    .w_val(&self.borders.style)
                    .w_attr("sz", &self.borders.size.to_string())
                    .w_attr("space", &self.borders.space.to_string())
                    .w_attr("color", self.borders.hex_color()),
            );
        }
        borders
    }
}

fn cell_element(text: &str, heading: bool) -> XmlElement {
    let properties = if heading {
        RunProperties::default().bold()
    } else {
        RunProperties::default()
    };
    let mut paragraph = XmlElement::w("p");
    paragraph.push(run_element(&Run::new(text, properties)));
    XmlElement::w("tc").child(paragraph)
}

fn pagebreak_element(break_type: BreakType, orientation: Orientation) -> XmlElement {
    match break_type {
        BreakType::Page | BreakType::Column => XmlElement::w("p").child(
            XmlElement::w("r")
                .child(XmlElement::w("br").w_attr("type", break_type.as_str())),
        ),
        BreakType::Section => {
            let page_size = match orientation {
                Orientation::Portrait => XmlElement::w("pgSz")
                    .w_attr("w", PAGE_WIDTH)
                    .w_attr("h", PAGE_HEIGHT),
                Orientation::Landscape => XmlElement::w("pgSz")
                    .w_attr("h", PAGE_WIDTH)
                    .w_attr("w", PAGE_HEIGHT)
                    .w_attr("orient", "landscape"),
            };
            XmlElement::w("p").child(
                XmlElement::w("pPr").child(XmlElement::w("sectPr").child(page_size)),
            )
        }
    }
}

/// One content node of the document body
#[derive(Debug, Clone)]
pub enum DocNode {
    Heading { text: String, level: u32 },
    Paragraph(Paragraph),
    List(List),
    Table(Table),
    PageBreak { break_type: BreakType, orientation: Orientation },
}

impl DocNode {
    /// Registration walk step. Returns whether this node needs the reserved
    /// hyperlink style.
    pub(crate) fn register(
        &mut self,
        styles: &mut StyleRegistry,
        numbering: &mut NumberingRegistry,
        relationships: &mut RelationshipTable,
    ) -> bool {
        match self {
            DocNode::Paragraph(paragraph) => paragraph.register(relationships),
            DocNode::List(list) => {
                list.register(styles, numbering);
                false
            }
            DocNode::Heading { .. } | DocNode::Table(_) | DocNode::PageBreak { .. } => false,
        }
    }

    /// Lower this node to its body elements, in order
    pub(crate) fn produce(&self) -> Vec<XmlElement> {
        match self {
            DocNode::Heading { text, level } => {
                let style = format!("Heading{}", level);
                vec![Paragraph::with_text(text, &style).produce()]
            }
            DocNode::Paragraph(paragraph) => vec![paragraph.produce()],
            DocNode::List(list) => list.produce(),
            DocNode::Table(table) => vec![table.produce()],
            DocNode::PageBreak { break_type, orientation } => {
                vec![pagebreak_element(*break_type, *orientation)]
            }
        }
    }
}

/// The root aggregate: ordered content nodes plus the registries populated
/// when the document is saved.
///
/// A document is single-use: construct it, append content, save it once.
/// Instances are not safe for concurrent mutation; use one per generated
/// document.
#[derive(Debug, Clone, Default)]
pub struct WordDocument {
    pub(crate) metadata: CoreProperties,
    pub(crate) nodes: Vec<DocNode>,
    pub(crate) relationships: RelationshipTable,
    pub(crate) styles: StyleRegistry,
    pub(crate) numbering: NumberingRegistry,
    pub(crate) has_hyperlink: bool,
}

impl WordDocument {
    pub fn new(metadata: CoreProperties) -> Self {
        WordDocument {
            metadata,
            ..WordDocument::default()
        }
    }

    pub fn add_element(&mut self, node: DocNode) {
        self.nodes.push(node);
    }

    pub fn add_heading(&mut self, text: &str, level: u32) {
        self.add_element(DocNode::Heading {
            text: text.to_string(),
            level,
        });
    }

    /// Append a plain paragraph; the returned reference allows adding
    /// formatted runs or a hyperlink before the next append.
    pub fn add_paragraph(&mut self, text: &str, style: &str) -> &mut Paragraph {
        self.add_element(DocNode::Paragraph(Paragraph::with_text(text, style)));
        match self.nodes.last_mut() {
            Some(DocNode::Paragraph(paragraph)) => paragraph,
            _ => unreachable!("paragraph was just appended"),
        }
    }

    pub fn add_table(&mut self, rows: Vec<Vec<String>>, has_heading_row: bool, borders: BorderSpec) {
        self.add_element(DocNode::Table(Table::new(rows, has_heading_row, borders)));
    }

    pub fn add_list(&mut self, items: Vec<String>, style_prefix: &str, as_html: bool) {
        self.add_element(DocNode::List(List::new(items, style_prefix, as_html)));
    }

    pub fn add_list_html(&mut self, items: Vec<String>, style_prefix: &str) {
        self.add_list(items, style_prefix, true);
    }

    pub fn insert_pagebreak(&mut self, break_type: BreakType, orientation: Orientation) {
        self.add_element(DocNode::PageBreak {
            break_type,
            orientation,
        });
    }

    /// Append body-level HTML: each block-level piece becomes one paragraph
    pub fn add_html(&mut self, fragment: &str) {
        for runs in html::lower_fragment(fragment) {
            let mut paragraph = Paragraph::new(BODY_TEXT_STYLE);
            for run in runs {
                paragraph.add_run(run);
            }
            self.add_element(DocNode::Paragraph(paragraph));
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Registration walk over all nodes in document order
    pub(crate) fn register_all(&mut self) {
        let mut has_hyperlink = self.has_hyperlink;
        for node in &mut self.nodes {
            has_hyperlink |= node.register(
                &mut self.styles,
                &mut self.numbering,
                &mut self.relationships,
            );
        }
        self.has_hyperlink = has_hyperlink;
    }

    /// Production walk: the body elements in append order
    pub(crate) fn body_elements(&self) -> Vec<XmlElement> {
        let mut elements = Vec::new();
        for node in &self.nodes {
            elements.extend(node.produce());
        }
        elements
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_produces_styled_paragraph() {
        let node = DocNode::Heading {
            text: "Cardiology".to_string(),
            level: 1,
        };
        let xml = node.produce()[0].render();
        assert_eq!(
            xml,
            "<w:p><w:pPr><w:pStyle w:val=\"Heading1\"/></w:pPr><w:r><w:t>Cardiology</w:t></w:r></w:p>"
        );
    }

    #[test]
    fn test_paragraph_runs_carry_formatting() {
        let mut paragraph = Paragraph::new(BODY_TEXT_STYLE);
        paragraph.add_text("normal ", RunProperties::default());
        paragraph.add_text("bold", RunProperties::default().bold());
        paragraph.add_text("2+", RunProperties::default().superscript());
        let xml = paragraph.produce().render();
        assert!(xml.contains(r#"<w:t xml:space="preserve">normal </w:t>"#));
        assert!(xml.contains("<w:rPr><w:b/></w:rPr><w:t>bold</w:t>"));
        assert!(xml.contains(r#"<w:rPr><w:vertAlign w:val="superscript"/></w:rPr><w:t>2+</w:t>"#));
    }

    #[test]
    fn test_numbered_paragraph_references_instance() {
        let mut paragraph = Paragraph::with_text("option", "ListUpperLetter13");
        paragraph.set_numbering(0, NumId(13));
        let xml = paragraph.produce().render();
        assert!(xml.contains(
            r#"<w:numPr><w:ilvl w:val="0"/><w:numId w:val="13"/></w:numPr>"#
        ));
    }

    #[test]
    fn test_hyperlink_needs_registration() {
        let mut paragraph = Paragraph::with_text("To view this question online, click ", BODY_TEXT_STYLE);
        paragraph.set_hyperlink("here", "http://example.com/question/9");
        let mut relationships = RelationshipTable::new();
        assert!(paragraph.register(&mut relationships));
        let xml = paragraph.produce().render();
        assert!(xml.contains(r#"<w:hyperlink r:id="rId1">"#));
        assert!(xml.contains(r#"<w:rStyle w:val="Hyperlink"/>"#));
        assert!(xml.contains("<w:t>here</w:t>"));
    }

    #[test]
    fn test_list_registration_derives_style_and_instance() {
        let mut list = List::new(
            vec!["A".to_string(), "B".to_string(), "C".to_string()],
            LIST_LETTER_STYLE,
            false,
        );
        let mut styles = StyleRegistry::new();
        let mut numbering = NumberingRegistry::new();
        list.register(&mut styles, &mut numbering);

        assert_eq!(list.num_id(), Some(NumId(13)));
        assert_eq!(list.style(), Some("ListUpperLetter13"));
        assert!(styles.contains("ListUpperLetter13"));

        let elements = list.produce();
        assert_eq!(elements.len(), 3);
        for element in &elements {
            let xml = element.render();
            assert!(xml.contains(r#"<w:pStyle w:val="ListUpperLetter13"/>"#));
            assert!(xml.contains(r#"<w:ilvl w:val="0"/><w:numId w:val="13"/>"#));
        }
    }

    #[test]
    fn test_list_registration_is_idempotent() {
        let mut list = List::new(vec!["A".to_string()], LIST_LETTER_STYLE, false);
        let mut styles = StyleRegistry::new();
        let mut numbering = NumberingRegistry::new();
        list.register(&mut styles, &mut numbering);
        list.register(&mut styles, &mut numbering);
        assert_eq!(numbering.instance_count(), 1);
        assert_eq!(styles.len(), 1);
    }

    #[test]
    fn test_html_list_items_split_into_blocks() {
        let mut list = List::new(
            vec!["<p>first</p><p>second <i>part</i></p>".to_string()],
            LIST_LETTER_STYLE,
            true,
        );
        let mut styles = StyleRegistry::new();
        let mut numbering = NumberingRegistry::new();
        list.register(&mut styles, &mut numbering);
        let elements = list.produce();
        assert_eq!(elements.len(), 2);
        assert!(elements[1].render().contains("<w:rPr><w:i/></w:rPr><w:t>part</w:t>"));
    }

    #[test]
    fn test_table_pads_ragged_rows() {
        let table = Table::new(
            vec![
                vec!["a".to_string(), "b".to_string(), "c".to_string()],
                vec!["d".to_string()],
            ],
            false,
            BorderSpec::default(),
        );
        let xml = table.produce().render();
        assert_eq!(xml.matches("<w:gridCol/>").count(), 3);
        assert_eq!(xml.matches("<w:tc>").count(), 6);
        assert_eq!(xml.matches("<w:t></w:t>").count(), 2);
    }

    #[test]
    fn test_table_heading_row_is_marked_and_bold() {
        let table = Table::new(
            vec![
                vec!["Question".to_string(), "Answer".to_string()],
                vec!["1".to_string(), "A".to_string()],
            ],
            true,
            BorderSpec::default(),
        );
        let xml = table.produce().render();
        assert_eq!(xml.matches("<w:trPr><w:tblHeader/></w:trPr>").count(), 1);
        assert!(xml.contains("<w:rPr><w:b/></w:rPr><w:t>Question</w:t>"));
        assert!(!xml.contains("<w:rPr><w:b/></w:rPr><w:t>1</w:t>"));
    }

    #[test]
    fn test_table_borders_apply_to_all_edges() {
        let table = Table::new(vec![vec!["x".to_string()]], false, BorderSpec::default());
        let xml = table.produce().render();
        for edge in ["top", "left", "bottom", "right", "insideH", "insideV"] {
            assert!(xml.contains(&format!(
                r#"<w:{} w:val="single" w:sz="1" w:space="0" w:color="000000"/>"#,
                edge
            )));
        }
    }

    #[test]
    fn test_page_break_variants() {
        let page = pagebreak_element(BreakType::Page, Orientation::Portrait).render();
        assert_eq!(page, r#"<w:p><w:r><w:br w:type="page"/></w:r></w:p>"#);

        let section = pagebreak_element(BreakType::Section, Orientation::Landscape).render();
        assert!(section.contains(r#"<w:sectPr><w:pgSz w:h="12240" w:w="15840" w:orient="landscape"/></w:sectPr>"#));
    }

    #[test]
    fn test_body_elements_preserve_append_order() {
        let mut document = WordDocument::new(CoreProperties::default());
        document.add_heading("Block", 1);
        document.add_paragraph("first", BODY_TEXT_STYLE);
        document.insert_pagebreak(BreakType::Page, Orientation::Portrait);
        document.add_paragraph("second", BODY_TEXT_STYLE);
        document.register_all();

        let rendered: Vec<String> = document
            .body_elements()
            .iter()
            .map(XmlElement::render)
            .collect();
        assert_eq!(rendered.len(), 4);
        assert!(rendered[0].contains("Heading1"));
        assert!(rendered[1].contains("first"));
        assert!(rendered[2].contains(r#"<w:br w:type="page"/>"#));
        assert!(rendered[3].contains("second"));
    }

    #[test]
    fn test_add_html_appends_block_paragraphs() {
        let mut document = WordDocument::new(CoreProperties::default());
        document.add_html("<p>alpha</p><p><b>beta</b></p>");
        assert_eq!(document.node_count(), 2);
        let elements = document.body_elements();
        assert!(elements[0].render().contains("<w:t>alpha</w:t>"));
        assert!(elements[1].render().contains("<w:rPr><w:b/></w:rPr><w:t>beta</w:t>"));
    }

    #[test]
    fn test_register_all_sets_hyperlink_flag_and_dense_ids() {
        let mut document = WordDocument::new(CoreProperties::default());
        document
            .add_paragraph("see ", BODY_TEXT_STYLE)
            .set_hyperlink("here", "http://example.com/1");
        document
            .add_paragraph("and ", BODY_TEXT_STYLE)
            .set_hyperlink("there", "http://example.com/2");
        assert!(!document.has_hyperlink);
        document.register_all();
        assert!(document.has_hyperlink);
        assert_eq!(document.relationships.len(), 2);
    }
}
