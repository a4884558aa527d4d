//! Package assembly: turning a `WordDocument` into a .docx archive
//!
//! The archive is assembled fully in memory and only written to the caller's
//! stream once the ZIP is complete, so a failed save never leaves partial
//! output behind.

use std::io::{Cursor, Write};

use log::debug;
use zip::write::FileOptions;
use zip::ZipWriter;

use super::document::WordDocument;
use super::error::DocxError;
use super::relationships::{
    REL_TYPE_FONT_TABLE, REL_TYPE_NUMBERING, REL_TYPE_SETTINGS, REL_TYPE_STYLES, REL_TYPE_THEME,
    REL_TYPE_WEB_SETTINGS,
};
use super::template::Template;
use super::types::CoreProperties;
use super::xml::{
    escape_xml_text, NS_CONTENT_TYPES, NS_DOC_RELATIONSHIPS, NS_WORDPROCESSINGML, XML_DECLARATION,
};

/// Relationships every package carries, renumbered past the dynamic space.
/// Targets are relative to word/.
const FIXED_RELATIONSHIPS: &[(&str, &str)] = &[
    (REL_TYPE_STYLES, "styles.xml"),
    (REL_TYPE_NUMBERING, "numbering.xml"),
    (REL_TYPE_FONT_TABLE, "fontTable.xml"),
    (REL_TYPE_SETTINGS, "settings.xml"),
    (REL_TYPE_WEB_SETTINGS, "webSettings.xml"),
    (REL_TYPE_THEME, "theme/theme1.xml"),
];

impl WordDocument {
    /// Assemble the package and write the finished archive to `out`.
    ///
    /// Registration is idempotent per node, so calling save twice produces
    /// the same package rather than re-allocating IDs.
    pub fn save<W: Write>(&mut self, template: &Template, out: &mut W) -> Result<(), DocxError> {
        self.register_all();

        // Template I/O happens before anything is generated; a broken
        // template aborts with no bytes written.
        let static_files = template.static_files()?;

        let styles_xml = self
            .styles
            .render_into(template.styles_base(), self.has_hyperlink);
        let numbering_xml = self.numbering.render_into(template.numbering_base());
        let document_xml = self.document_part();
        let relationships_xml = self.relationships.render(FIXED_RELATIONSHIPS);

        let generated: Vec<(&str, Vec<u8>)> = vec![
            ("word/document.xml", document_xml.into_bytes()),
            ("word/styles.xml", styles_xml.into_bytes()),
            ("word/numbering.xml", numbering_xml.into_bytes()),
            (
                "word/_rels/document.xml.rels",
                relationships_xml.into_bytes(),
            ),
            ("docProps/core.xml", core_properties_part(&self.metadata).into_bytes()),
            ("docProps/app.xml", app_properties_part().into_bytes()),
            ("word/webSettings.xml", web_settings_part().into_bytes()),
            (
                "[Content_Types].xml",
                content_types_part(&static_files).into_bytes(),
            ),
        ];

        let mut buffer = Cursor::new(Vec::new());
        {
            let mut archive = ZipWriter::new(&mut buffer);
            let options = FileOptions::default()
                .compression_method(zip::CompressionMethod::Deflated)
                .compression_level(Some(9));

            for (name, data) in &generated {
                archive.start_file(*name, options)?;
                archive.write_all(data)?;
            }

            for (name, data) in &static_files {
                if generated.iter().any(|(generated_name, _)| *generated_name == name.as_str()) {
                    debug!("template file {} shadowed by a generated part", name);
                    continue;
                }
                archive.start_file(name.as_str(), options)?;
                archive.write_all(data)?;
            }

            archive.finish()?;
        }

        out.write_all(&buffer.into_inner())?;
        Ok(())
    }

    /// word/document.xml: the body in append order plus the final section
    /// properties
    fn document_part(&self) -> String {
        let mut xml = String::from(XML_DECLARATION);
        xml.push_str(&format!(
            r#"<w:document xmlns:w="{}" xmlns:r="{}">"#,
            NS_WORDPROCESSINGML, NS_DOC_RELATIONSHIPS
        ));
        xml.push_str("<w:body>");
        for element in self.body_elements() {
            element.render_into(&mut xml);
        }
        xml.push_str(concat!(
            "<w:sectPr>",
            r#"<w:pgSz w:w="12240" w:h="15840"/>"#,
            r#"<w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/>"#,
            "</w:sectPr>",
        ));
        xml.push_str("</w:body></w:document>");
        xml
    }
}

/// docProps/core.xml with caller-supplied title/subject/creator
fn core_properties_part(metadata: &CoreProperties) -> String {
    let stamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, false);
    let mut xml = String::from(XML_DECLARATION);
    xml.push_str(concat!(
        r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties""#,
        r#" xmlns:dc="http://purl.org/dc/elements/1.1/""#,
        r#" xmlns:dcterms="http://purl.org/dc/terms/""#,
        r#" xmlns:dcmitype="http://purl.org/dc/dcmitype/""#,
        r#" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
    ));
    xml.push_str(&format!("<dc:title>{}</dc:title>", escape_xml_text(&metadata.title)));
    xml.push_str(&format!(
        "<dc:subject>{}</dc:subject>",
        escape_xml_text(&metadata.subject)
    ));
    xml.push_str(&format!(
        "<dc:creator>{}</dc:creator>",
        escape_xml_text(&metadata.creator)
    ));
    xml.push_str("<cp:keywords/>");
    xml.push_str(&format!(
        r#"<dcterms:created xsi:type="dcterms:W3CDTF">{}</dcterms:created>"#,
        stamp
    ));
    xml.push_str(&format!(
        r#"<dcterms:modified xsi:type="dcterms:W3CDTF">{}</dcterms:modified>"#,
        stamp
    ));
    xml.push_str("</cp:coreProperties>");
    xml
}

fn app_properties_part() -> String {
    concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties">"#,
        "<Application>quizbank</Application>",
        "<AppVersion>1.0</AppVersion>",
        "</Properties>",
    )
    .to_string()
}

fn web_settings_part() -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<w:webSettings xmlns:w="{}">"#,
            "<w:optimizeForBrowser/>",
            "</w:webSettings>",
        ),
        NS_WORDPROCESSINGML
    )
}

/// Content type string for a known part name
fn content_type_for(name: &str) -> Option<&'static str> {
    match name {
        "word/document.xml" => {
            Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml")
        }
        "word/styles.xml" => {
            Some("application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml")
        }
        "word/numbering.xml" => {
            Some("application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml")
        }
        "word/settings.xml" => {
            Some("application/vnd.openxmlformats-officedocument.wordprocessingml.settings+xml")
        }
        "word/webSettings.xml" => {
            Some("application/vnd.openxmlformats-officedocument.wordprocessingml.webSettings+xml")
        }
        "word/fontTable.xml" => {
            Some("application/vnd.openxmlformats-officedocument.wordprocessingml.fontTable+xml")
        }
        "word/theme/theme1.xml" => Some("application/vnd.openxmlformats-officedocument.theme+xml"),
        "docProps/core.xml" => Some("application/vnd.openxmlformats-package.core-properties+xml"),
        "docProps/app.xml" => {
            Some("application/vnd.openxmlformats-officedocument.extended-properties+xml")
        }
        _ => None,
    }
}

/// [Content_Types].xml covering the generated parts and the copy-through
/// template files
fn content_types_part(static_files: &[(String, Vec<u8>)]) -> String {
    let mut xml = String::from(XML_DECLARATION);
    xml.push_str(&format!(r#"<Types xmlns="{}">"#, NS_CONTENT_TYPES));
    xml.push_str(concat!(
        r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
        r#"<Default Extension="xml" ContentType="application/xml"/>"#,
    ));
    for extension in ["png", "jpeg", "jpg", "gif"] {
        if static_files
            .iter()
            .any(|(name, _)| name.ends_with(&format!(".{}", extension)))
        {
            let content_type = match extension {
                "png" => "image/png",
                "gif" => "image/gif",
                _ => "image/jpeg",
            };
            xml.push_str(&format!(
                r#"<Default Extension="{}" ContentType="{}"/>"#,
                extension, content_type
            ));
        }
    }

    let generated = [
        "word/document.xml",
        "word/styles.xml",
        "word/numbering.xml",
        "word/webSettings.xml",
        "docProps/core.xml",
        "docProps/app.xml",
    ];
    for name in generated {
        if let Some(content_type) = content_type_for(name) {
            xml.push_str(&format!(
                r#"<Override PartName="/{}" ContentType="{}"/>"#,
                name, content_type
            ));
        }
    }
    for (name, _) in static_files {
        if generated.contains(&name.as_str()) {
            continue;
        }
        if let Some(content_type) = content_type_for(name) {
            xml.push_str(&format!(
                r#"<Override PartName="/{}" ContentType="{}"/>"#,
                name, content_type
            ));
        }
    }
    xml.push_str("</Types>");
    xml
}
