//! Lowering of small inline-HTML fragments to formatted runs
//!
//! Question bodies, options, and explanations arrive from the web editor as
//! HTML fragments: top-level `<p>` blocks with `<i>`, `<b>`, `<sup>` and
//! `<sub>` inline formatting. Anything else is unwrapped transparently, so
//! `<span><b>x</b></span>` still renders `x` bold. Fragments that fail to
//! parse degrade to tag-stripped plain text instead of aborting generation.

use log::warn;
use once_cell::sync::Lazy;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;

use super::error::DocxError;
use super::types::{Run, RunProperties};

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>?").unwrap());

/// Lower a fragment to paragraphs of runs, degrading on malformed markup
pub fn lower_fragment(fragment: &str) -> Vec<Vec<Run>> {
    match parse_blocks(fragment) {
        Ok(blocks) => blocks,
        Err(error) => {
            warn!("unparseable markup ({}), degrading to plain text: {:?}", error, fragment);
            vec![vec![Run::plain(&strip_tags(fragment))]]
        }
    }
}

/// Parse a fragment into block-level paragraph pieces of formatted runs.
///
/// Each top-level `<p>` becomes one block; bare top-level text becomes a
/// block of its own. Formatting tags accumulate flags down the tree and
/// unknown tags contribute nothing but their children.
pub fn parse_blocks(fragment: &str) -> Result<Vec<Vec<Run>>, DocxError> {
    let mut reader = Reader::from_reader(fragment.as_bytes());
    let config = reader.config_mut();
    config.trim_text(false);
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    let mut blocks: Vec<Vec<Run>> = Vec::new();
    let mut current: Vec<Run> = Vec::new();
    let mut formatting: Vec<RunProperties> = vec![RunProperties::default()];
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| DocxError::Markup(e.to_string()))?;
        match event {
            Event::Eof => break,
            Event::Start(start) => {
                let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                if name.eq_ignore_ascii_case("p") {
                    flush_block(&mut current, &mut blocks);
                } else {
                    let inherited = formatting.last().copied().unwrap_or_default();
                    formatting.push(apply_tag(inherited, &name));
                }
            }
            Event::End(end) => {
                let name = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                if name.eq_ignore_ascii_case("p") {
                    flush_block(&mut current, &mut blocks);
                } else if formatting.len() > 1 {
                    formatting.pop();
                }
            }
            Event::Empty(_) => {}
            Event::Text(text) => {
                let content = match text.unescape() {
                    Ok(unescaped) => unescaped.into_owned(),
                    // Editors emit HTML entities XML does not know about.
                    Err(_) => unescape_html(&String::from_utf8_lossy(text.as_ref())),
                };
                if !content.is_empty() {
                    let properties = formatting.last().copied().unwrap_or_default();
                    current.push(Run::new(&content, properties));
                }
            }
            _ => {}
        }
    }

    flush_block(&mut current, &mut blocks);
    Ok(blocks)
}

/// Close the current block, dropping the whitespace that separates `<p>`
/// elements in editor markup
fn flush_block(current: &mut Vec<Run>, blocks: &mut Vec<Vec<Run>>) {
    if current.iter().any(|run| !run.text.trim().is_empty()) {
        blocks.push(std::mem::take(current));
    } else {
        current.clear();
    }
}

fn apply_tag(mut properties: RunProperties, tag: &str) -> RunProperties {
    match tag.to_ascii_lowercase().as_str() {
        "i" => properties.italic = true,
        "b" => properties.bold = true,
        "sup" => return properties.superscript(),
        "sub" => return properties.subscript(),
        _ => {}
    }
    properties
}

/// Remove markup and resolve the common entities, for the degraded path
fn strip_tags(fragment: &str) -> String {
    let stripped = TAG_RE.replace_all(fragment, "");
    unescape_html(&stripped)
}

fn unescape_html(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::types::VertAlign;

    #[test]
    fn test_single_paragraph_with_italic() {
        let blocks = parse_blocks("<p>Hello <i>world</i></p>").unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].len(), 2);
        assert_eq!(blocks[0][0], Run::plain("Hello "));
        assert_eq!(blocks[0][1].text, "world");
        assert!(blocks[0][1].properties.italic);
    }

    #[test]
    fn test_nested_tags_accumulate_flags() {
        let blocks = parse_blocks("<p><b>Ca<sup>2+</sup></b></p>").unwrap();
        let runs = &blocks[0];
        assert_eq!(runs[0].text, "Ca");
        assert!(runs[0].properties.bold);
        assert_eq!(runs[1].text, "2+");
        assert!(runs[1].properties.bold);
        assert_eq!(runs[1].properties.vert_align, Some(VertAlign::Superscript));
    }

    #[test]
    fn test_unknown_tags_are_unwrapped() {
        let blocks = parse_blocks("<p><span><b>strong</b></span> tail</p>").unwrap();
        let runs = &blocks[0];
        assert!(runs[0].properties.bold);
        assert_eq!(runs[1], Run::plain(" tail"));
    }

    #[test]
    fn test_multiple_blocks() {
        let blocks = parse_blocks("<p>one</p><p>two</p>").unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0][0].text, "one");
        assert_eq!(blocks[1][0].text, "two");
    }

    #[test]
    fn test_whitespace_between_blocks_is_dropped() {
        let blocks = parse_blocks("<p>one</p>\n  <p>two</p>\n").unwrap();
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn test_bare_text_is_one_block() {
        let blocks = parse_blocks("just text").unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0][0], Run::plain("just text"));
    }

    #[test]
    fn test_entities_are_resolved() {
        let blocks = parse_blocks("<p>Na&amp;K pump</p>").unwrap();
        assert_eq!(blocks[0][0].text, "Na&K pump");
    }

    #[test]
    fn test_empty_fragment_yields_no_blocks() {
        assert!(parse_blocks("").unwrap().is_empty());
        assert!(parse_blocks("<p></p>").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_markup_degrades_to_plain_text() {
        // An unterminated comment is a hard reader error, not just sloppy tags.
        let blocks = lower_fragment("<p>broken fragment <!--");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].len(), 1);
        let text = &blocks[0][0].text;
        assert!(text.contains("broken fragment"));
        assert!(!text.contains('<'));
        assert!(blocks[0][0].properties.is_plain());
    }

    #[test]
    fn test_strip_tags_resolves_entities() {
        assert_eq!(strip_tags("<p>a &amp; b</p>"), "a & b");
    }
}
