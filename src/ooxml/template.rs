//! Boilerplate template directory
//!
//! Every generated document starts from a static set of XML parts shipped in
//! a template directory: the styles/numbering base parts the registries
//! append into, and a handful of parts copied into the archive unchanged.
//! The directory is read-only at generation time and read afresh for each
//! document, so concurrent generations never share mutable state.

use std::fs;
use std::path::{Path, PathBuf};

use super::error::DocxError;

/// Archive path of the styles base part inside the template directory
pub const STYLES_BASE: &str = "word/stylesBase.xml";
/// Archive path of the numbering base part inside the template directory
pub const NUMBERING_BASE: &str = "word/numberingBase.xml";

/// Files never copied into the archive: the base parts are inputs, the rest
/// is OS noise.
const IGNORED_FILES: &[&str] = &[".DS_Store", "Thumbs.db", "stylesBase.xml", "numberingBase.xml"];

/// A loaded boilerplate template
#[derive(Debug, Clone)]
pub struct Template {
    dir: PathBuf,
    styles_base: String,
    numbering_base: String,
}

impl Template {
    /// Load a template directory. Both base parts are read eagerly so a
    /// missing or unreadable template fails before any output is produced.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, DocxError> {
        let dir = dir.as_ref().to_path_buf();
        let styles_base = read_part(&dir, STYLES_BASE)?;
        let numbering_base = read_part(&dir, NUMBERING_BASE)?;
        Ok(Template {
            dir,
            styles_base,
            numbering_base,
        })
    }

    /// The template shipped with this crate
    pub fn bundled() -> Result<Self, DocxError> {
        Template::open(concat!(env!("CARGO_MANIFEST_DIR"), "/template"))
    }

    pub fn styles_base(&self) -> &str {
        &self.styles_base
    }

    pub fn numbering_base(&self) -> &str {
        &self.numbering_base
    }

    /// Collect the copy-through files as (archive name, bytes) pairs, in a
    /// stable order, skipping the base parts and OS metadata.
    pub fn static_files(&self) -> Result<Vec<(String, Vec<u8>)>, DocxError> {
        let mut files = Vec::new();
        collect_files(&self.dir, &self.dir, &mut files)?;
        files.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(files)
    }
}

fn read_part(dir: &Path, name: &str) -> Result<String, DocxError> {
    let path = dir.join(name);
    fs::read_to_string(&path).map_err(|error| match error.kind() {
        std::io::ErrorKind::NotFound => DocxError::Template(path),
        _ => DocxError::Io(error),
    })
}

fn collect_files(
    root: &Path,
    dir: &Path,
    files: &mut Vec<(String, Vec<u8>)>,
) -> Result<(), DocxError> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_files(root, &path, files)?;
            continue;
        }
        let file_name = entry.file_name();
        let name = file_name.to_string_lossy();
        if IGNORED_FILES.contains(&name.as_ref()) {
            continue;
        }
        let archive_name = path
            .strip_prefix(root)
            .map_err(|_| DocxError::Template(path.clone()))?
            .components()
            .map(|component| component.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        files.push((archive_name, fs::read(&path)?));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_template_loads() {
        let template = Template::bundled().unwrap();
        assert!(template.styles_base().contains("<w:styles"));
        assert!(template.numbering_base().contains("<w:numbering"));
    }

    #[test]
    fn test_missing_template_dir_is_fatal() {
        let result = Template::open("/nonexistent/template/dir");
        assert!(matches!(result, Err(DocxError::Template(_))));
    }

    #[test]
    fn test_static_files_skip_base_parts() {
        let template = Template::bundled().unwrap();
        let files = template.static_files().unwrap();
        let names: Vec<&str> = files.iter().map(|(name, _)| name.as_str()).collect();
        assert!(names.contains(&"word/fontTable.xml"));
        assert!(names.contains(&"word/settings.xml"));
        assert!(names.contains(&"_rels/.rels"));
        assert!(!names.iter().any(|name| name.ends_with("stylesBase.xml")));
        assert!(!names.iter().any(|name| name.ends_with("numberingBase.xml")));
    }
}
