//! # Template Directory
//!
//! All label templates live in one directory, identified by file name:
//!
//! ```text
//! templates/
//! ├── asset.zpl   stored on Zebra printers as E:ASSET.ZPL
//! ├── box.zpl     stored on Zebra printers as E:BOX.ZPL
//! └── box.svg     rendered locally for Brother QL printers
//! ```
//!
//! ZPL templates are uploaded to the printer once when a printing session
//! starts; label jobs then recall them by name.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::LabelError;
use crate::render::SvgTemplate;
use crate::transport::PrinterTransport;

/// Default template directory, relative to the working directory
pub const DEFAULT_TEMPLATE_DIR: &str = "templates";

#[derive(Debug, Clone)]
pub struct TemplateDir {
    root: PathBuf,
}

impl TemplateDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a template file. Names containing path separators are rejected.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, LabelError> {
        if name.is_empty() || name.contains(['/', '\\']) || name == ".." {
            return Err(LabelError::Template(format!("invalid template name '{}'", name)));
        }
        let path = self.root.join(name);
        if !path.is_file() {
            return Err(LabelError::Template(format!(
                "template '{}' not found in {}",
                name,
                self.root.display()
            )));
        }
        Ok(path)
    }

    /// ZPL template files, sorted by name.
    pub fn zpl_templates(&self) -> Result<Vec<PathBuf>, LabelError> {
        let entries = fs::read_dir(&self.root).map_err(|e| {
            LabelError::Template(format!("{}: {}", self.root.display(), e))
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "zpl") {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }

    /// Send every ZPL template to the printer. Returns how many were sent.
    pub fn upload_zpl_templates(&self, transport: &dyn PrinterTransport) -> Result<usize, LabelError> {
        let templates = self.zpl_templates()?;
        for path in &templates {
            let body = fs::read(path)?;
            transport.send_raw(&body)?;
            info!(template = %path.display(), bytes = body.len(), "Uploaded template");
        }
        Ok(templates.len())
    }

    /// Load and parse an SVG template.
    pub fn svg(&self, name: &str) -> Result<SvgTemplate, LabelError> {
        SvgTemplate::load(&self.resolve(name)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::Delivery;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingTransport {
        sent: RefCell<Vec<Vec<u8>>>,
    }

    impl PrinterTransport for RecordingTransport {
        fn send_raw(&self, data: &[u8]) -> Result<Delivery, LabelError> {
            self.sent.borrow_mut().push(data.to_vec());
            Ok(Delivery::Submitted)
        }
    }

    fn dir_with(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, body) in files {
            fs::write(dir.path().join(name), body).unwrap();
        }
        dir
    }

    #[test]
    fn test_upload_sends_zpl_in_order() {
        let dir = dir_with(&[
            ("box.zpl", "^XA^DFE:BOX.ZPL^FS^XZ"),
            ("asset.zpl", "^XA^DFE:ASSET.ZPL^FS^XZ"),
            ("box.svg", "<svg/>"),
        ]);
        let templates = TemplateDir::new(dir.path());
        let transport = RecordingTransport::default();

        assert_eq!(templates.upload_zpl_templates(&transport).unwrap(), 2);
        assert_eq!(
            transport.sent.into_inner(),
            vec![
                b"^XA^DFE:ASSET.ZPL^FS^XZ".to_vec(),
                b"^XA^DFE:BOX.ZPL^FS^XZ".to_vec()
            ]
        );
    }

    #[test]
    fn test_svg_template() {
        let dir = dir_with(&[("box.svg", r#"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1"/>"#)]);
        let templates = TemplateDir::new(dir.path());
        assert_eq!(templates.svg("box.svg").unwrap().name(), "box.svg");
    }

    #[test]
    fn test_missing_and_invalid_names() {
        let dir = dir_with(&[("bad.svg", "<svg")]);
        let templates = TemplateDir::new(dir.path());
        assert!(matches!(templates.svg("nope.svg"), Err(LabelError::Template(_))));
        assert!(matches!(templates.svg("../box.svg"), Err(LabelError::Template(_))));
        assert!(matches!(templates.svg("bad.svg"), Err(LabelError::Template(_))));
    }

    #[test]
    fn test_missing_directory() {
        let templates = TemplateDir::new("/nonexistent/templates");
        assert!(matches!(templates.zpl_templates(), Err(LabelError::Template(_))));
    }

    #[test]
    fn test_shipped_templates() {
        let templates = TemplateDir::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates"));
        let names: Vec<String> = templates
            .zpl_templates()
            .unwrap()
            .iter()
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        assert_eq!(names, vec!["asset.zpl", "box.zpl"]);
        templates.svg("box.svg").unwrap();
    }
}
