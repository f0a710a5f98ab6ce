//! # SVG Label Templates
//!
//! An SVG template is an ordinary drawing (typically made in Inkscape) with
//! a few well-known element IDs:
//!
//! ```text
//! <svg width="1100" height="696" viewBox="0 0 1100 696">
//!   <text><tspan id="boxid">Box 000</tspan></text>        ← text slots
//!   <text><tspan id="boxname">Name</tspan></text>
//!   <text><tspan id="contents1">…</tspan></text>
//!   <g id="qrcode" transform="…"/>                          ← QR slot
//! </svg>
//! ```
//!
//! Filling a template replaces the text of every slot whose ID matches a
//! field key and appends the QR fragment for the `qrcode` field to the QR
//! slot. Keys without a slot are skipped, so templates may leave out
//! optional fields.

use std::fs;
use std::path::Path;

use tracing::debug;
use xmltree::{Element, XMLNode};

use super::qr::make_qr_fragment;
use crate::error::LabelError;
use crate::label::{FieldSet, QR_FIELD};

/// ID of the group that receives the QR code
pub const QR_SLOT_ID: &str = "qrcode";

/// A parsed, immutable SVG template.
#[derive(Debug, Clone)]
pub struct SvgTemplate {
    name: String,
    root: Element,
}

impl SvgTemplate {
    /// Parse template source. `name` is used in error messages.
    pub fn parse(name: impl Into<String>, source: &[u8]) -> Result<Self, LabelError> {
        let name = name.into();
        let root = Element::parse(source)
            .map_err(|e| LabelError::Template(format!("{}: {}", name, e)))?;
        if root.name != "svg" {
            return Err(LabelError::Template(format!(
                "{}: root element is <{}>, expected <svg>",
                name, root.name
            )));
        }
        Ok(Self { name, root })
    }

    /// Load a template file; its file name becomes the template name.
    pub fn load(path: &Path) -> Result<Self, LabelError> {
        let source = fs::read(path)
            .map_err(|e| LabelError::Template(format!("{}: {}", path.display(), e)))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::parse(name, &source)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A filled-in SVG document, owned by one print job.
#[derive(Debug, Clone)]
pub struct SvgDocument {
    root: Element,
}

impl SvgDocument {
    pub fn parse(source: &[u8]) -> Result<Self, LabelError> {
        let root = Element::parse(source).map_err(|e| LabelError::Rasterization(e.to_string()))?;
        Ok(Self { root })
    }

    /// Attribute of the root `<svg>` element
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.root.attributes.get(name).map(String::as_str)
    }

    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        self.root.attributes.insert(name.to_string(), value.into());
    }

    /// Text content of the element with the given ID
    pub fn text_of(&self, id: &str) -> Option<String> {
        find(&self.root, &|el| has_id(el, id)).map(|el| {
            el.children
                .iter()
                .filter_map(|node| match node {
                    XMLNode::Text(text) | XMLNode::CData(text) => Some(text.as_str()),
                    _ => None,
                })
                .collect()
        })
    }

    /// Element with the given ID
    pub fn element(&self, id: &str) -> Option<&Element> {
        find(&self.root, &|el| has_id(el, id))
    }

    /// Serialize to XML bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, LabelError> {
        let mut out = Vec::new();
        self.root
            .write(&mut out)
            .map_err(|e| LabelError::Rasterization(format!("Failed to serialize SVG: {}", e)))?;
        Ok(out)
    }
}

/// Fill a template with field values and the QR code.
///
/// Fails with [`LabelError::TemplateMissingQrSlot`] if the template has no
/// `<g id="qrcode">`. A field set without a `qrcode` value leaves the slot
/// empty.
pub fn svg_from_template(template: &SvgTemplate, fields: &FieldSet) -> Result<SvgDocument, LabelError> {
    let mut root = template.root.clone();

    for (key, value) in fields.iter() {
        let key = key.to_string();
        match find_mut(&mut root, &|el| is_text_node(el) && has_id(el, &key)) {
            Some(node) => set_text(node, value),
            None => debug!(template = template.name(), field = %key, "No text node for field"),
        }
    }

    let slot = find_mut(&mut root, &|el| el.name == "g" && has_id(el, QR_SLOT_ID))
        .ok_or_else(|| LabelError::TemplateMissingQrSlot(template.name().to_string()))?;

    match fields.get(QR_FIELD) {
        Some(data) => {
            let fragment = make_qr_fragment(data)?;
            for mut element in fragment.elements {
                element.namespace = slot.namespace.clone();
                slot.children.push(XMLNode::Element(element));
            }
        }
        None => debug!(template = template.name(), "No QR code data, slot left empty"),
    }

    Ok(SvgDocument { root })
}

fn is_text_node(el: &Element) -> bool {
    el.name == "tspan" || el.name == "text"
}

fn has_id(el: &Element, id: &str) -> bool {
    el.attributes.get("id").is_some_and(|v| v == id)
}

/// Replace the text content, keeping child elements.
fn set_text(el: &mut Element, value: &str) {
    el.children
        .retain(|node| !matches!(node, XMLNode::Text(_) | XMLNode::CData(_)));
    el.children.insert(0, XMLNode::Text(value.to_string()));
}

/// Depth-first search, document order
fn find<'a>(el: &'a Element, pred: &dyn Fn(&Element) -> bool) -> Option<&'a Element> {
    if pred(el) {
        return Some(el);
    }
    el.children.iter().find_map(|node| match node {
        XMLNode::Element(child) => find(child, pred),
        _ => None,
    })
}

fn find_mut<'a>(el: &'a mut Element, pred: &dyn Fn(&Element) -> bool) -> Option<&'a mut Element> {
    if pred(el) {
        return Some(el);
    }
    for node in el.children.iter_mut() {
        if let XMLNode::Element(child) = node
            && let Some(found) = find_mut(child, pred)
        {
            return Some(found);
        }
    }
    None
}

// ============================================================================
// TESTS
// ============================================================================
