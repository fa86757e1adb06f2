//! In-memory document head.
//!
//! Stands in for a browser document in tests and in the native CLI.

use crate::host::{HostError, ViewportHost};
use html5ever::tendril::TendrilSink as _;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{ParseOpts, parse_document};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use std::fmt::Write as _;
use tracing::debug;

/// Identifier of a meta element in a [`MemoryDocument`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(u64);

/// A `<meta>` element and its attributes, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaElement {
    id: ElementId,
    attributes: Vec<(String, String)>,
}

impl MetaElement {
    /// Element identifier
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Attribute value by name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// All attributes in order
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.attributes.push((name.to_string(), value.to_string())),
        }
    }

    /// Render as HTML
    pub fn to_html(&self) -> String {
        let mut html = String::from("<meta");
        for (name, value) in &self.attributes {
            let _ = write!(html, " {}=\"{}\"", name, value.replace('&', "&amp;").replace('"', "&quot;"));
        }
        html.push('>');
        html
    }
}

/// Document head holding meta elements, plus a simulated screen.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    head: Vec<MetaElement>,
    detached: Vec<MetaElement>,
    screen_width: Option<u32>,
    next_id: u64,
    replacements: usize,
}

impl MemoryDocument {
    /// Create an empty document with no screen.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document with a single viewport tag.
    pub fn with_viewport(content: &str, screen_width: u32) -> Self {
        let mut doc = Self::new();
        doc.push_meta(vec![
            (String::from("name"), String::from("viewport")),
            (String::from("content"), content.to_string()),
        ]);
        doc.set_screen_width(screen_width);
        doc
    }

    /// Build a document from the `<meta>` tags of an HTML fragment or page.
    pub fn from_html(html: &str) -> std::io::Result<Self> {
        let opts = ParseOpts {
            tree_builder: TreeBuilderOpts {
                exact_errors: false,
                scripting_enabled: false,
                ..TreeBuilderOpts::default()
            },
            ..ParseOpts::default()
        };

        let dom = parse_document(RcDom::default(), opts)
            .from_utf8()
            .read_from(&mut html.as_bytes())?;

        let mut doc = Self::new();
        collect_meta(&dom.document, &mut doc);
        debug!("Parsed {} meta tags from HTML", doc.head.len());
        Ok(doc)
    }

    /// Append a meta element to the head.
    pub fn push_meta(&mut self, attributes: Vec<(String, String)>) -> ElementId {
        let id = self.allocate_id();
        self.head.push(MetaElement { id, attributes });
        id
    }

    /// Set the simulated screen width.
    pub fn set_screen_width(&mut self, width: u32) {
        self.screen_width = Some(width);
    }

    /// Elements currently in the head.
    pub fn head(&self) -> &[MetaElement] {
        &self.head
    }

    /// Look up an element, attached or detached.
    pub fn element(&self, id: ElementId) -> Option<&MetaElement> {
        self.head
            .iter()
            .chain(self.detached.iter())
            .find(|e| e.id == id)
    }

    /// Whether an element is still in the head.
    pub fn is_attached(&self, id: ElementId) -> bool {
        self.head.iter().any(|e| e.id == id)
    }

    /// Number of viewport replacements performed.
    pub fn replacements(&self) -> usize {
        self.replacements
    }

    /// Render the head as HTML, one tag per line.
    pub fn outer_html(&self) -> String {
        self.head
            .iter()
            .map(MetaElement::to_html)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn allocate_id(&mut self) -> ElementId {
        self.next_id += 1;
        ElementId(self.next_id)
    }
}

impl ViewportHost for MemoryDocument {
    type Element = ElementId;

    fn find_viewport(&self, meta_name: &str) -> Option<ElementId> {
        self.head
            .iter()
            .find(|e| e.attribute("name") == Some(meta_name))
            .map(|e| e.id)
    }

    fn content(&self, element: &ElementId) -> Option<String> {
        self.element(*element)
            .and_then(|e| e.attribute("content"))
            .map(str::to_string)
    }

    fn screen_width(&self) -> Result<u32, HostError> {
        self.screen_width.ok_or(HostError::NoWindow)
    }

    fn replace_viewport(&mut self, element: &ElementId, content: &str) -> Result<ElementId, HostError> {
        let position = self
            .head
            .iter()
            .position(|e| e.id == *element)
            .ok_or(HostError::Detached)?;

        let id = self.allocate_id();
        let mut replacement = self.head[position].clone();
        replacement.id = id;
        replacement.set_attribute("content", content);

        let old = self.head.remove(position);
        self.detached.push(old);
        self.head.push(replacement);
        self.replacements += 1;

        Ok(id)
    }
}

fn collect_meta(handle: &Handle, doc: &mut MemoryDocument) {
    if let NodeData::Element { name, attrs, .. } = &handle.data {
        if &*name.local == "meta" {
            let attributes = attrs
                .borrow()
                .iter()
                .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                .collect();
            doc.push_meta(attributes);
        }
    }

    for child in handle.children.borrow().iter() {
        collect_meta(child, doc);
    }
}
