//! Markup tree access for the button-map converters
//!
//! The converters only need a handful of element operations, captured by
//! [`MarkupNode`]. [`Element`] is the in-memory implementation, read from and
//! written to XML text with quick-xml.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use tracing::debug;

use crate::error::ButtonMapError;

/// Element operations the converters depend on
pub trait MarkupNode: Sized {
    /// Tag name of this element
    fn tag(&self) -> &str;

    /// Attribute value by name, `None` when absent
    fn attribute(&self, name: &str) -> Option<&str>;

    /// Set an attribute, replacing any existing value
    fn set_attribute(&mut self, name: &str, value: &str);

    /// Set an attribute to the decimal text of `value`
    fn set_int_attribute(&mut self, name: &str, value: i64) {
        self.set_attribute(name, &value.to_string());
    }

    /// Append a new empty child element, returning it for filling in
    ///
    /// `None` means the tree refused the child.
    fn append_child(&mut self, tag: &str) -> Option<&mut Self>;

    /// Child elements with the given tag, in document order
    fn children_named(&self, tag: &str) -> Vec<&Self>;

    /// First child element with the given tag
    fn first_child(&self, tag: &str) -> Option<&Self> {
        self.children_named(tag).into_iter().next()
    }
}

/// Owned XML element with ordered attributes and child elements
///
/// Text content is not kept; button maps carry everything in attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attributes in insertion order
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Parse an XML document and return its root element
    pub fn parse(xml: &str) -> Result<Self, ButtonMapError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event()? {
                Event::Start(start) => {
                    stack.push(Self::from_start(&start)?);
                }
                Event::Empty(start) => {
                    let element = Self::from_start(&start)?;
                    Self::attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| ButtonMapError::Parse("unmatched end tag".to_string()))?;
                    Self::attach(&mut stack, &mut root, element)?;
                }
                Event::Eof => break,
                // Declarations, comments, text and processing instructions
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(ButtonMapError::Parse(format!(
                "unclosed <{}> element",
                open.name
            )));
        }
        root.ok_or_else(|| ButtonMapError::Parse("document has no root element".to_string()))
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self, ButtonMapError> {
        let name = std::str::from_utf8(start.name().as_ref())
            .map_err(|e| ButtonMapError::Parse(e.to_string()))?
            .to_string();
        let mut element = Element::new(name);

        for attr in start.attributes() {
            let attr = attr.map_err(|e| ButtonMapError::Parse(e.to_string()))?;
            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| ButtonMapError::Parse(e.to_string()))?;
            let value = attr.unescape_value()?;
            element.set_attribute(key, &value);
        }
        Ok(element)
    }

    fn attach(
        stack: &mut [Element],
        root: &mut Option<Element>,
        element: Element,
    ) -> Result<(), ButtonMapError> {
        match stack.last_mut() {
            Some(parent) => parent.children.push(element),
            None if root.is_none() => *root = Some(element),
            None => {
                return Err(ButtonMapError::Parse(format!(
                    "second root element <{}>",
                    element.name
                )))
            }
        }
        Ok(())
    }

    /// Write this element as a complete XML document
    ///
    /// `indent` is the number of spaces per nesting level; 0 writes a single
    /// line.
    pub fn to_xml(&self, indent: usize) -> Result<String, ButtonMapError> {
        let mut writer = if indent == 0 {
            Writer::new(Vec::new())
        } else {
            Writer::new_with_indent(Vec::new(), b' ', indent)
        };

        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(|e| ButtonMapError::Write(e.to_string()))?;
        self.write_to(&mut writer)?;

        let bytes = writer.into_inner();
        let xml = String::from_utf8(bytes).map_err(|e| ButtonMapError::Write(e.to_string()))?;
        debug!(root = %self.name, bytes = xml.len(), "Wrote XML document");
        Ok(xml)
    }

    fn write_to(&self, writer: &mut Writer<Vec<u8>>) -> Result<(), ButtonMapError> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() {
            writer
                .write_event(Event::Empty(start))
                .map_err(|e| ButtonMapError::Write(e.to_string()))?;
            return Ok(());
        }

        writer
            .write_event(Event::Start(start))
            .map_err(|e| ButtonMapError::Write(e.to_string()))?;
        for child in &self.children {
            child.write_to(writer)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(self.name.as_str())))
            .map_err(|e| ButtonMapError::Write(e.to_string()))?;
        Ok(())
    }
}

impl MarkupNode for Element {
    fn tag(&self) -> &str {
        &self.name
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        if let Some(slot) = self.attributes.iter_mut().find(|(k, _)| k == name) {
            slot.1 = value.to_string();
        } else {
            self.attributes.push((name.to_string(), value.to_string()));
        }
    }

    fn append_child(&mut self, tag: &str) -> Option<&mut Self> {
        self.children.push(Element::new(tag));
        self.children.last_mut()
    }

    fn children_named(&self, tag: &str) -> Vec<&Self> {
        self.children.iter().filter(|c| c.name == tag).collect()
    }
}
