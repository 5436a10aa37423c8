use std::path::Path;
use std::str;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::SdfError;

/// Index of a node inside an [`XmlTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct XmlNode {
    tag: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<NodeId>,
}

/// An editable element tree parsed from structured markup.
///
/// Nodes live in an arena and are addressed by [`NodeId`], so several places
/// outside the tree can hold on to the same element and edit it later
/// without aliasing the element itself.
#[derive(Debug, Clone)]
pub struct XmlTree {
    nodes: Vec<XmlNode>,
}

impl XmlTree {
    /// Parse a markup document into a tree.
    ///
    /// Declarations, comments, and processing instructions are dropped;
    /// only elements, their attributes, and their text survive. The parse
    /// is strict about two things the downstream repair pass relies on:
    /// an XML declaration must sit at the very start of the document, and
    /// every element must be closed.
    pub fn parse(content: &str) -> Result<Self, quick_xml::Error> {
        let trimmed = content.trim_start();
        if trimmed.len() != content.len() && trimmed.starts_with("<?xml") {
            return Err(quick_xml::Error::UnexpectedToken(
                "XML declaration is not at the start of the document".to_owned(),
            ));
        }

        let mut reader = Reader::from_str(content);
        reader.trim_text(true);

        let mut nodes: Vec<XmlNode> = Vec::new();
        let mut stack: Vec<usize> = Vec::new();
        let mut root: Option<usize> = None;

        loop {
            match reader.read_event()? {
                Event::Start(start) => {
                    let index = push_node(&mut nodes, &start)?;
                    attach(&mut nodes, &stack, &mut root, index)?;
                    stack.push(index);
                }
                Event::Empty(start) => {
                    let index = push_node(&mut nodes, &start)?;
                    attach(&mut nodes, &stack, &mut root, index)?;
                }
                Event::Text(text) => {
                    let value = text.unescape()?;
                    if let Some(&current) = stack.last() {
                        let slot = &mut nodes[current].text;
                        match slot {
                            Some(existing) => existing.push_str(&value),
                            None => *slot = Some(value.into_owned()),
                        }
                    }
                }
                Event::End(_) => {
                    stack.pop();
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(quick_xml::Error::UnexpectedEof(
                "document ends with unclosed elements".to_owned(),
            ));
        }
        if root.is_none() {
            return Err(quick_xml::Error::UnexpectedEof(
                "document has no root element".to_owned(),
            ));
        }

        Ok(Self { nodes })
    }

    /// The document's root element.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Tag name of a node.
    pub fn tag(&self, id: NodeId) -> &str {
        self.nodes[id.0].tag.as_str()
    }

    /// Text content of a node, if it has any.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.nodes[id.0].text.as_deref()
    }

    /// Replace a node's text content.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        self.nodes[id.0].text = Some(text.into());
    }

    /// Value of a node's attribute, if present.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.nodes[id.0]
            .attributes
            .iter()
            .find(|(key, _)| key.as_str() == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing an existing value of the same name.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        let value = value.into();
        let node = &mut self.nodes[id.0];
        match node.attributes.iter_mut().find(|(key, _)| key.as_str() == name) {
            Some((_, existing)) => *existing = value,
            None => node.attributes.push((name.to_owned(), value)),
        }
    }

    /// Direct element children of a node, in document order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes[id.0].children.iter().copied()
    }

    /// First direct child with the given tag.
    pub fn find_child(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        self.children(id).find(|&child| self.tag(child) == tag)
    }

    /// Every element of the document in depth-first order, root first.
    pub fn descendants(&self) -> impl Iterator<Item = NodeId> + '_ {
        let mut stack = vec![self.root()];
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(self.nodes[next.0].children.iter().rev().copied());
            Some(next)
        })
    }

    /// Append a new empty child element and return its id.
    pub fn add_child(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(XmlNode {
            tag: tag.to_owned(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Serialize the tree back to indented markup.
    pub fn to_xml(&self) -> Result<String, quick_xml::Error> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        self.write_node(&mut writer, self.root())?;
        let bytes = writer.into_inner();
        String::from_utf8(bytes).map_err(|e| quick_xml::Error::NonDecodable(Some(e.utf8_error())))
    }

    /// Serialize the whole tree to a file, overwriting it.
    pub fn save(&self, path: &Path) -> Result<(), SdfError> {
        let content = self.to_xml().map_err(|e| SdfError::Write {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|e| SdfError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn write_node(&self, writer: &mut Writer<Vec<u8>>, id: NodeId) -> Result<(), quick_xml::Error> {
        let node = &self.nodes[id.0];
        let mut start = BytesStart::new(node.tag.as_str());
        for (key, value) in &node.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if node.text.is_none() && node.children.is_empty() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        writer.write_event(Event::Start(start))?;
        if let Some(text) = &node.text {
            writer.write_event(Event::Text(BytesText::new(text)))?;
        }
        for &child in &node.children {
            self.write_node(writer, child)?;
        }
        writer.write_event(Event::End(BytesEnd::new(node.tag.as_str())))?;
        Ok(())
    }
}

fn push_node(nodes: &mut Vec<XmlNode>, start: &BytesStart) -> Result<usize, quick_xml::Error> {
    let tag = decode(start.name().as_ref())?;
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::InvalidAttr)?;
        let key = decode(attribute.key.as_ref())?;
        let value = attribute.unescape_value()?.into_owned();
        attributes.push((key, value));
    }
    nodes.push(XmlNode {
        tag,
        attributes,
        text: None,
        children: Vec::new(),
    });
    Ok(nodes.len() - 1)
}

fn attach(
    nodes: &mut [XmlNode],
    stack: &[usize],
    root: &mut Option<usize>,
    index: usize,
) -> Result<(), quick_xml::Error> {
    match stack.last() {
        Some(&parent) => nodes[parent].children.push(NodeId(index)),
        None => {
            if root.is_some() {
                return Err(quick_xml::Error::UnexpectedToken(
                    "second root element".to_owned(),
                ));
            }
            *root = Some(index);
        }
    }
    Ok(())
}

fn decode(raw: &[u8]) -> Result<String, quick_xml::Error> {
    str::from_utf8(raw)
        .map(str::to_owned)
        .map_err(|e| quick_xml::Error::NonDecodable(Some(e)))
}
