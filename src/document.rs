/*!
 * Ipe document handling.
 *
 * An Ipe slide deck is an XML tree of `<page>` elements containing `<text>`
 * leaf nodes among other graphical elements. This module parses a document
 * into an owned node tree, preserves everything that is not label text
 * (attributes, ordering, comments, CDATA, processing instructions), and
 * serializes it back with the XML declaration.
 */

use std::path::Path;

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::errors::DocumentError;

/// A single node in the parsed document tree
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    /// A child element
    Element(XmlElement),
    /// Character data (unescaped)
    Text(String),
    /// CDATA section content
    CData(String),
    /// Comment content, without the `<!--` / `-->` markers
    Comment(String),
    /// Processing instruction content, without the `<?` / `?>` markers
    ProcessingInstruction(String),
    /// Doctype declaration content
    DocType(String),
}

/// An element with its attributes and children, in document order
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    /// Tag name
    pub name: String,
    /// Attributes in source order
    pub attributes: Vec<(String, String)>,
    /// Child nodes in document order
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    /// Create an empty element with the given tag name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Concatenated character data of the direct text children
    pub fn text_content(&self) -> String {
        let mut content = String::new();
        for child in &self.children {
            match child {
                XmlNode::Text(t) | XmlNode::CData(t) => content.push_str(t),
                _ => {}
            }
        }
        content
    }

    /// Replace the character data of this element, keeping child elements
    /// and comments in place
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children
            .retain(|c| !matches!(c, XmlNode::Text(_) | XmlNode::CData(_)));
        self.children.insert(0, XmlNode::Text(text.into()));
    }

    fn visit_named<'a>(&'a self, tag: &str, visit: &mut impl FnMut(&'a XmlElement)) {
        for child in &self.children {
            if let XmlNode::Element(elem) = child {
                if elem.name == tag {
                    visit(elem);
                }
                elem.visit_named(tag, visit);
            }
        }
    }

    fn visit_named_mut(&mut self, tag: &str, visit: &mut impl FnMut(&mut XmlElement)) {
        for child in &mut self.children {
            if let XmlNode::Element(elem) = child {
                if elem.name == tag {
                    visit(elem);
                }
                elem.visit_named_mut(tag, visit);
            }
        }
    }
}

/// A parsed Ipe document
#[derive(Debug, Clone, PartialEq)]
pub struct IpeDocument {
    /// Nodes appearing before the root element (comments, doctype)
    pub prolog: Vec<XmlNode>,
    /// The root element, normally `<ipe>`
    pub root: XmlElement,
    /// Nodes appearing after the root element
    pub trailing: Vec<XmlNode>,
}

impl IpeDocument {
    /// Parse a document from an XML string
    pub fn parse_str(xml: &str) -> Result<Self, DocumentError> {
        let mut reader = Reader::from_str(xml);
        // Whitespace between graphical elements is part of the document;
        // never trim text events.

        let mut prolog: Vec<XmlNode> = Vec::new();
        let mut trailing: Vec<XmlNode> = Vec::new();
        let mut root: Option<XmlElement> = None;
        let mut stack: Vec<XmlElement> = Vec::new();

        loop {
            let event = reader
                .read_event()
                .map_err(|e| DocumentError::Xml(format!("at byte {}: {}", reader.buffer_position(), e)))?;
            match event {
                Event::Start(ref e) => {
                    stack.push(element_from_start(e)?);
                }
                Event::Empty(ref e) => {
                    let elem = element_from_start(e)?;
                    push_node(&mut stack, &mut prolog, &mut trailing, &root, XmlNode::Element(elem));
                }
                Event::End(_) => {
                    let elem = stack.pop().ok_or_else(|| {
                        DocumentError::Xml("unexpected closing tag".to_string())
                    })?;
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(XmlNode::Element(elem));
                    } else {
                        root = Some(elem);
                    }
                }
                Event::Text(ref e) => {
                    let text = e
                        .unescape()
                        .map_err(|e| DocumentError::Xml(e.to_string()))?
                        .into_owned();
                    // Inter-element whitespace outside the root carries no meaning
                    if stack.is_empty() && text.trim().is_empty() {
                        continue;
                    }
                    push_node(&mut stack, &mut prolog, &mut trailing, &root, XmlNode::Text(text));
                }
                Event::CData(ref e) => {
                    let content = String::from_utf8_lossy(e).into_owned();
                    push_node(&mut stack, &mut prolog, &mut trailing, &root, XmlNode::CData(content));
                }
                Event::Comment(ref e) => {
                    let content = String::from_utf8_lossy(e).into_owned();
                    push_node(&mut stack, &mut prolog, &mut trailing, &root, XmlNode::Comment(content));
                }
                Event::PI(ref e) => {
                    let content = String::from_utf8_lossy(e).into_owned();
                    push_node(
                        &mut stack,
                        &mut prolog,
                        &mut trailing,
                        &root,
                        XmlNode::ProcessingInstruction(content),
                    );
                }
                Event::DocType(ref e) => {
                    let content = String::from_utf8_lossy(e).into_owned();
                    push_node(&mut stack, &mut prolog, &mut trailing, &root, XmlNode::DocType(content));
                }
                Event::Decl(_) => {
                    // Re-emitted on serialization
                }
                Event::Eof => break,
            }
        }

        if !stack.is_empty() {
            return Err(DocumentError::Xml("unclosed element at end of input".to_string()));
        }

        Ok(Self {
            prolog,
            root: root.ok_or(DocumentError::MissingRoot)?,
            trailing,
        })
    }

    /// Parse a document from a file on disk
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self, DocumentError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| DocumentError::Xml(format!("failed to read {:?}: {}", path.as_ref(), e)))?;
        Self::parse_str(&content)
    }

    /// Serialize the document back to XML, including the declaration
    pub fn to_xml_string(&self) -> Result<String, DocumentError> {
        let mut writer = Writer::new(Vec::new());
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", None, None)))
            .map_err(|e| DocumentError::Xml(e.to_string()))?;
        write_newline(&mut writer)?;
        for node in &self.prolog {
            write_node(&mut writer, node)?;
            write_newline(&mut writer)?;
        }
        write_element(&mut writer, &self.root)?;
        for node in &self.trailing {
            write_newline(&mut writer)?;
            write_node(&mut writer, node)?;
        }
        write_newline(&mut writer)?;
        String::from_utf8(writer.into_inner())
            .map_err(|e| DocumentError::Xml(format!("serialized document is not UTF-8: {}", e)))
    }

    /// Serialize the document to a file on disk
    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<(), DocumentError> {
        let xml = self.to_xml_string()?;
        std::fs::write(path.as_ref(), xml)
            .map_err(|e| DocumentError::Xml(format!("failed to write {:?}: {}", path.as_ref(), e)))
    }

    /// Visit every `<text>` element, page by page, in document order
    pub fn for_each_text_element<'a>(&'a self, mut visit: impl FnMut(&'a XmlElement)) {
        let mut pages: Vec<&XmlElement> = Vec::new();
        self.root.visit_named("page", &mut |page| pages.push(page));
        for page in pages {
            page.visit_named("text", &mut visit);
        }
    }

    /// Visit every `<text>` element mutably, page by page, in document order
    pub fn for_each_text_element_mut(&mut self, mut visit: impl FnMut(&mut XmlElement)) {
        self.for_each_text_element_located_mut(|_, _, elem| visit(elem));
    }

    /// Like [`Self::for_each_text_element_mut`], also passing the zero-based
    /// page index and the text-node index within the page
    pub fn for_each_text_element_located_mut(
        &mut self,
        mut visit: impl FnMut(usize, usize, &mut XmlElement),
    ) {
        let mut page_idx = 0;
        self.root.visit_named_mut("page", &mut |page| {
            let mut index = 0;
            page.visit_named_mut("text", &mut |elem| {
                visit(page_idx, index, elem);
                index += 1;
            });
            page_idx += 1;
        });
    }

    /// Number of `<text>` elements with non-blank content
    pub fn count_translatable_text_elements(&self) -> usize {
        let mut count = 0;
        self.for_each_text_element(|elem| {
            if !elem.text_content().trim().is_empty() {
                count += 1;
            }
        });
        count
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlElement, DocumentError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| DocumentError::Xml(format!("bad attribute in <{}>: {}", name, e)))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| DocumentError::Xml(e.to_string()))?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(XmlElement {
        name,
        attributes,
        children: Vec::new(),
    })
}

fn push_node(
    stack: &mut [XmlElement],
    prolog: &mut Vec<XmlNode>,
    trailing: &mut Vec<XmlNode>,
    root: &Option<XmlElement>,
    node: XmlNode,
) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    } else if root.is_none() {
        prolog.push(node);
    } else {
        trailing.push(node);
    }
}

fn write_newline(writer: &mut Writer<Vec<u8>>) -> Result<(), DocumentError> {
    writer
        .write_event(Event::Text(BytesText::from_escaped("\n")))
        .map_err(|e| DocumentError::Xml(e.to_string()))
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &XmlNode) -> Result<(), DocumentError> {
    let result = match node {
        XmlNode::Element(elem) => return write_element(writer, elem),
        XmlNode::Text(text) => writer.write_event(Event::Text(BytesText::new(text))),
        XmlNode::CData(content) => writer.write_event(Event::CData(BytesCData::new(content.as_str()))),
        XmlNode::Comment(content) => {
            writer.write_event(Event::Comment(BytesText::from_escaped(content.as_str())))
        }
        XmlNode::ProcessingInstruction(content) => {
            writer.write_event(Event::PI(BytesText::from_escaped(content.as_str())))
        }
        XmlNode::DocType(content) => {
            writer.write_event(Event::DocType(BytesText::from_escaped(content.as_str())))
        }
    };
    result.map_err(|e| DocumentError::Xml(e.to_string()))
}

fn write_element(writer: &mut Writer<Vec<u8>>, elem: &XmlElement) -> Result<(), DocumentError> {
    let mut start = BytesStart::new(elem.name.as_str());
    for (key, value) in &elem.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if elem.children.is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(|e| DocumentError::Xml(e.to_string()));
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| DocumentError::Xml(e.to_string()))?;
    for child in &elem.children {
        write_node(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(elem.name.as_str())))
        .map_err(|e| DocumentError::Xml(e.to_string()))
}
