//! XMLTV document model, repairing parser, and serializer
//!
//! Channel and programme elements are retained as generic owned trees
//! rather than typed structs: the merge pipeline never interprets their
//! children (titles, icons, categories, ...), it only moves whole
//! elements into the merged output, so an opaque tree loses nothing.

pub mod parser;
pub mod writer;

/// One XML element with its attributes and child nodes, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

/// A child of an [`Element`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// One parsed EPG document: the channel and programme children of the
/// `tv` root, in document order. Everything else under the root is
/// dropped, since only channels and programmes ever reach the output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub channels: Vec<Element>,
    pub programmes: Vec<Element>,
}

impl Element {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Look up an attribute value by name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Concatenated direct text content of this element
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(text) => Some(text.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }
}
