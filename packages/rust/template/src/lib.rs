//! Mutable HTML template trees with slot lookup and pretty serialization.
//!
//! A [`Template`] is an arena of nodes addressed by stable [`NodeId`]
//! indices; parent/child relations are index references, so mutation and
//! detached subtrees need no interior mutability or cyclic ownership.
//! Parsing delegates to html5ever via `scraper`; mutation and serialization
//! operate on the arena copy.

use std::path::Path;

use ego_tree::NodeRef;
use scraper::{Html, Node as HtmlNode};

use minutegen_shared::{MinutegenError, Result};

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Stable handle to one node in a [`Template`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(usize);

/// Node payload.
#[derive(Debug, Clone)]
enum NodeKind {
    /// The document root; never serialized itself.
    Document,
    Doctype(String),
    Comment(String),
    /// Ordinary text, entity-escaped on serialization.
    Text(String),
    /// Pre-built markup injected by a caller, serialized verbatim.
    Raw(String),
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
    },
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

// ---------------------------------------------------------------------------
// Template
// ---------------------------------------------------------------------------

/// A parsed HTML template as a mutable arena tree.
#[derive(Debug, Clone)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    /// Parse a template from HTML text.
    pub fn parse(html: &str) -> Self {
        let doc = Html::parse_document(html);
        let mut template = Self {
            nodes: vec![Node {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
            }],
        };
        template.copy_children(doc.tree.root(), NodeId(0));
        template
    }

    /// Load and parse a template file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| MinutegenError::io(path, e))?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "template loaded");
        Ok(Self::parse(&content))
    }

    /// Copy the children of a parsed html5ever node into the arena.
    fn copy_children(&mut self, src: NodeRef<'_, HtmlNode>, parent: NodeId) {
        for child in src.children() {
            match child.value() {
                HtmlNode::Element(el) => {
                    let attrs = el
                        .attrs()
                        .map(|(name, value)| (name.to_string(), value.to_string()))
                        .collect();
                    let id = self.push(
                        parent,
                        NodeKind::Element {
                            tag: el.name().to_string(),
                            attrs,
                        },
                    );
                    self.copy_children(child, id);
                }
                HtmlNode::Text(text) => {
                    self.push(parent, NodeKind::Text(text.text.to_string()));
                }
                HtmlNode::Comment(comment) => {
                    self.push(parent, NodeKind::Comment(comment.comment.to_string()));
                }
                HtmlNode::Doctype(doctype) => {
                    self.push(parent, NodeKind::Doctype(doctype.name.to_string()));
                }
                _ => {}
            }
        }
    }

    /// Append a node to the arena as `parent`'s last child.
    fn push(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    /// Find the first attached element whose `id` attribute equals `id`,
    /// in document order. Detached subtrees are not searched.
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let mut stack = vec![NodeId(0)];

        while let Some(current) = stack.pop() {
            let node = &self.nodes[current.0];
            if let NodeKind::Element { attrs, .. } = &node.kind {
                if attrs.iter().any(|(name, value)| name == "id" && value == id) {
                    return Some(current);
                }
            }
            // Reverse so the leftmost child is visited first.
            stack.extend(node.children.iter().rev());
        }

        None
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Append a new empty element as `parent`'s last child.
    pub fn add_child(&mut self, parent: NodeId, tag: &str) -> NodeId {
        self.push(
            parent,
            NodeKind::Element {
                tag: tag.to_string(),
                attrs: Vec::new(),
            },
        )
    }

    /// Append a new element whose inner markup is `content`.
    ///
    /// The content is interpreted as pre-built markup and is not escaped,
    /// so callers may inject extracted fragments and anchor tags.
    pub fn add_child_with_content(&mut self, parent: NodeId, tag: &str, content: &str) -> NodeId {
        let element = self.add_child(parent, tag);
        self.push(element, NodeKind::Raw(content.to_string()));
        element
    }

    /// Set or overwrite an attribute on an element node.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let NodeKind::Element { attrs, .. } = &mut self.nodes[node.0].kind {
            match attrs.iter_mut().find(|(existing, _)| existing == name) {
                Some((_, existing_value)) => *existing_value = value.to_string(),
                None => attrs.push((name.to_string(), value.to_string())),
            }
        }
    }

    /// Replace a node's children with the given raw inner markup.
    pub fn set_content(&mut self, node: NodeId, content: &str) {
        let children = std::mem::take(&mut self.nodes[node.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
        self.push(node, NodeKind::Raw(content.to_string()));
    }

    /// Detach `node` from `parent`. The subtree is absent from subsequent
    /// lookups and from serialization. A node that is not a child of
    /// `parent` is left untouched.
    pub fn remove_child(&mut self, parent: NodeId, node: NodeId) {
        let children = &mut self.nodes[parent.0].children;
        if let Some(position) = children.iter().position(|&child| child == node) {
            children.remove(position);
            self.nodes[node.0].parent = None;
        }
    }

    // -----------------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------------

    /// Render the current tree to pretty-printed HTML text, reflecting all
    /// prior mutations.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for &child in &self.nodes[0].children {
            self.write_node(child, 0, &mut out);
        }
        out
    }

    fn write_node(&self, id: NodeId, depth: usize, out: &mut String) {
        let node = &self.nodes[id.0];
        let indent = "  ".repeat(depth);

        match &node.kind {
            NodeKind::Document => {}
            NodeKind::Doctype(name) => {
                out.push_str(&format!("{indent}<!DOCTYPE {name}>\n"));
            }
            NodeKind::Comment(comment) => {
                out.push_str(&format!("{indent}<!--{comment}-->\n"));
            }
            NodeKind::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    out.push_str(&format!("{indent}{}\n", escape_text(trimmed)));
                }
            }
            NodeKind::Raw(markup) => {
                for line in markup.lines() {
                    let trimmed = line.trim();
                    if !trimmed.is_empty() {
                        out.push_str(&format!("{indent}{trimmed}\n"));
                    }
                }
            }
            NodeKind::Element { tag, attrs } => {
                let mut open = format!("{indent}<{tag}");
                for (name, value) in attrs {
                    open.push_str(&format!(" {name}=\"{}\"", escape_attr(value)));
                }

                if VOID_ELEMENTS.contains(&tag.as_str()) {
                    out.push_str(&format!("{open}>\n"));
                } else if node.children.is_empty() {
                    out.push_str(&format!("{open}></{tag}>\n"));
                } else {
                    out.push_str(&format!("{open}>\n"));
                    for &child in &node.children {
                        self.write_node(child, depth + 1, out);
                    }
                    out.push_str(&format!("{indent}</{tag}>\n"));
                }
            }
        }
    }
}

/// Escape text content for HTML output.
fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape an attribute value for double-quoted output.
fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}
