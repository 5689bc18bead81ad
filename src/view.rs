// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A small declarative view tree.
//!
//! Views are built as [`Node`] values and turned into HTML by [`render`].
//! Interactive elements carry an [`Action`] instead of an inline handler;
//! rendering numbers them through `data-action` attributes and returns the
//! matching [`EventTable`], so the host only needs one delegated listener.

use std::collections::BTreeMap;

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::filter::SeasonSelector;

/// Something the user can trigger from a rendered view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Hand an episode's audio to the player
    Play { audio_url: String },
    /// Ask for confirmation before deleting the episode at this list position
    ConfirmDelete { index: usize },
    /// Confirm the pending deletion
    Delete,
    /// Dismiss the confirmation dialog
    CancelDelete,
    /// Switch the season filter
    Filter(SeasonSelector),
}

/// Elements that never have children or a closing tag
const VOID_TAGS: &[&str] = &["br", "img", "input", "hr", "meta", "link"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    /// Concatenated text content, the way a screen reader would see it
    pub fn text_content(&self) -> String {
        match self {
            Node::Text(text) => text.clone(),
            Node::Element(element) => element.children.iter().map(Node::text_content).collect(),
        }
    }

    /// Depth-first search for an element with the given id
    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        match self {
            Node::Text(_) => None,
            Node::Element(element) => {
                if element.id.as_deref() == Some(id) {
                    return Some(element);
                }
                element.children.iter().find_map(|child| child.find_by_id(id))
            }
        }
    }

    /// All elements carrying the given class, in document order
    pub fn find_by_class<'a>(&'a self, class: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.collect_by_class(class, &mut found);
        found
    }

    fn collect_by_class<'a>(&'a self, class: &str, found: &mut Vec<&'a Element>) {
        if let Node::Element(element) = self {
            if element.classes.iter().any(|c| c == class) {
                found.push(element);
            }
            for child in &element.children {
                child.collect_by_class(class, found);
            }
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: &'static str,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
    pub action: Option<Action>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            id: None,
            classes: Vec::new(),
            attrs: Vec::new(),
            children: Vec::new(),
            action: None,
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    /// Add the child only when present
    pub fn maybe_child(self, child: Option<impl Into<Node>>) -> Self {
        match child {
            Some(child) => self.child(child),
            None => self,
        }
    }

    pub fn on_click(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Icon element in the site's icon font
pub fn icon(name: &str) -> Element {
    Element::new("i").class("fas").class(format!("fa-{name}"))
}

/// Text split on newlines with `<br>` elements in between
pub fn text_with_breaks(text: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            nodes.push(Element::new("br").into());
        }
        if !line.is_empty() {
            nodes.push(Node::text(line));
        }
    }
    nodes
}

/// Maps the `data-action` ids of a rendered view to their actions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventTable {
    bindings: BTreeMap<usize, Action>,
}

impl EventTable {
    pub fn get(&self, id: usize) -> Option<&Action> {
        self.bindings.get(&id)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Action)> {
        self.bindings.iter().map(|(id, action)| (*id, action))
    }

    fn bind(&mut self, action: Action) -> usize {
        let id = self.bindings.len();
        self.bindings.insert(id, action);
        id
    }
}

/// HTML produced from a view plus its event bindings
#[derive(Debug, Clone, Default)]
pub struct Rendered {
    pub html: String,
    pub events: EventTable,
}

pub fn render(node: &Node) -> Rendered {
    let mut rendered = Rendered::default();
    write_node(node, &mut rendered);
    rendered
}

fn write_node(node: &Node, out: &mut Rendered) {
    match node {
        Node::Text(text) => out.html.push_str(&encode_text(text)),
        Node::Element(element) => write_element(element, out),
    }
}

fn write_element(element: &Element, out: &mut Rendered) {
    out.html.push('<');
    out.html.push_str(element.tag);

    if let Some(id) = &element.id {
        write_attr(&mut out.html, "id", id);
    }
    if !element.classes.is_empty() {
        write_attr(&mut out.html, "class", &element.classes.join(" "));
    }
    for (name, value) in &element.attrs {
        write_attr(&mut out.html, name, value);
    }
    if let Some(action) = &element.action {
        let id = out.events.bind(action.clone());
        write_attr(&mut out.html, "data-action", &id.to_string());
    }
    out.html.push('>');

    if VOID_TAGS.contains(&element.tag) {
        return;
    }

    for child in &element.children {
        write_node(child, out);
    }

    out.html.push_str("</");
    out.html.push_str(element.tag);
    out.html.push('>');
}

fn write_attr(html: &mut String, name: &str, value: &str) {
    html.push(' ');
    html.push_str(name);
    html.push_str("=\"");
    html.push_str(&encode_double_quoted_attribute(value));
    html.push('"');
}
