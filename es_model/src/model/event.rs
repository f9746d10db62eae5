use es_parser::{Diagnostics, Issue, Node};
use serde::Serialize;

use crate::values;

/// Node names an event may modify. Only the kinds that appear on a map are applied.
pub const ALLOWED_MODIFICATIONS: &[&str] = &[
    "galaxy",
    "government",
    "fleet",
    "planet",
    "news",
    "shipyard",
    "system",
    "outfitter",
    "wormhole",
];

/// A hyperspace link between two systems, added or removed by an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hyperlink {
    pub from: String,
    pub to: String,
}

impl Hyperlink {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// A named bundle of changes to the galaxy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub name: String,
    /// Modifier subtrees in file order. Their children may carry `add` / `remove` flags.
    pub modifiers: Vec<Node>,
    pub links: Vec<Hyperlink>,
    pub unlinks: Vec<Hyperlink>,
}

impl Event {
    pub const KIND: &'static str = "event";

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modifiers: Vec::new(),
            links: Vec::new(),
            unlinks: Vec::new(),
        }
    }

    pub fn with_modifier(mut self, modifier: Node) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn with_link(mut self, from: &str, to: &str) -> Self {
        self.links.push(Hyperlink::new(from, to));
        self
    }

    pub fn with_unlink(mut self, from: &str, to: &str) -> Self {
        self.unlinks.push(Hyperlink::new(from, to));
        self
    }

    /// Reads an `event <name>` node. An event without a name cannot be referenced and is dropped.
    pub fn from_node(node: &Node, diagnostics: &mut Diagnostics) -> Option<Event> {
        let Some(name) = node.first_arg() else {
            diagnostics.node(Issue::UnnamedNode, Self::KIND, node);
            return None;
        };

        let mut event = Event::new(name);
        for child in &node.children {
            match child.name.as_str() {
                "link" | "unlink" => {
                    if !values::expect_args(child, Self::KIND, diagnostics, 2) {
                        continue;
                    }
                    let link = Hyperlink::new(&child.args[0], &child.args[1]);
                    if child.name == "link" {
                        event.links.push(link);
                    } else {
                        event.unlinks.push(link);
                    }
                }
                kind if ALLOWED_MODIFICATIONS.contains(&kind) => event.modifiers.push(child.clone()),
                _ => tracing::debug!(event = %event.name, node = %child, "Ignoring event node"),
            }
        }

        Some(event)
    }
}
