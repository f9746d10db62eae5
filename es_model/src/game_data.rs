use es_parser::{Diagnostics, Issue, Node, ParsedSource};
use indexmap::IndexMap;

use crate::{Event, Trade};

/// Every top-level node that was loaded, plus the pieces that are shared between maps.
///
/// Entities are not built here; each [`GalacticMap`](crate::GalacticMap) builds its own copies so that
/// events applied to one map never leak into another.
#[derive(Debug, Clone, Default)]
pub struct GameData {
    /// Top-level nodes in load order.
    pub nodes: Vec<Node>,
    pub node_count: usize,

    pub events: IndexMap<String, Event>,
    /// Named event lists from the configuration.
    pub event_lists: IndexMap<String, Vec<String>>,
    pub trade: Trade,
}

impl GameData {
    pub fn new(source: ParsedSource, diagnostics: &mut Diagnostics) -> Self {
        let mut data = Self {
            node_count: source.node_count,
            ..Self::default()
        };

        for node in &source.roots {
            match node.name.as_str() {
                Event::KIND => {
                    if let Some(event) = Event::from_node(node, diagnostics) {
                        if data.events.contains_key(&event.name) {
                            tracing::debug!(event = %event.name, "Replacing earlier event definition");
                        }
                        data.events.insert(event.name.clone(), event);
                    }
                }
                Trade::KIND => data.trade.add_node(node, diagnostics),
                _ => {}
            }
        }
        data.nodes = source.roots;

        tracing::debug!(
            nodes = data.node_count,
            events = data.events.len(),
            commodities = data.trade.len(),
            "Indexed game data"
        );
        data
    }

    pub fn with_event_lists(mut self, event_lists: IndexMap<String, Vec<String>>) -> Self {
        self.event_lists = event_lists;
        self
    }

    pub fn with_event(mut self, event: Event) -> Self {
        self.events.insert(event.name.clone(), event);
        self
    }

    pub fn event(&self, name: &str, diagnostics: &mut Diagnostics) -> Option<&Event> {
        let event = self.events.get(name);
        if event.is_none() {
            diagnostics.report(
                Issue::UndefinedReference,
                Issue::UndefinedReference.describe(Event::KIND, name),
            );
        }
        event
    }

    /// The events of a named list, or none with a warning when there is no such list.
    pub fn event_list(&self, name: &str, diagnostics: &mut Diagnostics) -> &[String] {
        match self.event_lists.get(name) {
            Some(events) => events,
            None => {
                diagnostics.report(
                    Issue::FallbackReference,
                    format!("No event list named {}, using no events", name),
                );
                &[]
            }
        }
    }
}
