use std::time::Instant;

use es_parser::{Diagnostics, Issue, Node};
use indexmap::IndexMap;
use serde::Serialize;

use crate::{
    Entity, FieldKey, Galaxy, GameData, Government, Planet, StarSystem, Wormhole, values,
};

/// The top-level node kinds a map is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    System,
    Planet,
    Government,
    Galaxy,
    Wormhole,
}

impl EntityKind {
    pub const ALL: &'static [EntityKind] = &[
        EntityKind::System,
        EntityKind::Planet,
        EntityKind::Government,
        EntityKind::Galaxy,
        EntityKind::Wormhole,
    ];

    pub fn from_key(name: &str) -> Option<Self> {
        match name {
            StarSystem::KIND => Some(Self::System),
            Planet::KIND => Some(Self::Planet),
            Government::KIND => Some(Self::Government),
            Galaxy::KIND => Some(Self::Galaxy),
            Wormhole::KIND => Some(Self::Wormhole),
            _ => None,
        }
    }
}

field_keys! {
    pub enum MapField {
        Event = "event" => List,
        EventList = "event list" => List,
        PluginsOnly = "plugins only" => Flag,
        IncludeHidden = "include hidden" => Flag,
        IncludeUnmappableWormholes = "include unmappable wormholes" => Flag,
        PaintUninhabited = "paint uninhabited" => Flag,
        Paint = "paint" => Scalar,
    }
}

pub const DEFAULT_PAINT_MODE: &str = "government";

/// What goes into one map: which events to apply and which entities to show.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapSettings {
    pub name: String,
    /// Event names in the order they are applied.
    pub events: Vec<String>,
    /// Skip everything defined by the base game.
    pub plugins_only: bool,
    pub include_hidden: bool,
    pub include_unmappable_wormholes: bool,
    /// Colour uninhabited systems by their government instead of as uninhabited.
    pub paint_uninhabited: bool,
    pub paint: String,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            name: String::new(),
            events: Vec::new(),
            plugins_only: false,
            include_hidden: false,
            include_unmappable_wormholes: false,
            paint_uninhabited: false,
            paint: DEFAULT_PAINT_MODE.to_string(),
        }
    }
}

impl MapSettings {
    pub const KIND: &'static str = "map";

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_event(mut self, event: impl Into<String>) -> Self {
        self.events.push(event.into());
        self
    }

    /// Reads a `map <name>` configuration node. Named event lists are expanded in place.
    pub fn from_node(node: &Node, data: &GameData, diagnostics: &mut Diagnostics) -> Self {
        let name = match node.first_arg() {
            Some(name) => name.to_string(),
            None => {
                diagnostics.node(Issue::UnnamedNode, Self::KIND, node);
                String::new()
            }
        };
        let mut settings = Self::named(name);

        for child in &node.children {
            let Some(field) = MapField::from_key(&child.name) else {
                tracing::debug!(map = %settings.name, node = %child, "Ignoring map node");
                continue;
            };

            match field {
                MapField::Event => {
                    if let Some(event) = values::string(child, Self::KIND, diagnostics) {
                        settings.events.push(event);
                    }
                }
                MapField::EventList => {
                    if let Some(list) = values::string(child, Self::KIND, diagnostics) {
                        let events = data.event_list(&list, diagnostics);
                        settings.events.extend(events.iter().cloned());
                    }
                }
                MapField::PluginsOnly => settings.plugins_only = true,
                MapField::IncludeHidden => settings.include_hidden = true,
                MapField::IncludeUnmappableWormholes => {
                    settings.include_unmappable_wormholes = true
                }
                MapField::PaintUninhabited => settings.paint_uninhabited = true,
                MapField::Paint => {
                    if let Some(paint) = values::string(child, Self::KIND, diagnostics) {
                        settings.paint = paint;
                    }
                }
            }
        }

        settings
    }
}

/// Everything defined for one map, after its events have been applied.
///
/// Entities refer to each other by name only; the resolver methods look them up.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GalacticMap {
    pub settings: MapSettings,

    pub systems: IndexMap<String, StarSystem>,
    pub planets: IndexMap<String, Planet>,
    pub governments: IndexMap<String, Government>,
    pub galaxies: IndexMap<String, Galaxy>,
    pub wormholes: IndexMap<String, Wormhole>,

    /// Events that have been applied, in order.
    pub applied_events: Vec<String>,
}

fn insert<E: Entity>(entities: &mut IndexMap<String, E>, entity: E) {
    if let Some(previous) = entities.insert(entity.name().to_string(), entity) {
        tracing::debug!(kind = E::KIND, name = previous.name(), "Replacing earlier definition");
    }
}

impl GalacticMap {
    pub fn new(settings: MapSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.settings.name
    }

    /// Builds an entity from a top-level definition node. Nodes of other kinds are ignored.
    pub fn define(&mut self, node: &Node, diagnostics: &mut Diagnostics) {
        let Some(kind) = EntityKind::from_key(&node.name) else {
            return;
        };

        match kind {
            EntityKind::System => insert(&mut self.systems, StarSystem::from_node(node, diagnostics)),
            EntityKind::Planet => insert(&mut self.planets, Planet::from_node(node, diagnostics)),
            EntityKind::Government => {
                insert(&mut self.governments, Government::from_node(node, diagnostics))
            }
            EntityKind::Galaxy => insert(&mut self.galaxies, Galaxy::from_node(node, diagnostics)),
            EntityKind::Wormhole => {
                insert(&mut self.wormholes, Wormhole::from_node(node, diagnostics))
            }
        }
    }

    /// Builds every entity from the loaded data, then applies the map's events.
    pub fn load(settings: MapSettings, data: &GameData, diagnostics: &mut Diagnostics) -> Self {
        let start = Instant::now();
        tracing::info!("Setting up data for map {}...", settings.name);

        let mut map = Self::new(settings);
        for node in &data.nodes {
            if map.settings.plugins_only && !node.is_from_plugin() {
                continue;
            }
            map.define(node, diagnostics);
        }

        tracing::info!("Applying events...");
        map.apply_events(data, diagnostics);

        tracing::info!(
            governments = map.governments.len(),
            galaxies = map.galaxies.len(),
            systems = map.systems.len(),
            wormholes = map.wormholes.len(),
            planets = map.planets.len(),
            "Finished loading data for map {} in {:.3} seconds",
            map.name(),
            start.elapsed().as_secs_f64()
        );

        map
    }
}
