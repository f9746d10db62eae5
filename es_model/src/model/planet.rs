use es_parser::{Diagnostics, Issue, Node};
use indexmap::IndexMap;
use serde::Serialize;

use crate::{Entity, Merge, MergeFields, Paragraphs, Sprite, values};

field_keys! {
    pub enum PlanetField {
        Attributes = "attributes" => List,
        Landscape = "landscape" => Composite,
        Music = "music" => Scalar,
        Description = "description" => Text,
        Spaceport = "spaceport" => Text,
        Port = "port" => Composite,
        Government = "government" => Scalar,
        Shipyard = "shipyard" => List,
        Outfitter = "outfitter" => List,
        RequiredReputation = "required reputation" => Scalar,
        Bribe = "bribe" => Scalar,
        Security = "security" => Scalar,
        Wormhole = "wormhole" => Scalar,
        Tribute = "tribute" => Composite,
    }
}

pub const DEFAULT_BRIBE: f64 = 0.01;
pub const DEFAULT_SECURITY: f64 = 0.25;
pub const DEFAULT_TRIBUTE_THRESHOLD: i64 = 4000;

/// What a planet demands once it has been dominated, and who defends it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tribute {
    pub value: i64,
    pub threshold: i64,
    /// Fleet name to number of fleets.
    pub fleets: IndexMap<String, i64>,
}

impl Default for Tribute {
    fn default() -> Self {
        Self {
            value: 0,
            threshold: DEFAULT_TRIBUTE_THRESHOLD,
            fleets: IndexMap::new(),
        }
    }
}

impl Tribute {
    /// `tribute <value>` with `threshold <value>` and `fleet <name> <count>` children. Repeated fleets
    /// add up. A value that is not an integer is reported and left at zero; the children still apply.
    pub fn read(node: &Node, parent: &str, diagnostics: &mut Diagnostics) -> Option<Tribute> {
        if !values::expect_args(node, parent, diagnostics, 1) {
            return None;
        }
        let mut tribute = Tribute::default();
        if let Some(value) = values::parse_integer(&node.args[0], node, parent, diagnostics) {
            tribute.value = value;
        }

        for child in &node.children {
            match child.name.as_str() {
                "threshold" => {
                    if let Some(threshold) = values::integer(child, parent, diagnostics) {
                        tribute.threshold = threshold;
                    }
                }
                "fleet" => {
                    let count = child.arg(1).and_then(|count| count.parse::<i64>().ok());
                    match (child.first_arg(), count) {
                        (Some(fleet), Some(count)) => {
                            *tribute.fleets.entry(fleet.to_string()).or_insert(0) += count;
                        }
                        _ => diagnostics.node(Issue::ObjectCreation, parent, child),
                    }
                }
                _ => tracing::debug!(kind = parent, node = %child, "Ignoring unknown node"),
            }
        }

        Some(tribute)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Planet {
    pub name: String,

    pub attributes: Vec<String>,
    pub landscape: Option<Sprite>,
    pub music: Option<String>,

    pub description: Paragraphs,
    pub spaceport: Paragraphs,
    /// Kept as written; nothing on the map depends on its contents.
    pub port: Option<Node>,

    pub government: Option<String>,
    pub shipyards: Vec<String>,
    pub outfitters: Vec<String>,

    pub required_reputation: f64,
    pub bribe: f64,
    pub security: f64,

    /// The wormhole this planet is a mouth of.
    pub wormhole: Option<String>,
    pub tribute: Tribute,
}

impl Default for Planet {
    fn default() -> Self {
        Self {
            name: String::new(),
            attributes: Vec::new(),
            landscape: None,
            music: None,
            description: Paragraphs::new(),
            spaceport: Paragraphs::new(),
            port: None,
            government: None,
            shipyards: Vec::new(),
            outfitters: Vec::new(),
            required_reputation: 0.0,
            bribe: DEFAULT_BRIBE,
            security: DEFAULT_SECURITY,
            wormhole: None,
            tribute: Tribute::default(),
        }
    }
}

impl Planet {
    pub fn has_attribute(&self, attribute: &str) -> bool {
        self.attributes.iter().any(|a| a == attribute)
    }

    pub fn is_wormhole(&self) -> bool {
        self.wormhole.is_some()
    }
}

impl Entity for Planet {
    const KIND: &'static str = "planet";

    fn named(name: String) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl MergeFields for Planet {
    type Field = PlanetField;

    fn merge_field(&mut self, field: PlanetField, node: &Node, merge: &mut Merge<'_, PlanetField>) {
        use PlanetField::*;

        match field {
            Attributes => merge.list(field, node, &mut self.attributes),
            Landscape => merge.optional(field, node, &mut self.landscape, Sprite::read),
            Music => merge.optional(field, node, &mut self.music, values::string),
            Description => merge.text(field, node, &mut self.description),
            Spaceport => merge.text(field, node, &mut self.spaceport),
            Port => merge.optional(field, node, &mut self.port, |node, _, _| Some(node.clone())),
            Government => merge.optional(field, node, &mut self.government, values::string),
            Shipyard => merge.list(field, node, &mut self.shipyards),
            Outfitter => merge.list(field, node, &mut self.outfitters),
            RequiredReputation => {
                merge.scalar(field, node, &mut self.required_reputation, 0.0, values::real)
            }
            Bribe => merge.scalar(field, node, &mut self.bribe, DEFAULT_BRIBE, values::real),
            Security => {
                merge.scalar(field, node, &mut self.security, DEFAULT_SECURITY, values::real)
            }
            Wormhole => merge.optional(field, node, &mut self.wormhole, values::string),
            Tribute => merge.composite(
                field,
                node,
                &mut self.tribute,
                self::Tribute::default(),
                self::Tribute::read,
            ),
        }
    }
}
