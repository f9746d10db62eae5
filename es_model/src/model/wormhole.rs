use es_parser::Node;
use indexmap::IndexMap;
use serde::Serialize;

use crate::{ColorSpec, Entity, Merge, MergeFields, values};

field_keys! {
    pub enum WormholeField {
        DisplayName = "display name" => Scalar,
        Mappable = "mappable" => Flag,
        Link = "link" => Map,
        Color = "color" => Composite,
    }
}

pub const UNKNOWN_DISPLAY_NAME: &str = "???";
pub const WORMHOLE_COLOR: &str = "map wormhole";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Wormhole {
    pub name: String,
    pub display_name: String,
    /// Whether the wormhole is drawn on maps by default.
    pub mappable: bool,
    /// Entry system to exit system.
    pub links: IndexMap<String, String>,
    pub color: ColorSpec,
}

impl Default for Wormhole {
    fn default() -> Self {
        Self {
            name: String::new(),
            display_name: UNKNOWN_DISPLAY_NAME.to_string(),
            mappable: false,
            links: IndexMap::new(),
            color: ColorSpec::named(WORMHOLE_COLOR),
        }
    }
}

impl Wormhole {
    pub fn exit_from(&self, system: &str) -> Option<&str> {
        self.links.get(system).map(String::as_str)
    }
}

impl Entity for Wormhole {
    const KIND: &'static str = "wormhole";

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

impl MergeFields for Wormhole {
    type Field = WormholeField;

    fn merge_field(&mut self, field: WormholeField, node: &Node, merge: &mut Merge<'_, WormholeField>) {
        match field {
            WormholeField::DisplayName => merge.scalar(
                field,
                node,
                &mut self.display_name,
                UNKNOWN_DISPLAY_NAME.to_string(),
                values::string,
            ),
            WormholeField::Mappable => merge.flag(field, node, &mut self.mappable),
            WormholeField::Link => merge.map(field, node, &mut self.links, values::keyed_string),
            WormholeField::Color => merge.composite(
                field,
                node,
                &mut self.color,
                ColorSpec::named(WORMHOLE_COLOR),
                ColorSpec::read,
            ),
        }
    }
}
