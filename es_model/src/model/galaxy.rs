use es_parser::Node;
use serde::Serialize;

use crate::{Coordinate, Entity, Merge, MergeFields, Sprite, values};

field_keys! {
    pub enum GalaxyField {
        Position = "pos" => Scalar,
        Sprite = "sprite" => Composite,
    }
}

/// A background image placed on the map.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Galaxy {
    pub name: String,
    pub position: Coordinate,
    pub sprite: Option<Sprite>,
}

impl Entity for Galaxy {
    const KIND: &'static str = "galaxy";

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

impl MergeFields for Galaxy {
    type Field = GalaxyField;

    fn merge_field(&mut self, field: GalaxyField, node: &Node, merge: &mut Merge<'_, GalaxyField>) {
        match field {
            GalaxyField::Position => merge.scalar(
                field,
                node,
                &mut self.position,
                Coordinate::default(),
                values::coordinate,
            ),
            GalaxyField::Sprite => merge.optional(field, node, &mut self.sprite, Sprite::read),
        }
    }
}
