use es_parser::{Diagnostics, Node};
use serde::Serialize;

use crate::{Merge, MergeFields, Sprite, values};

field_keys! {
    pub enum ObjectField {
        Sprite = "sprite" => Composite,
        Distance = "distance" => Scalar,
        Period = "period" => Scalar,
        Offset = "offset" => Scalar,
        Object = "object" => Sequence,
    }
}

/// A star, planet or station orbiting inside a system, possibly with its own satellites.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StellarObject {
    /// Only objects that can be landed on or otherwise referenced have a name.
    pub name: Option<String>,
    pub sprite: Option<Sprite>,
    pub distance: f64,
    pub period: f64,
    pub offset: f64,
    pub objects: Vec<StellarObject>,
}

impl StellarObject {
    pub const KIND: &'static str = "stellar object";

    pub fn from_node(node: &Node, diagnostics: &mut Diagnostics) -> Self {
        let mut object = Self {
            name: node.first_arg().map(str::to_string),
            ..Self::default()
        };
        Merge::construction(Self::KIND, diagnostics).apply(&mut object, node);
        object
    }

    pub fn is_named(&self) -> bool {
        self.name.is_some()
    }

    pub fn has_named_children(&self) -> bool {
        self.objects
            .iter()
            .any(|child| child.is_named() || child.has_named_children())
    }
}

impl MergeFields for StellarObject {
    type Field = ObjectField;

    fn merge_field(&mut self, field: ObjectField, node: &Node, merge: &mut Merge<'_, ObjectField>) {
        match field {
            ObjectField::Sprite => merge.optional(field, node, &mut self.sprite, Sprite::read),
            ObjectField::Distance => merge.scalar(field, node, &mut self.distance, 0.0, values::real),
            ObjectField::Period => merge.scalar(field, node, &mut self.period, 0.0, values::real),
            ObjectField::Offset => merge.scalar(field, node, &mut self.offset, 0.0, values::real),
            ObjectField::Object => {
                merge.sequence(field, node, &mut self.objects, StellarObject::from_node)
            }
        }
    }
}
