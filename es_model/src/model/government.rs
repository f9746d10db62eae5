use es_parser::Node;
use serde::Serialize;

use crate::{ColorSpec, Entity, Merge, MergeFields};

field_keys! {
    pub enum GovernmentField {
        Color = "color" => Composite,
    }
}

/// The government systems fall back to when theirs cannot be found.
pub const UNINHABITED: &str = "Uninhabited";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Government {
    pub name: String,
    pub color: ColorSpec,
}

impl Entity for Government {
    const KIND: &'static str = "government";

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

impl MergeFields for Government {
    type Field = GovernmentField;

    fn merge_field(
        &mut self,
        field: GovernmentField,
        node: &Node,
        merge: &mut Merge<'_, GovernmentField>,
    ) {
        match field {
            GovernmentField::Color => {
                merge.composite(field, node, &mut self.color, ColorSpec::WHITE, ColorSpec::read)
            }
        }
    }
}
