use es_parser::{Diagnostics, Issue, Node};
use serde::Serialize;

use crate::{Merge, MergeFields, values};

field_keys! {
    pub enum SpriteField {
        Scale = "scale" => Scalar,
    }
}

/// An image reference. Only the name is kept; locating the image file is up to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sprite {
    pub name: String,
    pub scale: f64,
}

impl Sprite {
    pub const KIND: &'static str = "sprite";

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scale: 1.0,
        }
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// `sprite <file>` with an optional `scale` child.
    pub fn read(node: &Node, parent: &str, diagnostics: &mut Diagnostics) -> Option<Sprite> {
        let Some(name) = node.first_arg() else {
            diagnostics.node(Issue::MissingFilename, parent, node);
            return None;
        };
        if node.args.len() > 1 {
            diagnostics.node(Issue::ExtraArguments, parent, node);
        }

        let mut sprite = Sprite::new(name);
        Merge::construction(Self::KIND, diagnostics).apply(&mut sprite, node);
        Some(sprite)
    }
}

impl MergeFields for Sprite {
    type Field = SpriteField;

    fn merge_field(&mut self, field: SpriteField, node: &Node, merge: &mut Merge<'_, SpriteField>) {
        match field {
            SpriteField::Scale => merge.scalar(field, node, &mut self.scale, 1.0, values::real),
        }
    }
}
