use es_parser::{Diagnostics, Issue, Node};

use crate::{Merge, MergeFields};

/// A named, top-level kind of game data that lives in a map.
pub trait Entity: MergeFields + Sized {
    /// The node name that defines this kind, also used in diagnostics.
    const KIND: &'static str;

    /// A fresh entity with every field at its default.
    fn named(name: String) -> Self;

    fn name(&self) -> &str;

    /// Builds an entity from its definition node in a single pass over the direct children.
    ///
    /// A missing name is reported and the entity is keyed by the empty string.
    fn from_node(node: &Node, diagnostics: &mut Diagnostics) -> Self {
        let name = match node.first_arg() {
            Some(name) => name.to_string(),
            None => {
                diagnostics.node(Issue::UnnamedNode, Self::KIND, node);
                String::new()
            }
        };
        if node.args.len() > 1 {
            diagnostics.node(Issue::ExtraArguments, Self::KIND, node);
        }

        let mut entity = Self::named(name);
        Merge::construction(Self::KIND, diagnostics).apply(&mut entity, node);
        entity
    }
}
