use std::collections::HashSet;

use es_parser::{Diagnostics, Flag, Issue, Node};
use indexmap::IndexMap;

use crate::{FieldKey, MergePolicy};

/// Whether children are building a fresh entity or patching an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// Every child adds to what is already there. Flags are not expected.
    Construct,
    /// Each child's flag picks the merge rule for its field.
    Modify,
}

/// Anything whose fields can be populated from the children of a node.
pub trait MergeFields {
    type Field: FieldKey;

    fn merge_field(&mut self, field: Self::Field, node: &Node, merge: &mut Merge<'_, Self::Field>);
}

/// State for one pass over a node's children.
///
/// A new `Merge` is created for every definition or modifier node, so the set of fields touched so far
/// only covers a single application.
pub struct Merge<'a, F: FieldKey> {
    pass: Pass,
    parent: &'static str,
    touched: HashSet<F>,
    pub diagnostics: &'a mut Diagnostics,
}

impl<'a, F: FieldKey> Merge<'a, F> {
    pub fn construction(parent: &'static str, diagnostics: &'a mut Diagnostics) -> Self {
        Self::new(Pass::Construct, parent, diagnostics)
    }

    pub fn modification(parent: &'static str, diagnostics: &'a mut Diagnostics) -> Self {
        Self::new(Pass::Modify, parent, diagnostics)
    }

    fn new(pass: Pass, parent: &'static str, diagnostics: &'a mut Diagnostics) -> Self {
        Self {
            pass,
            parent,
            touched: HashSet::new(),
            diagnostics,
        }
    }

    pub fn pass(&self) -> Pass {
        self.pass
    }

    pub fn parent(&self) -> &'static str {
        self.parent
    }

    /// Dispatches every direct child of `node` to the field it names, in file order.
    pub fn apply<T: MergeFields<Field = F>>(&mut self, target: &mut T, node: &Node) {
        for child in &node.children {
            match F::from_key(&child.name) {
                Some(field) => target.merge_field(field, child, self),
                None => tracing::debug!(kind = self.parent, node = %child, "Ignoring unknown node"),
            }
        }
    }

    /// The flag a child is merged with once the field's policy has been taken into account.
    fn effective_flag(&mut self, field: F, node: &Node) -> Flag {
        match self.pass {
            Pass::Construct => {
                if node.flag != Flag::Normal {
                    self.diagnostics
                        .node(Issue::UnexpectedFlag, self.parent, node);
                }
                Flag::Add
            }
            Pass::Modify => match (field.policy(), node.flag) {
                (MergePolicy::Scalar | MergePolicy::Flag | MergePolicy::Composite, Flag::Add) => {
                    self.diagnostics
                        .node(Issue::UnexpectedFlag, self.parent, node);
                    Flag::Normal
                }
                (_, flag) => flag,
            },
        }
    }

    /// Marks a field as touched and returns the flag to use. Only the first child for an accumulating
    /// field may reset it; later ones always append.
    fn accumulating_flag(&mut self, field: F, node: &Node) -> Flag {
        let flag = self.effective_flag(field, node);
        if self.touched.insert(field) {
            flag
        } else {
            Flag::Add
        }
    }

    /// Replace on Normal/Add, reset to `default` on Remove. A value that cannot be read leaves the
    /// field as it was.
    pub fn scalar<T>(
        &mut self,
        field: F,
        node: &Node,
        slot: &mut T,
        default: T,
        read: impl FnOnce(&Node, &str, &mut Diagnostics) -> Option<T>,
    ) {
        match self.effective_flag(field, node) {
            Flag::Remove => *slot = default,
            _ => {
                if let Some(value) = read(node, self.parent, self.diagnostics) {
                    *slot = value;
                }
            }
        }
    }

    /// A scalar whose default is "absent".
    pub fn optional<T>(
        &mut self,
        field: F,
        node: &Node,
        slot: &mut Option<T>,
        read: impl FnOnce(&Node, &str, &mut Diagnostics) -> Option<T>,
    ) {
        match self.effective_flag(field, node) {
            Flag::Remove => *slot = None,
            _ => {
                if let Some(value) = read(node, self.parent, self.diagnostics) {
                    *slot = Some(value);
                }
            }
        }
    }

    /// Rebuilt from the child's subtree as a unit; there is no incremental merge.
    pub fn composite<T>(
        &mut self,
        field: F,
        node: &Node,
        slot: &mut T,
        default: T,
        read: impl FnOnce(&Node, &str, &mut Diagnostics) -> Option<T>,
    ) {
        self.scalar(field, node, slot, default, read);
    }

    pub fn flag(&mut self, field: F, node: &Node, slot: &mut bool) {
        *slot = self.effective_flag(field, node) != Flag::Remove;
    }

    pub fn list(&mut self, field: F, node: &Node, list: &mut Vec<String>) {
        match self.effective_flag(field, node) {
            Flag::Normal => *list = node.args.clone(),
            Flag::Add => list.extend(node.args.iter().cloned()),
            Flag::Remove if node.args.is_empty() => list.clear(),
            Flag::Remove => {
                for arg in &node.args {
                    match list.iter().position(|item| item == arg) {
                        Some(index) => {
                            list.remove(index);
                        }
                        None => tracing::debug!(
                            kind = self.parent,
                            field = field.key(),
                            value = %arg,
                            "Value to remove is not in the list"
                        ),
                    }
                }
            }
        }
    }

    /// Upserts the entry keyed by the first argument; `read` parses the value from the rest.
    pub fn map<V>(
        &mut self,
        field: F,
        node: &Node,
        map: &mut IndexMap<String, V>,
        read: impl FnOnce(&Node, &str, &mut Diagnostics) -> Option<V>,
    ) {
        let flag = self.effective_flag(field, node);

        let Some(key) = node.first_arg() else {
            if flag == Flag::Remove {
                map.clear();
            } else {
                self.diagnostics
                    .node(Issue::IncompleteNode, self.parent, node);
            }
            return;
        };

        if flag == Flag::Remove {
            if map.shift_remove(key).is_none() {
                self.diagnostics
                    .node(Issue::InvalidMapKey, self.parent, node);
            }
            return;
        }

        if let Some(value) = read(node, self.parent, self.diagnostics) {
            map.insert(key.to_string(), value);
        }
    }

    /// Accumulating text: one paragraph per child.
    pub fn text(&mut self, field: F, node: &Node, text: &mut crate::Paragraphs) {
        match self.accumulating_flag(field, node) {
            Flag::Remove => text.clear(),
            flag => {
                let Some(paragraph) = crate::values::string(node, self.parent, self.diagnostics)
                else {
                    return;
                };
                if flag == Flag::Normal {
                    text.reset(paragraph);
                } else {
                    text.push(paragraph);
                }
            }
        }
    }

    /// Accumulating list of nested objects, each built from one child's subtree.
    pub fn sequence<T>(
        &mut self,
        field: F,
        node: &Node,
        items: &mut Vec<T>,
        build: impl FnOnce(&Node, &mut Diagnostics) -> T,
    ) {
        match self.accumulating_flag(field, node) {
            Flag::Remove => items.clear(),
            Flag::Normal => {
                items.clear();
                items.push(build(node, self.diagnostics));
            }
            Flag::Add => items.push(build(node, self.diagnostics)),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{Paragraphs, values};

    field_keys! {
        enum TestField {
            Tags = "tags" => List,
            Prices = "prices" => Map,
            Notes = "notes" => Text,
            Size = "size" => Scalar,
            Hidden = "hidden" => Flag,
        }
    }

    #[derive(Debug, Default, PartialEq)]
    struct Sample {
        tags: Vec<String>,
        prices: IndexMap<String, f64>,
        notes: Paragraphs,
        size: f64,
        hidden: bool,
    }

    impl MergeFields for Sample {
        type Field = TestField;

        fn merge_field(&mut self, field: TestField, node: &Node, merge: &mut Merge<'_, TestField>) {
            match field {
                TestField::Tags => merge.list(field, node, &mut self.tags),
                TestField::Prices => merge.map(field, node, &mut self.prices, values::keyed_real),
                TestField::Notes => merge.text(field, node, &mut self.notes),
                TestField::Size => merge.scalar(field, node, &mut self.size, 1.0, values::real),
                TestField::Hidden => merge.flag(field, node, &mut self.hidden),
            }
        }
    }

    fn modify(sample: &mut Sample, children: Vec<Node>) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        let mut modifier = Node::new("sample");
        modifier.children = children;
        Merge::modification("sample", &mut diagnostics).apply(sample, &modifier);
        diagnostics
    }

    fn construct(children: Vec<Node>) -> (Sample, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let mut definition = Node::new("sample");
        definition.children = children;
        let mut sample = Sample::default();
        Merge::construction("sample", &mut diagnostics).apply(&mut sample, &definition);
        (sample, diagnostics)
    }

    #[test]
    fn field_table_round_trips_keys() {
        for field in TestField::ALL {
            assert_eq!(TestField::from_key(field.key()), Some(*field));
        }
        assert_eq!(TestField::from_key("unknown"), None);
    }

    #[test]
    fn construction_accumulates_lists() {
        let (sample, diagnostics) = construct(vec![
            Node::new("tags").with_args(["a", "b"]),
            Node::new("tags").with_arg("c"),
        ]);
        assert!(diagnostics.is_empty());
        assert_eq!(sample.tags, vec!["a", "b", "c"]);
    }

    #[test]
    fn construction_warns_about_flags() {
        let (sample, diagnostics) = construct(vec![Node::new("hidden").with_flag(Flag::Remove)]);
        assert_eq!(diagnostics.count(Issue::UnexpectedFlag), 1);
        assert!(sample.hidden);
    }

    #[test]
    fn list_normal_replaces() {
        let mut sample = Sample {
            tags: vec!["old".into()],
            ..Default::default()
        };
        modify(&mut sample, vec![Node::new("tags").with_args(["x", "y"])]);
        assert_eq!(sample.tags, vec!["x", "y"]);
    }

    #[test]
    fn list_add_keeps_duplicates_and_remove_takes_first() {
        let mut sample = Sample::default();
        let add = || Node::new("tags").with_flag(Flag::Add).with_arg("x");
        modify(&mut sample, vec![add()]);
        modify(&mut sample, vec![add()]);
        assert_eq!(sample.tags, vec!["x", "x"]);

        modify(
            &mut sample,
            vec![Node::new("tags").with_flag(Flag::Remove).with_arg("x")],
        );
        assert_eq!(sample.tags, vec!["x"]);
    }

    #[test]
    fn list_remove_without_arguments_clears() {
        let mut sample = Sample {
            tags: vec!["a".into(), "b".into()],
            ..Default::default()
        };
        modify(&mut sample, vec![Node::new("tags").with_flag(Flag::Remove)]);
        assert!(sample.tags.is_empty());
    }

    #[test]
    fn map_remove_of_missing_key_is_reported_and_processing_continues() {
        let mut sample = Sample::default();
        sample.prices.insert("Food".into(), 300.0);

        let diagnostics = modify(
            &mut sample,
            vec![
                Node::new("prices").with_flag(Flag::Remove).with_arg("Metal"),
                Node::new("prices").with_args(["Clothing", "250"]),
            ],
        );

        assert_eq!(diagnostics.count(Issue::InvalidMapKey), 1);
        assert_eq!(diagnostics.error_count(), 1);
        assert_eq!(
            sample.prices.iter().collect::<Vec<_>>(),
            vec![(&"Food".to_string(), &300.0), (&"Clothing".to_string(), &250.0)]
        );
    }

    #[test]
    fn map_add_upserts_like_normal() {
        let mut sample = Sample::default();
        sample.prices.insert("Food".into(), 300.0);
        modify(
            &mut sample,
            vec![Node::new("prices").with_flag(Flag::Add).with_args(["Food", "410"])],
        );
        assert_eq!(sample.prices["Food"], 410.0);
    }

    #[test]
    fn map_remove_existing_key() {
        let mut sample = Sample::default();
        sample.prices.insert("Food".into(), 300.0);
        let diagnostics = modify(
            &mut sample,
            vec![Node::new("prices").with_flag(Flag::Remove).with_arg("Food")],
        );
        assert!(diagnostics.is_empty());
        assert!(sample.prices.is_empty());
    }

    #[test]
    fn map_entry_without_key_is_incomplete() {
        let mut sample = Sample::default();
        let diagnostics = modify(&mut sample, vec![Node::new("prices")]);
        assert_eq!(diagnostics.count(Issue::IncompleteNode), 1);
    }

    #[test]
    fn repeated_text_children_reset_once_then_append() {
        let mut sample = Sample::default();
        sample.notes.push("Original.".into());

        modify(
            &mut sample,
            vec![
                Node::new("notes").with_arg("First."),
                Node::new("notes").with_arg("Second."),
            ],
        );

        assert_eq!(sample.notes.paragraphs(), ["First.", "Second."]);
    }

    #[test]
    fn text_touch_state_is_per_application() {
        let mut sample = Sample::default();
        modify(&mut sample, vec![Node::new("notes").with_arg("One.")]);
        modify(&mut sample, vec![Node::new("notes").with_arg("Two.")]);
        assert_eq!(sample.notes.paragraphs(), ["Two."]);
    }

    #[test]
    fn text_add_appends_and_remove_clears() {
        let mut sample = Sample::default();
        sample.notes.push("Original.".into());

        modify(
            &mut sample,
            vec![Node::new("notes").with_flag(Flag::Add).with_arg("More.")],
        );
        assert_eq!(sample.notes.paragraphs(), ["Original.", "More."]);

        modify(&mut sample, vec![Node::new("notes").with_flag(Flag::Remove)]);
        assert!(sample.notes.is_empty());
    }

    #[test]
    fn text_remove_first_then_normal_appends() {
        let mut sample = Sample::default();
        sample.notes.push("Original.".into());

        modify(
            &mut sample,
            vec![
                Node::new("notes").with_flag(Flag::Remove),
                Node::new("notes").with_arg("Fresh."),
            ],
        );
        assert_eq!(sample.notes.paragraphs(), ["Fresh."]);
    }

    #[test]
    fn scalar_remove_resets_to_default() {
        let mut sample = Sample {
            size: 5.0,
            ..Default::default()
        };
        modify(&mut sample, vec![Node::new("size").with_flag(Flag::Remove)]);
        assert_eq!(sample.size, 1.0);
    }

    #[test]
    fn scalar_add_is_warned_and_applied_as_normal() {
        let mut sample = Sample::default();
        let diagnostics = modify(
            &mut sample,
            vec![Node::new("size").with_flag(Flag::Add).with_arg("3")],
        );
        assert_eq!(diagnostics.count(Issue::UnexpectedFlag), 1);
        assert_eq!(sample.size, 3.0);
    }

    #[test]
    fn bad_number_keeps_previous_value() {
        let mut sample = Sample {
            size: 5.0,
            ..Default::default()
        };
        let diagnostics = modify(
            &mut sample,
            vec![
                Node::new("size").with_arg("big"),
                Node::new("tags").with_arg("still applied"),
            ],
        );
        assert_eq!(diagnostics.count(Issue::InvalidReal), 1);
        assert_eq!(sample.size, 5.0);
        assert_eq!(sample.tags, vec!["still applied"]);
    }

    #[test]
    fn flag_field_follows_remove() {
        let mut sample = Sample::default();
        modify(&mut sample, vec![Node::new("hidden")]);
        assert!(sample.hidden);
        modify(&mut sample, vec![Node::new("hidden").with_flag(Flag::Remove)]);
        assert!(!sample.hidden);
    }

    #[test]
    fn unknown_children_are_ignored() {
        let mut sample = Sample::default();
        let diagnostics = modify(&mut sample, vec![Node::new("mystery").with_arg("1")]);
        assert!(diagnostics.is_empty());
        assert_eq!(sample, Sample::default());
    }
}
