use std::collections::VecDeque;

use es_parser::{Diagnostics, Node};
use indexmap::IndexMap;
use serde::Serialize;

use crate::{Coordinate, Entity, Merge, MergeFields, StellarObject, values};

field_keys! {
    pub enum SystemField {
        Inaccessible = "inaccessible" => Flag,
        Hidden = "hidden" => Flag,
        Shrouded = "shrouded" => Flag,
        Position = "pos" => Scalar,
        Government = "government" => Scalar,
        Attributes = "attributes" => List,
        Music = "music" => Scalar,
        Object = "object" => Sequence,
        Link = "link" => List,
        Habitable = "habitable" => Scalar,
        InvisibleFence = "invisible fence" => Scalar,
        JumpRange = "jump range" => Scalar,
        StarfieldDensity = "starfield density" => Scalar,
        Arrival = "arrival" => Composite,
        Departure = "departure" => Composite,
        Trade = "trade" => Map,
        Hazard = "hazard" => Map,
        Asteroid = "asteroid" => Map,
        Minable = "minable" => Map,
    }
}

pub const DEFAULT_INVISIBLE_FENCE: f64 = 10000.0;
pub const DEFAULT_STARFIELD_DENSITY: f64 = 1.0;

/// How many of an asteroid or minable there are, and how fast they move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Yield {
    pub count: f64,
    pub energy: f64,
}

/// Arrival or departure distances for hyperspace links and jump drives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Approach {
    pub link: f64,
    pub jump: f64,
}

impl Approach {
    /// Either a single distance used for both, or separate `link` and `jump` children.
    pub fn read(node: &Node, parent: &str, diagnostics: &mut Diagnostics) -> Option<Approach> {
        if !node.has_children() {
            let distance = values::real(node, parent, diagnostics)?;
            return Some(Approach {
                link: distance,
                jump: distance,
            });
        }

        let mut approach = Approach::default();
        for child in &node.children {
            let slot = match child.name.as_str() {
                "link" => &mut approach.link,
                "jump" => &mut approach.jump,
                _ => {
                    tracing::debug!(kind = parent, node = %child, "Ignoring unknown node");
                    continue;
                }
            };
            if let Some(distance) = values::real(child, parent, diagnostics) {
                *slot = distance;
            }
        }
        Some(approach)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StarSystem {
    pub name: String,

    pub inaccessible: bool,
    pub hidden: bool,
    pub shrouded: bool,

    pub position: Option<Coordinate>,
    /// Empty when the system has no government.
    pub government: String,
    pub attributes: Vec<String>,
    pub music: Option<String>,

    pub arrival: Approach,
    pub departure: Approach,
    pub habitable: f64,
    pub invisible_fence: f64,
    pub jump_range: f64,
    pub starfield_density: f64,

    /// Names of the systems this one has a hyperspace link to.
    pub links: Vec<String>,

    pub trade: IndexMap<String, f64>,
    pub hazards: IndexMap<String, f64>,
    pub asteroids: IndexMap<String, Yield>,
    pub minables: IndexMap<String, Yield>,

    pub objects: Vec<StellarObject>,
}

impl Default for StarSystem {
    fn default() -> Self {
        Self {
            name: String::new(),
            inaccessible: false,
            hidden: false,
            shrouded: false,
            position: None,
            government: String::new(),
            attributes: Vec::new(),
            music: None,
            arrival: Approach::default(),
            departure: Approach::default(),
            habitable: 0.0,
            invisible_fence: DEFAULT_INVISIBLE_FENCE,
            jump_range: 0.0,
            starfield_density: DEFAULT_STARFIELD_DENSITY,
            links: Vec::new(),
            trade: IndexMap::new(),
            hazards: IndexMap::new(),
            asteroids: IndexMap::new(),
            minables: IndexMap::new(),
            objects: Vec::new(),
        }
    }
}

impl StarSystem {
    /// Every named stellar object in the system, closest to the star first.
    pub fn named_objects(&self) -> Vec<&StellarObject> {
        let mut pending: VecDeque<&StellarObject> = self.objects.iter().collect();
        let mut named = Vec::new();

        while let Some(object) = pending.pop_front() {
            if object.is_named() {
                named.push(object);
            }
            pending.extend(object.objects.iter());
        }

        named
    }

    pub fn is_linked_to(&self, system: &str) -> bool {
        self.links.iter().any(|link| link == system)
    }

    /// Adds a hyperspace link unless it already exists.
    pub fn add_link(&mut self, system: &str) {
        if !self.is_linked_to(system) {
            self.links.push(system.to_string());
        }
    }

    pub fn remove_link(&mut self, system: &str) {
        if let Some(index) = self.links.iter().position(|link| link == system) {
            self.links.remove(index);
        }
    }

    pub fn commodity_price(&self, commodity: &str) -> Option<f64> {
        self.trade.get(commodity).copied()
    }
}

impl Entity for StarSystem {
    const KIND: &'static str = "system";

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

impl MergeFields for StarSystem {
    type Field = SystemField;

    fn merge_field(&mut self, field: SystemField, node: &Node, merge: &mut Merge<'_, SystemField>) {
        use SystemField::*;

        match field {
            Inaccessible => merge.flag(field, node, &mut self.inaccessible),
            Hidden => merge.flag(field, node, &mut self.hidden),
            Shrouded => merge.flag(field, node, &mut self.shrouded),
            Position => merge.optional(field, node, &mut self.position, values::coordinate),
            Government => {
                merge.scalar(field, node, &mut self.government, String::new(), values::string)
            }
            Attributes => merge.list(field, node, &mut self.attributes),
            Music => merge.optional(field, node, &mut self.music, values::string),
            Object => merge.sequence(field, node, &mut self.objects, StellarObject::from_node),
            Link => merge.list(field, node, &mut self.links),
            Habitable => merge.scalar(field, node, &mut self.habitable, 0.0, values::real),
            InvisibleFence => merge.scalar(
                field,
                node,
                &mut self.invisible_fence,
                DEFAULT_INVISIBLE_FENCE,
                values::real,
            ),
            JumpRange => merge.scalar(field, node, &mut self.jump_range, 0.0, values::real),
            StarfieldDensity => merge.scalar(
                field,
                node,
                &mut self.starfield_density,
                DEFAULT_STARFIELD_DENSITY,
                values::real,
            ),
            Arrival => merge.composite(
                field,
                node,
                &mut self.arrival,
                Approach::default(),
                Approach::read,
            ),
            Departure => merge.composite(
                field,
                node,
                &mut self.departure,
                Approach::default(),
                Approach::read,
            ),
            Trade => merge.map(field, node, &mut self.trade, values::keyed_real),
            Hazard => merge.map(field, node, &mut self.hazards, values::keyed_real),
            Asteroid => merge.map(field, node, &mut self.asteroids, values::keyed_yield),
            Minable => merge.map(field, node, &mut self.minables, values::keyed_yield),
        }
    }
}

#[cfg(test)]
mod tests {
    use es_parser::{Flag, Issue};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{FieldKey, MergePolicy, Sprite, apply_modifiers};

    fn build(node: Node) -> (StarSystem, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let system = StarSystem::from_node(&node, &mut diagnostics);
        (system, diagnostics)
    }

    fn modify(system: &mut StarSystem, modifier: Node) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        apply_modifiers(system, &modifier, &mut diagnostics);
        diagnostics
    }

    fn sol() -> Node {
        Node::new("system")
            .with_arg("Sol")
            .with_child(Node::new("pos").with_args(["-112", "22"]))
            .with_child(Node::new("government").with_arg("Republic"))
            .with_child(Node::new("attributes").with_args(["core", "human"]))
            .with_child(Node::new("link").with_arg("Alpha Centauri"))
            .with_child(Node::new("link").with_args(["Vega", "Sirius"]))
            .with_child(Node::new("habitable").with_arg("625"))
            .with_child(Node::new("arrival").with_arg("100"))
            .with_child(
                Node::new("departure")
                    .with_child(Node::new("link").with_arg("500"))
                    .with_child(Node::new("jump").with_arg("250")),
            )
            .with_child(Node::new("trade").with_args(["Food", "322"]))
            .with_child(Node::new("asteroid").with_args(["small rock", "12", "1.4"]))
            .with_child(
                Node::new("object")
                    .with_child(Node::new("sprite").with_arg("star/g0"))
                    .with_child(Node::new("period").with_arg("10")),
            )
            .with_child(
                Node::new("object")
                    .with_arg("Earth")
                    .with_child(Node::new("distance").with_arg("1000"))
                    .with_child(
                        Node::new("object")
                            .with_arg("Luna")
                            .with_child(Node::new("distance").with_arg("100")),
                    ),
            )
    }

    #[test]
    fn system_field_table_is_closed() {
        for field in SystemField::ALL {
            assert_eq!(SystemField::from_key(field.key()), Some(*field));
        }
        assert_eq!(SystemField::Link.policy(), MergePolicy::List);
        assert_eq!(SystemField::Object.policy(), MergePolicy::Sequence);
    }

    #[test]
    fn defaults() {
        let system = StarSystem::named("Empty".into());
        assert_eq!(system.government, "");
        assert_eq!(system.position, None);
        assert_eq!(system.music, None);
        assert_eq!(system.invisible_fence, 10000.0);
        assert_eq!(system.starfield_density, 1.0);
        assert_eq!(system.arrival, Approach::default());
        assert!(system.links.is_empty());
    }

    #[test]
    fn builds_every_field_kind() {
        let (system, diagnostics) = build(sol());

        assert!(diagnostics.is_empty());
        assert_eq!(system.name, "Sol");
        assert_eq!(system.position, Some(Coordinate::new(-112.0, 22.0)));
        assert_eq!(system.government, "Republic");
        assert_eq!(system.attributes, vec!["core", "human"]);
        assert_eq!(system.links, vec!["Alpha Centauri", "Vega", "Sirius"]);
        assert_eq!(system.habitable, 625.0);
        assert_eq!(
            system.arrival,
            Approach {
                link: 100.0,
                jump: 100.0
            }
        );
        assert_eq!(
            system.departure,
            Approach {
                link: 500.0,
                jump: 250.0
            }
        );
        assert_eq!(system.commodity_price("Food"), Some(322.0));
        assert_eq!(
            system.asteroids["small rock"],
            Yield {
                count: 12.0,
                energy: 1.4
            }
        );
        assert_eq!(system.objects.len(), 2);
        assert_eq!(system.objects[0].sprite, Some(Sprite::new("star/g0")));
    }

    #[test]
    fn named_objects_are_breadth_first() {
        let (system, _) = build(sol());
        let names: Vec<_> = system
            .named_objects()
            .into_iter()
            .filter_map(|object| object.name.as_deref())
            .collect();
        assert_eq!(names, vec!["Earth", "Luna"]);
    }

    #[test]
    fn missing_name_is_reported_and_defaults_to_empty() {
        let (system, diagnostics) = build(Node::new("system").with_child(Node::new("hidden")));
        assert_eq!(diagnostics.count(Issue::UnnamedNode), 1);
        assert_eq!(system.name, "");
        assert!(system.hidden);
    }

    #[test]
    fn bad_number_keeps_default_and_continues() {
        let (system, diagnostics) = build(
            Node::new("system")
                .with_arg("Vega")
                .with_child(Node::new("invisible fence").with_arg("lots"))
                .with_child(Node::new("jump range").with_arg("80")),
        );
        assert_eq!(diagnostics.count(Issue::InvalidReal), 1);
        assert_eq!(system.invisible_fence, 10000.0);
        assert_eq!(system.jump_range, 80.0);
    }

    #[test]
    fn remove_government_resets_to_empty() {
        let (mut system, _) = build(sol());
        modify(
            &mut system,
            Node::new("system")
                .with_arg("Sol")
                .with_child(Node::new("government").with_flag(Flag::Remove)),
        );
        assert_eq!(system.government, "");
    }

    #[test]
    fn remove_resets_numeric_fields_to_their_defaults() {
        let (mut system, _) = build(
            Node::new("system")
                .with_arg("Vega")
                .with_child(Node::new("invisible fence").with_arg("5000"))
                .with_child(Node::new("pos").with_args(["1", "2"])),
        );
        modify(
            &mut system,
            Node::new("system")
                .with_arg("Vega")
                .with_child(Node::new("invisible fence").with_flag(Flag::Remove))
                .with_child(Node::new("pos").with_flag(Flag::Remove)),
        );
        assert_eq!(system.invisible_fence, 10000.0);
        assert_eq!(system.position, None);
    }

    #[test]
    fn normal_object_modifiers_replace_then_append() {
        let (mut system, _) = build(sol());
        modify(
            &mut system,
            Node::new("system")
                .with_arg("Sol")
                .with_child(Node::new("object").with_arg("New Earth"))
                .with_child(Node::new("object").with_arg("New Luna")),
        );

        let names: Vec<_> = system
            .objects
            .iter()
            .map(|object| object.name.as_deref().unwrap_or_default())
            .collect();
        assert_eq!(names, vec!["New Earth", "New Luna"]);
    }

    #[test]
    fn remove_object_clears_all_objects() {
        let (mut system, _) = build(sol());
        modify(
            &mut system,
            Node::new("system")
                .with_arg("Sol")
                .with_child(Node::new("object").with_flag(Flag::Remove)),
        );
        assert!(system.objects.is_empty());
    }

    #[test]
    fn link_list_follows_list_rules() {
        let (mut system, _) = build(sol());
        modify(
            &mut system,
            Node::new("system")
                .with_arg("Sol")
                .with_child(Node::new("link").with_flag(Flag::Remove).with_arg("Vega"))
                .with_child(Node::new("link").with_flag(Flag::Add).with_arg("Altair")),
        );
        assert_eq!(system.links, vec!["Alpha Centauri", "Sirius", "Altair"]);
    }

    #[test]
    fn add_link_does_not_duplicate() {
        let mut system = StarSystem::named("Sol".into());
        system.add_link("Vega");
        system.add_link("Vega");
        assert_eq!(system.links, vec!["Vega"]);
        system.remove_link("Vega");
        assert!(system.links.is_empty());
    }
}
