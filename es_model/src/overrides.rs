use es_parser::{Diagnostics, Issue, Node};
use indexmap::IndexMap;

use crate::{Entity, EntityKind, Event, GalacticMap, GameData, Hyperlink, Merge, StarSystem};

/// Patches an existing entity with the children of a modifier node. Each child's flag decides how its
/// field changes.
pub fn apply_modifiers<E: Entity>(entity: &mut E, modifier: &Node, diagnostics: &mut Diagnostics) {
    Merge::modification(E::KIND, diagnostics).apply(entity, modifier);
}

fn modify_named<E: Entity>(
    entities: &mut IndexMap<String, E>,
    modifier: &Node,
    diagnostics: &mut Diagnostics,
) {
    let Some(name) = modifier.first_arg() else {
        diagnostics.node(Issue::IncompleteNode, E::KIND, modifier);
        return;
    };

    match entities.get_mut(name) {
        Some(entity) => apply_modifiers(entity, modifier, diagnostics),
        None => diagnostics.at(
            Issue::UndefinedReference,
            modifier.provenance.clone(),
            Issue::UndefinedReference.describe(E::KIND, name),
        ),
    }
}

impl GalacticMap {
    /// Applies the map's events in order. Field modifiers from every event go first; hyperlink changes
    /// are made once all of them are done.
    pub fn apply_events(&mut self, data: &GameData, diagnostics: &mut Diagnostics) {
        let mut link_changes: Vec<&Event> = Vec::new();

        for name in self.settings.events.clone() {
            if self.applied_events.contains(&name) {
                diagnostics.report(
                    Issue::RepeatedEvent,
                    Issue::RepeatedEvent.describe(&self.settings.name, &name),
                );
                continue;
            }
            let Some(event) = data.event(&name, diagnostics) else {
                continue;
            };

            self.apply_event(event, diagnostics);
            self.applied_events.push(name);
            link_changes.push(event);
        }

        for event in link_changes {
            for link in &event.links {
                self.link_systems(link, diagnostics);
            }
            for unlink in &event.unlinks {
                self.unlink_systems(unlink, diagnostics);
            }
        }
    }

    /// Applies one event's field modifiers. Hyperlinks are left to the caller.
    pub fn apply_event(&mut self, event: &Event, diagnostics: &mut Diagnostics) {
        tracing::info!("Applying event {}...", event.name);

        for modifier in &event.modifiers {
            let Some(kind) = EntityKind::from_key(&modifier.name) else {
                tracing::debug!(event = %event.name, node = %modifier, "Not a map entity, skipping");
                continue;
            };

            match kind {
                EntityKind::System => modify_named(&mut self.systems, modifier, diagnostics),
                EntityKind::Planet => modify_named(&mut self.planets, modifier, diagnostics),
                EntityKind::Government => {
                    modify_named(&mut self.governments, modifier, diagnostics)
                }
                EntityKind::Galaxy => modify_named(&mut self.galaxies, modifier, diagnostics),
                EntityKind::Wormhole => modify_named(&mut self.wormholes, modifier, diagnostics),
            }
        }
    }

    /// Adds a hyperlink in both directions.
    pub fn link_systems(&mut self, link: &Hyperlink, diagnostics: &mut Diagnostics) {
        if !self.has_both_ends(link, diagnostics) {
            return;
        }
        if let Some(system) = self.systems.get_mut(&link.from) {
            system.add_link(&link.to);
        }
        if let Some(system) = self.systems.get_mut(&link.to) {
            system.add_link(&link.from);
        }
    }

    /// Removes a hyperlink in both directions.
    pub fn unlink_systems(&mut self, link: &Hyperlink, diagnostics: &mut Diagnostics) {
        if !self.has_both_ends(link, diagnostics) {
            return;
        }
        if let Some(system) = self.systems.get_mut(&link.from) {
            system.remove_link(&link.to);
        }
        if let Some(system) = self.systems.get_mut(&link.to) {
            system.remove_link(&link.from);
        }
    }

    fn has_both_ends(&self, link: &Hyperlink, diagnostics: &mut Diagnostics) -> bool {
        let mut found = true;
        for end in [&link.from, &link.to] {
            if !self.systems.contains_key(end) {
                diagnostics.report(
                    Issue::UndefinedReference,
                    Issue::UndefinedReference.describe(StarSystem::KIND, end),
                );
                found = false;
            }
        }
        found
    }
}

#[cfg(test)]
mod tests;
