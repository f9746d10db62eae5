//! Name lookups between entities of one map.
//!
//! A missing name is reported as an error and yields `None`, except for governments, which fall back to
//! [`UNINHABITED`] with a warning.

use std::collections::HashSet;

use es_parser::{Diagnostics, Issue};
use indexmap::IndexMap;

use crate::{
    Entity, GalacticMap, Galaxy, Government, Planet, StarSystem, UNINHABITED, Wormhole,
};

fn lookup<'a, E: Entity>(
    entities: &'a IndexMap<String, E>,
    name: &str,
    diagnostics: &mut Diagnostics,
) -> Option<&'a E> {
    let entity = entities.get(name);
    if entity.is_none() {
        diagnostics.report(
            Issue::UndefinedReference,
            Issue::UndefinedReference.describe(E::KIND, name),
        );
    }
    entity
}

impl GalacticMap {
    pub fn system(&self, name: &str, diagnostics: &mut Diagnostics) -> Option<&StarSystem> {
        lookup(&self.systems, name, diagnostics)
    }

    pub fn planet(&self, name: &str, diagnostics: &mut Diagnostics) -> Option<&Planet> {
        lookup(&self.planets, name, diagnostics)
    }

    pub fn galaxy(&self, name: &str, diagnostics: &mut Diagnostics) -> Option<&Galaxy> {
        lookup(&self.galaxies, name, diagnostics)
    }

    pub fn wormhole(&self, name: &str, diagnostics: &mut Diagnostics) -> Option<&Wormhole> {
        lookup(&self.wormholes, name, diagnostics)
    }

    /// The named government, or `Uninhabited` when there is none by that name.
    pub fn government(&self, name: &str, diagnostics: &mut Diagnostics) -> Option<&Government> {
        if let Some(government) = self.governments.get(name) {
            return Some(government);
        }

        diagnostics.report(
            Issue::FallbackReference,
            Issue::FallbackReference.describe(Government::KIND, name),
        );
        lookup(&self.governments, UNINHABITED, diagnostics)
    }

    /// A system with no named objects, or whose named objects are all uninhabited planets or wormhole
    /// mouths. Its government does not matter.
    pub fn is_uninhabited(&self, system: &StarSystem, diagnostics: &mut Diagnostics) -> bool {
        system.named_objects().into_iter().all(|object| {
            let Some(name) = object.name.as_deref() else {
                return true;
            };
            match self.planet(name, diagnostics) {
                Some(planet) => planet.has_attribute("uninhabited") || planet.is_wormhole(),
                None => true,
            }
        })
    }

    /// The government whose colour a system is painted with.
    pub fn paint_government(
        &self,
        system: &StarSystem,
        diagnostics: &mut Diagnostics,
    ) -> Option<&Government> {
        if !self.settings.paint_uninhabited && self.is_uninhabited(system, diagnostics) {
            return self.government(UNINHABITED, diagnostics);
        }
        self.government(&system.government, diagnostics)
    }

    pub fn visible_systems(&self) -> impl Iterator<Item = &StarSystem> {
        self.systems
            .values()
            .filter(|system| self.settings.include_hidden || !system.hidden)
    }

    pub fn drawn_wormholes(&self) -> impl Iterator<Item = &Wormhole> {
        self.wormholes
            .values()
            .filter(|wormhole| self.settings.include_unmappable_wormholes || wormhole.mappable)
    }

    /// Every hyperlink between two visible systems, once per pair, in system order.
    pub fn visible_links(&self, diagnostics: &mut Diagnostics) -> Vec<(&StarSystem, &StarSystem)> {
        let mut seen: HashSet<(&str, &str)> = HashSet::new();
        let mut links = Vec::new();

        for system in self.visible_systems() {
            for target in &system.links {
                let Some(other) = self.system(target, diagnostics) else {
                    continue;
                };
                if !self.settings.include_hidden && other.hidden {
                    continue;
                }
                let pair = if system.name <= other.name {
                    (system.name.as_str(), other.name.as_str())
                } else {
                    (other.name.as_str(), system.name.as_str())
                };
                if seen.insert(pair) {
                    links.push((system, other));
                }
            }
        }

        links
    }
}
