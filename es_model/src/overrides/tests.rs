#![cfg(test)]

use es_parser::{Diagnostics, Issue, Origin, parse_source};
use pretty_assertions::assert_eq;

use crate::{Event, GalacticMap, GameData, MapSettings};

fn load(input: &str, settings: MapSettings) -> (GalacticMap, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let source = parse_source(input, "data/map.txt", Origin::Base, &mut diagnostics);
    let data = GameData::new(source, &mut diagnostics);
    let map = GalacticMap::load(settings, &data, &mut diagnostics);
    (map, diagnostics)
}

const SOL: &str = "\
system Sol
\tgovernment Republic
\tpos 0 0
event Annex
\tsystem Sol
\t\tremove government
";

#[test]
fn annex_removes_government() {
    let (map, diagnostics) = load(SOL, MapSettings::named("Before"));
    assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    assert_eq!(map.systems["Sol"].government, "Republic");

    let (map, diagnostics) = load(SOL, MapSettings::named("After").with_event("Annex"));
    assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    assert_eq!(map.systems["Sol"].government, "");
    assert_eq!(map.applied_events, vec!["Annex"]);
}

#[test]
fn undefined_government_falls_back_with_one_warning() {
    let input = "\
government Uninhabited
system Sol
\tgovernment Pirate
";
    let (map, mut diagnostics) = load(input, MapSettings::named("Test"));
    assert!(diagnostics.is_empty());

    let sol = &map.systems["Sol"];
    let government = map.government(&sol.government, &mut diagnostics);
    assert_eq!(government.map(|g| g.name.as_str()), Some("Uninhabited"));
    assert_eq!(diagnostics.warning_count(), 1);
    assert_eq!(diagnostics.error_count(), 0);
}

#[test]
fn events_apply_in_order_and_only_once() {
    let input = "\
system Sol
\tgovernment Republic
event first
\tsystem Sol
\t\tgovernment Pirate
\t\tadd attributes occupied
event second
\tsystem Sol
\t\tgovernment Syndicate
";
    let settings = MapSettings::named("Test")
        .with_event("first")
        .with_event("second")
        .with_event("first");
    let (map, diagnostics) = load(input, settings);

    let sol = &map.systems["Sol"];
    assert_eq!(sol.government, "Syndicate");
    assert_eq!(sol.attributes, vec!["occupied"]);
    assert_eq!(map.applied_events, vec!["first", "second"]);
    assert_eq!(diagnostics.count(Issue::RepeatedEvent), 1);
    assert_eq!(
        diagnostics.iter().next().map(|d| d.message.as_str()),
        Some("Event first is already applied to Test")
    );
}

#[test]
fn missing_event_and_target_are_errors() {
    let input = "\
system Sol
event ghost
\tsystem Vega
\t\thidden
\tsystem Sol
\t\thidden
";
    let settings = MapSettings::named("Test")
        .with_event("nothing")
        .with_event("ghost");
    let (map, diagnostics) = load(input, settings);

    assert_eq!(diagnostics.count(Issue::UndefinedReference), 2);
    assert!(map.systems["Sol"].hidden);
    assert!(!map.systems.contains_key("Vega"));
}

#[test]
fn links_are_symmetric_and_applied_last() {
    let input = "\
system Sol
\tlink Alpha
system Alpha
\tlink Sol
system Vega
event rewire
\tunlink Sol Alpha
\tlink Vega Sol
\tsystem Vega
\t\tlink Alpha
";
    let (map, diagnostics) = load(input, MapSettings::named("Test").with_event("rewire"));
    assert!(diagnostics.is_empty(), "{:?}", diagnostics);

    assert_eq!(map.systems["Sol"].links, vec!["Vega"]);
    // The field modifier on Vega only changes Vega's own list.
    assert!(map.systems["Alpha"].links.is_empty());
    assert_eq!(map.systems["Vega"].links, vec!["Alpha", "Sol"]);
}

#[test]
fn linking_twice_keeps_one_link() {
    let mut map = GalacticMap::default();
    let mut diagnostics = Diagnostics::new();
    map.define(&es_parser::Node::new("system").with_arg("Sol"), &mut diagnostics);
    map.define(&es_parser::Node::new("system").with_arg("Vega"), &mut diagnostics);

    let event = Event::new("twice")
        .with_link("Sol", "Vega")
        .with_link("Vega", "Sol");
    for link in &event.links {
        map.link_systems(link, &mut diagnostics);
    }

    assert_eq!(map.systems["Sol"].links, vec!["Vega"]);
    assert_eq!(map.systems["Vega"].links, vec!["Sol"]);

    map.unlink_systems(&crate::Hyperlink::new("Sol", "Nowhere"), &mut diagnostics);
    assert_eq!(diagnostics.count(Issue::UndefinedReference), 1);
    assert_eq!(map.systems["Sol"].links, vec!["Vega"]);
}

#[test]
fn map_remove_of_missing_key_does_not_stop_the_event() {
    let input = "\
system Sol
\ttrade Food 300
event market
\tsystem Sol
\t\tremove trade Metal
\t\ttrade Food 500
";
    let (map, diagnostics) = load(input, MapSettings::named("Test").with_event("market"));

    assert_eq!(diagnostics.count(Issue::InvalidMapKey), 1);
    assert_eq!(map.systems["Sol"].commodity_price("Food"), Some(500.0));
}

#[test]
fn events_touch_one_map_only() {
    let mut diagnostics = Diagnostics::new();
    let source = parse_source(SOL, "data/map.txt", Origin::Base, &mut diagnostics);
    let data = GameData::new(source, &mut diagnostics);

    let before = GalacticMap::load(MapSettings::named("Before"), &data, &mut diagnostics);
    let after = GalacticMap::load(
        MapSettings::named("After").with_event("Annex"),
        &data,
        &mut diagnostics,
    );

    assert_eq!(before.systems["Sol"].government, "Republic");
    assert_eq!(after.systems["Sol"].government, "");
}

#[test]
fn non_map_modifiers_are_skipped() {
    let input = "\
system Sol
event news
\tnews \"Something happened\"
\t\tlocation Sol
\tsystem Sol
\t\tshrouded
";
    let (map, diagnostics) = load(input, MapSettings::named("Test").with_event("news"));
    assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    assert!(map.systems["Sol"].shrouded);
}
