use es_parser::{Diagnostics, Issue, Node};
use serde::Serialize;

use crate::values::parse_real;

/// A colour as written in the data. Names are kept as-is and looked up by whatever draws the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ColorSpec {
    Named(String),
    Rgba { r: f64, g: f64, b: f64, a: f64 },
}

impl ColorSpec {
    pub const WHITE: ColorSpec = ColorSpec::Rgba {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// `<name>`, `<r> <g> <b>` or `<r> <g> <b> <a>`, components in 0..=1.
    pub fn read(node: &Node, parent: &str, diagnostics: &mut Diagnostics) -> Option<ColorSpec> {
        let args = &node.args;
        if args.is_empty() {
            diagnostics.node(Issue::IncompleteNode, parent, node);
            return None;
        }
        if args.len() > 4 {
            diagnostics.node(Issue::ExtraArguments, parent, node);
        } else if args.len() == 2 {
            diagnostics.node(Issue::UnlikelyArgumentCount, parent, node);
        }

        if args.len() < 3 {
            return Some(Self::Named(args[0].clone()));
        }

        let mut components = [1.0; 4];
        for (slot, text) in components.iter_mut().zip(args.iter().take(4)) {
            *slot = parse_real(text, node, parent, diagnostics)?;
        }
        if components.iter().any(|c| !(0.0..=1.0).contains(c)) {
            diagnostics.node(Issue::UnlikelyArgument, parent, node);
        }

        let [r, g, b, a] = components;
        Some(Self::Rgba { r, g, b, a })
    }
}

impl Default for ColorSpec {
    fn default() -> Self {
        Self::WHITE
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn read(node: Node) -> (Option<ColorSpec>, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let color = ColorSpec::read(&node, "government", &mut diagnostics);
        (color, diagnostics)
    }

    #[test]
    fn single_argument_is_a_name() {
        let (color, diagnostics) = read(Node::new("color").with_arg("governments: Republic"));
        assert_eq!(color, Some(ColorSpec::named("governments: Republic")));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn three_components_are_opaque() {
        let (color, _) = read(Node::new("color").with_args([".5", ".25", "0"]));
        assert_eq!(
            color,
            Some(ColorSpec::Rgba {
                r: 0.5,
                g: 0.25,
                b: 0.0,
                a: 1.0
            })
        );
    }

    #[test]
    fn two_arguments_are_unlikely() {
        let (color, diagnostics) = read(Node::new("color").with_args(["red", "1"]));
        assert_eq!(color, Some(ColorSpec::named("red")));
        assert_eq!(diagnostics.count(Issue::UnlikelyArgumentCount), 1);
    }

    #[test]
    fn out_of_range_component_is_unlikely() {
        let (color, diagnostics) = read(Node::new("color").with_args(["255", "0", "0"]));
        assert!(color.is_some());
        assert_eq!(diagnostics.count(Issue::UnlikelyArgument), 1);
    }

    #[test]
    fn bad_component_yields_nothing() {
        let (color, diagnostics) = read(Node::new("color").with_args(["1", "x", "0", "1"]));
        assert_eq!(color, None);
        assert_eq!(diagnostics.count(Issue::InvalidReal), 1);
    }
}
