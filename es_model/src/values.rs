//! Readers that turn a child node's arguments into typed values.
//!
//! Every reader has the shape `(node, parent, diagnostics) -> Option<T>`. `None` means the problem has
//! already been reported and the field should keep its previous value.

use es_parser::{Diagnostics, Issue, Node};

use crate::{Coordinate, Yield};

/// Reports a missing argument as an error and extra ones as a warning. Returns false when there are too
/// few arguments to read a value.
pub fn expect_args(node: &Node, parent: &str, diagnostics: &mut Diagnostics, count: usize) -> bool {
    if node.args.len() < count {
        diagnostics.node(Issue::IncompleteNode, parent, node);
        return false;
    }
    if node.args.len() > count {
        diagnostics.node(Issue::ExtraArguments, parent, node);
    }
    true
}

pub fn parse_real(
    text: &str,
    node: &Node,
    parent: &str,
    diagnostics: &mut Diagnostics,
) -> Option<f64> {
    match text.parse::<f64>() {
        Ok(value) => Some(value),
        Err(_) => {
            diagnostics.node(Issue::InvalidReal, parent, node);
            None
        }
    }
}

pub fn parse_integer(
    text: &str,
    node: &Node,
    parent: &str,
    diagnostics: &mut Diagnostics,
) -> Option<i64> {
    match text.parse::<i64>() {
        Ok(value) => Some(value),
        Err(_) => {
            diagnostics.node(Issue::InvalidInteger, parent, node);
            None
        }
    }
}

pub fn string(node: &Node, parent: &str, diagnostics: &mut Diagnostics) -> Option<String> {
    expect_args(node, parent, diagnostics, 1).then(|| node.args[0].clone())
}

pub fn real(node: &Node, parent: &str, diagnostics: &mut Diagnostics) -> Option<f64> {
    if !expect_args(node, parent, diagnostics, 1) {
        return None;
    }
    parse_real(&node.args[0], node, parent, diagnostics)
}

pub fn integer(node: &Node, parent: &str, diagnostics: &mut Diagnostics) -> Option<i64> {
    if !expect_args(node, parent, diagnostics, 1) {
        return None;
    }
    parse_integer(&node.args[0], node, parent, diagnostics)
}

/// `pos <x> <y>`
pub fn coordinate(node: &Node, parent: &str, diagnostics: &mut Diagnostics) -> Option<Coordinate> {
    if !expect_args(node, parent, diagnostics, 2) {
        return None;
    }
    let x = parse_real(&node.args[0], node, parent, diagnostics)?;
    let y = parse_real(&node.args[1], node, parent, diagnostics)?;
    Some(Coordinate::new(x, y))
}

/// The value of a `<key> <real>` map entry.
pub fn keyed_real(node: &Node, parent: &str, diagnostics: &mut Diagnostics) -> Option<f64> {
    if !expect_args(node, parent, diagnostics, 2) {
        return None;
    }
    parse_real(&node.args[1], node, parent, diagnostics)
}

/// The value of a `<key> <string>` map entry.
pub fn keyed_string(node: &Node, parent: &str, diagnostics: &mut Diagnostics) -> Option<String> {
    expect_args(node, parent, diagnostics, 2).then(|| node.args[1].clone())
}

/// The value of a `<key> <count> <energy>` map entry.
pub fn keyed_yield(node: &Node, parent: &str, diagnostics: &mut Diagnostics) -> Option<Yield> {
    if !expect_args(node, parent, diagnostics, 3) {
        return None;
    }
    let count = parse_real(&node.args[1], node, parent, diagnostics)?;
    let energy = parse_real(&node.args[2], node, parent, diagnostics)?;
    Some(Yield { count, energy })
}
