use es_parser::{Diagnostics, Node};
use indexmap::IndexMap;
use serde::Serialize;

use crate::{Merge, MergeFields, values};

field_keys! {
    pub enum TradeField {
        Commodity = "commodity" => Map,
    }
}

/// The range a commodity's price can move in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceRange {
    pub low: f64,
    pub high: f64,
}

impl PriceRange {
    /// `commodity <name> <low> <high>`
    pub fn read(node: &Node, parent: &str, diagnostics: &mut Diagnostics) -> Option<PriceRange> {
        if !values::expect_args(node, parent, diagnostics, 3) {
            return None;
        }
        let low = values::parse_real(&node.args[1], node, parent, diagnostics)?;
        let high = values::parse_real(&node.args[2], node, parent, diagnostics)?;
        Some(PriceRange { low, high })
    }
}

/// Commodity price ranges gathered from every top-level `trade` node.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Trade {
    commodities: IndexMap<String, PriceRange>,
}

impl Trade {
    pub const KIND: &'static str = "trade";

    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the commodities of one `trade` node. Later definitions of a commodity win.
    pub fn add_node(&mut self, node: &Node, diagnostics: &mut Diagnostics) {
        Merge::construction(Self::KIND, diagnostics).apply(self, node);
    }

    pub fn range(&self, commodity: &str) -> Option<PriceRange> {
        self.commodities.get(commodity).copied()
    }

    pub fn min_price(&self, commodity: &str) -> f64 {
        self.range(commodity).map_or(0.0, |range| range.low)
    }

    pub fn max_price(&self, commodity: &str) -> f64 {
        self.range(commodity).map_or(0.0, |range| range.high)
    }

    pub fn len(&self) -> usize {
        self.commodities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commodities.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, PriceRange> {
        self.commodities.iter()
    }
}

impl MergeFields for Trade {
    type Field = TradeField;

    fn merge_field(&mut self, field: TradeField, node: &Node, merge: &mut Merge<'_, TradeField>) {
        match field {
            TradeField::Commodity => {
                merge.map(field, node, &mut self.commodities, PriceRange::read)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use es_parser::Issue;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn collects_commodity_ranges() {
        let mut diagnostics = Diagnostics::new();
        let mut trade = Trade::new();
        trade.add_node(
            &Node::new("trade")
                .with_child(Node::new("commodity").with_args(["Food", "100", "600"]))
                .with_child(Node::new("commodity").with_args(["Metal", "x", "600"])),
            &mut diagnostics,
        );

        assert_eq!(diagnostics.count(Issue::InvalidReal), 1);
        assert_eq!(trade.len(), 1);
        assert_eq!(trade.min_price("Food"), 100.0);
        assert_eq!(trade.max_price("Food"), 600.0);
        assert_eq!(trade.max_price("Metal"), 0.0);
    }
}
