use std::collections::{HashMap, HashSet};

use crate::config::LayoutConfig;
use crate::ir::Person;

use super::family::FamilyUnits;
use super::index::PersonIndex;

/// Reserved horizontal span per family unit id.
pub(super) type WidthMap<'a> = HashMap<&'a str, f32>;

struct WidthPass<'a, 'b> {
    index: &'b PersonIndex<'a>,
    units: &'b FamilyUnits<'a>,
    config: &'b LayoutConfig,
    visited: HashSet<&'a str>,
    widths: WidthMap<'a>,
}

/// Post-order width reservation for every unit reachable from a root.
///
/// A unit needs `max(own footprint, sum of distinct child-unit widths plus
/// sibling gaps)`. Each unit is computed once; a child reachable through a
/// second parent reuses the memoized value.
pub(super) fn compute_subtree_widths<'a>(
    index: &PersonIndex<'a>,
    units: &FamilyUnits<'a>,
    config: &LayoutConfig,
) -> WidthMap<'a> {
    let mut pass = WidthPass {
        index,
        units,
        config,
        visited: HashSet::new(),
        widths: HashMap::new(),
    };
    for root in index.roots() {
        pass.subtree_width(root);
    }
    log::debug!(units = pass.widths.len(); "Subtree widths computed");
    pass.widths
}

impl<'a> WidthPass<'a, '_> {
    fn subtree_width(&mut self, person: &'a Person) -> f32 {
        let Some(unit) = self.units.unit_id(&person.id) else {
            return 0.0;
        };
        if let Some(width) = self.widths.get(unit) {
            return *width;
        }
        let own = self.units.footprint(&person.id, self.config);
        if !self.visited.insert(person.id.as_str()) {
            // Reached again while still on the stack: only a parent cycle does this.
            return own;
        }
        if let Some(partner) = self.units.partner_of(&person.id) {
            self.visited.insert(partner.id.as_str());
        }

        let mut counted: HashSet<&'a str> = HashSet::new();
        let mut total = 0.0;
        for child in self.units.children(self.index, person) {
            let Some(child_unit) = self.units.unit_id(&child.id) else {
                continue;
            };
            if !counted.insert(child_unit) {
                continue;
            }
            if counted.len() > 1 {
                total += self.config.sibling_gap;
            }
            total += self.subtree_width(child);
        }

        let width = own.max(total);
        log::trace!(unit, own, children = total, width; "Unit width");
        self.widths.insert(unit, width);
        width
    }
}
