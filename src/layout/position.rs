use std::collections::{BTreeMap, HashMap, HashSet};

use crate::config::LayoutConfig;
use crate::ir::Person;

use super::NodePosition;
use super::family::FamilyUnits;
use super::index::PersonIndex;
use super::levels::LevelMap;
use super::width::WidthMap;

struct Positioner<'a, 'b> {
    index: &'b PersonIndex<'a>,
    units: &'b FamilyUnits<'a>,
    widths: &'b WidthMap<'a>,
    levels: &'b LevelMap<'a>,
    config: &'b LayoutConfig,
    centers: HashMap<&'a str, f32>,
    positions: BTreeMap<String, NodePosition<'a>>,
}

/// Turns reserved widths into concrete card centres, then centres the
/// whole diagram on x = 0.
pub(super) fn assign_positions<'a>(
    index: &PersonIndex<'a>,
    units: &FamilyUnits<'a>,
    widths: &WidthMap<'a>,
    levels: &LevelMap<'a>,
    config: &LayoutConfig,
) -> BTreeMap<String, NodePosition<'a>> {
    let mut pass = Positioner {
        index,
        units,
        widths,
        levels,
        config,
        centers: HashMap::new(),
        positions: BTreeMap::new(),
    };

    let mut cursor = 0.0;
    for root in index.roots_by_birth() {
        if levels.get(root.id.as_str()) != Some(&0) {
            continue;
        }
        let Some(unit) = units.unit_id(&root.id) else {
            continue;
        };
        if pass.centers.contains_key(unit) {
            continue;
        }
        let reserved = pass.reserved_width(root);
        pass.position_subtree(root, cursor);
        cursor += reserved + config.sibling_gap;
    }

    recenter(&mut pass.positions, config);
    pass.positions
}

impl<'a> Positioner<'a, '_> {
    fn reserved_width(&self, person: &Person) -> f32 {
        self.units
            .unit_id(&person.id)
            .and_then(|unit| self.widths.get(unit).copied())
            .unwrap_or_else(|| self.units.footprint(&person.id, self.config))
    }

    /// Child units this unit lays out: one generation down in the BFS tree.
    fn owned_children(&self, person: &'a Person, level: usize) -> Vec<&'a Person> {
        let mut seen: HashSet<&'a str> = HashSet::new();
        self.units
            .children(self.index, person)
            .into_iter()
            .filter(|child| self.levels.get(child.id.as_str()) == Some(&(level + 1)))
            .filter(|child| {
                self.units
                    .unit_id(&child.id)
                    .map(|unit| seen.insert(unit))
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Places `person`'s unit inside the span starting at `start_x` and
    /// returns the unit centre. A unit placed earlier keeps its position.
    fn position_subtree(&mut self, person: &'a Person, start_x: f32) -> Option<f32> {
        let unit = self.units.unit_id(&person.id)?;
        if let Some(center) = self.centers.get(unit) {
            return Some(*center);
        }
        let level = *self.levels.get(person.id.as_str())?;
        let family_width = self.units.footprint(&person.id, self.config);
        let reserved = self.reserved_width(person);
        let children = self.owned_children(person, level);

        let mut center = start_x + reserved / 2.0;
        if !children.is_empty() {
            let child_widths: Vec<f32> = children.iter().map(|c| self.reserved_width(c)).collect();
            let total = child_widths.iter().sum::<f32>()
                + self.config.sibling_gap * (children.len() as f32 - 1.0);
            // Centred rather than left-aligned so a couple wider than its children stays over them.
            let mut child_x = start_x + ((reserved - total) / 2.0).max(0.0);
            let mut min_child = f32::INFINITY;
            let mut max_child = f32::NEG_INFINITY;
            for (child, width) in children.into_iter().zip(child_widths) {
                if let Some(child_center) = self.position_subtree(child, child_x) {
                    min_child = min_child.min(child_center);
                    max_child = max_child.max(child_center);
                }
                child_x += width + self.config.sibling_gap;
            }
            if min_child.is_finite() {
                center = (min_child + max_child) / 2.0;
                if center - family_width / 2.0 < start_x {
                    center = start_x + family_width / 2.0;
                }
            }
        }

        let y = level as f32 * self.config.generation_spacing;
        let primary_x = center - family_width / 2.0 + self.config.node_width / 2.0;
        self.place(person, primary_x, y, level, 0);
        if let Some(partner) = self.units.partner_of(&person.id)
            && !self.positions.contains_key(&partner.id)
        {
            self.place(partner, primary_x + self.config.spouse_offset(), y, level, 1);
        }
        log::trace!(unit, level, center, reserved; "Unit placed");
        self.centers.insert(unit, center);
        Some(center)
    }

    fn place(&mut self, person: &'a Person, x: f32, y: f32, level: usize, slot: usize) {
        self.positions.insert(
            person.id.clone(),
            NodePosition {
                x,
                y,
                person,
                level,
                slot,
            },
        );
    }
}

fn recenter(positions: &mut BTreeMap<String, NodePosition<'_>>, config: &LayoutConfig) {
    if positions.is_empty() {
        return;
    }
    let half = config.node_width / 2.0;
    let mut min_x = f32::MAX;
    let mut max_x = f32::MIN;
    for pos in positions.values() {
        min_x = min_x.min(pos.x - half);
        max_x = max_x.max(pos.x + half);
    }
    let shift = (min_x + max_x) / 2.0;
    for pos in positions.values_mut() {
        pos.x -= shift;
    }
}
