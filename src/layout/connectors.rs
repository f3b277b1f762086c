use std::collections::{BTreeMap, BTreeSet};

use crate::config::LayoutConfig;
use crate::ir::Person;

use super::family::FamilyUnits;
use super::index::PersonIndex;
use super::{ChildStub, DescentLink, NodePosition, SpouseLink};

pub(super) fn spouse_links(
    nodes: &BTreeMap<String, NodePosition<'_>>,
    units: &FamilyUnits<'_>,
    config: &LayoutConfig,
) -> Vec<SpouseLink> {
    let half = config.node_width / 2.0;
    let mut links = Vec::new();
    for (id, pos) in nodes {
        if pos.slot != 0 {
            continue;
        }
        let Some(partner) = units.partner_of(id) else {
            continue;
        };
        let Some(partner_pos) = nodes.get(&partner.id) else {
            continue;
        };
        let (left, right) = if pos.x <= partner_pos.x {
            (pos, partner_pos)
        } else {
            (partner_pos, pos)
        };
        let x1 = left.x + half;
        let x2 = right.x - half;
        links.push(SpouseLink {
            left: left.person.id.clone(),
            right: right.person.id.clone(),
            x1,
            x2,
            y: left.y,
            mid_x: (x1 + x2) / 2.0,
        });
    }
    links
}

/// One drop per placed family unit that has placed children.
pub(super) fn descent_links(
    nodes: &BTreeMap<String, NodePosition<'_>>,
    index: &PersonIndex<'_>,
    units: &FamilyUnits<'_>,
    config: &LayoutConfig,
) -> Vec<DescentLink> {
    let half_height = config.node_height / 2.0;
    let mut links = Vec::new();
    for (id, pos) in nodes {
        if pos.slot != 0 {
            continue;
        }
        let mut parents = vec![id.clone()];
        let mut x = pos.x;
        if let Some(partner) = units.partner_of(id)
            && let Some(partner_pos) = nodes.get(&partner.id)
        {
            parents.push(partner.id.clone());
            x = (pos.x + partner_pos.x) / 2.0;
        }

        let stubs: Vec<ChildStub> = units
            .children(index, pos.person)
            .into_iter()
            .filter_map(|child| nodes.get(&child.id))
            .map(|child| ChildStub {
                child: child.person.id.clone(),
                x: child.x,
                top_y: child.y - half_height,
            })
            .collect();
        if stubs.is_empty() {
            continue;
        }

        let parent_bottom = pos.y + half_height;
        let drop_y = parent_bottom + config.generation_spacing / 3.0;
        let bar_x1 = stubs.iter().map(|s| s.x).fold(x, f32::min);
        let bar_x2 = stubs.iter().map(|s| s.x).fold(x, f32::max);
        links.push(DescentLink {
            parents,
            x,
            parent_bottom,
            drop_y,
            bar_x1,
            bar_x2,
            stubs,
        });
    }
    links
}

/// Ids to emphasise when `selected` is focused: the person, their parents,
/// children and spouse, as recorded.
pub fn related_ids(people: &[Person], selected: &str) -> BTreeSet<String> {
    let mut related = BTreeSet::new();
    let index = PersonIndex::new(people);
    let Some(person) = index.get(selected) else {
        return related;
    };
    related.insert(person.id.clone());
    related.extend(person.parent_ids.iter().cloned());
    related.extend(person.children_ids.iter().cloned());
    if let Some(spouse) = person.spouse() {
        related.insert(spouse.to_string());
    }
    related
}

/// Whether a descent link starts at one of `ids`.
pub fn descent_touches(link: &DescentLink, ids: &BTreeSet<String>) -> bool {
    link.parents.iter().any(|id| ids.contains(id))
}
