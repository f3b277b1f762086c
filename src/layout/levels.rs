use std::collections::{HashMap, VecDeque};

use crate::ir::Person;

use super::family::FamilyUnits;
use super::index::PersonIndex;

/// Generation depth per person id. People missing here are unreachable.
pub(super) type LevelMap<'a> = HashMap<&'a str, usize>;

/// Breadth-first generation leveling from every root at once.
///
/// Every root is seeded at depth 0 in birth order before the queue drains,
/// and a person's partner is leveled eagerly at the same depth. A root that
/// married into a deeper family therefore pulls its partner up to row 0. A
/// child with two parents at different depths takes the depth of whichever
/// parent the queue reaches first; no "deepest parent" correction is applied.
pub(super) fn assign_levels<'a>(index: &PersonIndex<'a>, units: &FamilyUnits<'a>) -> LevelMap<'a> {
    let mut levels: LevelMap<'a> = HashMap::with_capacity(index.len());
    let mut queue: VecDeque<(&'a Person, usize)> = VecDeque::new();

    for root in index.roots_by_birth() {
        visit(root, 0, units, &mut levels, &mut queue);
    }
    drain(index, units, &mut levels, &mut queue);

    let dropped = index.len().saturating_sub(levels.len());
    if dropped > 0 {
        log::debug!(dropped; "People unreachable from any root are left out");
    }
    levels
}

fn visit<'a>(
    person: &'a Person,
    level: usize,
    units: &FamilyUnits<'a>,
    levels: &mut LevelMap<'a>,
    queue: &mut VecDeque<(&'a Person, usize)>,
) {
    if levels.contains_key(person.id.as_str()) {
        return;
    }
    levels.insert(person.id.as_str(), level);
    if let Some(partner) = units.partner_of(&person.id) {
        levels.entry(partner.id.as_str()).or_insert(level);
    }
    queue.push_back((person, level));
}

fn drain<'a>(
    index: &PersonIndex<'a>,
    units: &FamilyUnits<'a>,
    levels: &mut LevelMap<'a>,
    queue: &mut VecDeque<(&'a Person, usize)>,
) {
    while let Some((person, level)) = queue.pop_front() {
        for child in units.children(index, person) {
            visit(child, level + 1, units, levels, queue);
        }
    }
}
