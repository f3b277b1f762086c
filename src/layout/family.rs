use std::collections::{HashMap, HashSet};

use crate::config::LayoutConfig;
use crate::ir::Person;

use super::index::{PersonIndex, sort_by_birth};

/// Person → family unit table for one layout pass.
///
/// A unit is a person plus, when it resolves, their spouse. Its id is the
/// lexicographically smaller member id. Units are formed in input order and
/// a person joins at most one unit, so an asymmetric spouse chain (A→B, B→C)
/// pairs A with B and leaves C single.
pub struct FamilyUnits<'a> {
    unit_of: HashMap<&'a str, &'a str>,
    partner: HashMap<&'a str, &'a Person>,
}

impl<'a> FamilyUnits<'a> {
    pub fn resolve(index: &PersonIndex<'a>) -> Self {
        let mut unit_of: HashMap<&'a str, &'a str> = HashMap::with_capacity(index.len());
        let mut partner: HashMap<&'a str, &'a Person> = HashMap::new();

        for person in index.people() {
            let id = person.id.as_str();
            if unit_of.contains_key(id) {
                continue;
            }
            let spouse = index
                .spouse_of(person)
                .filter(|spouse| spouse.id != person.id)
                .filter(|spouse| !unit_of.contains_key(spouse.id.as_str()));
            match spouse {
                Some(spouse) => {
                    let unit = id.min(spouse.id.as_str());
                    unit_of.insert(id, unit);
                    unit_of.insert(spouse.id.as_str(), unit);
                    partner.insert(id, spouse);
                    partner.insert(spouse.id.as_str(), person);
                }
                None => {
                    if person.spouse().is_some() {
                        log::debug!(person = id; "Spouse link does not resolve, treating as unmarried");
                    }
                    unit_of.insert(id, id);
                }
            }
        }

        Self { unit_of, partner }
    }

    /// Canonical unit id for `person_id`, `None` if the person is unknown.
    pub fn unit_id(&self, person_id: &str) -> Option<&'a str> {
        self.unit_of.get(person_id).copied()
    }

    pub fn partner_of(&self, person_id: &str) -> Option<&'a Person> {
        self.partner.get(person_id).copied()
    }

    pub fn member_count(&self, person_id: &str) -> usize {
        if self.partner.contains_key(person_id) { 2 } else { 1 }
    }

    /// Width of the unit's own cards, ignoring descendants.
    pub fn footprint(&self, person_id: &str, config: &LayoutConfig) -> f32 {
        config.family_width(self.member_count(person_id))
    }

    /// Resolvable children of either member, birth-date ascending.
    pub fn children(&self, index: &PersonIndex<'a>, person: &Person) -> Vec<&'a Person> {
        let mut children = index.children_of(person);
        if let Some(partner) = self.partner_of(&person.id) {
            let mut seen: HashSet<&str> = children.iter().map(|c| c.id.as_str()).collect();
            for child in index.children_of(partner) {
                if seen.insert(child.id.as_str()) {
                    children.push(child);
                }
            }
            sort_by_birth(&mut children);
        }
        children.retain(|child| self.unit_id(&child.id) != self.unit_id(&person.id));
        children
    }

    pub fn len(&self) -> usize {
        self.unit_of
            .iter()
            .filter(|(person, unit)| person == unit)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.unit_of.is_empty()
    }
}
