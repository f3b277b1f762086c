use std::collections::{HashMap, HashSet};

use crate::dates::compare_dates;
use crate::ir::Person;

/// Borrowed arena over the input slice with O(1) id lookup.
///
/// The first record wins when an id appears more than once; later duplicates
/// are invisible to every phase.
pub struct PersonIndex<'a> {
    people: &'a [Person],
    by_id: HashMap<&'a str, usize>,
}

impl<'a> PersonIndex<'a> {
    pub fn new(people: &'a [Person]) -> Self {
        let mut by_id = HashMap::with_capacity(people.len());
        for (idx, person) in people.iter().enumerate() {
            by_id.entry(person.id.as_str()).or_insert(idx);
        }
        Self { people, by_id }
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&'a Person> {
        self.by_id.get(id).map(|&idx| &self.people[idx])
    }

    /// People in input order, duplicates skipped.
    pub fn people(&self) -> impl Iterator<Item = &'a Person> + '_ {
        self.people
            .iter()
            .enumerate()
            .filter(|(idx, person)| self.by_id.get(person.id.as_str()) == Some(idx))
            .map(|(_, person)| person)
    }

    pub fn spouse_of(&self, person: &Person) -> Option<&'a Person> {
        person.spouse().and_then(|id| self.get(id))
    }

    pub fn resolvable_parents(&self, person: &Person) -> Vec<&'a Person> {
        person
            .parent_ids
            .iter()
            .filter(|id| **id != person.id)
            .filter_map(|id| self.get(id))
            .collect()
    }

    /// Resolvable children, birth-date ascending.
    pub fn children_of(&self, person: &Person) -> Vec<&'a Person> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut children: Vec<&'a Person> = Vec::new();
        for id in &person.children_ids {
            if *id == person.id {
                continue;
            }
            let Some(child) = self.get(id) else {
                continue;
            };
            if seen.insert(child.id.as_str()) {
                children.push(child);
            }
        }
        sort_by_birth(&mut children);
        children
    }

    pub fn is_root(&self, person: &Person) -> bool {
        self.resolvable_parents(person).is_empty()
    }

    pub fn roots(&self) -> Vec<&'a Person> {
        self.people().filter(|person| self.is_root(person)).collect()
    }

    pub fn roots_by_birth(&self) -> Vec<&'a Person> {
        let mut roots = self.roots();
        sort_by_birth(&mut roots);
        roots
    }
}

/// Stable sort, so equal or unknown dates keep their listed order.
pub fn sort_by_birth(people: &mut [&Person]) {
    people.sort_by(|a, b| compare_dates(&a.birth_date, &b.birth_date));
}
