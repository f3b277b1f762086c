use std::fmt;

use serde::Serialize;

use crate::ir::{Gender, Person};
use crate::layout::{FamilyLayout, PersonIndex};

/// Head counts over a person list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FamilyStats {
    pub total: usize,
    pub males: usize,
    pub females: usize,
    pub others: usize,
    pub living: usize,
    pub deceased: usize,
    pub with_children: usize,
    pub married: usize,
    pub generations: usize,
}

impl FamilyStats {
    /// Counts every distinct id once. A relation only counts when it resolves.
    pub fn from_people(people: &[Person]) -> Self {
        let index = PersonIndex::new(people);
        let mut stats = Self::default();
        for person in index.people() {
            stats.total += 1;
            match person.gender {
                Gender::Male => stats.males += 1,
                Gender::Female => stats.females += 1,
                Gender::Other => stats.others += 1,
            }
            if person.is_living() {
                stats.living += 1;
            } else {
                stats.deceased += 1;
            }
            if !index.children_of(person).is_empty() {
                stats.with_children += 1;
            }
            if index.spouse_of(person).is_some() {
                stats.married += 1;
            }
        }
        stats
    }

    pub fn with_layout(mut self, layout: &FamilyLayout<'_>) -> Self {
        self.generations = layout.generations;
        self
    }
}

impl fmt::Display for FamilyStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "people:        {}", self.total)?;
        writeln!(
            f,
            "gender:        {} male, {} female, {} other",
            self.males, self.females, self.others
        )?;
        writeln!(f, "living:        {}", self.living)?;
        writeln!(f, "deceased:      {}", self.deceased)?;
        writeln!(f, "with children: {}", self.with_children)?;
        writeln!(f, "married:       {}", self.married)?;
        write!(f, "generations:   {}", self.generations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::layout::compute_layout;
    use crate::layout::testing::FamilyBuilder;

    #[test]
    fn counts_genders_and_relations() {
        let mut people = FamilyBuilder::new()
            .person("a", "1900")
            .gender("a", Gender::Male)
            .person("b", "1902")
            .gender("b", Gender::Female)
            .married("a", "b")
            .child(&["a", "b"], "c", "1930")
            .build();
        people[0].death_date = Some("1970".to_string());

        let layout = compute_layout(&people, &LayoutConfig::default());
        let stats = FamilyStats::from_people(&people).with_layout(&layout);
        assert_eq!(
            stats,
            FamilyStats {
                total: 3,
                males: 1,
                females: 1,
                others: 1,
                living: 2,
                deceased: 1,
                with_children: 2,
                married: 2,
                generations: 2,
            }
        );
    }

    #[test]
    fn dangling_relations_do_not_count() {
        let mut people = FamilyBuilder::new().person("a", "1900").build();
        people[0].spouse_id = Some("ghost".to_string());
        people[0].children_ids = vec!["ghost-child".to_string()];
        let stats = FamilyStats::from_people(&people);
        assert_eq!(stats.married, 0);
        assert_eq!(stats.with_children, 0);
    }

    #[test]
    fn summary_lists_every_count() {
        let stats = FamilyStats {
            total: 4,
            generations: 2,
            ..Default::default()
        };
        let text = stats.to_string();
        assert!(text.starts_with("people:        4"));
        assert!(text.ends_with("generations:   2"));
    }
}
