use crate::ir::{Gender, Person};

/// Builds consistent person lists for tests: relations are written on both
/// sides unless a test deliberately breaks them afterwards.
pub(crate) struct FamilyBuilder {
    people: Vec<Person>,
}

impl FamilyBuilder {
    pub(crate) fn new() -> Self {
        Self { people: Vec::new() }
    }

    pub(crate) fn person(mut self, id: &str, birth: &str) -> Self {
        let mut person = Person::new(id);
        person.first_name = id.to_uppercase();
        person.birth_date = birth.to_string();
        self.people.push(person);
        self
    }

    pub(crate) fn gender(mut self, id: &str, gender: Gender) -> Self {
        if let Some(person) = self.find(id) {
            person.gender = gender;
        }
        self
    }

    pub(crate) fn married(mut self, a: &str, b: &str) -> Self {
        if let Some(person) = self.find(a) {
            person.spouse_id = Some(b.to_string());
        }
        if let Some(person) = self.find(b) {
            person.spouse_id = Some(a.to_string());
        }
        self
    }

    pub(crate) fn child(mut self, parents: &[&str], id: &str, birth: &str) -> Self {
        self = self.person(id, birth);
        if let Some(child) = self.find(id) {
            child.parent_ids = parents.iter().map(|p| p.to_string()).collect();
        }
        for parent in parents {
            if let Some(person) = self.find(parent) {
                person.children_ids.push(id.to_string());
            }
        }
        self
    }

    pub(crate) fn build(self) -> Vec<Person> {
        self.people
    }

    fn find(&mut self, id: &str) -> Option<&mut Person> {
        self.people.iter_mut().find(|p| p.id == id)
    }
}
