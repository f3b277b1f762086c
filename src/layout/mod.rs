//! Generational layout for family trees.
//!
//! The engine is a strict pipeline over a borrowed person list:
//!
//! 1. [`FamilyUnits`] pairs every person with their resolvable spouse.
//! 2. `width` reserves the horizontal span each unit's descendants need.
//! 3. `levels` assigns breadth-first generation depths from the roots.
//! 4. `position` converts spans into card centres and centres the diagram.
//!
//! Every call builds fresh lookup tables; nothing is shared between calls and
//! the input is never mutated. Dangling ids are skipped wherever they appear.

mod connectors;
mod family;
mod index;
mod levels;
mod position;
#[cfg(test)]
pub(crate) mod testing;
mod types;
mod width;

pub use connectors::{descent_touches, related_ids};
pub use family::FamilyUnits;
pub use index::PersonIndex;
pub use types::*;

use std::collections::BTreeMap;

use crate::config::LayoutConfig;
use crate::ir::Person;

use connectors::{descent_links, spouse_links};
use levels::assign_levels;
use position::assign_positions;
use width::compute_subtree_widths;

/// Position of every reachable person, keyed by id.
pub fn calculate_positions<'a>(
    people: &'a [Person],
    config: &LayoutConfig,
) -> BTreeMap<String, NodePosition<'a>> {
    let index = PersonIndex::new(people);
    let units = FamilyUnits::resolve(&index);
    run_pipeline(&index, &units, config)
}

/// Positions plus connector geometry and bounds for one render cycle.
pub fn compute_layout<'a>(people: &'a [Person], config: &LayoutConfig) -> FamilyLayout<'a> {
    let index = PersonIndex::new(people);
    let units = FamilyUnits::resolve(&index);
    let nodes = run_pipeline(&index, &units, config);
    if nodes.is_empty() {
        return FamilyLayout::default();
    }

    let spouse_links = spouse_links(&nodes, &units, config);
    let descent_links = descent_links(&nodes, &index, &units, config);

    let half_w = config.node_width / 2.0;
    let half_h = config.node_height / 2.0;
    let mut min_x = f32::MAX;
    let mut min_y = f32::MAX;
    let mut max_x = f32::MIN;
    let mut max_y = f32::MIN;
    let mut deepest = 0;
    for node in nodes.values() {
        min_x = min_x.min(node.x - half_w);
        max_x = max_x.max(node.x + half_w);
        min_y = min_y.min(node.y - half_h);
        max_y = max_y.max(node.y + half_h);
        deepest = deepest.max(node.level);
    }

    FamilyLayout {
        nodes,
        spouse_links,
        descent_links,
        min_x,
        min_y,
        max_x,
        max_y,
        width: max_x - min_x,
        height: max_y - min_y,
        generations: deepest + 1,
    }
}

fn run_pipeline<'a>(
    index: &PersonIndex<'a>,
    units: &FamilyUnits<'a>,
    config: &LayoutConfig,
) -> BTreeMap<String, NodePosition<'a>> {
    if index.is_empty() {
        return BTreeMap::new();
    }
    let widths = compute_subtree_widths(index, units, config);
    let levels = assign_levels(index, units);
    let positions = assign_positions(index, units, &widths, &levels, config);
    log::debug!(
        people = index.len(),
        units = units.len(),
        placed = positions.len();
        "Family layout computed"
    );
    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::testing::FamilyBuilder;

    const EPS: f32 = 1e-3;

    fn config() -> LayoutConfig {
        LayoutConfig::default()
    }

    fn extent(pos: &NodePosition<'_>, config: &LayoutConfig) -> (f32, f32) {
        (pos.x - config.node_width / 2.0, pos.x + config.node_width / 2.0)
    }

    fn assert_no_overlap(nodes: &BTreeMap<String, NodePosition<'_>>, config: &LayoutConfig) {
        let list: Vec<&NodePosition<'_>> = nodes.values().collect();
        for (i, a) in list.iter().enumerate() {
            for b in &list[i + 1..] {
                if a.level != b.level {
                    continue;
                }
                let (a0, a1) = extent(a, config);
                let (b0, b1) = extent(b, config);
                assert!(
                    a1 <= b0 + EPS || b1 <= a0 + EPS,
                    "{} and {} overlap at level {}",
                    a.person.id,
                    b.person.id,
                    a.level
                );
            }
        }
    }

    fn assert_centred(nodes: &BTreeMap<String, NodePosition<'_>>, config: &LayoutConfig) {
        let half = config.node_width / 2.0;
        let min = nodes.values().map(|n| n.x - half).fold(f32::MAX, f32::min);
        let max = nodes.values().map(|n| n.x + half).fold(f32::MIN, f32::max);
        assert!(((min + max) / 2.0).abs() < EPS, "bbox midpoint {}", (min + max) / 2.0);
    }

    /// Four generations. The spouses marrying into the g1/g2 line come from
    /// two other root families, so every spouse has parents on the row above.
    fn extended_family() -> Vec<Person> {
        FamilyBuilder::new()
            .person("g1", "1900-02-01")
            .person("g2", "1902-07-12")
            .married("g1", "g2")
            .child(&["g1", "g2"], "p1", "1925")
            .child(&["g1", "g2"], "p2", "1928")
            .child(&["g1", "g2"], "p3", "1931")
            .person("h1", "1898")
            .person("h2", "1899-05-01")
            .married("h1", "h2")
            .child(&["h1", "h2"], "s1", "1924")
            .child(&["h1", "h2"], "s3", "1930")
            .married("p1", "s1")
            .married("p3", "s3")
            .child(&["p1", "s1"], "k1", "1950")
            .child(&["p1", "s1"], "k2", "1952")
            .child(&["p1", "s1"], "k3", "1955")
            .child(&["p3", "s3"], "k4", "1960")
            .person("other_root", "1899")
            .child(&["other_root"], "o1", "1930")
            .child(&["o1"], "k4s", "1961")
            .married("k4", "k4s")
            .child(&["k4", "k4s"], "gg1", "1990")
            .build()
    }

    #[test]
    fn empty_input_yields_empty_map() {
        let people: Vec<Person> = Vec::new();
        assert!(calculate_positions(&people, &config()).is_empty());
        let layout = compute_layout(&people, &config());
        assert!(layout.is_empty());
        assert_eq!(layout.width, 0.0);
    }

    #[test]
    fn layout_is_deterministic() {
        let people = extended_family();
        let first = calculate_positions(&people, &config());
        let second = calculate_positions(&people, &config());
        assert_eq!(first, second);
        let cloned = people.clone();
        let third = calculate_positions(&cloned, &config());
        let a: Vec<(&String, f32, f32)> = first.iter().map(|(k, v)| (k, v.x, v.y)).collect();
        let b: Vec<(&String, f32, f32)> = third.iter().map(|(k, v)| (k, v.x, v.y)).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn every_person_is_placed_without_overlap() {
        let people = extended_family();
        let config = config();
        let nodes = calculate_positions(&people, &config);
        assert_eq!(nodes.len(), people.len());
        assert_no_overlap(&nodes, &config);
        assert_centred(&nodes, &config);
    }

    #[test]
    fn spouses_are_adjacent_on_one_row() {
        let people = extended_family();
        let config = config();
        let nodes = calculate_positions(&people, &config);
        for pos in nodes.values() {
            let Some(spouse) = pos.person.spouse_id.as_deref() else {
                continue;
            };
            let other = &nodes[spouse];
            assert!(((pos.x - other.x).abs() - config.spouse_offset()).abs() < EPS);
            assert_eq!(pos.y, other.y);
            assert_eq!(pos.level, other.level);
        }
        assert_eq!(nodes["s1"].level, 1);
        assert_eq!(nodes["p1"].level, 1);
        assert_eq!(nodes["k4s"].level, 2);
        assert_eq!(nodes["k4"].level, 2);
    }

    #[test]
    fn couples_are_centred_over_their_children() {
        let people = extended_family();
        let config = config();
        let nodes = calculate_positions(&people, &config);
        let couple_mid = |a: &str, b: &str| (nodes[a].x + nodes[b].x) / 2.0;
        // h1/h2 are the older root couple, so they own both shared child units.
        let left = couple_mid("p1", "s1");
        let right = couple_mid("p3", "s3");
        assert!((couple_mid("h1", "h2") - (left + right) / 2.0).abs() < EPS);
        let kids_mid = (nodes["k1"].x + nodes["k3"].x) / 2.0;
        assert!((left - kids_mid).abs() < EPS);
        assert!((nodes["o1"].x - nodes["other_root"].x).abs() < EPS);
    }

    #[test]
    fn rows_follow_generation_spacing() {
        let people = extended_family();
        let config = config();
        let nodes = calculate_positions(&people, &config);
        for pos in nodes.values() {
            assert_eq!(pos.y, pos.level as f32 * config.generation_spacing);
        }
        assert_eq!(nodes["gg1"].level, 3);
    }

    #[test]
    fn unmarried_root_is_level_zero() {
        let people = extended_family();
        let nodes = calculate_positions(&people, &config());
        assert_eq!(nodes["other_root"].level, 0);
        assert_eq!(nodes["g1"].level, 0);
        assert_eq!(nodes["g2"].level, 0);
        assert_eq!(nodes["h1"].level, 0);
    }

    #[test]
    fn root_married_into_deeper_family_is_on_top_row() {
        let people = FamilyBuilder::new()
            .person("g", "1900")
            .child(&["g"], "c", "1930")
            .person("inlaw", "1932")
            .married("c", "inlaw")
            .child(&["c", "inlaw"], "k", "1960")
            .build();
        let config = config();
        let nodes = calculate_positions(&people, &config);
        assert_eq!(nodes["inlaw"].level, 0);
        assert_eq!(nodes["inlaw"].y, 0.0);
        assert_eq!(nodes["c"].level, 0);
        assert_eq!(nodes["k"].level, 1);
        assert!(((nodes["c"].x - nodes["inlaw"].x).abs() - config.spouse_offset()).abs() < EPS);
        let couple_mid = (nodes["c"].x + nodes["inlaw"].x) / 2.0;
        assert!((nodes["k"].x - couple_mid).abs() < EPS);
        assert_no_overlap(&nodes, &config);
        assert_centred(&nodes, &config);
    }

    #[test]
    fn missing_parent_degrades_to_root() {
        let mut people = FamilyBuilder::new()
            .person("known", "1900")
            .person("orphan", "1950")
            .build();
        people[1].parent_ids = vec!["deleted-record".to_string()];
        let nodes = calculate_positions(&people, &config());
        assert_eq!(nodes["orphan"].level, 0);
        assert_eq!(nodes["orphan"].y, 0.0);
        assert_eq!(nodes.len(), 2);
    }

    #[test]
    fn elder_branch_sits_entirely_left_of_younger() {
        let people = FamilyBuilder::new()
            .person("gf", "1900")
            .person("gm", "1901")
            .married("gf", "gm")
            .child(&["gf", "gm"], "father", "1925")
            .child(&["father"], "younger", "1960")
            .child(&["father"], "elder", "1955")
            .person("in_law", "1902")
            .child(&["in_law"], "in_law_kid", "1928")
            .child(&["in_law_kid"], "elder_spouse", "1954")
            .married("elder", "elder_spouse")
            .child(&["elder", "elder_spouse"], "e_kid", "1980")
            .child(&["younger"], "y_kid", "1990")
            .build();
        let config = config();
        let nodes = calculate_positions(&people, &config);
        let half = config.node_width / 2.0;
        let elder_right = ["elder", "elder_spouse", "e_kid"]
            .iter()
            .map(|id| nodes[*id].x + half)
            .fold(f32::MIN, f32::max);
        let younger_left = ["younger", "y_kid"]
            .iter()
            .map(|id| nodes[*id].x - half)
            .fold(f32::MAX, f32::min);
        assert!(elder_right <= younger_left);
        assert_eq!(nodes["elder"].level, 2);
        assert_eq!(nodes["elder_spouse"].level, 2);
        assert_no_overlap(&nodes, &config);
    }

    #[test]
    fn parent_sits_at_average_of_children_recursively() {
        let people = FamilyBuilder::new()
            .person("r", "1900")
            .child(&["r"], "c1", "1930")
            .child(&["r"], "c2", "1935")
            .child(&["c1"], "g1", "1960")
            .child(&["c1"], "g2", "1962")
            .child(&["c2"], "g3", "1965")
            .child(&["c2"], "g4", "1968")
            .build();
        let nodes = calculate_positions(&people, &config());
        let x = |id: &str| nodes[id].x;
        assert!((x("r") - (x("c1") + x("c2")) / 2.0).abs() < EPS);
        assert!((x("c1") - (x("g1") + x("g2")) / 2.0).abs() < EPS);
        assert!((x("c2") - (x("g3") + x("g4")) / 2.0).abs() < EPS);
        assert!(x("r").abs() < EPS);
        assert_eq!(x("g2") - x("g1"), 620.0);
    }

    /// A child with two parents who are not a couple takes the depth of the
    /// parent the breadth-first queue reaches first. Here `late` sits two
    /// generations below its root while `early` is a root, so the child lands
    /// one row under `early`, not one row under `late`.
    #[test]
    fn blended_child_depth_follows_first_bfs_parent() {
        let people = FamilyBuilder::new()
            .person("ancestor", "1880")
            .child(&["ancestor"], "middle", "1910")
            .child(&["middle"], "late", "1940")
            .person("early", "1935")
            .child(&["early", "late"], "shared", "1965")
            .build();
        let config = config();
        let nodes = calculate_positions(&people, &config);
        assert_eq!(nodes["late"].level, 2);
        assert_eq!(nodes["shared"].level, 1);
        assert_eq!(nodes["shared"].y, config.generation_spacing);
        assert!((nodes["early"].x - nodes["shared"].x).abs() < EPS);
        assert_no_overlap(&nodes, &config);
    }

    #[test]
    fn blended_child_of_two_root_parents_is_placed_once() {
        let people = FamilyBuilder::new()
            .person("p", "1900")
            .person("q", "1905")
            .child(&["p", "q"], "x", "1930")
            .build();
        let config = config();
        let nodes = calculate_positions(&people, &config);
        assert_eq!(nodes["x"].level, 1);
        assert_eq!(nodes.len(), 3);
        assert_no_overlap(&nodes, &config);
        // p owns x; q keeps its own slot to the right.
        assert!((nodes["p"].x - nodes["x"].x).abs() < EPS);
        assert!(nodes["q"].x > nodes["p"].x);
        assert_centred(&nodes, &config);
    }

    #[test]
    fn compute_layout_reports_bounds() {
        let people = extended_family();
        let config = config();
        let layout = compute_layout(&people, &config);
        assert_eq!(layout.generations, 4);
        assert!((layout.min_x + layout.max_x).abs() < EPS);
        assert_eq!(layout.min_y, -config.node_height / 2.0);
        assert_eq!(layout.max_y, 3.0 * config.generation_spacing + config.node_height / 2.0);
        assert!(layout.width > 0.0);
    }
}
