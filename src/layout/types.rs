use std::collections::BTreeMap;

use serde::Serialize;

use crate::ir::Person;

/// Placed person card. `x`/`y` are the card centre.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodePosition<'a> {
    pub x: f32,
    pub y: f32,
    pub person: &'a Person,
    pub level: usize,
    /// 0 for the primary (left) member of a couple, 1 for the spouse.
    pub slot: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpouseLink {
    pub left: String,
    pub right: String,
    pub x1: f32,
    pub x2: f32,
    pub y: f32,
    pub mid_x: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChildStub {
    pub child: String,
    pub x: f32,
    pub top_y: f32,
}

/// Drop line from a parent (or couple midpoint) to a bar over the children.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescentLink {
    pub parents: Vec<String>,
    pub x: f32,
    pub parent_bottom: f32,
    pub drop_y: f32,
    pub bar_x1: f32,
    pub bar_x2: f32,
    pub stubs: Vec<ChildStub>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FamilyLayout<'a> {
    pub nodes: BTreeMap<String, NodePosition<'a>>,
    pub spouse_links: Vec<SpouseLink>,
    pub descent_links: Vec<DescentLink>,
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
    pub width: f32,
    pub height: f32,
    pub generations: usize,
}

impl FamilyLayout<'_> {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
