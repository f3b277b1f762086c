use crate::layout::{DescentLink, FamilyLayout, SpouseLink};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump<'l> {
    pub width: f32,
    pub height: f32,
    pub min_x: f32,
    pub min_y: f32,
    pub generations: usize,
    pub nodes: Vec<NodeDump>,
    pub spouse_links: &'l [SpouseLink],
    pub descent_links: &'l [DescentLink],
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub level: usize,
    pub slot: usize,
    pub gender: crate::ir::Gender,
}

impl<'l> LayoutDump<'l> {
    pub fn from_layout(layout: &'l FamilyLayout<'_>) -> Self {
        let nodes = layout
            .nodes
            .values()
            .map(|node| NodeDump {
                id: node.person.id.clone(),
                name: node.person.display_name(),
                x: node.x,
                y: node.y,
                level: node.level,
                slot: node.slot,
                gender: node.person.gender,
            })
            .collect();

        LayoutDump {
            width: layout.width,
            height: layout.height,
            min_x: layout.min_x,
            min_y: layout.min_y,
            generations: layout.generations,
            nodes,
            spouse_links: &layout.spouse_links,
            descent_links: &layout.descent_links,
        }
    }
}

/// Pretty JSON to `path`, or stdout when no path is given.
pub fn write_layout_dump(layout: &FamilyLayout<'_>, output: Option<&Path>) -> anyhow::Result<()> {
    let dump = LayoutDump::from_layout(layout);
    match output {
        Some(path) => {
            let writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(writer, &dump)?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            serde_json::to_writer_pretty(&mut lock, &dump)?;
            writeln!(lock)?;
        }
    }
    Ok(())
}
