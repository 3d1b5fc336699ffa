use crate::ir::PersonId;
use crate::layout::{Layout, Position, Segment};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Wire shape handed to renderers: `positions` keyed by person id and the
/// tagged connector `segments`.
#[derive(Debug, Serialize)]
pub struct LayoutDump<'a> {
    pub positions: &'a BTreeMap<PersonId, Position>,
    pub segments: &'a [Segment],
}

impl<'a> LayoutDump<'a> {
    pub fn from_layout(layout: &'a Layout) -> Self {
        Self {
            positions: &layout.positions,
            segments: &layout.segments,
        }
    }
}

pub fn layout_to_json(layout: &Layout) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&LayoutDump::from_layout(layout))?)
}

pub fn write_layout_dump(output: Option<&Path>, layout: &Layout) -> anyhow::Result<()> {
    let dump = LayoutDump::from_layout(layout);
    match output {
        Some(path) => {
            let file = File::create(path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &dump)?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            serde_json::to_writer_pretty(&mut lock, &dump)?;
            writeln!(lock)?;
        }
    }
    Ok(())
}
