// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.
use std::io::Write;

use super::super::error::Result;
use super::super::hierarchy::{Hierarchy, ScopeChild};
use super::super::signal::SampleValue;
use super::super::types::{ScopeIdx, VarIdx, Version, VCD};
use super::{ValueFormatter, VcdWriter};

// declares the children of `scope_idx` in declaration order
fn write_scope<W: Write>(
    writer: &mut VcdWriter<W, VarIdx>,
    hierarchy: &Hierarchy<String>,
    scope_idx: ScopeIdx,
) -> Result<()> {
    for child in &hierarchy.scope(scope_idx).children {
        match *child {
            ScopeChild::Scope(child_idx) => {
                let scope = hierarchy.scope(child_idx);
                writer.open_scope_kind(&scope.name, scope.kind)?;
                write_scope(writer, hierarchy, child_idx)?;
                writer.close_scope()?;
            }
            ScopeChild::Var(var_idx) => {
                let var = hierarchy.var(var_idx);
                let formatter = if var.var_type.is_textual() {
                    ValueFormatter::text()
                } else {
                    ValueFormatter::bits()
                };
                writer.declare(
                    var_idx,
                    &var.name,
                    var.var_type,
                    var.width,
                    var.range.clone(),
                    formatter,
                )?;
            }
        }
    }
    Ok(())
}

/// Serializes a parsed VCD again. Identifiers are reassigned in declaration
/// order and all samples are merged into one time ordered stream; samples
/// at equal times keep declaration order, then the order they were logged
/// in. Returns the sink.
pub fn write_vcd<W: Write>(vcd: &VCD, sink: W) -> Result<W> {
    let mut writer: VcdWriter<W, VarIdx> = VcdWriter::new(sink);

    let metadata = &vcd.metadata;
    if let Some(date) = &metadata.date {
        writer.date(date)?;
    }
    if let Some(Version(version)) = &metadata.version {
        writer.version(version)?;
    }
    match (metadata.timescale, &metadata.timescale_text) {
        (Some((scalar, unit)), _) => writer.timescale_with_unit(scalar, unit)?,
        (None, Some(text)) => writer.timescale_text(text)?,
        (None, None) => {}
    }

    let hierarchy = &vcd.hierarchy;
    write_scope(&mut writer, hierarchy, hierarchy.root())?;
    writer.end_definitions()?;

    let mut changes: Vec<(u64, VarIdx, &SampleValue)> = hierarchy
        .vars()
        .enumerate()
        .flat_map(|(idx, var)| {
            var.samples
                .iter()
                .map(move |sample| (sample.time, VarIdx(idx), &sample.value))
        })
        .collect();
    // stable, so ties keep the order they were collected in
    changes.sort_by_key(|(time, _, _)| *time);

    for (time, var_idx, value) in changes {
        writer.log_token(time, &var_idx, value)?;
    }

    writer.flush()?;
    log::info!(
        "wrote {} variables up to time {}",
        writer.hierarchy().num_vars(),
        writer.last_time().unwrap_or(0)
    );
    Ok(writer.into_inner())
}
