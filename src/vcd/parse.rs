// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.
use std::io::{BufReader, Read};

use super::error::Result;
use super::hierarchy::Hierarchy;
use super::reader::WordReader;
use super::types::{Metadata, VCD};

mod combinator_atoms;

mod types;

mod metadata;
pub(super) use metadata::parse_date;

mod scopes;
use scopes::parse_declarations;

mod events;
use events::parse_events;

/// Knobs for `parse_vcd_with`.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Reject a time marker smaller than the current time.
    pub check_time_order: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            check_time_order: true,
        }
    }
}

/// Parses a complete VCD stream with default options.
pub fn parse_vcd<R: Read>(reader: R) -> Result<VCD> {
    parse_vcd_with(reader, &ParseOptions::default())
}

pub fn parse_vcd_with<R: Read>(reader: R, options: &ParseOptions) -> Result<VCD> {
    let mut word_reader = WordReader::new(BufReader::new(reader));

    let mut vcd = VCD {
        metadata: Metadata::default(),
        hierarchy: Hierarchy::new(),
        end_time: 0,
    };

    parse_declarations(&mut word_reader, &mut vcd)?;
    parse_events(&mut word_reader, &mut vcd, options)?;

    log::info!(
        "parsed {} scopes, {} variables and {} samples over {} lines",
        vcd.hierarchy.num_scopes(),
        vcd.hierarchy.num_vars(),
        vcd.num_samples(),
        word_reader.lines_read()
    );

    Ok(vcd)
}

pub fn parse_vcd_str(text: &str) -> Result<VCD> {
    parse_vcd(text.as_bytes())
}
