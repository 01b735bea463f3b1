// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.

//! part of the vcd parser that walks the value change section and
//! appends samples to the variables declared earlier
use std::io::BufRead;

use super::super::error::{Result, VcdError};
use super::super::hierarchy::Hierarchy;
use super::super::reader::{next_word, Cursor, WordReader};
use super::super::signal::{Sample, SampleValue};
use super::super::types::VCD;
use super::combinator_atoms::read_until_end;
use super::types::Keyword;
use super::ParseOptions;

/// A value change token, split into what is known after reading one word.
#[derive(Debug)]
enum Change<'a> {
    // `0!`: value and identifier in a single word
    Complete { id: &'a str, value: SampleValue },
    // `b0101 !`: the identifier is the next word
    AwaitingId(SampleValue),
}

fn split_change<'a>(word: &'a str, cursor: &Cursor) -> Result<Change<'a>> {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return Err(VcdError::syntax(cursor, "empty value change"));
    };
    let body = chars.as_str();

    let change = match first {
        'b' | 'B' if !body.is_empty() => Change::AwaitingId(SampleValue::Vector(word.to_string())),
        'r' | 'R' if !body.is_empty() => Change::AwaitingId(SampleValue::Real(word.to_string())),
        's' | 'S' => Change::AwaitingId(SampleValue::Str(body.to_string())),
        'b' | 'B' | 'r' | 'R' => {
            return Err(VcdError::syntax(
                cursor,
                format!("malformed value change `{word}`"),
            ))
        }
        // any other character is a scalar value: 0 1 x z, or u w l h - from VHDL
        chr => {
            if body.is_empty() {
                return Err(VcdError::syntax(
                    cursor,
                    format!("value change `{word}` has no identifier"),
                ));
            }
            Change::Complete {
                id: body,
                value: SampleValue::Scalar(chr),
            }
        }
    };

    Ok(change)
}

fn record(
    hierarchy: &mut Hierarchy<String>,
    id: &str,
    value: SampleValue,
    now: u64,
    cursor: &Cursor,
) -> Result<()> {
    let var_idx = hierarchy.var_by_handle(id).ok_or_else(|| {
        VcdError::syntax(
            cursor,
            format!("value change for undeclared identifier `{id}`"),
        )
    })?;

    log::trace!("#{now} {} <- {value}", hierarchy.var(var_idx).name);
    hierarchy.push_sample(var_idx, Sample { time: now, value });
    Ok(())
}

/// Handles one value change whose first word has already been read.
/// Reading the identifier of a vector change pulls one more word, taken as
/// the identifier whatever it looks like: `#` and `$` are identifier
/// characters too.
macro_rules! value_change {
    ($word_reader:ident, $hierarchy:expr, $word:expr, $cursor:expr, $now:expr) => {
        match split_change($word, &$cursor)? {
            Change::Complete { id, value } => record($hierarchy, id, value, $now, &$cursor)?,
            Change::AwaitingId(value) => {
                let (id, id_cursor) = $word_reader.next_word()?.ok_or_else(|| {
                    VcdError::syntax(
                        &$cursor,
                        format!("reached end of input before the identifier of `{value}`"),
                    )
                })?;
                record($hierarchy, id, value, $now, &id_cursor)?
            }
        }
    };
}

/// `$dumpvars`, `$dumpall`, `$dumpon` and `$dumpoff` hold plain value
/// changes up to their `$end`.
fn parse_value_change_list<R: BufRead>(
    word_reader: &mut WordReader<R>,
    hierarchy: &mut Hierarchy<String>,
    keyword: Keyword,
    opened: &Cursor,
    now: u64,
) -> Result<()> {
    loop {
        let (word, cursor) = next_word!(word_reader, keyword.as_str(), opened)?;

        if word == "$end" {
            return Ok(());
        }
        if word.starts_with('$') || word.starts_with('#') {
            return Err(VcdError::syntax(
                &cursor,
                format!(
                    "expected `$end` to close `{}` but found `{word}`",
                    keyword.as_str()
                ),
            ));
        }

        value_change!(word_reader, hierarchy, word, cursor, now);
    }
}

fn advance_time(word: &str, cursor: &Cursor, now: u64, options: &ParseOptions) -> Result<u64> {
    let time = word[1..].parse::<u64>().map_err(|_| {
        VcdError::syntax(cursor, format!("`{word}` is not a valid time marker"))
    })?;

    if options.check_time_order && time < now {
        return Err(VcdError::TimeOrder {
            last: now,
            requested: time,
        });
    }

    log::trace!("time {now} -> {time}");
    Ok(time)
}

/// Drives the value change section until the input runs out.
pub(super) fn parse_events<R: BufRead>(
    word_reader: &mut WordReader<R>,
    vcd: &mut VCD,
    options: &ParseOptions,
) -> Result<()> {
    let mut now = 0u64;

    while let Some((word, cursor)) = word_reader.next_word()? {
        match word.as_bytes()[0] {
            b'$' => match Keyword::from_word(word) {
                Some(keyword) if keyword.is_dump_block() => {
                    parse_value_change_list(word_reader, &mut vcd.hierarchy, keyword, &cursor, now)?
                }
                Some(Keyword::Comment) => {
                    let text = read_until_end(word_reader, Keyword::Comment.as_str(), &cursor)?;
                    vcd.metadata.comments.push(text.join(" "));
                }
                _ => {
                    return Err(VcdError::syntax(
                        &cursor,
                        format!("unexpected keyword `{word}` after `$enddefinitions`"),
                    ))
                }
            },
            b'#' => now = advance_time(word, &cursor, now, options)?,
            _ => value_change!(word_reader, &mut vcd.hierarchy, word, cursor, now),
        }
    }

    vcd.end_time = now;
    Ok(())
}
