// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.
use std::io::BufRead;

use chrono::NaiveDateTime;
use itertools::Itertools;

use super::super::error::{Result, VcdError};
use super::super::reader::{Cursor, WordReader};
use super::super::types::{Metadata, Timescale, Version};
use super::combinator_atoms::{digit, read_until_end, take_while};
use super::types::{Keyword, ParseResult};

/// Interprets `$date` text. Returns `None` for anything unrecognized, the
/// date is opaque text as far as the format is concerned.
pub(crate) fn parse_date(text: &str) -> Option<NaiveDateTime> {
    // what the writer emits when handed a chrono timestamp
    if let Ok(date) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(date);
    }

    // Simulators typically emit {Day, Month, Date, hh:mm:ss, Year} but not
    // always in that order, so every ordering of the 5 words is tried.
    let words = text.split_ascii_whitespace().collect::<Vec<&str>>();
    if words.len() != 5 {
        return None;
    }

    words
        .iter()
        .permutations(words.len())
        .find_map(|permutation| {
            let candidate = permutation.into_iter().join(" ");
            NaiveDateTime::parse_from_str(&candidate, "%a %b %e %T %Y").ok()
        })
}

/// Accepts both `1ps` and `1 ps`.
pub(super) fn parse_timescale(words: &[String], opened: &Cursor) -> Result<(u32, Timescale)> {
    let malformed = || {
        VcdError::syntax(
            opened,
            format!(
                "`{}` expects a number and one of fs, ps, ns, us, ms, s but found `{}`",
                Keyword::Timescale.as_str(),
                words.join(" ")
            ),
        )
    };

    let (first, rest) = words.split_first().ok_or_else(malformed)?;
    let ParseResult { matched, residual } = take_while(first, digit);

    let scalar: u32 = matched.parse().map_err(|_| malformed())?;

    let unit = match (residual, rest) {
        ("", [unit]) => unit.as_str(),
        (unit, []) if !unit.is_empty() => unit,
        _ => return Err(malformed()),
    };

    let unit = Timescale::from_unit(unit).ok_or_else(malformed)?;
    Ok((scalar, unit))
}

/// Handles the header blocks that carry free text up to `$end`.
pub(super) fn parse_metadata_block<R: BufRead>(
    keyword: Keyword,
    opened: &Cursor,
    word_reader: &mut WordReader<R>,
    metadata: &mut Metadata,
) -> Result<()> {
    let words = read_until_end(word_reader, keyword.as_str(), opened)?;

    match keyword {
        Keyword::Date => metadata.date = Some(words.join(" ")),
        Keyword::Version => metadata.version = Some(Version(words.join(" "))),
        Keyword::Timescale => {
            // the text is opaque as far as the format goes, so an unusual
            // timescale such as `1.0 ns` is kept as text only
            metadata.timescale = match parse_timescale(&words, opened) {
                Ok(timescale) => Some(timescale),
                Err(err) => {
                    log::warn!("keeping `$timescale` as plain text: {err}");
                    None
                }
            };
            metadata.timescale_text = Some(words.join(" "));
        }
        Keyword::Comment => metadata.comments.push(words.join(" ")),
        _ => {
            return Err(VcdError::syntax(
                opened,
                format!("`{}` is not a header keyword", keyword.as_str()),
            ))
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vcd::reader::{Line, Word};
    use chrono::{Datelike, Timelike};

    fn words(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn timescale_with_and_without_space() {
        let opened = Cursor(Line(3), Word(1));
        assert_eq!(
            parse_timescale(&words("1ps"), &opened).unwrap(),
            (1, Timescale::Ps)
        );
        assert_eq!(
            parse_timescale(&words("10 ns"), &opened).unwrap(),
            (10, Timescale::Ns)
        );
        assert_eq!(
            parse_timescale(&words("100fs"), &opened).unwrap(),
            (100, Timescale::Fs)
        );
    }

    #[test]
    fn malformed_timescales_are_syntax_errors() {
        let opened = Cursor(Line(3), Word(1));
        for bad in ["", "ps", "1", "1 lightyears", "1ps 2ps", "1 ns s"] {
            let err = parse_timescale(&words(bad), &opened).unwrap_err();
            assert_eq!(err.line(), Some(3), "{bad}");
        }
    }

    #[test]
    fn dates_in_both_styles() {
        let date = parse_date("2018-04-12 18:04:03.652880").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2018, 4, 12));
        assert_eq!(date.nanosecond(), 652_880_000);

        let date = parse_date("Wed Aug 17 10:05:41 2022").unwrap();
        assert_eq!((date.year(), date.hour()), (2022, 10));

        // words shuffled
        let date = parse_date("2022 10:05:41 Aug Wed 17").unwrap();
        assert_eq!((date.month(), date.day()), (8, 17));

        assert!(parse_date("June 26, 1989 10:05:41").is_none());
    }

    #[test]
    fn header_blocks_fill_metadata() {
        let text = "   Icarus  Verilog $end 1 ns $end note one $end";
        let mut reader = WordReader::new(text.as_bytes());
        let mut metadata = Metadata::default();
        let opened = Cursor(Line(1), Word(1));

        parse_metadata_block(Keyword::Version, &opened, &mut reader, &mut metadata).unwrap();
        parse_metadata_block(Keyword::Timescale, &opened, &mut reader, &mut metadata).unwrap();
        parse_metadata_block(Keyword::Comment, &opened, &mut reader, &mut metadata).unwrap();

        assert_eq!(metadata.version, Some(Version("Icarus Verilog".to_string())));
        assert_eq!(metadata.timescale, Some((1, Timescale::Ns)));
        assert_eq!(metadata.timescale_text.as_deref(), Some("1 ns"));
        assert_eq!(metadata.comments, vec!["note one".to_string()]);
    }

    #[test]
    fn unusual_timescale_is_kept_as_text() {
        let mut reader = WordReader::new("1.0 ns $end".as_bytes());
        let mut metadata = Metadata::default();
        let opened = Cursor(Line(1), Word(1));

        parse_metadata_block(Keyword::Timescale, &opened, &mut reader, &mut metadata).unwrap();

        assert_eq!(metadata.timescale, None);
        assert_eq!(metadata.timescale_text.as_deref(), Some("1.0 ns"));
    }
}
