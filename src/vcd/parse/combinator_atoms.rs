// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.
use std::io::BufRead;

use super::super::error::{Result, VcdError};
use super::super::reader::{next_word, Cursor, WordReader};
use super::types::ParseResult;

pub(super) fn digit(chr: u8) -> bool {
    chr.is_ascii_digit()
}

pub(super) fn take_while(word: &str, cond: fn(u8) -> bool) -> ParseResult<'_> {
    let new_start = word.bytes().take_while(|chr| cond(*chr)).count();

    ParseResult {
        matched: &word[0..new_start],
        residual: &word[new_start..],
    }
}

/// Expects the next word of the block opened by `keyword` to be `expected`.
pub(super) fn ident<R: BufRead>(
    word_reader: &mut WordReader<R>,
    keyword: &str,
    opened: &Cursor,
    expected: &str,
) -> Result<()> {
    let (word, cursor) = next_word!(word_reader, keyword, opened)?;

    if word == expected {
        Ok(())
    } else {
        Err(VcdError::syntax(
            &cursor,
            format!("found `{word}` but expected `{expected}` after `{keyword}`"),
        ))
    }
}

/// Collects every word up to (not including) the `$end` closing `keyword`.
pub(super) fn read_until_end<R: BufRead>(
    word_reader: &mut WordReader<R>,
    keyword: &str,
    opened: &Cursor,
) -> Result<Vec<String>> {
    let mut words = vec![];
    loop {
        let (word, _) = next_word!(word_reader, keyword, opened)?;
        if word == "$end" {
            return Ok(words);
        }
        words.push(word.to_string());
    }
}

/// Discards every word up to and including the `$end` closing `keyword`.
pub(super) fn skip_until_end<R: BufRead>(
    word_reader: &mut WordReader<R>,
    keyword: &str,
    opened: &Cursor,
) -> Result<()> {
    loop {
        let (word, _) = next_word!(word_reader, keyword, opened)?;
        if word == "$end" {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vcd::reader::{Line, Word};

    #[test]
    fn take_while_splits_digits() {
        let ParseResult { matched, residual } = take_while("100ps", digit);
        assert_eq!((matched, residual), ("100", "ps"));
        let ParseResult { matched, residual } = take_while("ns", digit);
        assert_eq!((matched, residual), ("", "ns"));
    }

    #[test]
    fn unterminated_block_reports_opening_line() {
        let mut reader = WordReader::new("a b\nc\n".as_bytes());
        let opened = Cursor(Line(7), Word(1));
        let err = read_until_end(&mut reader, "$version", &opened).unwrap_err();
        assert_eq!(err.line(), Some(7));
        assert!(err.to_string().contains("$version"));
    }

    #[test]
    fn ident_rejects_other_words() {
        let mut reader = WordReader::new("module $end".as_bytes());
        let opened = Cursor(Line(1), Word(1));
        assert!(ident(&mut reader, "$upscope", &opened, "$end").is_err());
        assert!(ident(&mut reader, "$upscope", &opened, "$end").is_ok());
    }
}
