// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.

//! Whitespace tokenizer over a line oriented source.
use std::collections::VecDeque;
use std::io::BufRead;

use super::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line(pub usize);
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Word(pub usize);

/// 1-based line of a word, and 1-based position of the word on that line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor(pub Line, pub Word);

impl Cursor {
    pub fn line(&self) -> usize {
        let Cursor(Line(line), _) = self;
        *line
    }
}

/// Byte ranges of the maximal runs of non-whitespace in `line`.
///
/// Splitting only on ASCII whitespace bytes never lands inside a multi-byte
/// UTF-8 sequence, so every range is a valid `str` boundary.
fn word_spans(line: &str) -> Vec<(usize, usize)> {
    let mut spans = vec![];
    let mut start = None;

    for (idx, chr) in line.as_bytes().iter().enumerate() {
        match (chr.is_ascii_whitespace(), start) {
            (true, Some(word_start)) => {
                spans.push((word_start, idx));
                start = None;
            }
            (false, None) => start = Some(idx),
            _ => {}
        }
    }

    if let Some(word_start) = start {
        spans.push((word_start, line.len()));
    }

    spans
}

/// Pull based, single pass word source. Lines are read lazily, one at a time,
/// so a word handed out stays valid until the next call to `next_word`.
pub struct WordReader<R> {
    reader: R,
    eof: bool,
    buffer: String,
    curr_line: usize,
    str_slices: VecDeque<(usize, usize, Cursor)>,
    curr_slice: Option<(usize, usize, Cursor)>,
}

impl<R: BufRead> WordReader<R> {
    pub fn new(reader: R) -> WordReader<R> {
        WordReader {
            reader,
            eof: false,
            buffer: String::new(),
            curr_line: 0,
            str_slices: VecDeque::new(),
            curr_slice: None,
        }
    }

    // keep reading lines until one of them has at least one word in it
    fn fill(&mut self) -> Result<()> {
        while self.str_slices.is_empty() && !self.eof {
            self.buffer.clear();
            self.curr_slice = None;

            let bytes_read = self.reader.read_line(&mut self.buffer)?;
            if bytes_read == 0 {
                self.eof = true;
                break;
            }
            self.curr_line += 1;

            for (word_idx, (start, end)) in word_spans(&self.buffer).into_iter().enumerate() {
                let cursor = Cursor(Line(self.curr_line), Word(word_idx + 1));
                self.str_slices.push_back((start, end, cursor));
            }
        }
        Ok(())
    }

    /// Returns `Ok(None)` once the input is exhausted, and keeps doing so.
    pub fn next_word(&mut self) -> Result<Option<(&str, Cursor)>> {
        if self.str_slices.is_empty() {
            self.fill()?;
        }

        match self.str_slices.pop_front() {
            Some((start, end, cursor)) => {
                self.curr_slice = Some((start, end, cursor));
                Ok(Some((&self.buffer[start..end], cursor)))
            }
            None => Ok(None),
        }
    }

    /// The word most recently returned by `next_word`.
    pub fn curr_word(&self) -> Option<(&str, Cursor)> {
        self.curr_slice
            .map(|(start, end, cursor)| (&self.buffer[start..end], cursor))
    }

    /// Number of lines consumed so far.
    pub fn lines_read(&self) -> usize {
        self.curr_line
    }
}

/// Pulls the next word inside a block opened by `$keyword` at `$opened`.
/// Running out of input is reported against the line that opened the block.
macro_rules! next_word {
    ($word_reader:ident, $keyword:expr, $opened:expr) => {
        $word_reader.next_word()?.ok_or_else(|| {
            $crate::vcd::error::VcdError::syntax(
                $opened,
                format!(
                    "reached end of input before the `$end` closing `{}`",
                    $keyword
                ),
            )
        })
    };
}
pub(super) use next_word;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor as IoCursor;

    #[test]
    fn words_carry_line_and_position() {
        let text = "$scope module  top $end\n\n   #10\n1!  b01 \"\n";
        let mut reader = WordReader::new(IoCursor::new(text));

        let mut words = vec![];
        while let Some((word, cursor)) = reader.next_word().unwrap() {
            words.push((word.to_string(), cursor));
        }

        let expected = [
            ("$scope", 1, 1),
            ("module", 1, 2),
            ("top", 1, 3),
            ("$end", 1, 4),
            ("#10", 3, 1),
            ("1!", 4, 1),
            ("b01", 4, 2),
            ("\"", 4, 3),
        ];
        assert_eq!(words.len(), expected.len());
        for ((word, cursor), (exp_word, line, pos)) in words.iter().zip(expected) {
            assert_eq!(word, exp_word);
            assert_eq!(*cursor, Cursor(Line(line), Word(pos)));
        }
    }

    #[test]
    fn exhausted_reader_stays_exhausted() {
        let mut reader = WordReader::new(IoCursor::new("$end"));
        assert!(reader.next_word().unwrap().is_some());
        assert!(reader.next_word().unwrap().is_none());
        assert!(reader.next_word().unwrap().is_none());
        assert_eq!(reader.lines_read(), 1);
    }

    #[test]
    fn curr_word_repeats_last_word() {
        let mut reader = WordReader::new(IoCursor::new("a b\nc"));
        assert!(reader.curr_word().is_none());
        reader.next_word().unwrap();
        reader.next_word().unwrap();
        let (word, cursor) = reader.curr_word().unwrap();
        assert_eq!(word, "b");
        assert_eq!(cursor.line(), 1);
    }

    #[test]
    fn non_ascii_words_survive() {
        let mut reader = WordReader::new(IoCursor::new("sµ \t!\r\n"));
        assert_eq!(reader.next_word().unwrap().unwrap().0, "sµ");
        assert_eq!(reader.next_word().unwrap().unwrap().0, "!");
        assert!(reader.next_word().unwrap().is_none());
    }
}
