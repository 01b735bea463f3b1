// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.

//! Identifier codes: a positional numeral over the 94 printable ASCII
//! characters `!`..=`~`, most significant digit first.
const FIRST_DIGIT: u8 = b'!';
const LAST_DIGIT: u8 = b'~';
const BASE: u64 = (LAST_DIGIT - FIRST_DIGIT + 1) as u64;

/// Hands out identifier codes in order, one writer session per allocator.
#[derive(Debug, Default, Clone)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        IdAllocator::default()
    }

    /// `0 -> "!"`, `93 -> "~"`, `94 -> "\"!"`.
    pub fn encode(index: u64) -> String {
        if index == 0 {
            return (FIRST_DIGIT as char).to_string();
        }

        let mut digits = vec![];
        let mut rest = index;
        while rest > 0 {
            digits.push((FIRST_DIGIT + (rest % BASE) as u8) as char);
            rest /= BASE;
        }
        digits.iter().rev().collect()
    }

    /// Inverse of `encode`. Codes that `encode` never produces, such as
    /// ones with a leading `!`, yield `None`.
    pub fn decode(id: &str) -> Option<u64> {
        let bytes = id.as_bytes();
        match bytes {
            [] => return None,
            [FIRST_DIGIT, _, ..] => return None,
            _ => {}
        }

        bytes.iter().try_fold(0u64, |acc, chr| {
            if !(FIRST_DIGIT..=LAST_DIGIT).contains(chr) {
                return None;
            }
            acc.checked_mul(BASE)?
                .checked_add((chr - FIRST_DIGIT) as u64)
        })
    }

    /// The code the next call to `allocate` returns.
    pub fn peek(&self) -> String {
        IdAllocator::encode(self.next)
    }

    pub fn allocate(&mut self) -> String {
        let id = self.peek();
        self.next += 1;
        id
    }

    /// Number of codes handed out so far.
    pub fn allocated(&self) -> u64 {
        self.next
    }
}
