// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.
use num::{BigUint, One, Zero};

use super::super::error::{Result, VcdError};

/// A value to log together with which parts of it are defined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogValue {
    /// Bit `i` of `val` is meaningful only where bit `i` of `vld_mask` is set.
    Bits { val: BigUint, vld_mask: BigUint },
    Str { val: String, valid: bool },
}

impl LogValue {
    pub fn bits(val: impl Into<BigUint>, vld_mask: impl Into<BigUint>) -> LogValue {
        LogValue::Bits {
            val: val.into(),
            vld_mask: vld_mask.into(),
        }
    }

    /// `val` with all of the low `width` bits valid.
    pub fn valid_bits(val: impl Into<BigUint>, width: u32) -> LogValue {
        let vld_mask = (BigUint::one() << width as usize) - BigUint::one();
        LogValue::Bits {
            val: val.into(),
            vld_mask,
        }
    }

    /// Every bit undefined.
    pub fn undefined_bits() -> LogValue {
        LogValue::Bits {
            val: BigUint::zero(),
            vld_mask: BigUint::zero(),
        }
    }

    pub fn text(val: impl Into<String>) -> LogValue {
        LogValue::Str {
            val: val.into(),
            valid: true,
        }
    }

    pub fn undefined_text() -> LogValue {
        LogValue::Str {
            val: String::new(),
            valid: false,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            LogValue::Bits { .. } => "bits",
            LogValue::Str { .. } => "string",
        }
    }
}

/// Written for a string value that is not valid.
pub const UNDEFINED_TEXT: &str = "UNDEF";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum FormatterKind {
    Bits,
    Text,
}

// what a formatter turns into once it knows the variable it serves
#[derive(Debug, Clone, PartialEq, Eq)]
enum Bound {
    Bit { id: String },
    BitVector { width: u32, id: String },
    Text { id: String },
}

/// Turns `LogValue`s into value change lines for one variable. Created
/// unbound, then bound exactly once when its variable is registered.
#[derive(Debug, Clone)]
pub struct ValueFormatter {
    kind: FormatterKind,
    bound: Option<Bound>,
}

impl ValueFormatter {
    /// `0`/`1`/`X` for width 1, `b...` otherwise.
    pub fn bits() -> ValueFormatter {
        ValueFormatter {
            kind: FormatterKind::Bits,
            bound: None,
        }
    }

    /// `s<text>` changes, for enum, string and real variables.
    pub fn text() -> ValueFormatter {
        ValueFormatter {
            kind: FormatterKind::Text,
            bound: None,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.bound.is_some()
    }

    pub(crate) fn bind(&mut self, id: &str, width: u32) -> Result<()> {
        if self.bound.is_some() {
            return Err(VcdError::FormatterRebound);
        }

        let id = id.to_string();
        self.bound = Some(match self.kind {
            FormatterKind::Bits if width == 1 => Bound::Bit { id },
            FormatterKind::Bits => Bound::BitVector { width, id },
            FormatterKind::Text => Bound::Text { id },
        });
        Ok(())
    }

    /// The complete value change line for `value`, newline included.
    pub fn format(&self, value: &LogValue) -> Result<String> {
        let bound = self.bound.as_ref().ok_or(VcdError::UnboundFormatter)?;

        let line = match (bound, value) {
            (Bound::Bit { id }, LogValue::Bits { val, vld_mask }) => {
                let chr = match (vld_mask.is_zero(), val.is_zero()) {
                    (true, _) => 'X',
                    (false, true) => '0',
                    (false, false) => '1',
                };
                format!("{chr}{id}\n")
            }
            (Bound::BitVector { width, id }, LogValue::Bits { val, vld_mask }) => {
                let mut line = String::with_capacity(*width as usize + id.len() + 3);
                line.push('b');
                for bit in (0..*width as u64).rev() {
                    line.push(match (vld_mask.bit(bit), val.bit(bit)) {
                        (false, _) => 'X',
                        (true, false) => '0',
                        (true, true) => '1',
                    });
                }
                line.push(' ');
                line.push_str(id);
                line.push('\n');
                line
            }
            (Bound::Text { id }, LogValue::Str { val, valid }) => {
                let text = if *valid { val.as_str() } else { UNDEFINED_TEXT };
                format!("s{text} {id}\n")
            }
            (Bound::Text { .. }, _) => {
                return Err(VcdError::ValueMismatch {
                    expected: "string",
                    found: value.kind(),
                })
            }
            (Bound::Bit { .. } | Bound::BitVector { .. }, _) => {
                return Err(VcdError::ValueMismatch {
                    expected: "bits",
                    found: value.kind(),
                })
            }
        };

        Ok(line)
    }
}
