// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.
use std::fmt;

use super::types::ScopeIdx;

/// `$var` type tag. `Enum` and `Array` are not part of VCD proper but are
/// accepted so that models built by a writer can be described in full.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VarType {
    Event,
    Integer,
    Parameter,
    Real,
    RealTime,
    Reg,
    Str,
    Supply0,
    Supply1,
    Time,
    Tri,
    TriAnd,
    TriOr,
    TriReg,
    Tri0,
    Tri1,
    WAnd,
    Wire,
    WOr,
    SVInt,
    SVShortInt,
    SVLongInt,
    SVLogic,
    SVBit,
    SVByte,
    SVShortReal,
    Enum,
    Array,
}

impl VarType {
    pub const EXPECTED: [&'static str; 28] = [
        "event",
        "integer",
        "parameter",
        "real",
        "realtime",
        "reg",
        "string",
        "supply0",
        "supply1",
        "time",
        "tri",
        "triand",
        "trior",
        "trireg",
        "tri0",
        "tri1",
        "wand",
        "wire",
        "wor",
        "int",
        "shortint",
        "longint",
        "logic",
        "bit",
        "byte",
        "shortreal",
        "enum",
        "array",
    ];

    pub fn from_keyword(word: &str) -> Option<VarType> {
        let var_type = match word {
            "event" => VarType::Event,
            "integer" => VarType::Integer,
            "parameter" => VarType::Parameter,
            "real" => VarType::Real,
            "realtime" => VarType::RealTime,
            "reg" => VarType::Reg,
            "string" => VarType::Str,
            "supply0" => VarType::Supply0,
            "supply1" => VarType::Supply1,
            "time" => VarType::Time,
            "tri" => VarType::Tri,
            "triand" => VarType::TriAnd,
            "trior" => VarType::TriOr,
            "trireg" => VarType::TriReg,
            "tri0" => VarType::Tri0,
            "tri1" => VarType::Tri1,
            "wand" => VarType::WAnd,
            "wire" => VarType::Wire,
            "wor" => VarType::WOr,
            "int" => VarType::SVInt,
            "shortint" => VarType::SVShortInt,
            "longint" => VarType::SVLongInt,
            "logic" => VarType::SVLogic,
            "bit" => VarType::SVBit,
            "byte" => VarType::SVByte,
            "shortreal" => VarType::SVShortReal,
            "enum" => VarType::Enum,
            "array" => VarType::Array,
            _ => return None,
        };
        Some(var_type)
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            VarType::Event => "event",
            VarType::Integer => "integer",
            VarType::Parameter => "parameter",
            VarType::Real => "real",
            VarType::RealTime => "realtime",
            VarType::Reg => "reg",
            VarType::Str => "string",
            VarType::Supply0 => "supply0",
            VarType::Supply1 => "supply1",
            VarType::Time => "time",
            VarType::Tri => "tri",
            VarType::TriAnd => "triand",
            VarType::TriOr => "trior",
            VarType::TriReg => "trireg",
            VarType::Tri0 => "tri0",
            VarType::Tri1 => "tri1",
            VarType::WAnd => "wand",
            VarType::Wire => "wire",
            VarType::WOr => "wor",
            VarType::SVInt => "int",
            VarType::SVShortInt => "shortint",
            VarType::SVLongInt => "longint",
            VarType::SVLogic => "logic",
            VarType::SVBit => "bit",
            VarType::SVByte => "byte",
            VarType::SVShortReal => "shortreal",
            VarType::Enum => "enum",
            VarType::Array => "array",
        }
    }

    /// Types whose values travel as text rather than as bits.
    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            VarType::Str | VarType::Enum | VarType::Real | VarType::RealTime | VarType::SVShortReal
        )
    }
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A value change exactly as it appeared in the dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleValue {
    /// `0`, `1`, `x`, `z`, ... of a one bit change.
    Scalar(char),
    /// Whole token including its `b`/`B` prefix, e.g. `b10x1`.
    Vector(String),
    /// Whole token including its `r`/`R` prefix, e.g. `r1.5`.
    Real(String),
    /// Text after the `s`/`S` prefix.
    Str(String),
}

impl SampleValue {
    pub fn kind(&self) -> &'static str {
        match self {
            SampleValue::Scalar(_) => "scalar",
            SampleValue::Vector(_) => "vector",
            SampleValue::Real(_) => "real",
            SampleValue::Str(_) => "string",
        }
    }

    /// The value change line for this sample under identifier `id`.
    pub fn to_change_line(&self, id: &str) -> String {
        match self {
            SampleValue::Scalar(chr) => format!("{chr}{id}\n"),
            SampleValue::Vector(token) | SampleValue::Real(token) => format!("{token} {id}\n"),
            SampleValue::Str(text) => format!("s{text} {id}\n"),
        }
    }
}

impl fmt::Display for SampleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleValue::Scalar(chr) => write!(f, "{chr}"),
            SampleValue::Vector(token) | SampleValue::Real(token) => f.write_str(token),
            SampleValue::Str(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub time: u64,
    pub value: SampleValue,
}

/// A declared variable. Samples are append only and ordered by
/// non-decreasing time; equal times may repeat.
#[derive(Debug, Clone)]
pub struct Var {
    pub id: String,
    pub name: String,
    // trailing words of the declaration such as `[7:0]`
    pub range: Option<String>,
    pub width: u32,
    pub var_type: VarType,
    pub scope: ScopeIdx,
    pub samples: Vec<Sample>,
}
