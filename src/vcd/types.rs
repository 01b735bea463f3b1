// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.
use std::fmt;

use chrono::NaiveDateTime;

use super::hierarchy::Hierarchy;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version(pub String);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Timescale {
    Fs,
    Ps,
    Ns,
    Us,
    Ms,
    S,
}

impl Timescale {
    pub fn from_unit(unit: &str) -> Option<Timescale> {
        match unit {
            "fs" => Some(Timescale::Fs),
            "ps" => Some(Timescale::Ps),
            "ns" => Some(Timescale::Ns),
            "us" => Some(Timescale::Us),
            "ms" => Some(Timescale::Ms),
            "s" => Some(Timescale::S),
            _ => None,
        }
    }
}

impl fmt::Display for Timescale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self {
            Timescale::Fs => "fs",
            Timescale::Ps => "ps",
            Timescale::Ns => "ns",
            Timescale::Us => "us",
            Timescale::Ms => "ms",
            Timescale::S => "s",
        };
        f.write_str(unit)
    }
}

/// Header blocks of a VCD file. Date and version are opaque text.
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    pub date: Option<String>,
    pub version: Option<Version>,
    pub timescale: Option<(u32, Timescale)>,
    // `$timescale` text exactly as read, kept even when it does not parse
    pub timescale_text: Option<String>,
    pub comments: Vec<String>,
}

impl Metadata {
    /// Best effort interpretation of the `$date` text.
    pub fn date_time(&self) -> Option<NaiveDateTime> {
        self.date.as_deref().and_then(super::parse::parse_date)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ScopeIdx(pub usize);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarIdx(pub usize);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ScopeKind {
    Begin,
    Fork,
    Function,
    Module,
    Task,
}

impl ScopeKind {
    pub const EXPECTED: [&'static str; 5] = ["begin", "fork", "function", "module", "task"];

    pub fn from_keyword(word: &str) -> Option<ScopeKind> {
        match word {
            "begin" => Some(ScopeKind::Begin),
            "fork" => Some(ScopeKind::Fork),
            "function" => Some(ScopeKind::Function),
            "module" => Some(ScopeKind::Module),
            "task" => Some(ScopeKind::Task),
            _ => None,
        }
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            ScopeKind::Begin => "begin",
            ScopeKind::Fork => "fork",
            ScopeKind::Function => "function",
            ScopeKind::Module => "module",
            ScopeKind::Task => "task",
        };
        f.write_str(kind)
    }
}

/// Result of parsing one VCD stream. Variables are keyed by their id code.
#[derive(Debug)]
pub struct VCD {
    pub metadata: Metadata,
    pub hierarchy: Hierarchy<String>,
    pub(super) end_time: u64,
}

impl VCD {
    /// Value of the time cursor when the input ran out.
    pub fn end_time(&self) -> u64 {
        self.end_time
    }

    pub fn num_samples(&self) -> usize {
        self.hierarchy.vars().map(|var| var.samples.len()).sum()
    }

    fn print_scope_tree(&self, scope_idx: ScopeIdx, depth: usize, out: &mut String) {
        let indent = " ".repeat(depth * 4);
        let scope = self.hierarchy.scope(scope_idx);
        out.push_str(&format!("{indent}scope: {}\n", scope.name));

        for child in &scope.children {
            match *child {
                super::hierarchy::ScopeChild::Var(var_idx) => {
                    let var = self.hierarchy.var(var_idx);
                    out.push_str(&format!("{indent} - sig: {}\n", var.name));
                }
                super::hierarchy::ScopeChild::Scope(child_idx) => {
                    self.print_scope_tree(child_idx, depth + 1, out);
                }
            }
        }
    }

    /// Indented outline of the scope tree, mostly useful while debugging.
    pub fn scope_outline(&self) -> String {
        let mut out = String::new();
        self.print_scope_tree(self.hierarchy.root(), 0, &mut out);
        out
    }
}
