// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.

//! Streaming VCD writer. Declarations and value changes go straight to the
//! sink; only the scope/variable model is kept in memory.
use std::borrow::Borrow;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::io::Write;

use super::error::{Result, VcdError};
use super::hierarchy::{Hierarchy, VarDecl};
use super::signal::{SampleValue, VarType};
use super::types::{ScopeIdx, ScopeKind, Timescale, VarIdx};

mod ids;
pub use ids::IdAllocator;

mod value_format;
pub use value_format::{LogValue, ValueFormatter, UNDEFINED_TEXT};

mod dump;
pub use dump::write_vcd;

/// Writes one VCD stream to `W`. Variables are looked up again through the
/// caller chosen handle `H` they were registered with.
pub struct VcdWriter<W, H = String> {
    sink: W,
    ids: IdAllocator,
    hierarchy: Hierarchy<H>,
    // indexed by VarIdx
    formatters: Vec<ValueFormatter>,
    open_scopes: Vec<ScopeIdx>,
    definitions_closed: bool,
    last_time: Option<u64>,
}

impl<W: Write, H: Eq + Hash + Debug> VcdWriter<W, H> {
    pub fn new(sink: W) -> Self {
        VcdWriter {
            sink,
            ids: IdAllocator::new(),
            hierarchy: Hierarchy::new(),
            formatters: vec![],
            open_scopes: vec![],
            definitions_closed: false,
            last_time: None,
        }
    }

    fn ensure_declaring(&self, what: &str) -> Result<()> {
        if self.definitions_closed {
            return Err(VcdError::Misuse(format!(
                "{what} is not allowed after `$enddefinitions`"
            )));
        }
        Ok(())
    }

    fn curr_scope(&self) -> ScopeIdx {
        self.open_scopes
            .last()
            .copied()
            .unwrap_or_else(|| self.hierarchy.root())
    }

    pub fn date(&mut self, date: impl Display) -> Result<()> {
        self.ensure_declaring("`$date`")?;
        writeln!(self.sink, "$date\n   {date}\n$end")?;
        Ok(())
    }

    pub fn version(&mut self, version: impl Display) -> Result<()> {
        self.ensure_declaring("`$version`")?;
        writeln!(self.sink, "$version   \n{version}\n$end")?;
        Ok(())
    }

    /// Time unit in picoseconds.
    pub fn timescale(&mut self, pico_seconds: u64) -> Result<()> {
        self.ensure_declaring("`$timescale`")?;
        writeln!(self.sink, "$timescale {pico_seconds}ps $end")?;
        Ok(())
    }

    pub fn timescale_with_unit(&mut self, scalar: u32, unit: Timescale) -> Result<()> {
        self.ensure_declaring("`$timescale`")?;
        writeln!(self.sink, "$timescale {scalar}{unit} $end")?;
        Ok(())
    }

    /// Writes a `$timescale` whose text is not a number and a unit.
    pub fn timescale_text(&mut self, text: impl Display) -> Result<()> {
        self.ensure_declaring("`$timescale`")?;
        writeln!(self.sink, "$timescale {text} $end")?;
        Ok(())
    }

    /// Opens a `module` scope inside the innermost open scope.
    pub fn open_scope(&mut self, name: &str) -> Result<ScopeIdx> {
        self.open_scope_kind(name, ScopeKind::Module)
    }

    pub fn open_scope_kind(&mut self, name: &str, kind: ScopeKind) -> Result<ScopeIdx> {
        self.ensure_declaring("`$scope`")?;

        let parent = self.curr_scope();
        let scope_idx = self.hierarchy.add_scope(parent, name, kind)?;
        writeln!(self.sink, "$scope {kind} {name} $end")?;
        self.open_scopes.push(scope_idx);

        log::debug!("opened {kind} scope {}", self.hierarchy.path(scope_idx));
        Ok(scope_idx)
    }

    pub fn close_scope(&mut self) -> Result<()> {
        self.ensure_declaring("`$upscope`")?;

        let scope_idx = self
            .open_scopes
            .pop()
            .ok_or_else(|| VcdError::Misuse("`$upscope` without an open scope".to_string()))?;
        writeln!(self.sink, "$upscope $end")?;

        log::debug!("closed scope {}", self.hierarchy.path(scope_idx));
        Ok(())
    }

    /// Allocates an identifier for `handle`, binds `formatter` to it and
    /// writes the `$var` line.
    pub fn register_var(
        &mut self,
        handle: H,
        name: &str,
        var_type: VarType,
        width: u32,
        formatter: ValueFormatter,
    ) -> Result<VarIdx> {
        self.declare(handle, name, var_type, width, None, formatter)
    }

    pub(crate) fn declare(
        &mut self,
        handle: H,
        name: &str,
        var_type: VarType,
        width: u32,
        range: Option<String>,
        mut formatter: ValueFormatter,
    ) -> Result<VarIdx> {
        self.ensure_declaring("`$var`")?;
        if width == 0 {
            return Err(VcdError::Misuse(format!(
                "width of `{name}` must be positive"
            )));
        }

        let parent = self.curr_scope();
        self.hierarchy.check_var(parent, &handle, name)?;

        // nothing is allocated or written unless binding succeeds
        formatter.bind(&self.ids.peek(), width)?;
        let id = self.ids.allocate();

        let decl = VarDecl {
            id,
            name: name.to_string(),
            range,
            width,
            var_type,
        };
        let var_idx = self.hierarchy.add_var(parent, handle, decl)?;
        self.formatters.push(formatter);

        let var = self.hierarchy.var(var_idx);
        match &var.range {
            Some(range) => writeln!(
                self.sink,
                "$var {var_type} {width} {} {name} {range} $end",
                var.id
            )?,
            None => writeln!(self.sink, "$var {var_type} {width} {} {name} $end", var.id)?,
        }

        log::debug!(
            "declared {var_type} {} of width {width} as `{}`",
            self.hierarchy.var_path(var_idx),
            var.id
        );
        Ok(var_idx)
    }

    pub fn end_definitions(&mut self) -> Result<()> {
        self.ensure_declaring("`$enddefinitions`")?;
        if let Some(scope_idx) = self.open_scopes.last() {
            return Err(VcdError::Misuse(format!(
                "scope {} is still open",
                self.hierarchy.path(*scope_idx)
            )));
        }

        writeln!(self.sink, "$enddefinitions $end")?;
        self.definitions_closed = true;
        Ok(())
    }

    /// Moves the time cursor. A marker is written only when time advances.
    pub fn set_time(&mut self, time: u64) -> Result<()> {
        if !self.definitions_closed {
            return Err(VcdError::Misuse(
                "time can only be set after `$enddefinitions`".to_string(),
            ));
        }

        match self.last_time {
            Some(last) if last == time => return Ok(()),
            Some(last) if last > time => {
                return Err(VcdError::TimeOrder {
                    last,
                    requested: time,
                })
            }
            _ => {}
        }

        writeln!(self.sink, "#{time}")?;
        self.last_time = Some(time);
        log::trace!("time advanced to {time}");
        Ok(())
    }

    fn var_idx<Q>(&self, handle: &Q) -> Result<VarIdx>
    where
        H: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        self.hierarchy
            .var_by_handle(handle)
            .ok_or_else(|| VcdError::UnknownHandle(format!("{handle:?}")))
    }

    /// Formats `value` for the variable registered under `handle` and writes
    /// it at `time`. Nothing is written when formatting or the time check
    /// fails.
    pub fn log_change<Q>(&mut self, time: u64, handle: &Q, value: &LogValue) -> Result<()>
    where
        H: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        let VarIdx(idx) = self.var_idx(handle)?;
        let line = self.formatters[idx].format(value)?;

        self.set_time(time)?;
        self.sink.write_all(line.as_bytes())?;
        Ok(())
    }

    /// Writes a sample that is already in its textual form, as produced by
    /// the parser.
    pub fn log_token<Q>(&mut self, time: u64, handle: &Q, value: &SampleValue) -> Result<()>
    where
        H: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        let var_idx = self.var_idx(handle)?;
        let line = value.to_change_line(&self.hierarchy.var(var_idx).id);

        self.set_time(time)?;
        self.sink.write_all(line.as_bytes())?;
        Ok(())
    }

    /// Model of everything declared so far. Writer side variables carry no
    /// samples.
    pub fn hierarchy(&self) -> &Hierarchy<H> {
        &self.hierarchy
    }

    /// Time of the last marker written, if any.
    pub fn last_time(&self) -> Option<u64> {
        self.last_time
    }

    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}
