// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.

//! Reading and writing of Value Change Dump (VCD) waveforms.
mod vcd;
pub use vcd::error::{Result, VcdError};
pub use vcd::hierarchy::{Hierarchy, Scope, ScopeChild, VarDecl, ROOT_SCOPE_NAME};
pub use vcd::parse::{parse_vcd, parse_vcd_str, parse_vcd_with, ParseOptions};
pub use vcd::projection::{ProjectedNode, ScopeTypeInfo, VarTypeInfo};
pub use vcd::reader::{Cursor, Line, Word, WordReader};
pub use vcd::signal::{Sample, SampleValue, Var, VarType};
pub use vcd::types::{Metadata, Timescale, Version};
pub use vcd::types::{ScopeIdx, ScopeKind, VarIdx, VCD};
pub use vcd::write::{write_vcd, IdAllocator, LogValue, ValueFormatter, VcdWriter, UNDEFINED_TEXT};

pub use num::BigUint;
