// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.

/// part of the vcd parser that handles the declaration section and
/// building the resulting scope tree
use std::io::BufRead;

use super::super::error::{Result, VcdError};
use super::super::hierarchy::{Hierarchy, VarDecl};
use super::super::reader::{next_word, Cursor, WordReader};
use super::super::signal::VarType;
use super::super::types::{ScopeIdx, ScopeKind, VCD};

use super::combinator_atoms::{ident, read_until_end, skip_until_end};
use super::metadata::parse_metadata_block;
use super::types::Keyword;

/// Where the declaration parser is. Reaching `DeclarationsClosed` hands the
/// rest of the stream to the value change driver.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum DeclState {
    AwaitKeyword { curr_scope: ScopeIdx },
    DeclarationsClosed,
}

// $scope module reg_mag_i $end
fn parse_scope<R: BufRead>(
    word_reader: &mut WordReader<R>,
    opened: &Cursor,
    hierarchy: &mut Hierarchy<String>,
    parent_scope: ScopeIdx,
) -> Result<ScopeIdx> {
    let keyword = Keyword::Scope.as_str();

    // $scope module reg_mag_i $end
    //        ^^^^^^ - scope kind
    let (word, cursor) = next_word!(word_reader, keyword, opened)?;
    let kind = ScopeKind::from_keyword(word).ok_or_else(|| {
        VcdError::syntax(
            &cursor,
            format!(
                "found keyword `{word}` but expected one of {:?}",
                ScopeKind::EXPECTED
            ),
        )
    })?;

    // $scope module reg_mag_i $end
    //               ^^^^^^^^^ - scope name
    let (word, cursor) = next_word!(word_reader, keyword, opened)?;
    if word == "$end" {
        return Err(VcdError::syntax(&cursor, "`$scope` without a name"));
    }
    let scope_name = word.to_string();

    // $scope module reg_mag_i $end
    //                         ^^^^ - end keyword
    ident(word_reader, keyword, opened, "$end")?;

    let scope_idx = hierarchy
        .add_scope(parent_scope, &scope_name, kind)
        .map_err(|err| err.at_line(opened.line()))?;
    log::debug!("opened {kind} scope {}", hierarchy.path(scope_idx));

    Ok(scope_idx)
}

// $var parameter 3 a IDLE $end
fn parse_var<R: BufRead>(
    word_reader: &mut WordReader<R>,
    opened: &Cursor,
    hierarchy: &mut Hierarchy<String>,
    parent_scope: ScopeIdx,
) -> Result<()> {
    let words = read_until_end(word_reader, Keyword::Var.as_str(), opened)?;

    // another keyword before `$end` means this declaration was never closed;
    // identifiers such as `$` or `$a` are not keywords
    if let Some(keyword) = words
        .iter()
        .find(|word| Keyword::from_word(word).is_some())
    {
        return Err(VcdError::syntax(
            opened,
            format!("found `{keyword}` before the `$end` closing `$var`"),
        ));
    }

    let [var_type, width, id, name, range @ ..] = words.as_slice() else {
        return Err(VcdError::syntax(
            opened,
            format!(
                "`$var` expects a type, a width, an identifier and a name but found `{}`",
                words.join(" ")
            ),
        ));
    };

    // $var parameter 3 a IDLE $end
    //      ^^^^^^^^^ - var_type
    let var_type = VarType::from_keyword(var_type).ok_or_else(|| {
        VcdError::syntax(
            opened,
            format!(
                "found keyword `{var_type}` but expected one of {:?}",
                VarType::EXPECTED
            ),
        )
    })?;

    // $var parameter 3 a IDLE $end
    //                ^ - width
    let width = width
        .parse::<u32>()
        .ok()
        .filter(|width| *width > 0)
        .ok_or_else(|| {
            VcdError::syntax(
                opened,
                format!("width of `{name}` must be a positive integer, not `{width}`"),
            )
        })?;

    // $var reg 8 " x [7:0] $end
    //                ^^^^^ - anything after the name is kept verbatim
    let range = if range.is_empty() {
        None
    } else {
        Some(range.join(" "))
    };

    let decl = VarDecl {
        id: id.clone(),
        name: name.clone(),
        range,
        width,
        var_type,
    };
    let var_idx = hierarchy
        .add_var(parent_scope, id.clone(), decl)
        .map_err(|err| err.at_line(opened.line()))?;
    log::debug!(
        "declared {var_type} {} of width {width} as `{id}`",
        hierarchy.var_path(var_idx)
    );

    Ok(())
}

/// Runs the declaration section up to and including `$enddefinitions $end`.
pub(super) fn parse_declarations<R: BufRead>(
    word_reader: &mut WordReader<R>,
    vcd: &mut VCD,
) -> Result<()> {
    let mut state = DeclState::AwaitKeyword {
        curr_scope: vcd.hierarchy.root(),
    };

    while let DeclState::AwaitKeyword { curr_scope } = state {
        let (word, cursor) = match word_reader.next_word()? {
            Some(next) => next,
            None => {
                return Err(VcdError::Syntax {
                    line: word_reader.lines_read(),
                    msg: "reached end of input before `$enddefinitions`".to_string(),
                })
            }
        };

        let keyword = Keyword::from_word(word).ok_or_else(|| {
            VcdError::syntax(
                &cursor,
                format!("expected a declaration keyword but found `{word}`"),
            )
        })?;

        state = match keyword {
            Keyword::Date | Keyword::Version | Keyword::Timescale | Keyword::Comment => {
                parse_metadata_block(keyword, &cursor, word_reader, &mut vcd.metadata)?;
                state
            }
            Keyword::Scope => {
                let scope_idx = parse_scope(word_reader, &cursor, &mut vcd.hierarchy, curr_scope)?;
                DeclState::AwaitKeyword {
                    curr_scope: scope_idx,
                }
            }
            Keyword::Upscope => {
                ident(word_reader, keyword.as_str(), &cursor, "$end")?;
                let parent = vcd.hierarchy.parent(curr_scope).ok_or_else(|| {
                    VcdError::syntax(&cursor, "`$upscope` without an open `$scope`")
                })?;
                log::debug!("closed scope {}", vcd.hierarchy.path(curr_scope));
                DeclState::AwaitKeyword { curr_scope: parent }
            }
            Keyword::Var => {
                parse_var(word_reader, &cursor, &mut vcd.hierarchy, curr_scope)?;
                state
            }
            Keyword::EndDefinitions => {
                skip_until_end(word_reader, keyword.as_str(), &cursor)?;
                DeclState::DeclarationsClosed
            }
            Keyword::End => {
                return Err(VcdError::syntax(
                    &cursor,
                    "`$end` outside of a block, missing end of declaration section",
                ))
            }
            Keyword::DumpAll | Keyword::DumpOff | Keyword::DumpOn | Keyword::DumpVars => {
                return Err(VcdError::syntax(
                    &cursor,
                    format!(
                        "`{}` before `$enddefinitions`",
                        keyword.as_str()
                    ),
                ))
            }
        };
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vcd::hierarchy::ScopeChild;
    use crate::vcd::types::Metadata;

    fn declarations(text: &str) -> Result<VCD> {
        let mut word_reader = WordReader::new(text.as_bytes());
        let mut vcd = VCD {
            metadata: Metadata::default(),
            hierarchy: Hierarchy::new(),
            end_time: 0,
        };
        parse_declarations(&mut word_reader, &mut vcd)?;
        Ok(vcd)
    }

    #[test]
    fn nested_scopes_and_vars() {
        let vcd = declarations(
            "$scope module top $end\n\
             $var wire 1 ! clk $end\n\
             $scope task t1 $end\n\
             $var reg 8 \" data [7:0] $end\n\
             $upscope $end\n\
             $upscope $end\n\
             $var integer 32 # orphan $end\n\
             $enddefinitions $end\n",
        )
        .unwrap();

        let hier = &vcd.hierarchy;
        let root = hier.scope(hier.root());
        assert_eq!(root.children.len(), 2);

        let ScopeChild::Scope(top) = root.children[0] else {
            panic!("expected a scope")
        };
        assert_eq!(hier.scope(top).name, "top");
        let ScopeChild::Scope(t1) = hier.scope(top).children[1] else {
            panic!("expected a scope")
        };
        assert_eq!(hier.scope(t1).kind, ScopeKind::Task);

        let data = hier.var(hier.var_by_handle("\"").unwrap());
        assert_eq!(data.name, "data");
        assert_eq!(data.width, 8);
        assert_eq!(data.var_type, VarType::Reg);
        assert_eq!(data.range.as_deref(), Some("[7:0]"));
        assert_eq!(data.scope, t1);

        let orphan = hier.var(hier.var_by_handle("#").unwrap());
        assert_eq!(orphan.scope, hier.root());
    }

    #[test]
    fn upscope_at_root_is_rejected() {
        let err = declarations("$scope module a $end\n$upscope $end\n$upscope $end\n").unwrap_err();
        assert!(matches!(err, VcdError::Syntax { line: 3, .. }));
    }

    #[test]
    fn unknown_scope_kind_is_rejected() {
        let err = declarations("$scope entity a $end\n").unwrap_err();
        assert!(matches!(err, VcdError::Syntax { line: 1, .. }));
    }

    #[test]
    fn unknown_keyword_is_rejected() {
        let err = declarations("$timescale 1ps $end\n$scopes module a $end\n").unwrap_err();
        assert!(matches!(err, VcdError::Syntax { line: 2, .. }));
        let err = declarations("$var wire 1 ! a $end\n1!\n").unwrap_err();
        assert!(matches!(err, VcdError::Syntax { line: 2, .. }));
    }

    #[test]
    fn stray_end_and_dump_blocks_before_enddefinitions() {
        assert!(declarations("$end\n").is_err());
        assert!(declarations("$dumpvars 1! $end\n").is_err());
    }

    #[test]
    fn duplicate_declarations() {
        let err = declarations(
            "$scope module m $end\n$var wire 1 ! a $end\n$var wire 1 ! b $end\n",
        )
        .unwrap_err();
        assert!(matches!(err, VcdError::Duplicate { line: Some(3), .. }));

        let err = declarations(
            "$scope module m $end\n$var wire 1 ! a $end\n$var wire 1 \" a $end\n",
        )
        .unwrap_err();
        assert!(matches!(err, VcdError::Duplicate { line: Some(3), .. }));

        let err = declarations(
            "$scope module m $end\n$upscope $end\n$scope module m $end\n",
        )
        .unwrap_err();
        assert!(matches!(err, VcdError::Duplicate { line: Some(3), .. }));
    }

    #[test]
    fn identifiers_starting_with_dollar() {
        let vcd = declarations(
            "$var wire 1 $ a $end\n\
             $var wire 1 $a b $end\n\
             $var wire 4 $! c $end\n\
             $var wire 1 # d $end\n\
             $enddefinitions $end\n",
        )
        .unwrap();

        let hier = &vcd.hierarchy;
        assert_eq!(hier.num_vars(), 4);
        assert_eq!(hier.var(hier.var_by_handle("$").unwrap()).name, "a");
        assert_eq!(hier.var(hier.var_by_handle("$a").unwrap()).name, "b");
        assert_eq!(hier.var(hier.var_by_handle("$!").unwrap()).width, 4);
        assert_eq!(hier.var(hier.var_by_handle("#").unwrap()).name, "d");
    }

    #[test]
    fn malformed_vars() {
        for text in [
            "$var wire 1 ! $end",
            "$var wired 1 ! a $end",
            "$var wire 0 ! a $end",
            "$var wire one ! a $end",
        ] {
            let err = declarations(text).unwrap_err();
            assert!(matches!(err, VcdError::Syntax { line: 1, .. }), "{text}");
        }
    }

    #[test]
    fn unterminated_var_reports_its_line() {
        let err = declarations("$date today $end\n$var wire 1 ! a\n\n").unwrap_err();
        assert!(matches!(err, VcdError::Syntax { line: 2, .. }));

        let err = declarations("$var wire 1 ! a\n$upscope $end\n").unwrap_err();
        assert!(matches!(err, VcdError::Syntax { line: 1, .. }));
    }

    #[test]
    fn missing_enddefinitions() {
        let err = declarations("$scope module m $end\n$upscope $end\n").unwrap_err();
        assert!(matches!(err, VcdError::Syntax { line: 2, .. }));
    }
}
