// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.

//! Arena holding the scope tree and every declared variable.
//!
//! Scopes and variables are addressed by `ScopeIdx` and `VarIdx`. A child
//! refers to its parent by index, so the tree owns no cycles while still
//! allowing a walk back to the root for diagnostics. The root scope sits at
//! index 0 and is created together with the arena.
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use super::error::{Result, VcdError};
use super::signal::{Sample, Var, VarType};
use super::types::{ScopeIdx, ScopeKind, VarIdx};

pub const ROOT_SCOPE_NAME: &str = "root";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ScopeChild {
    Scope(ScopeIdx),
    Var(VarIdx),
}

#[derive(Debug, Clone)]
pub struct Scope {
    pub name: String,
    pub kind: ScopeKind,
    pub parent: Option<ScopeIdx>,
    // in insertion order
    pub children: Vec<ScopeChild>,
    child_names: HashMap<String, ScopeChild>,
}

impl Scope {
    fn new(name: &str, kind: ScopeKind, parent: Option<ScopeIdx>) -> Scope {
        Scope {
            name: name.to_string(),
            kind,
            parent,
            children: vec![],
            child_names: HashMap::new(),
        }
    }

    pub fn child(&self, name: &str) -> Option<ScopeChild> {
        self.child_names.get(name).copied()
    }
}

/// Everything needed to declare a variable apart from its handle.
#[derive(Debug, Clone)]
pub struct VarDecl {
    pub id: String,
    pub name: String,
    pub range: Option<String>,
    pub width: u32,
    pub var_type: VarType,
}

/// The scope/variable model. `H` is the handle callers use to find a
/// variable again: the id code while parsing, any caller chosen key while
/// writing.
#[derive(Debug, Clone)]
pub struct Hierarchy<H = String> {
    all_scopes: Vec<Scope>,
    all_vars: Vec<Var>,
    handles: HashMap<H, VarIdx>,
}

impl<H: Eq + Hash + Debug> Default for Hierarchy<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Eq + Hash + Debug> Hierarchy<H> {
    pub fn new() -> Self {
        Hierarchy {
            all_scopes: vec![Scope::new(ROOT_SCOPE_NAME, ScopeKind::Module, None)],
            all_vars: vec![],
            handles: HashMap::new(),
        }
    }

    pub fn root(&self) -> ScopeIdx {
        ScopeIdx(0)
    }

    pub fn scope(&self, scope_idx: ScopeIdx) -> &Scope {
        let ScopeIdx(idx) = scope_idx;
        &self.all_scopes[idx]
    }

    pub fn var(&self, var_idx: VarIdx) -> &Var {
        let VarIdx(idx) = var_idx;
        &self.all_vars[idx]
    }

    pub fn parent(&self, scope_idx: ScopeIdx) -> Option<ScopeIdx> {
        self.scope(scope_idx).parent
    }

    /// Variables in declaration order.
    pub fn vars(&self) -> impl Iterator<Item = &Var> {
        self.all_vars.iter()
    }

    pub fn num_vars(&self) -> usize {
        self.all_vars.len()
    }

    /// Number of scopes, not counting the implicit root.
    pub fn num_scopes(&self) -> usize {
        self.all_scopes.len() - 1
    }

    /// Dotted path from the root down to `scope_idx`, e.g. `root.top.m1`.
    pub fn path(&self, scope_idx: ScopeIdx) -> String {
        let mut names = vec![];
        let mut curr = Some(scope_idx);
        while let Some(idx) = curr {
            let scope = self.scope(idx);
            names.push(scope.name.as_str());
            curr = scope.parent;
        }
        names.reverse();
        names.join(".")
    }

    pub fn var_path(&self, var_idx: VarIdx) -> String {
        let var = self.var(var_idx);
        format!("{}.{}", self.path(var.scope), var.name)
    }

    fn check_name_free(&self, parent: ScopeIdx, name: &str, what: &str) -> Result<()> {
        if self.scope(parent).child(name).is_some() {
            return Err(VcdError::Duplicate {
                what: format!("{what} `{name}`"),
                scope: self.path(parent),
                line: None,
            });
        }
        Ok(())
    }

    pub fn add_scope(&mut self, parent: ScopeIdx, name: &str, kind: ScopeKind) -> Result<ScopeIdx> {
        self.check_name_free(parent, name, "scope")?;

        let scope_idx = ScopeIdx(self.all_scopes.len());
        self.all_scopes.push(Scope::new(name, kind, Some(parent)));

        let ScopeIdx(parent_idx) = parent;
        let parent_scope = &mut self.all_scopes[parent_idx];
        parent_scope.children.push(ScopeChild::Scope(scope_idx));
        parent_scope
            .child_names
            .insert(name.to_string(), ScopeChild::Scope(scope_idx));

        Ok(scope_idx)
    }

    /// Fails the same way `add_var` would, without changing anything.
    pub fn check_var(&self, parent: ScopeIdx, handle: &H, name: &str) -> Result<()> {
        if self.handles.contains_key(handle) {
            return Err(VcdError::Duplicate {
                what: format!("variable handle {handle:?}"),
                scope: self.path(parent),
                line: None,
            });
        }
        self.check_name_free(parent, name, "variable")
    }

    pub fn add_var(&mut self, parent: ScopeIdx, handle: H, decl: VarDecl) -> Result<VarIdx> {
        self.check_var(parent, &handle, &decl.name)?;

        let var_idx = VarIdx(self.all_vars.len());
        let VarDecl {
            id,
            name,
            range,
            width,
            var_type,
        } = decl;

        let ScopeIdx(parent_idx) = parent;
        let parent_scope = &mut self.all_scopes[parent_idx];
        parent_scope.children.push(ScopeChild::Var(var_idx));
        parent_scope
            .child_names
            .insert(name.clone(), ScopeChild::Var(var_idx));

        self.all_vars.push(Var {
            id,
            name,
            range,
            width,
            var_type,
            scope: parent,
            samples: vec![],
        });
        self.handles.insert(handle, var_idx);

        Ok(var_idx)
    }

    pub fn var_by_handle<Q>(&self, handle: &Q) -> Option<VarIdx>
    where
        H: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.handles.get(handle).copied()
    }

    /// Sample log of the variable registered under `handle`.
    pub fn samples<Q>(&self, handle: &Q) -> Option<&[Sample]>
    where
        H: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.var_by_handle(handle)
            .map(|var_idx| self.var(var_idx).samples.as_slice())
    }

    pub fn push_sample(&mut self, var_idx: VarIdx, sample: Sample) {
        let VarIdx(idx) = var_idx;
        self.all_vars[idx].samples.push(sample);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vcd::signal::SampleValue;

    fn decl(id: &str, name: &str, width: u32) -> VarDecl {
        VarDecl {
            id: id.to_string(),
            name: name.to_string(),
            range: None,
            width,
            var_type: VarType::Wire,
        }
    }

    #[test]
    fn children_keep_insertion_order() {
        let mut hier: Hierarchy<String> = Hierarchy::new();
        let root = hier.root();
        let unit0 = hier.add_scope(root, "unit0", ScopeKind::Module).unwrap();
        let b = hier.add_var(unit0, "\"".to_string(), decl("\"", "b", 1)).unwrap();
        let a = hier.add_var(unit0, "!".to_string(), decl("!", "a", 1)).unwrap();
        let inner = hier.add_scope(unit0, "inner", ScopeKind::Task).unwrap();

        assert_eq!(
            hier.scope(unit0).children,
            vec![ScopeChild::Var(b), ScopeChild::Var(a), ScopeChild::Scope(inner)]
        );
        assert_eq!(hier.parent(inner), Some(unit0));
        assert_eq!(hier.path(inner), "root.unit0.inner");
        assert_eq!(hier.var_path(a), "root.unit0.a");
        assert_eq!(hier.num_scopes(), 2);
        assert_eq!(hier.num_vars(), 2);
    }

    #[test]
    fn duplicate_handle_is_rejected() {
        let mut hier: Hierarchy<&str> = Hierarchy::new();
        let root = hier.root();
        hier.add_var(root, "sig0", decl("!", "sig0", 1)).unwrap();
        let err = hier.add_var(root, "sig0", decl("\"", "other", 1)).unwrap_err();
        assert!(matches!(err, VcdError::Duplicate { .. }));
        assert_eq!(hier.num_vars(), 1);
    }

    #[test]
    fn sibling_name_collisions_are_rejected() {
        let mut hier: Hierarchy<String> = Hierarchy::new();
        let root = hier.root();
        let top = hier.add_scope(root, "top", ScopeKind::Module).unwrap();
        let err = hier.add_scope(root, "top", ScopeKind::Module).unwrap_err();
        assert!(matches!(err, VcdError::Duplicate { ref scope, .. } if scope == "root"));

        hier.add_var(top, "!".to_string(), decl("!", "clk", 1)).unwrap();
        let err = hier.add_scope(top, "clk", ScopeKind::Module).unwrap_err();
        assert!(matches!(err, VcdError::Duplicate { .. }));
        let err = hier
            .add_var(top, "\"".to_string(), decl("\"", "clk", 1))
            .unwrap_err();
        assert!(matches!(err, VcdError::Duplicate { ref scope, .. } if scope == "root.top"));

        // same name under a different parent is fine
        hier.add_var(root, "#".to_string(), decl("#", "clk", 1)).unwrap();
    }

    #[test]
    fn samples_are_found_by_handle() {
        let mut hier: Hierarchy<String> = Hierarchy::new();
        let root = hier.root();
        let var_idx = hier.add_var(root, "!".to_string(), decl("!", "sig", 1)).unwrap();
        hier.push_sample(
            var_idx,
            Sample {
                time: 0,
                value: SampleValue::Scalar('X'),
            },
        );
        hier.push_sample(
            var_idx,
            Sample {
                time: 0,
                value: SampleValue::Scalar('1'),
            },
        );

        let samples = hier.samples("!").unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1].value, SampleValue::Scalar('1'));
        assert!(hier.samples("?").is_none());
    }
}
