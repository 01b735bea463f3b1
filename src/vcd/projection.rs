// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.

//! Read-only projection of the scope/variable model into plain nested data.
//!
//! Nothing here refers back into the arena, so the result can be handed to
//! an exporter (JSON or otherwise) after the producing session is done.
use std::fmt::Debug;
use std::hash::Hash;

use serde::Serialize;

use super::hierarchy::{Hierarchy, ScopeChild};
use super::types::{ScopeIdx, VarIdx};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScopeTypeInfo {
    #[serde(rename = "name")]
    pub kind: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VarTypeInfo {
    pub width: u32,
    #[serde(rename = "name")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ProjectedNode {
    Scope {
        name: String,
        #[serde(rename = "type")]
        type_info: ScopeTypeInfo,
        children: Vec<ProjectedNode>,
    },
    Var {
        name: String,
        #[serde(rename = "type")]
        type_info: VarTypeInfo,
        data: Vec<(u64, String)>,
    },
}

impl ProjectedNode {
    pub fn name(&self) -> &str {
        match self {
            ProjectedNode::Scope { name, .. } | ProjectedNode::Var { name, .. } => name,
        }
    }

    /// Children of a scope node; variables have none.
    pub fn children(&self) -> &[ProjectedNode] {
        match self {
            ProjectedNode::Scope { children, .. } => children,
            ProjectedNode::Var { .. } => &[],
        }
    }
}

impl<H: Eq + Hash + Debug> Hierarchy<H> {
    /// Projects the whole tree, starting at the implicit root scope.
    pub fn project(&self) -> ProjectedNode {
        self.project_scope(self.root())
    }

    pub fn project_scope(&self, scope_idx: ScopeIdx) -> ProjectedNode {
        let scope = self.scope(scope_idx);
        let children = scope
            .children
            .iter()
            .map(|child| match *child {
                ScopeChild::Scope(child_idx) => self.project_scope(child_idx),
                ScopeChild::Var(var_idx) => self.project_var(var_idx),
            })
            .collect();

        ProjectedNode::Scope {
            name: scope.name.clone(),
            type_info: ScopeTypeInfo { kind: "struct" },
            children,
        }
    }

    pub fn project_var(&self, var_idx: VarIdx) -> ProjectedNode {
        let var = self.var(var_idx);
        ProjectedNode::Var {
            name: var.name.clone(),
            type_info: VarTypeInfo {
                width: var.width,
                kind: var.var_type.to_string(),
            },
            data: var
                .samples
                .iter()
                .map(|sample| (sample.time, sample.value.to_string()))
                .collect(),
        }
    }
}
