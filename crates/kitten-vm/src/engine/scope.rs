//! Scope and call-frame arenas.
//!
//! Scopes form a tree through parent indices; no scope owns another. Every
//! scope belongs to a call frame, and the frame holds the parameters that
//! `Parameters.<name>` resolves against. Parameter lookups never leave the
//! current frame; variable lookups walk the parent chain.
//!
//! Both arenas are stacks in practice: everything pushed while a block runs
//! is dropped with [`ScopeArena::truncate`] when the block exits.

use std::collections::HashMap;

use kitten_bytecode::{Value, VarId};

use super::host::{Bindings, Parameters};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScopeId(u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameId(u32);

#[derive(Debug)]
struct Scope {
    vars: HashMap<VarId, Value>,
    parent: Option<ScopeId>,
    frame: FrameId,
}

/// Arena lengths to restore when a block exits.
#[derive(Clone, Copy, Debug)]
pub struct ArenaMark {
    scopes: usize,
    frames: usize,
}

#[derive(Debug, Default)]
pub struct ScopeArena {
    scopes: Vec<Scope>,
    frames: Vec<Parameters>,
}

impl ScopeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the top-level frame and scope of a run.
    pub fn root(&mut self, bindings: Bindings, parameters: Parameters) -> ScopeId {
        let frame = self.push_frame(parameters);
        self.push_scope(None, frame, bindings)
    }

    pub fn push_frame(&mut self, parameters: Parameters) -> FrameId {
        let id = FrameId(self.frames.len() as u32);
        self.frames.push(parameters);
        id
    }

    pub fn push_scope(&mut self, parent: Option<ScopeId>, frame: FrameId, vars: Bindings) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            vars,
            parent,
            frame,
        });
        id
    }

    /// Empty child scope sharing the parent's frame (branches, loop iterations).
    pub fn child(&mut self, parent: ScopeId) -> ScopeId {
        let frame = self.scope(parent).frame;
        self.push_scope(Some(parent), frame, Bindings::new())
    }

    pub fn mark(&self) -> ArenaMark {
        ArenaMark {
            scopes: self.scopes.len(),
            frames: self.frames.len(),
        }
    }

    pub fn truncate(&mut self, mark: ArenaMark) {
        self.scopes.truncate(mark.scopes);
        self.frames.truncate(mark.frames);
    }

    fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0 as usize]
    }

    fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.0 as usize]
    }

    /// Nearest scope on the chain starting at `from` that binds `id`.
    pub fn owner(&self, from: ScopeId, id: VarId) -> Option<ScopeId> {
        let mut current = Some(from);
        while let Some(scope_id) = current {
            let scope = self.scope(scope_id);
            if scope.vars.contains_key(&id) {
                return Some(scope_id);
            }
            current = scope.parent;
        }
        None
    }

    pub fn lookup(&self, from: ScopeId, id: VarId) -> Option<&Value> {
        let owner = self.owner(from, id)?;
        self.scope(owner).vars.get(&id)
    }

    /// Write `value` to the nearest scope that already binds `id`, or bind it
    /// in `scope` itself when no ancestor does.
    pub fn assign(&mut self, scope: ScopeId, id: VarId, value: Value) {
        let target = self.owner(scope, id).unwrap_or(scope);
        self.scope_mut(target).vars.insert(id, value);
    }

    /// Bind `id` in `scope` itself, shadowing any ancestor binding.
    pub fn define(&mut self, scope: ScopeId, id: VarId, value: Value) {
        self.scope_mut(scope).vars.insert(id, value);
    }

    /// Parameters of the frame `scope` belongs to.
    pub fn parameters(&self, scope: ScopeId) -> &Parameters {
        &self.frames[self.scope(scope).frame.0 as usize]
    }

    pub fn parameter(&self, scope: ScopeId, name: &str) -> Option<&Value> {
        self.parameters(scope).get(name)
    }
}
