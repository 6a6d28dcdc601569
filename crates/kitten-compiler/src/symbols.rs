//! Block-scoped identifier → variable id mapping.

use kitten_bytecode::VarId;

/// Stack of block scopes plus the monotonic id counter.
///
/// Ids start at 1 and are never reused within one compilation session.
#[derive(Clone, Debug)]
pub struct SymbolTable {
    scopes: Vec<Vec<(String, VarId)>>,
    next: u32,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            scopes: vec![Vec::new()],
            next: 1,
        }
    }

    pub fn allocate(&mut self) -> VarId {
        let id = VarId(self.next);
        self.next += 1;
        id
    }

    /// Bind `name` in the innermost scope, shadowing outer bindings.
    pub fn bind(&mut self, name: &str, id: VarId) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.push((name.to_owned(), id));
        }
    }

    /// Innermost binding of `name`.
    pub fn resolve(&self, name: &str) -> Option<VarId> {
        self.scopes
            .iter()
            .rev()
            .flat_map(|scope| scope.iter().rev())
            .find(|(bound, _)| bound == name)
            .map(|(_, id)| *id)
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(Vec::new());
    }

    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }
}
