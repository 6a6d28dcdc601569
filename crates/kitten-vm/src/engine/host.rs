//! Host function registry and the context handed to callbacks.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use kitten_bytecode::{Value, VarId};

use super::scope::{ScopeArena, ScopeId};

/// Evaluated named arguments, in call order.
pub type Arguments = IndexMap<String, Value>;

/// Named parameters of a call frame; the top-level frame gets the run's parameters.
pub type Parameters = IndexMap<String, Value>;

/// Initial variables of the top-level scope.
pub type Bindings = HashMap<VarId, Value>;

pub type HostError = Box<dyn std::error::Error + Send + Sync>;

type HostFn = dyn Fn(Arguments, &mut HostContext<'_>) -> Result<Option<Value>, HostError>;

/// Name to callback table for `Swift.<name>(..)` calls.
///
/// Read-only while a script runs. Cloning shares the callbacks, so a caller
/// can layer extra functions over an existing table.
#[derive(Clone, Default)]
pub struct HostFunctions {
    functions: HashMap<String, Rc<HostFn>>,
}

impl HostFunctions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `f` under `name`, replacing any previous function of that name.
    pub fn register<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(Arguments, &mut HostContext<'_>) -> Result<Option<Value>, HostError> + 'static,
    {
        self.functions.insert(name.into(), Rc::new(f));
        self
    }

    /// Builder form of [`register`](Self::register).
    pub fn with<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Arguments, &mut HostContext<'_>) -> Result<Option<Value>, HostError> + 'static,
    {
        self.register(name, f);
        self
    }

    pub(crate) fn get(&self, name: &str) -> Option<&HostFn> {
        self.functions.get(name).map(Rc::as_ref)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl fmt::Debug for HostFunctions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

/// What a host callback can see of the running script.
///
/// The output accumulator lives in the VM and is handed over explicitly, so
/// callbacks that produce text need no captured mutable state.
pub struct HostContext<'a> {
    name: &'a str,
    scopes: &'a ScopeArena,
    scope: ScopeId,
    output: &'a mut String,
}

impl<'a> HostContext<'a> {
    pub(crate) fn new(
        name: &'a str,
        scopes: &'a ScopeArena,
        scope: ScopeId,
        output: &'a mut String,
    ) -> Self {
        Self {
            name,
            scopes,
            scope,
            output,
        }
    }

    /// Name the function was called by.
    pub fn name(&self) -> &str {
        self.name
    }

    /// Resolve a variable through the caller's scope chain.
    pub fn lookup(&self, id: VarId) -> Option<&Value> {
        self.scopes.lookup(self.scope, id)
    }

    /// Parameters of the calling frame.
    pub fn parameters(&self) -> &Parameters {
        self.scopes.parameters(self.scope)
    }

    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.scopes.parameter(self.scope, name)
    }

    pub fn write_str(&mut self, text: &str) {
        self.output.push_str(text);
    }

    /// Append the text form of `value` to the output.
    pub fn write_value(&mut self, value: &Value) {
        value.render_into(self.output);
    }

    /// Output accumulated so far in this run.
    pub fn output(&self) -> &str {
        self.output.as_str()
    }
}
