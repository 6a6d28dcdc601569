//! Virtual machine for executing compiled Kitten units.

use kitten_bytecode::{
    ExpressionTag, Function, LiteralTag, Reader, StatementTag, Value, ValueKind, VarId,
};

use super::error::RuntimeError;
use super::host::{Arguments, Bindings, HostContext, HostFunctions, Parameters};
use super::scope::{ScopeArena, ScopeId};
use super::trace::{NoopTracer, ScopeKind, Tracer};

/// Default nesting depth. Fits a 2 MiB thread stack in debug builds.
pub const DEFAULT_RECURSION_LIMIT: u32 = 256;

/// Runtime limits for script execution.
#[derive(Clone, Copy, Debug)]
pub struct FuelLimits {
    /// Maximum statements executed (default: unlimited).
    pub(crate) exec_fuel: Option<u32>,
    /// Maximum nesting of blocks and expressions, local calls included.
    pub(crate) recursion_limit: u32,
}

impl Default for FuelLimits {
    fn default() -> Self {
        Self {
            exec_fuel: None,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }
}

impl FuelLimits {
    /// Create new fuel limits with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the execution fuel limit.
    pub fn exec_fuel(mut self, fuel: u32) -> Self {
        self.exec_fuel = Some(fuel);
        self
    }

    /// Set the recursion limit.
    pub fn recursion_limit(mut self, limit: u32) -> Self {
        self.recursion_limit = limit;
        self
    }

    pub fn get_exec_fuel(&self) -> Option<u32> {
        self.exec_fuel
    }
    pub fn get_recursion_limit(&self) -> u32 {
        self.recursion_limit
    }
}

/// Result of a completed run.
#[derive(Clone, Debug, PartialEq)]
pub struct Outcome {
    /// Value of the `return` that ended the run, if one was reached.
    pub value: Option<Value>,
    /// Text written by host functions through [`HostContext`].
    pub output: String,
}

/// How an evaluation finished.
///
/// `Return` is the early-return carrier: it unwinds through blocks, loops and
/// expression statements until a call boundary or the top level absorbs it.
#[derive(Debug)]
enum Flow {
    Normal(Value),
    Return(Value),
}

impl Flow {
    fn into_value(self) -> Value {
        match self {
            Self::Normal(v) | Self::Return(v) => v,
        }
    }
}

/// Virtual machine state for one script run.
pub struct VM {
    pub(crate) scopes: ScopeArena,
    pub(crate) output: String,

    // Fuel tracking
    pub(crate) exec_fuel: Option<u32>,
    pub(crate) depth: u32,
    pub(crate) limits: FuelLimits,
}

/// Builder for VM instances.
#[derive(Clone, Debug, Default)]
pub struct VMBuilder {
    limits: FuelLimits,
}

impl VMBuilder {
    /// Create a new VM builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fuel limits.
    pub fn limits(mut self, limits: FuelLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Set the execution fuel limit.
    pub fn exec_fuel(mut self, fuel: u32) -> Self {
        self.limits = self.limits.exec_fuel(fuel);
        self
    }

    /// Set the recursion limit.
    pub fn recursion_limit(mut self, limit: u32) -> Self {
        self.limits = self.limits.recursion_limit(limit);
        self
    }

    /// Build the VM.
    pub fn build(self) -> VM {
        VM {
            scopes: ScopeArena::new(),
            output: String::new(),
            exec_fuel: self.limits.get_exec_fuel(),
            depth: 0,
            limits: self.limits,
        }
    }
}

impl VM {
    /// Create a VM builder.
    pub fn builder() -> VMBuilder {
        VMBuilder::new()
    }

    /// Execute a complete unit.
    ///
    /// `parameters` become the top-level frame's parameters and `bindings`
    /// the initial variables of the top-level scope.
    pub fn execute(
        self,
        bytecode: &[u8],
        parameters: &Parameters,
        bindings: Bindings,
        host: &HostFunctions,
    ) -> Result<Outcome, RuntimeError> {
        self.execute_with(bytecode, parameters, bindings, host, &mut NoopTracer)
    }

    /// Execute with a tracer attached.
    pub fn execute_with<T: Tracer>(
        mut self,
        bytecode: &[u8],
        parameters: &Parameters,
        bindings: Bindings,
        host: &HostFunctions,
        tracer: &mut T,
    ) -> Result<Outcome, RuntimeError> {
        let mut body = Reader::unit_body(bytecode)?;
        let root = self.scopes.root(bindings, parameters.clone());
        let value = self.block(&mut body, root, host, tracer)?;
        Ok(Outcome {
            value,
            output: self.output,
        })
    }

    /// Run statements until the body ends or one of them returns.
    fn block<T: Tracer>(
        &mut self,
        body: &mut Reader<'_>,
        scope: ScopeId,
        host: &HostFunctions,
        tracer: &mut T,
    ) -> Result<Option<Value>, RuntimeError> {
        self.enter()?;
        let result = self.statements(body, scope, host, tracer);
        self.exit();
        result
    }

    fn statements<T: Tracer>(
        &mut self,
        body: &mut Reader<'_>,
        scope: ScopeId,
        host: &HostFunctions,
        tracer: &mut T,
    ) -> Result<Option<Value>, RuntimeError> {
        while !body.is_empty() {
            if let Some(value) = self.statement(body, scope, host, tracer)? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    fn statement<T: Tracer>(
        &mut self,
        body: &mut Reader<'_>,
        scope: ScopeId,
        host: &HostFunctions,
        tracer: &mut T,
    ) -> Result<Option<Value>, RuntimeError> {
        self.consume_fuel()?;
        let offset = body.offset();
        let tag = body.statement_tag()?;
        tracer.trace_statement(offset, tag);

        match tag {
            StatementTag::Null => Ok(None),
            StatementTag::If => self.if_statement(body, scope, host, tracer),
            StatementTag::ForIn => self.for_in(body, scope, host, tracer),
            StatementTag::Assign => {
                let id = body.var_id()?;
                let value = self.eval(body, scope, host, tracer)?.into_value();
                tracer.trace_assign(id, &value);
                self.scopes.assign(scope, id, value);
                Ok(None)
            }
            StatementTag::Expression => match self.eval(body, scope, host, tracer)? {
                Flow::Return(value) => {
                    tracer.trace_return(&value);
                    Ok(Some(value))
                }
                Flow::Normal(_) => Ok(None),
            },
            StatementTag::Return => {
                let value = self.eval(body, scope, host, tracer)?.into_value();
                tracer.trace_return(&value);
                Ok(Some(value))
            }
        }
    }

    fn if_statement<T: Tracer>(
        &mut self,
        body: &mut Reader<'_>,
        scope: ScopeId,
        host: &HostFunctions,
        tracer: &mut T,
    ) -> Result<Option<Value>, RuntimeError> {
        let offset = body.offset();
        let condition = self.eval(body, scope, host, tracer)?.into_value();
        let condition = match condition {
            Value::Boolean(b) => b,
            other => return Err(type_mismatch(ValueKind::Boolean, &other, offset)),
        };
        let true_len = body.u32()?;
        let false_len = body.u32()?;

        let mut branch = if condition {
            let branch = body.unit_of_len(true_len)?;
            body.skip(false_len)?;
            branch
        } else {
            body.skip(true_len)?;
            if false_len == 0 {
                return Ok(None);
            }
            body.unit_of_len(false_len)?
        };

        let mark = self.scopes.mark();
        let child = self.scopes.child(scope);
        tracer.trace_enter_scope(ScopeKind::Branch);
        let result = self.block(&mut branch, child, host, tracer);
        tracer.trace_exit_scope(ScopeKind::Branch);
        self.scopes.truncate(mark);
        result
    }

    fn for_in<T: Tracer>(
        &mut self,
        body: &mut Reader<'_>,
        scope: ScopeId,
        host: &HostFunctions,
        tracer: &mut T,
    ) -> Result<Option<Value>, RuntimeError> {
        let loop_var = body.var_id()?;

        let offset = body.offset();
        let iterable = self.eval(body, scope, host, tracer)?.into_value();
        let elements = match iterable {
            Value::Array(elements) => elements,
            other => return Err(type_mismatch(ValueKind::Array, &other, offset)),
        };

        let offset = body.offset();
        let function = match self.eval(body, scope, host, tracer)?.into_value() {
            Value::Function(function) => function,
            other => return Err(type_mismatch(ValueKind::Function, &other, offset)),
        };

        for (index, element) in elements.into_iter().enumerate() {
            let mark = self.scopes.mark();
            let iteration = self.scopes.child(scope);
            self.scopes.define(iteration, loop_var, element);
            tracer.trace_enter_scope(ScopeKind::Iteration(index));
            let result = self.run_function(&function, iteration, host, tracer);
            tracer.trace_exit_scope(ScopeKind::Iteration(index));
            self.scopes.truncate(mark);

            if let Some(value) = result? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    fn run_function<T: Tracer>(
        &mut self,
        function: &Function,
        scope: ScopeId,
        host: &HostFunctions,
        tracer: &mut T,
    ) -> Result<Option<Value>, RuntimeError> {
        let mut body = Reader::unit_body(function.bytes())?;
        self.block(&mut body, scope, host, tracer)
    }

    fn eval<T: Tracer>(
        &mut self,
        body: &mut Reader<'_>,
        scope: ScopeId,
        host: &HostFunctions,
        tracer: &mut T,
    ) -> Result<Flow, RuntimeError> {
        self.enter()?;
        let result = self.expression(body, scope, host, tracer);
        self.exit();
        result
    }

    fn expression<T: Tracer>(
        &mut self,
        body: &mut Reader<'_>,
        scope: ScopeId,
        host: &HostFunctions,
        tracer: &mut T,
    ) -> Result<Flow, RuntimeError> {
        let offset = body.offset();
        let tag = body.expression_tag()?;
        tracer.trace_expression(offset, tag);

        match tag {
            ExpressionTag::LocalCall => {
                let id = body.var_id()?;
                self.local_call(id, offset, body, scope, host, tracer)
                    .map(Flow::Normal)
            }
            ExpressionTag::HostCall => {
                let name = body.name()?;
                self.host_call(name, offset, body, scope, host, tracer)
                    .map(Flow::Normal)
            }
            ExpressionTag::Literal => self.literal(body, scope, host, tracer).map(Flow::Normal),
            ExpressionTag::VariableRef => {
                let id = body.var_id()?;
                self.scopes
                    .lookup(scope, id)
                    .cloned()
                    .map(Flow::Normal)
                    .ok_or(RuntimeError::UnresolvedVariable { id, offset })
            }
            ExpressionTag::ParameterRef => {
                let name = body.name()?;
                match self.scopes.parameter(scope, name) {
                    Some(value) => Ok(Flow::Normal(value.clone())),
                    None => Err(RuntimeError::UnresolvedParameter {
                        name: name.to_owned(),
                        offset,
                    }),
                }
            }
            ExpressionTag::Result => {
                let value = self.eval(body, scope, host, tracer)?.into_value();
                Ok(Flow::Return(value))
            }
        }
    }

    /// Call the function bound to `id`.
    ///
    /// The callee's scope hangs off the scope that owns the binding, not the
    /// caller's scope, and gets a fresh frame holding the arguments.
    fn local_call<T: Tracer>(
        &mut self,
        id: VarId,
        offset: usize,
        body: &mut Reader<'_>,
        scope: ScopeId,
        host: &HostFunctions,
        tracer: &mut T,
    ) -> Result<Value, RuntimeError> {
        let owner = self
            .scopes
            .owner(scope, id)
            .ok_or(RuntimeError::UnresolvedVariable { id, offset })?;
        let function = match self.scopes.lookup(owner, id) {
            Some(Value::Function(function)) => function.clone(),
            Some(other) => return Err(type_mismatch(ValueKind::Function, other, offset)),
            None => return Err(RuntimeError::UnresolvedVariable { id, offset }),
        };
        let args = self.arguments(body, scope, host, tracer)?;

        let mark = self.scopes.mark();
        let frame = self.scopes.push_frame(args);
        let callee = self.scopes.push_scope(Some(owner), frame, Bindings::new());
        tracer.trace_enter_scope(ScopeKind::Call(id));
        let result = self.run_function(&function, callee, host, tracer);
        tracer.trace_exit_scope(ScopeKind::Call(id));
        self.scopes.truncate(mark);

        Ok(result?.unwrap_or(Value::Nil))
    }

    fn host_call<T: Tracer>(
        &mut self,
        name: &str,
        offset: usize,
        body: &mut Reader<'_>,
        scope: ScopeId,
        host: &HostFunctions,
        tracer: &mut T,
    ) -> Result<Value, RuntimeError> {
        let function = host
            .get(name)
            .ok_or_else(|| RuntimeError::UnresolvedHostFunction {
                name: name.to_owned(),
                offset,
            })?;
        let args = self.arguments(body, scope, host, tracer)?;

        tracer.trace_host_call(name, &args);
        let mut ctx = HostContext::new(name, &self.scopes, scope, &mut self.output);
        let result = function(args, &mut ctx).map_err(|source| RuntimeError::HostFunction {
            name: name.to_owned(),
            source,
        })?;
        tracer.trace_host_result(name, result.as_ref());

        Ok(result.unwrap_or(Value::Nil))
    }

    /// `(cstring key, expr)* 0x00`, evaluated left to right.
    fn arguments<T: Tracer>(
        &mut self,
        body: &mut Reader<'_>,
        scope: ScopeId,
        host: &HostFunctions,
        tracer: &mut T,
    ) -> Result<Arguments, RuntimeError> {
        let mut args = Arguments::new();
        while !body.end_of_list() {
            let key = body.name()?.to_owned();
            let value = self.eval(body, scope, host, tracer)?.into_value();
            args.insert(key, value);
        }
        Ok(args)
    }

    fn literal<T: Tracer>(
        &mut self,
        body: &mut Reader<'_>,
        scope: ScopeId,
        host: &HostFunctions,
        tracer: &mut T,
    ) -> Result<Value, RuntimeError> {
        let value = match body.literal_tag()? {
            LiteralTag::Nil => Value::Nil,
            LiteralTag::String => Value::String(body.sized()?.to_vec()),
            LiteralTag::Double => Value::Double(body.f64()?),
            LiteralTag::Boolean => Value::Boolean(body.boolean()?),
            LiteralTag::Function => Value::Function(body.function()?),
            LiteralTag::Array => {
                let mut elements = Vec::new();
                while !body.end_of_list() {
                    elements.push(self.eval(body, scope, host, tracer)?.into_value());
                }
                Value::Array(elements)
            }
        };
        Ok(value)
    }

    fn enter(&mut self) -> Result<(), RuntimeError> {
        let limit = self.limits.get_recursion_limit();
        if self.depth >= limit {
            return Err(RuntimeError::RecursionLimitExceeded(limit));
        }
        self.depth += 1;
        Ok(())
    }

    fn exit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn consume_fuel(&mut self) -> Result<(), RuntimeError> {
        let Some(fuel) = self.exec_fuel.as_mut() else {
            return Ok(());
        };
        if *fuel == 0 {
            return Err(RuntimeError::ExecFuelExhausted(
                self.limits.get_exec_fuel().unwrap_or(0),
            ));
        }
        *fuel -= 1;
        Ok(())
    }
}

fn type_mismatch(expected: ValueKind, found: &Value, offset: usize) -> RuntimeError {
    RuntimeError::TypeMismatch {
        expected,
        found: found.kind(),
        offset,
    }
}
