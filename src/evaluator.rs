use crate::ast::Expr;
use crate::builtins;
use crate::config::Config;
use crate::environment::Environment;
use crate::error::{ErrorKind, Position, Result, ZyError};
use crate::parser::parse_source;
use crate::value::{Callable, Closure, Value};
use std::cell::Cell;
use std::io::{self, BufRead, BufReader, Write};
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use std::sync::Once;

thread_local! {
    /// Set while a top-level run is in progress on this thread. A panic
    /// raised then is reported once, as an `Internal` diagnostic, instead of
    /// also going through the default hook.
    static EVALUATING: Cell<bool> = Cell::new(false);
}

fn install_panic_hook() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !EVALUATING.with(Cell::get) {
                previous(info);
            }
        }));
    });
}

/// Tree-walking interpreter session.
///
/// The globals live as long as the evaluator, so an interactive session
/// keeps one evaluator and feeds it line after line.
pub struct Evaluator {
    globals: Environment,
    config: Config,
    source: String,
    filename: Option<String>,
    /// Set once a diagnostic has been emitted during the current top-level
    /// run; later errors on the same unwind are not reported again.
    reported: bool,
    diagnostics: Vec<ZyError>,
    depth: usize,
    input: Box<dyn BufRead>,
    output: Box<dyn Write>,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self::with_io(
            config,
            Box::new(BufReader::new(io::stdin())),
            Box::new(io::stdout()),
        )
    }

    /// Evaluator whose `read`/`print` builtins use the given streams.
    pub fn with_io(config: Config, input: Box<dyn BufRead>, output: Box<dyn Write>) -> Self {
        let globals = Environment::new();
        builtins::register(&globals);
        tracing::debug!(max_depth = config.max_depth, "evaluator session started");

        Self {
            globals,
            config,
            source: String::new(),
            filename: None,
            reported: false,
            diagnostics: Vec::new(),
            depth: 0,
            input,
            output,
        }
    }

    pub fn globals(&self) -> &Environment {
        &self.globals
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Every diagnostic emitted so far in this session, oldest first.
    pub fn diagnostics(&self) -> &[ZyError] {
        &self.diagnostics
    }

    pub fn set_filename(&mut self, filename: Option<&str>) {
        self.filename = filename.map(str::to_string);
    }

    /// Binds the trailing command-line arguments as a list of strings.
    pub fn bind_args(&mut self, args: Vec<String>) {
        tracing::debug!(count = args.len(), name = %self.config.args_binding, "binding arguments");
        let args = args.into_iter().map(Value::String).collect();
        self.globals.define(&self.config.args_binding, Value::List(args));
    }

    /// Lexes, parses and evaluates `source` against the session globals.
    /// Any failure has already been reported when this returns.
    pub fn run_source(&mut self, source: &str) -> Result<Value> {
        self.source = source.to_string();
        self.reported = false;

        let expr = match parse_source(source) {
            Ok(expr) => expr,
            Err(error) => {
                self.emit(&error);
                return Err(error);
            }
        };
        self.interpret(&expr)
    }

    /// Evaluates a top-level expression in the global scope.
    pub fn interpret(&mut self, expr: &Expr) -> Result<Value> {
        self.reported = false;
        self.depth = 0;

        install_panic_hook();
        let was_evaluating = EVALUATING.with(|flag| flag.replace(true));
        let globals = self.globals.clone();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.evaluate(expr, &globals)));
        EVALUATING.with(|flag| flag.set(was_evaluating));

        match outcome {
            Ok(result) => result,
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown fault".to_string());
                tracing::debug!(%message, "evaluation panicked");
                let error = ZyError::runtime_error(expr.position(), ErrorKind::Internal(message));
                self.depth = 0;
                self.emit(&error);
                Err(error)
            }
        }
    }

    pub fn evaluate(&mut self, expr: &Expr, env: &Environment) -> Result<Value> {
        if self.depth >= self.config.max_depth {
            tracing::debug!(depth = self.depth, "evaluation depth limit reached");
            let error = ZyError::runtime_error(expr.position(), ErrorKind::StackOverflow);
            self.emit(&error);
            return Err(error);
        }

        self.depth += 1;
        let result = self.evaluate_node(expr, env);
        self.depth -= 1;

        match result {
            Ok(value) => Ok(value),
            Err(error) => {
                let error = error.or_at(expr.position());
                self.emit(&error);
                if error.is_fatal() {
                    Err(error)
                } else {
                    Ok(Value::Nil)
                }
            }
        }
    }

    /// Dispatch only; each compound node has its own method so the frame
    /// pushed per nesting level stays small.
    fn evaluate_node(&mut self, expr: &Expr, env: &Environment) -> Result<Value> {
        match expr {
            Expr::FunctionDef {
                name,
                params,
                body,
                next,
                ..
            } => self.define_function(name, params, body, next.as_deref(), env),
            Expr::LetBinding {
                name,
                value,
                body,
                next,
                ..
            } => self.evaluate_let(name, value, body, next.as_deref(), env),
            Expr::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                // Only the boolean `true` selects the then-branch.
                match self.evaluate(condition, env)? {
                    Value::Bool(true) => self.evaluate(then_branch, env),
                    _ => self.evaluate(else_branch, env),
                }
            }
            Expr::Call {
                callee,
                args,
                position,
            } => self.evaluate_call(callee, args, *position, env),
            Expr::Binary {
                operator,
                left,
                right,
                position,
            } => {
                let left = self.evaluate(left, env)?;
                let right = self.evaluate(right, env)?;
                self.dispatch_operator(operator.builtin_name(), vec![left, right], *position, env)
            }
            Expr::Unary {
                operator,
                operand,
                position,
            } => {
                let operand = self.evaluate(operand, env)?;
                self.dispatch_operator(operator.builtin_name(), vec![operand], *position, env)
            }
            Expr::Number { value, .. } => Ok(Value::Number(*value)),
            Expr::String { value, .. } => Ok(Value::String(value.clone())),
            Expr::Bool { value, .. } => Ok(Value::Bool(*value)),
            Expr::Variable { name, position } => env.get(name).ok_or_else(|| {
                ZyError::runtime_error(*position, ErrorKind::UndefinedVariable(name.clone()))
            }),
            Expr::Assign {
                target,
                value,
                next,
                ..
            } => self.evaluate_assign(target, value, next, env),
            Expr::Sequence { first, second, .. } => {
                self.evaluate(first, env)?;
                self.evaluate(second, env)
            }
            Expr::List { items, .. } => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(self.evaluate(item, env)?);
                }
                Ok(Value::List(values))
            }
            Expr::Nil { .. } => Ok(Value::Nil),
        }
    }

    fn define_function(
        &mut self,
        name: &Option<String>,
        params: &Rc<[String]>,
        body: &Rc<Expr>,
        next: Option<&Expr>,
        env: &Environment,
    ) -> Result<Value> {
        let function = Value::Callable(Callable::Closure(Rc::new(Closure {
            name: name.clone(),
            params: Rc::clone(params),
            bound: 0,
            body: Rc::clone(body),
            env: env.clone(),
        })));
        if let Some(name) = name {
            env.define(name, function.clone());
        }
        match next {
            Some(next) => self.evaluate(next, env),
            None => Ok(function),
        }
    }

    fn evaluate_let(
        &mut self,
        name: &str,
        value: &Expr,
        body: &Expr,
        next: Option<&Expr>,
        env: &Environment,
    ) -> Result<Value> {
        let value = self.evaluate(value, env)?;
        env.define(name, value);
        let result = self.evaluate(body, env)?;
        match next {
            Some(next) => self.evaluate(next, env),
            None => Ok(result),
        }
    }

    fn evaluate_call(
        &mut self,
        callee: &Expr,
        args: &[Expr],
        position: Position,
        env: &Environment,
    ) -> Result<Value> {
        let mut function = self.evaluate(callee, env)?;
        if !function.is_callable() {
            return Err(ZyError::runtime_error(position, ErrorKind::NotAFunction));
        }
        if args.is_empty() {
            return self.apply(&function, Value::Nil);
        }
        for arg in args {
            let value = self.evaluate(arg, env)?;
            if !function.is_callable() {
                return Err(ZyError::runtime_error(position, ErrorKind::ExtraneousArgument));
            }
            function = self.apply(&function, value)?;
        }
        Ok(function)
    }

    fn evaluate_assign(
        &mut self,
        target: &Expr,
        value: &Expr,
        next: &Expr,
        env: &Environment,
    ) -> Result<Value> {
        let value = self.evaluate(value, env)?;
        match target {
            Expr::Variable { name, position } => env.assign(name, value).map_err(|e| e.at(*position))?,
            other => {
                return Err(
                    ZyError::runtime_error(other.position(), ErrorKind::InvalidAssignmentTarget)
                        .with_help("only variables can be assigned: `name :: value in body`"),
                )
            }
        }
        self.evaluate(next, env)
    }

    /// Operators resolve their builtin through the live scope chain, so user
    /// code can rebind e.g. `add` to change what `+` does.
    fn dispatch_operator(
        &mut self,
        name: &str,
        operands: Vec<Value>,
        position: Position,
        env: &Environment,
    ) -> Result<Value> {
        let builtin = env.get(name).ok_or_else(|| {
            ZyError::runtime_error(position, ErrorKind::UndefinedVariable(name.to_string()))
        })?;
        self.call(&builtin, operands)
    }

    /// Applies a callable to one argument.
    pub fn apply(&mut self, callee: &Value, arg: Value) -> Result<Value> {
        match callee {
            Value::Callable(Callable::Native(native)) => {
                let native = Rc::clone(native);
                (native.function)(self, arg)
            }
            Value::Callable(Callable::Closure(closure)) => {
                let closure = Rc::clone(closure);
                self.apply_closure(&closure, arg)
            }
            _ => Err(ZyError::fatal(ErrorKind::NotAFunction)),
        }
    }

    /// Applies `args` one curried step at a time.
    pub fn call(&mut self, callee: &Value, args: Vec<Value>) -> Result<Value> {
        if !callee.is_callable() {
            return Err(ZyError::fatal(ErrorKind::NotAFunction));
        }
        let mut function = callee.clone();
        for arg in args {
            if !function.is_callable() {
                return Err(ZyError::fatal(ErrorKind::ExtraneousArgument));
            }
            function = self.apply(&function, arg)?;
        }
        Ok(function)
    }

    fn apply_closure(&mut self, closure: &Closure, arg: Value) -> Result<Value> {
        let frame = Environment::with_enclosing(&closure.env);

        let param = match closure.params.get(closure.bound) {
            Some(param) => param,
            // A thunk ignores its argument.
            None => return self.evaluate(&closure.body, &frame),
        };
        frame.define(param, arg);

        if closure.bound + 1 == closure.params.len() {
            return self.evaluate(&closure.body, &frame);
        }
        Ok(Value::Callable(Callable::Closure(Rc::new(Closure {
            name: closure.name.clone(),
            params: Rc::clone(&closure.params),
            bound: closure.bound + 1,
            body: Rc::clone(&closure.body),
            env: frame,
        }))))
    }

    /// Records a diagnostic unless one was already emitted during this run.
    fn emit(&mut self, error: &ZyError) {
        if self.reported {
            return;
        }
        self.reported = true;
        if self.config.echo_diagnostics {
            error.report(&self.source, self.filename.as_deref());
        }
        self.diagnostics.push(error.clone());
    }

    /// Reads one line from the session input, without its line terminator.
    pub fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|e| ZyError::fatal(ErrorKind::Io(e.to_string())))?;
        if read == 0 {
            return Ok(None);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(Some(line))
    }

    pub(crate) fn write_line(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{}", text)
            .and_then(|_| self.output.flush())
            .map_err(|e| ZyError::fatal(ErrorKind::Io(e.to_string())))
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}
