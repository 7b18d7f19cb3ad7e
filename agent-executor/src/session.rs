//! Interactive session seam used by the notebook executor.

use async_trait::async_trait;
use thiserror::Error;

/// Failure of a single fragment, split by when it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionFault {
    /// The fragment was rejected before running, e.g. a syntax error.
    PreExecution(String),
    /// The fragment raised while running.
    InExecution(String),
}

impl ExecutionFault {
    /// Returns the fault text reported by the session.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::PreExecution(message) | Self::InExecution(message) => message,
        }
    }
}

/// Everything a session observed while running one fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentOutcome {
    /// Text written to standard output.
    pub stdout: String,
    /// Text written to standard error.
    pub stderr: String,
    /// Rendered value of a trailing expression, if any.
    pub display: Option<String>,
    /// Failure, if the fragment did not complete.
    pub fault: Option<ExecutionFault>,
}

impl FragmentOutcome {
    /// Exit code contributed by this fragment.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        if self.fault.is_some() { 1 } else { 0 }
    }

    /// Appends stdout, stderr, display value, and fault text to `log`.
    pub fn append_to(&self, log: &mut String) {
        log.push_str(&self.stdout);
        log.push_str(&self.stderr);
        if let Some(display) = &self.display {
            log.push_str(display);
        }
        if let Some(fault) = &self.fault {
            log.push('\n');
            log.push_str(fault.message());
        }
    }
}

/// Errors raised by the session transport itself, not by submitted code.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The interpreter process could not be started.
    #[error("failed to start interpreter `{interpreter}`: {source}")]
    Spawn {
        /// Interpreter command that was attempted.
        interpreter: String,
        /// Source I/O error.
        source: std::io::Error,
    },
    /// Reading from or writing to the interpreter failed.
    #[error("session i/o error: {source}")]
    Io {
        /// Source [`std::io::Error`].
        #[from]
        source: std::io::Error,
    },
    /// The interpreter answered with something that is not a valid response.
    #[error("session protocol error: {reason}")]
    Protocol {
        /// Human-readable description of the mismatch.
        reason: String,
    },
    /// The interpreter is gone; the session must be restarted.
    #[error("session terminated")]
    Terminated,
}

impl SessionError {
    /// Helper to construct protocol errors from string-like values.
    #[must_use]
    pub fn protocol(reason: impl Into<String>) -> Self {
        Self::Protocol {
            reason: reason.into(),
        }
    }
}

/// Result alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Live interpreter whose bindings persist across submitted fragments.
///
/// Callers must not interleave submissions from different batches; the
/// notebook executor serialises access for them.
#[async_trait]
pub trait InteractiveSession: Send {
    /// Language tag understood by this session.
    fn language(&self) -> &str;

    /// Runs one fragment and reports what it produced.
    ///
    /// Faults raised by the fragment are part of the returned outcome; an
    /// `Err` means the session itself failed.
    async fn submit(&mut self, code: &str) -> SessionResult<FragmentOutcome>;

    /// Discards all bindings and starts from a fresh interpreter.
    async fn restart(&mut self) -> SessionResult<()>;
}

/// In-process session doubles for tests.
pub mod mocks {
    use std::collections::HashMap;
    use std::fmt::{self, Display, Formatter, Write as _};

    use async_trait::async_trait;

    use super::{ExecutionFault, FragmentOutcome, InteractiveSession, SessionError, SessionResult};

    /// Toy interpreter with persistent integer and string bindings.
    ///
    /// Understands `name = expr`, `print(expr)`, and bare expressions, one
    /// statement per line or `;`. Expressions are integer or quoted string
    /// literals, names, and a single integer division `a / b`.
    #[derive(Debug, Default)]
    pub struct ToySession {
        bindings: HashMap<String, Value>,
        submissions: usize,
        restarts: usize,
        terminated: bool,
    }

    impl ToySession {
        /// Creates an empty session.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Number of fragments submitted so far.
        #[must_use]
        pub fn submissions(&self) -> usize {
            self.submissions
        }

        /// Number of restarts performed.
        #[must_use]
        pub fn restarts(&self) -> usize {
            self.restarts
        }

        /// Returns the rendered value bound to `name`.
        #[must_use]
        pub fn binding(&self, name: &str) -> Option<String> {
            self.bindings.get(name).map(ToString::to_string)
        }

        /// Makes every later submission fail as if the interpreter had died.
        pub fn terminate(&mut self) {
            self.terminated = true;
        }

        fn eval(&self, expr: &Expr) -> Result<Value, String> {
            match expr {
                Expr::Int(value) => Ok(Value::Int(*value)),
                Expr::Str(value) => Ok(Value::Str(value.clone())),
                Expr::Name(name) => self
                    .bindings
                    .get(name)
                    .cloned()
                    .ok_or_else(|| format!("NameError: name '{name}' is not defined")),
                Expr::Div(lhs, rhs) => match (self.eval(lhs)?, self.eval(rhs)?) {
                    (Value::Int(_), Value::Int(0)) => {
                        Err("ZeroDivisionError: division by zero".to_owned())
                    }
                    (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a / b)),
                    _ => Err("TypeError: unsupported operand type(s) for /".to_owned()),
                },
            }
        }
    }

    #[async_trait]
    impl InteractiveSession for ToySession {
        fn language(&self) -> &str {
            "toy"
        }

        async fn submit(&mut self, code: &str) -> SessionResult<FragmentOutcome> {
            if self.terminated {
                return Err(SessionError::Terminated);
            }
            self.submissions += 1;

            let statements = match parse(code) {
                Ok(statements) => statements,
                Err(message) => {
                    return Ok(FragmentOutcome {
                        fault: Some(ExecutionFault::PreExecution(message)),
                        ..FragmentOutcome::default()
                    });
                }
            };

            let mut outcome = FragmentOutcome::default();
            let last = statements.len().saturating_sub(1);
            for (position, statement) in statements.iter().enumerate() {
                let result = match statement {
                    Statement::Assign(name, expr) => self.eval(expr).map(|value| {
                        self.bindings.insert(name.clone(), value);
                    }),
                    Statement::Print(expr) => self.eval(expr).map(|value| {
                        let _ = writeln!(outcome.stdout, "{value}");
                    }),
                    Statement::Expr(expr) => self.eval(expr).map(|value| {
                        if position == last {
                            outcome.display = Some(value.to_string());
                        }
                    }),
                };
                if let Err(message) = result {
                    outcome.fault = Some(ExecutionFault::InExecution(message));
                    break;
                }
            }
            Ok(outcome)
        }

        async fn restart(&mut self) -> SessionResult<()> {
            self.bindings.clear();
            self.terminated = false;
            self.restarts += 1;
            Ok(())
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Value {
        Int(i64),
        Str(String),
    }

    impl Display for Value {
        fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
            match self {
                Self::Int(value) => write!(f, "{value}"),
                Self::Str(value) => f.write_str(value),
            }
        }
    }

    #[derive(Debug)]
    enum Expr {
        Int(i64),
        Str(String),
        Name(String),
        Div(Box<Expr>, Box<Expr>),
    }

    #[derive(Debug)]
    enum Statement {
        Assign(String, Expr),
        Print(Expr),
        Expr(Expr),
    }

    fn parse(code: &str) -> Result<Vec<Statement>, String> {
        code.split(['\n', ';'])
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(parse_statement)
            .collect()
    }

    fn parse_statement(line: &str) -> Result<Statement, String> {
        if let Some(inner) = line
            .strip_prefix("print(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_expr(inner).map(Statement::Print);
        }
        if let Some((name, expr)) = line.split_once('=') {
            let name = name.trim();
            if !is_name(name) {
                return Err(syntax_error(line));
            }
            return parse_expr(expr).map(|expr| Statement::Assign(name.to_owned(), expr));
        }
        parse_expr(line).map(Statement::Expr)
    }

    fn parse_expr(text: &str) -> Result<Expr, String> {
        let text = text.trim();
        if let Some((lhs, rhs)) = text.split_once('/') {
            return Ok(Expr::Div(
                Box::new(parse_atom(lhs)?),
                Box::new(parse_atom(rhs)?),
            ));
        }
        parse_atom(text)
    }

    fn parse_atom(text: &str) -> Result<Expr, String> {
        let text = text.trim();
        for quote in ['\'', '"'] {
            if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
                return Ok(Expr::Str(text[1..text.len() - 1].to_owned()));
            }
        }
        if let Ok(value) = text.parse::<i64>() {
            return Ok(Expr::Int(value));
        }
        if is_name(text) {
            return Ok(Expr::Name(text.to_owned()));
        }
        Err(syntax_error(text))
    }

    fn is_name(text: &str) -> bool {
        let mut chars = text.chars();
        chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    }

    fn syntax_error(text: &str) -> String {
        format!("SyntaxError: invalid syntax: `{text}`")
    }
}
