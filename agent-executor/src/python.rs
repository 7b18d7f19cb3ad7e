//! Interactive session backed by a long-lived `python3` child process.
//!
//! The child runs a small driver that keeps one namespace alive and answers
//! JSON-line requests: `{"code": ...}` in, captured stdout/stderr, the
//! trailing expression value, and pre/in-execution errors out.

use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::session::{
    ExecutionFault, FragmentOutcome, InteractiveSession, SessionError, SessionResult,
};

const DRIVER_SOURCE: &str = include_str!("python_driver.py");

/// How to launch the Python interpreter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PythonSessionConfig {
    interpreter: PathBuf,
    args: Vec<String>,
}

impl PythonSessionConfig {
    /// Creates a configuration for the given interpreter command.
    #[must_use]
    pub fn new(interpreter: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
            args: Vec::new(),
        }
    }

    /// Adds interpreter flags placed before the driver invocation.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Returns the interpreter command.
    #[must_use]
    pub fn interpreter(&self) -> &PathBuf {
        &self.interpreter
    }

    /// Returns the extra interpreter flags.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl Default for PythonSessionConfig {
    fn default() -> Self {
        Self::new("python3")
    }
}

struct DriverProcess {
    child: Child,
    stdin: ChildStdin,
    responses: Lines<BufReader<ChildStdout>>,
    // Set while a request awaits its reply. Still set on entry means an
    // earlier exchange was abandoned and its reply may be queued in the pipe.
    in_flight: bool,
}

impl DriverProcess {
    fn spawn(config: &PythonSessionConfig) -> SessionResult<Self> {
        let mut child = Command::new(&config.interpreter)
            .args(&config.args)
            .arg("-u")
            .arg("-c")
            .arg(DRIVER_SOURCE)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| SessionError::Spawn {
                interpreter: config.interpreter.display().to_string(),
                source,
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| SessionError::protocol("interpreter stdin unavailable"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| SessionError::protocol("interpreter stdout unavailable"))?;

        Ok(Self {
            child,
            stdin,
            responses: BufReader::new(stdout).lines(),
            in_flight: false,
        })
    }

    async fn round_trip(&mut self, code: &str) -> SessionResult<WireResponse> {
        let mut request = serde_json::to_string(&WireRequest { code })
            .map_err(|err| SessionError::protocol(err.to_string()))?;
        request.push('\n');

        self.in_flight = true;
        self.stdin.write_all(request.as_bytes()).await?;
        self.stdin.flush().await?;

        let line = self
            .responses
            .next_line()
            .await?
            .ok_or(SessionError::Terminated)?;
        self.in_flight = false;
        serde_json::from_str(&line).map_err(|err| SessionError::protocol(err.to_string()))
    }
}

#[derive(Serialize)]
struct WireRequest<'a> {
    code: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireResponse {
    stdout: String,
    stderr: String,
    result: Option<String>,
    error_before_exec: Option<String>,
    error_in_exec: Option<String>,
    protocol_error: Option<String>,
}

impl WireResponse {
    fn into_outcome(self) -> SessionResult<FragmentOutcome> {
        if let Some(reason) = self.protocol_error {
            return Err(SessionError::protocol(reason));
        }
        let fault = self
            .error_before_exec
            .map(ExecutionFault::PreExecution)
            .or_else(|| self.error_in_exec.map(ExecutionFault::InExecution));
        Ok(FragmentOutcome {
            stdout: self.stdout,
            stderr: self.stderr,
            display: self.result,
            fault,
        })
    }
}

/// Persistent Python session; bindings survive between submissions.
///
/// The child process is killed when the session is dropped.
pub struct PythonSession {
    id: Uuid,
    config: PythonSessionConfig,
    process: Option<DriverProcess>,
}

impl fmt::Debug for PythonSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PythonSession")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("running", &self.process.is_some())
            .finish()
    }
}

impl PythonSession {
    /// Launches the interpreter and returns a ready session.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Spawn`] when the interpreter cannot be started.
    pub fn start(config: PythonSessionConfig) -> SessionResult<Self> {
        let process = DriverProcess::spawn(&config)?;
        let id = Uuid::new_v4();
        info!(
            session = %id,
            interpreter = %config.interpreter.display(),
            "python session started"
        );
        Ok(Self {
            id,
            config,
            process: Some(process),
        })
    }

    /// Returns the identifier used in log records for this session.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the launch configuration.
    #[must_use]
    pub fn config(&self) -> &PythonSessionConfig {
        &self.config
    }
}

#[async_trait]
impl InteractiveSession for PythonSession {
    fn language(&self) -> &str {
        "python"
    }

    async fn submit(&mut self, code: &str) -> SessionResult<FragmentOutcome> {
        let process = self.process.as_mut().ok_or(SessionError::Terminated)?;
        if process.in_flight {
            warn!(
                session = %self.id,
                "previous submission was interrupted; discarding python process"
            );
            self.process = None;
            return Err(SessionError::Terminated);
        }
        let response = process.round_trip(code).await;
        match response {
            Ok(response) => {
                debug!(session = %self.id, bytes = code.len(), "fragment evaluated");
                response.into_outcome()
            }
            Err(err) => {
                warn!(session = %self.id, error = %err, "python session failed");
                if matches!(err, SessionError::Terminated | SessionError::Io { .. }) {
                    self.process = None;
                }
                Err(err)
            }
        }
    }

    async fn restart(&mut self) -> SessionResult<()> {
        if let Some(mut process) = self.process.take() {
            if let Err(err) = process.child.kill().await {
                warn!(session = %self.id, error = %err, "failed to kill python process");
            }
        }
        self.process = Some(DriverProcess::spawn(&self.config)?);
        info!(session = %self.id, "python session restarted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn python_available() -> bool {
        std::process::Command::new("python3")
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok_and(|status| status.success())
    }

    fn session() -> Option<PythonSession> {
        if !python_available() {
            eprintln!("python3 not found; skipping");
            return None;
        }
        Some(PythonSession::start(PythonSessionConfig::default()).expect("start python"))
    }

    #[test]
    fn wire_response_maps_faults() {
        let response = WireResponse {
            stdout: "a".into(),
            error_in_exec: Some("ZeroDivisionError: division by zero".into()),
            ..WireResponse::default()
        };
        let outcome = response.into_outcome().unwrap();
        assert_eq!(
            outcome.fault,
            Some(ExecutionFault::InExecution(
                "ZeroDivisionError: division by zero".into()
            ))
        );

        let broken = WireResponse {
            protocol_error: Some("bad request".into()),
            ..WireResponse::default()
        };
        assert!(matches!(
            broken.into_outcome(),
            Err(SessionError::Protocol { .. })
        ));
    }

    #[tokio::test]
    async fn missing_interpreter_is_spawn_error() {
        let err = PythonSession::start(PythonSessionConfig::new("/nonexistent/python-ave"))
            .expect_err("spawn should fail");
        assert!(matches!(err, SessionError::Spawn { .. }));
    }

    #[tokio::test]
    async fn bindings_persist_and_output_is_captured() {
        let Some(mut session) = session() else { return };

        let first = session.submit("x = 40\nimport math").await.unwrap();
        assert_eq!(first, FragmentOutcome::default());

        let second = session.submit("print(x)\nx + 2").await.unwrap();
        assert_eq!(second.stdout, "40\n");
        assert_eq!(second.display.as_deref(), Some("42"));
        assert!(second.fault.is_none());
    }

    #[tokio::test]
    async fn stderr_and_raw_fd_writes_do_not_leak() {
        let Some(mut session) = session() else { return };

        let outcome = session
            .submit("import os, sys\nos.write(1, b'raw')\nprint('warn', file=sys.stderr)")
            .await
            .unwrap();
        assert_eq!(outcome.stderr, "warn\n");
        assert!(outcome.stdout.is_empty());

        // The protocol stream survived the raw write.
        let after = session.submit("'still here'").await.unwrap();
        assert_eq!(after.display.as_deref(), Some("still here"));
    }

    #[tokio::test]
    async fn syntax_and_runtime_faults_are_distinct() {
        let Some(mut session) = session() else { return };

        let syntax = session.submit("x = = 1").await.unwrap();
        assert!(matches!(syntax.fault, Some(ExecutionFault::PreExecution(ref m)) if m.contains("SyntaxError")));

        let runtime = session.submit("print('before')\n1/0").await.unwrap();
        assert_eq!(runtime.stdout, "before\n");
        assert!(matches!(runtime.fault, Some(ExecutionFault::InExecution(ref m)) if m.contains("division by zero")));
    }

    #[tokio::test]
    async fn restart_clears_bindings() {
        let Some(mut session) = session() else { return };

        session.submit("token = 7").await.unwrap();
        session.restart().await.unwrap();
        let outcome = session.submit("token").await.unwrap();
        assert!(matches!(outcome.fault, Some(ExecutionFault::InExecution(ref m)) if m.contains("NameError")));
    }
    #[tokio::test]
    async fn interrupted_submission_never_leaks_its_reply() {
        let Some(mut session) = session() else { return };

        let slow = tokio::time::timeout(
            Duration::from_millis(200),
            session.submit("import time\ntime.sleep(1)\n'slow'"),
        )
        .await;
        assert!(slow.is_err(), "slow fragment should time out");
        tokio::time::sleep(Duration::from_millis(1200)).await;

        let err = session.submit("'fast'").await.expect_err("stale session");
        assert!(matches!(err, SessionError::Terminated));

        session.restart().await.unwrap();
        let fast = session.submit("'fast'").await.unwrap();
        assert_eq!(fast.display.as_deref(), Some("fast"));
    }

    #[tokio::test]
    async fn trailing_semicolon_suppresses_display() {
        let Some(mut session) = session() else { return };

        let quiet = session.submit("value = 3\nvalue;").await.unwrap();
        assert_eq!(quiet, FragmentOutcome::default());

        let shown = session.submit("value").await.unwrap();
        assert_eq!(shown.display.as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn lone_surrogates_survive_the_wire() {
        let Some(mut session) = session() else { return };

        let outcome = session.submit("print('\\ud800')").await.unwrap();
        assert_eq!(outcome.stdout, "\\ud800\n");
        assert!(outcome.fault.is_none());

        let after = session.submit("'ok'").await.unwrap();
        assert_eq!(after.display.as_deref(), Some("ok"));
    }
}
