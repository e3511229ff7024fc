//! External program invocation
//!
//! Commands are built as a program plus an argument vector and spawned
//! directly. Nothing here goes through a shell, so paths and parameters
//! reach the child exactly as given.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;

/// Errors raised while running an external program
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("{program} not found on PATH")]
    NotFound { program: String },

    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} timed out after {secs}s")]
    TimedOut { program: String, secs: u64 },
}

/// A program and its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: OsString,
    pub args: Vec<OsString>,
}

impl Invocation {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Append several arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Program name as displayed in messages
    pub fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    /// Arguments as lossy strings
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", shell_quote(&self.program.to_string_lossy()))?;
        for arg in &self.args {
            write!(f, " {}", shell_quote(&arg.to_string_lossy()))?;
        }
        Ok(())
    }
}

/// Quote a word so it can be pasted into a POSIX shell
pub fn shell_quote(word: &str) -> String {
    let safe = |c: char| c.is_ascii_alphanumeric() || "_-./=:,+@%".contains(c);

    if !word.is_empty() && word.chars().all(safe) {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

/// Captured result of a finished program
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Exit code (None if killed by a signal)
    pub code: Option<i32>,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: u64,
}

impl ToolOutput {
    /// Last `max_lines` lines of stderr, trimmed
    pub fn stderr_tail(&self, max_lines: usize) -> String {
        let lines: Vec<&str> = self.stderr.trim_end().lines().collect();
        let start = lines.len().saturating_sub(max_lines);
        lines[start..].join("\n")
    }
}

/// Run an invocation to completion, optionally bounded by a timeout
///
/// The child is killed if the timeout elapses.
pub async fn run(
    invocation: &Invocation,
    limit: Option<Duration>,
) -> Result<ToolOutput, ProcessError> {
    let program = invocation.program_name();

    let start = Instant::now();
    let child = Command::new(&invocation.program)
        .args(&invocation.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ProcessError::NotFound {
                program: program.clone(),
            },
            _ => ProcessError::Spawn {
                program: program.clone(),
                source: e,
            },
        })?;

    let output = match limit {
        Some(limit) => match timeout(limit, child.wait_with_output()).await {
            Ok(result) => result,
            Err(_) => {
                return Err(ProcessError::TimedOut {
                    program,
                    secs: limit.as_secs(),
                })
            }
        },
        None => child.wait_with_output().await,
    }
    .map_err(|e| ProcessError::Spawn {
        program: program.clone(),
        source: e,
    })?;

    Ok(ToolOutput {
        code: output.status.code(),
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        duration_ms: start.elapsed().as_millis() as u64,
    })
}

/// Locate a program on PATH
pub fn find_tool(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}
