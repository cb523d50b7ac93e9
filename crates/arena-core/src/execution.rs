//! Request and response shapes exchanged with the execution service.
//!
//! A request is a plain language/version/source/stdin tuple. The response
//! carries up to two independent stages (compile and run), each with its own
//! stdout, stderr, combined output and exit code. Whether the user's program
//! exited cleanly is a property of the response, not of the dispatch: a
//! nonzero exit still resolves as a completed execution.

use serde::{Deserialize, Serialize};

/// Payload sent to `POST /compiler/execute`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    pub language: String,
    pub version: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stdin: Option<String>,
}

impl ExecutionRequest {
    pub fn new(
        language: impl Into<String>,
        version: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            language: language.into(),
            version: version.into(),
            code: code.into(),
            stdin: None,
        }
    }

    /// Attach program input. Empty input is kept as-is, the service treats it
    /// the same as no input.
    pub fn with_stdin(mut self, stdin: impl Into<String>) -> Self {
        self.stdin = Some(stdin.into());
        self
    }

    /// Blank source is never sent to the service.
    pub fn is_dispatchable(&self) -> bool {
        !self.code.trim().is_empty()
    }
}

/// Output of a single stage (compile or run)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageOutput {
    #[serde(default)]
    pub stdout: String,
    #[serde(default)]
    pub stderr: String,
    /// `None` when the service killed the process, see `signal`
    #[serde(default)]
    pub code: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal: Option<String>,
    #[serde(default)]
    pub output: String,
}

impl StageOutput {
    pub fn succeeded(&self) -> bool {
        self.code == Some(0)
    }

    /// Exit status as a shell reports it: the process's own code, else
    /// 128 + signal number for a killed process, else 1.
    pub fn exit_code(&self) -> i32 {
        if let Some(code) = self.code {
            return code;
        }
        self.signal
            .as_deref()
            .and_then(signal_number)
            .map(|number| 128 + number)
            .unwrap_or(1)
    }
}

fn signal_number(signal: &str) -> Option<i32> {
    let number = match signal.trim_start_matches("SIG") {
        "HUP" => 1,
        "INT" => 2,
        "QUIT" => 3,
        "ILL" => 4,
        "ABRT" => 6,
        "BUS" => 7,
        "FPE" => 8,
        "KILL" => 9,
        "SEGV" => 11,
        "PIPE" => 13,
        "ALRM" => 14,
        "TERM" => 15,
        "XCPU" => 24,
        "XFSZ" => 25,
        _ => return None,
    };
    Some(number)
}

/// Result returned by the execution service. Immutable once received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResponse {
    pub language: String,
    pub version: String,
    pub run: StageOutput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compile: Option<StageOutput>,
}

impl ExecutionResponse {
    pub fn outcome(&self) -> ExecutionOutcome {
        ExecutionOutcome::from_response(self)
    }

    /// `run.code == Some(0)` is the only success signal.
    pub fn is_success(&self) -> bool {
        self.run.succeeded()
    }
}

/// How a completed execution ended. None of these are dispatch failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExecutionOutcome {
    Success,
    CompileError { code: i32 },
    RuntimeError { code: i32 },
}

impl ExecutionOutcome {
    pub fn from_response(response: &ExecutionResponse) -> Self {
        if let Some(compile) = &response.compile {
            if !compile.succeeded() {
                return ExecutionOutcome::CompileError {
                    code: compile.exit_code(),
                };
            }
        }
        if response.run.succeeded() {
            ExecutionOutcome::Success
        } else {
            ExecutionOutcome::RuntimeError {
                code: response.run.exit_code(),
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionOutcome::Success)
    }

    /// Completed, but worth flagging to the user
    pub fn is_warning(&self) -> bool {
        !self.is_success()
    }

    pub fn summary(&self) -> String {
        match self {
            ExecutionOutcome::Success => "Code executed successfully".to_string(),
            ExecutionOutcome::CompileError { code } => {
                format!("Compilation failed with exit code {}", code)
            }
            ExecutionOutcome::RuntimeError { code } => {
                format!("Program exited with code {}", code)
            }
        }
    }
}
