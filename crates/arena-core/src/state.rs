//! State container for the compiler feature.
//!
//! One owned struct holds the editor contents, the selected runtime, the last
//! execution output or error and the history. It is mutated only through the
//! methods below; callers that share it across tasks wrap it in a mutex.
//!
//! A dispatch is split in two halves so that the lock is not held across the
//! network round trip: [`CompilerState::begin_execution`] hands out a ticket
//! carrying a monotonic sequence number, and
//! [`CompilerState::complete_execution`] applies the result. A completion
//! older than the last applied one is discarded, so the visible output always
//! belongs to the most recently *issued* dispatch that has finished.

use crate::config::CompilerConfig;
use crate::errors::ExecutionError;
use crate::execution::{ExecutionRequest, ExecutionResponse};
use crate::history::{ExecutionHistory, HistoryEntry};
use crate::templates::template_for;

/// Proof that a dispatch was started; consumed on completion.
#[derive(Debug)]
pub struct ExecutionTicket {
    seq: u64,
    request: ExecutionRequest,
}

impl ExecutionTicket {
    pub fn sequence(&self) -> u64 {
        self.seq
    }

    pub fn request(&self) -> &ExecutionRequest {
        &self.request
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Successful dispatch, recorded in history under this id
    Recorded(String),
    /// Classified failure, now shown as the current error
    Failed,
    /// A newer dispatch already landed; nothing was changed
    Stale,
}

#[derive(Debug, Clone)]
pub struct CompilerState {
    code: String,
    language: String,
    version: String,
    stdin: String,
    output: Option<ExecutionResponse>,
    error: Option<String>,
    history: ExecutionHistory,
    next_seq: u64,
    last_applied: u64,
    in_flight: usize,
}

impl Default for CompilerState {
    fn default() -> Self {
        Self::from_config(&CompilerConfig::default())
    }
}

impl CompilerState {
    pub fn new(language: impl Into<String>, version: impl Into<String>, history_limit: usize) -> Self {
        let language = language.into();
        Self {
            code: template_for(&language).to_string(),
            language,
            version: version.into(),
            stdin: String::new(),
            output: None,
            error: None,
            history: ExecutionHistory::new(history_limit),
            next_seq: 0,
            last_applied: 0,
            in_flight: 0,
        }
    }

    pub fn from_config(config: &CompilerConfig) -> Self {
        Self::new(
            config.default_language.clone(),
            config.default_version.clone(),
            config.history_limit,
        )
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn stdin(&self) -> &str {
        &self.stdin
    }

    pub fn output(&self) -> Option<&ExecutionResponse> {
        self.output.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_executing(&self) -> bool {
        self.in_flight > 0
    }

    pub fn history(&self) -> &ExecutionHistory {
        &self.history
    }

    pub fn update_code(&mut self, code: impl Into<String>) {
        self.code = code.into();
    }

    /// Switch runtime and replace the editor contents with the language's
    /// starter template.
    pub fn change_language(&mut self, language: impl Into<String>, version: impl Into<String>) {
        self.language = language.into();
        self.version = version.into();
        self.code = template_for(&self.language).to_string();
        self.output = None;
        self.error = None;
    }

    pub fn change_version(&mut self, version: impl Into<String>) {
        self.version = version.into();
    }

    pub fn update_stdin(&mut self, stdin: impl Into<String>) {
        self.stdin = stdin.into();
    }

    pub fn clear_execution_history(&mut self) {
        self.history.clear();
    }

    pub fn remove_history_item(&mut self, id: &str) -> bool {
        self.history.remove(id)
    }

    /// Back to a blank slate for the current runtime. Dispatches still in
    /// flight will come back stale.
    pub fn reset_compiler(&mut self) {
        self.code = template_for(&self.language).to_string();
        self.stdin.clear();
        self.output = None;
        self.error = None;
        self.history.clear();
        self.last_applied = self.next_seq;
    }

    pub fn build_request(&self) -> ExecutionRequest {
        ExecutionRequest::new(&self.language, &self.version, &self.code).with_stdin(&self.stdin)
    }

    /// Start a dispatch for the current editor contents. Returns `None` for
    /// blank code, which is never sent.
    pub fn begin_execution(&mut self) -> Option<ExecutionTicket> {
        let request = self.build_request();
        if !request.is_dispatchable() {
            log::debug!("Skipping execution of blank {} source", request.language);
            return None;
        }

        self.next_seq += 1;
        self.in_flight += 1;
        self.error = None;

        Some(ExecutionTicket {
            seq: self.next_seq,
            request,
        })
    }

    pub fn complete_execution(
        &mut self,
        ticket: ExecutionTicket,
        result: Result<ExecutionResponse, ExecutionError>,
    ) -> Completion {
        self.in_flight = self.in_flight.saturating_sub(1);

        if ticket.seq <= self.last_applied {
            log::debug!(
                "Discarding stale completion #{} (last applied #{})",
                ticket.seq,
                self.last_applied
            );
            return Completion::Stale;
        }
        self.last_applied = ticket.seq;

        match result {
            Ok(response) => {
                let ExecutionRequest {
                    language,
                    version,
                    code,
                    ..
                } = ticket.request;
                let entry = HistoryEntry::new(code, language, version, response.clone());
                let id = entry.id.clone();
                self.history.record(entry);
                self.output = Some(response);
                self.error = None;
                Completion::Recorded(id)
            }
            Err(err) => {
                self.error = Some(err.user_message());
                Completion::Failed
            }
        }
    }
}
