//! A compiler session ties one execution service to one compiler state.
//!
//! The state lock is released while a dispatch is in flight, so several
//! executions may overlap. Completions are applied in issue order by the
//! state's sequence check; an older response arriving late is reported back
//! to its caller but does not touch the visible output or the history.
//!
//! Each dispatch runs on its own task and settles the state there, so a
//! caller that stops waiting (a timeout, a cancelled select) cannot leave the
//! session marked as executing.

use arena_core::{
    ArenaError, Completion, CompilerConfig, CompilerState, ExecutionError, ExecutionOutcome,
    ExecutionResponse, Runtime, RuntimeCatalog,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::catalog_cache::CatalogCache;
use crate::CompilerService;

#[derive(Debug, Clone)]
pub struct ExecutionReport {
    /// History id, `None` when a newer dispatch had already completed
    pub entry_id: Option<String>,
    pub response: ExecutionResponse,
    pub outcome: ExecutionOutcome,
}

impl ExecutionReport {
    pub fn is_stale(&self) -> bool {
        self.entry_id.is_none()
    }
}

pub struct CompilerSession {
    service: Arc<dyn CompilerService>,
    state: Arc<Mutex<CompilerState>>,
    catalog: CatalogCache,
}

impl CompilerSession {
    pub fn new(service: Arc<dyn CompilerService>, state: CompilerState, catalog_ttl: Duration) -> Self {
        Self {
            service,
            state: Arc::new(Mutex::new(state)),
            catalog: CatalogCache::new(catalog_ttl),
        }
    }

    pub fn from_config(service: Arc<dyn CompilerService>, config: &CompilerConfig) -> Self {
        Self::new(service, CompilerState::from_config(config), config.catalog_ttl())
    }

    pub fn service(&self) -> &Arc<dyn CompilerService> {
        &self.service
    }

    /// Run `f` against the state under the lock
    pub async fn with_state<R>(&self, f: impl FnOnce(&mut CompilerState) -> R) -> R {
        let mut state = self.state.lock().await;
        f(&mut state)
    }

    /// Copy of the current state
    pub async fn snapshot(&self) -> CompilerState {
        self.state.lock().await.clone()
    }

    /// Execute the current editor contents. `Ok(None)` means the code was
    /// blank and nothing was sent.
    pub async fn execute(&self) -> Result<Option<ExecutionReport>, ExecutionError> {
        let ticket = match self.state.lock().await.begin_execution() {
            Some(ticket) => ticket,
            None => return Ok(None),
        };

        let service = Arc::clone(&self.service);
        let state = Arc::clone(&self.state);
        let dispatch = tokio::spawn(async move {
            let result = service.execute(ticket.request()).await;
            let completion = state.lock().await.complete_execution(ticket, result.clone());
            (result, completion)
        });

        let (result, completion) = dispatch
            .await
            .map_err(|e| ExecutionError::unknown(format!("dispatch task failed: {}", e)))?;

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                log::warn!("Execution failed ({}): {}", err.kind(), err);
                return Err(err);
            }
        };

        let outcome = response.outcome();
        log::info!(
            "Executed {} {}: {}",
            response.language,
            response.version,
            outcome.summary()
        );

        let entry_id = match completion {
            Completion::Recorded(id) => Some(id),
            _ => None,
        };

        Ok(Some(ExecutionReport {
            entry_id,
            response,
            outcome,
        }))
    }

    pub async fn runtimes(&self) -> RuntimeCatalog {
        self.catalog.get(self.service.as_ref()).await
    }

    pub async fn refresh_runtimes(&self) -> RuntimeCatalog {
        self.catalog.invalidate().await;
        self.runtimes().await
    }

    /// Switch to `name` (language or alias) at the first catalog version
    pub async fn select_language(&self, name: &str) -> Result<Runtime, ArenaError> {
        let catalog = self.runtimes().await;
        let runtime = catalog.find(name).cloned().ok_or_else(|| {
            ArenaError::ValidationError(format!("Unknown language '{}'", name))
        })?;

        self.with_state(|state| state.change_language(&runtime.language, &runtime.version))
            .await;
        Ok(runtime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HealthStatus;
    use arena_core::{ExecutionRequest, StageOutput};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;

    /// Replays scripted results in order, recording every request
    struct ScriptedService {
        results: StdMutex<VecDeque<Result<ExecutionResponse, ExecutionError>>>,
        requests: StdMutex<Vec<ExecutionRequest>>,
    }

    impl ScriptedService {
        fn new(results: Vec<Result<ExecutionResponse, ExecutionError>>) -> Arc<Self> {
            Arc::new(Self {
                results: StdMutex::new(results.into()),
                requests: StdMutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl CompilerService for ScriptedService {
        async fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionResponse, ExecutionError> {
            self.requests.lock().unwrap().push(request.clone());
            self.results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ExecutionError::unknown("script exhausted")))
        }

        async fn runtimes(&self) -> Result<Vec<Runtime>, ArenaError> {
            Err(ArenaError::HttpError("offline".to_string()))
        }

        async fn languages(&self) -> Result<Vec<String>, ArenaError> {
            Ok(vec!["python".to_string()])
        }

        async fn health_check(&self) -> Result<HealthStatus, ArenaError> {
            Err(ArenaError::HttpError("offline".to_string()))
        }
    }

    fn python(stdout: &str, code: i32) -> ExecutionResponse {
        ExecutionResponse {
            language: "python".to_string(),
            version: "3.10.0".to_string(),
            run: StageOutput {
                stdout: stdout.to_string(),
                stderr: String::new(),
                code: Some(code),
                signal: None,
                output: stdout.to_string(),
            },
            compile: None,
        }
    }

    fn session(service: Arc<ScriptedService>) -> CompilerSession {
        CompilerSession::from_config(service, &CompilerConfig::default())
    }

    #[tokio::test]
    async fn test_successful_execution_recorded() {
        let service = ScriptedService::new(vec![Ok(python("hi\n", 0))]);
        let session = session(service.clone());
        session
            .with_state(|state| {
                state.update_code("print(\"hi\")");
                state.update_stdin("");
            })
            .await;

        let report = session.execute().await.unwrap().unwrap();
        assert_eq!(report.response.run.code, Some(0));
        assert!(report.outcome.is_success());

        let state = session.snapshot().await;
        assert_eq!(state.history().latest().unwrap().id, report.entry_id.unwrap());
        assert!(!state.is_executing());

        let sent = service.requests.lock().unwrap().clone();
        assert_eq!(sent, vec![ExecutionRequest::new("python", "3.10.0", "print(\"hi\")").with_stdin("")]);
    }

    #[tokio::test]
    async fn test_failed_execution_not_recorded() {
        let service = ScriptedService::new(vec![Err(ExecutionError::ServiceUnavailable)]);
        let session = session(service);
        session.with_state(|state| state.update_code("print(1)")).await;

        let err = session.execute().await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Compiler service is currently unavailable. Please try again later."
        );

        let state = session.snapshot().await;
        assert!(state.history().is_empty());
        assert_eq!(state.error(), Some(err.to_string().as_str()));
    }

    #[tokio::test]
    async fn test_blank_code_sends_nothing() {
        let service = ScriptedService::new(Vec::new());
        let session = session(service.clone());
        session.with_state(|state| state.update_code("")).await;

        assert!(session.execute().await.unwrap().is_none());
        assert!(service.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_a_report_not_an_error() {
        let service = ScriptedService::new(vec![Ok(python("", 2))]);
        let session = session(service);
        session.with_state(|state| state.update_code("exit(2)")).await;

        let report = session.execute().await.unwrap().unwrap();
        assert_eq!(report.outcome, ExecutionOutcome::RuntimeError { code: 2 });
        assert!(!report.is_stale());
    }

    #[tokio::test]
    async fn test_select_language_uses_fallback_catalog() {
        let service = ScriptedService::new(Vec::new());
        let session = session(service);

        assert!(session.runtimes().await.is_fallback());
        let runtime = session.select_language("c++").await.unwrap();
        assert_eq!(runtime.language, "cpp");

        let state = session.snapshot().await;
        assert_eq!(state.language(), "cpp");
        assert_eq!(state.version(), runtime.version);

        assert!(matches!(
            session.select_language("cobol").await,
            Err(ArenaError::ValidationError(_))
        ));
    }
}
