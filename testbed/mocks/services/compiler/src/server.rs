use axum::{
    routing::{get, post},
    Router,
};
use serde_json::Value;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::fixtures::{MockBehavior, MockReply, RuntimesBehavior};
use crate::handlers::{execute, health_check, list_languages, list_runtimes};

pub struct MockState {
    pub(crate) replies: Mutex<VecDeque<MockReply>>,
    pub(crate) runtimes: RuntimesBehavior,
    pub(crate) requests: Mutex<Vec<Value>>,
    pub(crate) auth_headers: Mutex<Vec<Option<String>>>,
    pub(crate) runtime_hits: AtomicUsize,
}

impl MockState {
    fn new(behavior: MockBehavior) -> Self {
        Self {
            replies: Mutex::new(VecDeque::from(behavior.replies)),
            runtimes: behavior.runtimes,
            requests: Mutex::new(Vec::new()),
            auth_headers: Mutex::new(Vec::new()),
            runtime_hits: AtomicUsize::new(0),
        }
    }
}

fn router(state: Arc<MockState>) -> Router {
    let compiler = Router::new()
        .route("/compiler/health", get(health_check))
        .route("/compiler/runtimes", get(list_runtimes))
        .route("/compiler/languages", get(list_languages))
        .route("/compiler/execute", post(execute));

    Router::new()
        .nest("/api", compiler)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// In-process fake of the execution service, bound to an ephemeral port
pub struct MockCompilerServer {
    addr: SocketAddr,
    shutdown_tx: tokio::sync::oneshot::Sender<()>,
    state: Arc<MockState>,
}

impl MockCompilerServer {
    pub async fn start(behavior: MockBehavior) -> anyhow::Result<Self> {
        let state = Arc::new(MockState::new(behavior));
        let app = router(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tracing::info!("Mock compiler server listening on {}", addr);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await;
            if let Err(e) = result {
                tracing::error!("Mock compiler server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            shutdown_tx,
            state,
        })
    }

    /// Serve until the process exits. Used by the standalone binary.
    pub async fn serve(addr: &str, behavior: MockBehavior) -> anyhow::Result<()> {
        let addr: SocketAddr = addr.parse()?;
        let app = router(Arc::new(MockState::new(behavior)));
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Starting Compiler Mock Server on {}", addr);
        axum::serve(listener, app)
            .await
            .map_err(|e| anyhow::anyhow!("Mock compiler server error: {}", e))
    }

    /// Base URL to configure clients with, `/compiler/*` lives under it
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    pub fn recorded_requests(&self) -> Vec<Value> {
        self.state
            .requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    pub fn recorded_auth_headers(&self) -> Vec<Option<String>> {
        self.state
            .auth_headers
            .lock()
            .map(|headers| headers.clone())
            .unwrap_or_default()
    }

    pub fn runtime_hits(&self) -> usize {
        self.state.runtime_hits.load(Ordering::SeqCst)
    }

    pub async fn shutdown(self) {
        if self.shutdown_tx.send(()).is_err() {
            tracing::warn!("Mock compiler server already stopped");
        }
    }
}
