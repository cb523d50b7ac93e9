//! End-to-end tests of the HTTP dispatcher against the mock execution service

use arena_compiler_client::{fetch_catalog, CompilerService, CompilerSession, HttpCompilerClient};
use arena_core::{
    CompilerConfig, ExecutionError, ExecutionOutcome, ExecutionRequest, RuntimeCatalog,
};
use compiler_mock::{
    compile_failure, run_response, MockBehavior, MockCompilerServer, MockReply, RuntimesBehavior,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn hello_request() -> ExecutionRequest {
    ExecutionRequest::new("python", "3.10.0", "print(\"hi\")").with_stdin("")
}

async fn error_for(reply: MockReply) -> ExecutionError {
    let server = MockCompilerServer::start(MockBehavior::with_replies(vec![reply]))
        .await
        .unwrap();
    let client = HttpCompilerClient::new(server.base_url());
    let err = client.execute(&hello_request()).await.unwrap_err();
    server.shutdown().await;
    err
}

#[tokio::test]
async fn test_successful_python_execution() -> anyhow::Result<()> {
    init_logger();
    let behavior = MockBehavior::with_replies(vec![MockReply::Respond {
        response: run_response("python", "3.10.0", "hi\n", 0),
    }]);
    let server = MockCompilerServer::start(behavior).await?;
    let client = HttpCompilerClient::new(server.base_url());

    let response = client.execute(&hello_request()).await?;
    assert_eq!(response.run.code, Some(0));
    assert_eq!(response.run.stdout, "hi\n");
    assert!(response.compile.is_none());
    assert_eq!(response.outcome(), ExecutionOutcome::Success);

    let recorded = server.recorded_requests();
    assert_eq!(
        recorded,
        vec![json!({"language": "python", "version": "3.10.0", "code": "print(\"hi\")", "stdin": ""})]
    );

    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_fixed_status_classification() {
    init_logger();
    let timeout = error_for(MockReply::Status {
        status: 408,
        message: Some("ignored".to_string()),
    })
    .await;
    assert_eq!(timeout, ExecutionError::Timeout);
    assert_eq!(timeout.to_string(), "Code execution timed out (30s limit exceeded)");

    let limited = error_for(MockReply::Status {
        status: 429,
        message: None,
    })
    .await;
    assert_eq!(
        limited.to_string(),
        "Too many requests. Please wait before executing again."
    );

    let unavailable = error_for(MockReply::Status {
        status: 503,
        message: None,
    })
    .await;
    assert_eq!(
        unavailable.to_string(),
        "Compiler service is currently unavailable. Please try again later."
    );
}

#[tokio::test]
async fn test_server_message_passthrough() {
    init_logger();
    let err = error_for(MockReply::Status {
        status: 400,
        message: Some("Runtime python-2.7 is unknown".to_string()),
    })
    .await;
    assert_eq!(
        err,
        ExecutionError::ServerReported("Runtime python-2.7 is unknown".to_string())
    );

    let err = error_for(MockReply::Envelope {
        body: json!({"success": false, "message": "Code is too long"}),
    })
    .await;
    assert_eq!(err.to_string(), "Code is too long");
}

#[tokio::test]
async fn test_unclassifiable_failures_are_generic() {
    init_logger();
    let generic = "Code execution failed. Please check your code and try again.";

    let err = error_for(MockReply::Raw {
        status: 500,
        body: "Internal Server Error".to_string(),
    })
    .await;
    assert_eq!(err.to_string(), generic);

    let err = error_for(MockReply::Raw {
        status: 200,
        body: "{not json".to_string(),
    })
    .await;
    assert_eq!(err.to_string(), generic);

    let err = error_for(MockReply::Envelope {
        body: json!({"success": true}),
    })
    .await;
    assert_eq!(err.to_string(), generic);
}

#[tokio::test]
async fn test_network_failure_is_generic() {
    init_logger();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpCompilerClient::new(format!("http://{}/api", addr));
    let err = client.execute(&hello_request()).await.unwrap_err();
    assert!(matches!(err, ExecutionError::UnknownFailure { .. }));
}

#[tokio::test]
async fn test_client_timeout_is_classified_as_timeout() {
    init_logger();
    let behavior = MockBehavior::with_replies(vec![MockReply::Delay {
        delay_ms: 2_000,
        response: run_response("python", "3.10.0", "late\n", 0),
    }]);
    let server = MockCompilerServer::start(behavior).await.unwrap();
    let client =
        HttpCompilerClient::new(server.base_url()).with_timeout(Duration::from_millis(200));

    let err = client.execute(&hello_request()).await.unwrap_err();
    assert_eq!(err, ExecutionError::Timeout);
    server.shutdown().await;
}

#[tokio::test]
async fn test_compile_failure_resolves() {
    init_logger();
    let behavior = MockBehavior::with_replies(vec![MockReply::Respond {
        response: compile_failure("cpp", "10.2.0", "main.cpp:1: error: expected ';'"),
    }]);
    let server = MockCompilerServer::start(behavior).await.unwrap();
    let client = HttpCompilerClient::new(server.base_url());

    let request = ExecutionRequest::new("cpp", "10.2.0", "int main() { return 0 }");
    let response = client.execute(&request).await.unwrap();
    assert_eq!(response.outcome(), ExecutionOutcome::CompileError { code: 1 });
    assert!(response.compile.unwrap().stderr.contains("expected ';'"));
    server.shutdown().await;
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    init_logger();
    let server = MockCompilerServer::start(MockBehavior::default()).await.unwrap();
    let client = HttpCompilerClient::new(server.base_url()).with_auth_token("session-token");

    client.execute(&hello_request()).await.unwrap();
    assert_eq!(
        server.recorded_auth_headers(),
        vec![Some("Bearer session-token".to_string())]
    );
    server.shutdown().await;
}

#[tokio::test]
async fn test_runtime_catalog_live_and_fallback() {
    init_logger();
    let server = MockCompilerServer::start(MockBehavior::default()).await.unwrap();
    let client = HttpCompilerClient::new(server.base_url());
    let catalog = fetch_catalog(&client).await;
    assert!(matches!(catalog, RuntimeCatalog::Fetched(_)));
    assert_eq!(catalog.find("py").unwrap().version, "3.12.0");
    server.shutdown().await;

    for runtimes in [
        RuntimesBehavior::Fail { status: 500 },
        RuntimesBehavior::Malformed,
        RuntimesBehavior::Empty,
    ] {
        let server = MockCompilerServer::start(MockBehavior::default().with_runtimes(runtimes))
            .await
            .unwrap();
        let client = HttpCompilerClient::new(server.base_url());
        let catalog = fetch_catalog(&client).await;
        assert!(catalog.is_fallback());
        assert!(!catalog.is_empty());
        server.shutdown().await;
    }
}

#[tokio::test]
async fn test_languages_and_health() {
    init_logger();
    let server = MockCompilerServer::start(MockBehavior::default()).await.unwrap();
    let client = HttpCompilerClient::new(server.base_url());

    let languages = client.languages().await.unwrap();
    assert!(languages.contains(&"python".to_string()));

    let health = client.health_check().await.unwrap();
    assert!(health.is_healthy());
    assert!(!health.timestamp.is_empty());
    server.shutdown().await;
}

#[tokio::test]
async fn test_session_history_through_http() {
    init_logger();
    let mut replies: Vec<MockReply> = (0..12)
        .map(|i| MockReply::Respond {
            response: run_response("python", "3.10.0", &format!("{}\n", i), 0),
        })
        .collect();
    replies.push(MockReply::Status {
        status: 503,
        message: None,
    });
    let server = MockCompilerServer::start(MockBehavior::with_replies(replies))
        .await
        .unwrap();
    let client = Arc::new(HttpCompilerClient::new(server.base_url()));
    let session = CompilerSession::from_config(client, &CompilerConfig::default());

    for i in 0..12 {
        session
            .with_state(|state| state.update_code(format!("print({})", i)))
            .await;
        session.execute().await.unwrap().unwrap();
    }

    let err = session.execute().await.unwrap_err();
    assert_eq!(err, ExecutionError::ServiceUnavailable);

    let state = session.snapshot().await;
    let codes: Vec<String> = state.history().iter().map(|e| e.code.clone()).collect();
    let expected: Vec<String> = (2..12).rev().map(|i| format!("print({})", i)).collect();
    assert_eq!(codes, expected);
    assert_eq!(
        state.error(),
        Some("Compiler service is currently unavailable. Please try again later.")
    );

    assert_eq!(session.runtimes().await.find("python").unwrap().version, "3.12.0");
    session.runtimes().await;
    assert_eq!(server.runtime_hits(), 1);
    server.shutdown().await;
}

#[tokio::test]
async fn test_abandoned_execute_still_settles_state() {
    init_logger();
    let behavior = MockBehavior::with_replies(vec![MockReply::Delay {
        delay_ms: 1_000,
        response: run_response("python", "3.10.0", "late\n", 0),
    }]);
    let server = MockCompilerServer::start(behavior).await.unwrap();
    let client = Arc::new(HttpCompilerClient::new(server.base_url()));
    let session = CompilerSession::from_config(client, &CompilerConfig::default());
    session.with_state(|state| state.update_code("print(\"late\")")).await;

    let abandoned = tokio::time::timeout(Duration::from_millis(100), session.execute()).await;
    assert!(abandoned.is_err());
    assert!(session.snapshot().await.is_executing());

    tokio::time::sleep(Duration::from_millis(1_500)).await;
    let state = session.snapshot().await;
    assert!(!state.is_executing());
    assert_eq!(state.output().unwrap().run.stdout, "late\n");
    assert_eq!(state.history().len(), 1);
    server.shutdown().await;
}

#[tokio::test]
async fn test_killed_process_without_exit_code() {
    init_logger();
    let behavior = MockBehavior::with_replies(vec![MockReply::Respond {
        response: json!({
            "language": "python",
            "version": "3.10.0",
            "run": {"stdout": "", "stderr": "", "code": null, "signal": "SIGKILL", "output": ""}
        }),
    }]);
    let server = MockCompilerServer::start(behavior).await.unwrap();
    let client = HttpCompilerClient::new(server.base_url());

    let request = ExecutionRequest::new("python", "3.10.0", "while True: pass");
    let response = client.execute(&request).await.unwrap();
    assert_eq!(response.run.code, None);
    assert_eq!(response.outcome(), ExecutionOutcome::RuntimeError { code: 137 });
    server.shutdown().await;
}
