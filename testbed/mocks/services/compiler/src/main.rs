use compiler_mock::{MockBehavior, MockCompilerServer};
use std::env;
use std::fs;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let fixtures_path = env::var("FIXTURES_PATH").unwrap_or_else(|_| "fixtures".to_string());
    let fixture_file = format!("{}/compiler-mock.yaml", fixtures_path);

    let behavior = match fs::read_to_string(&fixture_file) {
        Ok(content) => {
            tracing::info!("Loading mock behavior from {}", fixture_file);
            MockBehavior::from_yaml(&content)?
        }
        Err(_) => {
            tracing::info!("No fixture file found, echoing stdin for every request");
            MockBehavior::default()
        }
    };

    let addr = env::var("MOCK_ADDR").unwrap_or_else(|_| "127.0.0.1:5050".to_string());
    MockCompilerServer::serve(&addr, behavior).await
}
