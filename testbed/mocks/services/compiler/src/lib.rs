//! Mock execution service for testing the compiler client
//!
//! Serves the `/compiler/*` endpoints with scripted replies so that client
//! behaviour under timeouts, rate limiting and outages can be exercised
//! without a real sandbox. No code is ever executed: unscripted execute
//! requests simply echo their stdin back as program output.

pub mod fixtures;
pub mod handlers;
pub mod server;

pub use fixtures::{compile_failure, run_response, MockBehavior, MockReply, RuntimesBehavior};
pub use server::MockCompilerServer;
