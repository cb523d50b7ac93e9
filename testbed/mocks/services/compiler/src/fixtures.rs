use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// One scripted answer for `POST /compiler/execute`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MockReply {
    /// 200 with `{success: true, data: response}`
    Respond { response: Value },
    /// Non-2xx status with an optional `{success: false, message}` body
    Status {
        status: u16,
        #[serde(default)]
        message: Option<String>,
    },
    /// Wait before answering like `Respond`
    Delay { delay_ms: u64, response: Value },
    /// 200 with an arbitrary JSON body
    Envelope { body: Value },
    /// Arbitrary status and raw text body
    Raw { status: u16, body: String },
}

/// How `GET /compiler/runtimes` behaves
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuntimesBehavior {
    #[default]
    Fixture,
    Serve { runtimes: Vec<Value> },
    Empty,
    Fail { status: u16 },
    Malformed,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MockBehavior {
    #[serde(default)]
    pub replies: Vec<MockReply>,
    #[serde(default)]
    pub runtimes: RuntimesBehavior,
}

impl MockBehavior {
    pub fn with_replies(replies: Vec<MockReply>) -> Self {
        Self {
            replies,
            ..Default::default()
        }
    }

    pub fn with_runtimes(mut self, runtimes: RuntimesBehavior) -> Self {
        self.runtimes = runtimes;
        self
    }

    pub fn from_yaml(yaml_content: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(yaml_content)?)
    }
}

/// Execute response for an interpreted language
pub fn run_response(language: &str, version: &str, stdout: &str, code: i32) -> Value {
    json!({
        "language": language,
        "version": version,
        "run": {
            "stdout": stdout,
            "stderr": "",
            "code": code,
            "output": stdout,
        }
    })
}

/// Execute response whose compile stage failed
pub fn compile_failure(language: &str, version: &str, stderr: &str) -> Value {
    json!({
        "language": language,
        "version": version,
        "compile": {
            "stdout": "",
            "stderr": stderr,
            "code": 1,
            "output": stderr,
        },
        "run": {
            "stdout": "",
            "stderr": "",
            "code": 1,
            "output": "",
        }
    })
}

pub fn fixture_runtimes() -> Vec<Value> {
    vec![
        json!({"language": "python", "version": "3.12.0", "aliases": ["py", "py3", "python3"]}),
        json!({"language": "javascript", "version": "20.11.1", "aliases": ["js", "node"]}),
        json!({"language": "cpp", "version": "10.2.0", "aliases": ["c++", "g++"]}),
        json!({"language": "rust", "version": "1.68.2", "aliases": ["rs"]}),
    ]
}
