//! Runtime catalog: the (language, version) pairs the execution service accepts.
//!
//! The catalog is normally fetched from the service. When that fails the
//! compiler keeps working off a static list, and the variant records which of
//! the two the caller is looking at.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Runtime {
    pub language: String,
    pub version: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl Runtime {
    pub fn new(language: &str, version: &str, aliases: &[&str]) -> Self {
        Self {
            language: language.to_string(),
            version: version.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Case-insensitive match on the language name or any alias
    pub fn matches(&self, name: &str) -> bool {
        self.language.eq_ignore_ascii_case(name)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeCatalog {
    Fetched(Vec<Runtime>),
    Fallback(Vec<Runtime>),
}

impl RuntimeCatalog {
    pub fn fallback() -> Self {
        RuntimeCatalog::Fallback(fallback_runtimes())
    }

    pub fn runtimes(&self) -> &[Runtime] {
        match self {
            RuntimeCatalog::Fetched(runtimes) | RuntimeCatalog::Fallback(runtimes) => runtimes,
        }
    }

    pub fn into_runtimes(self) -> Vec<Runtime> {
        match self {
            RuntimeCatalog::Fetched(runtimes) | RuntimeCatalog::Fallback(runtimes) => runtimes,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, RuntimeCatalog::Fallback(_))
    }

    /// First runtime matching `name` by language or alias
    pub fn find(&self, name: &str) -> Option<&Runtime> {
        self.runtimes().iter().find(|runtime| runtime.matches(name))
    }

    pub fn versions(&self, name: &str) -> Vec<&str> {
        self.runtimes()
            .iter()
            .filter(|runtime| runtime.matches(name))
            .map(|runtime| runtime.version.as_str())
            .collect()
    }

    /// Distinct language names in catalog order
    pub fn languages(&self) -> Vec<&str> {
        let mut languages: Vec<&str> = Vec::new();
        for runtime in self.runtimes() {
            if !languages.contains(&runtime.language.as_str()) {
                languages.push(runtime.language.as_str());
            }
        }
        languages
    }

    pub fn len(&self) -> usize {
        self.runtimes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.runtimes().is_empty()
    }
}

/// Static runtime list used when the service cannot be reached
pub fn fallback_runtimes() -> Vec<Runtime> {
    vec![
        Runtime::new("python", "3.10.0", &["py", "py3", "python3"]),
        Runtime::new("javascript", "18.15.0", &["js", "node", "node-javascript"]),
        Runtime::new("typescript", "5.0.3", &["ts", "node-ts", "tsc"]),
        Runtime::new("java", "15.0.2", &[]),
        Runtime::new("c", "10.2.0", &["gcc"]),
        Runtime::new("cpp", "10.2.0", &["c++", "g++"]),
        Runtime::new("csharp", "6.12.0", &["mono", "cs", "c#"]),
        Runtime::new("go", "1.16.2", &["golang"]),
        Runtime::new("rust", "1.68.2", &["rs"]),
        Runtime::new("php", "8.2.3", &[]),
        Runtime::new("ruby", "3.0.1", &["rb"]),
        Runtime::new("kotlin", "1.8.20", &["kt"]),
        Runtime::new("swift", "5.3.3", &[]),
    ]
}
