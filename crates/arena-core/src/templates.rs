//! Starter code shown when the user switches languages.

use crate::catalog::fallback_runtimes;

const PYTHON: &str = r#"# Write your Python code here
print("Hello, World!")
"#;

const JAVASCRIPT: &str = r#"// Write your JavaScript code here
console.log("Hello, World!");
"#;

const TYPESCRIPT: &str = r#"// Write your TypeScript code here
const message: string = "Hello, World!";
console.log(message);
"#;

const JAVA: &str = r#"public class Main {
    public static void main(String[] args) {
        System.out.println("Hello, World!");
    }
}
"#;

const C: &str = r#"#include <stdio.h>

int main() {
    printf("Hello, World!\n");
    return 0;
}
"#;

const CPP: &str = r#"#include <iostream>
using namespace std;

int main() {
    cout << "Hello, World!" << endl;
    return 0;
}
"#;

const CSHARP: &str = r#"using System;

class Program {
    static void Main() {
        Console.WriteLine("Hello, World!");
    }
}
"#;

const GO: &str = r#"package main

import "fmt"

func main() {
    fmt.Println("Hello, World!")
}
"#;

const RUST: &str = r#"fn main() {
    println!("Hello, World!");
}
"#;

const PHP: &str = r#"<?php
echo "Hello, World!\n";
"#;

const RUBY: &str = r#"# Write your Ruby code here
puts "Hello, World!"
"#;

const KOTLIN: &str = r#"fun main() {
    println("Hello, World!")
}
"#;

const SWIFT: &str = r#"print("Hello, World!")
"#;

const GENERIC: &str = "// Write your code here\n";

/// Resolve aliases (`py`, `c++`, ...) to the canonical language name.
fn canonical(language: &str) -> String {
    fallback_runtimes()
        .into_iter()
        .find(|runtime| runtime.matches(language))
        .map(|runtime| runtime.language)
        .unwrap_or_else(|| language.to_ascii_lowercase())
}

pub fn template_for(language: &str) -> &'static str {
    match canonical(language).as_str() {
        "python" => PYTHON,
        "javascript" => JAVASCRIPT,
        "typescript" => TYPESCRIPT,
        "java" => JAVA,
        "c" => C,
        "cpp" => CPP,
        "csharp" => CSHARP,
        "go" => GO,
        "rust" => RUST,
        "php" => PHP,
        "ruby" => RUBY,
        "kotlin" => KOTLIN,
        "swift" => SWIFT,
        _ => GENERIC,
    }
}

/// Best-effort language guess from a source file extension
pub fn language_for_extension(extension: &str) -> Option<&'static str> {
    let language = match extension.to_ascii_lowercase().as_str() {
        "py" => "python",
        "js" | "mjs" => "javascript",
        "ts" => "typescript",
        "java" => "java",
        "c" | "h" => "c",
        "cpp" | "cc" | "cxx" | "hpp" => "cpp",
        "cs" => "csharp",
        "go" => "go",
        "rs" => "rust",
        "php" => "php",
        "rb" => "ruby",
        "kt" | "kts" => "kotlin",
        "swift" => "swift",
        _ => return None,
    };
    Some(language)
}
