use anyhow::{anyhow, bail, Context, Result};
use arena_compiler_client::{CompilerSession, ExecutionReport};
use arena_core::templates::language_for_extension;
use arena_core::{ArenaConfig, ArenaError, ExecutionOutcome, Runtime, RuntimeCatalog};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct RunArgs {
    pub file: PathBuf,
    pub language: Option<String>,
    pub version: Option<String>,
    pub stdin: Option<String>,
    pub stdin_file: Option<PathBuf>,
}

/// Notice for a local config source that does not exist. The loader falls
/// back to defaults before the logger is up, so `main` reports it instead.
pub fn missing_config_notice(source: &str) -> Option<String> {
    if source.starts_with("http://") || source.starts_with("https://") {
        return None;
    }
    if Path::new(source).exists() {
        return None;
    }
    Some(format!("No config file at {}, using defaults", source))
}

/// Apply command-line overrides. Only a new base URL can invalidate an
/// already validated config, so only that path re-validates.
pub fn apply_overrides(
    config: &mut ArenaConfig,
    base_url: Option<String>,
    token: Option<String>,
) -> Result<(), ArenaError> {
    if let Some(token) = token {
        config.api.auth_token = Some(token);
    }
    if let Some(base_url) = base_url {
        config.api.base_url = base_url.trim_end_matches('/').to_string();
        config.validate()?;
    }
    Ok(())
}

/// Language from the flag, else from the file extension
fn resolve_language(file: &Path, language: Option<&str>) -> Result<String> {
    if let Some(language) = language {
        return Ok(language.to_string());
    }
    file.extension()
        .and_then(|ext| ext.to_str())
        .and_then(language_for_extension)
        .map(str::to_string)
        .ok_or_else(|| {
            anyhow!(
                "Cannot infer language for {}, pass --language",
                file.display()
            )
        })
}

/// Pick the runtime to use. An explicit version is trusted as-is, the
/// service is the authority on whether it exists.
fn resolve_runtime(catalog: &RuntimeCatalog, language: &str, version: Option<&str>) -> Result<Runtime> {
    let found = catalog.find(language);
    match (found, version) {
        (Some(runtime), Some(version)) => Ok(Runtime {
            version: version.to_string(),
            ..runtime.clone()
        }),
        (Some(runtime), None) => Ok(runtime.clone()),
        (None, Some(version)) => Ok(Runtime::new(language, version, &[])),
        (None, None) => bail!(
            "Unknown language '{}', pass --runtime-version to use it anyway",
            language
        ),
    }
}

/// Process exit code mirroring the user's program
fn exit_code_for(outcome: &ExecutionOutcome) -> i32 {
    match outcome {
        ExecutionOutcome::Success => 0,
        ExecutionOutcome::CompileError { code } | ExecutionOutcome::RuntimeError { code } => {
            if *code == 0 {
                1
            } else {
                *code
            }
        }
    }
}

fn print_report(report: &ExecutionReport) {
    if let Some(compile) = &report.response.compile {
        if !compile.output.is_empty() {
            eprint!("{}", compile.output);
        }
    }
    print!("{}", report.response.run.stdout);
    if !report.response.run.stderr.is_empty() {
        eprint!("{}", report.response.run.stderr);
    }

    let marker = if report.outcome.is_success() { "ok" } else { "warning" };
    eprintln!(
        "[{}] {} ({} {})",
        marker,
        report.outcome.summary(),
        report.response.language,
        report.response.version
    );
}

pub async fn run_file(session: &CompilerSession, args: RunArgs) -> Result<i32> {
    let code = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let stdin = match (&args.stdin, &args.stdin_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None) => String::new(),
    };

    let language = resolve_language(&args.file, args.language.as_deref())?;
    let catalog = session.runtimes().await;
    if catalog.is_fallback() {
        log::info!("Using built-in runtime list, the compiler service did not provide one");
    }
    let runtime = resolve_runtime(&catalog, &language, args.version.as_deref())?;

    session
        .with_state(|state| {
            state.change_language(&runtime.language, &runtime.version);
            state.update_code(code);
            state.update_stdin(stdin);
        })
        .await;

    match session.execute().await {
        Ok(Some(report)) => {
            print_report(&report);
            Ok(exit_code_for(&report.outcome))
        }
        Ok(None) => bail!("{} is empty, nothing to run", args.file.display()),
        Err(err) => {
            eprintln!("error: {}", err);
            Ok(1)
        }
    }
}

fn format_runtimes(catalog: &RuntimeCatalog) -> String {
    let width = catalog
        .runtimes()
        .iter()
        .map(|runtime| runtime.language.len())
        .max()
        .unwrap_or(0)
        .max("LANGUAGE".len());

    let mut out = format!("{:<width$}  {:<10}  ALIASES\n", "LANGUAGE", "VERSION", width = width);
    for runtime in catalog.runtimes() {
        out.push_str(&format!(
            "{:<width$}  {:<10}  {}\n",
            runtime.language,
            runtime.version,
            runtime.aliases.join(", "),
            width = width
        ));
    }
    out
}

pub async fn list_runtimes(session: &CompilerSession) -> i32 {
    let catalog = session.runtimes().await;
    if catalog.is_fallback() {
        eprintln!("Compiler service unreachable, showing built-in runtime list");
    }
    print!("{}", format_runtimes(&catalog));
    0
}

pub async fn list_languages(session: &CompilerSession) -> Result<i32> {
    for language in session.service().languages().await? {
        println!("{}", language);
    }
    Ok(0)
}

pub async fn health(session: &CompilerSession) -> Result<i32> {
    let status = session.service().health_check().await?;
    println!("{}: {} ({})", status.status, status.message, status.timestamp);
    Ok(if status.is_healthy() { 0 } else { 1 })
}
