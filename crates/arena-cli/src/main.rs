use anyhow::Result;
use arena_compiler_client::{load_config_from_source, CompilerClientFactory, CompilerSession};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::path::PathBuf;
use std::sync::Arc;

mod commands;

#[derive(Parser, Debug)]
#[clap(name = "arena", author, version = "0.1.0", about = "AlgoArena code runner")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    #[clap(
        long,
        short,
        default_value = "arena.yaml",
        help = "Configuration source: file path or URL"
    )]
    config: String,

    #[clap(long, short, help = "Log level (overrides the configuration file)")]
    log_level: Option<String>,

    #[clap(long, help = "Base URL of the API hosting /compiler/*")]
    base_url: Option<String>,

    #[clap(long, help = "Bearer token sent with every request")]
    token: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Execute a source file on the remote compiler
    Run {
        /// Source file to execute
        file: PathBuf,

        #[clap(long, short = 'L', help = "Language or alias (inferred from the file extension when omitted)")]
        language: Option<String>,

        #[clap(long = "runtime-version", short = 'v', help = "Runtime version (first catalog match when omitted)")]
        runtime_version: Option<String>,

        #[clap(long, conflicts_with = "stdin_file", help = "Text fed to the program's stdin")]
        stdin: Option<String>,

        #[clap(long, help = "File whose contents are fed to the program's stdin")]
        stdin_file: Option<PathBuf>,
    },
    /// List runtimes offered by the compiler service
    Runtimes,
    /// List supported language names
    Languages,
    /// Check compiler service health
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config_from_source(&cli.config).await?;
    commands::apply_overrides(&mut config, cli.base_url, cli.token)?;

    let level = cli.log_level.unwrap_or_else(|| config.logging.level.clone());
    env_logger::Builder::new()
        .filter_level(level.parse().unwrap_or(LevelFilter::Info))
        .init();

    if let Some(notice) = commands::missing_config_notice(&cli.config) {
        log::info!("{}", notice);
    }

    let service: Arc<dyn arena_compiler_client::CompilerService> =
        Arc::from(CompilerClientFactory::create_http_client(&config.api)?);
    let session = CompilerSession::from_config(service, &config.compiler);

    let exit_code = match cli.command {
        Commands::Run {
            file,
            language,
            runtime_version,
            stdin,
            stdin_file,
        } => {
            let args = commands::RunArgs {
                file,
                language,
                version: runtime_version,
                stdin,
                stdin_file,
            };
            commands::run_file(&session, args).await?
        }
        Commands::Runtimes => commands::list_runtimes(&session).await,
        Commands::Languages => commands::list_languages(&session).await?,
        Commands::Health => commands::health(&session).await?,
    };

    std::process::exit(exit_code);
}
