use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use taskhub::api;
use taskhub::auth::{AuthConfig, AuthService, TokenCodec};
use taskhub::db::Database;
use taskhub::todo::TodoRepository;
use taskhub::user::UserRepository;

const APP_NAME: &str = "taskhub";

fn main() {
    if let Err(err) = try_main() {
        let _ = writeln!(io::stderr(), "{err:?}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing();

    match cli.command {
        Command::Serve(cmd) => async_serve(cmd),
        Command::Completions { shell } => handle_completions(shell),
    }
}

#[tokio::main]
async fn async_serve(cmd: ServeCommand) -> Result<()> {
    handle_serve(cmd).await
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Taskhub - multi-user task tracking API server.",
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve(ServeCommand),
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Args)]
struct ServeCommand {
    /// Override the config file path
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Address to listen on (overrides config)
    #[arg(long, value_name = "ADDR")]
    listen: Option<String>,
    /// Database file path (overrides config)
    #[arg(long, value_name = "PATH")]
    database: Option<PathBuf>,
}

/// Application settings.
///
/// Loaded from defaults, then an optional TOML file, then environment
/// variables with the `TASKHUB` prefix (`TASKHUB_LISTEN`,
/// `TASKHUB_AUTH__TOKEN_SECRET`, ...).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct AppSettings {
    listen: String,
    database: PathBuf,
    auth: AuthConfig,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:3000".to_string(),
            database: default_data_dir().join("taskhub.db"),
            auth: AuthConfig::default(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

fn default_config_file() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
        .join("config.toml")
}

fn load_settings(config_file: Option<&Path>) -> Result<AppSettings> {
    let defaults = AppSettings::default();
    let path = config_file
        .map(Path::to_path_buf)
        .unwrap_or_else(default_config_file);

    let built = Config::builder()
        .set_default("listen", defaults.listen.clone())?
        .set_default("database", defaults.database.display().to_string())?
        .add_source(
            File::from(path.as_path())
                .format(FileFormat::Toml)
                // An explicitly passed file must exist; the default location
                // may not.
                .required(config_file.is_some()),
        )
        .add_source(Environment::with_prefix("TASKHUB").separator("__"))
        .build()
        .context("loading configuration")?;

    built.try_deserialize().context("parsing configuration")
}

async fn handle_serve(cmd: ServeCommand) -> Result<()> {
    let mut settings = load_settings(cmd.config.as_deref())?;
    if let Some(listen) = cmd.listen {
        settings.listen = listen;
    }
    if let Some(database) = cmd.database {
        settings.database = database;
    }

    settings
        .auth
        .validate()
        .context("invalid auth configuration")?;
    let secret = settings
        .auth
        .resolve_token_secret()?
        .ok_or_else(|| anyhow!("auth.token_secret is not configured"))?;

    info!("Database path: {}", settings.database.display());
    let database = Database::new(&settings.database).await?;

    let users = UserRepository::new(database.pool().clone());
    let todos = TodoRepository::new(database.pool().clone());
    let auth = AuthService::new(users, TokenCodec::new(&secret));

    let state = api::AppState::new(auth, todos);
    let router = api::create_router(state);

    let addr: SocketAddr = settings
        .listen
        .parse()
        .with_context(|| format!("parsing listen address: {}", settings.listen))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding to {addr}"))?;

    info!("Listening on {addr}");
    axum::serve(listener, router).await.context("serving HTTP")?;

    Ok(())
}

fn handle_completions(shell: Shell) -> Result<()> {
    clap_complete::generate(shell, &mut Cli::command(), APP_NAME, &mut io::stdout());
    Ok(())
}
