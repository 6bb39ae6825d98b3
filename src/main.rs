use clap::{Parser, Subcommand};
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::sync::mpsc;

mod application;
mod domain;
mod infrastructure;
#[cfg(test)]
mod testing;

use application::commands::builtin_registry;
use application::errors::BotError;
use application::events::EventBus;
use application::logging::LogPipeline;
use application::messaging::{
    AuthorFilter, CommandDispatcher, Deployment, EnvironmentFilter, EventRouter, FilterChain,
    MessageCache,
};
use application::services::Services;
use domain::entities::{EventKind, User};
use domain::traits::{AuditLog, Bot, UserStore};
use infrastructure::adapters::console::{ConsoleAdapter, LineFeed};
use infrastructure::adapters::discord::DiscordAdapter;
use infrastructure::config::Config;
use infrastructure::database::UserRepository;

#[derive(Parser)]
#[command(name = "xorbot")]
#[command(about = "Moderation and audit-log bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Bot token (overrides config)
    #[arg(short, long)]
    token: Option<String>,

    /// Run as the test deployment
    #[arg(long)]
    test: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => {
            if let Err(e) = run_bot(&cli.config, cli.token, cli.test) {
                tracing::error!("{}", e);
                std::process::exit(1);
            }
        }
        Commands::Version => {
            println!("xorbot v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            init_config();
        }
    }
}

fn load_config(config_path: &str, token_override: Option<String>, test_build: bool) -> Result<Config, BotError> {
    let mut config = Config::load_or_default(config_path)?;
    config.apply_env();

    if let Some(token) = token_override {
        config.set_token(token);
    }
    if test_build {
        config.deployment.mode = Deployment::Test;
    }

    config.validate()?;
    Ok(config)
}

fn run_bot(config_path: &str, token_override: Option<String>, test_build: bool) -> Result<(), BotError> {
    let config = load_config(config_path, token_override, test_build)?;
    tracing::info!("Starting {} ({:?} deployment)", config.bot.name, config.deployment.mode);

    let users: Option<Arc<dyn UserStore>> = match UserRepository::open(&config.database.path) {
        Ok(repo) => {
            tracing::info!("Database initialized at {}", config.database.path.display());
            Some(Arc::new(repo))
        }
        Err(e) => {
            tracing::error!("Failed to initialize database: {}", e);
            None
        }
    };

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| BotError::Internal(format!("Failed to start runtime: {}", e)))?;

    rt.block_on(async {
        if let Some(token) = config.discord_token() {
            let mut adapter = DiscordAdapter::new(token);
            adapter.fetch_bot_info().await?;
            let adapter = Arc::new(adapter);
            serve(&config, adapter.clone(), adapter, users, LineFeed::json()).await
        } else {
            // validate() guarantees the console is enabled when there is no token
            let channel = match config.deployment.mode {
                Deployment::Test => config.deployment.test_channel_id.clone(),
                Deployment::Production => "console".to_string(),
            };
            let feed = LineFeed::interactive(User::new("1", "console"), channel);
            let adapter = Arc::new(ConsoleAdapter::new());
            serve(&config, adapter.clone(), adapter, users, feed).await
        }
    })
}

/// Wire the core together and route events from stdin until it closes
async fn serve(
    config: &Config,
    bot: Arc<dyn Bot>,
    audit: Arc<dyn AuditLog>,
    users: Option<Arc<dyn UserStore>>,
    feed: LineFeed,
) -> Result<(), BotError> {
    bot.start().await?;
    let info = bot.bot_info();
    tracing::info!("Bot started: {} ({})", info.name, info.id);

    let prefix = config.prefix()?;
    let cache = Arc::new(MessageCache::new(config.logging.cache_capacity));
    let pipeline = Arc::new(
        LogPipeline::new(cache, bot.clone(), audit, config.logging.channel_id.clone())
            .with_ban_fallback(config.logging.ban_fallback),
    );

    let mut bus = EventBus::new();
    bus.subscribe(&EventKind::ALL, pipeline.clone());

    let registry = builtin_registry(prefix)?;
    tracing::info!("Registered {} commands", registry.len());

    let services = Arc::new(Services {
        bot,
        bus: Arc::new(bus),
        registry: Arc::new(registry),
        users,
        prefix,
    });

    let filters = FilterChain::new()
        .add(EnvironmentFilter::new(
            config.deployment.mode,
            config.deployment.test_channel_id.clone(),
        ))
        .add(AuthorFilter);
    let router = EventRouter::new(CommandDispatcher::new(filters, services), pipeline);

    let (tx, mut rx) = mpsc::channel(256);
    tokio::spawn(async move {
        if let Err(e) = feed.run(BufReader::new(tokio::io::stdin()), tx).await {
            tracing::error!("Event feed failed: {}", e);
        }
    });

    tracing::info!("Listening for events...");
    while let Some(event) = rx.recv().await {
        router.route(event).await;
    }

    tracing::info!("Event feed closed, shutting down");
    Ok(())
}

fn init_config() {
    match serde_yaml::to_string(&Config::default()) {
        Ok(yaml) => {
            println!("{}", yaml);
            println!("\nSave this to config.yaml and adjust as needed.");
        }
        Err(e) => tracing::error!("Failed to render config: {}", e),
    }
}
