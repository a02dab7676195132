/// OpenMusic Server - music catalog API
use clap::{Parser, Subcommand};
use openmusic_core::SchemaRegistry;
use openmusic_server::{
    config::ServerConfig,
    create_router,
    jobs::{ExportQueue, FileExportSink},
    services::{accounts, AuthService, FileStorage},
    state::AppState,
};
use openmusic_storage::{users, Database};
use serde_json::json;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "openmusic-server")]
#[command(about = "OpenMusic catalog API server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Create a new user
    AddUser {
        /// Username
        #[arg(short, long)]
        username: String,
        /// Password
        #[arg(short, long)]
        password: String,
        /// Full name
        #[arg(short, long)]
        fullname: String,
    },
    /// List all users
    ListUsers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "openmusic_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => {
            serve(config).await?;
        }
        Commands::AddUser {
            username,
            password,
            fullname,
        } => {
            add_user(&username, &password, &fullname).await?;
        }
        Commands::ListUsers => {
            list_users().await?;
        }
    }

    Ok(())
}

fn auth_service(config: &ServerConfig) -> AuthService {
    AuthService::new(
        config.auth.access_token_key.clone(),
        config.auth.refresh_token_key.clone(),
        config.auth.access_token_age_secs,
        config.auth.refresh_token_age_days,
    )
}

async fn serve(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    // Load configuration
    let config = ServerConfig::load(config_path.as_deref())?;
    config.validate()?;

    tracing::info!("Starting OpenMusic server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    // Initialize database
    let db = Arc::new(Database::connect(&config.storage.database_url).await?);
    tracing::info!("Database connected");

    // Initialize cover storage
    let file_storage = FileStorage::new(
        config.storage.upload_dir.clone(),
        config.server.public_url.clone(),
    );
    file_storage.initialize().await?;
    let file_storage = Arc::new(file_storage);
    tracing::info!("File storage initialized");

    let auth_service = Arc::new(auth_service(&config));
    tracing::info!("Auth service initialized");

    // Initialize export queue
    let sink = Arc::new(FileExportSink::new(config.storage.export_dir.clone()));
    let export_queue = Arc::new(ExportQueue::new(
        Arc::clone(&db),
        sink,
        config.exports.workers,
    ));
    if config.exports.enabled {
        Arc::clone(&export_queue).start();
        tracing::info!(
            "Export queue started with {} workers",
            config.exports.workers
        );
    } else {
        tracing::warn!("Exports disabled; export requests will be rejected");
    }

    let schemas = Arc::new(SchemaRegistry::standard());

    // Build application state
    let app_state = AppState::new(db, auth_service, file_storage, schemas, export_queue);

    // Build router
    let app = create_router(app_state);

    // Create server address
    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn add_user(username: &str, password: &str, fullname: &str) -> anyhow::Result<()> {
    let config = ServerConfig::load(None)?;
    let db = Database::connect(&config.storage.database_url).await?;

    let payload = json!({
        "username": username,
        "password": password,
        "fullname": fullname,
    });
    let user = accounts::register(
        &db,
        &auth_service(&config),
        &SchemaRegistry::standard(),
        payload,
    )
    .await?;

    println!("Created user {} ({})", user.username, user.id);

    Ok(())
}

async fn list_users() -> anyhow::Result<()> {
    let config = ServerConfig::load(None)?;
    let db = Database::connect(&config.storage.database_url).await?;

    let users = users::get_all(db.pool()).await?;

    println!("Users:");
    for user in users {
        println!("  {} - {} ({})", user.id, user.username, user.fullname);
    }

    Ok(())
}
