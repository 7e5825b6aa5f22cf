use std::{path::PathBuf, str::FromStr};

use clap::{Parser, Subcommand};
use huddle::{
    AppState, build_app,
    config::AppConfig,
    db::DbPool,
    models::{CreateUser, Role},
    observability,
};

#[derive(Parser)]
#[command(name = "huddle", version, about)]
struct Args {
    /// Path to the configuration file. Built-in defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run pending database migrations and exit.
    Migrate,
    /// Provision an account and optionally issue a session token.
    ///
    /// Account management belongs to another module of the monolith;
    /// this is the operator's bootstrap path for deployments that run
    /// the groups module standalone.
    CreateUser {
        #[arg(long)]
        username: String,
        #[arg(long)]
        display_name: String,
        /// Role labels (admin, user, guest). Defaults to "user".
        #[arg(long = "role", value_name = "ROLE")]
        roles: Vec<String>,
        /// Also issue a session and print its bearer token.
        #[arg(long)]
        session: bool,
    },
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match AppConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    observability::init_tracing(&config.logging);

    match args.command {
        Some(Command::Migrate) => run_migrate(&config).await,
        Some(Command::CreateUser {
            username,
            display_name,
            roles,
            session,
        }) => run_create_user(config, username, display_name, roles, session).await,
        None => run_server(config).await,
    }
}

async fn run_server(config: AppConfig) {
    let state = match AppState::new(config.clone()).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialise application state");
            std::process::exit(1);
        }
    };

    let app = build_app(&config, state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "Failed to bind listener");
            std::process::exit(1);
        }
    };

    tracing::info!(%addr, "Huddle listening");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

async fn run_migrate(config: &AppConfig) {
    let db = match DbPool::from_config(&config.database).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = db.run_migrations().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    println!("Migrations completed successfully.");
}

async fn run_create_user(
    config: AppConfig,
    username: String,
    display_name: String,
    roles: Vec<String>,
    with_session: bool,
) {
    let roles = if roles.is_empty() {
        vec![Role::User]
    } else {
        match roles
            .iter()
            .map(|r| Role::from_str(r))
            .collect::<Result<Vec<_>, _>>()
        {
            Ok(roles) => roles,
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    };

    let state = match AppState::new(config).await {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let user = match state
        .services
        .users
        .create(CreateUser {
            username,
            display_name,
            roles,
        })
        .await
    {
        Ok(user) => user,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    println!("Created user {} ({})", user.username, user.id);

    if with_session {
        match state.services.sessions.create(user.id).await {
            Ok(session) => {
                println!("Session token: {}", session.token);
                println!("Expires at:    {}", session.expires_at);
            }
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
