use chrono::Utc;
use clap::{Parser, Subcommand};
use sea_orm::Database;
use tracing::info;

use techteam_api::config::ApiConfig;
use techteam_api::router::build_router;
use techteam_api::state::AppState;
use techteam_api::usecase::account::{SeedOutcome, SeedSuperAdminInput, SeedSuperAdminUseCase};
use techteam_api::usecase::session::CleanupSessionsUseCase;
use techteam_core::config::Config;
use techteam_core::tracing::init_tracing;

#[derive(Parser)]
#[command(name = "api", about = "TechTeam device-check and repair ticket API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Create the super-admin account if it does not exist yet.
    SeedSuperAdmin {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Delete sessions whose expiry has passed.
    CleanupSessions,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = ApiConfig::from_env().expect("invalid API configuration");

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let state = AppState {
        db,
        cookie_secure: config.cookie_secure,
        bcrypt_cost: config.bcrypt_cost,
        rankings_limit: config.rankings_limit,
    };

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let router = build_router(state);
            let addr = format!("0.0.0.0:{}", config.api_port);
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .expect("failed to bind");

            info!("api service listening on {addr}");
            axum::serve(listener, router).await.expect("server error");
        }
        Command::SeedSuperAdmin {
            username,
            email,
            password,
        } => {
            let usecase = SeedSuperAdminUseCase {
                users: state.user_repo(),
                hasher: state.hasher(),
            };
            let outcome = usecase
                .execute(SeedSuperAdminInput {
                    username,
                    email,
                    password,
                })
                .await?;
            match outcome {
                SeedOutcome::Created(user) => info!(user_id = %user.id, "super admin created"),
                SeedOutcome::AlreadyExists(user) => {
                    info!(user_id = %user.id, "super admin already exists")
                }
            }
        }
        Command::CleanupSessions => {
            let usecase = CleanupSessionsUseCase {
                sessions: state.session_repo(),
            };
            usecase.execute(Utc::now()).await?;
        }
    }
    Ok(())
}
