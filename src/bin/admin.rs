//! CLI administration tool for resident-registry.
//!
//! Manages administrator accounts and buildings, and performs database
//! maintenance without going through the web interface.
//!
//! # Usage
//!
//! ```bash
//! # Create an administrator (prompts for the password)
//! cargo run --bin admin -- user create --email stjorn@example.is
//!
//! # List administrators
//! cargo run --bin admin -- user list
//!
//! # Register a building
//! cargo run --bin admin -- building create --title "Hátún 10"
//!
//! # Remove expired login sessions
//! cargo run --bin admin -- sessions purge
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`, or `DB_HOST`/`DB_PORT`/`DB_USER`/`DB_PASSWORD`/`DB_NAME`

use resident_registry::application::services::{AuthService, BuildingService};
use resident_registry::config::DatabaseConfig;
use resident_registry::domain::repositories::{SessionRepository, UserRepository};
use resident_registry::infrastructure::persistence::{
    PgBuildingRepository, PgSessionRepository, PgUserRepository,
};
use resident_registry::server;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, Password};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing resident-registry.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage administrator accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage buildings
    Building {
        #[command(subcommand)]
        action: BuildingAction,
    },

    /// Manage login sessions
    Sessions {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// Show record counts
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create an administrator
    Create {
        /// Login email
        #[arg(short, long)]
        email: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List administrators
    List,
}

#[derive(Subcommand)]
enum BuildingAction {
    /// Register a building
    Create {
        /// Building title, usually the street address
        #[arg(short, long)]
        title: Option<String>,
    },

    /// List buildings
    List,
}

#[derive(Subcommand)]
enum SessionAction {
    /// Delete sessions past their expiry
    Purge,
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database = DatabaseConfig::from_env()?;
    let pool = server::connect_pool(&database).await?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Building { action } => handle_building_action(action, &pool).await?,
        Commands::Sessions { action } => handle_session_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    let repo = PgUserRepository::new(Arc::new(pool.clone()));

    match action {
        UserAction::Create { email, yes } => create_user(&repo, email, yes).await,
        UserAction::List => list_users(&repo).await,
    }
}

/// Creates an administrator with interactive prompts.
///
/// The password is asked twice and stored only as an argon2 hash.
async fn create_user(repo: &PgUserRepository, email: Option<String>, skip_confirm: bool) -> Result<()> {
    println!("{}", "👤 Create Administrator".bright_blue().bold());
    println!();

    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };
    let email = email.trim().to_lowercase();
    if !email.contains('@') {
        anyhow::bail!("'{email}' is not an email address");
    }

    if repo
        .find_by_email(&email)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .is_some()
    {
        println!("{}", "⚠️  An administrator with this email already exists".yellow());
        return Ok(());
    }

    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Repeat password", "Passwords do not match")
        .interact()?;

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt(format!("Create administrator {email}?"))
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let password_hash = AuthService::hash_password(&password)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;

    let user = repo
        .create(&email, &password_hash)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create administrator: {}", e))?;

    println!();
    println!("{}", "✅ Administrator created".green().bold());
    println!("  ID:    {}", user.id.to_string().bright_black());
    println!("  Email: {}", user.email.cyan());
    println!();

    Ok(())
}

async fn list_users(repo: &PgUserRepository) -> Result<()> {
    println!("{}", "📋 Administrators".bright_blue().bold());
    println!();

    let users = repo
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list administrators: {}", e))?;

    if users.is_empty() {
        println!("{}", "  No administrators found".yellow());
        println!();
        println!(
            "  Create one with: {} admin user create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<5} {:<40} {:<20}",
        "ID".bright_white().bold(),
        "Email".bright_white().bold(),
        "Created".bright_white().bold()
    );
    println!("  {}", "─".repeat(67).bright_black());

    for user in &users {
        println!(
            "  {:<5} {:<40} {}",
            user.id.to_string().bright_black(),
            user.email.cyan(),
            user.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black()
        );
    }

    println!();
    println!("  Total: {}", users.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

async fn handle_building_action(action: BuildingAction, pool: &PgPool) -> Result<()> {
    let service = BuildingService::new(Arc::new(PgBuildingRepository::new(Arc::new(
        pool.clone(),
    ))));

    match action {
        BuildingAction::Create { title } => {
            let title = match title {
                Some(t) => t,
                None => Input::new().with_prompt("Building title").interact_text()?,
            };

            let building = service
                .create_building(&title)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to create building: {}", e))?;

            println!(
                "{} {} (ID {})",
                "✅ Building created:".green().bold(),
                building.title.cyan(),
                building.id
            );
        }
        BuildingAction::List => {
            println!("{}", "🏢 Buildings".bright_blue().bold());
            println!();

            let buildings = service
                .list_buildings()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to list buildings: {}", e))?;

            if buildings.is_empty() {
                println!("{}", "  No buildings found".yellow());
                return Ok(());
            }

            for building in &buildings {
                println!(
                    "  {:<5} {}",
                    building.id.to_string().bright_black(),
                    building.title.cyan()
                );
            }
            println!();
        }
    }

    Ok(())
}

async fn handle_session_action(action: SessionAction, pool: &PgPool) -> Result<()> {
    let repo = PgSessionRepository::new(Arc::new(pool.clone()));

    match action {
        SessionAction::Purge => {
            let removed = repo
                .delete_expired()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to purge sessions: {}", e))?;

            println!(
                "{} {}",
                "🧹 Expired sessions removed:".green().bold(),
                removed.len().to_string().bright_white().bold()
            );
        }
    }

    Ok(())
}

/// Displays record counts.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let buildings: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM buildings")
        .fetch_one(pool)
        .await?;

    let residents: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM residents")
        .fetch_one(pool)
        .await?;

    let sessions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sessions WHERE expires_at > NOW()")
        .fetch_one(pool)
        .await?;

    println!("  Buildings:       {}", buildings.to_string().bright_green().bold());
    println!("  Residents:       {}", residents.to_string().bright_green().bold());
    println!("  Active sessions: {}", sessions.to_string().bright_green().bold());
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}
