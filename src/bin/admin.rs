//! CLI administration tool for short-url.
//!
//! Manages user accounts, shows statistics and performs database operations
//! without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Create a user (prompts for missing values)
//! cargo run --bin admin -- user create --email ana@example.com --generate-password
//!
//! # List users
//! cargo run --bin admin -- user list
//!
//! # Soft-delete a user by email or id
//! cargo run --bin admin -- user delete ana@example.com
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Database tools
//! cargo run --bin admin -- db check
//! cargo run --bin admin -- db migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_*` components (required): PostgreSQL connection

use short_url::config::{database_url_from_env, mask_connection_string};
use short_url::domain::entities::NewUser;
use short_url::domain::repositories::UserRepository;
use short_url::infrastructure::persistence::PgUserRepository;
use short_url::infrastructure::run_migrations;
use short_url::utils::password::hash_password;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, Password};
use sqlx::PgPool;
use std::sync::Arc;
use validator::ValidateEmail;

const MIN_PASSWORD_LENGTH: usize = 6;
const GENERATED_PASSWORD_LENGTH: usize = 20;

/// CLI tool for managing short-url.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Email address
        #[arg(short, long)]
        email: Option<String>,

        /// Password (prompted for if omitted)
        #[arg(short, long, conflicts_with = "generate_password")]
        password: Option<String>,

        /// Generate a random password and print it once
        #[arg(short, long)]
        generate_password: bool,
    },

    /// List all users
    List,

    /// Soft-delete a user; they can no longer log in
    Delete {
        /// User email or ID
        email_or_id: String,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,

    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = database_url_from_env()?
        .context("DATABASE_URL (or DB_USER, DB_PASSWORD, DB_NAME) must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to database {}",
                mask_connection_string(&database_url)
            )
        })?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    let repo = PgUserRepository::new(Arc::new(pool.clone()));

    match action {
        UserAction::Create {
            email,
            password,
            generate_password: generate,
        } => create_user(&repo, email, password, generate).await,
        UserAction::List => list_users(&repo).await,
        UserAction::Delete { email_or_id } => delete_user(&repo, &email_or_id).await,
    }
}

/// Creates a user with interactive prompts for anything not given as a flag.
///
/// The password is hashed with Argon2id before it is stored; a generated
/// password is shown once and cannot be recovered.
async fn create_user(
    repo: &PgUserRepository,
    email: Option<String>,
    password: Option<String>,
    generate: bool,
) -> Result<()> {
    println!("{}", "👤 Create User".bright_blue().bold());
    println!();

    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };
    let email = email.trim().to_string();

    if !email.validate_email() {
        anyhow::bail!("'{}' is not a valid email address", email);
    }

    let (password, generated) = match password {
        Some(p) => (p, false),
        None if generate => (generate_password(), true),
        None => (
            Password::new()
                .with_prompt("Password")
                .with_confirmation("Repeat password", "Passwords do not match")
                .interact()?,
            false,
        ),
    };

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        anyhow::bail!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        );
    }

    let password_hash = hash_password(&password).map_err(|e| anyhow::anyhow!("{}", e))?;

    let user = repo
        .create(NewUser {
            email,
            password_hash,
        })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create user: {}", e))?;

    println!("{}", "✅ User created".green().bold());
    println!("  ID:    {}", user.id.to_string().bright_black());
    println!("  Email: {}", user.email.cyan());

    if generated {
        println!("  Password: {}", password.bright_yellow().bold());
        println!();
        println!(
            "{}",
            "⚠️  Save this password now! It will not be shown again."
                .red()
                .bold()
        );
    }
    println!();

    Ok(())
}

/// Lists all users, newest first, including soft-deleted ones.
///
/// ```text
/// 👥 Users
///
///   ID  Email                          Created              Status
///   ───────────────────────────────────────────────────────────────────
///   2   bo@example.com                 2025-01-16 14:20     ACTIVE
///   1   ana@example.com                2025-01-15 10:30     DELETED
/// ```
async fn list_users(repo: &PgUserRepository) -> Result<()> {
    println!("{}", "👥 Users".bright_blue().bold());
    println!();

    let users = repo
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?;

    if users.is_empty() {
        println!("{}", "  No users found".yellow());
        println!();
        println!(
            "  Create one with: {} admin user create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<5} {:<30} {:<20} {:<10}",
        "ID".bright_white().bold(),
        "Email".bright_white().bold(),
        "Created".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "─".repeat(70).bright_black());

    for user in &users {
        let status = if user.is_deleted() {
            "DELETED".red()
        } else {
            "ACTIVE".green()
        };

        println!(
            "  {:<5} {:<30} {:<20} {}",
            user.id.to_string().bright_black(),
            user.email.cyan(),
            user.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            status
        );
    }

    println!();
    println!("  Total: {}", users.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Soft-deletes a user after confirmation.
///
/// Numeric input is looked up as an id, anything else as an email. The
/// user's short URLs are left as they are and keep resolving.
async fn delete_user(repo: &PgUserRepository, email_or_id: &str) -> Result<()> {
    println!("{}", "🗑️  Delete User".bright_blue().bold());
    println!();

    let user = match email_or_id.parse::<i64>() {
        Ok(id) => repo.find_by_id(id).await,
        Err(_) => repo.find_by_email(email_or_id).await,
    }
    .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
    .context("User not found")?;

    if user.is_deleted() {
        println!("{}", "⚠️  This user is already deleted".yellow());
        return Ok(());
    }

    println!("  User: {}", user.email.cyan());
    println!("  ID:   {}", user.id.to_string().bright_black());
    println!();

    let confirmed = Confirm::new()
        .with_prompt("Delete this user?")
        .default(false)
        .interact()?;

    if !confirmed {
        println!("{}", "❌ Cancelled".red());
        return Ok(());
    }

    let deleted = repo
        .soft_delete(user.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete user: {}", e))?;

    if deleted {
        println!("{}", "✅ User deleted".green().bold());
    } else {
        println!("{}", "⚠️  User was deleted concurrently".yellow());
    }
    println!();

    Ok(())
}

/// Displays user, short URL and click totals.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE deleted_at IS NULL")
        .fetch_one(pool)
        .await?;

    let (live, deleted, clicks): (i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT
            COUNT(*) FILTER (WHERE deleted_at IS NULL),
            COUNT(*) FILTER (WHERE deleted_at IS NOT NULL),
            COALESCE(SUM(click_count), 0)::BIGINT
        FROM short_urls
        "#,
    )
    .fetch_one(pool)
    .await?;

    println!("  Users:        {}", users.to_string().bright_green().bold());
    println!("  Live URLs:    {}", live.to_string().bright_green().bold());
    println!("  Deleted URLs: {}", deleted.to_string().bright_black());
    println!("  Total clicks: {}", clicks.to_string().bright_green().bold());
    println!();

    Ok(())
}

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

            let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
                .fetch_one(pool)
                .await
                .unwrap_or(0);

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Migrations: {}", applied.to_string().bright_white());
            println!();
        }
        DbAction::Migrate => {
            println!("{}", "🚚 Applying migrations...".bright_blue());

            run_migrations(pool)
                .await
                .context("Failed to run migrations")?;

            println!("{}", "✅ Migrations up to date".green().bold());
        }
    }

    Ok(())
}

/// Generates a random password from an alphanumeric charset.
fn generate_password() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

    let mut rng = rand::rng();

    (0..GENERATED_PASSWORD_LENGTH)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}
