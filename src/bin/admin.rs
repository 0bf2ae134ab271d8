//! CLI administration tool for shortlink.
//!
//! Provides read-only inspection and database maintenance commands without
//! going through the HTTP API. Looking a link up here never counts as a visit.
//!
//! # Usage
//!
//! ```bash
//! # View totals
//! cargo run --bin admin -- stats
//!
//! # Inspect one short link
//! cargo run --bin admin -- link aB3xY9
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//!
//! # Apply pending migrations
//! cargo run --bin admin -- db migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`, or `DB_HOST`/`DB_PORT`/`DB_USER`/`DB_PASSWORD`/`DB_NAME`

use shortlink::config::{Config, mask_connection_string};
use shortlink::domain::repositories::LinkRepository;
use shortlink::infrastructure::persistence::PgLinkRepository;
use shortlink::utils::slug_generator::{SLUG_LENGTH, is_valid_slug};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing shortlink.
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
    /// Show link and visit totals
    Stats {
        /// Number of most visited links to list (0 to skip)
        #[arg(short, long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(0..=1000))]
        top: u32,
    },
    /// Show one short link without counting a visit
    Link {
        /// Six-character slug
        slug: String,
    },
    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
    /// Show database info
    Info,
    /// Apply pending migrations
    Migrate,
}

#[derive(sqlx::FromRow)]
struct Totals {
    links: i64,
    visits: i64,
}

#[derive(sqlx::FromRow)]
struct TopLink {
    slug: String,
    original_url: String,
    visitor_count: i64,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = Config::load_database_url()?;
    let pool = PgPool::connect(&database_url)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to database at {}",
                mask_connection_string(&database_url)
            )
        })?;

    match cli.command {
        Commands::Stats { top } => handle_stats(&pool, top).await?,
        Commands::Link { slug } => handle_link(&pool, &slug).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Displays link totals and the most visited links.
///
/// # Output Format
///
/// ```text
/// 📊 Statistics
///
///   Links:   42
///   Visits:  1337
///
///   Slug    Visits  URL
///   ──────────────────────────────────────────────────────────────────
///   aB3xY9  512     https://example.com/
/// ```
async fn handle_stats(pool: &PgPool, top: u32) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let totals = sqlx::query_as::<_, Totals>(
        "SELECT COUNT(*) AS links, COALESCE(SUM(visitor_count), 0)::BIGINT AS visits FROM short_links",
    )
    .fetch_one(pool)
    .await
    .context("Failed to count links")?;

    println!(
        "  Links:   {}",
        totals.links.to_string().bright_green().bold()
    );
    println!(
        "  Visits:  {}",
        totals.visits.to_string().bright_green().bold()
    );
    println!();

    if totals.links == 0 || top == 0 {
        return Ok(());
    }

    let links = sqlx::query_as::<_, TopLink>(
        r#"
        SELECT slug, original_url, visitor_count
        FROM short_links
        ORDER BY visitor_count DESC, id
        LIMIT $1
        "#,
    )
    .bind(i64::from(top))
    .fetch_all(pool)
    .await
    .context("Failed to load most visited links")?;

    println!(
        "  {:<7} {:<7} {}",
        "Slug".bright_white().bold(),
        "Visits".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(66).bright_black());

    for link in &links {
        println!(
            "  {:<7} {:<7} {}",
            link.slug.cyan(),
            link.visitor_count.to_string().bright_green(),
            link.original_url
        );
    }
    println!();

    Ok(())
}

/// Shows a single short link by slug.
async fn handle_link(pool: &PgPool, slug: &str) -> Result<()> {
    if !is_valid_slug(slug) {
        anyhow::bail!(
            "'{}' is not a valid slug ({} characters from A-Z, a-z, 0-9)",
            slug,
            SLUG_LENGTH
        );
    }

    let repo = PgLinkRepository::new(Arc::new(pool.clone()));
    let link = repo
        .find_by_slug(slug)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    let Some(link) = link else {
        println!("{}", format!("⚠️  No short link '{}'", slug).yellow());
        return Ok(());
    };

    println!("{}", "🔗 Short link".bright_blue().bold());
    println!();
    println!("  Slug:     {}", link.slug.cyan());
    println!("  Path:     /urls/{}/", link.slug);
    println!("  URL:      {}", link.original_url.bright_white());
    println!(
        "  Visits:   {}",
        link.visitor_count.to_string().bright_green().bold()
    );
    println!(
        "  Created:  {}",
        link.created_time
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string()
            .bright_black()
    );
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

            let applied: Option<i64> = sqlx::query_scalar(
                "SELECT MAX(version) FROM _sqlx_migrations WHERE success",
            )
            .fetch_one(pool)
            .await
            .unwrap_or(None);
            match applied {
                Some(v) => println!("  Migration:  {}", v.to_string().bright_white()),
                None => println!("  Migration:  {}", "none applied".yellow()),
            }
            println!();
        }
        DbAction::Migrate => {
            println!("{}", "🛠️  Applying migrations...".bright_blue());
            sqlx::migrate!("./migrations")
                .run(pool)
                .await
                .context("Failed to apply migrations")?;
            println!("{}", "✅ Migrations up to date".green().bold());
        }
    }

    Ok(())
}
