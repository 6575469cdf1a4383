//! fbarchive command-line entry point.

use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use fbarchive_common::{AppError, Config, LoggingConfig};
use fbarchive_core::{RetentionPolicy, RetentionService};
use fbarchive_db::entities::{Comment, DeletedComment, DeletedPost, FbUser, Group, Post};
use fbarchive_db::repositories::{
    MonthContentRepository, SearchRepository, Searchable, StatisticsRepository,
};
use sea_orm::DatabaseConnection;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "fbarchive")]
#[command(version)]
#[command(about = "Facebook group archive maintenance")]
struct Cli {
    /// Log at debug level regardless of configuration
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,

    /// Roll back the most recent migrations
    Rollback {
        /// Number of migrations to roll back
        #[arg(short, long, default_value = "1")]
        steps: u32,
    },

    /// Run the month-window retention sweep for a group
    Sweep {
        /// Facebook group ID
        #[arg(short, long)]
        group: String,
    },

    /// Full-text search over archived content
    Search {
        /// What to search
        #[arg(short, long, value_enum, default_value = "post")]
        kind: SearchKind,

        /// Search query
        #[arg(short, long)]
        query: String,

        /// Restrict results to one group (posts, comments and their tombstones)
        #[arg(short, long)]
        group: Option<String>,

        /// Maximum number of results
        #[arg(short, long, default_value = "20")]
        limit: u64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SearchKind {
    Group,
    User,
    Post,
    Comment,
    DeletedPost,
    DeletedComment,
}

fn init_tracing(config: &LoggingConfig, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("fbarchive=debug,sea_orm=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(config.json.then(|| fmt::layer().json()))
        .with((!config.json).then(fmt::layer))
        .init();
}

async fn search<E>(
    db: &Arc<DatabaseConnection>,
    query: &str,
    group: Option<&str>,
    limit: u64,
) -> anyhow::Result<()>
where
    E: Searchable,
    E::Model: serde::Serialize,
{
    let results = SearchRepository::new(Arc::clone(db))
        .search::<E>(query, group, limit)
        .await
        .map_err(AppError::logged)?;

    for row in &results {
        println!("{}", serde_json::to_string(row)?);
    }
    info!(count = results.len(), "Search finished");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::load()?;
    init_tracing(&config.logging, cli.verbose);

    let db = Arc::new(fbarchive_db::init(&config).await?);

    match cli.command {
        Commands::Migrate => fbarchive_db::migrate(&db).await?,
        Commands::Rollback { steps } => fbarchive_db::rollback(&db, steps).await?,
        Commands::Sweep { group } => {
            let service = RetentionService::new(
                StatisticsRepository::new(Arc::clone(&db)),
                MonthContentRepository::new(Arc::clone(&db)),
                RetentionPolicy::from_config(&config.archive),
            );
            let outcome = service.check(&group).await.map_err(AppError::logged)?;
            println!("{}", serde_json::to_string(&outcome)?);
        }
        Commands::Search {
            kind,
            query,
            group,
            limit,
        } => {
            let group = group.as_deref();
            match kind {
                SearchKind::Group => search::<Group>(&db, &query, group, limit).await?,
                SearchKind::User => search::<FbUser>(&db, &query, group, limit).await?,
                SearchKind::Post => search::<Post>(&db, &query, group, limit).await?,
                SearchKind::Comment => search::<Comment>(&db, &query, group, limit).await?,
                SearchKind::DeletedPost => {
                    search::<DeletedPost>(&db, &query, group, limit).await?;
                }
                SearchKind::DeletedComment => {
                    search::<DeletedComment>(&db, &query, group, limit).await?;
                }
            }
        }
    }

    Ok(())
}
