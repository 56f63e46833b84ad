use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{info, warn};
use uuid::Uuid;

use jobsy::client::{
    encode, ApiClient, Dimension, FilteredResult, ListingState, SavedJobsStore, SearchSession,
};
use jobsy::db::{self, JobStore, MemoryJobStore, PgJobStore};
use jobsy::models::JobListing;
use jobsy::{config::Config, routes::create_router, utils::init_logger, AppState};

#[derive(Parser)]
#[command(name = "jobsy", version, about = "Job board API server and search client")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Search listings on a running server
    Search(SearchArgs),
    /// Manage bookmarked jobs
    Saved {
        #[command(subcommand)]
        action: SavedAction,
    },
}

#[derive(clap::Args)]
struct SearchArgs {
    #[arg(long)]
    role: Option<String>,
    /// One location or a comma separated list
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    company: Option<String>,
    #[arg(long = "job-type")]
    job_type: Option<String>,
    /// Salary range as <min>-<max>
    #[arg(long)]
    salary: Option<String>,
    /// Keyword, repeatable (at most 5)
    #[arg(long = "tag")]
    tags: Vec<String>,
}

#[derive(Subcommand)]
enum SavedAction {
    /// Show saved jobs grouped by the day they were saved
    List,
    Add { id: Uuid },
    Remove { id: Uuid },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;
    let _log_guard = init_logger(&config.logging)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Search(args) => search(&config, args).await,
        Command::Saved { action } => saved(&config, action).await,
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    info!("Configuration loaded: {:?}", config.server);

    let store: Arc<dyn JobStore> = match &config.database.url {
        Some(url) => {
            let pool = db::create_pool(&config.database, url).await?;

            info!("Running database migrations...");
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;
            info!("Database migrations completed");

            Arc::new(PgJobStore::new(pool))
        }
        None => {
            warn!("DATABASE_URL not set, jobs are kept in memory only");
            Arc::new(MemoryJobStore::new())
        }
    };

    let state = AppState { store, config: config.clone() };
    let app = create_router(state);

    let ip = config.server.host.parse().context("HOST must be an IP address")?;
    let addr = SocketAddr::new(ip, config.server.port);
    info!("Server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}

async fn search(config: &Config, args: SearchArgs) -> anyhow::Result<()> {
    let mut session = SearchSession::from_config(&config.client);
    let text_dimensions = [
        (Dimension::JobRole, args.role),
        (Dimension::Location, args.location),
        (Dimension::CompanyName, args.company),
        (Dimension::JobType, args.job_type),
        (Dimension::Salary, args.salary),
    ];
    for (dimension, value) in text_dimensions {
        if let Some(value) = value {
            session.set_dimension(dimension, &value)?;
        }
    }
    for tag in &args.tags {
        if !session.add_tag(tag) {
            warn!(tag = %tag, "Keyword ignored");
        }
    }

    info!(query = %encode(session.filters()), "Searching");
    session.request_refresh();
    let mut updates = session.subscribe();
    session.close().await;

    let state = updates.borrow_and_update().clone();
    match state {
        ListingState::Ready(FilteredResult::Found(jobs)) => {
            println!("Recommended jobs: {}", jobs.len());
            for job in &jobs {
                print_listing(job);
            }
        }
        ListingState::Ready(FilteredResult::NotFound) => {
            println!("No jobs found. Try adjusting your filters.")
        }
        ListingState::Ready(FilteredResult::Error(reason)) => {
            anyhow::bail!("Something went wrong ({reason}). Try again later.")
        }
        ListingState::Idle | ListingState::Loading => {}
    }

    Ok(())
}

async fn saved(config: &Config, action: SavedAction) -> anyhow::Result<()> {
    let store = SavedJobsStore::open(&config.client.saved_jobs_path).await?;

    match action {
        SavedAction::Add { id } => {
            if store.save(id).await? {
                println!("Saved {id}");
            } else {
                println!("{id} is already saved");
            }
        }
        SavedAction::Remove { id } => {
            if store.remove(id).await? {
                println!("Removed {id}");
            } else {
                println!("{id} was not saved");
            }
        }
        SavedAction::List => {
            if store.list().is_empty() {
                println!("No saved jobs found.");
                return Ok(());
            }
            let jobs = ApiClient::new(&config.client.api_url).list_jobs("").await?;
            for (date, listings) in store.group_by_date(&jobs) {
                println!("Saved on {date}");
                for job in &listings {
                    print_listing(job);
                }
            }
        }
    }

    Ok(())
}

fn print_listing(job: &JobListing) {
    println!(
        "  {} | {} at {} | {} | {} | {}",
        job.id, job.job_role, job.company_name, job.job_type, job.location, job.salary
    );
    if !job.tags.is_empty() {
        println!("    #{}", job.tags.join(" #"));
    }
    println!("    apply: {}", job.form_link);
}
