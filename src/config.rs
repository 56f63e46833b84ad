use anyhow::Result;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

const DEFAULT_ALLOWED_ORIGINS: &str = "https://jobsy-mauve.vercel.app,https://jobsy-azure.vercel.app,http://localhost:3000,http://localhost:5173";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub client: ClientConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres URL. `None` runs the server on the in-memory store.
    pub url: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    pub api_url: String,
    pub debounce_ms: u64,
    pub request_timeout_secs: u64,
    pub saved_jobs_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub filter: String,
    pub log_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()?,
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                cors_allowed_origins: env::var("ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS.to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty()),
                max_connections: env::var("DB_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()?,
                min_connections: env::var("DB_MIN_CONNECTIONS")
                    .unwrap_or_else(|_| "1".to_string())
                    .parse()?,
            },
            client: ClientConfig {
                api_url: env::var("JOBSY_API_URL")
                    .unwrap_or_else(|_| "http://localhost:3000".to_string()),
                debounce_ms: env::var("JOBSY_DEBOUNCE_MS")
                    .unwrap_or_else(|_| "1000".to_string())
                    .parse()?,
                request_timeout_secs: env::var("JOBSY_REQUEST_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "15".to_string())
                    .parse()?,
                saved_jobs_path: env::var("JOBSY_SAVED_JOBS_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| default_saved_jobs_path()),
            },
            logging: LoggingConfig {
                filter: env::var("RUST_LOG")
                    .unwrap_or_else(|_| "jobsy=debug,tower_http=debug".to_string()),
                log_dir: env::var("LOG_DIR").ok().map(PathBuf::from),
            },
        })
    }
}

fn default_saved_jobs_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("jobsy")
        .join("saved_jobs.json")
}
