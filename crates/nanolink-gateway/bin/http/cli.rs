use clap::{Parser, ValueEnum};
use nanolink_telemetry::LogFormat;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;

pub const LISTEN_ADDR_ENV: &str = "NANOLINK_LISTEN_ADDR";
pub const PUBLIC_BASE_URL_ENV: &str = "NANOLINK_PUBLIC_BASE_URL";
pub const STORAGE_BACKEND_ENV: &str = "NANOLINK_STORAGE_BACKEND";
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
pub const DB_MAX_CONNECTIONS_ENV: &str = "NANOLINK_DB_MAX_CONNECTIONS";
pub const DB_ACQUIRE_TIMEOUT_ENV: &str = "NANOLINK_DB_ACQUIRE_TIMEOUT_SECS";
pub const MAX_ATTEMPTS_ENV: &str = "NANOLINK_MAX_ATTEMPTS";
pub const CACHE_CAPACITY_ENV: &str = "NANOLINK_CACHE_CAPACITY";
pub const LOG_FORMAT_ENV: &str = "NANOLINK_LOG_FORMAT";
pub const OTLP_ENDPOINT_ENV: &str = "NANOLINK_OTLP_ENDPOINT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://nanolink.db";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "sqlite")]
    Sqlite,
    #[value(name = "mysql")]
    Mysql,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Sqlite => write!(f, "sqlite"),
            StorageBackendArg::Mysql => write!(f, "mysql"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "nanolink-gateway", version, about = "NanoLink URL shortener HTTP server")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Prefix of every returned short URL.
    #[arg(long, env = PUBLIC_BASE_URL_ENV, default_value = DEFAULT_PUBLIC_BASE_URL)]
    pub public_base_url: String,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::Sqlite
    )]
    pub storage: StorageBackendArg,

    /// Ignored by the in-memory backend.
    #[arg(long, env = DATABASE_URL_ENV, default_value = DEFAULT_DATABASE_URL)]
    pub database_url: String,

    #[arg(long, env = DB_MAX_CONNECTIONS_ENV, default_value_t = 10)]
    pub db_max_connections: u32,

    #[arg(long, env = DB_ACQUIRE_TIMEOUT_ENV, default_value_t = 5)]
    pub db_acquire_timeout_secs: u64,

    /// Short code candidates tried per create before answering 503.
    #[arg(
        long,
        env = MAX_ATTEMPTS_ENV,
        default_value_t = nanolink_shortener::DEFAULT_MAX_ATTEMPTS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub max_attempts: u32,

    /// Links kept in the in-process cache; 0 disables caching.
    #[arg(long, env = CACHE_CAPACITY_ENV, default_value_t = 10_000)]
    pub cache_capacity: u64,

    #[arg(long, env = LOG_FORMAT_ENV, default_value = "pretty")]
    pub log_format: LogFormat,

    /// OTLP gRPC endpoint for span export, e.g. `http://localhost:4317`.
    #[arg(long, env = OTLP_ENDPOINT_ENV)]
    pub otlp_endpoint: Option<String>,
}
