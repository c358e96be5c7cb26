use crate::cli::Args;
use crate::errors::AppError;
use std::net::IpAddr;
use tracing::Level;

pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

#[derive(Clone, Debug)]
pub struct Config {
    pub server_address: IpAddr,
    pub server_port: u16,
    pub log_level: Level,
    pub database_url: String,
    pub max_pool_connections: usize,
    pub limits: QueryLimits,
    pub no_metrics: bool,
    pub sentry_dsn: Option<String>,
}

/// Caps applied to every lookup request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueryLimits {
    /// Maximum rows returned by the transaction history lookup
    pub history_limit: i64,
    /// Maximum number of values accepted in one list parameter
    pub max_query_items: usize,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            history_limit: 100,
            max_query_items: 100,
        }
    }
}

impl Config {
    pub fn from_args(args: Args) -> Result<Self, AppError> {
        let database_url = args
            .database_url
            .or_else(|| std::env::var(DATABASE_URL_ENV).ok())
            .filter(|url| !url.trim().is_empty())
            .ok_or(AppError::Config(format!(
                "--database-url or {DATABASE_URL_ENV} must be set"
            )))?;

        if args.max_pool_connections == 0 {
            return Err(AppError::Config(
                "--max-pool-connections must be at least 1".into(),
            ));
        }

        if args.history_limit < 1 {
            return Err(AppError::Config("--history-limit must be at least 1".into()));
        }

        if args.max_query_items == 0 {
            return Err(AppError::Config(
                "--max-query-items must be at least 1".into(),
            ));
        }

        Ok(Config {
            server_address: args.server_address,
            server_port: args.server_port,
            log_level: args.log_level.into(),
            database_url,
            max_pool_connections: args.max_pool_connections,
            limits: QueryLimits {
                history_limit: args.history_limit,
                max_query_items: args.max_query_items,
            },
            no_metrics: args.no_metrics,
            sentry_dsn: args.sentry_dsn.filter(|dsn| !dsn.is_empty()),
        })
    }
}
