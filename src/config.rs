//! Configuration management for the job board server.
//!
//! This module provides a flexible configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables (optionally loaded from a `.env` file)
//! - Sensible defaults for all optional settings
//!
//! # Example
//!
//! ```ignore
//! use job_board::config::Config;
//!
//! // Parse from command line and environment
//! let config = Config::parse();
//!
//! println!("Listening on {}", config.bind_address());
//! ```
//!
//! # Environment Variables
//!
//! - `HOST` - Server bind address (default: 0.0.0.0)
//! - `PORT` - Server port (default: 5000)
//! - `DB_USER` / `DB_PASS` - Database credentials
//! - `DB_CLUSTER` - Atlas cluster host (default: cluster0.h2pknmg.mongodb.net)
//! - `MONGODB_URI` - Full connection string, overrides the credentials above
//! - `DB_NAME` - Database name (default: job_Portal)
//! - `TOKEN_JWS_SECRET` - Secret for signing session tokens (required)
//! - `TOKEN_TTL` - Session token lifetime in seconds (default: 3600)
//! - `APP_ENV` - `development` or `production` (default: development)
//! - `CORS_ORIGINS` - Allowed origins (comma-separated)
//! - `IN_MEMORY_STORE` - Use the in-process store instead of MongoDB

use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::server::auth::CookiePolicy;
use crate::server::routes::DEFAULT_CORS_ORIGINS;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 5000;

/// Default Atlas cluster host.
pub const DEFAULT_DB_CLUSTER: &str = "cluster0.h2pknmg.mongodb.net";

/// Default database name.
pub const DEFAULT_DB_NAME: &str = "job_Portal";

/// Default session token lifetime in seconds (1 hour).
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;

// =============================================================================
// Environment
// =============================================================================

/// Deployment environment. Controls session cookie attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Cookie policy for this environment.
    ///
    /// Production serves a frontend on another site, so the cookie must be
    /// `SameSite=None; Secure` to be sent on cross-site requests.
    pub fn cookie_policy(&self) -> CookiePolicy {
        match self {
            Environment::Development => CookiePolicy::SameSiteStrict,
            Environment::Production => CookiePolicy::CrossSite,
        }
    }
}

// =============================================================================
// CLI Arguments
// =============================================================================

/// Job board API server.
///
/// Serves job postings and job applications from MongoDB, with cookie-based
/// session tokens for the applicant's own listing.
#[derive(Parser, Debug, Clone)]
#[command(name = "job-board")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "PORT")]
    pub port: u16,

    /// Deployment environment.
    #[arg(long, value_enum, default_value_t = Environment::Development, env = "APP_ENV")]
    pub environment: Environment,

    // =========================================================================
    // Database Configuration
    // =========================================================================
    /// Database user.
    #[arg(long, env = "DB_USER")]
    pub db_user: Option<String>,

    /// Database password.
    #[arg(long, env = "DB_PASS", hide_env_values = true)]
    pub db_pass: Option<String>,

    /// Atlas cluster host used to build the connection string.
    #[arg(long, default_value = DEFAULT_DB_CLUSTER, env = "DB_CLUSTER")]
    pub db_cluster: String,

    /// Full MongoDB connection string.
    ///
    /// Takes precedence over --db-user, --db-pass and --db-cluster.
    #[arg(long, env = "MONGODB_URI", hide_env_values = true)]
    pub mongodb_uri: Option<String>,

    /// Database name.
    #[arg(long, default_value = DEFAULT_DB_NAME, env = "DB_NAME")]
    pub db_name: String,

    /// Keep all data in process memory instead of MongoDB.
    ///
    /// Data is lost on shutdown. Intended for local development and demos.
    #[arg(long, default_value_t = false, env = "IN_MEMORY_STORE")]
    pub in_memory: bool,

    // =========================================================================
    // Session Configuration
    // =========================================================================
    /// Secret used to sign session tokens.
    #[arg(long, env = "TOKEN_JWS_SECRET", hide_env_values = true)]
    pub token_secret: Option<String>,

    /// Session token lifetime in seconds.
    #[arg(long, default_value_t = DEFAULT_TOKEN_TTL_SECS, env = "TOKEN_TTL")]
    pub token_ttl: u64,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, the deployed frontends and the local dev server are allowed.
    #[arg(long, env = "CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.token_secret.as_deref().map_or(true, str::is_empty) {
            return Err(
                "Session token secret is required. Set --token-secret or TOKEN_JWS_SECRET"
                    .to_string(),
            );
        }

        if self.token_ttl == 0 {
            return Err("token_ttl must be greater than 0".to_string());
        }

        let has_credentials = self.db_user.is_some() && self.db_pass.is_some();
        if !self.in_memory && self.mongodb_uri.is_none() && !has_credentials {
            return Err(
                "Database credentials are required. Set --db-user and --db-pass \
                 (DB_USER/DB_PASS), set --mongodb-uri, or use --in-memory"
                    .to_string(),
            );
        }

        if self.db_name.is_empty() {
            return Err("db_name must not be empty".to_string());
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the token secret, or an empty string if not set (call validate() first).
    pub fn token_secret_or_empty(&self) -> &str {
        self.token_secret.as_deref().unwrap_or("")
    }

    /// Session token lifetime.
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl)
    }

    /// Allowed CORS origins, falling back to the defaults.
    pub fn cors_origins(&self) -> Vec<String> {
        match &self.cors_origins {
            Some(origins) => origins
                .iter()
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
            None => DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
        }
    }

    /// Resolve the MongoDB connection string.
    ///
    /// Returns `None` when neither a full URI nor both credentials are set.
    pub fn mongodb_uri(&self) -> Option<String> {
        if let Some(uri) = &self.mongodb_uri {
            return Some(uri.clone());
        }

        let user = self.db_user.as_deref()?;
        let pass = self.db_pass.as_deref()?;
        Some(format!(
            "mongodb+srv://{}:{}@{}/?retryWrites=true&w=majority&appName=Cluster0",
            urlencoding::encode(user),
            urlencoding::encode(pass),
            self.db_cluster
        ))
    }

    /// Connection target safe for logging: host and database, never credentials.
    pub fn database_display(&self) -> String {
        if self.in_memory {
            return "in-memory".to_string();
        }
        match &self.mongodb_uri {
            Some(_) => format!("MONGODB_URI / {}", self.db_name),
            None => format!("{} / {}", self.db_cluster, self.db_name),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
