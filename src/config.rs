use anyhow::{Context, Result};
use clap::Parser;
use std::env;

/// Centralized application configuration.
/// Combines environment variables and CLI arguments; read once at startup
/// and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Object store endpoint as `host:port`, without a scheme.
    pub store_endpoint: String,
    pub store_access_key: String,
    pub store_secret_key: String,
    pub store_region: String,
    pub store_use_tls: bool,
    pub jets_bucket: String,
    pub sportscars_bucket: String,
    pub environment: String,
    pub allowed_origins: Vec<String>,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Image gallery API over S3-compatible storage")]
pub struct Args {
    /// Host to bind to (overrides GALLERY_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides GALLERY_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Object store endpoint, host:port (overrides GALLERY_STORE_ENDPOINT)
    #[arg(long)]
    pub store_endpoint: Option<String>,

    /// Object store access key (overrides GALLERY_STORE_ACCESS_KEY)
    #[arg(long)]
    pub store_access_key: Option<String>,

    /// Object store secret key (overrides GALLERY_STORE_SECRET_KEY)
    #[arg(long)]
    pub store_secret_key: Option<String>,

    /// Object store region (overrides GALLERY_STORE_REGION)
    #[arg(long)]
    pub store_region: Option<String>,

    /// Use TLS when talking to the store (overrides GALLERY_STORE_USE_TLS)
    #[arg(long)]
    pub store_use_tls: Option<bool>,

    /// Bucket holding the jets gallery (overrides GALLERY_JETS_BUCKET)
    #[arg(long)]
    pub jets_bucket: Option<String>,

    /// Bucket holding the sports-cars gallery (overrides GALLERY_SPORTSCARS_BUCKET)
    #[arg(long)]
    pub sportscars_bucket: Option<String>,

    /// Environment tag, e.g. development/production (overrides GALLERY_ENVIRONMENT)
    #[arg(long)]
    pub environment: Option<String>,

    /// Comma-separated CORS origins (overrides GALLERY_ALLOWED_ORIGINS)
    #[arg(long, value_delimiter = ',')]
    pub allowed_origins: Option<Vec<String>>,
}

impl AppConfig {
    /// Parse environment variables + CLI args into an AppConfig.
    pub fn from_env_and_args() -> Result<Self> {
        let args = Args::parse();
        Self::merge(args)
    }

    fn merge(args: Args) -> Result<Self> {
        // --- Environment fallback ---
        let env_host = env::var("GALLERY_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = match env::var("GALLERY_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing GALLERY_PORT value `{}`", value))?,
            Err(env::VarError::NotPresent) => 8000,
            Err(err) => return Err(err).context("reading GALLERY_PORT"),
        };
        let env_endpoint =
            env::var("GALLERY_STORE_ENDPOINT").unwrap_or_else(|_| "localhost:9000".into());
        let env_access_key =
            env::var("GALLERY_STORE_ACCESS_KEY").unwrap_or_else(|_| "minioadmin".into());
        let env_secret_key =
            env::var("GALLERY_STORE_SECRET_KEY").unwrap_or_else(|_| "minioadmin".into());
        let env_region = env::var("GALLERY_STORE_REGION").unwrap_or_else(|_| "us-east-1".into());
        let env_use_tls = match env::var("GALLERY_STORE_USE_TLS") {
            Ok(value) => value
                .parse::<bool>()
                .with_context(|| format!("parsing GALLERY_STORE_USE_TLS value `{}`", value))?,
            Err(env::VarError::NotPresent) => false,
            Err(err) => return Err(err).context("reading GALLERY_STORE_USE_TLS"),
        };
        let env_jets = env::var("GALLERY_JETS_BUCKET").unwrap_or_else(|_| "jets".into());
        let env_sportscars =
            env::var("GALLERY_SPORTSCARS_BUCKET").unwrap_or_else(|_| "sportscars".into());
        let env_environment =
            env::var("GALLERY_ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let env_origins = env::var("GALLERY_ALLOWED_ORIGINS")
            .map(|value| {
                value
                    .split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_else(|_| vec!["http://localhost:5173".into()]);

        // --- Merge ---
        Ok(Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            store_endpoint: args.store_endpoint.unwrap_or(env_endpoint),
            store_access_key: args.store_access_key.unwrap_or(env_access_key),
            store_secret_key: args.store_secret_key.unwrap_or(env_secret_key),
            store_region: args.store_region.unwrap_or(env_region),
            store_use_tls: args.store_use_tls.unwrap_or(env_use_tls),
            jets_bucket: args.jets_bucket.unwrap_or(env_jets),
            sportscars_bucket: args.sportscars_bucket.unwrap_or(env_sportscars),
            environment: args.environment.unwrap_or(env_environment),
            allowed_origins: args.allowed_origins.unwrap_or(env_origins),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Scheme-qualified base URL of the store endpoint, for the SDK client.
    pub fn store_base_url(&self) -> String {
        let scheme = if self.store_use_tls { "https" } else { "http" };
        format!("{}://{}", scheme, self.store_endpoint)
    }
}
