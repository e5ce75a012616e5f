//! Files Gateway - HTTP facade over an object store bucket

use clap::Parser;
use files_cli::{server, GatewayConfig, StorageBackend};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "files-gateway")]
#[command(about = "HTTP files API over an S3 bucket")]
#[command(version)]
struct Args {
    /// Host to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0", env = "FILES_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8000", env = "FILES_PORT")]
    port: u16,

    /// Bucket holding the files
    #[arg(short, long, env = "S3_BUCKET_NAME")]
    bucket: String,

    /// Storage backend: s3 or memory
    #[arg(long, default_value = "s3", env = "FILES_BACKEND")]
    backend: StorageBackend,

    /// AWS region
    #[arg(long, env = "AWS_REGION")]
    region: Option<String>,

    /// Custom S3 endpoint (MinIO, LocalStack, ...)
    #[arg(long, env = "AWS_ENDPOINT_URL")]
    endpoint_url: Option<String>,

    /// Static access key id
    #[arg(long, env = "AWS_ACCESS_KEY_ID", hide_env_values = true)]
    access_key_id: Option<String>,

    /// Static secret access key
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    secret_access_key: Option<String>,

    /// Force path-style S3 addressing
    #[arg(long, env = "S3_FORCE_PATH_STYLE")]
    force_path_style: bool,

    /// Deadline for one store operation, in seconds
    #[arg(long, default_value = "30", env = "FILES_STORE_TIMEOUT_SECS")]
    store_timeout_secs: u64,

    /// Attempts per store operation
    #[arg(long, default_value = "3", env = "FILES_STORE_MAX_ATTEMPTS")]
    store_max_attempts: u32,

    /// Maximum request body size in bytes
    #[arg(long, default_value = "104857600", env = "FILES_MAX_BODY_SIZE")]
    max_body_size: usize,

    /// Disable CORS headers
    #[arg(long, env = "FILES_NO_CORS")]
    no_cors: bool,

    /// Enable debug logging
    #[arg(short, long, env = "FILES_DEBUG")]
    debug: bool,

    /// Emit logs as JSON lines
    #[arg(long, env = "FILES_LOG_JSON")]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Setup logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "files_cli={log_level},files_core={log_level},files_store={log_level},tower_http=debug"
        )
        .into()
    });
    let registry = tracing_subscriber::registry().with(filter);
    if args.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Files Gateway on {}:{}", args.host, args.port);
    tracing::info!("Bucket: {} ({})", args.bucket, args.backend);

    if let Some(ref endpoint) = args.endpoint_url {
        tracing::info!("S3 endpoint: {}", endpoint);
    }

    if args.backend == StorageBackend::Memory {
        tracing::warn!("⚠️  Using in-memory storage - data will NOT persist!");
    }

    let config = GatewayConfig {
        host: args.host,
        port: args.port,
        bucket: args.bucket,
        backend: args.backend,
        region: args.region,
        endpoint_url: args.endpoint_url,
        access_key_id: args.access_key_id,
        secret_access_key: args.secret_access_key,
        force_path_style: args.force_path_style,
        store_timeout_secs: args.store_timeout_secs,
        store_max_attempts: args.store_max_attempts,
        max_body_size: args.max_body_size,
        cors_enabled: !args.no_cors,
    };

    server::run_server_with_shutdown(config, server::ctrl_c()).await
}
