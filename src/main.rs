use clap::Parser;
use dotenvy::dotenv;
use rust_metrics_backend::config::ServiceConfig;
use rust_metrics_backend::{AppState, create_app};
use std::net::SocketAddr;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port for the API server (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Use development defaults instead of the environment
    #[arg(long)]
    dev: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rust_metrics_backend=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🚀 Starting Rust Metrics Backend...");

    let mut config = if args.dev {
        ServiceConfig::development()
    } else {
        ServiceConfig::from_env()
    };
    if let Some(port) = args.port {
        config.port = port;
    }

    info!(
        "🧾 Extractor: {} {} (timeout {:?}, max {} concurrent)",
        config.extractor_program,
        config.extractor_args.join(" "),
        config.extraction_timeout,
        config.max_concurrent_extractions
    );
    info!(
        "📂 Staging dir: {} (retain: {}), public dir: {}, max upload {}MB",
        config.staging_dir.display(),
        config.retain_staged_files,
        config.public_dir.display(),
        config.max_upload_size / 1024 / 1024
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let swagger = config.enable_swagger;
    let app = create_app(AppState::from_config(config));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("✅ Server ready at http://{}", addr);
    if swagger {
        info!("📖 Swagger UI: http://{}/swagger-ui", addr);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("🛑 Server shut down gracefully.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("⌨️  Ctrl+C received, starting graceful shutdown...");
        },
        _ = terminate => {
            info!("💤 SIGTERM received, starting graceful shutdown...");
        },
    }
}
