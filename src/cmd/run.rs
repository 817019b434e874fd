//! `ghost run`: start the mock server.
//!
//! Loads every `--mocks` file as a bundle, seeds the registry before the
//! listener accepts connections, and serves until Ctrl+C or SIGTERM.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::cli::RunArgs;
use crate::error::GhostError;
use crate::logging;
use crate::mock::bundle::FileBundle;
use crate::mock::{MockRegistry, Mocker};
use crate::server::{self, AppState};

pub async fn execute(args: RunArgs) -> Result<(), GhostError> {
    let log_format = logging::resolve_format(args.pretty, args.json);
    logging::init(&args.log_level, log_format);

    let bundles = load_bundles(&args).await?;

    let registry = MockRegistry::new();
    let seeded = registry.seed(&bundles).await;
    let state = Arc::new(AppState::new(registry));

    let router = server::build_router(state, args.max_body);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;

    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        addr = %addr,
        bundles = bundles.len(),
        mocks = seeded,
        "ghost started"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(server::shutdown_signal())
        .await?;

    tracing::info!("ghost stopped");
    Ok(())
}

async fn load_bundles(args: &RunArgs) -> Result<Vec<Box<dyn Mocker>>, GhostError> {
    let mut bundles: Vec<Box<dyn Mocker>> = Vec::with_capacity(args.mocks.len());
    for path in &args.mocks {
        let bundle = FileBundle::load(path).await?;
        tracing::debug!(path = %bundle.path().display(), bundle = bundle.name(), "mock file loaded");
        bundles.push(Box::new(bundle));
    }
    Ok(bundles)
}
