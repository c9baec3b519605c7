use fleet_dispatch::audit::{AuditSession, BatteryAuditor};
use fleet_dispatch::auth::SharedSecretAuthorizer;
use fleet_dispatch::config::ServiceConfig;
use fleet_dispatch::dispatch::DispatchEngine;
use fleet_dispatch::server::{self, RequestHandler};
use fleet_dispatch::seed;
use fleet_dispatch::store::{MemoryDroneStore, MemoryHistoryStore, MemoryMedicationStore};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SERVER_ID: &str = "fleet-dispatch";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = ServiceConfig::from_env()?;

    info!("Dispatch service starting: {}", SERVER_ID);
    info!("  Listen address: {}", config.listen_addr);
    info!("  Audit interval: {:?}", config.audit_interval);

    let drones = Arc::new(MemoryDroneStore::new());
    let medications = Arc::new(MemoryMedicationStore::new());
    let history = Arc::new(MemoryHistoryStore::new());

    let engine = DispatchEngine::new(drones.clone(), medications);

    if config.seed_demo_fleet {
        let added = seed::seed_demo_fleet(&engine).await?;
        info!("[SEED] Demo fleet ready ({} drones added)", added);
    }

    let auditor = BatteryAuditor::new(drones, history, Arc::new(AuditSession::new()))
        .with_interval(config.audit_interval)
        .start()?;

    let handler = Arc::new(RequestHandler::new(
        SERVER_ID,
        engine,
        Arc::new(SharedSecretAuthorizer::new(config.api_key.clone())),
    ));

    let listener = TcpListener::bind(&config.listen_addr).await?;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let server_task = tokio::spawn(server::serve(listener, handler, shutdown_rx));

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");

    shutdown_tx.send_replace(true);
    let audit_session = auditor.session().clone();
    auditor.stop().await;
    info!("[AUDIT] Auditor {:?}", audit_session.phase());

    match server_task.await {
        Ok(result) => result?,
        Err(e) => error!("[SERVER] Server task failed: {}", e),
    }

    info!("Dispatch service stopped");
    Ok(())
}
